//! Schroeder/Freeverb-style algorithmic reverb.
//!
//! Eight parallel damped comb filters per channel feeding four series
//! allpass diffusers. Mono in, stereo out; only the wet mix is exposed
//! as a control, the room character is fixed at construction.

/// Damped comb filter delay line.
#[derive(Debug, Clone)]
struct Comb {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
    damp: f32,
    store: f32,
}

impl Comb {
    fn new(size: usize, feedback: f32, damp: f32) -> Self {
        Comb {
            buffer: vec![0.0; size.max(1)],
            index: 0,
            feedback,
            damp,
            store: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];
        self.store = output * (1.0 - self.damp) + self.store * self.damp;
        self.buffer[self.index] = input + self.store * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

/// Allpass diffuser.
#[derive(Debug, Clone)]
struct Allpass {
    buffer: Vec<f32>,
    index: usize,
}

impl Allpass {
    const FEEDBACK: f32 = 0.5;

    fn new(size: usize) -> Self {
        Allpass {
            buffer: vec![0.0; size.max(1)],
            index: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let buffered = self.buffer[self.index];
        self.buffer[self.index] = input + buffered * Self::FEEDBACK;
        self.index = (self.index + 1) % self.buffer.len();
        buffered - input
    }
}

// Freeverb tuning, in samples at 44100 Hz; the right channel runs the
// same lines shifted by a fixed spread for stereo decorrelation.
const COMB_TUNING: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNING: [usize; 4] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;

/// Stereo reverb with a live wet-mix control.
#[derive(Debug, Clone)]
pub struct Reverb {
    combs_l: Vec<Comb>,
    combs_r: Vec<Comb>,
    allpasses_l: Vec<Allpass>,
    allpasses_r: Vec<Allpass>,

    /// Dry/wet mix (0 = dry only, 1 = wet only).
    pub wet: f32,
    input_gain: f32,
}

impl Reverb {
    /// Build a reverb for the given sample rate. `decay` in [0, 1]
    /// scales the comb feedback (longer tails toward 1).
    pub fn new(sample_rate: f32, decay: f32) -> Self {
        let scale = sample_rate / 44100.0;
        let feedback = 0.7 + 0.28 * decay.clamp(0.0, 1.0);
        let damp = 0.2;

        let scaled = |samples: usize, offset: usize| -> usize {
            (samples as f32 * scale) as usize + offset
        };

        Reverb {
            combs_l: COMB_TUNING
                .iter()
                .map(|&t| Comb::new(scaled(t, 0), feedback, damp))
                .collect(),
            combs_r: COMB_TUNING
                .iter()
                .map(|&t| Comb::new(scaled(t, STEREO_SPREAD), feedback, damp))
                .collect(),
            allpasses_l: ALLPASS_TUNING
                .iter()
                .map(|&t| Allpass::new(scaled(t, 0)))
                .collect(),
            allpasses_r: ALLPASS_TUNING
                .iter()
                .map(|&t| Allpass::new(scaled(t, STEREO_SPREAD)))
                .collect(),
            wet: 0.3,
            input_gain: 0.015,
        }
    }

    pub fn set_wet(&mut self, wet: f32) {
        self.wet = wet.clamp(0.0, 1.0);
    }

    /// Process one mono sample into a stereo pair.
    #[inline]
    pub fn process(&mut self, input: f32) -> (f32, f32) {
        let attenuated = input * self.input_gain;

        let mut wet_l = 0.0;
        let mut wet_r = 0.0;
        for comb in &mut self.combs_l {
            wet_l += comb.process(attenuated);
        }
        for comb in &mut self.combs_r {
            wet_r += comb.process(attenuated);
        }
        for allpass in &mut self.allpasses_l {
            wet_l = allpass.process(wet_l);
        }
        for allpass in &mut self.allpasses_r {
            wet_r = allpass.process(wet_r);
        }

        let dry = input * (1.0 - self.wet);
        (dry + wet_l * self.wet, dry + wet_r * self.wet)
    }
}
