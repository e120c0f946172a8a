//! Biquad filter for the master cutoff control.
//!
//! RBJ Audio EQ Cookbook coefficients, Direct Form I. Only the modes the
//! synth graph actually routes through are implemented.

use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Lowpass,
    Highpass,
}

/// Second-order IIR filter with a live-settable cutoff.
#[derive(Debug, Clone)]
pub struct Biquad {
    mode: FilterMode,
    cutoff: f32,
    q: f32,
    sample_rate: f32,

    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn new(mode: FilterMode, cutoff: f32, sample_rate: f32) -> Self {
        let mut filter = Biquad {
            mode,
            cutoff,
            q: 0.707, // Butterworth
            sample_rate,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.recompute();
        filter
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Move the cutoff frequency, clamped below Nyquist.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff.clamp(1.0, self.sample_rate * 0.49);
        self.recompute();
    }

    fn recompute(&mut self) {
        let w0 = 2.0 * PI * self.cutoff / self.sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * self.q);

        let (b0, b1, b2) = match self.mode {
            FilterMode::Lowpass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            FilterMode::Highpass => {
                let b0 = (1.0 + cos_w0) / 2.0;
                (b0, -(1.0 + cos_w0), b0)
            }
        };
        let a0 = 1.0 + alpha;
        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowpass_passes_dc() {
        let mut f = Biquad::new(FilterMode::Lowpass, 2000.0, 44100.0);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = f.process(1.0);
        }
        assert!((out - 1.0).abs() < 1e-3, "lowpass should pass DC, got {out}");
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut f = Biquad::new(FilterMode::Highpass, 1000.0, 44100.0);
        let mut out = 0.0;
        for _ in 0..2000 {
            out = f.process(1.0);
        }
        assert!(out.abs() < 1e-3, "highpass should block DC, got {out}");
    }

    #[test]
    fn lowpass_attenuates_high_frequencies() {
        let mut f = Biquad::new(FilterMode::Lowpass, 600.0, 44100.0);
        let freq = 10_000.0;
        let mut peak: f32 = 0.0;
        for i in 0..4410 {
            let t = i as f32 / 44100.0;
            let out = f.process((2.0 * PI * freq * t).sin());
            if i > 1000 {
                peak = peak.max(out.abs());
            }
        }
        assert!(peak < 0.05, "600 Hz lowpass should crush 10 kHz, got {peak}");
    }

    #[test]
    fn cutoff_clamps_below_nyquist() {
        let mut f = Biquad::new(FilterMode::Lowpass, 2000.0, 44100.0);
        f.set_cutoff(40_000.0);
        assert!(f.cutoff() < 22_050.0);

        for i in 0..1000 {
            let out = f.process(if i == 0 { 1.0 } else { 0.0 });
            assert!(out.is_finite(), "filter blew up at sample {i}");
        }
    }

    #[test]
    fn output_stays_finite_under_impulses() {
        let mut f = Biquad::new(FilterMode::Lowpass, 200.0, 44100.0);
        for i in 0..10_000 {
            let input = if i % 97 == 0 { 1.0 } else { 0.0 };
            assert!(f.process(input).is_finite());
        }
    }
}
