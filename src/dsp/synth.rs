//! PolySynth — polyphonic note-triggered synthesis with the master
//! effect chain.
//!
//! Voices are keyed by note name and rendered through the fixed graph
//! `voices → lowpass filter → delay → reverb → master volume`, mirroring
//! the host's audio routing. All parameters are live-settable from the
//! control panel.

use crate::dispatcher::NoteSink;

use super::delay::FeedbackDelay;
use super::envelope::Envelope;
use super::filter::{Biquad, FilterMode};
use super::oscillator::Waveform;
use super::reverb::Reverb;
use super::voice::Voice;

/// Hard cap on simultaneous voices; the oldest voice is stolen beyond it.
pub const MAX_POLYPHONY: usize = 8;

/// Parse a note name ("C4", "F#3", "Bb5") into a MIDI note number.
pub fn note_to_midi(note: &str) -> Option<i32> {
    let mut chars = note.chars();
    let base_semitone = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, octave_str) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest),
    };

    let octave: i32 = octave_str.parse().ok()?;
    // C4 = 60
    Some((octave + 1) * 12 + base_semitone + accidental)
}

/// MIDI note number to frequency at A4 = 440 Hz.
pub fn midi_to_frequency(midi: i32) -> f32 {
    440.0 * 2.0_f32.powf((midi as f32 - 69.0) / 12.0)
}

/// Note name straight to frequency.
pub fn note_to_frequency(note: &str) -> Option<f32> {
    note_to_midi(note).map(midi_to_frequency)
}

/// Convert a decibel volume control value to linear gain.
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

#[derive(Debug, Clone)]
struct ActiveNote {
    note: String,
    voice: Voice,
}

/// The live synthesizer. Implements [`NoteSink`] so the dispatcher can
/// drive it directly.
#[derive(Debug, Clone)]
pub struct PolySynth {
    sample_rate: f32,
    waveform: Waveform,
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    voices: Vec<ActiveNote>,
    filter: Biquad,
    delay: FeedbackDelay,
    reverb: Reverb,
    master_gain: f32,
}

impl PolySynth {
    pub fn new(sample_rate: f32) -> Self {
        PolySynth {
            sample_rate,
            waveform: Waveform::Triangle,
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
            voices: Vec::with_capacity(MAX_POLYPHONY),
            filter: Biquad::new(FilterMode::Lowpass, 2000.0, sample_rate),
            delay: FeedbackDelay::new(sample_rate, 1.0),
            reverb: Reverb::new(sample_rate, 0.5),
            master_gain: db_to_gain(-6.0),
        }
    }

    /// Start a voice for `note`. Unparseable note names are ignored.
    /// Past [`MAX_POLYPHONY`], a finished voice is reclaimed if any,
    /// otherwise the oldest voice is stolen.
    pub fn trigger_attack(&mut self, note: &str) {
        let Some(frequency) = note_to_frequency(note) else {
            return;
        };
        if self.voices.len() >= MAX_POLYPHONY {
            match self.voices.iter().position(|v| v.voice.is_finished()) {
                Some(pos) => {
                    self.voices.remove(pos);
                }
                None => {
                    self.voices.remove(0);
                }
            }
        }
        let envelope = Envelope::new(
            self.attack,
            self.decay,
            self.sustain,
            self.release,
            self.sample_rate,
        );
        self.voices.push(ActiveNote {
            note: note.to_string(),
            voice: Voice::new(self.waveform, frequency, envelope, 1.0, self.sample_rate),
        });
    }

    /// Release every voice sounding `note`. A no-op when none is.
    pub fn trigger_release(&mut self, note: &str) {
        for active in self.voices.iter_mut().filter(|v| v.note == note) {
            active.voice.note_off();
        }
    }

    /// Number of allocated (possibly releasing) voices.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Update the ADSR applied to subsequently triggered voices.
    pub fn set_envelope(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack = attack.max(0.0);
        self.decay = decay.max(0.0);
        self.sustain = sustain.clamp(0.0, 1.0);
        self.release = release.max(0.0);
    }

    pub fn set_filter_cutoff(&mut self, cutoff: f32) {
        self.filter.set_cutoff(cutoff);
    }

    pub fn set_delay_time(&mut self, seconds: f32) {
        self.delay.set_time(seconds);
    }

    pub fn set_delay_feedback(&mut self, feedback: f32) {
        self.delay.set_feedback(feedback);
    }

    pub fn set_reverb_wet(&mut self, wet: f32) {
        self.reverb.set_wet(wet);
    }

    pub fn set_master_volume_db(&mut self, db: f32) {
        self.master_gain = db_to_gain(db);
    }

    /// Render one block of stereo audio through the effect chain.
    /// Finished voices are reclaimed at the end of the block.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        for i in 0..frames {
            let mut sum = 0.0;
            for active in &mut self.voices {
                sum += active.voice.tick();
            }
            let filtered = self.filter.process(sum);
            let delayed = self.delay.process(filtered);
            let (l, r) = self.reverb.process(delayed);
            left[i] = soft_clip(l * self.master_gain);
            right[i] = soft_clip(r * self.master_gain);
        }
        self.voices.retain(|v| !v.voice.is_finished());
    }
}

impl NoteSink for PolySynth {
    fn note_on(&mut self, note: &str) {
        self.trigger_attack(note);
    }

    fn note_off(&mut self, note: &str) {
        self.trigger_release(note);
    }
}

/// tanh soft clipper keeping the summed output inside [-1, 1].
fn soft_clip(sample: f32) -> f32 {
    sample.tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    fn render_peak(synth: &mut PolySynth, frames: usize) -> f32 {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        synth.render(&mut left, &mut right);
        left.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()))
    }

    #[test]
    fn note_to_midi_naturals() {
        assert_eq!(note_to_midi("C4"), Some(60));
        assert_eq!(note_to_midi("A4"), Some(69));
        assert_eq!(note_to_midi("B4"), Some(71));
        assert_eq!(note_to_midi("C5"), Some(72));
    }

    #[test]
    fn note_to_midi_accidentals() {
        assert_eq!(note_to_midi("C#4"), Some(61));
        assert_eq!(note_to_midi("D#5"), Some(75));
        assert_eq!(note_to_midi("Bb3"), Some(58));
    }

    #[test]
    fn note_to_midi_rejects_garbage() {
        assert_eq!(note_to_midi(""), None);
        assert_eq!(note_to_midi("H4"), None);
        assert_eq!(note_to_midi("C"), None);
        assert_eq!(note_to_midi("C#"), None);
    }

    #[test]
    fn a4_is_440() {
        let freq = note_to_frequency("A4").expect("A4 parses");
        assert!((freq - 440.0).abs() < 0.01);
    }

    #[test]
    fn c4_is_middle_c() {
        let freq = note_to_frequency("C4").expect("C4 parses");
        assert!((freq - 261.63).abs() < 0.05, "expected ~261.63, got {freq}");
    }

    #[test]
    fn db_to_gain_reference_points() {
        assert!((db_to_gain(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_gain(-6.0) - 0.501).abs() < 0.01);
        assert!((db_to_gain(-20.0) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn attack_produces_sound() {
        let mut synth = PolySynth::new(SR);
        synth.trigger_attack("A4");
        let peak = render_peak(&mut synth, 4410);
        assert!(peak > 0.01, "attacked note should be audible, got {peak}");
    }

    #[test]
    fn output_is_bounded() {
        let mut synth = PolySynth::new(SR);
        for note in ["C4", "E4", "G4", "B4", "C5", "D#4", "F#4", "A4"] {
            synth.trigger_attack(note);
        }
        let peak = render_peak(&mut synth, 8820);
        assert!(peak <= 1.0, "soft clip must bound output, got {peak}");
    }

    #[test]
    fn unparseable_note_is_ignored() {
        let mut synth = PolySynth::new(SR);
        synth.trigger_attack("X9");
        synth.trigger_attack("");
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn polyphony_caps_at_eight() {
        let mut synth = PolySynth::new(SR);
        for octave in 2..=6 {
            for pc in ["C", "E", "G"] {
                synth.trigger_attack(&format!("{pc}{octave}"));
            }
        }
        assert_eq!(synth.active_voices(), MAX_POLYPHONY);
    }

    #[test]
    fn voice_stealing_keeps_the_newest_note() {
        let mut synth = PolySynth::new(SR);
        for i in 0..MAX_POLYPHONY {
            synth.trigger_attack(&format!("C{i}"));
        }
        synth.trigger_attack("B5");
        assert_eq!(synth.active_voices(), MAX_POLYPHONY);
        assert!(
            synth.voices.iter().any(|v| v.note == "B5"),
            "the stealing note must be allocated"
        );
        assert!(
            !synth.voices.iter().any(|v| v.note == "C0"),
            "the oldest voice should have been stolen"
        );
    }

    #[test]
    fn release_reclaims_voices() {
        let mut synth = PolySynth::new(SR);
        synth.set_envelope(0.001, 0.01, 0.5, 0.01);
        synth.trigger_attack("C4");
        synth.trigger_attack("E4");
        synth.trigger_release("C4");

        // Render well past the 10 ms release tail.
        render_peak(&mut synth, 4410);
        assert_eq!(synth.active_voices(), 1, "released voice should be reclaimed");
        assert_eq!(synth.voices[0].note, "E4");
    }

    #[test]
    fn release_of_silent_note_is_a_no_op() {
        let mut synth = PolySynth::new(SR);
        synth.trigger_attack("C4");
        synth.trigger_release("G4");
        assert_eq!(synth.active_voices(), 1);
    }

    #[test]
    fn master_volume_scales_output() {
        let mut loud = PolySynth::new(SR);
        loud.set_master_volume_db(0.0);
        loud.trigger_attack("A4");
        let loud_peak = render_peak(&mut loud, 4410);

        let mut quiet = PolySynth::new(SR);
        quiet.set_master_volume_db(-30.0);
        quiet.trigger_attack("A4");
        let quiet_peak = render_peak(&mut quiet, 4410);

        assert!(
            quiet_peak < loud_peak * 0.2,
            "-30 dB should be much quieter: {quiet_peak} vs {loud_peak}"
        );
    }

    #[test]
    fn waveform_change_applies_to_new_voices() {
        let mut synth = PolySynth::new(SR);
        synth.set_waveform(Waveform::Sawtooth);
        synth.trigger_attack("A4");
        assert_eq!(synth.active_voices(), 1);
        let peak = render_peak(&mut synth, 4410);
        assert!(peak > 0.01);
    }
}
