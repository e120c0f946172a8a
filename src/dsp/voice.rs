//! Voice — one sounding note: an oscillator shaped by an ADSR envelope.

use super::envelope::Envelope;
use super::oscillator::{Oscillator, Waveform};

/// A single live voice. Created on note-on with the control values in
/// effect at that moment; parameter changes apply to subsequent voices.
#[derive(Debug, Clone)]
pub struct Voice {
    oscillator: Oscillator,
    envelope: Envelope,
    velocity: f32,
}

impl Voice {
    pub fn new(
        waveform: Waveform,
        frequency: f32,
        envelope: Envelope,
        velocity: f32,
        sample_rate: f32,
    ) -> Self {
        let mut voice = Voice {
            oscillator: Oscillator::new(waveform, frequency, sample_rate),
            envelope,
            velocity,
        };
        voice.oscillator.reset();
        voice.envelope.gate_on();
        voice
    }

    /// Release the note; the envelope fades out from its current level.
    pub fn note_off(&mut self) {
        self.envelope.gate_off();
    }

    /// Next sample: oscillator shaped by envelope and velocity.
    pub fn tick(&mut self) -> f32 {
        if self.envelope.is_finished() {
            return 0.0;
        }
        let sample = self.oscillator.tick();
        sample * self.envelope.tick() * self.velocity
    }

    /// True once the envelope has fully released.
    pub fn is_finished(&self) -> bool {
        self.envelope.is_finished()
    }
}
