//! Feedback delay line with dry/wet mix.

/// A mono feedback delay. Time and feedback track their UI controls and
/// may change while audio is running; the buffer is sized once for the
/// maximum supported time.
#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    sample_rate: f32,

    /// Delay time in seconds, clamped to the buffer size on use.
    pub time: f32,
    /// Feedback amount [0, 0.99].
    pub feedback: f32,
    /// Dry/wet mix (0 = dry only, 1 = wet only).
    pub mix: f32,
}

impl FeedbackDelay {
    pub fn new(sample_rate: f32, max_seconds: f32) -> Self {
        FeedbackDelay {
            buffer: vec![0.0; (sample_rate * max_seconds) as usize + 1],
            write_pos: 0,
            sample_rate,
            time: 0.25,
            feedback: 0.3,
            mix: 0.5,
        }
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds.max(0.0);
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// Process one sample, returning the dry/wet mixed output.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        let delay_samples = ((self.time * self.sample_rate) as usize).min(len - 1);
        let read_pos = (self.write_pos + len - delay_samples) % len;

        let delayed = self.buffer[read_pos];
        self.buffer[self.write_pos] = input + delayed * self.feedback;
        self.write_pos = (self.write_pos + 1) % len;

        input * (1.0 - self.mix) + delayed * self.mix
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_mix_passes_input_through() {
        let mut delay = FeedbackDelay::new(44100.0, 1.0);
        delay.mix = 0.0;
        let out = delay.process(0.7);
        assert!((out - 0.7).abs() < 1e-6);
    }

    #[test]
    fn impulse_reappears_after_delay_time() {
        let sample_rate = 1000.0;
        let mut delay = FeedbackDelay::new(sample_rate, 1.0);
        delay.set_time(0.01); // 10 samples
        delay.set_feedback(0.0);
        delay.mix = 1.0;

        delay.process(1.0);
        for _ in 1..10 {
            let out = delay.process(0.0);
            assert!(out.abs() < 1e-6, "echo arrived early");
        }
        let echo = delay.process(0.0);
        assert!((echo - 1.0).abs() < 1e-6, "echo missing, got {echo}");
    }

    #[test]
    fn feedback_attenuates_successive_echoes() {
        let sample_rate = 1000.0;
        let mut delay = FeedbackDelay::new(sample_rate, 1.0);
        delay.set_time(0.01);
        delay.set_feedback(0.5);
        delay.mix = 1.0;

        delay.process(1.0);
        for _ in 1..10 {
            delay.process(0.0);
        }
        let first = delay.process(0.0);
        for _ in 1..10 {
            delay.process(0.0);
        }
        let second = delay.process(0.0);
        assert!((first - 1.0).abs() < 1e-6);
        assert!((second - 0.5).abs() < 1e-6, "second echo should be halved");
    }

    #[test]
    fn feedback_is_clamped_stable() {
        let mut delay = FeedbackDelay::new(1000.0, 0.1);
        delay.set_time(0.01);
        delay.set_feedback(5.0);
        assert!(delay.feedback <= 0.99);

        delay.mix = 1.0;
        delay.process(1.0);
        let mut peak: f32 = 0.0;
        for _ in 0..10_000 {
            peak = peak.max(delay.process(0.0).abs());
        }
        assert!(peak.is_finite());
    }

    #[test]
    fn clear_empties_the_line() {
        let mut delay = FeedbackDelay::new(1000.0, 1.0);
        delay.set_time(0.01);
        delay.mix = 1.0;
        delay.process(1.0);
        delay.clear();
        for _ in 0..50 {
            assert_eq!(delay.process(0.0), 0.0);
        }
    }
}
