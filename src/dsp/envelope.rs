//! Linear ADSR envelope generator.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// ADSR envelope with linear slopes.
///
/// Each stage advances the level by a fixed per-sample step derived from
/// the stage time; a retriggered attack climbs from the current level
/// rather than snapping to zero.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Attack time in seconds.
    pub attack: f32,
    /// Decay time in seconds.
    pub decay: f32,
    /// Sustain level [0, 1].
    pub sustain: f32,
    /// Release time in seconds.
    pub release: f32,

    stage: Stage,
    level: f32,
    release_step: f32,
    sample_rate: f32,
}

impl Envelope {
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32, sample_rate: f32) -> Self {
        Envelope {
            attack,
            decay,
            sustain,
            release,
            stage: Stage::Idle,
            level: 0.0,
            release_step: 0.0,
            sample_rate,
        }
    }

    /// Note on: enter the attack stage from the current level.
    pub fn gate_on(&mut self) {
        self.stage = Stage::Attack;
    }

    /// Note off: enter the release stage, fading from the current level.
    pub fn gate_off(&mut self) {
        if self.stage == Stage::Idle {
            return;
        }
        self.release_step = self.level / stage_samples(self.release, self.sample_rate);
        self.stage = Stage::Release;
    }

    /// Advance one sample and return the level in [0, 1].
    pub fn tick(&mut self) -> f32 {
        match self.stage {
            Stage::Idle => {
                self.level = 0.0;
            }
            Stage::Attack => {
                self.level += 1.0 / stage_samples(self.attack, self.sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                self.level -= (1.0 - self.sustain) / stage_samples(self.decay, self.sample_rate);
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = Stage::Sustain;
                }
            }
            Stage::Sustain => {
                self.level = self.sustain;
            }
            Stage::Release => {
                self.level -= self.release_step;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = Stage::Idle;
                }
            }
        }
        self.level
    }

    /// True once the release has fully faded out (or never started).
    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Idle
    }
}

/// Stage length in samples, never shorter than one sample so zero-length
/// stages still terminate.
fn stage_samples(seconds: f32, sample_rate: f32) -> f32 {
    (seconds * sample_rate).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44100.0;

    #[test]
    fn starts_idle_and_silent() {
        let mut env = Envelope::new(0.01, 0.1, 0.7, 0.3, SR);
        assert!(env.is_finished());
        assert_eq!(env.tick(), 0.0);
    }

    #[test]
    fn attack_peaks_at_one() {
        let mut env = Envelope::new(0.01, 0.5, 0.5, 0.3, SR);
        env.gate_on();
        let mut peak: f32 = 0.0;
        for _ in 0..600 {
            peak = peak.max(env.tick());
        }
        assert!((peak - 1.0).abs() < 1e-3, "attack should peak at 1, got {peak}");
    }

    #[test]
    fn decays_to_sustain_and_holds() {
        let mut env = Envelope::new(0.001, 0.001, 0.8, 0.3, SR);
        env.gate_on();
        for _ in 0..500 {
            env.tick();
        }
        let held = env.tick();
        assert!((held - 0.8).abs() < 1e-3, "expected sustain 0.8, got {held}");
    }

    #[test]
    fn zero_sustain_holds_at_zero_until_release() {
        // The "percusion" preset relies on sustain = 0 not finishing the
        // envelope while the key stays held.
        let mut env = Envelope::new(0.001, 0.05, 0.0, 0.08, SR);
        env.gate_on();
        for _ in 0..10_000 {
            env.tick();
        }
        assert!(!env.is_finished(), "held note must stay open at sustain 0");
        assert_eq!(env.tick(), 0.0);
    }

    #[test]
    fn release_fades_to_idle() {
        let mut env = Envelope::new(0.001, 0.001, 0.6, 0.01, SR);
        env.gate_on();
        for _ in 0..500 {
            env.tick();
        }
        env.gate_off();
        for _ in 0..1000 {
            env.tick();
        }
        assert!(env.is_finished());
        assert_eq!(env.tick(), 0.0);
    }

    #[test]
    fn gate_off_while_idle_is_a_no_op() {
        let mut env = Envelope::new(0.01, 0.1, 0.7, 0.3, SR);
        env.gate_off();
        assert!(env.is_finished());
    }

    #[test]
    fn output_always_within_unit_range() {
        let mut env = Envelope::new(0.6, 0.9, 0.8, 2.8, SR);
        env.gate_on();
        for _ in 0..5000 {
            let l = env.tick();
            assert!((0.0..=1.0).contains(&l), "level out of range: {l}");
        }
        env.gate_off();
        for _ in 0..5000 {
            let l = env.tick();
            assert!((0.0..=1.0).contains(&l), "release level out of range: {l}");
        }
    }

    #[test]
    fn retrigger_climbs_from_current_level() {
        let mut env = Envelope::new(0.1, 0.1, 0.5, 0.5, SR);
        env.gate_on();
        for _ in 0..2000 {
            env.tick();
        }
        let before = env.tick();
        env.gate_on();
        let after = env.tick();
        assert!(
            after >= before,
            "retrigger must not snap down: {before} -> {after}"
        );
    }
}
