//! Band-limited oscillators using PolyBLEP anti-aliasing.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Waveform shapes offered by the oscillator-type control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Parse a control value ("sine", "square", "sawtooth", "triangle").
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sine" => Some(Waveform::Sine),
            "square" => Some(Waveform::Square),
            "sawtooth" => Some(Waveform::Sawtooth),
            "triangle" => Some(Waveform::Triangle),
            _ => None,
        }
    }
}

/// A single anti-aliased oscillator. Phase runs in [0, 1).
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    frequency: f32,
    phase: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32, sample_rate: f32) -> Self {
        Oscillator {
            waveform,
            frequency,
            phase: 0.0,
            sample_rate,
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    /// Produce the next sample and advance the phase.
    pub fn tick(&mut self) -> f32 {
        let dt = self.frequency / self.sample_rate;
        let t = self.phase;

        let sample = match self.waveform {
            Waveform::Sine => (2.0 * PI * t).sin(),
            Waveform::Sawtooth => 2.0 * t - 1.0 - poly_blep(t, dt),
            Waveform::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(t, dt) - poly_blep((t + 0.5) % 1.0, dt)
            }
            // Piecewise-linear triangle; its discontinuities are in the
            // derivative only, so no BLEP correction is applied.
            Waveform::Triangle => {
                if t < 0.5 {
                    4.0 * t - 1.0
                } else {
                    3.0 - 4.0 * t
                }
            }
        };

        self.phase += dt;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Polynomial band-limited step correction around phase discontinuities.
fn poly_blep(t: f32, dt: f32) -> f32 {
    if t < dt {
        let x = t / dt;
        2.0 * x - x * x - 1.0
    } else if t > 1.0 - dt {
        let x = (t - 1.0) / dt;
        x * x + 2.0 * x + 1.0
    } else {
        0.0
    }
}
