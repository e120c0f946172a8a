//! Built-in synthesizer presets.
//!
//! Each preset is a plain immutable record bundling every synthesis
//! parameter the control panel exposes. Applying one is a single atomic
//! overwrite of all nine values; the table itself never changes at
//! runtime.

use serde::Serialize;

use crate::dsp::oscillator::Waveform;

/// One named parameter bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SynthPreset {
    /// Stable identifier used by the preset selector.
    pub id: &'static str,
    /// Display name shown in the preset indicator.
    pub name: &'static str,
    pub waveform: Waveform,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    /// Lowpass cutoff in Hz.
    pub filter_cutoff: f32,
    pub reverb_wet: f32,
    /// Delay time in seconds.
    pub delay_time: f32,
    pub delay_feedback: f32,
}

/// The eight built-in presets, in selector order.
pub const PRESETS: [SynthPreset; 8] = [
    SynthPreset {
        id: "piano_suave",
        name: "Piano suave",
        waveform: Waveform::Sine,
        attack: 0.005,
        decay: 0.2,
        sustain: 0.6,
        release: 0.6,
        filter_cutoff: 3500.0,
        reverb_wet: 0.12,
        delay_time: 0.08,
        delay_feedback: 0.12,
    },
    SynthPreset {
        id: "sint_80s",
        name: "Sintetizador 80s",
        waveform: Waveform::Sawtooth,
        attack: 0.02,
        decay: 0.25,
        sustain: 0.6,
        release: 1.2,
        filter_cutoff: 2600.0,
        reverb_wet: 0.35,
        delay_time: 0.28,
        delay_feedback: 0.32,
    },
    SynthPreset {
        id: "ambiente",
        name: "Ambiente espacial",
        waveform: Waveform::Triangle,
        attack: 0.6,
        decay: 0.9,
        sustain: 0.8,
        release: 2.8,
        filter_cutoff: 1800.0,
        reverb_wet: 0.8,
        delay_time: 0.5,
        delay_feedback: 0.5,
    },
    SynthPreset {
        id: "bajo",
        name: "Bajo profundo",
        waveform: Waveform::Sawtooth,
        attack: 0.01,
        decay: 0.2,
        sustain: 0.8,
        release: 0.6,
        filter_cutoff: 600.0,
        reverb_wet: 0.08,
        delay_time: 0.02,
        delay_feedback: 0.08,
    },
    SynthPreset {
        id: "organo",
        name: "Órgano clásico",
        waveform: Waveform::Square,
        attack: 0.01,
        decay: 0.3,
        sustain: 0.7,
        release: 0.9,
        filter_cutoff: 2200.0,
        reverb_wet: 0.18,
        delay_time: 0.06,
        delay_feedback: 0.12,
    },
    SynthPreset {
        id: "lead",
        name: "Lead brillante",
        waveform: Waveform::Sawtooth,
        attack: 0.01,
        decay: 0.12,
        sustain: 0.5,
        release: 0.6,
        filter_cutoff: 3200.0,
        reverb_wet: 0.22,
        delay_time: 0.16,
        delay_feedback: 0.18,
    },
    SynthPreset {
        id: "pad",
        name: "Pad atmosférico",
        waveform: Waveform::Triangle,
        attack: 0.5,
        decay: 0.8,
        sustain: 0.75,
        release: 2.5,
        filter_cutoff: 2000.0,
        reverb_wet: 0.6,
        delay_time: 0.35,
        delay_feedback: 0.4,
    },
    SynthPreset {
        id: "percusion",
        name: "Percusión corta",
        waveform: Waveform::Square,
        attack: 0.001,
        decay: 0.05,
        sustain: 0.0,
        release: 0.08,
        filter_cutoff: 4000.0,
        reverb_wet: 0.06,
        delay_time: 0.02,
        delay_feedback: 0.04,
    },
];

/// Look up a preset by id. Unknown ids are not an error — the caller
/// simply ignores them, like an unmatched selector value.
pub fn find(id: &str) -> Option<&'static SynthPreset> {
    PRESETS.iter().find(|p| p.id == id)
}
