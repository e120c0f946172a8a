//! Control panel state — the Rust-side mirror of every UI control.
//!
//! The host renders sliders/selects from this struct and writes user
//! edits back through the session; preset application overwrites the
//! nine preset-controlled values in one step.

use serde::Serialize;

use crate::dsp::oscillator::Waveform;
use crate::preset::SynthPreset;

/// Current values of all synthesis controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPanel {
    pub osc_type: Waveform,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    /// Lowpass cutoff in Hz.
    pub filter_cutoff: f32,
    /// Delay time in seconds.
    pub delay_time: f32,
    pub delay_feedback: f32,
    pub reverb_wet: f32,
    /// Master volume in dB.
    pub master_volume_db: f32,
    /// Display name of the last applied preset, for the indicator.
    pub preset_name: Option<&'static str>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        ControlPanel {
            osc_type: Waveform::Triangle,
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
            filter_cutoff: 2000.0,
            delay_time: 0.25,
            delay_feedback: 0.3,
            reverb_wet: 0.3,
            master_volume_db: -6.0,
            preset_name: None,
        }
    }
}

impl ControlPanel {
    /// Overwrite all preset-controlled values at once. The master
    /// volume is the one control presets leave untouched.
    pub fn apply_preset(&mut self, preset: &SynthPreset) {
        self.osc_type = preset.waveform;
        self.attack = preset.attack;
        self.decay = preset.decay;
        self.sustain = preset.sustain;
        self.release = preset.release;
        self.filter_cutoff = preset.filter_cutoff;
        self.delay_time = preset.delay_time;
        self.delay_feedback = preset.delay_feedback;
        self.reverb_wet = preset.reverb_wet;
        self.preset_name = Some(preset.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset;

    #[test]
    fn defaults_match_the_initial_graph() {
        let panel = ControlPanel::default();
        assert_eq!(panel.osc_type, Waveform::Triangle);
        assert_eq!(panel.filter_cutoff, 2000.0);
        assert_eq!(panel.delay_time, 0.25);
        assert_eq!(panel.delay_feedback, 0.3);
        assert_eq!(panel.reverb_wet, 0.3);
        assert_eq!(panel.master_volume_db, -6.0);
        assert!(panel.preset_name.is_none());
    }

    #[test]
    fn apply_preset_overwrites_all_nine_values() {
        let mut panel = ControlPanel::default();
        let bajo = preset::find("bajo").expect("bajo exists");
        panel.apply_preset(bajo);

        assert_eq!(panel.osc_type, Waveform::Sawtooth);
        assert_eq!(panel.attack, 0.01);
        assert_eq!(panel.decay, 0.2);
        assert_eq!(panel.sustain, 0.8);
        assert_eq!(panel.release, 0.6);
        assert_eq!(panel.filter_cutoff, 600.0);
        assert_eq!(panel.reverb_wet, 0.08);
        assert_eq!(panel.delay_time, 0.02);
        assert_eq!(panel.delay_feedback, 0.08);
        assert_eq!(panel.preset_name, Some("Bajo profundo"));
    }

    #[test]
    fn apply_preset_keeps_master_volume() {
        let mut panel = ControlPanel::default();
        panel.master_volume_db = -18.0;
        panel.apply_preset(preset::find("ambiente").expect("ambiente exists"));
        assert_eq!(panel.master_volume_db, -18.0);
    }

    #[test]
    fn panel_serializes_for_the_host() {
        let panel = ControlPanel::default();
        let json = serde_json::to_value(&panel).expect("serialize");
        assert_eq!(json["osc_type"], "triangle");
        assert_eq!(json["filter_cutoff"], 2000.0);
        assert_eq!(json["preset_name"], serde_json::Value::Null);
    }
}
