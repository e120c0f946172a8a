//! Session — one keyboard instance: layout, dispatcher, controls, synth.
//!
//! This is the surface the host talks to. Every control edit updates the
//! panel mirror and the synth together; preset application does both for
//! all nine values in a single call.

use std::collections::HashSet;

use crate::controls::ControlPanel;
use crate::dispatcher::Dispatcher;
use crate::dsp::oscillator::Waveform;
use crate::dsp::synth::PolySynth;
use crate::error::TecladoError;
use crate::layout::{
    self, KeyToNoteMap, RenderedKey, BASE_OCTAVE, MAX_OCTAVES, MIN_OCTAVES,
};
use crate::preset;

/// A complete keyboard session. Multiple independent sessions can
/// coexist; nothing here is global.
#[derive(Debug)]
pub struct Session {
    base_octave: i32,
    octave_count: u32,
    keys: Vec<RenderedKey>,
    dispatcher: Dispatcher,
    controls: ControlPanel,
    synth: PolySynth,
}

impl Session {
    pub fn new(sample_rate: f32) -> Self {
        let controls = ControlPanel::default();
        let mut synth = PolySynth::new(sample_rate);
        push_controls(&controls, &mut synth);

        Session {
            base_octave: BASE_OCTAVE,
            octave_count: MAX_OCTAVES,
            keys: layout::generate_layout(MAX_OCTAVES, BASE_OCTAVE),
            dispatcher: Dispatcher::new(layout::build_key_map(BASE_OCTAVE)),
            controls,
            synth,
        }
    }

    // ── Layout ──────────────────────────────────────────────

    /// Change the octave count and rebuild the layout from scratch.
    /// Values outside [1, 2] are clamped here, before the generator
    /// ever sees them.
    pub fn set_octave_count(&mut self, count: i32) {
        let clamped = count.clamp(MIN_OCTAVES as i32, MAX_OCTAVES as i32) as u32;
        self.octave_count = clamped;
        self.keys = layout::generate_layout(clamped, self.base_octave);
    }

    pub fn octave_count(&self) -> u32 {
        self.octave_count
    }

    /// The rendered keys, read-only, in visual left-to-right order.
    pub fn keys(&self) -> &[RenderedKey] {
        &self.keys
    }

    /// The physical key-to-note table, read-only. Built once at
    /// construction; octave changes do not alter it.
    pub fn key_map(&self) -> &KeyToNoteMap {
        self.dispatcher.key_map()
    }

    // ── Start gate ──────────────────────────────────────────

    /// Report successful audio activation; opens note dispatch.
    pub fn start(&mut self) {
        self.dispatcher.start();
    }

    /// Report failed audio activation; latches dispatch closed and
    /// returns the error to show the user.
    pub fn fail_start(&mut self, reason: &str) -> TecladoError {
        self.dispatcher.fail_start(reason)
    }

    pub fn is_started(&self) -> bool {
        self.dispatcher.is_started()
    }

    // ── Note dispatch ───────────────────────────────────────

    pub fn press_key(&mut self, key: char) {
        self.dispatcher.press_key(key, &mut self.synth);
    }

    pub fn release_key(&mut self, key: char) {
        self.dispatcher.release_key(key, &mut self.synth);
    }

    pub fn press_note(&mut self, note: &str) {
        self.dispatcher.press_note(note, &mut self.synth);
    }

    pub fn release_note(&mut self, note: &str) {
        self.dispatcher.release_note(note, &mut self.synth);
    }

    /// Notes currently sounding, for key highlighting.
    pub fn active_notes(&self) -> &HashSet<String> {
        self.dispatcher.active_notes()
    }

    // ── Controls & presets ──────────────────────────────────

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    /// Apply a named preset: overwrite the control panel and push every
    /// parameter into the synth in the same call. Returns false (and
    /// changes nothing) for unknown ids.
    pub fn apply_preset(&mut self, id: &str) -> bool {
        let Some(preset) = preset::find(id) else {
            return false;
        };
        self.controls.apply_preset(preset);
        push_controls(&self.controls, &mut self.synth);
        true
    }

    /// Oscillator-type control. Unknown names are ignored.
    pub fn set_osc_type(&mut self, name: &str) {
        let Some(waveform) = Waveform::from_name(name) else {
            return;
        };
        self.controls.osc_type = waveform;
        self.synth.set_waveform(waveform);
    }

    pub fn set_envelope(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.controls.attack = attack;
        self.controls.decay = decay;
        self.controls.sustain = sustain;
        self.controls.release = release;
        self.synth.set_envelope(attack, decay, sustain, release);
    }

    pub fn set_filter_cutoff(&mut self, cutoff: f32) {
        self.controls.filter_cutoff = cutoff;
        self.synth.set_filter_cutoff(cutoff);
    }

    pub fn set_delay_time(&mut self, seconds: f32) {
        self.controls.delay_time = seconds;
        self.synth.set_delay_time(seconds);
    }

    pub fn set_delay_feedback(&mut self, feedback: f32) {
        self.controls.delay_feedback = feedback;
        self.synth.set_delay_feedback(feedback);
    }

    pub fn set_reverb_wet(&mut self, wet: f32) {
        self.controls.reverb_wet = wet;
        self.synth.set_reverb_wet(wet);
    }

    pub fn set_master_volume_db(&mut self, db: f32) {
        self.controls.master_volume_db = db;
        self.synth.set_master_volume_db(db);
    }

    // ── Audio ───────────────────────────────────────────────

    /// Render the next stereo block.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.synth.render(left, right);
    }

    #[cfg(test)]
    pub(crate) fn synth(&self) -> &PolySynth {
        &self.synth
    }
}

/// Push every panel value into the synth.
fn push_controls(controls: &ControlPanel, synth: &mut PolySynth) {
    synth.set_waveform(controls.osc_type);
    synth.set_envelope(
        controls.attack,
        controls.decay,
        controls.sustain,
        controls.release,
    );
    synth.set_filter_cutoff(controls.filter_cutoff);
    synth.set_delay_time(controls.delay_time);
    synth.set_delay_feedback(controls.delay_feedback);
    synth.set_reverb_wet(controls.reverb_wet);
    synth.set_master_volume_db(controls.master_volume_db);
}
