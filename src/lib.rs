pub mod controls;
pub mod dispatcher;
pub mod dsp;
pub mod error;
pub mod layout;
pub mod preset;
pub mod session;

use session::Session;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the teclado-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed keyboard instance.
///
/// The JS host owns the DOM and the AudioContext; this type owns
/// everything else. The host is expected to lowercase physical key
/// identifiers before passing them in (as with `event.key`), call
/// `start`/`audio_start_failed` exactly once after the splash gesture,
/// and pull audio blocks from `render` inside its AudioWorklet.
#[wasm_bindgen]
pub struct WebKeyboard {
    session: Session,
}

#[wasm_bindgen]
impl WebKeyboard {
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: f32) -> WebKeyboard {
        WebKeyboard {
            session: Session::new(sample_rate),
        }
    }

    /// Open the start gate after a successful audio activation.
    pub fn start(&mut self) {
        self.session.start();
    }

    /// Latch the gate closed after a failed activation; returns the
    /// message to show the user.
    pub fn audio_start_failed(&mut self, reason: &str) -> String {
        self.session.fail_start(reason).to_string()
    }

    pub fn is_started(&self) -> bool {
        self.session.is_started()
    }

    /// Set the octave count (clamped to [1, 2]) and rebuild the layout.
    pub fn set_octaves(&mut self, count: i32) {
        self.session.set_octave_count(count);
    }

    /// The rendered key list for the host to draw, in order.
    pub fn layout(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.keys())
    }

    /// The physical key-to-note table.
    pub fn key_map(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.key_map())
    }

    /// Note names currently sounding, for key highlighting.
    pub fn active_notes(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.active_notes())
    }

    /// The built-in preset table, for building the selector.
    pub fn presets(&self) -> Result<JsValue, JsValue> {
        to_js(&preset::PRESETS)
    }

    /// Current control panel values.
    pub fn controls(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.controls())
    }

    /// Physical key press. `key` must be a single character; anything
    /// else (named keys like "Shift") is ignored.
    pub fn press_key(&mut self, key: &str) {
        if let Some(k) = single_char(key) {
            self.session.press_key(k);
        }
    }

    pub fn release_key(&mut self, key: &str) {
        if let Some(k) = single_char(key) {
            self.session.release_key(k);
        }
    }

    /// Pointer press on a rendered key, by note name.
    pub fn press_note(&mut self, note: &str) {
        self.session.press_note(note);
    }

    pub fn release_note(&mut self, note: &str) {
        self.session.release_note(note);
    }

    /// Apply a preset by id; true if it exists and was applied.
    pub fn apply_preset(&mut self, id: &str) -> bool {
        self.session.apply_preset(id)
    }

    pub fn set_osc_type(&mut self, name: &str) {
        self.session.set_osc_type(name);
    }

    pub fn set_envelope(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.session.set_envelope(attack, decay, sustain, release);
    }

    pub fn set_filter_cutoff(&mut self, cutoff: f32) {
        self.session.set_filter_cutoff(cutoff);
    }

    pub fn set_delay_time(&mut self, seconds: f32) {
        self.session.set_delay_time(seconds);
    }

    pub fn set_delay_feedback(&mut self, feedback: f32) {
        self.session.set_delay_feedback(feedback);
    }

    pub fn set_reverb_wet(&mut self, wet: f32) {
        self.session.set_reverb_wet(wet);
    }

    pub fn set_master_volume(&mut self, db: f32) {
        self.session.set_master_volume_db(db);
    }

    /// Render `frames` stereo frames as interleaved f32 samples for the
    /// AudioWorklet host.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        self.session.render(&mut left, &mut right);

        let mut interleaved = Vec::with_capacity(frames * 2);
        for (l, r) in left.into_iter().zip(right) {
            interleaved.push(l);
            interleaved.push(r);
        }
        interleaved
    }
}

/// The sole character of `s`, or None for empty/multi-char input.
fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_exposed() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn single_char_filters_named_keys() {
        assert_eq!(single_char("a"), Some('a'));
        assert_eq!(single_char("ñ"), Some('ñ'));
        assert_eq!(single_char("Shift"), None);
        assert_eq!(single_char(""), None);
    }
}
