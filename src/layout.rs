//! Keyboard layout engine — decides which keys exist and what they play.
//!
//! A fixed 12-entry chromatic template drives two things: the list of
//! renderable key descriptors for the host UI (with the range-truncation
//! and relabeling rules for the second octave), and the physical
//! key-to-note lookup table used for computer-keyboard playback.

use std::collections::HashMap;

use serde::Serialize;

/// One entry of the chromatic note template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Default physical key bound to this pitch class in the base octave.
    pub input_key: char,
    /// Pitch class name, octave-independent (e.g. "C#").
    pub pitch_class: &'static str,
    /// Localized solfège label shown on the key.
    pub solfege: &'static str,
}

const fn entry(input_key: char, pitch_class: &'static str, solfege: &'static str) -> TemplateEntry {
    TemplateEntry {
        input_key,
        pitch_class,
        solfege,
    }
}

/// The 12 chromatic pitch classes in semitone order from C, each with
/// its home-row key binding and solfège name. Order is fixed and
/// significant: it is both the left-to-right visual order and the
/// reference order for the second-octave truncation rule.
pub const NOTE_TEMPLATE: [TemplateEntry; 12] = [
    entry('a', "C", "do"),
    entry('w', "C#", "do#"),
    entry('s', "D", "re"),
    entry('e', "D#", "re#"),
    entry('d', "E", "mi"),
    entry('f', "F", "fa"),
    entry('t', "F#", "fa#"),
    entry('g', "G", "sol"),
    entry('y', "G#", "sol#"),
    entry('h', "A", "la"),
    entry('u', "A#", "la#"),
    entry('j', "B", "si"),
];

/// Replacement key labels for the rendered second-octave notes
/// (C..E of `base_octave + 1`), matched positionally by template index.
pub const SECOND_OCTAVE_LABELS: [char; 5] = ['k', 'o', 'l', 'p', 'ñ'];

/// Octave number of the first rendered octave's C.
pub const BASE_OCTAVE: i32 = 4;

/// Octave-count bounds enforced by the session before layout rebuilds.
pub const MIN_OCTAVES: u32 = 1;
pub const MAX_OCTAVES: u32 = 2;

/// One visible keyboard key, ready for the host renderer.
///
/// The whole layout is discarded and rebuilt whenever the octave count
/// changes; keys are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedKey {
    /// Character shown on this key. Differs from the template's
    /// `input_key` only for relabeled second-octave keys.
    pub visual_label: char,
    /// Pitch class + absolute octave, e.g. "C#5".
    pub note_name: String,
    /// Solfège label, copied from the template entry.
    pub solfege: &'static str,
    /// True for sharp pitch classes (rendered as black keys).
    pub is_accidental: bool,
}

/// Lookup table from physical key to note name.
pub type KeyToNoteMap = HashMap<char, String>;

/// Build the ordered key list for `octave_count` octaves starting at
/// `base_octave`.
///
/// Range truncation: nothing renders above `base_octave + 1`, and in
/// octave `base_octave + 1` only pitch classes strictly before F render
/// (the keyboard deliberately stops at E of the second octave). The base
/// octave always renders in full.
///
/// `octave_count` is expected to be pre-clamped to
/// [`MIN_OCTAVES`, `MAX_OCTAVES`] by the caller; out-of-range values are
/// not rejected here, the truncation rules simply bound the output.
pub fn generate_layout(octave_count: u32, base_octave: i32) -> Vec<RenderedKey> {
    let f_position = NOTE_TEMPLATE
        .iter()
        .position(|e| e.pitch_class == "F")
        .unwrap_or(NOTE_TEMPLATE.len());

    let mut keys = Vec::new();
    for o in 0..octave_count {
        let octave_num = base_octave + o as i32;
        if octave_num > base_octave + 1 {
            continue;
        }
        for (idx, entry) in NOTE_TEMPLATE.iter().enumerate() {
            if octave_num == base_octave + 1 && idx >= f_position {
                continue;
            }
            let visual_label = if o == 1 && idx < SECOND_OCTAVE_LABELS.len() {
                SECOND_OCTAVE_LABELS[idx]
            } else {
                entry.input_key
            };
            keys.push(RenderedKey {
                visual_label,
                note_name: format!("{}{}", entry.pitch_class, octave_num),
                solfege: entry.solfege,
                is_accidental: entry.pitch_class.contains('#'),
            });
        }
    }
    keys
}

/// Build the physical key-to-note table for playback.
///
/// Seeds all 12 template bindings at `base_octave`, then adds the five
/// second-octave continuation keys (`k o l p ñ` → C..E of
/// `base_octave + 1`). Later inserts overwrite earlier ones; the
/// override labels are disjoint from the template bindings, so the
/// result always has 17 entries.
pub fn build_key_map(base_octave: i32) -> KeyToNoteMap {
    let mut map: KeyToNoteMap = NOTE_TEMPLATE
        .iter()
        .map(|e| (e.input_key, format!("{}{}", e.pitch_class, base_octave)))
        .collect();
    for (&label, entry) in SECOND_OCTAVE_LABELS.iter().zip(NOTE_TEMPLATE.iter()) {
        map.insert(label, format!("{}{}", entry.pitch_class, base_octave + 1));
    }
    map
}
