//! Note trigger dispatcher — turns press/release events into note-on/off.
//!
//! The dispatcher owns the key-to-note lookup table, the per-key held
//! state, and the start gate. It talks to the audio engine only through
//! the [`NoteSink`] trait, so it can be exercised in tests with a
//! recording fake instead of a real synth.

use std::collections::HashSet;

use crate::error::TecladoError;
use crate::layout::KeyToNoteMap;

/// Capability the dispatcher needs from the audio engine.
pub trait NoteSink {
    fn note_on(&mut self, note: &str);
    fn note_off(&mut self, note: &str);
}

/// One-time audio activation gate.
///
/// All dispatch is suppressed until the host reports a successful
/// activation. A failed activation latches the gate closed for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartGate {
    Pending,
    Started,
    Failed { reason: String },
}

/// Routes press/release events to a [`NoteSink`], debouncing repeats.
///
/// Two input paths share the active-note state: the physical path keyed
/// by input key (computer keyboard) and the pointer path keyed directly
/// by note name (mouse/touch on a rendered key).
#[derive(Debug)]
pub struct Dispatcher {
    key_map: KeyToNoteMap,
    held_keys: HashSet<char>,
    active_notes: HashSet<String>,
    gate: StartGate,
}

impl Dispatcher {
    pub fn new(key_map: KeyToNoteMap) -> Self {
        Dispatcher {
            key_map,
            held_keys: HashSet::new(),
            active_notes: HashSet::new(),
            gate: StartGate::Pending,
        }
    }

    /// Open the gate after the host's audio activation succeeded.
    /// Does nothing if activation already failed (fail-closed).
    pub fn start(&mut self) {
        if self.gate == StartGate::Pending {
            self.gate = StartGate::Started;
        }
    }

    /// Latch the gate closed after a failed audio activation and return
    /// the error for the host to display.
    pub fn fail_start(&mut self, reason: &str) -> TecladoError {
        self.gate = StartGate::Failed {
            reason: reason.to_string(),
        };
        TecladoError::AudioStart {
            reason: reason.to_string(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.gate == StartGate::Started
    }

    pub fn gate(&self) -> &StartGate {
        &self.gate
    }

    /// The key-to-note table, read-only.
    pub fn key_map(&self) -> &KeyToNoteMap {
        &self.key_map
    }

    /// Note names currently sounding, read-only. The host re-reads this
    /// after each event to refresh key highlighting.
    pub fn active_notes(&self) -> &HashSet<String> {
        &self.active_notes
    }

    /// Physical key press. Unknown keys and repeats while held are
    /// silent no-ops; at most one note-on per hold.
    pub fn press_key(&mut self, key: char, sink: &mut dyn NoteSink) {
        if !self.is_started() {
            return;
        }
        let Some(note) = self.key_map.get(&key) else {
            return;
        };
        if !self.held_keys.insert(key) {
            return;
        }
        sink.note_on(note);
        self.active_notes.insert(note.clone());
    }

    /// Physical key release. A no-op unless the key is actually held.
    pub fn release_key(&mut self, key: char, sink: &mut dyn NoteSink) {
        if !self.is_started() {
            return;
        }
        let Some(note) = self.key_map.get(&key) else {
            return;
        };
        if !self.held_keys.remove(&key) {
            return;
        }
        sink.note_off(note);
        self.active_notes.remove(note);
    }

    /// Pointer press on a rendered key, keyed by note name. Debounced
    /// against the shared active-note state.
    pub fn press_note(&mut self, note: &str, sink: &mut dyn NoteSink) {
        if !self.is_started() {
            return;
        }
        if self.active_notes.contains(note) {
            return;
        }
        sink.note_on(note);
        self.active_notes.insert(note.to_string());
    }

    /// Pointer release, keyed by note name.
    pub fn release_note(&mut self, note: &str, sink: &mut dyn NoteSink) {
        if !self.is_started() {
            return;
        }
        if !self.active_notes.remove(note) {
            return;
        }
        sink.note_off(note);
    }
}
