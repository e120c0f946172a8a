//! DSP — pure Rust audio synthesis for the keyboard.
//!
//! The same code runs under WebAudio (AudioWorklet + WASM) and in native
//! tests; nothing here touches an audio device or the DOM.

pub mod delay;
pub mod envelope;
pub mod filter;
pub mod oscillator;
pub mod reverb;
pub mod synth;
pub mod voice;
