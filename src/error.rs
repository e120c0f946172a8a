use std::fmt;

/// Errors surfaced to the host. The core deliberately has very few:
/// unknown keys, unknown presets, and unparseable note names are silent
/// no-ops, so the only reportable failure is audio activation being
/// denied by the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TecladoError {
    /// The host's audio-context activation step failed or was denied.
    /// Once raised, the start gate latches closed and no further note
    /// dispatch is possible.
    AudioStart { reason: String },
}

impl fmt::Display for TecladoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TecladoError::AudioStart { reason } => {
                write!(f, "audio could not start: {reason}")
            }
        }
    }
}

impl std::error::Error for TecladoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_start_message() {
        let err = TecladoError::AudioStart {
            reason: "user gesture required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "audio could not start: user gesture required"
        );
    }
}
