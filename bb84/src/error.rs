use std::fmt;

use thiserror::Error;

/// One of the three structurally required fields of a [`QuantumChannel`].
///
/// [`QuantumChannel`]: crate::channel::QuantumChannel
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelField {
    BasisUsed,
    Photons,
    Decision,
}

impl fmt::Display for ChannelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelField::BasisUsed => "BasisUsed",
            ChannelField::Photons => "Photons",
            ChannelField::Decision => "Decision",
        };
        f.write_str(name)
    }
}

/// The single error kind raised by protocol operations.
///
/// A failed operation never mutates the communicator or the channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid channel: missing field {0}")]
    MissingChannelField(ChannelField),

    #[error("shared key is not available (derive it before deciding)")]
    InvalidSharedKey,

    #[error("length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("photon count must be positive")]
    ZeroPhotons,

    #[error("minimum shared key length must be positive")]
    ZeroMinKeyLength,

    #[error("minimum shared key length {min} exceeds photon count {photons}")]
    UnreachableThreshold { min: usize, photons: usize },
}
