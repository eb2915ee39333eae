//! The shared channel both parties post to.
//!
//! Every field is a [`Slot`]: absent (the channel is malformed), empty, or
//! holding the latest immutable [`Envelope`]. A send replaces the envelope,
//! a read clones its payload. The channel never validates itself; consumers
//! call [`QuantumChannel::validate`] before touching it.

use crate::bb84_states::{MeasurementBasis, Polarization};
use crate::error::{ChannelField, ValidationError};

/// Which party wrote an envelope.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    Sender,
    Receiver,
    Eavesdropper,
}

/// Immutable snapshot posted by one party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T> {
    pub from: Role,
    pub payload: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    /// The field does not exist on this channel.
    Absent,
    Empty,
    Posted(Envelope<T>),
}

impl<T> Slot<T> {
    pub fn posted(from: Role, payload: T) -> Self {
        Slot::Posted(Envelope { from, payload })
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Slot::Absent)
    }

    pub fn envelope(&self) -> Option<&Envelope<T>> {
        match self {
            Slot::Posted(envelope) => Some(envelope),
            Slot::Absent | Slot::Empty => None,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        self.envelope().map(|envelope| &envelope.payload)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantumChannel {
    pub basis_used: Slot<Vec<MeasurementBasis>>,
    pub photons: Slot<Vec<Polarization>>,
    pub decision: Slot<bool>,
}

impl QuantumChannel {
    /// A well-formed channel with nothing posted yet.
    pub fn new() -> Self {
        Self {
            basis_used: Slot::Empty,
            photons: Slot::Empty,
            decision: Slot::Empty,
        }
    }

    /// A channel with none of the required fields. Only useful as a
    /// starting point for building malformed channels.
    pub fn bare() -> Self {
        Self {
            basis_used: Slot::Absent,
            photons: Slot::Absent,
            decision: Slot::Absent,
        }
    }

    /// Checks that all three fields are present, whatever they hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.basis_used.is_present() {
            return Err(ValidationError::MissingChannelField(ChannelField::BasisUsed));
        }
        if !self.photons.is_present() {
            return Err(ValidationError::MissingChannelField(ChannelField::Photons));
        }
        if !self.decision.is_present() {
            return Err(ValidationError::MissingChannelField(ChannelField::Decision));
        }
        Ok(())
    }
}

impl Default for QuantumChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_channel_is_valid_and_empty() {
        let channel = QuantumChannel::new();
        assert_eq!(channel.validate(), Ok(()));
        assert_eq!(channel.basis_used.payload(), None);
        assert_eq!(channel.photons.payload(), None);
        assert_eq!(channel.decision.payload(), None);
    }

    #[test]
    fn test_bare_channel_reports_first_missing_field() {
        let mut channel = QuantumChannel::bare();
        assert_eq!(
            channel.validate(),
            Err(ValidationError::MissingChannelField(ChannelField::BasisUsed))
        );

        channel.basis_used = Slot::Empty;
        channel.photons = Slot::posted(Role::Sender, Vec::new());
        assert_eq!(
            channel.validate(),
            Err(ValidationError::MissingChannelField(ChannelField::Decision))
        );
    }

    #[test]
    fn test_posting_replaces_previous_envelope() {
        let mut channel = QuantumChannel::new();
        channel.decision = Slot::posted(Role::Sender, true);
        channel.decision = Slot::posted(Role::Receiver, false);

        let envelope = channel.decision.envelope().cloned();
        assert_eq!(
            envelope,
            Some(Envelope {
                from: Role::Receiver,
                payload: false
            })
        );
    }
}
