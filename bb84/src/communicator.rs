//! Behavior shared by both protocol roles.
//!
//! [`Communicator`] carries every operation the sender and the receiver have
//! in common as provided methods over a [`CommunicatorState`]. The roles only
//! say who they are and which bits they sift from.
//!
//! Operation order is not enforced. Calling a step early operates on
//! whatever state exists (deciding before sifting decides on the empty key
//! a fresh communicator starts with). Only structural problems fail.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::bb84_states::{MeasurementBasis, Polarization};
use crate::channel::{QuantumChannel, Role, Slot};
use crate::config::Config;
use crate::error::ValidationError;

/// State every communicator owns exclusively.
#[derive(Debug, Clone)]
pub struct CommunicatorState {
    pub(crate) config: Config,
    pub(crate) rng: ChaCha20Rng,
    pub(crate) random_basis: Vec<MeasurementBasis>,
    pub(crate) other_basis: Vec<MeasurementBasis>,
    pub(crate) photons: Vec<Polarization>,
    // `None` once the key has been moved out with `take_shared_key`.
    pub(crate) shared_key: Option<Vec<bool>>,
    pub(crate) decision: Option<bool>,
    pub(crate) other_decision: Option<bool>,
}

impl CommunicatorState {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, ChaCha20Rng::from_entropy())
    }

    /// Reproducible state: the same seed yields the same bases and bits.
    pub fn seeded(config: Config, seed: u64) -> Self {
        Self::with_rng(config, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: ChaCha20Rng) -> Self {
        Self {
            config,
            rng,
            random_basis: Vec::new(),
            other_basis: Vec::new(),
            photons: Vec::new(),
            shared_key: Some(Vec::new()),
            decision: None,
            other_decision: None,
        }
    }
}

/// Keeps `bits[i]` wherever `own[i] == other[i]`.
///
/// All three sequences must have the same length; there is no truncation.
pub fn sift(
    own: &[MeasurementBasis],
    other: &[MeasurementBasis],
    bits: &[bool],
) -> Result<Vec<bool>, ValidationError> {
    if other.len() != own.len() {
        return Err(ValidationError::LengthMismatch {
            context: "other party's basis",
            expected: own.len(),
            actual: other.len(),
        });
    }
    if bits.len() != own.len() {
        return Err(ValidationError::LengthMismatch {
            context: "key bits",
            expected: own.len(),
            actual: bits.len(),
        });
    }

    Ok(own
        .iter()
        .zip(other)
        .zip(bits)
        .filter(|((mine, theirs), _)| mine == theirs)
        .map(|(_, &bit)| bit)
        .collect())
}

pub trait Communicator {
    fn role(&self) -> Role;

    fn state(&self) -> &CommunicatorState;

    fn state_mut(&mut self) -> &mut CommunicatorState;

    /// Bits this party sifts its shared key from, index-aligned with its
    /// basis.
    fn key_bits(&self) -> &[bool];

    fn config(&self) -> &Config {
        &self.state().config
    }

    fn random_basis(&self) -> &[MeasurementBasis] {
        &self.state().random_basis
    }

    fn other_basis(&self) -> &[MeasurementBasis] {
        &self.state().other_basis
    }

    fn photons(&self) -> &[Polarization] {
        &self.state().photons
    }

    fn shared_key(&self) -> Option<&[bool]> {
        self.state().shared_key.as_deref()
    }

    /// Moves the shared key out. Deciding afterwards fails until a new key
    /// is derived.
    fn take_shared_key(&mut self) -> Option<Vec<bool>> {
        self.state_mut().shared_key.take()
    }

    fn decision(&self) -> Option<bool> {
        self.state().decision
    }

    fn other_decision(&self) -> Option<bool> {
        self.state().other_decision
    }

    fn is_valid_channel(&self, channel: &QuantumChannel) -> Result<(), ValidationError> {
        channel.validate()
    }

    fn generate_random_basis(&mut self) {
        let state = self.state_mut();
        let count = state.config.photons_size();
        let rng = &mut state.rng;
        state.random_basis = (0..count).map(|_| MeasurementBasis::random(rng)).collect();
        debug!("{:?} generated {} basis choices", self.role(), count);
    }

    fn read_basis_from_channel(&mut self, channel: &QuantumChannel) -> Result<(), ValidationError> {
        self.is_valid_channel(channel)?;
        let role = self.role();
        let basis = match channel.basis_used.envelope() {
            Some(envelope) => {
                if envelope.from == role {
                    warn!("{:?} is reading back its own basis from the channel", role);
                }
                envelope.payload.clone()
            }
            None => Vec::new(),
        };
        debug!("{:?} read {} basis choices from the channel", role, basis.len());
        self.state_mut().other_basis = basis;
        Ok(())
    }

    fn send_basis_to_channel(&self, channel: &mut QuantumChannel) -> Result<(), ValidationError> {
        self.is_valid_channel(channel)?;
        channel.basis_used = Slot::posted(self.role(), self.random_basis().to_vec());
        debug!("{:?} posted its basis to the channel", self.role());
        Ok(())
    }

    fn generate_shared_key(&mut self) -> Result<(), ValidationError> {
        let key = sift(self.random_basis(), self.other_basis(), self.key_bits())?;
        debug!(
            "{:?} sifted {} of {} positions",
            self.role(),
            key.len(),
            self.random_basis().len()
        );
        self.state_mut().shared_key = Some(key);
        Ok(())
    }

    /// Accepts the exchange when the shared key reaches the configured
    /// minimum length.
    fn decide(&mut self) -> Result<(), ValidationError> {
        let length = self
            .shared_key()
            .map(<[bool]>::len)
            .ok_or(ValidationError::InvalidSharedKey)?;
        let minimum = self.config().min_shared_key_length();
        let decision = length >= minimum;
        info!(
            "{:?} {} the exchange (key length {}, minimum {})",
            self.role(),
            if decision { "accepts" } else { "rejects" },
            length,
            minimum
        );
        self.state_mut().decision = Some(decision);
        Ok(())
    }

    fn send_decision_to_channel(&self, channel: &mut QuantumChannel) -> Result<(), ValidationError> {
        self.is_valid_channel(channel)?;
        channel.decision = match self.decision() {
            Some(decision) => Slot::posted(self.role(), decision),
            None => Slot::Empty,
        };
        Ok(())
    }

    fn read_decision_from_channel(&mut self, channel: &QuantumChannel) -> Result<(), ValidationError> {
        self.is_valid_channel(channel)?;
        let role = self.role();
        if channel.decision.envelope().is_some_and(|envelope| envelope.from == role) {
            warn!("{:?} is reading back its own decision from the channel", role);
        }
        self.state_mut().other_decision = channel.decision.payload().copied();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bb84_states::MeasurementBasis::{Diagonal, Rectilinear};

    #[test]
    fn test_sift_keeps_agreeing_positions() {
        let own = [Rectilinear, Diagonal, Diagonal, Rectilinear];
        let other = [Rectilinear, Rectilinear, Diagonal, Diagonal];
        let bits = [true, false, false, true];
        assert_eq!(sift(&own, &other, &bits), Ok(vec![true, false]));
    }

    #[test]
    fn test_sift_rejects_length_mismatch() {
        let own = [Rectilinear, Diagonal];
        assert_eq!(
            sift(&own, &[Rectilinear], &[true, true]),
            Err(ValidationError::LengthMismatch {
                context: "other party's basis",
                expected: 2,
                actual: 1,
            })
        );
        assert_eq!(
            sift(&own, &own, &[true]),
            Err(ValidationError::LengthMismatch {
                context: "key bits",
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_sift_of_empty_sequences_is_empty() {
        assert_eq!(sift(&[], &[], &[]), Ok(Vec::new()));
    }
}
