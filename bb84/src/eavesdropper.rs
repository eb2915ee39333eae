//! Intercept-resend attacker.
//!
//! Eve sits between the parties on the same channel. She measures every
//! photon in a basis of her own choosing and re-sends what she saw, then
//! copies both public basis announcements. Wherever her basis differed from
//! the sender's, the photon she forwards is prepared in the wrong basis and
//! the receiver's bit is a coin flip, which is how interception leaves
//! errors in the sifted key.

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::bb84::{generate_bb84_state, measure_bb84_state};
use crate::bb84_states::{MeasurementBasis, Polarization};
use crate::channel::{QuantumChannel, Role, Slot};
use crate::communicator::sift;
use crate::error::ValidationError;

#[derive(Debug, Clone)]
pub struct Eavesdropper {
    rng: ChaCha20Rng,
    basis: Vec<MeasurementBasis>,
    bits: Vec<bool>,
    sender_basis: Vec<MeasurementBasis>,
    receiver_basis: Vec<MeasurementBasis>,
}

impl Eavesdropper {
    pub fn new() -> Self {
        Self::with_rng(ChaCha20Rng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha20Rng) -> Self {
        Self {
            rng,
            basis: Vec::new(),
            bits: Vec::new(),
            sender_basis: Vec::new(),
            receiver_basis: Vec::new(),
        }
    }

    pub fn basis(&self) -> &[MeasurementBasis] {
        &self.basis
    }

    pub fn intercepted_bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn sender_basis(&self) -> &[MeasurementBasis] {
        &self.sender_basis
    }

    pub fn receiver_basis(&self) -> &[MeasurementBasis] {
        &self.receiver_basis
    }

    pub fn intercept_photons_from_channel(&mut self, channel: &mut QuantumChannel) -> Result<(), ValidationError> {
        channel.validate()?;
        // Nothing in flight: there is no sender post to replace.
        let Some(photons) = channel.photons.payload().cloned() else {
            self.basis.clear();
            self.bits.clear();
            return Ok(());
        };

        let rng = &mut self.rng;
        let basis: Vec<MeasurementBasis> = photons.iter().map(|_| MeasurementBasis::random(rng)).collect();
        let bits: Vec<bool> = photons
            .iter()
            .zip(&basis)
            .map(|(&photon, &basis)| measure_bb84_state(photon, basis, rng))
            .collect();
        let resent: Vec<Polarization> = bits
            .iter()
            .zip(&basis)
            .map(|(&bit, &basis)| generate_bb84_state(bit, basis))
            .collect();

        channel.photons = Slot::posted(Role::Eavesdropper, resent);
        debug!("Eavesdropper intercepted and re-sent {} photons", bits.len());
        self.basis = basis;
        self.bits = bits;
        Ok(())
    }

    pub fn intercept_sender_basis_from_channel(&mut self, channel: &QuantumChannel) -> Result<(), ValidationError> {
        channel.validate()?;
        self.sender_basis = channel.basis_used.payload().cloned().unwrap_or_default();
        Ok(())
    }

    pub fn intercept_receiver_basis_from_channel(&mut self, channel: &QuantumChannel) -> Result<(), ValidationError> {
        channel.validate()?;
        self.receiver_basis = channel.basis_used.payload().cloned().unwrap_or_default();
        Ok(())
    }

    /// Eve's bits at the positions the parties will keep.
    pub fn guessed_key(&self) -> Result<Vec<bool>, ValidationError> {
        sift(&self.sender_basis, &self.receiver_basis, &self.bits)
    }
}

impl Default for Eavesdropper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelField;

    #[test]
    fn test_intercept_replaces_photons_and_stamps_itself() {
        let mut eve = Eavesdropper::seeded(5);
        let mut channel = QuantumChannel::new();
        channel.photons = Slot::posted(Role::Sender, vec![Polarization::Horizontal; 8]);

        eve.intercept_photons_from_channel(&mut channel).unwrap();

        let envelope = channel.photons.envelope().unwrap();
        assert_eq!(envelope.from, Role::Eavesdropper);
        assert_eq!(envelope.payload.len(), 8);
        assert_eq!(eve.intercepted_bits().len(), 8);
        // Whatever Eve measured, she re-sends it in her own basis.
        for ((&photon, &basis), &bit) in envelope.payload.iter().zip(eve.basis()).zip(eve.intercepted_bits()) {
            assert_eq!(photon, generate_bb84_state(bit, basis));
        }
    }

    #[test]
    fn test_intercept_on_invalid_channel_changes_nothing() {
        let mut eve = Eavesdropper::seeded(5);
        let mut channel = QuantumChannel::bare();
        channel.photons = Slot::posted(Role::Sender, vec![Polarization::Vertical]);
        let before = channel.clone();

        assert!(eve.intercept_photons_from_channel(&mut channel).is_err());
        assert_eq!(channel, before);
        assert!(eve.intercepted_bits().is_empty());
    }

    #[test]
    fn test_intercept_with_no_photons_leaves_slot_empty() {
        let mut eve = Eavesdropper::seeded(5);
        let mut channel = QuantumChannel::new();

        eve.intercept_photons_from_channel(&mut channel).unwrap();

        assert_eq!(channel.photons, Slot::Empty);
        assert!(eve.basis().is_empty());
        assert!(eve.intercepted_bits().is_empty());
    }

    #[test]
    fn test_basis_intercepts_reject_invalid_channel() {
        let mut eve = Eavesdropper::seeded(5);
        let mut channel = QuantumChannel::bare();
        channel.basis_used = Slot::posted(Role::Sender, vec![MeasurementBasis::Diagonal; 4]);

        assert_eq!(
            eve.intercept_sender_basis_from_channel(&channel),
            Err(ValidationError::MissingChannelField(ChannelField::Photons))
        );
        assert_eq!(
            eve.intercept_receiver_basis_from_channel(&channel),
            Err(ValidationError::MissingChannelField(ChannelField::Photons))
        );
        assert!(eve.sender_basis().is_empty());
        assert!(eve.receiver_basis().is_empty());
    }

    #[test]
    fn test_basis_intercepts_copy_the_posted_announcement() {
        let mut eve = Eavesdropper::seeded(5);
        let mut channel = QuantumChannel::new();
        let sender_basis = vec![
            MeasurementBasis::Rectilinear,
            MeasurementBasis::Diagonal,
            MeasurementBasis::Diagonal,
        ];
        let receiver_basis = vec![
            MeasurementBasis::Diagonal,
            MeasurementBasis::Diagonal,
            MeasurementBasis::Rectilinear,
        ];

        channel.basis_used = Slot::posted(Role::Sender, sender_basis.clone());
        eve.intercept_sender_basis_from_channel(&channel).unwrap();
        channel.basis_used = Slot::posted(Role::Receiver, receiver_basis.clone());
        eve.intercept_receiver_basis_from_channel(&channel).unwrap();

        assert_eq!(eve.sender_basis(), sender_basis.as_slice());
        assert_eq!(eve.receiver_basis(), receiver_basis.as_slice());
        // Reading leaves the announcement in place for the other party.
        assert_eq!(channel.basis_used.payload(), Some(&receiver_basis));
    }

    #[test]
    fn test_guessed_key_uses_announced_bases() {
        let mut eve = Eavesdropper::seeded(5);
        eve.bits = vec![true, false, true];
        eve.sender_basis = vec![
            MeasurementBasis::Rectilinear,
            MeasurementBasis::Diagonal,
            MeasurementBasis::Diagonal,
        ];
        eve.receiver_basis = vec![
            MeasurementBasis::Rectilinear,
            MeasurementBasis::Rectilinear,
            MeasurementBasis::Diagonal,
        ];
        assert_eq!(eve.guessed_key(), Ok(vec![true, true]));
    }
}
