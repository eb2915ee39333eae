use log::debug;

use crate::bb84::generate_bb84_state;
use crate::bb84_states::{random_bit, Polarization};
use crate::channel::{QuantumChannel, Role, Slot};
use crate::communicator::{Communicator, CommunicatorState};
use crate::config::Config;
use crate::error::ValidationError;

/// Prepares random bits, encodes them as photons and transmits them.
#[derive(Debug, Clone)]
pub struct Sender {
    state: CommunicatorState,
    bits: Vec<bool>,
}

impl Sender {
    pub fn new(config: Config) -> Self {
        Self::from_state(CommunicatorState::new(config))
    }

    pub fn seeded(config: Config, seed: u64) -> Self {
        Self::from_state(CommunicatorState::seeded(config, seed))
    }

    fn from_state(state: CommunicatorState) -> Self {
        Self {
            state,
            bits: Vec::new(),
        }
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn polarizations(&self) -> &[Polarization] {
        &self.state.photons
    }

    pub fn generate_random_bits(&mut self) {
        let count = self.state.config.photons_size();
        let rng = &mut self.state.rng;
        self.bits = (0..count).map(|_| random_bit(rng)).collect();
    }

    /// Encodes each `(bit, basis)` pair. Bits and basis must be generated
    /// first and have the same length.
    pub fn calculate_polarizations(&mut self) -> Result<(), ValidationError> {
        if self.bits.len() != self.state.random_basis.len() {
            return Err(ValidationError::LengthMismatch {
                context: "bits against basis",
                expected: self.state.random_basis.len(),
                actual: self.bits.len(),
            });
        }
        self.state.photons = self
            .bits
            .iter()
            .zip(&self.state.random_basis)
            .map(|(&bit, &basis)| generate_bb84_state(bit, basis))
            .collect();
        Ok(())
    }

    pub fn send_photons_to_channel(&self, channel: &mut QuantumChannel) -> Result<(), ValidationError> {
        self.is_valid_channel(channel)?;
        channel.photons = Slot::posted(Role::Sender, self.state.photons.clone());
        debug!("Sender transmitted {} photons", self.state.photons.len());
        Ok(())
    }
}

impl Communicator for Sender {
    fn role(&self) -> Role {
        Role::Sender
    }

    fn state(&self) -> &CommunicatorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CommunicatorState {
        &mut self.state
    }

    fn key_bits(&self) -> &[bool] {
        &self.bits
    }
}
