use log::{debug, warn};

use crate::bb84::measure_bb84_state;
use crate::channel::{QuantumChannel, Role};
use crate::communicator::{Communicator, CommunicatorState};
use crate::config::Config;
use crate::error::ValidationError;

/// Measures incoming photons in its own random basis.
#[derive(Debug, Clone)]
pub struct Receiver {
    state: CommunicatorState,
    measured_bits: Vec<bool>,
}

impl Receiver {
    pub fn new(config: Config) -> Self {
        Self::from_state(CommunicatorState::new(config))
    }

    pub fn seeded(config: Config, seed: u64) -> Self {
        Self::from_state(CommunicatorState::seeded(config, seed))
    }

    fn from_state(state: CommunicatorState) -> Self {
        Self {
            state,
            measured_bits: Vec::new(),
        }
    }

    pub fn measured_bits(&self) -> &[bool] {
        &self.measured_bits
    }

    /// Measures photon `i` in `random_basis[i]`. The photon count on the
    /// channel must equal the receiver's basis length.
    pub fn measure_photons_from_channel(&mut self, channel: &QuantumChannel) -> Result<(), ValidationError> {
        self.is_valid_channel(channel)?;
        let photons = match channel.photons.envelope() {
            Some(envelope) => {
                if envelope.from == Role::Receiver {
                    warn!("Receiver is measuring photons it posted itself");
                }
                envelope.payload.clone()
            }
            None => Vec::new(),
        };
        if photons.len() != self.state.random_basis.len() {
            return Err(ValidationError::LengthMismatch {
                context: "photons against basis",
                expected: self.state.random_basis.len(),
                actual: photons.len(),
            });
        }

        let rng = &mut self.state.rng;
        self.measured_bits = photons
            .iter()
            .zip(&self.state.random_basis)
            .map(|(&photon, &basis)| measure_bb84_state(photon, basis, rng))
            .collect();
        self.state.photons = photons;
        debug!("Receiver measured {} photons", self.measured_bits.len());
        Ok(())
    }
}

impl Communicator for Receiver {
    fn role(&self) -> Role {
        Role::Receiver
    }

    fn state(&self) -> &CommunicatorState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CommunicatorState {
        &mut self.state
    }

    fn key_bits(&self) -> &[bool] {
        &self.measured_bits
    }
}
