//! One complete exchange between a sender and a receiver.
//!
//! The order of calls here is the only thing that keeps the protocol
//! correct. The communicators themselves accept calls in any order.

use log::{debug, info};

use crate::channel::QuantumChannel;
use crate::communicator::Communicator;
use crate::config::Config;
use crate::eavesdropper::Eavesdropper;
use crate::error::ValidationError;
use crate::receiver::Receiver;
use crate::sender::Sender;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Put an intercept-resend attacker on the channel.
    pub eavesdrop: bool,
    /// Seed every party from this value instead of from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeReport {
    pub photons_sent: usize,
    pub sender_key: Vec<bool>,
    pub receiver_key: Vec<bool>,
    pub sender_decision: bool,
    pub receiver_decision: bool,
    /// Decision each side read from the other over the channel.
    pub sender_saw: Option<bool>,
    pub receiver_saw: Option<bool>,
    pub eavesdropper_key: Option<Vec<bool>>,
}

impl ExchangeReport {
    pub fn keys_agree(&self) -> bool {
        self.sender_key == self.receiver_key
    }

    /// Both sides accepted and each knows the other did.
    pub fn accepted(&self) -> bool {
        self.sender_decision
            && self.receiver_decision
            && self.sender_saw == Some(true)
            && self.receiver_saw == Some(true)
    }

    /// Positions where the two sifted keys differ.
    pub fn mismatches(&self) -> usize {
        self.sender_key
            .iter()
            .zip(&self.receiver_key)
            .filter(|(a, b)| a != b)
            .count()
    }
}

fn parties(config: Config, options: &SessionOptions) -> (Sender, Receiver, Option<Eavesdropper>) {
    match options.seed {
        Some(seed) => (
            Sender::seeded(config, seed),
            Receiver::seeded(config, seed.wrapping_add(1)),
            options
                .eavesdrop
                .then(|| Eavesdropper::seeded(seed.wrapping_add(2))),
        ),
        None => (
            Sender::new(config),
            Receiver::new(config),
            options.eavesdrop.then(Eavesdropper::new),
        ),
    }
}

pub fn run_exchange(config: &Config, options: &SessionOptions) -> Result<ExchangeReport, ValidationError> {
    let (mut sender, mut receiver, mut eve) = parties(*config, options);
    let mut channel = QuantumChannel::new();

    sender.generate_random_bits();
    sender.generate_random_basis();
    sender.calculate_polarizations()?;
    sender.send_photons_to_channel(&mut channel)?;
    debug!("photons on the channel");

    if let Some(eve) = eve.as_mut() {
        eve.intercept_photons_from_channel(&mut channel)?;
    }

    receiver.generate_random_basis();
    receiver.measure_photons_from_channel(&channel)?;

    sender.send_basis_to_channel(&mut channel)?;
    if let Some(eve) = eve.as_mut() {
        eve.intercept_sender_basis_from_channel(&channel)?;
    }
    receiver.read_basis_from_channel(&channel)?;

    receiver.send_basis_to_channel(&mut channel)?;
    if let Some(eve) = eve.as_mut() {
        eve.intercept_receiver_basis_from_channel(&channel)?;
    }
    sender.read_basis_from_channel(&channel)?;

    receiver.generate_shared_key()?;
    sender.generate_shared_key()?;

    sender.decide()?;
    receiver.decide()?;

    sender.send_decision_to_channel(&mut channel)?;
    receiver.read_decision_from_channel(&channel)?;

    receiver.send_decision_to_channel(&mut channel)?;
    sender.read_decision_from_channel(&channel)?;

    let report = ExchangeReport {
        photons_sent: sender.polarizations().len(),
        sender_key: sender.take_shared_key().unwrap_or_default(),
        receiver_key: receiver.take_shared_key().unwrap_or_default(),
        sender_decision: sender.decision().unwrap_or(false),
        receiver_decision: receiver.decision().unwrap_or(false),
        sender_saw: sender.other_decision(),
        receiver_saw: receiver.other_decision(),
        eavesdropper_key: eve.map(|eve| eve.guessed_key()).transpose()?,
    };
    info!(
        "exchange finished: {} photons, key lengths {}/{}, accepted: {}",
        report.photons_sent,
        report.sender_key.len(),
        report.receiver_key.len(),
        report.accepted()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_exchange_is_reproducible() {
        let config = Config::default();
        let options = SessionOptions {
            eavesdrop: false,
            seed: Some(42),
        };
        let first = run_exchange(&config, &options).unwrap();
        let second = run_exchange(&config, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clean_exchange_agrees() {
        let config = Config::new(400, 100).unwrap();
        let report = run_exchange(&config, &SessionOptions::default()).unwrap();
        assert!(report.keys_agree());
        assert_eq!(report.mismatches(), 0);
        assert_eq!(report.photons_sent, 400);
        assert!(report.eavesdropper_key.is_none());
        // 400 positions, about 200 kept; 100 is ten standard deviations away.
        assert!(report.accepted());
    }

    #[test]
    fn test_eavesdropper_learns_a_key_of_the_same_length() {
        let config = Config::default();
        let options = SessionOptions {
            eavesdrop: true,
            seed: Some(7),
        };
        let report = run_exchange(&config, &options).unwrap();
        let eve_key = report.eavesdropper_key.clone().unwrap();
        assert_eq!(eve_key.len(), report.sender_key.len());
    }
}
