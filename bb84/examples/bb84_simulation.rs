//! Step-by-step exchange with an optional eavesdropper on the channel.
//!
//! cargo run --example bb84_simulation -- [--eve]

use bb84::prelude::*;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Step-by-step BB84 exchange")]
struct Args {
    /// Put an intercept-resend eavesdropper on the channel
    #[arg(long)]
    eve: bool,
}

fn describe(bits: &[bool]) -> String {
    bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::new(32, 8)?;
    let mut sender = Sender::new(config);
    let mut receiver = Receiver::new(config);
    let mut eve = args.eve.then(Eavesdropper::new);
    let mut channel = QuantumChannel::new();

    sender.generate_random_bits();
    sender.generate_random_basis();
    sender.calculate_polarizations()?;
    sender.send_photons_to_channel(&mut channel)?;

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

    println!("Sender bits:      {}", describe(sender.bits()));
    println!("Receiver bits:    {}", describe(receiver.measured_bits()));
    let sender_key = sender.shared_key().unwrap_or_default();
    let receiver_key = receiver.shared_key().unwrap_or_default();
    println!("Sender key:       {} ({} bits)", describe(sender_key), sender_key.len());
    println!("Receiver key:     {} ({} bits)", describe(receiver_key), receiver_key.len());
    if let Some(eve) = &eve {
        println!("Eavesdropper key: {}", describe(&eve.guessed_key()?));
    }
    println!("Keys agree: {}", sender_key == receiver_key);

    sender.decide()?;
    receiver.decide()?;
    sender.send_decision_to_channel(&mut channel)?;
    receiver.read_decision_from_channel(&channel)?;
    receiver.send_decision_to_channel(&mut channel)?;
    sender.read_decision_from_channel(&channel)?;

    println!(
        "Sender decided {:?} and saw {:?}; receiver decided {:?} and saw {:?}",
        sender.decision(),
        sender.other_decision(),
        receiver.decision(),
        receiver.other_decision()
    );
    Ok(())
}
