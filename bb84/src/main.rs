use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use bb84::config::{Config, MIN_SHARED_KEY_LENGTH, PHOTONS_SIZE};
use bb84::privacy_amplification::secret_hex;
use bb84::session::{run_exchange, SessionOptions};

/// Run one BB84 exchange between a sender and a receiver.
#[derive(Parser, Debug)]
#[command(name = "bb84", version)]
struct Args {
    /// Photons the sender prepares.
    #[arg(long, env = "BB84_PHOTONS_SIZE", default_value_t = PHOTONS_SIZE)]
    photons: usize,

    /// Shortest sifted key either party accepts.
    #[arg(long, env = "BB84_MIN_SHARED_KEY_LENGTH", default_value_t = MIN_SHARED_KEY_LENGTH)]
    min_key_length: usize,

    /// Insert an intercept-resend eavesdropper on the channel.
    #[arg(long)]
    eavesdrop: bool,

    /// Seed all parties for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::new(args.photons, args.min_key_length)?;
    let options = SessionOptions {
        eavesdrop: args.eavesdrop,
        seed: args.seed,
    };

    let report = run_exchange(&config, &options)?;
    info!("sender key length: {}", report.sender_key.len());
    info!("receiver key length: {}", report.receiver_key.len());
    if let Some(eve_key) = &report.eavesdropper_key {
        warn!(
            "eavesdropper holds {} sifted bits; {} of {} key positions disagree between the parties",
            eve_key.len(),
            report.mismatches(),
            report.sender_key.len()
        );
    }

    if report.accepted() {
        info!("exchange accepted, secret {}", secret_hex(&report.sender_key));
    } else {
        error!(
            "exchange rejected (sender: {}, receiver: {})",
            report.sender_decision, report.receiver_decision
        );
    }
    Ok(())
}
