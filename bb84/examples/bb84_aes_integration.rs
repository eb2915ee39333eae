use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use bb84::config::Config;
use bb84::privacy_amplification::{derive_secret, ToeplitzHash};
use bb84::session::{run_exchange, SessionOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut rng = OsRng;

    let config = Config::new(512, 128)?;
    let report = run_exchange(&config, &SessionOptions::default())?;
    if !report.accepted() {
        return Err("exchange rejected, no key to use".into());
    }

    // Public Toeplitz seed: both sides build the same matrix.
    let length = report.sender_key.len();
    let hash = ToeplitzHash::random(length / 2, length, &mut rng);
    let sender_secret = derive_secret(&hash.apply(&report.sender_key)?);
    let receiver_secret = derive_secret(&hash.apply(&report.receiver_key)?);

    let mut nonce = [0u8; 12];
    rng.fill_bytes(&mut nonce);
    let nonce = Nonce::from_slice(&nonce);

    let message = b"Your secret message";
    let encrypted_message = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&sender_secret))
        .encrypt(nonce, message.as_ref())
        .map_err(|_| "encryption failure")?;
    let decrypted_message = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&receiver_secret))
        .decrypt(nonce, encrypted_message.as_ref())
        .map_err(|_| "decryption failure")?;

    assert_eq!(message, &decrypted_message[..]);
    println!(
        "Success! {} sifted bits, {} after amplification; the receiver decrypted the sender's message.",
        length,
        hash.output_len()
    );
    Ok(())
}
