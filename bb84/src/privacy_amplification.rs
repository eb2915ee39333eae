use rand::Rng;
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Packs bits most-significant first; the last byte is zero padded.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; (bits.len() + 7) / 8];
    for (index, bit) in bits.iter().enumerate() {
        if *bit {
            bytes[index / 8] |= 1 << (7 - index % 8);
        }
    }
    bytes
}

/// Hashes a sifted key into 32 bytes, e.g. an AES-256 key.
///
/// The bit length is hashed too so that keys differing only in trailing
/// zeros do not collide.
pub fn derive_secret(key: &[bool]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update((key.len() as u64).to_be_bytes());
    hasher.update(bits_to_bytes(key));
    hasher.finalize().into()
}

/// Lowercase hex of [`derive_secret`], for logs.
pub fn secret_hex(key: &[bool]) -> String {
    hex::encode(derive_secret(key))
}

/// Binary Toeplitz matrix used as a two-universal hash.
///
/// Entry `(i, j)` is `diagonal[i + cols - 1 - j]`, so the whole matrix is
/// fixed by `rows + cols - 1` bits. Both parties must build it from the same
/// bits, which are public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToeplitzHash {
    rows: usize,
    cols: usize,
    diagonal: Vec<bool>,
}

impl ToeplitzHash {
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let diagonal = (0..(rows + cols).saturating_sub(1)).map(|_| rng.gen()).collect();
        Self { rows, cols, diagonal }
    }

    pub fn from_diagonal(rows: usize, cols: usize, diagonal: Vec<bool>) -> Result<Self, ValidationError> {
        let expected = (rows + cols).saturating_sub(1);
        if diagonal.len() != expected {
            return Err(ValidationError::LengthMismatch {
                context: "toeplitz diagonal",
                expected,
                actual: diagonal.len(),
            });
        }
        Ok(Self { rows, cols, diagonal })
    }

    pub fn output_len(&self) -> usize {
        self.rows
    }

    fn entry(&self, row: usize, col: usize) -> bool {
        self.diagonal[row + self.cols - 1 - col]
    }

    /// Compresses a key of exactly `cols` bits into `rows` bits.
    pub fn apply(&self, key: &[bool]) -> Result<Vec<bool>, ValidationError> {
        if key.len() != self.cols {
            return Err(ValidationError::LengthMismatch {
                context: "key against toeplitz columns",
                expected: self.cols,
                actual: key.len(),
            });
        }
        Ok((0..self.rows)
            .map(|row| {
                key.iter()
                    .enumerate()
                    .fold(false, |acc, (col, &bit)| acc ^ (bit & self.entry(row, col)))
            })
            .collect())
    }
}
