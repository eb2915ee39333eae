use rand::Rng;

use crate::bb84_states::{MeasurementBasis, Polarization};

/// Encodes one bit under one basis using the fixed two-by-two table.
pub fn generate_bb84_state(bit: bool, basis: MeasurementBasis) -> Polarization {
    match (bit, basis) {
        (false, MeasurementBasis::Rectilinear) => Polarization::Horizontal,
        (true, MeasurementBasis::Rectilinear) => Polarization::Vertical,
        (false, MeasurementBasis::Diagonal) => Polarization::AntiDiagonal,
        (true, MeasurementBasis::Diagonal) => Polarization::Diagonal,
    }
}

/// Reads a photon in `basis`.
///
/// A matching basis recovers the encoded bit exactly. A mismatched basis
/// yields a fair coin flip, which is what makes interception noisy.
pub fn measure_bb84_state<R: Rng + ?Sized>(
    state: Polarization,
    basis: MeasurementBasis,
    rng: &mut R,
) -> bool {
    if state.basis() == basis {
        state.bit()
    } else {
        rng.gen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_matching_basis_recovers_bit() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for basis in MeasurementBasis::ALL {
            for bit in [false, true] {
                let state = generate_bb84_state(bit, basis);
                assert_eq!(measure_bb84_state(state, basis, &mut rng), bit);
            }
        }
    }

    #[test]
    fn test_mismatched_basis_is_a_coin_flip() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let state = generate_bb84_state(false, MeasurementBasis::Rectilinear);
        let trials = 4000;
        let ones = (0..trials)
            .filter(|_| measure_bb84_state(state, MeasurementBasis::Diagonal, &mut rng))
            .count();
        let ratio = ones as f64 / trials as f64;
        assert!((0.45..0.55).contains(&ratio), "ratio of ones: {}", ratio);
    }
}
