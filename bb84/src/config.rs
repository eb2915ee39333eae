//! Run configuration: how many photons each party prepares and how long the
//! sifted key must be before a party accepts the exchange.

use crate::error::ConfigError;

/// Number of basis/bit/photon positions generated per run.
pub const PHOTONS_SIZE: usize = 100;

/// Shortest sifted key a party will accept.
pub const MIN_SHARED_KEY_LENGTH: usize = 32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    photons_size: usize,
    min_shared_key_length: usize,
}

impl Config {
    pub fn new(photons_size: usize, min_shared_key_length: usize) -> Result<Self, ConfigError> {
        if photons_size == 0 {
            return Err(ConfigError::ZeroPhotons);
        }
        if min_shared_key_length == 0 {
            return Err(ConfigError::ZeroMinKeyLength);
        }
        // A sifted key can never be longer than the raw photon sequence.
        if min_shared_key_length > photons_size {
            return Err(ConfigError::UnreachableThreshold {
                min: min_shared_key_length,
                photons: photons_size,
            });
        }
        Ok(Self {
            photons_size,
            min_shared_key_length,
        })
    }

    pub fn photons_size(&self) -> usize {
        self.photons_size
    }

    pub fn min_shared_key_length(&self) -> usize {
        self.min_shared_key_length
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            photons_size: PHOTONS_SIZE,
            min_shared_key_length: MIN_SHARED_KEY_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert_eq!(
            Config::new(config.photons_size(), config.min_shared_key_length()),
            Ok(config)
        );
    }

    #[test]
    fn test_rejects_zero_values() {
        assert_eq!(Config::new(0, 1), Err(ConfigError::ZeroPhotons));
        assert_eq!(Config::new(10, 0), Err(ConfigError::ZeroMinKeyLength));
    }

    #[test]
    fn test_rejects_unreachable_threshold() {
        assert_eq!(
            Config::new(10, 11),
            Err(ConfigError::UnreachableThreshold {
                min: 11,
                photons: 10
            })
        );
        assert!(Config::new(10, 10).is_ok());
    }
}
