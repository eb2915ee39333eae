use rand::Rng;

/// Symbolic photon record: one bit encoded under one basis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Polarization {
    Horizontal,   // 0°, bit 0 in the rectilinear basis
    Vertical,     // 90°, bit 1 in the rectilinear basis
    Diagonal,     // 45°, bit 1 in the diagonal basis
    AntiDiagonal, // 135°, bit 0 in the diagonal basis
}

impl Polarization {
    /// The basis this polarization was prepared in.
    pub fn basis(self) -> MeasurementBasis {
        match self {
            Polarization::Horizontal | Polarization::Vertical => MeasurementBasis::Rectilinear,
            Polarization::Diagonal | Polarization::AntiDiagonal => MeasurementBasis::Diagonal,
        }
    }

    /// The bit carried by this polarization when read in its own basis.
    pub fn bit(self) -> bool {
        matches!(self, Polarization::Vertical | Polarization::Diagonal)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MeasurementBasis {
    Rectilinear,
    Diagonal,
}

impl MeasurementBasis {
    pub const ALL: [MeasurementBasis; 2] = [MeasurementBasis::Rectilinear, MeasurementBasis::Diagonal];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

pub fn random_bit<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.gen()
}
