//! Conversions between the unsigned integer representation of torus elements
//! and their floating point representation.
//!
//! Torus elements live in $[0, 1)$ and are stored as unsigned integers
//! encoding their fractional part with fixed precision. Floating point
//! round-trips are needed at the FFT boundary and for noise sampling.

use crate::commons::numeric::{CastInto, Numeric, SignedInteger, UnsignedInteger};

/// Convert a torus element in unsigned integer representation to the closest
/// `f64` representation in $[0, 1)$.
pub trait IntoTorus: UnsignedInteger {
    fn into_torus(self) -> f64;
}

/// Convert an `f64` torus value into the closest unsigned integer
/// representation.
pub trait FromTorus: UnsignedInteger {
    fn from_torus(input: f64) -> Self;
}

macro_rules! implement {
    ($Type:ty) => {
        impl IntoTorus for $Type {
            #[inline]
            fn into_torus(self) -> f64 {
                let self_f: f64 = self.cast_into();
                self_f * 2.0f64.powi(-(<$Type as Numeric>::BITS as i32))
            }
        }

        impl FromTorus for $Type {
            #[inline]
            fn from_torus(input: f64) -> Self {
                let mut fract = input - input.round();
                fract *= 2.0f64.powi(<$Type as Numeric>::BITS as i32);
                fract = fract.round();
                let signed: <$Type as UnsignedInteger>::Signed = fract.cast_into();
                signed.into_unsigned()
            }
        }
    };
}

implement!(u32);
implement!(u64);

/// A marker trait for unsigned integer types that can be used as ciphertext
/// scalars.
pub trait UnsignedTorus: UnsignedInteger + FromTorus + IntoTorus {}

impl UnsignedTorus for u32 {}
impl UnsignedTorus for u64 {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn torus_round_trip() {
        for x in [0u64, 1 << 63, 1 << 62, 123_456_789, u64::MAX - (1 << 12)] {
            let f = x.into_torus();
            let y = u64::from_torus(f);
            // from_torus folds to the centered representative, round trips up
            // to the f64 mantissa precision
            let diff = x.wrapping_sub(y);
            let diff = diff.min(diff.wrapping_neg());
            assert!(diff < (1 << 12), "x = {x}, y = {y}");
        }
    }

    #[test]
    fn from_torus_wraps_negative_values() {
        let x = u32::from_torus(-0.25);
        assert_eq!(x, 3 << 30);
    }
}
