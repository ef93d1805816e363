//! Blind-rotation lookup tables.
//!
//! A lookup table of size `L = e * N` is stored as `e` polynomials of degree
//! `N`: coefficient `j` of the conceptual degree-`L` polynomial lives at
//! polynomial `j % e`, coefficient `j / e`. Only the body slot of the
//! accumulator is populated at construction time.

use crate::commons::numeric::Numeric;
use crate::commons::parameters::{ExtendFactor, LookupTableSize, PolynomialSize};
use crate::entities::polynomial::{Polynomial, PolynomialMutView, PolynomialView};
use crate::parameters::Parameters;
use crate::commons::torus::UnsignedTorus;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTable<Scalar> {
    data: Vec<Scalar>,
    polynomial_size: PolynomialSize,
    extend_factor: ExtendFactor,
}

impl<Scalar: Numeric> LookupTable<Scalar> {
    /// Allocate the lookup table matching the blind-rotation geometry of the
    /// given parameters.
    pub fn new(parameters: &Parameters<Scalar>) -> Self
    where
        Scalar: UnsignedTorus,
    {
        Self::new_custom(parameters.extend_factor(), parameters.polynomial_size())
    }

    /// Allocate a lookup table of `extend_factor` polynomials of degree
    /// `polynomial_size`.
    pub fn new_custom(extend_factor: ExtendFactor, polynomial_size: PolynomialSize) -> Self {
        assert!(extend_factor.0 > 0, "ExtendFactor must be positive");
        Self {
            data: vec![Scalar::ZERO; extend_factor.0 * polynomial_size.0],
            polynomial_size,
            extend_factor,
        }
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn extend_factor(&self) -> ExtendFactor {
        self.extend_factor
    }

    pub fn lookup_table_size(&self) -> LookupTableSize {
        LookupTableSize(self.data.len())
    }

    pub fn get_polynomial(&self, index: usize) -> PolynomialView<'_, Scalar> {
        let start = index * self.polynomial_size.0;
        Polynomial::from_container(&self.data[start..start + self.polynomial_size.0])
    }

    pub fn get_mut_polynomial(&mut self, index: usize) -> PolynomialMutView<'_, Scalar> {
        let start = index * self.polynomial_size.0;
        Polynomial::from_container(&mut self.data[start..start + self.polynomial_size.0])
    }

    /// Scatter a raw table of `extend_factor * polynomial_size` values into
    /// the interleaved polynomial layout.
    pub fn fill_with_interleaved_raw(&mut self, raw: &[Scalar])
    where
        Scalar: Copy,
    {
        assert_eq!(raw.len(), self.data.len());
        let extend_factor = self.extend_factor.0;
        let polynomial_size = self.polynomial_size.0;
        for i in 0..extend_factor {
            for j in 0..polynomial_size {
                self.data[i * polynomial_size + j] = raw[j * extend_factor + i];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleave_layout() {
        let mut lut = LookupTable::<u64>::new_custom(ExtendFactor(4), PolynomialSize(8));
        let raw: Vec<u64> = (0..32).collect();
        lut.fill_with_interleaved_raw(&raw);
        // raw coefficient j lands at polynomial j % e, coefficient j / e
        for j in 0..32 {
            assert_eq!(lut.get_polynomial(j % 4).as_ref()[j / 4], j as u64);
        }
    }
}
