//! GGSW ciphertexts in the standard domain.
//!
//! A GGSW ciphertext of a plaintext `m` is a matrix of GLWE ciphertexts:
//! for each decomposition level `l` (weighted by `Q/B^(l+1)`), one GLWE row
//! per mask polynomial encrypting `-s_j * m * Q/B^(l+1)`, and a final body
//! row encrypting `m * Q/B^(l+1)`.

use crate::commons::numeric::Numeric;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweSize, PolynomialSize,
};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::glwe_ciphertext::{GlweCiphertext, GlweCiphertextMutView, GlweCiphertextView};
use serde::{Deserialize, Serialize};

pub fn ggsw_ciphertext_size(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_level_count: DecompositionLevelCount,
) -> usize {
    decomposition_level_count.0 * glwe_size.0 * glwe_size.0 * polynomial_size.0
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GgswCiphertext<C: Container> {
    data: C,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_base_log: DecompositionBaseLog,
}

pub type GgswCiphertextView<'a, Scalar> = GgswCiphertext<&'a [Scalar]>;
pub type GgswCiphertextMutView<'a, Scalar> = GgswCiphertext<&'a mut [Scalar]>;
pub type GgswCiphertextOwned<Scalar> = GgswCiphertext<Vec<Scalar>>;

impl<Scalar: Numeric> GgswCiphertextOwned<Scalar> {
    pub fn new(
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        Self {
            data: vec![
                Scalar::ZERO;
                ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count)
            ],
            glwe_size,
            polynomial_size,
            decomposition_base_log,
        }
    }
}

impl<C: Container> GgswCiphertext<C> {
    pub fn from_container(
        data: C,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
    ) -> Self {
        assert!(
            data.as_ref().len() % (glwe_size.0 * glwe_size.0 * polynomial_size.0) == 0,
            "The provided container length {} does not hold a whole number of level matrices",
            data.as_ref().len(),
        );
        Self {
            data,
            glwe_size,
            polynomial_size,
            decomposition_base_log,
        }
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.glwe_size
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        DecompositionLevelCount(
            self.data.container_len()
                / (self.glwe_size.0 * self.glwe_size.0 * self.polynomial_size.0),
        )
    }

    /// The GLWE row for decomposition level index `level` (weight
    /// `Q/B^(level+1)`) and row index `row`.
    pub fn get_row(&self, level: usize, row: usize) -> GlweCiphertextView<'_, C::Element> {
        let row_len = self.glwe_size.0 * self.polynomial_size.0;
        let start = (level * self.glwe_size.0 + row) * row_len;
        GlweCiphertext::from_container(
            &self.data.as_ref()[start..start + row_len],
            self.polynomial_size,
        )
    }
}

impl<C: Container> AsRef<[C::Element]> for GgswCiphertext<C> {
    fn as_ref(&self) -> &[C::Element] {
        self.data.as_ref()
    }
}

impl<C: ContainerMut> AsMut<[C::Element]> for GgswCiphertext<C> {
    fn as_mut(&mut self) -> &mut [C::Element] {
        self.data.as_mut()
    }
}

impl<C: ContainerMut> GgswCiphertext<C> {
    pub fn get_mut_row(&mut self, level: usize, row: usize) -> GlweCiphertextMutView<'_, C::Element> {
        let row_len = self.glwe_size.0 * self.polynomial_size.0;
        let start = (level * self.glwe_size.0 + row) * row_len;
        GlweCiphertext::from_container(
            &mut self.data.as_mut()[start..start + row_len],
            self.polynomial_size,
        )
    }
}
