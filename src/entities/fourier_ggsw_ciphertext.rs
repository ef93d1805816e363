//! GGSW ciphertexts in the folded Fourier domain, the form consumed by the
//! blind-rotation CMUXes.

use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, FourierPolynomialSize, GlweSize, PolynomialSize,
};
use crate::commons::torus::UnsignedTorus;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::fourier_glwe_ciphertext::{
    FourierGlweCiphertext, FourierGlweCiphertextMutView, FourierGlweCiphertextView,
};
use crate::entities::ggsw_ciphertext::GgswCiphertext;
use crate::fft::{FftView, FourierPolynomial};
use aligned_vec::{avec, ABox};
use dyn_stack::PodStack;
use tfhe_fft::c64;

pub fn fourier_ggsw_ciphertext_size(
    glwe_size: GlweSize,
    fourier_polynomial_size: FourierPolynomialSize,
    decomposition_level_count: DecompositionLevelCount,
) -> usize {
    decomposition_level_count.0 * glwe_size.0 * glwe_size.0 * fourier_polynomial_size.0
}

#[derive(Clone, Debug)]
pub struct FourierGgswCiphertext<C: Container<Element = c64>> {
    data: C,
    glwe_size: GlweSize,
    fourier_polynomial_size: FourierPolynomialSize,
    decomposition_base_log: DecompositionBaseLog,
}

pub type FourierGgswCiphertextView<'a> = FourierGgswCiphertext<&'a [c64]>;
pub type FourierGgswCiphertextMutView<'a> = FourierGgswCiphertext<&'a mut [c64]>;
pub type FourierGgswCiphertextOwned = FourierGgswCiphertext<ABox<[c64]>>;

impl FourierGgswCiphertextOwned {
    pub fn new(
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        let fourier_polynomial_size = polynomial_size.to_fourier_polynomial_size();
        Self {
            data: avec![
                c64::default();
                fourier_ggsw_ciphertext_size(
                    glwe_size,
                    fourier_polynomial_size,
                    decomposition_level_count
                )
            ]
            .into_boxed_slice(),
            glwe_size,
            fourier_polynomial_size,
            decomposition_base_log,
        }
    }
}

impl<C: Container<Element = c64>> FourierGgswCiphertext<C> {
    pub fn from_container(
        data: C,
        glwe_size: GlweSize,
        fourier_polynomial_size: FourierPolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
    ) -> Self {
        assert!(
            data.as_ref().len() % (glwe_size.0 * glwe_size.0 * fourier_polynomial_size.0) == 0,
            "The provided container length {} does not hold a whole number of level matrices",
            data.as_ref().len(),
        );
        Self {
            data,
            glwe_size,
            fourier_polynomial_size,
            decomposition_base_log,
        }
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.glwe_size
    }

    pub fn fourier_polynomial_size(&self) -> FourierPolynomialSize {
        self.fourier_polynomial_size
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        DecompositionLevelCount(
            self.data.container_len()
                / (self.glwe_size.0 * self.glwe_size.0 * self.fourier_polynomial_size.0),
        )
    }

    /// The Fourier GLWE row for decomposition level index `level` (weight
    /// `Q/B^(level+1)`) and row index `row`.
    pub fn get_row(&self, level: usize, row: usize) -> FourierGlweCiphertextView<'_> {
        let row_len = self.glwe_size.0 * self.fourier_polynomial_size.0;
        let start = (level * self.glwe_size.0 + row) * row_len;
        FourierGlweCiphertext::from_container(
            &self.data.as_ref()[start..start + row_len],
            self.fourier_polynomial_size,
        )
    }

    pub fn as_view(&self) -> FourierGgswCiphertextView<'_> {
        FourierGgswCiphertext {
            data: self.data.as_ref(),
            glwe_size: self.glwe_size,
            fourier_polynomial_size: self.fourier_polynomial_size,
            decomposition_base_log: self.decomposition_base_log,
        }
    }
}

impl<C: ContainerMut<Element = c64>> FourierGgswCiphertext<C> {
    pub fn get_mut_row(&mut self, level: usize, row: usize) -> FourierGlweCiphertextMutView<'_> {
        let row_len = self.glwe_size.0 * self.fourier_polynomial_size.0;
        let start = (level * self.glwe_size.0 + row) * row_len;
        FourierGlweCiphertext::from_container(
            &mut self.data.as_mut()[start..start + row_len],
            self.fourier_polynomial_size,
        )
    }

    /// Fill this ciphertext with the Fourier transform of a GGSW ciphertext
    /// in the standard domain.
    pub fn fill_with_forward_fourier<Scalar, InputCont>(
        &mut self,
        standard: &GgswCiphertext<InputCont>,
        fft: FftView<'_>,
        stack: &mut PodStack,
    ) where
        Scalar: UnsignedTorus,
        InputCont: Container<Element = Scalar>,
    {
        debug_assert_eq!(self.glwe_size, standard.glwe_size());
        debug_assert_eq!(
            self.fourier_polynomial_size,
            standard.polynomial_size().to_fourier_polynomial_size()
        );
        let fourier_polynomial_size = self.fourier_polynomial_size.0;
        let polynomial_size = standard.polynomial_size();
        for (fourier_data, standard_data) in self
            .data
            .as_mut()
            .chunks_exact_mut(fourier_polynomial_size)
            .zip(standard.as_ref().chunks_exact(polynomial_size.0))
        {
            let mut fourier = FourierPolynomial { data: fourier_data };
            let standard =
                crate::entities::polynomial::Polynomial::from_container(standard_data);
            fft.forward_as_torus(&mut fourier, &standard, stack);
        }
    }
}
