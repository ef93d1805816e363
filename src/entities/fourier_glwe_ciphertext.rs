//! GLWE ciphertexts in the folded Fourier domain.

use crate::commons::parameters::{FourierPolynomialSize, GlweSize};
use crate::commons::traits::{Container, ContainerMut};
use crate::fft::{FourierPolynomial, FourierPolynomialMutView, FourierPolynomialView};
use aligned_vec::{avec, ABox};
use tfhe_fft::c64;

#[derive(Clone, Debug)]
pub struct FourierGlweCiphertext<C: Container<Element = c64>> {
    data: C,
    fourier_polynomial_size: FourierPolynomialSize,
}

pub type FourierGlweCiphertextView<'a> = FourierGlweCiphertext<&'a [c64]>;
pub type FourierGlweCiphertextMutView<'a> = FourierGlweCiphertext<&'a mut [c64]>;
pub type FourierGlweCiphertextOwned = FourierGlweCiphertext<ABox<[c64]>>;

impl FourierGlweCiphertextOwned {
    pub fn new(glwe_size: GlweSize, fourier_polynomial_size: FourierPolynomialSize) -> Self {
        Self {
            data: avec![c64::default(); glwe_size.0 * fourier_polynomial_size.0]
                .into_boxed_slice(),
            fourier_polynomial_size,
        }
    }
}

impl<C: Container<Element = c64>> FourierGlweCiphertext<C> {
    pub fn from_container(data: C, fourier_polynomial_size: FourierPolynomialSize) -> Self {
        assert!(
            data.as_ref().len() % fourier_polynomial_size.0 == 0,
            "The provided container length {} is not a multiple of the Fourier polynomial size {}",
            data.as_ref().len(),
            fourier_polynomial_size.0
        );
        Self {
            data,
            fourier_polynomial_size,
        }
    }

    pub fn glwe_size(&self) -> GlweSize {
        GlweSize(self.data.container_len() / self.fourier_polynomial_size.0)
    }

    pub fn fourier_polynomial_size(&self) -> FourierPolynomialSize {
        self.fourier_polynomial_size
    }

    pub fn get_polynomial(&self, index: usize) -> FourierPolynomialView<'_> {
        let start = index * self.fourier_polynomial_size.0;
        FourierPolynomial {
            data: &self.data.as_ref()[start..start + self.fourier_polynomial_size.0],
        }
    }

    pub fn iter_polynomials(
        &self,
    ) -> impl DoubleEndedIterator<Item = FourierPolynomialView<'_>> + ExactSizeIterator {
        self.data
            .as_ref()
            .chunks_exact(self.fourier_polynomial_size.0)
            .map(|data| FourierPolynomial { data })
    }

    pub fn as_view(&self) -> FourierGlweCiphertextView<'_> {
        FourierGlweCiphertext {
            data: self.data.as_ref(),
            fourier_polynomial_size: self.fourier_polynomial_size,
        }
    }
}

impl<C: Container<Element = c64>> AsRef<[c64]> for FourierGlweCiphertext<C> {
    fn as_ref(&self) -> &[c64] {
        self.data.as_ref()
    }
}

impl<C: ContainerMut<Element = c64>> AsMut<[c64]> for FourierGlweCiphertext<C> {
    fn as_mut(&mut self) -> &mut [c64] {
        self.data.as_mut()
    }
}

impl<C: ContainerMut<Element = c64>> FourierGlweCiphertext<C> {
    pub fn get_mut_polynomial(&mut self, index: usize) -> FourierPolynomialMutView<'_> {
        let start = index * self.fourier_polynomial_size.0;
        FourierPolynomial {
            data: &mut self.data.as_mut()[start..start + self.fourier_polynomial_size.0],
        }
    }

    pub fn iter_mut_polynomials(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = FourierPolynomialMutView<'_>> + ExactSizeIterator {
        let fourier_polynomial_size = self.fourier_polynomial_size.0;
        self.data
            .as_mut()
            .chunks_exact_mut(fourier_polynomial_size)
            .map(|data| FourierPolynomial { data })
    }

    pub fn as_mut_view(&mut self) -> FourierGlweCiphertextMutView<'_> {
        FourierGlweCiphertext {
            data: self.data.as_mut(),
            fourier_polynomial_size: self.fourier_polynomial_size,
        }
    }
}
