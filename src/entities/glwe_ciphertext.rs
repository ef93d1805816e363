//! GLWE ciphertexts: `k` mask polynomials followed by a body polynomial.

use crate::commons::numeric::Numeric;
use crate::commons::parameters::{GlweSize, PolynomialSize};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::polynomial::{Polynomial, PolynomialMutView, PolynomialView};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlweCiphertext<C: Container> {
    data: C,
    polynomial_size: PolynomialSize,
}

pub type GlweCiphertextView<'a, Scalar> = GlweCiphertext<&'a [Scalar]>;
pub type GlweCiphertextMutView<'a, Scalar> = GlweCiphertext<&'a mut [Scalar]>;
pub type GlweCiphertextOwned<Scalar> = GlweCiphertext<Vec<Scalar>>;

impl<Scalar: Numeric> GlweCiphertextOwned<Scalar> {
    pub fn new(glwe_size: GlweSize, polynomial_size: PolynomialSize) -> Self {
        Self {
            data: vec![Scalar::ZERO; glwe_size.0 * polynomial_size.0],
            polynomial_size,
        }
    }
}

impl<C: Container> GlweCiphertext<C> {
    pub fn from_container(data: C, polynomial_size: PolynomialSize) -> Self {
        assert!(
            data.as_ref().len() % polynomial_size.0 == 0,
            "The provided container length {} is not a multiple of the polynomial size {}",
            data.as_ref().len(),
            polynomial_size.0
        );
        Self {
            data,
            polynomial_size,
        }
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn glwe_size(&self) -> GlweSize {
        GlweSize(self.data.container_len() / self.polynomial_size.0)
    }

    pub fn get_body(&self) -> PolynomialView<'_, C::Element> {
        let body_start = (self.glwe_size().0 - 1) * self.polynomial_size.0;
        Polynomial::from_container(&self.data.as_ref()[body_start..])
    }

    pub fn get_mask(&self) -> &[C::Element] {
        let body_start = (self.glwe_size().0 - 1) * self.polynomial_size.0;
        &self.data.as_ref()[..body_start]
    }

    pub fn get_polynomial(&self, index: usize) -> PolynomialView<'_, C::Element> {
        let start = index * self.polynomial_size.0;
        Polynomial::from_container(&self.data.as_ref()[start..start + self.polynomial_size.0])
    }

    pub fn iter_polynomials(
        &self,
    ) -> impl DoubleEndedIterator<Item = PolynomialView<'_, C::Element>> + ExactSizeIterator {
        self.data
            .as_ref()
            .chunks_exact(self.polynomial_size.0)
            .map(Polynomial::from_container)
    }

    pub fn as_view(&self) -> GlweCiphertextView<'_, C::Element> {
        GlweCiphertext {
            data: self.data.as_ref(),
            polynomial_size: self.polynomial_size,
        }
    }
}

impl<C: Container> AsRef<[C::Element]> for GlweCiphertext<C> {
    fn as_ref(&self) -> &[C::Element] {
        self.data.as_ref()
    }
}

impl<C: ContainerMut> AsMut<[C::Element]> for GlweCiphertext<C> {
    fn as_mut(&mut self) -> &mut [C::Element] {
        self.data.as_mut()
    }
}

impl<C: ContainerMut> GlweCiphertext<C> {
    pub fn get_mut_body(&mut self) -> PolynomialMutView<'_, C::Element> {
        let body_start = (self.glwe_size().0 - 1) * self.polynomial_size.0;
        Polynomial::from_container(&mut self.data.as_mut()[body_start..])
    }

    pub fn get_mut_mask_and_body(
        &mut self,
    ) -> (&mut [C::Element], PolynomialMutView<'_, C::Element>) {
        let body_start = (self.glwe_size().0 - 1) * self.polynomial_size.0;
        let (mask, body) = self.data.as_mut().split_at_mut(body_start);
        (mask, Polynomial::from_container(body))
    }

    pub fn get_mut_polynomial(&mut self, index: usize) -> PolynomialMutView<'_, C::Element> {
        let start = index * self.polynomial_size.0;
        Polynomial::from_container(&mut self.data.as_mut()[start..start + self.polynomial_size.0])
    }

    pub fn iter_mut_polynomials(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = PolynomialMutView<'_, C::Element>> + ExactSizeIterator
    {
        let polynomial_size = self.polynomial_size.0;
        self.data
            .as_mut()
            .chunks_exact_mut(polynomial_size)
            .map(Polynomial::from_container)
    }

    pub fn as_mut_view(&mut self) -> GlweCiphertextMutView<'_, C::Element> {
        GlweCiphertext {
            data: self.data.as_mut(),
            polynomial_size: self.polynomial_size,
        }
    }
}

impl<Scalar: Numeric, C: ContainerMut<Element = Scalar>> GlweCiphertext<C> {
    pub fn fill_with_zero(&mut self) {
        self.as_mut().fill(Scalar::ZERO);
    }
}
