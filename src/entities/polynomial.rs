//! Polynomials of the negacyclic ring $\mathbb{Z}\_Q\[X\]/(X^N + 1)$.

use crate::commons::numeric::Numeric;
use crate::commons::parameters::PolynomialSize;
use crate::commons::traits::{Container, ContainerMut};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polynomial<C: Container> {
    data: C,
}

pub type PolynomialView<'a, Scalar> = Polynomial<&'a [Scalar]>;
pub type PolynomialMutView<'a, Scalar> = Polynomial<&'a mut [Scalar]>;
pub type PolynomialOwned<Scalar> = Polynomial<Vec<Scalar>>;

impl<Scalar: Numeric> PolynomialOwned<Scalar> {
    pub fn new(size: PolynomialSize) -> Self {
        Self {
            data: vec![Scalar::ZERO; size.0],
        }
    }
}

impl<C: Container> Polynomial<C> {
    pub fn from_container(data: C) -> Self {
        assert!(
            !data.as_ref().is_empty(),
            "Tried to create a polynomial from an empty container"
        );
        Self { data }
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        PolynomialSize(self.data.container_len())
    }

    pub fn as_view(&self) -> PolynomialView<'_, C::Element> {
        Polynomial {
            data: self.data.as_ref(),
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut> Polynomial<C> {
    pub fn as_mut_view(&mut self) -> PolynomialMutView<'_, C::Element> {
        Polynomial {
            data: self.data.as_mut(),
        }
    }
}

impl<C: Container> AsRef<[C::Element]> for Polynomial<C> {
    fn as_ref(&self) -> &[C::Element] {
        self.data.as_ref()
    }
}

impl<C: ContainerMut> AsMut<[C::Element]> for Polynomial<C> {
    fn as_mut(&mut self) -> &mut [C::Element] {
        self.data.as_mut()
    }
}

impl<Scalar: Numeric, C: ContainerMut<Element = Scalar>> Polynomial<C> {
    pub fn fill_with_zero(&mut self) {
        self.as_mut().fill(Scalar::ZERO);
    }
}
