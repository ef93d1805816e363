//! LWE ciphertexts: a mask vector followed by a body scalar.

use crate::commons::numeric::Numeric;
use crate::commons::parameters::{LweDimension, LweSize};
use crate::commons::traits::{Container, ContainerMut};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LweCiphertext<C: Container> {
    data: C,
}

pub type LweCiphertextView<'a, Scalar> = LweCiphertext<&'a [Scalar]>;
pub type LweCiphertextMutView<'a, Scalar> = LweCiphertext<&'a mut [Scalar]>;
pub type LweCiphertextOwned<Scalar> = LweCiphertext<Vec<Scalar>>;

impl<Scalar: Numeric> LweCiphertextOwned<Scalar> {
    pub fn new(lwe_size: LweSize) -> Self {
        Self {
            data: vec![Scalar::ZERO; lwe_size.0],
        }
    }
}

impl<C: Container> LweCiphertext<C> {
    pub fn from_container(data: C) -> Self {
        assert!(
            data.as_ref().len() > 1,
            "Tried to create an LweCiphertext with {} scalars, at least 2 are needed",
            data.as_ref().len()
        );
        Self { data }
    }

    pub fn lwe_size(&self) -> LweSize {
        LweSize(self.data.container_len())
    }

    pub fn lwe_dimension(&self) -> LweDimension {
        self.lwe_size().to_lwe_dimension()
    }

    pub fn get_mask(&self) -> &[C::Element] {
        let (mask, _) = self.data.as_ref().split_at(self.lwe_dimension().0);
        mask
    }

    pub fn get_body(&self) -> &C::Element {
        self.data.as_ref().last().unwrap()
    }

    pub fn as_view(&self) -> LweCiphertextView<'_, C::Element> {
        LweCiphertext {
            data: self.data.as_ref(),
        }
    }
}

impl<C: Container> AsRef<[C::Element]> for LweCiphertext<C> {
    fn as_ref(&self) -> &[C::Element] {
        self.data.as_ref()
    }
}

impl<C: ContainerMut> AsMut<[C::Element]> for LweCiphertext<C> {
    fn as_mut(&mut self) -> &mut [C::Element] {
        self.data.as_mut()
    }
}

impl<C: ContainerMut> LweCiphertext<C> {
    pub fn get_mut_mask_and_body(&mut self) -> (&mut [C::Element], &mut C::Element) {
        let lwe_dimension = self.lwe_dimension().0;
        let (mask, body) = self.data.as_mut().split_at_mut(lwe_dimension);
        (mask, &mut body[0])
    }

    pub fn get_mut_body(&mut self) -> &mut C::Element {
        self.data.as_mut().last_mut().unwrap()
    }

    pub fn as_mut_view(&mut self) -> LweCiphertextMutView<'_, C::Element> {
        LweCiphertext {
            data: self.data.as_mut(),
        }
    }
}
