//! Secret keys.
//!
//! All the secret material of one party lives in a single flattened buffer,
//! the LWE-large key: the concatenation of the coefficients of the `k` GLWE
//! key polynomials. The LWE key is the length-`n` prefix of that buffer, so
//! ciphertexts under the LWE key can be key-switched by treating only the
//! trailing coordinates.
//!
//! The buffer is shared: hierarchical encryptors at smaller ring degrees view
//! a prefix of the root buffer, bit-for-bit, which makes their LWE masks
//! compatible across levels.

use crate::commons::parameters::{GlweDimension, LweDimension, PolynomialSize};
use crate::commons::traits::Container;
use crate::entities::polynomial::{Polynomial, PolynomialView};
use crate::parameters::Parameters;
use crate::commons::torus::UnsignedTorus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An LWE secret key, or a borrowed view of one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LweSecretKey<C: Container> {
    data: C,
}

impl<C: Container> LweSecretKey<C> {
    pub fn from_container(data: C) -> Self {
        Self { data }
    }

    pub fn lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.container_len())
    }
}

impl<C: Container> AsRef<[C::Element]> for LweSecretKey<C> {
    fn as_ref(&self) -> &[C::Element] {
        self.data.as_ref()
    }
}

/// A GLWE secret key, or a borrowed view of one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlweSecretKey<C: Container> {
    data: C,
    polynomial_size: PolynomialSize,
}

impl<C: Container> GlweSecretKey<C> {
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

    pub fn glwe_dimension(&self) -> GlweDimension {
        GlweDimension(self.data.container_len() / self.polynomial_size.0)
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn get_polynomial(&self, index: usize) -> PolynomialView<'_, C::Element> {
        let start = index * self.polynomial_size.0;
        Polynomial::from_container(&self.data.as_ref()[start..start + self.polynomial_size.0])
    }
}

impl<C: Container> AsRef<[C::Element]> for GlweSecretKey<C> {
    fn as_ref(&self) -> &[C::Element] {
        self.data.as_ref()
    }
}

/// The full secret material of one party, with prefix views for the LWE and
/// GLWE keys. Cloning shares the underlying buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKey<Scalar> {
    lwe_large_key: Arc<[Scalar]>,
    lwe_dimension: LweDimension,
    large_lwe_dimension: LweDimension,
    polynomial_size: PolynomialSize,
}

impl<Scalar: UnsignedTorus> SecretKey<Scalar> {
    /// Wrap a freshly sampled LWE-large key buffer.
    pub fn from_buffer(buffer: Vec<Scalar>, parameters: &Parameters<Scalar>) -> Self {
        assert_eq!(buffer.len(), parameters.large_lwe_dimension().0);
        Self {
            lwe_large_key: Arc::from(buffer),
            lwe_dimension: parameters.lwe_dimension(),
            large_lwe_dimension: parameters.large_lwe_dimension(),
            polynomial_size: parameters.polynomial_size(),
        }
    }

    /// View this key at the geometry of a smaller (halved) parameter set: the
    /// descendant shares a prefix of the same buffer.
    pub fn at_params(&self, parameters: &Parameters<Scalar>) -> Self {
        assert!(
            parameters.large_lwe_dimension() <= self.large_lwe_dimension,
            "Cannot view a secret key of dimension {:?} at larger dimension {:?}",
            self.large_lwe_dimension,
            parameters.large_lwe_dimension(),
        );
        assert_eq!(parameters.lwe_dimension(), self.lwe_dimension);
        Self {
            lwe_large_key: Arc::clone(&self.lwe_large_key),
            lwe_dimension: parameters.lwe_dimension(),
            large_lwe_dimension: parameters.large_lwe_dimension(),
            polynomial_size: parameters.polynomial_size(),
        }
    }

    /// The length-`n` prefix used for LWE ciphertexts.
    pub fn lwe_secret_key(&self) -> LweSecretKey<&[Scalar]> {
        LweSecretKey::from_container(&self.lwe_large_key[..self.lwe_dimension.0])
    }

    /// The flattened GLWE key, used for LWE ciphertexts under the
    /// KeySwitchBlindRotate order.
    pub fn large_lwe_secret_key(&self) -> LweSecretKey<&[Scalar]> {
        LweSecretKey::from_container(&self.lwe_large_key[..self.large_lwe_dimension.0])
    }

    pub fn glwe_secret_key(&self) -> GlweSecretKey<&[Scalar]> {
        GlweSecretKey::from_container(
            &self.lwe_large_key[..self.large_lwe_dimension.0],
            self.polynomial_size,
        )
    }

    pub fn lwe_dimension(&self) -> LweDimension {
        self.lwe_dimension
    }

    pub fn large_lwe_dimension(&self) -> LweDimension {
        self.large_lwe_dimension
    }

    /// Whether two keys share the same underlying buffer.
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.lwe_large_key, &other.lwe_large_key)
    }
}
