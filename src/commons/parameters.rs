//! Strongly-typed wrappers for the dimensional parameters of the scheme.

use serde::{Deserialize, Serialize};

/// The number of mask coordinates of an LWE ciphertext, or the number of
/// coefficients of an LWE secret key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LweDimension(pub usize);

impl LweDimension {
    pub fn to_lwe_size(self) -> LweSize {
        LweSize(self.0 + 1)
    }
}

/// The number of scalars of an LWE ciphertext: its mask coordinates plus its
/// body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LweSize(pub usize);

impl LweSize {
    pub fn to_lwe_dimension(self) -> LweDimension {
        LweDimension(self.0 - 1)
    }
}

/// The rank of a GLWE ciphertext: the number of its mask polynomials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlweDimension(pub usize);

impl GlweDimension {
    pub fn to_glwe_size(self) -> GlweSize {
        GlweSize(self.0 + 1)
    }

    /// The dimension of the LWE key obtained by flattening the GLWE key.
    pub fn to_equivalent_lwe_dimension(self, polynomial_size: PolynomialSize) -> LweDimension {
        LweDimension(self.0 * polynomial_size.0)
    }
}

/// The number of polynomials of a GLWE ciphertext: its mask polynomials plus
/// its body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlweSize(pub usize);

impl GlweSize {
    pub fn to_glwe_dimension(self) -> GlweDimension {
        GlweDimension(self.0 - 1)
    }
}

/// The number of coefficients of a polynomial of the ring
/// $\mathbb{Z}\_Q\[X\]/(X^N + 1)$.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolynomialSize(pub usize);

impl PolynomialSize {
    /// The number of complex coefficients of the folded Fourier representation.
    pub fn to_fourier_polynomial_size(self) -> FourierPolynomialSize {
        assert!(
            self.0 % 2 == 0,
            "Cannot convert PolynomialSize {} to FourierPolynomialSize: not a multiple of 2",
            self.0
        );
        FourierPolynomialSize(self.0 / 2)
    }

    pub fn log2(self) -> usize {
        debug_assert!(self.0.is_power_of_two());
        self.0.ilog2() as usize
    }
}

/// The number of complex coefficients of a polynomial in the folded Fourier
/// domain, equal to half its standard polynomial size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FourierPolynomialSize(pub usize);

impl FourierPolynomialSize {
    pub fn to_standard_polynomial_size(self) -> PolynomialSize {
        PolynomialSize(self.0 * 2)
    }
}

/// The number of slots of a blind-rotation lookup table. A multiple of the
/// polynomial size; the quotient is the [`ExtendFactor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LookupTableSize(pub usize);

impl LookupTableSize {
    pub fn to_extend_factor(self, polynomial_size: PolynomialSize) -> ExtendFactor {
        debug_assert!(self.0 % polynomial_size.0 == 0);
        ExtendFactor(self.0 / polynomial_size.0)
    }
}

/// The number of degree-N polynomials interleaved to represent one extended
/// lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtendFactor(pub usize);

/// The size of the contiguous blocks of the block-binary LWE secret key; each
/// block contains exactly one coefficient equal to one. A block size of one
/// is the plain uniform-binary distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockSize(pub usize);

/// The number of blocks of a block-binary LWE secret key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockCount(pub usize);

/// The modulus of the messages carried by the ciphertexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageModulus(pub u64);

impl MessageModulus {
    pub fn log2(self) -> usize {
        debug_assert!(self.0.is_power_of_two());
        self.0.ilog2() as usize
    }
}

/// The logarithm of the base of a gadget decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DecompositionBaseLog(pub usize);

/// The number of levels of a gadget decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DecompositionLevelCount(pub usize);

/// The level of a single term of a gadget decomposition, from 1 (coarsest)
/// to the level count (finest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DecompositionLevel(pub usize);

/// The degree of a monomial $X^d$ of the ring, reduced modulo $2N$ by the
/// negacyclic convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonomialDegree(pub usize);

/// The order in which the two halves of a programmable bootstrap are chained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootstrapOrder {
    /// KeySwitch, then BlindRotate, then SampleExtract. LWE keys and
    /// ciphertexts have the size of the flattened GLWE key. The only order
    /// under which public-key encryption is available.
    #[default]
    KeySwitchBlindRotate,
    /// BlindRotate, then SampleExtract, then KeySwitch. LWE keys and
    /// ciphertexts have the size of the LWE key.
    BlindRotateKeySwitch,
}

impl BootstrapOrder {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            Self::KeySwitchBlindRotate => 0,
            Self::BlindRotateKeySwitch => 1,
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::KeySwitchBlindRotate),
            1 => Some(Self::BlindRotateKeySwitch),
            _ => None,
        }
    }
}
