//! Blind-rotation keys: one GGSW encryption of each LWE secret key
//! coefficient under the GLWE key.
//!
//! The key is generated and serialized in the standard domain; evaluators
//! convert it once to the Fourier domain at construction.

use crate::commons::numeric::Numeric;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, FourierPolynomialSize, GlweSize, LweDimension,
    PolynomialSize,
};
use crate::commons::torus::UnsignedTorus;
use crate::entities::fourier_ggsw_ciphertext::{
    fourier_ggsw_ciphertext_size, FourierGgswCiphertext, FourierGgswCiphertextView,
};
use crate::entities::ggsw_ciphertext::{
    ggsw_ciphertext_size, GgswCiphertext, GgswCiphertextMutView, GgswCiphertextView,
};
use crate::entities::lwe_keyswitch_key::LweKeyswitchKey;
use crate::fft::FftView;
use aligned_vec::{avec, ABox};
use dyn_stack::PodStack;
use serde::{Deserialize, Serialize};
use tfhe_fft::c64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindRotateKey<Scalar> {
    data: Vec<Scalar>,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
}

impl<Scalar: Numeric> BlindRotateKey<Scalar> {
    pub fn new(
        input_lwe_dimension: LweDimension,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        Self {
            data: vec![
                Scalar::ZERO;
                input_lwe_dimension.0
                    * ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count)
            ],
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
        }
    }
}

impl<Scalar> BlindRotateKey<Scalar> {
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
        self.decomposition_level_count
    }

    pub fn ggsw_len(&self) -> usize {
        ggsw_ciphertext_size(
            self.glwe_size,
            self.polynomial_size,
            self.decomposition_level_count,
        )
    }

    pub fn input_lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.len() / self.ggsw_len())
    }

    pub fn get_ggsw(&self, index: usize) -> GgswCiphertextView<'_, Scalar> {
        let len = self.ggsw_len();
        GgswCiphertext::from_container(
            &self.data[index * len..(index + 1) * len],
            self.glwe_size,
            self.polynomial_size,
            self.decomposition_base_log,
        )
    }

    pub fn get_mut_ggsw(&mut self, index: usize) -> GgswCiphertextMutView<'_, Scalar> {
        let len = self.ggsw_len();
        GgswCiphertext::from_container(
            &mut self.data[index * len..(index + 1) * len],
            self.glwe_size,
            self.polynomial_size,
            self.decomposition_base_log,
        )
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Scalar] {
        &mut self.data
    }
}

/// A blind-rotation key converted to the Fourier domain, the form used
/// during evaluation.
#[derive(Clone, Debug)]
pub struct FourierBlindRotateKey {
    data: ABox<[c64]>,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
}

impl FourierBlindRotateKey {
    pub fn new(
        input_lwe_dimension: LweDimension,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        Self {
            data: avec![
                c64::default();
                input_lwe_dimension.0
                    * fourier_ggsw_ciphertext_size(
                        glwe_size,
                        polynomial_size.to_fourier_polynomial_size(),
                        decomposition_level_count
                    )
            ]
            .into_boxed_slice(),
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
        }
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.glwe_size
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn fourier_polynomial_size(&self) -> FourierPolynomialSize {
        self.polynomial_size.to_fourier_polynomial_size()
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.decomposition_level_count
    }

    fn ggsw_len(&self) -> usize {
        fourier_ggsw_ciphertext_size(
            self.glwe_size,
            self.fourier_polynomial_size(),
            self.decomposition_level_count,
        )
    }

    pub fn input_lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.len() / self.ggsw_len())
    }

    pub fn get_ggsw(&self, index: usize) -> FourierGgswCiphertextView<'_> {
        let len = self.ggsw_len();
        FourierGgswCiphertext::from_container(
            &self.data[index * len..(index + 1) * len],
            self.glwe_size,
            self.fourier_polynomial_size(),
            self.decomposition_base_log,
        )
    }

    /// Fill this key with the Fourier transform of a standard-domain key.
    pub fn fill_with_forward_fourier<Scalar: UnsignedTorus>(
        &mut self,
        standard: &BlindRotateKey<Scalar>,
        fft: FftView<'_>,
        stack: &mut PodStack,
    ) {
        assert_eq!(self.input_lwe_dimension(), standard.input_lwe_dimension());
        let ggsw_len = self.ggsw_len();
        for index in 0..standard.input_lwe_dimension().0 {
            let standard_ggsw = standard.get_ggsw(index);
            let mut fourier_ggsw = FourierGgswCiphertext::from_container(
                &mut self.data[index * ggsw_len..(index + 1) * ggsw_len],
                self.glwe_size,
                self.polynomial_size.to_fourier_polynomial_size(),
                self.decomposition_base_log,
            );
            fourier_ggsw.fill_with_forward_fourier(&standard_ggsw, fft, stack);
        }
    }
}

/// The material a server needs to bootstrap: the blind-rotation key and the
/// key-switch key, both in the standard domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationKey<Scalar> {
    pub blind_rotate_key: BlindRotateKey<Scalar>,
    pub keyswitch_key: LweKeyswitchKey<Scalar>,
}
