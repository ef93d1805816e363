//! Server-side evaluation: modulus switch, key switch, blind rotation and
//! the bootstrap orchestrators.
//!
//! An [`Evaluator`] owns every scratch buffer used during a bootstrap and is
//! strictly single-threaded; [`Evaluator::shallow_copy`] yields an
//! independent instance sharing the (immutable) evaluation keys.

mod blind_rotate;
mod bootstrap;

use crate::algorithms::slice_algorithms::{
    slice_wrapping_add_assign, slice_wrapping_sub_scalar_mul_assign,
};
use crate::commons::computation_buffers::ComputationBuffers;
use crate::commons::math::decomposition::SignedDecomposer;
use crate::commons::numeric::CastInto;
use crate::commons::torus::UnsignedTorus;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::blind_rotate_key::{EvaluationKey, FourierBlindRotateKey};
use crate::entities::glwe_ciphertext::{GlweCiphertext, GlweCiphertextOwned};
use crate::entities::lookup_table::LookupTable;
use crate::entities::lwe_ciphertext::{LweCiphertext, LweCiphertextOwned};
use crate::entities::lwe_keyswitch_key::LweKeyswitchKey;
use crate::entities::polynomial::PolynomialOwned;
use crate::entities::fourier_glwe_ciphertext::FourierGlweCiphertextOwned;
use crate::fft::{Fft, FourierPolynomialOwned};
use crate::parameters::Parameters;
use std::sync::Arc;

/// Per-instance scratch of an evaluator. Sized once from the parameters;
/// the extended buffers hold one entry per lookup-table slot.
pub(crate) struct EvaluatorBuffers<Scalar> {
    /// Standard-domain accumulator, one GLWE per ring slot. Slot 0 carries
    /// the result after the last block.
    pub(crate) ct_acc: Vec<GlweCiphertextOwned<Scalar>>,
    /// Fourier-domain accumulator of the running block.
    pub(crate) ct_fourier_acc: Vec<FourierGlweCiphertextOwned>,
    /// Output of the gadget/external product of the current CMUX.
    pub(crate) ct_block_fourier_acc: Vec<FourierGlweCiphertextOwned>,
    /// Gadget decomposition of the accumulator, in the Fourier domain:
    /// `[slot][polynomial][level]`.
    pub(crate) ct_acc_fourier_decomposed: Vec<Vec<Vec<FourierPolynomialOwned>>>,
    /// Fourier image of the current monomial mask.
    pub(crate) f_mono: FourierPolynomialOwned,
    /// Coefficient-domain staging for the monomial masks.
    pub(crate) mono_poly: PolynomialOwned<Scalar>,
    /// Digit polynomials of the gadget decomposition.
    pub(crate) poly_decomposed: Vec<PolynomialOwned<Scalar>>,
    /// Digits of the key-switch decomposition.
    pub(crate) scalar_decomposed: Vec<Scalar>,
    /// Mod-switched rotation indices of the ciphertext being rotated.
    pub(crate) switched: Vec<usize>,
    /// GLWE accumulator of the full-domain orchestrators.
    pub(crate) ct_rotate: GlweCiphertextOwned<Scalar>,
    /// Sample-extract output, under the flattened GLWE key.
    pub(crate) ct_extract: LweCiphertextOwned<Scalar>,
    /// Key-switch output, under the LWE key.
    pub(crate) ct_keyswitch: LweCiphertextOwned<Scalar>,
    pub(crate) computation_buffers: ComputationBuffers,
}

impl<Scalar: UnsignedTorus> EvaluatorBuffers<Scalar> {
    fn new(parameters: &Parameters<Scalar>, fft: &Fft) -> Self {
        let extend_factor = parameters.extend_factor().0;
        let glwe_size = parameters.glwe_size();
        let polynomial_size = parameters.polynomial_size();
        let fourier_size = polynomial_size.to_fourier_polynomial_size();
        let br_level = parameters.blind_rotate_parameters().level().0;
        let ks_level = parameters.keyswitch_parameters().level().0;

        let mut computation_buffers = ComputationBuffers::new();
        let fft_view = fft.as_view();
        computation_buffers.resize(
            fft_view
                .forward_scratch()
                .and(fft_view.backward_scratch())
                .unaligned_bytes_required(),
        );

        Self {
            ct_acc: (0..extend_factor)
                .map(|_| GlweCiphertextOwned::new(glwe_size, polynomial_size))
                .collect(),
            ct_fourier_acc: (0..extend_factor)
                .map(|_| FourierGlweCiphertextOwned::new(glwe_size, fourier_size))
                .collect(),
            ct_block_fourier_acc: (0..extend_factor)
                .map(|_| FourierGlweCiphertextOwned::new(glwe_size, fourier_size))
                .collect(),
            ct_acc_fourier_decomposed: (0..extend_factor)
                .map(|_| {
                    (0..glwe_size.0)
                        .map(|_| {
                            (0..br_level)
                                .map(|_| FourierPolynomialOwned::new(fourier_size))
                                .collect()
                        })
                        .collect()
                })
                .collect(),
            f_mono: FourierPolynomialOwned::new(fourier_size),
            mono_poly: PolynomialOwned::new(polynomial_size),
            poly_decomposed: (0..br_level)
                .map(|_| PolynomialOwned::new(polynomial_size))
                .collect(),
            scalar_decomposed: vec![Scalar::ZERO; ks_level],
            switched: vec![0; parameters.lwe_dimension().0 + 1],
            ct_rotate: GlweCiphertextOwned::new(glwe_size, polynomial_size),
            ct_extract: LweCiphertextOwned::new(parameters.large_lwe_dimension().to_lwe_size()),
            ct_keyswitch: LweCiphertextOwned::new(parameters.lwe_dimension().to_lwe_size()),
            computation_buffers,
        }
    }
}

/// Evaluates bootstraps over LWE ciphertexts. Not safe for concurrent use;
/// see [`Evaluator::shallow_copy`].
pub struct Evaluator<Scalar: UnsignedTorus> {
    pub parameters: Parameters<Scalar>,
    pub(crate) blind_rotate_key: Arc<FourierBlindRotateKey>,
    pub(crate) keyswitch_key: Arc<LweKeyswitchKey<Scalar>>,
    pub(crate) fft: Fft,
    pub(crate) blind_rotate_decomposer: SignedDecomposer<Scalar>,
    pub(crate) keyswitch_decomposer: SignedDecomposer<Scalar>,
    mod_switch_constant: f64,
    pub(crate) buffers: EvaluatorBuffers<Scalar>,
}

impl<Scalar: UnsignedTorus> Evaluator<Scalar> {
    /// Create an evaluator from an evaluation key, converting the
    /// blind-rotation key to the Fourier domain.
    pub fn new(parameters: Parameters<Scalar>, evaluation_key: &EvaluationKey<Scalar>) -> Self {
        let brk = &evaluation_key.blind_rotate_key;
        assert_eq!(
            brk.input_lwe_dimension(),
            parameters.lwe_dimension(),
            "Mismatched blind-rotate key: input LweDimension {:?}, parameters expect {:?}",
            brk.input_lwe_dimension(),
            parameters.lwe_dimension(),
        );
        assert_eq!(brk.polynomial_size(), parameters.polynomial_size());
        assert_eq!(brk.glwe_size(), parameters.glwe_size());

        let fft = Fft::new(parameters.polynomial_size());
        let mut computation_buffers = ComputationBuffers::new();
        computation_buffers.resize(fft.as_view().forward_scratch().unaligned_bytes_required());
        let mut fourier_brk = FourierBlindRotateKey::new(
            brk.input_lwe_dimension(),
            brk.glwe_size(),
            brk.polynomial_size(),
            brk.decomposition_base_log(),
            brk.decomposition_level_count(),
        );
        fourier_brk.fill_with_forward_fourier(brk, fft.as_view(), computation_buffers.stack());

        let buffers = EvaluatorBuffers::new(&parameters, &fft);

        Self {
            parameters,
            blind_rotate_key: Arc::new(fourier_brk),
            keyswitch_key: Arc::new(evaluation_key.keyswitch_key.clone()),
            fft,
            blind_rotate_decomposer: SignedDecomposer::new(
                parameters.blind_rotate_parameters().base_log(),
                parameters.blind_rotate_parameters().level(),
            ),
            keyswitch_decomposer: SignedDecomposer::new(
                parameters.keyswitch_parameters().base_log(),
                parameters.keyswitch_parameters().level(),
            ),
            mod_switch_constant: parameters.mod_switch_constant(),
            buffers,
        }
    }

    /// Create the evaluator of hierarchy level `depth`: the parameters are
    /// halved `depth` times to match the keys of that level's encryptor.
    pub fn new_hierarchy(
        parameters: Parameters<Scalar>,
        evaluation_key: &EvaluationKey<Scalar>,
        depth: usize,
    ) -> Self {
        Self::new(parameters.at_depth(depth), evaluation_key)
    }

    /// An independent evaluator sharing the same evaluation keys, with its
    /// own scratch.
    pub fn shallow_copy(&self) -> Self {
        Self {
            parameters: self.parameters,
            blind_rotate_key: Arc::clone(&self.blind_rotate_key),
            keyswitch_key: Arc::clone(&self.keyswitch_key),
            fft: self.fft.clone(),
            blind_rotate_decomposer: self.blind_rotate_decomposer,
            keyswitch_decomposer: self.keyswitch_decomposer,
            mod_switch_constant: self.mod_switch_constant,
            buffers: EvaluatorBuffers::new(&self.parameters, &self.fft),
        }
    }

    /// The base modulus-switch constant `L / Q`.
    pub fn mod_switch_constant(&self) -> f64 {
        self.mod_switch_constant
    }

    /// Discretise `x` to a rotation index modulo `2L`, recursive-variant
    /// rounding.
    pub fn mod_switch(&self, x: Scalar) -> usize {
        mod_switch_round(x, self.mod_switch_constant, false)
            % (2 * self.parameters.lookup_table_size().0)
    }

    /// Discretise `x` to a rotation index modulo `2L`, classical rounding
    /// (doubled constant).
    pub fn mod_switch_original(&self, x: Scalar) -> usize {
        mod_switch_round(x, 2.0 * self.mod_switch_constant, false)
            % (2 * self.parameters.lookup_table_size().0)
    }

    /// Discretise `x` for a compression-table rotation: round at table
    /// precision, then double, modulo `2N`.
    pub fn mod_switch_compress(&self, x: Scalar) -> usize {
        mod_switch_round(x, self.mod_switch_constant, true)
            % (2 * self.parameters.polynomial_size().0)
    }

    /// Discretise `x` for a base-table rotation, modulo `2N`.
    pub fn mod_switch_to_base(&self, x: Scalar) -> usize {
        let extend_factor = self.parameters.extend_factor().0 as f64;
        mod_switch_round(x, 2.0 * self.mod_switch_constant / extend_factor, false)
            % (2 * self.parameters.polynomial_size().0)
    }

    /// Discretise `x` with a caller-supplied constant, modulo `2L`.
    pub fn mod_switch_with_constant(&self, x: Scalar, constant: f64) -> usize {
        mod_switch_round(x, constant, false) % (2 * self.parameters.lookup_table_size().0)
    }

    /// Key-switch a ciphertext under the flattened GLWE key down to the LWE
    /// key: the shared prefix is copied, the trailing coordinates are
    /// decomposed against the key-switch key. Residual mask entries of the
    /// output are fully rewritten.
    pub fn keyswitch_for_bootstrap_assign<InputCont, OutputCont>(
        &mut self,
        ct: &LweCiphertext<InputCont>,
        ct_out: &mut LweCiphertext<OutputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        keyswitch_assign(
            &self.keyswitch_key,
            &self.keyswitch_decomposer,
            &mut self.buffers.scalar_decomposed,
            ct.as_ref(),
            ct_out.as_mut(),
        );
    }

    /// `ct_out += ct`, coordinate-wise.
    pub fn add_lwe_ciphertext_assign<InputCont, OutputCont>(
        &self,
        ct_out: &mut LweCiphertext<OutputCont>,
        ct: &LweCiphertext<InputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        slice_wrapping_add_assign(ct_out.as_mut(), ct.as_ref());
    }

    /// `ct_out += ct`, polynomial-wise.
    pub fn add_glwe_ciphertext_assign<InputCont, OutputCont>(
        &self,
        ct_out: &mut GlweCiphertext<OutputCont>,
        ct: &GlweCiphertext<InputCont>,
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        slice_wrapping_add_assign(ct_out.as_mut(), ct.as_ref());
    }

    /// Allocate the lookup table matching these parameters.
    pub fn new_lookup_table(&self) -> LookupTable<Scalar> {
        LookupTable::new(&self.parameters)
    }
}

/// `round(constant * x)`, optionally doubled after rounding. Ties round to
/// even.
#[inline]
pub(crate) fn mod_switch_round<Scalar: UnsignedTorus>(
    x: Scalar,
    constant: f64,
    double_after_rounding: bool,
) -> usize {
    let x: f64 = x.cast_into();
    let rounded = (constant * x).round_ties_even() as usize;
    if double_after_rounding {
        rounded * 2
    } else {
        rounded
    }
}

/// The key-switch core, operating on raw slices so the callers can mix
/// evaluator-owned and caller-owned buffers.
pub(crate) fn keyswitch_assign<Scalar: UnsignedTorus>(
    keyswitch_key: &LweKeyswitchKey<Scalar>,
    decomposer: &SignedDecomposer<Scalar>,
    scalar_decomposed: &mut [Scalar],
    ct: &[Scalar],
    ct_out: &mut [Scalar],
) {
    let output_lwe_dimension = keyswitch_key.output_lwe_size().to_lwe_dimension().0;
    let input_lwe_dimension = ct.len() - 1;
    assert_eq!(ct_out.len(), output_lwe_dimension + 1);
    assert_eq!(
        input_lwe_dimension,
        output_lwe_dimension + keyswitch_key.input_lwe_dimension().0,
        "Mismatched keyswitch input: ciphertext LweDimension {input_lwe_dimension}, \
        key expects {}",
        output_lwe_dimension + keyswitch_key.input_lwe_dimension().0,
    );

    // shared key prefix: mask copied verbatim, body carried over
    ct_out[..output_lwe_dimension].copy_from_slice(&ct[..output_lwe_dimension]);
    *ct_out.last_mut().unwrap() = *ct.last().unwrap();

    for (index, &mask_element) in ct[output_lwe_dimension..input_lwe_dimension]
        .iter()
        .enumerate()
    {
        decomposer.decompose_scalar_assign(mask_element, scalar_decomposed);
        for (level, &digit) in scalar_decomposed.iter().enumerate() {
            slice_wrapping_sub_scalar_mul_assign(
                ct_out,
                keyswitch_key.get_row(index, level).as_ref(),
                digit,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::parameters::{
        BlockSize, BootstrapOrder, DecompositionLevelCount, GlweDimension, LookupTableSize,
        LweDimension, MessageModulus, PolynomialSize,
    };
    use crate::encryptor::Encryptor;
    use crate::parameters::{GadgetParametersLiteral, ParametersLiteral};

    fn toy_parameters() -> Parameters<u64> {
        ParametersLiteral::<u64> {
            lwe_dimension: LweDimension(32),
            glwe_dimension: GlweDimension(1),
            polynomial_size: PolynomialSize(64),
            lookup_table_size: LookupTableSize(0),
            lwe_std_dev: StandardDev(2.0f64.powi(-40)),
            glwe_std_dev: StandardDev(2.0f64.powi(-45)),
            block_size: BlockSize(1),
            message_modulus: MessageModulus(1 << 2),
            blind_rotate_parameters: GadgetParametersLiteral {
                base: 1 << 12,
                level: DecompositionLevelCount(3),
            },
            keyswitch_parameters: GadgetParametersLiteral {
                base: 1 << 6,
                level: DecompositionLevelCount(4),
            },
            bootstrap_order: BootstrapOrder::KeySwitchBlindRotate,
        }
        .compile()
    }

    #[test]
    fn mod_switch_rounding_error_is_bounded() {
        let parameters = toy_parameters();
        let mut encryptor = Encryptor::new(parameters);
        let evaluator = Evaluator::new(parameters, &encryptor.gen_evaluation_key());

        let lut_size = parameters.lookup_table_size().0;
        let constant = evaluator.mod_switch_constant();
        for x in (0..64u64).map(|i| i.wrapping_mul(0x3333_3333_3333_3333)) {
            let switched = evaluator.mod_switch(x) as f64;
            let exact = (constant * x as f64) % (2 * lut_size) as f64;
            let distance = (switched - exact).abs();
            assert!(distance <= 1.0 || distance >= (2 * lut_size) as f64 - 1.0);

            let switched = evaluator.mod_switch_original(x) as f64;
            let exact = (2.0 * constant * x as f64) % (2 * lut_size) as f64;
            let distance = (switched - exact).abs();
            assert!(distance <= 1.0 || distance >= (2 * lut_size) as f64 - 1.0);

            let switched = evaluator.mod_switch_compress(x) as f64;
            let exact =
                (2.0 * constant * x as f64) % (2 * parameters.polynomial_size().0) as f64;
            let distance = (switched - exact).abs();
            assert!(
                distance <= 2.0
                    || distance >= (2 * parameters.polynomial_size().0) as f64 - 2.0
            );
        }
    }

    #[test]
    fn blind_rotation_evaluates_the_codeword() {
        let parameters = toy_parameters();
        let mut encryptor = Encryptor::new(parameters);
        let mut evaluator = Evaluator::new(parameters, &encryptor.gen_evaluation_key());

        let lut = crate::algorithms::lookup_table_generation::generate_lookup_table(
            &parameters,
            |x| (x + 1) % 4,
        );

        for message in 0..parameters.message_modulus().0 / 2 {
            let ct = encryptor.encrypt_lwe(message);
            let mut switched =
                LweCiphertextOwned::<u64>::new(parameters.lwe_dimension().to_lwe_size());
            evaluator.keyswitch_for_bootstrap_assign(&ct, &mut switched);

            let mut rotated = crate::entities::glwe_ciphertext::GlweCiphertextOwned::<u64>::new(
                parameters.glwe_size(),
                parameters.polynomial_size(),
            );
            evaluator.blind_rotate_assign(&switched, &lut, &mut rotated);

            let mut extracted = LweCiphertextOwned::<u64>::new(
                parameters.large_lwe_dimension().to_lwe_size(),
            );
            crate::algorithms::glwe_sample_extraction::extract_lwe_sample_from_glwe_ciphertext(
                &rotated,
                &mut extracted,
                crate::commons::parameters::MonomialDegree(0),
            );
            assert_eq!(encryptor.decrypt_lwe(&extracted), (message + 1) % 4);
        }
    }

    #[test]
    fn bootstrap_func_refreshes_and_evaluates() {
        let parameters = toy_parameters();
        let mut encryptor = Encryptor::new(parameters);
        let mut evaluator = Evaluator::new(parameters, &encryptor.gen_evaluation_key());

        for message in 0..parameters.message_modulus().0 / 2 {
            let ct = encryptor.encrypt_lwe(message);
            let ct_out = evaluator.bootstrap_func(&ct, |x| (3 * x) % 4);
            assert_eq!(encryptor.decrypt_lwe(&ct_out), (3 * message) % 4);
        }
    }

    #[test]
    fn keyswitch_preserves_the_plaintext() {
        let parameters = toy_parameters();
        let mut encryptor = Encryptor::new(parameters);
        let mut evaluator = Evaluator::new(parameters, &encryptor.gen_evaluation_key());

        for message in 0..parameters.message_modulus().0 {
            // fresh ciphertexts are under the large key; switch down to the
            // LWE key and decrypt there
            let ct = encryptor.encrypt_lwe(message);
            let mut switched =
                LweCiphertextOwned::<u64>::new(parameters.lwe_dimension().to_lwe_size());
            evaluator.keyswitch_for_bootstrap_assign(&ct, &mut switched);

            let lwe_key = encryptor.secret_key.lwe_secret_key();
            let phase = switched.get_body().wrapping_sub(
                crate::algorithms::slice_algorithms::slice_wrapping_dot_product(
                    switched.get_mask(),
                    lwe_key.as_ref(),
                ),
            );
            assert_eq!(parameters.decode(phase), message);
        }
    }
}
