//! Generation of the evaluation keys: the blind-rotation key (one GGSW per
//! LWE key bit) and the key-switch key (gadget LWE rows for the trailing
//! large-key coordinates).
//!
//! The parallel drivers fan the per-row jobs out with rayon: every job reads
//! its row index from the iterator item, uses worker-local scratch and a
//! CSPRNG stream derived from a pre-drawn per-row seed, and writes a
//! disjoint slice of the output key.

use crate::algorithms::polynomial_algorithms::polynomial_wrapping_scalar_mul;
use crate::algorithms::slice_algorithms::{
    slice_wrapping_dot_product, slice_wrapping_opposite_assign,
};
use crate::commons::math::random::{ActivatedRandomGenerator, RandomGenerator, Seed};
use crate::commons::numeric::UnsignedInteger;
use crate::commons::torus::UnsignedTorus;
use crate::commons::traits::ContainerMut;
use crate::encryptor::{encrypt_glwe_body_assign, EncryptionScratch, Encryptor};
use crate::entities::blind_rotate_key::{BlindRotateKey, EvaluationKey};
use crate::entities::ggsw_ciphertext::GgswCiphertext;
use crate::entities::lwe_ciphertext::LweCiphertext;
use crate::entities::lwe_keyswitch_key::LweKeyswitchKey;
use crate::entities::polynomial::PolynomialOwned;
use crate::entities::secret_key::SecretKey;
use crate::fft::{FftView, FourierPolynomialOwned};
use crate::parameters::Parameters;
use rayon::prelude::*;

impl<Scalar: UnsignedTorus> Encryptor<Scalar> {
    /// Sample a new evaluation key for bootstrapping.
    ///
    /// This can take a long time; prefer
    /// [`Encryptor::gen_evaluation_key_parallel`].
    pub fn gen_evaluation_key(&mut self) -> EvaluationKey<Scalar> {
        EvaluationKey {
            blind_rotate_key: self.gen_blind_rotate_key(),
            keyswitch_key: self.gen_keyswitch_key(),
        }
    }

    /// Sample a new evaluation key for bootstrapping, in parallel.
    pub fn gen_evaluation_key_parallel(&mut self) -> EvaluationKey<Scalar> {
        EvaluationKey {
            blind_rotate_key: self.gen_blind_rotate_key_parallel(),
            keyswitch_key: self.gen_keyswitch_key_parallel(),
        }
    }

    /// Encrypt every LWE key bit as a GGSW under the GLWE key.
    pub fn gen_blind_rotate_key(&mut self) -> BlindRotateKey<Scalar> {
        let parameters = self.parameters;
        let mut brk = new_blind_rotate_key(&parameters);

        for index in 0..parameters.lwe_dimension().0 {
            let mut ggsw = brk.get_mut_ggsw(index);
            encrypt_ggsw_of_key_bit(
                &parameters,
                &self.secret_key,
                &self.fourier_glwe_key,
                index,
                self.fft.as_view(),
                &mut self.scratch,
                &mut self.encryption_generator,
                &mut ggsw,
            );
        }

        brk
    }

    /// Parallel variant of [`Encryptor::gen_blind_rotate_key`].
    pub fn gen_blind_rotate_key_parallel(&mut self) -> BlindRotateKey<Scalar> {
        let parameters = self.parameters;
        let secret_key = self.secret_key.clone();
        let fourier_glwe_key = &self.fourier_glwe_key;
        let fft = &self.fft;

        let seeds: Vec<Seed> = (0..parameters.lwe_dimension().0)
            .map(|_| self.seeder.seed())
            .collect();

        let mut brk = new_blind_rotate_key(&parameters);
        let ggsw_len = brk.ggsw_len();
        let glwe_size = parameters.glwe_size();
        let polynomial_size = parameters.polynomial_size();
        let base_log = parameters.blind_rotate_parameters().base_log();

        brk.as_mut_slice()
            .par_chunks_exact_mut(ggsw_len)
            .zip_eq(seeds.par_iter())
            .enumerate()
            .for_each_init(
                || EncryptionScratch::new(polynomial_size, fft.as_view()),
                |scratch, (index, (chunk, &seed))| {
                    let mut generator = RandomGenerator::<ActivatedRandomGenerator>::new(seed);
                    let mut ggsw =
                        GgswCiphertext::from_container(chunk, glwe_size, polynomial_size, base_log);
                    encrypt_ggsw_of_key_bit(
                        &parameters,
                        &secret_key,
                        fourier_glwe_key,
                        index,
                        fft.as_view(),
                        scratch,
                        &mut generator,
                        &mut ggsw,
                    );
                },
            );

        brk
    }

    /// Sample the key-switch key from the trailing large-key coordinates to
    /// the LWE key.
    pub fn gen_keyswitch_key(&mut self) -> LweKeyswitchKey<Scalar> {
        let parameters = self.parameters;
        let mut ksk = new_keyswitch_key(&parameters);

        for index in 0..ksk.input_lwe_dimension().0 {
            for level in 0..parameters.keyswitch_parameters().level().0 {
                let mut row = ksk.get_mut_row(index, level);
                encrypt_keyswitch_row(
                    &parameters,
                    &self.secret_key,
                    index,
                    level,
                    &mut self.encryption_generator,
                    &mut row,
                );
            }
        }

        ksk
    }

    /// Parallel variant of [`Encryptor::gen_keyswitch_key`].
    pub fn gen_keyswitch_key_parallel(&mut self) -> LweKeyswitchKey<Scalar> {
        let parameters = self.parameters;
        let secret_key = self.secret_key.clone();

        let mut ksk = new_keyswitch_key(&parameters);
        let input_dimension = ksk.input_lwe_dimension().0;
        let level_count = parameters.keyswitch_parameters().level().0;
        let row_len = ksk.row_len();

        let seeds: Vec<Seed> = (0..input_dimension).map(|_| self.seeder.seed()).collect();

        ksk.as_mut_slice()
            .par_chunks_exact_mut(row_len)
            .zip_eq(seeds.par_iter())
            .enumerate()
            .for_each(|(index, (rows, &seed))| {
                let mut generator = RandomGenerator::<ActivatedRandomGenerator>::new(seed);
                for (level, row) in rows.chunks_exact_mut(row_len / level_count).enumerate() {
                    let mut row = LweCiphertext::from_container(row);
                    encrypt_keyswitch_row(
                        &parameters,
                        &secret_key,
                        index,
                        level,
                        &mut generator,
                        &mut row,
                    );
                }
            });

        ksk
    }
}

fn new_blind_rotate_key<Scalar: UnsignedTorus>(
    parameters: &Parameters<Scalar>,
) -> BlindRotateKey<Scalar> {
    BlindRotateKey::new(
        parameters.lwe_dimension(),
        parameters.glwe_size(),
        parameters.polynomial_size(),
        parameters.blind_rotate_parameters().base_log(),
        parameters.blind_rotate_parameters().level(),
    )
}

fn new_keyswitch_key<Scalar: UnsignedTorus>(
    parameters: &Parameters<Scalar>,
) -> LweKeyswitchKey<Scalar> {
    LweKeyswitchKey::new(
        crate::commons::parameters::LweDimension(
            parameters.large_lwe_dimension().0 - parameters.lwe_dimension().0,
        ),
        parameters.lwe_dimension(),
        parameters.keyswitch_parameters().base_log(),
        parameters.keyswitch_parameters().level(),
    )
}

/// Encrypt LWE key bit `index` as a GGSW: for each level `l`, one GLWE row
/// per mask polynomial holding `-s_j * s_i * Q/B^(l+1)` and a body row
/// holding `s_i * Q/B^(l+1)`.
#[allow(clippy::too_many_arguments)]
fn encrypt_ggsw_of_key_bit<Scalar, C>(
    parameters: &Parameters<Scalar>,
    secret_key: &SecretKey<Scalar>,
    fourier_glwe_key: &[FourierPolynomialOwned],
    index: usize,
    fft: FftView<'_>,
    scratch: &mut EncryptionScratch<Scalar>,
    generator: &mut RandomGenerator<ActivatedRandomGenerator>,
    ggsw: &mut GgswCiphertext<C>,
) where
    Scalar: UnsignedTorus,
    C: ContainerMut<Element = Scalar>,
{
    let key_bit = secret_key.lwe_secret_key().as_ref()[index];
    let glwe_dimension = parameters.glwe_dimension().0;
    let level_count = parameters.blind_rotate_parameters().level().0;
    let mut plaintext = PolynomialOwned::<Scalar>::new(parameters.polynomial_size());

    for level in 0..level_count {
        let factor = key_bit.wrapping_mul(parameters.blind_rotate_parameters().base_q(level));

        for row in 0..glwe_dimension {
            let glwe_key = secret_key.glwe_secret_key();
            polynomial_wrapping_scalar_mul(&mut plaintext, &glwe_key.get_polynomial(row), factor);
            slice_wrapping_opposite_assign(plaintext.as_mut());

            let mut glwe_row = ggsw.get_mut_row(level, row);
            glwe_row.fill_with_zero();
            glwe_row
                .get_mut_body()
                .as_mut()
                .copy_from_slice(plaintext.as_ref());
            encrypt_glwe_body_assign(
                fourier_glwe_key,
                parameters.glwe_std_dev(),
                fft,
                scratch,
                generator,
                &mut glwe_row,
            );
        }

        let mut body_row = ggsw.get_mut_row(level, glwe_dimension);
        body_row.fill_with_zero();
        body_row.get_mut_body().as_mut()[0] = factor;
        encrypt_glwe_body_assign(
            fourier_glwe_key,
            parameters.glwe_std_dev(),
            fft,
            scratch,
            generator,
            &mut body_row,
        );
    }
}

/// Encrypt trailing large-key coordinate `index` at gadget level `level`
/// under the LWE key.
fn encrypt_keyswitch_row<Scalar, C>(
    parameters: &Parameters<Scalar>,
    secret_key: &SecretKey<Scalar>,
    index: usize,
    level: usize,
    generator: &mut RandomGenerator<ActivatedRandomGenerator>,
    row: &mut LweCiphertext<C>,
) where
    Scalar: UnsignedTorus,
    C: ContainerMut<Element = Scalar>,
{
    let trailing_coefficient =
        secret_key.large_lwe_secret_key().as_ref()[parameters.lwe_dimension().0 + index];
    let plaintext =
        trailing_coefficient << parameters.keyswitch_parameters().log_base_q(level);

    let lwe_key = secret_key.lwe_secret_key();
    let noise: Scalar = generator.random_gaussian_torus(parameters.lwe_std_dev());

    let (mask, body) = row.get_mut_mask_and_body();
    generator.fill_slice_with_random_uniform(mask);
    *body = slice_wrapping_dot_product(mask, lwe_key.as_ref())
        .wrapping_add(plaintext)
        .wrapping_add(noise);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::parameters::{
        BlockSize, BootstrapOrder, DecompositionLevelCount, GlweDimension, LookupTableSize,
        LweDimension, MessageModulus, PolynomialSize,
    };
    use crate::parameters::{GadgetParametersLiteral, ParametersLiteral};

    fn toy_parameters() -> Parameters<u64> {
        ParametersLiteral::<u64> {
            lwe_dimension: LweDimension(16),
            glwe_dimension: GlweDimension(1),
            polynomial_size: PolynomialSize(64),
            lookup_table_size: LookupTableSize(0),
            lwe_std_dev: StandardDev(2.0f64.powi(-40)),
            glwe_std_dev: StandardDev(2.0f64.powi(-45)),
            block_size: BlockSize(1),
            message_modulus: MessageModulus(1 << 3),
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
    fn keyswitch_rows_decrypt_to_gadget_scaled_key_bits() {
        let parameters = toy_parameters();
        let mut encryptor = Encryptor::new(parameters);
        let ksk = encryptor.gen_keyswitch_key();

        let lwe_key = encryptor.secret_key.lwe_secret_key();
        let large_key = encryptor.secret_key.large_lwe_secret_key();
        for index in 0..ksk.input_lwe_dimension().0 {
            for level in 0..parameters.keyswitch_parameters().level().0 {
                let row = ksk.get_row(index, level);
                let phase = row
                    .get_body()
                    .wrapping_sub(slice_wrapping_dot_product(row.get_mask(), lwe_key.as_ref()));
                let expected = large_key.as_ref()[parameters.lwe_dimension().0 + index]
                    << parameters.keyswitch_parameters().log_base_q(level);
                // the phase carries the plaintext plus a small gaussian error
                let error = phase.wrapping_sub(expected);
                let error = error.min(error.wrapping_neg());
                assert!(error < 1 << 30);
            }
        }
    }

    #[test]
    fn parallel_and_serial_keys_have_the_same_shape() {
        let parameters = toy_parameters();
        let mut encryptor = Encryptor::new(parameters);
        let serial = encryptor.gen_blind_rotate_key();
        let parallel = encryptor.gen_blind_rotate_key_parallel();
        assert_eq!(serial.input_lwe_dimension(), parallel.input_lwe_dimension());
        assert_eq!(serial.glwe_size(), parallel.glwe_size());

        let serial_ksk = encryptor.gen_keyswitch_key();
        let parallel_ksk = encryptor.gen_keyswitch_key_parallel();
        assert_eq!(
            serial_ksk.input_lwe_dimension(),
            parallel_ksk.input_lwe_dimension()
        );
    }
}
