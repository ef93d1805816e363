//! Client-side encryption: secret and public key generation, LWE/GLWE
//! encryption and decryption.
//!
//! An [`Encryptor`] owns its CSPRNG streams and scratch buffers and is not
//! safe for concurrent use; [`Encryptor::shallow_copy`] produces an
//! independent copy sharing the same (immutable) secret key.

use crate::algorithms::polynomial_algorithms::polynomial_wrapping_add_assign;
use crate::algorithms::slice_algorithms::slice_wrapping_dot_product;
use crate::commons::computation_buffers::ComputationBuffers;
use crate::commons::dispersion::StandardDev;
use crate::commons::math::random::{ActivatedRandomGenerator, RandomGenerator, Seeder};
use crate::commons::numeric::UnsignedInteger;
use crate::commons::parameters::{BootstrapOrder, PolynomialSize};
use crate::commons::torus::UnsignedTorus;
use crate::commons::traits::ContainerMut;
use crate::entities::glwe_ciphertext::{GlweCiphertext, GlweCiphertextOwned};
use crate::entities::lwe_ciphertext::{LweCiphertext, LweCiphertextOwned};
use crate::entities::polynomial::{Polynomial, PolynomialOwned};
use crate::entities::public_key::PublicKey;
use crate::entities::secret_key::{LweSecretKey, SecretKey};
use crate::fft::{Fft, FftView, FourierPolynomialOwned};
use crate::parameters::Parameters;
use crate::seeders::new_seeder;

/// Per-instance scratch for the encryption primitives.
pub(crate) struct EncryptionScratch<Scalar> {
    mask_fourier: FourierPolynomialOwned,
    noise_poly: PolynomialOwned<Scalar>,
    tmp_poly: PolynomialOwned<Scalar>,
    computation_buffers: ComputationBuffers,
}

impl<Scalar: UnsignedTorus> EncryptionScratch<Scalar> {
    pub(crate) fn new(polynomial_size: PolynomialSize, fft: FftView<'_>) -> Self {
        let mut computation_buffers = ComputationBuffers::new();
        computation_buffers.resize(
            fft.forward_scratch()
                .and(fft.backward_scratch())
                .unaligned_bytes_required(),
        );
        Self {
            mask_fourier: FourierPolynomialOwned::new(polynomial_size.to_fourier_polynomial_size()),
            noise_poly: PolynomialOwned::new(polynomial_size),
            tmp_poly: PolynomialOwned::new(polynomial_size),
            computation_buffers,
        }
    }
}

/// Add `sum_j mask_j * key_j + e` to the body of `ct`, sampling a fresh
/// uniform mask. The body is expected to already hold the plaintext.
pub(crate) fn encrypt_glwe_body_assign<Scalar, C>(
    fourier_glwe_key: &[FourierPolynomialOwned],
    glwe_std_dev: StandardDev,
    fft: FftView<'_>,
    scratch: &mut EncryptionScratch<Scalar>,
    generator: &mut RandomGenerator<ActivatedRandomGenerator>,
    ct: &mut GlweCiphertext<C>,
) where
    Scalar: UnsignedTorus,
    C: ContainerMut<Element = Scalar>,
{
    let polynomial_size = ct.polynomial_size();
    let (mask, mut body) = ct.get_mut_mask_and_body();

    generator.fill_slice_with_random_uniform(mask);
    generator.fill_slice_with_random_gaussian_torus(glwe_std_dev, scratch.noise_poly.as_mut());
    polynomial_wrapping_add_assign(&mut body, &scratch.noise_poly);

    for (mask_poly, key_fourier) in mask.chunks_exact(polynomial_size.0).zip(fourier_glwe_key) {
        let mask_poly = Polynomial::from_container(mask_poly);
        let stack = scratch.computation_buffers.stack();
        fft.forward_as_torus(&mut scratch.mask_fourier, &mask_poly, stack);
        for (m, &k) in scratch
            .mask_fourier
            .data
            .iter_mut()
            .zip(key_fourier.data.as_ref())
        {
            *m *= k;
        }
        fft.add_backward_as_torus(&mut body, &scratch.mask_fourier, stack);
    }
}

pub(crate) fn compute_fourier_glwe_key<Scalar: UnsignedTorus>(
    secret_key: &SecretKey<Scalar>,
    fft: FftView<'_>,
    scratch: &mut EncryptionScratch<Scalar>,
) -> Vec<FourierPolynomialOwned> {
    let glwe_key = secret_key.glwe_secret_key();
    let fourier_size = glwe_key.polynomial_size().to_fourier_polynomial_size();
    (0..glwe_key.glwe_dimension().0)
        .map(|j| {
            let mut fourier = FourierPolynomialOwned::new(fourier_size);
            fft.forward_as_integer(
                &mut fourier,
                &glwe_key.get_polynomial(j),
                scratch.computation_buffers.stack(),
            );
            fourier
        })
        .collect()
}

/// Encrypts and decrypts plaintexts and ciphertexts. Meant to stay private:
/// only clients hold one.
pub struct Encryptor<Scalar: UnsignedTorus> {
    pub parameters: Parameters<Scalar>,
    pub secret_key: SecretKey<Scalar>,
    pub(crate) secret_generator: RandomGenerator<ActivatedRandomGenerator>,
    pub(crate) encryption_generator: RandomGenerator<ActivatedRandomGenerator>,
    pub(crate) seeder: Box<dyn Seeder>,
    pub(crate) fft: Fft,
    pub(crate) fourier_glwe_key: Vec<FourierPolynomialOwned>,
    pub(crate) scratch: EncryptionScratch<Scalar>,
}

impl<Scalar: UnsignedTorus> Encryptor<Scalar> {
    /// Create an encryptor with a freshly sampled secret key.
    pub fn new(parameters: Parameters<Scalar>) -> Self {
        let mut seeder = new_seeder();
        let mut secret_generator =
            RandomGenerator::<ActivatedRandomGenerator>::new(seeder.seed());

        let secret_key = gen_secret_key_with(&parameters, &mut secret_generator);

        Self::from_parts(parameters, secret_key, secret_generator, seeder)
    }

    /// Create an encryptor around an existing secret key. The key is shared,
    /// not copied.
    pub fn with_secret_key(parameters: Parameters<Scalar>, secret_key: SecretKey<Scalar>) -> Self {
        let mut seeder = new_seeder();
        let secret_generator = RandomGenerator::<ActivatedRandomGenerator>::new(seeder.seed());
        Self::from_parts(parameters, secret_key, secret_generator, seeder)
    }

    fn from_parts(
        parameters: Parameters<Scalar>,
        secret_key: SecretKey<Scalar>,
        secret_generator: RandomGenerator<ActivatedRandomGenerator>,
        mut seeder: Box<dyn Seeder>,
    ) -> Self {
        let encryption_generator =
            RandomGenerator::<ActivatedRandomGenerator>::new(seeder.seed());
        let fft = Fft::new(parameters.polynomial_size());
        let mut scratch = EncryptionScratch::new(parameters.polynomial_size(), fft.as_view());
        let fourier_glwe_key = compute_fourier_glwe_key(&secret_key, fft.as_view(), &mut scratch);
        Self {
            parameters,
            secret_key,
            secret_generator,
            encryption_generator,
            seeder,
            fft,
            fourier_glwe_key,
            scratch,
        }
    }

    /// Create the hierarchy of encryptors for the recursive full-domain
    /// evaluation: one per halving level, all sharing a prefix of the level-0
    /// secret key buffer.
    pub fn new_hierarchy(parameters: Parameters<Scalar>) -> Vec<Self> {
        let depth = parameters.hierarchy_depth();
        assert!(
            depth > 0,
            "The polynomial size {} leaves no room for a hierarchy",
            parameters.polynomial_size().0
        );

        let mut encryptors = Vec::with_capacity(depth);
        encryptors.push(Self::new(parameters.at_depth(1)));
        let root_key = encryptors[0].secret_key.clone();
        for level in 1..depth {
            let level_parameters = parameters.at_depth(level + 1);
            let level_key = root_key.at_params(&level_parameters);
            encryptors.push(Self::with_secret_key(level_parameters, level_key));
        }
        encryptors
    }

    /// An independent encryptor over the same secret key, with fresh CSPRNG
    /// streams and scratch.
    pub fn shallow_copy(&self) -> Self {
        Self::with_secret_key(self.parameters, self.secret_key.clone())
    }

    /// Sample a fresh secret key. The encryptor's own key is left unchanged.
    pub fn gen_secret_key(&mut self) -> SecretKey<Scalar> {
        gen_secret_key_with(&self.parameters, &mut self.secret_generator)
    }

    /// The LWE key fresh ciphertexts are encrypted under, as selected by the
    /// bootstrap order.
    pub fn default_lwe_secret_key(&self) -> LweSecretKey<&[Scalar]> {
        match self.parameters.bootstrap_order() {
            BootstrapOrder::KeySwitchBlindRotate => self.secret_key.large_lwe_secret_key(),
            BootstrapOrder::BlindRotateKeySwitch => self.secret_key.lwe_secret_key(),
        }
    }

    /// Encrypt a message as a fresh LWE ciphertext.
    pub fn encrypt_lwe(&mut self, message: u64) -> LweCiphertextOwned<Scalar> {
        let plaintext = self.parameters.encode(message);
        self.encrypt_lwe_plaintext(plaintext)
    }

    /// Encrypt an already-encoded plaintext as a fresh LWE ciphertext.
    pub fn encrypt_lwe_plaintext(&mut self, plaintext: Scalar) -> LweCiphertextOwned<Scalar> {
        let mut ct =
            LweCiphertextOwned::new(self.parameters.default_lwe_dimension().to_lwe_size());
        let std_dev = self.parameters.default_lwe_std_dev();

        let key = match self.parameters.bootstrap_order() {
            BootstrapOrder::KeySwitchBlindRotate => self.secret_key.large_lwe_secret_key(),
            BootstrapOrder::BlindRotateKeySwitch => self.secret_key.lwe_secret_key(),
        };

        let (mask, body) = ct.get_mut_mask_and_body();
        self.encryption_generator.fill_slice_with_random_uniform(mask);
        *body = slice_wrapping_dot_product(mask, key.as_ref())
            .wrapping_add(plaintext)
            .wrapping_add(self.encryption_generator.random_gaussian_torus(std_dev));

        ct
    }

    /// Decrypt an LWE ciphertext to its message.
    pub fn decrypt_lwe<C>(&self, ct: &LweCiphertext<C>) -> u64
    where
        C: crate::commons::traits::Container<Element = Scalar>,
    {
        self.parameters.decode(self.decrypt_lwe_plaintext(ct))
    }

    /// Decrypt an LWE ciphertext to its noisy phase.
    pub fn decrypt_lwe_plaintext<C>(&self, ct: &LweCiphertext<C>) -> Scalar
    where
        C: crate::commons::traits::Container<Element = Scalar>,
    {
        let key = match self.parameters.bootstrap_order() {
            BootstrapOrder::KeySwitchBlindRotate => self.secret_key.large_lwe_secret_key(),
            BootstrapOrder::BlindRotateKeySwitch => self.secret_key.lwe_secret_key(),
        };
        assert_eq!(ct.lwe_dimension(), key.lwe_dimension());
        ct.get_body()
            .wrapping_sub(slice_wrapping_dot_product(ct.get_mask(), key.as_ref()))
    }

    /// Add `sum_j mask_j * key_j + e` to the body of `ct` with a fresh mask;
    /// the body is expected to hold the plaintext polynomial.
    pub fn encrypt_glwe_body<C>(&mut self, ct: &mut GlweCiphertext<C>)
    where
        C: ContainerMut<Element = Scalar>,
    {
        encrypt_glwe_body_assign(
            &self.fourier_glwe_key,
            self.parameters.glwe_std_dev(),
            self.fft.as_view(),
            &mut self.scratch,
            &mut self.encryption_generator,
            ct,
        );
    }

    /// Sample a new public key.
    ///
    /// # Panics
    ///
    /// Panics when the parameters do not support public key encryption.
    pub fn gen_public_key(&mut self) -> PublicKey<Scalar> {
        assert!(
            self.parameters.is_public_key_encryptable(),
            "Parameters do not support public key encryption"
        );

        let glwe_size = self.parameters.glwe_size();
        let polynomial_size = self.parameters.polynomial_size();
        let glwe_dimension = self.parameters.glwe_dimension().0;

        let mut glwe_key = Vec::with_capacity(glwe_dimension);
        for _ in 0..glwe_dimension {
            let mut ct = GlweCiphertextOwned::new(glwe_size, polynomial_size);
            self.encrypt_glwe_body(&mut ct);
            glwe_key.push(ct);
        }

        // encryptions of zero against the coefficient-reversed key, used for
        // the LWE side of public encryption
        let reversed_fourier_key: Vec<FourierPolynomialOwned> = (0..glwe_dimension)
            .map(|j| {
                let mut reversed = PolynomialOwned::<Scalar>::new(polynomial_size);
                let source = self.secret_key.glwe_secret_key();
                let source = source.get_polynomial(j);
                for (out, &inp) in reversed.as_mut().iter_mut().zip(source.as_ref().iter().rev())
                {
                    *out = inp;
                }
                let mut fourier = FourierPolynomialOwned::new(
                    polynomial_size.to_fourier_polynomial_size(),
                );
                self.fft.as_view().forward_as_integer(
                    &mut fourier,
                    &reversed,
                    self.scratch.computation_buffers.stack(),
                );
                fourier
            })
            .collect();

        let mut lwe_key = Vec::with_capacity(glwe_dimension);
        for _ in 0..glwe_dimension {
            let mut ct = GlweCiphertextOwned::new(glwe_size, polynomial_size);
            let (mask, mut body) = ct.get_mut_mask_and_body();
            self.encryption_generator.fill_slice_with_random_gaussian_torus(
                self.parameters.glwe_std_dev(),
                body.as_mut(),
            );
            self.encryption_generator.fill_slice_with_random_uniform(mask);
            for (mask_poly, key_fourier) in mask
                .chunks_exact(polynomial_size.0)
                .zip(&reversed_fourier_key)
            {
                let mask_poly = Polynomial::from_container(&*mask_poly);
                let stack = self.scratch.computation_buffers.stack();
                self.fft
                    .as_view()
                    .forward_as_torus(&mut self.scratch.mask_fourier, &mask_poly, stack);
                for (m, &k) in self
                    .scratch
                    .mask_fourier
                    .data
                    .iter_mut()
                    .zip(key_fourier.data.as_ref())
                {
                    *m *= k;
                }
                self.fft.as_view().backward_as_torus(
                    &mut self.scratch.tmp_poly,
                    &self.scratch.mask_fourier,
                    stack,
                );
                crate::algorithms::polynomial_algorithms::polynomial_wrapping_sub_assign(
                    &mut body,
                    &self.scratch.tmp_poly,
                );
            }
            lwe_key.push(ct);
        }

        PublicKey { glwe_key, lwe_key }
    }
}

pub(crate) fn gen_secret_key_with<Scalar: UnsignedTorus>(
    parameters: &Parameters<Scalar>,
    generator: &mut RandomGenerator<ActivatedRandomGenerator>,
) -> SecretKey<Scalar> {
    let large_dimension = parameters.large_lwe_dimension().0;
    let lwe_dimension = parameters.lwe_dimension().0;
    let mut buffer = vec![Scalar::ZERO; large_dimension];

    if parameters.block_size().0 == 1 {
        generator.fill_slice_with_random_uniform_binary(&mut buffer);
    } else {
        generator.fill_slice_with_random_uniform_binary_blocks(
            parameters.block_size(),
            &mut buffer[..lwe_dimension],
        );
        generator.fill_slice_with_random_uniform_binary(&mut buffer[lwe_dimension..]);
    }

    SecretKey::from_buffer(buffer, parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::parameters::{
        BlockSize, BootstrapOrder, DecompositionLevelCount, GlweDimension, LookupTableSize,
        LweDimension, MessageModulus,
    };
    use crate::parameters::{GadgetParametersLiteral, ParametersLiteral, PARAMS_5};

    pub(crate) fn toy_parameters_u64() -> Parameters<u64> {
        ParametersLiteral::<u64> {
            lwe_dimension: LweDimension(32),
            glwe_dimension: GlweDimension(2),
            polynomial_size: crate::commons::parameters::PolynomialSize(64),
            lookup_table_size: LookupTableSize(0),
            lwe_std_dev: StandardDev(2.0f64.powi(-40)),
            glwe_std_dev: StandardDev(2.0f64.powi(-45)),
            block_size: BlockSize(4),
            message_modulus: MessageModulus(1 << 4),
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
    fn lwe_encrypt_decrypt_round_trip() {
        let parameters = toy_parameters_u64();
        let mut encryptor = Encryptor::new(parameters);
        for message in 0..parameters.message_modulus().0 {
            let ct = encryptor.encrypt_lwe(message);
            assert_eq!(encryptor.decrypt_lwe(&ct), message);
        }
    }

    #[test]
    fn lwe_encrypt_decrypt_round_trip_u32() {
        let parameters = ParametersLiteral::<u32> {
            lwe_dimension: LweDimension(32),
            glwe_dimension: GlweDimension(1),
            polynomial_size: crate::commons::parameters::PolynomialSize(128),
            lookup_table_size: LookupTableSize(0),
            lwe_std_dev: StandardDev(2.0f64.powi(-25)),
            glwe_std_dev: StandardDev(2.0f64.powi(-25)),
            block_size: BlockSize(1),
            message_modulus: MessageModulus(1 << 3),
            blind_rotate_parameters: GadgetParametersLiteral {
                base: 1 << 8,
                level: DecompositionLevelCount(2),
            },
            keyswitch_parameters: GadgetParametersLiteral {
                base: 1 << 4,
                level: DecompositionLevelCount(3),
            },
            bootstrap_order: BootstrapOrder::BlindRotateKeySwitch,
        }
        .compile();

        let mut encryptor = Encryptor::new(parameters);
        for message in 0..parameters.message_modulus().0 {
            let ct = encryptor.encrypt_lwe(message);
            assert_eq!(encryptor.decrypt_lwe(&ct), message);
        }
    }

    #[test]
    fn glwe_body_encryption_decrypts_under_the_key() {
        let parameters = toy_parameters_u64();
        let mut encryptor = Encryptor::new(parameters);

        let plaintext = parameters.encode(5);
        let mut ct =
            GlweCiphertextOwned::<u64>::new(parameters.glwe_size(), parameters.polynomial_size());
        ct.get_mut_body().as_mut()[0] = plaintext;
        encryptor.encrypt_glwe_body(&mut ct);

        // phase[0] = body[0] - sum_j (mask_j * key_j)[0]
        let polynomial_size = parameters.polynomial_size().0;
        let glwe_key = encryptor.secret_key.glwe_secret_key();
        let mut acc = 0u64;
        for (j, mask_poly) in ct.get_mask().chunks_exact(polynomial_size).enumerate() {
            let key_poly = glwe_key.get_polynomial(j);
            let key_poly = key_poly.as_ref();
            acc = acc.wrapping_add(mask_poly[0].wrapping_mul(key_poly[0]));
            for i in 1..polynomial_size {
                acc = acc.wrapping_sub(mask_poly[i].wrapping_mul(key_poly[polynomial_size - i]));
            }
        }
        let phase = ct.get_body().as_ref()[0].wrapping_sub(acc);
        assert_eq!(parameters.decode(phase), 5);
    }

    #[test]
    fn hierarchy_levels_share_the_key_prefix() {
        let parameters = PARAMS_5.compile();
        let encryptors = Encryptor::<u64>::new_hierarchy(parameters);
        assert_eq!(encryptors.len(), parameters.hierarchy_depth());

        for level in &encryptors[1..] {
            assert!(level.secret_key.shares_buffer_with(&encryptors[0].secret_key));
            let root_view = encryptors[0].secret_key.large_lwe_secret_key();
            let level_view = level.secret_key.large_lwe_secret_key();
            assert_eq!(
                &root_view.as_ref()[..level_view.as_ref().len()],
                level_view.as_ref()
            );
        }
    }

    #[test]
    fn block_binary_key_structure() {
        let parameters = toy_parameters_u64();
        let encryptor = Encryptor::<u64>::new(parameters);
        let lwe_key = encryptor.secret_key.lwe_secret_key();
        for block in lwe_key.as_ref().chunks_exact(parameters.block_size().0) {
            assert_eq!(block.iter().sum::<u64>(), 1);
        }
    }
}
