//! Scheme parameters: literal definitions, compiled read-only parameters,
//! noise estimation and the shipped parameter sets.

use crate::commons::dispersion::StandardDev;
use crate::commons::numeric::{divide_round, CastInto, UnsignedInteger};
use crate::commons::parameters::{
    BlockCount, BlockSize, BootstrapOrder, DecompositionBaseLog, DecompositionLevelCount,
    ExtendFactor, GlweDimension, GlweSize, LookupTableSize, LweDimension, MessageModulus,
    PolynomialSize,
};
use crate::commons::torus::{IntoTorus, UnsignedTorus};
use serde::{Deserialize, Serialize};
use std::io::{Error, ErrorKind, Read, Result as IoResult, Write};

/// The ring degree at which the recursive full-domain evaluation bottoms
/// out; the smallest degree of a hierarchy level and of the decomposed
/// negacyclic tables.
pub const BASE_POLYNOMIAL_SIZE: PolynomialSize = PolynomialSize(2048);

/// Literal parameters for a gadget decomposition, used in the blind-rotation
/// and key-switch keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GadgetParametersLiteral<Scalar> {
    /// The decomposition base. Must be a power of two.
    pub base: Scalar,
    /// The number of decomposition levels.
    pub level: DecompositionLevelCount,
}

impl<Scalar: UnsignedTorus> GadgetParametersLiteral<Scalar> {
    /// Compile the literal into read-only [`GadgetParameters`].
    ///
    /// # Panics
    ///
    /// Panics if any field is invalid.
    pub fn compile(self) -> GadgetParameters<Scalar> {
        assert!(self.base >= Scalar::TWO, "Gadget base smaller than two");
        assert!(self.base.is_power_of_two(), "Gadget base not a power of two");
        assert!(self.level.0 > 0, "Gadget level count is zero");
        let base_log = DecompositionBaseLog(self.base.ilog2() as usize);
        assert!(
            base_log.0 * self.level.0 <= Scalar::BITS,
            "Gadget base and level do not fit the ciphertext modulus"
        );
        GadgetParameters {
            base: self.base,
            base_log,
            level: self.level,
        }
    }
}

/// Read-only, compiled gadget parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GadgetParameters<Scalar> {
    base: Scalar,
    base_log: DecompositionBaseLog,
    level: DecompositionLevelCount,
}

impl<Scalar: UnsignedTorus> GadgetParameters<Scalar> {
    pub fn base(&self) -> Scalar {
        self.base
    }

    pub fn base_log(&self) -> DecompositionBaseLog {
        self.base_log
    }

    pub fn level(&self) -> DecompositionLevelCount {
        self.level
    }

    /// `Q / B^(i+1)`, the weight of digit `i`.
    pub fn base_q(&self, i: usize) -> Scalar {
        Scalar::ONE << self.log_base_q(i)
    }

    /// `log2(Q / B^(i+1))`.
    pub fn log_base_q(&self, i: usize) -> usize {
        Scalar::BITS - (i + 1) * self.base_log.0
    }

    pub fn literal(&self) -> GadgetParametersLiteral<Scalar> {
        GadgetParametersLiteral {
            base: self.base,
            level: self.level,
        }
    }

    /// The serialized size: base and level, as big-endian `u64`.
    pub fn byte_size(&self) -> usize {
        16
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_all(&u64::to_be_bytes(self.base.cast_into()))?;
        writer.write_all(&u64::to_be_bytes(self.level.0 as u64))?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> IoResult<Self> {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf)?;
        let base = Scalar::cast_from(u64::from_be_bytes(buf));
        reader.read_exact(&mut buf)?;
        let level = DecompositionLevelCount(u64::from_be_bytes(buf) as usize);
        Ok(GadgetParametersLiteral { base, level }.compile())
    }
}

/// Literal scheme parameters.
///
/// Unless you are a cryptographic expert, do not set these by hand: use the
/// shipped parameter sets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParametersLiteral<Scalar> {
    /// The LWE dimension, usually denoted `n`.
    pub lwe_dimension: LweDimension,
    /// The GLWE rank, usually denoted `k`.
    pub glwe_dimension: GlweDimension,
    /// The ring degree, usually denoted `N`. A power of two.
    pub polynomial_size: PolynomialSize,
    /// The blind-rotation lookup table size, a multiple of the ring degree.
    /// Zero selects the ring degree (no extension).
    pub lookup_table_size: LookupTableSize,
    /// Torus-normalised standard deviation of the LWE encryption noise.
    pub lwe_std_dev: StandardDev,
    /// Torus-normalised standard deviation of the GLWE encryption noise.
    pub glwe_std_dev: StandardDev,
    /// The block size of the block-binary LWE key distribution. Zero or one
    /// selects the plain uniform-binary distribution.
    pub block_size: BlockSize,
    /// The message modulus `p`.
    pub message_modulus: MessageModulus,
    /// Gadget parameters of the blind-rotation key.
    pub blind_rotate_parameters: GadgetParametersLiteral<Scalar>,
    /// Gadget parameters of the key-switch key.
    pub keyswitch_parameters: GadgetParametersLiteral<Scalar>,
    /// The order of the two bootstrap halves.
    pub bootstrap_order: BootstrapOrder,
}

impl<Scalar: UnsignedTorus> ParametersLiteral<Scalar> {
    /// Compile the literal into read-only [`Parameters`].
    ///
    /// # Panics
    ///
    /// Panics if any field is invalid. This performs structural sanity
    /// checks only; a compiling parameter set is not necessarily secure.
    pub fn compile(self) -> Parameters<Scalar> {
        let mut literal = self;
        if literal.lookup_table_size.0 == 0 {
            literal.lookup_table_size = LookupTableSize(literal.polynomial_size.0);
        }
        if literal.block_size.0 == 0 {
            literal.block_size = BlockSize(1);
        }

        let n = literal.lwe_dimension.0;
        let k = literal.glwe_dimension.0;
        let poly = literal.polynomial_size.0;
        let lut = literal.lookup_table_size.0;
        let block = literal.block_size.0;

        assert!(n > 0, "LweDimension is zero");
        assert!(k > 0, "GlweDimension is zero");
        assert!(
            n <= k * poly,
            "LweDimension {n} larger than the flattened GLWE dimension {}",
            k * poly
        );
        assert!(poly.is_power_of_two(), "PolynomialSize not a power of two");
        assert!(
            lut >= poly,
            "LookupTableSize {lut} smaller than the polynomial size {poly}"
        );
        assert!(
            lut % poly == 0,
            "LookupTableSize {lut} not a multiple of the polynomial size {poly}"
        );
        assert!(
            n % block == 0,
            "LweDimension {n} not a multiple of the block size {block}"
        );
        assert!(literal.lwe_std_dev.0 > 0.0, "LweStdDev is not positive");
        assert!(literal.glwe_std_dev.0 > 0.0, "GlweStdDev is not positive");
        assert!(
            literal.message_modulus.0.is_power_of_two(),
            "MessageModulus not a power of two"
        );

        let message_modulus_scalar = Scalar::cast_from(literal.message_modulus.0);
        let scale =
            divide_round(Scalar::ONE << (Scalar::BITS - 1), message_modulus_scalar) * Scalar::TWO;

        Parameters {
            lwe_dimension: literal.lwe_dimension,
            glwe_dimension: literal.glwe_dimension,
            large_lwe_dimension: literal
                .glwe_dimension
                .to_equivalent_lwe_dimension(literal.polynomial_size),
            polynomial_size: literal.polynomial_size,
            lookup_table_size: literal.lookup_table_size,
            extend_factor: literal
                .lookup_table_size
                .to_extend_factor(literal.polynomial_size),
            lwe_std_dev: literal.lwe_std_dev,
            glwe_std_dev: literal.glwe_std_dev,
            block_size: literal.block_size,
            block_count: BlockCount(n / block),
            message_modulus: literal.message_modulus,
            scale,
            blind_rotate_parameters: literal.blind_rotate_parameters.compile(),
            keyswitch_parameters: literal.keyswitch_parameters.compile(),
            bootstrap_order: literal.bootstrap_order,
        }
    }
}

/// Read-only, compiled scheme parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters<Scalar> {
    lwe_dimension: LweDimension,
    glwe_dimension: GlweDimension,
    large_lwe_dimension: LweDimension,
    polynomial_size: PolynomialSize,
    lookup_table_size: LookupTableSize,
    extend_factor: ExtendFactor,
    lwe_std_dev: StandardDev,
    glwe_std_dev: StandardDev,
    block_size: BlockSize,
    block_count: BlockCount,
    message_modulus: MessageModulus,
    scale: Scalar,
    blind_rotate_parameters: GadgetParameters<Scalar>,
    keyswitch_parameters: GadgetParameters<Scalar>,
    bootstrap_order: BootstrapOrder,
}

impl<Scalar: UnsignedTorus> Parameters<Scalar> {
    pub fn lwe_dimension(&self) -> LweDimension {
        self.lwe_dimension
    }

    pub fn glwe_dimension(&self) -> GlweDimension {
        self.glwe_dimension
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.glwe_dimension.to_glwe_size()
    }

    /// The dimension of the flattened GLWE key.
    pub fn large_lwe_dimension(&self) -> LweDimension {
        self.large_lwe_dimension
    }

    /// The LWE dimension of fresh ciphertexts: the large dimension under
    /// [`BootstrapOrder::KeySwitchBlindRotate`], the LWE dimension otherwise.
    pub fn default_lwe_dimension(&self) -> LweDimension {
        match self.bootstrap_order {
            BootstrapOrder::KeySwitchBlindRotate => self.large_lwe_dimension,
            BootstrapOrder::BlindRotateKeySwitch => self.lwe_dimension,
        }
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn lookup_table_size(&self) -> LookupTableSize {
        self.lookup_table_size
    }

    pub fn extend_factor(&self) -> ExtendFactor {
        self.extend_factor
    }

    pub fn lwe_std_dev(&self) -> StandardDev {
        self.lwe_std_dev
    }

    pub fn glwe_std_dev(&self) -> StandardDev {
        self.glwe_std_dev
    }

    /// The noise of fresh LWE ciphertexts, matching the key they are
    /// encrypted under.
    pub fn default_lwe_std_dev(&self) -> StandardDev {
        match self.bootstrap_order {
            BootstrapOrder::KeySwitchBlindRotate => self.glwe_std_dev,
            BootstrapOrder::BlindRotateKeySwitch => self.lwe_std_dev,
        }
    }

    pub fn block_size(&self) -> BlockSize {
        self.block_size
    }

    pub fn block_count(&self) -> BlockCount {
        self.block_count
    }

    pub fn message_modulus(&self) -> MessageModulus {
        self.message_modulus
    }

    /// The message scale; the bits below it carry the noise.
    pub fn scale(&self) -> Scalar {
        self.scale
    }

    pub fn blind_rotate_parameters(&self) -> GadgetParameters<Scalar> {
        self.blind_rotate_parameters
    }

    pub fn keyswitch_parameters(&self) -> GadgetParameters<Scalar> {
        self.keyswitch_parameters
    }

    pub fn bootstrap_order(&self) -> BootstrapOrder {
        self.bootstrap_order
    }

    pub fn is_public_key_encryptable(&self) -> bool {
        self.bootstrap_order == BootstrapOrder::KeySwitchBlindRotate
    }

    pub fn log_q(&self) -> usize {
        Scalar::BITS
    }

    fn float_q(&self) -> f64 {
        (Scalar::BITS as f64).exp2()
    }

    /// The base modulus-switch constant `L / Q`.
    pub fn mod_switch_constant(&self) -> f64 {
        self.lookup_table_size.0 as f64 / self.float_q()
    }

    /// The number of halving levels between this ring degree and
    /// [`BASE_POLYNOMIAL_SIZE`].
    pub fn hierarchy_depth(&self) -> usize {
        (self.polynomial_size.0 / BASE_POLYNOMIAL_SIZE.0).trailing_zeros() as usize
    }

    /// The parameters of the hierarchy level `depth` descents below this
    /// one: (N, L, g) are halved `depth` times, everything else is shared.
    pub fn at_depth(&self, depth: usize) -> Self {
        assert!(
            self.polynomial_size.0 >> depth >= BASE_POLYNOMIAL_SIZE.0,
            "Depth {depth} descends below the base polynomial size"
        );
        let mut literal = self.literal();
        literal.polynomial_size = PolynomialSize(self.polynomial_size.0 >> depth);
        literal.lookup_table_size = LookupTableSize(self.lookup_table_size.0 >> depth);
        literal.compile()
    }

    pub fn literal(&self) -> ParametersLiteral<Scalar> {
        ParametersLiteral {
            lwe_dimension: self.lwe_dimension,
            glwe_dimension: self.glwe_dimension,
            polynomial_size: self.polynomial_size,
            lookup_table_size: self.lookup_table_size,
            lwe_std_dev: self.lwe_std_dev,
            glwe_std_dev: self.glwe_std_dev,
            block_size: self.block_size,
            message_modulus: self.message_modulus,
            blind_rotate_parameters: self.blind_rotate_parameters.literal(),
            keyswitch_parameters: self.keyswitch_parameters.literal(),
            bootstrap_order: self.bootstrap_order,
        }
    }

    /// Encode a message at the parameter scale.
    pub fn encode(&self, message: u64) -> Scalar {
        self.encode_custom(message, self.message_modulus, self.scale)
    }

    /// Encode a message under a custom message modulus and scale.
    pub fn encode_custom(
        &self,
        message: u64,
        message_modulus: MessageModulus,
        scale: Scalar,
    ) -> Scalar {
        Scalar::cast_from(message % message_modulus.0).wrapping_mul(scale)
    }

    /// Decode a phase back to a message.
    pub fn decode(&self, plaintext: Scalar) -> u64 {
        let p = self.message_modulus.0;
        let rescaled = plaintext.into_torus() * p as f64;
        (rescaled.round() as u64) % p
    }
}

// Noise estimation. All standard deviations are in absolute (times Q) scale.
impl<Scalar: UnsignedTorus> Parameters<Scalar> {
    fn key_hamming_weight(&self) -> f64 {
        let block_size = self.block_size.0 as f64;
        self.block_count.0 as f64 * block_size / (block_size + 1.0)
    }

    /// Estimated standard deviation of the modulus-switch error, classical
    /// rounding.
    pub fn modulus_switch_std_dev(&self) -> StandardDev {
        let lut = self.lookup_table_size.0 as f64;
        let q = self.float_q();
        let h = self.key_hamming_weight();
        StandardDev((((h + 1.0) * q * q) / (48.0 * lut * lut)).sqrt())
    }

    /// Estimated standard deviation of the modulus-switch error with the
    /// full-domain rounding of the recursive variants.
    pub fn modulus_switch_fdfb_std_dev(&self) -> StandardDev {
        let lut = self.lookup_table_size.0 as f64;
        let q = self.float_q();
        let h = self.key_hamming_weight();
        StandardDev((((h + 1.0) * q * q) / (12.0 * lut * lut)).sqrt())
    }

    fn blind_rotate_variance_at(&self, polynomial_size: f64) -> f64 {
        let n = self.lwe_dimension.0 as f64;
        let k = self.glwe_dimension.0 as f64;
        let big_n = polynomial_size;
        let beta = self.glwe_std_dev.0 * self.float_q();
        let q = self.float_q();
        let h = self.key_hamming_weight();

        let base_int: u64 = self.blind_rotate_parameters.base().cast_into();
        let base = base_int as f64;
        let level = self.blind_rotate_parameters.level().0 as f64;

        let rounding = h * (h + (k * big_n - n) / 2.0 + 1.0) * (q * q)
            / (6.0 * base.powf(2.0 * level));
        let key = n * (level * (k + 1.0) * big_n * beta * beta * base * base) / 6.0;
        rounding + key
    }

    /// Estimated standard deviation of the blind-rotation error.
    pub fn blind_rotate_std_dev(&self) -> StandardDev {
        StandardDev(
            self.blind_rotate_variance_at(self.polynomial_size.0 as f64)
                .sqrt(),
        )
    }

    /// Blind-rotation error of the hierarchy variant: one rotation per
    /// halving level, the base level contributing twice.
    pub fn blind_rotate_std_dev_recursive(&self) -> StandardDev {
        let depth = self.hierarchy_depth();
        let mut variance = 0.0;
        for i in 0..depth {
            let poly = self.polynomial_size.0 as f64 / 2.0f64.powi(i as i32 + 1);
            let term = self.blind_rotate_variance_at(poly);
            variance += term;
            if i == depth - 1 {
                variance += term;
            }
        }
        StandardDev(variance.sqrt())
    }

    fn keyswitch_variance_at(&self, polynomial_size: f64) -> f64 {
        let n = self.lwe_dimension.0 as f64;
        let k = self.glwe_dimension.0 as f64;
        let big_n = polynomial_size;
        let alpha = self.lwe_std_dev.0 * self.float_q();
        let q = self.float_q();

        let base_int: u64 = self.keyswitch_parameters.base().cast_into();
        let base = base_int as f64;
        let level = self.keyswitch_parameters.level().0 as f64;

        let rounding =
            ((k * big_n - n) / 2.0) * (q * q) / (12.0 * base.powf(2.0 * level));
        let key = (k * big_n - n) * (alpha * alpha * level * base * base) / 12.0;
        rounding + key
    }

    /// Estimated standard deviation of the key-switch error.
    pub fn keyswitch_std_dev(&self) -> StandardDev {
        StandardDev(
            self.keyswitch_variance_at(self.polynomial_size.0 as f64)
                .sqrt(),
        )
    }

    /// Key-switch error of the hierarchy variant.
    pub fn keyswitch_std_dev_recursive(&self) -> StandardDev {
        let depth = self.hierarchy_depth();
        let mut variance = 0.0;
        for i in 0..depth {
            let poly = self.polynomial_size.0 as f64 / 2.0f64.powi(i as i32 + 1);
            let term = self.keyswitch_variance_at(poly);
            variance += term;
            if i == depth - 1 {
                variance += term;
            }
        }
        StandardDev(variance.sqrt())
    }

    /// Total error of a classical bootstrap.
    pub fn max_error_std_dev(&self) -> StandardDev {
        let ms = self.modulus_switch_std_dev().0;
        let br = self.blind_rotate_std_dev().0;
        let ks = self.keyswitch_std_dev().0;
        StandardDev((ms * ms + br * br + ks * ks).sqrt())
    }

    /// Total error of the recursive full-domain evaluation with extended
    /// bootstrapping: `log2(e) + 1` accumulated rotations.
    pub fn max_error_std_dev_recursive_ebs(&self) -> StandardDev {
        let ms = self.modulus_switch_fdfb_std_dev().0;
        let br = self.blind_rotate_std_dev().0;
        let ks = self.keyswitch_std_dev().0;
        let log_extend_factor = (self.extend_factor.0 as f64).log2();
        StandardDev((ms * ms + (log_extend_factor + 1.0) * br * br + ks * ks).sqrt())
    }

    /// Total error of the recursive full-domain evaluation over the
    /// hierarchy of halved rings.
    pub fn max_error_std_dev_recursive(&self) -> StandardDev {
        let ms = self.modulus_switch_fdfb_std_dev().0;
        let br = self.blind_rotate_std_dev_recursive().0;
        let ks = self.keyswitch_std_dev_recursive().0;
        StandardDev((ms * ms + br * br + ks * ks).sqrt())
    }

    /// Probability that a classical bootstrap decodes to the wrong message.
    pub fn failure_probability(&self) -> f64 {
        let bound = self.float_q() / (4.0 * self.message_modulus.0 as f64);
        erfc_failure(bound, self.max_error_std_dev())
    }

    /// Failure probability of the recursive extended-bootstrapping variant.
    pub fn failure_probability_recursive_ebs(&self) -> f64 {
        let bound = self.float_q() / (2.0 * self.message_modulus.0 as f64);
        erfc_failure(bound, self.max_error_std_dev_recursive_ebs())
    }

    /// Failure probability of the recursive hierarchy variant.
    pub fn failure_probability_recursive(&self) -> f64 {
        let bound = self.float_q() / (2.0 * self.message_modulus.0 as f64);
        erfc_failure(bound, self.max_error_std_dev_recursive())
    }
}

fn erfc_failure(bound: f64, std_dev: StandardDev) -> f64 {
    statrs::function::erf::erfc(bound / (core::f64::consts::SQRT_2 * std_dev.0))
}

// Binary serialization, big-endian.
impl<Scalar: UnsignedTorus> Parameters<Scalar> {
    /// The serialized size: eight `u64` fields, two gadget blocks, one order
    /// byte.
    pub fn byte_size(&self) -> usize {
        8 * 8 + self.blind_rotate_parameters.byte_size() + self.keyswitch_parameters.byte_size() + 1
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> IoResult<()> {
        writer.write_all(&u64::to_be_bytes(self.lwe_dimension.0 as u64))?;
        writer.write_all(&u64::to_be_bytes(self.glwe_dimension.0 as u64))?;
        writer.write_all(&u64::to_be_bytes(self.polynomial_size.0 as u64))?;
        writer.write_all(&u64::to_be_bytes(self.lookup_table_size.0 as u64))?;
        writer.write_all(&f64::to_be_bytes(self.lwe_std_dev.0))?;
        writer.write_all(&f64::to_be_bytes(self.glwe_std_dev.0))?;
        writer.write_all(&u64::to_be_bytes(self.block_size.0 as u64))?;
        writer.write_all(&u64::to_be_bytes(self.message_modulus.0))?;
        self.blind_rotate_parameters.write_to(writer)?;
        self.keyswitch_parameters.write_to(writer)?;
        writer.write_all(&[self.bootstrap_order.to_byte()])?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> IoResult<Self> {
        let mut buf = [0u8; 8];

        reader.read_exact(&mut buf)?;
        let lwe_dimension = LweDimension(u64::from_be_bytes(buf) as usize);
        reader.read_exact(&mut buf)?;
        let glwe_dimension = GlweDimension(u64::from_be_bytes(buf) as usize);
        reader.read_exact(&mut buf)?;
        let polynomial_size = PolynomialSize(u64::from_be_bytes(buf) as usize);
        reader.read_exact(&mut buf)?;
        let lookup_table_size = LookupTableSize(u64::from_be_bytes(buf) as usize);
        reader.read_exact(&mut buf)?;
        let lwe_std_dev = StandardDev(f64::from_be_bytes(buf));
        reader.read_exact(&mut buf)?;
        let glwe_std_dev = StandardDev(f64::from_be_bytes(buf));
        reader.read_exact(&mut buf)?;
        let block_size = BlockSize(u64::from_be_bytes(buf) as usize);
        reader.read_exact(&mut buf)?;
        let message_modulus = MessageModulus(u64::from_be_bytes(buf));

        let blind_rotate_parameters = GadgetParameters::read_from(reader)?;
        let keyswitch_parameters = GadgetParameters::read_from(reader)?;

        let mut order_byte = [0u8; 1];
        reader.read_exact(&mut order_byte)?;
        let bootstrap_order = BootstrapOrder::from_byte(order_byte[0]).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                format!("Invalid bootstrap order byte {}", order_byte[0]),
            )
        })?;

        Ok(ParametersLiteral {
            lwe_dimension,
            glwe_dimension,
            polynomial_size,
            lookup_table_size,
            lwe_std_dev,
            glwe_std_dev,
            block_size,
            message_modulus,
            blind_rotate_parameters: blind_rotate_parameters.literal(),
            keyswitch_parameters: keyswitch_parameters.literal(),
            bootstrap_order,
        }
        .compile())
    }
}

const DEFAULT_LWE_STD_DEV: StandardDev = StandardDev(0.000000003704451841947947);
const DEFAULT_GLWE_STD_DEV: StandardDev = StandardDev(0.0000000000000003472576015484159);

macro_rules! extended_params {
    ($name:ident, $log_p:expr, $extend:expr, $br_level:expr) => {
        pub const $name: ParametersLiteral<u64> = ParametersLiteral {
            lwe_dimension: LweDimension(1160),
            glwe_dimension: GlweDimension(1),
            polynomial_size: PolynomialSize(2048),
            lookup_table_size: LookupTableSize(2048 * $extend),
            lwe_std_dev: DEFAULT_LWE_STD_DEV,
            glwe_std_dev: DEFAULT_GLWE_STD_DEV,
            block_size: BlockSize(1),
            message_modulus: MessageModulus(1 << $log_p),
            blind_rotate_parameters: GadgetParametersLiteral {
                base: 1 << 22,
                level: DecompositionLevelCount($br_level),
            },
            keyswitch_parameters: GadgetParametersLiteral {
                base: 1 << 7,
                level: DecompositionLevelCount(3),
            },
            bootstrap_order: BootstrapOrder::KeySwitchBlindRotate,
        };
    };
}

macro_rules! hierarchy_params {
    ($name:ident, $log_p:expr, $extend:expr, $br_level:expr) => {
        pub const $name: ParametersLiteral<u64> = ParametersLiteral {
            lwe_dimension: LweDimension(1160),
            glwe_dimension: GlweDimension(1),
            polynomial_size: PolynomialSize(2048 * $extend),
            lookup_table_size: LookupTableSize(2048 * $extend),
            lwe_std_dev: DEFAULT_LWE_STD_DEV,
            glwe_std_dev: DEFAULT_GLWE_STD_DEV,
            block_size: BlockSize(1),
            message_modulus: MessageModulus(1 << $log_p),
            blind_rotate_parameters: GadgetParametersLiteral {
                base: 1 << 22,
                level: DecompositionLevelCount($br_level),
            },
            keyswitch_parameters: GadgetParametersLiteral {
                base: 1 << 7,
                level: DecompositionLevelCount(3),
            },
            bootstrap_order: BootstrapOrder::BlindRotateKeySwitch,
        };
    };
}

// Extended-bootstrapping sets: base ring degree, extended lookup tables.
extended_params!(PARAMS_EBS_5, 5, 2, 1);
extended_params!(PARAMS_EBS_6, 6, 4, 1);
extended_params!(PARAMS_EBS_7, 7, 8, 2);
extended_params!(PARAMS_EBS_8, 8, 16, 2);

// Hierarchy sets: the ring grows with the precision, tables are not
// extended.
hierarchy_params!(PARAMS_5, 5, 2, 1);
hierarchy_params!(PARAMS_6, 6, 4, 2);
hierarchy_params!(PARAMS_7, 7, 8, 2);
hierarchy_params!(PARAMS_8, 8, 16, 2);

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENDED_SETS: [ParametersLiteral<u64>; 4] =
        [PARAMS_EBS_5, PARAMS_EBS_6, PARAMS_EBS_7, PARAMS_EBS_8];
    const HIERARCHY_SETS: [ParametersLiteral<u64>; 4] = [PARAMS_5, PARAMS_6, PARAMS_7, PARAMS_8];

    #[test]
    fn shipped_sets_compile() {
        for literal in EXTENDED_SETS.iter().chain(HIERARCHY_SETS.iter()) {
            literal.compile();
        }
    }

    #[test]
    fn extended_sets_meet_failure_target() {
        for literal in EXTENDED_SETS {
            let params = literal.compile();
            assert!(params.failure_probability().log2() <= -60.0);
            assert!(params.failure_probability_recursive_ebs().log2() <= -60.0);
        }
    }

    #[test]
    fn hierarchy_sets_meet_failure_target() {
        for literal in HIERARCHY_SETS {
            let params = literal.compile();
            assert!(params.failure_probability_recursive().log2() <= -60.0);
        }
    }

    #[test]
    fn recursive_estimator_accumulates_rotations() {
        for literal in EXTENDED_SETS {
            let params = literal.compile();
            // the telescope adds log2(e) + 1 rotations on top of one
            let single = params.blind_rotate_std_dev().get_variance().0;
            let log_extend = (params.extend_factor().0 as f64).log2();
            let ebs = params.max_error_std_dev_recursive_ebs().get_variance().0;
            assert!(ebs >= (log_extend + 1.0) * single);
            assert!(params.max_error_std_dev_recursive_ebs().0 >= params.max_error_std_dev().0);
        }
        for literal in HIERARCHY_SETS {
            let params = literal.compile();
            // halved rings contribute less noise per rotation than the full
            // ring
            assert!(
                params.blind_rotate_std_dev_recursive().0
                    <= ((params.hierarchy_depth() + 1) as f64).sqrt()
                        * params.blind_rotate_std_dev().0
            );
        }
    }

    #[test]
    fn parameters_binary_round_trip() {
        let params = PARAMS_7.compile();
        let mut bytes = Vec::new();
        params.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), params.byte_size());

        let read = Parameters::<u64>::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(read, params);
        assert_eq!(
            read.failure_probability().to_bits(),
            params.failure_probability().to_bits()
        );

        // the round trip is byte-for-byte stable
        let mut bytes_again = Vec::new();
        read.write_to(&mut bytes_again).unwrap();
        assert_eq!(bytes, bytes_again);
    }

    #[test]
    fn invalid_order_byte_is_rejected() {
        let params = PARAMS_EBS_5.compile();
        let mut bytes = Vec::new();
        params.write_to(&mut bytes).unwrap();
        *bytes.last_mut().unwrap() = 7;
        assert!(Parameters::<u64>::read_from(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn gadget_parameters_round_trip() {
        let gadget = GadgetParametersLiteral::<u64> {
            base: 1 << 7,
            level: DecompositionLevelCount(3),
        }
        .compile();
        let mut bytes = Vec::new();
        gadget.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), gadget.byte_size());
        let read = GadgetParameters::<u64>::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(read, gadget);
    }

    #[test]
    fn gadget_base_q_weights() {
        let gadget = GadgetParametersLiteral::<u64> {
            base: 1 << 7,
            level: DecompositionLevelCount(3),
        }
        .compile();
        assert_eq!(gadget.base_q(0), 1u64 << 57);
        assert_eq!(gadget.base_q(2), 1u64 << 43);
        assert_eq!(gadget.log_base_q(1), 50);
    }

    #[test]
    fn at_depth_halves_the_ring() {
        let params = PARAMS_7.compile();
        let halved = params.at_depth(1);
        assert_eq!(halved.polynomial_size().0, params.polynomial_size().0 / 2);
        assert_eq!(
            halved.lookup_table_size().0,
            params.lookup_table_size().0 / 2
        );
        assert_eq!(
            halved.large_lwe_dimension().0,
            params.large_lwe_dimension().0 / 2
        );
        assert_eq!(halved.lwe_dimension(), params.lwe_dimension());
        assert_eq!(halved.extend_factor(), params.extend_factor());
    }

    #[test]
    #[should_panic(expected = "LookupTableSize")]
    fn lookup_table_size_must_be_a_multiple() {
        let mut literal = PARAMS_EBS_5;
        literal.lookup_table_size = LookupTableSize(3000);
        literal.compile();
    }

    #[test]
    fn scale_reserves_the_message_bits() {
        let params = PARAMS_EBS_5.compile();
        // scale = round(Q/2p) * 2 = Q/p for power-of-two moduli
        assert_eq!(params.scale(), 1u64 << 59);
    }
}
