//! `tfhe-fdfb` is a library for full-domain functional bootstrapping (FDFB)
//! over TFHE-style ciphertexts.
//!
//! Clients encrypt small integers under an LWE/GLWE secret key, a server
//! evaluates an arbitrary univariate function while refreshing the ciphertext
//! noise, and clients decrypt the result. On top of the classical
//! programmable bootstrap, the crate implements:
//!
//! - extended bootstrapping, where the lookup table is larger than the ring
//!   degree and is carried by several interleaved polynomials;
//! - two-pass classical FDFB through a compression lookup table;
//! - a recursive variant that decomposes the target function into a telescope
//!   of negacyclic tables of shrinking size plus one base table, evaluated as
//!   a sum of blind rotations.
//!
//! The ciphertext modulus is `2^32` or `2^64`, selected at compile time
//! through the [`UnsignedTorus`](commons::torus::UnsignedTorus) scalar
//! parameter of every entity.
//!
//! ```rust,no_run
//! use tfhe_fdfb::prelude::*;
//!
//! let params = PARAMS_EBS_5.compile();
//! let mut encryptor = Encryptor::new(params);
//! let mut evaluator = Evaluator::new(params, &encryptor.gen_evaluation_key_parallel());
//!
//! let ct = encryptor.encrypt_lwe(7);
//! let ct_out = evaluator.bootstrap_func(&ct, |x| (2 * x) % 32);
//! assert_eq!(encryptor.decrypt_lwe(&ct_out), 14);
//! ```

pub mod algorithms;
pub mod commons;
pub mod encryptor;
pub mod entities;
pub mod evaluator;
pub mod fft;
pub mod keygen;
pub mod parameters;
pub mod seeders;

pub mod prelude {
    pub use crate::algorithms::lookup_table_generation::*;
    pub use crate::commons::dispersion::{StandardDev, Variance};
    pub use crate::commons::parameters::*;
    pub use crate::commons::torus::UnsignedTorus;
    pub use crate::encryptor::Encryptor;
    pub use crate::entities::*;
    pub use crate::evaluator::Evaluator;
    pub use crate::parameters::*;
}
