//! The ciphertext, key and plaintext types of the scheme.

pub mod blind_rotate_key;
pub mod fourier_ggsw_ciphertext;
pub mod fourier_glwe_ciphertext;
pub mod ggsw_ciphertext;
pub mod glwe_ciphertext;
pub mod lookup_table;
pub mod lwe_ciphertext;
pub mod lwe_keyswitch_key;
pub mod polynomial;
pub mod public_key;
pub mod secret_key;

pub use blind_rotate_key::{BlindRotateKey, EvaluationKey, FourierBlindRotateKey};
pub use fourier_ggsw_ciphertext::{FourierGgswCiphertext, FourierGgswCiphertextView};
pub use fourier_glwe_ciphertext::{
    FourierGlweCiphertext, FourierGlweCiphertextOwned, FourierGlweCiphertextView,
};
pub use ggsw_ciphertext::{GgswCiphertext, GgswCiphertextOwned};
pub use glwe_ciphertext::{GlweCiphertext, GlweCiphertextOwned};
pub use lookup_table::LookupTable;
pub use lwe_ciphertext::{LweCiphertext, LweCiphertextOwned};
pub use lwe_keyswitch_key::LweKeyswitchKey;
pub use polynomial::{Polynomial, PolynomialOwned};
pub use public_key::PublicKey;
pub use secret_key::{GlweSecretKey, LweSecretKey, SecretKey};
