//! Public keys: GLWE encryptions of zero from which fresh encryptions can be
//! derived. Only available under the KeySwitchBlindRotate order, where LWE
//! ciphertexts live under the flattened GLWE key.

use crate::entities::glwe_ciphertext::GlweCiphertextOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey<Scalar> {
    /// One GLWE encryption of zero per mask row, for GLWE-side encryption.
    pub glwe_key: Vec<GlweCiphertextOwned<Scalar>>,
    /// One encryption of zero against the reversed GLWE key per mask row,
    /// for LWE-side encryption.
    pub lwe_key: Vec<GlweCiphertextOwned<Scalar>>,
}
