//! Key-switch keys from the flattened GLWE key down to the LWE key.
//!
//! Since the LWE key is a prefix of the large key, only the trailing
//! coordinates of the large key need key-switch material: one gadget-scaled
//! LWE encryption per (trailing coordinate, decomposition level) pair.

use crate::commons::numeric::Numeric;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, LweDimension, LweSize,
};
use crate::entities::lwe_ciphertext::{LweCiphertext, LweCiphertextMutView, LweCiphertextView};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LweKeyswitchKey<Scalar> {
    data: Vec<Scalar>,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
    output_lwe_size: LweSize,
}

impl<Scalar: Numeric> LweKeyswitchKey<Scalar> {
    pub fn new(
        input_lwe_dimension: LweDimension,
        output_lwe_dimension: LweDimension,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        let output_lwe_size = output_lwe_dimension.to_lwe_size();
        Self {
            data: vec![
                Scalar::ZERO;
                input_lwe_dimension.0 * decomposition_level_count.0 * output_lwe_size.0
            ],
            decomposition_base_log,
            decomposition_level_count,
            output_lwe_size,
        }
    }
}

impl<Scalar> LweKeyswitchKey<Scalar> {
    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.decomposition_level_count
    }

    pub fn output_lwe_size(&self) -> LweSize {
        self.output_lwe_size
    }

    /// The number of trailing large-key coordinates covered by this key.
    pub fn input_lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.len() / (self.decomposition_level_count.0 * self.output_lwe_size.0))
    }

    /// The LWE row for trailing coordinate `index` and decomposition level
    /// `level` (weight `Q/B^(level+1)`).
    pub fn get_row(&self, index: usize, level: usize) -> LweCiphertextView<'_, Scalar> {
        let row_len = self.output_lwe_size.0;
        let start = (index * self.decomposition_level_count.0 + level) * row_len;
        LweCiphertext::from_container(&self.data[start..start + row_len])
    }

    pub fn get_mut_row(&mut self, index: usize, level: usize) -> LweCiphertextMutView<'_, Scalar> {
        let row_len = self.output_lwe_size.0;
        let start = (index * self.decomposition_level_count.0 + level) * row_len;
        LweCiphertext::from_container(&mut self.data[start..start + row_len])
    }

    pub(crate) fn row_len(&self) -> usize {
        self.output_lwe_size.0 * self.decomposition_level_count.0
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Scalar] {
        &mut self.data
    }
}
