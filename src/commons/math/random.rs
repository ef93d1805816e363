//! Random sampling of the masks, keys and noise of the scheme.
//!
//! The byte streams come from `tfhe-csprng`; this module assembles them into
//! the distributions needed by the encryption layer: uniform torus elements,
//! (block-)binary key coefficients and torus Gaussians.

pub use tfhe_csprng::generators::RandomGenerator as ByteRandomGenerator;
pub use tfhe_csprng::seeders::{Seed, Seeder};

use crate::commons::dispersion::StandardDev;
use crate::commons::numeric::UnsignedInteger;
use crate::commons::parameters::BlockSize;
use crate::commons::torus::UnsignedTorus;

#[cfg(all(target_arch = "x86_64", target_feature = "aes"))]
use tfhe_csprng::generators::AesniRandomGenerator;
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
use tfhe_csprng::generators::NeonAesRandomGenerator;
#[cfg(all(
    not(all(target_arch = "x86_64", target_feature = "aes")),
    not(all(target_arch = "aarch64", target_feature = "neon"))
))]
use tfhe_csprng::generators::SoftwareRandomGenerator;

/// The most efficient CSPRNG implementation available on the target.
#[cfg(all(target_arch = "x86_64", target_feature = "aes"))]
pub type ActivatedRandomGenerator = AesniRandomGenerator;
#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub type ActivatedRandomGenerator = NeonAesRandomGenerator;
#[cfg(all(
    not(all(target_arch = "x86_64", target_feature = "aes")),
    not(all(target_arch = "aarch64", target_feature = "neon"))
))]
pub type ActivatedRandomGenerator = SoftwareRandomGenerator;

/// A cryptographically secure random number generator, sampling the
/// distributions used by the scheme from a byte-level CSPRNG.
pub struct RandomGenerator<G: ByteRandomGenerator>(G);

impl<G: ByteRandomGenerator + Iterator<Item = u8>> RandomGenerator<G> {
    pub fn new(seed: Seed) -> Self {
        Self(G::new(seed))
    }

    pub fn generate_next(&mut self) -> u8 {
        self.0.next().unwrap()
    }

    /// Generate a uniform unsigned integer over the full range of the type.
    pub fn random_uniform<Scalar: UnsignedInteger>(&mut self) -> Scalar {
        let mut value = Scalar::ZERO;
        for _ in 0..Scalar::BITS / 8 {
            value = (value << 8) | Scalar::cast_from(u64::from(self.generate_next()));
        }
        value
    }

    pub fn fill_slice_with_random_uniform<Scalar: UnsignedInteger>(
        &mut self,
        output: &mut [Scalar],
    ) {
        for element in output.iter_mut() {
            *element = self.random_uniform();
        }
    }

    /// Generate a uniform bit.
    pub fn random_uniform_binary<Scalar: UnsignedInteger>(&mut self) -> Scalar {
        Scalar::cast_from(u64::from(self.generate_next() & 1))
    }

    pub fn fill_slice_with_random_uniform_binary<Scalar: UnsignedInteger>(
        &mut self,
        output: &mut [Scalar],
    ) {
        for element in output.iter_mut() {
            *element = self.random_uniform_binary();
        }
    }

    /// Fill the slice with a block-binary sample: each contiguous block of
    /// `block_size` coefficients contains exactly one coefficient equal to
    /// one, at a uniform position.
    ///
    /// # Panics
    ///
    /// Panics if the slice length is not a multiple of the block size.
    pub fn fill_slice_with_random_uniform_binary_blocks<Scalar: UnsignedInteger>(
        &mut self,
        block_size: BlockSize,
        output: &mut [Scalar],
    ) {
        assert!(
            output.len() % block_size.0 == 0,
            "Slice length {} is not a multiple of the block size {}",
            output.len(),
            block_size.0
        );
        for block in output.chunks_exact_mut(block_size.0) {
            block.fill(Scalar::ZERO);
            let index = self.random_bounded(block_size.0 as u64) as usize;
            block[index] = Scalar::ONE;
        }
    }

    // Uniform value in [0, bound), by rejection on the top of the u64 range.
    fn random_bounded(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        let threshold = u64::MAX - u64::MAX % bound;
        loop {
            let candidate = self.random_uniform::<u64>();
            if candidate < threshold {
                return candidate % bound;
            }
        }
    }

    // Uniform f64 in [0, 1) with 53 bits of precision.
    fn random_uniform_float(&mut self) -> f64 {
        (self.random_uniform::<u64>() >> 11) as f64 * 2.0f64.powi(-53)
    }

    /// Generate two independent samples of a centered Gaussian of the given
    /// standard deviation, by the polar Box-Muller method.
    pub fn random_gaussian_pair(&mut self, std: f64) -> (f64, f64) {
        loop {
            let u = 2.0 * self.random_uniform_float() - 1.0;
            let v = 2.0 * self.random_uniform_float() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                let cst = std * (-2.0 * s.ln() / s).sqrt();
                return (u * cst, v * cst);
            }
        }
    }

    /// Generate a torus element carrying a centered Gaussian of the given
    /// torus-normalised standard deviation.
    pub fn random_gaussian_torus<Scalar: UnsignedTorus>(&mut self, std: StandardDev) -> Scalar {
        let (sample, _) = self.random_gaussian_pair(std.0);
        Scalar::from_torus(sample)
    }

    pub fn fill_slice_with_random_gaussian_torus<Scalar: UnsignedTorus>(
        &mut self,
        std: StandardDev,
        output: &mut [Scalar],
    ) {
        for chunk in output.chunks_mut(2) {
            let (first, second) = self.random_gaussian_pair(std.0);
            chunk[0] = Scalar::from_torus(first);
            if let Some(element) = chunk.get_mut(1) {
                *element = Scalar::from_torus(second);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_binary_has_unit_hamming_weight_per_block() {
        let mut generator = RandomGenerator::<ActivatedRandomGenerator>::new(Seed(42));
        let block_size = BlockSize(4);
        let mut key = vec![0u64; 64];
        for _ in 0..1000 {
            generator.fill_slice_with_random_uniform_binary_blocks(block_size, &mut key);
            for block in key.chunks_exact(block_size.0) {
                assert_eq!(block.iter().sum::<u64>(), 1);
            }
        }
    }

    #[test]
    fn gaussian_is_centered() {
        let mut generator = RandomGenerator::<ActivatedRandomGenerator>::new(Seed(7));
        let std = 2.0f64.powi(-25);
        let samples: Vec<f64> = (0..10_000)
            .map(|_| generator.random_gaussian_pair(std).0)
            .collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 5.0 * std / (samples.len() as f64).sqrt() + std / 100.0);
        assert!(samples.iter().all(|s| s.abs() < 10.0 * std));
    }

    #[test]
    fn uniform_binary_is_a_bit() {
        let mut generator = RandomGenerator::<ActivatedRandomGenerator>::new(Seed(3));
        for _ in 0..100 {
            let bit: u32 = generator.random_uniform_binary();
            assert!(bit == 0 || bit == 1);
        }
    }
}
