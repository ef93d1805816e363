//! Signed gadget decomposition of torus elements.
//!
//! A torus element `x` is rounded to its closest multiple of
//! $Q / B^{\ell}$ and expanded into $\ell$ balanced digits $d\_i$ with
//! $|d\_i| \le B/2$ such that $\sum\_i d\_i \cdot Q/B^{i+1} \equiv x \pmod
//! Q$ up to the rounding.

use crate::commons::numeric::UnsignedInteger;
use crate::commons::parameters::{DecompositionBaseLog, DecompositionLevel, DecompositionLevelCount};
use crate::entities::polynomial::Polynomial;
use crate::commons::traits::{Container, ContainerMut};

/// A decomposer of torus scalars and polynomials into signed balanced
/// digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedDecomposer<Scalar: UnsignedInteger> {
    pub base_log: DecompositionBaseLog,
    pub level_count: DecompositionLevelCount,
    _marker: std::marker::PhantomData<Scalar>,
}

impl<Scalar: UnsignedInteger> SignedDecomposer<Scalar> {
    pub fn new(base_log: DecompositionBaseLog, level_count: DecompositionLevelCount) -> Self {
        assert!(
            Scalar::BITS >= base_log.0 * level_count.0,
            "Decomposed bits exceed the size of the integer type"
        );
        Self {
            base_log,
            level_count,
            _marker: std::marker::PhantomData,
        }
    }

    /// Round the input to its closest representable value and return the
    /// decomposition state holding the represented bits.
    #[inline]
    pub fn init_decomposer_state(&self, input: Scalar) -> Scalar {
        let rep_bit_count = self.base_log.0 * self.level_count.0;
        let non_rep_bit_count = Scalar::BITS - rep_bit_count;
        if non_rep_bit_count == 0 {
            return input;
        }
        // rounding half up on the first non represented bit
        let mut res = input >> (non_rep_bit_count - 1);
        res += res & Scalar::ONE;
        res >> 1
    }

    /// Return the value obtained by rounding the input to its closest
    /// representable multiple of $Q / B^{\ell}$.
    pub fn closest_representable(&self, input: Scalar) -> Scalar {
        let non_rep_bit_count = Scalar::BITS - self.base_log.0 * self.level_count.0;
        if non_rep_bit_count == 0 {
            return input;
        }
        self.init_decomposer_state(input) << non_rep_bit_count
    }

    /// Return an iterator yielding the terms of the decomposition, finest
    /// level first.
    pub fn decompose(&self, input: Scalar) -> SignedDecompositionIter<Scalar> {
        SignedDecompositionIter::new(
            self.init_decomposer_state(input),
            self.base_log,
            self.level_count,
        )
    }

    /// Decompose a scalar and write digit `i` (the one weighted by
    /// $Q/B^{i+1}$) into `output[i]`.
    pub fn decompose_scalar_assign(&self, input: Scalar, output: &mut [Scalar]) {
        debug_assert_eq!(output.len(), self.level_count.0);
        let mut state = self.init_decomposer_state(input);
        let mod_b_mask = (Scalar::ONE << self.base_log.0) - Scalar::ONE;
        for level in (0..self.level_count.0).rev() {
            output[level] = decompose_one_level(self.base_log.0, &mut state, mod_b_mask);
        }
    }

    /// Coefficient-wise polynomial decomposition; digit polynomial `i` (the
    /// one weighted by $Q/B^{i+1}$) is written into `output[i]`.
    pub fn decompose_polynomial_assign<InputCont, OutputCont>(
        &self,
        input: &Polynomial<InputCont>,
        output: &mut [Polynomial<OutputCont>],
    ) where
        InputCont: Container<Element = Scalar>,
        OutputCont: ContainerMut<Element = Scalar>,
    {
        debug_assert_eq!(output.len(), self.level_count.0);
        let mod_b_mask = (Scalar::ONE << self.base_log.0) - Scalar::ONE;
        for (coeff_idx, &coeff) in input.as_ref().iter().enumerate() {
            let mut state = self.init_decomposer_state(coeff);
            for level in (0..self.level_count.0).rev() {
                output[level].as_mut()[coeff_idx] =
                    decompose_one_level(self.base_log.0, &mut state, mod_b_mask);
            }
        }
    }
}

#[inline(always)]
fn decompose_one_level<Scalar: UnsignedInteger>(
    base_log: usize,
    state: &mut Scalar,
    mod_b_mask: Scalar,
) -> Scalar {
    let res = *state & mod_b_mask;
    *state >>= base_log;
    let mut carry = (res.wrapping_sub(Scalar::ONE) | *state) & res;
    carry >>= base_log - 1;
    *state += carry;
    res.wrapping_sub(carry << base_log)
}

/// A single term of a signed decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecompositionTerm<Scalar: UnsignedInteger> {
    level: DecompositionLevel,
    base_log: DecompositionBaseLog,
    value: Scalar,
}

impl<Scalar: UnsignedInteger> DecompositionTerm<Scalar> {
    pub fn level(&self) -> DecompositionLevel {
        self.level
    }

    /// The balanced digit, as a wrapped unsigned value.
    pub fn value(&self) -> Scalar {
        self.value
    }

    /// This term times its gadget weight $Q/B^{level}$.
    pub fn to_recomposition_summand(&self) -> Scalar {
        let shift = Scalar::BITS - self.base_log.0 * self.level.0;
        self.value << shift
    }
}

/// An iterator yielding the terms of a signed decomposition, finest level
/// (largest level index) first.
pub struct SignedDecompositionIter<Scalar: UnsignedInteger> {
    base_log: usize,
    state: Scalar,
    current_level: usize,
    mod_b_mask: Scalar,
}

impl<Scalar: UnsignedInteger> SignedDecompositionIter<Scalar> {
    fn new(state: Scalar, base_log: DecompositionBaseLog, level: DecompositionLevelCount) -> Self {
        Self {
            base_log: base_log.0,
            state,
            current_level: level.0,
            mod_b_mask: (Scalar::ONE << base_log.0) - Scalar::ONE,
        }
    }
}

impl<Scalar: UnsignedInteger> Iterator for SignedDecompositionIter<Scalar> {
    type Item = DecompositionTerm<Scalar>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_level == 0 {
            return None;
        }
        let value = decompose_one_level(self.base_log, &mut self.state, self.mod_b_mask);
        let level = self.current_level;
        self.current_level -= 1;
        Some(DecompositionTerm {
            level: DecompositionLevel(level),
            base_log: DecompositionBaseLog(self.base_log),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::math::random::{ActivatedRandomGenerator, RandomGenerator};
    use crate::commons::numeric::Numeric;
    use tfhe_csprng::seeders::Seed;

    fn test_decompose_recompose<Scalar: UnsignedInteger>(
        base_log: DecompositionBaseLog,
        level_count: DecompositionLevelCount,
    ) {
        let mut generator = RandomGenerator::<ActivatedRandomGenerator>::new(Seed(0));
        let decomposer = SignedDecomposer::<Scalar>::new(base_log, level_count);
        let half_base = Scalar::ONE << (base_log.0 - 1);

        for _ in 0..1000 {
            let input = generator.random_uniform::<Scalar>();
            let rounded = decomposer.closest_representable(input);

            let mut digits = vec![Scalar::ZERO; level_count.0];
            decomposer.decompose_scalar_assign(input, &mut digits);

            let mut recomposed = Scalar::ZERO;
            for (i, &digit) in digits.iter().enumerate() {
                // |digit| <= B/2, as a wrapped signed value
                let abs = digit.min(digit.wrapping_neg());
                assert!(abs <= half_base);
                let weight_log = Scalar::BITS - (i + 1) * base_log.0;
                recomposed = recomposed.wrapping_add(digit.wrapping_mul(Scalar::ONE << weight_log));
            }
            assert_eq!(recomposed, rounded);

            // the iterator agrees with the slice variant
            for term in decomposer.decompose(input) {
                assert_eq!(term.value(), digits[term.level().0 - 1]);
            }
        }
    }

    #[test]
    fn decompose_recompose_u32() {
        test_decompose_recompose::<u32>(DecompositionBaseLog(4), DecompositionLevelCount(3));
    }

    #[test]
    fn decompose_recompose_u64() {
        test_decompose_recompose::<u64>(DecompositionBaseLog(7), DecompositionLevelCount(3));
        test_decompose_recompose::<u64>(DecompositionBaseLog(22), DecompositionLevelCount(1));
    }

    #[test]
    fn closest_representable_rounds() {
        let decomposer =
            SignedDecomposer::<u64>::new(DecompositionBaseLog(8), DecompositionLevelCount(2));
        let step = 1u64 << (u64::BITS as usize - 16);
        assert_eq!(decomposer.closest_representable(step + step / 2 + 1), 2 * step);
        assert_eq!(decomposer.closest_representable(step + step / 2 - 1), step);
    }
}
