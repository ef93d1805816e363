//! Arithmetic over polynomials of the negacyclic ring.

use crate::algorithms::slice_algorithms::*;
use crate::commons::numeric::UnsignedInteger;
use crate::commons::parameters::MonomialDegree;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::polynomial::Polynomial;

pub fn polynomial_wrapping_add_assign<Scalar, OutputCont, InputCont>(
    output: &mut Polynomial<OutputCont>,
    rhs: &Polynomial<InputCont>,
) where
    Scalar: UnsignedInteger,
    OutputCont: ContainerMut<Element = Scalar>,
    InputCont: Container<Element = Scalar>,
{
    slice_wrapping_add_assign(output.as_mut(), rhs.as_ref());
}

pub fn polynomial_wrapping_sub_assign<Scalar, OutputCont, InputCont>(
    output: &mut Polynomial<OutputCont>,
    rhs: &Polynomial<InputCont>,
) where
    Scalar: UnsignedInteger,
    OutputCont: ContainerMut<Element = Scalar>,
    InputCont: Container<Element = Scalar>,
{
    slice_wrapping_sub_assign(output.as_mut(), rhs.as_ref());
}

/// `output = input * scalar`, coefficient-wise.
pub fn polynomial_wrapping_scalar_mul<Scalar, OutputCont, InputCont>(
    output: &mut Polynomial<OutputCont>,
    input: &Polynomial<InputCont>,
    scalar: Scalar,
) where
    Scalar: UnsignedInteger,
    OutputCont: ContainerMut<Element = Scalar>,
    InputCont: Container<Element = Scalar>,
{
    assert_eq!(output.polynomial_size(), input.polynomial_size());
    for (out, &inp) in output.as_mut().iter_mut().zip(input.as_ref()) {
        *out = inp.wrapping_mul(scalar);
    }
}

/// `output = input * X^degree` in the negacyclic ring: a rotation of the
/// coefficients with sign flips on wrap-around. Degrees are taken modulo
/// `2N`; degrees in `[N, 2N)` negate the whole polynomial.
pub fn polynomial_wrapping_monic_monomial_mul<Scalar, OutputCont, InputCont>(
    output: &mut Polynomial<OutputCont>,
    input: &Polynomial<InputCont>,
    degree: MonomialDegree,
) where
    Scalar: UnsignedInteger,
    OutputCont: ContainerMut<Element = Scalar>,
    InputCont: Container<Element = Scalar>,
{
    let polynomial_size = output.polynomial_size().0;
    assert_eq!(polynomial_size, input.polynomial_size().0);

    let full_cycles = (degree.0 % (2 * polynomial_size)) >= polynomial_size;
    let degree = degree.0 % polynomial_size;

    let output = output.as_mut();
    let input = input.as_ref();

    // out[i] = in[i - degree], negated when i - degree wraps
    let (out_head, out_tail) = output.split_at_mut(degree);
    out_head.copy_from_slice(&input[polynomial_size - degree..]);
    slice_wrapping_opposite_assign(out_head);
    out_tail.copy_from_slice(&input[..polynomial_size - degree]);

    if full_cycles {
        slice_wrapping_opposite_assign(output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::parameters::PolynomialSize;
    use crate::entities::polynomial::PolynomialOwned;

    fn monomial_mul_naive(input: &[u64], degree: usize) -> Vec<u64> {
        let n = input.len();
        let mut out = vec![0u64; n];
        for (i, &coeff) in input.iter().enumerate() {
            let target = (i + degree) % (2 * n);
            if target < n {
                out[target] = out[target].wrapping_add(coeff);
            } else {
                out[target - n] = out[target - n].wrapping_sub(coeff);
            }
        }
        out
    }

    #[test]
    fn monomial_mul_matches_naive() {
        let polynomial_size = PolynomialSize(16);
        let mut input = PolynomialOwned::<u64>::new(polynomial_size);
        for (i, coeff) in input.as_mut().iter_mut().enumerate() {
            *coeff = (i as u64).wrapping_mul(0x0123_4567_89AB_CDEF);
        }
        let mut output = PolynomialOwned::<u64>::new(polynomial_size);

        for degree in [0usize, 1, 5, 15, 16, 17, 31, 32, 33, 63] {
            polynomial_wrapping_monic_monomial_mul(
                &mut output,
                &input,
                MonomialDegree(degree),
            );
            assert_eq!(
                output.as_ref(),
                monomial_mul_naive(input.as_ref(), degree).as_slice(),
                "degree {degree}"
            );
        }
    }
}
