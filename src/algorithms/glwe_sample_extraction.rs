//! Extraction of a single LWE ciphertext from a GLWE ciphertext, usually
//! referred to as _sample extract_.

use crate::algorithms::slice_algorithms::slice_wrapping_opposite_assign;
use crate::commons::numeric::UnsignedInteger;
use crate::commons::parameters::MonomialDegree;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::glwe_ciphertext::GlweCiphertext;
use crate::entities::lwe_ciphertext::LweCiphertext;

/// Extract the `nth` coefficient of the phase of `input_glwe` as an LWE
/// ciphertext under the flattened GLWE key.
pub fn extract_lwe_sample_from_glwe_ciphertext<Scalar, InputCont, OutputCont>(
    input_glwe: &GlweCiphertext<InputCont>,
    output_lwe: &mut LweCiphertext<OutputCont>,
    nth: MonomialDegree,
) where
    Scalar: UnsignedInteger,
    InputCont: Container<Element = Scalar>,
    OutputCont: ContainerMut<Element = Scalar>,
{
    let in_lwe_dim = input_glwe
        .glwe_size()
        .to_glwe_dimension()
        .to_equivalent_lwe_dimension(input_glwe.polynomial_size());
    let out_lwe_dim = output_lwe.lwe_dimension();

    assert_eq!(
        in_lwe_dim, out_lwe_dim,
        "Mismatch between equivalent LweDimension of input ciphertext and output ciphertext. \
        Got {in_lwe_dim:?} for input and {out_lwe_dim:?} for output.",
    );

    let polynomial_size = input_glwe.polynomial_size().0;

    // We copy the body
    let body_coefficient = input_glwe.get_body().as_ref()[nth.0];

    let (lwe_mask, lwe_body) = output_lwe.get_mut_mask_and_body();
    *lwe_body = body_coefficient;

    // We copy the mask; each polynomial is in the wrong order
    lwe_mask.copy_from_slice(input_glwe.get_mask());

    // The number of elements which must be turned into their opposite
    let opposite_count = polynomial_size - nth.0 - 1;

    for lwe_mask_poly in lwe_mask.chunks_exact_mut(polynomial_size) {
        lwe_mask_poly.reverse();
        slice_wrapping_opposite_assign(&mut lwe_mask_poly[0..opposite_count]);
        lwe_mask_poly.rotate_left(opposite_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::slice_algorithms::slice_wrapping_dot_product;
    use crate::commons::parameters::{GlweSize, PolynomialSize};
    use crate::entities::glwe_ciphertext::GlweCiphertextOwned;
    use crate::entities::lwe_ciphertext::LweCiphertextOwned;

    #[test]
    fn extracted_phase_matches_polynomial_product() {
        // phase(glwe)[0] = body[0] - sum_j (mask_j * key_j)[0]; the extracted
        // LWE must decrypt to the same value under the flattened key
        let polynomial_size = PolynomialSize(8);
        let glwe_size = GlweSize(3);

        let mut glwe = GlweCiphertextOwned::<u64>::new(glwe_size, polynomial_size);
        for (i, coeff) in glwe.as_mut().iter_mut().enumerate() {
            *coeff = (i as u64).wrapping_mul(0xDEAD_BEEF_CAFE_F00D);
        }
        let key: Vec<u64> = (0..16).map(|i| (i % 2) as u64).collect();

        let mut lwe = LweCiphertextOwned::<u64>::new(
            glwe_size
                .to_glwe_dimension()
                .to_equivalent_lwe_dimension(polynomial_size)
                .to_lwe_size(),
        );
        extract_lwe_sample_from_glwe_ciphertext(&glwe, &mut lwe, MonomialDegree(0));

        // constant coefficient of sum_j mask_j * key_j in the negacyclic ring
        let mut acc = 0u64;
        for (mask_poly, key_poly) in glwe
            .get_mask()
            .chunks_exact(polynomial_size.0)
            .zip(key.chunks_exact(polynomial_size.0))
        {
            acc = acc.wrapping_add(mask_poly[0].wrapping_mul(key_poly[0]));
            for i in 1..polynomial_size.0 {
                acc = acc.wrapping_sub(mask_poly[i].wrapping_mul(key_poly[polynomial_size.0 - i]));
            }
        }
        let expected_phase = glwe.get_body().as_ref()[0].wrapping_sub(acc);

        let lwe_phase = lwe
            .get_body()
            .wrapping_sub(slice_wrapping_dot_product(lwe.get_mask(), &key));
        assert_eq!(lwe_phase, expected_phase);
    }
}
