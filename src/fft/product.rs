//! Pointwise products and accumulations in the Fourier domain.
//!
//! The blind-rotation kernel decomposes its accumulator once per block and
//! reuses the decomposition for every CMUX of the block, so the products
//! here take already-decomposed, already-transformed inputs.

use crate::commons::traits::Container;
use crate::entities::fourier_ggsw_ciphertext::FourierGgswCiphertextView;
use crate::entities::fourier_glwe_ciphertext::FourierGlweCiphertextOwned;
use crate::fft::{FourierPolynomial, FourierPolynomialOwned};
use tfhe_fft::c64;

/// `output (+)= lhs * rhs`, chunk by chunk, where `rhs` is a single Fourier
/// polynomial multiplying every polynomial of `lhs`.
pub(crate) fn update_with_fmadd(
    output: &mut [c64],
    lhs_polynomial_list: &[c64],
    fourier: &[c64],
    is_output_uninit: bool,
    fourier_poly_size: usize,
) {
    if is_output_uninit {
        for (output, lhs_polynomial) in output
            .chunks_exact_mut(fourier_poly_size)
            .zip(lhs_polynomial_list.chunks_exact(fourier_poly_size))
        {
            for ((out, &lhs), &rhs) in output.iter_mut().zip(lhs_polynomial).zip(fourier) {
                *out = lhs * rhs;
            }
        }
    } else {
        for (output, lhs_polynomial) in output
            .chunks_exact_mut(fourier_poly_size)
            .zip(lhs_polynomial_list.chunks_exact(fourier_poly_size))
        {
            for ((out, &lhs), &rhs) in output.iter_mut().zip(lhs_polynomial).zip(fourier) {
                *out += lhs * rhs;
            }
        }
    }
}

/// Gadget product of the body rows of `ggsw` with the decomposed body
/// digits, overwriting `out`.
///
/// This is the external product specialised to a trivial accumulator whose
/// mask is zero: only the body decomposition contributes, against the last
/// (body) row of each level matrix.
pub fn gadget_product_fourier_decomposed(
    ggsw: FourierGgswCiphertextView<'_>,
    decomposed_body: &[FourierPolynomialOwned],
    out: &mut FourierGlweCiphertextOwned,
) {
    let fourier_poly_size = ggsw.fourier_polynomial_size().0;
    let body_row = ggsw.glwe_size().0 - 1;
    debug_assert_eq!(decomposed_body.len(), ggsw.decomposition_level_count().0);

    let mut is_output_uninit = true;
    for (level, digit) in decomposed_body.iter().enumerate() {
        let row = ggsw.get_row(level, body_row);
        update_with_fmadd(
            out.as_mut(),
            row.as_ref(),
            digit.data.as_ref(),
            is_output_uninit,
            fourier_poly_size,
        );
        is_output_uninit = false;
    }
}

/// External product of `ggsw` with a fully decomposed GLWE ciphertext,
/// overwriting `out`. `decomposed[j][l]` is digit `l` of polynomial `j`.
pub fn external_product_fourier_decomposed(
    ggsw: FourierGgswCiphertextView<'_>,
    decomposed: &[Vec<FourierPolynomialOwned>],
    out: &mut FourierGlweCiphertextOwned,
) {
    let fourier_poly_size = ggsw.fourier_polynomial_size().0;
    debug_assert_eq!(decomposed.len(), ggsw.glwe_size().0);

    let mut is_output_uninit = true;
    for (poly_idx, digits) in decomposed.iter().enumerate() {
        debug_assert_eq!(digits.len(), ggsw.decomposition_level_count().0);
        for (level, digit) in digits.iter().enumerate() {
            let row = ggsw.get_row(level, poly_idx);
            update_with_fmadd(
                out.as_mut(),
                row.as_ref(),
                digit.data.as_ref(),
                is_output_uninit,
                fourier_poly_size,
            );
            is_output_uninit = false;
        }
    }
}

/// `out = glwe * fourier_poly`, polynomial by polynomial.
pub fn fourier_glwe_polynomial_mul<C: Container<Element = c64>>(
    glwe: &FourierGlweCiphertextOwned,
    fourier_poly: &FourierPolynomial<C>,
    out: &mut FourierGlweCiphertextOwned,
) {
    let fourier_poly = fourier_poly.data.as_ref();
    let fourier_poly_size = fourier_poly.len();
    for (out, lhs) in out
        .as_mut()
        .chunks_exact_mut(fourier_poly_size)
        .zip(glwe.as_ref().chunks_exact(fourier_poly_size))
    {
        for ((out, &lhs), &rhs) in out.iter_mut().zip(lhs).zip(fourier_poly) {
            *out = lhs * rhs;
        }
    }
}

/// `out += glwe * fourier_poly`, polynomial by polynomial.
pub fn fourier_glwe_polynomial_mul_add<C: Container<Element = c64>>(
    glwe: &FourierGlweCiphertextOwned,
    fourier_poly: &FourierPolynomial<C>,
    out: &mut FourierGlweCiphertextOwned,
) {
    let fourier_poly = fourier_poly.data.as_ref();
    let fourier_poly_size = fourier_poly.len();
    for (out, lhs) in out
        .as_mut()
        .chunks_exact_mut(fourier_poly_size)
        .zip(glwe.as_ref().chunks_exact(fourier_poly_size))
    {
        for ((out, &lhs), &rhs) in out.iter_mut().zip(lhs).zip(fourier_poly) {
            *out += lhs * rhs;
        }
    }
}

/// `out -= rhs`, coefficient-wise.
pub fn fourier_glwe_sub_assign(
    out: &mut FourierGlweCiphertextOwned,
    rhs: &FourierGlweCiphertextOwned,
) {
    for (out, &rhs) in out.as_mut().iter_mut().zip(rhs.as_ref()) {
        *out -= rhs;
    }
}
