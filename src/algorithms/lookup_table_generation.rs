//! Construction of the blind-rotation lookup tables.
//!
//! All tables use the negacyclic packing: a degree-`L` table can only carry
//! half the message domain explicitly, the other half being its negated
//! image through `X^L = -1`. The full-domain evaluation strategies are built
//! from three table families:
//!
//! - the generic half-domain table of an arbitrary function;
//! - the *compress* table, whose codewords encode the input together with a
//!   half-domain indicator, so a second pass can resolve the full domain;
//! - the *recursive negacyclic decomposition*: a telescope of tables of
//!   halving size whose blind rotations sum to the function, plus a base
//!   table evaluated through the compress pass.

use crate::algorithms::slice_algorithms::slice_wrapping_opposite_assign;
use crate::commons::numeric::{divide_round_usize, UnsignedInteger};
use crate::commons::parameters::{ExtendFactor, MessageModulus, PolynomialSize};
use crate::commons::torus::UnsignedTorus;
use crate::entities::lookup_table::LookupTable;
use crate::parameters::{Parameters, BASE_POLYNOMIAL_SIZE};

/// Allocate and fill the half-domain table of `f` over the parameter message
/// modulus.
pub fn generate_lookup_table<Scalar, F>(
    parameters: &Parameters<Scalar>,
    f: F,
) -> LookupTable<Scalar>
where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> u64,
{
    let mut lut = LookupTable::new(parameters);
    generate_lookup_table_assign(parameters, f, &mut lut);
    lut
}

/// Fill `lut_out` with the half-domain table of `f`.
pub fn generate_lookup_table_assign<Scalar, F>(
    parameters: &Parameters<Scalar>,
    f: F,
    lut_out: &mut LookupTable<Scalar>,
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> u64,
{
    generate_lookup_table_custom_assign(
        parameters,
        f,
        parameters.message_modulus(),
        parameters.scale(),
        lut_out,
    );
}

/// Fill `lut_out` with the half-domain table of `f` under a custom message
/// modulus and scale.
pub fn generate_lookup_table_custom_assign<Scalar, F>(
    parameters: &Parameters<Scalar>,
    f: F,
    message_modulus: MessageModulus,
    scale: Scalar,
    lut_out: &mut LookupTable<Scalar>,
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> u64,
{
    generate_lookup_table_full_assign(
        parameters,
        |x| parameters.encode_custom(f(x), message_modulus, scale),
        message_modulus,
        lut_out,
    );
}

/// Fill `lut_out` with the half-domain table of an already-encoded function.
pub fn generate_lookup_table_full_assign<Scalar, F>(
    _parameters: &Parameters<Scalar>,
    f: F,
    message_modulus: MessageModulus,
    lut_out: &mut LookupTable<Scalar>,
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> Scalar,
{
    let lut_size = lut_out.lookup_table_size().0;
    let p = message_modulus.0 as usize;
    let mut raw = vec![Scalar::ZERO; lut_size];

    for x in 0..p / 2 {
        let start = divide_round_usize(2 * x * lut_size, p);
        let end = divide_round_usize(2 * (x + 1) * lut_size, p);
        raw[start..end].fill(f(x as u64));
    }

    let offset = divide_round_usize(lut_size, p);
    rotate_and_negate_tail(&mut raw, offset);

    lut_out.fill_with_interleaved_raw(&raw);
}

/// Allocate the single-polynomial compression table at the ring degree.
pub fn new_compress_lut<Scalar: UnsignedTorus>(
    parameters: &Parameters<Scalar>,
) -> LookupTable<Scalar> {
    LookupTable::new_custom(ExtendFactor(1), parameters.polynomial_size())
}

/// Allocate and fill the compression table.
pub fn generate_compress_lut<Scalar: UnsignedTorus>(
    parameters: &Parameters<Scalar>,
) -> LookupTable<Scalar> {
    let mut lut = new_compress_lut(parameters);
    generate_compress_lut_assign(parameters, &mut lut);
    lut
}

/// Fill `lut_out` with the compression table at the ring degree, in slot 0:
/// the codeword of `x` is `(Q/2p)·x + Q/4p`, so a bootstrap through it
/// produces `x` together with its half-domain indicator.
pub fn generate_compress_lut_assign<Scalar>(
    parameters: &Parameters<Scalar>,
    lut_out: &mut LookupTable<Scalar>,
) where
    Scalar: UnsignedTorus,
{
    let poly_size = lut_out.polynomial_size().0;
    let p = parameters.message_modulus().0 as usize;
    let mut raw = vec![Scalar::ZERO; poly_size];
    fill_compress_codewords::<Scalar>(&mut raw, p);

    let offset = divide_round_usize(poly_size, p);
    rotate_and_negate_tail(&mut raw, offset);

    let mut slot = lut_out.get_mut_polynomial(0);
    slot.as_mut().copy_from_slice(&raw);
}

/// Extended variant of [`generate_compress_lut_assign`]: the codewords span
/// the whole lookup-table size and are interleaved over every slot.
pub fn generate_extended_compress_lut_assign<Scalar>(
    parameters: &Parameters<Scalar>,
    lut_out: &mut LookupTable<Scalar>,
) where
    Scalar: UnsignedTorus,
{
    let lut_size = lut_out.lookup_table_size().0;
    let p = parameters.message_modulus().0 as usize;
    let mut raw = vec![Scalar::ZERO; lut_size];
    fill_compress_codewords::<Scalar>(&mut raw, p);

    let offset = divide_round_usize(lut_size, p);
    rotate_and_negate_tail(&mut raw, offset);

    lut_out.fill_with_interleaved_raw(&raw);
}

fn fill_compress_codewords<Scalar: UnsignedTorus>(raw: &mut [Scalar], p: usize) {
    let len = raw.len();
    let p_scalar = Scalar::cast_from(p as u64);
    let half_q_over_p = (Scalar::ONE << (Scalar::BITS - 1)) / p_scalar;
    let quarter_q_over_p = (Scalar::ONE << (Scalar::BITS - 2)) / p_scalar;
    for x in 0..p / 2 {
        let start = divide_round_usize(2 * x * len, p);
        let end = divide_round_usize(2 * (x + 1) * len, p);
        let codeword = half_q_over_p
            .wrapping_mul(Scalar::cast_from(x as u64))
            .wrapping_add(quarter_q_over_p);
        raw[start..end].fill(codeword);
    }
}

/// Fill `lut_out` with the full-domain table of `f` consumed by the second
/// pass of classical FDFB: both halves are explicit, the upper half holding
/// the negated image that the compress pass will flip back.
pub fn generate_extended_fdfb_lut_assign<Scalar, F>(
    parameters: &Parameters<Scalar>,
    f: F,
    lut_out: &mut LookupTable<Scalar>,
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> u64,
{
    generate_extended_fdfb_lut_custom_assign(
        parameters,
        f,
        parameters.message_modulus(),
        parameters.scale(),
        lut_out,
    );
}

pub fn generate_extended_fdfb_lut_custom_assign<Scalar, F>(
    parameters: &Parameters<Scalar>,
    f: F,
    message_modulus: MessageModulus,
    scale: Scalar,
    lut_out: &mut LookupTable<Scalar>,
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> u64,
{
    generate_extended_fdfb_lut_full_assign(
        parameters,
        |x| parameters.encode_custom(f(x), message_modulus, scale),
        message_modulus,
        lut_out,
    );
}

pub fn generate_extended_fdfb_lut_full_assign<Scalar, F>(
    _parameters: &Parameters<Scalar>,
    f: F,
    message_modulus: MessageModulus,
    lut_out: &mut LookupTable<Scalar>,
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> Scalar,
{
    let lut_size = lut_out.lookup_table_size().0;
    let p = message_modulus.0 as usize;
    let mut raw = vec![Scalar::ZERO; lut_size];

    for x in 0..p / 2 {
        let start = divide_round_usize(x * lut_size, p);
        let end = divide_round_usize((x + 1) * lut_size, p);
        raw[start..end].fill(f(x as u64));
    }
    for x in p / 2..p {
        let start = divide_round_usize(x * lut_size, p);
        let end = divide_round_usize((x + 1) * lut_size, p);
        let y = f((p - x + p / 2 - 1) as u64);
        raw[start..end].fill(y.wrapping_neg());
    }

    lut_out.fill_with_interleaved_raw(&raw);
}

/// The number of tables of the recursive negacyclic decomposition:
/// `log2(L / BASE_POLYNOMIAL_SIZE)` negacyclic tables plus the base table.
pub fn decomposed_lut_count<Scalar: UnsignedTorus>(parameters: &Parameters<Scalar>) -> usize {
    let ratio = parameters.lookup_table_size().0 / BASE_POLYNOMIAL_SIZE.0;
    debug_assert!(ratio.is_power_of_two());
    ratio.ilog2() as usize + 1
}

/// Allocate the decomposed tables for the hierarchy path: each negacyclic
/// table is a single polynomial of halving degree.
pub fn new_decomposed_lut<Scalar: UnsignedTorus>(
    parameters: &Parameters<Scalar>,
) -> Vec<LookupTable<Scalar>> {
    let count = decomposed_lut_count(parameters);
    let mut tables = Vec::with_capacity(count);
    for i in 0..count - 1 {
        tables.push(LookupTable::new_custom(
            ExtendFactor(1),
            PolynomialSize(BASE_POLYNOMIAL_SIZE.0 << (count - i - 2)),
        ));
    }
    tables.push(LookupTable::new_custom(ExtendFactor(1), BASE_POLYNOMIAL_SIZE));
    tables
}

/// Allocate the decomposed tables for the extended-bootstrapping path: each
/// negacyclic table keeps the base polynomial degree and a halving extend
/// factor.
pub fn new_decomposed_lut_ebs<Scalar: UnsignedTorus>(
    parameters: &Parameters<Scalar>,
) -> Vec<LookupTable<Scalar>> {
    let count = decomposed_lut_count(parameters);
    let mut tables = Vec::with_capacity(count);
    for i in 0..count - 1 {
        tables.push(LookupTable::new_custom(
            ExtendFactor(1 << (count - i - 2)),
            BASE_POLYNOMIAL_SIZE,
        ));
    }
    tables.push(LookupTable::new_custom(ExtendFactor(1), BASE_POLYNOMIAL_SIZE));
    tables
}

/// Fill the decomposed tables (hierarchy layout) with the recursive
/// negacyclic decomposition of `f`.
pub fn generate_neg_decomposed_lut_assign<Scalar, F>(
    parameters: &Parameters<Scalar>,
    f: F,
    message_modulus: MessageModulus,
    scale: Scalar,
    decomposed_lut_out: &mut [LookupTable<Scalar>],
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> u64,
{
    generate_neg_decomposed_lut_full_assign(
        parameters,
        |x| parameters.encode_custom(f(x), message_modulus, scale),
        message_modulus,
        false,
        decomposed_lut_out,
    );
}

/// Fill the decomposed tables (extended-bootstrapping layout) with the
/// recursive negacyclic decomposition of `f`.
pub fn generate_neg_decomposed_lut_ebs_assign<Scalar, F>(
    parameters: &Parameters<Scalar>,
    f: F,
    message_modulus: MessageModulus,
    scale: Scalar,
    decomposed_lut_out: &mut [LookupTable<Scalar>],
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> u64,
{
    generate_neg_decomposed_lut_full_assign(
        parameters,
        |x| parameters.encode_custom(f(x), message_modulus, scale),
        message_modulus,
        true,
        decomposed_lut_out,
    );
}

/// Recursive negacyclic decomposition of an encoded function table.
///
/// Each halving step splits the current table `cur` of length `2n` into
///
/// ```text
/// new[j] = cur[j]/2 + cur[j + n]/2
/// neg[j] = cur[j]/2 - cur[j + n]/2
/// ```
///
/// so that `f` is recovered as a sum of negacyclic evaluations of the `neg`
/// tables plus a full-domain evaluation of the final base table.
pub fn generate_neg_decomposed_lut_full_assign<Scalar, F>(
    parameters: &Parameters<Scalar>,
    f: F,
    message_modulus: MessageModulus,
    interleaved: bool,
    decomposed_lut_out: &mut [LookupTable<Scalar>],
) where
    Scalar: UnsignedTorus,
    F: Fn(u64) -> Scalar,
{
    let lut_size = parameters.lookup_table_size().0;
    let p = message_modulus.0 as usize;
    let extend_factor = lut_size / BASE_POLYNOMIAL_SIZE.0;
    let log_extend_factor = extend_factor.ilog2() as usize;
    assert_eq!(decomposed_lut_out.len(), log_extend_factor + 1);

    let mut current: Vec<Scalar> = (0..p as u64).map(&f).collect();
    let mut neg_tables: Vec<Vec<Scalar>> = Vec::with_capacity(log_extend_factor);
    for _ in 0..log_extend_factor {
        let n = current.len() / 2;
        let mut new_table = vec![Scalar::ZERO; n];
        let mut neg_table = vec![Scalar::ZERO; n];
        for j in 0..n {
            new_table[j] = (current[j] >> 1).wrapping_add(current[j + n] >> 1);
            neg_table[j] = (current[j] >> 1).wrapping_sub(current[j + n] >> 1);
        }
        neg_tables.push(neg_table);
        current = new_table;
    }

    for (k, neg_table) in neg_tables.iter().enumerate() {
        let table_len = lut_size / (1 << (k + 1));
        let mut raw = vec![Scalar::ZERO; table_len];
        for (x, &y) in neg_table.iter().enumerate().take(p / (1 << (k + 1))) {
            let start = divide_round_usize(x * lut_size, p);
            let end = divide_round_usize((x + 1) * lut_size, p);
            raw[start..end].fill(y);
        }
        let offset = divide_round_usize(lut_size, 2 * p);
        rotate_and_negate_tail(&mut raw, offset);

        if interleaved {
            decomposed_lut_out[k].fill_with_interleaved_raw(&raw);
        } else {
            let mut slot = decomposed_lut_out[k].get_mut_polynomial(0);
            slot.as_mut().copy_from_slice(&raw);
        }
    }

    // base table, packed full-domain like the second pass of classical FDFB
    let base_message_modulus = p / extend_factor;
    let base_len = BASE_POLYNOMIAL_SIZE.0;
    let mut raw = vec![Scalar::ZERO; base_len];
    for x in 0..base_message_modulus / 2 {
        let start = divide_round_usize(x * base_len, base_message_modulus);
        let end = divide_round_usize((x + 1) * base_len, base_message_modulus);
        raw[start..end].fill(current[x]);
    }
    for x in base_message_modulus / 2..base_message_modulus {
        let start = divide_round_usize(x * base_len, base_message_modulus);
        let end = divide_round_usize((x + 1) * base_len, base_message_modulus);
        let y = current[base_message_modulus - x + base_message_modulus / 2 - 1];
        raw[start..end].fill(y.wrapping_neg());
    }
    let mut slot = decomposed_lut_out[log_extend_factor].get_mut_polynomial(0);
    slot.as_mut().copy_from_slice(&raw);
}

fn rotate_and_negate_tail<Scalar: UnsignedInteger>(raw: &mut [Scalar], offset: usize) {
    raw.rotate_left(offset);
    let len = raw.len();
    slice_wrapping_opposite_assign(&mut raw[len - offset..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::PARAMS_EBS_5;

    #[test]
    fn decomposition_halving_identity() {
        let parameters = PARAMS_EBS_5.compile();
        let p = parameters.message_modulus().0;
        let f = |x: u64| (3 * x + 5) % p;

        let encoded: Vec<u64> = (0..p).map(|x| parameters.encode(f(x))).collect();
        let n = encoded.len() / 2;
        // encoded values are multiples of the (even, large) scale, halving is
        // exact and reconstruction holds without truncation error
        for j in 0..n {
            let new = (encoded[j] >> 1).wrapping_add(encoded[j + n] >> 1);
            let neg = (encoded[j] >> 1).wrapping_sub(encoded[j + n] >> 1);
            assert_eq!(new.wrapping_add(neg), encoded[j]);
            assert_eq!(new.wrapping_sub(neg), encoded[j + n]);
        }
    }

    #[test]
    fn decomposed_lut_shapes() {
        let parameters = PARAMS_EBS_5.compile();
        let tables = new_decomposed_lut_ebs(&parameters);
        // L = 2 * 2048: one negacyclic table plus the base table
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].extend_factor(), ExtendFactor(1));
        assert_eq!(tables[0].polynomial_size(), BASE_POLYNOMIAL_SIZE);
        assert_eq!(tables[1].polynomial_size(), BASE_POLYNOMIAL_SIZE);

        let mut tables = new_decomposed_lut_ebs(&parameters);
        generate_neg_decomposed_lut_ebs_assign(
            &parameters,
            |x| (13 + x) % parameters.message_modulus().0,
            parameters.message_modulus(),
            parameters.scale(),
            &mut tables,
        );
    }
}
