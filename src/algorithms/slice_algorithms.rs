//! Wrapping arithmetic over scalar slices.

use crate::commons::numeric::UnsignedInteger;

pub fn slice_wrapping_add_assign<Scalar: UnsignedInteger>(lhs: &mut [Scalar], rhs: &[Scalar]) {
    assert_eq!(lhs.len(), rhs.len());
    for (lhs, &rhs) in lhs.iter_mut().zip(rhs) {
        *lhs = (*lhs).wrapping_add(rhs);
    }
}

pub fn slice_wrapping_sub_assign<Scalar: UnsignedInteger>(lhs: &mut [Scalar], rhs: &[Scalar]) {
    assert_eq!(lhs.len(), rhs.len());
    for (lhs, &rhs) in lhs.iter_mut().zip(rhs) {
        *lhs = (*lhs).wrapping_sub(rhs);
    }
}

pub fn slice_wrapping_opposite_assign<Scalar: UnsignedInteger>(slice: &mut [Scalar]) {
    for elem in slice.iter_mut() {
        *elem = (*elem).wrapping_neg();
    }
}

/// `lhs -= rhs * scalar`, coefficient-wise.
pub fn slice_wrapping_sub_scalar_mul_assign<Scalar: UnsignedInteger>(
    lhs: &mut [Scalar],
    rhs: &[Scalar],
    scalar: Scalar,
) {
    assert_eq!(lhs.len(), rhs.len());
    for (lhs, &rhs) in lhs.iter_mut().zip(rhs) {
        *lhs = (*lhs).wrapping_sub(rhs.wrapping_mul(scalar));
    }
}

/// `lhs *= scalar`, coefficient-wise.
pub fn slice_wrapping_scalar_mul_assign<Scalar: UnsignedInteger>(
    lhs: &mut [Scalar],
    scalar: Scalar,
) {
    for lhs in lhs.iter_mut() {
        *lhs = (*lhs).wrapping_mul(scalar);
    }
}

pub fn slice_wrapping_dot_product<Scalar: UnsignedInteger>(
    lhs: &[Scalar],
    rhs: &[Scalar],
) -> Scalar {
    assert_eq!(lhs.len(), rhs.len());
    lhs.iter()
        .zip(rhs)
        .fold(Scalar::ZERO, |acc, (&lhs, &rhs)| {
            acc.wrapping_add(lhs.wrapping_mul(rhs))
        })
}
