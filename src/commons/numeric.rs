//! Numeric abstractions over the scalar types used to represent torus
//! elements.

use std::fmt::Debug;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div, DivAssign,
    Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub, SubAssign,
};

/// A trait for infallible lossy casting between numeric types, with the
/// semantics of the `as` keyword.
pub trait CastFrom<Input>: Sized {
    fn cast_from(input: Input) -> Self;
}

/// The dual of [`CastFrom`], implemented through a blanket impl.
pub trait CastInto<Output>: Sized {
    fn cast_into(self) -> Output;
}

impl<Input, Output> CastInto<Output> for Input
where
    Output: CastFrom<Input>,
{
    fn cast_into(self) -> Output {
        Output::cast_from(self)
    }
}

macro_rules! implement_casts {
    ($Type:ty) => {
        implement_casts!(@ $Type => u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
    };
    (@ $Type:ty => $($To:ty),*) => {
        $(
            impl CastFrom<$Type> for $To {
                #[inline]
                fn cast_from(input: $Type) -> $To {
                    input as $To
                }
            }
        )*
    };
}

implement_casts!(u8);
implement_casts!(u16);
implement_casts!(u32);
implement_casts!(u64);
implement_casts!(u128);
implement_casts!(usize);
implement_casts!(i8);
implement_casts!(i16);
implement_casts!(i32);
implement_casts!(i64);
implement_casts!(i128);
implement_casts!(isize);
implement_casts!(f32);
implement_casts!(f64);

/// Common constants shared by every numeric type of the crate.
pub trait Numeric: Copy + Default + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    const BITS: usize;
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    const MAX: Self;
}

/// A trait shared by the signed counterparts of the unsigned scalar types.
pub trait SignedInteger:
    Numeric
    + Ord
    + Eq
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Div<Self, Output = Self>
    + Neg<Output = Self>
    + Shl<usize, Output = Self>
    + Shr<usize, Output = Self>
    + CastInto<f64>
{
    /// The unsigned type of the same precision.
    type Unsigned: UnsignedInteger<Signed = Self>;

    /// Return the casting of the current value to the unsigned type of the
    /// same size.
    fn into_unsigned(self) -> Self::Unsigned;
}

/// A trait shared by the unsigned integer types used as torus
/// representations.
pub trait UnsignedInteger:
    Numeric
    + Ord
    + Eq
    + Add<Self, Output = Self>
    + AddAssign<Self>
    + Sub<Self, Output = Self>
    + SubAssign<Self>
    + Mul<Self, Output = Self>
    + MulAssign<Self>
    + Div<Self, Output = Self>
    + DivAssign<Self>
    + Rem<Self, Output = Self>
    + RemAssign<Self>
    + BitAnd<Self, Output = Self>
    + BitAndAssign<Self>
    + BitOr<Self, Output = Self>
    + BitOrAssign<Self>
    + BitXor<Self, Output = Self>
    + BitXorAssign<Self>
    + Not<Output = Self>
    + Shl<usize, Output = Self>
    + ShlAssign<usize>
    + Shr<usize, Output = Self>
    + ShrAssign<usize>
    + CastFrom<f64>
    + CastInto<f64>
    + CastFrom<u64>
    + CastInto<u64>
    + CastFrom<usize>
    + CastInto<usize>
    + CastFrom<Self::Signed>
{
    /// The signed type of the same precision.
    type Signed: SignedInteger<Unsigned = Self> + CastFrom<Self> + CastFrom<f64>;

    #[must_use]
    fn wrapping_add(self, other: Self) -> Self;
    #[must_use]
    fn wrapping_sub(self, other: Self) -> Self;
    #[must_use]
    fn wrapping_mul(self, other: Self) -> Self;
    #[must_use]
    fn wrapping_neg(self) -> Self;
    #[must_use]
    fn is_power_of_two(self) -> bool;
    #[must_use]
    fn ilog2(self) -> u32;

    /// Return the casting of the current value to the signed type of the same
    /// size.
    fn into_signed(self) -> Self::Signed;
}

macro_rules! implement_numeric {
    ($Type:ty, $SignedType:ty, $bits:expr) => {
        impl Numeric for $Type {
            const BITS: usize = $bits;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const TWO: Self = 2;
            const MAX: Self = <$Type>::MAX;
        }

        impl Numeric for $SignedType {
            const BITS: usize = $bits;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const TWO: Self = 2;
            const MAX: Self = <$SignedType>::MAX;
        }

        impl SignedInteger for $SignedType {
            type Unsigned = $Type;

            #[inline]
            fn into_unsigned(self) -> Self::Unsigned {
                self as $Type
            }
        }

        impl UnsignedInteger for $Type {
            type Signed = $SignedType;

            #[inline]
            fn wrapping_add(self, other: Self) -> Self {
                self.wrapping_add(other)
            }
            #[inline]
            fn wrapping_sub(self, other: Self) -> Self {
                self.wrapping_sub(other)
            }
            #[inline]
            fn wrapping_mul(self, other: Self) -> Self {
                self.wrapping_mul(other)
            }
            #[inline]
            fn wrapping_neg(self) -> Self {
                self.wrapping_neg()
            }
            #[inline]
            fn is_power_of_two(self) -> bool {
                self.is_power_of_two()
            }
            #[inline]
            fn ilog2(self) -> u32 {
                self.ilog2()
            }
            #[inline]
            fn into_signed(self) -> Self::Signed {
                self as $SignedType
            }
        }
    };
}

implement_numeric!(u32, i32, 32);
implement_numeric!(u64, i64, 64);
implement_numeric!(u128, i128, 128);

/// Round-to-nearest division on unsigned integers.
#[inline]
pub fn divide_round<T: UnsignedInteger>(numerator: T, denominator: T) -> T {
    (numerator + denominator / T::TWO) / denominator
}

/// Round-to-nearest division on usize operands.
#[inline]
pub fn divide_round_usize(numerator: usize, denominator: usize) -> usize {
    (numerator + denominator / 2) / denominator
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn divide_round_rounds_to_nearest() {
        assert_eq!(divide_round(7u64, 2), 4);
        assert_eq!(divide_round(6u64, 4), 2);
        assert_eq!(divide_round(5u64, 4), 1);
        assert_eq!(divide_round_usize(2048, 32), 64);
    }

    #[test]
    fn casts_follow_as_semantics() {
        let x: u64 = u64::MAX;
        let y: u32 = x.cast_into();
        assert_eq!(y, u32::MAX);
        let z: f64 = 3.7f64;
        assert_eq!(<u64 as CastFrom<f64>>::cast_from(z), 3);
    }
}
