//! Numeric model of the filters.
//!
//! Weighted sums are reduced in an [`Accumulator`] type that is wider than the storage type
//! of the grids. Storage types convert to and from the accumulator through [`Accumulate`].
//!
//! Narrowing a floating point accumulator to an integer storage type rounds half away from
//! zero and saturates to the range of the storage type; NaN narrows to zero. Narrowing to a
//! floating point storage type is a plain IEEE cast.

/// The type in which a weighted sum is reduced.
pub trait Accumulator: Copy + Send + Sync {
    /// The scalar type of the kernel weights.
    type Weight: Copy + Send + Sync;

    /// The additive identity.
    fn zero() -> Self;

    /// Add `weight * value` to the accumulator.
    fn add_weighted(&mut self, weight: Self::Weight, value: Self);
}

impl Accumulator for f64 {
    type Weight = f64;

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn add_weighted(&mut self, weight: f64, value: f64) {
        *self += weight * value;
    }
}

impl Accumulator for f32 {
    type Weight = f32;

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn add_weighted(&mut self, weight: f32, value: f32) {
        *self += weight * value;
    }
}

/// Vector-valued pixels accumulate component-wise with a shared scalar weight.
impl<A: Accumulator, const C: usize> Accumulator for [A; C] {
    type Weight = A::Weight;

    #[inline]
    fn zero() -> Self {
        [A::zero(); C]
    }

    #[inline]
    fn add_weighted(&mut self, weight: Self::Weight, value: Self) {
        for (acc, v) in self.iter_mut().zip(value) {
            acc.add_weighted(weight, v);
        }
    }
}

/// Conversion between a storage type and the accumulator `A`.
pub trait Accumulate<A>: Copy + Send + Sync {
    /// Widen the value to the accumulator type.
    fn to_accumulator(self) -> A;

    /// Narrow an accumulated value back to the storage type.
    fn from_accumulator(acc: A) -> Self;
}

macro_rules! impl_accumulate_int {
    ($acc:ty => $($t:ty),*) => {
        $(
            impl Accumulate<$acc> for $t {
                #[inline]
                fn to_accumulator(self) -> $acc {
                    self as $acc
                }

                // float-to-int `as` saturates and maps NaN to 0
                #[inline]
                fn from_accumulator(acc: $acc) -> Self {
                    acc.round() as $t
                }
            }
        )*
    };
}

impl_accumulate_int!(f64 => u8, i8, u16, i16, u32, i32);
impl_accumulate_int!(f32 => u8, i8, u16, i16);

impl Accumulate<f64> for f64 {
    #[inline]
    fn to_accumulator(self) -> f64 {
        self
    }

    #[inline]
    fn from_accumulator(acc: f64) -> Self {
        acc
    }
}

impl Accumulate<f64> for f32 {
    #[inline]
    fn to_accumulator(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_accumulator(acc: f64) -> Self {
        acc as f32
    }
}

impl Accumulate<f32> for f32 {
    #[inline]
    fn to_accumulator(self) -> f32 {
        self
    }

    #[inline]
    fn from_accumulator(acc: f32) -> Self {
        acc
    }
}

impl<T, A, const C: usize> Accumulate<[A; C]> for [T; C]
where
    T: Accumulate<A>,
    A: Accumulator,
{
    #[inline]
    fn to_accumulator(self) -> [A; C] {
        self.map(T::to_accumulator)
    }

    #[inline]
    fn from_accumulator(acc: [A; C]) -> Self {
        acc.map(T::from_accumulator)
    }
}
