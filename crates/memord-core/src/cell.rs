//! Generic linearizable atomic location with a selectable memory order.
//!
//! [`AtomicCell`] is the abstraction the conformance provers poke at. It
//! stores `T` inside a single hardware-backed std atomic of matching width,
//! so every load observes some store's value in full, never a torn mix,
//! for every supported element type.
//!
//! Element types plug in through [`AtomicValue`], a value-level conversion
//! to the cell's transport primitive. The crate ships instances for the
//! integral types, `bool`, `f32`/`f64` (bit-pattern transport), and raw
//! pointers; fieldless enums and small packed aggregates join via the
//! [`atomic_value_enum!`](crate::atomic_value_enum) and
//! [`atomic_value_packed!`](crate::atomic_value_packed) macros.

use std::sync::atomic::{
    AtomicBool, AtomicI8, AtomicI16, AtomicI32, AtomicI64, AtomicIsize, AtomicPtr, AtomicU8,
    AtomicU16, AtomicU32, AtomicU64, AtomicUsize, Ordering,
};

use crate::order::MemOrder;

// ---------------------------------------------------------------------------
// Transport layer
// ---------------------------------------------------------------------------

/// A hardware atomic standing behind a cell.
///
/// Implemented for the std atomics; the methods forward one-to-one, so the
/// cell inherits their linearizability untouched. The `Send + Sync` bound
/// is what lets a cell be shared across the prover threads.
pub trait AtomicRepr: Send + Sync {
    /// Primitive value transported through the atomic.
    type Prim: Copy;

    fn new(value: Self::Prim) -> Self;
    fn load(&self, order: Ordering) -> Self::Prim;
    fn store(&self, value: Self::Prim, order: Ordering);
    fn swap(&self, value: Self::Prim, order: Ordering) -> Self::Prim;
    fn compare_exchange(
        &self,
        current: Self::Prim,
        new: Self::Prim,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self::Prim, Self::Prim>;
    fn compare_exchange_weak(
        &self,
        current: Self::Prim,
        new: Self::Prim,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self::Prim, Self::Prim>;
}

/// Transport that additionally supports fetch-and-add.
pub trait AtomicIntRepr: AtomicRepr {
    fn fetch_add(&self, value: Self::Prim, order: Ordering) -> Self::Prim;
}

macro_rules! impl_atomic_repr {
    ($($atom:ty => $prim:ty),+ $(,)?) => {$(
        impl AtomicRepr for $atom {
            type Prim = $prim;

            fn new(value: $prim) -> Self {
                <$atom>::new(value)
            }

            fn load(&self, order: Ordering) -> $prim {
                self.load(order)
            }

            fn store(&self, value: $prim, order: Ordering) {
                self.store(value, order);
            }

            fn swap(&self, value: $prim, order: Ordering) -> $prim {
                self.swap(value, order)
            }

            fn compare_exchange(
                &self,
                current: $prim,
                new: $prim,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$prim, $prim> {
                self.compare_exchange(current, new, success, failure)
            }

            fn compare_exchange_weak(
                &self,
                current: $prim,
                new: $prim,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$prim, $prim> {
                self.compare_exchange_weak(current, new, success, failure)
            }
        }
    )+};
}

impl_atomic_repr! {
    AtomicBool => bool,
    AtomicU8 => u8,
    AtomicU16 => u16,
    AtomicU32 => u32,
    AtomicU64 => u64,
    AtomicUsize => usize,
    AtomicI8 => i8,
    AtomicI16 => i16,
    AtomicI32 => i32,
    AtomicI64 => i64,
    AtomicIsize => isize,
}

macro_rules! impl_atomic_int_repr {
    ($($atom:ty),+ $(,)?) => {$(
        impl AtomicIntRepr for $atom {
            fn fetch_add(&self, value: Self::Prim, order: Ordering) -> Self::Prim {
                self.fetch_add(value, order)
            }
        }
    )+};
}

impl_atomic_int_repr! {
    AtomicU8, AtomicU16, AtomicU32, AtomicU64, AtomicUsize,
    AtomicI8, AtomicI16, AtomicI32, AtomicI64, AtomicIsize,
}

impl<P> AtomicRepr for AtomicPtr<P> {
    type Prim = *mut P;

    fn new(value: *mut P) -> Self {
        AtomicPtr::new(value)
    }

    fn load(&self, order: Ordering) -> *mut P {
        self.load(order)
    }

    fn store(&self, value: *mut P, order: Ordering) {
        self.store(value, order);
    }

    fn swap(&self, value: *mut P, order: Ordering) -> *mut P {
        self.swap(value, order)
    }

    fn compare_exchange(
        &self,
        current: *mut P,
        new: *mut P,
        success: Ordering,
        failure: Ordering,
    ) -> Result<*mut P, *mut P> {
        self.compare_exchange(current, new, success, failure)
    }

    fn compare_exchange_weak(
        &self,
        current: *mut P,
        new: *mut P,
        success: Ordering,
        failure: Ordering,
    ) -> Result<*mut P, *mut P> {
        self.compare_exchange_weak(current, new, success, failure)
    }
}

/// Maps a primitive to its std atomic. Used by the element-type macros so
/// callers name a primitive width, not an atomic type.
pub trait PrimAtom: Sized {
    type Atom: AtomicRepr<Prim = Self>;
}

macro_rules! impl_prim_atom {
    ($($prim:ty => $atom:ty),+ $(,)?) => {$(
        impl PrimAtom for $prim {
            type Atom = $atom;
        }
    )+};
}

impl_prim_atom! {
    bool => AtomicBool,
    u8 => AtomicU8,
    u16 => AtomicU16,
    u32 => AtomicU32,
    u64 => AtomicU64,
    usize => AtomicUsize,
    i8 => AtomicI8,
    i16 => AtomicI16,
    i32 => AtomicI32,
    i64 => AtomicI64,
    isize => AtomicIsize,
}

// ---------------------------------------------------------------------------
// Element types
// ---------------------------------------------------------------------------

/// Conversion between an element type and its atomic transport.
///
/// The conversion must round-trip: `from_repr(into_repr(v)) == v` for every
/// value the suite stores. Comparison happens on the transported bits, so
/// for floats a compare-exchange matches bit patterns, not numeric equality.
pub trait AtomicValue: Copy + PartialEq + 'static {
    type Repr: AtomicRepr;

    fn into_repr(self) -> <Self::Repr as AtomicRepr>::Prim;
    fn from_repr(prim: <Self::Repr as AtomicRepr>::Prim) -> Self;
}

macro_rules! impl_atomic_value_prim {
    ($($ty:ty),+ $(,)?) => {$(
        impl AtomicValue for $ty {
            type Repr = <$ty as PrimAtom>::Atom;

            fn into_repr(self) -> $ty {
                self
            }

            fn from_repr(prim: $ty) -> Self {
                prim
            }
        }
    )+};
}

impl_atomic_value_prim! {
    bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize,
}

impl AtomicValue for f32 {
    type Repr = AtomicU32;

    fn into_repr(self) -> u32 {
        self.to_bits()
    }

    fn from_repr(prim: u32) -> Self {
        f32::from_bits(prim)
    }
}

impl AtomicValue for f64 {
    type Repr = AtomicU64;

    fn into_repr(self) -> u64 {
        self.to_bits()
    }

    fn from_repr(prim: u64) -> Self {
        f64::from_bits(prim)
    }
}

impl<P: 'static> AtomicValue for *mut P {
    type Repr = AtomicPtr<P>;

    fn into_repr(self) -> *mut P {
        self
    }

    fn from_repr(prim: *mut P) -> Self {
        prim
    }
}

/// Implements [`AtomicValue`] for a fieldless enum transported as `$prim`.
///
/// Every variant must be listed. Observing a transported value that matches
/// no listed variant means the cell produced a value nobody stored, which
/// aborts the test rather than fabricating a variant.
#[macro_export]
macro_rules! atomic_value_enum {
    ($ty:ty as $prim:ty { $($variant:path),+ $(,)? }) => {
        impl $crate::cell::AtomicValue for $ty {
            type Repr = <$prim as $crate::cell::PrimAtom>::Atom;

            fn into_repr(self) -> $prim {
                self as $prim
            }

            fn from_repr(prim: $prim) -> Self {
                $(
                    if prim == $variant as $prim {
                        return $variant;
                    }
                )+
                panic!("atomic cell observed a value never stored in it: {prim}");
            }
        }
    };
}

/// Implements [`AtomicValue`] for a small aggregate packed into `$prim`.
///
/// `pack`/`unpack` must be mutually inverse over every value the suite
/// stores; the whole aggregate travels through one atomic, so loads stay
/// tear-free by construction.
#[macro_export]
macro_rules! atomic_value_packed {
    ($ty:ty as $prim:ty, pack = $pack:expr, unpack = $unpack:expr) => {
        impl $crate::cell::AtomicValue for $ty {
            type Repr = <$prim as $crate::cell::PrimAtom>::Atom;

            fn into_repr(self) -> $prim {
                ($pack)(self)
            }

            fn from_repr(prim: $prim) -> Self {
                ($unpack)(prim)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// The cell
// ---------------------------------------------------------------------------

/// A single memory location holding a `T`, with every operation taking an
/// explicit [`MemOrder`].
///
/// Cells live on the stack for the duration of one prover trial; there is
/// no heap ownership and no interior lock.
pub struct AtomicCell<T: AtomicValue> {
    repr: T::Repr,
}

impl<T: AtomicValue> AtomicCell<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            repr: <T::Repr as AtomicRepr>::new(value.into_repr()),
        }
    }

    #[must_use]
    pub fn load(&self, order: MemOrder) -> T {
        T::from_repr(self.repr.load(order.load_ordering()))
    }

    pub fn store(&self, value: T, order: MemOrder) {
        self.repr.store(value.into_repr(), order.store_ordering());
    }

    pub fn swap(&self, value: T, order: MemOrder) -> T {
        T::from_repr(self.repr.swap(value.into_repr(), order.rmw_ordering()))
    }

    /// Strong compare-and-swap: fails only if the current value differs
    /// from `current` (bitwise, on the transported representation).
    pub fn compare_exchange(
        &self,
        current: T,
        new: T,
        success: MemOrder,
        failure: MemOrder,
    ) -> Result<T, T> {
        self.repr
            .compare_exchange(
                current.into_repr(),
                new.into_repr(),
                success.rmw_ordering(),
                failure.load_ordering(),
            )
            .map(T::from_repr)
            .map_err(T::from_repr)
    }

    /// Weak compare-and-swap: may fail spuriously even when the comparison
    /// would have succeeded. Callers retry in a loop.
    pub fn compare_exchange_weak(
        &self,
        current: T,
        new: T,
        success: MemOrder,
        failure: MemOrder,
    ) -> Result<T, T> {
        self.repr
            .compare_exchange_weak(
                current.into_repr(),
                new.into_repr(),
                success.rmw_ordering(),
                failure.load_ordering(),
            )
            .map(T::from_repr)
            .map_err(T::from_repr)
    }

    /// Single-argument overload pinned to the default order. The suite uses
    /// these to confirm the default's strength matches explicit seq-cst.
    #[must_use]
    pub fn load_default(&self) -> T {
        self.load(MemOrder::SeqCst)
    }

    /// See [`AtomicCell::load_default`].
    pub fn store_default(&self, value: T) {
        self.store(value, MemOrder::SeqCst);
    }
}

impl<T: AtomicValue> AtomicCell<T>
where
    T::Repr: AtomicIntRepr,
{
    /// Fetch-and-add, available for the integer element types.
    pub fn fetch_add(&self, delta: T, order: MemOrder) -> T {
        T::from_repr(self.repr.fetch_add(delta.into_repr(), order.rmw_ordering()))
    }
}
