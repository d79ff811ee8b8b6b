//! Opaque handles to engine-side objects
//!
//! A [`RawHandle`] packs a slot index and a generation so the engine can tell
//! a live handle from one whose slot has been released and reused.
//! [`StringRef`] and [`ErrorRef`] wrap raw handles allocated inside a
//! [`Scope`](crate::Scope) and borrow it, which keeps them from outliving it.

use std::fmt;
use std::marker::PhantomData;

/// Index + generation of a native object
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct RawHandle {
    /// Lower 32 bits: index, upper 32 bits: generation
    bits: u64,
}

impl RawHandle {
    /// Largest usable index; `u32::MAX` is taken by the null handle
    pub const MAX_INDEX: u32 = u32::MAX - 1;

    /// Generations stop here; a slot that reaches it is retired
    pub const MAX_GENERATION: u32 = u32::MAX;

    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        debug_assert!(index <= Self::MAX_INDEX);
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    /// Handle that never refers to anything
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }

    #[inline]
    pub const fn to_bits(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }
}

impl fmt::Debug for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "RawHandle(null)")
        } else {
            write!(f, "RawHandle({}v{})", self.index(), self.generation())
        }
    }
}

/// Persistent handle to an engine component.
///
/// Owned by the `ComponentNode` that created it; layer nodes of the component
/// share it but never destroy it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ComponentHandle(RawHandle);

impl ComponentHandle {
    pub const fn from_raw(raw: RawHandle) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> RawHandle {
        self.0
    }
}

/// Native string allocated in a scope, valid for the scope's borrow `'s`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StringRef<'s> {
    raw: RawHandle,
    _scope: PhantomData<&'s ()>,
}

impl<'s> StringRef<'s> {
    pub(crate) fn new(raw: RawHandle) -> Self {
        Self {
            raw,
            _scope: PhantomData,
        }
    }

    pub fn raw(&self) -> RawHandle {
        self.raw
    }
}

/// Error output slot allocated in a scope, valid for the scope's borrow `'s`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ErrorRef<'s> {
    raw: RawHandle,
    _scope: PhantomData<&'s ()>,
}

impl<'s> ErrorRef<'s> {
    pub(crate) fn new(raw: RawHandle) -> Self {
        Self {
            raw,
            _scope: PhantomData,
        }
    }

    pub fn raw(&self) -> RawHandle {
        self.raw
    }
}
