//! Typed wrappers around opaque native addresses.
//!
//! All state behind a handle lives in the engine's heap. A handle only
//! remembers where; which Rust value is responsible for releasing it is
//! decided by ownership of the wrapper that holds it.

use std::fmt;
use std::marker::PhantomData;

/// Raw address as it crosses the engine boundary. Zero means "no object".
pub type RawHandle = usize;

mod sealed {
    pub trait Sealed {}
}

/// Marker for the kind of native object a [`Handle`] refers to.
pub trait HandleKind: sealed::Sealed {
    const NAME: &'static str;
}

macro_rules! handle_kinds {
    ($($kind:ident => $name:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $kind {}

            impl sealed::Sealed for $kind {}

            impl HandleKind for $kind {
                const NAME: &'static str = $name;
            }
        )*
    };
}

handle_kinds! {
    LibraryKind => "Library",
    FaceKind => "Face",
    SlotKind => "GlyphSlot",
    GlyphKind => "Glyph",
    StrokerKind => "Stroker",
}

/// A non-null native address tagged with the kind of object it points at.
///
/// Handles of different kinds are distinct types, so a face address can never
/// be passed where a glyph is expected.
pub struct Handle<K: HandleKind> {
    address: RawHandle,
    _kind: PhantomData<K>,
}

impl<K: HandleKind> Handle<K> {
    /// Wraps a raw engine return value. Returns `None` for the failure
    /// sentinel `0`.
    pub fn from_raw(address: RawHandle) -> Option<Self> {
        if address == 0 {
            None
        } else {
            Some(Self {
                address,
                _kind: PhantomData,
            })
        }
    }

    pub fn address(self) -> RawHandle {
        self.address
    }
}

impl<K: HandleKind> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: HandleKind> Copy for Handle<K> {}

impl<K: HandleKind> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<K: HandleKind> Eq for Handle<K> {}

impl<K: HandleKind> std::hash::Hash for Handle<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl<K: HandleKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", K::NAME, self.address)
    }
}

pub type LibraryHandle = Handle<LibraryKind>;
pub type FaceHandle = Handle<FaceKind>;
pub type SlotHandle = Handle<SlotKind>;
pub type GlyphHandle = Handle<GlyphKind>;
pub type StrokerHandle = Handle<StrokerKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_failure_sentinel() {
        assert!(FaceHandle::from_raw(0).is_none());
        assert!(GlyphHandle::from_raw(0x10).is_some());
    }

    #[test]
    fn test_address_round_trips() {
        let face = FaceHandle::from_raw(0xdead).unwrap();
        assert_eq!(face.address(), 0xdead);
    }

    #[test]
    fn test_debug_names_kind() {
        let glyph = GlyphHandle::from_raw(0x20).unwrap();
        assert_eq!(format!("{:?}", glyph), "Glyph(0x20)");
    }
}
