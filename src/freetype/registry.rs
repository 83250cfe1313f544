use std::collections::HashMap;

use ahash::RandomState;

use super::handle::{FaceHandle, RawHandle};

/// Side table of font-data buffers owned on behalf of faces.
///
/// The engine keeps pointing into the font bytes a face was opened from but
/// never frees them, so the library records which buffer belongs to which
/// face. An address of `0` means the face owns no buffer.
#[derive(Debug, Default)]
pub(crate) struct ResourceRegistry {
    entries: HashMap<FaceHandle, RawHandle, RandomState>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::default(),
        }
    }

    /// Records `buffer` as owned by `face`.
    pub fn insert(&mut self, face: FaceHandle, buffer: RawHandle) {
        debug_assert!(
            buffer == 0 || !self.entries.values().any(|&owned| owned == buffer),
            "buffer {:#x} registered twice",
            buffer
        );
        if let Some(previous) = self.entries.insert(face, buffer) {
            log::error!(
                "{:?} re-registered, buffer {:#x} is no longer tracked",
                face,
                previous
            );
        }
    }

    /// Removes the entry for `face`, returning the buffer to free if any.
    pub fn take(&mut self, face: FaceHandle) -> Option<RawHandle> {
        self.entries.remove(&face).filter(|&buffer| buffer != 0)
    }

    /// Empties the registry, returning every non-zero buffer still tracked.
    pub fn drain_owned(&mut self) -> Vec<RawHandle> {
        self.entries
            .drain()
            .map(|(_, buffer)| buffer)
            .filter(|&buffer| buffer != 0)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(address: RawHandle) -> FaceHandle {
        FaceHandle::from_raw(address).unwrap()
    }

    #[test]
    fn test_take_removes_entry() {
        let mut registry = ResourceRegistry::new();
        registry.insert(face(0x10), 0x100);
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.take(face(0x10)), Some(0x100));
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.take(face(0x10)), None);
    }

    #[test]
    fn test_zero_buffer_is_never_returned() {
        let mut registry = ResourceRegistry::new();
        registry.insert(face(0x10), 0);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.take(face(0x10)), None);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_drain_skips_zero_entries() {
        let mut registry = ResourceRegistry::new();
        registry.insert(face(0x10), 0x100);
        registry.insert(face(0x20), 0);
        registry.insert(face(0x30), 0x300);

        let mut owned = registry.drain_owned();
        owned.sort_unstable();
        assert_eq!(owned, vec![0x100, 0x300]);
        assert_eq!(registry.len(), 0);
    }
}
