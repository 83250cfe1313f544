//! Moves bytes between engine-owned memory and pixmap storage.
//!
//! Reads go through [`map_for_read`], which borrows a region of engine memory
//! for the lifetime of the owning handle. Writes go through [`StagedPixmap`]:
//! the caller fills a staging buffer and [`StagedPixmap::commit`] copies it
//! into the pixmap, after which the staging buffer is invalid until requested
//! again.

use super::Pixmap;
use crate::freetype::RawHandle;

/// Borrows `len` bytes of engine memory starting at `address`.
///
/// A zero address or zero length yields an empty slice.
///
/// # Safety
///
/// When `len > 0` and `address != 0`, the region must be readable for `len`
/// bytes and must not be written or freed for the lifetime `'a`.
pub unsafe fn map_for_read<'a>(address: RawHandle, len: usize) -> &'a [u8] {
    if address == 0 || len == 0 {
        return &[];
    }
    // SAFETY: non-null and readable for `len` bytes per the caller contract.
    unsafe { std::slice::from_raw_parts(address as *const u8, len) }
}

/// A pixmap paired with an optional staging copy of its pixels.
#[derive(Debug)]
pub struct StagedPixmap {
    pixmap: Pixmap,
    staged: Option<Vec<u8>>,
}

impl StagedPixmap {
    pub fn new(pixmap: Pixmap) -> Self {
        Self {
            pixmap,
            staged: None,
        }
    }

    /// Mutable view of the staging buffer, created from the pixmap's current
    /// contents on first use. Empty when either dimension is zero.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        let pixmap = &self.pixmap;
        self.staged.get_or_insert_with(|| pixmap.pixels().to_vec())
    }

    /// Copies the staging buffer back into the pixmap and drops it.
    /// Does nothing when nothing was staged.
    pub fn commit(&mut self) {
        if let Some(staged) = self.staged.take() {
            log::trace!("committing {} staged bytes", staged.len());
            self.pixmap.put_pixels(&staged);
        }
    }

    /// Commits outstanding writes and returns the pixmap.
    pub fn into_pixmap(mut self) -> Pixmap {
        self.commit();
        self.pixmap
    }
}
