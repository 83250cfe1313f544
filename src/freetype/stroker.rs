use std::rc::Rc;

use super::engine::Engine;
use super::handle::StrokerHandle;
use super::library::LibraryContext;
use super::types::{LineCap, LineJoin};

/// Outline stroker, applied with
/// [`OutlineGlyph::stroke_border`](super::OutlineGlyph::stroke_border).
pub struct Stroker<E: Engine> {
    handle: StrokerHandle,
    ctx: Rc<LibraryContext<E>>,
}

impl<E: Engine> Stroker<E> {
    pub(crate) fn new(handle: StrokerHandle, ctx: Rc<LibraryContext<E>>) -> Self {
        Self { handle, ctx }
    }

    pub fn handle(&self) -> StrokerHandle {
        self.handle
    }

    /// `radius` is 26.6 pixels, `miter_limit` 16.16.
    pub fn set(&mut self, radius: i64, line_cap: LineCap, line_join: LineJoin, miter_limit: i64) {
        unsafe {
            self.ctx.engine().stroker_set(
                self.handle.address(),
                radius,
                line_cap.to_raw(),
                line_join.to_raw(),
                miter_limit,
            )
        };
    }

    pub fn dispose(self) {}
}

impl<E: Engine> Drop for Stroker<E> {
    fn drop(&mut self) {
        self.ctx.release_stroker(self.handle);
    }
}
