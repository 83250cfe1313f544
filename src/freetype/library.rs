use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::engine::{Engine, MemoryFace};
use super::error::{Error, Result};
use super::face::Face;
use super::handle::{FaceHandle, GlyphHandle, LibraryHandle, StrokerHandle};
use super::registry::ResourceRegistry;
use super::stroker::Stroker;

#[cfg(feature = "native")]
use super::native::FreeTypeEngine;

/// State shared between a library and every resource it created.
pub(crate) struct LibraryContext<E: Engine> {
    engine: E,
    handle: LibraryHandle,
    registry: RefCell<ResourceRegistry>,
    done: Cell<bool>,
}

impl<E: Engine> LibraryContext<E> {
    /// The engine, as long as the native library is alive.
    pub(crate) fn live(&self) -> Result<&E> {
        if self.done.get() {
            Err(Error::LibraryDisposed)
        } else {
            Ok(&self.engine)
        }
    }

    /// Like [`live`](Self::live), for accessors without an error path.
    ///
    /// Panics once the library is disposed: the native object behind the
    /// caller's handle no longer exists.
    pub(crate) fn engine(&self) -> &E {
        if self.done.get() {
            panic!("FreeType object used after its library was disposed");
        }
        &self.engine
    }

    pub(crate) fn error_code(&self) -> i32 {
        self.engine.last_error_code()
    }

    /// Whether the native library was torn down while this resource lived.
    fn outlived(&self, what: &str) -> bool {
        if self.done.get() {
            log::warn!("{} released after its library, leaving it to the engine", what);
        }
        self.done.get()
    }

    pub(crate) fn release_face(&self, face: FaceHandle) {
        if self.outlived("Face") {
            return;
        }
        unsafe { self.engine.done_face(face.address()) };
        let buffer = self.registry.borrow_mut().take(face);
        if let Some(buffer) = buffer {
            unsafe { self.engine.free(buffer) };
        }
        log::debug!("Disposed {:?}", face);
    }

    pub(crate) fn release_glyph(&self, glyph: GlyphHandle) {
        if self.outlived("Glyph") {
            return;
        }
        unsafe { self.engine.done_glyph(glyph.address()) };
    }

    pub(crate) fn release_stroker(&self, stroker: StrokerHandle) {
        if self.outlived("Stroker") {
            return;
        }
        unsafe { self.engine.done_stroker(stroker.address()) };
    }

    fn shutdown(&self) {
        if self.done.replace(true) {
            return;
        }
        unsafe { self.engine.done_library(self.handle.address()) };

        let leaked = self.registry.borrow_mut().drain_owned();
        if !leaked.is_empty() {
            log::warn!(
                "Freeing {} font buffer(s) of faces that were never disposed",
                leaked.len()
            );
        }
        for buffer in leaked {
            unsafe { self.engine.free(buffer) };
        }
        log::debug!("Disposed {:?}", self.handle);
    }
}

/// An engine instance. Factory for faces and strokers.
///
/// Dropping the library releases the native library and frees every font
/// buffer still registered for faces that were not dropped first. Faces and
/// strokers are not cascaded: each is released by its own `Drop`.
pub struct Library<E: Engine> {
    ctx: Rc<LibraryContext<E>>,
}

#[cfg(feature = "native")]
impl Library<FreeTypeEngine> {
    /// Initializes a FreeType instance.
    pub fn init() -> Result<Self> {
        Self::with_engine(FreeTypeEngine::new())
    }
}

impl<E: Engine> Library<E> {
    pub fn with_engine(engine: E) -> Result<Self> {
        let handle = LibraryHandle::from_raw(engine.init_library())
            .ok_or_else(|| Error::EngineInit(engine.last_error_code()))?;
        log::debug!("Initialized {:?}", handle);

        Ok(Self {
            ctx: Rc::new(LibraryContext {
                engine,
                handle,
                registry: RefCell::new(ResourceRegistry::new()),
                done: Cell::new(false),
            }),
        })
    }

    pub fn handle(&self) -> LibraryHandle {
        self.ctx.handle
    }

    pub fn engine(&self) -> &E {
        &self.ctx.engine
    }

    /// Opens face `face_index` of a font held in `data`.
    ///
    /// The bytes are copied into engine memory that stays alive until the
    /// returned face is dropped.
    pub fn new_memory_face(&self, data: &[u8], face_index: i64) -> Result<Face<E>> {
        let MemoryFace { face, buffer } = unsafe {
            self.ctx
                .engine
                .new_memory_face(self.ctx.handle.address(), data, face_index)
        };

        let Some(handle) = FaceHandle::from_raw(face) else {
            let code = self.ctx.error_code();
            if buffer != 0 {
                unsafe { self.ctx.engine.free(buffer) };
            }
            return Err(Error::FontLoad(code));
        };

        self.ctx.registry.borrow_mut().insert(handle, buffer);
        log::debug!(
            "Opened {:?} from {} bytes (buffer {:#x})",
            handle,
            data.len(),
            buffer
        );
        Ok(Face::new(handle, Rc::clone(&self.ctx)))
    }

    pub fn create_stroker(&self) -> Result<Stroker<E>> {
        let raw = unsafe { self.ctx.engine.stroker_new(self.ctx.handle.address()) };
        let handle = StrokerHandle::from_raw(raw)
            .ok_or_else(|| Error::StrokerCreate(self.ctx.error_code()))?;
        Ok(Stroker::new(handle, Rc::clone(&self.ctx)))
    }

    /// Number of faces with a registry entry.
    pub fn tracked_faces(&self) -> usize {
        self.ctx.registry.borrow().len()
    }

    pub fn dispose(self) {}
}

impl<E: Engine> Drop for Library<E> {
    fn drop(&mut self) {
        self.ctx.shutdown();
    }
}
