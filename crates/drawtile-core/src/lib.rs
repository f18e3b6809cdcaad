//! DrawTile Core Library
//!
//! Event-sourced drawing object model for the DrawTile drawing surface:
//! an append-only change log, deterministic replay into live objects,
//! selection geometry, and the canonical export/import round-trip.

pub mod changes;
pub mod content;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod objects;
pub mod resolver;
pub mod selection;
pub mod toolbar;

pub use changes::{Change, ChangeLog, Destination, MoveEntry, PropertyUpdate, UpdateSpec};
pub use content::{ChangeSink, DrawingContent};
pub use engine::ReconstructionEngine;
pub use export::{
    DRAWING_DOCUMENT_TYPE, DrawingDocument, ExportOptions, ImportError, export_document,
    import_document,
};
pub use geometry::SelectionBox;
pub use objects::{
    DeltaPoint, DrawingObject, Ellipse, Image, Line, ObjectId, ObjectTrait,
    PLACEHOLDER_IMAGE_URL, Rectangle, Variable, Vector, new_object_id,
};
pub use resolver::{
    BoxFuture, CachedImageResolver, ImageResolveError, ImageUrlResolver, ResolveHints,
    ResolvedImage,
};
pub use selection::Selection;
pub use toolbar::ToolbarSettings;

#[cfg(test)]
pub(crate) mod test_support {
    /// Simple blocking executor for tests.
    pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }
}
