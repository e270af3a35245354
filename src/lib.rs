//! A character-grid canvas that tracks which area changed since the last
//! render, so a renderer only redraws what it has to.
//!
//! Drawing operations record damage into a single conservative bounding box.
//! A renderer consumes it once per frame:
//!
//! ```
//! use cellstage::{Canvas, Rect};
//!
//! let mut canvas = Canvas::new(10, 10)?;
//! canvas.put_str(2, 3, "hello");
//! canvas.add_dirty_rect(Rect::new(-5, -5, 8, 8))?;
//!
//! if canvas.dirty_rect_count() > 0 {
//!     let region = canvas.dirty_rect(0)?;
//!     assert_eq!(region, Rect::new(0, 0, 7, 4));
//!     // ... redraw `region` ...
//!     canvas.clear_dirty_rect_list();
//! }
//! assert_eq!(canvas.dirty_rect_count(), 0);
//! # Ok::<(), cellstage::Error>(())
//! ```

mod canvas;
mod dirty;
mod options;
mod rect;

pub use canvas::{Canvas, Cell};
pub use dirty::DamageTracker;
pub use options::{CanvasOptions, ResizeDamage};
pub use rect::Rect;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("dirty rectangle index {index} is out of range ({count} rectangles)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("invalid dirty rectangle ({x}, {y}) {width}x{height}")]
    InvalidRect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },
    #[error("dirty tracking is not disabled")]
    DirtyTrackingNotDisabled,
}

pub type Result<T> = std::result::Result<T, Error>;
