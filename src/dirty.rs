use crate::rect::saturate;
use crate::{Error, Rect, Result};

/// Inclusive cell bounds of the accumulated damage.
///
/// Kept in `i64` so `x + width - 1` cannot overflow for any `i32` input.
/// May extend past the canvas; clamping only happens in [`DamageTracker::region`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Bounds {
    xmin: i64,
    xmax: i64,
    ymin: i64,
    ymax: i64,
}

impl Bounds {
    fn of(rect: Rect) -> Self {
        Self {
            xmin: i64::from(rect.x),
            xmax: rect.right() - 1,
            ymin: i64::from(rect.y),
            ymax: rect.bottom() - 1,
        }
    }

    fn merge(&mut self, other: Bounds) {
        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);
    }
}

/// Single bounding-box dirty rectangle tracker.
///
/// Every accepted [`add`](Self::add) grows one conservative bounding box, so
/// [`count`](Self::count) is always 0 or 1. The canvas extent is passed in on
/// each call that needs it rather than stored, so a canvas resize never has
/// to touch the tracker for [`region`](Self::region) to stay in bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DamageTracker {
    bounds: Option<Bounds>,
}

impl DamageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dirty rectangles: 1 if any damage was recorded since the
    /// last [`clear`](Self::clear), 0 otherwise.
    pub fn count(&self) -> usize {
        usize::from(self.bounds.is_some())
    }

    /// True if any damage was recorded since the last [`clear`](Self::clear).
    pub fn is_dirty(&self) -> bool {
        self.bounds.is_some()
    }

    /// Returns dirty rectangle `index`, clamped to a `width` x `height` canvas.
    ///
    /// The clamp is applied to a copy; the stored bounds keep any
    /// out-of-bounds extent so that a canvas which shrinks and grows back
    /// still gets the full damage reported. If the canvas shrank past the
    /// damage entirely, the returned rect is empty and its origin sits on
    /// the canvas's far edge.
    pub fn region(&self, index: usize, width: u32, height: u32) -> Result<Rect> {
        let bounds = match self.bounds {
            Some(bounds) if index == 0 => bounds,
            _ => {
                return Err(Error::IndexOutOfRange {
                    index,
                    count: self.count(),
                })
            }
        };

        let (width, height) = (i64::from(width), i64::from(height));
        let xmin = bounds.xmin.clamp(0, width);
        let xmax = bounds.xmax.min(width - 1);
        let ymin = bounds.ymin.clamp(0, height);
        let ymax = bounds.ymax.min(height - 1);

        Ok(Rect {
            x: saturate(xmin),
            y: saturate(ymin),
            width: saturate((xmax - xmin + 1).max(0)),
            height: saturate((ymax - ymin + 1).max(0)),
        })
    }

    /// Merges `rect` into the dirty bounding box.
    ///
    /// The rect must have positive area and overlap the `width` x `height`
    /// canvas, otherwise [`Error::InvalidRect`] is returned and nothing
    /// changes. Accepted rects are stored unclamped.
    pub fn add(&mut self, rect: Rect, width: u32, height: u32) -> Result<()> {
        validate(rect, width, height)?;

        let incoming = Bounds::of(rect);
        match self.bounds.as_mut() {
            Some(bounds) => bounds.merge(incoming),
            None => self.bounds = Some(incoming),
        }
        log::trace!("dirty rect {rect:?} merged into {:?}", self.bounds);
        Ok(())
    }

    /// Marks `rect` as clean.
    ///
    /// Input is validated exactly like [`add`](Self::add), but accepted rects
    /// never shrink the tracked box: reporting too much damage is always
    /// safe, and a single box cannot represent a hole.
    pub fn remove(&mut self, rect: Rect, width: u32, height: u32) -> Result<()> {
        validate(rect, width, height)
    }

    pub fn clear(&mut self) {
        self.bounds = None;
    }
}

fn validate(rect: Rect, width: u32, height: u32) -> Result<()> {
    if rect.intersects_extent(width, height) {
        return Ok(());
    }
    log::trace!("rejected dirty rect {rect:?} on {width}x{height} canvas");
    Err(Error::InvalidRect {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
    })
}
