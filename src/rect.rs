/// A rectangle of cells in canvas coordinates.
///
/// Coordinates are signed because damage may be reported partially outside
/// the canvas; width and height are signed so malformed input can be
/// represented and rejected instead of wrapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_point(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            width: 1,
            height: 1,
        }
    }

    /// A rect covering a whole `width` x `height` canvas.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: saturate(i64::from(width)),
            height: saturate(i64::from(height)),
        }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Returns true if the rect has positive area and overlaps a
    /// `width` x `height` canvas.
    pub fn intersects_extent(self, width: u32, height: u32) -> bool {
        !self.is_empty()
            && self.right() > 0
            && i64::from(self.x) < i64::from(width)
            && self.bottom() > 0
            && i64::from(self.y) < i64::from(height)
    }

    pub fn union(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect {
            x: x0,
            y: y0,
            width: saturate(x1 - i64::from(x0)),
            height: saturate(y1 - i64::from(y0)),
        }
    }

    /// Clips the rect to a `width` x `height` canvas, or `None` if nothing
    /// of it is left.
    pub fn clamp_to(self, width: u32, height: u32) -> Option<Rect> {
        if !self.intersects_extent(width, height) {
            return None;
        }

        let x0 = i64::from(self.x).max(0);
        let y0 = i64::from(self.y).max(0);
        let x1 = self.right().min(i64::from(width));
        let y1 = self.bottom().min(i64::from(height));
        Some(Rect {
            x: saturate(x0),
            y: saturate(y0),
            width: saturate(x1 - x0),
            height: saturate(y1 - y0),
        })
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        x >= i64::from(self.x) && x < self.right() && y >= i64::from(self.y) && y < self.bottom()
    }
}

pub(crate) fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
