use crate::dirty::DamageTracker;
use crate::{CanvasOptions, Error, Rect, ResizeDamage, Result};

/// One character cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub attr: u32,
}

impl Cell {
    pub const fn new(ch: char, attr: u32) -> Self {
        Self { ch, attr }
    }
}

/// A character grid that records which area changed since the last render.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    attr: u32,
    options: CanvasOptions,
    damage: DamageTracker,
    damage_suspended: u32,
}

impl Canvas {
    /// Create a canvas filled with spaces.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_with_options(width, height, CanvasOptions::default())
    }

    /// Create a canvas with options.
    ///
    /// Zero-sized canvases are allowed. Each dimension must fit in an `i32`
    /// so every cell is addressable by a [`Rect`], and the cell buffer must
    /// be allocatable; otherwise [`Error::InvalidCanvasSize`] is returned.
    pub fn new_with_options(width: u32, height: u32, options: CanvasOptions) -> Result<Self> {
        let cells = blank_cells(width, height, Cell::new(options.fill_char, 0))?;
        Ok(Self {
            width,
            height,
            cells,
            attr: 0,
            options,
            damage: DamageTracker::new(),
            damage_suspended: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    /// Resize the grid, keeping the cells that are inside both extents.
    ///
    /// What happens to the recorded damage depends on
    /// [`CanvasOptions::resize_damage`].
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        let blank = Cell::new(self.options.fill_char, self.attr);
        let mut cells = blank_cells(width, height, blank)?;
        let keep_w = self.width.min(width) as usize;
        for y in 0..self.height.min(height) as usize {
            let src = y * self.width as usize;
            let dst = y * width as usize;
            cells[dst..dst + keep_w].copy_from_slice(&self.cells[src..src + keep_w]);
        }

        log::debug!(
            "canvas resized from {}x{} to {width}x{height}",
            self.width,
            self.height
        );
        self.width = width;
        self.height = height;
        self.cells = cells;

        if self.options.resize_damage == ResizeDamage::Full {
            self.damage.clear();
            self.mark(Rect::from_size(width, height));
        }
        Ok(())
    }

    pub fn attr(&self) -> u32 {
        self.attr
    }

    /// Attribute applied to subsequent writes.
    pub fn set_attr(&mut self, attr: u32) {
        self.attr = attr;
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.offset(x, y).map(|offset| self.cells[offset])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to every cell. The whole canvas is marked dirty.
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        self.mark(Rect::from_size(self.width, self.height));
        &mut self.cells
    }

    pub fn row(&self, y: i32) -> Option<&[Cell]> {
        let start = self.offset(0, y)?;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Write one character. Writes outside the canvas are ignored.
    pub fn put_char(&mut self, x: i32, y: i32, ch: char) {
        if self.write(x, y, ch) {
            self.mark(Rect::from_point(x, y));
        }
    }

    /// Write a string, one character per cell, clipped to the canvas.
    pub fn put_str(&mut self, x: i32, y: i32, s: &str) {
        let mut changed: Option<(i32, i32)> = None;
        let mut cx = x;
        for ch in s.chars() {
            if i64::from(cx) >= i64::from(self.width) {
                break;
            }
            if self.write(cx, y, ch) {
                changed = Some(match changed {
                    Some((first, _)) => (first, cx),
                    None => (cx, cx),
                });
            }
            cx = match cx.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }

        if let Some((first, last)) = changed {
            self.mark(Rect::new(first, y, last - first + 1, 1));
        }
    }

    /// Fill `rect` with `ch`, clipped to the canvas.
    pub fn fill_box(&mut self, rect: Rect, ch: char) {
        let Some(area) = rect.clamp_to(self.width, self.height) else {
            return;
        };

        let mut changed: Option<Rect> = None;
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if self.write(x, y, ch) {
                    let cell = Rect::from_point(x, y);
                    changed = Some(changed.map_or(cell, |rect| rect.union(cell)));
                }
            }
        }

        if let Some(changed) = changed {
            self.mark(changed);
        }
    }

    /// Fill every cell with the fill character and current attribute.
    pub fn clear_canvas(&mut self) {
        self.cells.fill(Cell::new(self.options.fill_char, self.attr));
        self.mark(Rect::from_size(self.width, self.height));
    }

    /// Stop drawing operations from recording damage.
    ///
    /// Calls nest; each must be matched by
    /// [`enable_dirty_tracking`](Self::enable_dirty_tracking). Explicit
    /// [`add_dirty_rect`](Self::add_dirty_rect) calls are still recorded.
    pub fn disable_dirty_tracking(&mut self) {
        self.damage_suspended = self.damage_suspended.saturating_add(1);
        log::debug!("dirty tracking suspended (depth {})", self.damage_suspended);
    }

    /// Undo one [`disable_dirty_tracking`](Self::disable_dirty_tracking).
    pub fn enable_dirty_tracking(&mut self) -> Result<()> {
        if self.damage_suspended == 0 {
            return Err(Error::DirtyTrackingNotDisabled);
        }
        self.damage_suspended -= 1;
        log::debug!("dirty tracking resumed (depth {})", self.damage_suspended);
        Ok(())
    }

    pub fn is_dirty_tracking_enabled(&self) -> bool {
        self.damage_suspended == 0
    }

    /// The tracker recording this canvas's damage.
    pub fn damage(&self) -> &DamageTracker {
        &self.damage
    }

    pub fn dirty_rect_count(&self) -> usize {
        self.damage.count()
    }

    /// Dirty rectangle `index`, clamped to the current canvas size.
    pub fn dirty_rect(&self, index: usize) -> Result<Rect> {
        self.damage.region(index, self.width, self.height)
    }

    /// Force `rect` to be redrawn, e.g. after cells were changed behind the
    /// canvas's back.
    pub fn add_dirty_rect(&mut self, rect: Rect) -> Result<()> {
        self.damage.add(rect, self.width, self.height)
    }

    /// Mark `rect` as clean. Never shrinks the recorded damage.
    pub fn remove_dirty_rect(&mut self, rect: Rect) -> Result<()> {
        self.damage.remove(rect, self.width, self.height)
    }

    pub fn clear_dirty_rect_list(&mut self) {
        self.damage.clear();
        log::debug!("dirty rect list cleared");
    }

    /// Take the area to redraw this frame and reset the damage.
    pub fn take_damage(&mut self) -> Option<Rect> {
        if self.damage.count() == 0 {
            return None;
        }
        let region = self.dirty_rect(0).ok();
        self.clear_dirty_rect_list();
        region.filter(|rect| !rect.is_empty())
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Store `ch` with the current attribute; true if the cell changed.
    fn write(&mut self, x: i32, y: i32, ch: char) -> bool {
        let Some(offset) = self.offset(x, y) else {
            return false;
        };
        let cell = Cell::new(ch, self.attr);
        if self.cells[offset] == cell {
            return false;
        }
        self.cells[offset] = cell;
        true
    }

    fn mark(&mut self, rect: Rect) {
        if self.damage_suspended > 0 {
            return;
        }
        // Empty canvases reject every rect; there is nothing to redraw anyway.
        self.damage.add(rect, self.width, self.height).ok();
    }
}

/// Number of cells in a `width` x `height` canvas, if its buffer can exist.
fn cell_count(width: u32, height: u32) -> Option<usize> {
    i32::try_from(width).ok()?;
    i32::try_from(height).ok()?;
    let count = usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?;
    let bytes = count.checked_mul(std::mem::size_of::<Cell>())?;
    (bytes <= isize::MAX as usize).then_some(count)
}

fn blank_cells(width: u32, height: u32, blank: Cell) -> Result<Vec<Cell>> {
    let invalid = Error::InvalidCanvasSize { width, height };
    let count = cell_count(width, height).ok_or(invalid)?;
    let mut cells = Vec::new();
    if cells.try_reserve_exact(count).is_err() {
        log::debug!("cannot allocate {count} cells for a {width}x{height} canvas");
        return Err(invalid);
    }
    cells.resize(count, blank);
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(width: u32, height: u32) -> Canvas {
        let mut canvas = Canvas::new(width, height).unwrap();
        assert_eq!(canvas.take_damage(), None);
        canvas
    }

    #[test]
    fn new_canvas_is_clean_and_blank() {
        let canvas = Canvas::new(4, 3).unwrap();
        assert_eq!(canvas.size(), (4, 3));
        assert_eq!(canvas.dirty_rect_count(), 0);
        assert!(canvas.cells().iter().all(|cell| *cell == Cell::new(' ', 0)));
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let width = i32::MAX as u32 + 1;
        assert_eq!(
            Canvas::new(width, 1).unwrap_err(),
            Error::InvalidCanvasSize { width, height: 1 }
        );
    }

    #[test]
    fn unallocatable_canvas_is_rejected() {
        let side = i32::MAX as u32;
        assert_eq!(
            Canvas::new(side, side).unwrap_err(),
            Error::InvalidCanvasSize {
                width: side,
                height: side
            }
        );

        let mut canvas = canvas(3, 3);
        canvas.put_char(1, 1, 'x');
        assert_eq!(
            canvas.set_size(side, side),
            Err(Error::InvalidCanvasSize {
                width: side,
                height: side
            })
        );
        assert_eq!(canvas.size(), (3, 3));
        assert_eq!(canvas.cell(1, 1), Some(Cell::new('x', 0)));
        assert_eq!(canvas.dirty_rect(0), Ok(Rect::new(1, 1, 1, 1)));
    }

    #[test]
    fn put_char_marks_one_cell() {
        let mut canvas = canvas(10, 10);
        canvas.put_char(3, 4, 'x');
        assert_eq!(canvas.cell(3, 4), Some(Cell::new('x', 0)));
        assert_eq!(canvas.take_damage(), Some(Rect::new(3, 4, 1, 1)));
    }

    #[test]
    fn unchanged_writes_do_not_mark() {
        let mut canvas = canvas(10, 10);
        canvas.put_char(3, 4, ' ');
        canvas.put_str(0, 0, "   ");
        canvas.fill_box(Rect::new(0, 0, 10, 10), ' ');
        assert_eq!(canvas.dirty_rect_count(), 0);

        canvas.set_attr(7);
        canvas.put_char(3, 4, ' ');
        assert_eq!(canvas.take_damage(), Some(Rect::new(3, 4, 1, 1)));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut canvas = canvas(10, 10);
        canvas.put_char(-1, 0, 'x');
        canvas.put_char(10, 0, 'x');
        canvas.put_str(0, 10, "abc");
        canvas.fill_box(Rect::new(20, 20, 3, 3), 'x');
        assert_eq!(canvas.dirty_rect_count(), 0);
    }

    #[test]
    fn put_str_marks_the_changed_span() {
        let mut canvas = canvas(10, 3);
        canvas.put_str(-2, 1, "abcdef");
        assert_eq!(canvas.cell(0, 1), Some(Cell::new('c', 0)));
        assert_eq!(canvas.take_damage(), Some(Rect::new(0, 1, 4, 1)));

        canvas.put_str(1, 1, "dxf");
        assert_eq!(canvas.take_damage(), Some(Rect::new(2, 1, 1, 1)));

        canvas.put_str(8, 2, "0123");
        assert_eq!(canvas.row(2).unwrap()[9], Cell::new('1', 0));
        assert_eq!(canvas.take_damage(), Some(Rect::new(8, 2, 2, 1)));
    }

    #[test]
    fn fill_box_is_clipped() {
        let mut canvas = canvas(10, 10);
        canvas.fill_box(Rect::new(-5, -5, 8, 8), '#');
        assert_eq!(canvas.cell(2, 2), Some(Cell::new('#', 0)));
        assert_eq!(canvas.cell(3, 3), Some(Cell::new(' ', 0)));
        assert_eq!(canvas.take_damage(), Some(Rect::new(0, 0, 3, 3)));
    }

    #[test]
    fn clear_canvas_marks_everything() {
        let mut canvas = canvas(6, 2);
        canvas.set_attr(1);
        canvas.clear_canvas();
        assert_eq!(canvas.take_damage(), Some(Rect::new(0, 0, 6, 2)));
        assert!(canvas.cells().iter().all(|cell| cell.attr == 1));
    }

    #[test]
    fn resize_marks_new_extent_by_default() {
        let mut canvas = canvas(4, 4);
        canvas.put_str(0, 0, "abcd");
        canvas.set_size(6, 2).unwrap();
        assert_eq!(canvas.row(0).unwrap()[3], Cell::new('d', 0));
        assert_eq!(canvas.row(0).unwrap()[4], Cell::new(' ', 0));
        assert_eq!(canvas.take_damage(), Some(Rect::new(0, 0, 6, 2)));
    }

    #[test]
    fn resize_can_keep_damage_for_clamp_on_read() {
        let options = CanvasOptions::default().with_resize_damage(ResizeDamage::Keep);
        let mut canvas = Canvas::new_with_options(10, 10, options).unwrap();
        canvas.put_char(8, 8, 'x');
        canvas.set_size(5, 5).unwrap();
        assert_eq!(canvas.dirty_rect_count(), 1);
        assert!(canvas.damage().is_dirty());
        assert_eq!(canvas.dirty_rect(0), Ok(Rect::new(5, 5, 0, 0)));
        assert_eq!(canvas.take_damage(), None);
        assert!(!canvas.damage().is_dirty());

        canvas.set_size(10, 10).unwrap();
        assert_eq!(canvas.dirty_rect_count(), 0);
        canvas.put_char(8, 8, 'x');
        canvas.set_size(5, 5).unwrap();
        canvas.set_size(10, 10).unwrap();
        assert_eq!(canvas.dirty_rect(0), Ok(Rect::new(8, 8, 1, 1)));
    }

    #[test]
    fn resize_to_zero_leaves_no_damage() {
        let mut canvas = canvas(3, 3);
        canvas.set_size(0, 0).unwrap();
        assert_eq!(canvas.dirty_rect_count(), 0);
        canvas.clear_canvas();
        assert_eq!(canvas.take_damage(), None);
    }

    #[test]
    fn suspended_tracking_nests() {
        let mut canvas = canvas(10, 10);
        canvas.disable_dirty_tracking();
        canvas.disable_dirty_tracking();
        canvas.put_char(1, 1, 'a');
        canvas.enable_dirty_tracking().unwrap();
        canvas.put_char(2, 2, 'b');
        assert!(!canvas.is_dirty_tracking_enabled());
        assert_eq!(canvas.dirty_rect_count(), 0);

        canvas.add_dirty_rect(Rect::new(1, 1, 1, 1)).unwrap();
        assert_eq!(canvas.dirty_rect_count(), 1);

        canvas.enable_dirty_tracking().unwrap();
        assert_eq!(
            canvas.enable_dirty_tracking(),
            Err(Error::DirtyTrackingNotDisabled)
        );
        canvas.put_char(3, 3, 'c');
        assert_eq!(canvas.take_damage(), Some(Rect::new(1, 1, 3, 3)));
    }

    #[test]
    fn fill_char_option_is_used() {
        let options = CanvasOptions::default().with_fill_char('.');
        let mut canvas = Canvas::new_with_options(2, 2, options).unwrap();
        assert_eq!(canvas.cell(1, 1), Some(Cell::new('.', 0)));
        canvas.set_size(3, 2).unwrap();
        assert_eq!(canvas.cell(2, 0), Some(Cell::new('.', 0)));
    }

    #[test]
    fn cells_mut_marks_everything() {
        let mut canvas = canvas(3, 2);
        canvas.cells_mut()[0].ch = 'z';
        assert_eq!(canvas.take_damage(), Some(Rect::new(0, 0, 3, 2)));
    }
}
