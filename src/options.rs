/// What a canvas resize does to the recorded damage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ResizeDamage {
    /// Drop the old damage and report the whole new extent as dirty.
    #[default]
    Full,
    /// Keep the old damage as-is; it is clamped to the new extent on read.
    Keep,
}

/// Options for creating a [`Canvas`](crate::Canvas).
#[derive(Debug, Copy, Clone)]
pub struct CanvasOptions {
    pub fill_char: char,
    pub resize_damage: ResizeDamage,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            fill_char: ' ',
            resize_damage: ResizeDamage::Full,
        }
    }
}

impl CanvasOptions {
    pub fn with_fill_char(mut self, fill_char: char) -> Self {
        self.fill_char = fill_char;
        self
    }

    pub fn with_resize_damage(mut self, resize_damage: ResizeDamage) -> Self {
        self.resize_damage = resize_damage;
        self
    }
}
