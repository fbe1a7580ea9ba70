use crate::attachment::{AttachmentError, encode_png};
use crate::models::ImageData;
use image::{DynamicImage, GrayImage, Luma};

pub const DEFAULT_WIDTH: usize = 60;
pub const DEFAULT_HEIGHT: usize = 20;
/// Pixels per cell edge in the exported image.
pub const CELL_PIXELS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Freehand drawing surface: a grid of ink cells and a pen cursor. While the
/// pen is down, every cell the cursor visits is inked.
#[derive(Debug, Clone, PartialEq)]
pub struct Scratchpad {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    cursor: (usize, usize),
    pen_down: bool,
}

impl Default for Scratchpad {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Scratchpad {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![false; width * height],
            cursor: (width / 2, height / 2),
            pen_down: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn is_inked(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn ink_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    pub fn is_blank(&self) -> bool {
        self.ink_count() == 0
    }

    fn ink_cursor(&mut self) {
        let (x, y) = self.cursor;
        self.cells[y * self.width + x] = true;
    }

    /// Lifts or lowers the pen; lowering inks the current cell.
    pub fn toggle_pen(&mut self) {
        self.pen_down = !self.pen_down;
        if self.pen_down {
            self.ink_cursor();
        }
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let (x, y) = self.cursor;
        self.cursor = match direction {
            Direction::Up => (x, y.saturating_sub(1)),
            Direction::Down => (x, (y + 1).min(self.height - 1)),
            Direction::Left => (x.saturating_sub(1), y),
            Direction::Right => ((x + 1).min(self.width - 1), y),
        };
        if self.pen_down {
            self.ink_cursor();
        }
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = false);
    }

    /// Black strokes on a white background, each cell scaled to a square
    /// block of `CELL_PIXELS`.
    pub fn render(&self) -> GrayImage {
        let w = self.width as u32 * CELL_PIXELS;
        let h = self.height as u32 * CELL_PIXELS;
        GrayImage::from_fn(w, h, |px, py| {
            let x = (px / CELL_PIXELS) as usize;
            let y = (py / CELL_PIXELS) as usize;
            if self.is_inked(x, y) { Luma([0]) } else { Luma([255]) }
        })
    }

    pub fn export_png(&self) -> Result<ImageData, AttachmentError> {
        encode_png(&DynamicImage::ImageLuma8(self.render()))
    }
}
