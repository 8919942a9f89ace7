use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
type Cells = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];
const EMPTY_SCREEN: Cells = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// The 64x32 monochrome framebuffer. Every cell is either 0 or 1.
#[derive(Clone, PartialEq, Eq)]
pub struct Display {
    cells: Cells,
}

impl Display {
    pub fn new() -> Display {
        Display { cells: EMPTY_SCREEN }
    }

    pub fn clear(&mut self) {
        self.cells = EMPTY_SCREEN;
    }

    /// The state of the pixel at column `x`, row `y`.
    /// Coordinates wrap around the edges.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8; SCREEN_WIDTH]> {
        self.cells.iter()
    }

    /// XOR a sprite onto the screen with its top left corner at (`x`, `y`).
    ///
    /// Each byte is one row, the most significant bit being the leftmost pixel.
    /// Pixels that fall off the right or bottom edge wrap around to the other side.
    /// Returns whether any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row_offset, row) in sprite.iter().enumerate() {
            let row_y = (y + row_offset) % SCREEN_HEIGHT;
            for bit in 0..8 {
                let new_pixel = (row >> (7 - bit)) & 1;
                if new_pixel == 0 {
                    continue;
                }
                let cell = &mut self.cells[row_y][(x + bit) % SCREEN_WIDTH];
                // Set pixel is unset
                if *cell == 1 {
                    collision = true;
                }
                *cell ^= new_pixel;
            }
        }
        collision
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for c in row.iter() {
                write!(f, "{}", if *c == 1 { "#" } else { " " })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lit: usize = self.cells.iter().flatten().map(|c| *c as usize).sum();
        write!(f, "Display {{ {} pixels lit }}", lit)
    }
}
