//! Character-grid canvas for terminal scene output
//!
//! A fixed-size grid the scene renderer projects world coordinates into.
//! Out-of-bounds writes are clipped so a projection never panics.

use unicode_width::UnicodeWidthChar;

/// A fixed-size character grid
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    grid: Vec<Vec<char>>,
}

impl Canvas {
    /// Create a blank canvas of the given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            grid: vec![vec![' '; width]; height],
        }
    }

    /// Canvas width in columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Canvas height in rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Set a cell; writes outside the canvas are clipped
    pub fn set(&mut self, x: i32, y: i32, c: char) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.grid[y as usize][x as usize] = c;
        }
    }

    /// The character at a cell, or a space outside the canvas
    pub fn get(&self, x: i32, y: i32) -> char {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.grid[y as usize][x as usize]
        } else {
            ' '
        }
    }

    /// Draw text starting at a cell, advancing by display width so wide
    /// glyphs keep their columns; clipped at the canvas edge
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str) {
        let mut column = x;
        for c in text.chars() {
            let advance = UnicodeWidthChar::width(c).unwrap_or(0) as i32;
            if advance == 0 {
                continue;
            }
            self.set(column, y, c);
            column += advance;
            if column >= self.width as i32 {
                break;
            }
        }
    }

    /// Draw a line between two cells with Bresenham stepping
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: char) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set(x, y, c);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += sx;
            }
            if doubled <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

impl std::fmt::Display for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let line: String = row.iter().collect();
                line.trim_end().to_string()
            })
            .collect();

        while rows.first().is_some_and(|row| row.is_empty()) {
            rows.remove(0);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        write!(f, "{}", rows.join("\n"))
    }
}
