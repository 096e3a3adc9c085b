use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, ResetColor, SetForegroundColor},
};

use crate::game::RenderView;
use crate::types::Point;

const SHIP_SIDE_CHAR: char = '+';
const SHIP_BACK_CHAR: char = '=';
const ASTEROID_CHAR: char = 'o';
const BULLET_CHAR: char = '.';

// --- HUD text ---
pub fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

pub fn lives_text(lives: u32) -> String {
    format!("Lives: {lives}")
}

pub fn game_over_text(score: u32) -> String {
    format!("Game Over, Score: {score}")
}

// --- ScreenBuffer for headless rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn copy_from(&mut self, grid: &GameGrid) {
        for (row, grid_row) in self.buffer.iter_mut().zip(&grid.cells) {
            for (slot, cell) in row.iter_mut().zip(grid_row) {
                *slot = cell.ch;
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.buffer.iter().map(|row| row.iter().collect())
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in self.rows() {
            info!("{}", row);
        }
        info!("---------------------");
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    /// Pushes a finished grid to the target: drawn to the terminal, or copied
    /// into the buffer and dumped to the log.
    pub fn present(&mut self, grid: &GameGrid) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => {
                grid.render(s)?;
                s.flush()
            }
            OutputTarget::ScreenBuffer(sb) => {
                sb.copy_from(grid);
                sb.print_to_log();
                Ok(())
            }
        }
    }
}

// --- GameGrid for geometric rendering ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Cell { ch: ' ', color: Color::White }
    }
}

pub struct GameGrid {
    pub cells: Vec<Vec<Cell>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            cells: vec![vec![Cell::default(); width as usize]; height as usize],
            width,
            height,
        }
    }

    /// Writes one cell; anything outside the grid is dropped.
    pub fn set_char(&mut self, x: i32, y: i32, ch: char, color: Color) {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return;
        }
        self.cells[y as usize][x as usize] = Cell { ch, color };
    }

    pub fn write_text(&mut self, x: i32, y: i32, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.set_char(x + i as i32, y, ch, Color::White);
        }
    }

    /// Bresenham line between two cells, both ends included.
    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), ch: char, color: Color) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_char(x, y, ch, color);
            if (x, y) == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::default());
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let mut current = None;
        for (y, row) in self.cells.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            for cell in row {
                if current != Some(cell.color) {
                    queue!(out, SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                write!(out, "{}", cell.ch)?;
            }
        }
        queue!(out, ResetColor)?;
        Ok(())
    }
}

/// Maps play-field coordinates onto terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub field_width: i32,
    pub field_height: i32,
    pub columns: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn to_cell(&self, point: Point) -> (i32, i32) {
        let scale = |value: i32, cells: u16, extent: i32| {
            (i64::from(value) * i64::from(cells) / i64::from(extent.max(1))) as i32
        };
        (
            scale(point.x, self.columns, self.field_width),
            scale(point.y, self.rows, self.field_height),
        )
    }
}

/// Render hook: receives the current view once per frame.
pub trait Renderer {
    fn draw(&mut self, view: &RenderView<'_>) -> io::Result<()>;
}

/// Draws a view into a grid: outlines while the session runs, the final
/// score once it is over.
pub fn paint(grid: &mut GameGrid, view: &RenderView<'_>) {
    grid.clear();
    let viewport = Viewport {
        field_width: view.width,
        field_height: view.height,
        columns: grid.width,
        rows: grid.height,
    };

    if !view.is_alive() {
        let message = game_over_text(view.score);
        let x = (i32::from(grid.width) - message.len() as i32) / 2;
        grid.write_text(x.max(0), i32::from(grid.height) / 2, &message);
        return;
    }

    for asteroid in view.asteroids {
        for pair in asteroid.outline().windows(2) {
            grid.draw_line(viewport.to_cell(pair[0]), viewport.to_cell(pair[1]), ASTEROID_CHAR, Color::Green);
        }
    }

    for bullet in view.bullets {
        let [from, to] = bullet.outline();
        grid.draw_line(viewport.to_cell(from), viewport.to_cell(to), BULLET_CHAR, Color::White);
    }

    // Ship goes last, over everything else.
    let outline = view.ship.outline();
    for [from, to] in outline.sides {
        grid.draw_line(viewport.to_cell(from), viewport.to_cell(to), SHIP_SIDE_CHAR, Color::White);
    }
    let [from, to] = outline.back;
    grid.draw_line(viewport.to_cell(from), viewport.to_cell(to), SHIP_BACK_CHAR, Color::Red);

    grid.write_text(0, 0, &score_text(view.score));
    let lives = lives_text(view.lives);
    grid.write_text(i32::from(grid.width) - lives.len() as i32, 0, &lives);
}

pub struct TerminalRenderer {
    grid: GameGrid,
    target: OutputTarget,
}

impl TerminalRenderer {
    pub fn new(columns: u16, rows: u16, target: OutputTarget) -> Self {
        TerminalRenderer { grid: GameGrid::new(columns, rows), target }
    }

    #[cfg(test)]
    fn target_mut(&mut self) -> &mut OutputTarget {
        &mut self.target
    }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, view: &RenderView<'_>) -> io::Result<()> {
        paint(&mut self.grid, view);
        self.target.present(&self.grid)
    }
}
