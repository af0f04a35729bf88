/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads the world through its render interface
/// (`cells()`, `player_pos()`, `name()`, `tick()`); it never mutates it.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::fall::FallState;
use crate::domain::keys::KeyColor;
use crate::domain::tile::Tile;
use crate::sim::world::WorldState;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }
}

// ── Tile palette ──

/// Each grid cell is drawn as two terminal columns.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

fn key_color(color: KeyColor) -> Color {
    match color {
        KeyColor::One => rgb(0xff, 0xcc, 0x00),
        KeyColor::Two => rgb(0x00, 0xcc, 0xff),
    }
}

/// Glyph pair and colors for one tile.
fn tile_style(tile: Tile) -> ([char; 2], Color, Color) {
    let dark = rgb(20, 20, 20);
    match tile {
        Tile::Empty => ([' ', ' '], Color::White, Cell::BASE_BG),
        Tile::Inert => ([' ', ' '], dark, rgb(0xcc, 0xff, 0xcc)),
        Tile::Unbreakable => ([' ', ' '], dark, rgb(0x99, 0x99, 0x99)),
        Tile::Rock(state) => (fall_glyph(state), Color::White, rgb(0x00, 0x00, 0xcc)),
        Tile::Box(state) => (fall_glyph(state), Color::White, rgb(0x8b, 0x45, 0x13)),
        Tile::Key(c) => (['o', '-'], dark, key_color(c)),
        Tile::Lock(c) => (['[', ']'], dark, key_color(c)),
        Tile::Player => (['@', '@'], Color::White, rgb(0xff, 0x00, 0x00)),
    }
}

fn fall_glyph(state: FallState) -> [char; 2] {
    match state {
        FallState::Resting => [' ', ' '],
        FallState::Falling => ['v', 'v'],
    }
}

/// Status info drawn around the map.
pub struct Hud<'a> {
    pub level_index: usize,
    pub level_count: usize,
    pub status: &'a str,
    pub gamepad: bool,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Full repaint on the next frame (e.g. after switching levels).
    pub fn invalidate(&mut self) -> io::Result<()> {
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))
    }

    pub fn render(&mut self, world: &WorldState, hud: &Hud) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.invalidate()?;
        }

        self.front.clear();
        self.compose_game(world, hud);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &WorldState, hud: &Hud) {
        let buf_w = self.front.width;
        let dim = rgb(140, 140, 160);

        // ── HUD row ──
        let pad = if hud.gamepad { "  [pad]" } else { "" };
        let title = format!(
            " {}  ({}/{})  Tick:{}{} ",
            w.name(), hud.level_index + 1, hud.level_count, w.tick(), pad,
        );
        self.front.put_str(0, HUD_ROW, &title, Color::White, Cell::BASE_BG);

        // ── Map, centered horizontally ──
        let map_cols = w.width() * CELL_W;
        let left = buf_w.saturating_sub(map_cols) / 2;
        for cell in w.cells() {
            let (glyph, fg, bg) = tile_style(cell.tile);
            let x = left + cell.col * CELL_W;
            let y = MAP_ROW + cell.row;
            self.front.set(x, y, Cell { ch: glyph[0], fg, bg });
            self.front.set(x + 1, y, Cell { ch: glyph[1], fg, bg });
        }

        // ── Status + help ──
        let below = MAP_ROW + w.height() + 1;
        let p = w.player_pos();
        let status = format!(" @{},{}  {}", p.row, p.col, hud.status);
        self.front.put_str(0, below, &status, Color::Yellow, Cell::BASE_BG);
        self.front.put_str(
            0, below + 1,
            " Arrows/WASD move   R restart   N/P level   Q quit",
            dim, Cell::BASE_BG,
        );
    }
}
