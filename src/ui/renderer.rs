/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads the world through `cells()` and `player()`.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use rockfall::{TileKind, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the
    /// inter-row gap matches the cell color on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
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
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Paint a whole row with `bg`, then write `s` on it.
    fn put_bar(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', fg, bg));
        }
        self.put_str(0, y, s, fg, bg);
    }
}

// ── Tile palette ──

const fn rgb(hex: u32) -> Color {
    Color::Rgb { r: (hex >> 16) as u8, g: (hex >> 8) as u8, b: hex as u8 }
}

const FLUX: Color = rgb(0xccffcc);
const WALL: Color = rgb(0x999999);
const PLAYER: Color = rgb(0xff0000);
const STONE: Color = rgb(0x0000cc);
const BOX: Color = rgb(0x8b4513);
const PAIR_ONE: Color = rgb(0xffcc00);
const PAIR_TWO: Color = rgb(0x00ccff);

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

/// Two terminal columns per tile: (glyphs, fg, bg).
fn tile_style(kind: TileKind) -> ([char; 2], Color, Color) {
    match kind {
        TileKind::Air         => ([' ', ' '], Color::White, Cell::BASE_BG),
        TileKind::Flux        => (['░', '░'], FLUX, Cell::BASE_BG),
        TileKind::Unbreakable => (['█', '█'], WALL, Cell::BASE_BG),
        TileKind::Player      => (['◖', '◗'], PLAYER, Cell::BASE_BG),
        TileKind::Stone       => (['(', ')'], Color::White, STONE),
        TileKind::Box         => (['[', ']'], Color::White, BOX),
        TileKind::Key1        => (['o', '━'], PAIR_ONE, Cell::BASE_BG),
        TileKind::Lock1       => (['▐', '▌'], Color::Black, PAIR_ONE),
        TileKind::Key2        => (['o', '━'], PAIR_TWO, Cell::BASE_BG),
        TileKind::Lock2       => (['▐', '▌'], Color::Black, PAIR_TWO),
    }
}

// ── Layout ──

/// Each game cell = 2 terminal columns.
const CELL_W: usize = 2;

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

/// Rows below the map: gap, message, gap, help.
const FOOTER_ROWS: usize = 4;

/// First visible map coordinate on one axis, keeping `focus` in view and
/// never scrolling past either edge.
fn view_origin(focus: usize, world_len: usize, view_len: usize) -> usize {
    if view_len == 0 || world_len <= view_len {
        return 0;
    }
    focus.saturating_sub(view_len / 2).min(world_len - view_len)
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
        // Force full repaint on first frame: back ≠ front for every cell.
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

    /// Draw one frame. `message` is shown in the message bar when non-empty.
    pub fn render(&mut self, world: &WorldState, message: &str) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        compose(&mut self.front, world, message);

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

        // Explicit base colors; ResetColor would fall back to the terminal's
        // own default, which may differ from BASE_BG.
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

                // Set colors only if changed
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
}

// ── Compose: build front buffer content ──

fn compose(frame: &mut FrameBuffer, w: &WorldState, message: &str) {
    let (px, py) = w.player();

    // ── HUD row ──
    let hud = format!(" {}  Tick:{:<7}  Pos:({},{}) ", w.level_name, w.tick, px, py);
    frame.put_bar(HUD_ROW, &hud, Color::White, HUD_BG);

    // ── Map (scrolls to keep the player visible) ──
    let view_w = (frame.width / CELL_W).min(w.width());
    let view_h = frame.height.saturating_sub(MAP_ROW + FOOTER_ROWS).max(1).min(w.height());
    let ox = view_origin(px, w.width(), view_w);
    let oy = view_origin(py, w.height(), view_h);

    for (x, y, kind) in w.cells() {
        if x < ox || y < oy || x >= ox + view_w || y >= oy + view_h {
            continue;
        }
        let col = (x - ox) * CELL_W;
        let row = MAP_ROW + (y - oy);
        let (glyphs, fg, bg) = tile_style(kind);
        for (i, ch) in glyphs.into_iter().enumerate() {
            frame.set(col + i, row, Cell::new(ch, fg, bg));
        }
    }

    // ── Message bar ──
    let msg_row = MAP_ROW + view_h + 1;
    if !message.is_empty() {
        frame.put_bar(msg_row, &format!(" ◈ {message} "), Color::Black, MSG_BG);
    }

    // ── Help bar ──
    let help = " Arrows/WASD:Move  R:Restart  Esc/Q:Quit  │  Pad: Start:Restart  Select:Quit";
    frame.put_str(0, msg_row + 2, help, Color::DarkGrey, Cell::BASE_BG);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rockfall::sim::level::parse_glyphs;

    fn world_from(rows: &[&str]) -> WorldState {
        WorldState::from_level(parse_glyphs(&rows.join("\n")).unwrap()).unwrap()
    }

    #[test]
    fn view_origin_clamps_to_edges() {
        assert_eq!(view_origin(3, 10, 20), 0);
        assert_eq!(view_origin(0, 100, 20), 0);
        assert_eq!(view_origin(50, 100, 20), 40);
        assert_eq!(view_origin(99, 100, 20), 80);
    }

    #[test]
    fn palette_uses_tile_colors() {
        assert_eq!(tile_style(TileKind::Player).1, Color::Rgb { r: 0xff, g: 0, b: 0 });
        assert_eq!(tile_style(TileKind::Box).2, Color::Rgb { r: 0x8b, g: 0x45, b: 0x13 });
        assert_eq!(tile_style(TileKind::Lock2).2, Color::Rgb { r: 0, g: 0xcc, b: 0xff });
    }

    #[test]
    fn compose_draws_hud_and_tiles() {
        let w = world_from(&["; Demo", "####", "#Po#", "####"]);
        let mut frame = FrameBuffer::new(40, 12);
        compose(&mut frame, &w, "");

        let hud: String = (0..20).map(|x| frame.get(x, HUD_ROW).ch).collect();
        assert!(hud.contains("Demo"));
        assert!(hud.contains("Tick:0"));

        let player = frame.get(CELL_W, MAP_ROW + 1);
        assert_eq!(player.fg, PLAYER);
        let stone = frame.get(2 * CELL_W, MAP_ROW + 1);
        assert_eq!(stone.bg, STONE);
    }

    #[test]
    fn compose_shows_message_below_map() {
        let w = world_from(&["###", "#P#", "###"]);
        let mut frame = FrameBuffer::new(40, 12);
        compose(&mut frame, &w, "Lock opened");
        let row = MAP_ROW + 3 + 1;
        let text: String = (0..20).map(|x| frame.get(x, row).ch).collect();
        assert!(text.contains("Lock opened"));
        assert_eq!(frame.get(30, row).bg, MSG_BG);
    }
}
