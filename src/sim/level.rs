/// Level sources.
///
/// ## Sources:
///   1. Level file named in config (`.toml` = integer codes, else glyphs)
///   2. Built-in level
///
/// ## Code format (`.toml`):
///   ```toml
///   name = "Level Name"
///   rows = [
///     [2, 2, 2, 2],
///     [2, 3, 0, 2],
///     [2, 2, 2, 2],
///   ]
///   ```
///   Codes are the `RawTile` vocabulary (0 = Air .. 11 = Lock2).
///   Rows must all have the same length.
///
/// ## Glyph format (anything else):
///   Lines starting with `;` are comments; the first one names the level.
///   Empty lines are skipped. Short rows are padded with Air.
///
/// ## Glyph legend:
///   ' ' / '.' = Air              ':' = Flux
///   '#' = Unbreakable            'P' = Player
///   'o' = Stone                  'O' = Falling stone
///   'b' = Box                    'B' = Falling box
///   '1' = Key 1                  '!' = Lock 1
///   '2' = Key 2                  '@' = Lock 2

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::grid::Grid;
use crate::domain::tile::{RawTile, Tile, TileKind};

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("level has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("unknown tile code {code} at ({x}, {y})")]
    UnknownCode { code: u8, x: usize, y: usize },
    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
    #[error("level has no player")]
    NoPlayer,
    #[error("level has {count} players, expected exactly one")]
    MultiplePlayers { count: usize },
    #[error("could not read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid level file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A named starting grid.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub grid: Grid,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Translate a raw grid into tiles. Pure; validates shape and player count.
pub fn transform(raw: &[Vec<RawTile>]) -> Result<Grid, LevelError> {
    let width = match raw.first() {
        Some(row) if !row.is_empty() => row.len(),
        _ => return Err(LevelError::Empty),
    };
    for (y, row) in raw.iter().enumerate() {
        if row.len() != width {
            return Err(LevelError::Ragged { row: y, expected: width, found: row.len() });
        }
    }

    let rows: Vec<Vec<Tile>> = raw
        .iter()
        .map(|row| row.iter().map(|&r| Tile::from_raw(r)).collect())
        .collect();
    let grid = Grid::from_rows(rows);

    match grid.count(TileKind::Player) {
        0 => Err(LevelError::NoPlayer),
        1 => Ok(grid),
        count => Err(LevelError::MultiplePlayers { count }),
    }
}

/// Decode integer codes into the raw vocabulary.
pub fn parse_codes(rows: &[Vec<u8>]) -> Result<Vec<Vec<RawTile>>, LevelError> {
    rows.iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, &code)| {
                    RawTile::try_from(code).map_err(|code| LevelError::UnknownCode { code, x, y })
                })
                .collect()
        })
        .collect()
}

#[derive(Deserialize, Debug)]
struct TomlLevel {
    #[serde(default = "default_name")]
    name: String,
    rows: Vec<Vec<u8>>,
}

fn default_name() -> String { "Untitled".into() }

/// Parse a `.toml` code level.
pub fn parse_toml(text: &str) -> Result<Level, LevelError> {
    let parsed: TomlLevel = toml::from_str(text)?;
    let raw = parse_codes(&parsed.rows)?;
    Ok(Level { name: parsed.name, grid: transform(&raw)? })
}

/// Parse a glyph level.
pub fn parse_glyphs(text: &str) -> Result<Level, LevelError> {
    let mut name: Option<String> = None;
    let mut rows: Vec<Vec<RawTile>> = Vec::new();

    for line in text.lines() {
        if let Some(comment) = line.strip_prefix(';') {
            if name.is_none() {
                name = Some(comment.trim().to_string());
            }
            continue;
        }
        if line.is_empty() { continue; }

        let y = rows.len();
        let row = line
            .chars()
            .enumerate()
            .map(|(x, ch)| raw_from_glyph(ch).ok_or(LevelError::UnknownGlyph { glyph: ch, x, y }))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, RawTile::Air);
    }

    Ok(Level {
        name: name.unwrap_or_else(default_name),
        grid: transform(&rows)?,
    })
}

/// Load a level file, picking the format from the extension.
pub fn load_level(path: &Path) -> Result<Level, LevelError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| LevelError::Io { path: path.to_path_buf(), source })?;
    let level = if path.extension().is_some_and(|e| e == "toml") {
        parse_toml(&text)?
    } else {
        parse_glyphs(&text)?
    };
    tracing::info!(
        path = %path.display(),
        name = %level.name,
        width = level.grid.width(),
        height = level.grid.height(),
        "level loaded"
    );
    Ok(level)
}

/// The built-in level.
pub fn builtin_level() -> Result<Level, LevelError> {
    let rows: Vec<Vec<u8>> = BUILTIN_ROWS.iter().map(|r| r.to_vec()).collect();
    let raw = parse_codes(&rows)?;
    Ok(Level { name: "Cellar".into(), grid: transform(&raw)? })
}

// ══════════════════════════════════════════════════════════════
// Internals
// ══════════════════════════════════════════════════════════════

const BUILTIN_ROWS: [[u8; 8]; 6] = [
    [2, 2, 2, 2, 2, 2, 2, 2],
    [2, 3, 0, 1, 1, 2, 0, 2],
    [2, 4, 2, 6, 1, 2, 0, 2],
    [2, 8, 4, 1, 1, 2, 0, 2],
    [2, 4, 1, 1, 1, 9, 0, 2],
    [2, 2, 2, 2, 2, 2, 2, 2],
];

fn raw_from_glyph(ch: char) -> Option<RawTile> {
    Some(match ch {
        ' ' | '.' => RawTile::Air,
        ':' => RawTile::Flux,
        '#' => RawTile::Unbreakable,
        'P' => RawTile::Player,
        'o' => RawTile::Stone,
        'O' => RawTile::FallingStone,
        'b' => RawTile::Box,
        'B' => RawTile::FallingBox,
        '1' => RawTile::Key1,
        '!' => RawTile::Lock1,
        '2' => RawTile::Key2,
        '@' => RawTile::Lock2,
        _ => return None,
    })
}
