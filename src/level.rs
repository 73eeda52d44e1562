//! Tile levels: an integer grid expanded into positioned, textured quads.
//!
//! A level is a list of rows of tile IDs. Row `r`, column `c` lands at world
//! position `(c * TILE_SIZE, -r * TILE_SIZE, 0)`, so the first text row is the
//! top of the level. `0` marks an empty cell.

use std::{path::Path, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::{
    backend::TextureId,
    data_structures::model::{Index, Vertex},
    frame::Frame,
    shader::TexturedShader,
};

/// Side length of one tile in world units.
pub const TILE_SIZE: f32 = 1.0;

const QUAD_INDICES: [Index; 6] = [0, 1, 2, 0, 2, 3];

static LEADING_INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

/// The level shown by the tile scene when no level file is configured.
pub fn default_level() -> Vec<Vec<i32>> {
    vec![vec![1, 2, 7, 2, 3], vec![0, 5, 5, 5, 0]]
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read level file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("level file {0} contains no rows")]
    Empty(String),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileEntity {
    pub position: [f32; 3],
    pub texture: TextureId,
}

/// Parses the whitespace separated level format.
///
/// Each line is scanned like a stream extraction of integers: leading
/// whitespace is skipped, an optional sign and digits are taken, and the row
/// ends at the first position where no integer starts. `12abc` therefore
/// yields `12`, `3,4` yields `3` and `1.5` yields `1`. Values that overflow
/// `i32` also end the row. Lines that end up without a single value are
/// dropped.
pub fn parse_level(text: &str) -> Vec<Vec<i32>> {
    text.lines()
        .map(parse_row)
        .filter(|row| !row.is_empty())
        .collect()
}

fn parse_row(line: &str) -> Vec<i32> {
    let mut row = Vec::new();
    let mut rest = line;
    while let Some(captures) = LEADING_INT_RE.captures(rest) {
        let (Some(whole), Some(digits)) = (captures.get(0), captures.get(1)) else {
            break;
        };
        match digits.as_str().parse::<i32>() {
            Ok(value) => row.push(value),
            Err(_) => break,
        }
        rest = &rest[whole.end()..];
    }
    row
}

#[derive(Debug, Default)]
pub struct LevelRenderer {
    tiles: Vec<TileEntity>,
}

impl LevelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tiles(&self) -> &[TileEntity] {
        &self.tiles
    }

    /// Replaces the current tiles with the non-empty cells of `matrix`.
    ///
    /// `resolve` maps a tile ID to its texture; cells it cannot resolve are
    /// skipped.
    pub fn load_level<R>(&mut self, matrix: &[Vec<i32>], mut resolve: R)
    where
        R: FnMut(i32) -> Option<TextureId>,
    {
        self.tiles.clear();
        for (row, cells) in matrix.iter().enumerate() {
            for (col, &tile_id) in cells.iter().enumerate() {
                if tile_id == 0 {
                    continue;
                }
                match resolve(tile_id) {
                    Some(texture) => self.tiles.push(TileEntity {
                        position: [col as f32 * TILE_SIZE, -(row as f32) * TILE_SIZE, 0.0],
                        texture,
                    }),
                    None => log::debug!("tile {} at ({}, {}) has no texture", tile_id, row, col),
                }
            }
        }
        log::info!("Level loaded with {} tiles", self.tiles.len());
    }

    /// Reads and parses `path`, then loads it. The current tiles are left
    /// untouched when reading or parsing fails.
    pub fn load_level_from_file<R>(
        &mut self,
        path: impl AsRef<Path>,
        resolve: R,
    ) -> Result<(), LevelError>
    where
        R: FnMut(i32) -> Option<TextureId>,
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let matrix = parse_level(&text);
        if matrix.is_empty() {
            return Err(LevelError::Empty(path.display().to_string()));
        }
        self.load_level(&matrix, resolve);
        Ok(())
    }

    /// One textured quad per tile, one draw call each.
    pub fn draw(&self, shader: &TexturedShader, frame: &mut Frame) {
        for tile in &self.tiles {
            let vertices = tile_quad(tile.position);
            shader.draw_textured_quad(frame, &vertices, &QUAD_INDICES, Some(tile.texture));
        }
    }
}

/// Axis-aligned quad of side [`TILE_SIZE`] centered on `center`.
pub fn tile_quad(center: [f32; 3]) -> [Vertex; 4] {
    let h = TILE_SIZE * 0.5;
    let [x, y, z] = center;
    [
        Vertex::new([x - h, y - h, z], [0.0, 0.0]),
        Vertex::new([x + h, y - h, z], [1.0, 0.0]),
        Vertex::new([x + h, y + h, z], [1.0, 1.0]),
        Vertex::new([x - h, y + h, z], [0.0, 1.0]),
    ]
}
