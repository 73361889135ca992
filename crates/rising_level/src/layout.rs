//! Layout parsing and the built-in courtyard
//!
//! ASCII symbols:
//!
//! | symbol | cell |
//! |--------|------|
//! | `#` | wall |
//! | `.` | floor |
//! | `T` | tower |
//! | `H` | house |
//! | `D` / `d` | closed / open door |
//! | `E` | entrance |
//! | `P` | player spawn |
//! | `w` `m` `r` `n` | warrior, mage, rogue, minion spawn |

use crate::cell::CellType;
use crate::error::{LevelError, Result};
use crate::grid::{GridLevel, DEFAULT_CELL_SIZE};

/// Walled courtyard with two houses and four enemy spawns
pub const DEFAULT_COURTYARD: &str = "\
T#####T
#w.n.m#
#.H.H.#
#.....#
#r....#
#..P..#
T##E##T";

impl GridLevel {
    /// Parse an ASCII layout, one line per row
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(layout: &str, cell_size: f32) -> Result<Self> {
        let mut rows = Vec::new();
        for (row, line) in layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let cells = line
                .chars()
                .enumerate()
                .map(|(column, symbol)| {
                    CellType::from_symbol(symbol).ok_or_else(|| LevelError::UnknownCell {
                        row,
                        column,
                        symbol: symbol.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
        Self::new(rows, cell_size)
    }

    /// Parse a numeric layout: 0 entrance, 1 floor, 2 wall, 3 house, 4 tower
    pub fn from_codes<R: AsRef<[u8]>>(codes: &[R], cell_size: f32) -> Result<Self> {
        let mut rows = Vec::with_capacity(codes.len());
        for (row, line) in codes.iter().enumerate() {
            let cells = line
                .as_ref()
                .iter()
                .enumerate()
                .map(|(column, &code)| {
                    CellType::from_code(code).ok_or_else(|| LevelError::UnknownCell {
                        row,
                        column,
                        symbol: code.to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
        Self::new(rows, cell_size)
    }

    /// The built-in courtyard at the default cell size
    pub fn default_courtyard() -> Self {
        match Self::from_ascii(DEFAULT_COURTYARD, DEFAULT_CELL_SIZE) {
            Ok(level) => level,
            Err(err) => {
                log::error!("Built-in courtyard failed to parse: {}", err);
                Self::single_cell()
            }
        }
    }
}

impl Default for GridLevel {
    fn default() -> Self {
        Self::default_courtyard()
    }
}
