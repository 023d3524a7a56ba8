//! Level files: a `rows cols` header followed by one token per grid cell.
//!
//! A cell token is a height code (0 for an empty cell) optionally followed by
//! a movement letter, e.g. `5S` or `3C`. The file is read in two passes:
//! [`ParseMode::Position`] collects the height codes and
//! [`ParseMode::State`] collects the movement letters. `#` comments run to
//! the end of the line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How a ring moves once the level is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    Stationary,
    /// Oscillates along z.
    Horizontal,
    /// Oscillates along y.
    Vertical,
    Clockwise,
    Anticlockwise,
}

impl MovementKind {
    pub const ALL: [MovementKind; 5] = [
        MovementKind::Stationary,
        MovementKind::Horizontal,
        MovementKind::Vertical,
        MovementKind::Clockwise,
        MovementKind::Anticlockwise,
    ];

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'S' => Some(MovementKind::Stationary),
            'H' => Some(MovementKind::Horizontal),
            'V' => Some(MovementKind::Vertical),
            'C' => Some(MovementKind::Clockwise),
            'A' => Some(MovementKind::Anticlockwise),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            MovementKind::Stationary => 'S',
            MovementKind::Horizontal => 'H',
            MovementKind::Vertical => 'V',
            MovementKind::Clockwise => 'C',
            MovementKind::Anticlockwise => 'A',
        }
    }
}

/// Which half of a cell token a pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Position,
    State,
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Position => f.write_str("position"),
            ParseMode::State => f.write_str("state"),
        }
    }
}

/// Errors from reading a level file. All of them are fatal at start-up.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad header: {0}")]
    Header(String),
    #[error("line {line}: bad cell token '{token}'")]
    BadCell { line: usize, token: String },
    #[error("line {line}: unknown movement code '{code}'")]
    UnknownMovement { line: usize, code: String },
    #[error("cell ({row}, {col}) has a ring but no movement code")]
    MissingMovement { row: usize, col: usize },
    #[error("unexpected end of file in {mode} pass: read {read} of {expected} cells")]
    UnexpectedEof {
        mode: ParseMode,
        read: usize,
        expected: usize,
    },
    #[error("no levels given")]
    NoLevels,
}

/// One occupied grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub height: u32,
    pub movement: MovementKind,
}

/// A parsed level: the ring grid in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGrid {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Option<Cell>>,
}

struct Token<'a> {
    line: usize,
    text: &'a str,
}

fn tokens(text: &str) -> Vec<Token<'_>> {
    text.lines()
        .enumerate()
        .flat_map(|(i, raw)| {
            let content = raw.split('#').next().unwrap_or_default();
            content
                .split_whitespace()
                .map(move |text| Token { line: i + 1, text })
        })
        .collect()
}

/// Split a cell token into its digit prefix and whatever follows.
fn split_cell(token: &str) -> (&str, &str) {
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token.split_at(end)
}

/// Rows, columns and cell count from the first two tokens.
fn header(tokens: &[Token<'_>]) -> Result<(usize, usize, usize), LevelError> {
    let mut dims = [0usize; 2];
    for (idx, name) in ["rows", "cols"].into_iter().enumerate() {
        let token = tokens
            .get(idx)
            .ok_or_else(|| LevelError::Header(format!("missing {name}")))?;
        dims[idx] = token
            .text
            .parse()
            .map_err(|_| LevelError::Header(format!("{name} '{}' is not a count", token.text)))?;
    }
    if dims[0] == 0 || dims[1] == 0 {
        return Err(LevelError::Header(format!(
            "grid must be non-empty, got {}x{}",
            dims[0], dims[1]
        )));
    }
    let cells = dims[0].checked_mul(dims[1]).ok_or_else(|| {
        LevelError::Header(format!("grid {}x{} is too large", dims[0], dims[1]))
    })?;
    Ok((dims[0], dims[1], cells))
}

/// Read the height code of every cell.
pub fn parse_positions(text: &str) -> Result<(usize, usize, Vec<u32>), LevelError> {
    let tokens = tokens(text);
    let (rows, cols, expected) = header(&tokens)?;
    let cells = &tokens[2..];
    if cells.len() < expected {
        return Err(LevelError::UnexpectedEof {
            mode: ParseMode::Position,
            read: cells.len(),
            expected,
        });
    }
    cells[..expected]
        .iter()
        .map(|t| {
            let (digits, _) = split_cell(t.text);
            digits.parse().map_err(|_| LevelError::BadCell {
                line: t.line,
                token: t.text.to_string(),
            })
        })
        .collect::<Result<Vec<u32>, _>>()
        .map(|heights| (rows, cols, heights))
}

/// Read the movement code of every cell, skipping the height code.
/// Cells with no letter yield `None`.
pub fn parse_states(text: &str) -> Result<Vec<Option<MovementKind>>, LevelError> {
    let tokens = tokens(text);
    let (_, _, expected) = header(&tokens)?;
    let cells = &tokens[2..];
    if cells.len() < expected {
        return Err(LevelError::UnexpectedEof {
            mode: ParseMode::State,
            read: cells.len(),
            expected,
        });
    }
    cells[..expected]
        .iter()
        .map(|t| {
            let (_, code) = split_cell(t.text);
            let mut chars = code.chars();
            match (chars.next(), chars.next()) {
                (None, _) => Ok(None),
                (Some(c), None) => MovementKind::from_code(c).map(Some).ok_or_else(|| {
                    LevelError::UnknownMovement {
                        line: t.line,
                        code: code.to_string(),
                    }
                }),
                (Some(_), Some(_)) => Err(LevelError::UnknownMovement {
                    line: t.line,
                    code: code.to_string(),
                }),
            }
        })
        .collect()
}

impl LevelGrid {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let grid = Self::parse(&name, &text)?;
        tracing::info!(
            path = %path.display(),
            rows = grid.rows,
            cols = grid.cols,
            rings = grid.ring_count(),
            "loaded level"
        );
        Ok(grid)
    }

    /// Parse both passes and merge them.
    pub fn parse(name: &str, text: &str) -> Result<Self, LevelError> {
        let (rows, cols, heights) = parse_positions(text)?;
        let states = parse_states(text)?;
        let extra = tokens(text).len().saturating_sub(2 + heights.len());
        if extra > 0 {
            tracing::warn!(level = name, extra, "ignoring tokens after the grid");
        }
        let mut cells = Vec::with_capacity(heights.len());
        for (i, (height, movement)) in heights.into_iter().zip(states).enumerate() {
            let cell = match (height, movement) {
                (0, _) => None,
                (height, Some(movement)) => Some(Cell { height, movement }),
                (_, None) => {
                    return Err(LevelError::MissingMovement {
                        row: i / cols,
                        col: i % cols,
                    });
                }
            };
            cells.push(cell);
        }
        Ok(Self {
            name: name.to_string(),
            rows,
            cols,
            cells,
        })
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Occupied cells in row-major order with their grid coordinates.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|cell| (i / self.cols, i % self.cols, cell)))
    }

    pub fn ring_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Tallest height code in the grid, 0 for an empty level.
    pub fn max_height(&self) -> u32 {
        self.occupied().map(|(_, _, c)| c.height).max().unwrap_or(0)
    }

    /// Number of rings per movement kind, in [`MovementKind::ALL`] order.
    pub fn movement_mix(&self) -> [usize; 5] {
        let mut mix = [0; 5];
        for (_, _, cell) in self.occupied() {
            let slot = MovementKind::ALL
                .iter()
                .position(|m| *m == cell.movement)
                .unwrap_or_default();
            mix[slot] += 1;
        }
        mix
    }
}
