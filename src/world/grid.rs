//! Static occupancy grid.
//!
//! ### Conventions
//! * Cell (0,0) is the **bottom-left** corner; +y points north.
//! * Rows are stored top row first (the order they are written in a map
//!   file), so `cell(ix, iy)` reads row `height - 1 - iy`.
//! * Everything outside `[0,W) × [0,H)` reads as [`Cell::Wall`].  Ray marches
//!   and collision probes rely on this instead of bounds checks.

use std::{fs, io, path::Path};

use glam::{IVec2, Vec2};
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::info;

/// Occupancy of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Open,
    Wall,
}

impl Cell {
    #[inline]
    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

/// Things that can go wrong when building a map.
#[derive(Error, Debug)]
pub enum MapError {
    /// Underlying I/O failure – propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("map has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell `{ch}` at row {row}, column {col}")]
    BadCell { row: usize, col: usize, ch: char },

    #[error("spawn point ({x}, {y}) is inside a wall")]
    SpawnInWall { x: f32, y: f32 },
}

/// The 8×8 test level the engine ships with.
pub static REFERENCE_MAP: Lazy<GridMap> = Lazy::new(|| {
    GridMap::from_rows(&[
        "11111111",
        "10000001",
        "10011101",
        "10000101",
        "10010001",
        "10010111",
        "10010001",
        "11111111",
    ])
    .expect("built-in map is well formed")
});

/// Immutable W×H tile grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    /// Row-major, top row first.
    cells: Vec<Cell>,
}

impl GridMap {
    /// Build from raw rows (top row first).
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if cells.len() != width * height {
            return Err(MapError::Ragged {
                row: cells.len() / width,
                expected: width,
                found: cells.len() % width,
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build from text rows, top row first.  See [`GridMap::parse`] for the
    /// accepted characters.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let mut width = None;
        let mut cells = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let mut found = 0;
            for (col, ch) in line.chars().enumerate() {
                cells.push(match ch {
                    '1' | '#' => Cell::Wall,
                    '0' | '.' => Cell::Open,
                    _ => return Err(MapError::BadCell { row, col, ch }),
                });
                found += 1;
            }
            match width {
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(MapError::Ragged {
                        row,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
        }

        let width = width.ok_or(MapError::Empty)?;
        Self::new(width, rows.len(), cells)
    }

    /// Parse the text map format: one row per line, top row first,
    /// `1`/`#` = wall, `0`/`.` = open.  Blank lines and lines starting with
    /// `;` are skipped; surrounding whitespace is trimmed.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with(';'))
            .collect();
        Self::from_rows(&rows)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let text = fs::read_to_string(path.as_ref())?;
        let map = Self::parse(&text)?;
        info!(
            path = %path.as_ref().display(),
            width = map.width,
            height = map.height,
            "loaded grid map"
        );
        Ok(map)
    }

    /// Copy of [`REFERENCE_MAP`].
    pub fn reference() -> Self {
        REFERENCE_MAP.clone()
    }

    /// A single 2×2 room inside a solid ring.
    pub fn small_room() -> Self {
        Self::from_rows(&["1111", "1001", "1001", "1111"]).expect("built-in map is well formed")
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn in_bounds(&self, ix: i32, iy: i32) -> bool {
        ix >= 0 && iy >= 0 && (ix as usize) < self.width && (iy as usize) < self.height
    }

    /// Border-safe lookup: anything outside the grid is a wall.
    #[inline]
    pub fn cell(&self, ix: i32, iy: i32) -> Cell {
        if self.in_bounds(ix, iy) {
            self.cells[(self.height - 1 - iy as usize) * self.width + ix as usize]
        } else {
            Cell::Wall
        }
    }

    /// Direct lookup for callers that promise to stay inside the grid.
    ///
    /// Debug builds assert the promise; release builds fall back to the
    /// border convention.
    #[inline]
    pub fn cell_checked(&self, ix: i32, iy: i32) -> Cell {
        debug_assert!(
            self.in_bounds(ix, iy),
            "map access ({ix}, {iy}) outside {}x{}",
            self.width,
            self.height
        );
        self.cell(ix, iy)
    }

    #[inline]
    pub fn is_wall(&self, ix: i32, iy: i32) -> bool {
        self.cell(ix, iy).is_wall()
    }

    #[inline]
    pub fn is_open(&self, ix: i32, iy: i32) -> bool {
        !self.is_wall(ix, iy)
    }

    /// Cell that contains world point `p` (floor on both axes).
    #[inline]
    pub fn cell_of(p: Vec2) -> IVec2 {
        IVec2::new(p.x.floor() as i32, p.y.floor() as i32)
    }

    /// `true` if the world point lies in an open cell.
    #[inline]
    pub fn is_open_at(&self, p: Vec2) -> bool {
        let c = Self::cell_of(p);
        self.is_open(c.x, c.y)
    }

    /// Reject spawn points that would break the "player is in an open cell"
    /// invariant.
    ///
    /// A point on a gridline touches the cells on both sides of it, and a ray
    /// leaving it may start in either one, so every cell whose closed square
    /// contains `p` must be open.
    pub fn validate_spawn(&self, p: Vec2) -> Result<(), MapError> {
        let c = Self::cell_of(p);
        let xs = if p.x.fract() == 0.0 { c.x - 1 } else { c.x };
        let ys = if p.y.fract() == 0.0 { c.y - 1 } else { c.y };
        let touching = (xs..=c.x).flat_map(|ix| (ys..=c.y).map(move |iy| (ix, iy)));
        for (ix, iy) in touching {
            if self.is_wall(ix, iy) {
                return Err(MapError::SpawnInWall { x: p.x, y: p.y });
            }
        }
        Ok(())
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn origin_is_bottom_left() {
        let map = GridMap::reference();
        assert_eq!(map.width(), 8);
        assert_eq!(map.height(), 8);
        // row "10010111" is iy = 2
        assert_eq!(map.cell(3, 2), Cell::Wall);
        assert_eq!(map.cell(2, 2), Cell::Open);
        assert_eq!(map.cell(4, 2), Cell::Open);
        // row "10011101" is iy = 5
        assert_eq!(map.cell(3, 5), Cell::Wall);
        assert_eq!(map.cell(6, 5), Cell::Open);
    }

    #[test]
    fn outside_reads_as_wall() {
        let map = GridMap::small_room();
        assert_eq!(map.cell(-1, 1), Cell::Wall);
        assert_eq!(map.cell(1, -1), Cell::Wall);
        assert_eq!(map.cell(4, 1), Cell::Wall);
        assert_eq!(map.cell(1, 4), Cell::Wall);
        assert_eq!(map.cell(i32::MIN, i32::MAX), Cell::Wall);
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let map = GridMap::parse("; room\n####\n\n#..#\n#..#\n####\n").unwrap();
        assert_eq!(map, GridMap::small_room());
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = GridMap::from_rows(&["111", "10", "111"]).unwrap_err();
        assert!(matches!(
            err,
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn bad_cell_rejected() {
        let err = GridMap::from_rows(&["111", "1x1", "111"]).unwrap_err();
        assert!(matches!(err, MapError::BadCell { row: 1, col: 1, ch: 'x' }));
    }

    #[test]
    fn empty_map_rejected() {
        assert!(matches!(GridMap::parse("; nothing\n\n"), Err(MapError::Empty)));
    }

    #[test]
    fn spawn_validation() {
        let map = GridMap::reference();
        assert!(map.validate_spawn(Vec2::new(2.0, 2.0)).is_ok());
        assert!(matches!(
            map.validate_spawn(Vec2::new(3.5, 2.5)),
            Err(MapError::SpawnInWall { .. })
        ));
    }

    #[test]
    fn spawn_on_corner_checks_every_touching_cell() {
        // (2,2) is open but its west neighbour (1,2) is solid
        let map = GridMap::from_rows(&["11111", "11001", "11001", "10001", "11111"]).unwrap();
        assert!(map.is_open_at(Vec2::new(2.0, 2.0)));
        assert!(matches!(
            map.validate_spawn(Vec2::new(2.0, 2.0)),
            Err(MapError::SpawnInWall { .. })
        ));
        // same gridline, away from the corner: only (1,1) and (2,1) touch
        assert!(map.validate_spawn(Vec2::new(2.0, 1.5)).is_ok());
        assert!(map.validate_spawn(Vec2::new(2.5, 2.0)).is_ok());
        assert!(map.validate_spawn(Vec2::new(3.0, 3.0)).is_ok());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "outside 4x4"))]
    fn cell_checked_outside_is_contract_violation() {
        assert_eq!(GridMap::small_room().cell_checked(4, 1), Cell::Wall);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1111\n1001\n1001\n1111").unwrap();
        let map = GridMap::from_file(file.path()).unwrap();
        assert_eq!(map, GridMap::small_room());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GridMap::from_file(dir.path().join("nope.map")).unwrap_err();
        assert!(matches!(err, MapError::Io(_)));
    }
}
