//! Board variants and the grid a match is played on.

use std::fmt::Display;

use crate::error::ConfigurationError;

/// A cell coordinate. `x` is the column, `y` the row.
///
/// Signed because a bot may answer with anything, including coordinates left of or above
/// the board. Those are rejected by the arbiter, not by the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl Coord {
    /// Shorthand constructor.
    pub const fn new(x: i64, y: i64) -> Self {
        Coord { x, y }
    }
}

impl From<(i64, i64)> for Coord {
    fn from((x, y): (i64, i64)) -> Self {
        Coord { x, y }
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Immutable description of one game variant.
///
/// Built through [`BoardConfig::new`], which refuses geometry no game can be played on and
/// obstacles outside the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    name: String,
    width: usize,
    height: usize,
    win_length: usize,
    num_players: usize,
    obstacles: Vec<Coord>,
    time_ms: u64,
}

impl BoardConfig {
    /// Validate and build a board variant.
    ///
    /// # Errors
    /// [`ConfigurationError::InvalidBoard`] when a dimension, the win length or the number of
    /// players is zero or the board is too large to index, and
    /// [`ConfigurationError::ObstacleOutOfBounds`] for the first obstacle outside of
    /// `[0, width) x [0, height)`.
    pub fn new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        win_length: usize,
        num_players: usize,
        obstacles: Vec<Coord>,
        time_ms: u64,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let invalid = |reason: &str| ConfigurationError::InvalidBoard {
            board: name.clone(),
            reason: reason.to_owned(),
        };
        if width == 0 || height == 0 {
            return Err(invalid("width and height must be at least 1"));
        }
        if width.checked_mul(height).is_none() || i64::try_from(width.max(height)).is_err() {
            return Err(invalid("board is too large"));
        }
        if win_length == 0 {
            return Err(invalid("win length must be at least 1"));
        }
        if num_players == 0 {
            return Err(invalid("at least one player is required"));
        }
        if let Some(c) = obstacles
            .iter()
            .find(|c| !in_bounds(**c, width, height))
        {
            return Err(ConfigurationError::ObstacleOutOfBounds {
                board: name,
                x: c.x,
                y: c.y,
            });
        }
        Ok(BoardConfig {
            name,
            width,
            height,
            win_length,
            num_players,
            obstacles,
            time_ms,
        })
    }

    /// Board name, unique within a run.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Contiguous same-owner cells needed to win.
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Seats per match.
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    /// Blocked cells.
    pub fn obstacles(&self) -> &[Coord] {
        &self.obstacles
    }

    /// Time budget of every player for a whole match, in milliseconds.
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// True if `coord` is a cell of this board.
    pub fn contains(&self, coord: Coord) -> bool {
        in_bounds(coord, self.width, self.height)
    }
}

impl Display for BoardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}x{}, win length {}, {} players)",
            self.name, self.width, self.height, self.win_length, self.num_players
        )
    }
}

fn in_bounds(coord: Coord, width: usize, height: usize) -> bool {
    coord.x >= 0 && coord.y >= 0 && (coord.x as u64) < width as u64 && (coord.y as u64) < height as u64
}

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Nobody played here yet.
    Empty,
    /// Obstacle. Never changes.
    Blocked,
    /// Taken by the player with this index. Never changes.
    Occupied(usize),
}

/// The four line directions: horizontal, vertical, and both diagonals.
const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// A `width x height` array of [`Cell`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// An empty grid with the obstacles of `config` stamped as [`Cell::Blocked`].
    pub fn from_config(config: &BoardConfig) -> Self {
        let mut grid = Grid {
            width: config.width,
            height: config.height,
            cells: vec![Cell::Empty; config.width * config.height],
        };
        for &obstacle in &config.obstacles {
            // in bounds: checked by BoardConfig::new
            if let Some(i) = grid.index(obstacle) {
                grid.cells[i] = Cell::Blocked;
            }
        }
        grid
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if in_bounds(coord, self.width, self.height) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    /// The cell at `coord`, or `None` outside of the grid.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Marks an empty cell as taken by `player`.
    ///
    /// Returns false and leaves the grid untouched when the cell is outside of the grid or
    /// not [`Cell::Empty`].
    pub fn place(&mut self, coord: Coord, player: usize) -> bool {
        match self.index(coord) {
            Some(i) if self.cells[i] == Cell::Empty => {
                self.cells[i] = Cell::Occupied(player);
                true
            }
            _ => false,
        }
    }

    /// No [`Cell::Empty`] left.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Length of the longest run of `player` cells through `from`, over the four line
    /// directions. `from` itself counts as one whatever its content.
    pub fn longest_line(&self, from: Coord, player: usize) -> usize {
        DIRECTIONS
            .iter()
            .map(|&(dx, dy)| {
                1 + self.run_length(from, player, dx, dy) + self.run_length(from, player, -dx, -dy)
            })
            .max()
            .unwrap_or(1)
    }

    /// Consecutive `player` cells starting next to `from`, stepping by `(dx, dy)`.
    fn run_length(&self, from: Coord, player: usize, dx: i64, dy: i64) -> usize {
        let mut count = 0;
        let mut cur = Coord::new(from.x + dx, from.y + dy);
        while self.get(cur) == Some(Cell::Occupied(player)) {
            count += 1;
            cur = Coord::new(cur.x + dx, cur.y + dy);
        }
        count
    }

    /// Text rendering: two header rows of column digits, then one row per line with `.` for
    /// empty, `#` for blocked and the player index for occupied cells.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.height + 2);
        let tens = (0..self.width).map(|x| (x / 10 % 10).to_string());
        let units = (0..self.width).map(|x| (x % 10).to_string());
        lines.push(format!("   {}", tens.collect::<Vec<_>>().join(" ")));
        lines.push(format!("   {}", units.collect::<Vec<_>>().join(" ")));
        for y in 0..self.height {
            let row = (0..self.width)
                .map(|x| match self.cells[y * self.width + x] {
                    Cell::Empty => ".".to_owned(),
                    Cell::Blocked => "#".to_owned(),
                    Cell::Occupied(p) => p.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            lines.push(format!("{y:02} {row}"));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(w: usize, h: usize, win: usize, obstacles: Vec<Coord>) -> BoardConfig {
        BoardConfig::new("test", w, h, win, 2, obstacles, 1000).unwrap()
    }

    #[test]
    fn test_obstacle_outside_is_rejected() {
        let err = BoardConfig::new("b", 3, 3, 3, 2, vec![Coord::new(0, 0), Coord::new(3, 1)], 10)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::ObstacleOutOfBounds {
                board: "b".to_owned(),
                x: 3,
                y: 1
            }
        );
        assert!(BoardConfig::new("b", 3, 3, 3, 2, vec![Coord::new(-1, 0)], 10).is_err());
    }

    #[test]
    fn test_degenerate_boards_are_rejected() {
        assert!(BoardConfig::new("b", 0, 3, 3, 2, vec![], 10).is_err());
        assert!(BoardConfig::new("b", 3, 3, 0, 2, vec![], 10).is_err());
        assert!(BoardConfig::new("b", 3, 3, 3, 0, vec![], 10).is_err());
    }

    #[test]
    fn test_oversized_board_is_rejected() {
        assert_eq!(
            BoardConfig::new("huge", usize::MAX / 2, 4, 3, 2, vec![], 10),
            Err(ConfigurationError::InvalidBoard {
                board: "huge".to_owned(),
                reason: "board is too large".to_owned(),
            })
        );
        assert!(BoardConfig::new("tall", 1, usize::MAX, 3, 2, vec![], 10).is_err());
    }

    #[test]
    fn test_obstacles_are_blocked() {
        let grid = Grid::from_config(&board(4, 2, 3, vec![Coord::new(3, 1)]));
        assert_eq!(grid.get(Coord::new(3, 1)), Some(Cell::Blocked));
        assert_eq!(grid.get(Coord::new(0, 0)), Some(Cell::Empty));
        assert_eq!(grid.get(Coord::new(4, 0)), None);
    }

    #[test]
    fn test_place_only_on_empty() {
        let mut grid = Grid::from_config(&board(2, 2, 2, vec![Coord::new(1, 1)]));
        assert!(grid.place(Coord::new(0, 0), 0));
        assert!(!grid.place(Coord::new(0, 0), 1));
        assert!(!grid.place(Coord::new(1, 1), 1));
        assert!(!grid.place(Coord::new(2, 0), 1));
        assert_eq!(grid.get(Coord::new(0, 0)), Some(Cell::Occupied(0)));
    }

    #[test]
    fn test_full_counts_blocked_cells() {
        let mut grid = Grid::from_config(&board(2, 1, 2, vec![Coord::new(1, 0)]));
        assert!(!grid.is_full());
        grid.place(Coord::new(0, 0), 1);
        assert!(grid.is_full());
    }

    #[test]
    fn test_longest_line_in_every_direction() {
        let mut grid = Grid::from_config(&board(5, 5, 3, vec![]));
        // anti-diagonal (0,4) (1,3) (2,2), placed out of order
        grid.place(Coord::new(0, 4), 1);
        grid.place(Coord::new(2, 2), 1);
        assert_eq!(grid.longest_line(Coord::new(2, 2), 1), 1);
        grid.place(Coord::new(1, 3), 1);
        assert_eq!(grid.longest_line(Coord::new(1, 3), 1), 3);

        grid.place(Coord::new(3, 0), 0);
        grid.place(Coord::new(4, 0), 0);
        assert_eq!(grid.longest_line(Coord::new(4, 0), 0), 2);
        grid.place(Coord::new(3, 1), 0);
        assert_eq!(grid.longest_line(Coord::new(3, 1), 0), 2);
    }

    #[test]
    fn test_line_stops_at_other_owner() {
        let mut grid = Grid::from_config(&board(4, 1, 3, vec![]));
        grid.place(Coord::new(0, 0), 0);
        grid.place(Coord::new(1, 0), 1);
        grid.place(Coord::new(2, 0), 0);
        grid.place(Coord::new(3, 0), 0);
        assert_eq!(grid.longest_line(Coord::new(3, 0), 0), 2);
    }

    #[test]
    fn test_render() {
        let mut grid = Grid::from_config(&board(3, 2, 3, vec![Coord::new(1, 0)]));
        grid.place(Coord::new(2, 1), 1);
        assert_eq!(
            grid.render(),
            vec!["   0 0 0", "   0 1 2", "00 . # .", "01 . . 1"]
        );
    }
}
