//! Square grid coordinate system for kingdoms.
//!
//! This module provides the coordinate types used by every kingdom:
//! - `Point`: Identifies a single cell, with the castle fixed at the origin
//! - `Direction`: One of the four orthogonal neighbors of a cell
//! - `Placement`: Where a two-square tile goes (anchor cell plus direction)
//!
//! `x` increases going east and `y` increases going south, matching the
//! row-major order renderers draw the grid in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orthogonal direction from a cell to one of its neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Up (y - 1)
    North,
    /// Right (x + 1)
    East,
    /// Down (y + 1)
    South,
    /// Left (x - 1)
    West,
}

impl Direction {
    /// All directions in clockwise order starting from North
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset `(dx, dy)` for this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// The direction pointing the other way
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// A cell in a player's kingdom.
///
/// `(0, 0)` is always occupied by the castle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Point {
    /// Column (increases going east)
    pub x: i32,
    /// Row (increases going south)
    pub y: i32,
}

impl Point {
    /// The castle cell
    pub const ORIGIN: Point = Point::new(0, 0);

    /// Create a new point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbor one step away in `direction`
    pub const fn step(self, direction: Direction) -> Point {
        let (dx, dy) = direction.offset();
        Point::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbors in clockwise order starting from North
    pub fn neighbors(self) -> [Point; 4] {
        Direction::ALL.map(|dir| self.step(dir))
    }

    /// Manhattan distance to another point
    pub fn distance_to(self, other: Point) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Direction from `self` to an orthogonally adjacent `other`, if any
    pub fn direction_to(self, other: Point) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.step(dir) == other)
    }

    /// Whether both coordinates are within `±limit`
    pub fn within(self, limit: i32) -> bool {
        self.x.abs() <= limit && self.y.abs() <= limit
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where a tile is put down.
///
/// The tile's first square lands on `anchor` and its second square on the
/// neighbor of `anchor` in `direction`. Rotating a tile is expressed by the
/// direction, so no separate orientation field exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Cell receiving the tile's first square
    pub anchor: Point,
    /// Direction from the anchor to the cell receiving the second square
    pub direction: Direction,
}

impl Placement {
    /// Create a new placement
    pub const fn new(anchor: Point, direction: Direction) -> Self {
        Self { anchor, direction }
    }

    /// Build a placement from the two target cells.
    ///
    /// Returns `None` unless the cells are orthogonally adjacent.
    pub fn from_points(first: Point, second: Point) -> Option<Self> {
        first
            .direction_to(second)
            .map(|direction| Self::new(first, direction))
    }

    /// Cell receiving the tile's second square
    pub fn attached(&self) -> Point {
        self.anchor.step(self.direction)
    }

    /// Both target cells, first square then second square
    pub fn cells(&self) -> [Point; 2] {
        [self.anchor, self.attached()]
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.anchor, self.attached())
    }
}
