#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Delve dungeon generator.
//!
//! This crate defines the vocabulary that connects the pure generation
//! systems, the authoritative world, and adapters. Systems read immutable
//! [`Grid`] and [`Mesh`] values and hand back new ones; the world sequences
//! them into a single generation pass. Adapters submit [`Command`] values, the
//! world executes them through its `apply` entry point and broadcasts
//! [`Event`] values describing the outcome.

mod config;
mod mesh;

use std::{collections::BTreeSet, convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{GenerationConfig, RadiusRange, RoomSizeRange, SmoothingRule, MIN_GRID_EDGE};
pub use mesh::{Mesh, Outline, Triangle, WorldPoint};

/// Commands that express every permissible change to the published dungeon.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current dungeon and builds a new one from scratch.
    Generate {
        /// Knobs controlling the new pass.
        config: GenerationConfig,
    },
    /// Re-rolls the cave fill around the existing rooms using the current seed.
    RegenerateFill {
        /// Replacement fill percentage in the range `0..=100`.
        fill_percent: u8,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a full generation pass replaced the published dungeon.
    DungeonGenerated {
        /// Seed that reproduces the dungeon.
        seed: Seed,
        /// Counts describing the new dungeon.
        summary: DungeonSummary,
    },
    /// Announces that the cave fill was re-rolled around the existing rooms.
    FillRegenerated {
        /// Seed shared by the previous and the regenerated dungeon.
        seed: Seed,
        /// Counts describing the regenerated dungeon.
        summary: DungeonSummary,
    },
    /// Reports that a command was rejected; the previous dungeon stays published.
    GenerationRejected {
        /// Reason the pass did not complete.
        error: GenerationError,
    },
}

/// Headline counts describing a generated dungeon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DungeonSummary {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Number of rectangular rooms carved into the grid.
    pub rooms: usize,
    /// Number of open regions that survived pruning.
    pub cave_rooms: usize,
    /// Number of solid cells in the finished grid.
    pub solid_cells: usize,
    /// Number of vertices in the cave mesh.
    pub vertices: usize,
    /// Number of triangles in the cave mesh.
    pub triangles: usize,
    /// Number of closed outlines traced from the mesh.
    pub outlines: usize,
}

/// Occupancy state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Walkable floor.
    Open,
    /// Wall material.
    Solid,
}

impl Cell {
    /// Reports whether the cell is wall material.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid)
    }

    /// Reports whether the cell is walkable floor.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Squared Euclidean distance between two cells.
    #[must_use]
    pub fn squared_distance(self, other: CellCoord) -> u64 {
        let dx = u64::from(self.column.abs_diff(other.column));
        let dy = u64::from(self.row.abs_diff(other.row));
        dx * dx + dy * dy
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// First column past the rectangle's right edge.
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.origin.column.saturating_add(self.size.width)
    }

    /// First row past the rectangle's bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.origin.row.saturating_add(self.size.height)
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column >= self.origin.column
            && cell.column < self.right()
            && cell.row >= self.origin.row
            && cell.row < self.bottom()
    }

    /// Reports whether `other` overlaps this rectangle grown by `halo` cells on every side.
    ///
    /// A halo of one rejects rectangles that share an edge or a diagonal corner.
    #[must_use]
    pub fn intersects_with_halo(&self, other: &CellRect, halo: u32) -> bool {
        let halo = i64::from(halo);
        let left = i64::from(self.origin.column) - halo;
        let top = i64::from(self.origin.row) - halo;
        let right = i64::from(self.right()) + halo;
        let bottom = i64::from(self.bottom()) + halo;

        left < i64::from(other.right())
            && i64::from(other.origin.column) < right
            && top < i64::from(other.bottom())
            && i64::from(other.origin.row) < bottom
    }

    /// Cell at the middle of the rectangle, rounding towards the origin.
    #[must_use]
    pub const fn center_cell(&self) -> CellCoord {
        CellCoord::new(
            self.origin.column + self.size.width / 2,
            self.origin.row + self.size.height / 2,
        )
    }

    /// Iterates every cell inside the rectangle in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let rect = *self;
        (rect.origin.row..rect.bottom()).flat_map(move |row| {
            (rect.origin.column..rect.right()).map(move |column| CellCoord::new(column, row))
        })
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Dense occupancy grid with a parallel mask of cells that smoothing must not fill.
///
/// Cells are stored in row-major order. The grid's dimensions never change
/// after construction; stages that rewrite every cell build a new grid instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    protected: Vec<bool>,
}

impl Grid {
    /// Creates a grid where every cell is solid and unprotected.
    #[must_use]
    pub fn solid(width: u32, height: u32) -> Self {
        let count = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::Solid; count],
            protected: vec![false; count],
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major view of every cell.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column < self.width && cell.row < self.height
    }

    /// Row-major offset of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.row).ok()?;
        let column = usize::try_from(cell.column).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Occupancy of the cell, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Reports whether the cell is solid. Cells outside the grid count as solid.
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.get(cell).map_or(true, Cell::is_solid)
    }

    /// Overwrites the occupancy of a cell. Coordinates outside the grid are ignored.
    pub fn set(&mut self, cell: CellCoord, value: Cell) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = value;
        }
    }

    /// Reports whether the cell is protected from smoothing.
    #[must_use]
    pub fn is_protected(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .map_or(false, |index| self.protected[index])
    }

    /// Marks the cell as protected. Coordinates outside the grid are ignored.
    pub fn protect(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.protected[index] = true;
        }
    }

    /// Reports whether the cell lies on the outermost ring.
    #[must_use]
    pub const fn is_border(&self, cell: CellCoord) -> bool {
        cell.column == 0
            || cell.row == 0
            || cell.column + 1 == self.width
            || cell.row + 1 == self.height
    }

    /// Forces every cell on the outermost ring to solid.
    pub fn enforce_border(&mut self) {
        for column in 0..self.width {
            self.set(CellCoord::new(column, 0), Cell::Solid);
            self.set(CellCoord::new(column, self.height.saturating_sub(1)), Cell::Solid);
        }
        for row in 0..self.height {
            self.set(CellCoord::new(0, row), Cell::Solid);
            self.set(CellCoord::new(self.width.saturating_sub(1), row), Cell::Solid);
        }
    }

    /// Iterates every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }

    /// Iterates the grid one row at a time, starting at row zero.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        let width = usize::try_from(self.width).unwrap_or(0).max(1);
        self.cells.chunks(width)
    }

    /// Number of cells holding the provided value.
    #[must_use]
    pub fn count(&self, value: Cell) -> usize {
        self.cells.iter().filter(|cell| **cell == value).count()
    }

    /// Orthogonal neighbours of the cell that lie inside the grid.
    pub fn orthogonal_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let mut candidates = [None; 4];
        let mut count = 0;

        if let Some(row) = cell.row.checked_sub(1) {
            candidates[count] = Some(CellCoord::new(cell.column, row));
            count += 1;
        }

        if cell.column + 1 < self.width {
            candidates[count] = Some(CellCoord::new(cell.column + 1, cell.row));
            count += 1;
        }

        if cell.row + 1 < self.height {
            candidates[count] = Some(CellCoord::new(cell.column, cell.row + 1));
            count += 1;
        }

        if let Some(column) = cell.column.checked_sub(1) {
            candidates[count] = Some(CellCoord::new(column, cell.row));
            count += 1;
        }

        candidates.into_iter().take(count).flatten()
    }

    /// Counts solid cells among the eight surrounding cells.
    ///
    /// Neighbours outside the grid count as solid.
    #[must_use]
    pub fn solid_neighbor_count(&self, cell: CellCoord) -> u8 {
        let mut count = 0;
        for row_offset in -1_i64..=1 {
            for column_offset in -1_i64..=1 {
                if row_offset == 0 && column_offset == 0 {
                    continue;
                }

                let column = i64::from(cell.column) + column_offset;
                let row = i64::from(cell.row) + row_offset;
                let solid = match (u32::try_from(column), u32::try_from(row)) {
                    (Ok(column), Ok(row)) => self.is_solid(CellCoord::new(column, row)),
                    _ => true,
                };
                if solid {
                    count += 1;
                }
            }
        }
        count
    }

    /// Returns a copy surrounded by `padding` rings of unprotected solid cells.
    #[must_use]
    pub fn with_border(&self, padding: u32) -> Grid {
        let width = self.width.saturating_add(padding.saturating_mul(2));
        let height = self.height.saturating_add(padding.saturating_mul(2));
        let mut bordered = Grid::solid(width, height);

        for cell in self.coords() {
            let target = CellCoord::new(cell.column + padding, cell.row + padding);
            if let (Some(from), Some(to)) = (self.index(cell), bordered.index(target)) {
                bordered.cells[to] = self.cells[from];
                bordered.protected[to] = self.protected[from];
            }
        }

        bordered
    }
}

/// Reproducible seed value, either an integer or free-form text.
///
/// Digit-only text that round-trips through `u64` is stored as the integer
/// form, so `Seed::from("42") == Seed::number(42)`.
/// Seeds serialise as strings and accept either strings or non-negative
/// integers when deserialised.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Seed(SeedValue);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum SeedValue {
    Number(u64),
    Text(String),
}

impl Seed {
    /// Creates an integer seed.
    #[must_use]
    pub const fn number(value: u64) -> Self {
        Self(SeedValue::Number(value))
    }

    /// Creates a text seed, normalising canonical integers to the integer form.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        match value.parse::<u64>() {
            Ok(number) if number.to_string() == value => Self::number(number),
            _ => Self(SeedValue::Text(value)),
        }
    }

    /// Integer value of the seed, if it has one.
    #[must_use]
    pub const fn as_number(&self) -> Option<u64> {
        match self.0 {
            SeedValue::Number(value) => Some(value),
            SeedValue::Text(_) => None,
        }
    }

    /// Tagged byte encoding used to derive random streams.
    ///
    /// Integer and text seeds use distinct tags so that their streams never collide.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        match &self.0 {
            SeedValue::Number(value) => {
                let mut bytes = Vec::with_capacity(9);
                bytes.push(0);
                bytes.extend_from_slice(&value.to_le_bytes());
                bytes
            }
            SeedValue::Text(text) => {
                let mut bytes = Vec::with_capacity(text.len() + 1);
                bytes.push(1);
                bytes.extend_from_slice(text.as_bytes());
                bytes
            }
        }
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            SeedValue::Number(value) => write!(f, "{value}"),
            SeedValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> Self {
        seed.to_string()
    }
}

impl Serialize for Seed {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_string(SeedVisitor)
    }
}

struct SeedVisitor;

impl<'de> serde::de::Visitor<'de> for SeedVisitor {
    type Value = Seed;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a seed string or a non-negative integer")
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Seed, E> {
        Ok(Seed::text(value))
    }

    fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Seed, E> {
        Ok(Seed::text(value))
    }

    fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Seed, E> {
        Ok(Seed::number(value))
    }

    fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Seed, E> {
        u64::try_from(value)
            .map(Seed::number)
            .map_err(|_| E::invalid_value(serde::de::Unexpected::Signed(value), &self))
    }
}

impl FromStr for Seed {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::text(value))
    }
}

/// Semantic tag attached to a rectangular room for downstream decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Unremarkable room.
    Normal,
    /// Room holding loot.
    Treasure,
    /// Room guarded by a boss encounter.
    Boss,
    /// Room holding a shrine.
    Shrine,
    /// Room where the player enters the dungeon. Always the first room.
    Entrance,
}

impl RoomKind {
    /// Maps a uniform roll in `[0, 1)` onto the non-entrance kinds in equal quarters.
    #[must_use]
    pub fn from_roll(roll: f32) -> Self {
        if roll <= 0.25 {
            Self::Treasure
        } else if roll <= 0.50 {
            Self::Boss
        } else if roll <= 0.75 {
            Self::Shrine
        } else {
            Self::Normal
        }
    }
}

/// Identifier of a room, equal to its position in the owning list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the room in the owning list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Rectangular room carved into the grid during room placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    rect: CellRect,
    center: WorldPoint,
    kind: RoomKind,
}

impl Room {
    /// Creates a room, deriving its world-space centre from the owning grid's dimensions.
    ///
    /// World coordinates are centred on the grid: `x = column - width / 2` and
    /// `z = row - height / 2`, offset to the middle of the rectangle.
    #[must_use]
    pub fn new(id: RoomId, rect: CellRect, kind: RoomKind, grid_width: u32, grid_height: u32) -> Self {
        let origin = rect.origin();
        let size = rect.size();
        let center = WorldPoint::new(
            origin.column() as f32 - grid_width as f32 / 2.0 + size.width() as f32 / 2.0,
            0.0,
            origin.row() as f32 - grid_height as f32 / 2.0 + size.height() as f32 / 2.0,
        );
        Self {
            id,
            rect,
            center,
            kind,
        }
    }

    /// Identifier of the room in generation order.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Cells carved for the room.
    #[must_use]
    pub const fn rect(&self) -> CellRect {
        self.rect
    }

    /// World-space centre of the room.
    #[must_use]
    pub const fn center(&self) -> WorldPoint {
        self.center
    }

    /// Semantic tag assigned to the room.
    #[must_use]
    pub const fn kind(&self) -> RoomKind {
        self.kind
    }
}

/// Maximal set of orthogonally connected cells sharing one occupancy value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    value: Cell,
    cells: Vec<CellCoord>,
}

impl Region {
    /// Creates a region from the cells discovered by a flood fill.
    #[must_use]
    pub fn new(value: Cell, cells: Vec<CellCoord>) -> Self {
        Self { value, cells }
    }

    /// Occupancy shared by every member cell.
    #[must_use]
    pub const fn value(&self) -> Cell {
        self.value
    }

    /// Member cells in discovery order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of member cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Consumes the region, yielding its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Open region that survived pruning, annotated with connectivity flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaveRoom {
    /// Identifier of the room; rooms are ordered largest first.
    pub id: RoomId,
    /// Member cells in discovery order.
    pub cells: Vec<CellCoord>,
    /// Member cells with at least one orthogonally adjacent solid cell.
    pub edge_cells: Vec<CellCoord>,
    /// Whether this is the largest surviving room.
    pub is_main: bool,
    /// Whether the room is reachable from the main room through the room graph.
    pub accessible: bool,
}

impl CaveRoom {
    /// Number of member cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Index-based adjacency between cave rooms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomGraph {
    adjacency: Vec<BTreeSet<RoomId>>,
}

impl RoomGraph {
    /// Creates a graph with `count` rooms and no connections.
    #[must_use]
    pub fn with_rooms(count: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); count],
        }
    }

    /// Number of rooms tracked by the graph.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Records an undirected connection, returning `true` if it was new.
    ///
    /// Self-loops and unknown rooms are ignored.
    pub fn connect(&mut self, a: RoomId, b: RoomId) -> bool {
        if a == b || a.index() >= self.adjacency.len() || b.index() >= self.adjacency.len() {
            return false;
        }

        let inserted = self.adjacency[a.index()].insert(b);
        let _ = self.adjacency[b.index()].insert(a);
        inserted
    }

    /// Reports whether the two rooms share a direct connection.
    #[must_use]
    pub fn is_connected(&self, a: RoomId, b: RoomId) -> bool {
        self.adjacency
            .get(a.index())
            .map_or(false, |neighbors| neighbors.contains(&b))
    }

    /// Rooms directly connected to `room`, in ascending identifier order.
    pub fn neighbors(&self, room: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        self.adjacency
            .get(room.index())
            .into_iter()
            .flat_map(|neighbors| neighbors.iter().copied())
    }

    /// Number of direct connections of `room`.
    #[must_use]
    pub fn degree(&self, room: RoomId) -> usize {
        self.adjacency.get(room.index()).map_or(0, BTreeSet::len)
    }

    /// Number of undirected connections in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }
}

/// Reasons a generation configuration is rejected before any work begins.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid is too small to hold a border ring and an interior.
    #[error("grid dimensions {width}x{height} must both be at least {MIN_GRID_EDGE}")]
    GridTooSmall {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// The fill percentage exceeds 100.
    #[error("fill percent {0} is outside 0..=100")]
    FillPercentOutOfRange(u8),
    /// The minimum room edge is zero.
    #[error("room sizes must be at least one cell")]
    ZeroRoomSize,
    /// The room size range is empty.
    #[error("room size range {min}..={max} is empty")]
    RoomRangeInverted {
        /// Requested minimum edge.
        min: u32,
        /// Requested maximum edge.
        max: u32,
    },
    /// The largest room cannot fit inside the border ring.
    #[error("rooms up to {max} cells wide do not fit inside a {width}x{height} grid")]
    RoomTooLarge {
        /// Requested maximum edge.
        max: u32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },
    /// The minimum tunnel radius is zero.
    #[error("tunnel radius must be at least one cell")]
    ZeroTunnelRadius,
    /// The tunnel radius range is empty.
    #[error("tunnel radius range {min}..={max} is empty")]
    TunnelRadiusInverted {
        /// Requested minimum radius.
        min: u32,
        /// Requested maximum radius.
        max: u32,
    },
    /// The smoothing thresholds would both apply to the same neighbour count.
    #[error("smoothing rule fills above {solid_above} but clears below {open_below}")]
    InvalidSmoothingRule {
        /// Neighbour count above which cells fill.
        solid_above: u8,
        /// Neighbour count below which cells clear.
        open_below: u8,
    },
    /// An anchored room is empty or touches the border ring.
    #[error("anchored room {index} does not fit strictly inside the border")]
    AnchoredRoomOutOfBounds {
        /// Position of the room in the anchored list.
        index: usize,
    },
    /// Two anchored rooms touch or overlap.
    #[error("anchored rooms {first} and {second} touch or overlap")]
    AnchoredRoomsOverlap {
        /// Position of the earlier room in the anchored list.
        first: usize,
        /// Position of the later room in the anchored list.
        second: usize,
    },
    /// The mesh square size is not a positive finite number.
    #[error("square size must be a positive finite number")]
    InvalidSquareSize,
    /// The mesh has no solid ring around the grid, so its outer edges cannot be traced.
    #[error("mesh padding must be at least one cell")]
    ZeroMeshPadding,
}

/// Internal invariant violations raised while building or tracing a mesh.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MeshError {
    /// A triangle referenced a node that never received a vertex index.
    #[error("square ({column}, {row}) referenced a node without a vertex index")]
    UnassignedVertex {
        /// Column of the offending square.
        column: u32,
        /// Row of the offending square.
        row: u32,
    },
    /// A triangle referenced a vertex index past the end of the vertex list.
    #[error("triangle {triangle} references vertex {vertex} but the mesh has {vertex_count}")]
    TriangleOutOfBounds {
        /// Position of the triangle in the mesh.
        triangle: usize,
        /// Offending vertex index.
        vertex: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
    /// An outline walk ended on a vertex that does not border its start.
    #[error("outline starting at vertex {start} ended at vertex {end} without closing")]
    UnclosedOutline {
        /// Vertex the walk started from.
        start: u32,
        /// Vertex the walk stopped at.
        end: u32,
    },
    /// An outline walk closed after visiting too few vertices to enclose an area.
    #[error("outline starting at vertex {start} closed after {vertices} vertices")]
    DegenerateOutline {
        /// Vertex the walk started from.
        start: u32,
        /// Distinct vertices visited by the walk.
        vertices: usize,
    },
}

/// Reasons a generation pass did not complete.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The configuration was rejected before any work began.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Triangulation or tracing violated an internal invariant.
    #[error("mesh invariant violated: {0}")]
    Mesh(#[from] MeshError),
    /// A fill regeneration arrived before the first dungeon was published.
    #[error("the generator is not ready for fill regeneration yet")]
    NotReady,
    /// A fill regeneration arrived while no dungeon is published.
    #[error("no dungeon has been generated to regenerate")]
    NothingToRegenerate,
}
