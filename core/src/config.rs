//! Generation knobs shared by every stage of a pass.

use serde::{Deserialize, Serialize};

use crate::{Cell, CellRect, ConfigError, Seed};

/// Smallest grid edge that still leaves an interior inside the border ring.
pub const MIN_GRID_EDGE: u32 = 3;

/// Complete set of knobs for one generation pass.
///
/// Missing fields fall back to their defaults when deserialised, so partial
/// TOML manifests stay valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Seed to use; a fresh one is drawn when absent.
    pub seed: Option<Seed>,
    /// Percentage of interior cells that start solid.
    pub fill_percent: u8,
    /// Inclusive range of room edge lengths.
    pub room_size: RoomSizeRange,
    /// Number of random room placements attempted.
    pub room_attempts: u32,
    /// Rooms carved before any random placement.
    pub anchored_rooms: Vec<CellRect>,
    /// Number of cellular automaton passes.
    pub smoothing_passes: u32,
    /// Neighbour thresholds applied by each smoothing pass.
    pub smoothing: SmoothingRule,
    /// Inclusive range of tunnel brush radii.
    pub tunnel_radius: RadiusRange,
    /// Solid regions smaller than this are cleared.
    pub min_wall_region: usize,
    /// Open regions smaller than this are filled.
    pub min_room_region: usize,
    /// Whether to carve passages joining every cave room to the main room.
    pub connect_regions: bool,
    /// Solid rings added around the grid before triangulation; at least one.
    pub mesh_padding: u32,
    /// World-space edge length of one grid cell.
    pub square_size: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            seed: None,
            fill_percent: 45,
            room_size: RoomSizeRange::new(8, 20),
            room_attempts: 12,
            anchored_rooms: Vec::new(),
            smoothing_passes: 3,
            smoothing: SmoothingRule::default(),
            tunnel_radius: RadiusRange::new(2, 3),
            min_wall_region: 40,
            min_room_region: 50,
            connect_regions: false,
            mesh_padding: 1,
            square_size: 1.0,
        }
    }
}

impl GenerationConfig {
    /// Checks every knob, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_GRID_EDGE || self.height < MIN_GRID_EDGE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }

        if self.fill_percent > 100 {
            return Err(ConfigError::FillPercentOutOfRange(self.fill_percent));
        }

        let RoomSizeRange { min, max } = self.room_size;
        if min == 0 {
            return Err(ConfigError::ZeroRoomSize);
        }
        if min > max {
            return Err(ConfigError::RoomRangeInverted { min, max });
        }
        if max.saturating_add(2) > self.width || max.saturating_add(2) > self.height {
            return Err(ConfigError::RoomTooLarge {
                max,
                width: self.width,
                height: self.height,
            });
        }

        let RadiusRange { min, max } = self.tunnel_radius;
        if min == 0 {
            return Err(ConfigError::ZeroTunnelRadius);
        }
        if min > max {
            return Err(ConfigError::TunnelRadiusInverted { min, max });
        }

        if !self.smoothing.is_consistent() {
            return Err(ConfigError::InvalidSmoothingRule {
                solid_above: self.smoothing.solid_above,
                open_below: self.smoothing.open_below,
            });
        }

        self.validate_anchored_rooms()?;

        if !self.square_size.is_finite() || self.square_size <= 0.0 {
            return Err(ConfigError::InvalidSquareSize);
        }

        if self.mesh_padding == 0 {
            return Err(ConfigError::ZeroMeshPadding);
        }

        Ok(())
    }

    fn validate_anchored_rooms(&self) -> Result<(), ConfigError> {
        for (index, rect) in self.anchored_rooms.iter().enumerate() {
            let size = rect.size();
            let origin = rect.origin();
            let inside = size.width() > 0
                && size.height() > 0
                && origin.column() >= 1
                && origin.row() >= 1
                && rect.right() < self.width
                && rect.bottom() < self.height;
            if !inside {
                return Err(ConfigError::AnchoredRoomOutOfBounds { index });
            }

            for (first, earlier) in self.anchored_rooms[..index].iter().enumerate() {
                if earlier.intersects_with_halo(rect, 1) {
                    return Err(ConfigError::AnchoredRoomsOverlap {
                        first,
                        second: index,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Inclusive range of room edge lengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomSizeRange {
    /// Smallest edge length.
    pub min: u32,
    /// Largest edge length.
    pub max: u32,
}

impl RoomSizeRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Inclusive range of tunnel brush radii.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RadiusRange {
    /// Smallest radius.
    pub min: u32,
    /// Largest radius.
    pub max: u32,
}

impl RadiusRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Neighbour thresholds of the cellular automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SmoothingRule {
    /// Cells with more solid neighbours than this become solid.
    pub solid_above: u8,
    /// Cells with fewer solid neighbours than this become open.
    pub open_below: u8,
}

impl Default for SmoothingRule {
    fn default() -> Self {
        Self {
            solid_above: 5,
            open_below: 3,
        }
    }
}

impl SmoothingRule {
    /// Next state of a cell given its current value and solid neighbour count.
    #[must_use]
    pub const fn apply(&self, current: Cell, solid_neighbors: u8) -> Cell {
        if solid_neighbors > self.solid_above {
            Cell::Solid
        } else if solid_neighbors < self.open_below {
            Cell::Open
        } else {
            current
        }
    }

    /// Reports whether no neighbour count satisfies both thresholds.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.open_below as u16 <= self.solid_above as u16 + 1
    }
}
