use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::types::BlockPos;

/// Cardinal placement orientation. Blueprints are captured facing North;
/// every other facing is a quarter-turn rotation about the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

/// All four facings in clockwise order starting at North.
pub const ALL_FACINGS: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

/// Clockwise rotation amount handed to the block-state transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rotation {
    None = 0,
    Clockwise90 = 1,
    Clockwise180 = 2,
    CounterClockwise90 = 3,
}

impl Rotation {
    /// Build from a count of clockwise quarter turns (taken mod 4).
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Rotation::None,
            1 => Rotation::Clockwise90,
            2 => Rotation::Clockwise180,
            _ => Rotation::CounterClockwise90,
        }
    }

    /// Clockwise quarter turns, 0..=3.
    pub fn quarter_turns(self) -> u8 {
        self as u8
    }

    /// Clockwise degrees: 0, 90, 180 or 270.
    pub fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Apply `self` and then `other`.
    pub fn then(self, other: Rotation) -> Rotation {
        Rotation::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    /// Whether this rotation swaps the X and Z extents of a footprint.
    pub fn swaps_axes(self) -> bool {
        self.quarter_turns() % 2 == 1
    }
}

impl Facing {
    pub const ALL: [Facing; 4] = ALL_FACINGS;

    /// Amount the block states must be rotated for this facing.
    /// North = 0°, East = 90° CW, South = 180°, West = 270° CW (90° CCW).
    pub fn rotation(self) -> Rotation {
        Rotation::from_quarter_turns(self as u8)
    }

    pub fn opposite(self) -> Facing {
        match self {
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
        }
    }

    /// Bounding size of a blueprint of `size` once placed with this facing.
    pub fn footprint(self, size: IVec3) -> IVec3 {
        if self.rotation().swaps_axes() {
            IVec3::new(size.z, size.y, size.x)
        } else {
            size
        }
    }
}

/// Map a blueprint-relative position into the placed frame for `facing`.
///
/// `pos` must lie in `[0, size_x) x [0, size_z)` on the horizontal plane; the
/// result lies in the footprint returned by [`Facing::footprint`]. Y is never
/// changed. The mapping is a bijection between the two lattices.
pub fn rotate_position(pos: BlockPos, facing: Facing, size_x: i32, size_z: i32) -> BlockPos {
    let (x, y, z) = (pos.x, pos.y, pos.z);
    match facing {
        Facing::North => pos,
        Facing::South => IVec3::new(size_x - 1 - x, y, size_z - 1 - z),
        Facing::West => IVec3::new(z, y, size_x - 1 - x),
        Facing::East => IVec3::new(size_z - 1 - z, y, x),
    }
}
