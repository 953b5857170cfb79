pub mod blocks;
pub mod chain;
pub mod host;
pub mod registry;
pub mod storage;

use std::fmt;

pub use blocks::{BlockKind, BlockSettings, ClosedBlock, ElevatorBlock};
pub use cb_util::{PlayerId, WorldId};
pub use registry::{Integration, IntegrationRegistry};
pub use storage::loader::TreeLoader;
pub use storage::BlockStorage;

/// Block-grid coordinates inside a world
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Same column (x and z), different height
    pub const fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    pub const fn same_column(self, other: Self) -> bool {
        self.x == other.x && self.z == other.z
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
