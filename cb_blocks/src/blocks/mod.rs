use crate::{BlockPosition, PlayerId, WorldId};
use cb_util::itertools::Itertools;
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BlockKind {
    Elevator,
}

impl BlockKind {
    /// Value of the `closed_type` metadata tag the host attaches to the world block
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Elevator => "elevator",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display and behaviour configuration of a closed block
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockSettings {
    name: String,
    disguise: String,
    enabled: bool,
    particles: bool,
    visible_to_owner: bool,
    /// Players allowed to see the block, in insertion order
    viewers: Vec<PlayerId>,
}

impl BlockSettings {
    pub fn new<I: IntoIterator<Item = PlayerId>>(
        name: impl Into<String>,
        disguise: impl Into<String>,
        enabled: bool,
        particles: bool,
        visible_to_owner: bool,
        viewers: I,
    ) -> Self {
        Self {
            name: name.into(),
            disguise: disguise.into(),
            enabled,
            particles,
            visible_to_owner,
            viewers: viewers.into_iter().unique().collect_vec(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn disguise(&self) -> &str {
        &self.disguise
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn particles_enabled(&self) -> bool {
        self.particles
    }

    pub fn is_visible_to_owner(&self) -> bool {
        self.visible_to_owner
    }

    pub fn viewers(&self) -> &[PlayerId] {
        &self.viewers
    }

    pub fn is_visible_to(&self, owner: PlayerId, viewer: PlayerId) -> bool {
        if viewer == owner {
            self.visible_to_owner
        } else {
            self.viewers.contains(&viewer)
        }
    }
}

/// One stop of an elevator chain.
///
/// `previous`/`next` hold the coordinates of the neighbouring stops in the same
/// world and column; they are resolved against [`crate::BlockStorage`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElevatorBlock {
    owner: PlayerId,
    world: WorldId,
    position: BlockPosition,
    settings: BlockSettings,
    level: u32,
    previous: Option<BlockPosition>,
    next: Option<BlockPosition>,
}

impl ElevatorBlock {
    /// An unlinked elevator; chain linkage is assigned by [`crate::chain::link_column`]
    pub fn new(
        owner: PlayerId,
        world: WorldId,
        position: BlockPosition,
        settings: BlockSettings,
    ) -> Self {
        Self {
            owner,
            world,
            position,
            settings,
            level: 0,
            previous: None,
            next: None,
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    pub fn position(&self) -> BlockPosition {
        self.position
    }

    pub fn settings(&self) -> &BlockSettings {
        &self.settings
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn previous(&self) -> Option<BlockPosition> {
        self.previous
    }

    pub fn next(&self) -> Option<BlockPosition> {
        self.next
    }

    pub fn is_bottom(&self) -> bool {
        self.previous.is_none()
    }

    pub fn is_top(&self) -> bool {
        self.next.is_none()
    }

    pub(crate) fn link(
        &mut self,
        level: u32,
        previous: Option<BlockPosition>,
        next: Option<BlockPosition>,
    ) {
        self.level = level;
        self.previous = previous;
        self.next = next;
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClosedBlock {
    Elevator(ElevatorBlock),
}

impl ClosedBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            ClosedBlock::Elevator(_) => BlockKind::Elevator,
        }
    }

    pub fn owner(&self) -> PlayerId {
        match self {
            ClosedBlock::Elevator(e) => e.owner(),
        }
    }

    pub fn world(&self) -> WorldId {
        match self {
            ClosedBlock::Elevator(e) => e.world(),
        }
    }

    pub fn position(&self) -> BlockPosition {
        match self {
            ClosedBlock::Elevator(e) => e.position(),
        }
    }

    pub fn settings(&self) -> &BlockSettings {
        match self {
            ClosedBlock::Elevator(e) => e.settings(),
        }
    }

    pub fn as_elevator(&self) -> Option<&ElevatorBlock> {
        match self {
            ClosedBlock::Elevator(e) => Some(e),
        }
    }

    pub fn into_elevator(self) -> Option<ElevatorBlock> {
        match self {
            ClosedBlock::Elevator(e) => Some(e),
        }
    }
}

impl From<ElevatorBlock> for ClosedBlock {
    fn from(e: ElevatorBlock) -> Self {
        ClosedBlock::Elevator(e)
    }
}
