//! What the block core needs from the game server hosting it

use crate::{BlockKind, BlockPosition, PlayerId, WorldId};
use std::fmt;
use std::sync::Arc;

/// A world currently loaded by the host
pub trait HostWorld: Send + Sync {
    fn id(&self) -> WorldId;
    fn name(&self) -> &str;
    /// Marks the world block at `position` as a closed block of `kind`
    fn tag_block(&self, position: BlockPosition, kind: BlockKind);
}

pub trait WorldResolver: Send + Sync {
    fn resolve_world(&self, id: WorldId) -> Option<Arc<dyn HostWorld>>;
}

/// A player known to the host, online or not
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlayerHandle {
    pub id: PlayerId,
    pub name: Option<String>,
}

impl PlayerHandle {
    pub fn offline(id: PlayerId) -> Self {
        Self { id, name: None }
    }
}

impl fmt::Display for PlayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.id),
            None => fmt::Display::fmt(&self.id, f),
        }
    }
}

pub trait PlayerResolver: Send + Sync {
    /// Never fails; unknown players get an offline handle
    fn resolve_player(&self, id: PlayerId) -> PlayerHandle;
}

pub trait Host: WorldResolver + PlayerResolver {}

impl<T: WorldResolver + PlayerResolver> Host for T {}
