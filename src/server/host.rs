//! Stand-in for the game server when running as a dedicated process: worlds
//! come from the configuration and every player is known only by identity.

use crate::config;
use cb_blocks::host::{HostWorld, PlayerHandle, PlayerResolver, WorldResolver};
use cb_blocks::{BlockKind, BlockPosition, PlayerId, WorldId};
use cb_util::dashmap::DashMap;
use cb_util::fnv::FnvHashMap;
use cb_util::log;
use std::sync::Arc;

pub struct ConfiguredWorld {
    id: WorldId,
    name: String,
    /// The `closed_type` tag of each closed block in this world
    tags: DashMap<BlockPosition, BlockKind>,
}

impl ConfiguredWorld {
    pub fn new(id: WorldId, name: String) -> Self {
        Self {
            id,
            name,
            tags: DashMap::new(),
        }
    }

    pub fn tag_of(&self, position: BlockPosition) -> Option<BlockKind> {
        self.tags.get(&position).map(|t| *t)
    }

    pub fn tagged_count(&self) -> usize {
        self.tags.len()
    }
}

impl HostWorld for ConfiguredWorld {
    fn id(&self) -> WorldId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tag_block(&self, position: BlockPosition, kind: BlockKind) {
        log::trace!("Tagging {} in {} as closed_type={}", position, self.name, kind);
        self.tags.insert(position, kind);
    }
}

#[derive(Default)]
pub struct DedicatedHost {
    worlds: FnvHashMap<WorldId, Arc<ConfiguredWorld>>,
}

impl DedicatedHost {
    pub fn from_config(cfg: &config::Host) -> Self {
        let mut worlds = FnvHashMap::default();
        for entry in &cfg.worlds {
            match entry.id.parse::<WorldId>() {
                Ok(id) => {
                    worlds.insert(id, Arc::new(ConfiguredWorld::new(id, entry.name.clone())));
                }
                Err(e) => log::warn!("Ignoring world `{}`: {}", entry.name, e),
            }
        }
        Self { worlds }
    }

    pub fn world(&self, id: WorldId) -> Option<&Arc<ConfiguredWorld>> {
        self.worlds.get(&id)
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    pub fn tagged_count(&self) -> usize {
        self.worlds.values().map(|w| w.tagged_count()).sum()
    }
}

impl WorldResolver for DedicatedHost {
    fn resolve_world(&self, id: WorldId) -> Option<Arc<dyn HostWorld>> {
        self.worlds
            .get(&id)
            .map(|w| w.clone() as Arc<dyn HostWorld>)
    }
}

impl PlayerResolver for DedicatedHost {
    fn resolve_player(&self, id: PlayerId) -> PlayerHandle {
        PlayerHandle::offline(id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::WorldEntry;

    #[test]
    fn malformed_world_ids_are_ignored() {
        let host = DedicatedHost::from_config(&config::Host {
            worlds: vec![
                WorldEntry {
                    id: "6ba7b8109dad11d180b400c04fd430c8".to_owned(),
                    name: "world".to_owned(),
                },
                WorldEntry {
                    id: "nether".to_owned(),
                    name: "world_nether".to_owned(),
                },
            ],
        });
        assert_eq!(host.world_count(), 1);
        let id: WorldId = "6ba7b810-9dad-11d1-80b4-00c04fd430c8".parse().unwrap();
        let world = host.resolve_world(id).unwrap();
        assert_eq!(world.name(), "world");
        world.tag_block(BlockPosition::new(1, 2, 3), BlockKind::Elevator);
        assert_eq!(
            host.world(id).unwrap().tag_of(BlockPosition::new(1, 2, 3)),
            Some(BlockKind::Elevator)
        );
        assert_eq!(host.tagged_count(), 1);
    }
}
