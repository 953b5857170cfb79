use crate::{BlockPosition, ClosedBlock, ElevatorBlock, PlayerId, WorldId};
use cb_util::dashmap::DashMap;
use cb_util::itertools::Itertools;
use cb_util::log;

mod document;
pub mod loader;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BlockKey {
    pub world: WorldId,
    pub position: BlockPosition,
}

impl BlockKey {
    pub fn new(world: WorldId, position: BlockPosition) -> Self {
        Self { world, position }
    }

    pub fn of(block: &ClosedBlock) -> Self {
        Self::new(block.world(), block.position())
    }
}

/// Concurrent index of every loaded closed block, keyed by world and coordinate.
///
/// All operations take `&self`; the map is sharded internally so readers and
/// inserting threads never need outside locking.
#[derive(Default)]
pub struct BlockStorage {
    blocks: DashMap<BlockKey, ClosedBlock>,
}

impl BlockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a block, returning the one it replaced at the same coordinate
    pub fn add(&self, block: impl Into<ClosedBlock>) -> Option<ClosedBlock> {
        let block = block.into();
        let key = BlockKey::of(&block);
        let replaced = self.blocks.insert(key, block);
        if let Some(old) = &replaced {
            log::warn!(
                "Replacing {} block at {} in world {} (owned by {})",
                old.kind(),
                key.position,
                key.world,
                old.owner()
            );
        }
        replaced
    }

    /// Inserts every block, last write wins on coordinate collisions. Returns how many were inserted.
    pub fn add_all<B, I>(&self, blocks: I) -> usize
    where
        B: Into<ClosedBlock>,
        I: IntoIterator<Item = B>,
    {
        let mut inserted = 0;
        for block in blocks {
            self.add(block);
            inserted += 1;
        }
        inserted
    }

    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, world: WorldId, position: BlockPosition) -> Option<ClosedBlock> {
        self.blocks
            .get(&BlockKey::new(world, position))
            .map(|b| b.value().clone())
    }

    pub fn contains(&self, world: WorldId, position: BlockPosition) -> bool {
        self.blocks.contains_key(&BlockKey::new(world, position))
    }

    /// Removes a block. Neighbouring elevator links are not rewritten.
    pub fn remove(&self, world: WorldId, position: BlockPosition) -> Option<ClosedBlock> {
        self.blocks
            .remove(&BlockKey::new(world, position))
            .map(|(_, b)| b)
    }

    pub fn next_of(&self, elevator: &ElevatorBlock) -> Option<ElevatorBlock> {
        self.linked_elevator(elevator, elevator.next()?)
    }

    pub fn previous_of(&self, elevator: &ElevatorBlock) -> Option<ElevatorBlock> {
        self.linked_elevator(elevator, elevator.previous()?)
    }

    fn linked_elevator(
        &self,
        from: &ElevatorBlock,
        position: BlockPosition,
    ) -> Option<ElevatorBlock> {
        if position == from.position() {
            return None;
        }
        self.get(from.world(), position)?.into_elevator()
    }

    /// Every stored elevator in one column, bottom to top
    pub fn elevator_chain(&self, world: WorldId, x: i32, z: i32) -> Vec<ElevatorBlock> {
        self.blocks
            .iter()
            .filter(|e| {
                let key = e.key();
                key.world == world && key.position.x == x && key.position.z == z
            })
            .filter_map(|e| e.value().as_elevator().cloned())
            .sorted_by_key(|e| (e.level(), e.position().y))
            .collect_vec()
    }

    pub fn blocks_owned_by(&self, owner: PlayerId) -> Vec<ClosedBlock> {
        self.blocks
            .iter()
            .filter(|e| e.value().owner() == owner)
            .map(|e| e.value().clone())
            .collect_vec()
    }
}
