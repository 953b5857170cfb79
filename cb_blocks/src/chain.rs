//! Elevator chain reconstruction: orders one column of elevator stops by height
//! and links each stop to its neighbours.

use crate::ElevatorBlock;
use cb_util::log;

/// Sorts `candidates` (all in the same world and column) by ascending `y`,
/// assigns levels from 0 and links consecutive stops.
///
/// Stops sharing a `y` would occupy the same coordinate; the one encountered
/// last replaces the earlier ones, matching the storage's last-write-wins rule.
pub fn link_column(mut candidates: Vec<ElevatorBlock>) -> Vec<ElevatorBlock> {
    debug_assert!(candidates.windows(2).all(|w| w[0].world() == w[1].world()
        && w[0].position().same_column(w[1].position())));
    // stable, so ties keep encounter order
    candidates.sort_by_key(|e| e.position().y);

    let mut column: Vec<ElevatorBlock> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match column.last_mut() {
            Some(last) if last.position().y == candidate.position().y => {
                log::warn!(
                    "Duplicate elevator at {} in world {}, keeping the last one",
                    candidate.position(),
                    candidate.world()
                );
                *last = candidate;
            }
            _ => column.push(candidate),
        }
    }

    let positions: Vec<_> = column.iter().map(ElevatorBlock::position).collect();
    for (i, stop) in column.iter_mut().enumerate() {
        let previous = i.checked_sub(1).map(|p| positions[p]);
        let next = positions.get(i + 1).copied();
        stop.link(i as u32, previous, next);
    }
    column
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{BlockPosition, BlockSettings, PlayerId, WorldId};
    use cb_util::uuid::Uuid;

    fn stop(y: i32, name: &str) -> ElevatorBlock {
        ElevatorBlock::new(
            PlayerId::new(Uuid::from_u128(1)),
            WorldId::new(Uuid::from_u128(2)),
            BlockPosition::new(5, y, 10),
            BlockSettings::new(name, "STONE", true, true, true, []),
        )
    }

    #[test]
    fn levels_follow_ascending_height() {
        let chain = link_column(vec![stop(90, "c"), stop(12, "a"), stop(64, "b"), stop(-3, "z")]);
        let ys: Vec<_> = chain.iter().map(|e| e.position().y).collect();
        assert_eq!(ys, vec![-3, 12, 64, 90]);
        let levels: Vec<_> = chain.iter().map(|e| e.level()).collect();
        assert_eq!(levels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn links_traverse_in_both_directions() {
        let chain = link_column(vec![stop(70, "b"), stop(64, "a"), stop(80, "c")]);
        let by_pos = |p: BlockPosition| chain.iter().find(|e| e.position() == p).unwrap();

        let mut forward = vec![chain[0].settings().name().to_owned()];
        let mut cursor = &chain[0];
        while let Some(next) = cursor.next() {
            cursor = by_pos(next);
            forward.push(cursor.settings().name().to_owned());
        }
        assert_eq!(forward, vec!["a", "b", "c"]);

        let mut backward = vec![cursor.settings().name().to_owned()];
        while let Some(previous) = cursor.previous() {
            cursor = by_pos(previous);
            backward.push(cursor.settings().name().to_owned());
        }
        assert_eq!(backward, vec!["c", "b", "a"]);
        assert!(chain[0].is_bottom());
        assert!(chain[2].is_top());
    }

    #[test]
    fn single_and_empty_columns() {
        assert!(link_column(Vec::new()).is_empty());
        let chain = link_column(vec![stop(10, "only")]);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].level(), 0);
        assert_eq!(chain[0].previous(), None);
        assert_eq!(chain[0].next(), None);
    }

    #[test]
    fn same_height_keeps_last_encountered() {
        let chain = link_column(vec![stop(64, "first"), stop(70, "top"), stop(64, "second")]);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].settings().name(), "second");
        assert_eq!(chain[0].next(), Some(BlockPosition::new(5, 70, 10)));
        assert_eq!(chain[1].previous(), Some(BlockPosition::new(5, 64, 10)));
    }
}
