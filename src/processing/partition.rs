//! Block tree engine.
//!
//! Keeps the visible partition of one root block and the hidden ancestors
//! needed to undo a split. Blocks are addressed by their row index in the
//! visible list and linked to their parent by [`BlockId`].

use crate::error::SubnetError;
use crate::models::{address_to_int, Block, BlockId, MAX_LENGTH};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

/// One visible block, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockRow {
    /// 1-based row number.
    pub index: usize,
    pub cidr: String,
    pub netmask: String,
    pub range: String,
    pub usable_range: String,
    pub hosts: u64,
    /// Parent link token, `None` for the root.
    pub parent: Option<BlockId>,
    /// Number of splits between the root and this block.
    pub depth: u8,
}

/// Current partition of a root block.
///
/// Invariants held between operations:
/// - `visible` is sorted by base address and covers the root range without gaps or overlaps.
/// - every id in `hidden` maps to its two children, low half first.
/// - `blocks` holds exactly the visible and hidden blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionState {
    blocks: HashMap<BlockId, Block>,
    visible: Vec<BlockId>,
    hidden: HashMap<BlockId, (BlockId, BlockId)>,
    root: Option<BlockId>,
    next_id: u64,
}

impl PartitionState {
    pub fn new() -> PartitionState {
        PartitionState::default()
    }

    /// Validate `address`/`prefix` and make the resulting block the only root.
    ///
    /// Any previous partition is discarded.
    pub fn compute_block(&mut self, address: &str, prefix: u8) -> Result<Block, SubnetError> {
        let base = address_to_int(address)?;
        let root = Block::new(BlockId(self.next_id), base, prefix, None)?;

        self.reset();
        self.commit(root);
        self.visible.push(root.id());
        self.root = Some(root.id());
        log::debug!("compute_block: new root {root} {}", root.id());
        Ok(root)
    }

    /// Replace the visible block at `index` with its two halves.
    pub fn split(&mut self, index: usize) -> Result<(Block, Block), SubnetError> {
        let block = self.block_at(index)?;
        if block.prefix() >= MAX_LENGTH {
            log::warn!("split: {block} is a single host");
            return Err(SubnetError::CannotSplit(block.to_string()));
        }

        let prefix = block.prefix() + 1;
        let half = (block.size() / 2) as u32;
        let parent = Some(block.id());
        let low = Block::new(BlockId(self.next_id), block.base(), prefix, parent)?;
        let high = Block::new(BlockId(self.next_id + 1), block.base() + half, prefix, parent)?;

        self.commit(low);
        self.commit(high);
        self.visible.splice(index..=index, [low.id(), high.id()]);
        self.hidden.insert(block.id(), (low.id(), high.id()));
        log::debug!("split: {block} -> {low} + {high}");
        Ok((low, high))
    }

    /// Replace the visible block at `index` and its sibling with their parent.
    pub fn merge(&mut self, index: usize) -> Result<Block, SubnetError> {
        let child = self.block_at(index)?;
        let parent_id = child
            .parent()
            .ok_or_else(|| SubnetError::NoParent(child.to_string()))?;
        let (low_id, high_id) = *self
            .hidden
            .get(&parent_id)
            .ok_or_else(|| SubnetError::ParentNotFound(child.to_string()))?;
        let parent = *self
            .blocks
            .get(&parent_id)
            .ok_or_else(|| SubnetError::ParentNotFound(child.to_string()))?;

        let sibling_id = if low_id == child.id() { high_id } else { low_id };
        if self.hidden.contains_key(&sibling_id) {
            let sibling = self.lookup(sibling_id)?;
            log::warn!("merge: sibling {sibling} of {child} is split");
            return Err(SubnetError::SiblingAlreadySplit(sibling.to_string()));
        }

        let low_pos = self.position_of(low_id);
        let high_pos = self.position_of(high_id);
        let low_pos = match (low_pos, high_pos) {
            (Some(lo), Some(hi)) if hi == lo + 1 => lo,
            _ => {
                return Err(SubnetError::PartitionBroken(format!(
                    "children of {parent} are not adjacent in the visible list"
                )))
            }
        };

        self.visible.splice(low_pos..=low_pos + 1, [parent_id]);
        self.hidden.remove(&parent_id);
        self.blocks.remove(&low_id);
        self.blocks.remove(&high_id);
        log::debug!("merge: {child} and sibling -> {parent}");
        Ok(parent)
    }

    /// Drop all blocks. Ids keep increasing so stale tokens never match.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.visible.clear();
        self.hidden.clear();
        self.root = None;
    }

    /// Visible blocks in ascending address order.
    ///
    /// Ids without a stored block are skipped here; [`check_partition`](Self::check_partition) reports them.
    pub fn visible(&self) -> impl Iterator<Item = &Block> + '_ {
        self.visible.iter().filter_map(|id| self.blocks.get(id))
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Visible block at row `index` (0-based).
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.visible.get(index).and_then(|id| self.blocks.get(id))
    }

    pub fn root(&self) -> Option<&Block> {
        self.root.and_then(|id| self.blocks.get(&id))
    }

    /// Row index of a visible block.
    pub fn position_of(&self, id: BlockId) -> Option<usize> {
        self.visible.iter().position(|v| *v == id)
    }

    /// Number of split blocks waiting to be merged back.
    pub fn hidden_len(&self) -> usize {
        self.hidden.len()
    }

    /// Presentation rows, one per visible block.
    pub fn rows(&self) -> Vec<BlockRow> {
        let root_prefix = self.root().map(|r| r.prefix()).unwrap_or(0);
        self.visible()
            .enumerate()
            .map(|(i, b)| BlockRow {
                index: i + 1,
                cidr: b.cidr_text(),
                netmask: b.netmask_text(),
                range: b.range_text(),
                usable_range: b.usable_range_text(),
                hosts: b.host_count(),
                parent: b.parent(),
                depth: b.prefix() - root_prefix,
            })
            .collect()
    }

    /// Verify that the visible set partitions the root range exactly.
    pub fn check_partition(&self) -> Result<(), SubnetError> {
        let root = match self.root() {
            Some(root) => *root,
            None if self.visible.is_empty() => return Ok(()),
            None => {
                return Err(SubnetError::PartitionBroken(
                    "visible blocks without a root".to_string(),
                ))
            }
        };

        let blocks = self
            .visible
            .iter()
            .map(|id| self.lookup(*id))
            .collect::<Result<Vec<Block>, SubnetError>>()?;

        if let Some(b) = blocks.iter().find(|b| self.hidden.contains_key(&b.id())) {
            return Err(SubnetError::PartitionBroken(format!(
                "{b} is both visible and hidden"
            )));
        }
        let (first, last) = match (blocks.first(), blocks.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(SubnetError::PartitionBroken(format!(
                    "root {root} has no visible blocks"
                )))
            }
        };
        if first.base() != root.base() || last.broadcast() != root.broadcast() {
            return Err(SubnetError::PartitionBroken(format!(
                "visible blocks {first}..{last} do not span root {root}"
            )));
        }
        for (a, b) in blocks.iter().tuple_windows() {
            if u64::from(a.broadcast()) + 1 != u64::from(b.base()) {
                return Err(SubnetError::PartitionBroken(format!(
                    "{a} and {b} are not contiguous"
                )));
            }
        }
        Ok(())
    }

    /// Store a block built from `next_id` and advance the id counter past it.
    fn commit(&mut self, block: Block) {
        self.next_id = self.next_id.max(block.id().0 + 1);
        self.blocks.insert(block.id(), block);
    }

    fn block_at(&self, index: usize) -> Result<Block, SubnetError> {
        self.get(index).copied().ok_or(SubnetError::UnknownBlock {
            index,
            visible: self.visible.len(),
        })
    }

    fn lookup(&self, id: BlockId) -> Result<Block, SubnetError> {
        self.blocks
            .get(&id)
            .copied()
            .ok_or_else(|| SubnetError::PartitionBroken(format!("unknown block {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidrs(state: &PartitionState) -> Vec<String> {
        state.visible().map(|b| b.to_string()).collect()
    }

    fn seeded() -> PartitionState {
        let mut state = PartitionState::new();
        state.compute_block("192.168.0.0", 24).unwrap();
        state
    }

    #[test]
    fn test_compute_block() {
        let mut state = PartitionState::new();
        let root = state.compute_block("192.168.0.0", 24).unwrap();
        assert_eq!(root.cidr_text(), "192.168.0.0/24");
        assert_eq!(root.netmask_text(), "255.255.255.0");
        assert_eq!(root.range_text(), "192.168.0.0 - 192.168.0.255");
        assert_eq!(root.usable_range_text(), "192.168.0.1 - 192.168.0.254");
        assert_eq!(root.host_count(), 254);
        assert_eq!(root.parent(), None);
        assert_eq!(state.len(), 1);
        assert_eq!(state.root(), Some(&root));
    }

    #[test]
    fn test_compute_block_errors() {
        let mut state = PartitionState::new();
        assert_eq!(
            state.compute_block("192.168.0", 24).unwrap_err(),
            SubnetError::InvalidAddress("192.168.0".to_string())
        );
        assert!(matches!(
            state.compute_block("192.168.0.0", 33),
            Err(SubnetError::InvalidPrefix { prefix: 33, .. })
        ));
        assert!(matches!(
            state.compute_block("192.168.1.0", 23),
            Err(SubnetError::InvalidPrefix { prefix: 23, .. })
        ));
        assert!(state.is_empty());
    }

    #[test]
    fn test_compute_block_error_keeps_split_partition() {
        let mut state = seeded();
        state.split(0).unwrap();
        state.split(1).unwrap();
        let before = state.clone();

        assert!(state.compute_block("10.0.0", 8).is_err());
        assert!(state.compute_block("10.0.0.0", 33).is_err());
        assert!(state.compute_block("10.0.1.0", 16).is_err());
        assert_eq!(state, before);
        assert_eq!(
            cidrs(&state),
            vec!["192.168.0.0/25", "192.168.0.128/26", "192.168.0.192/26"]
        );
        state.check_partition().unwrap();
    }

    #[test]
    fn test_check_partition_reports_missing_block() {
        let mut state = seeded();
        let (_, high) = state.split(0).unwrap();
        state.blocks.remove(&high.id());
        assert_eq!(state.visible().count(), 1);
        assert!(matches!(
            state.check_partition(),
            Err(SubnetError::PartitionBroken(_))
        ));

        let mut state = seeded();
        let root = state.root().unwrap().id();
        state.blocks.remove(&root);
        assert!(matches!(
            state.check_partition(),
            Err(SubnetError::PartitionBroken(_))
        ));
    }

    #[test]
    fn test_compute_block_replaces_previous() {
        let mut state = seeded();
        state.split(0).unwrap();
        state.compute_block("10.0.0.0", 8).unwrap();
        assert_eq!(cidrs(&state), vec!["10.0.0.0/8"]);
        assert_eq!(state.hidden_len(), 0);
        state.check_partition().unwrap();
    }

    #[test]
    fn test_split() {
        let mut state = seeded();
        let (low, high) = state.split(0).unwrap();
        assert_eq!(low.cidr_text(), "192.168.0.0/25");
        assert_eq!(low.range_text(), "192.168.0.0 - 192.168.0.127");
        assert_eq!(low.usable_range_text(), "192.168.0.1 - 192.168.0.126");
        assert_eq!(low.host_count(), 126);
        assert_eq!(high.cidr_text(), "192.168.0.128/25");
        assert_eq!(high.range_text(), "192.168.0.128 - 192.168.0.255");
        assert_eq!(high.usable_range_text(), "192.168.0.129 - 192.168.0.254");
        assert_eq!(high.host_count(), 126);
        assert_eq!(low.parent(), high.parent());
        assert_eq!(cidrs(&state), vec!["192.168.0.0/25", "192.168.0.128/25"]);
        assert_eq!(state.hidden_len(), 1);
    }

    #[test]
    fn test_split_keeps_position() {
        let mut state = seeded();
        state.split(0).unwrap();
        state.split(1).unwrap();
        state.split(0).unwrap();
        assert_eq!(
            cidrs(&state),
            vec![
                "192.168.0.0/26",
                "192.168.0.64/26",
                "192.168.0.128/26",
                "192.168.0.192/26"
            ]
        );
        state.check_partition().unwrap();
    }

    #[test]
    fn test_merge_either_child() {
        for index in [0, 1] {
            let mut state = seeded();
            let before = cidrs(&state);
            state.split(0).unwrap();
            let parent = state.merge(index).unwrap();
            assert_eq!(parent.cidr_text(), "192.168.0.0/24");
            assert_eq!(parent.host_count(), 254);
            assert_eq!(cidrs(&state), before);
            assert_eq!(state.len(), 1);
            assert_eq!(state.hidden_len(), 0);
        }
    }

    #[test]
    fn test_cannot_split_host() {
        let mut state = PartitionState::new();
        state.compute_block("10.0.0.7", 32).unwrap();
        let before = state.clone();
        assert_eq!(
            state.split(0).unwrap_err(),
            SubnetError::CannotSplit("10.0.0.7/32".to_string())
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_merge_root_has_no_parent() {
        let mut state = seeded();
        assert_eq!(
            state.merge(0).unwrap_err(),
            SubnetError::NoParent("192.168.0.0/24".to_string())
        );
    }

    #[test]
    fn test_merge_with_split_sibling() {
        let mut state = seeded();
        state.split(0).unwrap();
        state.split(1).unwrap();
        let before = state.clone();
        let err = state.merge(0).unwrap_err();
        assert_eq!(
            err,
            SubnetError::SiblingAlreadySplit("192.168.0.128/25".to_string())
        );
        assert!(err.is_internal());
        assert_eq!(state, before);

        // Merging the inner pair first clears the way.
        state.merge(2).unwrap();
        let parent = state.merge(0).unwrap();
        assert_eq!(parent.cidr_text(), "192.168.0.0/24");
    }

    #[test]
    fn test_unknown_index() {
        let mut state = seeded();
        assert_eq!(
            state.split(3).unwrap_err(),
            SubnetError::UnknownBlock {
                index: 3,
                visible: 1
            }
        );
        assert!(matches!(
            PartitionState::new().merge(0),
            Err(SubnetError::UnknownBlock { .. })
        ));
    }

    #[test]
    fn test_split_whole_space() {
        let mut state = PartitionState::new();
        state.compute_block("0.0.0.0", 0).unwrap();
        let (low, high) = state.split(0).unwrap();
        assert_eq!(low.cidr_text(), "0.0.0.0/1");
        assert_eq!(high.cidr_text(), "128.0.0.0/1");
        state.check_partition().unwrap();
    }

    #[test]
    fn test_rows() {
        let mut state = seeded();
        state.split(0).unwrap();
        let rows = state.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].index, 2);
        assert_eq!(rows[1].cidr, "192.168.0.128/25");
        assert_eq!(rows[1].netmask, "255.255.255.128");
        assert_eq!(rows[1].hosts, 126);
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[0].parent, state.root().map(|r| r.id()));
    }

    #[test]
    fn test_split_merge_inverse() {
        let mut state = seeded();
        state.split(0).unwrap();
        state.split(0).unwrap();
        let before = cidrs(&state);
        for index in 0..state.len() {
            let original = *state.get(index).unwrap();
            let (low, high) = state.split(index).unwrap();
            let merge_at = if index % 2 == 0 {
                state.position_of(low.id()).unwrap()
            } else {
                state.position_of(high.id()).unwrap()
            };
            let restored = state.merge(merge_at).unwrap();
            assert!(restored.same_range(&original));
            assert_eq!(restored, original);
            assert_eq!(cidrs(&state), before);
        }
    }
}
