use crate::disk::{Block, DiskMap};

/// Filesystem checksum: sum of `address * file id` over every file block. Free space is skipped.
pub fn checksum(map: &DiskMap) -> u64 {
    map.blocks()
        .iter()
        .enumerate()
        .map(|(address, block)| match block {
            Block::File { id } => address as u64 * *id as u64,
            Block::Free => 0,
        })
        .sum()
}
