use crate::compaction::{CompactionReport, CompactionStrategy, Policy};
use crate::disk::DiskMap;

/// Fills free slots from the head with file blocks taken off the tail, one block at a time.
/// Free blocks taken off the tail are dropped, so the map shrinks to its file blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl CompactionStrategy for Greedy {
    fn compact(&self, map: &mut DiskMap) -> CompactionReport {
        let mut report = CompactionReport::new(Policy::Greedy, map.len());
        let blocks = map.blocks_mut();

        // Blocks at `end` and past it are already taken off the tail.
        let mut end = blocks.len();
        let mut i = 0;

        'scan: while i < end {
            if blocks[i].is_free() {
                loop {
                    end -= 1;

                    // The tail reached the hole itself, nothing left to move.
                    if end == i {
                        break 'scan;
                    }

                    if !blocks[end].is_free() {
                        blocks[i] = blocks[end];
                        report.blocks_moved += 1;
                        break;
                    }
                }
            }

            i += 1;
        }

        map.truncate(end);
        report.blocks_after = end;

        report
    }
}
