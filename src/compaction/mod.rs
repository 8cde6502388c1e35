pub mod greedy;
pub mod whole_file;

use crate::disk::DiskMap;
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

/// Compaction policies supported. Parses from and displays as `greedy` / `whole-file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Policy {
    /// Moves single blocks from the tail into the leftmost free slots.
    Greedy,
    /// Moves whole files into the leftmost free run that fits them.
    WholeFile,
}

/// A way to relocate file blocks of a disk map towards lower addresses.
pub trait CompactionStrategy {
    /// Compacts the map in place. It is never called twice on the same map.
    fn compact(&self, map: &mut DiskMap) -> CompactionReport;
}

/// Summary of a single compaction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionReport {
    pub policy: Policy,
    pub blocks_before: usize,
    pub blocks_after: usize,
    pub blocks_moved: usize,
    /// Whole-file policy only.
    pub files_moved: usize,
    /// Whole-file policy only.
    pub files_skipped: usize,
}

impl CompactionReport {
    fn new(policy: Policy, blocks_before: usize) -> Self {
        Self {
            policy,
            blocks_before,
            blocks_after: blocks_before,
            blocks_moved: 0,
            files_moved: 0,
            files_skipped: 0,
        }
    }
}

impl Policy {
    pub fn strategy(self) -> Box<dyn CompactionStrategy> {
        match self {
            Policy::Greedy => Box::new(greedy::Greedy),
            Policy::WholeFile => Box::new(whole_file::WholeFile),
        }
    }

    pub fn compact(self, map: &mut DiskMap) -> CompactionReport {
        let report = self.strategy().compact(map);

        debug!(
            "{} compaction finished: {} blocks moved, {} files moved, {} files skipped, {} -> {} blocks",
            report.policy,
            report.blocks_moved,
            report.files_moved,
            report.files_skipped,
            report.blocks_before,
            report.blocks_after
        );

        report
    }
}
