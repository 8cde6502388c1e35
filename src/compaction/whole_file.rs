use crate::compaction::{CompactionReport, CompactionStrategy, Policy};
use crate::disk::{DiskMap, Span};
use tracing::trace;

/// Moves every file as a whole into the leftmost free run that fits it. Files are tried once
/// each, from the rightmost (highest id) down, and only ever move left. The map keeps its
/// length.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeFile;

impl CompactionStrategy for WholeFile {
    fn compact(&self, map: &mut DiskMap) -> CompactionReport {
        let mut report = CompactionReport::new(Policy::WholeFile, map.len());
        let mut free_runs = FreeRuns::new(map.free_runs());

        for file in map.files().iter().rev() {
            match free_runs.claim(file.len, file.start) {
                Some(to) => {
                    trace!("file {} moved from {} to {}", file.id, file.start, to);
                    map.relocate(file, to);
                    report.files_moved += 1;
                    report.blocks_moved += file.len;
                }
                None => {
                    trace!("file {} stays at {}", file.id, file.start);
                    report.files_skipped += 1;
                }
            }
        }

        report
    }
}

/// Free runs ordered by address. A claimed run is shrunk from the left since only its head
/// gets used.
///
/// Runs freed up by moved files are never added back: they always lie right of every file
/// that is still to be moved, so no file could claim them anyway.
#[derive(Debug)]
struct FreeRuns {
    runs: Vec<Span>,
}

impl FreeRuns {
    fn new(runs: Vec<Span>) -> Self {
        Self { runs }
    }

    /// Takes the first `len` blocks of the leftmost run that fits `len` and starts before
    /// `before`. Returns the address of the claimed blocks.
    fn claim(&mut self, len: usize, before: usize) -> Option<usize> {
        let idx = self
            .runs
            .iter()
            .take_while(|run| run.start < before)
            .position(|run| run.len >= len)?;

        let run = &mut self.runs[idx];
        let start = run.start;
        run.start += len;
        run.len -= len;

        if run.len == 0 {
            self.runs.remove(idx);
        }

        Some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use crate::disk::builder::{parse, random_input};
    use crate::disk::{Block, FileSpan};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tracing_test::traced_test;

    fn compacted(input: &str) -> (DiskMap, CompactionReport) {
        let mut map = parse(input).unwrap();
        let report = WholeFile.compact(&mut map);
        (map, report)
    }

    /// Empties every seventh file of a generated disk map.
    fn with_empty_files(input: &str) -> String {
        input
            .chars()
            .enumerate()
            .map(|(i, c)| if i % 14 == 4 { '0' } else { c })
            .collect()
    }

    /// Looks the free run up block by block on every move.
    fn naive(map: &DiskMap) -> DiskMap {
        let mut blocks = map.blocks().to_vec();

        for file in map.files().iter().rev() {
            let found = blocks
                .windows(file.len)
                .position(|window| window.iter().all(Block::is_free));

            let Some(to) = found else {
                continue;
            };
            if to >= file.start {
                continue;
            }

            for i in 0..file.len {
                blocks[to + i] = Block::File { id: file.id };
                blocks[file.start + i] = Block::Free;
            }
        }

        DiskMap::new(blocks)
    }

    #[test]
    fn test_compact_example() {
        let (map, report) = compacted("2333133121414131402");
        assert_eq!(map.to_string(), "00992111777.44.333....5555.6666.....8888..");
        assert_eq!(checksum(&map), 2858);
        assert_eq!(report.blocks_before, 42);
        assert_eq!(report.blocks_after, 42);
        // Files 9, 7, 4 and 2 move; the others find no room on their left.
        assert_eq!(report.files_moved, 4);
        assert_eq!(report.files_skipped, 6);
        assert_eq!(report.blocks_moved, 2 + 3 + 2 + 1);
    }

    #[test]
    fn test_compact_small() {
        // No free run of 3 or 5 blocks lies left of files 1 and 2.
        let (map, report) = compacted("12345");
        assert_eq!(map.to_string(), "0..111....22222");
        assert_eq!(report.files_moved, 0);
        assert_eq!(report.files_skipped, 3);
    }

    #[test]
    fn test_compact_uses_run_head() {
        // File 2 takes the head of the four block run, file 1 two blocks of the rest.
        let (map, report) = compacted("14221");
        assert_eq!(map.to_string(), "0211......");
        assert_eq!(report.files_moved, 2);
    }

    #[test]
    fn test_compact_zero_length_file() {
        // File 1 owns no blocks, its id is skipped and the free runs around it merge.
        let (map, report) = compacted("2303112");
        assert_eq!(map.to_string(), "00332.......");
        assert_eq!(report.files_moved, 2);
        assert_eq!(report.files_skipped, 1);
        assert_eq!(checksum(&map), 23);
    }

    #[test]
    fn test_compact_never_moves_right() {
        // The only large enough run is right of file 0.
        let (map, report) = compacted("3315");
        assert_eq!(map.to_string(), "0001........");
        assert_eq!(report.files_moved, 1);

        let (map, report) = compacted("32");
        assert_eq!(map.to_string(), "000..");
        assert_eq!(report.files_moved, 0);
    }

    #[test]
    fn test_compact_single_file() {
        let (map, report) = compacted("5");
        assert_eq!(map.blocks(), &[Block::File { id: 0 }; 5]);
        assert_eq!(checksum(&map), 0);
        assert_eq!(report.files_skipped, 1);
    }

    #[test]
    fn test_compact_empty() {
        let (map, report) = compacted("");
        assert!(map.is_empty());
        assert_eq!(report.files_moved + report.files_skipped, 0);
    }

    #[test]
    fn test_claim() {
        let mut runs = FreeRuns::new(vec![Span { start: 2, len: 3 }, Span { start: 8, len: 1 }]);

        assert_eq!(runs.claim(4, 100), None);
        assert_eq!(runs.claim(1, 2), None);
        assert_eq!(runs.claim(2, 10), Some(2));
        assert_eq!(runs.claim(1, 10), Some(4));
        assert_eq!(runs.runs, vec![Span { start: 8, len: 1 }]);
        assert_eq!(runs.claim(1, 8), None);
        assert_eq!(runs.claim(1, 9), Some(8));
        assert!(runs.runs.is_empty());
    }

    #[test]
    fn test_compact_random_maps() {
        let mut rng = StdRng::seed_from_u64(0x2858);

        for digits in [1, 2, 3, 10, 55, 200, 999] {
            let map = parse(&with_empty_files(&random_input(&mut rng, digits))).unwrap();
            let before: Vec<FileSpan> = map.files();

            let mut actual = map.clone();
            WholeFile.compact(&mut actual);

            assert_eq!(actual, naive(&map));
            assert_eq!(actual.len(), map.len());
            assert_eq!(actual.file_sizes(), map.file_sizes());

            // Files stay whole and never move right.
            let after = actual.files();
            assert_eq!(after.len(), before.len());
            for file in &before {
                let moved = after.iter().find(|f| f.id == file.id).unwrap();
                assert_eq!(moved.len, file.len);
                assert!(moved.start <= file.start);
            }
        }
    }

    #[traced_test]
    #[test]
    fn test_compact_traces_decisions() {
        compacted("2333133121414131402");
        assert!(logs_contain("file 9 moved from 40 to 2"));
        assert!(logs_contain("file 8 stays at 36"));
    }
}
