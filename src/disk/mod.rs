pub mod builder;

use ahash::AHashMap;
use std::fmt;
use std::str::FromStr;

pub type FileId = usize;

/// A single unit sized slot of the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    File { id: FileId },
    Free,
}

impl Block {
    pub fn is_free(&self) -> bool {
        matches!(self, Block::Free)
    }

    pub fn file_id(&self) -> Option<FileId> {
        match self {
            Block::File { id } => Some(*id),
            Block::Free => None,
        }
    }
}

/// Maximal run of file blocks sharing one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSpan {
    pub id: FileId,
    pub start: usize,
    pub len: usize,
}

/// Maximal run of free blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

/// Dense block layout of the disk, addressed from 0 upward. The index of a block is its
/// disk address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskMap {
    blocks: Vec<Block>,
}

impl DiskMap {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Drops every block from `len` on. Only ever shrinks the map.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.blocks.truncate(len);
    }

    /// Files in address order.
    pub fn files(&self) -> Vec<FileSpan> {
        let mut files: Vec<FileSpan> = Vec::new();

        for (address, block) in self.blocks.iter().enumerate() {
            let Block::File { id } = *block else {
                continue;
            };

            match files.last_mut() {
                Some(last) if last.id == id && last.start + last.len == address => last.len += 1,
                _ => files.push(FileSpan {
                    id,
                    start: address,
                    len: 1,
                }),
            }
        }

        files
    }

    /// Free runs in address order.
    pub fn free_runs(&self) -> Vec<Span> {
        let mut runs: Vec<Span> = Vec::new();

        for (address, block) in self.blocks.iter().enumerate() {
            if !block.is_free() {
                continue;
            }

            match runs.last_mut() {
                Some(last) if last.start + last.len == address => last.len += 1,
                _ => runs.push(Span {
                    start: address,
                    len: 1,
                }),
            }
        }

        runs
    }

    /// Amount of blocks every file id owns.
    pub fn file_sizes(&self) -> AHashMap<FileId, usize> {
        let mut sizes = AHashMap::new();
        for id in self.blocks.iter().filter_map(Block::file_id) {
            *sizes.entry(id).or_insert(0) += 1;
        }

        sizes
    }

    pub fn file_block_count(&self) -> usize {
        self.blocks.iter().filter(|b| !b.is_free()).count()
    }

    /// Moves a whole file to `to`, leaving free space behind. Ranges must not overlap.
    pub(crate) fn relocate(&mut self, file: &FileSpan, to: usize) {
        debug_assert!(to + file.len <= file.start || file.start + file.len <= to);

        self.blocks[to..to + file.len].fill(Block::File { id: file.id });
        self.blocks[file.start..file.start + file.len].fill(Block::Free);
    }
}

impl FromStr for DiskMap {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        builder::parse(s)
    }
}

/// Renders one character per block: `.` for free space, the file id in base 36 otherwise.
/// Ids that do not fit a single character are shown as `#`.
impl fmt::Display for DiskMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            let c = match *block {
                Block::Free => '.',
                Block::File { id } => u32::try_from(id)
                    .ok()
                    .and_then(|id| char::from_digit(id, 36))
                    .unwrap_or('#'),
            };
            write!(f, "{}", c)?;
        }

        Ok(())
    }
}
