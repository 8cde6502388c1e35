pub mod checksum;
pub mod compaction;
pub mod disk;

pub use compaction::{CompactionReport, CompactionStrategy, Policy};
pub use disk::{Block, DiskMap, FileId};

use std::io::{self, Read};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: unexpected character {character:?} at position {position}")]
    InvalidInput { position: usize, character: char },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Checksums of the same disk map compacted by each policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksums {
    pub greedy: u64,
    pub whole_file: u64,
}

/// Parses the disk map, compacts it with the given policy and returns the filesystem checksum.
pub fn checksum_after(input: &str, policy: Policy) -> Result<u64> {
    let mut map = disk::builder::parse(input)?;
    policy.compact(&mut map);

    Ok(checksum::checksum(&map))
}

/// Every policy works on its own freshly parsed map, so results never depend on each other.
pub fn checksums(input: &str) -> Result<Checksums> {
    Ok(Checksums {
        greedy: checksum_after(input, Policy::Greedy)?,
        whole_file: checksum_after(input, Policy::WholeFile)?,
    })
}

/// Reads the whole disk map line from a reader. Trimming is left to the builder.
pub fn read_input<R: Read>(mut reader: R) -> Result<String> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_INPUT: &str = "2333133121414131402";

    #[test]
    fn test_checksums() {
        let res = checksums(TEST_INPUT).unwrap();
        assert_eq!(res.greedy, 1928);
        assert_eq!(res.whole_file, 2858);
    }

    #[test]
    fn test_checksum_after_trailing_newline() {
        assert_eq!(checksum_after("2333133121414131402\n", Policy::Greedy).unwrap(), 1928);
        assert_eq!(
            checksum_after("  2333133121414131402\r\n", Policy::WholeFile).unwrap(),
            2858
        );
    }

    #[test]
    fn test_single_file() {
        let res = checksums("5").unwrap();
        assert_eq!(res, Checksums { greedy: 0, whole_file: 0 });
    }

    #[test]
    fn test_empty_input() {
        let res = checksums("\n").unwrap();
        assert_eq!(res, Checksums { greedy: 0, whole_file: 0 });
    }

    #[test]
    fn test_invalid_input() {
        match checksums("23x3") {
            Err(Error::InvalidInput {
                position,
                character,
            }) => {
                assert_eq!(position, 2);
                assert_eq!(character, 'x');
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = checksums("12-3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: unexpected character '-' at position 2"
        );
    }

    #[test]
    fn test_read_input() {
        let input = read_input("12345\n".as_bytes()).unwrap();
        assert_eq!(input, "12345\n");
        assert_eq!(checksum_after(&input, Policy::Greedy).unwrap(), 60);
    }
}
