use crate::disk::{Block, DiskMap};
use crate::{Error, Result};
use rand::Rng;
use tracing::debug;

/*
Disk map layout schema. Every digit is the length of a run, file runs and free runs
alternate. The trailing free run is optional.
---------------------------------------------------------------------------------
| File #0 len | Free len | File #1 len | Free len | ... | File #N len | Free len? |
---------------------------------------------------------------------------------
|     1 ch    |   1 ch   |     1 ch    |   1 ch   | ... |     1 ch    |   1 ch    |
---------------------------------------------------------------------------------
*/

/// Builds the block layout from the run-length encoded disk map. Surrounding whitespace is
/// ignored; any other non-digit character fails the whole parse.
pub fn parse(input: &str) -> Result<DiskMap> {
    let input = input.trim();

    let lengths = input
        .chars()
        .enumerate()
        .map(|(position, character)| {
            character
                .to_digit(10)
                .map(|len| len as usize)
                .ok_or(Error::InvalidInput {
                    position,
                    character,
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut blocks = Vec::with_capacity(lengths.iter().sum());

    for (i, len) in lengths.iter().enumerate() {
        let block = if i % 2 == 0 {
            Block::File { id: i / 2 }
        } else {
            Block::Free
        };
        blocks.extend(std::iter::repeat(block).take(*len));
    }

    debug!(
        "parsed disk map: {} files, {} blocks",
        lengths.len().div_ceil(2),
        blocks.len()
    );

    Ok(DiskMap::new(blocks))
}

/// Generates a random disk map of `digits` run lengths. File runs are never empty so every
/// id owns at least one block.
pub fn random_input<R: Rng>(rng: &mut R, digits: usize) -> String {
    (0..digits)
        .map(|i| {
            let len = if i % 2 == 0 {
                rng.random_range(1..=9)
            } else {
                rng.random_range(0..=9)
            };
            char::from(b'0' + len)
        })
        .collect()
}
