use anyhow::{Context, Result};
use clap::Parser;
use diskmap::checksum::checksum;
use diskmap::{DiskMap, Policy};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
    /// Path to the disk map. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Compaction policy to run, `greedy` or `whole-file`. Runs both when omitted.
    #[clap(short, long)]
    policy: Option<Policy>,

    /// Print the compacted layout along with the checksum.
    #[clap(short, long)]
    render: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let input = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("could not open disk map {}", path.display()))?;
            diskmap::read_input(file)
                .with_context(|| format!("could not read disk map {}", path.display()))?
        }
        _ => diskmap::read_input(io::stdin().lock()).context("could not read disk map from stdin")?,
    };

    info!("disk map of {} digits read", input.trim().len());

    if args.render {
        let policies: Vec<Policy> = match args.policy {
            Some(policy) => vec![policy],
            None => Policy::iter().collect(),
        };

        let map: DiskMap = input.parse()?;
        for policy in policies {
            // Every policy starts from the original layout.
            let mut compacted = map.clone();
            policy.compact(&mut compacted);

            println!("{}", compacted);
            println!("{}: {}", label(policy), checksum(&compacted));
        }

        return Ok(());
    }

    match args.policy {
        Some(policy) => {
            let res = diskmap::checksum_after(&input, policy)?;
            println!("{}: {}", label(policy), res);
        }
        None => {
            let res = diskmap::checksums(&input)?;
            println!("{}: {}", label(Policy::Greedy), res.greedy);
            println!("{}: {}", label(Policy::WholeFile), res.whole_file);
        }
    }

    Ok(())
}

fn label(policy: Policy) -> &'static str {
    match policy {
        Policy::Greedy => "Filesystem checksum after file blocks compacting",
        Policy::WholeFile => {
            "Filesystem checksum after file blocks compacting dealing with filesystem fragmentation"
        }
    }
}
