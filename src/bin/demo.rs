use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use diskmap::checksum::checksum;
use diskmap::disk::builder::{self, random_input};
use diskmap::{CompactionReport, DiskMap, Policy};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::Terminal;
use std::io;
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;

#[derive(Parser)]
struct Args {
    /// Amount of run length digits in the generated disk map.
    #[clap(short, long, default_value = "199")]
    digits: usize,

    /// Seed for the generator, random when omitted.
    #[clap(short, long)]
    seed: Option<u64>,
}

struct Run {
    report: CompactionReport,
    checksum: u64,
    elapsed: Duration,
    layout: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let input = random_input(&mut rng, args.digits);
    let map = builder::parse(&input)?;

    let runs: Vec<Run> = Policy::iter().map(|policy| compact(&map, policy)).collect();

    start_tui(&input, &map, &runs)?;

    // Print final stats
    println!("Disk map: {} digits, {} blocks", input.len(), map.len());
    for run in &runs {
        println!(
            "{}: checksum {}, {} blocks moved, {} files moved, {} files skipped, {:.2?}",
            run.report.policy,
            run.checksum,
            run.report.blocks_moved,
            run.report.files_moved,
            run.report.files_skipped,
            run.elapsed
        );
    }

    Ok(())
}

fn compact(map: &DiskMap, policy: Policy) -> Run {
    let mut compacted = map.clone();

    let start_time = Instant::now();
    let report = policy.compact(&mut compacted);
    let elapsed = start_time.elapsed();

    Run {
        report,
        checksum: checksum(&compacted),
        elapsed,
        layout: compacted.to_string(),
    }
}

fn start_tui(input: &str, map: &DiskMap, runs: &[Run]) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let original = map.to_string();

    loop {
        terminal.draw(|frame| {
            let mut constraints = vec![Constraint::Length(4), Constraint::Min(3)];
            constraints.extend(runs.iter().map(|_| Constraint::Min(3)));
            let areas = Layout::vertical(constraints).split(frame.area());

            let text = format!(
                r#"Disk map: {} digits, {} blocks, {} free
Press 'q' to stop..."#,
                input.len(),
                map.len(),
                map.len() - map.file_block_count()
            );
            frame.render_widget(Paragraph::new(text), areas[0]);

            let layout = Paragraph::new(original.as_str())
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title("original"));
            frame.render_widget(layout, areas[1]);

            for (run, area) in runs.iter().zip(areas.iter().skip(2)) {
                let title = format!(
                    "{}: checksum {}, {} blocks moved in {:.2?}",
                    run.report.policy, run.checksum, run.report.blocks_moved, run.elapsed
                );
                let layout = Paragraph::new(run.layout.as_str())
                    .wrap(Wrap { trim: false })
                    .block(Block::bordered().title(title));
                frame.render_widget(layout, *area);
            }
        })?;

        // Check for 'q' press to exit
        if event::poll(Duration::from_millis(500))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    break;
                }
            }
        }
    }

    // Clean up terminal state
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
