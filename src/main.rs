use std::io;

use clap::Parser;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use random_notes::{
    config,
    console::{Console, ConsoleDisplay},
    error::Result,
    note_set::NoteSet,
    sequencing_daemon::SequencingDaemon,
};

/// Shows the notes of a scale one at a time in random order, for ear training.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// seconds between notes (anything that isn't a positive whole number means 10)
    #[arg(short, long, default_value_t = config::DEFAULT_INTERVAL_SECONDS.to_string())]
    interval: String,

    /// start a run right away: "natural" or "all"
    #[arg(short, long)]
    notes: Option<NoteSet>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<LevelFilter>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    SimpleLogger::new()
        .with_level(args.log_level.unwrap_or(config::LOG_LEVEL))
        .init()?;

    // Notes are printed from the sequencing thread as the timer fires
    let daemon = SequencingDaemon::start(ConsoleDisplay::new(io::stdout()));
    let mut console = Console::new(daemon, args.interval);

    let mut out = io::stdout();
    console.begin(args.notes, &mut out)?;
    console.run(io::stdin().lock(), &mut out)?;

    info!("Exiting");
    console.into_control().shutdown()
}
