//! Explore the most recently built room map

use std::io;
use std::path::PathBuf;

use clap::Parser;

use rc_core::TIME_FILE;

/// Walk from the start room to the end room
#[derive(Parser, Debug)]
#[command(name = "adventure")]
#[command(version, about = "Explore the newest room map", long_about = None)]
struct Args {
    /// Directory holding the map directories
    #[arg(long = "root", default_value = ".")]
    root: PathBuf,

    /// Map directory to load instead of the newest one
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// File the `time` command writes to (default: currentTime.txt in root)
    #[arg(long = "time-file")]
    time_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    roomcrawl::init_logging();

    let (_dir, map) = roomcrawl::open_map(&args.root, args.dir.as_deref())?;
    let time_file = args
        .time_file
        .unwrap_or_else(|| args.root.join(TIME_FILE));

    roomcrawl::explore(&map, &time_file, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
