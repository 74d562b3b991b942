//! Generate a random room map and write it to disk

use std::path::PathBuf;

use clap::Parser;

/// Build a new room map
#[derive(Parser, Debug)]
#[command(name = "buildrooms")]
#[command(version, about = "Generate a random room map and write it to disk", long_about = None)]
struct Args {
    /// Directory to create the map directory in
    #[arg(long = "root", default_value = ".")]
    root: PathBuf,

    /// Seed for a reproducible map
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Print the generated map as JSON
    #[arg(long = "dump")]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    roomcrawl::init_logging();

    let (_dir, map) = roomcrawl::build_map(&args.root, args.seed)?;
    if args.dump {
        println!("{}", serde_json::to_string_pretty(&map)?);
    }
    Ok(())
}
