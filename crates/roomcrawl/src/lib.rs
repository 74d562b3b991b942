//! roomcrawl: shared setup for the `buildrooms` and `adventure` binaries
//!
//! `buildrooms` generates a map and writes it to a fresh directory;
//! `adventure` loads the newest such directory and lets the player walk
//! from the start room to the end room.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rc_core::clock::TimeKeeper;
use rc_core::dungeon::{Map, generate_map};
use rc_core::{GameRng, Journey, Navigator};
use rc_save::{load_map, newest_rooms_dir, save_map};

/// Log to stderr, filtered by `RUST_LOG` (default `warn`) so prompts on
/// stdout stay clean.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Generate a map and write it into a new directory under `root`
pub fn build_map(root: &Path, seed: Option<u64>) -> anyhow::Result<(PathBuf, Map)> {
    let mut rng = seed.map(GameRng::new).unwrap_or_else(GameRng::from_entropy);
    let map = generate_map(&mut rng).context("failed to generate map")?;
    if !map.is_winnable() {
        warn!(
            seed = rng.seed(),
            "end room is not reachable from the start room"
        );
    }

    let dir = save_map(&map, root)
        .with_context(|| format!("failed to save map under {}", root.display()))?;
    info!(dir = %dir.display(), seed = rng.seed(), "map saved");
    Ok((dir, map))
}

/// Load the map in `dir`, or in the newest map directory under `root`
pub fn open_map(root: &Path, dir: Option<&Path>) -> anyhow::Result<(PathBuf, Map)> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => newest_rooms_dir(root)
            .with_context(|| format!("failed to find a map directory in {}", root.display()))?,
    };
    let map = load_map(&dir).with_context(|| format!("failed to load map from {}", dir.display()))?;
    Ok((dir, map))
}

/// Play one traversal of `map` over the given console streams
pub fn explore<R: BufRead, W: Write>(
    map: &Map,
    time_file: &Path,
    input: R,
    output: W,
) -> anyhow::Result<Journey> {
    let keeper = TimeKeeper::new(time_file);
    let journey = Navigator::new(map)
        .run(input, output, &keeper)
        .context("traversal failed")?;
    Ok(journey)
}
