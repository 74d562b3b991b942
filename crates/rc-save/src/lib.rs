//! rc-save: Map persistence for roomcrawl
//!
//! A generated map is written as one text file per room inside a directory
//! named `roomcrawl.rooms.<pid>`. Loading reads such a directory back into
//! a validated `Map`.

pub mod format;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tracing::{debug, info, warn};

use rc_core::dungeon::{Map, MapError};
use rc_core::{PLAY_ROOMS, ROOMS_DIR_MARKER};

pub use format::{FormatError, decode_room, encode_room};

/// Save/load errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("map directory {0} already exists")]
    AlreadyExists(PathBuf),

    #[error("{0} is not a map directory (name must contain `{marker}`)", marker = ROOMS_DIR_MARKER)]
    NotAMapDir(PathBuf),

    #[error("no map directory found in {0}")]
    NoMapDir(PathBuf),

    #[error("{path} holds {found} room files, need {needed}", needed = PLAY_ROOMS)]
    InsufficientRooms { path: PathBuf, found: usize },

    #[error("{path} holds {found} room files, expected {expected}", expected = PLAY_ROOMS)]
    TooManyRooms { path: PathBuf, found: usize },

    #[error("room file {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("room file {path} describes room {name}")]
    NameMismatch { path: PathBuf, name: String },

    #[error("map in {path} is invalid: {source}")]
    InvalidMap {
        path: PathBuf,
        #[source]
        source: MapError,
    },
}

/// Directory name for a run with the given process id
pub fn rooms_dir_name(pid: u32) -> String {
    format!("{ROOMS_DIR_MARKER}.{pid}")
}

/// Whether the last component of `path` carries the map directory marker
pub fn is_map_dir(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .is_some_and(|name| name.to_string_lossy().contains(ROOMS_DIR_MARKER))
}

/// Create this process's map directory under `root`
pub fn create_rooms_dir(root: impl AsRef<Path>) -> Result<PathBuf, SaveError> {
    let path = root.as_ref().join(rooms_dir_name(std::process::id()));
    match fs::create_dir(&path) {
        Ok(()) => Ok(path),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(SaveError::AlreadyExists(path)),
        Err(e) => Err(e.into()),
    }
}

/// Write one file per room into `dir`, each named after its room
pub fn write_map(map: &Map, dir: impl AsRef<Path>) -> Result<(), SaveError> {
    let dir = dir.as_ref();
    for record in map.to_records() {
        let file = File::create(dir.join(&record.name))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(encode_room(&record).as_bytes())?;
        writer.flush()?;
    }
    info!(dir = %dir.display(), "wrote map");
    Ok(())
}

/// Create a fresh map directory under `root` and write `map` into it
pub fn save_map(map: &Map, root: impl AsRef<Path>) -> Result<PathBuf, SaveError> {
    let dir = create_rooms_dir(root)?;
    write_map(map, &dir)?;
    Ok(dir)
}

/// The most recently modified map directory directly under `root`
pub fn newest_rooms_dir(root: impl AsRef<Path>) -> Result<PathBuf, SaveError> {
    let root = root.as_ref();
    let mut newest: Option<(SystemTime, PathBuf)> = None;

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if !is_map_dir(&path) {
            debug!(path = %path.display(), "skipping directory without marker");
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if newest.as_ref().is_none_or(|(best, _)| modified > *best) {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| SaveError::NoMapDir(root.to_path_buf()))
}

/// Regular files in `dir`, sorted by name. Subdirectories are ignored.
pub fn room_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, SaveError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            warn!(path = %entry.path().display(), "ignoring subdirectory in map directory");
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

/// Read every room file in `dir` and assemble the map
pub fn load_map(dir: impl AsRef<Path>) -> Result<Map, SaveError> {
    let dir = dir.as_ref();
    if !is_map_dir(dir) {
        return Err(SaveError::NotAMapDir(dir.to_path_buf()));
    }

    let files = room_files(dir)?;
    if files.len() < PLAY_ROOMS {
        return Err(SaveError::InsufficientRooms {
            path: dir.to_path_buf(),
            found: files.len(),
        });
    }
    if files.len() > PLAY_ROOMS {
        return Err(SaveError::TooManyRooms {
            path: dir.to_path_buf(),
            found: files.len(),
        });
    }

    let mut records = Vec::with_capacity(PLAY_ROOMS);
    for path in files {
        let text = fs::read_to_string(&path)?;
        let record = decode_room(&text).map_err(|source| SaveError::Format {
            path: path.clone(),
            source,
        })?;
        let file_name = path.file_name().map(|name| name.to_string_lossy());
        if file_name.as_deref() != Some(record.name.as_str()) {
            return Err(SaveError::NameMismatch {
                path,
                name: record.name,
            });
        }
        records.push(record);
    }

    let map = Map::from_records(records).map_err(|source| SaveError::InvalidMap {
        path: dir.to_path_buf(),
        source,
    })?;
    info!(
        dir = %dir.display(),
        start = %map.start().name,
        end = %map.end().name,
        "loaded map"
    );
    Ok(map)
}

/// Find the newest map directory under `root` and load it
pub fn load_newest_map(root: impl AsRef<Path>) -> Result<(PathBuf, Map), SaveError> {
    let dir = newest_rooms_dir(root)?;
    let map = load_map(&dir)?;
    Ok((dir, map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::GameRng;
    use rc_core::dungeon::{RoomRecord, generate_map};
    use std::time::Duration;

    fn sample_map() -> Map {
        generate_map(&mut GameRng::new(2024)).unwrap()
    }

    fn sorted_records(map: &Map) -> Vec<RoomRecord> {
        let mut records = map.to_records();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    fn set_mtime(path: &Path, secs: u64) {
        File::open(path)
            .unwrap()
            .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn test_rooms_dir_name() {
        assert_eq!(rooms_dir_name(4242), "roomcrawl.rooms.4242");
        assert!(is_map_dir("some/where/roomcrawl.rooms.4242"));
        assert!(!is_map_dir("roomcrawl.rooms.1/inner"));
        assert!(!is_map_dir("other.rooms.1"));
    }

    #[test]
    fn test_save_and_load() {
        let root = tempfile::tempdir().unwrap();
        let map = sample_map();

        let dir = save_map(&map, root.path()).unwrap();
        assert!(dir.ends_with(rooms_dir_name(std::process::id())));
        assert_eq!(room_files(&dir).unwrap().len(), PLAY_ROOMS);

        let loaded = load_map(&dir).unwrap();
        assert_eq!(sorted_records(&loaded), sorted_records(&map));
        assert_eq!(loaded.start().name, map.start().name);
        assert_eq!(loaded.end().name, map.end().name);
    }

    #[test]
    fn test_room_file_contents() {
        let root = tempfile::tempdir().unwrap();
        let map = sample_map();
        let dir = save_map(&map, root.path()).unwrap();

        let start = map.start();
        let text = fs::read_to_string(dir.join(&start.name)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("ROOM NAME: {}", start.name));
        assert_eq!(lines.len(), start.degree() + 2);
        for (i, name) in map.neighbor_names(start.id).enumerate() {
            assert_eq!(lines[i + 1], format!("CONNECTION {}: {name}", i + 1));
        }
        assert_eq!(lines[lines.len() - 1], "ROOM TYPE: START_ROOM");
    }

    #[test]
    fn test_create_twice_fails() {
        let root = tempfile::tempdir().unwrap();
        create_rooms_dir(root.path()).unwrap();
        assert!(matches!(
            create_rooms_dir(root.path()),
            Err(SaveError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_load_rejects_unmarked_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("not-a-map");
        fs::create_dir(&dir).unwrap();
        assert!(matches!(load_map(&dir), Err(SaveError::NotAMapDir(_))));
    }

    #[test]
    fn test_load_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(rooms_dir_name(1));
        assert!(matches!(load_map(&dir), Err(SaveError::Io(_))));
    }

    #[test]
    fn test_load_rejects_too_few_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = save_map(&sample_map(), root.path()).unwrap();
        let victim = room_files(&dir).unwrap().remove(0);
        fs::remove_file(victim).unwrap();

        assert!(matches!(
            load_map(&dir),
            Err(SaveError::InsufficientRooms { found, .. }) if found == PLAY_ROOMS - 1
        ));
    }

    #[test]
    fn test_load_rejects_extra_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = save_map(&sample_map(), root.path()).unwrap();
        fs::write(dir.join("notes.txt"), "hello\n").unwrap();

        assert!(matches!(
            load_map(&dir),
            Err(SaveError::TooManyRooms { found, .. }) if found == PLAY_ROOMS + 1
        ));
    }

    #[test]
    fn test_load_ignores_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        let dir = save_map(&sample_map(), root.path()).unwrap();
        fs::create_dir(dir.join("scratch")).unwrap();
        assert!(load_map(&dir).is_ok());
    }

    #[test]
    fn test_load_reports_corrupt_file() {
        let root = tempfile::tempdir().unwrap();
        let map = sample_map();
        let dir = save_map(&map, root.path()).unwrap();
        let path = dir.join(&map.end().name);
        fs::write(&path, format!("ROOM NAME: {}\n", map.end().name)).unwrap();

        match load_map(&dir) {
            Err(SaveError::Format { path: bad, source }) => {
                assert_eq!(bad, path);
                assert_eq!(source, FormatError::TooShort(1));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_renamed_file() {
        let root = tempfile::tempdir().unwrap();
        let map = sample_map();
        let dir = save_map(&map, root.path()).unwrap();
        let name = &map.room(3).name;
        fs::rename(dir.join(name), dir.join("Elsewhere")).unwrap();

        assert!(matches!(
            load_map(&dir),
            Err(SaveError::NameMismatch { name: found, .. }) if &found == name
        ));
    }

    #[test]
    fn test_load_rejects_inconsistent_edit() {
        let root = tempfile::tempdir().unwrap();
        let map = sample_map();
        let dir = save_map(&map, root.path()).unwrap();

        // Drop the last connection from one side only
        let room = map.rooms().iter().find(|room| room.degree() > 0).unwrap();
        let mut record = map.to_records().remove(room.id);
        record.connections.pop();
        fs::write(dir.join(&room.name), encode_room(&record)).unwrap();

        assert!(matches!(
            load_map(&dir),
            Err(SaveError::InvalidMap { .. })
        ));
    }

    #[test]
    fn test_newest_rooms_dir() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            newest_rooms_dir(root.path()),
            Err(SaveError::NoMapDir(_))
        ));

        let older = root.path().join(rooms_dir_name(100));
        let newer = root.path().join(rooms_dir_name(200));
        let unmarked = root.path().join("zzz-latest");
        for dir in [&older, &newer, &unmarked] {
            fs::create_dir(dir).unwrap();
        }
        fs::write(root.path().join("roomcrawl.rooms.file"), "").unwrap();
        set_mtime(&older, 2_000_000);
        set_mtime(&newer, 1_000_000);
        set_mtime(&unmarked, 3_000_000);

        assert_eq!(newest_rooms_dir(root.path()).unwrap(), older);
    }

    #[test]
    fn test_load_newest_map() {
        let root = tempfile::tempdir().unwrap();
        let map = sample_map();
        let dir = save_map(&map, root.path()).unwrap();

        let (found, loaded) = load_newest_map(root.path()).unwrap();
        assert_eq!(found, dir);
        assert_eq!(sorted_records(&loaded), sorted_records(&map));
    }
}
