//! Fixed sizes and names shared by the generator, the file format and the
//! navigator.

/// Number of rooms in every generated map
pub const PLAY_ROOMS: usize = 7;

/// Degree bounds for a room (inclusive on both ends)
pub const MIN_CONNECTIONS: usize = 3;
pub const MAX_CONNECTIONS: usize = 6;

/// Candidate room names. Names must not contain whitespace: the file
/// format takes the third whitespace-delimited token of each line.
pub const ROOM_NAMES: [&str; 10] = [
    "Lakeview",
    "Wrigleyville",
    "Edgewater",
    "OldTown",
    "Loop",
    "SLoop",
    "Lincoln_Park",
    "Wicker_Park",
    "Pilsen",
    "Chinatown",
];

const _: () = assert!(ROOM_NAMES.len() >= PLAY_ROOMS);
const _: () = assert!(MIN_CONNECTIONS <= MAX_CONNECTIONS && MAX_CONNECTIONS < PLAY_ROOMS);

/// Marker every map directory name must contain; directories are created
/// as `<marker>.<pid>`.
pub const ROOMS_DIR_MARKER: &str = "roomcrawl.rooms";

/// Navigator input that triggers the clock side task instead of a move
pub const TIME_KEYWORD: &str = "time";

/// Side file the clock worker writes
pub const TIME_FILE: &str = "currentTime.txt";

/// Upper bound on connection attempts before generation gives up
pub const MAX_GENERATION_ATTEMPTS: usize = 10_000;
