//! Room file format
//!
//! One room per file, one field per line:
//!
//! ```text
//! ROOM NAME: Loop
//! CONNECTION 1: Pilsen
//! CONNECTION 2: OldTown
//! CONNECTION 3: Chinatown
//! ROOM TYPE: MID_ROOM
//! ```
//!
//! Fields are read by position, and each value is the third
//! whitespace-delimited token of its line. Records with missing lines,
//! wrong labels or an unknown room type are rejected instead of being
//! half-parsed.

use std::str::FromStr;

use thiserror::Error;

use rc_core::MAX_CONNECTIONS;
use rc_core::dungeon::{RoomRecord, RoomRole};

const NAME_LABEL: [&str; 2] = ["ROOM", "NAME:"];
const TYPE_LABEL: [&str; 2] = ["ROOM", "TYPE:"];
const CONNECTION_LABEL: &str = "CONNECTION";

/// Room record parse errors. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("room record has {0} lines, need at least 2")]
    TooShort(usize),

    #[error("line {line}: expected `{expected}`, found `{found}`")]
    BadLabel {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: expected exactly one value after the label")]
    BadValue { line: usize },

    #[error("line {line}: unknown room type `{token}`")]
    UnknownRole { line: usize, token: String },

    #[error("room record lists {0} connections, at most {max} allowed", max = MAX_CONNECTIONS)]
    TooManyConnections(usize),
}

/// Serialize one room record
pub fn encode_room(record: &RoomRecord) -> String {
    let mut out = format!("{} {}\n", NAME_LABEL.join(" "), record.name);
    for (i, connection) in record.connections.iter().enumerate() {
        out.push_str(&format!("{CONNECTION_LABEL} {}: {connection}\n", i + 1));
    }
    out.push_str(&format!("{} {}\n", TYPE_LABEL.join(" "), record.role));
    out
}

/// Parse one room record
pub fn decode_room(text: &str) -> Result<RoomRecord, FormatError> {
    let lines: Vec<&str> = text.lines().collect();
    let [first, middle @ .., last] = lines.as_slice() else {
        return Err(FormatError::TooShort(lines.len()));
    };
    if middle.len() > MAX_CONNECTIONS {
        return Err(FormatError::TooManyConnections(middle.len()));
    }

    let name = field(*first, 1, &NAME_LABEL)?;

    let mut connections = Vec::with_capacity(middle.len());
    for (i, line) in middle.iter().enumerate() {
        let number = format!("{}:", i + 1);
        let neighbor = field(line, i + 2, &[CONNECTION_LABEL, number.as_str()])?;
        connections.push(neighbor.to_string());
    }

    let role_line = lines.len();
    let token = field(*last, role_line, &TYPE_LABEL)?;
    let role = RoomRole::from_str(token).map_err(|_| FormatError::UnknownRole {
        line: role_line,
        token: token.to_string(),
    })?;

    Ok(RoomRecord::new(name, role, connections))
}

/// The value of a `<label> <label> <value>` line
fn field<'t>(line: &'t str, number: usize, label: &[&str]) -> Result<&'t str, FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.get(..label.len()) != Some(label) {
        return Err(FormatError::BadLabel {
            line: number,
            expected: label.join(" "),
            found: line.trim().to_string(),
        });
    }
    match tokens[label.len()..] {
        [value] => Ok(value),
        _ => Err(FormatError::BadValue { line: number }),
    }
}
