//! Traversal state machine
//!
//! The navigator starts in the start room and moves along connections named
//! by the player until it stands in the end room. Unknown names leave the
//! state untouched. The `time` keyword runs the clock side task and never
//! counts as a step.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, info};

use crate::TIME_KEYWORD;
use crate::clock::{ClockError, TimeKeeper};
use crate::dungeon::Map;

/// Errors that end a traversal early. All of them are fatal.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error("input ended before the end room was reached")]
    InputClosed,
}

/// Result of feeding one room name to the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved into room `to`
    Moved { to: usize },
    /// The name is not a connection of the current room
    Unknown,
    /// The end room was already reached; input is ignored
    Finished,
}

/// A completed traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    /// Room the traversal began in
    pub start: usize,
    /// Rooms entered, in order. The start room is not included.
    pub path: Vec<usize>,
}

impl Journey {
    pub fn steps(&self) -> usize {
        self.path.len()
    }

    /// Names of every room visited, start room first
    pub fn room_names<'m>(&self, map: &'m Map) -> Vec<&'m str> {
        std::iter::once(self.start)
            .chain(self.path.iter().copied())
            .map(|id| map.room(id).name.as_str())
            .collect()
    }
}

#[derive(Debug)]
pub struct Navigator<'a> {
    map: &'a Map,
    current: usize,
    path: Vec<usize>,
    finished: bool,
}

impl<'a> Navigator<'a> {
    pub fn new(map: &'a Map) -> Self {
        Self {
            map,
            current: map.start_index(),
            path: Vec::new(),
            finished: false,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Try to move along the connection named `input`
    pub fn step(&mut self, input: &str) -> StepOutcome {
        if self.finished {
            return StepOutcome::Finished;
        }

        let room = self.map.room(self.current);
        let Some(to) = room
            .neighbors
            .iter()
            .copied()
            .find(|&id| self.map.room(id).name == input)
        else {
            debug!(room = %room.name, input, "unknown connection");
            return StepOutcome::Unknown;
        };

        self.path.push(to);
        self.current = to;
        if to == self.map.end_index() {
            self.finished = true;
        }
        StepOutcome::Moved { to }
    }

    /// The journey so far
    pub fn journey(&self) -> Journey {
        Journey {
            start: self.map.start_index(),
            path: self.path.clone(),
        }
    }

    /// Drive the console protocol until the end room is reached, then print
    /// the summary.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
        clock: &TimeKeeper,
    ) -> Result<Journey, NavError> {
        let mut tokens = Tokens::new(input);

        while !self.finished {
            self.show_room(&mut output)?;
            loop {
                write!(output, "WHERE TO? >")?;
                output.flush()?;
                let token = tokens.next_token()?.ok_or(NavError::InputClosed)?;
                writeln!(output)?;

                if token == TIME_KEYWORD {
                    let now = clock.tell_time()?;
                    writeln!(output, "{now}")?;
                    writeln!(output)?;
                    continue;
                }
                if self.step(&token) == StepOutcome::Unknown {
                    writeln!(output, "HUH? I DON'T UNDERSTAND THAT ROOM. TRY AGAIN.")?;
                    writeln!(output)?;
                }
                break;
            }
        }

        let journey = self.journey();
        info!(steps = journey.steps(), "reached the end room");
        self.show_summary(&journey, &mut output)?;
        Ok(journey)
    }

    fn show_room<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let room = self.map.room(self.current);
        let connections: Vec<&str> = self.map.neighbor_names(self.current).collect();
        writeln!(output, "CURRENT LOCATION: {}", room.name)?;
        writeln!(output, "POSSIBLE CONNECTIONS: {}.", connections.join(", "))
    }

    fn show_summary<W: Write>(&self, journey: &Journey, output: &mut W) -> io::Result<()> {
        writeln!(output, "YOU HAVE FOUND THE END ROOM. CONGRATULATIONS!")?;
        writeln!(
            output,
            "YOU TOOK {} STEPS. YOUR PATH TO VICTORY WAS:",
            journey.steps()
        )?;
        for name in journey.room_names(self.map) {
            writeln!(output, "{name}")?;
        }
        output.flush()
    }
}

/// Splits console input into whitespace-delimited tokens
struct Tokens<R> {
    input: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            // Raw bytes: invalid UTF-8 becomes an unknown room, not an error
            let mut line = Vec::new();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(
                String::from_utf8_lossy(&line)
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
    }
}
