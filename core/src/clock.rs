// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary to the game clock
//!
//! The core never runs a countdown. Whoever keeps time is handed to
//! [`rules::submit_move`](crate::rules::submit_move) and asked for a
//! snapshot for the mover; the snapshot is stored on the new node verbatim.

use crate::{Color, Timing};

/// Source of clock readings at the moment a move is committed
pub trait TimeKeeper {
    /// Time and overtime left for `color`
    fn snapshot(&self, color: Color) -> Timing;
}

/// No clock: moves carry no timing information
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl TimeKeeper for NoClock {
    fn snapshot(&self, _color: Color) -> Timing {
        Timing::default()
    }
}

/// Fixed per-color readings, e.g. when transcribing a game from paper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedTime {
    pub black: Timing,
    pub white: Timing,
}

impl TimeKeeper for FixedTime {
    fn snapshot(&self, color: Color) -> Timing {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}
