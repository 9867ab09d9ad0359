// SPDX-License-Identifier: MIT OR Apache-2.0

//! sgfgo Core - Game Records, Rules and SGF
//!
//! This crate provides the core game functionality including:
//! - A branching, path-addressed record of a Go game
//! - Legality checking and capture computation
//! - SGF (Smart Game Format) parsing and generation
//! - Saving and loading `.sgf` files

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod archiver;
pub mod board;
pub mod clock;
pub mod config;
pub mod meta;
pub mod rules;
pub mod sgf;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub use meta::GameMetaInformation;
pub use rules::Outcome;
pub use tree::{MoveNode, NodeId, NodePath, RunningGame, Timing};

/// Default board size when a game does not specify one
pub const DEFAULT_BOARD_SIZE: u8 = 19;

/// Player color in a Go game (Black or White)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Black player (traditionally goes first)
    Black,
    /// White player
    White,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// The SGF property letter for a move of this color
    pub fn sgf_letter(&self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

/// Board coordinate representing a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column)
    pub x: u8,
    /// Y coordinate (row)
    pub y: u8,
}

impl Coord {
    /// Create a new coordinate
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Check if coordinate is valid for a board of given size
    pub fn is_valid(&self, board_size: u8) -> bool {
        self.x < board_size && self.y < board_size
    }
}

/// Represents a move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Place a stone at the specified coordinate
    Place(Coord),
    /// Pass the turn
    Pass,
    /// Resign the game
    Resign,
}

impl Move {
    /// The kind of action, without its payload
    pub fn action_type(&self) -> ActionType {
        match self {
            Move::Place(_) => ActionType::Move,
            Move::Pass => ActionType::Pass,
            Move::Resign => ActionType::Resign,
        }
    }

    /// Where this action sits relative to the board
    pub fn position(&self) -> Position {
        match self {
            Move::Place(coord) => Position::OnBoard(*coord),
            Move::Pass => Position::Pass,
            Move::Resign => Position::Nowhere,
        }
    }
}

/// Action kind recorded by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Move,
    Pass,
    Resign,
}

/// Location of an action relative to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// An intersection inside the board
    OnBoard(Coord),
    /// Just off the board; a pass
    Pass,
    /// No position at all; a resignation
    Nowhere,
}

impl Position {
    /// Legacy numeric form of a pass: one step past the last row and column
    pub fn pass_sentinel(board_size: u8) -> Coord {
        Coord::new(board_size, board_size)
    }

    /// The on-board coordinate, if any
    pub fn coord(&self) -> Option<Coord> {
        match self {
            Position::OnBoard(coord) => Some(*coord),
            _ => None,
        }
    }
}

/// Errors that can occur while recording, checking or persisting a game
#[derive(Debug, Error)]
pub enum GameError {
    /// A node path does not resolve to a node in the tree
    #[error("no node at path {0}")]
    InvalidPath(NodePath),

    /// A candidate position lies outside the board
    #[error("position ({x}, {y}) is outside a {board_size}x{board_size} board")]
    InvalidPosition { x: u32, y: u32, board_size: u8 },

    /// The SGF file describes a game other than Go
    #[error("unsupported game type GM[{0}]")]
    UnsupportedGameType(String),

    /// A ')' appeared without a matching '('
    #[error("unmatched ')' on line {line}")]
    MalformedVariation { line: usize },

    /// The input ended while variations were still open
    #[error("input ended with {depth} unclosed variation(s)")]
    UnbalancedParentheses { depth: usize },

    /// The input ended inside a bracketed property value
    #[error("input ended inside a property value")]
    UnterminatedValue,

    /// A numeric property could not be parsed; the field keeps its old value
    #[error("could not parse {id}[{value}] as a number")]
    UnparsableNumericProperty { id: String, value: String },

    /// Board sizes must lie between 1 and 25
    #[error("unsupported board size {0}")]
    InvalidBoardSize(u8),

    /// The board size cannot change once a move has been recorded
    #[error("board size cannot change after the first move")]
    BoardSizeLocked,

    /// Reading SGF text from a stream failed
    #[error("failed to read game record: {0}")]
    Read(#[source] std::io::Error),

    /// A game file or its directory could not be created, written or read
    #[error("storage unavailable at {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type used throughout the core crate
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_positions() {
        let mv = Move::Place(Coord::new(2, 3));
        assert_eq!(mv.action_type(), ActionType::Move);
        assert_eq!(mv.position().coord(), Some(Coord::new(2, 3)));
        assert_eq!(Move::Pass.position(), Position::Pass);
        assert_eq!(Move::Resign.position().coord(), None);
    }

    #[test]
    fn test_pass_sentinel_is_just_off_the_board() {
        let sentinel = Position::pass_sentinel(9);
        assert_eq!(sentinel, Coord::new(9, 9));
        assert!(!sentinel.is_valid(9));
        assert!(Coord::new(8, 8).is_valid(9));
    }
}
