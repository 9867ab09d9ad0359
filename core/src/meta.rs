// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-game information: board size, komi, players, result and dates

use crate::{tree::MAX_BOARD_SIZE, Color, GameError, Result, DEFAULT_BOARD_SIZE};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Game-level data that is constant or changes rarely over a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetaInformation {
    /// Size of the board (typically 9, 13, or 19)
    #[serde(deserialize_with = "deserialize_board_size")]
    board_size: u8,
    /// Compensation points for White
    pub komi: f32,
    pub black_name: String,
    pub white_name: String,
    pub black_rank: String,
    pub white_rank: String,
    /// Result in SGF notation, e.g. `B+R` or `W+3.5`
    pub result: String,
    /// Dates the game was played on
    pub dates: Vec<NaiveDate>,
    /// Stones captured by Black
    pub black_prisoners: u32,
    /// Stones captured by White
    pub white_prisoners: u32,
    pub handicap: u8,
    /// Comment attached to the game as a whole
    pub comment: Option<String>,
}

/// Check that a board size lies between 1 and [`MAX_BOARD_SIZE`]
pub fn check_board_size(size: u8) -> Result<()> {
    if size == 0 || size > MAX_BOARD_SIZE {
        return Err(GameError::InvalidBoardSize(size));
    }
    Ok(())
}

fn deserialize_board_size<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let size = u8::deserialize(deserializer)?;
    check_board_size(size).map_err(serde::de::Error::custom)?;
    Ok(size)
}

impl Default for GameMetaInformation {
    fn default() -> Self {
        Self::with_checked_size(DEFAULT_BOARD_SIZE)
    }
}

impl GameMetaInformation {
    /// Create game information for a board of the given size
    ///
    /// Fails with [`GameError::InvalidBoardSize`] unless the size lies
    /// between 1 and [`MAX_BOARD_SIZE`].
    pub fn new(board_size: u8) -> Result<Self> {
        check_board_size(board_size)?;
        Ok(Self::with_checked_size(board_size))
    }

    fn with_checked_size(board_size: u8) -> Self {
        Self {
            board_size,
            komi: 0.0,
            black_name: String::new(),
            white_name: String::new(),
            black_rank: String::new(),
            white_rank: String::new(),
            result: String::new(),
            dates: Vec::new(),
            black_prisoners: 0,
            white_prisoners: 0,
            handicap: 0,
            comment: None,
        }
    }

    /// Size of the board
    pub fn board_size(&self) -> u8 {
        self.board_size
    }

    /// Change the board size; only `RunningGame` knows whether moves exist,
    /// so the locking check lives there.
    pub(crate) fn set_board_size_unchecked(&mut self, size: u8) {
        self.board_size = size;
    }

    /// Prisoners captured by the given color
    pub fn prisoners(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black_prisoners,
            Color::White => self.white_prisoners,
        }
    }

    pub(crate) fn set_prisoners(&mut self, color: Color, count: u32) {
        match color {
            Color::Black => self.black_prisoners = count,
            Color::White => self.white_prisoners = count,
        }
    }

    /// Name of the player with the given color
    pub fn player_name(&self, color: Color) -> &str {
        match color {
            Color::Black => &self.black_name,
            Color::White => &self.white_name,
        }
    }

    /// The color that resigned, if the result says the game ended by resignation
    pub fn resigned_color(&self) -> Option<Color> {
        let (winner, reason) = self.result.trim().split_once('+')?;
        let by_resignation =
            reason.eq_ignore_ascii_case("R") || reason.eq_ignore_ascii_case("Resign");
        if !by_resignation {
            return None;
        }
        match winner {
            "B" => Some(Color::White),
            "W" => Some(Color::Black),
            _ => None,
        }
    }
}

/// Parse an SGF `DT` value into a list of dates
///
/// Accepts comma separated `YYYY-MM-DD` entries and the SGF shortcuts `MM-DD`
/// and `DD`, which inherit the year (and month) of the entry before them.
pub fn parse_dates(value: &str) -> Option<Vec<NaiveDate>> {
    let mut dates = Vec::new();
    let mut last: Option<NaiveDate> = None;

    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let fields: Vec<&str> = part.split('-').collect();
        let numbers = fields
            .iter()
            .map(|f| f.parse::<u32>().ok())
            .collect::<Option<Vec<u32>>>()?;

        let date = match (numbers.as_slice(), last, fields[0].len()) {
            ([y, m, d], _, 4) => NaiveDate::from_ymd_opt(*y as i32, *m, *d)?,
            ([m, d], Some(prev), 2) => NaiveDate::from_ymd_opt(prev.year(), *m, *d)?,
            ([d], Some(prev), 2) => NaiveDate::from_ymd_opt(prev.year(), prev.month(), *d)?,
            _ => return None,
        };
        dates.push(date);
        last = Some(date);
    }

    Some(dates)
}

/// Format dates as a `DT` value with every entry written out in full
pub fn format_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<Vec<_>>()
        .join(",")
}
