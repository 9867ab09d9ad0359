// SPDX-License-Identifier: MIT OR Apache-2.0

//! SGF (Smart Game Format) parsing and generation
//!
//! The parser makes one forward pass over the text. It keeps the path of the
//! node most recently completed, and a stack of such paths: `(` saves the
//! current one, `)` returns to it, so a variation's continuation is attached
//! to the node it branched from even though SGF writes it later in the file.

use crate::{
    meta::{format_dates, parse_dates},
    Color, Coord, GameError, Move, NodePath, Result, RunningGame,
};
use std::io::{BufRead, Write};

/// One property as read from a node: identifier and raw (unescaped) value
#[derive(Debug, Clone, PartialEq)]
struct Property {
    id: String,
    value: String,
}

/// Reads SGF text into a [`RunningGame`]
///
/// Field-level problems (a komi that is not a number, an unreadable date)
/// do not stop parsing; they are logged and kept in [`SgfParser::warnings`].
#[derive(Debug, Default)]
pub struct SgfParser {
    warnings: Vec<GameError>,
}

impl SgfParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Problems recovered from during the last parse
    pub fn warnings(&self) -> &[GameError] {
        &self.warnings
    }

    /// Parse an SGF string
    pub fn parse_str(&mut self, text: &str) -> Result<RunningGame> {
        self.parse_reader(text.as_bytes())
    }

    /// Parse SGF text from a buffered reader, line by line
    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<RunningGame> {
        let mut state = ParseState::default();

        'lines: for line in reader.lines() {
            let line = line.map_err(GameError::Read)?;
            state.line += 1;
            for c in line.chars() {
                state.feed(c)?;
                if state.ignore_rest {
                    break 'lines;
                }
            }
            state.end_of_line();
        }

        let game = state.finish()?;
        self.warnings = state.warnings;
        Ok(game)
    }
}

/// Parse an SGF string, discarding recovered warnings
pub fn parse_str(text: &str) -> Result<RunningGame> {
    SgfParser::new().parse_str(text)
}

/// Parse SGF text from a reader, discarding recovered warnings
pub fn parse_reader<R: BufRead>(reader: R) -> Result<RunningGame> {
    SgfParser::new().parse_reader(reader)
}

#[derive(Debug, Default)]
struct ParseState {
    game: RunningGame,
    /// Node most recently completed
    parent: NodePath,
    /// Saved `parent` values of the open variations
    stack: Vec<NodePath>,
    /// Properties of the node being read
    node: Option<Vec<Property>>,
    ident: String,
    prop_id: String,
    value: String,
    in_value: bool,
    escaped: bool,
    started: bool,
    finished: bool,
    ignore_rest: bool,
    line: usize,
    warnings: Vec<GameError>,
}

impl ParseState {
    fn feed(&mut self, c: char) -> Result<()> {
        if self.in_value {
            self.feed_value(c);
            return Ok(());
        }

        if !self.started || self.finished {
            return self.feed_outside_tree(c);
        }

        match c {
            '(' => {
                self.flush_node()?;
                self.ident.clear();
                self.stack.push(self.parent.clone());
                tracing::trace!(parent = %self.parent, depth = self.stack.len(), "variation opened");
            }
            ')' => {
                self.flush_node()?;
                self.ident.clear();
                self.parent = self
                    .stack
                    .pop()
                    .ok_or(GameError::MalformedVariation { line: self.line })?;
                tracing::trace!(parent = %self.parent, depth = self.stack.len(), "variation closed");
                if self.stack.is_empty() {
                    self.finished = true;
                }
            }
            ';' => {
                self.flush_node()?;
                self.ident.clear();
                self.node = Some(Vec::new());
            }
            '[' => {
                if !self.ident.is_empty() {
                    self.prop_id = std::mem::take(&mut self.ident);
                }
                self.value.clear();
                self.in_value = true;
            }
            c if c.is_ascii_uppercase() => self.ident.push(c),
            // Lowercase letters of long FF[3] identifiers, whitespace
            _ => {}
        }
        Ok(())
    }

    /// Text before the game tree is skipped. After it, a stray `)` is an
    /// error and anything else (a second game of a collection) ends reading.
    fn feed_outside_tree(&mut self, c: char) -> Result<()> {
        match c {
            ')' => return Err(GameError::MalformedVariation { line: self.line }),
            '(' if !self.started => {
                self.started = true;
                self.stack.push(self.parent.clone());
            }
            c if self.finished && !c.is_whitespace() => {
                tracing::warn!(line = self.line, "only the first game tree is read");
                self.ignore_rest = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn feed_value(&mut self, c: char) {
        if self.escaped {
            self.value.push(c);
            self.escaped = false;
            return;
        }
        match c {
            '\\' => self.escaped = true,
            ']' => {
                self.in_value = false;
                let property = Property {
                    id: self.prop_id.clone(),
                    value: std::mem::take(&mut self.value),
                };
                self.node.get_or_insert_with(Vec::new).push(property);
            }
            _ => self.value.push(c),
        }
    }

    fn end_of_line(&mut self) {
        if self.in_value {
            if self.escaped {
                // Escaped line break: a soft break, dropped
                self.escaped = false;
            } else {
                self.value.push('\n');
            }
        }
    }

    fn finish(&mut self) -> Result<RunningGame> {
        if self.in_value {
            return Err(GameError::UnterminatedValue);
        }
        if !self.started {
            tracing::warn!("input holds no game tree");
        } else if !self.finished {
            return Err(GameError::UnbalancedParentheses {
                depth: self.stack.len(),
            });
        }

        let mut game = std::mem::take(&mut self.game);
        append_resignation(&mut game)?;

        let main_line = game.main_line_end();
        game.set_played_line(main_line)?;
        Ok(game)
    }

    fn warn(&mut self, warning: GameError) {
        tracing::warn!(line = self.line, "{}", warning);
        self.warnings.push(warning);
    }

    fn parse_number<T: std::str::FromStr>(&mut self, property: &Property) -> Option<T> {
        match property.value.trim().parse() {
            Ok(n) => Some(n),
            Err(_) => {
                self.warn(GameError::UnparsableNumericProperty {
                    id: property.id.clone(),
                    value: property.value.clone(),
                });
                None
            }
        }
    }

    /// Apply the properties of the node just finished
    ///
    /// Game information comes first so that `SZ` is known before a move in
    /// the same node is decoded; per-move annotations come last so they land
    /// on the move of their own node.
    fn flush_node(&mut self) -> Result<()> {
        let Some(mut properties) = self.node.take() else {
            return Ok(());
        };
        // Every property used here is single-valued: the first value counts
        let mut seen = std::collections::HashSet::new();
        properties.retain(|p| seen.insert(p.id.clone()));

        for property in &properties {
            self.apply_game_info(property)?;
        }

        let mv = properties
            .iter()
            .find_map(|p| color_of_move_property(&p.id).map(|color| (color, p)));
        if let Some((color, property)) = mv {
            let action = decode_move(&property.value, self.game.board_size())?;
            let index = self.game.record_move(action, &self.parent, Some(color))?;
            self.parent.push(index);
        }

        for property in &properties {
            self.apply_annotation(property)?;
        }
        Ok(())
    }

    fn apply_game_info(&mut self, property: &Property) -> Result<()> {
        let value = property.value.trim();
        match property.id.as_str() {
            "GM" => {
                if value != "1" {
                    return Err(GameError::UnsupportedGameType(value.to_string()));
                }
            }
            "SZ" => {
                if let Some(size) = self.parse_number::<u8>(property) {
                    if let Err(e) = self.game.set_board_size(size) {
                        self.warn(e);
                    }
                }
            }
            "KM" => {
                if let Some(komi) = self.parse_number::<f32>(property) {
                    self.game.meta_mut().komi = komi;
                }
            }
            "HA" => {
                if let Some(handicap) = self.parse_number::<u8>(property) {
                    self.game.meta_mut().handicap = handicap;
                }
            }
            "PB" => self.game.meta_mut().black_name = value.to_string(),
            "PW" => self.game.meta_mut().white_name = value.to_string(),
            "BR" => self.game.meta_mut().black_rank = value.to_string(),
            "WR" => self.game.meta_mut().white_rank = value.to_string(),
            "RE" => self.game.meta_mut().result = value.to_string(),
            "DT" => match parse_dates(value) {
                Some(dates) => self.game.meta_mut().dates = dates,
                None => self.warn(GameError::UnparsableNumericProperty {
                    id: property.id.clone(),
                    value: property.value.clone(),
                }),
            },
            // Rules and time settings are recognized but not stored
            "RU" | "TM" | "OT" => {
                tracing::trace!(id = %property.id, value, "reserved property skipped");
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_annotation(&mut self, property: &Property) -> Result<()> {
        let id = property.id.as_str();
        if !matches!(id, "BL" | "WL" | "OB" | "OW" | "C") {
            return Ok(());
        }

        if self.parent.is_empty() {
            if id == "C" {
                self.game.meta_mut().comment = Some(property.value.clone());
            } else {
                tracing::debug!(id, "timing property on the root node skipped");
            }
            return Ok(());
        }

        match id {
            "BL" | "WL" => {
                if let Some(seconds) = self.parse_number::<f64>(property) {
                    let node = self.game.get_node_mut(&self.parent)?;
                    node.clock_remaining_millis = Some((seconds * 1000.0).round() as i64);
                }
            }
            "OB" | "OW" => {
                if let Some(periods) = self.parse_number::<i8>(property) {
                    let node = self.game.get_node_mut(&self.parent)?;
                    node.overtime_periods_remaining = Some(periods);
                }
            }
            _ => {
                let node = self.game.get_node_mut(&self.parent)?;
                node.comment = Some(property.value.clone());
            }
        }
        Ok(())
    }
}

fn color_of_move_property(id: &str) -> Option<Color> {
    match id {
        "B" => Some(Color::Black),
        "W" => Some(Color::White),
        _ => None,
    }
}

/// Close a game won by resignation with an explicit resign node
fn append_resignation(game: &mut RunningGame) -> Result<()> {
    let Some(loser) = game.meta().resigned_color() else {
        return Ok(());
    };
    let end = game.main_line_end();
    if game.get_node(&end)?.is_resign() {
        return Ok(());
    }
    game.record_move(Move::Resign, &end, Some(loser))?;
    Ok(())
}

/// Letter for a board index: `0` is `a`
fn index_letter(index: u8) -> Option<char> {
    b'a'
        .checked_add(index)
        .filter(u8::is_ascii_lowercase)
        .map(char::from)
}

/// Board index for a letter, if it is a lowercase ASCII letter
fn letter_index(letter: char) -> Option<u8> {
    if letter.is_ascii_lowercase() {
        Some(letter as u8 - b'a')
    } else {
        None
    }
}

/// Decode a `B`/`W` value for a board of the given size
///
/// An empty value, or the letter one past the last column written twice, is
/// a pass. Anything else must be two letters inside the board.
pub fn decode_move(value: &str, board_size: u8) -> Result<Move> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Move::Pass);
    }

    let letters: Vec<char> = value.chars().collect();
    if let Some(pass) = index_letter(board_size) {
        if letters == [pass, pass] {
            return Ok(Move::Pass);
        }
    }

    let index = |i: usize| {
        letters
            .get(i)
            .and_then(|&c| letter_index(c))
            .map_or(u32::MAX, u32::from)
    };
    let (x, y) = (index(0), index(1));
    if letters.len() != 2 || x >= board_size.into() || y >= board_size.into() {
        return Err(GameError::InvalidPosition { x, y, board_size });
    }
    Ok(Move::Place(Coord::new(x as u8, y as u8)))
}

/// Encode a board coordinate as two letters
///
/// Fails for indices past `z`, which no board up to
/// [`MAX_BOARD_SIZE`](crate::tree::MAX_BOARD_SIZE) can hold.
pub fn encode_coord(coord: Coord) -> Result<String> {
    match (index_letter(coord.x), index_letter(coord.y)) {
        (Some(x), Some(y)) => Ok([x, y].iter().collect()),
        _ => Err(GameError::InvalidPosition {
            x: coord.x.into(),
            y: coord.y.into(),
            board_size: crate::tree::MAX_BOARD_SIZE,
        }),
    }
}

/// Escape a text value for writing inside brackets
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ']' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_property(out: &mut String, id: &str, value: &str) {
    out.push_str(id);
    out.push('[');
    out.push_str(&escape(value));
    out.push(']');
}

/// Generate the SGF text of a game
pub fn to_sgf_string(game: &RunningGame) -> String {
    let mut sgf = String::from("(;");
    write_root_properties(&mut sgf, game);
    write_variations(&mut sgf, game, game.root().children());
    sgf.push(')');
    sgf
}

/// Write the SGF text of a game to `out`
pub fn write_sgf<W: Write>(game: &RunningGame, mut out: W) -> std::io::Result<()> {
    out.write_all(to_sgf_string(game).as_bytes())?;
    out.flush()
}

fn write_root_properties(sgf: &mut String, game: &RunningGame) {
    let meta = game.meta();
    sgf.push_str("GM[1]FF[4]");
    sgf.push_str(&format!("SZ[{}]KM[{}]", meta.board_size(), meta.komi));
    if meta.handicap > 0 {
        sgf.push_str(&format!("HA[{}]", meta.handicap));
    }

    for (id, value) in [
        ("PB", &meta.black_name),
        ("PW", &meta.white_name),
        ("BR", &meta.black_rank),
        ("WR", &meta.white_rank),
    ] {
        if !value.is_empty() {
            push_property(sgf, id, value);
        }
    }
    if !meta.dates.is_empty() {
        push_property(sgf, "DT", &format_dates(&meta.dates));
    }
    if !meta.result.is_empty() {
        push_property(sgf, "RE", &meta.result);
    }
    if let Some(comment) = &meta.comment {
        push_property(sgf, "C", comment);
    }
}

/// Write the subtrees hanging off one node
///
/// A single continuation is written inline; two or more are each wrapped in
/// parentheses. Resign nodes are left out, `RE` brings them back on reading.
fn write_variations(sgf: &mut String, game: &RunningGame, children: &[crate::NodeId]) {
    let mut children: Vec<_> = children
        .iter()
        .filter_map(|&id| game.node(id))
        .filter(|node| !node.is_resign())
        .collect();

    // Resign nodes are dropped before counting siblings, so a variation
    // beside a resignation is written inline and reads back as the main line
    // Follow single continuations iteratively; long games are deep
    while children.len() == 1 {
        let node = children[0];
        write_move(sgf, node);
        children = node
            .children()
            .iter()
            .filter_map(|&id| game.node(id))
            .filter(|node| !node.is_resign())
            .collect();
    }

    for node in children {
        sgf.push('(');
        write_move(sgf, node);
        write_variations(sgf, game, node.children());
        sgf.push(')');
    }
}

fn write_move(sgf: &mut String, node: &crate::MoveNode) {
    let (Some(action), Some(color)) = (node.action(), node.color()) else {
        return;
    };
    let coord = match action {
        Move::Place(coord) => match encode_coord(coord) {
            Ok(letters) => letters,
            Err(e) => {
                tracing::error!("move left out of SGF text: {}", e);
                return;
            }
        },
        Move::Pass => String::new(),
        Move::Resign => return,
    };

    sgf.push(';');
    sgf.push(color.sgf_letter());
    sgf.push('[');
    sgf.push_str(&coord);
    sgf.push(']');

    let (time_id, periods_id) = match color {
        Color::Black => ("BL", "OB"),
        Color::White => ("WL", "OW"),
    };
    if let Some(millis) = node.clock_remaining_millis {
        sgf.push_str(&format!("{}[{}]", time_id, millis as f64 / 1000.0));
    }
    if let Some(periods) = node.overtime_periods_remaining {
        sgf.push_str(&format!("{}[{}]", periods_id, periods));
    }
    if let Some(comment) = &node.comment {
        push_property(sgf, "C", comment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_move_letters() {
        assert_eq!(decode_move("ab", 9).unwrap(), Move::Place(Coord::new(0, 1)));
        assert_eq!(decode_move("", 9).unwrap(), Move::Pass);
        assert_eq!(decode_move("jj", 9).unwrap(), Move::Pass);
        assert_eq!(decode_move("tt", 19).unwrap(), Move::Pass);
    }

    #[test]
    fn test_decode_move_rejects_off_board_letters() {
        assert!(matches!(
            decode_move("tt", 9),
            Err(GameError::InvalidPosition { x: 19, y: 19, board_size: 9 })
        ));
        assert!(matches!(decode_move("a", 9), Err(GameError::InvalidPosition { .. })));
        assert!(matches!(decode_move("AB", 9), Err(GameError::InvalidPosition { .. })));
    }

    #[test]
    fn test_escape_brackets_and_backslashes() {
        assert_eq!(escape(r"a]b\c"), r"a\]b\\c");
        assert_eq!(encode_coord(Coord::new(2, 7)).unwrap(), "ch");
    }

    #[test]
    fn test_letters_stop_at_z() {
        assert_eq!(index_letter(0), Some('a'));
        assert_eq!(index_letter(25), Some('z'));
        assert_eq!(index_letter(26), None);
        assert_eq!(index_letter(200), None);
        assert!(matches!(
            encode_coord(Coord::new(26, 0)),
            Err(GameError::InvalidPosition { x: 26, y: 0, .. })
        ));
        assert!(encode_coord(Coord::new(170, 0)).is_err());
    }

    #[test]
    fn test_largest_board_round_trips() {
        let mut game = RunningGame::with_board_size(25).unwrap();
        game.play_move(Move::Place(Coord::new(24, 24)), Default::default()).unwrap();
        game.play_move(Move::Pass, Default::default()).unwrap();

        let text = to_sgf_string(&game);
        assert!(text.contains(";B[yy];W[]"), "{}", text);
        let reloaded = parse_str(&text).unwrap();
        assert_eq!(reloaded.board_size(), 25);
        assert_eq!(to_sgf_string(&reloaded), text);
        assert_eq!(decode_move("zz", 25).unwrap(), Move::Pass);
    }

    #[test]
    fn test_lowercase_long_identifiers_fold_to_short_ones() {
        let game = parse_str("(;GaMe[1]SiZe[9];Black[cc])").unwrap();
        assert_eq!(game.board_size(), 9);
        assert_eq!(game.node_count(), 2);
    }
}
