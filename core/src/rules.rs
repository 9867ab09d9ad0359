// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game rules and validation logic
//!
//! Everything here is a plain function over a [`RunningGame`]. No grid is
//! stored between calls: the position at a node is rebuilt by replaying the
//! placements on the way from the root, resolving captures after each one.

use crate::{
    board::Board, clock::TimeKeeper, Color, Coord, GameError, Move, NodePath, Result, RunningGame,
};
use std::collections::HashSet;

/// Classification of a candidate action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The action may be recorded
    Legal,
    /// The target intersection already holds a stone
    Occupied,
    /// The placed group would have no liberty and captures nothing
    Suicide,
    /// The game is over; reported by callers from [`is_game_end`], never
    /// by [`check_action`]
    End,
}

/// Find all stones in a group connected to the stone at coord
pub fn find_group(board: &Board, coord: Coord) -> Vec<Coord> {
    let target_color = match board.get(coord) {
        Some(color) => color,
        None => return Vec::new(),
    };

    let mut group = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = vec![coord];

    while let Some(current) = queue.pop() {
        if !visited.insert(current) {
            continue;
        }
        group.push(current);

        for neighbor in board.adjacent_coords(current) {
            if board.get(neighbor) == Some(target_color) && !visited.contains(&neighbor) {
                queue.push(neighbor);
            }
        }
    }

    group
}

/// Calculate the number of liberties for a group of stones
pub fn liberties(board: &Board, group: &[Coord]) -> usize {
    let mut liberties_set = HashSet::new();

    for &coord in group {
        for neighbor in board.adjacent_coords(coord) {
            if board.get(neighbor).is_none() {
                liberties_set.insert(neighbor);
            }
        }
    }

    liberties_set.len()
}

/// Liberties of the group containing the stone at `coord`, or `None` if the
/// intersection is empty
pub fn group_liberties(board: &Board, coord: Coord) -> Option<usize> {
    board.get(coord)?;
    Some(liberties(board, &find_group(board, coord)))
}

/// Remove every `color` group next to `coord` that has no liberty left
pub(crate) fn remove_dead_neighbors(board: &mut Board, coord: Coord, color: Color) -> Vec<Coord> {
    let mut removed = Vec::new();

    for neighbor in board.adjacent_coords(coord) {
        if board.get(neighbor) != Some(color) {
            continue;
        }
        let group = find_group(board, neighbor);
        if liberties(board, &group) == 0 {
            for &c in &group {
                board.remove(c);
            }
            removed.extend(group);
        }
    }

    removed
}

/// Rebuild the board as it stands after the node at `path`
pub fn board_at(game: &RunningGame, path: &NodePath) -> Result<Board> {
    let mut board = Board::new(game.board_size());
    for node in game.line_to(path)? {
        if let (Some(Move::Place(coord)), Some(color)) = (node.action(), node.color()) {
            if board.play(coord, color).is_none() {
                // Records may repeat an occupied point; keep the stone that is there.
                tracing::debug!(?coord, "replay skipped placement on occupied point");
            }
        }
    }
    Ok(board)
}

/// Stones removed from the board by the move at `path`
pub fn captures_at(game: &RunningGame, path: &NodePath) -> Result<Vec<Coord>> {
    let node = game.get_node(path)?;
    let (Some(Move::Place(coord)), Some(color)) = (node.action(), node.color()) else {
        return Ok(Vec::new());
    };
    let parent = path.parent().unwrap_or_default();
    let mut board = board_at(game, &parent)?;
    Ok(board.play(coord, color).unwrap_or_default())
}

/// Classify `action` by `color` as the next move after the node at `path`
///
/// Never mutates the game and looks at no history besides the position
/// itself, so passes and resignations are always legal. Fails only on caller
/// errors: an unresolvable path or a placement off the board.
pub fn check_action(
    game: &RunningGame,
    path: &NodePath,
    action: &Move,
    color: Color,
) -> Result<Outcome> {
    match action {
        Move::Place(coord) => {
            let size = game.board_size();
            if !coord.is_valid(size) {
                return Err(GameError::InvalidPosition {
                    x: coord.x.into(),
                    y: coord.y.into(),
                    board_size: size,
                });
            }

            let mut board = board_at(game, path)?;
            if board.get(*coord).is_some() {
                return Ok(Outcome::Occupied);
            }

            board.place(*coord, color);
            remove_dead_neighbors(&mut board, *coord, color.opposite());
            let own = find_group(&board, *coord);
            if liberties(&board, &own) == 0 {
                return Ok(Outcome::Suicide);
            }
            Ok(Outcome::Legal)
        }
        Move::Pass | Move::Resign => {
            game.resolve(path)?;
            Ok(Outcome::Legal)
        }
    }
}

/// Whether the node at `path` ends the game: a resignation, or the second of
/// two passes in a row
pub fn is_game_end(game: &RunningGame, path: &NodePath) -> Result<bool> {
    let line = game.line_to(path)?;
    Ok(match line.as_slice() {
        [.., last] if last.is_resign() => true,
        [.., before, last] => before.is_pass() && last.is_pass(),
        _ => false,
    })
}

/// Recompute the number of stones captured by `color` up to the cursor and
/// store it in the game information
///
/// The count is rebuilt from the root every time, so calling this once per
/// color after each move, or after moving the cursor, is always consistent.
pub fn calc_prisoners(game: &mut RunningGame, color: Color) -> Result<u32> {
    let mut board = Board::new(game.board_size());
    let mut captured = 0u32;

    for node in game.line_to(game.current_path())? {
        if let (Some(Move::Place(coord)), Some(mover)) = (node.action(), node.color()) {
            let removed = board.play(coord, mover).unwrap_or_default();
            if mover == color {
                captured += removed.len() as u32;
            }
        }
    }

    game.meta_mut().set_prisoners(color, captured);
    Ok(captured)
}

/// Play the next move of a live game
///
/// The action is checked for the color to move at the end of the played
/// line. Only a legal action is recorded, stamped with the mover's clock
/// reading; prisoner counts are refreshed afterwards. Any other outcome
/// leaves the game untouched.
pub fn submit_move(game: &mut RunningGame, action: Move, clock: &dyn TimeKeeper) -> Result<Outcome> {
    let at = game.played_line().clone();
    let color = game.color_to_play_after(&at)?;

    let outcome = check_action(game, &at, &action, color)?;
    if outcome != Outcome::Legal {
        tracing::debug!(?action, ?color, ?outcome, "move rejected");
        return Ok(outcome);
    }

    game.play_move(action, clock.snapshot(color))?;
    calc_prisoners(game, color)?;
    calc_prisoners(game, color.opposite())?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(size: u8, stones: &[(u8, u8, Color)]) -> Board {
        let mut board = Board::new(size);
        for &(x, y, color) in stones {
            board.place(Coord::new(x, y), color);
        }
        board
    }

    #[test]
    fn test_single_stone_liberties() {
        for (coord, expected) in [
            (Coord::new(0, 0), 2),
            (Coord::new(0, 4), 3),
            (Coord::new(4, 4), 4),
        ] {
            let mut board = Board::new(9);
            board.place(coord, Color::Black);
            assert_eq!(group_liberties(&board, coord), Some(expected));
        }
    }

    #[test]
    fn test_empty_point_has_no_group() {
        let board = Board::new(9);
        assert_eq!(group_liberties(&board, Coord::new(3, 3)), None);
        assert!(find_group(&board, Coord::new(3, 3)).is_empty());
    }

    #[test]
    fn test_group_shares_liberties() {
        let board = board_with(9, &[(3, 3, Color::Black), (4, 3, Color::Black)]);
        let group = find_group(&board, Coord::new(3, 3));
        assert_eq!(group.len(), 2);
        assert_eq!(liberties(&board, &group), 6);
    }

    #[test]
    fn test_pass_after_pass_ends_game() {
        let mut game = RunningGame::with_board_size(9).unwrap();
        game.play_move(Move::Pass, Default::default()).unwrap();
        let path = game.played_line().clone();
        assert_eq!(check_action(&game, &path, &Move::Pass, Color::White).unwrap(), Outcome::Legal);
        assert!(!is_game_end(&game, &path).unwrap());

        game.play_move(Move::Pass, Default::default()).unwrap();
        assert!(is_game_end(&game, game.played_line()).unwrap());
    }
}
