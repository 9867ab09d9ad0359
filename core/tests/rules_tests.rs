// SPDX-License-Identifier: MIT OR Apache-2.0

use sgfgo_core::{
    board::Board,
    clock::{FixedTime, NoClock},
    rules::{self, Outcome},
    Color, Coord, GameError, Move, NodePath, RunningGame, Timing,
};

fn place(x: u8, y: u8) -> Move {
    Move::Place(Coord::new(x, y))
}

fn play_all(game: &mut RunningGame, moves: &[Move]) {
    for &mv in moves {
        let outcome = rules::submit_move(game, mv, &NoClock).unwrap();
        assert_eq!(outcome, Outcome::Legal, "setup move {:?} rejected", mv);
    }
}

#[test]
fn two_moves_then_two_passes() {
    let mut game = RunningGame::with_board_size(9).unwrap();

    for mv in [place(4, 4), place(4, 5), Move::Pass, Move::Pass] {
        let before = game.played_line().clone();
        assert!(!rules::is_game_end(&game, &before).unwrap());
        assert_eq!(rules::submit_move(&mut game, mv, &NoClock).unwrap(), Outcome::Legal);
    }

    let end = game.played_line().clone();
    assert_eq!(end, NodePath::main_line(4));
    assert!(rules::is_game_end(&game, &end).unwrap());

    let line = game.line_to(&end).unwrap();
    assert_eq!(line.len(), 4);
    assert_eq!(line[0].color(), Some(Color::Black));
    assert_eq!(line[1].color(), Some(Color::White));
    assert!(line[2].is_pass() && line[2].color() == Some(Color::Black));
    assert!(line[3].is_pass() && line[3].color() == Some(Color::White));
}

#[test]
fn single_stone_capture_counts_one_prisoner() {
    let mut game = RunningGame::with_board_size(19).unwrap();
    play_all(
        &mut game,
        &[
            place(3, 3),
            place(2, 3),
            place(10, 10),
            place(4, 3),
            place(10, 12),
            place(3, 2),
            place(12, 10),
        ],
    );

    let at = game.played_line().clone();
    assert_eq!(
        rules::check_action(&game, &at, &place(3, 4), Color::White).unwrap(),
        Outcome::Legal
    );
    rules::submit_move(&mut game, place(3, 4), &NoClock).unwrap();

    let end = game.played_line().clone();
    assert_eq!(game.meta().white_prisoners, 1);
    assert_eq!(game.meta().black_prisoners, 0);
    assert_eq!(rules::captures_at(&game, &end).unwrap(), vec![Coord::new(3, 3)]);

    let board = rules::board_at(&game, &end).unwrap();
    assert_eq!(board.get(Coord::new(3, 3)), None);
    assert_eq!(board.count(Color::White), 4);
}

#[test]
fn suicide_is_refused_without_touching_the_game() {
    let mut game = RunningGame::with_board_size(9).unwrap();
    play_all(
        &mut game,
        &[
            place(5, 5),
            place(1, 0),
            place(6, 6),
            place(0, 1),
            place(7, 7),
            place(2, 1),
            place(8, 8),
            place(1, 2),
        ],
    );
    let nodes = game.node_count();
    let played = game.played_line().clone();

    assert_eq!(rules::submit_move(&mut game, place(1, 1), &NoClock).unwrap(), Outcome::Suicide);
    assert_eq!(game.node_count(), nodes);
    assert_eq!(game.played_line(), &played);
    assert_eq!(game.meta().black_prisoners, 0);
    assert_eq!(game.to_play(), Color::Black);
}

#[test]
fn filling_last_liberty_is_legal_when_it_captures() {
    let mut game = RunningGame::with_board_size(9).unwrap();
    play_all(
        &mut game,
        &[place(2, 0), place(1, 0), place(1, 1), place(0, 1), place(0, 2), place(8, 8)],
    );

    assert_eq!(rules::submit_move(&mut game, place(0, 0), &NoClock).unwrap(), Outcome::Legal);
    assert_eq!(game.meta().black_prisoners, 2);

    let board = rules::board_at(&game, game.played_line()).unwrap();
    assert_eq!(board.get(Coord::new(1, 0)), None);
    assert_eq!(board.get(Coord::new(0, 1)), None);
    assert_eq!(rules::group_liberties(&board, Coord::new(0, 0)), Some(2));
}

#[test]
fn occupied_point_is_refused() {
    let mut game = RunningGame::with_board_size(9).unwrap();
    play_all(&mut game, &[place(4, 4)]);

    let nodes = game.node_count();
    assert_eq!(rules::submit_move(&mut game, place(4, 4), &NoClock).unwrap(), Outcome::Occupied);
    assert_eq!(game.node_count(), nodes);
}

#[test]
fn off_board_placement_is_an_error() {
    let game = RunningGame::with_board_size(9).unwrap();
    let result = rules::check_action(&game, &NodePath::root(), &place(9, 0), Color::Black);
    assert!(matches!(
        result,
        Err(GameError::InvalidPosition { x: 9, y: 0, board_size: 9 })
    ));
}

#[test]
fn unknown_path_is_an_error() {
    let game = RunningGame::with_board_size(9).unwrap();
    let result = rules::check_action(&game, &NodePath::main_line(3), &Move::Pass, Color::Black);
    assert!(matches!(result, Err(GameError::InvalidPath(_))));
}

#[test]
fn resignation_ends_the_game() {
    let mut game = RunningGame::with_board_size(9).unwrap();
    play_all(&mut game, &[place(2, 2), Move::Resign]);
    assert!(rules::is_game_end(&game, game.played_line()).unwrap());
    assert_eq!(game.current_node().color(), Some(Color::White));
}

#[test]
fn clock_snapshot_lands_on_the_mover() {
    let clock = FixedTime {
        black: Timing {
            clock_remaining_millis: Some(60_000),
            overtime_periods_remaining: None,
        },
        white: Timing {
            clock_remaining_millis: Some(45_500),
            overtime_periods_remaining: Some(3),
        },
    };
    let mut game = RunningGame::with_board_size(9).unwrap();
    rules::submit_move(&mut game, place(2, 2), &clock).unwrap();
    rules::submit_move(&mut game, place(6, 6), &clock).unwrap();

    let line = game.line_to(game.played_line()).unwrap();
    assert_eq!(line[0].clock_remaining_millis, Some(60_000));
    assert_eq!(line[1].timing(), clock.white);
}

#[test]
fn prisoners_follow_the_cursor() {
    let mut game = RunningGame::with_board_size(19).unwrap();
    play_all(
        &mut game,
        &[
            place(3, 3),
            place(2, 3),
            place(10, 10),
            place(4, 3),
            place(10, 12),
            place(3, 2),
            place(12, 10),
            place(3, 4),
        ],
    );
    assert_eq!(game.meta().white_prisoners, 1);

    game.skip_backward();
    assert_eq!(rules::calc_prisoners(&mut game, Color::White).unwrap(), 0);
    game.skip_forward();
    assert_eq!(rules::calc_prisoners(&mut game, Color::White).unwrap(), 1);
    // Recomputing is idempotent
    assert_eq!(rules::calc_prisoners(&mut game, Color::White).unwrap(), 1);
}

#[test]
fn liberties_of_a_connected_group() {
    let mut board = Board::new(9);
    for x in 0..3 {
        board.place(Coord::new(x, 0), Color::Black);
    }
    board.place(Coord::new(1, 1), Color::White);

    let group = rules::find_group(&board, Coord::new(0, 0));
    assert_eq!(group.len(), 3);
    assert_eq!(rules::liberties(&board, &group), 3);
    assert_eq!(rules::group_liberties(&board, Coord::new(1, 1)), Some(3));
}
