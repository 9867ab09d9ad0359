// SPDX-License-Identifier: MIT OR Apache-2.0

use proptest::prelude::*;
use sgfgo_core::{board::Board, clock::NoClock, rules, sgf, Color, Coord, Move, RunningGame};

#[derive(Debug, Clone)]
enum Step {
    Play(Move),
    /// Step back and record a side variation from there
    Branch(u8, u8),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        8 => (0u8..9, 0u8..9).prop_map(|(x, y)| Step::Play(Move::Place(Coord::new(x, y)))),
        1 => Just(Step::Play(Move::Pass)),
        1 => (0u8..9, 0u8..9).prop_map(|(x, y)| Step::Branch(x, y)),
    ]
}

fn build(steps: &[Step]) -> RunningGame {
    let mut game = RunningGame::with_board_size(9).unwrap();
    for step in steps {
        match *step {
            // Illegal placements are simply not recorded
            Step::Play(mv) => {
                rules::submit_move(&mut game, mv, &NoClock).unwrap();
            }
            Step::Branch(x, y) => {
                game.skip_backward();
                game.record_move_at_cursor(Move::Place(Coord::new(x, y)), None)
                    .unwrap();
                let played = game.played_line().clone();
                game.set_current(played).unwrap();
            }
        }
    }
    game
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn written_games_read_back_identically(steps in prop::collection::vec(step(), 0..60)) {
        let game = build(&steps);

        let text = sgf::to_sgf_string(&game);
        let reloaded = sgf::parse_str(&text).unwrap();

        prop_assert_eq!(reloaded.node_count(), game.node_count());
        prop_assert_eq!(sgf::to_sgf_string(&reloaded), text);
    }

    #[test]
    fn prisoner_counts_never_exceed_stones_played(steps in prop::collection::vec(step(), 0..60)) {
        let game = build(&steps);
        let played = game.line_to(game.played_line()).unwrap();
        let placed = played
            .iter()
            .filter(|n| matches!(n.action(), Some(Move::Place(_))))
            .count() as u32;

        let meta = game.meta();
        prop_assert!(meta.black_prisoners + meta.white_prisoners <= placed);
    }

    #[test]
    fn lone_stone_liberties_depend_on_edges(size in 2u8..=19, x in 0u8..19, y in 0u8..19) {
        prop_assume!(x < size && y < size);
        let mut board = Board::new(size);
        board.place(Coord::new(x, y), Color::White);

        let on_edge = |v: u8| v == 0 || v == size - 1;
        let expected = 4 - usize::from(on_edge(x)) - usize::from(on_edge(y));
        prop_assert_eq!(rules::group_liberties(&board, Coord::new(x, y)), Some(expected));
    }
}
