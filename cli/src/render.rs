// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use sgfgo_core::{board::Board, Color, Coord};

/// Render a board as text, marking the last move with parentheses
pub fn render_board(board: &Board, last_move: Option<Coord>) -> String {
    let size = board.size();
    let mut output = String::new();

    let labels = column_labels(size);
    output.push_str(&labels);

    for row in 0..size {
        // Row number (1-indexed)
        output.push_str(&format!("{:2} ", row + 1));

        for col in 0..size {
            let coord = Coord::new(col, row);
            let symbol = match board.get(coord) {
                Some(Color::Black) => '●',
                Some(Color::White) => '○',
                None if is_star_point(coord, size) => '+',
                None => '.',
            };

            if last_move == Some(coord) {
                output.push_str(&format!("({})", symbol));
            } else if col > 0 && last_move == Some(Coord::new(col - 1, row)) {
                // The closing mark of the previous point takes the gap
                output.push(symbol);
            } else {
                output.push(' ');
                output.push(symbol);
            }
        }
        if last_move != Some(Coord::new(size - 1, row)) {
            output.push(' ');
        }

        output.push_str(&format!("{}\n", row + 1));
    }

    output.push_str(&labels);
    output
}

fn column_labels(size: u8) -> String {
    let mut line = String::from("   ");
    for col in 0..size {
        line.push(' ');
        line.push(coord_to_column_char(col));
    }
    line.push('\n');
    line
}

/// Convert a column index to a column character (A-Z, skipping I)
fn coord_to_column_char(col: u8) -> char {
    if col < 8 {
        (b'A' + col) as char
    } else {
        (b'A' + col + 1) as char
    }
}

/// Human-readable name of an intersection, e.g. `D16`
pub fn coord_name(coord: Coord) -> String {
    format!("{}{}", coord_to_column_char(coord.x), coord.y + 1)
}

/// Check if a coordinate is a star point on the board
fn is_star_point(coord: Coord, board_size: u8) -> bool {
    let (edge, side_points) = match board_size {
        9 => (2, false),
        13 => (3, false),
        19 => (3, true),
        _ => return false,
    };
    let far = board_size - 1 - edge;
    let mid = board_size / 2;
    let (x, y) = (coord.x, coord.y);

    let corner = |v: u8| v == edge || v == far;
    let line = |v: u8| corner(v) || v == mid;
    (corner(x) && corner(y)) || (x == mid && y == mid) || (side_points && line(x) && line(y))
}
