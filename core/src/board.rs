// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation and manipulation

use crate::{rules, Color, Coord};

/// Represents the Go board with stones and empty positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Size of the board (typically 9, 13, or 19)
    size: u8,
    /// Positions on the board
    positions: Vec<Option<Color>>,
}

impl Board {
    /// Create a new empty board with the specified size
    pub fn new(size: u8) -> Self {
        let cells = (size as usize) * (size as usize);
        Self {
            size,
            positions: vec![None; cells],
        }
    }

    /// Get the stone at the specified coordinate
    pub fn get(&self, coord: Coord) -> Option<Color> {
        if !coord.is_valid(self.size) {
            return None;
        }

        self.positions[self.coord_to_index(coord)]
    }

    /// Place a stone at the specified coordinate
    ///
    /// Returns false if the coordinate is off the board or occupied.
    pub fn place(&mut self, coord: Coord, color: Color) -> bool {
        if !coord.is_valid(self.size) {
            return false;
        }

        let idx = self.coord_to_index(coord);
        if self.positions[idx].is_some() {
            return false;
        }

        self.positions[idx] = Some(color);
        true
    }

    /// Remove a stone at the specified coordinate
    pub fn remove(&mut self, coord: Coord) -> bool {
        if !coord.is_valid(self.size) {
            return false;
        }

        let idx = self.coord_to_index(coord);
        if self.positions[idx].is_none() {
            return false;
        }

        self.positions[idx] = None;
        true
    }

    /// Place a stone and remove the opponent groups it leaves without liberties
    ///
    /// Returns the captured opponent stones, or `None` if the stone could not
    /// be placed. Should the placed group still have no liberty afterwards,
    /// which only happens when replaying a record containing a suicide, that
    /// group is taken off as well but not reported as captured.
    pub fn play(&mut self, coord: Coord, color: Color) -> Option<Vec<Coord>> {
        if !self.place(coord, color) {
            return None;
        }

        let captured = rules::remove_dead_neighbors(self, coord, color.opposite());

        let own = rules::find_group(self, coord);
        if rules::liberties(self, &own) == 0 {
            tracing::warn!(?coord, ?color, stones = own.len(), "record contains a suicide");
            for &c in &own {
                self.remove(c);
            }
        }

        Some(captured)
    }

    /// Convert a coordinate to a vector index
    fn coord_to_index(&self, coord: Coord) -> usize {
        (coord.y as usize) * (self.size as usize) + (coord.x as usize)
    }

    /// Get adjacent coordinates (up, down, left, right)
    pub fn adjacent_coords(&self, coord: Coord) -> Vec<Coord> {
        let mut result = Vec::with_capacity(4);
        let x = coord.x;
        let y = coord.y;

        // Up
        if y > 0 {
            result.push(Coord::new(x, y - 1));
        }

        // Down
        if y + 1 < self.size {
            result.push(Coord::new(x, y + 1));
        }

        // Left
        if x > 0 {
            result.push(Coord::new(x - 1, y));
        }

        // Right
        if x + 1 < self.size {
            result.push(Coord::new(x + 1, y));
        }

        result
    }

    /// Get the size of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Count stones of the given color
    pub fn count(&self, color: Color) -> usize {
        self.positions.iter().filter(|p| **p == Some(color)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_coords_respect_edges() {
        let board = Board::new(9);
        assert_eq!(board.adjacent_coords(Coord::new(0, 0)).len(), 2);
        assert_eq!(board.adjacent_coords(Coord::new(4, 0)).len(), 3);
        assert_eq!(board.adjacent_coords(Coord::new(4, 4)).len(), 4);
        assert_eq!(board.adjacent_coords(Coord::new(8, 8)).len(), 2);
    }

    #[test]
    fn test_play_captures_corner_stone() {
        let mut board = Board::new(9);
        board.place(Coord::new(0, 0), Color::White);
        board.place(Coord::new(1, 0), Color::Black);

        let removed = board.play(Coord::new(0, 1), Color::Black).unwrap();
        assert_eq!(removed, vec![Coord::new(0, 0)]);
        assert_eq!(board.get(Coord::new(0, 0)), None);
        assert_eq!(board.count(Color::Black), 2);
    }

    #[test]
    fn test_play_on_occupied_point_fails() {
        let mut board = Board::new(9);
        board.place(Coord::new(2, 2), Color::Black);
        assert!(board.play(Coord::new(2, 2), Color::White).is_none());
    }
}
