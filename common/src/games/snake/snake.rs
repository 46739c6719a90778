use std::collections::VecDeque;

use super::grid::Grid;
use super::types::{Direction, Position};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Head one cell up-left of the grid centre, body trailing to the left.
    pub fn canonical(grid: &Grid, length: usize) -> Self {
        let length = length.max(1);
        let head_column = (grid.columns() / 2 - 1).max(length as i32 - 1);
        let head_row = (grid.rows() / 2 - 1).max(0);

        let body = (0..length as i32)
            .map(|i| grid.position_of(head_column - i, head_row))
            .collect();

        Self { body }
    }

    #[cfg(test)]
    pub(crate) fn from_segments(segments: impl IntoIterator<Item = Position>) -> Self {
        let body: VecDeque<Position> = segments.into_iter().collect();
        assert!(!body.is_empty(), "Snake body should never be empty");
        Self { body }
    }

    pub fn head(&self) -> Position {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Position {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Position> {
        self.body.iter()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn next_head(&self, direction: Direction, cell_size: i32) -> Position {
        let (dx, dy) = direction.offset(cell_size);
        self.head().offset(dx, dy)
    }

    pub(super) fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub(super) fn drop_tail(&mut self) -> Option<Position> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }

    /// Whether the head overlaps any segment at `from` or later.
    pub fn head_hits_body(&self, from: usize) -> bool {
        let head = self.head();
        self.body.iter().skip(from.max(1)).any(|segment| *segment == head)
    }

    /// Direction the head last travelled in, derived from the neck.
    pub fn heading(&self, cell_size: i32) -> Option<Direction> {
        let head = self.head();
        let neck = *self.body.get(1)?;
        Direction::ALL
            .into_iter()
            .find(|direction| {
                let (dx, dy) = direction.offset(cell_size);
                neck.offset(dx, dy) == head
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_layout_is_contiguous() {
        let grid = Grid::new(30, 600, 600).unwrap();
        let snake = Snake::canonical(&grid, 5);
        let segments: Vec<Position> = snake.segments().copied().collect();
        assert_eq!(
            segments,
            vec![
                Position::new(270, 270),
                Position::new(240, 270),
                Position::new(210, 270),
                Position::new(180, 270),
                Position::new(150, 270),
            ]
        );
        assert_eq!(snake.heading(30), Some(Direction::Right));
    }

    #[test]
    fn test_canonical_layout_fits_narrow_grid() {
        let grid = Grid::new(30, 180, 90).unwrap();
        let snake = Snake::canonical(&grid, 5);
        assert_eq!(snake.head(), Position::new(120, 0));
        assert_eq!(snake.tail(), Position::new(0, 0));
        assert!(snake.segments().all(|p| grid.contains(*p)));
    }

    #[test]
    fn test_drop_tail_keeps_one_segment() {
        let mut snake = Snake::from_segments([Position::new(0, 0)]);
        assert_eq!(snake.drop_tail(), None);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_head_hits_body_ignores_head_itself() {
        let snake = Snake::from_segments([Position::new(0, 0), Position::new(30, 0)]);
        assert!(!snake.head_hits_body(0));
        let looped = Snake::from_segments([
            Position::new(0, 0),
            Position::new(30, 0),
            Position::new(0, 0),
        ]);
        assert!(looped.head_hits_body(1));
        assert!(!looped.head_hits_body(3));
    }
}
