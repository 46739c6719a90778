use super::types::Position;

/// Bounded pixel space divided into square cells. Positions are the top-left
/// corner of a cell, so every valid coordinate is a multiple of `cell_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    cell_size: i32,
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(cell_size: i32, width: i32, height: i32) -> Result<Self, String> {
        if cell_size <= 0 {
            return Err("cell_size must be greater than 0".to_string());
        }
        if width <= 0 || height <= 0 {
            return Err("grid dimensions must be greater than 0".to_string());
        }
        if width % cell_size != 0 || height % cell_size != 0 {
            return Err(format!(
                "grid dimensions {}x{} must be multiples of cell_size {}",
                width, height, cell_size
            ));
        }
        Ok(Self {
            cell_size,
            width,
            height,
        })
    }

    /// Floors an arbitrary viewport down to whole cells.
    pub fn fit_viewport(cell_size: i32, viewport_width: i32, viewport_height: i32) -> Result<Self, String> {
        if cell_size <= 0 {
            return Err("cell_size must be greater than 0".to_string());
        }
        let width = viewport_width - viewport_width.rem_euclid(cell_size);
        let height = viewport_height - viewport_height.rem_euclid(cell_size);
        Self::new(cell_size, width, height)
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        (self.columns() * self.rows()) as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x <= self.width - self.cell_size
            && pos.y <= self.height - self.cell_size
    }

    pub fn position_of(&self, column: i32, row: i32) -> Position {
        Position::new(column * self.cell_size, row * self.cell_size)
    }

    /// Column and row of an in-bounds position.
    pub fn cell_of(&self, pos: Position) -> Option<(i32, i32)> {
        if !self.contains(pos) {
            return None;
        }
        Some((pos.x / self.cell_size, pos.y / self.cell_size))
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.columns()).map(move |column| self.position_of(column, row))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_non_multiple_bounds() {
        assert!(Grid::new(30, 610, 600).is_err());
        assert!(Grid::new(0, 600, 600).is_err());
        assert!(Grid::new(30, 0, 600).is_err());
        assert!(Grid::new(30, 600, 600).is_ok());
    }

    #[test]
    fn test_columns_and_rows() {
        let grid = Grid::new(30, 600, 450).unwrap();
        assert_eq!(grid.columns(), 20);
        assert_eq!(grid.rows(), 15);
        assert_eq!(grid.cell_count(), 300);
        assert_eq!(grid.positions().count(), 300);
    }

    #[test]
    fn test_fit_viewport_floors_to_cells() {
        let grid = Grid::fit_viewport(30, 1366, 768).unwrap();
        assert_eq!(grid.width(), 1350);
        assert_eq!(grid.height(), 750);
    }

    #[test]
    fn test_contains_edges() {
        let grid = Grid::new(30, 600, 600).unwrap();
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(570, 570)));
        assert!(!grid.contains(Position::new(600, 0)));
        assert!(!grid.contains(Position::new(-30, 0)));
        assert!(!grid.contains(Position::new(0, 600)));
        assert_eq!(grid.cell_of(Position::new(90, 60)), Some((3, 2)));
        assert_eq!(grid.cell_of(Position::new(-30, 60)), None);
    }
}
