use std::collections::VecDeque;

use crate::grid::{Cell, Dir};

/// Snake body held in a fixed-capacity ring buffer (capacity = grid cell
/// count), so head append and tail removal never reallocate.
pub struct Snake {
    slots: Vec<Cell>,
    head: usize,
    tail: usize,
    len: usize,
    heading: Dir,
    pending_turns: VecDeque<Dir>,
}

impl Snake {
    /// `cells` is ordered tail first, head last, and must not be empty.
    pub fn new(capacity: usize, cells: &[Cell], heading: Dir) -> Self {
        debug_assert!(!cells.is_empty() && cells.len() <= capacity);
        let mut slots = vec![cells[0]; capacity];
        slots[..cells.len()].copy_from_slice(cells);
        Self {
            slots,
            head: cells.len() - 1,
            tail: 0,
            len: cells.len(),
            heading,
            pending_turns: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn head(&self) -> Cell {
        self.slots[self.head]
    }

    pub fn tail(&self) -> Cell {
        self.slots[self.tail]
    }

    /// The segment adjacent to the tail; the tail retreats toward it.
    /// Requires length >= 2.
    pub fn cell_after_tail(&self) -> Cell {
        debug_assert!(self.len >= 2);
        self.slots[(self.tail + 1) % self.slots.len()]
    }

    pub fn heading(&self) -> Dir {
        self.heading
    }

    /// Body cells from tail to head inclusive.
    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.len).map(move |i| self.slots[(self.tail + i) % self.slots.len()])
    }

    /// Enqueue a turn request. Legality is only checked when the turn is
    /// applied, so stale requests queued mid-transit are kept in order.
    pub fn push_turn(&mut self, dir: Dir) {
        self.pending_turns.push_back(dir);
    }

    /// Dequeue pending turns in FIFO order, discarding illegal ones, and
    /// apply the first legal one. Heading is unchanged if none are legal.
    pub fn apply_next_legal_turn(&mut self) {
        while let Some(dir) = self.pending_turns.pop_front() {
            if dir.is_turn_from(self.heading) {
                self.heading = dir;
                break;
            }
        }
    }

    pub fn extend_at_head(&mut self, cell: Cell) {
        debug_assert!(self.len < self.slots.len());
        self.head = (self.head + 1) % self.slots.len();
        self.slots[self.head] = cell;
        self.len += 1;
    }

    pub fn retract_tail(&mut self) -> Cell {
        debug_assert!(self.len >= 2);
        let cell = self.slots[self.tail];
        self.tail = (self.tail + 1) % self.slots.len();
        self.len -= 1;
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn two_cell_snake(grid: &Grid) -> Snake {
        Snake::new(
            grid.cell_count(),
            &[grid.at(3, 4), grid.at(4, 4)],
            Dir::Right,
        )
    }

    #[test]
    fn test_initial_cursors() {
        let grid = Grid::new(10);
        let snake = two_cell_snake(&grid);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.tail(), grid.at(3, 4));
        assert_eq!(snake.head(), grid.at(4, 4));
        assert_eq!(snake.cell_after_tail(), grid.at(4, 4));
        assert_eq!(snake.heading(), Dir::Right);
    }

    #[test]
    fn test_extend_and_retract() {
        let grid = Grid::new(10);
        let mut snake = two_cell_snake(&grid);
        snake.extend_at_head(grid.at(5, 4));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), grid.at(5, 4));
        assert_eq!(snake.tail(), grid.at(3, 4));

        assert_eq!(snake.retract_tail(), grid.at(3, 4));
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.tail(), grid.at(4, 4));
        assert_eq!(snake.cell_after_tail(), grid.at(5, 4));
    }

    #[test]
    fn test_ring_wraps_past_capacity() {
        let grid = Grid::new(100);
        // Drive a 2-segment snake far more steps than the ring has slots;
        // cursors must wrap without losing the body order.
        let mut snake = Snake::new(16, &[grid.at(3, 4), grid.at(4, 4)], Dir::Right);
        for step in 0..40 {
            snake.extend_at_head(grid.at(5 + step, 4));
            snake.retract_tail();
            assert_eq!(snake.len(), 2);
        }
        assert_eq!(snake.head(), grid.at(44, 4));
        assert_eq!(snake.tail(), grid.at(43, 4));
        let cells: Vec<Cell> = snake.iter().collect();
        assert_eq!(cells, vec![grid.at(43, 4), grid.at(44, 4)]);
    }

    #[test]
    fn test_apply_first_legal_turn_fifo() {
        let grid = Grid::new(10);
        let mut snake = two_cell_snake(&grid);
        // Straight-ahead and reversal are discarded, first perpendicular wins.
        snake.push_turn(Dir::Right);
        snake.push_turn(Dir::Left);
        snake.push_turn(Dir::Down);
        snake.push_turn(Dir::Up);
        snake.apply_next_legal_turn();
        assert_eq!(snake.heading(), Dir::Down);
        // The later legal request is still queued and applies next commit.
        snake.apply_next_legal_turn();
        assert_eq!(snake.heading(), Dir::Up);
    }

    #[test]
    fn test_no_legal_turn_keeps_heading() {
        let grid = Grid::new(10);
        let mut snake = two_cell_snake(&grid);
        snake.push_turn(Dir::Left);
        snake.push_turn(Dir::Right);
        snake.apply_next_legal_turn();
        assert_eq!(snake.heading(), Dir::Right);
        // Queue fully drained.
        snake.apply_next_legal_turn();
        assert_eq!(snake.heading(), Dir::Right);
    }

    #[test]
    fn test_iter_orders_tail_to_head() {
        let grid = Grid::new(10);
        let mut snake = two_cell_snake(&grid);
        snake.extend_at_head(grid.at(5, 4));
        snake.extend_at_head(grid.at(5, 5));
        let cells: Vec<Cell> = snake.iter().collect();
        assert_eq!(
            cells,
            vec![grid.at(3, 4), grid.at(4, 4), grid.at(5, 4), grid.at(5, 5)]
        );
    }
}
