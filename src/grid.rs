use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Grass,
    Body,
    Food,
    SuperFood,
}

/// Opaque cell index. The `y * dimension + x` encoding is an internal
/// detail of `Grid`; coordinates are only exposed through its accessors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell(usize);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// A turn is legal iff it is perpendicular to the current heading:
    /// straight-ahead re-issues and 180° reversals are both rejected.
    pub fn is_turn_from(self, heading: Dir) -> bool {
        let (dx, dy) = heading.delta();
        let (ndx, ndy) = self.delta();
        dx == ndy || dy == ndx
    }
}

/// Neighbor scan order: toward -x, +x, -y, +y. Fixed so that pathfinder
/// tie-breaking is deterministic.
pub const NEIGHBOR_ORDER: [Dir; 4] = [Dir::Left, Dir::Right, Dir::Up, Dir::Down];

pub struct Grid {
    dimension: usize,
    cells: Vec<CellState>,
}

impl Grid {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            cells: vec![CellState::Grass; dimension * dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn at(&self, x: usize, y: usize) -> Cell {
        debug_assert!(x < self.dimension && y < self.dimension);
        Cell(y * self.dimension + x)
    }

    pub fn index(&self, cell: Cell) -> usize {
        cell.0
    }

    pub fn x(&self, cell: Cell) -> usize {
        cell.0 % self.dimension
    }

    pub fn y(&self, cell: Cell) -> usize {
        cell.0 / self.dimension
    }

    pub fn get(&self, cell: Cell) -> CellState {
        self.cells[cell.0]
    }

    pub fn set(&mut self, cell: Cell, state: CellState) {
        self.cells[cell.0] = state;
    }

    pub fn is_traversable(&self, cell: Cell) -> bool {
        self.get(cell) != CellState::Body
    }

    pub fn is_food(&self, cell: Cell) -> bool {
        self.get(cell) == CellState::Food
    }

    pub fn is_super_food(&self, cell: Cell) -> bool {
        self.get(cell) == CellState::SuperFood
    }

    /// The on-grid cell one step from `cell` in `dir`, or `None` at the edge.
    pub fn step(&self, cell: Cell, dir: Dir) -> Option<Cell> {
        let (dx, dy) = dir.delta();
        let nx = self.x(cell) as isize + dx;
        let ny = self.y(cell) as isize + dy;
        if nx < 0 || ny < 0 || nx >= self.dimension as isize || ny >= self.dimension as isize {
            return None;
        }
        Some(self.at(nx as usize, ny as usize))
    }

    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOR_ORDER
            .iter()
            .filter_map(move |dir| self.step(cell, *dir))
    }

    /// Direction from `a` to an axis-adjacent `b`, `None` if not adjacent.
    pub fn dir_between(&self, a: Cell, b: Cell) -> Option<Dir> {
        NEIGHBOR_ORDER
            .iter()
            .copied()
            .find(|dir| self.step(a, *dir) == Some(b))
    }

    pub fn manhattan(&self, a: Cell, b: Cell) -> u32 {
        let dx = self.x(a).abs_diff(self.x(b));
        let dy = self.y(a).abs_diff(self.y(b));
        (dx + dy) as u32
    }

    /// Uniform-random cell currently in `state`. `None` when no cell has it,
    /// e.g. asking for a Grass cell on a fully occupied grid.
    pub fn random_cell(&self, state: CellState, rng: &mut impl Rng) -> Option<Cell> {
        let candidates: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == state)
            .map(|(i, _)| i)
            .collect();
        candidates.choose(rng).map(|i| Cell(*i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(10);
        for y in 0..10 {
            for x in 0..10 {
                let cell = grid.at(x, y);
                assert_eq!(grid.x(cell), x);
                assert_eq!(grid.y(cell), y);
            }
        }
    }

    #[test]
    fn test_step_stays_on_grid() {
        let grid = Grid::new(5);
        assert_eq!(grid.step(grid.at(0, 0), Dir::Left), None);
        assert_eq!(grid.step(grid.at(0, 0), Dir::Up), None);
        assert_eq!(grid.step(grid.at(4, 4), Dir::Right), None);
        assert_eq!(grid.step(grid.at(4, 4), Dir::Down), None);
        assert_eq!(grid.step(grid.at(2, 2), Dir::Right), Some(grid.at(3, 2)));
        assert_eq!(grid.step(grid.at(2, 2), Dir::Up), Some(grid.at(2, 1)));
    }

    #[test]
    fn test_neighbor_order_is_fixed() {
        let grid = Grid::new(5);
        let around: Vec<Cell> = grid.neighbors(grid.at(2, 2)).collect();
        assert_eq!(
            around,
            vec![
                grid.at(1, 2), // -x
                grid.at(3, 2), // +x
                grid.at(2, 1), // -y
                grid.at(2, 3), // +y
            ]
        );
    }

    #[test]
    fn test_corner_has_two_neighbors() {
        let grid = Grid::new(5);
        let around: Vec<Cell> = grid.neighbors(grid.at(0, 0)).collect();
        assert_eq!(around, vec![grid.at(1, 0), grid.at(0, 1)]);
    }

    #[test]
    fn test_manhattan() {
        let grid = Grid::new(10);
        assert_eq!(grid.manhattan(grid.at(0, 0), grid.at(0, 0)), 0);
        assert_eq!(grid.manhattan(grid.at(1, 2), grid.at(4, 8)), 9);
        assert_eq!(grid.manhattan(grid.at(4, 8), grid.at(1, 2)), 9);
    }

    #[test]
    fn test_dir_between() {
        let grid = Grid::new(5);
        let c = grid.at(2, 2);
        assert_eq!(grid.dir_between(c, grid.at(3, 2)), Some(Dir::Right));
        assert_eq!(grid.dir_between(c, grid.at(1, 2)), Some(Dir::Left));
        assert_eq!(grid.dir_between(c, grid.at(2, 1)), Some(Dir::Up));
        assert_eq!(grid.dir_between(c, grid.at(2, 3)), Some(Dir::Down));
        assert_eq!(grid.dir_between(c, grid.at(4, 2)), None);
        assert_eq!(grid.dir_between(c, c), None);
    }

    #[test]
    fn test_random_cell_respects_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut grid = Grid::new(4);
        let food = grid.at(1, 3);
        grid.set(food, CellState::Food);
        for _ in 0..20 {
            assert_eq!(grid.random_cell(CellState::Food, &mut rng), Some(food));
            let grass = grid.random_cell(CellState::Grass, &mut rng).unwrap();
            assert_ne!(grass, food);
        }
    }

    #[test]
    fn test_random_cell_none_when_exhausted() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut grid = Grid::new(3);
        assert_eq!(grid.random_cell(CellState::Food, &mut rng), None);
        for y in 0..3 {
            for x in 0..3 {
                grid.set(grid.at(x, y), CellState::Body);
            }
        }
        assert_eq!(grid.random_cell(CellState::Grass, &mut rng), None);
    }

    #[test]
    fn test_turn_legality_table() {
        let perpendicular = |a: Dir, b: Dir| {
            let (adx, ady) = a.delta();
            let (bdx, bdy) = b.delta();
            adx * bdx + ady * bdy == 0
        };
        for heading in NEIGHBOR_ORDER {
            for proposed in NEIGHBOR_ORDER {
                assert_eq!(
                    proposed.is_turn_from(heading),
                    perpendicular(heading, proposed),
                    "heading {:?}, proposed {:?}",
                    heading,
                    proposed
                );
            }
        }
    }
}
