//! Autoplay heading selection from two BFS gradient fields, one anchored
//! at the snake's tail and one at the food. Greedy: move toward food among
//! cells that keep a route to the tail, preferring maneuvering room on
//! ties. Deliberately not a proof of safety; spiral self-enclosure can
//! still trap the snake.

use std::collections::VecDeque;

use crate::grid::{Cell, CellState, Dir, Grid};
use crate::snake::Snake;

pub const UNREACHABLE: u32 = u32::MAX;

/// BFS distance from `source` over non-Body cells, one entry per grid
/// cell. The source is seeded at distance 0 even when it is Body (the
/// tail anchor is part of the snake).
pub fn gradient(grid: &Grid, source: Cell) -> Vec<u32> {
    let mut field = vec![UNREACHABLE; grid.cell_count()];
    let mut queue = VecDeque::new();
    field[grid.index(source)] = 0;
    queue.push_back(source);

    while let Some(cell) = queue.pop_front() {
        let base = field[grid.index(cell)];
        for next in grid.neighbors(cell) {
            let idx = grid.index(next);
            if field[idx] != UNREACHABLE || grid.get(next) == CellState::Body {
                continue;
            }
            field[idx] = base + 1;
            queue.push_back(next);
        }
    }
    field
}

/// Pick the next heading, or `None` for "no preference" (keep straight).
///
/// A neighbor is safe when the tail stays reachable from it, except that
/// the food cell itself is unsafe when it sits at tail distance 1: eating
/// there would close the snake's only escape route toward its tail.
pub fn choose_heading(grid: &Grid, snake: &Snake, food: Cell) -> Option<Dir> {
    let tail_field = gradient(grid, snake.tail());
    let food_field = gradient(grid, food);
    let head = snake.head();

    let safe = |cell: Cell| {
        let tail_dist = tail_field[grid.index(cell)];
        tail_dist != UNREACHABLE && !(food_field[grid.index(cell)] == 0 && tail_dist == 1)
    };

    let ahead = grid.step(head, snake.heading());
    let mut candidate = ahead;
    for next in grid.neighbors(head) {
        if grid.get(next) == CellState::Body {
            continue;
        }
        let better = match candidate {
            // Straight ahead runs off the grid; any open neighbor beats that.
            None => true,
            Some(current) => {
                if !safe(next) {
                    false
                } else if !safe(current) {
                    true
                } else {
                    let next_food = food_field[grid.index(next)];
                    let current_food = food_field[grid.index(current)];
                    next_food < current_food
                        || (next_food == current_food
                            && tail_field[grid.index(next)] > tail_field[grid.index(current)])
                }
            }
        };
        if better {
            candidate = Some(next);
        }
    }

    match candidate {
        Some(chosen) if Some(chosen) != ahead => grid.dir_between(head, chosen),
        _ => None,
    }
}
