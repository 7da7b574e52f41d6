//! The per-frame motion state machine. Discrete grid moves become smooth
//! animation: a committed head cell fills in over the transit time and the
//! tail cell drains in step, while collision and food semantics stay exact
//! at the commit instant.

use crossterm::style::Color;
use rand::Rng;

use crate::config::{
    Config, AUTOPLAY_SPEED_MULTIPLIER, BOOST_MULTIPLIER, FOOD_BONUS, SPEED_UP_FACTOR,
    SUPER_FOOD_BONUS, SUPER_FOOD_CHANCE,
};
use crate::grid::{Cell, CellState, Dir, Grid};
use crate::pathfind;
use crate::score::{ScoreObserver, Scorekeeper};
use crate::snake::Snake;

pub const COLOR_GRASS: Color = Color::DarkGreen;
pub const COLOR_SNAKE: Color = Color::Yellow;
pub const COLOR_FOOD: Color = Color::Red;
pub const COLOR_SUPER_FOOD: Color = Color::Magenta;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

/// Pixel-space drawing target. The engine only ever issues axis-aligned
/// fills; everything else about presentation belongs to the adapter.
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// Whether the frame scheduler should keep invoking `handle_frame`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FrameOutcome {
    Continue,
    Stop,
}

fn color_for(state: CellState) -> Color {
    match state {
        CellState::Grass => COLOR_GRASS,
        CellState::Body => COLOR_SNAKE,
        CellState::Food => COLOR_FOOD,
        CellState::SuperFood => COLOR_SUPER_FOOD,
    }
}

pub struct Engine {
    config: Config,
    grid: Grid,
    snake: Snake,
    score: Scorekeeper,
    food: Option<Cell>,
    running: bool,
    game_over: bool,
    /// Timestamp (ms) at which the current head cell was committed.
    entered_at: Option<f64>,
    /// The current head cell held food; tail retraction is suppressed for
    /// this transit so the snake grows by one segment.
    eating: bool,
    /// Traversal speed in cells per second.
    speed: f64,
    boosted: bool,
    autoplay: bool,
}

impl Engine {
    pub fn new(config: Config, observer: Box<dyn ScoreObserver>) -> Self {
        let (grid, snake) = Self::fresh_board(&config);
        Self {
            config,
            grid,
            snake,
            score: Scorekeeper::new(observer),
            food: None,
            running: false,
            game_over: false,
            entered_at: None,
            eating: false,
            speed: config.speed,
            boosted: false,
            autoplay: false,
        }
    }

    /// Two segments at the grid center, heading right.
    fn fresh_board(config: &Config) -> (Grid, Snake) {
        let mut grid = Grid::new(config.dimension);
        let cx = config.dimension / 2;
        let cy = config.dimension / 2;
        let tail = grid.at(cx - 1, cy);
        let head = grid.at(cx, cy);
        grid.set(tail, CellState::Body);
        grid.set(head, CellState::Body);
        let snake = Snake::new(grid.cell_count(), &[tail, head], Dir::Right);
        (grid, snake)
    }

    /// Back to the initial placement: fresh grid and snake, zeroed score,
    /// base speed, a newly placed food, full board redraw. The autoplay
    /// toggle survives a reset.
    pub fn reset(&mut self, surface: &mut dyn Surface, rng: &mut impl Rng) {
        let (grid, snake) = Self::fresh_board(&self.config);
        self.grid = grid;
        self.snake = snake;
        self.score.reset();
        self.food = None;
        self.running = false;
        self.game_over = false;
        self.entered_at = None;
        self.eating = false;
        self.boosted = false;
        self.speed = if self.autoplay {
            self.config.speed * AUTOPLAY_SPEED_MULTIPLIER
        } else {
            self.config.speed
        };
        self.draw_board(surface);
        self.place_food(surface, rng);
    }

    pub fn start(&mut self) {
        if !self.game_over {
            self.running = true;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    /// Turn request from the player. Ignored while autoplay owns the
    /// heading.
    pub fn push_turn(&mut self, dir: Dir) {
        if !self.autoplay {
            self.snake.push_turn(dir);
        }
    }

    /// Symmetric speed change: toggling on then off restores the previous
    /// cells-per-second value.
    pub fn toggle_autoplay(&mut self) {
        self.autoplay = !self.autoplay;
        if self.autoplay {
            self.speed *= AUTOPLAY_SPEED_MULTIPLIER;
        } else {
            self.speed /= AUTOPLAY_SPEED_MULTIPLIER;
        }
    }

    /// One scheduler frame at `now_ms` (monotonic, milliseconds). Safe to
    /// re-invoke with a non-advancing timestamp: that only re-draws the
    /// same partial fill.
    pub fn handle_frame(
        &mut self,
        now_ms: f64,
        surface: &mut dyn Surface,
        rng: &mut impl Rng,
    ) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Stop;
        }
        let entered_at = match self.entered_at {
            None => return self.commit_next_head(now_ms, surface, rng),
            Some(t) => t,
        };

        let proportion = (now_ms - entered_at) * self.speed / 1000.0;
        if proportion < 1.0 {
            self.draw_partial(surface, proportion);
            return FrameOutcome::Continue;
        }

        // The head cell is fully entered: finish its fill, let the tail go
        // unless this transit consumed food, then commit the next cell.
        surface.fill_rect(self.cell_rect(self.snake.head()), COLOR_SNAKE);
        if self.eating {
            self.eating = false;
        } else {
            let tail = self.snake.tail();
            surface.fill_rect(self.full_cell_rect(tail), COLOR_GRASS);
            self.grid.set(tail, CellState::Grass);
            self.snake.retract_tail();
        }

        if self.autoplay {
            if let Some(food) = self.food {
                if let Some(dir) = pathfind::choose_heading(&self.grid, &self.snake, food) {
                    self.snake.push_turn(dir);
                }
            }
        }

        self.commit_next_head(now_ms, surface, rng)
    }

    /// Advance the head into the next cell, or end the round on collision.
    fn commit_next_head(
        &mut self,
        now_ms: f64,
        surface: &mut dyn Surface,
        rng: &mut impl Rng,
    ) -> FrameOutcome {
        self.snake.apply_next_legal_turn();
        self.score.decrement_bonus_points();

        let next = match self.grid.step(self.snake.head(), self.snake.heading()) {
            Some(cell) if self.grid.is_traversable(cell) => cell,
            _ => {
                self.running = false;
                self.game_over = true;
                return FrameOutcome::Stop;
            }
        };

        let was_food = self.grid.is_food(next);
        let was_super = self.grid.is_super_food(next);
        self.grid.set(next, CellState::Body);
        self.snake.extend_at_head(next);
        self.entered_at = Some(now_ms);
        self.eating = was_food || was_super;

        if self.eating {
            // Boost is idempotent: super-food engages it once, plain food
            // releases it once.
            if was_super && !self.boosted {
                self.speed *= BOOST_MULTIPLIER;
                self.boosted = true;
            } else if was_food && self.boosted {
                self.speed /= BOOST_MULTIPLIER;
                self.boosted = false;
            }
            self.score.increment_score();
            self.speed *= SPEED_UP_FACTOR;
            self.food = None;
            self.place_food(surface, rng);
        }

        FrameOutcome::Continue
    }

    /// Place a food cell on random grass, picking the kind by chance, and
    /// seed the bonus from its distance to the head. A fully occupied grid
    /// simply skips placement for this cycle.
    fn place_food(&mut self, surface: &mut dyn Surface, rng: &mut impl Rng) {
        let Some(cell) = self.grid.random_cell(CellState::Grass, rng) else {
            return;
        };
        let (state, base) = if rng.gen::<f64>() < SUPER_FOOD_CHANCE {
            (CellState::SuperFood, SUPER_FOOD_BONUS)
        } else {
            (CellState::Food, FOOD_BONUS)
        };
        self.grid.set(cell, state);
        surface.fill_rect(self.cell_rect(cell), color_for(state));
        self.score
            .set_bonus_points(self.grid.manhattan(self.snake.head(), cell) + base);
        self.food = Some(cell);
    }

    fn draw_partial(&self, surface: &mut dyn Surface, proportion: f64) {
        let head = self.snake.head();
        surface.fill_rect(
            self.partial_rect(head, self.snake.heading(), proportion),
            COLOR_SNAKE,
        );
        if !self.eating && self.snake.len() >= 2 {
            let tail = self.snake.tail();
            if let Some(dir) = self.grid.dir_between(tail, self.snake.cell_after_tail()) {
                surface.fill_rect(self.partial_rect(tail, dir, proportion), COLOR_GRASS);
            }
        }
    }

    fn draw_board(&self, surface: &mut dyn Surface) {
        for y in 0..self.grid.dimension() {
            for x in 0..self.grid.dimension() {
                let cell = self.grid.at(x, y);
                surface.fill_rect(self.full_cell_rect(cell), COLOR_GRASS);
                let state = self.grid.get(cell);
                if state != CellState::Grass {
                    surface.fill_rect(self.cell_rect(cell), color_for(state));
                }
            }
        }
    }

    fn inner_box(&self, cell: Cell) -> (u16, u16, u16) {
        let px = self.config.cell_px;
        let inset = self.config.inset_px;
        let x = self.grid.x(cell) as u16 * px + inset;
        let y = self.grid.y(cell) as u16 * px + inset;
        (x, y, px - 2 * inset)
    }

    fn cell_rect(&self, cell: Cell) -> Rect {
        let (x, y, side) = self.inner_box(cell);
        Rect {
            x,
            y,
            w: side,
            h: side,
        }
    }

    fn full_cell_rect(&self, cell: Cell) -> Rect {
        let px = self.config.cell_px;
        Rect {
            x: self.grid.x(cell) as u16 * px,
            y: self.grid.y(cell) as u16 * px,
            w: px,
            h: px,
        }
    }

    /// Sub-cell rectangle covering `proportion` of the cell, anchored at
    /// the edge through which `dir` enters it and growing along `dir`.
    fn partial_rect(&self, cell: Cell, dir: Dir, proportion: f64) -> Rect {
        let (x, y, side) = self.inner_box(cell);
        let span = ((proportion * side as f64).round() as u16).min(side);
        match dir {
            Dir::Right => Rect {
                x,
                y,
                w: span,
                h: side,
            },
            Dir::Left => Rect {
                x: x + side - span,
                y,
                w: span,
                h: side,
            },
            Dir::Down => Rect {
                x,
                y,
                w: side,
                h: span,
            },
            Dir::Up => Rect {
                x,
                y: y + side - span,
                w: side,
                h: span,
            },
        }
    }
}
