pub const DEFAULT_DIMENSION: usize = 20;
pub const DEFAULT_CELL_PX: u16 = 8;
pub const DEFAULT_INSET_PX: u16 = 0;
pub const DEFAULT_SPEED: f64 = 8.0;
pub const DEFAULT_RENDER_FPS: u64 = 120;

/// Each food eaten multiplies the traversal speed; there is no cap.
pub const SPEED_UP_FACTOR: f64 = 1.05;
pub const BOOST_MULTIPLIER: f64 = 2.0;
pub const AUTOPLAY_SPEED_MULTIPLIER: f64 = 10.0;
pub const SUPER_FOOD_CHANCE: f64 = 0.15;
pub const FOOD_BONUS: u32 = 10;
pub const SUPER_FOOD_BONUS: u32 = 50;

#[derive(Clone, Copy)]
pub struct Config {
    /// Grid side length in cells.
    pub dimension: usize,
    /// Cell side length in surface pixels.
    pub cell_px: u16,
    /// Margin kept clear inside each drawn cell.
    pub inset_px: u16,
    /// Traversal speed at game start, in cells per second.
    pub speed: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            cell_px: DEFAULT_CELL_PX,
            inset_px: DEFAULT_INSET_PX,
            speed: DEFAULT_SPEED,
        }
    }
}

/// Runtime settings from the environment, falling back to defaults on
/// anything missing or unparseable.
pub fn read_settings() -> (Config, u64) {
    let dimension = std::env::var("SNAKE_GRID")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| (4..=64).contains(v))
        .unwrap_or(DEFAULT_DIMENSION);
    let speed = std::env::var("SNAKE_SPEED")
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| *v > 0.0)
        .unwrap_or(DEFAULT_SPEED);
    let render_fps = std::env::var("SNAKE_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    (
        Config {
            dimension,
            speed,
            ..Config::default()
        },
        render_fps,
    )
}
