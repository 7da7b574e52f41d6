mod config;
mod engine;
mod grid;
mod pathfind;
mod render;
mod score;
mod snake;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::cell::RefCell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use engine::{Engine, FrameOutcome};
use grid::Dir;
use render::TermSurface;
use score::ScoreObserver;

#[derive(Default)]
struct HudState {
    score: u32,
    bonus: u32,
}

/// Score observer feeding the HUD line shared with the render loop.
struct HudSink(Rc<RefCell<HudState>>);

impl ScoreObserver for HudSink {
    fn on_score_changed(&mut self, score: u32) {
        self.0.borrow_mut().score = score;
    }

    fn on_bonus_points_changed(&mut self, points: u32) {
        self.0.borrow_mut().bonus = points;
    }
}

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout) -> io::Result<()> {
    let (config, render_fps) = config::read_settings();
    let mut rng = rand::thread_rng();
    let hud = Rc::new(RefCell::new(HudState::default()));
    let mut game = Engine::new(config, Box::new(HudSink(hud.clone())));
    let mut surface = TermSurface::new(config.dimension, config.cell_px);
    game.reset(&mut surface, &mut rng);

    let clock = Instant::now();
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));
    // The engine never schedules itself: this loop is the frame scheduler,
    // and it stops calling handle_frame once the engine reports Stop.
    let mut scheduled = false;

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Up | KeyCode::Char('k') => game.push_turn(Dir::Up),
                    KeyCode::Down | KeyCode::Char('j') => game.push_turn(Dir::Down),
                    KeyCode::Left | KeyCode::Char('h') => game.push_turn(Dir::Left),
                    KeyCode::Right | KeyCode::Char('l') => game.push_turn(Dir::Right),
                    KeyCode::Char(' ') => {
                        game.start();
                        scheduled = game.is_running();
                    }
                    KeyCode::Char('r') => {
                        game.reset(&mut surface, &mut rng);
                        game.start();
                        scheduled = true;
                    }
                    KeyCode::Char('a') => game.toggle_autoplay(),
                    _ => {}
                }
            }
        }

        if scheduled {
            let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
            if game.handle_frame(now_ms, &mut surface, &mut rng) == FrameOutcome::Stop {
                scheduled = false;
            }
        }

        surface.flush(stdout, &hud_line(&game, &hud.borrow()))?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn hud_line(game: &Engine, hud: &HudState) -> String {
    let status = if game.is_game_over() {
        "GAME OVER - r restart, q quit"
    } else if !game.is_running() {
        "space start, r restart, a autoplay, q quit"
    } else if game.autoplay() {
        "autoplay"
    } else {
        ""
    };
    format!("Score: {}  Bonus: {}  {}", hud.score, hud.bonus, status)
}
