/// Receives score/bonus change notifications. Called synchronously at the
/// point of change, zero or more times per frame; must not panic.
pub trait ScoreObserver {
    fn on_score_changed(&mut self, score: u32);
    fn on_bonus_points_changed(&mut self, points: u32);
}

pub struct Scorekeeper {
    score: u32,
    bonus_points: u32,
    observer: Box<dyn ScoreObserver>,
}

impl Scorekeeper {
    pub fn new(observer: Box<dyn ScoreObserver>) -> Self {
        Self {
            score: 0,
            bonus_points: 0,
            observer,
        }
    }

    #[allow(dead_code)]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[allow(dead_code)]
    pub fn bonus_points(&self) -> u32 {
        self.bonus_points
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.bonus_points = 0;
        self.observer.on_score_changed(0);
        self.observer.on_bonus_points_changed(0);
    }

    /// Score grows by 1 plus the remaining bonus, once per food consumed.
    pub fn increment_score(&mut self) {
        self.score += 1 + self.bonus_points;
        self.observer.on_score_changed(self.score);
    }

    pub fn set_bonus_points(&mut self, points: u32) {
        self.bonus_points = points;
        self.observer.on_bonus_points_changed(self.bonus_points);
    }

    /// Invoked once per committed cell entry, not per animation frame.
    pub fn decrement_bonus_points(&mut self) {
        self.set_bonus_points(self.bonus_points.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    pub struct Recorded {
        pub scores: Vec<u32>,
        pub bonuses: Vec<u32>,
    }

    pub struct Recorder(pub Rc<RefCell<Recorded>>);

    impl ScoreObserver for Recorder {
        fn on_score_changed(&mut self, score: u32) {
            self.0.borrow_mut().scores.push(score);
        }

        fn on_bonus_points_changed(&mut self, points: u32) {
            self.0.borrow_mut().bonuses.push(points);
        }
    }

    fn recorded_scorekeeper() -> (Scorekeeper, Rc<RefCell<Recorded>>) {
        let log = Rc::new(RefCell::new(Recorded::default()));
        (Scorekeeper::new(Box::new(Recorder(log.clone()))), log)
    }

    #[test]
    fn test_score_adds_one_plus_bonus() {
        let (mut keeper, log) = recorded_scorekeeper();
        keeper.set_bonus_points(25);
        keeper.increment_score();
        assert_eq!(keeper.score(), 26);
        keeper.increment_score();
        assert_eq!(keeper.score(), 52);
        assert_eq!(log.borrow().scores, vec![26, 52]);
    }

    #[test]
    fn test_bonus_clamped_at_zero() {
        let (mut keeper, log) = recorded_scorekeeper();
        keeper.set_bonus_points(2);
        keeper.decrement_bonus_points();
        keeper.decrement_bonus_points();
        keeper.decrement_bonus_points();
        assert_eq!(keeper.bonus_points(), 0);
        assert_eq!(log.borrow().bonuses, vec![2, 1, 0, 0]);
    }

    #[test]
    fn test_reset_notifies_both_channels() {
        let (mut keeper, log) = recorded_scorekeeper();
        keeper.set_bonus_points(5);
        keeper.increment_score();
        keeper.reset();
        assert_eq!(keeper.score(), 0);
        assert_eq!(keeper.bonus_points(), 0);
        assert_eq!(*log.borrow().scores.last().unwrap(), 0);
        assert_eq!(*log.borrow().bonuses.last().unwrap(), 0);
    }
}
