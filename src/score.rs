//! Score and combo bookkeeping
//!
//! The simulation reports score events with a base value; the board owns
//! the combo multiplier. A hit landing within `combo_timeout` seconds of
//! the previous one extends the combo, otherwise the combo restarts at 1.

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    pub score: u64,
    pub combo: u32,
    /// Sim time of the last scoring hit
    last_hit: Option<f32>,
    pub combo_timeout: f32,
}

impl ScoreBoard {
    pub fn new(combo_timeout: f32) -> Self {
        Self {
            score: 0,
            combo: 0,
            last_hit: None,
            combo_timeout,
        }
    }

    /// Add `base` at sim time `now`; returns the points actually awarded
    pub fn add_score(&mut self, base: u32, now: f32) -> u64 {
        let chained = self.last_hit.is_some_and(|last| now - last < self.combo_timeout);
        self.combo = if chained { self.combo + 1 } else { 1 };
        self.last_hit = Some(now);

        let awarded = base as u64 * self.combo as u64;
        self.score += awarded;
        awarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_combo_chain_and_reset() {
        let mut board = ScoreBoard::new(2.0);
        assert_eq!(board.add_score(100, 0.0), 100);
        assert_eq!(board.combo, 1);
        assert_eq!(board.add_score(100, 1.0), 200);
        assert_eq!(board.combo, 2);
        assert_eq!(board.add_score(100, 4.0), 100);
        assert_eq!(board.combo, 1);
        assert_eq!(board.score, 400);
    }

    #[test]
    fn test_gap_equal_to_timeout_breaks_combo() {
        let mut board = ScoreBoard::new(2.0);
        board.add_score(10, 1.0);
        board.add_score(10, 3.0);
        assert_eq!(board.combo, 1);
    }

    proptest! {
        #[test]
        fn prop_combo_rule(gaps in prop::collection::vec(0.0f32..5.0, 1..40)) {
            let mut board = ScoreBoard::new(2.0);
            let mut now = 0.0;
            board.add_score(1, now);
            for gap in gaps {
                let before = board.combo;
                let last = now;
                now += gap;
                board.add_score(1, now);
                if now - last < 2.0 {
                    prop_assert_eq!(board.combo, before + 1);
                } else {
                    prop_assert_eq!(board.combo, 1);
                }
            }
        }
    }
}
