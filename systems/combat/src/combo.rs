use fish_hunt_core::config::CombatTuning;

/// Result of feeding a hit into the combo tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComboOutcome {
    /// Nothing notable happened.
    Unchanged,
    /// The combo grew; `bonus` is non-zero on every bonus threshold.
    Extended {
        /// Combo after the kill.
        combo: u32,
        /// Flat score bonus earned by this kill.
        bonus: u64,
    },
    /// A non-scoring hit reset a running combo.
    Broken {
        /// Combo before the reset.
        previous: u32,
    },
}

/// Consecutive-kill counter with periodic flat bonuses.
#[derive(Clone, Debug)]
pub struct ComboTracker {
    every: u32,
    step: u64,
    combo: u32,
    highest: u32,
}

impl ComboTracker {
    /// Creates a tracker with an empty combo.
    #[must_use]
    pub fn new(tuning: &CombatTuning) -> Self {
        Self {
            every: tuning.combo_bonus_every.max(1),
            step: tuning.combo_bonus_step,
            combo: 0,
            highest: 0,
        }
    }

    /// Current combo.
    #[must_use]
    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Highest combo reached since the last reset of the tracker.
    #[must_use]
    pub fn highest(&self) -> u32 {
        self.highest
    }

    /// Records a kill.
    pub fn kill(&mut self) -> ComboOutcome {
        self.combo += 1;
        self.highest = self.highest.max(self.combo);
        let bonus = if self.combo % self.every == 0 {
            u64::from(self.combo / self.every) * self.step
        } else {
            0
        };
        ComboOutcome::Extended {
            combo: self.combo,
            bonus,
        }
    }

    /// Records a hit that produced no score.
    pub fn miss(&mut self) -> ComboOutcome {
        if self.combo == 0 {
            return ComboOutcome::Unchanged;
        }
        let previous = self.combo;
        self.combo = 0;
        ComboOutcome::Broken { previous }
    }

    /// Forgets the combo and the highest combo.
    pub fn reset(&mut self) {
        self.combo = 0;
        self.highest = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fifth_kill_pays_a_growing_bonus() {
        let mut tracker = ComboTracker::new(&CombatTuning::default());
        let bonuses: Vec<u64> = (0..10)
            .map(|_| match tracker.kill() {
                ComboOutcome::Extended { bonus, .. } => bonus,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(bonuses, vec![0, 0, 0, 0, 10, 0, 0, 0, 0, 20]);
        assert_eq!(tracker.combo(), 10);
    }

    #[test]
    fn zero_score_hit_breaks_the_combo() {
        let mut tracker = ComboTracker::new(&CombatTuning::default());
        assert_eq!(tracker.miss(), ComboOutcome::Unchanged);
        let _ = tracker.kill();
        let _ = tracker.kill();
        assert_eq!(tracker.miss(), ComboOutcome::Broken { previous: 2 });
        assert_eq!(tracker.combo(), 0);
        assert_eq!(tracker.highest(), 2);
    }
}
