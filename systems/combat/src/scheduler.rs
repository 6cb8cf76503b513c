use std::collections::BTreeMap;

use fish_hunt_core::{ChainId, FishId, Point};

/// Effect deferred to a later logical tick.
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduledAction {
    /// Searches for hop targets around a point.
    ChainExpand {
        /// Chain the expansion belongs to.
        chain: ChainId,
        /// Centre of the search.
        around: Point,
        /// Hop level of the targets found, starting at zero.
        level: u32,
    },
    /// Strikes a fish selected by an expansion.
    ChainHop {
        /// Chain the hop belongs to.
        chain: ChainId,
        /// Fish the hop will strike.
        target: FishId,
        /// Hop level, starting at zero.
        level: u32,
    },
    /// Resolves a lightning strike that was already paid for.
    LightningStrike {
        /// Fish the strike will hit.
        target: FishId,
        /// Damage the strike deals.
        damage: f32,
        /// Cannon tier when the strike was charged.
        tier: u8,
    },
}

impl ScheduledAction {
    /// Chain the action belongs to, if any.
    #[must_use]
    pub fn chain(&self) -> Option<ChainId> {
        match self {
            Self::ChainExpand { chain, .. } | Self::ChainHop { chain, .. } => Some(*chain),
            Self::LightningStrike { .. } => None,
        }
    }
}

/// Queue of deferred actions ordered by due tick, then by insertion order.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    queue: BTreeMap<(u64, u64), ScheduledAction>,
    sequence: u64,
}

impl Scheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` to run at tick `due`.
    pub fn schedule(&mut self, due: u64, action: ScheduledAction) {
        let key = (due, self.sequence);
        self.sequence += 1;
        let _ = self.queue.insert(key, action);
    }

    /// Removes and returns every action due at or before `now`, in order.
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledAction> {
        let later = self.queue.split_off(&(now.saturating_add(1), 0));
        let due = std::mem::replace(&mut self.queue, later);
        due.into_values().collect()
    }

    /// Number of queued actions belonging to `chain`.
    #[must_use]
    pub fn pending_for(&self, chain: ChainId) -> usize {
        self.queue
            .values()
            .filter(|action| action.chain() == Some(chain))
            .count()
    }

    /// Number of queued actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reports whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every queued action.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(id: u32) -> ScheduledAction {
        ScheduledAction::LightningStrike {
            target: FishId::new(id),
            damage: 1.0,
            tier: 0,
        }
    }

    #[test]
    fn drains_by_due_tick_then_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(5, strike(1));
        scheduler.schedule(3, strike(2));
        scheduler.schedule(5, strike(3));
        scheduler.schedule(9, strike(4));

        assert!(scheduler.drain_due(2).is_empty());
        assert_eq!(scheduler.drain_due(5), vec![strike(2), strike(1), strike(3)]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.drain_due(100), vec![strike(4)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn counts_pending_actions_per_chain() {
        let mut scheduler = Scheduler::new();
        let chain = ChainId::new(1);
        scheduler.schedule(
            4,
            ScheduledAction::ChainHop {
                chain,
                target: FishId::new(7),
                level: 0,
            },
        );
        scheduler.schedule(
            4,
            ScheduledAction::ChainExpand {
                chain: ChainId::new(2),
                around: Point::new(0.0, 0.0),
                level: 0,
            },
        );
        scheduler.schedule(4, strike(9));
        assert_eq!(scheduler.pending_for(chain), 1);

        scheduler.clear();
        assert_eq!(scheduler.pending_for(chain), 0);
    }
}
