//! Score, coin and bet book-keeping for a single session.

use fish_hunt_core::{config::EconomyConfig, Refusal};

/// Balances and wagering totals of the running session.
#[derive(Clone, Debug)]
pub(crate) struct Economy {
    score: u64,
    coins: u64,
    bet: u64,
    options: Vec<u64>,
    min_bet: u64,
    max_bet: u64,
    wagered: u64,
    won: u64,
}

impl Economy {
    pub(crate) fn new(config: &EconomyConfig) -> Self {
        Self {
            score: config.initial_score,
            coins: config.initial_coins,
            bet: config.default_bet,
            options: config.bet_options.clone(),
            min_bet: config.min_bet,
            max_bet: config.max_bet,
            wagered: 0,
            won: 0,
        }
    }

    pub(crate) fn score(&self) -> u64 {
        self.score
    }

    pub(crate) fn coins(&self) -> u64 {
        self.coins
    }

    pub(crate) fn bet(&self) -> u64 {
        self.bet
    }

    pub(crate) fn wagered(&self) -> u64 {
        self.wagered
    }

    pub(crate) fn won(&self) -> u64 {
        self.won
    }

    pub(crate) fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    /// Deducts `amount`, stopping at zero.
    pub(crate) fn spend_score(&mut self, amount: u64) {
        self.score = self.score.saturating_sub(amount);
    }

    pub(crate) fn earn_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
        self.won = self.won.saturating_add(amount);
    }

    /// Checks that the balance covers the current bet without charging it.
    pub(crate) fn check_bet(&self) -> Result<(), Refusal> {
        if self.coins < self.bet {
            return Err(Refusal::InsufficientFunds {
                bet: self.bet,
                coins: self.coins,
            });
        }
        Ok(())
    }

    /// Charges the current bet and returns the amount paid.
    pub(crate) fn charge_bet(&mut self) -> Result<u64, Refusal> {
        self.check_bet()?;
        self.coins -= self.bet;
        self.wagered = self.wagered.saturating_add(self.bet);
        Ok(self.bet)
    }

    pub(crate) fn set_bet(&mut self, amount: u64) -> Result<u64, Refusal> {
        if !(self.min_bet..=self.max_bet).contains(&amount) {
            return Err(Refusal::InvalidBet { amount });
        }
        self.bet = amount;
        Ok(amount)
    }

    /// Steps to the next larger bet option, if any.
    pub(crate) fn raise_bet(&mut self) -> Option<u64> {
        let next = self.options.iter().copied().find(|option| *option > self.bet)?;
        self.bet = next;
        Some(next)
    }

    /// Steps to the next smaller bet option, if any.
    pub(crate) fn lower_bet(&mut self) -> Option<u64> {
        let next = self
            .options
            .iter()
            .rev()
            .copied()
            .find(|option| *option < self.bet)?;
        self.bet = next;
        Some(next)
    }
}
