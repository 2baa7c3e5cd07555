//! Lives and currency tally driven by simulation events.

use log::debug;
use waypoint_defence_core::Event;

use crate::level::GameRules;

/// Host-side score keeping; the simulation never sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GameState {
    lives: u32,
    currency: u32,
    kill_reward: u32,
    kills: u32,
    escaped: u32,
}

impl GameState {
    pub(crate) fn new(rules: GameRules) -> Self {
        Self {
            lives: rules.lives,
            currency: rules.currency,
            kill_reward: rules.kill_reward,
            kills: 0,
            escaped: 0,
        }
    }

    /// Updates the tally from one step's events.
    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemyReachedBase { enemy } => {
                    self.escaped += 1;
                    self.lives = self.lives.saturating_sub(1);
                    debug!("enemy {} escaped, {} lives left", enemy.get(), self.lives);
                }
                Event::EnemyKilled { .. } => {
                    self.kills += 1;
                    self.currency = self.currency.saturating_add(self.kill_reward);
                }
                _ => {}
            }
        }
    }

    pub(crate) fn is_over(&self) -> bool {
        self.lives == 0
    }

    pub(crate) fn lives(&self) -> u32 {
        self.lives
    }

    pub(crate) fn currency(&self) -> u32 {
        self.currency
    }

    pub(crate) fn kills(&self) -> u32 {
        self.kills
    }

    pub(crate) fn escaped(&self) -> u32 {
        self.escaped
    }
}
