//! Simulated loading bar
//!
//! Progress creeps up in random increments at a fixed interval. Once it hits
//! 100% the bar lingers for a short settle delay before reporting done.

use vignette_core::Rng;

use crate::config::LoadingConfig;

#[derive(Debug, Clone)]
pub struct LoadingBar {
    /// Percent, 0.0..=100.0
    progress: f32,
    since_tick: f32,
    settled_for: f32,
    done: bool,
    config: LoadingConfig,
}

impl LoadingBar {
    pub fn new(config: LoadingConfig) -> Self {
        Self {
            progress: 0.0,
            since_tick: 0.0,
            settled_for: 0.0,
            done: false,
            config,
        }
    }

    /// Advance by `dt` seconds
    ///
    /// Returns true exactly once: on the update that finishes the settle delay.
    pub fn update(&mut self, dt: f32, rng: &mut Rng) -> bool {
        if self.done {
            return false;
        }

        if self.progress >= 100.0 {
            self.settled_for += dt.max(0.0);
            if self.settled_for >= self.config.settle_delay {
                self.done = true;
                log::info!("Loading complete");
                return true;
            }
            return false;
        }

        self.since_tick += dt.max(0.0);
        let interval = self.config.tick_interval.max(0.001);
        while self.since_tick >= interval && self.progress < 100.0 {
            self.since_tick -= interval;
            // a zero step would never finish
            let step = rng.range(0.0, self.config.max_step).max(0.5);
            self.progress = (self.progress + step).min(100.0);
        }
        false
    }

    /// Percent complete
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}
