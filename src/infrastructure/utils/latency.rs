use std::time::Duration;

use rand::Rng;

use crate::settings::AppConfig;

/// Artificial delay applied to simulated responses so they feel like a real
/// upstream call. A zero range disables it.
#[derive(Debug, Clone, Copy)]
pub struct MockLatency {
    min_ms: u64,
    max_ms: u64,
}

impl MockLatency {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        MockLatency { min_ms: min_ms.min(max_ms), max_ms }
    }

    pub fn none() -> Self {
        MockLatency { min_ms: 0, max_ms: 0 }
    }

    pub fn pick(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.max_ms);
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..self.max_ms);
        Duration::from_millis(ms)
    }

    pub async fn simulate(&self) {
        let delay = self.pick();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl From<&AppConfig> for MockLatency {
    fn from(config: &AppConfig) -> Self {
        MockLatency::new(config.mock_delay_min_ms, config.mock_delay_max_ms)
    }
}
