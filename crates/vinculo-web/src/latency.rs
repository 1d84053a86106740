use std::time::Duration;

use vinculo_core::config::StoreConfig;

/// Store operations, each with the delay a remote database round-trip used to cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    List,
    Get,
    Create,
    Update,
    Delete,
    Stats,
    Recent,
}

impl StoreOp {
    fn base_millis(self) -> u64 {
        match self {
            Self::List => 500,
            Self::Get => 300,
            Self::Create => 700,
            Self::Update => 700,
            Self::Delete => 500,
            Self::Stats => 200,
            Self::Recent => 400,
        }
    }

    /// Delay for this operation under `config`; zero when simulation is off.
    pub fn delay(self, config: &StoreConfig) -> Duration {
        if !config.simulate_latency {
            return Duration::ZERO;
        }
        let millis = self.base_millis() as f64 * config.latency_scale.max(0.0);
        Duration::from_millis(millis.round() as u64)
    }
}

/// Sleep for the simulated latency of `op`. Must be awaited before taking the store lock.
pub async fn simulate(config: &StoreConfig, op: StoreOp) {
    let delay = op.delay(config);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_delay_when_disabled() {
        let config = StoreConfig::default();
        assert_eq!(StoreOp::Create.delay(&config), Duration::ZERO);
    }

    #[test]
    fn test_delays_scale() {
        let config = StoreConfig {
            simulate_latency: true,
            latency_scale: 0.5,
            ..Default::default()
        };
        assert_eq!(StoreOp::Create.delay(&config), Duration::from_millis(350));
        assert_eq!(StoreOp::Stats.delay(&config), Duration::from_millis(100));
    }

    #[test]
    fn test_unscaled_delays() {
        let config = StoreConfig {
            simulate_latency: true,
            ..Default::default()
        };
        let millis: Vec<u128> = [
            StoreOp::List,
            StoreOp::Get,
            StoreOp::Create,
            StoreOp::Update,
            StoreOp::Delete,
            StoreOp::Stats,
            StoreOp::Recent,
        ]
        .iter()
        .map(|op| op.delay(&config).as_millis())
        .collect();
        assert_eq!(millis, vec![500, 300, 700, 700, 500, 200, 400]);
    }

    #[tokio::test]
    async fn test_simulate_returns_immediately_when_disabled() {
        let start = std::time::Instant::now();
        simulate(&StoreConfig::default(), StoreOp::List).await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
