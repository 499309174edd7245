//! Publisher configuration.

use std::time::Duration;

/// Publisher configuration.
#[derive(Clone, Debug)]
pub struct PublisherConfig {
    // Fees
    /// Absolute fee ceiling in wei, applied to every send and used to size
    /// the required balance (default: 100 gwei).
    pub max_fee_per_gas: u128,
    /// Priority tip in wei, added to the base fee when predicting effective
    /// cost (default: 1 gwei).
    pub max_priority_fee_per_gas: u128,

    // Gas
    /// Uniform gas limit applied to every transaction in a batch
    /// (default: 10M).
    pub gas_limit: u64,

    // Retry
    /// Pause between retry rounds in the gate, the submitter, and the outer
    /// loop (default: 60s).
    pub retry_interval: Duration,
    /// Per-transaction receipt polling budget (default: 5m).
    pub receipt_timeout: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            max_fee_per_gas: 100_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
            gas_limit: 10_000_000,
            retry_interval: Duration::from_secs(60),
            receipt_timeout: Duration::from_secs(300),
        }
    }
}

impl PublisherConfig {
    /// Creates a new builder for configuring a publisher.
    pub fn builder() -> PublisherConfigBuilder {
        PublisherConfigBuilder::default()
    }
}

/// Builder for [`PublisherConfig`].
#[derive(Clone, Debug)]
pub struct PublisherConfigBuilder {
    max_fee_per_gas: u128,
    max_priority_fee_per_gas: u128,
    gas_limit: u64,
    retry_interval: Duration,
    receipt_timeout: Duration,
}

impl Default for PublisherConfigBuilder {
    fn default() -> Self {
        let defaults = PublisherConfig::default();
        Self {
            max_fee_per_gas: defaults.max_fee_per_gas,
            max_priority_fee_per_gas: defaults.max_priority_fee_per_gas,
            gas_limit: defaults.gas_limit,
            retry_interval: defaults.retry_interval,
            receipt_timeout: defaults.receipt_timeout,
        }
    }
}

impl PublisherConfigBuilder {
    /// Sets the absolute fee ceiling in wei.
    pub const fn max_fee_per_gas(mut self, max_fee_per_gas: u128) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self
    }

    /// Sets the priority tip in wei.
    pub const fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: u128) -> Self {
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
        self
    }

    /// Sets the uniform gas limit.
    pub const fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Sets the retry pause.
    pub const fn retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Sets the per-transaction receipt polling budget.
    pub const fn receipt_timeout(mut self, receipt_timeout: Duration) -> Self {
        self.receipt_timeout = receipt_timeout;
        self
    }

    /// Builds the [`PublisherConfig`].
    pub const fn build(self) -> PublisherConfig {
        PublisherConfig {
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            gas_limit: self.gas_limit,
            retry_interval: self.retry_interval,
            receipt_timeout: self.receipt_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn config_defaults() {
        let config = PublisherConfig::default();
        assert_eq!(config.max_fee_per_gas, 100_000_000_000);
        assert_eq!(config.max_priority_fee_per_gas, 1_000_000_000);
        assert_eq!(config.gas_limit, 10_000_000);
        assert_eq!(config.retry_interval, Duration::from_secs(60));
        assert_eq!(config.receipt_timeout, Duration::from_secs(300));
    }

    #[test]
    fn builder_defaults_match_config_defaults() {
        let built = PublisherConfig::builder().build();
        let defaults = PublisherConfig::default();
        assert_eq!(built.max_fee_per_gas, defaults.max_fee_per_gas);
        assert_eq!(built.max_priority_fee_per_gas, defaults.max_priority_fee_per_gas);
        assert_eq!(built.gas_limit, defaults.gas_limit);
        assert_eq!(built.retry_interval, defaults.retry_interval);
        assert_eq!(built.receipt_timeout, defaults.receipt_timeout);
    }

    #[test]
    fn builder_chaining() {
        let config = PublisherConfig::builder()
            .max_fee_per_gas(50_000_000_000)
            .max_priority_fee_per_gas(2_000_000_000)
            .gas_limit(12_000_000)
            .retry_interval(Duration::from_secs(30))
            .receipt_timeout(Duration::from_secs(120))
            .build();

        assert_eq!(config.max_fee_per_gas, 50_000_000_000);
        assert_eq!(config.max_priority_fee_per_gas, 2_000_000_000);
        assert_eq!(config.gas_limit, 12_000_000);
        assert_eq!(config.retry_interval, Duration::from_secs(30));
        assert_eq!(config.receipt_timeout, Duration::from_secs(120));
    }

    #[rstest]
    #[case(1_000_000_000)]
    #[case(50_000_000_000)]
    #[case(500_000_000_000)]
    fn builder_max_fee_variants(#[case] fee: u128) {
        let config = PublisherConfig::builder().max_fee_per_gas(fee).build();
        assert_eq!(config.max_fee_per_gas, fee);
    }

    #[test]
    fn builder_partial_configuration_keeps_defaults() {
        let config = PublisherConfig::builder().gas_limit(1_000_000).build();
        assert_eq!(config.gas_limit, 1_000_000);
        assert_eq!(config.retry_interval, Duration::from_secs(60));
    }
}
