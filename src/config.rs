//! Table sizing policy for `ChainedMap`.

use core::fmt;

pub const DEFAULT_INITIAL_BUCKETS: usize = 16;
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 1.5;
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Rejected `TableConfig` field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    ZeroBuckets,
    /// Load factor must be finite and strictly positive.
    InvalidLoadFactor(f64),
    /// Growth factor must be at least 2 so the table strictly grows.
    InvalidGrowthFactor(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBuckets => f.write_str("initial bucket count must be positive"),
            ConfigError::InvalidLoadFactor(lf) => {
                write!(f, "max load factor must be finite and > 0, got {}", lf)
            }
            ConfigError::InvalidGrowthFactor(g) => {
                write!(f, "growth factor must be >= 2, got {}", g)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// When and how far the bucket array grows.
///
/// The table is rehashed once `len / buckets` exceeds `max_load_factor`; the
/// new bucket count is `buckets * growth_factor`. Tables never shrink.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    initial_buckets: usize,
    max_load_factor: f64,
    growth_factor: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_buckets(mut self, buckets: usize) -> Result<Self, ConfigError> {
        if buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        self.initial_buckets = buckets;
        Ok(self)
    }

    pub fn with_max_load_factor(mut self, lf: f64) -> Result<Self, ConfigError> {
        if !lf.is_finite() || lf <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(lf));
        }
        self.max_load_factor = lf;
        Ok(self)
    }

    pub fn with_growth_factor(mut self, factor: usize) -> Result<Self, ConfigError> {
        if factor < 2 {
            return Err(ConfigError::InvalidGrowthFactor(factor));
        }
        self.growth_factor = factor;
        Ok(self)
    }

    pub fn initial_buckets(&self) -> usize {
        self.initial_buckets
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn growth_factor(&self) -> usize {
        self.growth_factor
    }

    /// Smallest bucket count, at least `initial_buckets`, that holds `pairs`
    /// without exceeding the load factor.
    pub(crate) fn buckets_for(&self, pairs: usize) -> usize {
        let needed = (pairs as f64 / self.max_load_factor).ceil();
        let needed = if needed >= usize::MAX as f64 {
            usize::MAX
        } else {
            needed as usize
        };
        needed.max(self.initial_buckets)
    }

    pub(crate) fn over_threshold(&self, pairs: usize, buckets: usize) -> bool {
        pairs as f64 / buckets as f64 > self.max_load_factor
    }
}
