//! # Batch Configuration
//!
//! Settings that shape a [`BatchNode`](crate::batch::BatchNode): how many quads
//! the atlas holds up front, how it grows once full, and how children are
//! ordered relative to their parent in the draw sequence.
//!
//! ## Example (TOML)
//!
//! ```toml
//! initial_capacity = 64
//! child_order = "NegativeZBehindParent"
//!
//! [growth]
//! numerator = 3
//! denominator = 2
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};

/// Atlas capacity used when none is given.
///
/// Fits a common default scene without an early reallocation.
pub const DEFAULT_CAPACITY: usize = 29;

/// # Child Order
///
/// Where a sprite's children sit relative to the sprite itself in the draw
/// sequence. Siblings are always ordered by ascending z, ties by arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChildOrder {
    /// Pre-order: the parent draws first, then every child subtree.
    #[default]
    ParentFirst,
    /// Children with negative z draw before the parent, the rest after it.
    NegativeZBehindParent,
}

impl ChildOrder {
    /// Whether a child with z-order `z` draws before its parent
    pub fn draws_before_parent(self, z: i32) -> bool {
        match self {
            Self::ParentFirst => false,
            Self::NegativeZBehindParent => z < 0,
        }
    }
}

/// # Growth Policy
///
/// The atlas grows to `(capacity + 1) * numerator / denominator` quads, or to
/// the requested size if that is larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPolicy {
    /// Growth ratio numerator
    pub numerator: usize,
    /// Growth ratio denominator
    pub denominator: usize,
}

impl GrowthPolicy {
    /// Create a growth policy from a ratio
    pub fn new(numerator: usize, denominator: usize) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Validate the ratio
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.denominator == 0 {
            return Err(ConfigError::Invalid("growth denominator cannot be zero".to_string()));
        }
        if self.numerator <= self.denominator {
            return Err(ConfigError::Invalid(format!(
                "growth ratio {}/{} does not grow the atlas",
                self.numerator, self.denominator
            )));
        }
        Ok(())
    }
}

impl Default for GrowthPolicy {
    /// A third more than the current capacity
    fn default() -> Self {
        Self::new(4, 3)
    }
}

/// # Batch Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Quads reserved when the batch is created
    pub initial_capacity: usize,
    /// How the atlas grows when it runs out of room
    pub growth: GrowthPolicy,
    /// Position of children relative to their parent in the draw sequence
    pub child_order: ChildOrder,
}

impl BatchConfig {
    /// Create a configuration with the default settings
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            growth: GrowthPolicy::default(),
            child_order: ChildOrder::default(),
        }
    }

    /// Set the initial atlas capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the growth policy
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Set the child order
    pub fn with_child_order(mut self, child_order: ChildOrder) -> Self {
        self.child_order = child_order;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.growth.validate()
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for BatchConfig {}
