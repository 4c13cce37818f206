#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::RESOLUTION;

/// Settings fixed when a [NavGrid](crate::NavGrid) is built.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavGridConfig {
    /// World units covered by one cell along each axis.
    pub resolution: f32,
    /// Upper bound on the number of nodes a single search expands. [None] searches until the
    /// destination is reached or the frontier is exhausted.
    pub max_expansions: Option<usize>,
}

impl Default for NavGridConfig {
    fn default() -> Self {
        NavGridConfig {
            resolution: RESOLUTION,
            max_expansions: None,
        }
    }
}

impl NavGridConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_resolution(mut self, resolution: f32) -> Self {
        self.resolution = resolution;
        self
    }
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}
