use serde::{Deserialize, Serialize};

/// How many results each report bucket shows. Summary counts ignore these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLimits {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub very_low: usize,
    pub failed_threshold: usize,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            high: 50,
            medium: 50,
            low: 30,
            very_low: 20,
            failed_threshold: 20,
        }
    }
}

/// Engine settings supplied by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Academic years the caller accepts; empty accepts any year.
    pub supported_years: Vec<u16>,
    pub display_limits: DisplayLimits,
}
