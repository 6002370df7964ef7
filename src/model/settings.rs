use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SupResult;
use crate::validation;

/// Effort bounds for the partitioning search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Wall-clock budget for the whole round, measured from the run start.
    pub timeout_secs: u64,
    /// Independent shuffled attempts before settling for partial coverage.
    pub attempts: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            attempts: 3,
        }
    }
}

impl SolverSettings {
    /// Short budget for channels on a fast cadence.
    pub fn fast() -> Self {
        Self {
            timeout_secs: 10,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> SupResult<Self> {
        let settings: SolverSettings = serde_json::from_str(json)?;
        validation::at_least(settings.attempts as i64, 1, "attempts")?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
