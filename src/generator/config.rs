//! Generator configuration.

use serde::{Deserialize, Serialize};

use crate::distance::Distance;
use crate::error::ConfigError;

/// Size and shape of a random ride-sharing instance.
///
/// Missing fields take their defaults when deserialized.
///
/// # Examples
///
/// ```
/// use u_rideshare::generator::ProblemConfig;
///
/// let config: ProblemConfig = serde_json::from_str(r#"{"population": 10, "passengers": 4}"#).unwrap();
/// assert_eq!(config.grid_size, 100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    /// Number of users (N).
    pub population: usize,
    /// Number of passenger demands among them (M); the rest drive.
    pub passengers: usize,
    /// Coordinates are drawn from `[0, grid_size)` on both axes.
    pub grid_size: i64,
    /// Per-route distance cap, also the penalty per unserved demand.
    pub max_drive_distance: Distance,
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            population: 200,
            passengers: 100,
            grid_size: 100,
            max_drive_distance: 300,
            seed: None,
        }
    }
}

impl ProblemConfig {
    /// Checks that the configuration describes a solvable instance shape.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.max_drive_distance <= 0 {
            return Err(ConfigError::NonPositiveDistanceCap(self.max_drive_distance));
        }
        if self.passengers > self.population {
            return Err(ConfigError::TooManyPassengers {
                passengers: self.passengers,
                population: self.population,
            });
        }
        if self.passengers > 0 && self.passengers == self.population {
            return Err(ConfigError::NoDrivers {
                passengers: self.passengers,
                population: self.population,
            });
        }
        Ok(())
    }
}
