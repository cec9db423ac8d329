//! Random instance generation.
//!
//! Draws N users with uniform origins and destinations on a square grid
//! and samples M of them as passenger demands; the others drive.

mod config;

pub use config::ProblemConfig;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::distance::Point;
use crate::error::ConfigError;
use crate::models::{Problem, User};

/// Generates an instance, seeded from `config.seed` when present.
///
/// # Examples
///
/// ```
/// use u_rideshare::generator::{generate, ProblemConfig};
///
/// let config = ProblemConfig { population: 10, passengers: 4, seed: Some(1), ..Default::default() };
/// let problem = generate(&config).unwrap();
/// assert_eq!(problem.users().len(), 10);
/// assert_eq!(problem.demands().len(), 4);
/// assert_eq!(problem.drivers().len(), 6);
/// ```
pub fn generate(config: &ProblemConfig) -> Result<Problem, ConfigError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    generate_with_rng(config, &mut rng)
}

/// Generates an instance from the given random source.
pub fn generate_with_rng<R: Rng + ?Sized>(
    config: &ProblemConfig,
    rng: &mut R,
) -> Result<Problem, ConfigError> {
    config.validate()?;

    let grid = config.grid_size;
    let users: Vec<User> = (0..config.population)
        .map(|id| {
            let origin = random_point(rng, grid);
            let destination = random_point(rng, grid);
            User::new(id, origin, destination)
        })
        .collect();

    let mut demands = rand::seq::index::sample(rng, config.population, config.passengers).into_vec();
    demands.sort_unstable();

    debug!(
        population = config.population,
        passengers = config.passengers,
        grid,
        "generated problem"
    );
    Ok(Problem::new(users, demands, config.max_drive_distance))
}

fn random_point<R: Rng + ?Sized>(rng: &mut R, grid: i64) -> Point {
    Point::new(rng.random_range(0..grid), rng.random_range(0..grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_counts() {
        let config = ProblemConfig {
            population: 50,
            passengers: 20,
            seed: Some(42),
            ..ProblemConfig::default()
        };
        let problem = generate(&config).expect("valid");
        assert_eq!(problem.users().len(), 50);
        assert_eq!(problem.demands().len(), 20);
        assert_eq!(problem.drivers().len(), 30);
        assert_eq!(problem.max_drive_distance(), 300);
    }

    #[test]
    fn test_generate_coordinates_in_grid() {
        let config = ProblemConfig {
            population: 100,
            passengers: 10,
            grid_size: 7,
            seed: Some(5),
            ..ProblemConfig::default()
        };
        let problem = generate(&config).expect("valid");
        for u in problem.users() {
            for p in [u.origin(), u.destination()] {
                assert!((0..7).contains(&p.x()));
                assert!((0..7).contains(&p.y()));
            }
        }
    }

    #[test]
    fn test_generate_demands_unique_and_sorted() {
        let config = ProblemConfig {
            population: 40,
            passengers: 25,
            seed: Some(9),
            ..ProblemConfig::default()
        };
        let problem = generate(&config).expect("valid");
        let demands = problem.demands();
        assert!(demands.windows(2).all(|w| w[0] < w[1]));
        assert!(demands.iter().all(|&d| d < 40));
        assert!(problem.drivers().iter().all(|d| !demands.contains(d)));
    }

    #[test]
    fn test_generate_seeded_is_reproducible() {
        let config = ProblemConfig {
            population: 30,
            passengers: 10,
            seed: Some(123),
            ..ProblemConfig::default()
        };
        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn test_generate_invalid_config() {
        let config = ProblemConfig {
            population: 2,
            passengers: 5,
            ..ProblemConfig::default()
        };
        assert!(matches!(
            generate(&config),
            Err(ConfigError::TooManyPassengers { .. })
        ));
    }

    #[test]
    fn test_generate_with_rng() {
        let config = ProblemConfig {
            population: 6,
            passengers: 3,
            ..ProblemConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let problem = generate_with_rng(&config, &mut rng).expect("valid");
        assert_eq!(problem.drivers().len(), 3);
    }
}
