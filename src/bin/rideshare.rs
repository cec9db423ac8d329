//! Generates a random instance and optimizes it.
//!
//! Usage: `rideshare [config.json]`. `RIDESHARE_SEED` overrides the seed and
//! `RIDESHARE_STRATEGY=hill-climbing` selects the alternative strategy.
//! Log verbosity follows `RUST_LOG`.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_rideshare::generator::{generate, ProblemConfig};
use u_rideshare::models::AssignmentState;
use u_rideshare::search::{HillClimbing, PhasedLocalSearch, SearchStrategy, TracingObserver};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("u_rideshare=info".parse()?))
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str::<ProblemConfig>(&raw)
                .with_context(|| format!("parsing config {path}"))?
        }
        None => ProblemConfig::default(),
    };
    if let Ok(seed) = std::env::var("RIDESHARE_SEED") {
        config.seed = Some(seed.parse().context("RIDESHARE_SEED must be an unsigned integer")?);
    }

    let strategy: Box<dyn SearchStrategy> = match std::env::var("RIDESHARE_STRATEGY").as_deref() {
        Ok("hill-climbing") => Box::new(HillClimbing::new()),
        _ => Box::new(PhasedLocalSearch::new()),
    };

    let problem = generate(&config)?;
    let mut state = AssignmentState::new(&problem);
    info!(
        strategy = strategy.name(),
        drivers = problem.drivers().len(),
        demands = problem.demands().len(),
        objective = state.objective(),
        "starting search"
    );

    let outcome = strategy.run(&mut state, &mut TracingObserver)?;

    println!("Initial objective: {}", outcome.initial_objective);
    println!("Final objective: {}", outcome.final_objective);
    println!("Unserved demands: {}", outcome.unserved);
    println!();
    println!("Final state:");
    print!("{state}");
    Ok(())
}
