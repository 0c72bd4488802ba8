//! Cone design trade-off.
//!
//! Searches integer radius and height in `[1, 25]` for cones that maximize
//! volume while minimizing total surface area, then prints the Pareto
//! archive.
//!
//! ```text
//! RUST_LOG=u_nsga=debug cargo run --example cones
//! ```

use std::f64::consts::PI;
use tracing_subscriber::EnvFilter;
use u_nsga::nsga::{NsgaConfig, NsgaRunner, Toolbox};
use u_nsga::EvaluationError;

fn cone(genes: &[i64]) -> Result<Vec<f64>, EvaluationError> {
    let (r, h) = (genes[0] as f64, genes[1] as f64);
    let slant = (r * r + h * h).sqrt();
    let volume = PI * r * r * h / 3.0;
    let surface = PI * r * slant + PI * r * r;
    Ok(vec![volume, surface])
}

fn main() -> u_nsga::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init();

    let config = NsgaConfig::default()
        .with_population_size(500)
        .with_offspring_size(100)
        .with_generations(200)
        .with_seed(64);
    let toolbox = Toolbox::new(cone);

    let result = NsgaRunner::run(&toolbox, &config)?;

    let mut front: Vec<_> = result.archive.iter().collect();
    front.sort_by_key(|ind| (ind.genes()[0], ind.genes()[1]));

    println!("{:>6} {:>6} {:>12} {:>12}", "radius", "height", "volume", "surface");
    for ind in front {
        let (g, o) = (ind.genes(), ind.objectives().unwrap_or_default());
        println!("{:>6} {:>6} {:>12.2} {:>12.2}", g[0], g[1], o[0], o[1]);
    }

    let last = result.statistics.last();
    println!(
        "\n{} archive members, {} evaluations, seed {}",
        result.archive.len(),
        result.evaluations,
        result.seed
    );
    if let Some(hv) = result.archive.hypervolume_2d([0.0, 4000.0]) {
        println!("hypervolume vs (0, 4000): {hv:.1}");
    }
    if let Some(stats) = last {
        println!("final mean objectives: {:?}", stats.mean);
    }
    Ok(())
}
