use crate::reports;
use clap::Args;
use pentaforge::config::Config;
use pentaforge::error::PfResult;
use pentaforge::geometry::KeyboardGeometry;
use pentaforge::optimizer::{OptimizationOptions, Optimizer, ProgressCallback, SearchSnapshot};
use pentaforge::scorer::Scorer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    /// Emit one JSON line per improvement instead of the board rendering.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

struct CliLogger {
    geometry: KeyboardGeometry,
    json: bool,
    last_report_secs: AtomicU64,
}

impl ProgressCallback for CliLogger {
    fn on_improvement(&self, snapshot: &SearchSnapshot) {
        if self.json {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Cannot serialize snapshot: {}", e),
            }
            return;
        }

        info!(
            "✨ Gen {:6} | Best: {:.6} | {} layouts",
            snapshot.best_generation, snapshot.fitness, snapshot.layouts_evaluated
        );
        if let Some(keymap) = &snapshot.keymap {
            for row in reports::render_rows(&self.geometry, keymap) {
                info!("   {}", row);
            }
        }
    }

    fn on_progress(&self, snapshot: &SearchSnapshot) {
        // At most one status line per second of search time.
        let secs = snapshot.elapsed_secs as u64;
        if secs > self.last_report_secs.load(Ordering::Relaxed) {
            self.last_report_secs.store(secs, Ordering::Relaxed);
            info!(
                "Gen {:6} | Global Best: {:.6} | {:.2}M layouts/s",
                snapshot.generations,
                snapshot.fitness,
                snapshot.throughput / 1_000_000.0
            );
        }
    }
}

pub fn run(args: SearchArgs, scorer: Arc<Scorer>) -> PfResult<()> {
    args.config.search.validate()?;
    let options = OptimizationOptions::from(&args.config.search);

    if options.max_time.is_none() && options.max_generations.is_none() {
        warn!("⚠️  No time or generation limit set. Searching until interrupted.");
    }

    let logger = CliLogger {
        geometry: scorer.geometry.clone(),
        json: args.json,
        last_report_secs: AtomicU64::new(0),
    };

    let optimizer = Optimizer::new(scorer.clone(), options);
    let result = optimizer.run(logger)?;

    if args.json {
        println!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }

    println!("\n=== 🏆 FINAL RESULT ===");
    reports::print_snapshot(&result);
    match &result.keymap {
        Some(keymap) => {
            reports::print_layout_grid("OPTIMIZED", &scorer.geometry, keymap);
            let details = scorer.score_details(keymap);
            let rows = vec![("OPTIMIZED".to_string(), details)];
            reports::print_scoring_report(&rows);
            reports::print_finger_report(&rows, &scorer.finger_targets);
        }
        None => warn!("No keymap was evaluated before the search stopped."),
    }
    Ok(())
}
