use crate::reports;
use clap::Args;
use pentaforge::config::FitnessWeights;
use pentaforge::layouts::all_layouts;
use pentaforge::scorer::Scorer;
use std::sync::Arc;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub weights: FitnessWeights,

    /// Only audit layouts whose name contains this text.
    #[arg(short, long)]
    pub layout: Option<String>,
}

pub fn run(args: ValidateArgs, scorer: Arc<Scorer>) -> pentaforge::error::PfResult<()> {
    let mut results = Vec::new();

    println!("\n🔎 === LAYOUT AUDIT === 🔎");
    for (layout, keymap) in all_layouts()? {
        let name = layout.to_string();
        if let Some(ref filter) = args.layout {
            if !name.to_lowercase().contains(&filter.to_lowercase()) {
                continue;
            }
        }
        if let Err(e) = keymap.validate(scorer.key_count()) {
            warn!("Skipping {}: does not fit the loaded geometry ({})", name, e);
            continue;
        }

        reports::print_layout_grid(&name, &scorer.geometry, &keymap);
        results.push((name, scorer.score_details(&keymap)));
    }

    results.sort_by(|a, b| b.1.fitness.total_cmp(&a.1.fitness));

    reports::print_scoring_report(&results);
    reports::print_finger_report(&results, &scorer.finger_targets);
    Ok(())
}
