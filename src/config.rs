use crate::error::{PentaforgeError, PfResult};
use clap::parser::ValueSource;
use clap::{ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of fingers that carry load (thumbs excluded), left pinky to right pinky.
pub const FINGER_COUNT: usize = 8;

#[derive(Args, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub weights: FitnessWeights,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Number of symmetric search workers.
    #[arg(long, default_value_t = 8)]
    pub threads: usize,
    /// Trials evaluated per tier before the neighborhood widens.
    #[arg(long, default_value_t = 2048)]
    pub trials_per_tier: usize,
    /// Widest mutation radius tried before a generation is abandoned.
    #[arg(long, default_value_t = 3)]
    pub max_tier: u8,
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
    /// Stop after this many seconds (runs forever when unset).
    #[arg(short = 'T', long)]
    pub time_limit: Option<u64>,
    /// Stop after this many generations have been started.
    #[arg(long)]
    pub max_generations: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            threads: 8,
            trials_per_tier: 2048,
            max_tier: 3,
            seed: None,
            time_limit: None,
            max_generations: None,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> PfResult<()> {
        if self.threads == 0 {
            return Err(PentaforgeError::Config(
                "--threads must be at least 1".to_string(),
            ));
        }
        if self.trials_per_tier == 0 {
            return Err(PentaforgeError::Config(
                "--trials-per-tier must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    #[arg(long, default_value_t = 0.5)]
    pub inroll_bonus: f64,
    #[arg(long, default_value_t = 26.0)]
    pub distance_norm: f64,

    // Key pitch conversion for the home distance
    #[arg(long, default_value_t = 1.5)]
    pub horizontal_scale: f64,
    #[arg(long, default_value_t = 19.0)]
    pub vertical_scale: f64,

    /// Target share of keystrokes per finger, left pinky to right pinky.
    #[arg(long, default_value = "0.09,0.13,0.14,0.14,0.14,0.14,0.13,0.09")]
    pub finger_targets: String,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            inroll_bonus: 0.5,
            distance_norm: 26.0,
            horizontal_scale: 1.5,
            vertical_scale: 19.0,
            finger_targets: "0.09,0.13,0.14,0.14,0.14,0.14,0.13,0.09".to_string(),
        }
    }
}

impl FitnessWeights {
    pub fn get_finger_targets(&self) -> PfResult<[f64; FINGER_COUNT]> {
        let targets = parse_f64_array::<FINGER_COUNT>(&self.finger_targets, "finger_targets")?;
        if targets.iter().any(|&t| t < 0.0) {
            return Err(PentaforgeError::Config(
                "finger_targets must not contain negative shares".to_string(),
            ));
        }
        if let Some(i) = (0..FINGER_COUNT / 2)
            .find(|&i| (targets[i] - targets[FINGER_COUNT - 1 - i]).abs() > 1e-9)
        {
            return Err(PentaforgeError::Config(format!(
                "finger_targets must be symmetric across hands (finger {} is {}, finger {} is {})",
                i,
                targets[i],
                FINGER_COUNT - 1 - i,
                targets[FINGER_COUNT - 1 - i]
            )));
        }
        let total: f64 = targets.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(PentaforgeError::Config(format!(
                "finger_targets must sum to 1.0 (got {:.6})",
                total
            )));
        }
        Ok(targets)
    }

    pub fn validate(&self) -> PfResult<()> {
        if !(self.distance_norm.is_finite() && self.distance_norm > 0.0) {
            return Err(PentaforgeError::Config(format!(
                "distance_norm must be positive (got {})",
                self.distance_norm
            )));
        }
        for (name, v) in [
            ("inroll_bonus", self.inroll_bonus),
            ("horizontal_scale", self.horizontal_scale),
            ("vertical_scale", self.vertical_scale),
        ] {
            if !v.is_finite() {
                return Err(PentaforgeError::Config(format!("{} must be finite", name)));
            }
        }
        self.get_finger_targets().map(|_| ())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overlays only the flags the user typed on the command line.
    pub fn merge_from_cli(&mut self, cli_weights: &FitnessWeights, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_weights.$field.clone();
                }
            };
        }

        update_if_present!(inroll_bonus, "inroll_bonus");
        update_if_present!(distance_norm, "distance_norm");
        update_if_present!(horizontal_scale, "horizontal_scale");
        update_if_present!(vertical_scale, "vertical_scale");
        update_if_present!(finger_targets, "finger_targets");
    }
}

fn parse_f64_array<const N: usize>(s: &str, name: &str) -> PfResult<[f64; N]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(PentaforgeError::Config(format!(
            "--{} requires {} values (got {})",
            name,
            N,
            parts.len()
        )));
    }
    let mut arr = [0.0; N];
    for (i, p) in parts.iter().enumerate() {
        arr[i] = p.trim().parse().map_err(|_| {
            PentaforgeError::Config(format!("Invalid number '{}' in {}", p.trim(), name))
        })?;
    }
    Ok(arr)
}
