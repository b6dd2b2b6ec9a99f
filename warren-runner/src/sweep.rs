//! What-if analysis: vary one parameter and average repeated trials.

use log::{debug, info};
use rayon::prelude::*;
use warren_config::{Config, ConfigError};
use warren_simulation::{SimError, Simulation};

/// What one trial ended with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub plants_start: usize,
    pub plants_end: usize,
    pub rabbits_end: usize,
    pub foxes_end: usize,
    /// First day at whose end no rabbit was left.
    pub rabbits_extinct_day: Option<u64>,
}

/// Averages over all trials for one parameter value.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub value: f64,
    pub trials: usize,
    pub plants_start: f64,
    pub plants_end: f64,
    pub rabbits_end: f64,
    pub foxes_end: f64,
    /// Trials in which the rabbits died out.
    pub extinctions: usize,
    /// Mean extinction day over the trials that had one.
    pub extinction_day: Option<f64>,
}

#[derive(thiserror::Error, Debug)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimError),
}

/// Run one simulation for `days` calendar days.
pub fn run_trial(config: Config, days: u64) -> Result<TrialOutcome, SimError> {
    let mut sim = Simulation::new(config)?;
    let plants_start = sim.plants().len();
    let mut rabbits_extinct_day = sim.herbivores().is_empty().then_some(0);

    for _ in 0..days {
        sim.advance_day();
        if rabbits_extinct_day.is_none() && sim.herbivores().is_empty() {
            rabbits_extinct_day = Some(sim.day());
        }
    }

    Ok(TrialOutcome {
        plants_start,
        plants_end: sim.plants().len(),
        rabbits_end: sim.herbivores().len(),
        foxes_end: sim.carnivores().len(),
        rabbits_extinct_day,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn summarize(value: f64, outcomes: &[TrialOutcome]) -> SweepRow {
    let avg = |f: fn(&TrialOutcome) -> usize| {
        mean(outcomes.iter().map(|o| f(o) as f64)).unwrap_or(0.0)
    };
    SweepRow {
        value,
        trials: outcomes.len(),
        plants_start: avg(|o| o.plants_start),
        plants_end: avg(|o| o.plants_end),
        rabbits_end: avg(|o| o.rabbits_end),
        foxes_end: avg(|o| o.foxes_end),
        extinctions: outcomes.iter().filter(|o| o.rabbits_extinct_day.is_some()).count(),
        extinction_day: mean(outcomes.iter().filter_map(|o| o.rabbits_extinct_day).map(|d| d as f64)),
    }
}

/// For each value build a fresh config with `param` replaced and run
/// `trials` independent simulations in parallel. With a base seed every
/// trial gets its own derived seed, so the whole sweep is reproducible.
pub fn sweep(
    base: &Config,
    param: &str,
    values: &[f64],
    trials: usize,
    days: u64,
) -> Result<Vec<SweepRow>, SweepError> {
    let mut rows = Vec::with_capacity(values.len());
    for (value_index, &value) in values.iter().enumerate() {
        let config = base.with_parameter(param, value)?;
        info!("{} = {}: running {} trials of {} days", param, value, trials, days);

        let outcomes = (0..trials)
            .into_par_iter()
            .map(|trial| {
                let mut config = config.clone();
                config.seed = base
                    .seed
                    .map(|seed| seed.wrapping_add((value_index * trials + trial) as u64));
                run_trial(config, days)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let row = summarize(value, &outcomes);
        debug!("{:?}", row);
        rows.push(row);
    }
    Ok(rows)
}

/// Fixed-width table of sweep results.
pub fn format_table(param: &str, rows: &[SweepRow]) -> String {
    let mut out = format!(
        "{:>18} {:>7} {:>12} {:>10} {:>12} {:>10} {:>11} {:>14}\n",
        param, "trials", "plants start", "plants end", "rabbits end", "foxes end", "extinctions", "extinction day"
    );
    for row in rows {
        let day = row
            .extinction_day
            .map_or_else(|| "-".to_string(), |d| format!("{:.1}", d));
        out.push_str(&format!(
            "{:>18} {:>7} {:>12.1} {:>10.1} {:>12.1} {:>10.1} {:>11} {:>14}\n",
            row.value,
            row.trials,
            row.plants_start,
            row.plants_end,
            row.rabbits_end,
            row.foxes_end,
            row.extinctions,
            day
        ));
    }
    out
}
