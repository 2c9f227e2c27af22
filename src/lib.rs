//! Compare two F1 drivers' fastest laps from a session archive: align the
//! laps on a common distance grid, compute the time-delta curve, report
//! sector times, and render the comparison figures.

pub mod align;
pub mod colors;
pub mod config;
pub mod model;
pub mod plot;
pub mod sectors;
pub mod store;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::CompareConfig;
use crate::store::SessionStore;

/// Run one full comparison: load both laps, print the timing report,
/// align, and render the figures.
pub fn run(cfg: &CompareConfig) -> Result<()> {
    let store = SessionStore::open(&cfg.data_dir);
    let key = cfg.session_key();

    info!("loading data for {} and {} ({})", cfg.driver1, cfg.driver2, key);
    let lap_a = store.fastest_lap(&key, &cfg.driver1)?;
    let lap_b = store.fastest_lap(&key, &cfg.driver2)?;

    println!("\nFastest Lap Times:");
    println!("{}: {}", lap_a.driver, format_lap_time(lap_a.lap_time_s));
    println!("{}: {}", lap_b.driver, format_lap_time(lap_b.lap_time_s));

    let sector_cmp = sectors::compare_sectors(&lap_a, &lap_b);
    println!();
    print!("{}", sectors::format_table(&sector_cmp, &lap_a.driver, &lap_b.driver));

    let aligned = align::align(&lap_a, &lap_b, cfg.resolution)?;

    let boundaries = sectors::sector_boundaries(&lap_a);
    if boundaries.is_none() {
        warn!(
            "could not locate sector boundaries for {}, plotting without sector markers",
            lap_a.driver
        );
    }

    let caption = format!(
        "{} - {} vs {}",
        store.event_title(&key)?,
        lap_a.driver,
        lap_b.driver
    );
    let palette = (
        colors::resolve(&lap_a.team, 0),
        colors::resolve(&lap_b.team, 1),
    );

    plot::render_comparison(
        &cfg.output,
        &caption,
        &lap_a,
        &lap_b,
        &aligned,
        boundaries,
        palette,
    )
    .with_context(|| format!("failed to render {}", cfg.output.display()))?;
    info!("comparison figure written to {}", cfg.output.display());

    let sector_out = plot::sector_chart_path(&cfg.output);
    let sector_caption = format!("Sector Times - {} vs {}", lap_a.driver, lap_b.driver);
    plot::render_sector_chart(
        &sector_out,
        &sector_caption,
        &sector_cmp,
        (&lap_a.driver, &lap_b.driver),
        palette,
    )
    .with_context(|| format!("failed to render {}", sector_out.display()))?;
    info!("sector chart written to {}", sector_out.display());

    Ok(())
}

/// Format a lap time in seconds as "1:21.852".
pub fn format_lap_time(seconds: f64) -> String {
    let mins = (seconds / 60.0).floor() as u64;
    let rem = seconds - mins as f64 * 60.0;
    if mins > 0 {
        format!("{}:{:06.3}", mins, rem)
    } else {
        format!("{:.3}s", rem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lap_time_formatting() {
        assert_eq!(format_lap_time(81.852), "1:21.852");
        assert_eq!(format_lap_time(125.2), "2:05.200");
        assert_eq!(format_lap_time(59.999), "59.999s");
    }
}
