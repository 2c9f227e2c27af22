use std::fmt::Write;

use serde::Serialize;

use crate::model::LapTelemetry;

/// One sector's timing for both drivers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SectorDelta {
    /// Sector number, 1-based
    pub sector: usize,
    pub time_a_s: f64,
    pub time_b_s: f64,
    /// A minus B; positive means driver A lost time in this sector
    pub delta_s: f64,
}

/// Per-sector and total lap-time deltas between two laps.
#[derive(Debug, Clone, Serialize)]
pub struct SectorComparison {
    pub sectors: [SectorDelta; 3],
    pub total_a_s: f64,
    pub total_b_s: f64,
    pub total_delta_s: f64,
}

/// Compare the sector and total times of two laps.
///
/// Sector times the timing feed dropped are substituted with 0.0 and show
/// up as-is in the result rather than failing the comparison.
pub fn compare_sectors(lap_a: &LapTelemetry, lap_b: &LapTelemetry) -> SectorComparison {
    let mut sectors = [SectorDelta {
        sector: 0,
        time_a_s: 0.0,
        time_b_s: 0.0,
        delta_s: 0.0,
    }; 3];

    for (i, slot) in sectors.iter_mut().enumerate() {
        let time_a_s = lap_a.sector_times_s[i].unwrap_or(0.0);
        let time_b_s = lap_b.sector_times_s[i].unwrap_or(0.0);
        *slot = SectorDelta {
            sector: i + 1,
            time_a_s,
            time_b_s,
            delta_s: time_a_s - time_b_s,
        };
    }

    SectorComparison {
        sectors,
        total_a_s: lap_a.lap_time_s,
        total_b_s: lap_b.lap_time_s,
        total_delta_s: lap_a.lap_time_s - lap_b.lap_time_s,
    }
}

/// Distances into the lap at which sectors 1 and 2 end.
///
/// Located as the first telemetry sample at or past the boundary on the
/// session clock (`lap_start_time_s + sector times`). Returns None when a
/// sector time is missing or the trace never reaches the boundary; callers
/// plot without sector markers in that case.
pub fn sector_boundaries(lap: &LapTelemetry) -> Option<[f64; 2]> {
    let s1 = lap.sector_times_s[0]?;
    let s2 = lap.sector_times_s[1]?;

    let s1_end_time = lap.lap_start_time_s + s1;
    let s2_end_time = s1_end_time + s2;

    let dist_at = |boundary_time: f64| -> Option<f64> {
        lap.samples
            .iter()
            .find(|s| s.time_s >= boundary_time)
            .map(|s| s.distance_m)
    };

    Some([dist_at(s1_end_time)?, dist_at(s2_end_time)?])
}

/// Render the sector comparison as the aligned text table printed by the CLI.
pub fn format_table(cmp: &SectorComparison, driver_a: &str, driver_b: &str) -> String {
    let mut out = String::new();
    writeln!(out, "Sector Time Comparison:").unwrap();
    writeln!(out, "{:<10} {:<8} {:<8} {:<8}", "Sector", driver_a, driver_b, "Delta").unwrap();
    writeln!(out, "{}", "-".repeat(35)).unwrap();

    for row in &cmp.sectors {
        writeln!(
            out,
            "Sector {}:  {:.3}s  {:.3}s  {:+.3}s",
            row.sector, row.time_a_s, row.time_b_s, row.delta_s
        )
        .unwrap();
    }

    writeln!(out).unwrap();
    writeln!(out, "Total Lap Time Delta: {:+.3}s", cmp.total_delta_s).unwrap();
    out
}
