use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::align::AlignedComparison;
use crate::model::{LapTelemetry, TelemetrySample};
use crate::sectors::SectorComparison;

const FIGURE_SIZE: (u32, u32) = (1280, 1280);
const SECTOR_FIGURE_SIZE: (u32, u32) = (900, 600);
const DELTA_COLOR: RGBColor = RGBColor(0x80, 0x00, 0x80);
const BOUNDARY_COLOR: RGBColor = RGBColor(0x90, 0x90, 0x90);

/// Render the four stacked comparison panels (speed, delta, throttle,
/// brake) over the shared distance axis. A `.svg` output path selects the
/// vector backend, anything else is written as a bitmap.
pub fn render_comparison(
    out: &Path,
    title: &str,
    lap_a: &LapTelemetry,
    lap_b: &LapTelemetry,
    cmp: &AlignedComparison,
    boundaries: Option<[f64; 2]>,
    colors: (RGBColor, RGBColor),
) -> Result<()> {
    if is_svg(out) {
        let root = SVGBackend::new(out, FIGURE_SIZE).into_drawing_area();
        draw_panels(root, title, lap_a, lap_b, cmp, boundaries, colors)
    } else {
        let root = BitMapBackend::new(out, FIGURE_SIZE).into_drawing_area();
        draw_panels(root, title, lap_a, lap_b, cmp, boundaries, colors)
    }
}

/// Render the grouped per-sector bar chart.
pub fn render_sector_chart(
    out: &Path,
    title: &str,
    cmp: &SectorComparison,
    labels: (&str, &str),
    colors: (RGBColor, RGBColor),
) -> Result<()> {
    if is_svg(out) {
        let root = SVGBackend::new(out, SECTOR_FIGURE_SIZE).into_drawing_area();
        draw_sector_bars(root, title, cmp, labels, colors)
    } else {
        let root = BitMapBackend::new(out, SECTOR_FIGURE_SIZE).into_drawing_area();
        draw_sector_bars(root, title, cmp, labels, colors)
    }
}

/// Sibling path for the sector chart: `comparison.png` -> `comparison_sectors.png`.
pub fn sector_chart_path(base: &Path) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("comparison");
    let ext = base.extension().and_then(|s| s.to_str()).unwrap_or("png");
    base.with_file_name(format!("{}_sectors.{}", stem, ext))
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

fn draw_panels<DB>(
    root: DrawingArea<DB, Shift>,
    title: &str,
    lap_a: &LapTelemetry,
    lap_b: &LapTelemetry,
    cmp: &AlignedComparison,
    boundaries: Option<[f64; 2]>,
    colors: (RGBColor, RGBColor),
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 28))?;
    let panels = root.split_evenly((4, 1));

    let x_max = lap_a.max_distance_m().max(lap_b.max_distance_m()).max(1.0);

    let speed_max = trace_max(lap_a, lap_b, |s| s.speed_kph).max(1.0) * 1.1;
    draw_trace_panel(
        &panels[0],
        lap_a,
        lap_b,
        |s| s.speed_kph,
        "Speed [km/h]",
        None,
        0.0..speed_max,
        x_max,
        boundaries,
        colors,
    )?;

    draw_delta_panel(&panels[1], &lap_b.driver, cmp, x_max, boundaries)?;

    draw_trace_panel(
        &panels[2],
        lap_a,
        lap_b,
        |s| s.throttle_pct,
        "Throttle [%]",
        None,
        0.0..105.0,
        x_max,
        None,
        colors,
    )?;

    draw_trace_panel(
        &panels[3],
        lap_a,
        lap_b,
        |s| s.brake_pct,
        "Brake [%]",
        Some("Distance [m]"),
        0.0..105.0,
        x_max,
        None,
        colors,
    )?;

    root.present()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_trace_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    lap_a: &LapTelemetry,
    lap_b: &LapTelemetry,
    value: fn(&TelemetrySample) -> f64,
    y_desc: &str,
    x_desc: Option<&str>,
    y_range: std::ops::Range<f64>,
    x_max: f64,
    boundaries: Option<[f64; 2]>,
    colors: (RGBColor, RGBColor),
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(0.0..x_max, y_range.clone())?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(y_desc);
    if let Some(x_desc) = x_desc {
        mesh.x_desc(x_desc);
    }
    mesh.draw()?;

    if let Some(bounds) = boundaries {
        draw_boundary_lines(&mut chart, bounds, y_range)?;
    }

    let (color_a, color_b) = colors;
    chart
        .draw_series(LineSeries::new(
            lap_a.samples.iter().map(|s| (s.distance_m, value(s))),
            &color_a,
        ))?
        .label(lap_a.driver.clone())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color_a));
    chart
        .draw_series(LineSeries::new(
            lap_b.samples.iter().map(|s| (s.distance_m, value(s))),
            &color_b,
        ))?
        .label(lap_b.driver.clone())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color_b));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_delta_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    driver_b: &str,
    cmp: &AlignedComparison,
    x_max: f64,
    boundaries: Option<[f64; 2]>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let lo = cmp.delta_s.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = cmp.delta_s.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Pad so a flat (all-zero) delta still gets a drawable range.
    let pad = ((hi - lo) * 0.1).max(0.05);
    let y_range = (lo - pad)..(hi + pad);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(0.0..x_max, y_range.clone())?;

    chart
        .configure_mesh()
        .y_desc(format!("Gap to {} [s]", driver_b))
        .draw()?;

    if let Some(bounds) = boundaries {
        draw_boundary_lines(&mut chart, bounds, y_range)?;
    }

    // Zero reference line
    chart.draw_series(LineSeries::new(
        [(0.0, 0.0), (x_max, 0.0)],
        BLACK.mix(0.6),
    ))?;

    chart.draw_series(LineSeries::new(
        cmp.distance_m
            .iter()
            .zip(cmp.delta_s.iter())
            .map(|(&d, &t)| (d, t)),
        &DELTA_COLOR,
    ))?;
    Ok(())
}

fn draw_boundary_lines<DB, X, Y>(
    chart: &mut ChartContext<'_, DB, plotters::coord::cartesian::Cartesian2d<X, Y>>,
    bounds: [f64; 2],
    y_range: std::ops::Range<f64>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    X: plotters::coord::ranged1d::Ranged<ValueType = f64>,
    Y: plotters::coord::ranged1d::Ranged<ValueType = f64>,
{
    for d in bounds {
        chart.draw_series(LineSeries::new(
            [(d, y_range.start), (d, y_range.end)],
            BOUNDARY_COLOR.mix(0.7),
        ))?;
    }
    Ok(())
}

fn draw_sector_bars<DB>(
    root: DrawingArea<DB, Shift>,
    title: &str,
    cmp: &SectorComparison,
    labels: (&str, &str),
    colors: (RGBColor, RGBColor),
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let y_max = cmp
        .sectors
        .iter()
        .map(|s| s.time_a_s.max(s.time_b_s))
        .fold(1.0, f64::max)
        * 1.15;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .caption(title, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0.0..3.0, 0.0..y_max)?;

    chart
        .configure_mesh()
        .y_desc("Time [s]")
        .disable_x_mesh()
        .x_label_formatter(&|_: &f64| String::new())
        .draw()?;

    let (color_a, color_b) = colors;
    for row in &cmp.sectors {
        let x = (row.sector - 1) as f64;
        let bar_a = chart.draw_series(std::iter::once(Rectangle::new(
            [(x + 0.15, 0.0), (x + 0.47, row.time_a_s)],
            color_a.filled(),
        )))?;
        if row.sector == 1 {
            bar_a.label(labels.0).legend(move |(lx, ly)| {
                Rectangle::new([(lx, ly - 5), (lx + 10, ly + 5)], color_a.filled())
            });
        }
        let bar_b = chart.draw_series(std::iter::once(Rectangle::new(
            [(x + 0.53, 0.0), (x + 0.85, row.time_b_s)],
            color_b.filled(),
        )))?;
        if row.sector == 1 {
            bar_b.label(labels.1).legend(move |(lx, ly)| {
                Rectangle::new([(lx, ly - 5), (lx + 10, ly + 5)], color_b.filled())
            });
        }

        chart.draw_series(std::iter::once(Text::new(
            format!("Sector {}", row.sector),
            (x + 0.32, y_max * 0.02),
            ("sans-serif", 16),
        )))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn trace_max(lap_a: &LapTelemetry, lap_b: &LapTelemetry, value: fn(&TelemetrySample) -> f64) -> f64 {
    lap_a
        .samples
        .iter()
        .chain(lap_b.samples.iter())
        .map(value)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_chart_path_is_a_sibling() {
        assert_eq!(
            sector_chart_path(Path::new("out/comparison.png")),
            PathBuf::from("out/comparison_sectors.png")
        );
        assert_eq!(
            sector_chart_path(Path::new("plot.svg")),
            PathBuf::from("plot_sectors.svg")
        );
    }

    #[test]
    fn svg_detection_is_extension_based() {
        assert!(is_svg(Path::new("a.svg")));
        assert!(is_svg(Path::new("a.SVG")));
        assert!(!is_svg(Path::new("a.png")));
        assert!(!is_svg(Path::new("plain")));
    }
}
