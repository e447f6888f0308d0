//! Chart rendering for a finished run
//!
//! Two SVG charts are written to the run's visualization directory:
//! - A horizontal bar chart of the ten most common affiliations
//! - A pie chart of the accreditation distribution
//!
//! Empty field values are not counted. Charts are rendered into memory and
//! written atomically.

use crate::output::csv_output::write_atomic;
use crate::output::stats::HarvestStatistics;
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::record::JournalRecord;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the affiliation bar chart
pub const AFFILIATION_CHART: &str = "affiliation_distribution.svg";

/// File name of the accreditation pie chart
pub const ACCREDITATION_CHART: &str = "accreditation_distribution.svg";

/// Number of affiliations shown in the bar chart
pub const TOP_AFFILIATIONS: usize = 10;

const LABEL_MAX_CHARS: usize = 48;

const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Writes both charts into one directory
#[derive(Debug, Clone)]
pub struct ChartOutput {
    dir: PathBuf,
}

impl ChartOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutputHandler for ChartOutput {
    fn name(&self) -> &'static str {
        "charts"
    }

    fn write(&self, records: &[JournalRecord]) -> OutputResult<()> {
        let stats = HarvestStatistics::from_records(records);

        let affiliations = stats.top_affiliations(TOP_AFFILIATIONS);
        if affiliations.is_empty() {
            tracing::warn!("No affiliation values, skipping affiliation chart");
        } else {
            let svg = render_affiliation_chart(affiliations)?;
            write_svg(&self.dir.join(AFFILIATION_CHART), &svg)?;
        }

        if stats.accreditations.is_empty() {
            tracing::warn!("No accreditation values, skipping accreditation chart");
        } else {
            let svg = render_accreditation_chart(&stats.accreditations)?;
            write_svg(&self.dir.join(ACCREDITATION_CHART), &svg)?;
        }

        tracing::info!("Visualizations created successfully");
        Ok(())
    }
}

fn write_svg(path: &Path, svg: &str) -> OutputResult<()> {
    write_atomic(path, |file| {
        file.write_all(svg.as_bytes())?;
        Ok(())
    })?;
    tracing::debug!("Chart written to {}", path.display());
    Ok(())
}

fn chart_error<E: std::fmt::Display>(e: E) -> OutputError {
    OutputError::Chart(e.to_string())
}

/// Renders the affiliation bar chart as an SVG document
///
/// `counts` is drawn top to bottom in the given order.
pub fn render_affiliation_chart(counts: &[(String, u64)]) -> OutputResult<String> {
    let rows = counts.len() as u32;
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let labels: Vec<String> = counts.iter().map(|(v, _)| shorten(v)).collect();
    let label_width = labels
        .iter()
        .map(|l| l.chars().count() as u32 * 7 + 20)
        .max()
        .unwrap_or(60);

    // Row 0 is the bottom of the chart, so the most common value goes last
    let label_for = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(row) | SegmentValue::Exact(row) => rows
            .checked_sub(row + 1)
            .and_then(|i| labels.get(i as usize))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (1200, 600)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Top 10 Affiliations by Number of Journals",
                ("sans-serif", 24).into_font(),
            )
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(label_width)
            .build_cartesian_2d(0u64..max + 1, (0u32..rows).into_segmented())
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(counts.len())
            .y_label_formatter(&label_for)
            .x_desc("Number of Journals")
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(
                Histogram::horizontal(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(4)
                    .data(
                        counts
                            .iter()
                            .enumerate()
                            .map(|(i, (_, count))| (rows - 1 - i as u32, *count)),
                    ),
            )
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

/// Renders the accreditation pie chart as an SVG document
///
/// Slices start at three o'clock and run counter-clockwise, each labelled
/// with its value and its share as a percentage with one decimal.
pub fn render_accreditation_chart(counts: &[(String, u64)]) -> OutputResult<String> {
    let total: u64 = counts.iter().map(|(_, c)| *c).sum();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (800, 800)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let area = root
            .titled(
                "Distribution of Journal Accreditations",
                ("sans-serif", 24).into_font(),
            )
            .map_err(chart_error)?;

        let (width, height) = area.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.33;
        let centered = Pos::new(HPos::Center, VPos::Center);

        let mut start = 0.0_f64;
        for (i, (value, count)) in counts.iter().enumerate() {
            let share = if total == 0 {
                0.0
            } else {
                *count as f64 / total as f64
            };
            let sweep = share * 360.0;
            let color = PALETTE[i % PALETTE.len()];

            area.draw(&Polygon::new(
                slice_points(center, radius, start, sweep),
                color.filled(),
            ))
            .map_err(chart_error)?;

            let middle = start + sweep / 2.0;
            area.draw(&Text::new(
                format!("{:.1}%", share * 100.0),
                point_at(center, radius * 0.6, middle),
                ("sans-serif", 16).into_font().color(&BLACK).pos(centered),
            ))
            .map_err(chart_error)?;
            area.draw(&Text::new(
                shorten(value),
                point_at(center, radius * 1.15, middle),
                ("sans-serif", 16).into_font().color(&BLACK).pos(centered),
            ))
            .map_err(chart_error)?;

            start += sweep;
        }

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

/// Point on the circle around `center`, `degrees` counter-clockwise from
/// three o'clock
fn point_at(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let radians = degrees.to_radians();
    (
        center.0 + (radius * radians.cos()).round() as i32,
        center.1 - (radius * radians.sin()).round() as i32,
    )
}

/// Polygon approximating one pie slice
fn slice_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep / 2.0).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push(point_at(center, radius, angle));
    }
    points
}

/// Truncates long labels so the label area stays readable
fn shorten(label: &str) -> String {
    if label.chars().count() <= LABEL_MAX_CHARS {
        return label.to_string();
    }
    let mut short: String = label.chars().take(LABEL_MAX_CHARS - 1).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: &[(&str, u64)]) -> Vec<(String, u64)> {
        values.iter().map(|(v, c)| (v.to_string(), *c)).collect()
    }

    fn record(affiliation: &str, accreditation: &str) -> JournalRecord {
        JournalRecord {
            name: "J".to_string(),
            link: String::new(),
            affiliation: affiliation.to_string(),
            accreditation: accreditation.to_string(),
        }
    }

    #[test]
    fn test_affiliation_chart_contains_title_and_labels() {
        let svg =
            render_affiliation_chart(&counts(&[("Universitas A", 3), ("Universitas B", 1)]))
                .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Top 10 Affiliations by Number of Journals"));
        assert!(svg.contains("Number of Journals"));
        assert!(svg.contains("Universitas A"));
        assert!(svg.contains("Universitas B"));
    }

    #[test]
    fn test_accreditation_chart_contains_percentages() {
        let svg = render_accreditation_chart(&counts(&[("S2", 3), ("S4", 1)])).unwrap();

        assert!(svg.contains("Distribution of Journal Accreditations"));
        assert!(svg.contains("75.0%"));
        assert!(svg.contains("25.0%"));
        assert!(svg.contains("S2"));
    }

    #[test]
    fn test_single_slice_is_full_circle() {
        let svg = render_accreditation_chart(&counts(&[("S1", 5)])).unwrap();
        assert!(svg.contains("100.0%"));
    }

    #[test]
    fn test_slice_points_cover_sweep() {
        let points = slice_points((100, 100), 50.0, 0.0, 90.0);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (150, 100));
        assert_eq!(*points.last().unwrap(), (100, 50));
    }

    #[test]
    fn test_shorten_long_label() {
        let long = "x".repeat(100);
        let short = shorten(&long);
        assert_eq!(short.chars().count(), LABEL_MAX_CHARS);
        assert!(short.ends_with('…'));
        assert_eq!(shorten("short"), "short");
    }

    #[test]
    fn test_chart_output_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = ChartOutput::new(dir.path());

        output
            .write(&[record("Univ A", "S2"), record("Univ B", "S3")])
            .unwrap();

        assert!(dir.path().join(AFFILIATION_CHART).is_file());
        assert!(dir.path().join(ACCREDITATION_CHART).is_file());
    }

    #[test]
    fn test_chart_output_skips_empty_field() {
        let dir = tempfile::tempdir().unwrap();
        let output = ChartOutput::new(dir.path());

        output.write(&[record("Univ A", "")]).unwrap();

        assert!(dir.path().join(AFFILIATION_CHART).is_file());
        assert!(!dir.path().join(ACCREDITATION_CHART).exists());
    }
}
