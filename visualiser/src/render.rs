use crate::analyze::{histogram, histogram_bounds, HistogramBin};
use loadtest_summary_model::{LatencySummary, RequestType};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const LATENCY_CHART_SIZE: (u32, u32) = (1400, 600);
const INTERVAL_CHART_SIZE: (u32, u32) = (1000, 600);

const FONT: &str = "sans-serif";
const ORANGE: RGBColor = RGBColor(255, 165, 0);
const PURPLE: RGBColor = RGBColor(128, 0, 128);

/// Bars on a log scale start here rather than at zero
const LOG_BASELINE: f64 = 0.5;

/// Render read and write latency histograms side by side
///
/// Each histogram is marked with its own p95 and p99. A request type without data gets a
/// placeholder panel instead of an empty chart.
pub fn render_latency_distribution(
    path: &Path,
    read_latencies: &[f64],
    write_latencies: &[f64],
    label: &str,
    bin_count: usize,
) -> anyhow::Result<()> {
    let root = SVGBackend::new(path, LATENCY_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (reads, writes) = root.split_horizontally((LATENCY_CHART_SIZE.0 / 2) as i32);
    draw_latency_panel(&reads, RequestType::Read, read_latencies, label, BLUE, bin_count)?;
    draw_latency_panel(&writes, RequestType::Write, write_latencies, label, GREEN, bin_count)?;

    root.present()?;
    Ok(())
}

/// Render the distribution of write to read intervals with a log scale frequency axis
pub fn render_time_intervals(
    path: &Path,
    intervals: &[f64],
    label: &str,
    bin_count: usize,
) -> anyhow::Result<()> {
    let bins = histogram(intervals, bin_count);
    let (x_range, max_count) =
        histogram_bounds(&bins).ok_or_else(|| anyhow::anyhow!("No intervals to render"))?;

    let root = SVGBackend::new(path, INTERVAL_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Time Intervals Between Writes and Reads (Same Key) - {label}"),
            (FONT, 20),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            x_range,
            (LOG_BASELINE..max_count as f64 * 2.0).log_scale(),
        )?;

    chart
        .configure_mesh()
        .x_desc("Time Interval (ms)")
        .y_desc("Frequency")
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    chart.draw_series(bars(&bins, LOG_BASELINE, PURPLE.mix(0.7).filled()))?;
    chart.draw_series(bars(&bins, LOG_BASELINE, BLACK.stroke_width(1)))?;

    root.present()?;
    Ok(())
}

fn draw_latency_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    request_type: RequestType,
    latencies: &[f64],
    label: &str,
    colour: RGBColor,
    bin_count: usize,
) -> anyhow::Result<()> {
    let title = format!("{} Latency Distribution", type_title(request_type));

    let bins = histogram(latencies, bin_count);
    let (Some(summary), Some((x_range, max_count))) = (
        LatencySummary::from_latencies(latencies),
        histogram_bounds(&bins),
    ) else {
        return draw_placeholder(area, &title, &format!("No {request_type} data"));
    };
    let y_max = max_count as f64 * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{title} - {label}"), (FONT, 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Latency (ms)")
        .y_desc("Frequency")
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    chart.draw_series(bars(&bins, 0.0, colour.mix(0.7).filled()))?;
    chart.draw_series(bars(&bins, 0.0, BLACK.stroke_width(1)))?;

    for (name, value, marker) in [
        ("P95", summary.p95_ms, RED),
        ("P99", summary.p99_ms, ORANGE),
    ] {
        chart
            .draw_series(LineSeries::new(
                [(value, 0.0), (value, y_max)],
                marker.stroke_width(2),
            ))?
            .label(name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], marker.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_placeholder(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    title: &str,
    message: &str,
) -> anyhow::Result<()> {
    let (width, height) = area.dim_in_pixel();
    let centre_x = (width / 2) as i32;
    let centred = Pos::new(HPos::Center, VPos::Center);
    let title_style = TextStyle::from((FONT, 20).into_font()).pos(centred);
    let message_style = TextStyle::from((FONT, 24).into_font()).pos(centred);

    area.draw(&Text::new(title.to_string(), (centre_x, 30), title_style))?;
    area.draw(&Text::new(
        message.to_string(),
        (centre_x, (height / 2) as i32),
        message_style,
    ))?;

    Ok(())
}

fn bars<'a>(
    bins: &'a [HistogramBin],
    baseline: f64,
    style: ShapeStyle,
) -> impl Iterator<Item = Rectangle<(f64, f64)>> + 'a {
    bins.iter()
        .filter(|bin| bin.count > 0)
        .map(move |bin| {
            Rectangle::new([(bin.start, baseline), (bin.end, bin.count as f64)], style)
        })
}

fn type_title(request_type: RequestType) -> &'static str {
    match request_type {
        RequestType::Read => "Read",
        RequestType::Write => "Write",
    }
}
