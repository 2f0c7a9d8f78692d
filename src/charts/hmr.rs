//! Grouped bar chart of measured HMR latency.

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use std::path::Path;

use super::projection::{ChartData, HmrPoint, FRAMEWORK, PLATFORM};
use super::style::{anchor, Canvas, ANNOTATION, LEGACY, TEXT, TURBO};

const BAR_WIDTH: f64 = 0.35;
/// Keeps the value axis non-empty when overrides hold no positive latency.
const MIN_Y_MAX: f64 = 1.0;

fn category(point: &HmrPoint) -> String {
    format!(
        "{} Project ({} components)",
        point.size.name(),
        point.size.components()
    )
}

pub fn draw(path: &Path, data: &ChartData, canvas: &Canvas) -> Result<()> {
    let measured: Vec<&HmrPoint> = data.measured().collect();
    let n = measured.len();
    let y_max = measured
        .iter()
        .map(|p| p.legacy.max(p.turbo))
        .fold(MIN_Y_MAX, f64::max)
        * 1.35;

    let (width, height) = canvas.size(10.0, 7.0);
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot, footer) = root.split_vertically(height as i32 - canvas.px(28.0));

    let mut chart = ChartBuilder::on(&plot)
        .caption(
            "HMR Latency Comparison: Webpack vs Turbopack",
            canvas.title(),
        )
        .margin(canvas.px(14.0))
        .x_label_area_size(canvas.px(40.0))
        .y_label_area_size(canvas.px(48.0))
        .build_cartesian_2d(-0.6..n as f64 - 0.4, 0.0..y_max)?;

    let label_for = |x: &f64| {
        super::index_at(*x)
            .and_then(|i| measured.get(i))
            .map(|p| category(p))
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&label_for)
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .x_desc("Project Size")
        .y_desc("HMR Latency (ms)")
        .axis_desc_style(canvas.text(11.0, &TEXT))
        .label_style(canvas.text(10.0, &TEXT))
        .light_line_style(canvas.grid_line())
        .bold_line_style(canvas.grid_line())
        .axis_style(canvas.axis_line())
        .draw()?;

    let legend = canvas.px(6.0);
    for (color, label, offset) in [
        (LEGACY, "Webpack (Legacy)", -BAR_WIDTH),
        (TURBO, "Turbopack", 0.0),
    ] {
        chart
            .draw_series(measured.iter().enumerate().map(|(i, p)| {
                let x = i as f64 + offset;
                let value = if offset < 0.0 { p.legacy } else { p.turbo };
                Rectangle::new([(x, 0.0), (x + BAR_WIDTH, value)], color.filled())
            }))?
            .label(label)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - legend), (x + 2 * legend, y + legend)], color.filled())
            });
    }

    let value_style = canvas
        .bold(11.0, &TEXT)
        .pos(anchor(HPos::Center, VPos::Bottom));
    let lift = canvas.px(5.0);
    chart.draw_series(
        measured
            .iter()
            .enumerate()
            .flat_map(|(i, p)| {
                let x = i as f64;
                [
                    (x - BAR_WIDTH / 2.0, p.legacy),
                    (x + BAR_WIDTH / 2.0, p.turbo),
                ]
            })
            .map(|(x, value)| {
                EmptyElement::at((x, value))
                    + Text::new(format!("{:.2} ms", value), (0, -lift), value_style.clone())
            }),
    )?;

    let speedup_style = canvas
        .italic(10.0, &TURBO)
        .pos(anchor(HPos::Center, VPos::Bottom));
    chart.draw_series(measured.iter().enumerate().map(|(i, p)| {
        Text::new(
            format!("{:.2}× faster", p.speedup()),
            (i as f64, p.legacy.max(p.turbo) + 25.0),
            speedup_style.clone(),
        )
    }))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.95).filled())
        .border_style(canvas.axis_line())
        .label_font(canvas.text(10.0, &TEXT))
        .draw()?;

    let note = format!(
        "Data: {} samples per condition | Platform: {} | Framework: {}",
        data.sample_note(),
        PLATFORM,
        FRAMEWORK
    );
    footer.draw(&Text::new(
        note,
        (width as i32 / 2, canvas.px(14.0)),
        canvas
            .italic(9.0, &ANNOTATION)
            .pos(anchor(HPos::Center, VPos::Center)),
    ))?;

    root.present()?;
    Ok(())
}
