//! Line chart of HMR latency against project size, measured and projected.

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use std::path::Path;

use super::projection::ChartData;
use super::style::{
    anchor, centered, Canvas, ANNOTATION, LEGACY, LEGACY_LIGHT, TEXT, TURBO, TURBO_LIGHT,
};

const X_MIN: f64 = -0.3;
const X_MAX: f64 = 3.5;
const PERCEPTION_THRESHOLD_MS: f64 = 100.0;

struct Line {
    name: &'static str,
    color: RGBColor,
    light: RGBColor,
    points: Vec<(f64, f64)>,
    /// Annotation offset in points, positive is up.
    label_rise: f64,
}

pub fn draw(path: &Path, data: &ChartData, canvas: &Canvas) -> Result<()> {
    let xs = (0..data.hmr.len()).map(|i| i as f64);
    let lines = [
        Line {
            name: "Webpack",
            color: LEGACY,
            light: LEGACY_LIGHT,
            points: xs.clone().zip(data.hmr.iter().map(|p| p.legacy)).collect(),
            label_rise: 10.0,
        },
        Line {
            name: "Turbopack",
            color: TURBO,
            light: TURBO_LIGHT,
            points: xs.clone().zip(data.hmr.iter().map(|p| p.turbo)).collect(),
            label_rise: -15.0,
        },
    ];
    // The projected segment starts at the last measured size.
    let split = data
        .hmr
        .iter()
        .rposition(|p| !p.size.is_projected())
        .unwrap_or(0);
    let y_max = data
        .hmr
        .iter()
        .map(|p| p.legacy * 1.15)
        .fold(800.0, f64::max);

    let (width, height) = canvas.size(12.0, 7.0);
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot, footer) = root.split_vertically(height as i32 - canvas.px(28.0));

    let mut chart = ChartBuilder::on(&plot)
        .caption(
            "Scalability Projection: Time Complexity Analysis",
            canvas.title(),
        )
        .margin(canvas.px(14.0))
        .x_label_area_size(canvas.px(40.0))
        .y_label_area_size(canvas.px(48.0))
        .build_cartesian_2d(X_MIN..X_MAX, 0.0..y_max)?;

    let label_for = |x: &f64| {
        super::index_at(*x)
            .and_then(|i| data.hmr.get(i))
            .map(|p| format!("{} ({})", p.size.name(), p.size.components()))
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(data.hmr.len())
        .x_label_formatter(&label_for)
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .x_desc("Project Size (Component Count)")
        .y_desc("HMR Latency (ms)")
        .axis_desc_style(canvas.text(11.0, &TEXT))
        .label_style(canvas.text(10.0, &TEXT))
        .light_line_style(canvas.grid_line())
        .bold_line_style(canvas.grid_line())
        .axis_style(canvas.axis_line())
        .draw()?;

    // Gap between the curves.
    let mut gap: Vec<(f64, f64)> = lines[1].points.clone();
    gap.extend(lines[0].points.iter().rev());
    chart.draw_series(std::iter::once(Polygon::new(gap, TURBO.mix(0.1).filled())))?;

    chart.draw_series(DashedLineSeries::new(
        vec![
            (X_MIN, PERCEPTION_THRESHOLD_MS),
            (X_MAX, PERCEPTION_THRESHOLD_MS),
        ],
        canvas.px(2.0),
        canvas.px(3.0),
        ANNOTATION.mix(0.7).stroke_width(canvas.stroke(1.5)),
    ))?;
    chart.draw_series(std::iter::once(Text::new(
        "Human Perception Threshold (~100ms)",
        (3.4, PERCEPTION_THRESHOLD_MS + 5.0),
        canvas
            .italic(8.0, &ANNOTATION)
            .pos(anchor(HPos::Right, VPos::Bottom)),
    )))?;

    let stroke = canvas.stroke(3.0);
    let dash = canvas.px(8.0);
    let circle = canvas.px(6.0);
    let square = canvas.px(5.0);
    let ring = canvas.px(2.0);
    let legend = canvas.px(10.0);

    for line in &lines {
        let color = line.color;
        let light = line.light;

        chart
            .draw_series(LineSeries::new(
                line.points[..=split].to_vec(),
                color.stroke_width(stroke),
            ))?
            .label(format!("{} (Measured)", line.name))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 2 * legend, y)], color.stroke_width(stroke))
            });
        chart.draw_series(line.points[..=split].iter().map(|&point| {
            EmptyElement::at(point)
                + Circle::new((0, 0), circle + ring, WHITE.filled())
                + Circle::new((0, 0), circle, color.filled())
        }))?;

        chart
            .draw_series(DashedLineSeries::new(
                line.points[split..].to_vec(),
                dash,
                dash / 2,
                color.stroke_width(stroke),
            ))?
            .label(format!("{} (Projected)", line.name))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 2 * legend, y)], light.stroke_width(stroke))
            });
        chart.draw_series(line.points[split + 1..].iter().map(|&point| {
            EmptyElement::at(point)
                + Rectangle::new([(-square, -square), (square, square)], light.filled())
                + Rectangle::new(
                    [(-square, -square), (square, square)],
                    color.stroke_width(canvas.stroke(2.0)),
                )
        }))?;

        let rise = canvas.px(line.label_rise);
        let style = canvas.bold(10.0, &color).pos(anchor(HPos::Left, VPos::Center));
        chart.draw_series(line.points.iter().map(|&(x, y)| {
            EmptyElement::at((x, y))
                + Text::new(
                    format!("{:.0} ms", y),
                    (canvas.px(10.0), -rise),
                    style.clone(),
                )
        }))?;
    }

    chart.draw_series([
        Text::new(
            "O(n) Linear Scaling",
            (2.5, 500.0),
            canvas.bold(11.0, &LEGACY).pos(centered()),
        ),
        Text::new(
            "O(1) Constant Time",
            (2.5, 60.0),
            canvas.bold(11.0, &TURBO).pos(centered()),
        ),
    ])?;

    // Speedup badges sit between each size and the next, halfway up the gap.
    let last = data.hmr.len().saturating_sub(1);
    let badge_style = canvas.text(9.0, &ANNOTATION).pos(centered());
    chart.draw_series(data.hmr.iter().enumerate().map(|(i, p)| {
        let x = if i < last { i as f64 + 0.5 } else { i as f64 + 0.2 };
        Text::new(
            p.speedup_label(),
            (x, (p.legacy + p.turbo) / 2.0),
            badge_style.clone(),
        )
    }))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.95).filled())
        .border_style(canvas.axis_line())
        .label_font(canvas.text(9.0, &TEXT))
        .draw()?;

    let note = format!(
        "* Projected values based on observed O(n) vs O(1) scaling patterns | Measured data: {} samples",
        data.sample_note()
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
