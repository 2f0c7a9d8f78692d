//! Three panel infographic: cold start, speedup growth, key findings.

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, VPos};
use std::path::Path;

use super::projection::{ChartData, ProjectSize, FRAMEWORK, PLATFORM};
use super::style::{
    anchor, Canvas, GRID, LEGACY, PANEL, TEXT, TURBO, TURBO_LIGHT,
};

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub fn draw(path: &Path, data: &ChartData, canvas: &Canvas) -> Result<()> {
    let (width, height) = canvas.size(15.0, 5.0);
    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(
        "Next.js Toolchain Benchmark: Webpack vs Turbopack",
        canvas.title(),
    )?;

    let panels = body.split_evenly((1, 3));
    draw_cold_start(&panels[0], data, canvas)?;
    draw_speedups(&panels[1], data, canvas)?;
    draw_findings(&panels[2], data, canvas)?;

    root.present()?;
    Ok(())
}

fn draw_cold_start(panel: &Panel<'_>, data: &ChartData, canvas: &Canvas) -> Result<()> {
    let bars = [
        ("Webpack", data.cold_start_legacy, LEGACY),
        ("Turbopack", data.cold_start_turbo, TURBO),
    ];
    let x_max = (data.cold_start_legacy * 1.25).max(1600.0);

    let mut chart = ChartBuilder::on(panel)
        .caption("Cold Start Time", canvas.bold(12.0, &TEXT))
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(32.0))
        .y_label_area_size(canvas.px(56.0))
        .build_cartesian_2d(0.0..x_max, -0.75..1.75)?;

    chart
        .configure_mesh()
        .y_labels(bars.len())
        .y_label_formatter(&|y: &f64| {
            super::index_at(*y)
                .and_then(|i| bars.get(i))
                .map(|(name, _, _)| name.to_string())
                .unwrap_or_default()
        })
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .x_desc("Time (ms)")
        .axis_desc_style(canvas.text(10.0, &TEXT))
        .label_style(canvas.text(10.0, &TEXT))
        .light_line_style(canvas.grid_line())
        .bold_line_style(canvas.grid_line())
        .axis_style(canvas.axis_line())
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value, color))| {
        let y = i as f64;
        Rectangle::new([(0.0, y - 0.25), (*value, y + 0.25)], color.filled())
    }))?;

    let label_style = canvas
        .bold(11.0, &TEXT)
        .pos(anchor(HPos::Left, VPos::Center));
    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value, _))| {
        Text::new(
            format!("{:.0} ms", value),
            (value + 30.0, i as f64),
            label_style.clone(),
        )
    }))?;

    chart.draw_series(std::iter::once(Text::new(
        format!("{:.2}× faster", data.cold_start_speedup()),
        (x_max / 2.0, -0.5),
        canvas
            .bold(10.0, &TURBO)
            .pos(anchor(HPos::Center, VPos::Center)),
    )))?;

    Ok(())
}

fn draw_speedups(panel: &Panel<'_>, data: &ChartData, canvas: &Canvas) -> Result<()> {
    let n = data.hmr.len();
    let y_max = data
        .hmr
        .iter()
        .map(|p| p.speedup() * 1.25)
        .fold(35.0, f64::max);

    let mut chart = ChartBuilder::on(panel)
        .caption("Turbopack Speedup Factor", canvas.bold(12.0, &TEXT))
        .margin(canvas.px(10.0))
        .x_label_area_size(canvas.px(32.0))
        .y_label_area_size(canvas.px(40.0))
        .build_cartesian_2d(-0.5..n as f64 - 0.5, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x: &f64| {
            super::index_at(*x)
                .and_then(|i| data.hmr.get(i))
                .map(|p| p.size.name().to_string())
                .unwrap_or_default()
        })
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .y_desc("Speedup (×)")
        .axis_desc_style(canvas.text(10.0, &TEXT))
        .label_style(canvas.text(10.0, &TEXT))
        .light_line_style(canvas.grid_line())
        .bold_line_style(canvas.grid_line())
        .axis_style(canvas.axis_line())
        .draw()?;

    chart.draw_series(data.hmr.iter().enumerate().map(|(i, p)| {
        let x = i as f64;
        let color = if p.size.is_projected() {
            TURBO_LIGHT
        } else {
            TURBO
        };
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, p.speedup())], color.filled())
    }))?;

    let label_style = canvas
        .bold(11.0, &TEXT)
        .pos(anchor(HPos::Center, VPos::Bottom));
    chart.draw_series(data.hmr.iter().enumerate().map(|(i, p)| {
        let label = if p.size.is_projected() {
            format!("{:.1}×", p.speedup())
        } else {
            format!("{:.2}×", p.speedup())
        };
        Text::new(label, (i as f64, p.speedup() + 0.5), label_style.clone())
    }))?;

    Ok(())
}

fn findings(data: &ChartData) -> Vec<String> {
    let rule = "═".repeat(24);
    let mut lines = vec![
        "KEY FINDINGS".to_string(),
        rule.clone(),
        String::new(),
        "Cold Start".to_string(),
        format!("   {:.2}× faster", data.cold_start_speedup()),
    ];
    for (size, title) in [
        (ProjectSize::Small, "HMR (Small)"),
        (ProjectSize::Medium, "HMR (Medium)"),
        (ProjectSize::Enterprise, "Projected (Enterprise)"),
    ] {
        if let Some(point) = data.hmr_point(size) {
            lines.push(title.to_string());
            lines.push(format!("   {} faster", point.speedup_label()));
        }
    }
    lines.extend([
        String::new(),
        rule,
        String::new(),
        format!("Platform: {}", PLATFORM),
        format!("Framework: {}", FRAMEWORK),
        format!(
            "Sample Size: {}",
            data.sample_size
                .map(|n| format!("N={}", n))
                .unwrap_or_else(|| "varies".to_string())
        ),
    ]);
    lines
}

fn draw_findings(panel: &Panel<'_>, data: &ChartData, canvas: &Canvas) -> Result<()> {
    let body = panel.titled("Summary", canvas.bold(12.0, &TEXT))?;
    let (w, h) = body.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);

    let lines = findings(data);
    let line_height = canvas.px(13.0);
    let block = line_height * lines.len() as i32;
    let pad = canvas.px(8.0);
    let top = ((h - block) / 2).max(pad);

    body.draw(&Rectangle::new(
        [(pad, top - pad), (w - pad, top + block + pad)],
        PANEL.filled(),
    ))?;
    body.draw(&Rectangle::new(
        [(pad, top - pad), (w - pad, top + block + pad)],
        GRID.stroke_width(canvas.stroke(2.0)),
    ))?;

    let style = canvas
        .mono(11.0, &TEXT)
        .pos(anchor(HPos::Center, VPos::Top));
    for (i, line) in lines.iter().enumerate() {
        body.draw(&Text::new(
            line.as_str(),
            (w / 2, top + i as i32 * line_height),
            style.clone(),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SampleSet;
    use crate::report::Report;

    #[test]
    fn findings_text() {
        let report = Report::build(&SampleSet::recorded()).unwrap();
        let data = ChartData::from_report(&report).unwrap();
        let lines = findings(&data);

        assert_eq!(lines[0], "KEY FINDINGS");
        assert!(lines.contains(&"   2.26× faster".to_string()));
        assert!(lines.contains(&"   6.18× faster".to_string()));
        assert!(lines.contains(&"   8.53× faster".to_string()));
        assert!(lines.contains(&"   ~28× faster".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("Sample Size: N=30"));
    }
}
