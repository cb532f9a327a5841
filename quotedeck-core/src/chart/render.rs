//! PNG rendering with plotters' bitmap backend.
//!
//! Text (captions, axis labels, legends) needs plotters' font backend, the
//! default `ttf` feature of this crate. Built without it, charts are drawn
//! without any text: plotters' fallback font panics on every draw.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;

use super::{BarChartData, ChartError, LineChartData};

pub const BAR_CHART_SIZE: (u32, u32) = (1000, 1000);
pub const LINE_CHART_SIZE: (u32, u32) = (1000, 500);

const PANEL_BG: RGBColor = RGBColor(235, 235, 235);
const GRID: RGBColor = RGBColor(255, 255, 255);

/// ggplot-style qualitative palette.
const PALETTE: [RGBColor; 6] = [
    RGBColor(226, 74, 51),
    RGBColor(52, 138, 189),
    RGBColor(152, 142, 213),
    RGBColor(119, 119, 119),
    RGBColor(251, 193, 94),
    RGBColor(142, 186, 66),
];

/// Fraction of each category slot filled by its bars.
const SLOT_FILL: f64 = 0.8;

/// Whether plotters can rasterize text in this build.
pub const DRAWS_TEXT: bool = cfg!(feature = "ttf");

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Grouped bar chart: one slot per category, one bar per group inside it.
pub fn render_bar_chart_png(data: &BarChartData, path: &Path) -> Result<(), ChartError> {
    if data.categories.is_empty() {
        return Err(ChartError::NoRows);
    }

    let root = BitMapBackend::new(path, BAR_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let n_cat = data.categories.len();
    let n_grp = data.groups.len().max(1);
    let top = (data.max_value() * 1.1).max(1.0);
    let categories = data.categories.clone();

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if DRAWS_TEXT {
        builder
            .caption(&data.title, ("sans-serif", 28).into_font())
            .x_label_area_size(50)
            .y_label_area_size(70);
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..n_cat as f64, 0f64..top)
        .map_err(render_err)?;

    chart
        .plotting_area()
        .fill(&PANEL_BG)
        .map_err(render_err)?;

    // Label only slot centres
    let slot_label = |v: &f64| {
        let centre = v - v.floor();
        if (centre - 0.5).abs() < 1e-6 {
            categories.get(v.floor() as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    };
    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .light_line_style(GRID)
        .bold_line_style(GRID)
        .x_label_formatter(&slot_label);
    if DRAWS_TEXT {
        mesh.x_labels(n_cat * 2 + 1)
            .x_desc(data.x_label.as_str())
            .y_desc(data.y_label.as_str());
    } else {
        mesh.disable_axes().x_labels(0).y_labels(0);
    }
    mesh.draw().map_err(render_err)?;

    let bar_width = SLOT_FILL / n_grp as f64;
    let pad = (1.0 - SLOT_FILL) / 2.0;

    for (g, name) in data.groups.iter().enumerate() {
        let color = PALETTE[g % PALETTE.len()];
        let bars = (0..n_cat).filter_map(|c| {
            data.value(g, c).map(|v| {
                let x0 = c as f64 + pad + g as f64 * bar_width;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, v)], color.filled())
            })
        });
        let series = chart.draw_series(bars).map_err(render_err)?;
        if data.is_grouped() && DRAWS_TEXT {
            series
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }
    }

    if data.is_grouped() && DRAWS_TEXT {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    tracing::info!(path = %path.display(), title = %data.title, "rendered bar chart");
    Ok(())
}

/// Line chart of a date-indexed value, gridded.
pub fn render_line_chart_png(data: &LineChartData, path: &Path) -> Result<(), ChartError> {
    let Some((min, max)) = data.value_bounds() else {
        return Err(ChartError::NoRows);
    };

    let root = BitMapBackend::new(path, LINE_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let x_of = |d: &NaiveDate| d.num_days_from_ce() as f64;
    let first = data.points.first().map(|p| x_of(&p.0)).unwrap_or(0.0);
    let last = data.points.last().map(|p| x_of(&p.0)).unwrap_or(1.0);
    let span = if last > first { last } else { first + 1.0 };
    let pad = ((max - min).abs() * 0.05).max(0.01);

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15);
    if DRAWS_TEXT {
        builder
            .caption(&data.title, ("sans-serif", 24).into_font())
            .x_label_area_size(40)
            .y_label_area_size(60);
    }
    let mut chart = builder
        .build_cartesian_2d(first..span, (min - pad)..(max + pad))
        .map_err(render_err)?;

    let month_label = |v: &f64| {
        NaiveDate::from_num_days_from_ce_opt(*v as i32)
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default()
    };
    let mut mesh = chart.configure_mesh();
    mesh.x_label_formatter(&month_label);
    if DRAWS_TEXT {
        mesh.x_labels(6).y_desc("Close");
    } else {
        mesh.disable_axes().x_labels(0).y_labels(0);
    }
    mesh.draw().map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            data.points.iter().map(|(d, v)| (x_of(d), *v)),
            PALETTE[1].stroke_width(2),
        ))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    tracing::info!(path = %path.display(), points = data.points.len(), "rendered line chart");
    Ok(())
}
