use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use super::{Align, Canvas, Rgb, PALETTE};
use crate::process::utils::{format_dollars, group_thousands};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 500;

const TITLE: &str = "Ventas por Producto";
const X_LABEL: &str = "Producto";
const Y_LABEL: &str = "Total Vendido ($)";
const TITLE_SCALE: u32 = 3;
const TEXT_SCALE: u32 = 2;
const BAR_FILL: f64 = 0.5;
/// Extra room above the tallest bar for its label, as a share of the data span.
const LABEL_HEADROOM: f64 = 0.12;
const MAX_NAME_PX: u32 = 200;

/// Round `raw` up to 1, 2, 2.5 or 5 times a power of ten.
fn nice_step(span: f64, target_ticks: u32) -> f64 {
    let raw = span / target_ticks as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 2.5 {
        2.5
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

/// Axis bounds and tick step covering `lo..=hi`.
pub fn y_axis(lo: f64, hi: f64) -> (f64, f64, f64) {
    let lo = lo.min(0.0);
    let hi = hi.max(0.0);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let top = hi + span * LABEL_HEADROOM;
    let step = nice_step(top - lo, 6);
    let axis_min = (lo / step).floor() * step;
    let axis_max = (top / step).ceil() * step;
    (axis_min, axis_max, step)
}

/// `name` shortened with a trailing `...` so it fits in `MAX_NAME_PX`.
fn fit_name(name: &str) -> String {
    if Canvas::measure(name, TEXT_SCALE) <= MAX_NAME_PX {
        return name.to_string();
    }
    let mut kept: Vec<char> = name.chars().collect();
    while !kept.is_empty() {
        kept.pop();
        let candidate: String = kept.iter().collect::<String>().trim_end().to_string() + "...";
        if Canvas::measure(&candidate, TEXT_SCALE) <= MAX_NAME_PX {
            return candidate;
        }
    }
    "...".to_string()
}

fn tick_label(v: f64, step: f64) -> String {
    if step >= 1.0 {
        group_thousands(v.round() as i64)
    } else {
        format!("{:.2}", v)
    }
}

/// Bar chart of `(product, total)` pairs, drawn in the given order.
pub fn render_bar_chart(data: &[(String, f64)]) -> Canvas {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, Rgb::WHITE);
    let line = Canvas::line_height(TEXT_SCALE) as i64;

    canvas.draw_text(WIDTH as i64 / 2, 12, TITLE, TITLE_SCALE, Align::Center, Rgb::BLACK);

    let lo = data.iter().map(|(_, v)| *v).fold(0.0, f64::min);
    let hi = data.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let (axis_min, axis_max, step) = y_axis(lo, hi);

    let ticks: Vec<f64> = (0..)
        .map(|i| axis_min + step * i as f64)
        .take_while(|v| *v <= axis_max + step * 1e-9)
        .collect();
    let tick_w = ticks
        .iter()
        .map(|v| Canvas::measure(&tick_label(*v, step), TEXT_SCALE))
        .max()
        .unwrap_or(0) as i64;
    let names: Vec<String> = data.iter().map(|(name, _)| fit_name(name)).collect();
    let name_w = names
        .iter()
        .map(|name| Canvas::measure(name, TEXT_SCALE))
        .max()
        .unwrap_or(0) as i64;

    let left = 12 + line + 12 + tick_w + 10;
    let right = WIDTH as i64 - 20;
    let top = 12 + Canvas::line_height(TITLE_SCALE) as i64 + 20;
    let bottom = HEIGHT as i64 - (line + 16 + name_w + 10);

    let plot_h = (bottom - top) as f64;
    let y_of = |v: f64| -> i64 {
        bottom - ((v - axis_min) / (axis_max - axis_min) * plot_h).round() as i64
    };

    // y ticks
    for v in &ticks {
        let y = y_of(*v);
        canvas.hline(left - 5, left - 1, y, Rgb::BLACK);
        canvas.draw_text(
            left - 8,
            y - line / 2,
            &tick_label(*v, step),
            TEXT_SCALE,
            Align::Right,
            Rgb::BLACK,
        );
    }

    // bars
    if data.is_empty() {
        warn!("no products to chart");
    }
    let slot = (right - left) as f64 / data.len().max(1) as f64;
    let zero = y_of(0.0);
    for (i, ((_, value), name)) in data.iter().zip(&names).enumerate() {
        let cx = left as f64 + slot * (i as f64 + 0.5);
        let half = (slot * BAR_FILL / 2.0).max(1.0);
        let x0 = (cx - half).round() as i64;
        let x1 = (cx + half).round() as i64;
        let yv = y_of(*value);
        canvas.fill_rect(x0, yv.min(zero), x1 - x0, (zero - yv).abs(), PALETTE[0]);

        let label = format_dollars(*value);
        let label_y = if *value >= 0.0 { yv - 4 - line } else { yv + 4 };
        canvas.draw_text(cx.round() as i64, label_y, &label, TEXT_SCALE, Align::Center, Rgb::BLACK);

        let x_tick = cx.round() as i64;
        canvas.vline(x_tick, bottom + 1, bottom + 5, Rgb::BLACK);
        let w = Canvas::measure(name, TEXT_SCALE) as i64;
        canvas.draw_text_up(x_tick - line / 2, bottom + 8 + w, name, TEXT_SCALE, Rgb::BLACK);
    }

    // frame
    canvas.hline(left, right, top, Rgb::BLACK);
    canvas.hline(left, right, bottom, Rgb::BLACK);
    canvas.vline(left, top, bottom, Rgb::BLACK);
    canvas.vline(right, top, bottom, Rgb::BLACK);

    // axis titles
    canvas.draw_text(
        (left + right) / 2,
        HEIGHT as i64 - 8 - line,
        X_LABEL,
        TEXT_SCALE,
        Align::Center,
        Rgb::BLACK,
    );
    let y_label_w = Canvas::measure(Y_LABEL, TEXT_SCALE) as i64;
    canvas.draw_text_up(12, (top + bottom) / 2 + y_label_w / 2, Y_LABEL, TEXT_SCALE, Rgb::BLACK);

    canvas
}

#[tracing::instrument(level = "info", skip(data, path), fields(path = %path.as_ref().display(), bars = data.len()))]
pub fn write_bar_chart<P: AsRef<Path>>(data: &[(String, f64)], path: P) -> Result<()> {
    render_bar_chart(data).save_png(path.as_ref())?;
    info!("saved product bar chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(10.0, 5), 2.0);
        assert_eq!(nice_step(100.0, 4), 25.0);
        assert_eq!(nice_step(7_000_000.0, 6), 2_000_000.0);
    }

    #[test]
    fn test_y_axis_covers_data_and_headroom() {
        let (min, max, step) = y_axis(0.0, 3000.0);
        assert_eq!(min, 0.0);
        assert!(max >= 3000.0 * (1.0 + LABEL_HEADROOM));
        assert_eq!((max / step).fract(), 0.0);

        let (min, _, _) = y_axis(-50.0, 100.0);
        assert!(min <= -50.0);
    }

    #[test]
    fn test_tallest_bar_is_drawn_in_bar_colour() {
        let data = vec![("Laptop".to_string(), 9000.0), ("Mouse".to_string(), 1000.0)];
        let canvas = render_bar_chart(&data);
        assert_eq!((canvas.width(), canvas.height()), (WIDTH, HEIGHT));

        // the tallest bar crosses mid height
        let found = (0..WIDTH).any(|x| canvas.pixel(x, HEIGHT / 2) == Some(PALETTE[0]));
        assert!(found, "no bar pixels at mid height");
    }

    #[test]
    fn test_long_names_are_shortened_to_fit() {
        let long = "Impresora Multifuncional Laser";
        assert_eq!(long.chars().count(), 30);
        let fitted = fit_name(long);
        assert!(fitted.ends_with("..."));
        assert!(Canvas::measure(&fitted, TEXT_SCALE) <= MAX_NAME_PX);
        assert_eq!(fit_name("Mouse"), "Mouse");
    }

    #[test]
    fn test_empty_chart_still_renders() {
        let canvas = render_bar_chart(&[]);
        assert_eq!(canvas.width(), WIDTH);
    }

    #[test]
    fn test_write_bar_chart_png() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("bar.png");
        write_bar_chart(&[("Laptop".to_string(), 1234.0)], &path)?;

        let bytes = std::fs::read(&path)?;
        let reader = png::Decoder::new(Cursor::new(bytes)).read_info()?;
        assert_eq!(reader.info().width, WIDTH);
        assert_eq!(reader.info().height, HEIGHT);
        Ok(())
    }
}
