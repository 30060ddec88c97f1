use anyhow::{bail, Result};
use std::path::Path;
use tracing::{info, warn};

use super::{Align, Canvas, Rgb, PALETTE};

pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 600;

const TITLE: &str = "Distribución de Ventas por Ciudad";
const TITLE_SCALE: u32 = 2;
const TEXT_SCALE: u32 = 2;
const START_ANGLE: f64 = 90.0;
const RADIUS: f64 = 200.0;
const SHADOW_OFFSET: f64 = 6.0;
const SHADOW: Rgb = Rgb::hex(0xB0B0B0);
const LABEL_DISTANCE: f64 = 1.1;
const PERCENT_DISTANCE: f64 = 0.6;

/// One wedge: start angle and sweep in degrees, counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub start: f64,
    pub sweep: f64,
    pub percent: f64,
}

/// Lay `(label, value)` pairs around the circle from 90°, counter-clockwise.
/// Returns no wedges when the values sum to zero.
pub fn layout_wedges(data: &[(String, f64)]) -> Result<Vec<Wedge>> {
    if let Some((label, v)) = data.iter().find(|(_, v)| *v < 0.0) {
        bail!("pie wedge '{}' has negative size {}", label, v);
    }
    let total: f64 = data.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Ok(Vec::new());
    }

    let mut start = START_ANGLE;
    Ok(data
        .iter()
        .map(|(label, v)| {
            let share = v / total;
            let wedge = Wedge {
                label: label.clone(),
                start,
                sweep: share * 360.0,
                percent: share * 100.0,
            };
            start += wedge.sweep;
            wedge
        })
        .collect())
}

pub fn render_pie_chart(data: &[(String, f64)]) -> Result<Canvas> {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, Rgb::WHITE);
    canvas.draw_text(WIDTH as i64 / 2, 16, TITLE, TITLE_SCALE, Align::Center, Rgb::BLACK);

    let wedges = layout_wedges(data)?;
    if wedges.is_empty() {
        warn!("city totals sum to zero, pie left empty");
        return Ok(canvas);
    }

    let cx = WIDTH as f64 / 2.0;
    let cy = HEIGHT as f64 / 2.0 + 20.0;
    let line = Canvas::line_height(TEXT_SCALE) as i64;

    canvas.fill_circle(cx + SHADOW_OFFSET, cy + SHADOW_OFFSET, RADIUS, SHADOW);
    for (i, w) in wedges.iter().enumerate() {
        canvas.fill_wedge(cx, cy, RADIUS, w.start, w.sweep, PALETTE[i % PALETTE.len()]);
    }

    for w in &wedges {
        let mid = (w.start + w.sweep / 2.0).to_radians();
        let (sin, cos) = mid.sin_cos();

        let lx = cx + RADIUS * LABEL_DISTANCE * cos;
        let ly = cy - RADIUS * LABEL_DISTANCE * sin;
        let align = if cos > 0.01 {
            Align::Left
        } else if cos < -0.01 {
            Align::Right
        } else {
            Align::Center
        };
        canvas.draw_text(lx.round() as i64, ly.round() as i64 - line / 2, &w.label, TEXT_SCALE, align, Rgb::BLACK);

        let px = cx + RADIUS * PERCENT_DISTANCE * cos;
        let py = cy - RADIUS * PERCENT_DISTANCE * sin;
        canvas.draw_text(
            px.round() as i64,
            py.round() as i64 - line / 2,
            &format!("{:.1}%", w.percent),
            TEXT_SCALE,
            Align::Center,
            Rgb::BLACK,
        );
    }

    Ok(canvas)
}

#[tracing::instrument(level = "info", skip(data, path), fields(path = %path.as_ref().display(), wedges = data.len()))]
pub fn write_pie_chart<P: AsRef<Path>>(data: &[(String, f64)], path: P) -> Result<()> {
    render_pie_chart(data)?.save_png(path.as_ref())?;
    info!("saved city pie chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn pairs(v: &[(&str, f64)]) -> Vec<(String, f64)> {
        v.iter().map(|(n, x)| (n.to_string(), *x)).collect()
    }

    #[test]
    fn test_layout_wedges() -> Result<()> {
        let wedges = layout_wedges(&pairs(&[("Bogota", 3.0), ("Cali", 1.0)]))?;
        assert_eq!(wedges.len(), 2);
        assert_eq!(wedges[0].start, 90.0);
        assert_eq!(wedges[0].sweep, 270.0);
        assert_eq!(wedges[0].percent, 75.0);
        assert_eq!(wedges[1].start, 360.0);
        assert_eq!(wedges[1].sweep, 90.0);
        Ok(())
    }

    #[test]
    fn test_negative_wedge_is_an_error() {
        assert!(layout_wedges(&pairs(&[("Cali", -1.0)])).is_err());
    }

    #[test]
    fn test_zero_total_gives_no_wedges() -> Result<()> {
        assert!(layout_wedges(&pairs(&[("Cali", 0.0)]))?.is_empty());
        assert!(layout_wedges(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_first_wedge_starts_at_twelve_o_clock() -> Result<()> {
        // a quarter share from 90° covers the upper-left quadrant
        let canvas = render_pie_chart(&pairs(&[("A", 1.0), ("B", 3.0)]))?;
        let cx = WIDTH / 2;
        let cy = HEIGHT / 2 + 20;
        assert_eq!(canvas.pixel(cx - 40, cy - 100), Some(PALETTE[0]));
        assert_eq!(canvas.pixel(cx + 40, cy - 100), Some(PALETTE[1]));
        Ok(())
    }

    #[test]
    fn test_write_pie_chart_png() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("pie.png");
        write_pie_chart(&pairs(&[("Bogota", 10.0)]), &path)?;

        let bytes = std::fs::read(&path)?;
        let reader = png::Decoder::new(Cursor::new(bytes)).read_info()?;
        assert_eq!(reader.info().width, WIDTH);
        assert_eq!(reader.info().height, HEIGHT);
        Ok(())
    }
}
