//! Terminal rasterizer for the groove, the fill and its gradient.
//!
//! Each character cell is sampled once at its centre, with one cell per unit
//! of the geometry's coordinate space. A cell inside the visible part of the
//! fill stroke shows the gradient colour at that position; otherwise a cell
//! inside the groove shows the groove colour.

use crate::geometry::RenderGeometry;
use lipgloss_extras::lipgloss;
use lipgloss::blending::blend_1d;
use lipgloss::{Color, Style};
use lyon_geom::point;
use serde::{Deserialize, Serialize};

const GRADIENT_STEPS: usize = 64;

/// A position in unit coordinates of the gradient's frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GradientPoint {
    /// `0.0` is the left edge, `1.0` the right edge.
    pub x: f64,
    /// `0.0` is the top edge, `1.0` the bottom edge.
    pub y: f64,
}

impl GradientPoint {
    /// Creates a gradient point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Two-colour linear gradient masked by the fill stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Colour at the start point (hex or named colour).
    pub start_color: String,
    /// Colour at the end point.
    pub end_color: String,
    /// Where the gradient starts.
    pub start_point: GradientPoint,
    /// Where the gradient ends.
    pub end_point: GradientPoint,
}

impl Gradient {
    /// Position along the gradient, in `[0, 1]`, of a point in unit coordinates.
    pub fn position(&self, x: f64, y: f64) -> f64 {
        let dx = self.end_point.x - self.start_point.x;
        let dy = self.end_point.y - self.start_point.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return 0.0;
        }
        let along = (x - self.start_point.x) * dx + (y - self.start_point.y) * dy;
        (along / len_sq).clamp(0.0, 1.0)
    }
}

/// Characters used to draw the strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyphs {
    /// Character for filled cells.
    pub fill: char,
    /// Character for groove cells.
    pub groove: char,
    /// Character for cells outside both strokes.
    pub blank: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            fill: '█',
            groove: '░',
            blank: ' ',
        }
    }
}

/// What a single cell shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Outside both strokes.
    Blank,
    /// Inside the groove only.
    Groove,
    /// Inside the visible fill; carries the gradient position.
    Fill(f64),
}

/// Samples the geometry into rows of cells with the fill drawn up to `stroke_end`.
pub fn rasterize(
    geometry: &RenderGeometry,
    stroke_end: f64,
    gradient: &Gradient,
) -> Vec<Vec<Cell>> {
    let bounds = geometry.bounds;
    let frame = geometry.gradient_frame;
    let cols = bounds.width.max(0.0).round() as usize;
    let rows = bounds.height.max(0.0).round() as usize;

    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let p = point(bounds.x + col as f64 + 0.5, bounds.y + row as f64 + 0.5);
                    if geometry.fill.covers(p, stroke_end) {
                        let u = unit(p.x - frame.x, frame.width);
                        let v = unit(p.y - frame.y, frame.height);
                        Cell::Fill(gradient.position(u, v))
                    } else if geometry.groove.covers(p, 1.0) {
                        Cell::Groove
                    } else {
                        Cell::Blank
                    }
                })
                .collect()
        })
        .collect()
}

fn unit(offset: f64, extent: f64) -> f64 {
    if extent == 0.0 {
        0.0
    } else {
        offset / extent
    }
}

/// Rasterizes the geometry and styles every cell for the terminal.
pub fn render(
    geometry: &RenderGeometry,
    stroke_end: f64,
    gradient: &Gradient,
    groove_color: &str,
    glyphs: Glyphs,
) -> String {
    let ramp = blend_1d(
        GRADIENT_STEPS,
        vec![
            Color::from(gradient.start_color.as_str()),
            Color::from(gradient.end_color.as_str()),
        ],
    );
    let groove = Style::new()
        .foreground(Color::from(groove_color))
        .render(&glyphs.groove.to_string());
    let blank = glyphs.blank.to_string();
    let fill = glyphs.fill.to_string();

    rasterize(geometry, stroke_end, gradient)
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Blank => blank.clone(),
                    Cell::Groove => groove.clone(),
                    Cell::Fill(t) => {
                        let last = ramp.len() - 1;
                        let idx = ((t * last as f64).round() as usize).min(last);
                        Style::new().foreground(ramp[idx].clone()).render(&fill)
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{bar_geometry, ring_geometry, Bounds};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn horizontal() -> Gradient {
        Gradient {
            start_color: "#FF2D55".to_string(),
            end_color: "#FF3B30".to_string(),
            start_point: GradientPoint::new(0.0, 0.5),
            end_point: GradientPoint::new(1.0, 0.5),
        }
    }

    fn count(cells: &[Vec<Cell>], pred: impl Fn(&Cell) -> bool) -> usize {
        cells.iter().flatten().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_gradient_position() {
        let gradient = horizontal();
        assert_eq!(gradient.position(0.0, 0.0), 0.0);
        assert_eq!(gradient.position(0.5, 0.9), 0.5);
        assert_eq!(gradient.position(2.0, 0.5), 1.0);

        let degenerate = Gradient {
            end_point: GradientPoint::new(0.0, 0.5),
            ..horizontal()
        };
        assert_eq!(degenerate.position(0.7, 0.2), 0.0);
    }

    #[test]
    fn test_bar_empty_and_full() {
        let geometry = bar_geometry(Bounds::from_size(10.0, 1.0), 0.0);

        let empty = rasterize(&geometry, 0.0, &horizontal());
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].len(), 10);
        assert!(empty[0].iter().all(|c| *c == Cell::Groove));

        let full = rasterize(&geometry, 1.0, &horizontal());
        assert_eq!(count(&full, |c| matches!(c, Cell::Fill(_))), 10);
    }

    #[test]
    fn test_bar_fill_grows_with_stroke_end() {
        let geometry = bar_geometry(Bounds::from_size(40.0, 1.0), 0.0);
        let filled = |end: f64| {
            count(&rasterize(&geometry, end, &horizontal()), |c| {
                matches!(c, Cell::Fill(_))
            })
        };

        assert!(filled(0.25) < filled(0.5));
        assert!(filled(0.5) < filled(0.75));
        assert_eq!(filled(1.0), 40);
    }

    #[test]
    fn test_gradient_runs_left_to_right() {
        let geometry = bar_geometry(Bounds::from_size(10.0, 1.0), 0.0);
        let cells = rasterize(&geometry, 1.0, &horizontal());
        let Cell::Fill(first) = cells[0][0] else {
            panic!("first cell should be filled");
        };
        let Cell::Fill(last) = cells[0][9] else {
            panic!("last cell should be filled");
        };
        assert!(first < last);
        assert!((first - 0.05).abs() < 1e-9);
        assert!((last - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_ring_quarter_fill() {
        let bounds = Bounds::from_size(21.0, 21.0);
        let geometry = ring_geometry(bounds, 3.0, 3.0, -FRAC_PI_2, 1.5 * PI);
        let cells = rasterize(&geometry, 0.25, &horizontal());

        // Twelve o'clock is where the stroke starts.
        assert!(matches!(cells[1][10], Cell::Fill(_)));
        // Three o'clock is inside the first quarter.
        assert!(matches!(cells[10][19], Cell::Fill(_)));
        // Nine o'clock is only groove.
        assert_eq!(cells[10][1], Cell::Groove);
        // The centre is outside both strokes.
        assert_eq!(cells[10][10], Cell::Blank);
    }

    #[test]
    fn test_render_shape() {
        let geometry = bar_geometry(Bounds::from_size(12.0, 2.0), 0.0);
        let output = render(&geometry, 0.5, &horizontal(), "#8E8E93", Glyphs::default());
        let plain = lipgloss::strip_ansi(&output);
        let lines: Vec<&str> = plain.lines().collect();

        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert_eq!(line.chars().count(), 12);
        }
        assert!(plain.contains('█'));
        assert!(plain.contains('░'));
    }

    #[test]
    fn test_render_zero_size_is_empty() {
        let geometry = bar_geometry(Bounds::default(), 0.0);
        let output = render(&geometry, 1.0, &horizontal(), "#8E8E93", Glyphs::default());
        assert!(output.is_empty());
    }
}
