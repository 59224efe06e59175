use iced::mouse;
use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};
use std::f32::consts::{PI, TAU};

use crate::chartspec::{ChartSpec, ScaleConfig, SeriesStyle};
use crate::palette::parse_color;
use crate::stats::format_value;

/// Colors the chart surface needs from the UI palette (everything
/// series-related comes from the spec itself).
#[derive(Debug, Clone, Copy)]
pub struct ChartColors {
    pub bg: Color,
    pub border: Color,
    pub grid: Color,
    pub label: Color,
    pub text: Color,
}

/// Draws a `ChartSpec` onto an iced Canvas. Pixel output only; the spec
/// is derived fresh by the caller on every state change.
#[derive(Debug, Clone)]
pub struct DatasetChart {
    pub spec: ChartSpec,
    pub colors: ChartColors,
}

const PAD_LEFT: f32 = 44.0;
const PAD_RIGHT: f32 = 10.0;
const PAD_TOP: f32 = 24.0;
const PAD_BOTTOM: f32 = 20.0;

impl DatasetChart {
    fn color_of(&self, s: &str) -> Color {
        parse_color(s).unwrap_or(self.colors.text)
    }

    fn draw_legend(&self, frame: &mut Frame, bounds: Rectangle) {
        let entries: Vec<(String, Color)> = match &self.spec.style {
            SeriesStyle::Slices { fills, .. } => self
                .spec
                .labels
                .iter()
                .zip(fills.iter())
                .map(|(label, fill)| (label.clone(), self.color_of(fill)))
                .collect(),
            SeriesStyle::Bar { borders, .. } => {
                let first = borders.first().map(|c| self.color_of(c));
                vec![(
                    self.spec.series_label.clone(),
                    first.unwrap_or(self.colors.text),
                )]
            }
            SeriesStyle::Line { stroke, .. } | SeriesStyle::Radar { stroke, .. } => {
                vec![(self.spec.series_label.clone(), self.color_of(stroke))]
            }
        };

        let mut lx = bounds.width - 10.0;
        let ly = 7.0;
        for (label, color) in entries.iter().rev().take(6) {
            let text_w = label.chars().count() as f32 * 6.0 + 16.0;
            lx -= text_w;
            if lx < PAD_LEFT {
                break;
            }
            let dot = Path::circle(Point::new(lx, ly + 3.0), 3.0);
            frame.fill(&dot, *color);
            let mut lt = Text::from(label.clone());
            lt.position = Point::new(lx + 8.0, ly - 2.0);
            lt.color = self.colors.label;
            lt.size = 10.0.into();
            frame.fill_text(lt);
        }
    }

    fn draw_cartesian(&self, frame: &mut Frame, bounds: Rectangle, grid_x: bool, grid_y: bool) {
        let c = &self.colors;
        let chart_w = bounds.width - PAD_LEFT - PAD_RIGHT;
        let chart_h = bounds.height - PAD_TOP - PAD_BOTTOM;
        if chart_w <= 0.0 || chart_h <= 0.0 {
            return;
        }

        let values = &self.spec.values;
        let n = values.len();
        // The y floor is pinned at zero; negative values extend the range.
        let y_min = values.iter().cloned().fold(0.0_f64, f64::min) as f32;
        let y_max = values.iter().cloned().fold(0.0_f64, f64::max).max(1.0) as f32;
        let y_range = (y_max - y_min).max(f32::EPSILON);

        let y_of = |v: f32| PAD_TOP + chart_h * (1.0 - (v - y_min) / y_range);
        // Category slots, one per point, bar-style centering.
        let x_of = |i: usize| PAD_LEFT + chart_w * (i as f32 + 0.5) / n as f32;

        // Horizontal gridlines + y labels at nice tick values.
        let step = nice_tick_step(y_range, 8);
        let mut val = (y_min / step).ceil() * step;
        while val <= y_max + step * 0.001 {
            let y = y_of(val);
            if grid_y {
                let grid = Path::line(Point::new(PAD_LEFT, y), Point::new(PAD_LEFT + chart_w, y));
                frame.stroke(&grid, Stroke::default().with_color(c.grid).with_width(1.0));
            }
            let mut label = Text::from(format_value(val as f64));
            label.position = Point::new(4.0, y - 5.0);
            label.color = c.label;
            label.size = 10.0.into();
            frame.fill_text(label);
            val += step;
        }

        // Vertical gridlines per category.
        if grid_x {
            for i in 0..n {
                let x = x_of(i);
                let grid = Path::line(Point::new(x, PAD_TOP), Point::new(x, PAD_TOP + chart_h));
                frame.stroke(&grid, Stroke::default().with_color(c.grid).with_width(1.0));
            }
        }

        // Category labels, thinned when the axis gets crowded.
        let label_every = (n / 10).max(1);
        for (i, label) in self.spec.labels.iter().enumerate() {
            if i % label_every != 0 {
                continue;
            }
            let mut lt = Text::from(truncate(label, 10));
            lt.position = Point::new(x_of(i), PAD_TOP + chart_h + 4.0);
            lt.color = c.label;
            lt.size = 10.0.into();
            lt.horizontal_alignment = iced::alignment::Horizontal::Center;
            frame.fill_text(lt);
        }

        let baseline = y_of(0.0);
        match &self.spec.style {
            SeriesStyle::Bar { fills, borders, .. } => {
                let slot = chart_w / n as f32;
                let bar_w = (slot * 0.6).max(2.0);
                for (i, &v) in values.iter().enumerate() {
                    let x = x_of(i) - bar_w / 2.0;
                    let top = y_of(v as f32);
                    let (y, h) = if top <= baseline {
                        (top, baseline - top)
                    } else {
                        (baseline, top - baseline)
                    };
                    let rect = Path::rectangle(Point::new(x, y), Size::new(bar_w, h.max(1.0)));
                    frame.fill(&rect, self.color_of(&fills[i]));
                    frame.stroke(
                        &rect,
                        Stroke::default()
                            .with_color(self.color_of(&borders[i]))
                            .with_width(1.0),
                    );
                }
            }
            SeriesStyle::Line {
                stroke,
                fill,
                tension,
                fill_area,
            } => {
                let pts: Vec<Point> = values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| Point::new(x_of(i), y_of(v as f32)))
                    .collect();

                if *fill_area && pts.len() >= 2 {
                    let mut builder = canvas::path::Builder::new();
                    builder.move_to(Point::new(pts[0].x, baseline));
                    builder.line_to(pts[0]);
                    trace_polyline(&mut builder, &pts, *tension);
                    builder.line_to(Point::new(pts[pts.len() - 1].x, baseline));
                    builder.close();
                    frame.fill(&builder.build(), self.color_of(fill));
                }

                let stroke_color = self.color_of(stroke);
                if pts.len() >= 2 {
                    let mut builder = canvas::path::Builder::new();
                    builder.move_to(pts[0]);
                    trace_polyline(&mut builder, &pts, *tension);
                    frame.stroke(
                        &builder.build(),
                        Stroke::default().with_color(stroke_color).with_width(1.8),
                    );
                }
                // Point markers in the stroke color.
                for p in &pts {
                    let dot = Path::circle(*p, 3.0);
                    frame.fill(&dot, stroke_color);
                }
            }
            _ => {}
        }
    }

    fn draw_radar(&self, frame: &mut Frame, bounds: Rectangle, grid: bool) {
        let c = &self.colors;
        let values = &self.spec.values;
        let n = values.len();
        if n == 0 {
            return;
        }

        let cx = bounds.width / 2.0;
        let cy = PAD_TOP + (bounds.height - PAD_TOP - PAD_BOTTOM) / 2.0;
        let radius = ((bounds.width.min(bounds.height) / 2.0) - 34.0).max(20.0);
        // Zero floor: spokes scale from the center to the largest value.
        let max = values.iter().cloned().fold(0.0_f64, f64::max).max(1.0) as f32;

        let angle_of = |i: usize| -PI / 2.0 + TAU * i as f32 / n as f32;
        let point_at = |i: usize, r: f32| {
            let a = angle_of(i);
            Point::new(cx + r * a.cos(), cy + r * a.sin())
        };

        if grid {
            // Concentric rings plus one spoke per axis.
            for ring in 1..=4 {
                let r = radius * ring as f32 / 4.0;
                let mut builder = canvas::path::Builder::new();
                for i in 0..=n {
                    let p = point_at(i % n, r);
                    if i == 0 {
                        builder.move_to(p);
                    } else {
                        builder.line_to(p);
                    }
                }
                frame.stroke(
                    &builder.build(),
                    Stroke::default().with_color(c.grid).with_width(1.0),
                );
            }
            for i in 0..n {
                let spoke = Path::line(Point::new(cx, cy), point_at(i, radius));
                frame.stroke(&spoke, Stroke::default().with_color(c.grid).with_width(1.0));
            }
        }

        // Axis labels around the rim.
        for (i, label) in self.spec.labels.iter().enumerate() {
            let mut lt = Text::from(truncate(label, 8));
            lt.position = point_at(i, radius + 12.0);
            lt.color = c.label;
            lt.size = 10.0.into();
            lt.horizontal_alignment = iced::alignment::Horizontal::Center;
            lt.vertical_alignment = iced::alignment::Vertical::Center;
            frame.fill_text(lt);
        }

        if let SeriesStyle::Radar {
            stroke,
            fill,
            fill_area,
        } = &self.spec.style
        {
            let mut builder = canvas::path::Builder::new();
            for (i, &v) in values.iter().enumerate() {
                let r = radius * (v.max(0.0) as f32 / max);
                let p = point_at(i, r);
                if i == 0 {
                    builder.move_to(p);
                } else {
                    builder.line_to(p);
                }
            }
            builder.close();
            let path = builder.build();
            if *fill_area {
                frame.fill(&path, self.color_of(fill));
            }
            let stroke_color = self.color_of(stroke);
            frame.stroke(
                &path,
                Stroke::default().with_color(stroke_color).with_width(1.8),
            );
            for (i, &v) in values.iter().enumerate() {
                let r = radius * (v.max(0.0) as f32 / max);
                let dot = Path::circle(point_at(i, r), 3.0);
                frame.fill(&dot, stroke_color);
            }
        }
    }

    fn draw_slices(&self, frame: &mut Frame, bounds: Rectangle, doughnut: bool) {
        let values = &self.spec.values;
        let total: f64 = values.iter().map(|v| v.abs()).sum();
        if total <= 0.0 {
            return;
        }

        let cx = bounds.width / 2.0;
        let cy = PAD_TOP + (bounds.height - PAD_TOP - PAD_BOTTOM) / 2.0;
        let radius = ((bounds.width.min(bounds.height) / 2.0) - 30.0).max(20.0);
        let inner = if doughnut { radius * 0.55 } else { 0.0 };

        let (fills, border) = match &self.spec.style {
            SeriesStyle::Slices { fills, border } => (fills, self.color_of(border)),
            _ => return,
        };

        let mut start = -PI / 2.0;
        for (i, &v) in values.iter().enumerate() {
            let sweep = TAU * (v.abs() / total) as f32;
            let path = sector_path(cx, cy, inner, radius, start, sweep);
            frame.fill(&path, self.color_of(&fills[i]));
            frame.stroke(&path, Stroke::default().with_color(border).with_width(2.0));
            start += sweep;
        }
    }
}

impl<Message: 'static> canvas::Program<Message> for DatasetChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let c = &self.colors;

        let bg = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.fill(&bg, c.bg);
        let border = Path::rectangle(
            Point::new(0.5, 0.5),
            Size::new(bounds.width - 1.0, bounds.height - 1.0),
        );
        frame.stroke(&border, Stroke::default().with_color(c.border).with_width(0.5));

        match self.spec.scales {
            ScaleConfig::Cartesian { grid_x, grid_y } => {
                self.draw_cartesian(&mut frame, bounds, grid_x, grid_y)
            }
            ScaleConfig::Radial { grid } => self.draw_radar(&mut frame, bounds, grid),
            ScaleConfig::None => {
                let doughnut = matches!(self.spec.chart_type, crate::model::ChartType::Doughnut);
                self.draw_slices(&mut frame, bounds, doughnut)
            }
        }

        if self.spec.show_legend {
            self.draw_legend(&mut frame, bounds);
        }

        vec![frame.into_geometry()]
    }
}

/// Trace the rest of a polyline whose first point was already moved to.
/// A positive tension draws gentle quadratic curves through segment
/// midpoints instead of straight segments.
fn trace_polyline(builder: &mut canvas::path::Builder, pts: &[Point], tension: f32) {
    if tension <= 0.0 || pts.len() < 3 {
        for p in &pts[1..] {
            builder.line_to(*p);
        }
        return;
    }
    for i in 1..pts.len() - 1 {
        let mid = Point::new(
            (pts[i].x + pts[i + 1].x) / 2.0,
            (pts[i].y + pts[i + 1].y) / 2.0,
        );
        builder.quadratic_curve_to(pts[i], mid);
    }
    builder.line_to(pts[pts.len() - 1]);
}

/// Build a (possibly annular) sector by approximating both arcs with
/// line segments, same technique as a stroked thick arc.
fn sector_path(cx: f32, cy: f32, inner: f32, outer: f32, start: f32, sweep: f32) -> Path {
    let segments = ((sweep.abs() / PI * 60.0) as usize).max(2);
    let step = sweep / segments as f32;
    let mut builder = canvas::path::Builder::new();
    for i in 0..=segments {
        let a = start + step * i as f32;
        let p = Point::new(cx + outer * a.cos(), cy + outer * a.sin());
        if i == 0 {
            builder.move_to(p);
        } else {
            builder.line_to(p);
        }
    }
    if inner > 0.0 {
        for i in (0..=segments).rev() {
            let a = start + step * i as f32;
            builder.line_to(Point::new(cx + inner * a.cos(), cy + inner * a.sin()));
        }
    } else {
        builder.line_to(Point::new(cx, cy));
    }
    builder.close();
    builder.build()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}\u{2026}")
    }
}

/// Pick a "nice" tick step (1, 2, 5, 10, 20, 50, …) so that the range is
/// divided into at most `max_ticks` intervals.
fn nice_tick_step(range: f32, max_ticks: usize) -> f32 {
    let rough = range / max_ticks as f32;
    let mag = 10f32.powf(rough.log10().floor());
    let norm = rough / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    (nice * mag).max(f32::EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_tick_step_rounds_up() {
        assert_eq!(nice_tick_step(100.0, 10), 10.0);
        assert_eq!(nice_tick_step(7.0, 10), 1.0);
        assert!(nice_tick_step(0.35, 10) > 0.0);
    }

    #[test]
    fn test_truncate_keeps_short_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer label", 8), "a much \u{2026}");
    }
}
