use crate::model::{ChartType, Dataset, DisplayOptions};
use crate::palette::{resolve_colors, to_alpha};

const SLICE_BORDER: &str = "#ffffff";
const FILL_ALPHA_ON: f32 = 0.35;
const FILL_ALPHA_OFF: f32 = 0.12;
const BAR_FILL_ALPHA: f32 = 0.85;
const LINE_TENSION: f32 = 0.35;

/// Renderer-agnostic description of how to draw a dataset. Derived fresh
/// from `(Dataset, DisplayOptions)` on every render, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub series_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub show_legend: bool,
    pub style: SeriesStyle,
    pub scales: ScaleConfig,
}

/// Visual-encoding rule per chart shape. Colors are plain strings
/// (`#hex` or `rgba(…)`) so the spec stays independent of any renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesStyle {
    /// Single-color stroke and markers; fill only applied when requested.
    Line {
        stroke: String,
        fill: String,
        tension: f32,
        fill_area: bool,
    },
    /// Same single-color rule as line, without a smoothing parameter.
    Radar {
        stroke: String,
        fill: String,
        fill_area: bool,
    },
    /// Each category gets its own translucent fill and opaque border.
    Bar {
        fills: Vec<String>,
        borders: Vec<String>,
        stacked: bool,
    },
    /// Each slice fully opaque, with a fixed contrasting outline.
    Slices { fills: Vec<String>, border: String },
}

/// Axis configuration keyed by chart-shape class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleConfig {
    /// x/y pair with independent grid toggles; the y floor is pinned at zero.
    Cartesian { grid_x: bool, grid_y: bool },
    /// Single radial scale, zero floor, grid tied to the y-grid toggle.
    Radial { grid: bool },
    /// Slice-based charts carry no scales.
    None,
}

/// Build the chart specification for a dataset under the global display
/// options. Returns `None` for an empty point list so the caller can show
/// a placeholder instead of rendering. Pure: identical inputs always
/// produce an identical spec.
pub fn build_chart_spec(dataset: &Dataset, options: &DisplayOptions) -> Option<ChartSpec> {
    if dataset.points.is_empty() {
        return None;
    }

    let labels: Vec<String> = dataset.points.iter().map(|p| p.label.clone()).collect();
    let values: Vec<f64> = dataset.points.iter().map(|p| p.value).collect();
    let colors = resolve_colors(dataset.palette, dataset.points.len());
    let primary = colors[0].clone();
    let fill_alpha = if options.fill_area {
        FILL_ALPHA_ON
    } else {
        FILL_ALPHA_OFF
    };

    let style = match dataset.chart_type {
        ChartType::Line => SeriesStyle::Line {
            fill: to_alpha(&primary, fill_alpha),
            stroke: primary,
            tension: if options.smooth_lines { LINE_TENSION } else { 0.0 },
            fill_area: options.fill_area,
        },
        ChartType::Radar => SeriesStyle::Radar {
            fill: to_alpha(&primary, fill_alpha),
            stroke: primary,
            fill_area: options.fill_area,
        },
        ChartType::Bar => SeriesStyle::Bar {
            fills: colors.iter().map(|c| to_alpha(c, BAR_FILL_ALPHA)).collect(),
            borders: colors,
            stacked: options.stacked_bars,
        },
        ChartType::Pie | ChartType::Doughnut => SeriesStyle::Slices {
            fills: colors,
            border: SLICE_BORDER.to_string(),
        },
    };

    let scales = match dataset.chart_type {
        ChartType::Bar | ChartType::Line => ScaleConfig::Cartesian {
            grid_x: options.show_grid_x,
            grid_y: options.show_grid_y,
        },
        ChartType::Radar => ScaleConfig::Radial {
            grid: options.show_grid_y,
        },
        ChartType::Pie | ChartType::Doughnut => ScaleConfig::None,
    };

    Some(ChartSpec {
        chart_type: dataset.chart_type,
        series_label: dataset.name.clone(),
        labels,
        values,
        show_legend: options.show_legend,
        style,
        scales,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataPoint;
    use crate::palette::PaletteKind;

    fn dataset(chart_type: ChartType, n: usize) -> Dataset {
        let mut d = Dataset::new("Demo".into(), chart_type);
        d.points = (0..n)
            .map(|i| DataPoint {
                label: format!("p{i}"),
                value: i as f64,
            })
            .collect();
        d
    }

    #[test]
    fn test_empty_dataset_yields_no_spec() {
        let options = DisplayOptions::default();
        for &ct in ChartType::ALL {
            assert!(build_chart_spec(&dataset(ct, 0), &options).is_none());
        }
    }

    #[test]
    fn test_line_fill_alpha_follows_fill_area() {
        let d = dataset(ChartType::Line, 3);
        let mut options = DisplayOptions::default();

        options.fill_area = false;
        let spec = build_chart_spec(&d, &options).unwrap();
        match spec.style {
            SeriesStyle::Line { ref fill, tension, fill_area, .. } => {
                assert_eq!(fill, &to_alpha("#4c6ef5", 0.12));
                assert_eq!(tension, 0.35);
                assert!(!fill_area);
            }
            _ => panic!("expected line style"),
        }

        options.fill_area = true;
        options.smooth_lines = false;
        let spec = build_chart_spec(&d, &options).unwrap();
        match spec.style {
            SeriesStyle::Line { ref fill, tension, fill_area, .. } => {
                assert_eq!(fill, &to_alpha("#4c6ef5", 0.35));
                assert_eq!(tension, 0.0);
                assert!(fill_area);
            }
            _ => panic!("expected line style"),
        }
    }

    #[test]
    fn test_bar_styles_each_category() {
        let mut options = DisplayOptions::default();
        options.stacked_bars = true;
        let spec = build_chart_spec(&dataset(ChartType::Bar, 8), &options).unwrap();
        match spec.style {
            SeriesStyle::Bar { fills, borders, stacked } => {
                assert_eq!(fills.len(), 8);
                assert_eq!(borders.len(), 8);
                // Wraparound past the 6-color base palette.
                assert_eq!(borders[6], borders[0]);
                assert_eq!(fills[0], to_alpha("#4c6ef5", 0.85));
                assert!(stacked);
            }
            _ => panic!("expected bar style"),
        }
        assert_eq!(
            spec.scales,
            ScaleConfig::Cartesian { grid_x: true, grid_y: true }
        );
    }

    #[test]
    fn test_slices_are_opaque_with_white_border() {
        let options = DisplayOptions::default();
        let spec = build_chart_spec(&dataset(ChartType::Doughnut, 4), &options).unwrap();
        match spec.style {
            SeriesStyle::Slices { fills, border } => {
                assert_eq!(fills, vec!["#4c6ef5", "#339af0", "#5c7cfa", "#15aabf"]);
                assert_eq!(border, "#ffffff");
            }
            _ => panic!("expected slices style"),
        }
        assert_eq!(spec.scales, ScaleConfig::None);
    }

    #[test]
    fn test_radar_scale_tied_to_y_grid_toggle() {
        let mut options = DisplayOptions::default();
        options.show_grid_y = false;
        let spec = build_chart_spec(&dataset(ChartType::Radar, 5), &options).unwrap();
        assert_eq!(spec.scales, ScaleConfig::Radial { grid: false });
        assert!(matches!(spec.style, SeriesStyle::Radar { .. }));
    }

    #[test]
    fn test_spec_is_pure() {
        let mut d = dataset(ChartType::Line, 4);
        d.palette = PaletteKind::Citrus;
        let options = DisplayOptions::default();
        assert_eq!(
            build_chart_spec(&d, &options),
            build_chart_spec(&d, &options)
        );
    }

    #[test]
    fn test_labels_and_values_stay_parallel() {
        let spec =
            build_chart_spec(&dataset(ChartType::Bar, 3), &DisplayOptions::default()).unwrap();
        assert_eq!(spec.labels, vec!["p0", "p1", "p2"]);
        assert_eq!(spec.values, vec![0.0, 1.0, 2.0]);
    }
}
