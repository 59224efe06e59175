use iced::Color;
use serde::{Deserialize, Serialize};

// ─── NAMED CHART PALETTES ───────────────────────────────────────

/// A named chart palette: a fixed ordered list of six base colors, cycled
/// to cover arbitrarily many data points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    Azure,
    Sunset,
    Tropical,
    Mono,
    Citrus,
}

impl Default for PaletteKind {
    fn default() -> Self {
        PaletteKind::Azure
    }
}

impl PaletteKind {
    pub const ALL: &[PaletteKind] = &[
        PaletteKind::Azure,
        PaletteKind::Sunset,
        PaletteKind::Tropical,
        PaletteKind::Mono,
        PaletteKind::Citrus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaletteKind::Azure => "Azure",
            PaletteKind::Sunset => "Sunset",
            PaletteKind::Tropical => "Tropical",
            PaletteKind::Mono => "Monochrome",
            PaletteKind::Citrus => "Citrus",
        }
    }

    /// Parse a stored key, falling back to the default palette for
    /// anything unrecognized.
    pub fn from_key(key: &str) -> PaletteKind {
        match key {
            "sunset" => PaletteKind::Sunset,
            "tropical" => PaletteKind::Tropical,
            "mono" => PaletteKind::Mono,
            "citrus" => PaletteKind::Citrus,
            _ => PaletteKind::Azure,
        }
    }

    /// The six base colors of this palette, in series order.
    pub fn colors(&self) -> &'static [&'static str; 6] {
        match self {
            PaletteKind::Azure => &[
                "#4c6ef5", "#339af0", "#5c7cfa", "#15aabf", "#82c91e", "#fcc419",
            ],
            PaletteKind::Sunset => &[
                "#f76707", "#f89222", "#ffa94d", "#ff6b6b", "#c92a2a", "#862e9c",
            ],
            PaletteKind::Tropical => &[
                "#12b886", "#0ca678", "#099268", "#51cf66", "#94d82d", "#ffd43b",
            ],
            PaletteKind::Mono => &[
                "#1f2937", "#4b5563", "#6b7280", "#9ca3af", "#d1d5db", "#f3f4f6",
            ],
            PaletteKind::Citrus => &[
                "#fab005", "#fd7e14", "#f76707", "#f08c00", "#ffd43b", "#94d82d",
            ],
        }
    }
}

/// Produce exactly `count` colors by cycling the base palette with
/// wraparound, so datasets larger than the base palette stay colored.
pub fn resolve_colors(palette: PaletteKind, count: usize) -> Vec<String> {
    let base = palette.colors();
    (0..count).map(|i| base[i % base.len()].to_string()).collect()
}

// ─── COLOR FORMAT CONVERSION ────────────────────────────────────

/// Convert a 3- or 6-digit hex color (leading `#` optional, any case) to
/// an `rgba(r, g, b, a)` string at the given alpha. Any other input length
/// is returned unchanged; that pass-through is deliberate leniency for
/// colors that are already in another form.
pub fn to_alpha(hex: &str, alpha: f32) -> String {
    let normalized = hex.trim_start_matches('#');
    let full: String = match normalized.len() {
        3 => normalized.chars().flat_map(|c| [c, c]).collect(),
        6 => normalized.to_string(),
        _ => return hex.to_string(),
    };
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&full[range], 16);
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Ok(r), Ok(g), Ok(b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
        _ => hex.to_string(),
    }
}

/// Parse a `#hex` or `rgba(…)` color string into an iced color. The chart
/// renderer uses this to consume the string-typed colors a `ChartSpec`
/// carries. Returns `None` for anything it does not recognize.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return None;
        }
        let r = parts[0].parse::<f32>().ok()?;
        let g = parts[1].parse::<f32>().ok()?;
        let b = parts[2].parse::<f32>().ok()?;
        let a = parts[3].parse::<f32>().ok()?;
        return Some(Color::from_rgba(r / 255.0, g / 255.0, b / 255.0, a));
    }
    let hex = s.strip_prefix('#')?;
    let full: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let r = u8::from_str_radix(&full[0..2], 16).ok()?;
    let g = u8::from_str_radix(&full[2..4], 16).ok()?;
    let b = u8::from_str_radix(&full[4..6], 16).ok()?;
    Some(Color::from_rgb(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_colors_cycles_with_wraparound() {
        let colors = resolve_colors(PaletteKind::Azure, 8);
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[6], colors[0]);
        assert_eq!(colors[7], colors[1]);
        assert_eq!(colors[0], "#4c6ef5");
    }

    #[test]
    fn test_resolve_colors_zero_count() {
        assert!(resolve_colors(PaletteKind::Mono, 0).is_empty());
    }

    #[test]
    fn test_to_alpha_shorthand_equals_full_form() {
        assert_eq!(to_alpha("#fff", 0.5), to_alpha("ffffff", 0.5));
        assert_eq!(to_alpha("#fff", 0.5), "rgba(255, 255, 255, 0.5)");
    }

    #[test]
    fn test_to_alpha_case_insensitive() {
        assert_eq!(to_alpha("#4C6EF5", 1.0), to_alpha("#4c6ef5", 1.0));
    }

    #[test]
    fn test_to_alpha_passes_through_other_lengths() {
        assert_eq!(to_alpha("rebeccapurple", 0.4), "rebeccapurple");
        assert_eq!(to_alpha("#12345", 0.4), "#12345");
    }

    #[test]
    fn test_from_key_falls_back_to_azure() {
        assert_eq!(PaletteKind::from_key("sunset"), PaletteKind::Sunset);
        assert_eq!(PaletteKind::from_key("vaporwave"), PaletteKind::Azure);
    }

    #[test]
    fn test_parse_color_round_trips_to_alpha() {
        let rgba = to_alpha("#4c6ef5", 0.85);
        let c = parse_color(&rgba).unwrap();
        assert!((c.a - 0.85).abs() < 0.001);
        assert_eq!(parse_color("#4c6ef5").map(|c| (c.r * 255.0).round() as u8), Some(0x4c));
        assert!(parse_color("not a color").is_none());
    }
}
