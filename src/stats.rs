use crate::model::DataPoint;

/// Aggregate figures for the active dataset's summary panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
}

impl Summary {
    /// The five display rows, pre-formatted with [`format_value`].
    pub fn rows(&self) -> [(&'static str, String); 5] {
        [
            ("Points", self.count.to_string()),
            ("Total", format_value(self.total)),
            ("Average", format_value(self.average)),
            ("Minimum", format_value(self.minimum)),
            ("Maximum", format_value(self.maximum)),
        ]
    }
}

/// Summarize a point sequence. Returns `None` when there is nothing to
/// aggregate (empty, or no finite value survives), so the caller can hide
/// the summary panel.
pub fn summarize(points: &[DataPoint]) -> Option<Summary> {
    let values: Vec<f64> = points
        .iter()
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let total: f64 = values.iter().sum();
    let minimum = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let maximum = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    Some(Summary {
        count,
        total,
        average: total / count as f64,
        minimum,
        maximum,
    })
}

/// Single display rule for every numeric figure: integers render without
/// decimals, everything else to at most two fractional digits with
/// trailing zeros stripped. Non-finite input renders empty.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, value: f64) -> DataPoint {
        DataPoint {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn test_summarize_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summarize_no_finite_values_is_none() {
        assert!(summarize(&[point("a", f64::NAN), point("b", f64::INFINITY)]).is_none());
    }

    #[test]
    fn test_summarize_basic_figures() {
        let s = summarize(&[point("a", 2.0), point("b", 4.0)]).unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.total, 6.0);
        assert_eq!(s.average, 3.0);
        assert_eq!(s.minimum, 2.0);
        assert_eq!(s.maximum, 4.0);
    }

    #[test]
    fn test_summarize_skips_non_finite() {
        let s = summarize(&[point("a", 1.0), point("b", f64::NAN), point("c", 5.0)]).unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.total, 6.0);
    }

    #[test]
    fn test_format_value_integers_have_no_decimals() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(-12.0), "-12");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn test_format_value_strips_trailing_zeros() {
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(2.50), "2.5");
        assert_eq!(format_value(1.0 / 3.0), "0.33");
        assert_eq!(format_value(f64::NAN), "");
    }
}
