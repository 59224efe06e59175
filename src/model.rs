use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::palette::PaletteKind;

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

/// A freeform note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub body: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

/// One labeled numeric point of a dataset. Replaced wholesale on edit;
/// after normalization the label is trimmed and non-empty and the value
/// is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

// ─── CHART TYPES ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Doughnut,
    Radar,
}

impl ChartType {
    pub const ALL: &[ChartType] = &[
        ChartType::Bar,
        ChartType::Line,
        ChartType::Pie,
        ChartType::Doughnut,
        ChartType::Radar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar chart",
            ChartType::Line => "Line chart",
            ChartType::Pie => "Pie chart",
            ChartType::Doughnut => "Doughnut chart",
            ChartType::Radar => "Radar chart",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::Radar => "radar",
        }
    }

    /// Parse a stored key, falling back to `Bar` for anything unrecognized.
    pub fn from_key(key: &str) -> ChartType {
        match key {
            "line" => ChartType::Line,
            "pie" => ChartType::Pie,
            "doughnut" => ChartType::Doughnut,
            "radar" => ChartType::Radar,
            _ => ChartType::Bar,
        }
    }
}

// ─── DATASET ────────────────────────────────────────────────────

pub const DEFAULT_DATASET_NAME: &str = "Untitled dataset";

/// A named, user-owned collection of labeled numeric points plus its
/// display preferences. Identity is `id`; order of `points` is series order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub chart_type: ChartType,
    pub palette: PaletteKind,
    pub points: Vec<DataPoint>,
    pub created_at: i64,
}

impl Dataset {
    pub fn new(name: String, chart_type: ChartType) -> Self {
        Self {
            id: generate_id(),
            name,
            chart_type,
            palette: PaletteKind::default(),
            points: Vec::new(),
            created_at: now_millis(),
        }
    }

    /// A copy with a fresh identity, named "<name> copy".
    pub fn duplicate(&self) -> Self {
        Self {
            id: generate_id(),
            name: format!("{} copy", self.name),
            created_at: now_millis(),
            ..self.clone()
        }
    }

    /// One-line description shown under the dataset title.
    pub fn meta_line(&self) -> String {
        let type_label = self.chart_type.name();
        let palette_label = self.palette.name();
        match self.points.len() {
            0 => format!("No data points yet • {type_label} • {palette_label}"),
            1 => format!("1 data point • {type_label} • {palette_label}"),
            n => format!("{n} data points • {type_label} • {palette_label}"),
        }
    }
}

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ─── DISPLAY OPTIONS ────────────────────────────────────────────

/// Global chart display toggles, applied to whichever dataset is active.
/// Every field carries `serde(default)` so state written by an older
/// version merges over the defaults on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(rename = "showLegend", default = "default_true")]
    pub show_legend: bool,
    #[serde(rename = "showGridX", default = "default_true")]
    pub show_grid_x: bool,
    #[serde(rename = "showGridY", default = "default_true")]
    pub show_grid_y: bool,
    #[serde(rename = "smoothLines", default = "default_true")]
    pub smooth_lines: bool,
    #[serde(rename = "fillArea", default)]
    pub fill_area: bool,
    #[serde(rename = "stackedBars", default)]
    pub stacked_bars: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_grid_x: true,
            show_grid_y: true,
            smooth_lines: true,
            fill_area: false,
            stacked_bars: false,
        }
    }
}

// ─── APP STATE ──────────────────────────────────────────────────

/// The whole persisted application state. Owned by the UI layer and passed
/// explicitly to the transformation functions; never global.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub datasets: Vec<Dataset>,
    pub active_dataset: Option<String>,
    pub options: DisplayOptions,
}

impl AppState {
    pub fn active_dataset(&self) -> Option<&Dataset> {
        let id = self.active_dataset.as_deref()?;
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn active_dataset_mut(&mut self) -> Option<&mut Dataset> {
        let id = self.active_dataset.clone()?;
        self.datasets.iter_mut().find(|d| d.id == id)
    }

    /// Insert a dataset at the front of the list and make it active.
    pub fn insert_dataset(&mut self, dataset: Dataset) {
        self.active_dataset = Some(dataset.id.clone());
        self.datasets.insert(0, dataset);
    }

    /// Remove a dataset by id. The active id is reassigned to the first
    /// remaining dataset, or cleared when the list becomes empty.
    pub fn remove_dataset(&mut self, id: &str) {
        self.datasets.retain(|d| d.id != id);
        if self.active_dataset.as_deref() == Some(id) {
            self.active_dataset = self.datasets.first().map(|d| d.id.clone());
        }
    }

    /// Validate the active id against the dataset list: an id that matches
    /// no dataset is replaced with the first dataset's id, or cleared.
    pub fn ensure_active(&mut self) {
        let valid = self
            .active_dataset
            .as_deref()
            .is_some_and(|id| self.datasets.iter().any(|d| d.id == id));
        if !valid {
            self.active_dataset = self.datasets.first().map(|d| d.id.clone());
        }
    }
}

// ─── VALIDATION & NORMALIZATION ─────────────────────────────────

/// Coerce a JSON value to a finite number the way a lenient form field
/// would: numbers pass through, numeric strings parse.
fn coerce_finite(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Sanitize one raw point. Requires a string `label` that is non-empty
/// after trimming and a `value` coercible to a finite number.
pub fn normalize_point(raw: &Value) -> Option<DataPoint> {
    let label = raw.get("label")?.as_str()?.trim();
    if label.is_empty() {
        return None;
    }
    let value = coerce_finite(raw.get("value")?)?;
    Some(DataPoint {
        label: label.to_string(),
        value,
    })
}

/// Sanitize a raw dataset record (stored, imported, or freshly created).
/// Invalid points are dropped silently; an empty point list is still a
/// valid dataset. Idempotent: a normalized dataset passes through with
/// identical field values and its id preserved.
pub fn normalize_dataset(raw: &Value) -> Option<Dataset> {
    let obj = raw.as_object()?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(generate_id);

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DATASET_NAME)
        .to_string();

    let chart_type = obj
        .get("chartType")
        .and_then(Value::as_str)
        .map(ChartType::from_key)
        .unwrap_or(ChartType::Bar);

    let palette = obj
        .get("palette")
        .and_then(Value::as_str)
        .map(PaletteKind::from_key)
        .unwrap_or_default();

    let points = obj
        .get("points")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(normalize_point).collect())
        .unwrap_or_default();

    let created_at = obj
        .get("createdAt")
        .and_then(Value::as_i64)
        .unwrap_or_else(now_millis);

    Some(Dataset {
        id,
        name,
        chart_type,
        palette,
        points,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_point_valid() {
        let p = normalize_point(&json!({"label": "  March ", "value": 42.5})).unwrap();
        assert_eq!(p.label, "March");
        assert_eq!(p.value, 42.5);
    }

    #[test]
    fn test_normalize_point_numeric_string() {
        let p = normalize_point(&json!({"label": "a", "value": "3.5"})).unwrap();
        assert_eq!(p.value, 3.5);
    }

    #[test]
    fn test_normalize_point_rejects_bad_input() {
        assert!(normalize_point(&json!({"label": "   ", "value": 1})).is_none());
        assert!(normalize_point(&json!({"label": 5, "value": 1})).is_none());
        assert!(normalize_point(&json!({"value": 1})).is_none());
        assert!(normalize_point(&json!({"label": "a"})).is_none());
        assert!(normalize_point(&json!({"label": "a", "value": "nope"})).is_none());
        assert!(normalize_point(&json!({"label": "a", "value": null})).is_none());
    }

    #[test]
    fn test_normalize_dataset_defaults() {
        let d = normalize_dataset(&json!({
            "name": "   ",
            "chartType": "hologram",
            "palette": "neon",
            "points": [
                {"label": "ok", "value": 1},
                {"label": "", "value": 2},
                {"label": "bad", "value": "x"}
            ]
        }))
        .unwrap();
        assert!(!d.id.is_empty());
        assert_eq!(d.name, DEFAULT_DATASET_NAME);
        assert_eq!(d.chart_type, ChartType::Bar);
        assert_eq!(d.palette, PaletteKind::Azure);
        assert_eq!(d.points.len(), 1);
        assert_eq!(d.points[0].label, "ok");
    }

    #[test]
    fn test_normalize_dataset_rejects_non_objects() {
        assert!(normalize_dataset(&json!(null)).is_none());
        assert!(normalize_dataset(&json!([1, 2])).is_none());
        assert!(normalize_dataset(&json!("dataset")).is_none());
    }

    #[test]
    fn test_normalize_dataset_idempotent() {
        let raw = json!({
            "id": "fixed-id",
            "name": " Sales ",
            "chartType": "radar",
            "palette": "sunset",
            "points": [{"label": "q1", "value": 7}],
            "createdAt": 1700000000000_i64
        });
        let once = normalize_dataset(&raw).unwrap();
        let twice = normalize_dataset(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.id, "fixed-id");
        assert_eq!(once.chart_type, ChartType::Radar);
    }

    #[test]
    fn test_remove_dataset_reassigns_active() {
        let mut state = AppState::default();
        let a = Dataset::new("a".into(), ChartType::Bar);
        let b = Dataset::new("b".into(), ChartType::Line);
        let (id_a, id_b) = (a.id.clone(), b.id.clone());
        state.datasets = vec![a, b];
        state.active_dataset = Some(id_a.clone());

        state.remove_dataset(&id_a);
        assert_eq!(state.active_dataset.as_deref(), Some(id_b.as_str()));

        state.remove_dataset(&id_b);
        assert_eq!(state.active_dataset, None);
    }

    #[test]
    fn test_ensure_active_clears_dangling_id() {
        let mut state = AppState::default();
        let d = Dataset::new("only".into(), ChartType::Pie);
        let id = d.id.clone();
        state.datasets = vec![d];
        state.active_dataset = Some("gone".into());
        state.ensure_active();
        assert_eq!(state.active_dataset.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_duplicate_gets_fresh_identity() {
        let d = Dataset::new("Budget".into(), ChartType::Doughnut);
        let copy = d.duplicate();
        assert_ne!(copy.id, d.id);
        assert_eq!(copy.name, "Budget copy");
        assert_eq!(copy.chart_type, ChartType::Doughnut);
    }

    #[test]
    fn test_chart_type_from_key_falls_back() {
        assert_eq!(ChartType::from_key("line"), ChartType::Line);
        assert_eq!(ChartType::from_key("sparkline"), ChartType::Bar);
    }
}
