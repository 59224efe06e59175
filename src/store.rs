use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde_json::Value;

use crate::model::{normalize_dataset, AppState, Dataset, DisplayOptions, Note, Task};

pub const KEY_TASKS: &str = "tasks";
pub const KEY_NOTES: &str = "notes";
pub const KEY_DATASETS: &str = "datasets";
pub const KEY_ACTIVE: &str = "active-dataset";
pub const KEY_OPTIONS: &str = "chart-options";

// ─── STORAGE BACKEND ────────────────────────────────────────────

/// Flat key-value store. The persistence codec is the only code that
/// talks to it.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// File-backed store: one file per key under the config directory
/// (Windows → AppData/Local/Dayboard/, Linux → ~/.config/Dayboard/).
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open() -> Self {
        let dir = dirs::config_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Dayboard");
        Self { dir }
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.dir.join(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(key), value)
    }
}

/// In-memory backend for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    entries: std::collections::BTreeMap<String, String>,
}

#[cfg(test)]
impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─── PERSISTENCE CODEC ──────────────────────────────────────────

/// Encode the full state as its five independent key→string entries.
/// An absent active id is encoded as the empty string.
pub fn encode_state(state: &AppState) -> Vec<(&'static str, String)> {
    vec![
        (KEY_TASKS, json_or_empty_list(&state.tasks)),
        (KEY_NOTES, json_or_empty_list(&state.notes)),
        (KEY_DATASETS, json_or_empty_list(&state.datasets)),
        (KEY_ACTIVE, state.active_dataset.clone().unwrap_or_default()),
        (
            KEY_OPTIONS,
            serde_json::to_string(&state.options).unwrap_or_else(|e| {
                warn!("unable to encode chart options: {e}");
                String::from("{}")
            }),
        ),
    ]
}

fn json_or_empty_list<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!("unable to encode collection: {e}");
        String::from("[]")
    })
}

/// Write the whole state through to the backend. A failed write is logged
/// and reported via the return value; the in-memory state stays intact
/// either way, so the caller can surface the partial failure and the user
/// only loses durability, not data.
pub fn save_state(store: &mut dyn Storage, state: &AppState) -> bool {
    let mut ok = true;
    for (key, value) in encode_state(state) {
        if let Err(e) = store.set(key, &value) {
            warn!("unable to save `{key}`: {e}");
            ok = false;
        }
    }
    ok
}

/// Load state from the backend, defaulting defensively per field: a key
/// that is missing, unparseable, or type-mismatched falls back to that
/// field's empty/default value without disturbing the other fields.
/// Stored datasets are re-normalized with silent drops, and the active id
/// is validated against the loaded list.
pub fn load_state(store: &dyn Storage) -> AppState {
    let tasks = load_collection::<Task>(store, KEY_TASKS);
    let notes = load_collection::<Note>(store, KEY_NOTES);

    let datasets: Vec<Dataset> = match store.get(KEY_DATASETS) {
        Some(raw) => match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(values) => values.iter().filter_map(normalize_dataset).collect(),
            Err(e) => {
                warn!("unable to parse stored `{KEY_DATASETS}`: {e}");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let active_dataset = store.get(KEY_ACTIVE).filter(|id| !id.is_empty());

    let options = match store.get(KEY_OPTIONS) {
        // Missing fields inside the record merge over the defaults.
        Some(raw) => serde_json::from_str::<DisplayOptions>(&raw).unwrap_or_else(|e| {
            warn!("unable to parse stored `{KEY_OPTIONS}`: {e}");
            DisplayOptions::default()
        }),
        None => DisplayOptions::default(),
    };

    let mut state = AppState {
        tasks,
        notes,
        datasets,
        active_dataset,
        options,
    };
    state.ensure_active();
    state
}

fn load_collection<T: serde::de::DeserializeOwned>(store: &dyn Storage, key: &str) -> Vec<T> {
    match store.get(key) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("unable to parse stored `{key}`: {e}");
            Vec::new()
        }),
        None => Vec::new(),
    }
}

// ─── DATASET EXCHANGE FILES ─────────────────────────────────────

/// Derive an export filename stem from a dataset name: lowercased, runs
/// of non-alphanumerics collapsed to one hyphen, leading/trailing hyphens
/// stripped, with a fixed fallback when nothing survives.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    if slug.is_empty() {
        String::from("dataset")
    } else {
        slug
    }
}

/// Write a dataset as a human-readable JSON exchange file into `dir`.
pub fn export_dataset(dataset: &Dataset, dir: &Path) -> io::Result<PathBuf> {
    let json = serde_json::to_string_pretty(dataset)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let path = dir.join(format!("{}.json", slugify(&dataset.name)));
    fs::write(&path, json)?;
    Ok(path)
}

/// Read and normalize a dataset exchange file. The whole record is
/// rejected with a user-facing message when the file is unreadable, not
/// JSON, or not a dataset-shaped object.
pub fn import_dataset(path: &Path) -> Result<Dataset, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("Unable to read file: {e}"))?;
    let value: Value =
        serde_json::from_str(&raw).map_err(|_| String::from("Invalid dataset file."))?;
    normalize_dataset(&value).ok_or_else(|| String::from("Invalid dataset file."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChartType, DataPoint};
    use crate::palette::PaletteKind;

    fn sample_state() -> AppState {
        let mut dataset = Dataset::new("Q3 Revenue".into(), ChartType::Line);
        dataset.palette = PaletteKind::Sunset;
        dataset.points = vec![
            DataPoint { label: "Jul".into(), value: 10.0 },
            DataPoint { label: "Aug".into(), value: 12.5 },
        ];
        let active = dataset.id.clone();
        AppState {
            tasks: vec![Task {
                text: "water plants".into(),
                completed: false,
                created_at: 1,
            }],
            notes: vec![Note {
                title: "idea".into(),
                body: "charts everywhere".into(),
                created_at: 2,
            }],
            datasets: vec![dataset],
            active_dataset: Some(active),
            options: DisplayOptions {
                fill_area: true,
                ..DisplayOptions::default()
            },
        }
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let mut store = MemoryStore::default();
        let state = sample_state();
        assert!(save_state(&mut store, &state));
        assert_eq!(load_state(&store), state);
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemoryStore::default();
        let state = load_state(&store);
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn test_corrupt_datasets_entry_leaves_other_fields_intact() {
        let mut store = MemoryStore::default();
        save_state(&mut store, &sample_state());
        store.set(KEY_DATASETS, "{{{ not json").unwrap();

        let state = load_state(&store);
        assert!(state.datasets.is_empty());
        assert_eq!(state.active_dataset, None);
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.notes.len(), 1);
        assert!(state.options.fill_area);
    }

    #[test]
    fn test_dangling_active_id_falls_back_to_first() {
        let mut store = MemoryStore::default();
        let state = sample_state();
        let first_id = state.datasets[0].id.clone();
        save_state(&mut store, &state);
        store.set(KEY_ACTIVE, "no-such-dataset").unwrap();

        let loaded = load_state(&store);
        assert_eq!(loaded.active_dataset.as_deref(), Some(first_id.as_str()));
    }

    #[test]
    fn test_empty_active_key_means_none() {
        let mut store = MemoryStore::default();
        let mut state = sample_state();
        state.datasets.clear();
        state.active_dataset = None;
        save_state(&mut store, &state);
        assert_eq!(store.get(KEY_ACTIVE).as_deref(), Some(""));
        assert_eq!(load_state(&store).active_dataset, None);
    }

    #[test]
    fn test_older_options_record_merges_defaults() {
        let mut store = MemoryStore::default();
        store
            .set(KEY_OPTIONS, r#"{"showLegend":false,"fillArea":true}"#)
            .unwrap();
        let state = load_state(&store);
        assert!(!state.options.show_legend);
        assert!(state.options.fill_area);
        // Fields the old record never wrote keep their defaults.
        assert!(state.options.show_grid_x);
        assert!(state.options.smooth_lines);
    }

    #[test]
    fn test_stored_datasets_are_renormalized() {
        let mut store = MemoryStore::default();
        store
            .set(
                KEY_DATASETS,
                r#"[
                    {"name":"ok","chartType":"pie","points":[{"label":"a","value":1}]},
                    "not an object",
                    {"name":"junk points","points":[{"label":"","value":2},{"label":"b"}]}
                ]"#,
            )
            .unwrap();
        let state = load_state(&store);
        assert_eq!(state.datasets.len(), 2);
        assert_eq!(state.datasets[0].chart_type, ChartType::Pie);
        assert!(state.datasets[1].points.is_empty());
        // Active id is assigned to the first loaded dataset.
        assert_eq!(
            state.active_dataset.as_deref(),
            Some(state.datasets[0].id.as_str())
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Q3 Revenue!!"), "q3-revenue");
        assert_eq!(slugify("  Monthly -- Budget  "), "monthly-budget");
        assert_eq!(slugify("日本語"), "dataset");
        assert_eq!(slugify(""), "dataset");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::with_dir(dir.path().join("state"));
        assert_eq!(store.get(KEY_TASKS), None);
        store.set(KEY_TASKS, "[]").unwrap();
        assert_eq!(store.get(KEY_TASKS).as_deref(), Some("[]"));
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let state = sample_state();
        let path = export_dataset(&state.datasets[0], dir.path()).unwrap();
        assert!(path.ends_with("q3-revenue.json"));
        let imported = import_dataset(&path).unwrap();
        assert_eq!(imported, state.datasets[0]);
    }

    #[test]
    fn test_import_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json at all").unwrap();
        assert!(import_dataset(&path).is_err());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(import_dataset(&path).is_err());

        assert!(import_dataset(&dir.path().join("missing.json")).is_err());
    }
}
