use iced::widget::canvas::Canvas;
use iced::widget::{
    button, column, container, row, scrollable, text, text_input, Column, Row, Space,
};
use iced::{Alignment, Background, Border, Color, Element, Length, Shadow, Theme, Vector};

use crate::chart::{ChartColors, DatasetChart};
use crate::chartspec::build_chart_spec;
use crate::model::{AppState, ChartType, DataPoint, Dataset, Note, Task};
use crate::palette::{parse_color, PaletteKind};
use crate::stats::{format_value, summarize};
use crate::store::{self, FileStore};

// ─── UI PALETTE ─────────────────────────────────────────────────

/// Semantic colors for the dashboard chrome (the chart palettes live in
/// `palette.rs`; this is just the window dressing).
#[derive(Debug, Clone, Copy)]
pub struct UiPalette {
    pub bg: Color,
    pub panel_bg: Color,
    pub sidebar_bg: Color,
    pub border: Color,
    pub grid: Color,
    pub label: Color,
    pub text: Color,
    pub accent: Color,
    pub green: Color,
    pub red: Color,
    pub yellow: Color,
}

const fn hex(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

const DARK: UiPalette = UiPalette {
    bg: hex(0x1e, 0x1e, 0x2e),
    panel_bg: hex(0x18, 0x18, 0x25),
    sidebar_bg: hex(0x11, 0x11, 0x1b),
    border: hex(0x31, 0x32, 0x44),
    grid: Color::from_rgba(1.0, 1.0, 1.0, 0.06),
    label: hex(0xa6, 0xad, 0xc8),
    text: hex(0xcd, 0xd6, 0xf4),
    accent: hex(0x89, 0xb4, 0xfa),
    green: hex(0xa6, 0xe3, 0xa1),
    red: hex(0xf3, 0x8b, 0xa8),
    yellow: hex(0xf9, 0xe2, 0xaf),
};

// ─── MESSAGE & ENUMS ───────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    // Tasks
    TaskInputChanged(String),
    TaskSubmitted,
    TaskToggled(usize),
    TaskDeleted(usize),
    // Notes
    NoteTitleChanged(String),
    NoteBodyChanged(String),
    NoteSubmitted,
    NoteDeleted(usize),
    // Datasets
    NewDatasetNameChanged(String),
    NewDatasetTypeSelected(ChartType),
    DatasetCreated,
    DatasetSelected(String),
    RenameStarted,
    RenameInputChanged(String),
    RenameCommitted,
    RenameCanceled,
    DatasetDuplicated,
    DatasetDeleted,
    DatasetExported,
    ImportPathChanged(String),
    DatasetImported,
    // Data points
    PointLabelChanged(String),
    PointValueChanged(String),
    PointSubmitted,
    PointEditStarted(usize),
    PointEditLabelChanged(String),
    PointEditValueChanged(String),
    PointEditCommitted,
    PointEditCanceled,
    PointDeleted(usize),
    // Chart controls
    ChartTypeSelected(ChartType),
    PaletteSelected(PaletteKind),
    OptionToggled(DisplayToggle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Notes,
    Charts,
}

/// The six global chart display toggles, one message for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayToggle {
    Legend,
    GridX,
    GridY,
    Smooth,
    Fill,
    Stacked,
}

impl DisplayToggle {
    const ALL: &[DisplayToggle] = &[
        DisplayToggle::Legend,
        DisplayToggle::GridX,
        DisplayToggle::GridY,
        DisplayToggle::Smooth,
        DisplayToggle::Fill,
        DisplayToggle::Stacked,
    ];

    fn label(&self) -> &'static str {
        match self {
            DisplayToggle::Legend => "Legend",
            DisplayToggle::GridX => "X grid",
            DisplayToggle::GridY => "Y grid",
            DisplayToggle::Smooth => "Smooth",
            DisplayToggle::Fill => "Fill",
            DisplayToggle::Stacked => "Stacked",
        }
    }
}

/// Draft of an in-place data-point edit.
#[derive(Debug, Clone)]
struct PointEdit {
    index: usize,
    label: String,
    value: String,
}

// ─── APP ────────────────────────────────────────────────────────

pub struct Dayboard {
    store: FileStore,
    state: AppState,
    tab: Tab,
    pal: UiPalette,
    // Form drafts
    task_input: String,
    note_title_input: String,
    note_body_input: String,
    new_dataset_name: String,
    new_dataset_type: ChartType,
    point_label_input: String,
    point_value_input: String,
    rename_draft: Option<String>,
    point_edit: Option<PointEdit>,
    import_path: String,
    // User-facing feedback
    status: Option<String>,
}

impl Dayboard {
    pub fn new() -> Self {
        let store = FileStore::open();
        let state = store::load_state(&store);
        Self {
            store,
            state,
            tab: Tab::Charts,
            pal: DARK,
            task_input: String::new(),
            note_title_input: String::new(),
            note_body_input: String::new(),
            new_dataset_name: String::new(),
            new_dataset_type: ChartType::Bar,
            point_label_input: String::new(),
            point_value_input: String::new(),
            rename_draft: None,
            point_edit: None,
            import_path: String::new(),
            status: None,
        }
    }

    pub fn title(&self) -> String {
        String::from("Dayboard")
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Write-through after every state mutation. The in-memory state is
    /// kept regardless; a failed write only costs durability, and the
    /// user is told so.
    fn persist(&mut self) {
        if !store::save_state(&mut self.store, &self.state) {
            self.status = Some(String::from(
                "Unable to save changes; they are kept in memory only.",
            ));
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                self.status = None;
            }

            // ─── Tasks ───
            Message::TaskInputChanged(v) => self.task_input = v,
            Message::TaskSubmitted => {
                let text = self.task_input.trim().to_string();
                if text.is_empty() {
                    return;
                }
                self.state.tasks.insert(
                    0,
                    Task {
                        text,
                        completed: false,
                        created_at: crate::model::now_millis(),
                    },
                );
                self.task_input.clear();
                self.persist();
            }
            Message::TaskToggled(index) => {
                if let Some(task) = self.state.tasks.get_mut(index) {
                    task.completed = !task.completed;
                    self.persist();
                }
            }
            Message::TaskDeleted(index) => {
                if index < self.state.tasks.len() {
                    self.state.tasks.remove(index);
                    self.persist();
                }
            }

            // ─── Notes ───
            Message::NoteTitleChanged(v) => self.note_title_input = v,
            Message::NoteBodyChanged(v) => self.note_body_input = v,
            Message::NoteSubmitted => {
                let title = self.note_title_input.trim().to_string();
                let body = self.note_body_input.trim().to_string();
                if title.is_empty() || body.is_empty() {
                    self.status = Some(String::from("A note needs both a title and a body."));
                    return;
                }
                self.state.notes.insert(
                    0,
                    Note {
                        title,
                        body,
                        created_at: crate::model::now_millis(),
                    },
                );
                self.note_title_input.clear();
                self.note_body_input.clear();
                self.status = None;
                self.persist();
            }
            Message::NoteDeleted(index) => {
                if index < self.state.notes.len() {
                    self.state.notes.remove(index);
                    self.persist();
                }
            }

            // ─── Datasets ───
            Message::NewDatasetNameChanged(v) => self.new_dataset_name = v,
            Message::NewDatasetTypeSelected(t) => self.new_dataset_type = t,
            Message::DatasetCreated => {
                let name = self.new_dataset_name.trim().to_string();
                if name.is_empty() {
                    self.status = Some(String::from("Dataset name is required."));
                    return;
                }
                self.state
                    .insert_dataset(Dataset::new(name, self.new_dataset_type));
                self.new_dataset_name.clear();
                self.new_dataset_type = ChartType::Bar;
                self.status = None;
                self.persist();
            }
            Message::DatasetSelected(id) => {
                if self.state.active_dataset.as_deref() == Some(id.as_str()) {
                    return;
                }
                self.state.active_dataset = Some(id);
                self.rename_draft = None;
                self.point_edit = None;
                self.persist();
            }
            Message::RenameStarted => {
                if let Some(dataset) = self.state.active_dataset() {
                    self.rename_draft = Some(dataset.name.clone());
                }
            }
            Message::RenameInputChanged(v) => {
                if let Some(draft) = self.rename_draft.as_mut() {
                    *draft = v;
                }
            }
            Message::RenameCommitted => {
                let Some(draft) = self.rename_draft.clone() else {
                    return;
                };
                let name = draft.trim().to_string();
                if name.is_empty() {
                    self.status = Some(String::from("Dataset name cannot be empty."));
                    return;
                }
                if let Some(dataset) = self.state.active_dataset_mut() {
                    dataset.name = name;
                }
                self.rename_draft = None;
                self.status = None;
                self.persist();
            }
            Message::RenameCanceled => self.rename_draft = None,
            Message::DatasetDuplicated => {
                if let Some(copy) = self.state.active_dataset().map(Dataset::duplicate) {
                    self.state.insert_dataset(copy);
                    self.persist();
                }
            }
            Message::DatasetDeleted => {
                if let Some(id) = self.state.active_dataset.clone() {
                    self.state.remove_dataset(&id);
                    self.rename_draft = None;
                    self.point_edit = None;
                    self.persist();
                }
            }
            Message::DatasetExported => {
                let Some(dataset) = self.state.active_dataset() else {
                    self.status = Some(String::from("Select a dataset to export."));
                    return;
                };
                let Some(dir) = dirs::download_dir().or_else(dirs::home_dir) else {
                    self.status = Some(String::from("No writable export directory found."));
                    return;
                };
                match store::export_dataset(dataset, &dir) {
                    Ok(path) => self.status = Some(format!("Exported to {}", path.display())),
                    Err(e) => self.status = Some(format!("Export failed: {e}")),
                }
            }
            Message::ImportPathChanged(v) => self.import_path = v,
            Message::DatasetImported => {
                let path = self.import_path.trim().to_string();
                if path.is_empty() {
                    self.status = Some(String::from("Enter the path of a dataset file."));
                    return;
                }
                match store::import_dataset(std::path::Path::new(&path)) {
                    Ok(dataset) => {
                        let name = dataset.name.clone();
                        self.state.insert_dataset(dataset);
                        self.import_path.clear();
                        self.status = Some(format!("Imported \"{name}\"."));
                        self.persist();
                    }
                    Err(msg) => self.status = Some(msg),
                }
            }

            // ─── Data points ───
            Message::PointLabelChanged(v) => self.point_label_input = v,
            Message::PointValueChanged(v) => self.point_value_input = v,
            Message::PointSubmitted => {
                let label = self.point_label_input.trim().to_string();
                let value = self.point_value_input.trim().parse::<f64>();
                if label.is_empty() {
                    self.status = Some(String::from("Label cannot be empty."));
                    return;
                }
                let Ok(value) = value else {
                    self.status = Some(String::from("Enter a valid number."));
                    return;
                };
                if !value.is_finite() {
                    self.status = Some(String::from("Enter a valid number."));
                    return;
                }
                if let Some(dataset) = self.state.active_dataset_mut() {
                    dataset.points.push(DataPoint { label, value });
                    self.point_label_input.clear();
                    self.point_value_input.clear();
                    self.status = None;
                    self.persist();
                }
            }
            Message::PointEditStarted(index) => {
                if let Some(point) = self
                    .state
                    .active_dataset()
                    .and_then(|d| d.points.get(index))
                {
                    self.point_edit = Some(PointEdit {
                        index,
                        label: point.label.clone(),
                        value: format_value(point.value),
                    });
                }
            }
            Message::PointEditLabelChanged(v) => {
                if let Some(edit) = self.point_edit.as_mut() {
                    edit.label = v;
                }
            }
            Message::PointEditValueChanged(v) => {
                if let Some(edit) = self.point_edit.as_mut() {
                    edit.value = v;
                }
            }
            Message::PointEditCommitted => {
                let Some(edit) = self.point_edit.clone() else {
                    return;
                };
                let label = edit.label.trim().to_string();
                if label.is_empty() {
                    self.status = Some(String::from("Label cannot be empty."));
                    return;
                }
                let value = match edit.value.trim().parse::<f64>() {
                    Ok(v) if v.is_finite() => v,
                    _ => {
                        self.status = Some(String::from("Enter a valid number."));
                        return;
                    }
                };
                if let Some(point) = self
                    .state
                    .active_dataset_mut()
                    .and_then(|d| d.points.get_mut(edit.index))
                {
                    // Replaced wholesale, never patched field by field.
                    *point = DataPoint { label, value };
                }
                self.point_edit = None;
                self.status = None;
                self.persist();
            }
            Message::PointEditCanceled => self.point_edit = None,
            Message::PointDeleted(index) => {
                if let Some(dataset) = self.state.active_dataset_mut() {
                    if index < dataset.points.len() {
                        dataset.points.remove(index);
                        self.point_edit = None;
                        self.persist();
                    }
                }
            }

            // ─── Chart controls ───
            Message::ChartTypeSelected(t) => {
                if let Some(dataset) = self.state.active_dataset_mut() {
                    dataset.chart_type = t;
                    self.persist();
                }
            }
            Message::PaletteSelected(p) => {
                if let Some(dataset) = self.state.active_dataset_mut() {
                    dataset.palette = p;
                    self.persist();
                }
            }
            Message::OptionToggled(toggle) => {
                let o = &mut self.state.options;
                match toggle {
                    DisplayToggle::Legend => o.show_legend = !o.show_legend,
                    DisplayToggle::GridX => o.show_grid_x = !o.show_grid_x,
                    DisplayToggle::GridY => o.show_grid_y = !o.show_grid_y,
                    DisplayToggle::Smooth => o.smooth_lines = !o.smooth_lines,
                    DisplayToggle::Fill => o.fill_area = !o.fill_area,
                    DisplayToggle::Stacked => o.stacked_bars = !o.stacked_bars,
                }
                self.persist();
            }
        }
    }

    fn chart_colors(&self) -> ChartColors {
        ChartColors {
            bg: self.pal.panel_bg,
            border: self.pal.border,
            grid: self.pal.grid,
            label: self.pal.label,
            text: self.pal.text,
        }
    }

    fn option_is_on(&self, toggle: DisplayToggle) -> bool {
        let o = &self.state.options;
        match toggle {
            DisplayToggle::Legend => o.show_legend,
            DisplayToggle::GridX => o.show_grid_x,
            DisplayToggle::GridY => o.show_grid_y,
            DisplayToggle::Smooth => o.smooth_lines,
            DisplayToggle::Fill => o.fill_area,
            DisplayToggle::Stacked => o.stacked_bars,
        }
    }

    // ─── MAIN VIEW ──────────────────────────────────────────────

    pub fn view(&self) -> Element<'_, Message> {
        let p = &self.pal;

        let tabs = row![
            menu_tab("Tasks", Tab::Tasks, self.tab, p),
            menu_tab("Notes", Tab::Notes, self.tab, p),
            menu_tab("Charts", Tab::Charts, self.tab, p),
        ]
        .spacing(4);

        let status_el: Element<Message> = if let Some(msg) = &self.status {
            text(msg).size(11).color(p.yellow).into()
        } else {
            Space::new(0, 0).into()
        };

        let menu_bar = row![
            text("Dayboard").size(15).color(p.accent),
            Space::with_width(12),
            status_el,
            Space::with_width(Length::Fill),
            tabs,
        ]
        .align_y(Alignment::Center)
        .padding([6, 12]);

        let content: Element<Message> = match self.tab {
            Tab::Tasks => self.view_tasks(),
            Tab::Notes => self.view_notes(),
            Tab::Charts => self.view_charts(),
        };

        let bg = p.bg;
        let main = column![
            panel_bg(menu_bar.into(), p.sidebar_bg),
            content,
        ]
        .spacing(0);

        container(main)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_: &Theme| container::Style {
                background: Some(Background::Color(bg)),
                ..Default::default()
            })
            .into()
    }

    // ─── TASKS TAB ─────────────────────────────────────────────

    fn view_tasks(&self) -> Element<'_, Message> {
        let p = &self.pal;

        let form = row![
            text_input("What needs doing?", &self.task_input)
                .on_input(Message::TaskInputChanged)
                .on_submit(Message::TaskSubmitted)
                .size(13),
            button(text("Add").size(12))
                .on_press(Message::TaskSubmitted)
                .style(button::primary)
                .padding([6, 14]),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let mut rows: Vec<Element<Message>> = Vec::new();
        if self.state.tasks.is_empty() {
            rows.push(
                text("No tasks yet. Add your first one above!")
                    .size(12)
                    .color(p.label)
                    .into(),
            );
        }
        for (i, task) in self.state.tasks.iter().enumerate() {
            let mark = if task.completed { "[x]" } else { "[ ]" };
            let mark_color = if task.completed { p.green } else { p.label };
            let text_color = if task.completed { p.label } else { p.text };
            rows.push(
                row![
                    button(text(mark).size(12).color(mark_color))
                        .on_press(Message::TaskToggled(i))
                        .style(button::text)
                        .padding([2, 4]),
                    text(&task.text).size(13).color(text_color).width(Length::Fill),
                    delete_button(Message::TaskDeleted(i), p),
                ]
                .spacing(8)
                .align_y(Alignment::Center)
                .into(),
            );
        }

        let list = Column::with_children(rows).spacing(6);
        scrollable(
            column![
                panel(form.into(), p),
                panel(list.into(), p),
            ]
            .spacing(8)
            .padding(8),
        )
        .into()
    }

    // ─── NOTES TAB ─────────────────────────────────────────────

    fn view_notes(&self) -> Element<'_, Message> {
        let p = &self.pal;

        let form = column![
            text_input("Note title", &self.note_title_input)
                .on_input(Message::NoteTitleChanged)
                .size(13),
            text_input("Write it down before it escapes…", &self.note_body_input)
                .on_input(Message::NoteBodyChanged)
                .on_submit(Message::NoteSubmitted)
                .size(13),
            button(text("Save note").size(12))
                .on_press(Message::NoteSubmitted)
                .style(button::primary)
                .padding([6, 14]),
        ]
        .spacing(8);

        let mut cards: Vec<Element<Message>> = Vec::new();
        if self.state.notes.is_empty() {
            cards.push(
                text("Notes you save will appear here.")
                    .size(12)
                    .color(p.label)
                    .into(),
            );
        }
        for (i, note) in self.state.notes.iter().enumerate() {
            let card = column![
                row![
                    text(&note.title).size(13).color(p.text).width(Length::Fill),
                    delete_button(Message::NoteDeleted(i), p),
                ]
                .align_y(Alignment::Center),
                text(&note.body).size(12).color(p.label),
            ]
            .spacing(4);
            cards.push(panel(card.into(), p));
        }

        scrollable(
            column![
                panel(form.into(), p),
                Column::with_children(cards).spacing(8),
            ]
            .spacing(8)
            .padding(8),
        )
        .into()
    }

    // ─── CHARTS TAB ────────────────────────────────────────────

    fn view_charts(&self) -> Element<'_, Message> {
        let p = &self.pal;

        let sidebar = container(
            column![
                self.view_dataset_form(),
                Space::with_height(10),
                self.view_dataset_list(),
                Space::with_height(10),
                self.view_import_form(),
            ]
            .padding(10),
        )
        .width(280)
        .height(Length::Fill)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(DARK.sidebar_bg)),
            ..Default::default()
        });

        let editor: Element<Message> = match self.state.active_dataset() {
            Some(dataset) => self.view_dataset_editor(dataset),
            None => {
                let hint = if self.state.datasets.is_empty() {
                    "Create a dataset to start charting your data."
                } else {
                    "Select a dataset to view and edit its data."
                };
                container(text(hint).size(13).color(p.label))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into()
            }
        };

        row![sidebar, editor].into()
    }

    fn view_dataset_form(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let mut type_btns: Vec<Element<Message>> = Vec::new();
        for &t in ChartType::ALL {
            type_btns.push(toggle_pill(
                t.key(),
                self.new_dataset_type == t,
                Message::NewDatasetTypeSelected(t),
                p,
            ));
        }

        let form = column![
            section_title("New dataset", p),
            text_input("Dataset name", &self.new_dataset_name)
                .on_input(Message::NewDatasetNameChanged)
                .on_submit(Message::DatasetCreated)
                .size(12),
            Row::with_children(type_btns).spacing(4),
            button(text("Create").size(12))
                .on_press(Message::DatasetCreated)
                .style(button::primary)
                .padding([5, 12]),
        ]
        .spacing(8);

        panel(form.into(), p)
    }

    fn view_dataset_list(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let mut pills: Vec<Element<Message>> = Vec::new();

        if self.state.datasets.is_empty() {
            pills.push(
                text("Create a dataset to start charting your data.")
                    .size(11)
                    .color(p.label)
                    .into(),
            );
        }
        for dataset in &self.state.datasets {
            let active = self.state.active_dataset.as_deref() == Some(dataset.id.as_str());
            pills.push(toggle_pill(
                &dataset.name,
                active,
                Message::DatasetSelected(dataset.id.clone()),
                p,
            ));
        }

        let list = column![
            section_title("Datasets", p),
            Column::with_children(pills).spacing(4),
        ]
        .spacing(8);
        scrollable(list).height(Length::Fill).into()
    }

    fn view_import_form(&self) -> Element<'_, Message> {
        let p = &self.pal;
        let form = column![
            section_title("Import", p),
            text_input("Path to a dataset .json", &self.import_path)
                .on_input(Message::ImportPathChanged)
                .on_submit(Message::DatasetImported)
                .size(12),
            button(text("Import file").size(12))
                .on_press(Message::DatasetImported)
                .style(button::secondary)
                .padding([5, 12]),
        ]
        .spacing(8);
        panel(form.into(), p)
    }

    fn view_dataset_editor<'a>(&'a self, dataset: &'a Dataset) -> Element<'a, Message> {
        let p = &self.pal;

        // Title row: plain name plus actions, or the inline rename form.
        let title_row: Element<Message> = match &self.rename_draft {
            Some(draft) => row![
                text_input("Dataset name", draft)
                    .on_input(Message::RenameInputChanged)
                    .on_submit(Message::RenameCommitted)
                    .size(13),
                button(text("Save").size(11))
                    .on_press(Message::RenameCommitted)
                    .style(button::primary)
                    .padding([4, 10]),
                button(text("Cancel").size(11))
                    .on_press(Message::RenameCanceled)
                    .style(button::secondary)
                    .padding([4, 10]),
            ]
            .spacing(6)
            .align_y(Alignment::Center)
            .into(),
            None => row![
                column![
                    text(&dataset.name).size(16).color(p.text),
                    text(dataset.meta_line()).size(11).color(p.label),
                ]
                .spacing(2)
                .width(Length::Fill),
                button(text("Rename").size(11))
                    .on_press(Message::RenameStarted)
                    .style(button::secondary)
                    .padding([4, 10]),
                button(text("Duplicate").size(11))
                    .on_press(Message::DatasetDuplicated)
                    .style(button::secondary)
                    .padding([4, 10]),
                button(text("Export").size(11))
                    .on_press(Message::DatasetExported)
                    .style(button::secondary)
                    .padding([4, 10]),
                button(text("Delete").size(11).color(p.red))
                    .on_press(Message::DatasetDeleted)
                    .style(button::text)
                    .padding([4, 10]),
            ]
            .spacing(6)
            .align_y(Alignment::Center)
            .into(),
        };

        // Chart type / palette selectors.
        let mut type_btns: Vec<Element<Message>> = Vec::new();
        for &t in ChartType::ALL {
            type_btns.push(toggle_pill(
                t.key(),
                dataset.chart_type == t,
                Message::ChartTypeSelected(t),
                p,
            ));
        }
        let mut palette_btns: Vec<Element<Message>> = Vec::new();
        for &kind in PaletteKind::ALL {
            palette_btns.push(palette_swatch(kind, dataset.palette == kind, p));
        }

        let mut option_btns: Vec<Element<Message>> = Vec::new();
        for &toggle in DisplayToggle::ALL {
            option_btns.push(toggle_pill(
                toggle.label(),
                self.option_is_on(toggle),
                Message::OptionToggled(toggle),
                p,
            ));
        }

        let controls = column![
            row![
                text("Type").size(11).color(p.label).width(60),
                Row::with_children(type_btns).spacing(4),
            ]
            .align_y(Alignment::Center),
            row![
                text("Palette").size(11).color(p.label).width(60),
                Row::with_children(palette_btns).spacing(4),
            ]
            .align_y(Alignment::Center),
            row![
                text("Options").size(11).color(p.label).width(60),
                Row::with_children(option_btns).spacing(4),
            ]
            .align_y(Alignment::Center),
        ]
        .spacing(6);

        // Chart surface (or placeholder while the dataset is empty).
        let chart_el: Element<Message> = match build_chart_spec(dataset, &self.state.options) {
            Some(spec) => Canvas::new(DatasetChart {
                spec,
                colors: self.chart_colors(),
            })
            .width(Length::Fill)
            .height(260)
            .into(),
            None => container(
                text("Add at least one data point to render a chart.")
                    .size(12)
                    .color(p.label),
            )
            .width(Length::Fill)
            .height(260)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
        };

        // Summary panel, hidden when there is nothing to aggregate.
        let summary_el: Element<Message> = match summarize(&dataset.points) {
            Some(summary) => {
                let mut cells: Vec<Element<Message>> = Vec::new();
                for (label, value) in summary.rows() {
                    cells.push(
                        column![
                            text(label).size(10).color(p.label),
                            text(value).size(13).color(p.accent),
                        ]
                        .spacing(2)
                        .width(Length::Fill)
                        .into(),
                    );
                }
                Row::with_children(cells).spacing(8).into()
            }
            None => Space::new(0, 0).into(),
        };

        let point_form = row![
            text_input("Label", &self.point_label_input)
                .on_input(Message::PointLabelChanged)
                .size(12),
            text_input("Value", &self.point_value_input)
                .on_input(Message::PointValueChanged)
                .on_submit(Message::PointSubmitted)
                .size(12)
                .width(110),
            button(text("Add point").size(11))
                .on_press(Message::PointSubmitted)
                .style(button::primary)
                .padding([5, 12]),
        ]
        .spacing(6)
        .align_y(Alignment::Center);

        let mut point_rows: Vec<Element<Message>> = Vec::new();
        if dataset.points.is_empty() {
            point_rows.push(
                text("No data points yet. Add a label and value above.")
                    .size(11)
                    .color(p.label)
                    .into(),
            );
        }
        for (i, point) in dataset.points.iter().enumerate() {
            let editing = self.point_edit.as_ref().filter(|e| e.index == i);
            let r: Element<Message> = match editing {
                Some(edit) => row![
                    text_input("Label", &edit.label)
                        .on_input(Message::PointEditLabelChanged)
                        .size(11),
                    text_input("Value", &edit.value)
                        .on_input(Message::PointEditValueChanged)
                        .on_submit(Message::PointEditCommitted)
                        .size(11)
                        .width(90),
                    button(text("Save").size(10))
                        .on_press(Message::PointEditCommitted)
                        .style(button::primary)
                        .padding([3, 8]),
                    button(text("Cancel").size(10))
                        .on_press(Message::PointEditCanceled)
                        .style(button::secondary)
                        .padding([3, 8]),
                ]
                .spacing(4)
                .align_y(Alignment::Center)
                .into(),
                None => row![
                    text(&point.label).size(12).color(p.text).width(Length::Fill),
                    text(format_value(point.value)).size(12).color(p.accent).width(90),
                    button(text("Edit").size(10))
                        .on_press(Message::PointEditStarted(i))
                        .style(button::text)
                        .padding([2, 6]),
                    delete_button(Message::PointDeleted(i), p),
                ]
                .spacing(4)
                .align_y(Alignment::Center)
                .into(),
            };
            point_rows.push(r);
        }

        let points_panel = column![
            section_title("Data points", p),
            point_form,
            Column::with_children(point_rows).spacing(4),
        ]
        .spacing(8);

        scrollable(
            column![
                panel(title_row, p),
                panel(controls.into(), p),
                panel(chart_el, p),
                panel(summary_el, p),
                panel(points_panel.into(), p),
            ]
            .spacing(8)
            .padding(8),
        )
        .into()
    }
}

// ─── WIDGET HELPERS ─────────────────────────────────────────────

fn panel<'a>(content: Element<'a, Message>, p: &UiPalette) -> Element<'a, Message> {
    let bg = p.panel_bg;
    let border_c = p.border;
    container(content)
        .width(Length::Fill)
        .padding(10)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            border: Border {
                color: border_c,
                width: 1.0,
                radius: 8.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.15),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
            ..Default::default()
        })
        .into()
}

fn panel_bg<'a>(content: Element<'a, Message>, bg: Color) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .style(move |_: &Theme| container::Style {
            background: Some(Background::Color(bg)),
            ..Default::default()
        })
        .into()
}

fn menu_tab(label: &str, tab: Tab, current: Tab, p: &UiPalette) -> Element<'static, Message> {
    let is_active = tab == current;
    let accent = p.accent;
    let color = if is_active { accent } else { p.label };
    let text_c = p.text;
    button(text(label.to_string()).size(12).color(color))
        .on_press(Message::TabSelected(tab))
        .padding([4, 14])
        .style(move |_: &Theme, status| {
            let bg = match status {
                button::Status::Hovered => Color::from_rgba(accent.r, accent.g, accent.b, 0.15),
                button::Status::Pressed => Color::from_rgba(accent.r, accent.g, accent.b, 0.25),
                _ => {
                    if is_active {
                        Color::from_rgba(accent.r, accent.g, accent.b, 0.1)
                    } else {
                        Color::TRANSPARENT
                    }
                }
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: text_c,
                border: Border {
                    color: Color::TRANSPARENT,
                    width: 0.0,
                    radius: 6.0.into(),
                },
                ..Default::default()
            }
        })
        .into()
}

fn section_title(label: &str, p: &UiPalette) -> Element<'static, Message> {
    text(label.to_string()).size(11).color(p.accent).into()
}

fn toggle_pill(
    label: &str,
    is_active: bool,
    on_press: Message,
    p: &UiPalette,
) -> Element<'static, Message> {
    let color = if is_active { p.accent } else { p.label };
    button(text(label.to_string()).size(11).color(color))
        .on_press(on_press)
        .style(if is_active {
            button::primary
        } else {
            button::secondary
        })
        .padding([3, 8])
        .into()
}

/// A palette selector button showing the palette's own leading color.
fn palette_swatch(kind: PaletteKind, is_active: bool, p: &UiPalette) -> Element<'static, Message> {
    let swatch = parse_color(kind.colors()[0]).unwrap_or(p.accent);
    let color = if is_active { swatch } else { p.label };
    button(text(kind.name()).size(11).color(color))
        .on_press(Message::PaletteSelected(kind))
        .style(if is_active {
            button::primary
        } else {
            button::secondary
        })
        .padding([3, 8])
        .into()
}

fn delete_button(on_press: Message, p: &UiPalette) -> Element<'static, Message> {
    button(text("\u{00d7}").size(12).color(p.red))
        .on_press(on_press)
        .style(button::text)
        .padding([2, 6])
        .into()
}
