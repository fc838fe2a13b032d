use std::path::{Path, PathBuf};

use crate::core::{Choice, FileFilter, SelectionMode, SelectorError};

/// Configuration and finalized result of one file selector.
///
/// Setters store values verbatim; validation (e.g. whether the current
/// directory exists) happens when the dialog is presented. The selection is
/// written once by the dialog when it completes.
#[derive(Clone, Debug)]
pub struct SelectorState {
    current_directory: Option<PathBuf>,
    accept_label: String,
    title: String,
    suggested_filename: String,
    mode: SelectionMode,
    filters: Vec<FileFilter>,
    current_filter: Option<usize>,
    choices: Vec<Choice>,
    confirm_overwrite: bool,
    selected: Vec<String>,
}

impl Default for SelectorState {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl SelectorState {
    /// Fresh configuration for `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            current_directory: None,
            accept_label: String::new(),
            title: String::new(),
            suggested_filename: String::new(),
            mode,
            filters: Vec::new(),
            current_filter: None,
            choices: Vec::new(),
            confirm_overwrite: true,
            selected: Vec::new(),
        }
    }

    /// Directory the session should start in. Not checked until presentation.
    pub fn set_current_directory(&mut self, path: impl Into<PathBuf>) {
        self.current_directory = Some(path.into());
    }

    /// Configured starting directory.
    pub fn current_directory(&self) -> Option<&Path> {
        self.current_directory.as_deref()
    }

    /// Text of the accept action. Empty selects the per-mode default.
    pub fn set_accept_label(&mut self, label: impl Into<String>) {
        self.accept_label = label.into();
    }

    /// Configured accept label, possibly empty.
    pub fn accept_label(&self) -> &str {
        &self.accept_label
    }

    /// Accept label as shown to the user.
    pub fn effective_accept_label(&self) -> &str {
        if self.accept_label.is_empty() {
            self.mode.default_accept_label()
        } else {
            &self.accept_label
        }
    }

    /// Window title. Empty selects the per-mode default.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Configured title, possibly empty.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title as shown to the user.
    pub fn effective_title(&self) -> &str {
        if self.title.is_empty() {
            self.mode.default_title()
        } else {
            &self.title
        }
    }

    /// Initial file name; only used in [`SelectionMode::SaveFile`].
    pub fn set_suggested_filename(&mut self, name: impl Into<String>) {
        self.suggested_filename = name.into();
    }

    /// Configured suggested file name.
    pub fn suggested_filename(&self) -> &str {
        &self.suggested_filename
    }

    /// Selection mode. [`FileSelector::set_mode`](crate::FileSelector::set_mode)
    /// rejects changes once the session has started.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    /// Current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Replace the file filters. The first filter becomes active.
    pub fn set_filters(&mut self, filters: Vec<FileFilter>) {
        self.current_filter = if filters.is_empty() { None } else { Some(0) };
        self.filters = filters;
    }

    /// Configured filters.
    pub fn filters(&self) -> &[FileFilter] {
        &self.filters
    }

    /// Select the active filter; `None` shows all files. Out-of-range indices
    /// clear the filter.
    pub fn set_current_filter(&mut self, index: Option<usize>) {
        self.current_filter = index.filter(|&i| i < self.filters.len());
    }

    /// Index of the active filter.
    pub fn current_filter(&self) -> Option<usize> {
        self.current_filter
    }

    /// Active filter, if any.
    pub fn active_filter(&self) -> Option<&FileFilter> {
        self.current_filter.and_then(|i| self.filters.get(i))
    }

    /// Replace the extra choices.
    pub fn set_choices(&mut self, choices: Vec<Choice>) {
        self.choices = choices;
    }

    /// Configured choices with their current values.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Set the value of the choice `id` (see [`Choice::value`]).
    pub fn set_choice(&mut self, id: &str, value: &str) -> Result<(), SelectorError> {
        self.choices
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| SelectorError::UnknownChoice(id.to_string()))?
            .set_value(value)
    }

    /// `(id, value)` for every choice.
    pub fn selected_choices(&self) -> Vec<(String, String)> {
        self.choices
            .iter()
            .map(|c| (c.id.clone(), c.value()))
            .collect()
    }

    /// Ask before replacing an existing file in [`SelectionMode::SaveFile`].
    pub fn set_confirm_overwrite(&mut self, confirm: bool) {
        self.confirm_overwrite = confirm;
    }

    /// Whether overwrites are confirmed.
    pub fn confirm_overwrite(&self) -> bool {
        self.confirm_overwrite
    }

    /// Finalized selection. Empty before completion and after cancellation.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub(crate) fn finalize(&mut self, selected: Vec<String>) {
        self.selected = selected;
    }

    pub(crate) fn clear_selected(&mut self) {
        self.selected.clear();
    }
}
