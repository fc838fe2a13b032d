use std::path::PathBuf;
use thiserror::Error;

/// Selection mode of a file selector.
///
/// The mode is fixed before the dialog is presented and cannot change while a
/// session is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// Pick a single existing file
    #[default]
    OpenFile,
    /// Choose one destination: current directory joined with a typed file name
    SaveFile,
    /// Choose zero or more destination directories
    SaveFiles,
}

impl SelectionMode {
    /// Accept-button text used when no accept label was configured.
    pub fn default_accept_label(self) -> &'static str {
        match self {
            SelectionMode::OpenFile => "Open",
            SelectionMode::SaveFile => "Save",
            SelectionMode::SaveFiles => "Select",
        }
    }

    /// Window title used when no title was configured.
    pub fn default_title(self) -> &'static str {
        match self {
            SelectionMode::OpenFile => "Open File",
            SelectionMode::SaveFile => "Save File",
            SelectionMode::SaveFiles => "Select Folders",
        }
    }

    /// Whether only directories are listed.
    pub fn directories_only(self) -> bool {
        matches!(self, SelectionMode::SaveFiles)
    }

    /// Whether more than one entry may be highlighted at once.
    pub fn allows_multiple(self) -> bool {
        matches!(self, SelectionMode::SaveFiles)
    }

    /// Whether the dialog shows a file name entry.
    pub fn uses_filename(self) -> bool {
        matches!(self, SelectionMode::SaveFile)
    }
}

/// Sort keys for the directory listing
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Natural, case-insensitive order of the display name
    #[default]
    DisplayName,
    /// Last modification time, oldest first
    ModificationTime,
}

/// Named file filter (e.g. "Text" -> ["txt", "md"]).
///
/// Patterns are extensions without a leading dot and are matched
/// case-insensitively. The pattern `*` matches every file. Directories are
/// never hidden by a filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileFilter {
    /// Filter display name
    pub name: String,
    /// Lower-case extensions without dot (e.g. "txt"), or `*`
    pub patterns: Vec<String>,
}

impl FileFilter {
    /// Create a filter from a name and extension patterns.
    ///
    /// Leading `*.` or `.` is stripped from each pattern, so `"*.txt"`,
    /// `".txt"` and `"txt"` are equivalent.
    pub fn new<I, S>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            patterns: patterns
                .into_iter()
                .map(|p| normalize_pattern(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Returns `true` if a file with this name passes the filter.
    pub fn matches(&self, file_name: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let lower = file_name.to_lowercase();
        self.patterns.iter().any(|p| {
            if p == "*" {
                return true;
            }
            lower
                .strip_suffix(p.as_str())
                .is_some_and(|stem| stem.ends_with('.') && stem.len() > 1)
        })
    }
}

impl From<(&str, &[&str])> for FileFilter {
    fn from(value: (&str, &[&str])) -> Self {
        FileFilter::new(value.0, value.1.iter().copied())
    }
}

fn normalize_pattern(raw: &str) -> String {
    let p = raw.trim();
    if p == "*" || p == "*.*" {
        return "*".to_string();
    }
    p.trim_start_matches('*')
        .trim_start_matches('.')
        .to_lowercase()
}

/// Extra option presented next to the accept button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    /// Stable identifier reported back with the selection
    pub id: String,
    /// Label shown in the UI
    pub label: String,
    /// Kind and current value
    pub kind: ChoiceKind,
}

/// Value carried by a [`Choice`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChoiceKind {
    /// Boolean check box
    Toggle {
        /// Current state
        checked: bool,
    },
    /// One of several named options
    Options {
        /// `(id, label)` pairs in display order
        options: Vec<(String, String)>,
        /// Id of the selected option
        selected: String,
    },
}

impl Choice {
    /// Boolean choice.
    pub fn toggle(id: impl Into<String>, label: impl Into<String>, checked: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ChoiceKind::Toggle { checked },
        }
    }

    /// Multiple-option choice. If `selected` is not one of the option ids the
    /// first option is selected.
    pub fn options<I, A, B>(
        id: impl Into<String>,
        label: impl Into<String>,
        options: I,
        selected: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let options: Vec<(String, String)> = options
            .into_iter()
            .map(|(a, b)| (a.into(), b.into()))
            .collect();
        let mut selected = selected.into();
        if !options.iter().any(|(oid, _)| *oid == selected) {
            selected = options.first().map(|(oid, _)| oid.clone()).unwrap_or_default();
        }
        Self {
            id: id.into(),
            label: label.into(),
            kind: ChoiceKind::Options { options, selected },
        }
    }

    /// Current value: `"true"`/`"false"` for toggles, the option id otherwise.
    pub fn value(&self) -> String {
        match &self.kind {
            ChoiceKind::Toggle { checked } => checked.to_string(),
            ChoiceKind::Options { selected, .. } => selected.clone(),
        }
    }

    pub(crate) fn set_value(&mut self, value: &str) -> Result<(), SelectorError> {
        let accepted = match &mut self.kind {
            ChoiceKind::Toggle { checked } => match value {
                "true" | "false" => {
                    *checked = value == "true";
                    true
                }
                _ => false,
            },
            ChoiceKind::Options { options, selected } => {
                let known = options.iter().any(|(oid, _)| oid == value);
                if known {
                    *selected = value.to_string();
                }
                known
            }
        };
        if accepted {
            Ok(())
        } else {
            Err(SelectorError::InvalidChoiceValue {
                id: self.id.clone(),
                value: value.to_string(),
            })
        }
    }
}

/// Errors returned by the file selector.
///
/// Resolution failures (see [`SelectorError::is_recoverable`]) leave the
/// dialog presented so the user can correct the input. The remaining variants
/// report misuse of the dialog lifecycle.
#[derive(Error, Debug)]
pub enum SelectorError {
    /// Accept was requested with nothing highlighted
    #[error("nothing is selected")]
    NoSelection,
    /// Save was requested with an empty file name
    #[error("file name is empty")]
    EmptyFilename,
    /// The typed file name cannot name a file in the current directory
    #[error("invalid file name: {0}")]
    InvalidFilename(String),
    /// The resolved target exists and is not a file
    #[error("not a file: {}", .0.display())]
    NotAFile(PathBuf),
    /// The path is missing or not a directory
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// The path is not part of the current listing
    #[error("not in the current listing: {}", .0.display())]
    UnknownEntry(PathBuf),
    /// No choice with this id
    #[error("unknown choice: {0}")]
    UnknownChoice(String),
    /// The value is not valid for the choice
    #[error("invalid value {value:?} for choice {id}")]
    InvalidChoiceValue {
        /// Choice id
        id: String,
        /// Rejected value
        value: String,
    },
    /// `present` was called more than once
    #[error("dialog was already presented")]
    AlreadyPresented,
    /// The operation needs a presented dialog
    #[error("dialog is not presented")]
    NotPresented,
    /// The completion event was already delivered
    #[error("dialog already completed")]
    AlreadyCompleted,
    /// The selection mode cannot change during a session
    #[error("selection mode cannot change while the dialog is active")]
    ModeLocked,
    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SelectorError {
    /// Whether the dialog stays presented after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SelectorError::NoSelection
                | SelectorError::EmptyFilename
                | SelectorError::InvalidFilename(_)
                | SelectorError::NotAFile(_)
                | SelectorError::NotADirectory(_)
                | SelectorError::UnknownEntry(_)
                | SelectorError::UnknownChoice(_)
                | SelectorError::InvalidChoiceValue { .. }
                | SelectorError::Io(_)
        )
    }
}
