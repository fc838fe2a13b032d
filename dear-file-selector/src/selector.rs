use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::core::{Choice, FileFilter, SelectionMode, SelectorError, SortMode};
use crate::fs::{FileSystem, FsEntry};
use crate::history::DirHistory;
use crate::listing::{self, ListingRules};
use crate::location::{self, is_valid_folder, path_to_location, path_to_uri};
use crate::state::SelectorState;

#[cfg(feature = "tracing")]
use tracing::{debug, error, warn};

/// Lifecycle phase of a [`FileSelector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Configured but not yet shown
    Initial,
    /// Shown and accepting input
    Presented,
    /// Accept was requested; resolving or waiting for overwrite confirmation
    Confirming,
    /// Completion event delivered
    Done {
        /// Whether the user confirmed a selection
        success: bool,
    },
}

/// Result of a single operation on an active selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorOutcome {
    /// Nothing observable changed
    Idle,
    /// The current directory changed
    Navigated(PathBuf),
    /// Saving would replace this file; confirm or reject the overwrite
    AwaitingOverwrite(PathBuf),
    /// The completion event fired
    Completed {
        /// Success flag passed to the completion handler
        success: bool,
    },
}

type DoneHandler = Box<dyn FnOnce(&FileSelector, bool)>;

enum Resolution {
    Complete(Vec<PathBuf>),
    Navigate(PathBuf),
    ConfirmOverwrite(PathBuf),
}

/// File selection dialog core (no ImGui types).
///
/// A selector is configured through setters, presented once, and completes
/// exactly once, either through a successful accept or a cancellation. The
/// handler registered with [`FileSelector::connect_done`] is invoked
/// synchronously at that moment.
///
/// ```no_run
/// use dear_file_selector::{FileSelector, SelectionMode, StdFileSystem};
///
/// let mut selector = FileSelector::new(SelectionMode::SaveFile);
/// selector.set_current_directory("/home/u");
/// selector.set_suggested_filename("report.txt");
/// selector.connect_done(|s, success| {
///     if success {
///         println!("saving to {}", s.selected()[0]);
///     }
/// });
/// selector.present(&StdFileSystem).unwrap();
/// ```
pub struct FileSelector {
    state: SelectorState,
    phase: Phase,
    cwd: PathBuf,
    filename: String,
    raw_entries: Vec<FsEntry>,
    entries: Vec<FsEntry>,
    highlighted: IndexSet<PathBuf>,
    show_hidden: bool,
    sort_mode: SortMode,
    reversed: bool,
    directories_first: bool,
    history: DirHistory,
    pending_overwrite: Option<PathBuf>,
    listing_error: Option<String>,
    used_fallback: bool,
    selected_paths: Vec<PathBuf>,
    on_done: Option<DoneHandler>,
}

impl std::fmt::Debug for FileSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSelector")
            .field("mode", &self.state.mode())
            .field("phase", &self.phase)
            .field("cwd", &self.cwd)
            .field("filename", &self.filename)
            .field("entries", &self.entries.len())
            .field("highlighted", &self.highlighted)
            .field("has_handler", &self.on_done.is_some())
            .finish()
    }
}

impl Default for FileSelector {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl FileSelector {
    /// New selector in `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        Self::with_state(SelectorState::new(mode))
    }

    /// New selector from a prepared configuration.
    pub fn with_state(state: SelectorState) -> Self {
        Self {
            state,
            phase: Phase::Initial,
            cwd: PathBuf::new(),
            filename: String::new(),
            raw_entries: Vec::new(),
            entries: Vec::new(),
            highlighted: IndexSet::new(),
            show_hidden: false,
            sort_mode: SortMode::default(),
            reversed: false,
            directories_first: true,
            history: DirHistory::new(),
            pending_overwrite: None,
            listing_error: None,
            used_fallback: false,
            selected_paths: Vec::new(),
            on_done: None,
        }
    }

    // ----- configuration -----

    /// Configuration and finalized result.
    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    /// Directory the session starts in. Checked at presentation; a missing
    /// directory falls back to [`location::fallback_directory`].
    pub fn set_current_directory(&mut self, path: impl Into<PathBuf>) {
        self.warn_if_started("set_current_directory");
        self.state.set_current_directory(path);
    }

    /// Text of the accept action.
    pub fn set_accept_label(&mut self, label: impl Into<String>) {
        self.warn_if_started("set_accept_label");
        self.state.set_accept_label(label);
    }

    /// Window title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.warn_if_started("set_title");
        self.state.set_title(title);
    }

    /// Initial file name for [`SelectionMode::SaveFile`]; ignored otherwise.
    pub fn set_suggested_filename(&mut self, name: impl Into<String>) {
        self.warn_if_started("set_suggested_filename");
        self.state.set_suggested_filename(name);
    }

    /// Change the selection mode. Rejected once the dialog was presented.
    pub fn set_mode(&mut self, mode: SelectionMode) -> Result<(), SelectorError> {
        if self.phase != Phase::Initial {
            trace_contract_violation("set_mode", "mode is locked while active");
            return Err(SelectorError::ModeLocked);
        }
        self.state.set_mode(mode);
        Ok(())
    }

    /// Current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.state.mode()
    }

    /// Replace the file filters; the first becomes active.
    pub fn set_filters(&mut self, filters: Vec<FileFilter>) {
        self.state.set_filters(filters);
        self.reapply();
    }

    /// Select the active filter (`None` shows all files).
    pub fn set_current_filter(&mut self, index: Option<usize>) {
        self.state.set_current_filter(index);
        self.reapply();
    }

    /// Replace the extra choices.
    pub fn set_choices(&mut self, choices: Vec<Choice>) {
        self.warn_if_started("set_choices");
        self.state.set_choices(choices);
    }

    /// Set the value of a choice.
    pub fn set_choice(&mut self, id: &str, value: &str) -> Result<(), SelectorError> {
        self.ensure_not_done("set_choice")?;
        self.state.set_choice(id, value)
    }

    /// `(id, value)` for every choice.
    pub fn selected_choices(&self) -> Vec<(String, String)> {
        self.state.selected_choices()
    }

    /// Ask before replacing an existing file when saving (on by default).
    pub fn set_confirm_overwrite(&mut self, confirm: bool) {
        self.state.set_confirm_overwrite(confirm);
    }

    /// Register the completion handler. It is invoked once, when the dialog
    /// completes, with the selector and the success flag.
    pub fn connect_done(&mut self, handler: impl FnOnce(&FileSelector, bool) + 'static) {
        if let Phase::Done { .. } = self.phase {
            trace_contract_violation("connect_done", "completion already delivered");
            return;
        }
        if self.on_done.is_some() {
            trace_handler_replaced();
        }
        self.on_done = Some(Box::new(handler));
    }

    // ----- session -----

    /// Show the dialog: resolve the starting directory, seed the file name,
    /// and list the directory.
    pub fn present(&mut self, fs: &dyn FileSystem) -> Result<(), SelectorError> {
        if self.phase != Phase::Initial {
            trace_contract_violation("present", "dialog already presented");
            return Err(SelectorError::AlreadyPresented);
        }
        let requested = self.state.current_directory().map(Path::to_path_buf);
        let (dir, used_fallback) = location::resolve_directory(fs, requested.as_deref());
        if used_fallback && let Some(requested) = &requested {
            trace_directory_fallback(requested, &dir);
        }
        self.used_fallback = used_fallback;
        self.filename = if self.mode().uses_filename() {
            self.state.suggested_filename().to_string()
        } else {
            String::new()
        };
        self.phase = Phase::Presented;
        self.enter(dir, fs, true);
        trace_presented(self.mode(), &self.cwd);
        Ok(())
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the dialog is presented and not yet completed.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Presented | Phase::Confirming)
    }

    /// Whether the completion event was delivered.
    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done { .. })
    }

    /// Directory being browsed.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Whether presentation had to fall back to the default directory.
    pub fn used_fallback_directory(&self) -> bool {
        self.used_fallback
    }

    /// Visible entries of the current directory, filtered and sorted.
    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    /// Message describing why the current directory could not be listed.
    pub fn listing_error(&self) -> Option<&str> {
        self.listing_error.as_deref()
    }

    /// Typed file name (save mode).
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Highlighted entries in pick order.
    pub fn highlighted(&self) -> impl Iterator<Item = &Path> {
        self.highlighted.iter().map(PathBuf::as_path)
    }

    /// Whether `path` is highlighted.
    pub fn is_highlighted(&self, path: &Path) -> bool {
        self.highlighted.contains(path)
    }

    /// Number of highlighted entries.
    pub fn highlighted_count(&self) -> usize {
        self.highlighted.len()
    }

    /// Navigation history.
    pub fn history(&self) -> &DirHistory {
        &self.history
    }

    /// File awaiting overwrite confirmation.
    pub fn pending_overwrite(&self) -> Option<&Path> {
        self.pending_overwrite.as_deref()
    }

    /// Whether dotfiles are listed.
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Active sort key and direction.
    pub fn sorting(&self) -> (SortMode, bool) {
        (self.sort_mode, self.reversed)
    }

    /// Whether directories are listed before files.
    pub fn directories_first(&self) -> bool {
        self.directories_first
    }

    /// Whether accept could currently succeed or make progress.
    pub fn can_accept(&self) -> bool {
        if self.phase != Phase::Presented {
            return false;
        }
        match self.mode() {
            SelectionMode::OpenFile => self.highlighted.len() == 1,
            SelectionMode::SaveFile => location::validate_filename(&self.filename).is_ok(),
            SelectionMode::SaveFiles => true,
        }
    }

    // ----- listing and navigation -----

    /// Show or hide dotfiles.
    pub fn set_show_hidden(&mut self, show: bool) {
        self.show_hidden = show;
        self.reapply();
    }

    /// Sort key and direction.
    pub fn set_sorting(&mut self, mode: SortMode, reversed: bool) {
        self.sort_mode = mode;
        self.reversed = reversed;
        self.reapply();
    }

    /// List directories before files.
    pub fn set_directories_first(&mut self, first: bool) {
        self.directories_first = first;
        self.reapply();
    }

    /// Re-read the current directory.
    pub fn refresh(&mut self, fs: &dyn FileSystem) -> Result<(), SelectorError> {
        self.ensure_presented("refresh")?;
        self.reload(fs);
        Ok(())
    }

    /// Browse `path`; relative paths are resolved against the current
    /// directory.
    pub fn navigate_to(
        &mut self,
        path: impl AsRef<Path>,
        fs: &dyn FileSystem,
    ) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_presented("navigate_to")?;
        let path = self.cwd.join(path.as_ref());
        if !is_valid_folder(fs, &path) {
            return Err(SelectorError::NotADirectory(path));
        }
        self.enter(path, fs, true);
        Ok(SelectorOutcome::Navigated(self.cwd.clone()))
    }

    /// Browse the parent of the current directory.
    pub fn navigate_up(&mut self, fs: &dyn FileSystem) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_presented("navigate_up")?;
        match self.cwd.parent().map(Path::to_path_buf) {
            Some(parent) => self.navigate_to(parent, fs),
            None => Ok(SelectorOutcome::Idle),
        }
    }

    /// Go back in history.
    pub fn go_back(&mut self, fs: &dyn FileSystem) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_presented("go_back")?;
        Ok(match self.history.back() {
            Some(dir) => {
                self.enter(dir, fs, false);
                SelectorOutcome::Navigated(self.cwd.clone())
            }
            None => SelectorOutcome::Idle,
        })
    }

    /// Go forward in history.
    pub fn go_forward(&mut self, fs: &dyn FileSystem) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_presented("go_forward")?;
        Ok(match self.history.forward() {
            Some(dir) => {
                self.enter(dir, fs, false);
                SelectorOutcome::Navigated(self.cwd.clone())
            }
            None => SelectorOutcome::Idle,
        })
    }

    // ----- highlighting -----

    /// Highlight a single entry, replacing the current highlight. In save
    /// mode a highlighted file also fills the file name.
    pub fn highlight(&mut self, path: &Path) -> Result<(), SelectorError> {
        self.ensure_presented("highlight")?;
        let (name, is_dir) = self.lookup(path)?;
        self.highlighted.clear();
        self.highlighted.insert(path.to_path_buf());
        if self.mode().uses_filename() && !is_dir {
            self.filename = name;
        }
        Ok(())
    }

    /// Add or remove an entry from the highlight. Only the multi-selection
    /// mode keeps more than one entry; other modes behave like
    /// [`FileSelector::highlight`].
    pub fn toggle_highlight(&mut self, path: &Path) -> Result<(), SelectorError> {
        if !self.mode().allows_multiple() {
            return self.highlight(path);
        }
        self.ensure_presented("toggle_highlight")?;
        self.lookup(path)?;
        if !self.highlighted.shift_remove(path) {
            self.highlighted.insert(path.to_path_buf());
        }
        Ok(())
    }

    /// Remove every highlight.
    pub fn clear_highlight(&mut self) -> Result<(), SelectorError> {
        self.ensure_presented("clear_highlight")?;
        self.highlighted.clear();
        Ok(())
    }

    /// Double-click: enter a directory, or highlight a file and accept.
    pub fn activate(
        &mut self,
        path: &Path,
        fs: &dyn FileSystem,
    ) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_presented("activate")?;
        let (_, is_dir) = self.lookup(path)?;
        if is_dir {
            return self.navigate_to(path, fs);
        }
        self.highlight(path)?;
        self.accept(fs)
    }

    /// Update the typed file name. Ignored outside save mode.
    pub fn set_filename(&mut self, name: impl Into<String>) -> Result<(), SelectorError> {
        self.ensure_presented("set_filename")?;
        if self.mode().uses_filename() {
            self.filename = name.into();
        }
        Ok(())
    }

    // ----- completion -----

    /// Resolve the current input into a selection.
    ///
    /// Resolution failures are returned as recoverable errors and leave the
    /// dialog presented.
    pub fn accept(&mut self, fs: &dyn FileSystem) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_presented("accept")?;
        self.phase = Phase::Confirming;
        match self.resolve(fs) {
            Ok(Resolution::Complete(paths)) => {
                self.complete(true, paths)?;
                Ok(SelectorOutcome::Completed { success: true })
            }
            Ok(Resolution::Navigate(dir)) => {
                self.phase = Phase::Presented;
                self.enter(dir, fs, true);
                Ok(SelectorOutcome::Navigated(self.cwd.clone()))
            }
            Ok(Resolution::ConfirmOverwrite(target)) => {
                self.pending_overwrite = Some(target.clone());
                Ok(SelectorOutcome::AwaitingOverwrite(target))
            }
            Err(e) => {
                self.phase = Phase::Presented;
                trace_accept_rejected(self.mode(), &e);
                Err(e)
            }
        }
    }

    /// Replace the file awaiting confirmation and complete.
    pub fn confirm_overwrite(&mut self) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_not_done("confirm_overwrite")?;
        match (self.phase, self.pending_overwrite.take()) {
            (Phase::Confirming, Some(target)) => {
                self.complete(true, vec![target])?;
                Ok(SelectorOutcome::Completed { success: true })
            }
            _ => Err(SelectorError::NotPresented),
        }
    }

    /// Keep the existing file and return to the dialog.
    pub fn reject_overwrite(&mut self) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_not_done("reject_overwrite")?;
        if self.phase != Phase::Confirming || self.pending_overwrite.take().is_none() {
            return Err(SelectorError::NotPresented);
        }
        self.phase = Phase::Presented;
        Ok(SelectorOutcome::Idle)
    }

    /// Dismiss the dialog without a selection.
    pub fn cancel(&mut self) -> Result<SelectorOutcome, SelectorError> {
        self.ensure_not_done("cancel")?;
        if self.phase == Phase::Initial {
            return Err(SelectorError::NotPresented);
        }
        self.pending_overwrite = None;
        self.complete(false, Vec::new())?;
        Ok(SelectorOutcome::Completed { success: false })
    }

    /// Finalized locations. Empty before completion and after cancellation.
    pub fn selected(&self) -> &[String] {
        if !self.is_done() {
            trace_selected_before_done();
        }
        self.state.selected()
    }

    /// Finalized selection as paths.
    pub fn selected_paths(&self) -> &[PathBuf] {
        &self.selected_paths
    }

    /// Finalized selection as `file://` URIs.
    pub fn selected_uris(&self) -> Vec<String> {
        self.selected_paths
            .iter()
            .filter_map(|p| path_to_uri(p))
            .collect()
    }

    // ----- internals -----

    fn resolve(&self, fs: &dyn FileSystem) -> Result<Resolution, SelectorError> {
        match self.mode() {
            SelectionMode::OpenFile => {
                let path = self
                    .highlighted
                    .first()
                    .ok_or(SelectorError::NoSelection)?;
                let md = fs.metadata(path)?;
                if md.is_dir {
                    Ok(Resolution::Navigate(path.clone()))
                } else {
                    Ok(Resolution::Complete(vec![path.clone()]))
                }
            }
            SelectionMode::SaveFile => {
                let name = location::validate_filename(&self.filename)?;
                if !is_valid_folder(fs, &self.cwd) {
                    return Err(SelectorError::NotADirectory(self.cwd.clone()));
                }
                let target = self.cwd.join(name);
                match fs.metadata(&target) {
                    Ok(md) if md.is_dir => Err(SelectorError::NotAFile(target)),
                    Ok(_) if self.state.confirm_overwrite() => {
                        Ok(Resolution::ConfirmOverwrite(target))
                    }
                    _ => Ok(Resolution::Complete(vec![target])),
                }
            }
            SelectionMode::SaveFiles => {
                let mut out = Vec::with_capacity(self.highlighted.len());
                for dir in &self.highlighted {
                    if !is_valid_folder(fs, dir) {
                        return Err(SelectorError::NotADirectory(dir.clone()));
                    }
                    out.push(dir.clone());
                }
                Ok(Resolution::Complete(out))
            }
        }
    }

    fn complete(&mut self, success: bool, paths: Vec<PathBuf>) -> Result<(), SelectorError> {
        if self.is_done() {
            trace_contract_violation("complete", "completion already delivered");
            return Err(SelectorError::AlreadyCompleted);
        }
        if success {
            self.state
                .finalize(paths.iter().map(|p| path_to_location(p)).collect());
            self.selected_paths = paths;
        } else {
            self.state.clear_selected();
            self.selected_paths.clear();
        }
        self.phase = Phase::Done { success };
        trace_completed(success, self.selected_paths.len());
        if let Some(handler) = self.on_done.take() {
            handler(&*self, success);
        }
        Ok(())
    }

    fn enter(&mut self, dir: PathBuf, fs: &dyn FileSystem, record_history: bool) {
        self.cwd = dir;
        self.highlighted.clear();
        if record_history {
            self.history.push(self.cwd.clone());
        }
        self.reload(fs);
        trace_navigated(&self.cwd, self.entries.len());
    }

    fn reload(&mut self, fs: &dyn FileSystem) {
        match fs.read_dir(&self.cwd) {
            Ok(entries) => {
                self.raw_entries = entries;
                self.listing_error = None;
            }
            Err(e) => {
                trace_listing_failed(&self.cwd, &e);
                self.raw_entries.clear();
                self.listing_error = Some(format!("Cannot read {}: {e}", self.cwd.display()));
            }
        }
        self.reapply();
    }

    fn reapply(&mut self) {
        let rules = ListingRules {
            show_hidden: self.show_hidden,
            directories_only: self.mode().directories_only(),
            filter: self.state.active_filter(),
            sort_mode: self.sort_mode,
            reversed: self.reversed,
            directories_first: self.directories_first,
        };
        let mut entries = self.raw_entries.clone();
        listing::apply(&mut entries, &rules);
        self.entries = entries;
        let visible = &self.entries;
        self.highlighted
            .retain(|p| visible.iter().any(|e| e.path == *p));
    }

    fn lookup(&self, path: &Path) -> Result<(String, bool), SelectorError> {
        self.entries
            .iter()
            .find(|e| e.path == path)
            .map(|e| (e.name.clone(), e.is_dir))
            .ok_or_else(|| SelectorError::UnknownEntry(path.to_path_buf()))
    }

    fn ensure_not_done(&self, op: &'static str) -> Result<(), SelectorError> {
        if self.is_done() {
            trace_contract_violation(op, "completion already delivered");
            return Err(SelectorError::AlreadyCompleted);
        }
        Ok(())
    }

    fn ensure_presented(&self, op: &'static str) -> Result<(), SelectorError> {
        self.ensure_not_done(op)?;
        if self.phase != Phase::Presented {
            return Err(SelectorError::NotPresented);
        }
        Ok(())
    }

    fn warn_if_started(&self, op: &'static str) {
        if self.phase != Phase::Initial {
            trace_late_configuration(op);
        }
    }
}

impl Drop for FileSelector {
    fn drop(&mut self) {
        // The completion event fires exactly once, even when the host drops
        // an active dialog.
        if self.is_active() {
            let _ = self.cancel();
        }
    }
}

#[cfg(feature = "tracing")]
fn trace_presented(mode: SelectionMode, cwd: &Path) {
    debug!(event = "selector.presented", ?mode, cwd = %cwd.display(), "selector presented");
}

#[cfg(not(feature = "tracing"))]
fn trace_presented(_mode: SelectionMode, _cwd: &Path) {}

#[cfg(feature = "tracing")]
fn trace_directory_fallback(requested: &Path, fallback: &Path) {
    warn!(
        event = "selector.directory_fallback",
        requested = %requested.display(),
        fallback = %fallback.display(),
        "starting directory unavailable, using fallback"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_directory_fallback(_requested: &Path, _fallback: &Path) {}

#[cfg(feature = "tracing")]
fn trace_navigated(cwd: &Path, entries: usize) {
    debug!(event = "selector.navigated", cwd = %cwd.display(), entries, "directory listed");
}

#[cfg(not(feature = "tracing"))]
fn trace_navigated(_cwd: &Path, _entries: usize) {}

#[cfg(feature = "tracing")]
fn trace_listing_failed(cwd: &Path, err: &std::io::Error) {
    warn!(event = "selector.listing_failed", cwd = %cwd.display(), %err, "cannot list directory");
}

#[cfg(not(feature = "tracing"))]
fn trace_listing_failed(_cwd: &Path, _err: &std::io::Error) {}

#[cfg(feature = "tracing")]
fn trace_accept_rejected(mode: SelectionMode, err: &SelectorError) {
    debug!(event = "selector.accept_rejected", ?mode, %err, "accept rejected");
}

#[cfg(not(feature = "tracing"))]
fn trace_accept_rejected(_mode: SelectionMode, _err: &SelectorError) {}

#[cfg(feature = "tracing")]
fn trace_completed(success: bool, selected: usize) {
    debug!(event = "selector.completed", success, selected, "selector completed");
}

#[cfg(not(feature = "tracing"))]
fn trace_completed(_success: bool, _selected: usize) {}

#[cfg(feature = "tracing")]
fn trace_contract_violation(op: &'static str, reason: &'static str) {
    error!(event = "selector.contract_violation", op, reason, "invalid selector call");
}

#[cfg(not(feature = "tracing"))]
fn trace_contract_violation(_op: &'static str, _reason: &'static str) {}

#[cfg(feature = "tracing")]
fn trace_late_configuration(op: &'static str) {
    warn!(event = "selector.late_configuration", op, "configuration changed after presentation");
}

#[cfg(not(feature = "tracing"))]
fn trace_late_configuration(_op: &'static str) {}

#[cfg(feature = "tracing")]
fn trace_handler_replaced() {
    warn!(event = "selector.handler_replaced", "completion handler replaced");
}

#[cfg(not(feature = "tracing"))]
fn trace_handler_replaced() {}

#[cfg(feature = "tracing")]
fn trace_selected_before_done() {
    warn!(event = "selector.selected_before_done", "selection read before completion");
}

#[cfg(not(feature = "tracing"))]
fn trace_selected_before_done() {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fs::FsMetadata;
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    /// In-memory filesystem: a set of directories with their children.
    #[derive(Default)]
    pub(crate) struct TestFs {
        dirs: HashMap<PathBuf, Vec<FsEntry>>,
        files: HashSet<PathBuf>,
        unreadable: HashSet<PathBuf>,
    }

    impl TestFs {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Adds `dir` with children `(name, is_dir)`. Child directories are
        /// registered as empty directories unless added later.
        pub(crate) fn dir(mut self, dir: &str, children: &[(&str, bool)]) -> Self {
            let dir = PathBuf::from(dir);
            let mut entries = Vec::new();
            for &(name, is_dir) in children {
                let path = dir.join(name);
                if is_dir {
                    self.dirs.entry(path.clone()).or_default();
                } else {
                    self.files.insert(path.clone());
                }
                entries.push(FsEntry {
                    name: name.to_string(),
                    path,
                    is_dir,
                    is_symlink: false,
                    size: if is_dir { None } else { Some(42) },
                    modified: None,
                });
            }
            self.dirs.insert(dir, entries);
            self
        }

        pub(crate) fn unreadable(mut self, dir: &str) -> Self {
            self.unreadable.insert(PathBuf::from(dir));
            self
        }

        pub(crate) fn remove(&mut self, path: &str) {
            let path = PathBuf::from(path);
            self.dirs.remove(&path);
            self.files.remove(&path);
        }
    }

    impl FileSystem for TestFs {
        fn read_dir(&self, dir: &Path) -> std::io::Result<Vec<FsEntry>> {
            if self.unreadable.contains(dir) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read_dir failure",
                ));
            }
            self.dirs
                .get(dir)
                .cloned()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
        }

        fn metadata(&self, path: &Path) -> std::io::Result<FsMetadata> {
            if self.dirs.contains_key(path) || self.unreadable.contains(path) {
                return Ok(FsMetadata {
                    is_dir: true,
                    is_symlink: false,
                });
            }
            if self.files.contains(path) {
                return Ok(FsMetadata {
                    is_dir: false,
                    is_symlink: false,
                });
            }
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
        }
    }

    fn home_fs() -> TestFs {
        TestFs::new()
            .dir(
                "/home/u",
                &[
                    ("a.txt", false),
                    ("b.txt", false),
                    ("report.txt", false),
                    ("docs", true),
                    ("music", true),
                    (".config", true),
                ],
            )
            .dir("/home/u/docs", &[("notes.md", false)])
            .dir("/home", &[("u", true)])
    }

    type Record = Rc<RefCell<Vec<(bool, Vec<String>)>>>;

    fn presented(mode: SelectionMode, fs: &TestFs) -> (FileSelector, Record) {
        let mut s = FileSelector::new(mode);
        s.set_current_directory("/home/u");
        let record: Record = Rc::default();
        let r = record.clone();
        s.connect_done(move |sel, ok| r.borrow_mut().push((ok, sel.selected().to_vec())));
        s.present(fs).unwrap();
        (s, record)
    }

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn present_lists_directory_and_moves_to_presented() {
        let fs = home_fs();
        let (s, _) = presented(SelectionMode::OpenFile, &fs);
        assert_eq!(s.phase(), Phase::Presented);
        assert_eq!(s.cwd(), Path::new("/home/u"));
        let names: Vec<&str> = s.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["docs", "music", "a.txt", "b.txt", "report.txt"]);
        assert!(!s.used_fallback_directory());
    }

    #[test]
    fn nonexistent_directory_falls_back() {
        let fs = home_fs();
        let mut s = FileSelector::new(SelectionMode::OpenFile);
        s.set_current_directory("/does/not/exist");
        s.present(&fs).unwrap();
        assert_eq!(s.phase(), Phase::Presented);
        assert!(s.used_fallback_directory());
        assert_eq!(s.cwd(), location::fallback_directory().as_path());
    }

    #[test]
    fn present_twice_is_rejected() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::OpenFile, &fs);
        assert!(matches!(
            s.present(&fs),
            Err(SelectorError::AlreadyPresented)
        ));
    }

    #[test]
    fn open_without_highlight_stays_presented() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::OpenFile, &fs);
        assert!(matches!(s.accept(&fs), Err(SelectorError::NoSelection)));
        assert_eq!(s.phase(), Phase::Presented);
        assert!(record.borrow().is_empty());
    }

    #[test]
    fn open_single_file_completes() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::OpenFile, &fs);
        s.highlight(Path::new("/home/u/b.txt")).unwrap();
        assert_eq!(
            s.accept(&fs).unwrap(),
            SelectorOutcome::Completed { success: true }
        );
        assert_eq!(s.phase(), Phase::Done { success: true });
        assert_eq!(s.selected(), ["/home/u/b.txt"]);
        assert_eq!(
            *record.borrow(),
            vec![(true, vec!["/home/u/b.txt".to_string()])]
        );
    }

    #[test]
    fn open_keeps_a_single_highlight() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::OpenFile, &fs);
        s.highlight(Path::new("/home/u/a.txt")).unwrap();
        s.toggle_highlight(Path::new("/home/u/b.txt")).unwrap();
        assert_eq!(s.highlighted_count(), 1);
        assert!(s.is_highlighted(Path::new("/home/u/b.txt")));
    }

    #[test]
    fn open_on_directory_navigates() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::OpenFile, &fs);
        s.highlight(Path::new("/home/u/docs")).unwrap();
        assert_eq!(
            s.accept(&fs).unwrap(),
            SelectorOutcome::Navigated(p("/home/u/docs"))
        );
        assert_eq!(s.phase(), Phase::Presented);
        assert_eq!(s.highlighted_count(), 0);
        assert!(record.borrow().is_empty());
    }

    #[test]
    fn save_joins_directory_and_filename() {
        let fs = home_fs();
        let mut s = FileSelector::new(SelectionMode::SaveFile);
        s.set_current_directory("/home/u");
        s.set_suggested_filename("new.txt");
        s.present(&fs).unwrap();
        assert_eq!(s.filename(), "new.txt");
        s.accept(&fs).unwrap();
        assert_eq!(s.selected(), ["/home/u/new.txt"]);
    }

    #[test]
    fn save_with_empty_filename_stays_presented() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::SaveFile, &fs);
        assert!(matches!(s.accept(&fs), Err(SelectorError::EmptyFilename)));
        s.set_filename("   ").unwrap();
        assert!(matches!(s.accept(&fs), Err(SelectorError::EmptyFilename)));
        assert_eq!(s.phase(), Phase::Presented);
        assert!(record.borrow().is_empty());
    }

    #[test]
    fn save_onto_directory_is_rejected() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::SaveFile, &fs);
        s.set_filename("docs").unwrap();
        assert!(matches!(s.accept(&fs), Err(SelectorError::NotAFile(_))));
        s.set_filename("../escape.txt").unwrap();
        assert!(matches!(
            s.accept(&fs),
            Err(SelectorError::InvalidFilename(_))
        ));
        assert_eq!(s.phase(), Phase::Presented);
    }

    #[test]
    fn save_existing_file_asks_before_overwriting() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::SaveFile, &fs);
        s.set_filename("report.txt").unwrap();
        assert_eq!(
            s.accept(&fs).unwrap(),
            SelectorOutcome::AwaitingOverwrite(p("/home/u/report.txt"))
        );
        assert_eq!(s.phase(), Phase::Confirming);
        assert!(matches!(s.accept(&fs), Err(SelectorError::NotPresented)));

        assert_eq!(s.reject_overwrite().unwrap(), SelectorOutcome::Idle);
        assert_eq!(s.phase(), Phase::Presented);
        assert!(record.borrow().is_empty());

        s.accept(&fs).unwrap();
        s.confirm_overwrite().unwrap();
        assert_eq!(
            *record.borrow(),
            vec![(true, vec!["/home/u/report.txt".to_string()])]
        );
    }

    #[test]
    fn overwrite_prompt_can_be_disabled() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::SaveFile, &fs);
        s.set_confirm_overwrite(false);
        s.set_filename("report.txt").unwrap();
        assert_eq!(
            s.accept(&fs).unwrap(),
            SelectorOutcome::Completed { success: true }
        );
    }

    #[test]
    fn highlighting_a_file_in_save_mode_fills_filename() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::SaveFile, &fs);
        s.highlight(Path::new("/home/u/a.txt")).unwrap();
        assert_eq!(s.filename(), "a.txt");
        s.highlight(Path::new("/home/u/docs")).unwrap();
        assert_eq!(s.filename(), "a.txt");
    }

    #[test]
    fn save_files_with_nothing_highlighted_succeeds_empty() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::SaveFiles, &fs);
        assert_eq!(
            s.accept(&fs).unwrap(),
            SelectorOutcome::Completed { success: true }
        );
        assert!(s.selected().is_empty());
        assert_eq!(*record.borrow(), vec![(true, Vec::new())]);
    }

    #[test]
    fn save_files_lists_directories_in_pick_order() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::SaveFiles, &fs);
        assert!(s.entries().iter().all(|e| e.is_dir));
        s.toggle_highlight(Path::new("/home/u/music")).unwrap();
        s.toggle_highlight(Path::new("/home/u/docs")).unwrap();
        s.accept(&fs).unwrap();
        assert_eq!(s.selected(), ["/home/u/music", "/home/u/docs"]);
    }

    #[test]
    fn save_files_rejects_vanished_directory() {
        let mut fs = home_fs();
        let (mut s, _) = presented(SelectionMode::SaveFiles, &fs);
        s.toggle_highlight(Path::new("/home/u/docs")).unwrap();
        fs.remove("/home/u/docs");
        assert!(matches!(
            s.accept(&fs),
            Err(SelectorError::NotADirectory(_))
        ));
        assert_eq!(s.phase(), Phase::Presented);
    }

    #[test]
    fn toggle_twice_unhighlights() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::SaveFiles, &fs);
        s.toggle_highlight(Path::new("/home/u/docs")).unwrap();
        s.toggle_highlight(Path::new("/home/u/docs")).unwrap();
        assert_eq!(s.highlighted_count(), 0);
    }

    #[test]
    fn cancel_completes_with_empty_selection() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::OpenFile, &fs);
        s.highlight(Path::new("/home/u/a.txt")).unwrap();
        assert_eq!(
            s.cancel().unwrap(),
            SelectorOutcome::Completed { success: false }
        );
        assert!(s.selected().is_empty());
        assert_eq!(*record.borrow(), vec![(false, Vec::new())]);
    }

    #[test]
    fn cancel_in_every_mode_reports_failure() {
        let fs = home_fs();
        for mode in [
            SelectionMode::OpenFile,
            SelectionMode::SaveFile,
            SelectionMode::SaveFiles,
        ] {
            let (mut s, record) = presented(mode, &fs);
            match mode {
                SelectionMode::OpenFile => s.highlight(Path::new("/home/u/a.txt")).unwrap(),
                SelectionMode::SaveFile => s.set_filename("new.txt").unwrap(),
                SelectionMode::SaveFiles => {
                    s.toggle_highlight(Path::new("/home/u/docs")).unwrap()
                }
            }
            s.cancel().unwrap();
            assert_eq!(s.phase(), Phase::Done { success: false }, "{mode:?}");
            assert!(s.selected().is_empty(), "{mode:?}");
            assert!(s.selected_paths().is_empty(), "{mode:?}");
            assert_eq!(*record.borrow(), vec![(false, Vec::new())], "{mode:?}");
        }
    }

    #[test]
    fn cancel_while_overwrite_pending() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::SaveFile, &fs);
        s.set_filename("report.txt").unwrap();
        assert!(matches!(
            s.accept(&fs).unwrap(),
            SelectorOutcome::AwaitingOverwrite(_)
        ));
        assert_eq!(
            s.cancel().unwrap(),
            SelectorOutcome::Completed { success: false }
        );
        assert!(s.pending_overwrite().is_none());
        assert!(s.selected().is_empty());
        assert!(matches!(
            s.confirm_overwrite(),
            Err(SelectorError::AlreadyCompleted)
        ));
        assert_eq!(*record.borrow(), vec![(false, Vec::new())]);
    }

    #[test]
    fn save_keeps_filename_as_typed() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::SaveFile, &fs);
        s.set_filename(" notes.txt ").unwrap();
        s.accept(&fs).unwrap();
        assert_eq!(s.selected(), ["/home/u/ notes.txt "]);
    }

    #[test]
    fn completion_fires_exactly_once() {
        let fs = home_fs();
        let (mut s, record) = presented(SelectionMode::SaveFiles, &fs);
        s.accept(&fs).unwrap();
        assert!(matches!(s.cancel(), Err(SelectorError::AlreadyCompleted)));
        assert!(matches!(s.accept(&fs), Err(SelectorError::AlreadyCompleted)));
        drop(s);
        assert_eq!(record.borrow().len(), 1);
    }

    #[test]
    fn dropping_active_dialog_delivers_cancel() {
        let fs = home_fs();
        let (s, record) = presented(SelectionMode::OpenFile, &fs);
        drop(s);
        assert_eq!(*record.borrow(), vec![(false, Vec::new())]);
    }

    #[test]
    fn dropping_unpresented_dialog_is_silent() {
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let mut s = FileSelector::new(SelectionMode::OpenFile);
        s.connect_done(move |_, _| f.set(true));
        drop(s);
        assert!(!fired.get());
    }

    #[test]
    fn cancel_before_present_is_rejected() {
        let mut s = FileSelector::new(SelectionMode::OpenFile);
        assert!(matches!(s.cancel(), Err(SelectorError::NotPresented)));
        assert_eq!(s.phase(), Phase::Initial);
    }

    #[test]
    fn mode_is_locked_after_present() {
        let fs = home_fs();
        let mut s = FileSelector::new(SelectionMode::OpenFile);
        s.set_mode(SelectionMode::SaveFile).unwrap();
        s.set_current_directory("/home/u");
        s.present(&fs).unwrap();
        assert!(matches!(
            s.set_mode(SelectionMode::OpenFile),
            Err(SelectorError::ModeLocked)
        ));
        assert_eq!(s.mode(), SelectionMode::SaveFile);
    }

    #[test]
    fn selected_is_empty_before_completion() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::OpenFile, &fs);
        s.highlight(Path::new("/home/u/a.txt")).unwrap();
        assert!(s.selected().is_empty());
    }

    #[test]
    fn unknown_entries_cannot_be_highlighted() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::OpenFile, &fs);
        assert!(matches!(
            s.highlight(Path::new("/etc/passwd")),
            Err(SelectorError::UnknownEntry(_))
        ));
        assert!(matches!(
            s.highlight(Path::new("/home/u/.config")),
            Err(SelectorError::UnknownEntry(_))
        ));
        s.set_show_hidden(true);
        s.highlight(Path::new("/home/u/.config")).unwrap();
        s.set_show_hidden(false);
        assert_eq!(s.highlighted_count(), 0);
    }

    #[test]
    fn navigation_records_history() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::OpenFile, &fs);
        s.navigate_to("docs", &fs).unwrap();
        assert_eq!(s.cwd(), Path::new("/home/u/docs"));
        s.navigate_up(&fs).unwrap();
        s.navigate_up(&fs).unwrap();
        assert_eq!(s.cwd(), Path::new("/home"));
        s.go_back(&fs).unwrap();
        s.go_back(&fs).unwrap();
        assert_eq!(s.cwd(), Path::new("/home/u/docs"));
        s.go_forward(&fs).unwrap();
        assert_eq!(s.cwd(), Path::new("/home/u"));
        assert!(matches!(
            s.navigate_to("a.txt", &fs),
            Err(SelectorError::NotADirectory(_))
        ));
        assert_eq!(s.cwd(), Path::new("/home/u"));
    }

    #[test]
    fn unreadable_directory_leaves_empty_listing() {
        let fs = home_fs().unreadable("/locked");
        let (mut s, _) = presented(SelectionMode::OpenFile, &fs);
        s.navigate_to("/locked", &fs).unwrap();
        assert!(s.entries().is_empty());
        assert!(s.listing_error().is_some());
        s.go_back(&fs).unwrap();
        assert!(s.listing_error().is_none());
    }

    #[test]
    fn activating_a_file_in_open_mode_accepts() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::OpenFile, &fs);
        assert_eq!(
            s.activate(Path::new("/home/u/a.txt"), &fs).unwrap(),
            SelectorOutcome::Completed { success: true }
        );
        assert_eq!(s.selected(), ["/home/u/a.txt"]);
    }

    #[test]
    fn filter_narrows_files() {
        let fs = TestFs::new().dir(
            "/w",
            &[("a.txt", false), ("b.png", false), ("sub", true)],
        );
        let mut s = FileSelector::new(SelectionMode::OpenFile);
        s.set_current_directory("/w");
        s.set_filters(vec![FileFilter::new("Images", ["png"])]);
        s.present(&fs).unwrap();
        let names: Vec<&str> = s.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["sub", "b.png"]);
        s.set_current_filter(None);
        assert_eq!(s.entries().len(), 3);
    }

    #[test]
    fn uris_follow_selection() {
        let fs = home_fs();
        let (mut s, _) = presented(SelectionMode::OpenFile, &fs);
        s.highlight(Path::new("/home/u/a.txt")).unwrap();
        s.accept(&fs).unwrap();
        #[cfg(unix)]
        assert_eq!(s.selected_uris(), ["file:///home/u/a.txt"]);
        assert_eq!(s.selected_paths(), [p("/home/u/a.txt")]);
    }
}
