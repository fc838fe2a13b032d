use std::path::PathBuf;

use crate::core::{SelectorError, SortMode};
use crate::fs::FileSystem;
use crate::selector::{FileSelector, SelectorOutcome};

/// A single user interaction, expressed as data.
///
/// The ImGui layer turns widget activity into these events; hosts with their
/// own UI can drive a [`FileSelector`] the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorEvent {
    /// Click on an entry
    Highlight(PathBuf),
    /// Ctrl-click on an entry
    ToggleHighlight(PathBuf),
    /// Click on empty space
    ClearHighlight,
    /// Double-click on an entry
    Activate(PathBuf),
    /// Breadcrumb, place, or typed path
    NavigateTo(PathBuf),
    /// Parent directory
    NavigateUp,
    /// History back
    Back,
    /// History forward
    Forward,
    /// Re-read the current directory
    Refresh,
    /// File name entry edited
    SetFilename(String),
    /// Hidden files toggle
    SetShowHidden(bool),
    /// Sort key and direction
    SetSorting {
        /// Sort key
        mode: SortMode,
        /// Descending order
        reversed: bool,
    },
    /// Directories-first toggle
    SetDirectoriesFirst(bool),
    /// Filter combo
    SetFilter(Option<usize>),
    /// Choice widget
    SetChoice {
        /// Choice id
        id: String,
        /// New value
        value: String,
    },
    /// Accept button or Enter
    Accept,
    /// "Replace" in the overwrite prompt
    ConfirmOverwrite,
    /// "Cancel" in the overwrite prompt
    RejectOverwrite,
    /// Cancel button, Escape, or window close
    Cancel,
}

impl FileSelector {
    /// Apply one event.
    pub fn handle_event(
        &mut self,
        event: SelectorEvent,
        fs: &dyn FileSystem,
    ) -> Result<SelectorOutcome, SelectorError> {
        use SelectorEvent as E;
        let idle = |r: Result<(), SelectorError>| r.map(|()| SelectorOutcome::Idle);
        match event {
            E::Highlight(path) => idle(self.highlight(&path)),
            E::ToggleHighlight(path) => idle(self.toggle_highlight(&path)),
            E::ClearHighlight => idle(self.clear_highlight()),
            E::Activate(path) => self.activate(&path, fs),
            E::NavigateTo(path) => self.navigate_to(path, fs),
            E::NavigateUp => self.navigate_up(fs),
            E::Back => self.go_back(fs),
            E::Forward => self.go_forward(fs),
            E::Refresh => idle(self.refresh(fs)),
            E::SetFilename(name) => idle(self.set_filename(name)),
            E::SetShowHidden(show) => {
                self.set_show_hidden(show);
                Ok(SelectorOutcome::Idle)
            }
            E::SetSorting { mode, reversed } => {
                self.set_sorting(mode, reversed);
                Ok(SelectorOutcome::Idle)
            }
            E::SetDirectoriesFirst(first) => {
                self.set_directories_first(first);
                Ok(SelectorOutcome::Idle)
            }
            E::SetFilter(index) => {
                self.set_current_filter(index);
                Ok(SelectorOutcome::Idle)
            }
            E::SetChoice { id, value } => idle(self.set_choice(&id, &value)),
            E::Accept => self.accept(fs),
            E::ConfirmOverwrite => self.confirm_overwrite(),
            E::RejectOverwrite => self.reject_overwrite(),
            E::Cancel => self.cancel(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Choice, SelectionMode};
    use crate::selector::Phase;
    use crate::selector::tests::TestFs;
    use std::path::Path;

    fn fs() -> TestFs {
        TestFs::new()
            .dir("/w", &[("a.txt", false), ("b.txt", false), ("sub", true)])
            .dir("/w/sub", &[("c.txt", false)])
    }

    fn presented(mode: SelectionMode, fs: &TestFs) -> FileSelector {
        let mut s = FileSelector::new(mode);
        s.set_current_directory("/w");
        s.present(fs).unwrap();
        s
    }

    #[test]
    fn save_flow_through_events() {
        let fs = fs();
        let mut s = presented(SelectionMode::SaveFile, &fs);
        s.handle_event(SelectorEvent::SetFilename("out.txt".into()), &fs)
            .unwrap();
        let out = s.handle_event(SelectorEvent::Accept, &fs).unwrap();
        assert_eq!(out, SelectorOutcome::Completed { success: true });
        assert_eq!(s.selected_paths(), [Path::new("/w/out.txt").to_path_buf()]);
    }

    #[test]
    fn overwrite_events() {
        let fs = fs();
        let mut s = presented(SelectionMode::SaveFile, &fs);
        s.handle_event(SelectorEvent::Highlight("/w/a.txt".into()), &fs)
            .unwrap();
        assert_eq!(
            s.handle_event(SelectorEvent::Accept, &fs).unwrap(),
            SelectorOutcome::AwaitingOverwrite("/w/a.txt".into())
        );
        s.handle_event(SelectorEvent::RejectOverwrite, &fs).unwrap();
        assert_eq!(s.phase(), Phase::Presented);
        s.handle_event(SelectorEvent::Accept, &fs).unwrap();
        s.handle_event(SelectorEvent::ConfirmOverwrite, &fs).unwrap();
        assert_eq!(s.phase(), Phase::Done { success: true });
    }

    #[test]
    fn activate_directory_then_back() {
        let fs = fs();
        let mut s = presented(SelectionMode::OpenFile, &fs);
        assert_eq!(
            s.handle_event(SelectorEvent::Activate("/w/sub".into()), &fs)
                .unwrap(),
            SelectorOutcome::Navigated("/w/sub".into())
        );
        assert_eq!(
            s.handle_event(SelectorEvent::Back, &fs).unwrap(),
            SelectorOutcome::Navigated("/w".into())
        );
        assert_eq!(
            s.handle_event(SelectorEvent::Back, &fs).unwrap(),
            SelectorOutcome::Idle
        );
    }

    #[test]
    fn recoverable_errors_keep_dialog_open() {
        let fs = fs();
        let mut s = presented(SelectionMode::OpenFile, &fs);
        let err = s.handle_event(SelectorEvent::Accept, &fs).unwrap_err();
        assert!(err.is_recoverable());
        let err = s
            .handle_event(SelectorEvent::NavigateTo("/nowhere".into()), &fs)
            .unwrap_err();
        assert!(err.is_recoverable());
        assert!(s.is_active());
    }

    #[test]
    fn choice_and_cancel_events() {
        let fs = fs();
        let mut s = FileSelector::new(SelectionMode::OpenFile);
        s.set_current_directory("/w");
        s.set_choices(vec![Choice::toggle("ro", "Read-only", false)]);
        s.present(&fs).unwrap();
        s.handle_event(
            SelectorEvent::SetChoice {
                id: "ro".into(),
                value: "true".into(),
            },
            &fs,
        )
        .unwrap();
        assert_eq!(s.selected_choices(), [("ro".to_string(), "true".to_string())]);
        assert_eq!(
            s.handle_event(SelectorEvent::Cancel, &fs).unwrap(),
            SelectorOutcome::Completed { success: false }
        );
        assert!(matches!(
            s.handle_event(SelectorEvent::Cancel, &fs),
            Err(SelectorError::AlreadyCompleted)
        ));
    }
}
