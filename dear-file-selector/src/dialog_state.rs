use crate::core::SelectionMode;
use crate::places::Places;
use crate::selector::FileSelector;

/// UI-only state for hosting a [`FileSelector`] in ImGui.
#[derive(Clone, Debug)]
pub struct FileSelectorUiState {
    /// Show the places pane on the left
    pub show_places: bool,
    /// Width of the places pane in pixels
    pub places_width: f32,
    /// Initial window size
    pub window_size: [f32; 2],
    /// Color of inline error text
    pub error_color: [f32; 4],
    /// Places shown in the side pane
    pub places: Places,
    /// Last recoverable error, shown under the file list
    pub error: Option<String>,
    /// Open the overwrite prompt on the next frame
    pub(crate) overwrite_open_next: bool,
    /// Move keyboard focus to the file name entry on the next frame
    pub(crate) focus_filename_next: bool,
}

impl Default for FileSelectorUiState {
    fn default() -> Self {
        Self {
            show_places: true,
            places_width: 160.0,
            window_size: [760.0, 520.0],
            error_color: [1.0, 0.3, 0.3, 1.0],
            places: Places::discover(),
            error: None,
            overwrite_open_next: false,
            focus_filename_next: true,
        }
    }
}

/// Combined state: the dialog core plus its ImGui presentation state.
#[derive(Debug)]
pub struct FileSelectorState {
    /// Dialog core (selection logic, no ImGui types)
    pub selector: FileSelector,
    /// Presentation state
    pub ui: FileSelectorUiState,
}

impl FileSelectorState {
    /// New state for `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        Self::from_selector(FileSelector::new(mode))
    }

    /// Wrap an already configured selector.
    pub fn from_selector(selector: FileSelector) -> Self {
        Self {
            selector,
            ui: FileSelectorUiState::default(),
        }
    }
}
