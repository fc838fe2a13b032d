#![deny(missing_docs)]
//! File selection dialog for `dear-imgui-rs`.
//!
//! The dialog supports three modes:
//! - [`SelectionMode::OpenFile`]: pick one existing file
//! - [`SelectionMode::SaveFile`]: pick a directory and type a file name
//! - [`SelectionMode::SaveFiles`]: pick zero or more destination directories
//!
//! [`FileSelector`] is the dialog core. It owns the configuration, the
//! directory listing and the working selection, and fires a single completion
//! event. It has no ImGui dependency and can be driven through
//! [`SelectorEvent`]s from any UI. The `imgui` feature adds
//! [`FileSelectorExt`], which draws the dialog with Dear ImGui.
//!
//! ```no_run
//! # #[cfg(feature = "imgui")]
//! # fn frame(ui: &dear_imgui_rs::Ui, state: &mut dear_file_selector::FileSelectorState) {
//! use dear_file_selector::{FileSelectorExt, StdFileSystem};
//!
//! if let Some(success) = ui.file_selector().show(state, &StdFileSystem) {
//!     if success {
//!         for location in state.selector.selected() {
//!             println!("{location}");
//!         }
//!     }
//! }
//! # }
//! ```
//!
//! Note on UTF-8/CJK: Dear ImGui's default font does not include CJK glyphs.
//! File names in other scripts render as `?` unless a font containing those
//! glyphs is loaded into the font atlas.

mod core;
#[cfg(feature = "imgui")]
mod dialog_state;
mod events;
mod fs;
mod history;
mod listing;
pub mod location;
mod places;
mod selector;
mod state;
#[cfg(feature = "imgui")]
mod ui;

pub use crate::core::{Choice, ChoiceKind, FileFilter, SelectionMode, SelectorError, SortMode};
#[cfg(feature = "imgui")]
pub use dialog_state::{FileSelectorState, FileSelectorUiState};
pub use events::SelectorEvent;
pub use fs::{FileSystem, FsEntry, FsMetadata, StdFileSystem};
pub use history::DirHistory;
pub use places::{Place, PlaceKind, Places, folder_kind, folder_label};
pub use selector::{FileSelector, Phase, SelectorOutcome};
pub use state::SelectorState;
#[cfg(feature = "imgui")]
pub use ui::{FileSelectorExt, FileSelectorView};
