use dear_imgui_rs::{Condition, Key, Ui};

use crate::dialog_state::FileSelectorState;
use crate::events::SelectorEvent;
use crate::fs::FileSystem;
use crate::selector::{Phase, SelectorOutcome};

mod file_table;
mod footer;
mod header;
mod places;
mod popups;

/// UI handle for drawing a file selector
pub struct FileSelectorView<'ui> {
    /// ImGui UI context
    pub ui: &'ui Ui,
}

/// Extension trait to obtain a [`FileSelectorView`] from a [`Ui`]
pub trait FileSelectorExt {
    /// Get a file selector UI handle
    fn file_selector(&self) -> FileSelectorView<'_>;
}

impl FileSelectorExt for Ui {
    fn file_selector(&self) -> FileSelectorView<'_> {
        FileSelectorView { ui: self }
    }
}

impl FileSelectorView<'_> {
    /// Draw the selector in its own window.
    ///
    /// Presents the selector on first use. Returns `Some(success)` on the
    /// frame the completion event fires; nothing is drawn once the selector
    /// is done.
    pub fn show(&self, state: &mut FileSelectorState, fs: &dyn FileSystem) -> Option<bool> {
        if !self.ensure_presented(state, fs) {
            return None;
        }
        let title = format!(
            "{}###dear_file_selector",
            state.selector.state().effective_title()
        );
        let mut events = Vec::new();
        self.ui
            .window(title)
            .size(state.ui.window_size, Condition::FirstUseEver)
            .build(|| draw_contents(self.ui, state, &mut events));
        apply_events(state, events, fs)
    }

    /// Draw only the contents into the current window.
    ///
    /// Same contract as [`FileSelectorView::show`], for hosts that manage
    /// the window themselves.
    pub fn draw_contents(
        &self,
        state: &mut FileSelectorState,
        fs: &dyn FileSystem,
    ) -> Option<bool> {
        if !self.ensure_presented(state, fs) {
            return None;
        }
        let mut events = Vec::new();
        draw_contents(self.ui, state, &mut events);
        apply_events(state, events, fs)
    }

    fn ensure_presented(&self, state: &mut FileSelectorState, fs: &dyn FileSystem) -> bool {
        if state.selector.phase() == Phase::Initial
            && let Err(e) = state.selector.present(fs)
        {
            state.ui.error = Some(e.to_string());
            return false;
        }
        state.selector.is_active()
    }
}

fn draw_contents(ui: &Ui, state: &mut FileSelectorState, events: &mut Vec<SelectorEvent>) {
    let mut focused = ui.is_window_focused();

    header::draw(ui, &state.selector, events);
    ui.separator();

    let footer_rows = footer::row_count(&state.selector);
    let reserve = ui.frame_height_with_spacing() * (footer_rows as f32 + 1.0);
    let list_height = (ui.content_region_avail()[1] - reserve).max(80.0);

    if state.ui.show_places {
        let places = &state.ui.places;
        let selector = &state.selector;
        ui.child_window("##selector_places")
            .size([state.ui.places_width, list_height])
            .border(true)
            .build(ui, || {
                places::draw(ui, selector, places, events);
                focused |= ui.is_window_focused();
            });
        ui.same_line();
    }

    ui.child_window("##selector_entries")
        .size([0.0, list_height])
        .border(true)
        .build(ui, || {
            file_table::draw(ui, &state.selector, state.ui.error_color, events);
            focused |= ui.is_window_focused();
        });

    match &state.ui.error {
        Some(err) => ui.text_colored(state.ui.error_color, err),
        None => ui.text(""),
    }

    footer::draw(ui, state, events);
    popups::draw_overwrite_modal(ui, &state.selector, &mut state.ui, events);

    if focused {
        if ui.is_key_pressed(Key::Escape) {
            events.push(SelectorEvent::Cancel);
        } else if ui.is_key_pressed(Key::Enter) {
            events.push(SelectorEvent::Accept);
        }
    }
}

fn apply_events(
    state: &mut FileSelectorState,
    events: Vec<SelectorEvent>,
    fs: &dyn FileSystem,
) -> Option<bool> {
    for event in events {
        match state.selector.handle_event(event, fs) {
            Ok(SelectorOutcome::Completed { success }) => {
                state.ui.error = None;
                return Some(success);
            }
            Ok(SelectorOutcome::AwaitingOverwrite(_)) => {
                state.ui.overwrite_open_next = true;
            }
            Ok(SelectorOutcome::Navigated(_)) => {
                state.ui.error = None;
            }
            Ok(SelectorOutcome::Idle) => {}
            Err(e) => {
                state.ui.error = Some(e.to_string());
            }
        }
    }
    None
}

fn format_size(size: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let s = size as f64;
    if s >= GB {
        format!("{:.2} GB", s / GB)
    } else if s >= MB {
        format!("{:.2} MB", s / MB)
    } else if s >= KB {
        format!("{:.0} KB", s / KB)
    } else {
        format!("{} B", size)
    }
}
