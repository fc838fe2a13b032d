use dear_imgui_rs::{Key, Ui};

use crate::dialog_state::FileSelectorUiState;
use crate::events::SelectorEvent;
use crate::places::folder_label;
use crate::selector::FileSelector;

const OVERWRITE_POPUP_ID: &str = "Replace existing file?";

pub(super) fn draw_overwrite_modal(
    ui: &Ui,
    selector: &FileSelector,
    ui_state: &mut FileSelectorUiState,
    events: &mut Vec<SelectorEvent>,
) {
    if ui_state.overwrite_open_next {
        ui_state.overwrite_open_next = false;
        if !ui.is_popup_open(OVERWRITE_POPUP_ID) {
            ui.open_popup(OVERWRITE_POPUP_ID);
        }
    }

    if let Some(_popup) = ui.begin_modal_popup(OVERWRITE_POPUP_ID) {
        let Some(target) = selector.pending_overwrite() else {
            ui.close_current_popup();
            return;
        };
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folder = target.parent().map(folder_label).unwrap_or_default();
        ui.text(format!("Overwrite existing file \"{name}\" in {folder}?"));
        ui.text_disabled("Replacing it will overwrite its contents.");
        ui.separator();

        if ui.button("Replace") {
            events.push(SelectorEvent::ConfirmOverwrite);
            ui.close_current_popup();
        }
        ui.same_line();
        if ui.button("Cancel##overwrite") || ui.is_key_pressed(Key::Escape) {
            events.push(SelectorEvent::RejectOverwrite);
            ui.close_current_popup();
        }
    }
}
