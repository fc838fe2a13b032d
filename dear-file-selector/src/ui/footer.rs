use dear_imgui_rs::Ui;

use crate::core::{ChoiceKind, SelectionMode};
use crate::dialog_state::FileSelectorState;
use crate::events::SelectorEvent;
use crate::selector::FileSelector;

/// Rows the footer occupies, used to size the file list above it.
pub(super) fn row_count(selector: &FileSelector) -> usize {
    let state = selector.state();
    let mut rows = 1;
    if selector.mode().uses_filename() {
        rows += 1;
    }
    if !state.filters().is_empty() || !state.choices().is_empty() {
        rows += 1;
    }
    rows
}

pub(super) fn draw(ui: &Ui, state: &mut FileSelectorState, events: &mut Vec<SelectorEvent>) {
    let selector = &state.selector;
    let config = selector.state();

    if selector.mode().uses_filename() {
        ui.align_text_to_frame_padding();
        ui.text("Name:");
        ui.same_line();
        if state.ui.focus_filename_next {
            ui.set_keyboard_focus_here();
            state.ui.focus_filename_next = false;
        }
        let mut name = selector.filename().to_string();
        ui.set_next_item_width(-1.0);
        if ui.input_text("##filename", &mut name).build() {
            events.push(SelectorEvent::SetFilename(name));
        }
    }

    let mut first_on_row = true;
    if !config.filters().is_empty() {
        let preview = config
            .active_filter()
            .map_or("All files", |f| f.name.as_str());
        ui.set_next_item_width(180.0);
        if let Some(_combo) = ui.begin_combo("##filter", preview) {
            if ui
                .selectable_config("All files")
                .selected(config.current_filter().is_none())
                .build()
            {
                events.push(SelectorEvent::SetFilter(None));
            }
            for (i, filter) in config.filters().iter().enumerate() {
                if ui
                    .selectable_config(format!("{}##filter{i}", filter.name))
                    .selected(config.current_filter() == Some(i))
                    .build()
                {
                    events.push(SelectorEvent::SetFilter(Some(i)));
                }
            }
        }
        first_on_row = false;
    }

    for choice in config.choices() {
        if !first_on_row {
            ui.same_line();
        }
        first_on_row = false;
        match &choice.kind {
            ChoiceKind::Toggle { checked } => {
                let mut value = *checked;
                if ui.checkbox(format!("{}##choice_{}", choice.label, choice.id), &mut value) {
                    events.push(SelectorEvent::SetChoice {
                        id: choice.id.clone(),
                        value: value.to_string(),
                    });
                }
            }
            ChoiceKind::Options { options, selected } => {
                let preview = options
                    .iter()
                    .find(|(id, _)| id == selected)
                    .map_or("", |(_, label)| label.as_str());
                ui.set_next_item_width(140.0);
                if let Some(_combo) =
                    ui.begin_combo(format!("{}##choice_{}", choice.label, choice.id), preview)
                {
                    for (id, label) in options {
                        if ui
                            .selectable_config(format!("{label}##opt_{id}"))
                            .selected(id == selected)
                            .build()
                        {
                            events.push(SelectorEvent::SetChoice {
                                id: choice.id.clone(),
                                value: id.clone(),
                            });
                        }
                    }
                }
            }
        }
    }

    match selector.mode() {
        SelectionMode::SaveFiles => {
            ui.text_disabled(format!("{} folder(s) selected", selector.highlighted_count()));
        }
        _ => ui.text(""),
    }
    ui.same_line();
    {
        let _disabled = ui.begin_disabled_with_cond(!selector.can_accept());
        if ui.button(format!("{}##accept", config.effective_accept_label())) {
            events.push(SelectorEvent::Accept);
        }
    }
    ui.same_line();
    if ui.button("Cancel") {
        events.push(SelectorEvent::Cancel);
    }
}
