use dear_imgui_rs::{Key, MouseButton, TableColumnFlags, TableFlags, Ui};

use crate::events::SelectorEvent;
use crate::fs::FsEntry;
use crate::selector::FileSelector;

use super::format_size;

pub(super) fn draw(
    ui: &Ui,
    selector: &FileSelector,
    error_color: [f32; 4],
    events: &mut Vec<SelectorEvent>,
) {
    if let Some(err) = selector.listing_error() {
        ui.text_colored(error_color, err);
        return;
    }
    if selector.entries().is_empty() {
        ui.text_disabled("This folder is empty");
        return;
    }

    let flags = TableFlags::RESIZABLE
        | TableFlags::ROW_BG
        | TableFlags::BORDERS_V
        | TableFlags::SCROLL_Y
        | TableFlags::SIZING_STRETCH_PROP;
    let Some(_table) =
        ui.begin_table_with_sizing("##selector_table", 3, flags, [0.0, 0.0], 0.0)
    else {
        return;
    };
    ui.table_setup_column("Name", TableColumnFlags::WIDTH_STRETCH, 0.6, 0);
    ui.table_setup_column("Size", TableColumnFlags::WIDTH_STRETCH, 0.15, 1);
    ui.table_setup_column("Modified", TableColumnFlags::WIDTH_STRETCH, 0.25, 2);
    ui.table_setup_scroll_freeze(0, 1);
    ui.table_headers_row();

    let multi = selector.mode().allows_multiple();
    for (i, entry) in selector.entries().iter().enumerate() {
        ui.table_next_row();
        ui.table_next_column();
        let clicked = ui
            .selectable_config(entry_label(entry, i))
            .selected(selector.is_highlighted(&entry.path))
            .span_all_columns(true)
            .allow_double_click(true)
            .build();
        if clicked {
            let ctrl = ui.is_key_down(Key::LeftCtrl) || ui.is_key_down(Key::RightCtrl);
            let path = entry.path.clone();
            events.push(if ui.is_mouse_double_clicked(MouseButton::Left) {
                SelectorEvent::Activate(path)
            } else if multi && ctrl {
                SelectorEvent::ToggleHighlight(path)
            } else {
                SelectorEvent::Highlight(path)
            });
        }
        if entry.is_symlink && ui.is_item_hovered() {
            ui.tooltip_text("Symbolic link");
        }

        ui.table_next_column();
        ui.text(entry.size.map(format_size).unwrap_or_default());

        ui.table_next_column();
        ui.text(format_modified(entry.modified));
    }
}

fn entry_label(entry: &FsEntry, row: usize) -> String {
    if entry.is_dir {
        format!("[dir] {}##row{row}", entry.name)
    } else {
        format!("{}##row{row}", entry.name)
    }
}

fn format_modified(modified: Option<std::time::SystemTime>) -> String {
    use chrono::{DateTime, Local};
    match modified {
        Some(m) => DateTime::<Local>::from(m).format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}
