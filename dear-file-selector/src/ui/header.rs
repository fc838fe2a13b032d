use std::path::{Component, Path, PathBuf};

use dear_imgui_rs::Ui;

use crate::core::SortMode;
use crate::events::SelectorEvent;
use crate::selector::FileSelector;

pub(super) fn draw(ui: &Ui, selector: &FileSelector, events: &mut Vec<SelectorEvent>) {
    let history = selector.history();

    nav_button(ui, "<##back", "Back", !history.can_go_back(), || {
        events.push(SelectorEvent::Back)
    });
    ui.same_line();
    nav_button(ui, ">##forward", "Forward", !history.can_go_forward(), || {
        events.push(SelectorEvent::Forward)
    });
    ui.same_line();
    nav_button(ui, "^##up", "Parent folder", selector.cwd().parent().is_none(), || {
        events.push(SelectorEvent::NavigateUp)
    });
    ui.same_line();
    if ui.button("Refresh") {
        events.push(SelectorEvent::Refresh);
    }
    ui.same_line();
    draw_breadcrumbs(ui, selector.cwd(), events);

    let mut show_hidden = selector.show_hidden();
    if ui.checkbox("Show hidden", &mut show_hidden) {
        events.push(SelectorEvent::SetShowHidden(show_hidden));
    }

    ui.same_line();
    let (mode, reversed) = selector.sorting();
    ui.set_next_item_width(150.0);
    if let Some(_combo) = ui.begin_combo("Sort", sort_label(mode)) {
        for candidate in [SortMode::DisplayName, SortMode::ModificationTime] {
            if ui
                .selectable_config(sort_label(candidate))
                .selected(candidate == mode)
                .build()
            {
                events.push(SelectorEvent::SetSorting {
                    mode: candidate,
                    reversed,
                });
            }
        }
    }
    ui.same_line();
    let mut descending = reversed;
    if ui.checkbox("Descending", &mut descending) {
        events.push(SelectorEvent::SetSorting {
            mode,
            reversed: descending,
        });
    }

    ui.same_line();
    let mut dirs_first = selector.directories_first();
    if ui.checkbox("Folders first", &mut dirs_first) {
        events.push(SelectorEvent::SetDirectoriesFirst(dirs_first));
    }
}

fn nav_button(ui: &Ui, label: &str, tooltip: &str, disabled: bool, on_click: impl FnOnce()) {
    let clicked = {
        let _disabled = ui.begin_disabled_with_cond(disabled);
        ui.button(label)
    };
    if ui.is_item_hovered() {
        ui.tooltip_text(tooltip);
    }
    if clicked && !disabled {
        on_click();
    }
}

fn draw_breadcrumbs(ui: &Ui, cwd: &Path, events: &mut Vec<SelectorEvent>) {
    let mut acc = PathBuf::new();
    for (i, comp) in cwd.components().enumerate() {
        acc.push(comp.as_os_str());
        let label = match comp {
            Component::RootDir => std::path::MAIN_SEPARATOR_STR.to_string(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        };
        if i > 0 {
            ui.same_line();
        }
        if ui.small_button(format!("{label}##crumb{i}")) {
            events.push(SelectorEvent::NavigateTo(acc.clone()));
        }
    }
}

fn sort_label(mode: SortMode) -> &'static str {
    match mode {
        SortMode::DisplayName => "Name",
        SortMode::ModificationTime => "Modified",
    }
}
