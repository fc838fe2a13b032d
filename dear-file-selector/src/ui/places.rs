use dear_imgui_rs::Ui;

use crate::events::SelectorEvent;
use crate::places::Places;
use crate::selector::FileSelector;

pub(super) fn draw(
    ui: &Ui,
    selector: &FileSelector,
    places: &Places,
    events: &mut Vec<SelectorEvent>,
) {
    ui.text_disabled("Places");
    ui.separator();
    for (i, place) in places.iter().enumerate() {
        let current = selector.cwd() == place.path;
        if ui
            .selectable_config(format!("{}##place{i}", place.label))
            .selected(current)
            .build()
            && !current
        {
            events.push(SelectorEvent::NavigateTo(place.path.clone()));
        }
        if ui.is_item_hovered() {
            ui.tooltip_text(place.path.display().to_string());
        }
    }
}
