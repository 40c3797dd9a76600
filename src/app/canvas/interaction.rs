use eframe::egui::{self, Pos2, Rect, Ui};
use tracing::debug;

use crate::treemap::ClickOutcome;

use super::super::ViewModel;
use super::super::render_utils::screen_to_layout;

impl ViewModel {
    pub(in crate::app) fn handle_canvas_input(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
        tiles_screen: Rect,
        now: f64,
    ) {
        if self.treemap.is_animating() {
            self.hovered = None;
            return;
        }

        self.hovered = response
            .hover_pos()
            .filter(|pointer| tiles_screen.contains(*pointer))
            .and_then(|pointer| self.hovered_index(screen_to_layout(tiles_screen, pointer)));

        let hovered_drillable = self
            .hovered
            .and_then(|index| self.treemap.navigator().current().tiles.get(index))
            .is_some_and(|tile| tile.drillable);
        if hovered_drillable {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let Some(pointer) = response.interact_pointer_pos() else {
                return;
            };
            let outcome = self.treemap.click(screen_to_layout(tiles_screen, pointer), now);
            debug!(?outcome, "treemap click");
            if outcome != ClickOutcome::Ignored {
                self.hovered = None;
            }
            return;
        }

        let escape_pressed = ui.memory(|memory| memory.focused().is_none())
            && ui.input(|input| input.key_pressed(egui::Key::Escape));
        if (response.clicked_by(egui::PointerButton::Secondary) || escape_pressed)
            && self.treemap.request_drill_up(now)
        {
            self.hovered = None;
        }
    }

    /// Any tile under `pos`, drillable or not, for the details panel.
    fn hovered_index(&self, pos: Pos2) -> Option<usize> {
        self.treemap
            .navigator()
            .current()
            .layout
            .tiles
            .iter()
            .position(|rect| rect.contains(pos))
    }
}
