use shopdash::State;
use throbber_widgets_tui::ThrobberState;

/// UI-only state: nothing here is persisted.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pub exit: bool,
    pub selected: usize,
    pub throbber_state: ThrobberState,
    pub draw_event: u8,
}

impl State for InputState {}

impl InputState {
    pub fn is_exit(&self) -> bool {
        self.exit
    }

    pub fn set_exit(self) -> Self {
        Self { exit: true, ..self }
    }

    pub fn send_draw_event(self) -> Self {
        Self {
            draw_event: self.draw_event.wrapping_add(1),
            ..self
        }
    }

    pub fn select_up(self) -> Self {
        Self {
            selected: self.selected.saturating_sub(1),
            ..self
        }
    }

    /// `len` is the number of visible cards.
    pub fn select_down(self, len: usize) -> Self {
        let last = len.saturating_sub(1);
        Self {
            selected: (self.selected + 1).min(last),
            ..self
        }
    }

    pub fn reset_selection(self) -> Self {
        Self { selected: 0, ..self }
    }

    pub fn on_tick(self) -> Self {
        let mut throbber_state = self.throbber_state.clone();
        throbber_state.calc_next();
        Self {
            throbber_state,
            ..self
        }
    }
}
