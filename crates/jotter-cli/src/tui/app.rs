//! Application state and navigation

use jotter_core::{Collection, ConfirmationRequest, EntryId};

use super::surface::{Row, TuiUi};

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Typing a new text (after pressing a)
    Insert,
    /// Waiting for y/n on a destructive action
    Confirm,
}

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Texts,
    Favorites,
    Important,
}

impl ActivePane {
    /// Move to the next pane (wrapping)
    pub fn next(self) -> Self {
        match self {
            ActivePane::Texts => ActivePane::Favorites,
            ActivePane::Favorites => ActivePane::Important,
            ActivePane::Important => ActivePane::Texts,
        }
    }

    /// Move to the previous pane (wrapping)
    pub fn prev(self) -> Self {
        match self {
            ActivePane::Texts => ActivePane::Important,
            ActivePane::Favorites => ActivePane::Texts,
            ActivePane::Important => ActivePane::Favorites,
        }
    }

    /// Collection shown in this pane
    pub fn collection(self) -> Collection {
        match self {
            ActivePane::Texts => Collection::Texts,
            ActivePane::Favorites => Collection::Favorites,
            ActivePane::Important => Collection::Important,
        }
    }

    fn index(self) -> usize {
        match self {
            ActivePane::Texts => 0,
            ActivePane::Favorites => 1,
            ActivePane::Important => 2,
        }
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Which pane has focus
    pub active_pane: ActivePane,
    /// Selected row per pane
    selected: [usize; 3],
    /// Destructive action waiting for y/n
    pub pending_confirmation: Option<ConfirmationRequest>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            active_pane: ActivePane::Texts,
            selected: [0; 3],
            pending_confirmation: None,
            show_help: false,
        }
    }

    /// Selected row index in a pane
    pub fn selected(&self, pane: ActivePane) -> usize {
        self.selected[pane.index()]
    }

    /// Currently selected row of the focused pane
    pub fn current_row<'a>(&self, ui: &'a TuiUi) -> Option<&'a Row> {
        ui.rows(self.active_pane.collection())
            .get(self.selected(self.active_pane))
    }

    /// Id of the currently selected row
    pub fn current_id(&self, ui: &TuiUi) -> Option<EntryId> {
        self.current_row(ui).map(|row| row.id)
    }

    /// Move selection up in the current pane
    pub fn move_up(&mut self) {
        let index = &mut self.selected[self.active_pane.index()];
        *index = index.saturating_sub(1);
    }

    /// Move selection down in the current pane
    pub fn move_down(&mut self, ui: &TuiUi) {
        let len = ui.rows(self.active_pane.collection()).len();
        let index = &mut self.selected[self.active_pane.index()];
        if *index < len.saturating_sub(1) {
            *index += 1;
        }
    }

    /// Move selection to first item (vim 'g')
    pub fn move_to_first(&mut self) {
        self.selected[self.active_pane.index()] = 0;
    }

    /// Move selection to last item (vim 'G')
    pub fn move_to_last(&mut self, ui: &TuiUi) {
        let len = ui.rows(self.active_pane.collection()).len();
        self.selected[self.active_pane.index()] = len.saturating_sub(1);
    }

    /// Keep every selection inside its list after a change
    pub fn clamp_selection(&mut self, ui: &TuiUi) {
        for pane in [ActivePane::Texts, ActivePane::Favorites, ActivePane::Important] {
            let len = ui.rows(pane.collection()).len();
            let index = &mut self.selected[pane.index()];
            *index = (*index).min(len.saturating_sub(1));
        }
    }

    /// Move focus to the next pane
    pub fn next_pane(&mut self) {
        self.active_pane = self.active_pane.next();
    }

    /// Move focus to the previous pane
    pub fn prev_pane(&mut self) {
        self.active_pane = self.active_pane.prev();
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn enter_insert_mode(&mut self) {
        self.input_mode = InputMode::Insert;
    }

    /// Show a confirmation prompt for a pending action
    pub fn begin_confirmation(&mut self, request: ConfirmationRequest) {
        self.pending_confirmation = Some(request);
        self.input_mode = InputMode::Confirm;
    }

    /// Leave insert/confirm mode
    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.pending_confirmation = None;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
