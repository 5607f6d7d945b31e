//! Selection, hover, and connection-mode view state
//!
//! UI state that is not part of the graph itself. The focused neuron
//! (hover winning over selection) is what the highlight computation keys
//! off.

/// Transient view state for the interaction layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    selected: Option<String>,
    hovered: Option<String>,
    panel_open: bool,
    connect_source: Option<String>,
}

impl ViewState {
    /// Fresh state: nothing selected, hovered, or in progress
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a neuron (opens the detail panel) or clear the selection
    pub fn select(&mut self, id: Option<String>) {
        self.panel_open = id.is_some();
        self.selected = id;
    }

    /// The selected neuron, if any
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Set or clear the hovered neuron
    pub fn hover(&mut self, id: Option<String>) {
        self.hovered = id;
    }

    /// The hovered neuron, if any
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// The neuron highlight should radiate from: hover wins over selection
    pub fn focused(&self) -> Option<&str> {
        self.hovered().or_else(|| self.selected())
    }

    /// Open the detail panel
    pub fn open_panel(&mut self) {
        self.panel_open = true;
    }

    /// Close the detail panel, clearing the selection with it
    pub fn close_panel(&mut self) {
        self.panel_open = false;
        self.selected = None;
    }

    /// Returns true while the detail panel is open
    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Enter connection-creation mode from a source neuron
    pub fn start_connect(&mut self, source_id: impl Into<String>) {
        self.connect_source = Some(source_id.into());
    }

    /// Leave connection-creation mode
    pub fn end_connect(&mut self) {
        self.connect_source = None;
    }

    /// The pending connection source while in connection-creation mode
    pub fn connect_source(&self) -> Option<&str> {
        self.connect_source.as_deref()
    }

    /// Returns true while a connection is being created
    pub fn is_connecting(&self) -> bool {
        self.connect_source.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_opens_panel() {
        let mut view = ViewState::new();
        view.select(Some("a".to_string()));
        assert_eq!(view.selected(), Some("a"));
        assert!(view.panel_open());

        view.select(None);
        assert_eq!(view.selected(), None);
        assert!(!view.panel_open());
    }

    #[test]
    fn test_close_panel_clears_selection() {
        let mut view = ViewState::new();
        view.select(Some("a".to_string()));
        view.close_panel();
        assert!(!view.panel_open());
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_focus_prefers_hover() {
        let mut view = ViewState::new();
        view.select(Some("selected".to_string()));
        assert_eq!(view.focused(), Some("selected"));

        view.hover(Some("hovered".to_string()));
        assert_eq!(view.focused(), Some("hovered"));

        view.hover(None);
        assert_eq!(view.focused(), Some("selected"));
    }

    #[test]
    fn test_connect_mode() {
        let mut view = ViewState::new();
        assert!(!view.is_connecting());

        view.start_connect("a");
        assert!(view.is_connecting());
        assert_eq!(view.connect_source(), Some("a"));

        view.end_connect();
        assert!(!view.is_connecting());
        assert_eq!(view.connect_source(), None);
    }
}
