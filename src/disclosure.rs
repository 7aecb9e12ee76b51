//! Open/closed state for the "connect" widget in the footer.
//!
//! The state machine has two states and renders one of two device modes. In
//! wide mode the widget animates its own width up to the clamped expanded
//! width; in compact mode it stays a round trigger and opens a fixed panel.
//! Width values always come from [`compute_metrics`], so neither rendering can
//! exceed the viewport.

use crate::metrics::{
    compute_metrics, DeviceMode, Viewport, ViewportMetrics, COLLAPSED_COMPACT_WIDTH,
    COLLAPSED_WIDE_WIDTH,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

impl Key {
    pub fn from_key_value(value: &str) -> Self {
        match value {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DisclosureEvent {
    Activate,
    Key(Key),
    PointerDown { inside: bool },
    EntrySelected,
    Dismiss,
    Resize(Viewport),
}

impl DisclosureEvent {
    /// Maps a keydown seen by the trigger. Keys that bubble up from a focused
    /// entry belong to that entry, except Escape.
    pub fn from_trigger_key(key: Key, on_trigger: bool) -> Option<Self> {
        match key {
            Key::Escape => Some(Self::Key(key)),
            Key::Enter | Key::Space if on_trigger => Some(Self::Key(key)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Effect {
    pub changed: bool,
    pub prevent_default: bool,
}

impl Effect {
    const NONE: Self = Self {
        changed: false,
        prevent_default: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisclosureState {
    pub open: bool,
    pub device_mode: DeviceMode,
    pub measured_width: f64,
    item_count: usize,
    metrics: ViewportMetrics,
}

impl DisclosureState {
    pub fn new(viewport: Viewport, item_count: usize) -> Self {
        let metrics = compute_metrics(viewport, Some(item_count));
        let mut state = Self {
            open: false,
            device_mode: metrics.device_mode,
            measured_width: 0.0,
            item_count,
            metrics,
        };
        state.measured_width = state.target_width();
        state
    }

    pub fn metrics(&self) -> &ViewportMetrics {
        &self.metrics
    }

    /// Outside-pointer and Escape listeners are held exactly while open.
    pub fn wants_outside_listeners(&self) -> bool {
        self.open
    }

    pub fn target_width(&self) -> f64 {
        match (self.device_mode, self.open) {
            (DeviceMode::Compact, _) => COLLAPSED_COMPACT_WIDTH,
            (DeviceMode::Wide, false) => COLLAPSED_WIDE_WIDTH,
            (DeviceMode::Wide, true) => self.metrics.expanded_width,
        }
    }

    /// Width of the fixed panel, present only for an open compact widget.
    pub fn panel_width(&self) -> Option<f64> {
        (self.open && self.device_mode == DeviceMode::Compact)
            .then_some(self.metrics.compact_panel_width)
    }

    pub fn shows_inline_entries(&self) -> bool {
        self.open && self.device_mode == DeviceMode::Wide
    }

    pub fn apply(&mut self, event: DisclosureEvent) -> Effect {
        match event {
            DisclosureEvent::Activate => self.set_open(!self.open),
            DisclosureEvent::Key(Key::Enter | Key::Space) => Effect {
                prevent_default: true,
                ..self.set_open(!self.open)
            },
            DisclosureEvent::Key(Key::Escape) => self.set_open(false),
            DisclosureEvent::Key(Key::Other) => Effect::NONE,
            DisclosureEvent::PointerDown { inside: true } => Effect::NONE,
            DisclosureEvent::PointerDown { inside: false }
            | DisclosureEvent::EntrySelected
            | DisclosureEvent::Dismiss => self.set_open(false),
            DisclosureEvent::Resize(viewport) => self.resize(viewport),
        }
    }

    fn set_open(&mut self, open: bool) -> Effect {
        if self.open == open {
            return Effect::NONE;
        }
        self.open = open;
        self.measured_width = self.target_width();
        Effect {
            changed: true,
            prevent_default: false,
        }
    }

    fn resize(&mut self, viewport: Viewport) -> Effect {
        let metrics = compute_metrics(viewport, Some(self.item_count));
        if metrics == self.metrics {
            return Effect::NONE;
        }
        self.metrics = metrics;
        self.device_mode = metrics.device_mode;
        self.measured_width = self.target_width();
        Effect {
            changed: true,
            prevent_default: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: Viewport = Viewport::new(1280.0, 800.0);
    const PHONE: Viewport = Viewport::new(390.0, 844.0);

    #[test]
    fn starts_closed_without_listeners() {
        let state = DisclosureState::new(DESKTOP, 5);

        assert!(!state.open);
        assert!(!state.wants_outside_listeners());
        assert_eq!(state.measured_width, COLLAPSED_WIDE_WIDTH);
    }

    #[test]
    fn click_opens_and_escape_closes() {
        let mut state = DisclosureState::new(DESKTOP, 5);

        assert!(state.apply(DisclosureEvent::Activate).changed);
        assert!(state.open);
        assert!(state.wants_outside_listeners());
        assert_eq!(state.measured_width, 630.0);

        assert!(state.apply(DisclosureEvent::Key(Key::Escape)).changed);
        assert!(!state.open);
        assert!(!state.wants_outside_listeners());
    }

    #[test]
    fn outside_pointer_closes_but_inside_does_not() {
        let mut state = DisclosureState::new(DESKTOP, 5);
        state.apply(DisclosureEvent::Activate);

        assert_eq!(
            state.apply(DisclosureEvent::PointerDown { inside: true }),
            Effect::default()
        );
        assert!(state.open);

        state.apply(DisclosureEvent::PointerDown { inside: false });
        assert!(!state.open);
    }

    #[test]
    fn enter_and_space_toggle_and_claim_the_key() {
        let mut state = DisclosureState::new(DESKTOP, 5);

        let effect = state.apply(DisclosureEvent::Key(Key::from_key_value("Enter")));
        assert!(effect.changed && effect.prevent_default);
        assert!(state.open);

        let effect = state.apply(DisclosureEvent::Key(Key::from_key_value(" ")));
        assert!(effect.changed && effect.prevent_default);
        assert!(!state.open);

        let effect = state.apply(DisclosureEvent::Key(Key::from_key_value("Tab")));
        assert_eq!(effect, Effect::default());
    }

    #[test]
    fn keys_from_a_focused_entry_are_left_to_the_entry() {
        let mut state = DisclosureState::new(DESKTOP, 5);
        state.apply(DisclosureEvent::Activate);

        assert_eq!(DisclosureEvent::from_trigger_key(Key::Enter, false), None);
        assert_eq!(DisclosureEvent::from_trigger_key(Key::Space, false), None);
        assert!(state.open);

        let escape = DisclosureEvent::from_trigger_key(Key::Escape, false).expect("escape closes");
        assert!(state.apply(escape).changed);
        assert!(!state.open);

        let enter = DisclosureEvent::from_trigger_key(Key::Enter, true).expect("trigger key");
        assert!(state.apply(enter).prevent_default);
        assert!(state.open);
        assert_eq!(DisclosureEvent::from_trigger_key(Key::Other, true), None);
    }

    #[test]
    fn repeat_click_and_entry_selection_close() {
        let mut state = DisclosureState::new(PHONE, 5);

        state.apply(DisclosureEvent::Activate);
        state.apply(DisclosureEvent::Activate);
        assert!(!state.open);

        state.apply(DisclosureEvent::Activate);
        state.apply(DisclosureEvent::EntrySelected);
        assert!(!state.open);

        state.apply(DisclosureEvent::Activate);
        state.apply(DisclosureEvent::Dismiss);
        assert!(!state.open);
    }

    #[test]
    fn compact_mode_opens_a_capped_panel() {
        let mut state = DisclosureState::new(Viewport::new(280.0, 600.0), 5);
        state.apply(DisclosureEvent::Activate);

        assert_eq!(state.device_mode, DeviceMode::Compact);
        assert_eq!(state.measured_width, COLLAPSED_COMPACT_WIDTH);
        assert_eq!(state.panel_width(), Some(248.0));
        assert!(!state.shows_inline_entries());
    }

    #[test]
    fn shrinking_while_open_switches_mode_and_stays_inside_viewport() {
        let mut state = DisclosureState::new(DESKTOP, 5);
        state.apply(DisclosureEvent::Activate);
        assert!(state.shows_inline_entries());

        let narrow = Viewport::new(600.0, 800.0);
        assert!(state.apply(DisclosureEvent::Resize(narrow)).changed);

        assert!(state.open);
        assert_eq!(state.device_mode, DeviceMode::Compact);
        assert!(state.measured_width <= narrow.width);
        assert!(state.panel_width().is_some_and(|width| width <= narrow.width));
    }

    #[test]
    fn resize_while_open_tracks_expanded_width_live() {
        let mut state = DisclosureState::new(DESKTOP, 8);
        state.apply(DisclosureEvent::Activate);
        assert_eq!(state.measured_width, 900.0);

        state.apply(DisclosureEvent::Resize(Viewport::new(820.0, 800.0)));
        assert_eq!(state.measured_width, 788.0);
        assert_eq!(state.device_mode, DeviceMode::Wide);
    }

    #[test]
    fn identical_resize_is_a_no_op() {
        let mut state = DisclosureState::new(DESKTOP, 5);
        assert_eq!(state.apply(DisclosureEvent::Resize(DESKTOP)), Effect::default());
    }
}
