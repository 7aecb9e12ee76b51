//! Layout and animation parameters derived from the current viewport.
//!
//! Everything here is a pure function of the viewport size (and optionally the
//! number of entries a widget renders). Components re-run [`compute_metrics`]
//! on every resize and render with the result.

pub const COMPACT_BREAKPOINT: f64 = 768.0;
pub const VIEWPORT_MARGIN: f64 = 32.0;
pub const HALF_WIDTH_MARGIN: f64 = 16.0;

pub const DISTANCE_FLOOR: f64 = 48.0;
const DISTANCE_TIERS: [(f64, f64); 3] = [(480.0, 80.0), (640.0, 120.0), (1024.0, 200.0)];
const DISTANCE_WIDE: f64 = 320.0;

pub const EXPANDED_BASE_WIDTH: f64 = 180.0;
pub const EXPANDED_PER_ITEM: f64 = 90.0;
pub const COLLAPSED_WIDE_WIDTH: f64 = EXPANDED_BASE_WIDTH;
pub const COLLAPSED_COMPACT_WIDTH: f64 = 56.0;

pub const COMPACT_PANEL_WIDTH: f64 = 256.0;
pub const COMPACT_PANEL_OFFSET: f64 = 56.0;
pub const COMPACT_PANEL_MIN_HEIGHT: f64 = 120.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceMode {
    Compact,
    Wide,
}

impl DeviceMode {
    pub fn for_width(width: f64) -> Self {
        if width < COMPACT_BREAKPOINT {
            Self::Compact
        } else {
            Self::Wide
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Wide => "wide",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// No layout has happened yet, or the host reported garbage.
    pub fn is_unmeasured(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    pub animation_distance: f64,
    pub expanded_width: f64,
    pub compact_panel_width: f64,
    pub compact_panel_max_height: f64,
    pub device_mode: DeviceMode,
}

impl ViewportMetrics {
    pub const fn floor() -> Self {
        Self {
            animation_distance: DISTANCE_FLOOR,
            expanded_width: EXPANDED_BASE_WIDTH,
            compact_panel_width: COMPACT_PANEL_WIDTH,
            compact_panel_max_height: COMPACT_PANEL_MIN_HEIGHT,
            device_mode: DeviceMode::Compact,
        }
    }
}

pub fn compute_metrics(viewport: Viewport, item_count: Option<usize>) -> ViewportMetrics {
    if viewport.is_unmeasured() {
        return ViewportMetrics::floor();
    }

    let width = viewport.width;
    let usable = width - VIEWPORT_MARGIN;

    ViewportMetrics {
        animation_distance: animation_distance(width),
        expanded_width: desired_expanded_width(item_count)
            .min(usable)
            .max(EXPANDED_BASE_WIDTH),
        compact_panel_width: COMPACT_PANEL_WIDTH.min(usable).max(0.0),
        compact_panel_max_height: (viewport.height - COMPACT_PANEL_OFFSET - VIEWPORT_MARGIN)
            .max(COMPACT_PANEL_MIN_HEIGHT),
        device_mode: DeviceMode::for_width(width),
    }
}

fn animation_distance(width: f64) -> f64 {
    let tier = DISTANCE_TIERS
        .iter()
        .find(|(limit, _)| width < *limit)
        .map(|(_, distance)| *distance)
        .unwrap_or(DISTANCE_WIDE);

    tier.min(width / 2.0 - HALF_WIDTH_MARGIN).max(DISTANCE_FLOOR)
}

fn desired_expanded_width(item_count: Option<usize>) -> f64 {
    match item_count {
        Some(count) => EXPANDED_BASE_WIDTH + count as f64 * EXPANDED_PER_ITEM,
        None => EXPANDED_BASE_WIDTH,
    }
}
