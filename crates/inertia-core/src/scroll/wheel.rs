//! L4 Atomic Layer: Wheel input and delta normalization
//!
//! Platforms report wheel deltas in pixels, lines or pages. The engine only
//! works in pixels, so every delta is converted before it reaches the target.

use super::platform::NodeId;

/// Unit of a reported wheel delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// A single captured wheel gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    /// Vertical delta in `mode` units, positive = down
    pub delta_y: f64,
    pub mode: DeltaMode,
    /// Element the pointer was over, if the platform knows
    pub target: Option<NodeId>,
}

impl WheelInput {
    pub fn pixels(delta_y: f64) -> Self {
        Self {
            delta_y,
            mode: DeltaMode::Pixel,
            target: None,
        }
    }

    pub fn lines(delta_y: f64) -> Self {
        Self {
            delta_y,
            mode: DeltaMode::Line,
            target: None,
        }
    }

    pub fn pages(delta_y: f64) -> Self {
        Self {
            delta_y,
            mode: DeltaMode::Page,
            target: None,
        }
    }

    pub fn over(mut self, node: NodeId) -> Self {
        self.target = Some(node);
        self
    }
}

/// What the dispatcher must do with the native event after the engine saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDisposition {
    /// The engine handled it; the native default must be prevented
    Consumed,
    /// Left untouched for the platform (opt-out container, native strategy, detached)
    PassThrough,
}

impl WheelDisposition {
    #[inline]
    pub fn prevents_default(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Convert a wheel delta to pixels
#[inline]
pub fn normalize_delta(input: &WheelInput, line_height: f64, viewport_height: f64) -> f64 {
    match input.mode {
        DeltaMode::Pixel => input.delta_y,
        DeltaMode::Line => input.delta_y * line_height,
        DeltaMode::Page => input.delta_y * viewport_height,
    }
}
