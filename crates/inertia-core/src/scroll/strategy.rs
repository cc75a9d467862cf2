//! L3 Molecular Layer: Inertia vs native scrolling
//!
//! A host gets exactly one strategy, chosen once at mount by probing its
//! capabilities. Touch hosts and hosts without a frame scheduler keep their
//! native scrolling; everything else gets the inertia engine.

use tracing::debug;

use super::engine::ScrollEngine;
use super::platform::{FrameId, ScrollPlatform};
use super::wheel::{WheelDisposition, WheelInput};
use crate::config::ScrollConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Inertia,
    Native,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inertia => write!(f, "inertia"),
            Self::Native => write!(f, "native"),
        }
    }
}

/// How platform scroll events are handled for one mounted view
pub trait ScrollStrategy<P: ScrollPlatform + ?Sized> {
    fn kind(&self) -> StrategyKind;

    /// Called once when the provider mounts
    fn attach(&mut self, platform: &mut P);

    fn scroll_to(&mut self, platform: &mut P, y: f64);

    fn on_wheel(&mut self, platform: &mut P, input: &WheelInput) -> WheelDisposition;

    fn on_scroll(&mut self, platform: &mut P);

    fn on_resize(&mut self, platform: &mut P);

    fn on_frame(&mut self, platform: &mut P, frame: FrameId);

    /// Release anything scheduled on the platform. Must be idempotent.
    fn detach(&mut self, platform: &mut P);

    fn is_animating(&self) -> bool;

    /// The engine behind this strategy, if it has one
    fn engine(&self) -> Option<&ScrollEngine> {
        None
    }
}

/// Wheel interception plus lerp easing
#[derive(Debug, Clone)]
pub struct InertiaScrollStrategy {
    engine: ScrollEngine,
}

impl InertiaScrollStrategy {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            engine: ScrollEngine::new(config),
        }
    }
}

impl<P: ScrollPlatform + ?Sized> ScrollStrategy<P> for InertiaScrollStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Inertia
    }

    fn attach(&mut self, platform: &mut P) {
        self.engine.sync_to(&*platform);
    }

    fn scroll_to(&mut self, platform: &mut P, y: f64) {
        self.engine.scroll_to(platform, y);
    }

    fn on_wheel(&mut self, platform: &mut P, input: &WheelInput) -> WheelDisposition {
        self.engine.handle_wheel(platform, input)
    }

    fn on_scroll(&mut self, platform: &mut P) {
        self.engine.handle_scroll(&*platform);
    }

    fn on_resize(&mut self, platform: &mut P) {
        self.engine.handle_resize(&*platform);
    }

    fn on_frame(&mut self, platform: &mut P, frame: FrameId) {
        self.engine.tick(platform, frame);
    }

    fn detach(&mut self, platform: &mut P) {
        self.engine.cancel(platform);
    }

    fn is_animating(&self) -> bool {
        self.engine.is_running()
    }

    fn engine(&self) -> Option<&ScrollEngine> {
        Some(&self.engine)
    }
}

/// Leaves the host alone; `scroll_to` becomes the host's own smooth scroll
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeScrollStrategy;

impl<P: ScrollPlatform + ?Sized> ScrollStrategy<P> for NativeScrollStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Native
    }

    fn attach(&mut self, _platform: &mut P) {}

    fn scroll_to(&mut self, platform: &mut P, y: f64) {
        platform.smooth_scroll_to(y);
    }

    fn on_wheel(&mut self, _platform: &mut P, _input: &WheelInput) -> WheelDisposition {
        WheelDisposition::PassThrough
    }

    fn on_scroll(&mut self, _platform: &mut P) {}

    fn on_resize(&mut self, _platform: &mut P) {}

    fn on_frame(&mut self, _platform: &mut P, _frame: FrameId) {}

    fn detach(&mut self, _platform: &mut P) {}

    fn is_animating(&self) -> bool {
        false
    }
}

/// Probe the host once and pick a strategy
pub fn select_strategy<P: ScrollPlatform + ?Sized>(
    platform: &P,
    config: &ScrollConfig,
) -> Box<dyn ScrollStrategy<P>> {
    let reason = if !config.smooth_enabled {
        Some("smooth scrolling disabled")
    } else if platform.supports_touch() {
        Some("touch-capable host")
    } else if !platform.supports_animation_frames() {
        Some("no animation frame scheduler")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            debug!(reason, "using native scrolling");
            Box::new(NativeScrollStrategy)
        }
        None => {
            debug!(
                ease = config.ease,
                threshold_px = config.threshold_px,
                "using inertia scrolling"
            );
            Box::new(InertiaScrollStrategy::new(config))
        }
    }
}
