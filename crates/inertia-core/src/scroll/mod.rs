//! Inertia scrolling
//!
//! Replaces a host's native wheel scrolling with a lerp-eased loop driven by
//! animation frames, and lets other components request eased scrolls through
//! a scoped handle instead of jumping.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `timing` - Interpolation, clamping and settle estimates
//! - `wheel` - Wheel input and delta normalization
//! - `platform` - Traits the host implements (surface, frames, element tree)
//!
//! ## L3 Molecular Layer
//! - `engine` - The current/target state machine
//! - `strategy` - Inertia vs native, chosen by capability probe
//!
//! ## L2 Organism Layer
//! - `provider` - Mount/teardown scope and the consumer `ScrollHandle`
//!
//! `headless` is an in-memory host for tests and simulation.
//!
//! # Usage
//!
//! ```ignore
//! use inertia_core::scroll::{HeadlessSurface, ScrollApi, ScrollProvider, WheelInput};
//!
//! let provider = ScrollProvider::mount(HeadlessSurface::new(3000.0, 1000.0), &config.scroll);
//! let back_to_top = provider.handle();
//!
//! // Host event wiring
//! if provider.dispatch_wheel(&WheelInput::lines(3.0)).prevents_default() {
//!     // suppress the native scroll
//! }
//! while let Some(frame) = provider.with_platform_mut(|p| p.take_frame()) {
//!     provider.run_frame(frame);
//! }
//!
//! // Any consumer
//! back_to_top.scroll_to(0.0);
//! ```

// L4 Atomic Layer
pub mod platform;
pub mod timing;
pub mod wheel;

// L3 Molecular Layer
pub mod engine;
pub mod strategy;

// L2 Organism Layer
pub mod provider;

pub mod headless;

// Re-exports for convenient access
pub use engine::ScrollEngine;
pub use headless::HeadlessSurface;
pub use platform::{
    is_opted_out, ElementTree, FrameId, FrameScheduler, NodeId, ScrollPlatform, ScrollSurface,
};
pub use provider::{ScrollApi, ScrollHandle, ScrollProvider, ScrollSnapshot};
pub use strategy::{
    select_strategy, InertiaScrollStrategy, NativeScrollStrategy, ScrollStrategy, StrategyKind,
};
pub use wheel::{normalize_delta, DeltaMode, WheelDisposition, WheelInput};
