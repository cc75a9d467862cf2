//! L4 Atomic Layer: Pure arithmetic for the inertia loop
//!
//! Interpolation, clamping and settle estimates. Nothing here touches a
//! platform.

use std::time::Duration;

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Largest valid scroll offset for a document/viewport pair, never negative
#[inline]
pub fn max_scroll(document_height: f64, viewport_height: f64) -> f64 {
    (document_height - viewport_height).max(0.0)
}

/// Clamp a scroll offset into `[0, max]`
#[inline]
pub fn clamp_offset(y: f64, max: f64) -> f64 {
    if y.is_nan() {
        return 0.0;
    }
    y.clamp(0.0, max.max(0.0))
}

/// Scroll progress in [0.0, 1.0]; a page with nothing to scroll counts as complete
#[inline]
pub fn progress(y: f64, max: f64) -> f64 {
    if max <= 0.0 {
        1.0
    } else {
        (y / max).clamp(0.0, 1.0)
    }
}

/// Upper bound on frames the lerp loop needs to settle from `distance` px away
///
/// Each frame leaves `(1 - ease)` of the remaining distance, so the loop stops
/// after the first `n` with `distance * (1 - ease)^n <= threshold`.
pub fn frames_to_settle(distance: f64, ease: f64, threshold: f64) -> u32 {
    let distance = distance.abs();
    if distance <= threshold || ease >= 1.0 {
        return 1;
    }
    let n = (threshold / distance).ln() / (1.0 - ease).ln();
    n.ceil().max(1.0) as u32
}

/// Frame interval for a given animation rate
#[inline]
pub fn frame_interval(fps: u32) -> Duration {
    if fps == 0 {
        Duration::from_millis(16) // ~60fps fallback
    } else {
        Duration::from_millis(1000 / fps as u64)
    }
}
