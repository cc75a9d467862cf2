//! L3 Molecular Layer: The inertia scroll engine
//!
//! Keeps a `current`/`target` pair and eases one toward the other, one
//! animation frame at a time. The loop is an explicit two-state machine: it
//! starts on demand (wheel input or `scroll_to`) and stops itself once the
//! remaining distance drops under the threshold, so nothing runs while idle.

use tracing::{debug, trace};

use super::platform::{is_opted_out, FrameId, FrameScheduler, ScrollPlatform, ScrollSurface};
use super::timing::{clamp_offset, lerp};
use super::wheel::{normalize_delta, WheelDisposition, WheelInput};
use crate::config::ScrollConfig;

/// Whether an animation frame is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Idle,
    Running(FrameId),
}

/// Inertia engine state
///
/// Holds no reference to its host; every operation borrows the platform it
/// acts on. Invariant: `0 <= target <= max_scroll` after every mutation.
#[derive(Debug, Clone)]
pub struct ScrollEngine {
    current: f64,
    target: f64,
    state: LoopState,
    ease: f64,
    threshold: f64,
    line_height: f64,
}

impl ScrollEngine {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            state: LoopState::Idle,
            ease: config.ease,
            threshold: config.threshold_px,
            line_height: config.line_height_px,
        }
    }

    /// Rendered position
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Position being eased toward
    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running(_))
    }

    /// Adopt the host's scroll position as both `current` and `target`
    pub fn sync_to<P: ScrollSurface + ?Sized>(&mut self, platform: &P) {
        let y = platform.scroll_y();
        self.current = y;
        self.target = y;
    }

    /// Ease toward `y`, clamped to the scrollable range
    ///
    /// Later calls simply replace the target.
    pub fn scroll_to<P: ScrollPlatform + ?Sized>(&mut self, platform: &mut P, y: f64) {
        self.target = clamp_offset(y, platform.max_scroll());
        self.start_loop(platform);
    }

    /// Accumulate a wheel gesture into the target
    ///
    /// Gestures over an opt-out container are left alone entirely.
    pub fn handle_wheel<P: ScrollPlatform + ?Sized>(
        &mut self,
        platform: &mut P,
        input: &WheelInput,
    ) -> WheelDisposition {
        if let Some(node) = input.target {
            if is_opted_out(&*platform, node) {
                trace!(node = node.0, "wheel over scroll container, passing through");
                return WheelDisposition::PassThrough;
            }
        }

        let delta = normalize_delta(input, self.line_height, platform.viewport_height());
        self.target = clamp_offset(self.target + delta, platform.max_scroll());
        self.start_loop(platform);
        WheelDisposition::Consumed
    }

    /// Observe a scroll event from the host
    ///
    /// While idle the event cannot have come from the loop, so the observed
    /// position is taken as ground truth.
    pub fn handle_scroll<P: ScrollSurface + ?Sized>(&mut self, platform: &P) {
        if !self.is_running() {
            self.sync_to(platform);
        }
    }

    /// Re-clamp the target after the document or viewport changed size
    pub fn handle_resize<P: ScrollPlatform + ?Sized>(&mut self, platform: &P) {
        self.target = clamp_offset(self.target, platform.max_scroll());
    }

    /// Advance one animation frame
    ///
    /// Frames other than the one currently scheduled are stale and ignored.
    /// Returns whether the loop is still running afterwards.
    pub fn tick<P: ScrollPlatform + ?Sized>(&mut self, platform: &mut P, frame: FrameId) -> bool {
        if self.state != LoopState::Running(frame) {
            trace!(frame = frame.0, "ignoring stale frame");
            return self.is_running();
        }

        self.current = lerp(self.current, self.target, self.ease);

        if (self.current - self.target).abs() > self.threshold {
            platform.set_scroll_y(self.current);
            match platform.request_frame() {
                Some(next) => self.state = LoopState::Running(next),
                None => self.settle(platform),
            }
        } else {
            self.settle(platform);
        }

        self.is_running()
    }

    /// Cancel any scheduled frame and go idle. Safe to call repeatedly.
    pub fn cancel<P: FrameScheduler + ?Sized>(&mut self, platform: &mut P) {
        if let LoopState::Running(frame) = self.state {
            platform.cancel_frame(frame);
            debug!(frame = frame.0, "inertia loop cancelled");
        }
        self.state = LoopState::Idle;
    }

    fn start_loop<P: ScrollPlatform + ?Sized>(&mut self, platform: &mut P) {
        if self.is_running() {
            return;
        }
        match platform.request_frame() {
            Some(frame) => {
                debug!(
                    from = self.current,
                    to = self.target,
                    "inertia loop started"
                );
                self.state = LoopState::Running(frame);
            }
            // No scheduler: jump straight there rather than leave the target dangling
            None => self.settle(platform),
        }
    }

    fn settle<P: ScrollSurface + ?Sized>(&mut self, platform: &mut P) {
        self.current = self.target;
        platform.set_scroll_y(self.current);
        self.state = LoopState::Idle;
        debug!(position = self.current, "inertia loop settled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::headless::HeadlessSurface;
    use crate::scroll::platform::NodeId;
    use crate::scroll::timing::frames_to_settle;

    fn setup() -> (ScrollEngine, HeadlessSurface) {
        let surface = HeadlessSurface::new(3000.0, 1000.0);
        let mut engine = ScrollEngine::new(&ScrollConfig::default());
        engine.sync_to(&surface);
        (engine, surface)
    }

    /// Fire frames until the loop stops; returns the number of frames run
    fn run_frames(engine: &mut ScrollEngine, surface: &mut HeadlessSurface, limit: u32) -> u32 {
        let mut frames = 0;
        while let Some(frame) = surface.take_frame() {
            frames += 1;
            assert!(frames <= limit, "loop did not settle within {} frames", limit);
            engine.tick(surface, frame);
        }
        frames
    }

    #[test]
    fn test_converges_for_in_range_targets() {
        for y in [0.0, 1.0, 250.0, 999.5, 2000.0] {
            let (mut engine, mut surface) = setup();
            surface.external_scroll(1000.0);
            engine.sync_to(&surface);

            engine.scroll_to(&mut surface, y);
            let bound = frames_to_settle(1000.0 - y, 0.08, 0.5) + 1;
            run_frames(&mut engine, &mut surface, bound);

            assert!(!engine.is_running());
            assert!((engine.current() - y).abs() <= 0.5);
            assert_eq!(surface.scroll_y(), engine.current());
            assert_eq!(surface.pending_frames(), 0);
        }
    }

    #[test]
    fn test_scroll_to_clamps() {
        let (mut engine, mut surface) = setup();
        engine.scroll_to(&mut surface, -100.0);
        assert_eq!(engine.target(), 0.0);

        engine.scroll_to(&mut surface, 2500.0);
        assert_eq!(engine.target(), 2000.0);
    }

    #[test]
    fn test_scroll_to_replaces_target_without_second_frame() {
        let (mut engine, mut surface) = setup();
        engine.scroll_to(&mut surface, 800.0);
        engine.scroll_to(&mut surface, 300.0);
        assert_eq!(engine.target(), 300.0);
        assert_eq!(surface.pending_frames(), 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        // Right after mount, nothing scheduled
        let (mut engine, mut surface) = setup();
        engine.cancel(&mut surface);
        engine.cancel(&mut surface);
        assert_eq!(surface.pending_frames(), 0);

        // After settling
        engine.scroll_to(&mut surface, 100.0);
        run_frames(&mut engine, &mut surface, 200);
        engine.cancel(&mut surface);
        assert_eq!(surface.pending_frames(), 0);

        // Mid-animation
        engine.scroll_to(&mut surface, 900.0);
        let frame = surface.take_frame().unwrap();
        engine.tick(&mut surface, frame);
        assert_eq!(surface.pending_frames(), 1);
        engine.cancel(&mut surface);
        engine.cancel(&mut surface);
        assert_eq!(surface.pending_frames(), 0);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_resync_when_idle() {
        let (mut engine, mut surface) = setup();
        assert!(!engine.is_running());

        surface.external_scroll(1234.0);
        engine.handle_scroll(&surface);

        assert_eq!(engine.current(), 1234.0);
        assert_eq!(engine.target(), 1234.0);
    }

    #[test]
    fn test_scroll_events_ignored_while_running() {
        let (mut engine, mut surface) = setup();
        engine.scroll_to(&mut surface, 600.0);
        let frame = surface.take_frame().unwrap();
        engine.tick(&mut surface, frame);

        // The loop's own write echoes back as a scroll event
        engine.handle_scroll(&surface);
        assert_eq!(engine.target(), 600.0);
        assert!(engine.is_running());
    }

    #[test]
    fn test_line_mode_wheel_matches_pixels() {
        let (mut line_engine, mut line_surface) = setup();
        line_engine.handle_wheel(&mut line_surface, &WheelInput::lines(3.0));

        let (mut px_engine, mut px_surface) = setup();
        px_engine.handle_wheel(&mut px_surface, &WheelInput::pixels(120.0));

        assert_eq!(line_engine.target(), 120.0);
        assert_eq!(line_engine.target(), px_engine.target());
    }

    #[test]
    fn test_page_mode_wheel_uses_viewport_height() {
        let (mut engine, mut surface) = setup();
        engine.handle_wheel(&mut surface, &WheelInput::pages(1.0));
        assert_eq!(engine.target(), 1000.0);
    }

    #[test]
    fn test_wheel_accumulates_and_clamps() {
        let (mut engine, mut surface) = setup();
        for _ in 0..30 {
            engine.handle_wheel(&mut surface, &WheelInput::pixels(100.0));
        }
        assert_eq!(engine.target(), 2000.0);

        for _ in 0..30 {
            engine.handle_wheel(&mut surface, &WheelInput::pixels(-100.0));
        }
        assert_eq!(engine.target(), 0.0);
        assert_eq!(surface.pending_frames(), 1);
    }

    #[test]
    fn test_opt_out_container_passes_through() {
        let (mut engine, mut surface) = setup();
        let gallery = NodeId(10);
        let slide = NodeId(11);
        surface.add_node(gallery, NodeId(1));
        surface.add_node(slide, gallery);
        surface.mark_container(gallery);

        let wheel = WheelInput::pixels(300.0).over(slide);
        let disposition = engine.handle_wheel(&mut surface, &wheel);

        assert_eq!(disposition, WheelDisposition::PassThrough);
        assert!(!disposition.prevents_default());
        assert_eq!(engine.target(), 0.0);
        assert!(!engine.is_running());
        assert_eq!(surface.pending_frames(), 0);
    }

    #[test]
    fn test_wheel_outside_container_is_consumed() {
        let (mut engine, mut surface) = setup();
        surface.add_node(NodeId(2), NodeId(1));
        surface.mark_container(NodeId(3));

        let wheel = WheelInput::pixels(300.0).over(NodeId(2));
        let disposition = engine.handle_wheel(&mut surface, &wheel);
        assert!(disposition.prevents_default());
        assert_eq!(engine.target(), 300.0);
    }

    #[test]
    fn test_resize_reclamps_target() {
        let (mut engine, mut surface) = setup();
        engine.scroll_to(&mut surface, 2000.0);
        assert_eq!(engine.target(), 2000.0);

        surface.resize(2800.0, 1000.0);
        engine.handle_resize(&surface);

        assert_eq!(engine.target(), 1800.0);
    }

    #[test]
    fn test_resize_does_not_start_loop() {
        let (mut engine, surface) = setup();
        engine.handle_resize(&surface);
        assert!(!engine.is_running());
        assert_eq!(surface.pending_frames(), 0);
    }

    #[test]
    fn test_end_to_end_wheel_scenario() {
        let (mut engine, mut surface) = setup();
        assert_eq!(surface.max_scroll(), 2000.0);
        assert_eq!(engine.current(), 0.0);
        assert_eq!(engine.target(), 0.0);

        let disposition = engine.handle_wheel(&mut surface, &WheelInput::pixels(500.0));
        assert!(disposition.prevents_default());
        assert_eq!(engine.target(), 500.0);
        assert!(engine.is_running());

        let frames = run_frames(&mut engine, &mut surface, 200);
        assert!(frames <= frames_to_settle(500.0, 0.08, 0.5) + 1);
        assert!((engine.current() - 500.0).abs() <= 0.5);
        assert!(!engine.is_running());
        assert_eq!(surface.scroll_y(), 500.0);
    }

    #[test]
    fn test_positions_approach_target_monotonically() {
        let (mut engine, mut surface) = setup();
        engine.scroll_to(&mut surface, 800.0);
        run_frames(&mut engine, &mut surface, 200);

        let mut prev = 0.0;
        for y in &surface.writes {
            assert!(*y >= prev);
            assert!(*y <= 800.0);
            prev = *y;
        }
    }

    #[test]
    fn test_stale_frame_ignored() {
        let (mut engine, mut surface) = setup();
        engine.scroll_to(&mut surface, 400.0);
        let frame = surface.take_frame().unwrap();
        engine.cancel(&mut surface);

        assert!(!engine.tick(&mut surface, frame));
        assert_eq!(engine.current(), 0.0);
        assert!(surface.writes.is_empty());
    }

    #[test]
    fn test_no_scheduler_snaps_to_target() {
        let mut surface = HeadlessSurface::new(3000.0, 1000.0).without_frames();
        let mut engine = ScrollEngine::new(&ScrollConfig::default());
        engine.sync_to(&surface);

        engine.scroll_to(&mut surface, 700.0);

        assert!(!engine.is_running());
        assert_eq!(engine.current(), 700.0);
        assert_eq!(surface.scroll_y(), 700.0);
    }
}
