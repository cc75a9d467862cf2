use std::sync::Arc;
use std::time::{Duration, Instant};

use inertia_core::forms::{Inquiry, InquiryOutbox};
use inertia_core::scroll::{
    is_opted_out, normalize_delta, timing, NodeId, ScrollApi, ScrollHandle, ScrollPlatform,
    ScrollProvider, ScrollSnapshot, ScrollSurface, WheelInput,
};
use inertia_core::{AppConfig, RateLimiter};
use tracing::{debug, info};

use crate::event::InquiryResult;
use crate::page::{Page, ROOT};
use crate::surface::TerminalSurface;
use crate::theme::Theme;

/// Row where the page viewport starts; row 0 holds the progress bar
pub const CONTENT_TOP: u16 = 1;

/// Page rows available for a terminal of `height` rows
pub fn viewport_rows_for(height: u16) -> usize {
    // progress bar + status bar
    height.saturating_sub(2).max(1) as usize
}

/// Which field of the inquiry popup has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryField {
    Contact,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryDraft {
    pub contact: String,
    pub message: String,
    pub field: InquiryField,
}

impl InquiryDraft {
    fn new() -> Self {
        Self {
            contact: String::new(),
            message: String::new(),
            field: InquiryField::Contact,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            InquiryField::Contact => &mut self.contact,
            InquiryField::Message => &mut self.message,
        }
    }
}

/// Application mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Normal browsing mode
    Normal,
    /// Admissions inquiry popup
    Inquiry(InquiryDraft),
    /// Help overlay
    Help,
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Active color theme
    pub theme: Theme,
    /// Scroll provider owning the terminal surface
    pub scroll: ScrollProvider<TerminalSurface>,
    /// Consumer handle used by back-to-top and section jumps
    handle: ScrollHandle<TerminalSurface>,
    /// Current application mode
    pub mode: Mode,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Inquiry writes in flight
    pub pending_submissions: usize,
    limiter: RateLimiter,
    outbox: InquiryOutbox,
}

impl App {
    pub fn new(config: Arc<AppConfig>, page: Page, width: u16, height: u16) -> Self {
        let surface = TerminalSurface::new(
            page,
            width as usize,
            viewport_rows_for(height),
            config.ui.row_height_px,
        );
        let scroll = ScrollProvider::mount(surface, &config.scroll);
        let handle = scroll.handle();
        info!(strategy = %scroll.kind(), "page viewer ready");

        Self {
            theme: Theme::by_name(&config.ui.theme),
            limiter: RateLimiter::from_config(&config.forms),
            outbox: InquiryOutbox::new(config.outbox_path()),
            config,
            scroll,
            handle,
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            pending_submissions: 0,
        }
    }

    pub fn outbox(&self) -> &InquiryOutbox {
        &self.outbox
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        self.scroll.snapshot()
    }

    /// Scroll progress in [0, 1]
    pub fn progress(&self) -> f64 {
        let snap = self.snapshot();
        timing::progress(snap.scroll_y, snap.max_scroll)
    }

    pub fn back_to_top_visible(&self) -> bool {
        self.scroll.with_platform(|s| s.scroll_y()) > self.config.ui.back_to_top_threshold_px
    }

    pub fn remaining_attempts(&self) -> usize {
        self.limiter.remaining_attempts()
    }

    pub fn frame_pending(&self) -> bool {
        self.scroll.with_platform(|s| s.has_pending_frame())
    }

    /// Whether the pending frame should fire, given the time since the last one
    pub fn frame_due(&self, since_last_frame: Duration) -> bool {
        self.frame_pending()
            && since_last_frame >= timing::frame_interval(self.config.scroll.animation_fps)
    }

    /// Wait before the next poll: the rest of the frame interval while
    /// animating, a full tick otherwise
    pub fn poll_timeout(&self, since_last_frame: Duration) -> Duration {
        if self.frame_pending() {
            timing::frame_interval(self.config.scroll.animation_fps)
                .saturating_sub(since_last_frame)
        } else {
            Duration::from_millis(self.config.ui.tick_rate_ms)
        }
    }

    // --- mouse wheel ---

    /// One wheel notch at a terminal cell
    pub fn on_wheel(&mut self, column: u16, row: u16, down: bool) {
        if self.mode != Mode::Normal {
            return;
        }

        let node = self.node_at_cell(column, row);
        let lines = self.config.ui.wheel_lines_per_notch;
        let input = WheelInput::lines(if down { lines } else { -lines }).over(node);

        let disposition = self.scroll.dispatch_wheel(&input);
        if !disposition.prevents_default() {
            self.native_wheel(&input, node, down);
        }
        self.flush_scroll_events();
    }

    fn node_at_cell(&self, column: u16, row: u16) -> NodeId {
        let rows = self.scroll.with_platform(|s| s.viewport_rows());
        if row < CONTENT_TOP || (row - CONTENT_TOP) as usize >= rows {
            return ROOT;
        }
        self.scroll
            .with_platform(|s| s.node_at((row - CONTENT_TOP) as usize, column as usize))
    }

    /// Default action for a wheel event nobody intercepted
    fn native_wheel(&mut self, input: &WheelInput, node: NodeId, down: bool) {
        let line_height = self.config.scroll.line_height_px;
        self.scroll.with_platform_mut(|surface| {
            let cards = if down { 1 } else { -1 };
            if is_opted_out(&*surface, node) && surface.scroll_gallery(node, cards) {
                return;
            }
            let delta = normalize_delta(input, line_height, surface.viewport_height());
            surface.native_scroll_by(delta);
        });
    }

    // --- keyboard scrolling (external to the engine) ---

    pub fn line_down(&mut self) {
        self.native_scroll_rows(1.0);
    }

    pub fn line_up(&mut self) {
        self.native_scroll_rows(-1.0);
    }

    pub fn page_down(&mut self) {
        let rows = self.page_rows();
        self.native_scroll_rows(rows);
    }

    pub fn page_up(&mut self) {
        let rows = self.page_rows();
        self.native_scroll_rows(-rows);
    }

    fn page_rows(&self) -> f64 {
        let rows = self.scroll.with_platform(|s| s.viewport_rows());
        rows.saturating_sub(1).max(1) as f64
    }

    fn native_scroll_rows(&mut self, rows: f64) {
        self.scroll.with_platform_mut(|surface| {
            let delta = rows * surface.row_height_px();
            surface.native_scroll_by(delta);
        });
        self.flush_scroll_events();
    }

    // --- programmatic scrolling through the consumer handle ---

    pub fn back_to_top(&mut self) {
        self.handle.scroll_to(0.0);
        self.flush_scroll_events();
    }

    pub fn jump_to_end(&mut self) {
        let max = self.scroll.with_platform(|s| s.max_scroll());
        self.handle.scroll_to(max);
        self.flush_scroll_events();
    }

    /// Ease to the next section heading below the current destination
    pub fn next_section(&mut self) {
        let from = self.snapshot().target;
        let tops = self.scroll.with_platform(|s| s.section_tops_px());
        if let Some(top) = tops.into_iter().find(|top| *top > from + 1.0) {
            self.handle.scroll_to(top);
        }
        self.flush_scroll_events();
    }

    pub fn prev_section(&mut self) {
        let from = self.snapshot().target;
        let tops = self.scroll.with_platform(|s| s.section_tops_px());
        let top = tops
            .into_iter()
            .rev()
            .find(|top| *top < from - 1.0)
            .unwrap_or(0.0);
        self.handle.scroll_to(top);
        self.flush_scroll_events();
    }

    // --- host loop plumbing ---

    /// Run the pending animation frame, if any. Returns true if one ran.
    pub fn pump_frame(&mut self) -> bool {
        let Some(frame) = self.scroll.with_platform_mut(|s| s.take_frame()) else {
            return false;
        };
        self.scroll.run_frame(frame);
        self.flush_scroll_events();
        true
    }

    /// Deliver the queued scroll notification to the strategy
    pub fn flush_scroll_events(&mut self) {
        if self.scroll.with_platform_mut(|s| s.take_scroll_event()) {
            self.scroll.dispatch_scroll();
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let rows = viewport_rows_for(height);
        self.scroll
            .with_platform_mut(|s| s.resize(width as usize, rows));
        self.scroll.dispatch_resize();
        self.flush_scroll_events();
        debug!(width, height, "viewer resized");
    }

    /// Detach the engine before the terminal goes away
    pub fn shutdown(&mut self) {
        self.scroll.teardown();
    }

    // --- modes ---

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Help => Mode::Normal,
            _ => Mode::Help,
        };
    }

    pub fn open_inquiry(&mut self) {
        if self.limiter.remaining_attempts() == 0 {
            self.set_status(self.rate_limited_message());
            return;
        }
        self.mode = Mode::Inquiry(InquiryDraft::new());
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Check if we're in a mode that accepts text input
    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::Inquiry(_))
    }

    pub fn input_char(&mut self, c: char) {
        if let Mode::Inquiry(draft) = &mut self.mode {
            draft.active_mut().push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Mode::Inquiry(draft) = &mut self.mode {
            draft.active_mut().pop();
        }
    }

    /// Enter on the contact field moves on; on the message field it submits
    pub fn confirm(&mut self) -> Option<Inquiry> {
        let Mode::Inquiry(draft) = &mut self.mode else {
            return None;
        };
        if draft.field == InquiryField::Contact {
            draft.field = InquiryField::Message;
            return None;
        }
        self.submit_inquiry()
    }

    /// Validate the draft and take a rate-limiter slot
    ///
    /// Returns the inquiry for the caller to persist. Invalid drafts stay open
    /// and do not use up an attempt.
    pub fn submit_inquiry(&mut self) -> Option<Inquiry> {
        self.submit_inquiry_at(Instant::now())
    }

    pub fn submit_inquiry_at(&mut self, now: Instant) -> Option<Inquiry> {
        let Mode::Inquiry(draft) = &self.mode else {
            return None;
        };

        let inquiry = match Inquiry::new(&draft.contact, &draft.message) {
            Ok(inquiry) => inquiry,
            Err(e) => {
                self.set_status(e.to_string());
                return None;
            }
        };

        if !self.limiter.can_submit_at(now) {
            self.mode = Mode::Normal;
            let message = self.rate_limited_message_at(now);
            self.set_status(message);
            return None;
        }

        self.mode = Mode::Normal;
        self.pending_submissions += 1;
        self.set_status("Sending inquiry...");
        Some(inquiry)
    }

    pub fn handle_inquiry_result(&mut self, result: InquiryResult) {
        self.pending_submissions = self.pending_submissions.saturating_sub(1);
        match result {
            InquiryResult::Success { id } => {
                info!(%id, "inquiry stored");
                self.set_status("Inquiry received. We will be in touch soon.");
            }
            InquiryResult::Failure { error } => {
                self.set_status(format!("Inquiry failed: {}", error));
            }
        }
    }

    fn rate_limited_message(&self) -> String {
        self.rate_limited_message_at(Instant::now())
    }

    fn rate_limited_message_at(&self, now: Instant) -> String {
        match self.limiter.retry_after_at(now) {
            Some(wait) => format!(
                "Too many inquiries. Try again in {} min.",
                wait.as_secs().div_ceil(60).max(1)
            ),
            None => "Too many inquiries. Try again later.".to_string(),
        }
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Section;
    use inertia_core::scroll::StrategyKind;

    fn test_config(smooth: bool, data_dir: &std::path::Path) -> Arc<AppConfig> {
        let mut config = AppConfig::default();
        config.scroll.smooth_enabled = smooth;
        config.general.data_dir = data_dir.to_path_buf();
        Arc::new(config)
    }

    fn long_page() -> Page {
        let paragraph = "lorem ipsum ".repeat(200);
        Page::new(vec![
            Section::prose("One", &[paragraph.trim()]),
            Section::gallery("Gallery", &[("a", "1"), ("b", "2"), ("c", "3")]),
            Section::prose("Two", &[paragraph.trim()]),
        ])
    }

    fn app(smooth: bool) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(test_config(smooth, dir.path()), long_page(), 60, 22);
        (app, dir)
    }

    fn settle(app: &mut App) -> usize {
        let mut frames = 0;
        while app.pump_frame() {
            frames += 1;
            assert!(frames < 1000, "animation did not settle");
        }
        frames
    }

    #[test]
    fn test_viewport_rows_reserve_bars() {
        assert_eq!(viewport_rows_for(22), 20);
        assert_eq!(viewport_rows_for(1), 1);
    }

    #[test]
    fn test_wheel_animates_then_settles() {
        let (mut app, _dir) = app(true);
        assert_eq!(app.scroll.kind(), StrategyKind::Inertia);

        app.on_wheel(5, 5, true);
        assert!(app.snapshot().animating);
        // 3 lines * 40px
        assert_eq!(app.snapshot().target, 120.0);

        assert!(settle(&mut app) > 1);
        let snap = app.snapshot();
        assert!(!snap.animating);
        assert_eq!(snap.scroll_y, 120.0);
    }

    #[test]
    fn test_wheel_over_gallery_scrolls_sideways() {
        let (mut app, _dir) = app(true);
        let gallery_top = app.scroll.with_platform(|s| s.layout().sections[1].top);
        let gallery_px = gallery_top as f64 * app.config.ui.row_height_px;
        app.scroll.with_platform_mut(|s| s.set_scroll_y(gallery_px));
        app.flush_scroll_events();

        // Strip starts two rows below the heading
        let row = CONTENT_TOP + 2;
        app.on_wheel(3, row, true);

        assert!(!app.snapshot().animating);
        assert_eq!(
            app.scroll.with_platform(|s| s.gallery_offset(1)),
            crate::page::CARD_WIDTH
        );
        assert_eq!(app.snapshot().scroll_y, gallery_px);
    }

    #[test]
    fn test_native_strategy_scrolls_immediately() {
        let (mut app, _dir) = app(false);
        assert_eq!(app.scroll.kind(), StrategyKind::Native);

        app.on_wheel(5, 5, true);
        assert!(!app.snapshot().animating);
        assert_eq!(app.snapshot().scroll_y, 120.0);
    }

    #[test]
    fn test_keyboard_scroll_resyncs_idle_engine() {
        let (mut app, _dir) = app(true);
        app.page_down();
        let y = app.snapshot().scroll_y;
        assert_eq!(y, 19.0 * 20.0);

        let snap = app.snapshot();
        assert_eq!(snap.current, y);
        assert_eq!(snap.target, y);

        // Next wheel starts from the new position
        app.on_wheel(5, 5, true);
        assert_eq!(app.snapshot().target, y + 120.0);
    }

    #[test]
    fn test_back_to_top_visibility_and_action() {
        let (mut app, _dir) = app(true);
        assert!(!app.back_to_top_visible());

        app.page_down();
        assert!(app.back_to_top_visible());

        app.back_to_top();
        settle(&mut app);
        assert_eq!(app.snapshot().scroll_y, 0.0);
        assert!(!app.back_to_top_visible());
    }

    #[test]
    fn test_section_jumps() {
        let (mut app, _dir) = app(true);
        let tops = app.scroll.with_platform(|s| s.section_tops_px());

        app.next_section();
        assert_eq!(app.snapshot().target, tops[1]);
        // A second press while animating continues from the destination
        app.next_section();
        assert_eq!(app.snapshot().target, tops[2]);

        settle(&mut app);
        app.prev_section();
        assert_eq!(app.snapshot().target, tops[1]);
    }

    #[test]
    fn test_resize_keeps_engine_in_range() {
        let (mut app, _dir) = app(true);
        app.jump_to_end();
        settle(&mut app);

        app.resize(120, 40);
        let snap = app.snapshot();
        assert!(snap.target <= snap.max_scroll);
        assert!(snap.scroll_y <= snap.max_scroll);
    }

    #[test]
    fn test_inquiry_flow_and_rate_limit() {
        let (mut app, _dir) = app(true);
        let now = Instant::now();

        for _ in 0..3 {
            app.open_inquiry();
            for c in "parent@example.com".chars() {
                app.input_char(c);
            }
            assert!(app.confirm().is_none());
            app.input_char('?');
            assert!(app.submit_inquiry_at(now).is_some());
            assert_eq!(app.mode, Mode::Normal);
        }
        assert_eq!(app.pending_submissions, 3);

        app.open_inquiry();
        assert_eq!(app.mode, Mode::Normal);
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Too many inquiries")));
    }

    #[test]
    fn test_invalid_inquiry_keeps_popup_and_attempt() {
        let (mut app, _dir) = app(true);
        app.open_inquiry();
        assert!(app.submit_inquiry().is_none());
        assert!(app.is_input_mode());
        assert_eq!(app.remaining_attempts(), 3);
    }

    #[test]
    fn test_outbox_lives_under_data_dir() {
        let (app, dir) = app(true);
        assert!(app.outbox().path().starts_with(dir.path()));
        assert!(!app.outbox().path().exists());
    }

    #[test]
    fn test_poll_timeout_follows_frames() {
        let (mut app, _dir) = app(true);
        let tick = Duration::from_millis(app.config.ui.tick_rate_ms);
        assert_eq!(app.poll_timeout(Duration::ZERO), tick);
        assert!(!app.frame_due(Duration::from_secs(1)));

        app.on_wheel(5, 5, true);
        let interval = timing::frame_interval(app.config.scroll.animation_fps);
        assert_eq!(app.poll_timeout(Duration::ZERO), interval);
        assert_eq!(app.poll_timeout(interval * 2), Duration::ZERO);
        assert!(!app.frame_due(Duration::ZERO));
        assert!(app.frame_due(interval));
    }

    #[test]
    fn test_shutdown_detaches() {
        let (mut app, _dir) = app(true);
        app.on_wheel(5, 5, true);
        app.shutdown();
        assert!(!app.scroll.is_attached());
        assert!(!app.pump_frame());
    }
}
