//! L2 Organism Layer: Scoped scroll provider and consumer handle
//!
//! A `ScrollProvider` is created when a view mounts and torn down when it
//! unmounts (or is dropped). It owns the host platform and the strategy picked
//! for it, and forwards host events. Other components never see the engine:
//! they get a `ScrollHandle`, which only knows how to `scroll_to`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use super::platform::{FrameId, ScrollPlatform};
use super::strategy::{select_strategy, ScrollStrategy, StrategyKind};
use super::wheel::{WheelDisposition, WheelInput};
use crate::config::ScrollConfig;

/// The programmatic scroll API handed to consumers (back-to-top, anchors)
pub trait ScrollApi {
    /// Ease to an absolute offset; fire-and-forget
    fn scroll_to(&self, y: f64);
}

/// Point-in-time view of the scroll state, for rendering and diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSnapshot {
    pub kind: StrategyKind,
    /// Host register
    pub scroll_y: f64,
    pub max_scroll: f64,
    /// Engine state; both equal `scroll_y` under the native strategy
    pub current: f64,
    pub target: f64,
    pub animating: bool,
}

struct ProviderState<P: ScrollPlatform> {
    platform: P,
    strategy: Box<dyn ScrollStrategy<P>>,
    attached: bool,
}

pub struct ScrollProvider<P: ScrollPlatform> {
    state: Rc<RefCell<ProviderState<P>>>,
}

impl<P: ScrollPlatform> ScrollProvider<P> {
    /// Probe the platform, pick a strategy and attach it
    pub fn mount(mut platform: P, config: &ScrollConfig) -> Self {
        let mut strategy = select_strategy(&platform, config);
        strategy.attach(&mut platform);
        debug!(strategy = %strategy.kind(), "scroll provider mounted");

        Self {
            state: Rc::new(RefCell::new(ProviderState {
                platform,
                strategy,
                attached: true,
            })),
        }
    }

    /// A consumer handle scoped to this provider's lifetime
    pub fn handle(&self) -> ScrollHandle<P> {
        ScrollHandle {
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.state.borrow().strategy.kind()
    }

    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    pub fn scroll_to(&self, y: f64) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.attached {
            state.strategy.scroll_to(&mut state.platform, y);
        }
    }

    /// Forward a wheel event; the caller prevents the native default when told to
    pub fn dispatch_wheel(&self, input: &WheelInput) -> WheelDisposition {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if !state.attached {
            return WheelDisposition::PassThrough;
        }
        state.strategy.on_wheel(&mut state.platform, input)
    }

    pub fn dispatch_scroll(&self) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.attached {
            state.strategy.on_scroll(&mut state.platform);
        }
    }

    pub fn dispatch_resize(&self) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.attached {
            state.strategy.on_resize(&mut state.platform);
        }
    }

    /// Run a fired animation frame
    pub fn run_frame(&self, frame: FrameId) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.attached {
            state.strategy.on_frame(&mut state.platform, frame);
        }
    }

    /// Detach listeners and cancel any pending frame. Safe to call repeatedly.
    pub fn teardown(&self) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        if state.attached {
            state.strategy.detach(&mut state.platform);
            state.attached = false;
            debug!("scroll provider torn down");
        }
    }

    pub fn with_platform<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.state.borrow().platform)
    }

    /// Mutate the platform directly, e.g. to apply a native scroll or resize
    /// before dispatching the matching event
    pub fn with_platform_mut<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut self.state.borrow_mut().platform)
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        let state = self.state.borrow();
        let scroll_y = state.platform.scroll_y();
        let (current, target) = match state.strategy.engine() {
            Some(engine) => (engine.current(), engine.target()),
            None => (scroll_y, scroll_y),
        };
        ScrollSnapshot {
            kind: state.strategy.kind(),
            scroll_y,
            max_scroll: state.platform.max_scroll(),
            current,
            target,
            animating: state.attached && state.strategy.is_animating(),
        }
    }
}

impl<P: ScrollPlatform> ScrollApi for ScrollProvider<P> {
    fn scroll_to(&self, y: f64) {
        ScrollProvider::scroll_to(self, y);
    }
}

impl<P: ScrollPlatform> Drop for ScrollProvider<P> {
    fn drop(&mut self) {
        // A handle mid-call still holds the borrow; it will find the state gone next time
        if let Ok(mut guard) = self.state.try_borrow_mut() {
            let state = &mut *guard;
            if state.attached {
                state.strategy.detach(&mut state.platform);
                state.attached = false;
            }
        }
    }
}

/// Cloneable consumer handle; does nothing once the provider is gone
pub struct ScrollHandle<P: ScrollPlatform> {
    state: Weak<RefCell<ProviderState<P>>>,
}

impl<P: ScrollPlatform> Clone for ScrollHandle<P> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<P: ScrollPlatform> ScrollApi for ScrollHandle<P> {
    fn scroll_to(&self, y: f64) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(mut guard) = state.try_borrow_mut() else {
            warn!(y, "scroll provider busy, dropping scroll_to");
            return;
        };
        let state = &mut *guard;
        if state.attached {
            state.strategy.scroll_to(&mut state.platform, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::headless::HeadlessSurface;

    fn mount() -> ScrollProvider<HeadlessSurface> {
        ScrollProvider::mount(HeadlessSurface::new(3000.0, 1000.0), &ScrollConfig::default())
    }

    fn drain(provider: &ScrollProvider<HeadlessSurface>) -> u32 {
        let mut frames = 0;
        while let Some(frame) = provider.with_platform_mut(|p| p.take_frame()) {
            provider.run_frame(frame);
            frames += 1;
            assert!(frames < 500);
        }
        frames
    }

    #[test]
    fn test_handle_drives_engine() {
        let provider = mount();
        let handle = provider.handle();

        handle.scroll_to(-100.0);
        assert_eq!(provider.snapshot().target, 0.0);

        handle.scroll_to(2500.0);
        let snapshot = provider.snapshot();
        assert_eq!(snapshot.target, 2000.0);
        assert!(snapshot.animating);

        drain(&provider);
        let snapshot = provider.snapshot();
        assert!(!snapshot.animating);
        assert_eq!(snapshot.scroll_y, 2000.0);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let provider = mount();
        provider.teardown();
        provider.teardown();
        assert!(!provider.is_attached());
        assert_eq!(provider.with_platform(|p| p.pending_frames()), 0);
    }

    #[test]
    fn test_teardown_mid_animation_cancels_frame() {
        let provider = mount();
        provider.dispatch_wheel(&WheelInput::pixels(500.0));
        assert_eq!(provider.with_platform(|p| p.pending_frames()), 1);

        provider.teardown();
        assert_eq!(provider.with_platform(|p| p.pending_frames()), 0);
        assert!(!provider.snapshot().animating);
    }

    #[test]
    fn test_events_after_teardown_are_ignored() {
        let provider = mount();
        provider.teardown();

        let disposition = provider.dispatch_wheel(&WheelInput::pixels(500.0));
        assert!(!disposition.prevents_default());
        provider.handle().scroll_to(800.0);
        provider.scroll_to(800.0);

        assert_eq!(provider.snapshot().target, 0.0);
        assert_eq!(provider.with_platform(|p| p.pending_frames()), 0);
    }

    #[test]
    fn test_handle_outlives_provider() {
        let handle = mount().handle();
        handle.scroll_to(100.0);
    }

    #[test]
    fn test_external_scroll_resyncs_through_provider() {
        let provider = mount();
        provider.with_platform_mut(|p| p.external_scroll(750.0));
        provider.dispatch_scroll();

        let snapshot = provider.snapshot();
        assert_eq!(snapshot.current, 750.0);
        assert_eq!(snapshot.target, 750.0);
    }

    #[test]
    fn test_resize_reclamps_through_provider() {
        let provider = mount();
        provider.scroll_to(2000.0);
        provider.with_platform_mut(|p| p.resize(2800.0, 1000.0));
        provider.dispatch_resize();
        assert_eq!(provider.snapshot().target, 1800.0);
    }

    #[test]
    fn test_native_provider_snapshot_tracks_register() {
        let provider = ScrollProvider::mount(
            HeadlessSurface::new(3000.0, 1000.0).with_touch(),
            &ScrollConfig::default(),
        );
        assert_eq!(provider.kind(), StrategyKind::Native);

        provider.handle().scroll_to(400.0);
        let snapshot = provider.snapshot();
        assert_eq!(snapshot.scroll_y, 400.0);
        assert_eq!(snapshot.current, 400.0);
        assert!(!snapshot.animating);
    }
}
