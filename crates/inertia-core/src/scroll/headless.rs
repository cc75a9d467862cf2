//! In-memory scroll host
//!
//! Behaves like a browser window with no rendering: writes are clamped to the
//! document, frames are queued until the driver fires them, and every call is
//! recorded so tests and the simulator can inspect what the engine did.

use std::collections::{HashMap, HashSet, VecDeque};

use super::platform::{
    ElementTree, FrameId, FrameScheduler, NodeId, ScrollPlatform, ScrollSurface,
};
use super::timing::{clamp_offset, max_scroll};

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    scroll_y: f64,
    document_height: f64,
    viewport_height: f64,
    touch: bool,
    frames_supported: bool,
    next_frame: u64,
    pending: VecDeque<FrameId>,
    parents: HashMap<NodeId, NodeId>,
    containers: HashSet<NodeId>,
    /// Every offset written through `set_scroll_y`
    pub writes: Vec<f64>,
    /// Every target passed to the native smooth scroll
    pub native_scrolls: Vec<f64>,
}

impl HeadlessSurface {
    pub fn new(document_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y: 0.0,
            document_height,
            viewport_height,
            touch: false,
            frames_supported: true,
            next_frame: 1,
            pending: VecDeque::new(),
            parents: HashMap::new(),
            containers: HashSet::new(),
            writes: Vec::new(),
            native_scrolls: Vec::new(),
        }
    }

    /// Report touch support so strategy selection picks native scrolling
    pub fn with_touch(mut self) -> Self {
        self.touch = true;
        self
    }

    /// Simulate a host without an animation frame scheduler
    pub fn without_frames(mut self) -> Self {
        self.frames_supported = false;
        self
    }

    pub fn add_node(&mut self, node: NodeId, parent: NodeId) {
        self.parents.insert(node, parent);
    }

    /// Mark a node with the scroll-container opt-out marker
    pub fn mark_container(&mut self, node: NodeId) {
        self.containers.insert(node);
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// Pop the oldest scheduled frame, as the host would when it fires
    pub fn take_frame(&mut self) -> Option<FrameId> {
        self.pending.pop_front()
    }

    /// Move the register without going through the engine (keyboard, scrollbar, anchors)
    pub fn external_scroll(&mut self, y: f64) {
        self.scroll_y = clamp_offset(y, self.max_scroll());
    }

    /// Change geometry; the register is clamped like a browser would on reflow
    pub fn resize(&mut self, document_height: f64, viewport_height: f64) {
        self.document_height = document_height;
        self.viewport_height = viewport_height;
        self.scroll_y = clamp_offset(self.scroll_y, self.max_scroll());
    }
}

impl ScrollSurface for HeadlessSurface {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = clamp_offset(y, max_scroll(self.document_height, self.viewport_height));
        self.writes.push(self.scroll_y);
    }

    fn smooth_scroll_to(&mut self, y: f64) {
        self.native_scrolls.push(y);
        self.scroll_y = clamp_offset(y, max_scroll(self.document_height, self.viewport_height));
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}

impl FrameScheduler for HeadlessSurface {
    fn request_frame(&mut self) -> Option<FrameId> {
        if !self.frames_supported {
            return None;
        }
        let id = FrameId(self.next_frame);
        self.next_frame += 1;
        self.pending.push_back(id);
        Some(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.pending.retain(|pending| *pending != id);
    }

    fn supports_animation_frames(&self) -> bool {
        self.frames_supported
    }
}

impl ElementTree for HeadlessSurface {
    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    fn is_scroll_container(&self, node: NodeId) -> bool {
        self.containers.contains(&node)
    }
}

impl ScrollPlatform for HeadlessSurface {
    fn supports_touch(&self) -> bool {
        self.touch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_fire_in_order_and_cancel() {
        let mut surface = HeadlessSurface::new(3000.0, 1000.0);
        let a = surface.request_frame().unwrap();
        let b = surface.request_frame().unwrap();
        surface.cancel_frame(a);
        surface.cancel_frame(a);
        assert_eq!(surface.pending_frames(), 1);
        assert_eq!(surface.take_frame(), Some(b));
        assert_eq!(surface.take_frame(), None);
    }

    #[test]
    fn test_writes_are_clamped() {
        let mut surface = HeadlessSurface::new(3000.0, 1000.0);
        surface.set_scroll_y(5000.0);
        assert_eq!(surface.scroll_y(), 2000.0);
        surface.resize(2500.0, 1000.0);
        assert_eq!(surface.scroll_y(), 1500.0);
    }

    #[test]
    fn test_without_frames() {
        let mut surface = HeadlessSurface::new(3000.0, 1000.0).without_frames();
        assert!(!surface.supports_animation_frames());
        assert_eq!(surface.request_frame(), None);
    }
}
