//! Terminal host for the scroll engine
//!
//! Rows are mapped to virtual pixels with a fixed row height so the engine
//! can keep sub-row precision while the renderer rounds to whole rows.
//! Like a browser, the surface does not call back into the engine: position
//! changes raise a pending scroll notification and fired frames wait in a
//! single slot until the event loop collects them.

use std::collections::HashMap;

use inertia_core::scroll::{
    timing::clamp_offset,
    ElementTree, FrameId, FrameScheduler, NodeId, ScrollPlatform, ScrollSurface,
};

use crate::page::{Page, PageLayout, SectionKind, CARD_WIDTH};

pub struct TerminalSurface {
    page: Page,
    layout: PageLayout,
    viewport_rows: usize,
    row_height_px: f64,
    scroll_y: f64,
    next_frame: u64,
    pending_frame: Option<FrameId>,
    scroll_event_pending: bool,
    /// Horizontal offset (columns) per gallery section
    gallery_offsets: HashMap<usize, usize>,
}

impl TerminalSurface {
    pub fn new(page: Page, width: usize, viewport_rows: usize, row_height_px: f64) -> Self {
        let layout = page.layout(width);
        Self {
            page,
            layout,
            viewport_rows,
            row_height_px,
            scroll_y: 0.0,
            next_frame: 1,
            pending_frame: None,
            scroll_event_pending: false,
            gallery_offsets: HashMap::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    pub fn row_height_px(&self) -> f64 {
        self.row_height_px
    }

    /// First document row shown in the viewport
    pub fn first_visible_row(&self) -> usize {
        (self.scroll_y / self.row_height_px).round().max(0.0) as usize
    }

    /// Re-layout for a new terminal size; the offset is clamped like a reflow
    pub fn resize(&mut self, width: usize, viewport_rows: usize) {
        self.layout = self.page.layout(width);
        self.viewport_rows = viewport_rows;
        self.write(self.scroll_y);
    }

    /// Native scroll by a pixel delta (keyboard, scrollbar)
    pub fn native_scroll_by(&mut self, delta_px: f64) {
        self.write(self.scroll_y + delta_px);
    }

    /// Consume the pending scroll notification, if any
    pub fn take_scroll_event(&mut self) -> bool {
        std::mem::take(&mut self.scroll_event_pending)
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Fire the scheduled frame
    pub fn take_frame(&mut self) -> Option<FrameId> {
        self.pending_frame.take()
    }

    /// Node under a viewport cell (row relative to the viewport top)
    pub fn node_at(&self, viewport_row: usize, column: usize) -> NodeId {
        let row = self.first_visible_row() + viewport_row;
        self.page
            .node_at(&self.layout, row, column, |idx| self.gallery_offset(idx))
    }

    pub fn gallery_offset(&self, section: usize) -> usize {
        self.gallery_offsets.get(&section).copied().unwrap_or(0)
    }

    /// Scroll the gallery strip containing `node` sideways by whole cards
    ///
    /// Returns false if the node is not inside a gallery.
    pub fn scroll_gallery(&mut self, node: NodeId, cards: i64) -> bool {
        let Some(section) = self.page.section_of(node) else {
            return false;
        };
        let SectionKind::Gallery(items) = &self.page.sections[section].kind else {
            return false;
        };

        let max_offset = items.len().saturating_sub(1) * CARD_WIDTH;
        let offset = self.gallery_offset(section) as i64 + cards * CARD_WIDTH as i64;
        let offset = offset.clamp(0, max_offset as i64) as usize;
        self.gallery_offsets.insert(section, offset);
        true
    }

    /// Document offset of each section heading, in pixels
    pub fn section_tops_px(&self) -> Vec<f64> {
        self.layout
            .sections
            .iter()
            .map(|s| s.top as f64 * self.row_height_px)
            .collect()
    }

    fn write(&mut self, y: f64) {
        let clamped = clamp_offset(y, self.max_scroll());
        if clamped != self.scroll_y {
            self.scroll_y = clamped;
            self.scroll_event_pending = true;
        }
    }
}

impl ScrollSurface for TerminalSurface {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn set_scroll_y(&mut self, y: f64) {
        self.write(y);
    }

    /// Terminals have no native easing; jump
    fn smooth_scroll_to(&mut self, y: f64) {
        self.write(y);
    }

    fn document_height(&self) -> f64 {
        self.layout.total_rows as f64 * self.row_height_px
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_rows as f64 * self.row_height_px
    }
}

impl FrameScheduler for TerminalSurface {
    fn request_frame(&mut self) -> Option<FrameId> {
        let id = FrameId(self.next_frame);
        self.next_frame += 1;
        self.pending_frame = Some(id);
        Some(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.pending_frame == Some(id) {
            self.pending_frame = None;
        }
    }
}

impl ElementTree for TerminalSurface {
    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.page.parent_of(node)
    }

    fn is_scroll_container(&self, node: NodeId) -> bool {
        self.page.is_scroll_container(node)
    }
}

impl ScrollPlatform for TerminalSurface {}
