//! L4 Atomic Layer: What the engine consumes from its host
//!
//! The engine never talks to a window directly. A host provides the scroll
//! register, a frame scheduler and an element hierarchy through these traits.

/// Opaque element identifier in the host's hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Handle to a scheduled animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// The host's vertical scroll register and geometry, in pixels
pub trait ScrollSurface {
    /// Current rendered scroll offset
    fn scroll_y(&self) -> f64;

    /// Write the scroll offset immediately
    fn set_scroll_y(&mut self, y: f64);

    /// Host-native smooth scroll, used when inertia is disabled
    fn smooth_scroll_to(&mut self, y: f64);

    fn document_height(&self) -> f64;

    fn viewport_height(&self) -> f64;
}

/// Animation frame scheduling
pub trait FrameScheduler {
    /// Schedule one frame callback; `None` if the host cannot schedule frames
    fn request_frame(&mut self) -> Option<FrameId>;

    /// Cancel a scheduled frame. Cancelling an unknown or fired frame is a no-op.
    fn cancel_frame(&mut self, id: FrameId);

    fn supports_animation_frames(&self) -> bool {
        true
    }
}

/// Element hierarchy used for opt-out lookups
pub trait ElementTree {
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Whether this element carries the scroll-container opt-out marker
    fn is_scroll_container(&self, node: NodeId) -> bool;
}

/// Everything a scroll strategy needs from its host
pub trait ScrollPlatform: ScrollSurface + FrameScheduler + ElementTree {
    /// Touch-capable hosts keep their own inertial scrolling
    fn supports_touch(&self) -> bool {
        false
    }

    fn max_scroll(&self) -> f64 {
        super::timing::max_scroll(self.document_height(), self.viewport_height())
    }
}

/// Walk from `node` up through its ancestors looking for an opt-out marker
pub fn is_opted_out<T: ElementTree + ?Sized>(tree: &T, node: NodeId) -> bool {
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if tree.is_scroll_container(current) {
            return true;
        }
        cursor = tree.parent_of(current);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Tree {
        parents: HashMap<NodeId, NodeId>,
        containers: Vec<NodeId>,
    }

    impl ElementTree for Tree {
        fn parent_of(&self, node: NodeId) -> Option<NodeId> {
            self.parents.get(&node).copied()
        }

        fn is_scroll_container(&self, node: NodeId) -> bool {
            self.containers.contains(&node)
        }
    }

    fn tree() -> Tree {
        // 0 -> 1 -> 2 -> 3, 0 -> 4; node 1 is the container
        let parents = HashMap::from([
            (NodeId(1), NodeId(0)),
            (NodeId(2), NodeId(1)),
            (NodeId(3), NodeId(2)),
            (NodeId(4), NodeId(0)),
        ]);
        Tree {
            parents,
            containers: vec![NodeId(1)],
        }
    }

    #[test]
    fn test_marker_on_self() {
        assert!(is_opted_out(&tree(), NodeId(1)));
    }

    #[test]
    fn test_marker_on_ancestor() {
        assert!(is_opted_out(&tree(), NodeId(3)));
    }

    #[test]
    fn test_unmarked_branch() {
        let tree = tree();
        assert!(!is_opted_out(&tree, NodeId(4)));
        assert!(!is_opted_out(&tree, NodeId(0)));
    }
}
