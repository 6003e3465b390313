use tuirealm::ratatui::layout::Rect;

use super::messages::Message;
use super::state::ScrollTarget;

/// Stacking level of a clickable region. The notice modal sits above the
/// panels and swallows clicks meant for them.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InteractionLayer {
    Base,
    Dialog,
}

impl InteractionLayer {
    fn priority(self) -> u8 {
        match self {
            Self::Base => 0,
            Self::Dialog => 1,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InteractionNode {
    pub rect: Rect,
    pub message: Message,
    pub layer: InteractionLayer,
}

fn contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Clickable and wheel-scrollable regions registered during the last render.
#[derive(Debug, Default, Clone)]
pub struct InteractionMap {
    nodes: Vec<InteractionNode>,
    scroll_regions: Vec<(Rect, ScrollTarget)>,
}

impl InteractionMap {
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.scroll_regions.clear();
    }

    pub fn register_scroll(&mut self, rect: Rect, target: ScrollTarget) {
        self.scroll_regions.push((rect, target));
    }

    /// Panel under the cursor for wheel events; the latest registration wins.
    pub fn resolve_scroll(&self, col: u16, row: u16) -> Option<ScrollTarget> {
        self.scroll_regions
            .iter()
            .rev()
            .find(|(rect, _)| contains(*rect, col, row))
            .map(|(_, target)| *target)
    }

    pub fn register_click(&mut self, layer: InteractionLayer, rect: Rect, message: Message) {
        self.nodes.push(InteractionNode {
            rect,
            message,
            layer,
        });
    }

    pub fn has_layer(&self, layer: InteractionLayer) -> bool {
        self.nodes.iter().any(|node| node.layer == layer)
    }

    /// Topmost node under the cursor: highest layer wins, then the latest
    /// registration within a layer.
    pub fn resolve_message(&self, col: u16, row: u16) -> Option<Message> {
        let mut best: Option<&InteractionNode> = None;
        for node in self.nodes.iter().filter(|node| contains(node.rect, col, row)) {
            match best {
                Some(current) if node.layer.priority() < current.layer.priority() => {}
                _ => best = Some(node),
            }
        }
        best.map(|node| node.message.clone())
    }
}
