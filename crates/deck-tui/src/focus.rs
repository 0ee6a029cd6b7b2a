//! FocusRing: keyboard focus cycling between the panes of a screen.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Replace the ring on screen switch, focusing the first entry.
    pub fn reset(&mut self, items: Vec<ComponentId>) {
        self.items = items;
        self.current = 0;
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_both_ways() {
        let mut ring = FocusRing::new(vec![ComponentId::TorrentList, ComponentId::AddPanel]);
        assert_eq!(ring.current(), Some(ComponentId::TorrentList));
        assert_eq!(ring.next(), Some(ComponentId::AddPanel));
        assert_eq!(ring.next(), Some(ComponentId::TorrentList));
        assert_eq!(ring.prev(), Some(ComponentId::AddPanel));
        ring.set(ComponentId::TorrentList);
        assert!(ring.is_focused(ComponentId::TorrentList));
    }

    #[test]
    fn empty_ring_is_inert() {
        let mut ring = FocusRing::default();
        assert_eq!(ring.next(), None);
        assert_eq!(ring.prev(), None);
        ring.reset(vec![ComponentId::ConnectScreen]);
        assert!(ring.is_focused(ComponentId::ConnectScreen));
    }
}
