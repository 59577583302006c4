//! Bounded undo: whole-outline snapshots, newest-first restore.

use std::collections::VecDeque;

use crate::outline::Outline;

/// How many snapshots are retained. Older edits fall off the far end.
pub const HISTORY_DEPTH: usize = 11;

#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    snapshots: VecDeque<Outline>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation state of the outline. Once the depth
    /// limit is reached the oldest snapshot is dropped first.
    pub fn snapshot(&mut self, outline: &Outline) {
        if self.snapshots.len() == HISTORY_DEPTH {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(outline.clone());
    }

    /// Take back the most recent snapshot, or `None` when exhausted.
    pub fn undo(&mut self) -> Option<Outline> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn triangle(offset: f64) -> Outline {
        Outline::from_points(vec![
            Point::new(offset, 0.0),
            Point::new(offset + 4.0, 0.0),
            Point::new(offset, 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn undo_restores_newest_first() {
        let mut history = EditHistory::new();
        history.snapshot(&triangle(1.0));
        history.snapshot(&triangle(2.0));
        assert_eq!(history.undo(), Some(triangle(2.0)));
        assert_eq!(history.undo(), Some(triangle(1.0)));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn depth_is_bounded_and_drops_oldest() {
        let mut history = EditHistory::new();
        for i in 0..15 {
            history.snapshot(&triangle(i as f64));
        }
        assert_eq!(history.len(), HISTORY_DEPTH);
        // 15 mutations recorded, exactly 11 undos available.
        for expected in (4..15).rev() {
            assert_eq!(history.undo(), Some(triangle(expected as f64)));
        }
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn empty_history_has_nothing_to_undo() {
        let mut history = EditHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.undo(), None);
    }
}
