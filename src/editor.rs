//! Editing session over one glyph: the pointer protocol, the drag state
//! machine, node edits with bounded undo, and commit.
//!
//! The session is UI-free. A host feeds it pointer events in screen
//! coordinates and renders `outline()` through `viewport`; everything
//! else is bookkeeping inside the session.

use kurbo::{Point, Size, Vec2};
use log::debug;

use crate::error::TraceError;
use crate::glyph::VectorGlyph;
use crate::history::EditHistory;
use crate::outline::Outline;
use crate::simplify;
use crate::viewport::ViewportTransform;

/// Screen-pixel radius within which a pointer press grabs a point.
pub const HIT_RADIUS: f64 = 8.0;
/// Breathing room around the fitted glyph, in model units.
const FIT_MARGIN: f64 = 8.0;

/// What the pointer is currently doing. Exactly one state at a time;
/// every release or leave event resets to `Idle`, no matter what.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// The point at `index` follows the pointer. `moved` flips on the
    /// gesture's first motion event, when its undo snapshot is taken.
    DraggingPoint { index: usize, moved: bool },
    /// The view follows the pointer; `last` is the previous position.
    Panning { last: Point },
}

/// One glyph being edited: its parsed outline, undo history, viewport,
/// and drag state. Dropping the session without [`EditSession::commit`]
/// discards every edit.
pub struct EditSession {
    glyph: VectorGlyph,
    outline: Outline,
    history: EditHistory,
    pub viewport: ViewportTransform,
    drag: DragState,
}

impl EditSession {
    /// Open a glyph for editing. Parses its path description and fits
    /// the viewport to the glyph's pixel dimensions.
    pub fn open(glyph: VectorGlyph, viewport_size: Size) -> Result<Self, TraceError> {
        let outline = Outline::parse(&glyph.path_description)?;
        let content = Size::new(f64::from(glyph.width), f64::from(glyph.height));
        let viewport = ViewportTransform::fit_to_view(content, viewport_size, FIT_MARGIN);
        Ok(Self {
            glyph,
            outline,
            history: EditHistory::new(),
            viewport,
            drag: DragState::Idle,
        })
    }

    pub fn glyph(&self) -> &VectorGlyph {
        &self.glyph
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Refit the viewport, e.g. after the host window resized.
    pub fn refit(&mut self, viewport_size: Size) {
        let content = Size::new(f64::from(self.glyph.width), f64::from(self.glyph.height));
        self.viewport = ViewportTransform::fit_to_view(content, viewport_size, FIT_MARGIN);
    }

    /// Index of the nearest outline point within [`HIT_RADIUS`] screen
    /// pixels of `screen`, if any.
    pub fn hit_test(&self, screen: Point) -> Option<usize> {
        let radius_sq = HIT_RADIUS * HIT_RADIUS;
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in self.outline.points().iter().enumerate() {
            let d = self.viewport.to_screen(p).distance_squared(screen);
            if d <= radius_sq && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    // ── Pointer protocol ─────────────────────────────────────

    /// Pointer down. A hit on a point starts a drag; a miss starts a
    /// pan. The drag's undo snapshot waits for actual motion, so a
    /// click that grabs a point and lets go spends no undo depth.
    pub fn pointer_pressed(&mut self, screen: Point) {
        match self.hit_test(screen) {
            Some(index) => {
                debug!("grab point {index}");
                self.drag = DragState::DraggingPoint {
                    index,
                    moved: false,
                };
            }
            None => {
                self.drag = DragState::Panning { last: screen };
            }
        }
    }

    /// Pointer move. Drags the grabbed point or pans the view,
    /// depending on the current state. The first motion of a drag
    /// records the gesture's one undo snapshot.
    pub fn pointer_moved(&mut self, screen: Point) {
        match self.drag {
            DragState::DraggingPoint { index, moved } => {
                // The index can only go stale if the host deletes
                // points mid-drag; recover by dropping the drag.
                if index >= self.outline.len() {
                    self.drag = DragState::Idle;
                    return;
                }
                if !moved {
                    self.history.snapshot(&self.outline);
                    self.drag = DragState::DraggingPoint { index, moved: true };
                }
                let pos = self.viewport.to_model(screen);
                if self.outline.move_point(index, pos).is_err() {
                    self.drag = DragState::Idle;
                }
            }
            DragState::Panning { last } => {
                self.viewport
                    .pan(Vec2::new(screen.x - last.x, screen.y - last.y));
                self.drag = DragState::Panning { last: screen };
            }
            DragState::Idle => {}
        }
    }

    /// Pointer up. Unconditionally back to `Idle`.
    pub fn pointer_released(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Pointer left the canvas. Unconditionally back to `Idle`.
    pub fn pointer_left(&mut self) {
        self.drag = DragState::Idle;
    }

    // ── Node edits ───────────────────────────────────────────

    /// Delete one point. Refused when the outline would drop below
    /// three points; refusals record no undo snapshot.
    pub fn delete_point(&mut self, index: usize) -> Result<(), TraceError> {
        let before = self.outline.clone();
        self.outline.delete_point(index)?;
        self.history.snapshot(&before);
        Ok(())
    }

    /// Round corners by doubling the point count. No-op below three
    /// points; no-ops record no undo snapshot.
    pub fn smooth(&mut self) -> Result<(), TraceError> {
        let smoothed = simplify::smooth(self.outline.points());
        if smoothed.len() == self.outline.len() {
            return Ok(());
        }
        let before = self.outline.clone();
        self.outline.replace_points(smoothed)?;
        self.history.snapshot(&before);
        Ok(())
    }

    /// Halve the point count. No-op for six points or fewer; no-ops
    /// record no undo snapshot.
    pub fn simplify(&mut self) -> Result<(), TraceError> {
        let decimated = simplify::decimate(self.outline.points());
        if decimated.len() == self.outline.len() {
            return Ok(());
        }
        let before = self.outline.clone();
        self.outline.replace_points(decimated)?;
        self.history.snapshot(&before);
        Ok(())
    }

    /// Restore the most recent snapshot. Returns whether anything was
    /// undone.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(previous) => {
                self.outline = previous;
                debug!("undo ({} left)", self.history.len());
                true
            }
            None => false,
        }
    }

    /// Close the session, producing the updated record. Identity is
    /// stable: same id, name, and dimensions, new path description.
    /// Dropping the session without calling this cancels every edit.
    pub fn commit(self) -> VectorGlyph {
        self.glyph
            .with_path_description(self.outline.to_path_description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_glyph() -> VectorGlyph {
        VectorGlyph::build("M0 0L10 0L10 10L0 10Z".into(), 10, 10)
    }

    /// Session over a 10x10 glyph in a 100x100 viewport: fit caps the
    /// scale at 2, so model (0,0) lands at screen (40,40).
    fn session() -> EditSession {
        EditSession::open(square_glyph(), Size::new(100.0, 100.0)).unwrap()
    }

    #[test]
    fn open_fits_viewport_to_glyph() {
        let s = session();
        assert_eq!(s.viewport.scale, 2.0);
        assert_eq!(
            s.viewport.to_screen(Point::new(0.0, 0.0)),
            Point::new(40.0, 40.0)
        );
        assert_eq!(s.drag_state(), DragState::Idle);
    }

    #[test]
    fn open_rejects_malformed_glyphs() {
        let mut glyph = square_glyph();
        glyph.path_description = "M0 0Q5 5 10 0Z".into();
        assert!(EditSession::open(glyph, Size::new(100.0, 100.0)).is_err());
    }

    #[test]
    fn hit_test_finds_nearest_point_in_radius() {
        let s = session();
        assert_eq!(s.hit_test(Point::new(41.0, 39.0)), Some(0));
        assert_eq!(s.hit_test(Point::new(60.0, 60.0)), Some(2));
        assert_eq!(s.hit_test(Point::new(75.0, 75.0)), None);
    }

    #[test]
    fn press_on_point_starts_drag() {
        let mut s = session();
        s.pointer_pressed(Point::new(40.0, 40.0));
        assert_eq!(
            s.drag_state(),
            DragState::DraggingPoint {
                index: 0,
                moved: false
            }
        );
        // The gesture's snapshot waits for motion.
        assert_eq!(s.undo_depth(), 0);
        s.pointer_moved(Point::new(41.0, 41.0));
        assert_eq!(s.undo_depth(), 1);
    }

    #[test]
    fn click_without_motion_spends_no_undo() {
        let mut s = session();
        let before = s.outline().clone();
        s.pointer_pressed(Point::new(40.0, 40.0));
        s.pointer_released();
        assert_eq!(s.outline(), &before);
        assert_eq!(s.undo_depth(), 0);
        assert!(!s.undo());
    }

    #[test]
    fn drag_moves_point_in_model_space() {
        let mut s = session();
        s.pointer_pressed(Point::new(40.0, 40.0));
        s.pointer_moved(Point::new(50.0, 45.0));
        assert_eq!(s.outline().points()[0], Point::new(5.0, 2.5));
        s.pointer_released();
        assert_eq!(s.drag_state(), DragState::Idle);
    }

    #[test]
    fn press_on_empty_space_pans() {
        let mut s = session();
        let before = s.viewport.translate;
        s.pointer_pressed(Point::new(90.0, 90.0));
        assert!(matches!(s.drag_state(), DragState::Panning { .. }));
        s.pointer_moved(Point::new(95.0, 87.0));
        assert_eq!(s.viewport.translate, before + Vec2::new(5.0, -3.0));
        // Panning records no undo snapshot.
        assert_eq!(s.undo_depth(), 0);
        s.pointer_released();
        assert_eq!(s.drag_state(), DragState::Idle);
    }

    #[test]
    fn pointer_leave_always_resets() {
        let mut s = session();
        s.pointer_pressed(Point::new(40.0, 40.0));
        s.pointer_left();
        assert_eq!(s.drag_state(), DragState::Idle);
        s.pointer_pressed(Point::new(90.0, 90.0));
        s.pointer_left();
        assert_eq!(s.drag_state(), DragState::Idle);
    }

    #[test]
    fn moves_while_idle_do_nothing() {
        let mut s = session();
        let before = s.outline().clone();
        let vp = s.viewport;
        s.pointer_moved(Point::new(55.0, 55.0));
        assert_eq!(s.outline(), &before);
        assert_eq!(s.viewport, vp);
    }

    #[test]
    fn undo_restores_pre_drag_outline() {
        let mut s = session();
        let before = s.outline().clone();
        s.pointer_pressed(Point::new(40.0, 40.0));
        s.pointer_moved(Point::new(70.0, 70.0));
        s.pointer_released();
        assert_ne!(s.outline(), &before);
        assert!(s.undo());
        assert_eq!(s.outline(), &before);
        assert!(!s.undo());
    }

    #[test]
    fn delete_point_shrinks_and_is_undoable() {
        let mut s = session();
        s.delete_point(1).unwrap();
        assert_eq!(s.outline().len(), 3);
        assert!(s.undo());
        assert_eq!(s.outline().len(), 4);
    }

    #[test]
    fn refused_delete_records_no_snapshot() {
        let mut s = session();
        s.delete_point(0).unwrap();
        assert_eq!(s.outline().len(), 3);
        let depth = s.undo_depth();
        assert!(s.delete_point(0).is_err());
        assert_eq!(s.outline().len(), 3);
        assert_eq!(s.undo_depth(), depth);
    }

    #[test]
    fn smooth_doubles_and_simplify_halves() {
        let mut s = session();
        s.smooth().unwrap();
        assert_eq!(s.outline().len(), 8);
        s.simplify().unwrap();
        assert_eq!(s.outline().len(), 4);
        assert_eq!(s.undo_depth(), 2);
    }

    #[test]
    fn simplify_leaves_coarse_outlines_alone() {
        let mut s = session();
        assert_eq!(s.outline().len(), 4);
        s.simplify().unwrap();
        assert_eq!(s.outline().len(), 4);
        assert_eq!(s.undo_depth(), 0);
    }

    #[test]
    fn undo_depth_is_bounded_at_eleven() {
        let mut s = session();
        for _ in 0..15 {
            s.pointer_pressed(Point::new(40.0, 40.0));
            s.pointer_moved(Point::new(41.0, 41.0));
            s.pointer_released();
        }
        let mut undone = 0;
        while s.undo() {
            undone += 1;
        }
        assert_eq!(undone, 11);
    }

    #[test]
    fn commit_keeps_identity_and_updates_path() {
        let mut s = session();
        let id = s.glyph().id.clone();
        let name = s.glyph().name.clone();
        s.pointer_pressed(Point::new(40.0, 40.0));
        s.pointer_moved(Point::new(42.0, 44.0));
        s.pointer_released();
        let updated = s.commit();
        assert_eq!(updated.id, id);
        assert_eq!(updated.name, name);
        assert_eq!(updated.width, 10);
        assert_eq!(updated.path_description, "M1 2L10 0L10 10L0 10Z");
    }
}
