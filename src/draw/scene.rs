use crate::draw::clip::{liang_barsky, Segment};
use crate::draw::clip_window::ClipWindow;
use crate::draw::error::EditError;
use crate::draw::model::{LineAlgorithm, Point, Primitive, PrimitiveId, Rect, Shape};
use std::collections::BTreeSet;

/// Owns every primitive (in paint order), the selection and the clip window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    primitives: Vec<Primitive>,
    selection: BTreeSet<PrimitiveId>,
    clip_window: Option<ClipWindow>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    fn allocate_id(&mut self) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add(&mut self, shape: Shape) -> PrimitiveId {
        let id = self.allocate_id();
        self.primitives.push(Primitive { id, shape });
        id
    }

    pub fn add_line(&mut self, p1: Point, p2: Point, algorithm: LineAlgorithm) -> PrimitiveId {
        self.add(Shape::line(p1, p2, algorithm))
    }

    pub fn add_circle(&mut self, center: Point, radius: f64) -> PrimitiveId {
        self.add(Shape::circle(center, radius))
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    fn index_of(&self, id: PrimitiveId) -> Option<usize> {
        self.primitives.iter().position(|primitive| primitive.id == id)
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.iter().find(|primitive| primitive.id == id)
    }

    /// Swaps the shape of `id` in place; paint order and id are kept.
    pub fn replace(&mut self, id: PrimitiveId, shape: Shape) -> Result<(), EditError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| EditError::out_of_scope(format!("no primitive {id}")))?;
        self.primitives[index].shape = shape;
        Ok(())
    }

    /// Writes snapshot values back by id. Ids no longer present are skipped.
    pub fn restore(&mut self, snapshot: &[Primitive]) {
        for saved in snapshot {
            if let Some(index) = self.index_of(saved.id) {
                self.primitives[index].shape = saved.shape;
            }
        }
    }

    pub fn remove(&mut self, id: PrimitiveId) -> Option<Primitive> {
        let index = self.index_of(id)?;
        self.selection.remove(&id);
        Some(self.primitives.remove(index))
    }

    /// Replaces `id` with `shapes` at the same paint position. The new
    /// primitives get fresh ids and the old id leaves the selection.
    pub fn splice(
        &mut self,
        id: PrimitiveId,
        shapes: Vec<Shape>,
    ) -> Result<Vec<PrimitiveId>, EditError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| EditError::out_of_scope(format!("no primitive {id}")))?;
        let replacements: Vec<Primitive> = shapes
            .into_iter()
            .map(|shape| Primitive {
                id: self.allocate_id(),
                shape,
            })
            .collect();
        let ids = replacements.iter().map(|primitive| primitive.id).collect();
        self.primitives.splice(index..=index, replacements);
        self.selection.remove(&id);
        Ok(ids)
    }

    /// Drops primitives, selection and clip window. Ids keep counting up.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.selection.clear();
        self.clip_window = None;
    }

    pub fn selection(&self) -> &BTreeSet<PrimitiveId> {
        &self.selection
    }

    pub fn is_selected(&self, id: PrimitiveId) -> bool {
        self.selection.contains(&id)
    }

    /// Unknown ids are ignored so the selection only names live primitives.
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = PrimitiveId>,
    {
        let selection = ids
            .into_iter()
            .filter(|id| self.index_of(*id).is_some())
            .collect();
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected primitives in paint order.
    pub fn selected(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives
            .iter()
            .filter(move |primitive| self.selection.contains(&primitive.id))
    }

    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selected()
            .map(|primitive| primitive.shape.bounds())
            .reduce(Rect::union)
    }

    /// Ids whose drawn geometry touches `rect`: a line segment crossing it, or
    /// a circle outline crossing or touching it.
    pub fn ids_intersecting(&self, rect: &Rect) -> BTreeSet<PrimitiveId> {
        self.primitives
            .iter()
            .filter(|primitive| shape_touches_rect(&primitive.shape, rect))
            .map(|primitive| primitive.id)
            .collect()
    }

    pub fn clip_window(&self) -> Option<&ClipWindow> {
        self.clip_window.as_ref()
    }

    pub fn clip_window_mut(&mut self) -> Option<&mut ClipWindow> {
        self.clip_window.as_mut()
    }

    /// Installs `window`, returning the one it replaces.
    pub fn set_clip_window(&mut self, window: Option<ClipWindow>) -> Option<ClipWindow> {
        std::mem::replace(&mut self.clip_window, window)
    }
}

fn shape_touches_rect(shape: &Shape, rect: &Rect) -> bool {
    match *shape {
        Shape::Line { p1, p2, .. } => liang_barsky(Segment::new(p1, p2), rect).is_accepted(),
        Shape::Circle { center, radius } => {
            let nearest = rect.clamp_point(center).distance_to(center);
            let farthest = rect
                .corners()
                .into_iter()
                .map(|corner| corner.distance_to(center))
                .fold(0.0_f64, f64::max);
            nearest <= radius && farthest >= radius
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn scene_with_three() -> (Scene, [PrimitiveId; 3]) {
        let mut scene = Scene::new();
        let a = scene.add_line(p(0.0, 0.0), p(10.0, 0.0), LineAlgorithm::Dda);
        let b = scene.add_circle(p(50.0, 50.0), 10.0);
        let c = scene.add_line(p(0.0, 100.0), p(10.0, 120.0), LineAlgorithm::Bresenham);
        (scene, [a, b, c])
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let (mut scene, [a, b, c]) = scene_with_three();
        assert!(a < b && b < c);
        scene.clear();
        let d = scene.add_circle(p(0.0, 0.0), 1.0);
        assert!(d > c);
    }

    #[test]
    fn replace_keeps_paint_position() {
        let (mut scene, [a, b, c]) = scene_with_three();
        scene
            .replace(b, Shape::circle(p(0.0, 0.0), 3.0))
            .expect("replace existing");
        let order: Vec<_> = scene.primitives().iter().map(|prim| prim.id).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(
            scene.replace(PrimitiveId(99), Shape::circle(p(0.0, 0.0), 1.0)),
            Err(EditError::out_of_scope("no primitive #99"))
        );
    }

    #[test]
    fn selection_ignores_unknown_ids_and_is_pruned_on_remove() {
        let (mut scene, [a, b, _]) = scene_with_three();
        scene.set_selection([a, b, PrimitiveId(42)]);
        assert_eq!(scene.selection().len(), 2);
        scene.remove(a);
        assert!(!scene.is_selected(a));
        assert!(scene.is_selected(b));
    }

    #[test]
    fn splice_inserts_fresh_ids_in_place() {
        let (mut scene, [a, b, c]) = scene_with_three();
        scene.set_selection([b]);
        let new_ids = scene
            .splice(
                b,
                vec![
                    Shape::line(p(0.0, 0.0), p(1.0, 1.0), LineAlgorithm::Bresenham),
                    Shape::line(p(2.0, 2.0), p(3.0, 3.0), LineAlgorithm::Bresenham),
                ],
            )
            .expect("splice");
        let order: Vec<_> = scene.primitives().iter().map(|prim| prim.id).collect();
        assert_eq!(order, vec![a, new_ids[0], new_ids[1], c]);
        assert!(scene.selection().is_empty());
    }

    #[test]
    fn selection_bounds_cover_line_endpoints_and_circle_extent() {
        let (mut scene, [a, b, _]) = scene_with_three();
        assert_eq!(scene.selection_bounds(), None);
        scene.set_selection([a, b]);
        let bounds = scene.selection_bounds().expect("bounds");
        assert_eq!(bounds.min(), p(0.0, 0.0));
        assert_eq!(bounds.max(), p(60.0, 60.0));
    }

    #[test]
    fn rubber_band_hits_circle_outline_but_not_interior() {
        let (scene, [a, b, _]) = scene_with_three();
        let inside_circle = Rect::from_corners(p(48.0, 48.0), p(52.0, 52.0));
        assert!(scene.ids_intersecting(&inside_circle).is_empty());

        let across_outline = Rect::from_corners(p(55.0, 45.0), p(70.0, 55.0));
        assert_eq!(
            scene.ids_intersecting(&across_outline),
            BTreeSet::from([b])
        );

        let across_line = Rect::from_corners(p(4.0, -2.0), p(6.0, 2.0));
        assert_eq!(scene.ids_intersecting(&across_line), BTreeSet::from([a]));
    }
}
