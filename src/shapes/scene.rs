use super::Shape;
use slab::Slab;

/// Stable handle to a shape owned by a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(usize);

/// One slot of the depth-ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub id: ShapeId,
    pub depth: i32,
}

/// Depth-ordered collection of shapes.
///
/// Shapes live in an arena and the entry list holds handles, so reordering and
/// deletion never invalidate another entry. The list is always sorted ascending
/// by depth: lower depths are drawn first, higher depths end up on top.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Slab<Shape>,
    entries: Vec<Entry>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a shape at `depth` and restore depth order.
    /// Equal depths keep insertion order (stable sort).
    pub fn insert(&mut self, mut shape: Shape, depth: i32) -> ShapeId {
        shape.set_depth(depth);
        let id = ShapeId(self.shapes.insert(shape));
        self.entries.push(Entry { id, depth });
        self.entries.sort_by_key(|e| e.depth);
        id
    }

    /// One past the highest depth in use, or 0 for an empty scene. Saturates
    /// at `i32::MAX`, where new shapes tie and keep insertion order.
    pub fn next_depth(&self) -> i32 {
        self.entries.last().map_or(0, |e| e.depth.saturating_add(1))
    }

    /// Swap the first entry with `depth` and its predecessor, exchanging their
    /// depth values. Returns false at the bottom of the list or if no entry matches.
    pub fn move_up(&mut self, depth: i32) -> bool {
        match self.position_of_depth(depth) {
            Some(index) if index > 0 => {
                self.swap_entries(index - 1, index);
                true
            },
            _ => false,
        }
    }

    /// Swap the first entry with `depth` and its successor, exchanging their
    /// depth values. Returns false at the top of the list or if no entry matches.
    pub fn move_down(&mut self, depth: i32) -> bool {
        match self.position_of_depth(depth) {
            Some(index) if index + 1 < self.entries.len() => {
                self.swap_entries(index, index + 1);
                true
            },
            _ => false,
        }
    }

    /// Remove the entry at list position `index` and release its shape
    pub fn delete_at(&mut self, index: usize) -> Option<Shape> {
        if index < self.entries.len() {
            let entry = self.entries.remove(index);
            Some(self.shapes.remove(entry.id.0))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.shapes.clear();
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<Entry> {
        self.entries.get(index).copied()
    }

    /// List position of the first entry with `depth`
    pub fn position_of_depth(&self, depth: i32) -> Option<usize> {
        self.entries.iter().position(|e| e.depth == depth)
    }

    /// List position of a shape handle
    pub fn position_of(&self, id: ShapeId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id.0)
    }

    /// Shape at list position `index`
    pub fn shape_at(&self, index: usize) -> Option<&Shape> {
        self.entries.get(index).and_then(|e| self.shapes.get(e.id.0))
    }

    pub fn shape_at_mut(&mut self, index: usize) -> Option<&mut Shape> {
        let id = self.entries.get(index)?.id;
        self.shapes.get_mut(id.0)
    }

    /// Shapes in draw order (ascending depth)
    pub fn iter(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.entries.iter().filter_map(|e| self.shapes.get(e.id.0))
    }

    fn swap_entries(&mut self, lower: usize, upper: usize) {
        self.entries.swap(lower, upper);
        let lower_depth = self.entries[lower].depth;
        self.entries[lower].depth = self.entries[upper].depth;
        self.entries[upper].depth = lower_depth;

        for index in [lower, upper] {
            let Entry { id, depth } = self.entries[index];
            if let Some(shape) = self.shapes.get_mut(id.0) {
                shape.set_depth(depth);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::shapes::Style;
    use proptest::prelude::*;

    fn line(n: i32) -> Shape {
        Shape::line(Point::new(n, 0), Point::new(n, 10), Style::default())
    }

    fn order(scene: &Scene) -> Vec<i32> {
        scene.iter().map(|s| s.points()[0].x).collect()
    }

    #[test]
    fn test_insert_keeps_depth_order() {
        let mut scene = Scene::new();
        scene.insert(line(2), 5);
        scene.insert(line(0), 1);
        scene.insert(line(1), 3);

        assert_eq!(order(&scene), vec![0, 1, 2]);
        let depths: Vec<i32> = scene.entries().iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![1, 3, 5]);
        assert_eq!(scene.next_depth(), 6);
    }

    #[test]
    fn test_next_depth_saturates_at_max() {
        let mut scene = Scene::new();
        scene.insert(line(0), i32::MAX);
        assert_eq!(scene.next_depth(), i32::MAX);

        scene.insert(line(1), scene.next_depth());
        assert_eq!(order(&scene), vec![0, 1]);
    }

    #[test]
    fn test_equal_depths_keep_insertion_order() {
        let mut scene = Scene::new();
        scene.insert(line(0), 2);
        scene.insert(line(1), 2);
        scene.insert(line(2), 1);
        assert_eq!(order(&scene), vec![2, 0, 1]);
    }

    #[test]
    fn test_move_up_swaps_with_predecessor_and_depths() {
        let mut scene = Scene::new();
        scene.insert(line(0), 0);
        scene.insert(line(1), 1);
        scene.insert(line(2), 2);

        assert!(scene.move_up(2));
        assert_eq!(order(&scene), vec![0, 2, 1]);
        let depths: Vec<i32> = scene.entries().iter().map(|e| e.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        // Shapes carry their new depth too
        assert_eq!(scene.shape_at(1).unwrap().depth(), 1);
        assert_eq!(scene.shape_at(2).unwrap().depth(), 2);
    }

    #[test]
    fn test_move_at_boundaries_is_noop() {
        let mut scene = Scene::new();
        scene.insert(line(0), 0);
        scene.insert(line(1), 1);

        assert!(!scene.move_up(0));
        assert!(!scene.move_down(1));
        assert!(!scene.move_up(42));
        assert_eq!(order(&scene), vec![0, 1]);
    }

    #[test]
    fn test_delete_at_releases_shape() {
        let mut scene = Scene::new();
        let a = scene.insert(line(0), 0);
        let b = scene.insert(line(1), 1);

        let removed = scene.delete_at(0).unwrap();
        assert_eq!(removed.points()[0].x, 0);
        assert!(scene.get(a).is_none());
        assert!(scene.get(b).is_some());
        assert_eq!(scene.position_of(b), Some(0));
        assert!(scene.delete_at(5).is_none());
    }

    #[test]
    fn test_clear() {
        let mut scene = Scene::new();
        scene.insert(line(0), 0);
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.next_depth(), 0);
    }

    proptest! {
        #[test]
        fn prop_move_up_then_down_restores_order(count in 2usize..8, pick in 0usize..8) {
            let mut scene = Scene::new();
            for i in 0..count {
                scene.insert(line(i as i32), i as i32);
            }
            let index = pick % count;
            let depth = scene.entry(index).unwrap().depth;
            let before = order(&scene);

            if scene.move_up(depth) {
                // The moved shape now sits one slot lower and carries the depth of
                // its old predecessor
                let moved_depth = scene.entry(index - 1).unwrap().depth;
                prop_assert!(scene.move_down(moved_depth));
            }
            prop_assert_eq!(order(&scene), before);
        }
    }
}
