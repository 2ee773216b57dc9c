use glam::{IVec2, UVec2};

use crate::geometry::Rect;

/// Viewport offset that keeps every tracked actor near the middle of the
/// window without showing space outside the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Camera {
    viewport: IVec2,
    world: IVec2,
    offset: IVec2,
}

impl Camera {
    pub fn new(viewport: UVec2, world: UVec2) -> Self {
        Self {
            viewport: viewport.as_ivec2(),
            world: world.as_ivec2(),
            offset: IVec2::ZERO,
        }
    }

    /// Recenter on the centroid of `tracked`. An empty set keeps the last
    /// offset.
    ///
    /// Each axis is capped at 0 first and then floored at
    /// `-(world - viewport)`. For a world smaller than the viewport the floor
    /// is positive and wins.
    pub fn update(&mut self, tracked: &[Rect]) {
        if tracked.is_empty() {
            return;
        }
        let count = tracked.len() as i32;
        let sum = tracked
            .iter()
            .fold(IVec2::ZERO, |acc, rect| acc + rect.center_px());
        let centroid = IVec2::new(sum.x.div_euclid(count), sum.y.div_euclid(count));

        let raw = self.viewport / 2 - centroid;
        let floor = -(self.world - self.viewport);
        self.offset = raw.min(IVec2::ZERO).max(floor);
    }

    /// `rect` moved into screen space. Draw-time only.
    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translated(self.offset.as_vec2())
    }

    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport.as_uvec2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(x: f32, y: f32) -> Rect {
        Rect::new(x, y, 36.0, 36.0)
    }

    fn camera() -> Camera {
        Camera::new(UVec2::new(1600, 900), UVec2::new(1653, 1044))
    }

    #[test]
    fn starts_at_origin() {
        assert_eq!(camera().offset(), IVec2::ZERO);
    }

    #[test]
    fn empty_update_keeps_previous_offset() {
        let mut cam = camera();
        cam.update(&[actor(1500.0, 1000.0)]);
        let before = cam.offset();
        cam.update(&[]);
        assert_eq!(cam.offset(), before);
    }

    #[test]
    fn actor_near_origin_clamps_to_zero() {
        let mut cam = camera();
        cam.update(&[actor(10.0, 10.0)]);
        assert_eq!(cam.offset(), IVec2::ZERO);
    }

    #[test]
    fn actor_in_far_corner_clamps_to_world_edge() {
        let mut cam = camera();
        cam.update(&[actor(1600.0, 1000.0)]);
        assert_eq!(cam.offset(), IVec2::new(-53, -144));
    }

    #[test]
    fn centers_on_actor_when_unconstrained() {
        let mut cam = Camera::new(UVec2::new(100, 100), UVec2::new(1000, 1000));
        // center (500, 400)
        cam.update(&[Rect::new(490.0, 390.0, 20.0, 20.0)]);
        assert_eq!(cam.offset(), IVec2::new(-450, -350));
    }

    #[test]
    fn centroid_uses_truncating_average() {
        let mut cam = Camera::new(UVec2::new(100, 100), UVec2::new(1000, 1000));
        // centers (300, 300) and (501, 300): sum 801, centroid 400
        cam.update(&[Rect::new(290.0, 290.0, 20.0, 20.0), Rect::new(491.0, 290.0, 20.0, 20.0)]);
        assert_eq!(cam.offset(), IVec2::new(-350, -250));
    }

    #[test]
    fn undersized_world_yields_positive_offset() {
        let mut cam = Camera::new(UVec2::new(1600, 900), UVec2::new(348, 174));
        cam.update(&[actor(0.0, 0.0)]);
        assert_eq!(cam.offset(), IVec2::new(1252, 726));
    }

    #[test]
    fn apply_translates_by_offset() {
        let mut cam = camera();
        cam.update(&[actor(1600.0, 1000.0)]);
        let moved = cam.apply(&Rect::new(100.0, 200.0, 10.0, 10.0));
        assert_eq!(moved, Rect::new(47.0, 56.0, 10.0, 10.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn offset_stays_inside_world(
                world_w in 1600u32..4000,
                world_h in 900u32..3000,
                actors in proptest::collection::vec((-500.0f32..5000.0, -500.0f32..5000.0), 1..4)
            ) {
                let mut cam = Camera::new(UVec2::new(1600, 900), UVec2::new(world_w, world_h));
                let rects: Vec<Rect> = actors.iter().map(|&(x, y)| actor(x, y)).collect();
                cam.update(&rects);
                let offset = cam.offset();
                prop_assert!(offset.x <= 0 && offset.x >= -(world_w as i32 - 1600));
                prop_assert!(offset.y <= 0 && offset.y >= -(world_h as i32 - 900));
            }
        }
    }
}
