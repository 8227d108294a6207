use bevy::prelude::*;

/// Project a screen-space pointer position into world space at the plane
/// `z = depth`.
///
/// Drag depth and rest depth differ, so callers must pass the depth of the
/// item's *current* mode; projecting at the wrong plane skews the captured
/// offset and the item visibly jitters while following the pointer.
pub(crate) fn pointer_world_at_depth(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    screen: Vec2,
    depth: f32,
) -> Option<Vec3> {
    let ray = camera.viewport_to_world(camera_transform, screen).ok()?;
    world_point_at_depth(ray, depth)
}

/// Intersect a camera ray with the depth plane. None when the ray runs
/// parallel to the plane or the plane lies behind the camera; callers drop
/// the pointer event in that case.
pub(crate) fn world_point_at_depth(ray: Ray3d, depth: f32) -> Option<Vec3> {
    let distance = ray.intersect_plane(Vec3::new(0.0, 0.0, depth), InfinitePlane3d::new(Vec3::Z))?;
    Some(ray.get_point(distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_ray_lands_on_the_requested_plane() {
        let ray = Ray3d {
            origin: Vec3::new(1.0, 2.0, 10.0),
            direction: Dir3::NEG_Z,
        };

        assert_eq!(world_point_at_depth(ray, -0.5), Some(Vec3::new(1.0, 2.0, -0.5)));
        assert_eq!(world_point_at_depth(ray, 0.0), Some(Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn oblique_ray_shifts_xy_with_depth() {
        let ray = Ray3d {
            origin: Vec3::new(0.0, 0.0, 1.0),
            direction: Dir3::new(Vec3::new(1.0, 0.0, -1.0)).unwrap(),
        };

        let point = world_point_at_depth(ray, 0.0).unwrap();
        assert!(point.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray3d {
            origin: Vec3::new(0.0, 0.0, 1.0),
            direction: Dir3::X,
        };

        assert_eq!(world_point_at_depth(ray, 0.0), None);
    }

    #[test]
    fn plane_behind_the_ray_misses() {
        let ray = Ray3d {
            origin: Vec3::new(0.0, 0.0, -1.0),
            direction: Dir3::NEG_Z,
        };

        assert_eq!(world_point_at_depth(ray, 0.0), None);
    }
}
