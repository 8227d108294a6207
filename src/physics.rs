use avian2d::prelude::*;
use bevy::{ecs::system::SystemParam, prelude::*};

use crate::{
    DragCamera, PlaceableItem, Shelf, SortOrder,
    config::DragTunables,
    drag::{DragState, PhysicsBody, Renderable},
    placement::{ItemHit, ShelfHit, SpatialIndex},
};

// ---------------------------------------------------------------------------
// Collision layers
// ---------------------------------------------------------------------------

#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    Item,
    Shelf,
}

/// Layer setup for draggable items: they collide with the world and with
/// shelves, never with each other. One-time world configuration, not
/// per-frame logic.
pub fn item_layers() -> CollisionLayers {
    CollisionLayers::new(GameLayer::Item, [GameLayer::Default, GameLayer::Shelf])
}

pub fn shelf_layers() -> CollisionLayers {
    CollisionLayers::new(GameLayer::Shelf, LayerMask::ALL)
}

// ---------------------------------------------------------------------------
// Capability adapters
// ---------------------------------------------------------------------------

/// [`PhysicsBody`] over the avian components of one item. Kinematic means
/// the drag controller owns the position; dynamic hands it back to the
/// simulation.
pub struct AvianBody<'a> {
    pub body: &'a mut RigidBody,
    pub velocity: &'a mut LinearVelocity,
    pub gravity: &'a mut GravityScale,
}

impl PhysicsBody for AvianBody<'_> {
    fn zero_velocity(&mut self) {
        self.velocity.0 = Vec2::ZERO;
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        *self.body = if kinematic {
            RigidBody::Kinematic
        } else {
            RigidBody::Dynamic
        };
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity.0 = scale;
    }
}

impl Renderable for SortOrder {
    fn set_sort_order(&mut self, order: i32) {
        self.0 = order;
    }
}

// ---------------------------------------------------------------------------
// Spatial index
// ---------------------------------------------------------------------------

/// [`SpatialIndex`] backed by avian's broad phase. Hit order within one
/// query is whatever the broad phase yields; the resolver documents that as
/// its tie-break contract.
#[derive(SystemParam)]
pub struct AvianIndex<'w, 's> {
    spatial: SpatialQuery<'w, 's>,
    transforms: Query<'w, 's, &'static GlobalTransform>,
    placeable: Query<'w, 's, (), With<PlaceableItem>>,
}

impl AvianIndex<'_, '_> {
    /// First item collider containing a world-space point, for press
    /// hit-testing.
    pub fn pick_item(&self, point: Vec2) -> Option<Entity> {
        self.spatial
            .point_intersections(point, &SpatialQueryFilter::from_mask(GameLayer::Item))
            .into_iter()
            .next()
    }

    fn circle_hits(&self, point: Vec2, radius: f32, mask: GameLayer) -> Vec<Entity> {
        self.spatial.shape_intersections(
            &Collider::circle(radius),
            point,
            0.0,
            &SpatialQueryFilter::from_mask(mask),
        )
    }
}

impl SpatialIndex for AvianIndex<'_, '_> {
    fn shelves_within(&self, point: Vec2, radius: f32) -> Vec<ShelfHit> {
        self.circle_hits(point, radius, GameLayer::Shelf)
            .into_iter()
            .filter_map(|shelf| {
                let transform = self.transforms.get(shelf).ok()?;
                Some(ShelfHit {
                    shelf,
                    position: transform.translation(),
                })
            })
            .collect()
    }

    fn items_within(&self, point: Vec2, radius: f32) -> Vec<ItemHit> {
        self.circle_hits(point, radius, GameLayer::Item)
            .into_iter()
            .map(|entity| ItemHit {
                entity,
                placeable: self.placeable.contains(entity),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Bundles
// ---------------------------------------------------------------------------

/// Everything a draggable item needs beyond its visual components.
pub fn draggable_item(tunables: &DragTunables, radius: f32) -> impl Bundle {
    (
        PlaceableItem,
        DragState::new(tunables.rest_depth),
        SortOrder(tunables.normal_sort_order),
        RigidBody::Dynamic,
        Collider::circle(radius),
        GravityScale(tunables.gravity_scale),
        item_layers(),
    )
}

/// A static shelf anchor sized `size` (full extents).
pub fn shelf(size: Vec2) -> impl Bundle {
    (
        Shelf,
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        shelf_layers(),
    )
}

// ---------------------------------------------------------------------------
// Startup validation
// ---------------------------------------------------------------------------

/// Missing collaborators (camera, physics body, render hint) are setup
/// faults. Abort at startup instead of degrading silently at interaction
/// time.
pub(crate) fn validate_scene(
    cameras: Query<(), (With<Camera>, With<DragCamera>)>,
    items: Query<
        (
            Entity,
            Has<RigidBody>,
            Has<Collider>,
            Has<GravityScale>,
            Has<SortOrder>,
        ),
        With<DragState>,
    >,
) -> Result {
    if cameras.is_empty() {
        return Err(anyhow::anyhow!(
            "no camera marked with DragCamera; pointer projection has nothing to project through"
        )
        .into());
    }
    for (entity, body, collider, gravity, sort_order) in &items {
        if !(body && collider && gravity && sort_order) {
            return Err(anyhow::anyhow!(
                "draggable item {entity} is missing physics or render components; \
                 spawn it with shelfdrop::physics::draggable_item"
            )
            .into());
        }
    }
    Ok(())
}
