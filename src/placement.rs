use bevy::prelude::*;

use crate::config::DragTunables;

// ---------------------------------------------------------------------------
// Spatial query capability
// ---------------------------------------------------------------------------

/// A shelf collider found near a released item.
pub struct ShelfHit {
    pub shelf: Entity,
    pub position: Vec3,
}

/// An item-layer collider found near a shelf.
pub struct ItemHit {
    pub entity: Entity,
    /// Whether the collider carries the placeable-item role. Non-item
    /// geometry on the item layer must not inflate occupancy.
    pub placeable: bool,
}

/// Read-only snapshot queries against the physical world. Occupancy is
/// recomputed from these on every placement instead of being stored, so a
/// shelf list can never desync from where items physically are.
pub trait SpatialIndex {
    /// Shelf colliders within `radius` of `point`. Result order is the
    /// index's contract; the resolver takes the first hit as-is.
    fn shelves_within(&self, point: Vec2, radius: f32) -> Vec<ShelfHit>;

    /// Item-layer colliders within `radius` of `point`.
    fn items_within(&self, point: Vec2, radius: f32) -> Vec<ItemHit>;
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOutcome {
    pub snapped: bool,
    pub position: Vec3,
    pub shelf: Option<Entity>,
}

/// Decide where a just-released item comes to rest.
///
/// With no shelf within the search radius the item keeps its xy and only the
/// z channel resets to the rest depth. Otherwise the slot is offset from the
/// shelf by one spacing per current occupant; occupancy is counted around
/// the shelf (not the drop point), excluding the item itself. Slots are not
/// re-packed when an occupant leaves, so gaps persist.
pub fn resolve(
    index: &impl SpatialIndex,
    item: Entity,
    position: Vec3,
    tunables: &DragTunables,
) -> PlacementOutcome {
    let shelves = index.shelves_within(position.truncate(), tunables.shelf_search_radius);
    let Some(hit) = shelves.first() else {
        return PlacementOutcome {
            snapped: false,
            position: Vec3::new(position.x, position.y, tunables.rest_depth),
            shelf: None,
        };
    };

    let occupancy = index
        .items_within(hit.position.truncate(), tunables.occupancy_radius)
        .iter()
        .filter(|other| other.entity != item && other.placeable)
        .count();

    PlacementOutcome {
        snapped: true,
        position: Vec3::new(
            hit.position.x + occupancy as f32 * tunables.stack_spacing,
            hit.position.y,
            hit.position.z,
        ),
        shelf: Some(hit.shelf),
    }
}
