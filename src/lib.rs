pub mod config;
pub mod drag;
pub mod overlay;
pub mod physics;
pub mod placement;
pub mod pointer;
pub mod projection;

use bevy::prelude::*;

pub use config::DragTunables;
pub use drag::{DragState, PhysicsBody, Renderable};
pub use placement::{PlacementOutcome, SpatialIndex};

/// Role marker for items that can be picked up and that count toward shelf
/// occupancy. Typed replacement for a tag-string check: anything on the item
/// collision layer without this marker (shelf hardware, debris) is ignored
/// by the placement resolver.
#[derive(Component, Default)]
pub struct PlaceableItem;

/// Static placement anchor. Items released within the shelf search radius
/// snap onto it, spaced side-by-side by occupancy count.
#[derive(Component, Default)]
pub struct Shelf;

/// Marks the camera pointer coordinates are projected through. Exactly one
/// is required; startup fails without it.
#[derive(Component, Default)]
pub struct DragCamera;

/// Render-order hint consumed by the draw pipeline. The drag controller only
/// sets it (elevated while dragging, normal otherwise); it never computes
/// draw order itself.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder(pub i32);

pub struct ShelfDropPlugin;

impl Plugin for ShelfDropPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragTunables>()
            .add_plugins((pointer::PointerPlugin, overlay::OverlayPlugin))
            .add_systems(PostStartup, physics::validate_scene);
    }
}
