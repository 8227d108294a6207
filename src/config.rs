use bevy::prelude::*;

/// Numeric tunables for dragging and shelf placement. Supplied at app
/// construction and treated as immutable by the core systems.
#[derive(Resource, Clone, Debug)]
pub struct DragTunables {
    /// Gravity multiplier restored when an item goes back to the simulation.
    pub gravity_scale: f32,
    /// Z-channel value while an item is held.
    pub drag_depth: f32,
    /// Z-channel value for items resting off-shelf.
    pub rest_depth: f32,
    /// First-order smoothing rate for the pointer follow blend.
    pub follow_rate: f32,
    /// X spacing between items sharing a shelf.
    pub stack_spacing: f32,
    /// Radius around a released item searched for shelf colliders.
    pub shelf_search_radius: f32,
    /// Radius around a shelf searched for occupying items.
    pub occupancy_radius: f32,
    /// Sort order for resting items.
    pub normal_sort_order: i32,
    /// Sort order while held, so the item draws above its neighbors.
    pub drag_sort_order: i32,
}

impl Default for DragTunables {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            drag_depth: -0.5,
            rest_depth: 0.0,
            follow_rate: 15.0,
            stack_spacing: 0.4,
            shelf_search_radius: 0.2,
            occupancy_radius: 1.0,
            normal_sort_order: 2,
            drag_sort_order: 10,
        }
    }
}
