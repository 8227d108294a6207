use bevy::prelude::*;

use crate::{Shelf, config::DragTunables, drag::DragState};

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OverlaySettings>()
            .add_systems(Update, draw_query_radii);
    }
}

#[derive(Resource, Default)]
pub struct OverlaySettings {
    pub show_query_radii: bool,
}

/// Draw the shelf search circle around the held item and the occupancy
/// circle around each shelf, for tuning the radii.
fn draw_query_radii(
    mut gizmos: Gizmos,
    settings: Res<OverlaySettings>,
    tunables: Res<DragTunables>,
    items: Query<(&GlobalTransform, &DragState)>,
    shelves: Query<&GlobalTransform, With<Shelf>>,
) {
    if !settings.show_query_radii {
        return;
    }

    for (transform, state) in &items {
        if state.is_dragging() {
            gizmos.circle_2d(
                transform.translation().truncate(),
                tunables.shelf_search_radius,
                Color::srgb(0.2, 0.9, 0.9),
            );
        }
    }
    for transform in &shelves {
        gizmos.circle_2d(
            transform.translation().truncate(),
            tunables.occupancy_radius,
            Color::srgba(0.9, 0.9, 0.2, 0.4),
        );
    }
}
