//! Two shelves and a row of items on the ground. Drag an item with the left
//! mouse button; drop it near a shelf and it snaps into the next free slot,
//! drop it anywhere else and it falls.

use avian2d::prelude::*;
use bevy::prelude::*;
use shelfdrop::{DragCamera, DragTunables, ShelfDropPlugin, overlay::OverlaySettings, physics};

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, PhysicsPlugins::default(), ShelfDropPlugin))
        // Bevy 2d draws higher z on top, so held items lift toward +z here.
        .insert_resource(DragTunables {
            drag_depth: 0.5,
            ..Default::default()
        })
        .insert_resource(OverlaySettings { show_query_radii: true })
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands, tunables: Res<DragTunables>) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            // World units are meters; zoom in from the 1 px = 1 unit default.
            scale: 0.01,
            ..OrthographicProjection::default_2d()
        }),
        DragCamera,
    ));

    commands.spawn((
        Sprite::from_color(Color::srgb(0.3, 0.3, 0.35), Vec2::new(12.0, 0.4)),
        Transform::from_xyz(0.0, -3.0, 0.0),
        RigidBody::Static,
        Collider::rectangle(12.0, 0.4),
    ));

    for (x, y) in [(-2.0, -0.5), (1.0, 1.0)] {
        commands.spawn((
            Sprite::from_color(Color::srgb(0.55, 0.4, 0.25), Vec2::new(2.4, 0.15)),
            Transform::from_xyz(x, y, 0.0),
            physics::shelf(Vec2::new(2.4, 0.15)),
        ));
    }

    for i in 0..4 {
        commands.spawn((
            Sprite::from_color(Color::srgb(0.8, 0.15, 0.1), Vec2::splat(0.36)),
            Transform::from_xyz(-1.5 + i as f32 * 0.8, -2.0, 0.0),
            physics::draggable_item(&tunables, 0.18),
        ));
    }
}
