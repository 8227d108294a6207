use avian2d::prelude::*;
use bevy::prelude::*;

use crate::{
    DragCamera, SortOrder,
    config::DragTunables,
    drag::DragState,
    physics::{AvianBody, AvianIndex},
    placement,
    projection::pointer_world_at_depth,
};

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PointerInput>().add_systems(
            Update,
            (emit_pointer_input, drag_begin, drag_follow, drag_release).chain(),
        );
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Explicit pointer events dispatched into the drag state machine, replacing
/// engine-owned mouse hooks. Anything that can poll a button and a cursor
/// can drive a drag.
#[derive(Message, Debug, Clone, Copy)]
pub struct PointerInput {
    pub action: PointerAction,
    /// Screen-space cursor position.
    pub screen: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Press,
    Move,
    Release,
}

/// Poll the left mouse button into pointer messages. Move fires every frame
/// while the button is held, whether or not the cursor moved, so a held item
/// keeps easing toward a stationary pointer.
fn emit_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut messages: MessageWriter<PointerInput>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(screen) = window.cursor_position() else {
        return;
    };

    if mouse.just_pressed(MouseButton::Left) {
        messages.write(PointerInput { action: PointerAction::Press, screen });
    }
    if mouse.pressed(MouseButton::Left) {
        messages.write(PointerInput { action: PointerAction::Move, screen });
    }
    if mouse.just_released(MouseButton::Left) {
        messages.write(PointerInput { action: PointerAction::Release, screen });
    }
}

// ---------------------------------------------------------------------------
// Drag begin
// ---------------------------------------------------------------------------

type ItemComponents = (
    Entity,
    &'static mut Transform,
    &'static mut DragState,
    &'static mut RigidBody,
    &'static mut LinearVelocity,
    &'static mut GravityScale,
    &'static mut SortOrder,
);

fn drag_begin(
    mut messages: MessageReader<PointerInput>,
    tunables: Res<DragTunables>,
    camera_query: Query<(&Camera, &GlobalTransform), With<DragCamera>>,
    index: AvianIndex,
    mut items: Query<ItemComponents>,
) {
    for message in messages.read() {
        if message.action != PointerAction::Press {
            continue;
        }
        // One session at a time; a press while something is held is a no-op.
        if items.iter().any(|(_, _, state, ..)| state.is_dragging()) {
            continue;
        }

        let Ok((camera, camera_transform)) = camera_query.single() else {
            return;
        };
        // Coarse pick at rest depth to find the item under the cursor; the
        // offset capture below re-projects at the item's own current depth.
        let Some(pick) =
            pointer_world_at_depth(camera, camera_transform, message.screen, tunables.rest_depth)
        else {
            continue;
        };
        let Some(entity) = index.pick_item(pick.truncate()) else {
            continue;
        };
        let Ok((entity, transform, mut state, mut rigid_body, mut velocity, mut gravity, mut sort_order)) =
            items.get_mut(entity)
        else {
            continue;
        };
        let Some(pointer_world) =
            pointer_world_at_depth(camera, camera_transform, message.screen, state.depth())
        else {
            continue;
        };

        let mut body = AvianBody {
            body: &mut rigid_body,
            velocity: &mut velocity,
            gravity: &mut gravity,
        };
        if state.begin(&mut body, &mut *sort_order, transform.translation, pointer_world, &tunables) {
            debug!("drag begun on {entity}");
        }
    }
}

// ---------------------------------------------------------------------------
// Drag follow
// ---------------------------------------------------------------------------

fn drag_follow(
    mut messages: MessageReader<PointerInput>,
    time: Res<Time>,
    tunables: Res<DragTunables>,
    camera_query: Query<(&Camera, &GlobalTransform), With<DragCamera>>,
    mut items: Query<(&mut Transform, &DragState)>,
) {
    let Some(screen) = messages
        .read()
        .filter(|message| message.action == PointerAction::Move)
        .map(|message| message.screen)
        .last()
    else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    for (mut transform, state) in &mut items {
        if !state.is_dragging() {
            continue;
        }
        let Some(pointer_world) =
            pointer_world_at_depth(camera, camera_transform, screen, state.depth())
        else {
            continue;
        };
        if let Some(position) =
            state.follow(transform.translation, pointer_world, time.delta_secs(), &tunables)
        {
            transform.translation = position;
        }
    }
}

// ---------------------------------------------------------------------------
// Drag release
// ---------------------------------------------------------------------------

fn drag_release(
    mut messages: MessageReader<PointerInput>,
    tunables: Res<DragTunables>,
    index: AvianIndex,
    mut items: Query<ItemComponents>,
) {
    if !messages
        .read()
        .any(|message| message.action == PointerAction::Release)
    {
        return;
    }

    for (entity, mut transform, mut state, mut rigid_body, mut velocity, mut gravity, mut sort_order) in
        &mut items
    {
        let mut body = AvianBody {
            body: &mut rigid_body,
            velocity: &mut velocity,
            gravity: &mut gravity,
        };
        if !state.release(&mut body, &mut *sort_order, &tunables) {
            continue;
        }

        // Resolve placement exactly once per release, from live queries.
        let outcome = placement::resolve(&index, entity, transform.translation, &tunables);
        transform.translation = outcome.position;
        state.settle(&mut body, &outcome);

        match outcome.shelf {
            Some(shelf) => debug!("{entity} snapped to shelf {shelf} at {}", outcome.position),
            None => debug!("{entity} dropped free at {}", outcome.position),
        }
    }
}
