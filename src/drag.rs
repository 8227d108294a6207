use bevy::prelude::*;

use crate::{config::DragTunables, placement::PlacementOutcome};

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Write access to the physics side of one item. The controller and the
/// simulation are the only two position authorities; `set_kinematic(true)`
/// hands authority to the controller, `set_kinematic(false)` hands it back.
pub trait PhysicsBody {
    fn zero_velocity(&mut self);
    fn set_kinematic(&mut self, kinematic: bool);
    fn set_gravity_scale(&mut self, scale: f32);
}

/// Write access to the render side of one item.
pub trait Renderable {
    fn set_sort_order(&mut self, order: i32);
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Ephemeral state of one press-move-release cycle.
pub struct DragSession {
    /// Pointer-to-item offset (world xy) captured at press time, so the item
    /// doesn't jump to center under the cursor.
    pub offset: Vec2,
}

/// Per-item drag state machine. `session` is Some exactly while the
/// controller owns the item's position.
#[derive(Component)]
pub struct DragState {
    session: Option<DragSession>,
    depth: f32,
}

impl DragState {
    pub fn new(rest_depth: f32) -> Self {
        Self {
            session: None,
            depth: rest_depth,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Projection depth for the current mode: the drag depth while held,
    /// otherwise the depth the item last settled at.
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Resting → Dragging. `pointer_world` must be projected at the
    /// pre-transition depth (`self.depth()`), or the captured offset is
    /// wrong and the item jitters. Returns false (and changes nothing) when
    /// already dragging.
    pub fn begin(
        &mut self,
        body: &mut impl PhysicsBody,
        visual: &mut impl Renderable,
        position: Vec3,
        pointer_world: Vec3,
        tunables: &DragTunables,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        // All authority side effects flip within this call, never across
        // frames: velocity, kinematic flag, gravity, sort order.
        body.zero_velocity();
        body.set_kinematic(true);
        body.set_gravity_scale(0.0);
        visual.set_sort_order(tunables.drag_sort_order);
        self.session = Some(DragSession {
            offset: position.truncate() - pointer_world.truncate(),
        });
        self.depth = tunables.drag_depth;
        true
    }

    /// One step of the lagging follow while held: first-order blend toward
    /// `pointer + offset` at drag depth. Not exactly framerate-independent
    /// beyond this approximation; the blend factor saturates at 1.
    /// None while resting.
    pub fn follow(
        &self,
        position: Vec3,
        pointer_world: Vec3,
        delta_secs: f32,
        tunables: &DragTunables,
    ) -> Option<Vec3> {
        let session = self.session.as_ref()?;
        let target = (pointer_world.truncate() + session.offset).extend(tunables.drag_depth);
        let t = (tunables.follow_rate * delta_secs).clamp(0.0, 1.0);
        Some(position.lerp(target, t))
    }

    /// Dragging → Resting. Consumes the session and hands authority back to
    /// the simulation with normal gravity and sort order. Returns false when
    /// not dragging. The caller must resolve placement exactly once after
    /// this and apply the outcome via [`DragState::settle`].
    pub fn release(
        &mut self,
        body: &mut impl PhysicsBody,
        visual: &mut impl Renderable,
        tunables: &DragTunables,
    ) -> bool {
        if self.session.take().is_none() {
            return false;
        }
        body.set_kinematic(false);
        body.set_gravity_scale(tunables.gravity_scale);
        visual.set_sort_order(tunables.normal_sort_order);
        true
    }

    /// Apply a placement outcome after release. Velocity is zeroed
    /// unconditionally so no drag momentum survives the drop; a snapped item
    /// is parked kinematic on its shelf, an unsnapped one keeps falling.
    pub fn settle(&mut self, body: &mut impl PhysicsBody, outcome: &PlacementOutcome) {
        body.zero_velocity();
        if outcome.snapped {
            body.set_kinematic(true);
        }
        self.depth = outcome.position.z;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingBody {
        kinematic: bool,
        gravity: f32,
        velocity_zeroed: u32,
    }

    impl PhysicsBody for RecordingBody {
        fn zero_velocity(&mut self) {
            self.velocity_zeroed += 1;
        }

        fn set_kinematic(&mut self, kinematic: bool) {
            self.kinematic = kinematic;
        }

        fn set_gravity_scale(&mut self, scale: f32) {
            self.gravity = scale;
        }
    }

    #[derive(Default)]
    struct RecordingVisual {
        sort_order: i32,
    }

    impl Renderable for RecordingVisual {
        fn set_sort_order(&mut self, order: i32) {
            self.sort_order = order;
        }
    }

    fn tunables() -> DragTunables {
        DragTunables::default()
    }

    fn begun_state(position: Vec3, pointer: Vec3) -> (DragState, RecordingBody, RecordingVisual) {
        let tunables = tunables();
        let mut state = DragState::new(tunables.rest_depth);
        let mut body = RecordingBody::default();
        let mut visual = RecordingVisual::default();
        assert!(state.begin(&mut body, &mut visual, position, pointer, &tunables));
        (state, body, visual)
    }

    #[test]
    fn begin_flips_all_authority_flags_at_once() {
        let (state, body, visual) = begun_state(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 0.0));

        assert!(state.is_dragging());
        assert!(body.kinematic);
        assert_eq!(body.gravity, 0.0);
        assert_eq!(body.velocity_zeroed, 1);
        assert_eq!(visual.sort_order, tunables().drag_sort_order);
        assert_eq!(state.depth(), tunables().drag_depth);
        assert_eq!(state.session().unwrap().offset, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn press_while_dragging_is_ignored() {
        let (mut state, _, _) = begun_state(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 0.0));
        let mut body = RecordingBody::default();
        let mut visual = RecordingVisual::default();

        let accepted = state.begin(
            &mut body,
            &mut visual,
            Vec3::new(9.0, 9.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            &tunables(),
        );

        assert!(!accepted);
        // Session untouched: same offset, same depth, no side effects.
        assert_eq!(state.session().unwrap().offset, Vec2::new(0.5, 0.0));
        assert_eq!(state.depth(), tunables().drag_depth);
        assert_eq!(body.velocity_zeroed, 0);
        assert_eq!(visual.sort_order, 0);
    }

    #[test]
    fn follow_blends_toward_offset_target_at_drag_depth() {
        let (state, _, _) = begun_state(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 0.0));
        let tunables = tunables();

        // rate 15 and dt such that the blend factor is exactly one half.
        let dt = 0.5 / tunables.follow_rate;
        let position = Vec3::new(1.0, 2.0, 0.0);
        let pointer = Vec3::new(2.0, 3.0, tunables.drag_depth);
        let next = state.follow(position, pointer, dt, &tunables).unwrap();

        let target = Vec3::new(2.5, 3.0, tunables.drag_depth);
        assert!(next.abs_diff_eq(position.lerp(target, 0.5), 1e-6));
    }

    #[test]
    fn follow_saturates_to_target() {
        let (state, _, _) = begun_state(Vec3::ZERO, Vec3::ZERO);
        let tunables = tunables();

        let next = state
            .follow(Vec3::new(5.0, 5.0, 0.0), Vec3::new(1.0, 1.0, 0.0), 1.0, &tunables)
            .unwrap();

        assert!(next.abs_diff_eq(Vec3::new(1.0, 1.0, tunables.drag_depth), 1e-6));
    }

    #[test]
    fn follow_while_resting_is_none() {
        let state = DragState::new(0.0);
        assert!(state.follow(Vec3::ZERO, Vec3::ONE, 0.016, &tunables()).is_none());
    }

    #[test]
    fn release_without_drag_is_noop() {
        let mut state = DragState::new(0.0);
        let mut body = RecordingBody::default();
        let mut visual = RecordingVisual::default();

        assert!(!state.release(&mut body, &mut visual, &tunables()));
        assert_eq!(body.velocity_zeroed, 0);
        assert_eq!(body.gravity, 0.0);
        assert_eq!(visual.sort_order, 0);
    }

    #[test]
    fn release_hands_authority_back_to_simulation() {
        let (mut state, mut body, mut visual) =
            begun_state(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 0.0));
        let tunables = tunables();

        assert!(state.release(&mut body, &mut visual, &tunables));
        assert!(!state.is_dragging());
        assert!(!body.kinematic);
        assert_eq!(body.gravity, tunables.gravity_scale);
        assert_eq!(visual.sort_order, tunables.normal_sort_order);
    }

    #[test]
    fn settle_on_shelf_parks_kinematic_at_shelf_depth() {
        let (mut state, mut body, mut visual) = begun_state(Vec3::ZERO, Vec3::ZERO);
        state.release(&mut body, &mut visual, &tunables());
        let zeroed_before = body.velocity_zeroed;

        let outcome = PlacementOutcome {
            snapped: true,
            position: Vec3::new(0.8, 0.0, 2.0),
            shelf: None,
        };
        state.settle(&mut body, &outcome);

        assert_eq!(body.velocity_zeroed, zeroed_before + 1);
        assert!(body.kinematic);
        assert_eq!(state.depth(), 2.0);
    }

    #[test]
    fn settle_without_shelf_keeps_falling_at_rest_depth() {
        let (mut state, mut body, mut visual) = begun_state(Vec3::ZERO, Vec3::ZERO);
        let tunables = tunables();
        state.release(&mut body, &mut visual, &tunables);

        let outcome = PlacementOutcome {
            snapped: false,
            position: Vec3::new(3.0, 4.0, tunables.rest_depth),
            shelf: None,
        };
        state.settle(&mut body, &outcome);

        // Velocity cleared even though nothing snapped, so no drag momentum
        // carries over; the body stays dynamic and falls.
        assert!(!body.kinematic);
        assert_eq!(state.depth(), tunables.rest_depth);
    }

    #[test]
    fn zero_movement_drag_targets_the_press_position() {
        let position = Vec3::new(1.0, 2.0, 0.0);
        let pointer = Vec3::new(0.7, 1.6, 0.0);
        let (state, _, _) = begun_state(position, pointer);
        let tunables = tunables();

        let next = state.follow(position, pointer, 10.0, &tunables).unwrap();

        assert!(next.truncate().abs_diff_eq(position.truncate(), 1e-6));
        assert_eq!(next.z, tunables.drag_depth);
    }
}
