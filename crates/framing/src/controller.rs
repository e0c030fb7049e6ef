//! Pointer-driven fine aiming of the preview camera.
//!
//! [`FlyController`] owns the camera orientation. Everything that turns input
//! into rotation is a free function so it can be exercised without an event
//! loop; the controller only sequences them.

use foundation::math::{EulerXyz, Quat, Vec2, Vec3};
use tracing::trace;

use crate::config::{CameraOptics, ControlConfig, Viewport};

/// What a drag does while the pointer is held.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Look around: horizontal motion yaws, vertical motion pitches.
    #[default]
    Pan,
    /// Twist around the view axis.
    Roll,
}

/// Rotation requested by the latest pointer sample, in viewport-normalized
/// units (a full half-viewport of travel is 1.0).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MoveState {
    pub pitch_up: f64,
    pub yaw_left: f64,
    pub roll_left: f64,
    pub mode: InteractionMode,
}

impl MoveState {
    pub fn idle(mode: InteractionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        last_px: Vec2,
    },
}

/// Input vocabulary of the controller, already stripped of host details.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlInput {
    PointerDown { pos: Vec2 },
    PointerMove { pos: Vec2 },
    PointerUp,
    /// Gesture aborted by the host (pointer capture lost, window blurred).
    PointerCancel,
    ModifierDown,
    ModifierUp,
    Resize { width: f64, height: f64 },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlEvent {
    Rotated { orientation: Quat },
    /// A drag ended; expensive work keyed on the view should run now.
    Settled { euler: EulerXyz },
}

fn sign(v: f64) -> f64 {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

/// Turn one pointer sample into a [`MoveState`].
///
/// Screen `y` grows downward. Dragging moves the scene with the pointer, so a
/// drag to the right yaws the camera left and a drag downward pitches it up.
/// In roll mode the same deltas are folded into a twist whose sign depends on
/// the quadrant the pointer is in, so circling the center reads as rotation.
pub fn move_state_from_delta(
    mode: InteractionMode,
    last_px: Vec2,
    pos: Vec2,
    viewport: Viewport,
) -> MoveState {
    let (hw, hh) = viewport.half_size();
    let dx = (pos.x - last_px.x) / hw;
    let dy = (pos.y - last_px.y) / hh;

    match mode {
        InteractionMode::Pan => MoveState {
            pitch_up: dy,
            yaw_left: dx,
            roll_left: 0.0,
            mode,
        },
        InteractionMode::Roll => {
            let nx = (pos.x - hw) / hw;
            let ny = -(pos.y - hh) / hh;
            MoveState {
                pitch_up: 0.0,
                yaw_left: 0.0,
                roll_left: sign(ny) * dx + sign(nx) * dy,
                mode,
            }
        }
    }
}

/// Incremental rotation in the camera's local frame for `state`.
///
/// Each normalized delta is scaled by the half extent of the view plane,
/// `tan(half_fov) * view_distance`, and used directly as an angle in radians.
/// A narrow field of view turns less per pixel; a longer view distance turns
/// proportionally more.
pub fn rotation_step(
    state: &MoveState,
    optics: &CameraOptics,
    aspect: f64,
    rotation_speed: f64,
) -> Quat {
    let extent_y = (0.5 * optics.fov_y_deg.to_radians()).tan() * optics.view_distance;
    let extent_x = extent_y * aspect;

    let pitch = state.pitch_up * extent_y * rotation_speed;
    let yaw = state.yaw_left * extent_x * rotation_speed;
    let roll = state.roll_left * extent_y * rotation_speed;

    let v = Vec3::new(pitch, yaw, roll);
    let angle = v.length();
    if !(angle > 1e-12) || !angle.is_finite() {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(v, angle)
}

/// Apply a local-frame `step` on top of `orientation`.
pub fn compose(orientation: Quat, step: Quat) -> Quat {
    (orientation * step).normalize()
}

#[derive(Debug, Clone)]
pub struct FlyController {
    optics: CameraOptics,
    rotation_speed: f64,
    viewport: Viewport,
    orientation: Quat,
    mode: InteractionMode,
    drag: DragState,
    move_state: MoveState,
}

impl FlyController {
    pub fn new(optics: CameraOptics, controls: &ControlConfig, viewport: Viewport) -> Self {
        Self {
            optics,
            rotation_speed: controls.rotation_speed,
            viewport,
            orientation: Quat::IDENTITY,
            mode: InteractionMode::Pan,
            drag: DragState::Idle,
            move_state: MoveState::default(),
        }
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Replace the orientation outright (look-at, restore). Any drag in
    /// progress continues from the new orientation.
    pub fn set_orientation(&mut self, q: Quat) {
        self.orientation = q.normalize();
    }

    pub fn set_orientation_euler(&mut self, euler: EulerXyz) {
        self.set_orientation(Quat::from_euler_xyz(euler));
    }

    pub fn euler(&self) -> EulerXyz {
        self.orientation.to_euler_xyz()
    }

    pub fn move_state(&self) -> MoveState {
        self.move_state
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn handle(&mut self, input: ControlInput) -> Option<ControlEvent> {
        match input {
            ControlInput::PointerDown { pos } => {
                self.drag = DragState::Dragging { last_px: pos };
                self.move_state = MoveState::idle(self.mode);
                None
            }
            ControlInput::PointerMove { pos } => {
                let DragState::Dragging { last_px } = self.drag else {
                    return None;
                };
                self.move_state = move_state_from_delta(self.mode, last_px, pos, self.viewport);
                self.drag = DragState::Dragging { last_px: pos };

                let step = rotation_step(
                    &self.move_state,
                    &self.optics,
                    self.viewport.aspect(),
                    self.rotation_speed,
                );
                self.orientation = compose(self.orientation, step);
                trace!(move_state = ?self.move_state, "camera rotated");
                Some(ControlEvent::Rotated {
                    orientation: self.orientation,
                })
            }
            ControlInput::PointerUp | ControlInput::PointerCancel => {
                if !self.is_dragging() {
                    return None;
                }
                self.drag = DragState::Idle;
                self.move_state = MoveState::idle(self.mode);
                Some(ControlEvent::Settled {
                    euler: self.euler(),
                })
            }
            ControlInput::ModifierDown => {
                self.mode = InteractionMode::Roll;
                self.move_state.mode = InteractionMode::Roll;
                None
            }
            ControlInput::ModifierUp => {
                self.mode = InteractionMode::Pan;
                self.move_state.mode = InteractionMode::Pan;
                self.move_state.roll_left = 0.0;
                None
            }
            ControlInput::Resize { width, height } => {
                if width > 0.0 && height > 0.0 {
                    self.viewport = Viewport::new(width, height);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ControlEvent, ControlInput, FlyController, InteractionMode, MoveState, compose,
        move_state_from_delta, rotation_step,
    };
    use crate::config::{CameraOptics, ControlConfig, Viewport};
    use foundation::math::{EulerXyz, Quat, Vec2, Vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn controller() -> FlyController {
        FlyController::new(
            CameraOptics::default(),
            &ControlConfig::default(),
            Viewport::new(800.0, 600.0),
        )
    }

    fn drag(c: &mut FlyController, from: Vec2, to: Vec2) -> Option<ControlEvent> {
        c.handle(ControlInput::PointerDown { pos: from });
        c.handle(ControlInput::PointerMove { pos: to })
    }

    #[test]
    fn pan_drag_right_yaws_without_roll() {
        let mut c = controller();
        drag(&mut c, Vec2::new(200.0, 150.0), Vec2::new(300.0, 150.0));
        let ms = c.move_state();
        assert_close(ms.yaw_left, 0.25, 1e-12);
        assert_eq!(ms.pitch_up, 0.0);
        assert_eq!(ms.roll_left, 0.0);
        assert_eq!(ms.mode, InteractionMode::Pan);

        // Camera turned left: forward gained a -X component.
        let forward = c.orientation().rotate(-Vec3::Z);
        assert!(forward.x < 0.0);
    }

    #[test]
    fn roll_drag_right_twists_only() {
        let mut c = controller();
        c.handle(ControlInput::ModifierDown);
        drag(&mut c, Vec2::new(200.0, 150.0), Vec2::new(300.0, 150.0));
        let ms = c.move_state();
        assert_eq!(ms.yaw_left, 0.0);
        assert_eq!(ms.pitch_up, 0.0);
        assert!(ms.roll_left != 0.0);
        assert_eq!(ms.mode, InteractionMode::Roll);

        // Forward is unchanged by a pure roll.
        let forward = c.orientation().rotate(-Vec3::Z);
        assert_close(forward.z, -1.0, 1e-12);
    }

    #[test]
    fn roll_sign_follows_quadrant() {
        let vp = Viewport::new(800.0, 600.0);
        let top = move_state_from_delta(
            InteractionMode::Roll,
            Vec2::new(400.0, 100.0),
            Vec2::new(420.0, 100.0),
            vp,
        );
        let bottom = move_state_from_delta(
            InteractionMode::Roll,
            Vec2::new(400.0, 500.0),
            Vec2::new(420.0, 500.0),
            vp,
        );
        assert!(top.roll_left > 0.0);
        assert_close(bottom.roll_left, -top.roll_left, 1e-12);
    }

    #[test]
    fn narrower_fov_turns_less_per_pixel() {
        let state = MoveState {
            yaw_left: 0.5,
            ..MoveState::default()
        };
        let wide = rotation_step(&state, &CameraOptics::default(), 1.0, 1.0);
        let narrow = rotation_step(
            &state,
            &CameraOptics {
                fov_y_deg: 5.0,
                ..CameraOptics::default()
            },
            1.0,
            1.0,
        );
        assert!(narrow.angle_to(Quat::IDENTITY) < wide.angle_to(Quat::IDENTITY));
    }

    #[test]
    fn step_angle_scales_with_view_distance() {
        let state = MoveState {
            pitch_up: 0.02,
            yaw_left: 0.01,
            ..MoveState::default()
        };
        let at = |view_distance: f64| {
            let optics = CameraOptics {
                view_distance,
                ..CameraOptics::default()
            };
            rotation_step(&state, &optics, 1.5, 1.0).angle_to(Quat::IDENTITY)
        };
        let near = at(0.01);
        let base = at(1.0);
        let far = at(2.0);
        assert_close(far, 2.0 * base, 1e-9);
        assert_close(base, 100.0 * near, 1e-8);

        let tan = (0.5 * CameraOptics::default().fov_y_deg.to_radians()).tan();
        let expected = (0.02f64.powi(2) + (0.01 * 1.5f64).powi(2)).sqrt() * tan;
        assert_close(base, expected, 1e-9);
    }

    #[test]
    fn zero_motion_is_identity_step() {
        let step = rotation_step(&MoveState::default(), &CameraOptics::default(), 1.5, 1.0);
        assert_eq!(step, Quat::IDENTITY);
    }

    #[test]
    fn steps_compose_instead_of_replacing() {
        let start = Quat::from_axis_angle(Vec3::Y, 0.3);
        let step = Quat::from_axis_angle(Vec3::Y, 0.2);
        let q = compose(start, step);
        assert_close(q.angle_to(Quat::from_axis_angle(Vec3::Y, 0.5)), 0.0, 1e-6);
    }

    #[test]
    fn orientation_stays_unit_after_many_moves() {
        let mut c = controller();
        c.handle(ControlInput::PointerDown {
            pos: Vec2::new(400.0, 300.0),
        });
        for i in 0..2_000 {
            if i % 500 == 0 {
                c.handle(ControlInput::ModifierDown);
            } else if i % 500 == 250 {
                c.handle(ControlInput::ModifierUp);
            }
            let t = i as f64 * 0.37;
            c.handle(ControlInput::PointerMove {
                pos: Vec2::new(400.0 + 350.0 * t.sin(), 300.0 + 250.0 * (1.3 * t).cos()),
            });
            assert_close(c.orientation().norm(), 1.0, 1e-9);
        }
    }

    #[test]
    fn moves_without_a_press_are_ignored() {
        let mut c = controller();
        let event = c.handle(ControlInput::PointerMove {
            pos: Vec2::new(10.0, 10.0),
        });
        assert_eq!(event, None);
        assert_eq!(c.orientation(), Quat::IDENTITY);
        assert_eq!(c.handle(ControlInput::PointerUp), None);
    }

    #[test]
    fn release_settles_with_euler_angles() {
        let mut c = controller();
        drag(&mut c, Vec2::new(400.0, 300.0), Vec2::new(400.0, 360.0));
        let expected = c.euler();
        assert_eq!(
            c.handle(ControlInput::PointerUp),
            Some(ControlEvent::Settled { euler: expected })
        );
        assert!(!c.is_dragging());
        assert_eq!(c.move_state(), MoveState::idle(InteractionMode::Pan));
        assert!(expected.x > 0.0, "dragging down pitches up");
    }

    #[test]
    fn cancel_settles_like_release() {
        let mut c = controller();
        drag(&mut c, Vec2::new(400.0, 300.0), Vec2::new(450.0, 300.0));
        assert!(matches!(
            c.handle(ControlInput::PointerCancel),
            Some(ControlEvent::Settled { .. })
        ));
        assert!(!c.is_dragging());
    }

    #[test]
    fn releasing_modifier_restores_pan_and_clears_roll() {
        let mut c = controller();
        c.handle(ControlInput::ModifierDown);
        drag(&mut c, Vec2::new(100.0, 100.0), Vec2::new(150.0, 100.0));
        assert!(c.move_state().roll_left != 0.0);

        c.handle(ControlInput::ModifierUp);
        assert_eq!(c.mode(), InteractionMode::Pan);
        assert_eq!(c.move_state().roll_left, 0.0);
        assert_eq!(c.move_state().mode, InteractionMode::Pan);
    }

    #[test]
    fn second_press_restarts_the_drag_origin() {
        let mut c = controller();
        drag(&mut c, Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        c.handle(ControlInput::PointerDown {
            pos: Vec2::new(500.0, 500.0),
        });
        c.handle(ControlInput::PointerMove {
            pos: Vec2::new(540.0, 500.0),
        });
        assert_close(c.move_state().yaw_left, 0.1, 1e-12);
    }

    #[test]
    fn resize_changes_normalization() {
        let mut c = controller();
        c.handle(ControlInput::Resize {
            width: 200.0,
            height: 100.0,
        });
        c.handle(ControlInput::Resize {
            width: 0.0,
            height: 100.0,
        });
        assert_eq!(c.viewport(), Viewport::new(200.0, 100.0));
        drag(&mut c, Vec2::new(50.0, 50.0), Vec2::new(60.0, 50.0));
        assert_close(c.move_state().yaw_left, 0.1, 1e-12);
    }

    #[test]
    fn euler_round_trips_through_setter() {
        let mut c = controller();
        c.set_orientation_euler(EulerXyz::new(0.2, -0.4, 0.1));
        let e = c.euler();
        assert_close(e.x, 0.2, 1e-12);
        assert_close(e.y, -0.4, 1e-12);
        assert_close(e.z, 0.1, 1e-12);
    }
}
