use crate::config::ControlsConfig;
use tracing::debug;

/// Drag bookkeeping for the pointer currently interacting with the globe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSession {
    /// X where the drag started; `Some` while a drag is active
    pub origin_x: Option<f64>,
    /// Last X seen by the drag, used for incremental deltas
    pub last_x: f64,
}

/// Owns the globe's rotation angle.
///
/// Two inputs write to it: the idle spin (`advance_frame`, once per rendered
/// frame) and pointer drags (`drag_to` / `touch_move` / `nudge`). Drag deltas
/// accumulate into `drag_offset` only, so a drag is never applied twice no
/// matter how pointer events and frames interleave.
#[derive(Debug, Clone)]
pub struct RotationController {
    /// Baseline angle advanced while idle (radians)
    auto_phi: f64,
    /// Sum of all drag contributions (radians)
    drag_offset: f64,
    session: PointerSession,
    auto_rotate_speed: f64,
    drag_divisor: f64,
}

impl RotationController {
    pub fn new(initial_phi: f64, controls: &ControlsConfig) -> Self {
        Self {
            auto_phi: initial_phi,
            drag_offset: 0.0,
            session: PointerSession::default(),
            auto_rotate_speed: controls.auto_rotate_speed,
            drag_divisor: controls.drag_divisor,
        }
    }

    /// Effective angle handed to the renderer.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.auto_phi + self.drag_offset
    }

    pub fn auto_phi(&self) -> f64 {
        self.auto_phi
    }

    pub fn drag_offset(&self) -> f64 {
        self.drag_offset
    }

    pub fn is_dragging(&self) -> bool {
        self.session.origin_x.is_some()
    }

    /// Per-frame step: spin while idle, hold still while dragged.
    pub fn advance_frame(&mut self) -> f64 {
        if !self.is_dragging() {
            self.auto_phi += self.auto_rotate_speed;
        }
        self.angle()
    }

    /// Begin a drag at pointer X.
    pub fn pointer_down(&mut self, x: f64) {
        self.session.origin_x = Some(x);
        self.session.last_x = x;
        debug!(x, "drag start");
    }

    /// Feed a pointer move. Returns true if an active drag consumed it.
    pub fn drag_to(&mut self, x: f64) -> bool {
        if self.session.origin_x.is_none() {
            return false;
        }
        let delta = x - self.session.last_x;
        self.drag_offset += delta / self.drag_divisor;
        self.session.last_x = x;
        true
    }

    /// Touch drags rotate exactly like mouse drags.
    pub fn touch_move(&mut self, x: f64) -> bool {
        self.drag_to(x)
    }

    /// Pointer released or left the surface. Accumulated rotation stays.
    pub fn release(&mut self) {
        if let Some(origin) = self.session.origin_x.take() {
            debug!(displacement = self.session.last_x - origin, "drag end");
        }
    }

    /// Rotate by a pixel delta without a pointer session (keyboard).
    pub fn nudge(&mut self, pixels: f64) {
        self.drag_offset += pixels / self.drag_divisor;
    }

    /// Back to the initial orientation.
    pub fn reset(&mut self, phi: f64) {
        self.auto_phi = phi;
        self.drag_offset = 0.0;
        self.session = PointerSession::default();
    }

    /// Horizontal pixels covered by the drag in progress.
    pub fn drag_displacement(&self) -> Option<f64> {
        self.session.origin_x.map(|origin| self.session.last_x - origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> RotationController {
        RotationController::new(0.0, &ControlsConfig::default())
    }

    #[test]
    fn test_idle_spin() {
        let mut rot = controller();
        for _ in 0..100 {
            rot.advance_frame();
        }
        assert!((rot.angle() - 0.5).abs() < 1e-9);
        assert_eq!(rot.drag_offset(), 0.0);
    }

    #[test]
    fn test_drag_200px_is_one_radian() {
        let mut rot = controller();
        rot.pointer_down(100.0);
        let before = rot.auto_phi();

        // Spread the drag over several moves with frames in between
        for x in [150.0, 220.0, 260.0, 300.0] {
            assert!(rot.drag_to(x));
            rot.advance_frame();
        }

        assert!((rot.drag_offset() - 1.0).abs() < 1e-9);
        assert_eq!(rot.auto_phi(), before, "no idle spin while held");
        assert_eq!(rot.drag_displacement(), Some(200.0));
    }

    #[test]
    fn test_drag_back_and_forth_nets_out() {
        let mut rot = controller();
        rot.pointer_down(0.0);
        rot.drag_to(80.0);
        rot.drag_to(-40.0);
        rot.drag_to(0.0);
        assert!(rot.drag_offset().abs() < 1e-12);
    }

    #[test]
    fn test_release_keeps_rotation() {
        let mut rot = controller();
        rot.pointer_down(10.0);
        rot.drag_to(110.0);
        rot.release();

        assert!(!rot.is_dragging());
        assert!((rot.drag_offset() - 0.5).abs() < 1e-9);

        // Moves without a new pointer-down don't rotate
        assert!(!rot.drag_to(500.0));
        assert!((rot.drag_offset() - 0.5).abs() < 1e-9);

        // Idle spin resumes
        let angle = rot.angle();
        rot.advance_frame();
        assert!(rot.angle() > angle);
    }

    #[test]
    fn test_touch_matches_mouse() {
        let mut mouse = controller();
        let mut touch = controller();
        mouse.pointer_down(0.0);
        touch.pointer_down(0.0);
        for x in [30.0, 75.0, 12.0] {
            mouse.drag_to(x);
            touch.touch_move(x);
        }
        assert_eq!(mouse.angle(), touch.angle());
    }

    #[test]
    fn test_touch_ignored_without_drag() {
        let mut rot = controller();
        assert!(!rot.touch_move(300.0));
        assert_eq!(rot.angle(), 0.0);
    }

    #[test]
    fn test_nudge_and_reset() {
        let mut rot = RotationController::new(0.25, &ControlsConfig::default());
        rot.nudge(-100.0);
        assert!((rot.angle() - (0.25 - 0.5)).abs() < 1e-9);

        rot.pointer_down(3.0);
        rot.reset(0.25);
        assert!(!rot.is_dragging());
        assert_eq!(rot.angle(), 0.25);
    }

    #[test]
    fn test_new_drag_continues_from_previous() {
        let mut rot = controller();
        rot.pointer_down(0.0);
        rot.drag_to(100.0);
        rot.release();
        rot.pointer_down(400.0);
        rot.drag_to(500.0);
        assert!((rot.drag_offset() - 1.0).abs() < 1e-9);
    }
}
