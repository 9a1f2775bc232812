use glam::Vec3;

/// Per-frame blend weight toward the target rotation.
pub const ROTATION_SMOOTHING: f32 = 0.1;

/// Eases the mesh rotation (degrees, X/Y/Z) toward a target a fixed fraction per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationSmoother {
    current: Vec3,
    target: Vec3,
    factor: f32,
}

impl Default for RotationSmoother {
    fn default() -> Self {
        Self::new(ROTATION_SMOOTHING)
    }
}

impl RotationSmoother {
    /// Smoother with blend weight `factor`, clamped into `(0, 1]`.
    pub fn new(factor: f32) -> Self {
        let factor = if factor.is_finite() {
            factor.clamp(f32::EPSILON, 1.0)
        } else {
            ROTATION_SMOOTHING
        };
        Self {
            current: Vec3::ZERO,
            target: Vec3::ZERO,
            factor,
        }
    }

    /// Set the rotation to approach.
    pub fn set_target(&mut self, degrees: Vec3) {
        self.target = degrees;
    }

    /// Jump to `degrees` without easing.
    pub fn snap_to(&mut self, degrees: Vec3) {
        self.current = degrees;
        self.target = degrees;
    }

    /// Advance one frame: `current = lerp(current, target, factor)` per axis.
    pub fn step(&mut self) -> Vec3 {
        self.current = self.current.lerp(self.target, self.factor);
        self.current
    }

    /// Current rotation in degrees.
    pub fn current(&self) -> Vec3 {
        self.current
    }

    /// Target rotation in degrees.
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Largest per-axis distance to the target, in degrees.
    pub fn remaining(&self) -> f32 {
        (self.target - self.current).abs().max_element()
    }

    /// Whether every axis is within `epsilon` degrees of the target.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.remaining() <= epsilon
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview3d/rotation.rs"]
mod tests;
