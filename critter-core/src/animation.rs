/// Procedural gait and the per-frame choice between animation and sliders
use std::f64::consts::{PI, TAU};
use std::time::Instant;

use log::debug;

use crate::input::{FrameInput, GlobalPose};
use crate::skeleton::{JointAngleSet, JointName};

/// Default gait cycle rate
pub const GAIT_FREQUENCY_HZ: f64 = 1.2;

/// `amplitude * sin(2π f t + phase)`, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    pub amplitude: f32,
    pub phase: f64,
}

impl Oscillator {
    pub const fn new(amplitude: f32, phase: f64) -> Self {
        Self { amplitude, phase }
    }

    pub fn sample(&self, frequency_hz: f64, elapsed: f64) -> f32 {
        (self.amplitude as f64 * (TAU * frequency_hz * elapsed + self.phase).sin()) as f32
    }
}

/// One oscillator per joint plus a shared frequency.
///
/// Knees and ankles lag the hips; the forelimbs run half a cycle behind the
/// hind limbs.
#[derive(Debug, Clone, PartialEq)]
pub struct Gait {
    pub frequency_hz: f64,
    oscillators: Vec<(JointName, Oscillator)>,
}

impl Gait {
    pub fn new(frequency_hz: f64, oscillators: Vec<(JointName, Oscillator)>) -> Self {
        Self {
            frequency_hz,
            oscillators,
        }
    }

    pub fn standard() -> Self {
        Self::new(
            GAIT_FREQUENCY_HZ,
            vec![
                (JointName::Hip, Oscillator::new(30.0, 0.0)),
                (JointName::Knee, Oscillator::new(30.0, 1.2)),
                (JointName::Ankle, Oscillator::new(-30.0, 2.0)),
                (JointName::Shoulder, Oscillator::new(-20.0, PI)),
                (JointName::Elbow, Oscillator::new(20.0, PI + 1.2)),
                (JointName::Wrist, Oscillator::new(10.0, PI + 2.0)),
                (JointName::Tail, Oscillator::new(7.0, 0.0)),
                (JointName::Jaw, Oscillator::new(7.0, 0.0)),
            ],
        )
    }

    pub fn with_frequency(mut self, frequency_hz: f64) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn oscillator(&self, joint: JointName) -> Option<&Oscillator> {
        self.oscillators
            .iter()
            .find(|(j, _)| *j == joint)
            .map(|(_, osc)| osc)
    }

    /// Joint angles at `elapsed` seconds. A pure function of time.
    pub fn sample(&self, elapsed: f64) -> JointAngleSet {
        self.oscillators
            .iter()
            .map(|(joint, osc)| (*joint, osc.sample(self.frequency_hz, elapsed)))
            .collect()
    }
}

impl Default for Gait {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Joint angles come from the sliders
    Idle,
    /// Joint angles come from the gait
    Procedural,
}

/// What the driver decided for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct DriverOutput {
    pub state: AnimationState,
    /// True while a drag gesture owns the camera rotation
    pub pointer_override: bool,
    pub angles: JointAngleSet,
    pub global: GlobalPose,
}

/// Chooses each frame's joint angles and camera rotation
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    gait: Gait,
    state: AnimationState,
    pointer_override: bool,
}

impl AnimationDriver {
    pub fn new(gait: Gait) -> Self {
        Self {
            gait,
            state: AnimationState::Idle,
            pointer_override: false,
        }
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn gait(&self) -> &Gait {
        &self.gait
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        let next = if enabled {
            AnimationState::Procedural
        } else {
            AnimationState::Idle
        };
        if next != self.state {
            debug!("animation {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    pub fn drive(&mut self, input: &FrameInput) -> DriverOutput {
        self.set_enabled(input.animating);

        let pointer_override = input.drag.is_some();
        if pointer_override != self.pointer_override {
            debug!("pointer override {}", if pointer_override { "on" } else { "off" });
            self.pointer_override = pointer_override;
        }

        let angles = match self.state {
            AnimationState::Procedural => self.gait.sample(input.elapsed),
            AnimationState::Idle => input.joint_angles.clone(),
        };

        DriverOutput {
            state: self.state,
            pointer_override,
            angles,
            global: GlobalPose::from_input(input),
        }
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(Gait::standard())
    }
}

/// Seconds since a reference instant taken once at startup
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DragRotation, InputState};

    #[test]
    fn test_oscillator_formula() {
        let osc = Oscillator::new(30.0, 1.2);
        let t = 0.37;
        let expected = 30.0 * (TAU * 1.2 * t + 1.2).sin();
        assert!((osc.sample(1.2, t) as f64 - expected).abs() < 1e-5);
        assert_eq!(Oscillator::new(7.0, 0.0).sample(1.2, 0.0), 0.0);
    }

    #[test]
    fn test_standard_gait_covers_every_joint() {
        let gait = Gait::standard();
        assert!(gait.sample(0.8).is_complete());
        for joint in JointName::ALL {
            assert!(gait.oscillator(joint).is_some());
        }
    }

    #[test]
    fn test_gait_is_deterministic() {
        let gait = Gait::standard();
        for t in [0.0, 0.123, 1.0, 17.5, 3600.25] {
            let a = gait.sample(t);
            let b = gait.sample(t);
            for joint in JointName::ALL {
                assert_eq!(
                    a.get(joint).map(f32::to_bits),
                    b.get(joint).map(f32::to_bits)
                );
            }
        }
    }

    #[test]
    fn test_forelimbs_run_opposite_hind_limbs() {
        let gait = Gait::standard();
        // A quarter cycle in, the hip is at +30 and the shoulder at +20
        let t = 0.25 / GAIT_FREQUENCY_HZ;
        let angles = gait.sample(t);
        assert!((angles.get(JointName::Hip).unwrap() - 30.0).abs() < 1e-4);
        assert!((angles.get(JointName::Shoulder).unwrap() - 20.0).abs() < 1e-4);
    }

    #[test_log::test]
    fn test_idle_holds_slider_values() {
        let mut driver = AnimationDriver::default();
        let mut state = InputState::new();
        state.set_joint_angle(JointName::Elbow, 42.0);

        let out = driver.drive(&state.snapshot(5.0));
        assert_eq!(out.state, AnimationState::Idle);
        assert_eq!(out.angles.get(JointName::Elbow), Some(42.0));
        let later = driver.drive(&state.snapshot(9.0));
        assert_eq!(later.angles, out.angles);
    }

    #[test_log::test]
    fn test_procedural_takes_precedence_and_can_be_disabled() {
        let mut driver = AnimationDriver::default();
        let mut state = InputState::new();
        state.set_joint_angle(JointName::Hip, 80.0);
        state.set_animating(true);

        let t = 0.5;
        let out = driver.drive(&state.snapshot(t));
        assert_eq!(out.state, AnimationState::Procedural);
        assert_eq!(out.angles, Gait::standard().sample(t));

        state.set_animating(false);
        let out = driver.drive(&state.snapshot(t + 1.0));
        assert_eq!(out.state, AnimationState::Idle);
        assert_eq!(out.angles.get(JointName::Hip), Some(80.0));
    }

    #[test_log::test]
    fn test_pointer_override_is_orthogonal() {
        let mut driver = AnimationDriver::default();
        let mut state = InputState::new();
        state.set_animating(true);
        state.set_drag_rotation(10.0, 20.0, true);

        let out = driver.drive(&state.snapshot(0.3));
        assert_eq!(out.state, AnimationState::Procedural);
        assert!(out.pointer_override);
        assert_eq!(out.global, GlobalPose::Drag(DragRotation::new(10.0, 20.0)));

        state.set_drag_rotation(0.0, 0.0, false);
        let out = driver.drive(&state.snapshot(0.4));
        assert!(!out.pointer_override);
        assert_eq!(out.global, GlobalPose::Slider { yaw: 0.0 });
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::start();
        let a = clock.elapsed_secs();
        let b = clock.elapsed_secs();
        assert!(a >= 0.0 && b >= a);
    }
}
