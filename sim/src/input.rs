//! Polled input snapshot.
//!
//! The simulation never receives pushed key events; the host samples its device state
//! once per executed tick and passes the snapshot to [`crate::Simulation::tick`].

use crate::vehicle::DriverInput;
use serde::{Deserialize, Serialize};

/// Key and mouse state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub brake: bool,
    pub jump: bool,
    /// Held state of the enter/exit key. The simulation reacts to its rising edge.
    pub interact: bool,
    /// Mouse movement since the previous tick (pixels).
    pub look_delta: [f32; 2],
}

impl InputState {
    /// The subset a driver uses. The back key doubles as reverse.
    pub fn driver_input(&self) -> DriverInput {
        DriverInput {
            forward: self.forward,
            reverse: self.back,
            brake: self.brake,
            left: self.left,
            right: self.right,
        }
    }

    /// Planar move axes in the camera frame: `(strafe, ahead)`, each in `{-1, 0, 1}`.
    pub fn move_axes(&self) -> (f32, f32) {
        let axis = |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        (axis(self.right, self.left), axis(self.forward, self.back))
    }
}

/// Anything the host can poll for the current input.
pub trait InputSource {
    fn poll(&mut self) -> InputState;
}
