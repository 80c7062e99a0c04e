/// Critter Web - WASM bindings for the creature
///
/// The browser owns the WebGL context. Each frame it calls `advance_frame`
/// and uploads the recorded draw calls: uniforms first, then vertices.

use critter_core::{parse_command, submit_frame, Creature, DrawList, JointName};
use log::debug;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebCreature {
    creature: Creature,
    draws: DrawList,
    global: [f32; 16],
}

#[wasm_bindgen]
impl WebCreature {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebCreature, JsValue> {
        let creature = Creature::new().map_err(to_js)?;
        Ok(WebCreature {
            creature,
            draws: DrawList::new(),
            global: [0.0; 16],
        })
    }

    /// Set a joint by name, e.g. `"elbow"`
    pub fn set_joint_angle(&mut self, joint: &str, degrees: f32) -> Result<(), JsValue> {
        let joint: JointName = joint.parse().map_err(to_js)?;
        self.creature.set_joint_angle(joint, degrees);
        Ok(())
    }

    pub fn set_global_angle(&mut self, degrees: f32) {
        self.creature.set_global_angle(degrees);
    }

    pub fn set_drag_rotation(&mut self, pitch: f32, yaw: f32, active: bool) {
        self.creature.set_drag_rotation(pitch, yaw, active);
    }

    pub fn set_animating(&mut self, animating: bool) {
        self.creature.set_animating(animating);
    }

    /// Run a console command line
    pub fn command(&mut self, line: &str) -> Result<(), JsValue> {
        let command = parse_command(line).map_err(to_js)?;
        self.creature.apply(command);
        Ok(())
    }

    /// Compute a frame and record its draws. Returns the draw count.
    pub fn advance_frame(&mut self, elapsed: f64) -> Result<usize, JsValue> {
        let frame = self.creature.advance_frame(elapsed).map_err(to_js)?;
        self.draws.clear();
        submit_frame(&frame, &mut self.draws).map_err(to_js)?;
        self.global = frame.global.cells();
        debug!("recorded {} draws", self.draws.calls().len());
        Ok(self.draws.calls().len())
    }

    pub fn global_transform(&self) -> Vec<f32> {
        self.global.to_vec()
    }

    /// Flat xyz triples for draw `index`
    pub fn draw_vertices(&self, index: usize) -> Vec<f32> {
        self.draws
            .calls()
            .get(index)
            .map(|call| call.vertices.iter().flat_map(|v| [v.x, v.y, v.z]).collect())
            .unwrap_or_default()
    }

    pub fn draw_color(&self, index: usize) -> Vec<f32> {
        self.draws
            .calls()
            .get(index)
            .map(|call| call.color.to_vec())
            .unwrap_or_default()
    }

    /// Column-major model matrix for draw `index`
    pub fn draw_transform(&self, index: usize) -> Vec<f32> {
        self.draws
            .calls()
            .get(index)
            .map(|call| call.transform.to_vec())
            .unwrap_or_default()
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
