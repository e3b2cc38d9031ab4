/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “AIRGLOBE” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/// the scene core of AIRGLOBE: reconciliation of normalized telemetry snapshots into
/// minimal add/update/remove operations against a stateful 3D scene, plus instanced
/// draw batching for high-density rendering.
/// The 3D engine itself stays behind the SceneSink trait - this crate never touches
/// GPU resources

use serde::{Deserialize, Serialize};

use airglobe_common::pose::{Pose, PoseEpsilon};

pub mod batch;
pub mod errors;
pub mod reconcile;
pub mod sink;
pub mod updater;

use sink::BatchSlot;

/// how rendered entities reach the sink: one addressable scene entity per aircraft,
/// or instanced draw batches rebuilt on membership change
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq)]
pub enum RenderMode {
    Discrete,
    Instanced,
}

/// visual style of a rendered aircraft. One style per instance batch - entities with
/// different styles are never mixed into the same batch
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct EntityStyle {
    pub key: String,
    pub model_uri: String,
    pub minimum_pixel_size: f64,
    pub maximum_scale: f64,
    pub run_animations: bool,
    pub color: Option<String>,               // css color name/hex, engine specific
    pub distance_display: (f64, f64),        // visible camera distance range in meters
}

impl Default for EntityStyle {
    // the stock airliner style of the globe view
    fn default ()->Self {
        EntityStyle {
            key: "aircraft".to_string(),
            model_uri: "assets/plane-models/a319.glb".to_string(),
            minimum_pixel_size: 40.0,
            maximum_scale: 10000.0,
            run_animations: false,
            color: None,
            distance_display: (0.0, 6e6),
        }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct SceneConfig {
    pub render_mode: RenderMode,
    pub max_batch_size: Option<usize>,           // per-batch instance ceiling imposed by the sink
    pub supports_in_place_pose_update: bool,     // can the sink mutate single instance poses?
    pub position_epsilon_m: f64,                 // suppress updates below this position delta
    pub orientation_epsilon_deg: f64,            // suppress updates below this orientation delta
    pub styles: Vec<EntityStyle>,
}

impl SceneConfig {
    pub fn pose_epsilon (&self)->PoseEpsilon {
        PoseEpsilon { position_m: self.position_epsilon_m, orientation_deg: self.orientation_epsilon_deg }
    }

    pub fn default_style_key (&self)->&str {
        self.styles.first().map( |s| s.key.as_str()).unwrap_or("aircraft")
    }
}

impl Default for SceneConfig {
    fn default ()->Self {
        let eps = PoseEpsilon::default();
        SceneConfig {
            render_mode: RenderMode::Discrete,
            max_batch_size: None,
            supports_in_place_pose_update: false,
            position_epsilon_m: eps.position_m,
            orientation_epsilon_deg: eps.orientation_deg,
            styles: vec![ EntityStyle::default() ],
        }
    }
}

/// scene-side mirror of one tracked aircraft. Created when its identity first shows up
/// in a snapshot, mutated in place while the identity stays present, destroyed when it
/// disappears. The `batch` slot is a lookup key into the currently submitted instance
/// batches, not ownership
#[derive(Debug,Clone)]
pub struct RenderedEntity {
    pub icao24: String,
    pub callsign: Option<String>,
    pub pose: Pose,
    pub style: String,              // EntityStyle key
    pub batch: Option<BatchSlot>,
}
