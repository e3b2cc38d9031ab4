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

/// the scene reconciler - the state machine that turns a new snapshot plus the
/// previously rendered entity set into the minimal add/update/remove diff.
/// The previous set is keyed by aircraft identity and exclusively owned here;
/// callers only ever observe rendered state through the diff of a pass

use std::collections::HashMap;

use airglobe_common::errors::AirglobeCommonError;
use airglobe_common::pose::{resolve_pose, PoseEpsilon};
use airglobe_feed::{TrackSnapshot, TrackedAircraft};

use crate::{RenderedEntity, SceneConfig, sink::BatchSlot};

/// result of one reconciliation pass. Lists hold identities - entity data for added
/// and updated identities is available through `SceneReconciler::entity`
#[derive(Debug,Default)]
pub struct SceneDiff {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    pub failed: Vec<(String,AirglobeCommonError)>,
}

impl SceneDiff {
    /// did this pass change batch membership?
    pub fn membership_changed (&self)->bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    pub fn is_empty (&self)->bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty() && self.failed.is_empty()
    }
}

pub struct SceneReconciler {
    previous: HashMap<String,RenderedEntity>, // the currently rendered set, exclusively owned
    eps: PoseEpsilon,
    default_style: String,
}

impl SceneReconciler {
    pub fn new (config: &SceneConfig)->Self {
        SceneReconciler {
            previous: HashMap::new(),
            eps: config.pose_epsilon(),
            default_style: config.default_style_key().to_string(),
        }
    }

    pub fn len (&self)->usize { self.previous.len() }
    pub fn is_empty (&self)->bool { self.previous.is_empty() }

    pub fn entity (&self, icao24: &str)->Option<&RenderedEntity> {
        self.previous.get( icao24)
    }

    pub fn entities (&self)->impl Iterator<Item=&RenderedEntity> {
        self.previous.values()
    }

    /// drop an identity from the rendered set without emitting a removal, so that it is
    /// re-added on the next snapshot (used after the sink rejected an operation for it)
    pub fn forget (&mut self, icao24: &str)->bool {
        self.previous.remove( icao24).is_some()
    }

    /// record which batch slot currently holds the entity (None after a batch rebuild
    /// dropped it, or in discrete render mode)
    pub fn set_batch_slot (&mut self, icao24: &str, slot: Option<BatchSlot>) {
        if let Some(e) = self.previous.get_mut( icao24) {
            e.batch = slot;
        }
    }

    /// one reconciliation pass:
    ///   - identities new to the rendered set are added
    ///   - known identities whose pose moved beyond the epsilon are updated
    ///   - known identities with an unchanged pose emit nothing (idempotence)
    ///   - identities absent from the snapshot are removed (computed after adds/updates)
    ///   - a pose resolution failure is reported per identity and treats the identity
    ///     as absent for this pass, never aborting the rest of the snapshot
    /// duplicate identities within one snapshot resolve last-wins
    pub fn reconcile (&mut self, snapshot: &TrackSnapshot)->SceneDiff {
        let mut diff = SceneDiff::default();

        // collapse duplicates first so each identity is classified exactly once
        let mut latest: HashMap<&str,&TrackedAircraft> = HashMap::with_capacity( snapshot.len());
        for ac in &snapshot.aircraft {
            latest.insert( ac.icao24.as_str(), ac); // last occurrence wins
        }

        let mut next: HashMap<String,RenderedEntity> = HashMap::with_capacity( latest.len());

        for (_,ac) in latest {
            let pose = match resolve_pose( ac.longitude, ac.latitude, ac.altitude_meters(), ac.heading) {
                Ok(pose) => pose,
                Err(e) => {
                    diff.failed.push( (ac.icao24.clone(), e));
                    continue; // treated as absent from this snapshot
                }
            };

            match self.previous.remove( &ac.icao24) {
                Some(mut entity) => {
                    if !entity.pose.approx_eq( &pose, &self.eps) {
                        entity.pose = pose;
                        diff.updated.push( ac.icao24.clone());
                    }
                    entity.callsign = ac.callsign.clone(); // label changes don't mutate the scene
                    next.insert( ac.icao24.clone(), entity);
                }
                None => {
                    diff.added.push( ac.icao24.clone());
                    next.insert( ac.icao24.clone(), RenderedEntity {
                        icao24: ac.icao24.clone(),
                        callsign: ac.callsign.clone(),
                        pose,
                        style: self.default_style.clone(),
                        batch: None,
                    });
                }
            }
        }

        // everything left in previous was not in the snapshot
        diff.removed.extend( self.previous.drain().map( |(icao24,_)| icao24));

        self.previous = next;
        diff
    }
}
