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

/// the scene updater - single consumer of the snapshot channel. Each received snapshot
/// triggers exactly one synchronous reconciliation pass that runs to completion before
/// the next snapshot is taken from the queue, so the rendered set only ever has one
/// writer and snapshots are processed strictly in arrival order

use std::collections::HashMap;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

use airglobe_feed::TrackSnapshot;

use crate::batch::InstanceBatcher;
use crate::errors::AirglobeSceneError;
use crate::reconcile::{SceneDiff, SceneReconciler};
use crate::sink::{BatchHandle, BatchSlot, SceneSink};
use crate::{EntityStyle, RenderMode, SceneConfig};

/// outcome of one reconciliation pass as applied to the sink
#[derive(Debug,Default)]
pub struct PassReport {
    pub n_added: usize,
    pub n_updated: usize,
    pub n_removed: usize,
    pub n_batches: usize,                      // currently submitted batches after the pass
    pub warnings: Vec<AirglobeSceneError>,     // per-identity partial failures
}

pub struct SceneUpdater<S: SceneSink> {
    config: SceneConfig,
    reconciler: SceneReconciler,
    batcher: InstanceBatcher,
    sink: S,

    styles: HashMap<String,EntityStyle>,
    default_style: EntityStyle,
    batches: Vec<BatchHandle>,     // currently submitted instance batches
    force_rebuild: bool,           // set when a batch submission was rejected
}

impl<S: SceneSink> SceneUpdater<S> {
    pub fn new (config: SceneConfig, sink: S)->Self {
        let reconciler = SceneReconciler::new( &config);
        let batcher = InstanceBatcher::new( &config);

        let mut styles: HashMap<String,EntityStyle> = HashMap::new();
        for style in &config.styles {
            styles.insert( style.key.clone(), style.clone());
        }
        let default_style = config.styles.first().cloned().unwrap_or_default();

        SceneUpdater {
            config, reconciler, batcher, sink,
            styles, default_style,
            batches: Vec::new(),
            force_rebuild: false,
        }
    }

    pub fn sink (&self)->&S { &self.sink }
    pub fn sink_mut (&mut self)->&mut S { &mut self.sink }

    /// number of entities currently mirrored in the scene
    pub fn n_rendered (&self)->usize { self.reconciler.len() }

    /// drain the snapshot channel until all senders are gone. Snapshots arriving while
    /// a pass executes queue up behind it - a pass is never cancelled mid-flight
    pub async fn run (&mut self, rx: &mut Receiver<TrackSnapshot>) {
        while let Some(snapshot) = rx.recv().await {
            let report = self.process_snapshot( &snapshot);
            info!("pass at {}: +{} ~{} -{} ({} batches, {} warnings)",
                snapshot.time, report.n_added, report.n_updated, report.n_removed,
                report.n_batches, report.warnings.len());
            for w in &report.warnings {
                warn!("{}", w);
            }
        }
        debug!("snapshot channel closed, updater done");
    }

    /// one full pass: reconcile the snapshot against the rendered set and apply the
    /// resulting operations to the sink. Per-identity failures become warnings in the
    /// report - they never abort the pass
    pub fn process_snapshot (&mut self, snapshot: &TrackSnapshot)->PassReport {
        let mut diff = self.reconciler.reconcile( snapshot);

        let mut report = PassReport {
            n_added: diff.added.len(),
            n_updated: diff.updated.len(),
            n_removed: diff.removed.len(),
            ..PassReport::default()
        };
        for (icao24,source) in diff.failed.drain(..) {
            report.warnings.push( AirglobeSceneError::PoseFailed { icao24, source });
        }

        match self.config.render_mode {
            RenderMode::Discrete => self.apply_discrete( &diff, &mut report.warnings),
            RenderMode::Instanced => self.apply_instanced( &diff, &mut report.warnings),
        }

        report.n_batches = self.batches.len();
        report
    }

    fn apply_discrete (&mut self, diff: &SceneDiff, warnings: &mut Vec<AirglobeSceneError>) {
        for icao24 in &diff.added {
            let Some(e) = self.reconciler.entity( icao24) else { continue };
            let pose = e.pose;
            let style = self.styles.get( &e.style).unwrap_or( &self.default_style);

            if let Err(err) = self.sink.add_entity( icao24, &pose, style) {
                // the sink may still hold a visual from a rejected pass - update it instead
                if self.sink.update_entity( icao24, &pose).is_err() {
                    warnings.push( err);
                    self.reconciler.forget( icao24); // re-added on the next snapshot
                }
            }
        }

        for icao24 in &diff.updated {
            let Some(e) = self.reconciler.entity( icao24) else { continue };
            let pose = e.pose;

            if let Err(err) = self.sink.update_entity( icao24, &pose) {
                warnings.push( err);
                let _ = self.sink.remove_entity( icao24); // so the next add starts clean
                self.reconciler.forget( icao24);
            }
        }

        for icao24 in &diff.removed {
            if let Err(err) = self.sink.remove_entity( icao24) {
                warnings.push( err); // entity is gone from our state - sink visual may be stale
            }
        }
    }

    fn apply_instanced (&mut self, diff: &SceneDiff, warnings: &mut Vec<AirglobeSceneError>) {
        let needs_rebuild = diff.membership_changed()
            || self.force_rebuild
            || (!diff.updated.is_empty() && !self.config.supports_in_place_pose_update);

        if needs_rebuild {
            self.rebuild_batches( warnings);
            return;
        }

        for icao24 in &diff.updated {
            let Some(e) = self.reconciler.entity( icao24) else { continue };
            let Some(slot) = e.batch else {
                // entity without a slot means our batch bookkeeping is stale
                self.force_rebuild = true;
                continue;
            };
            let transform = e.pose.transform;

            if let Err(err) = self.sink.update_instance( &slot, &transform) {
                warnings.push( err);
                self.force_rebuild = true; // resynchronize on the next pass
            }
        }
    }

    /// drop all submitted batches and resubmit from the full current entity set
    fn rebuild_batches (&mut self, warnings: &mut Vec<AirglobeSceneError>) {
        for handle in self.batches.drain(..) {
            if let Err(err) = self.sink.drop_batch( handle) {
                warnings.push( err);
            }
        }

        self.force_rebuild = false;
        let batches = self.batcher.build( self.reconciler.entities());

        for batch in batches {
            let style = self.styles.get( &batch.style).unwrap_or( &self.default_style);

            match self.sink.submit_batch( &batch, style) {
                Ok(handle) => {
                    self.batches.push( handle);
                    for (index,instance) in batch.instances.iter().enumerate() {
                        self.reconciler.set_batch_slot( &instance.icao24, Some( BatchSlot { handle, index }));
                    }
                }
                Err(err) => {
                    warnings.push( err);
                    self.force_rebuild = true; // retried on the next pass
                    for instance in &batch.instances {
                        self.reconciler.set_batch_slot( &instance.icao24, None);
                    }
                }
            }
        }
    }
}
