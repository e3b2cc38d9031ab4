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

/// the rendering boundary. A SceneSink is the injected interface to the 3D engine's
/// entity/primitive registry - AIRGLOBE owns which operations are issued, the sink owns
/// the GPU-resident resources behind them.
/// Sink rejections are partial-result warnings for a pass, never fatal - the worst
/// outcome is a stale or temporarily missing visual for one aircraft

use std::collections::{HashMap, HashSet};
use nalgebra::Matrix4;

use airglobe_common::pose::Pose;

use crate::batch::InstanceBatch;
use crate::errors::{sink_rejected, AirglobeSceneError, Result};
use crate::EntityStyle;

/// opaque reference to a submitted instance batch
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub struct BatchHandle(pub u64);

/// position of one instance within a submitted batch - a lookup key, not ownership
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct BatchSlot {
    pub handle: BatchHandle,
    pub index: usize,
}

pub trait SceneSink {
    /// register a new addressable renderable
    fn add_entity (&mut self, icao24: &str, pose: &Pose, style: &EntityStyle)->Result<()>;

    /// mutate an existing renderable's pose in place
    fn update_entity (&mut self, icao24: &str, pose: &Pose)->Result<()>;

    /// deregister a renderable
    fn remove_entity (&mut self, icao24: &str)->Result<()>;

    /// submit one instanced draw unit, returning its handle
    fn submit_batch (&mut self, batch: &InstanceBatch, style: &EntityStyle)->Result<BatchHandle>;

    /// release a previously submitted draw unit
    fn drop_batch (&mut self, handle: BatchHandle)->Result<()>;

    /// mutate a single instance pose within a submitted batch. Only called when the
    /// scene config advertises supports_in_place_pose_update
    fn update_instance (&mut self, slot: &BatchSlot, transform: &Matrix4<f64>)->Result<()> {
        let _ = transform;
        Err( sink_rejected!("in-place instance update of batch {} slot {}: not supported", slot.handle.0, slot.index))
    }
}

/// what a sink was asked to do - recorded by RecordingSceneSink, mostly for tests
/// and the console demo
#[derive(Debug,Clone,PartialEq)]
pub enum SceneOp {
    Add(String),
    Update(String),
    Remove(String),
    SubmitBatch(BatchHandle,String,usize), // handle, style key, instance count
    DropBatch(BatchHandle),
    UpdateInstance(BatchSlot),
}

/// SceneSink that records every operation and can be told to reject identities,
/// mirroring an engine whose assets are not loaded yet
#[derive(Debug,Default)]
pub struct RecordingSceneSink {
    pub ops: Vec<SceneOp>,
    pub reject: HashSet<String>,          // identities whose entity ops fail
    live: HashSet<String>,                // currently registered entities
    batches: HashMap<BatchHandle,usize>,  // live batches and their instance counts
    next_handle: u64,
}

impl RecordingSceneSink {
    pub fn new ()->Self { Self::default() }

    pub fn live_entities (&self)->&HashSet<String> { &self.live }
    pub fn live_batches (&self)->&HashMap<BatchHandle,usize> { &self.batches }

    pub fn clear_ops (&mut self) { self.ops.clear(); }

    fn check_reject (&self, icao24: &str, op: &str)->Result<()> {
        if self.reject.contains( icao24) {
            Err( sink_rejected!("{} for {}", op, icao24))
        } else {
            Ok(())
        }
    }
}

impl SceneSink for RecordingSceneSink {
    fn add_entity (&mut self, icao24: &str, _pose: &Pose, _style: &EntityStyle)->Result<()> {
        self.check_reject( icao24, "add")?;
        if !self.live.insert( icao24.to_string()) {
            return Err( sink_rejected!("add for already registered {}", icao24));
        }
        self.ops.push( SceneOp::Add( icao24.to_string()));
        Ok(())
    }

    fn update_entity (&mut self, icao24: &str, _pose: &Pose)->Result<()> {
        self.check_reject( icao24, "update")?;
        if !self.live.contains( icao24) {
            return Err( sink_rejected!("update for unknown {}", icao24));
        }
        self.ops.push( SceneOp::Update( icao24.to_string()));
        Ok(())
    }

    fn remove_entity (&mut self, icao24: &str)->Result<()> {
        self.check_reject( icao24, "remove")?;
        if !self.live.remove( icao24) {
            return Err( sink_rejected!("remove for unknown {}", icao24));
        }
        self.ops.push( SceneOp::Remove( icao24.to_string()));
        Ok(())
    }

    fn submit_batch (&mut self, batch: &InstanceBatch, _style: &EntityStyle)->Result<BatchHandle> {
        self.next_handle += 1;
        let handle = BatchHandle( self.next_handle);
        self.batches.insert( handle, batch.len());
        self.ops.push( SceneOp::SubmitBatch( handle, batch.style.clone(), batch.len()));
        Ok( handle)
    }

    fn drop_batch (&mut self, handle: BatchHandle)->Result<()> {
        if self.batches.remove( &handle).is_none() {
            return Err( sink_rejected!("drop of unknown batch {}", handle.0));
        }
        self.ops.push( SceneOp::DropBatch( handle));
        Ok(())
    }

    fn update_instance (&mut self, slot: &BatchSlot, _transform: &Matrix4<f64>)->Result<()> {
        match self.batches.get( &slot.handle) {
            Some(n) if slot.index < *n => {
                self.ops.push( SceneOp::UpdateInstance( *slot));
                Ok(())
            }
            _ => Err( sink_rejected!("instance update for invalid batch {} slot {}", slot.handle.0, slot.index))
        }
    }
}
