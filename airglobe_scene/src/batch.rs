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

/// instance batching for high-density rendering. Instanced primitive APIs take a whole
/// collection of transforms per draw unit and usually cannot grow/shrink a submitted
/// batch, so the batcher always builds from the full current entity set and the updater
/// resubmits on membership change

use std::collections::BTreeMap;
use nalgebra::Matrix4;

use crate::{RenderedEntity, SceneConfig};

/// one instance within a batch
#[derive(Debug,Clone)]
pub struct BatchInstance {
    pub icao24: String,
    pub transform: Matrix4<f64>, // local-to-world
}

/// an ordered collection of instance transforms with a uniform visual style,
/// submitted to the scene sink as one draw unit
#[derive(Debug,Clone)]
pub struct InstanceBatch {
    pub style: String, // EntityStyle key
    pub instances: Vec<BatchInstance>,
}

impl InstanceBatch {
    pub fn len (&self)->usize { self.instances.len() }
}

pub struct InstanceBatcher {
    max_batch_size: Option<usize>,
}

impl InstanceBatcher {
    pub fn new (config: &SceneConfig)->Self {
        InstanceBatcher { max_batch_size: config.max_batch_size }
    }

    /// partition the current entity set into instance batches such that
    ///   - every entity lands in exactly one batch
    ///   - each batch has a uniform style
    ///   - no batch exceeds max_batch_size (overflow splits into further batches,
    ///     entities are never dropped)
    /// output order is deterministic (styles and instances sorted by key) so that
    /// resubmissions are reproducible
    pub fn build<'a> (&self, entities: impl Iterator<Item=&'a RenderedEntity>)->Vec<InstanceBatch> {
        let mut groups: BTreeMap<&str,Vec<&RenderedEntity>> = BTreeMap::new();
        for e in entities {
            groups.entry( e.style.as_str()).or_default().push( e);
        }

        let max = self.max_batch_size.unwrap_or( usize::MAX).max(1);
        let mut batches: Vec<InstanceBatch> = Vec::new();

        for (style,mut group) in groups {
            group.sort_by( |a,b| a.icao24.cmp( &b.icao24));

            for chunk in group.chunks( max) {
                batches.push( InstanceBatch {
                    style: style.to_string(),
                    instances: chunk.iter().map( |e| BatchInstance {
                        icao24: e.icao24.clone(),
                        transform: e.pose.transform,
                    }).collect(),
                });
            }
        }

        batches
    }
}
