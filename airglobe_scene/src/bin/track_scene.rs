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

//! end-to-end demo: poll a live flight feed and log the scene operations each
//! reconciliation pass produces, with a console stand-in for the 3D engine sink

use std::{path::PathBuf, sync::Arc, time::Duration};
use anyhow::{anyhow, Result};
use clap::Parser;
use nalgebra::Matrix4;
use tokio::sync::mpsc;
use tracing::info;

use airglobe_common::{config::load_ron_config, pose::Pose};
use airglobe_feed::{importer::{HttpTrackImporter, TrackConnector}, FeedConfig, TrackSnapshot};
use airglobe_scene::{
    batch::InstanceBatch,
    errors::Result as SceneResult,
    sink::{BatchHandle, BatchSlot, SceneSink},
    updater::SceneUpdater,
    EntityStyle, RenderMode, SceneConfig,
};

#[derive(Parser)]
#[command(about="live flight scene reconciliation demo")]
struct Args {
    /// url of the flight state feed
    #[arg(required_unless_present="feed_config")]
    url: Option<String>,

    /// feed config file (RON), replaces url and interval
    #[arg(long)]
    feed_config: Option<PathBuf>,

    /// scene config file (RON), replaces the rendering flags below
    #[arg(long)]
    scene_config: Option<PathBuf>,

    /// polling interval in seconds
    #[arg(long, default_value_t = 10)]
    interval: u64,

    /// render through instanced batches instead of discrete entities
    #[arg(long)]
    instanced: bool,

    /// per-batch instance ceiling
    #[arg(long)]
    max_batch_size: Option<usize>,
}

/// SceneSink that logs every operation instead of driving a 3D engine
struct ConsoleSceneSink {
    next_handle: u64,
}

impl SceneSink for ConsoleSceneSink {
    fn add_entity (&mut self, icao24: &str, pose: &Pose, style: &EntityStyle)->SceneResult<()> {
        info!("add {} at {} ({})", icao24, pose.position, style.key);
        Ok(())
    }

    fn update_entity (&mut self, icao24: &str, pose: &Pose)->SceneResult<()> {
        info!("update {} to {}", icao24, pose.position);
        Ok(())
    }

    fn remove_entity (&mut self, icao24: &str)->SceneResult<()> {
        info!("remove {}", icao24);
        Ok(())
    }

    fn submit_batch (&mut self, batch: &InstanceBatch, style: &EntityStyle)->SceneResult<BatchHandle> {
        self.next_handle += 1;
        info!("submit batch {} with {} instances ({})", self.next_handle, batch.len(), style.key);
        Ok( BatchHandle( self.next_handle))
    }

    fn drop_batch (&mut self, handle: BatchHandle)->SceneResult<()> {
        info!("drop batch {}", handle.0);
        Ok(())
    }

    fn update_instance (&mut self, slot: &BatchSlot, _transform: &Matrix4<f64>)->SceneResult<()> {
        info!("update batch {} slot {}", slot.handle.0, slot.index);
        Ok(())
    }
}

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let feed_config: FeedConfig = match &args.feed_config {
        Some(path) => load_ron_config( path)?,
        None => FeedConfig {
            source: "opensky".to_string(),
            url: args.url.clone().ok_or_else( || anyhow!("no feed url given"))?,
            poll_interval: Duration::from_secs( args.interval),
            request_timeout: Duration::from_secs( 20),
        }
    };
    let feed_config = Arc::new( feed_config);

    let scene_config: SceneConfig = match &args.scene_config {
        Some(path) => load_ron_config( path)?,
        None => SceneConfig {
            render_mode: if args.instanced { RenderMode::Instanced } else { RenderMode::Discrete },
            max_batch_size: args.max_batch_size,
            supports_in_place_pose_update: args.instanced, // the console sink can do anything
            ..SceneConfig::default()
        }
    };

    let (tx, mut rx) = mpsc::channel::<TrackSnapshot>( 8);

    let mut importer = HttpTrackImporter::new( feed_config);
    importer.start( tx).await?;

    let mut updater = SceneUpdater::new( scene_config, ConsoleSceneSink { next_handle: 0 });
    updater.run( &mut rx).await;

    importer.terminate();
    Ok(())
}
