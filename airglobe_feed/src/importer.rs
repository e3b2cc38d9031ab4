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

/// live telemetry import. A TrackConnector obtains snapshots from some external source
/// and pushes them into a bounded channel with exactly one consumer (the scene updater),
/// which preserves arrival order and keeps reconciliation passes strictly sequential.
/// Import failures are never fatal - a failed cycle is logged and retried on the next
/// poll interval

use std::{sync::Arc, time::Instant};
use async_trait::async_trait;
use reqwest::Client;
use tokio::{sync::mpsc::Sender, task::JoinHandle, time::sleep};
use tracing::{debug, info, warn};

use crate::{errors::Result, opensky::{normalize, RawSnapshot}, FeedConfig, TrackSnapshot};

/// where normalized snapshots come from.
/// implementations own their input side (socket, http poll, replay file) and only
/// interact with the rest of the system through the snapshot channel
#[async_trait]
pub trait TrackConnector {
    fn new (config: Arc<FeedConfig>)->Self;
    async fn start (&mut self, tx: Sender<TrackSnapshot>)->Result<()>;
    fn terminate (&mut self);
}

/// TrackConnector that periodically polls an OpenSky-style http endpoint
pub struct HttpTrackImporter {
    config: Arc<FeedConfig>,
    task: Option<JoinHandle<()>>,
}

#[async_trait]
impl TrackConnector for HttpTrackImporter {
    fn new (config: Arc<FeedConfig>)->Self {
        HttpTrackImporter { config, task: None }
    }

    async fn start (&mut self, tx: Sender<TrackSnapshot>)->Result<()> {
        let client = Client::builder()
            .timeout( self.config.request_timeout)
            .build()?;
        let config = self.config.clone();

        self.task = Some( tokio::spawn( async move {
            run_poll_loop( client, config, tx).await;
        }));

        Ok(())
    }

    fn terminate (&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_poll_loop (client: Client, config: Arc<FeedConfig>, tx: Sender<TrackSnapshot>) {
    loop {
        let t_start = Instant::now();

        match poll_once( &client, &config).await {
            Ok(snapshot) => {
                debug!("'{}' snapshot with {} aircraft", config.source, snapshot.len());
                if tx.send( snapshot).await.is_err() {
                    info!("snapshot consumer closed, stopping '{}' import", config.source);
                    return;
                }
            }
            Err(e) => warn!("failed to poll '{}': {}", config.source, e)
        }

        let elapsed = t_start.elapsed();
        if elapsed < config.poll_interval {
            sleep( config.poll_interval - elapsed).await; // sleep for remainder of polling interval
        }
    }
}

/// one poll cycle: fetch, decode and normalize the current snapshot
pub async fn poll_once (client: &Client, config: &FeedConfig)->Result<TrackSnapshot> {
    let raw: RawSnapshot = client.get( &config.url)
        .send().await?
        .error_for_status()?
        .json().await?;

    Ok( normalize( &raw))
}
