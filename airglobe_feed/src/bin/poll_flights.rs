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

//! flight feed monitoring tool - polls an OpenSky-style endpoint and prints the
//! normalized aircraft records of each snapshot

use std::{path::PathBuf, time::Duration};
use anyhow::{anyhow, Result};
use clap::Parser;
use reqwest::Client;
use tokio::time::sleep;

use airglobe_common::config::load_ron_config;
use airglobe_feed::{importer::poll_once, opensky::snapshot_age, FeedConfig};

#[derive(Parser)]
#[command(about="flight feed monitoring tool")]
struct Args {
    /// url of the flight state feed
    #[arg(required_unless_present="config")]
    url: Option<String>,

    /// feed config file (RON), replaces url and interval
    #[arg(long)]
    config: Option<PathBuf>,

    /// polling interval in seconds
    #[arg(long, default_value_t = 10)]
    interval: u64,

    /// stop after one snapshot
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config: FeedConfig = match &args.config {
        Some(path) => load_ron_config( path)?,
        None => FeedConfig {
            source: "opensky".to_string(),
            url: args.url.clone().ok_or_else( || anyhow!("no feed url given"))?,
            poll_interval: Duration::from_secs( args.interval),
            request_timeout: Duration::from_secs( 20),
        }
    };
    let client = Client::builder().timeout( config.request_timeout).build()?;

    loop {
        let snapshot = poll_once( &client, &config).await?;
        println!("--- {} aircraft at {} ({}s old)", snapshot.len(), snapshot.time, snapshot_age( &snapshot).num_seconds());
        for ac in &snapshot.aircraft {
            println!("{ac}");
        }

        if args.once { return Ok(()) }
        sleep( config.poll_interval).await;
    }
}
