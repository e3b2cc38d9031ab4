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

/// the telemetry boundary of AIRGLOBE: tracked aircraft data model, snapshot
/// normalization for OpenSky-style state vector feeds and the live polling importer.
/// This crate performs no scene work - normalized snapshots are pushed into a
/// single-consumer channel that the airglobe_scene updater drains

use std::{fmt, time::Duration};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::{foot, meter}};

use airglobe_common::angle::Angle360;

pub mod errors;
pub mod importer;
pub mod opensky;

/// how to reach and poll a flight state feed
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct FeedConfig {
    pub source: String,            // display name of the feed
    pub url: String,               // endpoint returning the current state snapshot
    pub poll_interval: Duration,   // how often to request a new snapshot
    pub request_timeout: Duration,
}

/// one well-formed aircraft record within a snapshot.
/// `icao24` is the stable identity (mode-S transponder code) and the sole join key
/// between snapshots - every other field may change from poll to poll
#[derive(Debug,Clone)]
pub struct TrackedAircraft {
    pub icao24: String,
    pub callsign: Option<String>,
    pub country: Option<String>,
    pub longitude: f64,         // degrees
    pub latitude: f64,          // degrees
    pub altitude: Length,       // above ellipsoid
    pub heading: Angle360,
}

impl TrackedAircraft {
    pub fn new (icao24: impl ToString, longitude: f64, latitude: f64, altitude_m: f64, heading_deg: f64)->Self {
        TrackedAircraft {
            icao24: icao24.to_string(),
            callsign: None,
            country: None,
            longitude,
            latitude,
            altitude: Length::new::<meter>( altitude_m),
            heading: Angle360::from_degrees( heading_deg),
        }
    }

    pub fn altitude_meters (&self)->f64 { self.altitude.get::<meter>() }
    pub fn altitude_ft (&self)->f64 { self.altitude.get::<foot>() }
}

impl fmt::Display for TrackedAircraft {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!( f, "{} {:8} [{:11.5},{:10.5}] {:7.0}m {:5.1}deg",
            self.icao24,
            self.callsign.as_deref().unwrap_or("-"),
            self.longitude, self.latitude,
            self.altitude_meters(),
            self.heading.degrees())
    }
}

/// one complete poll result - all aircraft visible to the feed at `time`
#[derive(Debug,Clone)]
pub struct TrackSnapshot {
    pub time: DateTime<Utc>,
    pub aircraft: Vec<TrackedAircraft>,
}

impl TrackSnapshot {
    pub fn len (&self)->usize { self.aircraft.len() }
    pub fn is_empty (&self)->bool { self.aircraft.is_empty() }
}
