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

/// OpenSky-style state vector snapshots and their normalization into TrackedAircraft.
///
/// The feed returns one JSON object per poll with a `states` array holding one
/// positionally encoded record per aircraft:
///
///    0: icao24 (string)        - mode-S transponder code, the stable identity
///    1: callsign (string)      - may be empty or blank-padded
///    2: origin country (string)
///    5: longitude (number)     - degrees, null/absent if no position known
///    6: latitude (number)      - degrees, null/absent if no position known
///    7: altitude (number)      - meters, null/absent on ground
///   10: track (number)         - degrees clockwise from north, null/absent if unknown
///
/// all other positions are ignored by AIRGLOBE.
/// Records without longitude or latitude cannot be placed on the globe and are
/// dropped here, so downstream components only ever see well-formed entities.

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{TrackSnapshot, TrackedAircraft};

pub const IDENTITY: usize = 0;
pub const CALLSIGN: usize = 1;
pub const COUNTRY: usize = 2;
pub const LONGITUDE: usize = 5;
pub const LATITUDE: usize = 6;
pub const ALTITUDE: usize = 7;
pub const HEADING: usize = 10;

/// the raw wire format of one poll result
#[derive(Deserialize,Debug)]
pub struct RawSnapshot {
    #[serde(default)]
    pub real_time: Option<i64>,

    pub time: i64, // unix epoch seconds of the snapshot

    #[serde(default)]
    pub states: Vec<Vec<Value>>,
}

/// turn a raw snapshot into a set of well-formed TrackedAircraft.
/// pure transformation - no I/O, no retry, no dedup (duplicate identities are
/// resolved last-wins by the scene reconciler)
pub fn normalize (raw: &RawSnapshot)->TrackSnapshot {
    let mut aircraft: Vec<TrackedAircraft> = Vec::with_capacity( raw.states.len());
    let mut n_dropped = 0;

    for state in &raw.states {
        match normalize_state( state) {
            Some(ac) => aircraft.push( ac),
            None => n_dropped += 1
        }
    }

    if n_dropped > 0 {
        debug!("dropped {} malformed records from snapshot", n_dropped);
    }

    let time = Utc.timestamp_opt( raw.time, 0).single().unwrap_or_else( Utc::now);
    TrackSnapshot { time, aircraft }
}

fn normalize_state (state: &[Value])->Option<TrackedAircraft> {
    // a record without an identity cannot be joined between snapshots
    let icao24 = field_str( state, IDENTITY)?;
    let longitude = field_f64( state, LONGITUDE)?;
    let latitude = field_f64( state, LATITUDE)?;

    let mut ac = TrackedAircraft::new(
        icao24,
        longitude,
        latitude,
        field_f64( state, ALTITUDE).unwrap_or(0.0),
        field_f64( state, HEADING).unwrap_or(0.0),
    );
    ac.callsign = field_str( state, CALLSIGN).map( |s| s.to_string());
    ac.country = field_str( state, COUNTRY).map( |s| s.to_string());

    Some(ac)
}

fn field_f64 (state: &[Value], idx: usize)->Option<f64> {
    state.get(idx).and_then( |v| v.as_f64())
}

fn field_str<'a> (state: &'a [Value], idx: usize)->Option<&'a str> {
    let s = state.get(idx).and_then( |v| v.as_str())?.trim();
    if s.is_empty() { None } else { Some(s) }
}

/// parse a raw snapshot from its JSON wire format
pub fn parse_snapshot (input: &str)->crate::errors::Result<RawSnapshot> {
    Ok( serde_json::from_str( input)?)
}

/// timestamp helper for tools that want to show feed latency
pub fn snapshot_age (snapshot: &TrackSnapshot)->chrono::Duration {
    Utc::now() - snapshot.time
}
