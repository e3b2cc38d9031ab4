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

use chrono::Utc;

use airglobe_common::errors::AirglobeCommonError;
use airglobe_feed::{TrackSnapshot, TrackedAircraft};
use airglobe_scene::reconcile::SceneReconciler;
use airglobe_scene::SceneConfig;

/// unit tests for the scene reconciler state machine
/// run with "cargo test -p airglobe_scene --test test_reconcile -- --nocapture"

fn snapshot (aircraft: Vec<TrackedAircraft>)->TrackSnapshot {
    TrackSnapshot { time: Utc::now(), aircraft }
}

fn plane (icao24: &str, heading_deg: f64)->TrackedAircraft {
    TrackedAircraft::new( icao24, -123.0744619, 44.0503706, 5000.0, heading_deg)
}

#[test]
fn test_add_update_remove_cycle () {
    let mut reconciler = SceneReconciler::new( &SceneConfig::default());

    // first appearance on empty previous state
    let diff = reconciler.reconcile( &snapshot( vec![ plane("A1", 0.0) ]));
    assert!( diff.added == vec!["A1".to_string()]);
    assert!( diff.updated.is_empty() && diff.removed.is_empty() && diff.failed.is_empty());
    assert!( reconciler.len() == 1);

    // reconciling the same snapshot again is a no-op
    let diff = reconciler.reconcile( &snapshot( vec![ plane("A1", 0.0) ]));
    assert!( diff.is_empty());

    // changed heading emits exactly one update
    let diff = reconciler.reconcile( &snapshot( vec![ plane("A1", 90.0) ]));
    assert!( diff.added.is_empty());
    assert!( diff.updated == vec!["A1".to_string()]);
    assert!( diff.removed.is_empty());

    // a missing identity is removed exactly once
    let diff = reconciler.reconcile( &snapshot( vec![]));
    assert!( diff.removed == vec!["A1".to_string()]);
    assert!( reconciler.is_empty());
}

#[test]
fn test_idempotence_with_many () {
    let mut reconciler = SceneReconciler::new( &SceneConfig::default());

    let planes: Vec<TrackedAircraft> = (0..50).map( |i| {
        TrackedAircraft::new( format!("AC{i:03}"), -123.0 + (i as f64)*0.1, 44.0, 5000.0, (i as f64)*7.0)
    }).collect();

    let diff = reconciler.reconcile( &snapshot( planes.clone()));
    assert!( diff.added.len() == 50);
    assert!( reconciler.len() == 50);

    let diff = reconciler.reconcile( &snapshot( planes));
    assert!( diff.is_empty());
    assert!( reconciler.len() == 50);
}

#[test]
fn test_epsilon_suppression () {
    let mut reconciler = SceneReconciler::new( &SceneConfig::default());
    reconciler.reconcile( &snapshot( vec![ plane("A1", 0.0) ]));

    // millimeter scale position noise does not emit an update
    let mut wiggled = plane("A1", 0.0);
    wiggled.latitude += 1e-8;
    let diff = reconciler.reconcile( &snapshot( vec![ wiggled ]));
    assert!( diff.is_empty());

    // a real move does
    let mut moved = plane("A1", 0.0);
    moved.latitude += 1e-3;
    let diff = reconciler.reconcile( &snapshot( vec![ moved ]));
    assert!( diff.updated == vec!["A1".to_string()]);
}

#[test]
fn test_duplicate_identity_last_wins () {
    let mut reconciler = SceneReconciler::new( &SceneConfig::default());

    let diff = reconciler.reconcile( &snapshot( vec![ plane("A1", 0.0), plane("A1", 90.0) ]));
    assert!( diff.added == vec!["A1".to_string()]); // classified exactly once
    assert!( reconciler.len() == 1);

    // the stored pose is the one of the last record
    let expected = airglobe_common::pose::resolve_pose( -123.0744619, 44.0503706, 5000.0,
        airglobe_common::angle::Angle360::from_degrees( 90.0)).unwrap();
    let entity = reconciler.entity("A1").unwrap();
    assert!( entity.pose.orientation.angle_to( &expected.orientation) < 1e-9);
}

#[test]
fn test_partial_failure_isolation () {
    let mut reconciler = SceneReconciler::new( &SceneConfig::default());

    // B2 carries an out-of-range latitude that slipped past upstream filtering
    let mut bad = plane("B2", 0.0);
    bad.latitude = 94.0;

    let diff = reconciler.reconcile( &snapshot( vec![ plane("A1", 0.0), bad.clone() ]));
    assert!( diff.added == vec!["A1".to_string()]);
    assert!( diff.failed.len() == 1);
    assert!( diff.failed[0].0 == "B2");
    assert!( matches!( diff.failed[0].1, AirglobeCommonError::InvalidCoordinate{..}));
    assert!( reconciler.entity("B2").is_none()); // treated as absent

    // when it starts resolving it becomes a plain add
    let diff = reconciler.reconcile( &snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0) ]));
    assert!( diff.added == vec!["B2".to_string()]);
    assert!( diff.failed.is_empty());
}

#[test]
fn test_removal_completeness () {
    let mut reconciler = SceneReconciler::new( &SceneConfig::default());
    reconciler.reconcile( &snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0), plane("C3", 0.0) ]));

    let diff = reconciler.reconcile( &snapshot( vec![ plane("B2", 0.0) ]));
    let mut removed = diff.removed.clone();
    removed.sort();
    assert!( removed == vec!["A1".to_string(), "C3".to_string()]);
    assert!( diff.added.is_empty() && diff.updated.is_empty());
    assert!( reconciler.len() == 1);
}

#[test]
fn test_callsign_change_is_silent () {
    let mut reconciler = SceneReconciler::new( &SceneConfig::default());

    let mut p = plane("A1", 0.0);
    p.callsign = Some("UAL814".to_string());
    reconciler.reconcile( &snapshot( vec![ p ]));

    let mut p = plane("A1", 0.0);
    p.callsign = Some("UAL815".to_string());
    let diff = reconciler.reconcile( &snapshot( vec![ p ]));

    assert!( diff.is_empty()); // label changes don't mutate the scene
    assert!( reconciler.entity("A1").unwrap().callsign.as_deref() == Some("UAL815"));
}
