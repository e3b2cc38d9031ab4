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

use airglobe_feed::{TrackSnapshot, TrackedAircraft};
use airglobe_scene::sink::{RecordingSceneSink, SceneOp};
use airglobe_scene::updater::SceneUpdater;
use airglobe_scene::{RenderMode, SceneConfig};

/// end-to-end tests of snapshot passes against a recording sink
/// run with "cargo test -p airglobe_scene --test test_updater -- --nocapture"

fn snapshot (aircraft: Vec<TrackedAircraft>)->TrackSnapshot {
    TrackSnapshot { time: Utc::now(), aircraft }
}

fn plane (icao24: &str, heading_deg: f64)->TrackedAircraft {
    TrackedAircraft::new( icao24, -123.0744619, 44.0503706, 5000.0, heading_deg)
}

fn discrete_updater ()->SceneUpdater<RecordingSceneSink> {
    SceneUpdater::new( SceneConfig::default(), RecordingSceneSink::new())
}

fn instanced_updater (supports_in_place: bool)->SceneUpdater<RecordingSceneSink> {
    let config = SceneConfig {
        render_mode: RenderMode::Instanced,
        supports_in_place_pose_update: supports_in_place,
        ..SceneConfig::default()
    };
    SceneUpdater::new( config, RecordingSceneSink::new())
}

#[test]
fn test_discrete_lifecycle () {
    let mut updater = discrete_updater();

    let report = updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0) ]));
    assert!( report.n_added == 1 && report.warnings.is_empty());
    assert!( updater.sink().ops == vec![ SceneOp::Add("A1".to_string()) ]);
    assert!( updater.n_rendered() == 1);

    // identical snapshot issues nothing
    updater.sink_mut().clear_ops();
    updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0) ]));
    assert!( updater.sink().ops.is_empty());

    // pose change issues one update
    updater.process_snapshot( &snapshot( vec![ plane("A1", 90.0) ]));
    assert!( updater.sink().ops == vec![ SceneOp::Update("A1".to_string()) ]);

    // absence issues one remove
    updater.sink_mut().clear_ops();
    updater.process_snapshot( &snapshot( vec![]));
    assert!( updater.sink().ops == vec![ SceneOp::Remove("A1".to_string()) ]);
    assert!( updater.sink().live_entities().is_empty());
    assert!( updater.n_rendered() == 0);
}

#[test]
fn test_discrete_rejection_retry () {
    let mut updater = discrete_updater();
    updater.sink_mut().reject.insert("A1".to_string());

    // the rejected add is a warning and the identity stays unrendered
    let report = updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0) ]));
    assert!( report.warnings.len() == 1);
    assert!( updater.n_rendered() == 1);
    assert!( updater.sink().ops == vec![ SceneOp::Add("B2".to_string()) ]);

    // once the sink accepts it the next snapshot re-adds it
    updater.sink_mut().reject.clear();
    updater.sink_mut().clear_ops();
    let report = updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0) ]));
    assert!( report.warnings.is_empty());
    assert!( updater.sink().ops == vec![ SceneOp::Add("A1".to_string()) ]);
    assert!( updater.n_rendered() == 2);
}

#[test]
fn test_discrete_update_rejection_recovery () {
    let mut updater = discrete_updater();
    updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0) ]));

    // one transient update rejection
    updater.sink_mut().reject.insert("A1".to_string());
    updater.sink_mut().clear_ops();
    let report = updater.process_snapshot( &snapshot( vec![ plane("A1", 90.0) ]));
    assert!( report.warnings.len() == 1);
    assert!( updater.n_rendered() == 0);

    // the sink may still hold the stale visual - the next snapshot reconverges on it
    updater.sink_mut().reject.clear();
    updater.sink_mut().clear_ops();
    let report = updater.process_snapshot( &snapshot( vec![ plane("A1", 90.0) ]));
    assert!( report.warnings.is_empty());
    assert!( updater.sink().ops == vec![ SceneOp::Update("A1".to_string()) ]);
    assert!( updater.n_rendered() == 1);

    // and stays converged
    updater.sink_mut().clear_ops();
    let report = updater.process_snapshot( &snapshot( vec![ plane("A1", 90.0) ]));
    assert!( report.warnings.is_empty());
    assert!( updater.sink().ops.is_empty());
    assert!( updater.sink().live_entities().contains("A1"));
}

#[test]
fn test_instanced_membership_rebuild () {
    let mut updater = instanced_updater( false);

    let report = updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0) ]));
    assert!( report.n_batches == 1);
    assert!( matches!( updater.sink().ops[..], [ SceneOp::SubmitBatch(_,_,2) ]));

    // no change, no resubmission
    updater.sink_mut().clear_ops();
    updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0) ]));
    assert!( updater.sink().ops.is_empty());

    // a new member forces drop + resubmit of the whole draw unit
    updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0), plane("C3", 0.0) ]));
    assert!( matches!( updater.sink().ops[..], [ SceneOp::DropBatch(_), SceneOp::SubmitBatch(_,_,3) ]));
    assert!( updater.sink().live_batches().len() == 1);
}

#[test]
fn test_instanced_pose_update_without_in_place () {
    let mut updater = instanced_updater( false);
    updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0) ]));

    // sink cannot mutate instances, so a pose change rebuilds
    updater.sink_mut().clear_ops();
    updater.process_snapshot( &snapshot( vec![ plane("A1", 90.0) ]));
    assert!( matches!( updater.sink().ops[..], [ SceneOp::DropBatch(_), SceneOp::SubmitBatch(_,_,1) ]));
}

#[test]
fn test_instanced_pose_update_in_place () {
    let mut updater = instanced_updater( true);
    updater.process_snapshot( &snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0) ]));

    // stable membership with an in-place capable sink touches one slot
    updater.sink_mut().clear_ops();
    updater.process_snapshot( &snapshot( vec![ plane("A1", 90.0), plane("B2", 0.0) ]));
    assert!( updater.sink().ops.len() == 1);
    assert!( matches!( updater.sink().ops[0], SceneOp::UpdateInstance(_)));
    assert!( updater.sink().live_batches().len() == 1);
}

#[tokio::test]
async fn test_run_loop () {
    let (tx, mut rx) = tokio::sync::mpsc::channel( 8);
    let mut updater = discrete_updater();

    tx.send( snapshot( vec![ plane("A1", 0.0), plane("B2", 0.0) ])).await.unwrap();
    tx.send( snapshot( vec![ plane("B2", 90.0) ])).await.unwrap();
    drop( tx); // closes the channel so run() terminates

    updater.run( &mut rx).await;

    assert!( updater.n_rendered() == 1);
    assert!( updater.sink().live_entities().contains("B2"));

    let n_removes = updater.sink().ops.iter()
        .filter( |op| matches!( op, SceneOp::Remove(_))).count();
    assert!( n_removes == 1);
}
