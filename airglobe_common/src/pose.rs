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

/// the geodetic pose resolver: geodetic position + heading -> ECEF position, orientation
/// quaternion and local-to-world transform.
/// Discrete scene entities consume the quaternion, instanced primitives the 4x4 matrix,
/// hence a Pose carries both representations.
///
/// conventions:
///   - local frame at the geodetic position is east-north-up (x east, y north, z up)
///   - heading is degrees clockwise from true north, a rotation about the local up axis
///   - pitch and roll are approximated as 0 (level flight attitude)

use nalgebra::{Isometry3, Matrix3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3};

use crate::angle::Angle360;
use crate::errors::{AirglobeCommonError, Result};
use crate::geo::{Cartesian3, Cartographic};

/// position and attitude of a rendered object in ECEF space
#[derive(Debug,Clone,Copy)]
pub struct Pose {
    pub position: Cartesian3,                 // ECEF meters
    pub orientation: UnitQuaternion<f64>,     // body-to-ECEF rotation
    pub transform: Matrix4<f64>               // local-to-world (rotation + translation)
}

impl Pose {
    /// equality up to the given thresholds, used to suppress no-op scene updates
    /// caused by floating point noise in consecutive snapshots
    pub fn approx_eq (&self, other: &Pose, eps: &PoseEpsilon)->bool {
        self.position.distance_to( &other.position) <= eps.position_m
            && self.orientation.angle_to( &other.orientation) <= eps.orientation_deg.to_radians()
    }
}

/// thresholds below which two poses are considered identical
#[derive(Debug,Clone,Copy)]
pub struct PoseEpsilon {
    pub position_m: f64,
    pub orientation_deg: f64
}

impl Default for PoseEpsilon {
    // sub-meter and sub-degree jitter is invisible at globe scale
    fn default ()->Self { PoseEpsilon { position_m: 0.5, orientation_deg: 0.1 } }
}

/// compute the Pose for a geodetic position and heading.
/// pure and deterministic - identical inputs yield identical outputs.
/// fails with InvalidCoordinate for out-of-range longitude/latitude, which upstream
/// normalization should have filtered (defensive contract, not an expected path)
pub fn resolve_pose (lon_deg: f64, lat_deg: f64, height_m: f64, heading: Angle360)->Result<Pose> {
    if !(-180.0..=180.0).contains( &lon_deg) || !(-90.0..=90.0).contains( &lat_deg) || !lon_deg.is_finite() || !lat_deg.is_finite() {
        return Err( AirglobeCommonError::InvalidCoordinate { lon: lon_deg, lat: lat_deg });
    }

    let cartographic = Cartographic::from_degrees( lon_deg, lat_deg, height_m);
    let position = Cartesian3::from( &cartographic);

    let q_enu = UnitQuaternion::from_rotation_matrix( &enu_rotation( &cartographic));
    let q_heading = UnitQuaternion::from_axis_angle( &Vector3::z_axis(), -heading.radians());
    let orientation = q_enu * q_heading;

    let translation = Translation3::new( position.x, position.y, position.z);
    let transform = Isometry3::from_parts( translation, orientation).to_homogeneous();

    Ok( Pose { position, orientation, transform })
}

/// rotation whose columns are the local east/north/up axes in ECEF
fn enu_rotation (p: &Cartographic)->Rotation3<f64> {
    let (sin_lon, cos_lon) = p.longitude.sin_cos();
    let (sin_lat, cos_lat) = p.latitude.sin_cos();

    let east  = Vector3::new( -sin_lon, cos_lon, 0.0);
    let north = Vector3::new( -sin_lat*cos_lon, -sin_lat*sin_lon, cos_lat);
    let up    = Vector3::new( cos_lat*cos_lon, cos_lat*sin_lon, sin_lat);

    Rotation3::from_matrix_unchecked( Matrix3::from_columns( &[east, north, up]))
}
