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

use std::fmt;

/// normalize degrees into [0.0, 360.0)
#[inline]
pub fn normalize_360 (d: f64)->f64 {
    let x = d % 360.0;
    if x < 0.0 { 360.0 + x } else { x }
}

/// an angle that is normalized to [0,360) degrees, used for headings and bearings
/// (0 = north, 90 = east)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Angle360 {
    value: f64 // degrees
}

impl Angle360 {
    #[inline]
    pub fn from_degrees (deg: f64)->Self {
        Angle360 { value: normalize_360(deg) }
    }

    pub fn from_radians (rad: f64)->Self {
        Angle360 { value: normalize_360( rad.to_degrees()) }
    }

    #[inline] pub fn degrees (&self)->f64 { self.value }
    #[inline] pub fn radians (&self)->f64 { self.value.to_radians() }

    #[inline] pub fn sin (&self)->f64 { self.value.to_radians().sin() }
    #[inline] pub fn cos (&self)->f64 { self.value.to_radians().cos() }

    /// smallest angular difference in degrees, always in [0,180]
    pub fn diff_degrees (&self, other: &Angle360)->f64 {
        let d = (self.value - other.value).abs();
        if d > 180.0 { 360.0 - d } else { d }
    }
}

impl Default for Angle360 {
    fn default ()->Self { Angle360 { value: 0.0 } }
}

impl fmt::Display for Angle360 {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!(f, "{}deg", self.value)
    }
}
