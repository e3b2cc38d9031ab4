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

/// RON config file support. AIRGLOBE configs are serde structs stored as RON,
/// one file per config type (see the crate-local configs/ directories)

use std::{fs, path::Path};
use serde::de::DeserializeOwned;

use crate::errors::Result;

pub fn load_ron_config<T: DeserializeOwned> (path: impl AsRef<Path>)->Result<T> {
    let input = fs::read_to_string( path)?;
    Ok( ron::from_str( &input)?)
}
