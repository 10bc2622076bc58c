// This file is part of the terraform-provider-webdock project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Client, Result};

/// Hosting plan available in a location
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub slug: String,
    pub name: String,
    /// RAM in MiB
    pub ram: i64,
    /// Disk size in MiB
    pub disk: i64,
    pub cpu: Cpu,
    pub price: Price,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cpu {
    pub cores: i64,
    pub threads: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    /// Amount in cents
    pub amount: i64,
    pub currency: String,
}

impl Client {
    pub async fn list_profiles(&self, location_id: &str) -> Result<Vec<Profile>> {
        const ACTION: &str = "listing profiles";

        let mut url = self.endpoint(&["profiles"])?;
        url.query_pairs_mut().append_pair("locationId", location_id);
        self.send(Method::GET, url, None)
            .await?
            .expect_status(ACTION, StatusCode::OK)?
            .json(ACTION)
    }
}
