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

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    pub icon: String,
}

impl Client {
    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        const ACTION: &str = "listing locations";

        let url = self.endpoint(&["locations"])?;
        self.send(Method::GET, url, None)
            .await?
            .expect_status(ACTION, StatusCode::OK)?
            .json(ACTION)
    }
}
