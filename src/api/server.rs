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
#[serde(rename_all = "camelCase", default)]
pub struct Server {
    pub slug: String,
    pub name: String,
    pub date: String,
    pub location: String,
    pub image: String,
    pub profile: String,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub status: String,
    pub virtualization: String,
    pub web_server: Option<String>,
    pub snapshot_run_time: i64,
    pub description: Option<String>,
    pub next_action_date: Option<String>,
    #[serde(rename = "WordPressLockDown")]
    pub word_press_lock_down: bool,
    #[serde(rename = "SSHPasswordAuthEnabled")]
    pub ssh_password_auth_enabled: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRequest {
    pub name: String,
    /// Left empty, the API picks a slug
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    pub location_id: String,
    pub profile_slug: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub virtualization: String,
    pub image_slug: String,
}

/// Outcome of [`Client::server_exists`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPresence {
    Exists,
    Missing,
}

impl Client {
    pub async fn get_server_by_slug(&self, slug: &str) -> Result<Server> {
        const ACTION: &str = "getting server";

        let url = self.endpoint(&["servers", slug])?;
        self.send(Method::GET, url, None)
            .await?
            .expect_status(ACTION, StatusCode::OK)?
            .json(ACTION)
    }

    /// Provisioning is asynchronous: the returned server is the one accepted by the API,
    /// not the final running server.
    pub async fn create_server(&self, request: &ServerRequest) -> Result<Server> {
        const ACTION: &str = "creating server";

        let url = self.endpoint(&["servers"])?;
        self.send_json(Method::POST, url, request)
            .await?
            .expect_status(ACTION, StatusCode::ACCEPTED)?
            .json(ACTION)
    }

    pub async fn update_server(&self, slug: &str, request: &ServerRequest) -> Result<Server> {
        const ACTION: &str = "updating server";

        let url = self.endpoint(&["servers", slug])?;
        self.send_json(Method::PATCH, url, request)
            .await?
            .expect_status(ACTION, StatusCode::OK)?
            .json(ACTION)
    }

    pub async fn delete_server(&self, slug: &str) -> Result<()> {
        const ACTION: &str = "deleting server";

        let url = self.endpoint(&["servers", slug])?;
        self.send(Method::DELETE, url, None)
            .await?
            .expect_status(ACTION, StatusCode::ACCEPTED)?;
        Ok(())
    }

    pub async fn server_exists(&self, slug: &str) -> Result<ServerPresence> {
        const ACTION: &str = "checking if server exists";

        let url = self.endpoint(&["servers", slug])?;
        let response = self.send(Method::GET, url, None).await?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(ServerPresence::Missing);
        }
        response.expect_status(ACTION, StatusCode::OK)?;
        Ok(ServerPresence::Exists)
    }
}
