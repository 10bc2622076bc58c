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

//! Thin client over the Webdock REST API.
//!
//! Every operation is a single round trip: build the url, optionally encode a
//! JSON body, send it with the bearer token, check the one status code the
//! operation expects and decode the body.

use std::fmt::Debug;

use url::Url;

mod error;
mod image;
mod location;
mod profile;
mod public_key;
mod request;
mod server;

pub use error::{ApiError, Result};
pub use image::Image;
pub use location::Location;
pub use profile::Profile;
pub use public_key::{PublicKey, PublicKeyRequest};
pub use server::{Server, ServerPresence, ServerRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.webdock.io/v1/";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Everything needed to reach the API
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub token: String,
}

impl ClientConfig {
    /// Parse `base_url`, making sure it ends with a `/` so relative paths are joined below it.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            token: token.into(),
        })
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    http: reqwest::Client,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Build)?;
        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }
}
