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

use super::{ApiError, Client, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicKey {
    pub id: i64,
    pub name: String,
    pub key: String,
    pub created: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRequest {
    pub name: String,
    pub public_key: String,
}

const PUBLIC_KEYS: [&str; 2] = ["account", "publicKeys"];

impl Client {
    pub async fn list_public_keys(&self) -> Result<Vec<PublicKey>> {
        const ACTION: &str = "listing public keys";

        let url = self.endpoint(&PUBLIC_KEYS)?;
        self.send(Method::GET, url, None)
            .await?
            .expect_status(ACTION, StatusCode::OK)?
            .json(ACTION)
    }

    /// There is no lookup endpoint: the whole list is fetched and scanned.
    /// `Ok(None)` means the key does not exist (anymore).
    pub async fn get_public_key_by_id(&self, id: &str) -> Result<Option<PublicKey>> {
        let id: i64 = id
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidId(id.to_owned()))?;

        let keys = self.list_public_keys().await?;
        Ok(keys.into_iter().find(|key| key.id == id))
    }

    pub async fn create_public_key(&self, request: &PublicKeyRequest) -> Result<PublicKey> {
        const ACTION: &str = "creating public key";

        let url = self.endpoint(&PUBLIC_KEYS)?;
        self.send_json(Method::POST, url, request)
            .await?
            .expect_status(ACTION, StatusCode::CREATED)?
            .json(ACTION)
    }

    pub async fn delete_public_key(&self, id: &str) -> Result<()> {
        const ACTION: &str = "deleting public key";

        let [account, keys] = PUBLIC_KEYS;
        let url = self.endpoint(&[account, keys, id])?;
        self.send(Method::DELETE, url, None)
            .await?
            .expect_status(ACTION, StatusCode::OK)?;
        Ok(())
    }
}
