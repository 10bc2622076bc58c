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

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use super::{ApiError, Client, Result};

const APPLICATION_JSON: &str = "application/json";

#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl Client {
    /// Url of the endpoint made of `segments` below the base url.
    /// Segments are percent-encoded, so slugs and ids cannot escape their position in the path.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url().clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one authenticated request and collect the whole response.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Bytes>,
    ) -> Result<RawResponse> {
        tracing::debug!(%method, %url, "sending webdock request");

        let mut request = self
            .http
            .request(method, url.clone())
            .bearer_auth(&self.config.token)
            .header(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
                .body(body);
        }

        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(transport)?;

        tracing::debug!(%url, status = status.as_u16(), "received webdock response");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Encode `body` as JSON and send it. Nothing is sent if encoding fails.
    pub(crate) async fn send_json<B>(&self, method: Method, url: Url, body: &B) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body).map_err(ApiError::Encode)?;
        self.send(method, url, Some(Bytes::from(payload))).await
    }
}

impl RawResponse {
    pub(crate) fn expect_status(self, action: &'static str, expected: StatusCode) -> Result<Self> {
        if self.status == expected {
            return Ok(self);
        }

        tracing::warn!(
            action,
            status = self.status.as_u16(),
            expected = expected.as_u16(),
            content_type = ?self.headers.get(CONTENT_TYPE),
            "unexpected webdock response status"
        );
        Err(ApiError::UnexpectedStatus {
            action,
            status: self.status.as_u16(),
            body: self.text(),
        })
    }

    pub(crate) fn json<T: DeserializeOwned>(&self, action: &'static str) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| ApiError::Decode { action, source })
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
