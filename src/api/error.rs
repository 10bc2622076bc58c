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

use thiserror::Error;

/// Failures of a single Webdock API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be sent, or the response body could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a status other than the one expected for the operation.
    #[error("unexpected http status code {status} received while {action}, body: {body}")]
    UnexpectedStatus {
        action: &'static str,
        status: u16,
        body: String,
    },

    /// The response body is not the JSON document expected for the operation.
    #[error("could not decode response received while {action}: {source}")]
    Decode {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid public key id `{0}`: expected an integer")]
    InvalidId(String),

    #[error("could not build http client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

#[cfg(test)]
impl ApiError {
    /// Status code of an [`ApiError::UnexpectedStatus`]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
