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

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType};
use tf_provider::value::{Value, ValueString};
use tf_provider::schema::{Block, Description, Schema};
use tf_provider::value::ValueEmpty;
use tf_provider::{map, AttributePath, Diagnostics, Provider};

use crate::api::{Client, ClientConfig, DEFAULT_BASE_URL};
use crate::catalog::{ImagesDataSource, LocationsDataSource, ProfilesDataSource};
use crate::public_key::PublicKeyResource;
use crate::server::{ServerDataSource, ServerResource};
use crate::utils::ClientHandle;

const TOKEN_ENV: &str = "WEBDOCK_API_TOKEN";
const BASE_URL_ENV: &str = "WEBDOCK_BASE_URL";

#[derive(Debug, Default, Clone)]
pub struct WebdockProvider {
    client: ClientHandle,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub api_token: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub base_url: ValueString<'a>,
}

impl<'a> ProviderConfig<'a> {
    /// Resolve the client configuration: provider block first, then `env`, then defaults.
    fn resolve(
        &self,
        diags: &mut Diagnostics,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<ClientConfig> {
        let token = match &self.api_token {
            Value::Value(token) => token.to_string(),
            Value::Null => env(TOKEN_ENV).filter(|token| !token.is_empty()).unwrap_or_default(),
            Value::Unknown => {
                diags.error(
                    "Unknown Webdock API token",
                    "`api_token` must be known when the provider is configured.",
                    AttributePath::new("api_token"),
                );
                return None;
            }
        };
        if token.is_empty() {
            diags.error(
                "Missing Webdock API token",
                format!("Set `api_token` in the provider block or the {TOKEN_ENV} environment variable."),
                AttributePath::new("api_token"),
            );
            return None;
        }

        let base_url = match &self.base_url {
            Value::Value(url) => url.to_string(),
            Value::Null => env(BASE_URL_ENV)
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            Value::Unknown => {
                diags.error(
                    "Unknown Webdock API url",
                    "`base_url` must be known when the provider is configured.",
                    AttributePath::new("base_url"),
                );
                return None;
            }
        };

        match ClientConfig::new(&base_url, token) {
            Ok(config) => Some(config),
            Err(err) => {
                diags.error(
                    "Invalid Webdock API url",
                    format!("Could not use `{base_url}` as Webdock API url: {err}"),
                    AttributePath::new("base_url"),
                );
                None
            }
        }
    }
}

#[async_trait]
impl Provider for WebdockProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "api_token" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!(
                            "Webdock API token. Defaults to the {TOKEN_ENV} environment variable."
                        )),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                    "base_url" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain(format!(
                            "Webdock API url. Defaults to the {BASE_URL_ENV} environment variable, or {DEFAULT_BASE_URL}."
                        )),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("webdock"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        if matches!(&config.api_token, Value::Value(token) if token.is_empty()) {
            diags.error_short(
                "`api_token` must not be empty",
                AttributePath::new("api_token"),
            );
        }
        if let Value::Value(url) = &config.base_url {
            if let Err(err) = url::Url::parse(url) {
                diags.error(
                    "Invalid Webdock API url",
                    format!("`{url}` is not a valid url: {err}"),
                    AttributePath::new("base_url"),
                );
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let config = config.resolve(diags, |name| std::env::var(name).ok())?;
        tracing::info!(%terraform_version, base_url = %config.base_url, "configuring Webdock client");
        match Client::new(config) {
            Ok(client) => self.client.set(diags, client),
            Err(err) => {
                diags.root_error("Unable to create the Webdock client", err.to_string());
                None
            }
        }
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<std::collections::HashMap<String, Box<dyn tf_provider::DynamicResource>>>
    {
        Some(map! {
            "server"     => ServerResource::new(self.client.clone()),
            "public_key" => PublicKeyResource::new(self.client.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<
        std::collections::HashMap<String, Box<dyn tf_provider::DynamicDataSource>>,
    > {
        Some(map! {
            "server"    => ServerDataSource::new(self.client.clone()),
            "images"    => ImagesDataSource::new(self.client.clone()),
            "locations" => LocationsDataSource::new(self.client.clone()),
            "profiles"  => ProfilesDataSource::new(self.client.clone()),
        })
    }
}
