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

use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::utils::{last_updated, string_value, ClientHandle, WithSchema};

use super::state::PublicKeyState;

#[derive(Debug, Default)]
pub struct PublicKeyResource {
    pub(super) client: ClientHandle,
}

impl PublicKeyResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for PublicKeyResource {
    type State<'a> = PublicKeyState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(PublicKeyState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if matches!(&config.public_key, Value::Value(key) if key.trim().is_empty()) {
            diags.error_short("`public_key` must not be empty", AttributePath::new("public_key"));
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let id = state.id.as_str().to_owned();
        tracing::debug!(%id, "reading public key");

        match client.get_public_key_by_id(&id).await {
            Ok(Some(key)) => {
                let mut state = state;
                state.refresh(key, true);
                Some((state, private_state))
            }
            Ok(None) => {
                diags.error(
                    "Unable to get public key",
                    format!("Could not find Webdock public key id {id}"),
                    AttributePath::new("id"),
                );
                None
            }
            Err(err) => {
                diags.error(
                    "Error reading Webdock public key",
                    format!("Could not read Webdock public key id {id}: {err}"),
                    AttributePath::new("id"),
                );
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.id = Value::Unknown;
        state.key = Value::Unknown;
        state.created = Value::Unknown;
        state.last_updated = Value::Unknown;

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        let trigger_replace = PublicKeyState::replace_triggers(&prior_state, &proposed_state);

        Some((proposed_state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let request = planned_state.request();
        tracing::debug!(name = %request.name, "creating public key");

        match client.create_public_key(&request).await {
            Ok(key) => {
                let mut state = planned_state;
                state.refresh(key, false);
                state.last_updated = last_updated(diags);
                Some((state, private_state))
            }
            Err(err) => {
                diags.root_error(
                    "Error creating public key",
                    format!("Could not create public key, unexpected error: {err}"),
                );
                None
            }
        }
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        _planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        diags.root_error(
            "Webdock public keys cannot be updated in place",
            "Changing the name or the key of a public key requires its replacement. Please report this issue to the provider developers.",
        );
        None
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let id = state.id.as_str();
        tracing::debug!(%id, "deleting public key");

        if let Err(err) = client.delete_public_key(id).await {
            diags.error(
                "Error deleting Webdock public key",
                format!("Could not delete Webdock public key {id}: {err}"),
                AttributePath::new("id"),
            );
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = PublicKeyState {
            id: string_value(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
