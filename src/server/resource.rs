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

use crate::api::ServerPresence;
use crate::utils::{last_updated, string_value, ClientHandle, WithSchema};

use super::state::ServerState;

#[derive(Debug, Default)]
pub struct ServerResource {
    pub(super) client: ClientHandle,
}

impl ServerResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ServerResource {
    type State<'a> = ServerState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ServerState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if matches!(&config.slug, Value::Value(slug) if slug.is_empty()) {
            diags.error(
                "Empty server slug",
                "The slug must not be empty. Omit it to let Webdock pick one.",
                AttributePath::new("slug"),
            );
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
        let slug = state.slug.as_str().to_owned();
        tracing::debug!(%slug, "reading server");

        match client.get_server_by_slug(&slug).await {
            Ok(server) => {
                let mut state = state;
                state.refresh(server, true);
                Some((state, private_state))
            }
            Err(err) => {
                diags.error(
                    "Error reading Webdock server",
                    format!("Could not read Webdock server slug {slug}: {err}"),
                    AttributePath::new("slug"),
                );
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        state.mark_computed_unknown();

        // Without a slug, Webdock picks a free one
        if let Value::Value(slug) = &state.slug {
            if !slug.is_empty() {
                let client = self.client.get(diags)?;
                tracing::debug!(%slug, "checking if server exists");
                match client.server_exists(slug).await {
                    Ok(ServerPresence::Exists) => diags.error(
                        "Server with the same slug exist",
                        format!("Webdock requires a unique slug for each server and a server with the slug {slug} already exists, please choose a new slug"),
                        AttributePath::new("slug"),
                    ),
                    Ok(ServerPresence::Missing) => (),
                    Err(err) => diags.error(
                        "Error checking if Webdock server exists",
                        err.to_string(),
                        AttributePath::new("slug"),
                    ),
                }
            }
        }

        if !diags.errors.is_empty() {
            return None;
        }

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
        let trigger_replace = ServerState::replace_triggers(&prior_state, &proposed_state);

        Some((proposed_state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        diags.root_warning(
            "Server Deletion requires special privileges which cannot be obtained in the Webdock dashboard without first contacting Webdock Support!",
            "This will nuke the server from orbit including all data and server snapshots. Use with care.",
        );
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
        tracing::debug!(name = %request.name, slug = %request.slug, "creating server");

        match client.create_server(&request).await {
            Ok(server) => {
                let mut state = planned_state;
                state.refresh(server, false);
                state.last_updated = last_updated(diags);
                tracing::debug!(slug = %state.slug.as_str(), "server accepted");
                Some((state, private_state))
            }
            Err(err) => {
                diags.root_error(
                    "Error creating server",
                    format!("Could not create server, unexpected error: {err}"),
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
            "Webdock servers cannot be updated in place",
            "Every configurable attribute of a server requires its replacement. Please report this issue to the provider developers.",
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
        let slug = state.slug.as_str();
        tracing::debug!(%slug, "deleting server");

        if let Err(err) = client.delete_server(slug).await {
            diags.error(
                "Error deleting Webdock server",
                format!("Could not delete Webdock server {slug}: {err}"),
                AttributePath::new("slug"),
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
        let state = ServerState {
            slug: string_value(id),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::value::Value;
    use tf_provider::{Diagnostics, Resource};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::tests::handle_for;
    use crate::utils::{string_value, ClientHandle};

    use super::{ServerResource, ServerState};

    fn server_json() -> serde_json::Value {
        serde_json::json!({
            "slug": "s1",
            "name": "n1",
            "date": "2024-05-06 07:08:09",
            "location": "dk",
            "image": "webdock-ubuntu-jammy-cloud",
            "profile": "webdockbit-2022",
            "ipv4": "192.0.2.10",
            "ipv6": null,
            "status": "provisioning",
            "virtualization": "container",
            "webServer": "nginx",
            "snapshotRunTime": 12,
            "WordPressLockDown": true,
            "SSHPasswordAuthEnabled": false
        })
    }

    fn planned<'a>() -> ServerState<'a> {
        let mut state = ServerState {
            slug: string_value("s1"),
            name: string_value("n1"),
            location_id: string_value("dk"),
            profile_slug: string_value("webdockbit-2022"),
            image_slug: string_value("webdock-ubuntu-jammy-cloud"),
            ..Default::default()
        };
        state.mark_computed_unknown();
        state
    }

    #[tokio::test]
    async fn create_populates_computed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/servers"))
            .and(body_json(serde_json::json!({
                "name": "n1",
                "slug": "s1",
                "locationId": "dk",
                "profileSlug": "webdockbit-2022",
                "imageSlug": "webdock-ubuntu-jammy-cloud"
            })))
            .respond_with(ResponseTemplate::new(202).set_body_json(server_json()))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let mut plan = planned();
        plan.last_updated = string_value("Monday, 01-Jan-24 00:00:00 UTC");

        let (state, _) = resource
            .create(&mut diags, plan.clone(), plan, Value::Null, Value::Null)
            .await
            .expect("server created");

        assert!(diags.errors.is_empty());
        assert_eq!(state.slug, string_value("s1"));
        assert_eq!(state.status, string_value("provisioning"));
        assert_eq!(state.virtualization, string_value("container"));
        assert_eq!(state.ipv4, string_value("192.0.2.10"));
        assert!(state.ipv6.is_null());
        assert_eq!(state.web_server, string_value("nginx"));
        assert_eq!(state.snapshot_run_time, Value::Value(12));
        assert_eq!(state.word_press_lock_down, Value::Value(true));
        assert_eq!(state.ssh_password_auth_enabled, Value::Value(false));
        assert!(matches!(&state.last_updated, Value::Value(ts) if ts != "Monday, 01-Jan-24 00:00:00 UTC"));
    }

    #[tokio::test]
    async fn create_failure_returns_no_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/servers"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad profile"))
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let result = resource
            .create(&mut diags, planned(), planned(), Value::Null, Value::Null)
            .await;

        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn destroy_requires_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/servers/s1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let result = resource
            .destroy(&mut diags, planned(), Value::Null, Value::Null)
            .await;

        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
        assert!(format!("{:?}", diags.errors).contains("200"));
    }

    #[tokio::test]
    async fn destroy_succeeds_on_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/servers/s1"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let result = resource
            .destroy(&mut diags, planned(), Value::Null, Value::Null)
            .await;

        assert_eq!(result, Some(()));
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn plan_create_rejects_taken_slug() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(server_json()))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let result = resource
            .plan_create(&mut diags, planned(), planned(), Value::Null)
            .await;

        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn plan_create_accepts_free_slug() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/s1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .plan_create(&mut diags, planned(), planned(), Value::Null)
            .await
            .expect("plan accepted");

        assert!(diags.errors.is_empty());
        assert_eq!(state.slug, string_value("s1"));
        assert!(state.status.is_unknown());
        assert!(state.last_updated.is_unknown());
    }

    #[tokio::test]
    async fn plan_create_without_slug_skips_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let proposed = ServerState {
            slug: Value::Null,
            ..planned()
        };
        let (state, _) = resource
            .plan_create(&mut diags, proposed.clone(), proposed, Value::Null)
            .await
            .expect("plan accepted");

        assert!(state.slug.is_unknown());
    }

    #[tokio::test]
    async fn plan_create_without_client_fails() {
        let resource = ServerResource::new(ClientHandle::default());
        let mut diags = Diagnostics::default();
        let result = resource
            .plan_create(&mut diags, planned(), planned(), Value::Null)
            .await;

        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn plan_destroy_warns() {
        let resource = ServerResource::default();
        let mut diags = Diagnostics::default();
        let result = resource
            .plan_destroy(&mut diags, planned(), Value::Null, Value::Null)
            .await;

        assert!(result.is_some());
        assert!(diags.errors.is_empty());
        assert_eq!(diags.warnings.len(), 1);
    }

    #[tokio::test]
    async fn plan_update_replaces_on_change() {
        let resource = ServerResource::default();
        let mut diags = Diagnostics::default();
        let prior = planned();
        let proposed = ServerState {
            profile_slug: string_value("webdockpro-2022"),
            ..prior.clone()
        };

        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                proposed.clone(),
                proposed,
                Value::Null,
                Value::Null,
            )
            .await
            .expect("plan");
        assert_eq!(replace.len(), 1);

        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                prior.clone(),
                prior,
                Value::Null,
                Value::Null,
            )
            .await
            .expect("plan");
        assert!(replace.is_empty());
    }

    #[tokio::test]
    async fn update_is_rejected() {
        let resource = ServerResource::default();
        let mut diags = Diagnostics::default();
        let result = resource
            .update(
                &mut diags,
                planned(),
                planned(),
                planned(),
                Value::Null,
                Value::Null,
            )
            .await;

        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn import_then_read_fills_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(server_json()))
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let (imported, private_state) = resource
            .import(&mut diags, "s1".to_owned())
            .await
            .expect("imported");
        assert_eq!(imported.slug, string_value("s1"));
        assert!(imported.name.is_null());

        let (state, _) = resource
            .read(&mut diags, imported, private_state, Value::Null)
            .await
            .expect("read");
        assert!(diags.errors.is_empty());
        assert_eq!(state.name, string_value("n1"));
        assert_eq!(state.location_id, string_value("dk"));
        assert_eq!(state.image_slug, string_value("webdock-ubuntu-jammy-cloud"));
        assert_eq!(state.profile_slug, string_value("webdockbit-2022"));
    }

    #[tokio::test]
    async fn read_keeps_last_updated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(server_json()))
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let prior = ServerState {
            last_updated: string_value("2024-05-06T07:08:09Z"),
            ..planned()
        };
        let (state, _) = resource
            .read(&mut diags, prior, Value::Null, Value::Null)
            .await
            .expect("read");
        assert_eq!(state.last_updated, string_value("2024-05-06T07:08:09Z"));
    }

    #[tokio::test]
    async fn read_reports_missing_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/s1"))
            .respond_with(ResponseTemplate::new(404).set_body_string("server not found"))
            .mount(&server)
            .await;

        let resource = ServerResource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let result = resource
            .read(&mut diags, planned(), Value::Null, Value::Null)
            .await;
        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn validate_rejects_empty_slug() {
        let resource = ServerResource::default();
        let mut diags = Diagnostics::default();
        let config = ServerState {
            slug: string_value(""),
            ..planned()
        };
        assert!(resource.validate(&mut diags, config).await.is_none());
        assert!(resource.validate(&mut Diagnostics::default(), planned()).await.is_some());
    }
}
