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

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description};
use tf_provider::value::{Value, ValueList, ValueString};
use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{map, DataSource, Diagnostics};

use crate::api::Location;
use crate::utils::{computed, string_value, ClientHandle, WithSchema};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationsState<'a> {
    #[serde(borrow = "'a")]
    pub locations: ValueList<Value<LocationState<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub name: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub city: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub country: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub description: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub icon: ValueString<'a>,
}

impl<'a> From<Location> for LocationState<'a> {
    fn from(location: Location) -> Self {
        Self {
            id: string_value(location.id),
            name: string_value(location.name),
            city: string_value(location.city),
            country: string_value(location.country),
            description: string_value(location.description),
            icon: string_value(location.icon),
        }
    }
}

impl<'a> WithSchema for LocationsState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "locations" => Attribute {
                        attr_type: AttributeType::AttributeList(map! {
                            "id" => computed(AttributeType::String, "Location identifier, used as `location_id` of servers and profiles"),
                            "name" => computed(AttributeType::String, "Location name"),
                            "city" => computed(AttributeType::String, "City of the datacenter"),
                            "country" => computed(AttributeType::String, "Country of the datacenter"),
                            "description" => computed(AttributeType::String, "Location description"),
                            "icon" => computed(AttributeType::String, "Url of the location icon"),
                        }),
                        description: Description::plain("Locations where servers can be created"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("List the Webdock locations"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct LocationsDataSource {
    pub(super) client: ClientHandle,
}

impl LocationsDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for LocationsDataSource {
    type State<'a> = LocationsState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(LocationsState::schema())
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::State<'a>) -> Option<()> {
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        _config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;
        tracing::debug!("reading locations data source");

        match client.list_locations().await {
            Ok(locations) => Some(LocationsState {
                locations: Value::Value(
                    locations
                        .into_iter()
                        .map(|location| Value::Value(location.into()))
                        .collect(),
                ),
            }),
            Err(err) => {
                diags.root_error("Unable to list `location`", err.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::value::Value;
    use tf_provider::{DataSource, Diagnostics};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::tests::handle_for;
    use crate::utils::{string_value, ClientHandle};

    use super::{LocationsDataSource, LocationsState};

    #[tokio::test]
    async fn read_keeps_every_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "dk", "name": "Denmark", "city": "Copenhagen", "country": "Denmark", "description": "", "icon": ""},
                {"id": "fi", "name": "Finland", "city": "Helsinki", "country": "Finland", "description": "", "icon": ""},
            ])))
            .mount(&server)
            .await;

        let data_source = LocationsDataSource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let state = data_source
            .read(&mut diags, LocationsState::default(), Value::Null)
            .await
            .expect("read");

        let Value::Value(locations) = state.locations else {
            panic!("locations should be known");
        };
        let ids: Vec<_> = locations
            .iter()
            .map(|location| match location {
                Value::Value(location) => location.id.clone(),
                _ => Value::Null,
            })
            .collect();
        assert_eq!(ids, vec![string_value("dk"), string_value("fi")]);
    }

    #[tokio::test]
    async fn read_without_client_fails() {
        let data_source = LocationsDataSource::new(ClientHandle::default());
        let mut diags = Diagnostics::default();
        let result = data_source
            .read(&mut diags, LocationsState::default(), Value::Null)
            .await;
        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
