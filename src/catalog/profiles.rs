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
use tf_provider::value::{Value, ValueList, ValueNumber, ValueString};
use tf_provider::schema::Schema;
use tf_provider::value::ValueEmpty;
use tf_provider::{map, AttributePath, DataSource, Diagnostics};

use crate::api::Profile;
use crate::utils::{computed, string_value, ClientHandle, WithSchema};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilesState<'a> {
    #[serde(borrow = "'a")]
    pub location_id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub profiles: ValueList<Value<ProfileState<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileState<'a> {
    #[serde(borrow = "'a")]
    pub slug: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub name: ValueString<'a>,
    pub ram: ValueNumber,
    pub disk: ValueNumber,
    pub cpu: Value<CpuState>,
    #[serde(borrow = "'a")]
    pub price: Value<PriceState<'a>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    pub cores: ValueNumber,
    pub threads: ValueNumber,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceState<'a> {
    pub amount: ValueNumber,
    #[serde(borrow = "'a")]
    pub currency: ValueString<'a>,
}

impl<'a> From<Profile> for ProfileState<'a> {
    fn from(profile: Profile) -> Self {
        Self {
            slug: string_value(profile.slug),
            name: string_value(profile.name),
            ram: Value::Value(profile.ram),
            disk: Value::Value(profile.disk),
            cpu: Value::Value(CpuState {
                cores: Value::Value(profile.cpu.cores),
                threads: Value::Value(profile.cpu.threads),
            }),
            price: Value::Value(PriceState {
                amount: Value::Value(profile.price.amount),
                currency: string_value(profile.price.currency),
            }),
        }
    }
}

impl<'a> WithSchema for ProfilesState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "location_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Location whose profiles are listed"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "profiles" => Attribute {
                        attr_type: AttributeType::AttributeList(map! {
                            "slug" => computed(AttributeType::String, "Profile slug, used as `profile_slug` of servers"),
                            "name" => computed(AttributeType::String, "Profile name"),
                            "ram" => computed(AttributeType::Number, "Memory in MiB"),
                            "disk" => computed(AttributeType::Number, "Disk size in MiB"),
                            "cpu" => computed(
                                AttributeType::AttributeSingle(map! {
                                    "cores" => computed(AttributeType::Number, "Number of CPU cores"),
                                    "threads" => computed(AttributeType::Number, "Number of CPU threads"),
                                }),
                                "CPU of the profile",
                            ),
                            "price" => computed(
                                AttributeType::AttributeSingle(map! {
                                    "amount" => computed(AttributeType::Number, "Monthly price in cents"),
                                    "currency" => computed(AttributeType::String, "Currency of the price"),
                                }),
                                "Price of the profile",
                            ),
                        }),
                        description: Description::plain("Profiles available in the location"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("List the Webdock hosting profiles of a location"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct ProfilesDataSource {
    pub(super) client: ClientHandle,
}

impl ProfilesDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ProfilesDataSource {
    type State<'a> = ProfilesState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ProfilesState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if matches!(&config.location_id, Value::Value(id) if id.is_empty()) {
            diags.error_short(
                "`location_id` must not be empty",
                AttributePath::new("location_id"),
            );
            return None;
        }
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;
        let location_id = config.location_id.as_str();
        tracing::debug!(%location_id, "reading profiles data source");

        match client.list_profiles(location_id).await {
            Ok(profiles) => Some(ProfilesState {
                profiles: Value::Value(
                    profiles
                        .into_iter()
                        .map(|profile| Value::Value(profile.into()))
                        .collect(),
                ),
                ..config
            }),
            Err(err) => {
                diags.error(
                    "Unable to list `profile`",
                    err.to_string(),
                    AttributePath::new("location_id"),
                );
                None
            }
        }
    }
}
