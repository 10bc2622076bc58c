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

use serde::{Deserialize, Serialize};

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description};
use tf_provider::value::{Value, ValueNumber, ValueString};
use tf_provider::schema::Schema;
use tf_provider::{map, AttributePath};

use crate::api::{Server, ServerRequest};
use crate::utils::{
    changed_attributes, computed, optional_string_value, string_value, WithSchema,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerState<'a> {
    #[serde(borrow = "'a")]
    pub slug: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub name: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub location_id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub profile_slug: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub image_slug: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub virtualization: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub date: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub location: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub image: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub profile: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub ipv4: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub ipv6: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub status: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub web_server: ValueString<'a>,
    pub snapshot_run_time: ValueNumber,
    pub word_press_lock_down: Value<bool>,
    pub ssh_password_auth_enabled: Value<bool>,
    #[serde(borrow = "'a")]
    pub last_updated: ValueString<'a>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub slug: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub name: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub date: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub location: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub image: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub profile: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub ipv4: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub ipv6: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub status: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub virtualization: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub web_server: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub description: ValueString<'a>,
    pub snapshot_run_time: ValueNumber,
    pub word_press_lock_down: Value<bool>,
    pub ssh_password_auth_enabled: Value<bool>,
    #[serde(borrow = "'a")]
    pub next_action_date: ValueString<'a>,
}

fn replace_on_change(constraint: AttributeConstraint, description: &str) -> Attribute {
    Attribute {
        attr_type: AttributeType::String,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

impl<'a> WithSchema for ServerState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "slug" => replace_on_change(
                        AttributeConstraint::OptionalComputed,
                        "Unique slug of the server. Picked by Webdock when omitted. Changing it replaces the server.",
                    ),
                    "name" => replace_on_change(
                        AttributeConstraint::Required,
                        "Name of the server. Changing it replaces the server.",
                    ),
                    "location_id" => replace_on_change(
                        AttributeConstraint::Required,
                        "ID of the location. Get this from the `webdock_locations` data source.",
                    ),
                    "profile_slug" => replace_on_change(
                        AttributeConstraint::Required,
                        "Slug of the server profile. Get this from the `webdock_profiles` data source.",
                    ),
                    "image_slug" => replace_on_change(
                        AttributeConstraint::Required,
                        "Slug of the server image. Get this from the `webdock_images` data source.",
                    ),
                    "virtualization" => replace_on_change(
                        AttributeConstraint::OptionalComputed,
                        "Virtualization type of the server. Changing it replaces the server.",
                    ),
                    "date" => computed(AttributeType::String, "Creation date of the server"),
                    "location" => computed(AttributeType::String, "Location of the server"),
                    "image" => computed(AttributeType::String, "Image the server runs"),
                    "profile" => computed(AttributeType::String, "Profile of the server"),
                    "ipv4" => computed(AttributeType::String, "Public IPv4 address"),
                    "ipv6" => computed(AttributeType::String, "Public IPv6 address"),
                    "status" => computed(AttributeType::String, "Status of the server"),
                    "web_server" => computed(AttributeType::String, "Web server installed by the image"),
                    "snapshot_run_time" => computed(AttributeType::Number, "Last snapshot run time"),
                    "word_press_lock_down" => computed(AttributeType::Bool, "Whether WordPress lockdown is enabled"),
                    "ssh_password_auth_enabled" => computed(AttributeType::Bool, "Whether SSH password authentication is enabled"),
                    "last_updated" => computed(AttributeType::String, "Time of the last change applied by Terraform"),
                },
                description: Description::plain("Webdock server. Servers cannot be updated in place: any change replaces the server."),
                ..Default::default()
            },
        }
    }
}

impl<'a> WithSchema for ServerDataSourceState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "slug" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Slug of the server to read"),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "name" => computed(AttributeType::String, "Name of the server"),
                    "date" => computed(AttributeType::String, "Creation date of the server"),
                    "location" => computed(AttributeType::String, "Location of the server"),
                    "image" => computed(AttributeType::String, "Image the server runs"),
                    "profile" => computed(AttributeType::String, "Profile of the server"),
                    "ipv4" => computed(AttributeType::String, "Public IPv4 address"),
                    "ipv6" => computed(AttributeType::String, "Public IPv6 address"),
                    "status" => computed(AttributeType::String, "Status of the server"),
                    "virtualization" => computed(AttributeType::String, "Virtualization type of the server"),
                    "web_server" => computed(AttributeType::String, "Web server installed by the image"),
                    "description" => computed(AttributeType::String, "Description of the server"),
                    "snapshot_run_time" => computed(AttributeType::Number, "Last snapshot run time"),
                    "word_press_lock_down" => computed(AttributeType::Bool, "Whether WordPress lockdown is enabled"),
                    "ssh_password_auth_enabled" => computed(AttributeType::Bool, "Whether SSH password authentication is enabled"),
                    "next_action_date" => computed(AttributeType::String, "Date of the next scheduled action"),
                },
                description: Description::plain("Read an existing Webdock server"),
                ..Default::default()
            },
        }
    }
}

/// Overwrite `value` with `new` unless it is already known and `overwrite` is not set
fn fill<'a>(value: &mut ValueString<'a>, new: String, overwrite: bool) {
    if overwrite || !matches!(value, Value::Value(_)) {
        *value = string_value(new);
    }
}

impl<'a> ServerState<'a> {
    pub fn request(&self) -> ServerRequest {
        ServerRequest {
            name: self.name.as_str().to_owned(),
            slug: self.slug.as_str().to_owned(),
            location_id: self.location_id.as_str().to_owned(),
            profile_slug: self.profile_slug.as_str().to_owned(),
            virtualization: self.virtualization.as_str().to_owned(),
            image_slug: self.image_slug.as_str().to_owned(),
        }
    }

    /// Copy a server returned by the API into the state.
    ///
    /// Computed attributes are always overwritten. Configured attributes are
    /// overwritten only when `overwrite` is set, so a freshly created server
    /// keeps the planned values Terraform expects back.
    pub fn refresh(&mut self, server: Server, overwrite: bool) {
        fill(&mut self.slug, server.slug, overwrite);
        fill(&mut self.name, server.name, overwrite);
        fill(&mut self.location_id, server.location.clone(), overwrite);
        fill(&mut self.profile_slug, server.profile.clone(), overwrite);
        fill(&mut self.image_slug, server.image.clone(), overwrite);
        fill(&mut self.virtualization, server.virtualization, overwrite);

        self.date = string_value(server.date);
        self.location = string_value(server.location);
        self.image = string_value(server.image);
        self.profile = string_value(server.profile);
        self.ipv4 = optional_string_value(server.ipv4);
        self.ipv6 = optional_string_value(server.ipv6);
        self.status = string_value(server.status);
        self.web_server = optional_string_value(server.web_server);
        self.snapshot_run_time = Value::Value(server.snapshot_run_time);
        self.word_press_lock_down = Value::Value(server.word_press_lock_down);
        self.ssh_password_auth_enabled = Value::Value(server.ssh_password_auth_enabled);
    }

    /// Attributes only known once the server exists
    pub fn mark_computed_unknown(&mut self) {
        if self.slug.is_null() {
            self.slug = Value::Unknown;
        }
        if self.virtualization.is_null() {
            self.virtualization = Value::Unknown;
        }
        self.date = Value::Unknown;
        self.location = Value::Unknown;
        self.image = Value::Unknown;
        self.profile = Value::Unknown;
        self.ipv4 = Value::Unknown;
        self.ipv6 = Value::Unknown;
        self.status = Value::Unknown;
        self.web_server = Value::Unknown;
        self.snapshot_run_time = Value::Unknown;
        self.word_press_lock_down = Value::Unknown;
        self.ssh_password_auth_enabled = Value::Unknown;
        self.last_updated = Value::Unknown;
    }

    /// Servers have no update path: every configurable attribute replaces the server
    pub fn replace_triggers(prior: &Self, planned: &Self) -> Vec<AttributePath> {
        changed_attributes([
            ("slug", &prior.slug, &planned.slug),
            ("name", &prior.name, &planned.name),
            ("location_id", &prior.location_id, &planned.location_id),
            ("profile_slug", &prior.profile_slug, &planned.profile_slug),
            ("image_slug", &prior.image_slug, &planned.image_slug),
            ("virtualization", &prior.virtualization, &planned.virtualization),
        ])
    }
}

impl<'a> From<Server> for ServerDataSourceState<'a> {
    fn from(server: Server) -> Self {
        Self {
            slug: string_value(server.slug),
            name: string_value(server.name),
            date: string_value(server.date),
            location: string_value(server.location),
            image: string_value(server.image),
            profile: string_value(server.profile),
            ipv4: optional_string_value(server.ipv4),
            ipv6: optional_string_value(server.ipv6),
            status: string_value(server.status),
            virtualization: string_value(server.virtualization),
            web_server: optional_string_value(server.web_server),
            description: optional_string_value(server.description),
            snapshot_run_time: Value::Value(server.snapshot_run_time),
            word_press_lock_down: Value::Value(server.word_press_lock_down),
            ssh_password_auth_enabled: Value::Value(server.ssh_password_auth_enabled),
            next_action_date: optional_string_value(server.next_action_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use tf_provider::value::Value;

    use crate::api::Server;
    use crate::utils::string_value;

    use super::ServerState;

    fn planned<'a>() -> ServerState<'a> {
        ServerState {
            name: string_value("n1"),
            location_id: string_value("dk"),
            profile_slug: string_value("webdockbit-2022"),
            image_slug: string_value("webdock-ubuntu-jammy-cloud"),
            ..Default::default()
        }
    }

    #[test]
    fn request_leaves_unset_slug_empty() {
        let mut state = planned();
        state.mark_computed_unknown();
        let request = state.request();
        assert_eq!(request.slug, "");
        assert_eq!(request.virtualization, "");
        assert_eq!(request.name, "n1");
        assert_eq!(request.location_id, "dk");
    }

    #[test]
    fn refresh_keeps_planned_values_unless_overwriting() {
        let server = Server {
            slug: "assigned".into(),
            name: "renamed".into(),
            location: "fi".into(),
            ..Default::default()
        };

        let mut state = planned();
        state.mark_computed_unknown();
        state.refresh(server.clone(), false);
        assert_eq!(state.slug, string_value("assigned"));
        assert_eq!(state.name, string_value("n1"));
        assert_eq!(state.location_id, string_value("dk"));
        assert_eq!(state.location, string_value("fi"));
        assert!(state.ipv4.is_null());

        state.refresh(server, true);
        assert_eq!(state.name, string_value("renamed"));
        assert_eq!(state.location_id, string_value("fi"));
    }

    #[test]
    fn any_configured_change_replaces() {
        let prior = planned();
        let mut next = prior.clone();
        assert!(ServerState::replace_triggers(&prior, &next).is_empty());

        next.name = string_value("n2");
        next.image_slug = string_value("other-image");
        next.status = Value::Unknown;
        let triggers = ServerState::replace_triggers(&prior, &next);
        assert_eq!(triggers.len(), 2, "{triggers:?}");
    }
}
