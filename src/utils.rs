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

use std::borrow::Cow;
use std::sync::{Arc, RwLock};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description};
use tf_provider::value::{Value, ValueString};
use tf_provider::schema::Schema;
use tf_provider::{AttributePath, Diagnostics};

use crate::api::Client;

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

/// Slot shared between the provider and its resources and data sources.
///
/// Resources are instantiated before the provider block is configured,
/// so they keep a handle and fetch the client when a lifecycle call needs it.
#[derive(Debug, Default, Clone)]
pub struct ClientHandle(Arc<RwLock<Option<Arc<Client>>>>);

impl ClientHandle {
    pub fn set(&self, diags: &mut Diagnostics, client: Client) -> Option<()> {
        match self.0.write() {
            Ok(mut slot) => {
                *slot = Some(Arc::new(client));
                Some(())
            }
            Err(err) => {
                diags.root_error("Unable to store the Webdock client", err.to_string());
                None
            }
        }
    }

    /// Configured client, or an error diagnostic if the provider has not been configured.
    pub fn get(&self, diags: &mut Diagnostics) -> Option<Arc<Client>> {
        let slot = match self.0.read() {
            Ok(slot) => slot,
            Err(err) => {
                diags.root_error("Unable to access the Webdock client", err.to_string());
                return None;
            }
        };
        let client = slot.clone();
        if client.is_none() {
            diags.root_error(
                "Unconfigured Webdock client",
                "The provider has not been configured with a Webdock API client. Please report this issue to the provider developers.",
            );
        }
        client
    }
}

pub(crate) fn computed(attr_type: AttributeType, description: &str) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint: AttributeConstraint::Computed,
        ..Default::default()
    }
}

/// Current time, as stored in `last_updated` attributes
pub(crate) fn last_updated<'a>(diags: &mut Diagnostics) -> ValueString<'a> {
    rfc3339_value(diags, OffsetDateTime::now_utc())
}

/// An unformattable timestamp is left null with a warning: the remote object already exists
fn rfc3339_value<'a>(diags: &mut Diagnostics, at: OffsetDateTime) -> ValueString<'a> {
    match at.format(&Rfc3339) {
        Ok(formatted) => string_value(formatted),
        Err(err) => {
            diags.root_warning("Unable to record `last_updated`", err.to_string());
            Value::Null
        }
    }
}

pub(crate) fn string_value<'a>(value: impl Into<String>) -> ValueString<'a> {
    Value::Value(Cow::Owned(value.into()))
}

pub(crate) fn optional_string_value<'a>(value: Option<String>) -> ValueString<'a> {
    value.map_or(Value::Null, string_value)
}

/// Paths of the attributes whose planned value differs from the prior one
pub(crate) fn changed_attributes<'a, T: PartialEq>(
    attributes: impl IntoIterator<Item = (&'static str, &'a T, &'a T)>,
) -> Vec<AttributePath>
where
    T: 'a,
{
    attributes
        .into_iter()
        .filter(|(_, prior, planned)| prior != planned)
        .map(|(name, _, _)| AttributePath::new(name))
        .collect()
}
