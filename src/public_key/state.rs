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
use tf_provider::value::{Value, ValueString};
use tf_provider::schema::Schema;
use tf_provider::{map, AttributePath};

use crate::api::{PublicKey, PublicKeyRequest};
use crate::utils::{changed_attributes, string_value, WithSchema};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub name: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub key: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub created: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub public_key: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub last_updated: ValueString<'a>,
}

impl<'a> WithSchema for PublicKeyState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Numeric identifier assigned by Webdock"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "name" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Name of the key. Changing it replaces the key."),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "public_key" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("SSH public key, in OpenSSH format. Changing it replaces the key."),
                        constraint: AttributeConstraint::Required,
                        ..Default::default()
                    },
                    "key" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("SSH public key as stored by Webdock"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "created" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Creation date of the key"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                    "last_updated" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Time of the last change applied by Terraform"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("SSH public key of the Webdock account"),
                ..Default::default()
            },
        }
    }
}

impl<'a> PublicKeyState<'a> {
    pub fn request(&self) -> PublicKeyRequest {
        PublicKeyRequest {
            name: self.name.as_str().to_owned(),
            public_key: self.public_key.as_str().to_owned(),
        }
    }

    /// Copy a key returned by the API into the state.
    /// `name` and `public_key` are only overwritten when `overwrite` is set.
    pub fn refresh(&mut self, key: PublicKey, overwrite: bool) {
        self.id = string_value(key.id.to_string());
        if overwrite || !matches!(self.name, Value::Value(_)) {
            self.name = string_value(key.name);
        }
        if overwrite || !matches!(self.public_key, Value::Value(_)) {
            self.public_key = string_value(key.key.clone());
        }
        self.key = string_value(key.key);
        self.created = string_value(key.created);
    }

    pub fn replace_triggers(prior: &Self, planned: &Self) -> Vec<AttributePath> {
        changed_attributes([
            ("name", &prior.name, &planned.name),
            ("public_key", &prior.public_key, &planned.public_key),
        ])
    }
}
