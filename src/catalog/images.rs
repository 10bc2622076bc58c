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

use crate::api::Image;
use crate::utils::{computed, optional_string_value, string_value, ClientHandle, WithSchema};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesState<'a> {
    #[serde(borrow = "'a")]
    pub images: ValueList<Value<ImageState<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageState<'a> {
    #[serde(borrow = "'a")]
    pub slug: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub name: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub web_server: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub php_version: ValueString<'a>,
}

impl<'a> From<Image> for ImageState<'a> {
    fn from(image: Image) -> Self {
        Self {
            slug: string_value(image.slug),
            name: string_value(image.name),
            web_server: optional_string_value(image.web_server),
            php_version: optional_string_value(image.php_version),
        }
    }
}

impl<'a> WithSchema for ImagesState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "images" => Attribute {
                        attr_type: AttributeType::AttributeList(map! {
                            "slug" => computed(AttributeType::String, "Image slug"),
                            "name" => computed(AttributeType::String, "Image name"),
                            "web_server" => computed(AttributeType::String, "Web server shipped with the image"),
                            "php_version" => computed(AttributeType::String, "PHP version shipped with the image"),
                        }),
                        description: Description::plain("Images available to new servers"),
                        constraint: AttributeConstraint::Computed,
                        ..Default::default()
                    },
                },
                description: Description::plain("List the Webdock server images"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct ImagesDataSource {
    pub(super) client: ClientHandle,
}

impl ImagesDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for ImagesDataSource {
    type State<'a> = ImagesState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ImagesState::schema())
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
        tracing::debug!("reading images data source");

        match client.list_images().await {
            Ok(images) => Some(ImagesState {
                images: Value::Value(
                    images
                        .into_iter()
                        .map(|image| Value::Value(image.into()))
                        .collect(),
                ),
            }),
            Err(err) => {
                diags.root_error("Unable to list `image`", err.to_string());
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
    use crate::utils::string_value;

    use super::{ImageState, ImagesDataSource, ImagesState};

    #[tokio::test]
    async fn read_lists_every_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"slug": "webdock-ubuntu-jammy-cloud", "name": "Ubuntu Jammy 22.04", "webServer": null, "phpVersion": null},
                {"slug": "krellide:webdock-jammy-lemp", "name": "Ubuntu Jammy 22.04 LEMP", "webServer": "Nginx", "phpVersion": "8.1"},
            ])))
            .mount(&server)
            .await;

        let data_source = ImagesDataSource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let state = data_source
            .read(&mut diags, ImagesState::default(), Value::Null)
            .await
            .expect("read");

        assert_eq!(
            state.images,
            Value::Value(vec![
                Value::Value(ImageState {
                    slug: string_value("webdock-ubuntu-jammy-cloud"),
                    name: string_value("Ubuntu Jammy 22.04"),
                    web_server: Value::Null,
                    php_version: Value::Null,
                }),
                Value::Value(ImageState {
                    slug: string_value("krellide:webdock-jammy-lemp"),
                    name: string_value("Ubuntu Jammy 22.04 LEMP"),
                    web_server: string_value("Nginx"),
                    php_version: string_value("8.1"),
                }),
            ])
        );
    }

    #[tokio::test]
    async fn read_reports_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let data_source = ImagesDataSource::new(handle_for(&server));
        let mut diags = Diagnostics::default();
        let result = data_source
            .read(&mut diags, ImagesState::default(), Value::Null)
            .await;
        assert!(result.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
