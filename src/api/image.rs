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

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Client, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Image {
    pub slug: String,
    pub name: String,
    pub web_server: Option<String>,
    pub php_version: Option<String>,
}

impl Client {
    pub async fn list_images(&self) -> Result<Vec<Image>> {
        const ACTION: &str = "listing images";

        let url = self.endpoint(&["images"])?;
        self.send(Method::GET, url, None)
            .await?
            .expect_status(ACTION, StatusCode::OK)?
            .json(ACTION)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::tests::client_for;
    use crate::api::{ApiError, Image};

    #[tokio::test]
    async fn list_images() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"slug": "webdock-ubuntu-jammy-cloud", "name": "Ubuntu Jammy 22.04", "webServer": null, "phpVersion": null},
                {"slug": "krellide:webdock-jammy-lemp", "name": "Ubuntu Jammy 22.04 LEMP", "webServer": "Nginx", "phpVersion": "8.1"},
            ])))
            .mount(&server)
            .await;

        let images = client_for(&server).list_images().await.unwrap();
        assert_eq!(
            images,
            vec![
                Image {
                    slug: "webdock-ubuntu-jammy-cloud".into(),
                    name: "Ubuntu Jammy 22.04".into(),
                    web_server: None,
                    php_version: None,
                },
                Image {
                    slug: "krellide:webdock-jammy-lemp".into(),
                    name: "Ubuntu Jammy 22.04 LEMP".into(),
                    web_server: Some("Nginx".into()),
                    php_version: Some("8.1".into()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn list_images_rejects_other_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_images().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("invalid token"));
    }

    #[tokio::test]
    async fn list_images_reports_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_images().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }), "{err:?}");
        assert_eq!(err.status(), None);
    }
}
