///! API client for the onramp server

use anyhow::Result;
use onramp_common::Response;
use serde::de::DeserializeOwned;

pub struct ApiClient {
    base_url: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn build_request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Surface the server's error envelope as the failure message when present
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if let Ok(envelope) = serde_json::from_str::<Response>(&body) {
            if let Some(message) = envelope.message {
                anyhow::bail!("{} ({})", message, status);
            }
        }
        anyhow::bail!("API request failed: {} - {}", status, body);
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .build_request(reqwest::Method::GET, path)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let data = response.json().await?;
        Ok(data)
    }

    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .build_request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let data = response.json().await?;
        Ok(data)
    }

    pub async fn put<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .build_request(reqwest::Method::PUT, path)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let data = response.json().await?;
        Ok(data)
    }

    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .build_request(reqwest::Method::PUT, path)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let data = response.json().await?;
        Ok(data)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .build_request(reqwest::Method::DELETE, path)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let data = response.json().await?;
        Ok(data)
    }
}
