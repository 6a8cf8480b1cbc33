use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::{AppConfig, DateWindow, TIMEZONE_OFFSET};

const USER_AGENT: &str = "voipms-autowhite/1.0";
const STATUS_SUCCESS: &str = "success";

/// Envelope shared by every voip.ms REST reply: a `status` string plus
/// method-specific fields, which are absent on failure.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoPayload {}

#[derive(Debug, Deserialize)]
pub struct CdrItem {
    pub destination: String,
    pub duration: String,
    pub callerid: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CdrPayload {
    #[serde(default)]
    pub cdr: Vec<CdrItem>,
}

#[derive(Debug, Deserialize)]
pub struct PhonebookEntry {
    pub number: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PhonebookPayload {
    #[serde(default)]
    pub phonebooks: Vec<PhonebookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PhonebookGroup {
    pub name: String,
    pub phonebook_group: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupsPayload {
    #[serde(default)]
    pub phonebook_groups: Vec<PhonebookGroup>,
}

pub struct VoipClient {
    client: Client,
    api_url: Url,
    username: String,
    password: String,
}

impl VoipClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse<T>> {
        debug!("API call: {method}");

        // Errors carrying the URL would leak api_password into the logs.
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("method", method),
                ("api_username", self.username.as_str()),
                ("api_password", self.password.as_str()),
            ])
            .query(params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("{method}: request failed"))?
            .error_for_status()
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("{method}: HTTP error"))?;

        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("{method}: malformed response"))?;

        debug!("API call: {method} -> {}", body.status);
        Ok(body)
    }

    pub async fn get_cdrs(&self, window: &DateWindow) -> Result<ApiResponse<CdrPayload>> {
        self.call(
            "getCDR",
            &[
                ("date_from", window.from.as_str()),
                ("date_to", window.to.as_str()),
                ("timezone", TIMEZONE_OFFSET),
                ("answered", "1"),
            ],
        )
        .await
    }

    pub async fn get_phonebook(&self) -> Result<ApiResponse<PhonebookPayload>> {
        self.call("getPhonebook", &[]).await
    }

    pub async fn get_phonebook_groups(&self, name: &str) -> Result<ApiResponse<GroupsPayload>> {
        self.call("getPhonebookGroups", &[("name", name)]).await
    }

    pub async fn set_phonebook_group(&self, name: &str) -> Result<ApiResponse<NoPayload>> {
        self.call("setPhonebookGroup", &[("name", name)]).await
    }

    pub async fn set_phonebook(
        &self,
        name: &str,
        number: &str,
        group: &str,
    ) -> Result<ApiResponse<NoPayload>> {
        self.call(
            "setPhonebook",
            &[("name", name), ("number", number), ("group", group)],
        )
        .await
    }
}
