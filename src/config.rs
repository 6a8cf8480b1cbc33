use anyhow::{bail, Context, Result};
use chrono::{Days, NaiveDate};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://voip.ms/api/v1/rest.php";
pub const MIN_DURATION: &str = "00:00:10";
pub const AUTO_WHITE_GROUP: &str = "auto_white";
pub const TIMEZONE_OFFSET: &str = "-7";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct AppConfig {
    pub username: String,
    pub password: String,
    pub phone_number: String,
    pub api_url: Url,
}

impl AppConfig {
    pub fn new(
        username: String,
        password: String,
        phone_number: String,
        api_url: &str,
    ) -> Result<Self> {
        let api_url = parse_api_url(api_url)?;
        Ok(Self {
            username,
            password,
            phone_number,
            api_url,
        })
    }
}

pub fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid API URL: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("API URL must be http or https: {raw}");
    }
    Ok(url)
}

/// Inclusive `[yesterday, tomorrow]` window around `today`, wide enough to
/// absorb the provider's fixed timezone offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub from: String,
    pub to: String,
}

impl DateWindow {
    pub fn around(today: NaiveDate) -> Result<Self> {
        let yesterday = today
            .checked_sub_days(Days::new(1))
            .context("Date window start out of range")?;
        let tomorrow = today
            .checked_add_days(Days::new(1))
            .context("Date window end out of range")?;

        Ok(Self {
            from: yesterday.format(DATE_FORMAT).to_string(),
            to: tomorrow.format(DATE_FORMAT).to_string(),
        })
    }

    pub fn today() -> Result<Self> {
        Self::around(chrono::Local::now().date_naive())
    }
}
