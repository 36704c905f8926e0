use std::any::Any;
use std::env::vars;

use chrono::TimeDelta;
use log::info;
use roster_states::{State, state_assign_impl};
use serde::Deserialize;
use ustr::Ustr;

/// Backend used when `ROSTER_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Rows per page. The backend contract fixes it, it is not read from the
/// environment.
pub const PAGE_SIZE: usize = 10;

pub const AADHAR_LENGTH: usize = 16;

pub const AMOUNT_MIN: i32 = 0;

pub const AMOUNT_MAX: i32 = 1000;

pub const TOAST_DURATION_MS: i64 = 2500;

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    roster_api_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub aadhar_length: usize,
    pub amount_min: i32,
    pub amount_max: i32,
    /// How long a notification stays visible after it was raised.
    pub toast_duration: TimeDelta,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_base_url: base_url.trim_end_matches('/').to_owned(),
            page_size: PAGE_SIZE,
            aadhar_length: AADHAR_LENGTH,
            amount_min: AMOUNT_MIN,
            amount_max: AMOUNT_MAX,
            toast_duration: TimeDelta::milliseconds(TOAST_DURATION_MS),
        }
    }

    /// Reads `ROSTER_API_BASE_URL` from the environment.
    pub fn init() -> anyhow::Result<Self> {
        info!("Loading configuration from environment variables");
        let raw_config: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw_config)
    }

    fn from_raw(raw_config: RawConfig) -> anyhow::Result<Self> {
        let base_url = match raw_config.roster_api_base_url {
            Some(url) if url.trim().is_empty() => {
                anyhow::bail!("ROSTER_API_BASE_URL must not be empty")
            }
            Some(url) => {
                let url = url.trim().to_owned();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    anyhow::bail!("ROSTER_API_BASE_URL must be an http(s) URL, got {url}");
                }
                info!("Using provided ROSTER_API_BASE_URL: {url}");
                url
            }
            None => {
                info!("ROSTER_API_BASE_URL not set, defaulting to {DEFAULT_API_BASE_URL}");
                DEFAULT_API_BASE_URL.to_owned()
            }
        };
        Ok(Self::new(base_url))
    }

    pub fn api_url(&self) -> Ustr {
        Ustr::from(&format!("{}/api", self.api_base_url))
    }

    pub fn amount_range(&self) -> std::ops::RangeInclusive<i32> {
        self.amount_min..=self.amount_max
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl State for BusinessConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
