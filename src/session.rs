// src/session.rs

use lazy_static::lazy_static;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::sleep;

use crate::config;

lazy_static! {
    static ref DEFAULT_HEADERS: HeaderMap = {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(config::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(config::ACCEPT));
        headers
    };
}

/// HTTP session shared by the registry fetch and the market-data provider.
///
/// Every request carries the browser user-agent and JSON accept header, and
/// cookies set by one response are sent back on the next.
#[derive(Clone)]
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .default_headers(DEFAULT_HEADERS.clone())
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(HttpSession { client })
    }

    pub async fn send_request(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client.get(url).send().await
    }

    pub async fn send_query(&self, url: &str, query: &[(&str, String)]) -> Result<Response, reqwest::Error> {
        self.client.get(url).query(query).send().await
    }
}

/// Fixed pause taken after every per-ticker fetch.
///
/// The provider publishes no rate limit, so this is a plain blocking delay
/// rather than a token bucket. A zero delay turns it off.
#[derive(Clone, Copy, Debug)]
pub struct RequestThrottle {
    delay: Duration,
}

impl RequestThrottle {
    pub fn new(delay: Duration) -> Self {
        RequestThrottle { delay }
    }

    pub fn disabled() -> Self {
        RequestThrottle::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}
