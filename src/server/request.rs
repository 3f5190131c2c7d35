use std::collections::HashMap;

use serde::de::DeserializeOwned;
use tiny_http::Method;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// `target` is the raw request target, e.g. `/api/saves?profile=main`.
    pub fn parse(method: Method, target: &str, body: Vec<u8>) -> AppResult<Self> {
        let url = Url::parse(&format!("http://localhost{target}"))?;
        let query = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self {
            method,
            path: url.path().to_string(),
            query,
            body,
        })
    }

    pub fn query(&self, key: &str) -> &str {
        self.query.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|_| AppError::InvalidInput("bad request".to_string()))
    }

    /// Percent-decoded path segments after `prefix`.
    pub fn segments_after(&self, prefix: &str) -> Option<Vec<String>> {
        let rest = self.path.strip_prefix(prefix)?;
        Some(
            rest.split('/')
                .filter(|segment| !segment.is_empty())
                .map(decode_segment)
                .collect(),
        )
    }
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
