//! Scripted fetcher for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::error::{AssetError, AssetResult};
use super::fetch::Fetcher;

#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, (Result<Vec<u8>, String>, Duration)>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(self, url: &str, body: &[u8]) -> Self {
        self.ok_after(url, body, Duration::ZERO)
    }

    pub fn ok_after(self, url: &str, body: &[u8], delay: Duration) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (Ok(body.to_vec()), delay));
        self
    }

    pub fn fail(self, url: &str, reason: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (Err(reason.to_string()), Duration::ZERO));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> AssetResult<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());
        let scripted = self.responses.lock().unwrap().get(url).cloned();
        let (result, delay) = scripted.unwrap_or_else(|| (Err("HTTP 404 Not Found".to_string()), Duration::ZERO));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result.map_err(|reason| AssetError::FetchFailed {
            url: url.to_string(),
            reason,
        })
    }
}
