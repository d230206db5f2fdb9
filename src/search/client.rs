use serde::Deserialize;

use super::error::{SearchError, SearchResult};

/// One search result, reduced to what is needed to add it to a mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub source_id: i64,
    pub display_name: String,
    pub preview: Option<String>,
    pub fallback_preview: Option<String>,
}

impl SearchHit {
    /// Preview to download: the high quality one if listed.
    pub fn download_url(&self) -> Option<&str> {
        self.preview.as_deref().or(self.fallback_preview.as_deref())
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<WireSound>,
}

#[derive(Deserialize)]
struct WireSound {
    id: i64,
    name: String,
    #[serde(default)]
    previews: WirePreviews,
}

#[derive(Deserialize, Default)]
struct WirePreviews {
    #[serde(rename = "preview-hq-mp3", alias = "preview_hq_mp3")]
    hq: Option<String>,
    #[serde(rename = "preview-lq-mp3", alias = "preview_lq_mp3")]
    lq: Option<String>,
}

impl From<WireSound> for SearchHit {
    fn from(s: WireSound) -> Self {
        let display_name = match s.name.trim() {
            "" => format!("Sound {}", s.id),
            name => name.to_string(),
        };
        Self {
            source_id: s.id,
            display_name,
            preview: s.previews.hq.filter(|u| !u.is_empty()),
            fallback_preview: s.previews.lq.filter(|u| !u.is_empty()),
        }
    }
}

/// Parse a text-search response body.
pub fn parse_results(body: &str) -> SearchResult<Vec<SearchHit>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.results.into_iter().map(SearchHit::from).collect())
}

pub struct FreesoundClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FreesoundClient {
    pub fn with_client(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    pub fn search_url(&self) -> String {
        format!("{}/search/text/", self.base_url)
    }

    /// Search by free text. A blank query returns no results without
    /// touching the network.
    pub async fn search(&self, query: &str) -> SearchResult<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        if !self.has_api_key() {
            return Err(SearchError::MissingApiKey);
        }

        let response = self
            .client
            .get(self.search_url())
            .query(&[
                ("query", query),
                ("fields", "id,name,previews"),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("search for {query:?} failed: HTTP {status}");
            return Err(SearchError::Status(status));
        }

        let hits = parse_results(&response.text().await?)?;
        log::info!("search for {query:?}: {} results", hits.len());
        Ok(hits)
    }
}
