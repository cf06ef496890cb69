use crate::constants::playback;
use crate::domain::{MediaKind, TmdbId};
use anyhow::Result;
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

/// Category value the bulk listing endpoint expects for each kind.
const fn catalog_category(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "movie",
        MediaKind::Series => "serie",
    }
}

/// Path segment the player embeds use for each kind.
const fn player_segment(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => playback::MOVIE_SEGMENT,
        MediaKind::Series => playback::SERIES_SEGMENT,
    }
}

/// Canonical player URL for a title on the upstream provider.
#[must_use]
pub fn playback_url(base: &str, kind: MediaKind, id: TmdbId) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), player_segment(kind), id)
}

fn href_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"href="([^"]+)""#).expect("valid href regex"))
}

/// Extracts episode numbers from a season page by matching anchor targets
/// of the form `.../serie/{series}/{season}/{episode}`.
///
/// Anything the markup no longer exposes simply isn't collected, so a
/// layout change upstream degrades to an empty set rather than an error.
#[must_use]
pub fn parse_episode_numbers(html: &str, series_id: TmdbId, season: i32) -> HashSet<i32> {
    let needle = format!("/serie/{series_id}/{season}/");
    let mut numbers = HashSet::new();

    for caps in href_pattern().captures_iter(html) {
        let href = html_escape::decode_html_entities(&caps[1]);
        let Some(idx) = href.find(&needle) else {
            continue;
        };

        let digits: String = href[idx + needle.len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();

        if let Ok(number) = digits.parse() {
            numbers.insert(number);
        }
    }

    numbers
}

/// Client for the upstream playback-availability provider.
///
/// Two very different surfaces live here: a JSON bulk listing of every
/// playable identifier per category, and per-season HTML pages that are
/// scraped for linkable episodes.
#[derive(Clone)]
pub struct SuperflixClient {
    client: Client,
    base_url: String,
}

impl SuperflixClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_shared_client(
            Client::builder()
                .user_agent("Vodarr/1.0")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        )
    }

    /// Creates a client on top of a shared HTTP client.
    #[must_use]
    pub fn with_shared_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches every playable identifier for a kind in one request.
    pub async fn list_catalog_ids(&self, kind: MediaKind) -> Result<HashSet<String>> {
        let mut url = Url::parse(&format!("{}/lista", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("category", catalog_category(kind))
            .append_pair("type", "tmdb")
            .append_pair("format", "json");

        debug!("Fetching availability list for {}", kind);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!("Availability list error: {}", status));
        }

        let ids: Vec<String> = response.json().await?;
        Ok(ids.into_iter().collect())
    }

    /// Fetches the raw HTML for one season of a series.
    pub async fn season_page(&self, series_id: TmdbId, season: i32) -> Result<String> {
        let url = format!("{}/serie/{}/{}", self.base_url, series_id, season);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!("Season page error: {}", status));
        }

        Ok(response.text().await?)
    }

    /// Episode numbers with a working link on the season page.
    pub async fn available_episode_numbers(
        &self,
        series_id: TmdbId,
        season: i32,
    ) -> Result<HashSet<i32>> {
        let html = self.season_page(series_id, season).await?;
        Ok(parse_episode_numbers(&html, series_id, season))
    }
}
