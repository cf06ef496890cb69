use crate::config::TmdbConfig;
use crate::constants::limits;
use crate::domain::{MediaKind, TmdbId};
use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Rendition sizes served by the TMDB image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W300,
    W500,
    Original,
}

impl ImageSize {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W300 => "w300",
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

/// Builds a full CDN URL from a relative `file_path` returned by the API.
#[must_use]
pub fn image_url(path: &str, size: ImageSize) -> String {
    format!("{}/{}{}", TMDB_IMAGE_BASE, size.as_str(), path)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub status: Option<String>,
    pub vote_average: Option<f32>,
    pub runtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub belongs_to_collection: Option<CollectionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesDetails {
    pub id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub status: Option<String>,
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonSummary {
    pub id: i64,
    pub season_number: i32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub air_date: Option<String>,
    pub episode_count: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonDetails {
    pub id: i64,
    pub season_number: i32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub air_date: Option<String>,
    #[serde(default)]
    pub episodes: Vec<EpisodeDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeDetails {
    pub id: i64,
    pub episode_number: i32,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub still_path: Option<String>,
    pub runtime: Option<i32>,
}

/// Full metadata for a title, tagged by which endpoint family served it.
///
/// Movies and series share most descriptive fields but differ in dating
/// (`release_date` vs `first_air_date`) and children (seasons), so callers
/// that only need the common surface go through the accessors below.
#[derive(Debug, Clone)]
pub enum TitleDetails {
    Movie(MovieDetails),
    Series(SeriesDetails),
}

impl TitleDetails {
    #[must_use]
    pub const fn tmdb_id(&self) -> TmdbId {
        match self {
            Self::Movie(m) => TmdbId::new(m.id),
            Self::Series(s) => TmdbId::new(s.id),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        match self {
            Self::Movie(_) => MediaKind::Movie,
            Self::Series(_) => MediaKind::Series,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Movie(m) => &m.title,
            Self::Series(s) => &s.name,
        }
    }

    /// Release date for movies, first air date for series.
    #[must_use]
    pub fn release_date(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.release_date.as_deref(),
            Self::Series(s) => s.first_air_date.as_deref(),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.status.as_deref(),
            Self::Series(s) => s.status.as_deref(),
        }
    }

    #[must_use]
    pub fn overview(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.overview.as_deref(),
            Self::Series(s) => s.overview.as_deref(),
        }
    }

    #[must_use]
    pub fn poster_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.poster_path.as_deref(),
            Self::Series(s) => s.poster_path.as_deref(),
        }
    }

    #[must_use]
    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.backdrop_path.as_deref(),
            Self::Series(s) => s.backdrop_path.as_deref(),
        }
    }

    #[must_use]
    pub const fn vote_average(&self) -> Option<f32> {
        match self {
            Self::Movie(m) => m.vote_average,
            Self::Series(s) => s.vote_average,
        }
    }

    #[must_use]
    pub fn primary_genre(&self) -> Option<&str> {
        let genres = match self {
            Self::Movie(m) => &m.genres,
            Self::Series(s) => &s.genres,
        };
        genres.first().map(|g| g.name.as_str())
    }

    /// Year component of the release date, if it parses.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.release_date()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageAsset {
    pub file_path: String,
    pub iso_639_1: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    logos: Vec<ImageAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CreditsResponse {
    #[serde(default)]
    cast: Vec<CastMember>,
}

/// One row of a search, trending or recommendation listing.
///
/// Movie rows carry `title`/`release_date`, series rows `name`/
/// `first_air_date`; the aliases fold both shapes into one struct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryItem {
    pub id: i64,
    pub media_type: Option<String>,
    #[serde(alias = "name")]
    pub title: Option<String>,
    #[serde(alias = "first_air_date")]
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f32>,
}

impl DiscoveryItem {
    /// Maps the `media_type` discriminator, when present, onto a kind.
    /// Person rows and unknown types come back as `None`.
    #[must_use]
    pub fn kind(&self) -> Option<MediaKind> {
        self.media_type.as_deref().and_then(|m| m.parse().ok())
    }
}

#[derive(Debug, Deserialize)]
struct Paged<T> {
    #[serde(default)]
    results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionPart {
    pub id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionDetails {
    pub id: i64,
    pub name: String,
    pub overview: Option<String>,
    #[serde(default)]
    pub parts: Vec<CollectionPart>,
}

/// Path segment the API uses for each kind of title.
const fn api_segment(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "movie",
        MediaKind::Series => "tv",
    }
}

/// Picks a logo by language priority, falling back to the first asset.
fn select_logo<'a>(logos: &'a [ImageAsset], priorities: &[String]) -> Option<&'a ImageAsset> {
    for lang in priorities {
        if let Some(asset) = logos
            .iter()
            .find(|a| a.iso_639_1.as_deref() == Some(lang.as_str()))
        {
            return Some(asset);
        }
    }
    logos.first()
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    logo_languages: Vec<String>,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Self {
        Self::with_shared_client(
            Client::builder()
                .user_agent("Vodarr/1.0")
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        )
    }

    /// Creates a client on top of a shared HTTP client.
    ///
    /// This is the preferred constructor when using `AppState` as it allows
    /// connection pooling and reuse across multiple clients.
    #[must_use]
    pub fn with_shared_client(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            logo_languages: config.logo_languages.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("language", &self.language);
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }

    /// Like [`Self::fetch`] but maps a 404 to `None` for lookups by id.
    async fn fetch_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        Ok(Some(response.json().await?))
    }

    pub async fn movie_details(&self, id: TmdbId) -> Result<Option<MovieDetails>> {
        let url = self.endpoint(&format!("movie/{id}"))?;
        debug!("Fetching movie details for TMDB ID: {}", id);
        self.fetch_optional(url).await
    }

    pub async fn series_details(&self, id: TmdbId) -> Result<Option<SeriesDetails>> {
        let url = self.endpoint(&format!("tv/{id}"))?;
        debug!("Fetching series details for TMDB ID: {}", id);
        self.fetch_optional(url).await
    }

    pub async fn title_details(&self, id: TmdbId, kind: MediaKind) -> Result<Option<TitleDetails>> {
        match kind {
            MediaKind::Movie => Ok(self.movie_details(id).await?.map(TitleDetails::Movie)),
            MediaKind::Series => Ok(self.series_details(id).await?.map(TitleDetails::Series)),
        }
    }

    pub async fn season_details(
        &self,
        series_id: TmdbId,
        season_number: i32,
    ) -> Result<Option<SeasonDetails>> {
        let url = self.endpoint(&format!("tv/{series_id}/season/{season_number}"))?;
        self.fetch_optional(url).await
    }

    /// Resolves a displayable logo URL for a title, preferring the
    /// configured languages in priority order.
    pub async fn logo_url(&self, id: TmdbId, kind: MediaKind) -> Result<Option<String>> {
        let mut url = Url::parse(&format!(
            "{}/{}/{}/images",
            self.base_url,
            api_segment(kind),
            id
        ))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair(
                "include_image_language",
                crate::constants::locale::IMAGE_LANGUAGES,
            );

        let images: Option<ImagesResponse> = self.fetch_optional(url).await?;
        let images = images.unwrap_or_default();

        Ok(select_logo(&images.logos, &self.logo_languages)
            .map(|asset| image_url(&asset.file_path, ImageSize::Original)))
    }

    pub async fn credits(&self, id: TmdbId, kind: MediaKind) -> Result<Vec<CastMember>> {
        let url = self.endpoint(&format!("{}/{}/credits", api_segment(kind), id))?;
        let credits: Option<CreditsResponse> = self.fetch_optional(url).await?;
        Ok(credits.unwrap_or_default().cast)
    }

    pub async fn recommendations(&self, id: TmdbId, kind: MediaKind) -> Result<Vec<DiscoveryItem>> {
        let url = self.endpoint(&format!("{}/{}/recommendations", api_segment(kind), id))?;
        let page: Paged<DiscoveryItem> = self.fetch(url).await?;
        Ok(page.results)
    }

    pub async fn collection(&self, id: i64) -> Result<Option<CollectionDetails>> {
        let url = self.endpoint(&format!("collection/{id}"))?;
        self.fetch_optional(url).await
    }

    /// Cross-kind search. Person rows are dropped; movie and series rows
    /// come back in API ranking order, capped to keep output scannable.
    pub async fn search_multi(&self, query: &str) -> Result<Vec<DiscoveryItem>> {
        let mut url = self.endpoint("search/multi")?;
        url.query_pairs_mut().append_pair("query", query);

        debug!("Searching TMDB for: {}", query);

        let page: Paged<DiscoveryItem> = self.fetch(url).await?;
        Ok(page
            .results
            .into_iter()
            .filter(|item| item.kind().is_some())
            .take(limits::MAX_SEARCH_RESULTS)
            .collect())
    }

    pub async fn trending(&self) -> Result<Vec<DiscoveryItem>> {
        let url = self.endpoint("trending/all/week")?;
        let page: Paged<DiscoveryItem> = self.fetch(url).await?;
        Ok(page
            .results
            .into_iter()
            .filter(|item| item.kind().is_some())
            .collect())
    }

    pub async fn popular(&self, kind: MediaKind) -> Result<Vec<DiscoveryItem>> {
        let url = self.endpoint(&format!("{}/popular", api_segment(kind)))?;
        let page: Paged<DiscoveryItem> = self.fetch(url).await?;
        Ok(page.results)
    }

    pub async fn top_rated(&self, kind: MediaKind) -> Result<Vec<DiscoveryItem>> {
        let url = self.endpoint(&format!("{}/top_rated", api_segment(kind)))?;
        let page: Paged<DiscoveryItem> = self.fetch(url).await?;
        Ok(page.results)
    }
}
