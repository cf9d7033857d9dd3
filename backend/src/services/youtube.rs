use crate::error::{AppError, Result};
use crate::models::{SearchHit, SearchPage, VideoDetails};
use crate::utils::{parse_iso8601_duration, parse_iso8601_timestamp};
use log::{debug, error};
use reqwest::blocking::{Client, Response};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Keyed video search.
pub trait VideoSearch {
    /// One page of `search.list` (videos only).
    fn search_videos(
        &self,
        query: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage>;

    /// `None` when the API knows no such video.
    fn get_video_details(&self, video_id: &str) -> Result<Option<VideoDetails>>;

    /// Never fails; falls back to [`UNKNOWN_CATEGORY`].
    fn get_category_label(&self, category_id: &str) -> String;
}

/// Raw HTML fetch.
pub trait PageFetcher {
    fn fetch_page(&self, url: &str, headers: &[(&str, &str)]) -> Result<String>;
}

/// Builds per-request capability instances for the HTTP layer.
pub trait YouTubeServices: Send + Sync {
    fn video_search(&self) -> Result<Box<dyn VideoSearch>>;
    fn page_fetcher(&self) -> Result<Box<dyn PageFetcher>>;
}

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()?;
        read_api_response(response)
    }
}

fn read_api_response(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.json::<Value>()?;
    if !status.is_success() {
        let message = body["error"]["message"]
            .as_str()
            .unwrap_or("no error message")
            .to_string();
        return Err(AppError::api(status.as_u16(), message));
    }
    Ok(body)
}

fn count(value: &Value) -> u64 {
    // statistics counters are JSON strings; hidden counters are absent
    value.as_str().unwrap_or("0").parse().unwrap_or(0)
}

pub fn parse_search_page(response: &Value) -> SearchPage {
    let hits = response["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let video_id = item["id"]["videoId"].as_str()?;
                    let snippet = &item["snippet"];
                    Some(SearchHit {
                        video_id: video_id.to_string(),
                        title: snippet["title"].as_str().unwrap_or("Untitled").to_string(),
                        channel_id: snippet["channelId"].as_str().unwrap_or("").to_string(),
                        channel_title: snippet["channelTitle"]
                            .as_str()
                            .unwrap_or("Unknown")
                            .to_string(),
                        published_at: snippet["publishedAt"]
                            .as_str()
                            .and_then(parse_iso8601_timestamp),
                        thumbnail_url: snippet["thumbnails"]["medium"]["url"]
                            .as_str()
                            .unwrap_or("")
                            .to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    SearchPage {
        hits,
        next_page_token: response["nextPageToken"].as_str().map(String::from),
    }
}

pub fn parse_video_details(response: &Value) -> Result<Option<VideoDetails>> {
    let item = &response["items"][0];
    let Some(video_id) = item["id"].as_str() else {
        return Ok(None);
    };

    let raw_duration = item["contentDetails"]["duration"].as_str().unwrap_or("");
    let duration = parse_iso8601_duration(raw_duration)
        .ok_or_else(|| AppError::InvalidDuration(raw_duration.to_string()))?;

    Ok(Some(VideoDetails {
        video_id: video_id.to_string(),
        duration,
        views: count(&item["statistics"]["viewCount"]),
        likes: count(&item["statistics"]["likeCount"]),
        comments: count(&item["statistics"]["commentCount"]),
        category_id: item["snippet"]["categoryId"]
            .as_str()
            .unwrap_or("")
            .to_string(),
    }))
}

impl VideoSearch for YouTubeClient {
    // Documentation: https://developers.google.com/youtube/v3/docs/search/list
    fn search_videos(
        &self,
        query: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage> {
        let max_results = page_size.to_string();
        let mut params = vec![
            ("part", "id,snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response = self.get_json("search", &params)?;
        let page = parse_search_page(&response);
        debug!(
            "search '{}' returned {} hits (next page: {})",
            query,
            page.hits.len(),
            page.next_page_token.is_some()
        );
        Ok(page)
    }

    // Documentation: https://developers.google.com/youtube/v3/docs/videos
    fn get_video_details(&self, video_id: &str) -> Result<Option<VideoDetails>> {
        let response = self.get_json(
            "videos",
            &[("part", "contentDetails,statistics,snippet"), ("id", video_id)],
        )?;
        parse_video_details(&response)
    }

    fn get_category_label(&self, category_id: &str) -> String {
        match self.get_json("videoCategories", &[("part", "snippet"), ("id", category_id)]) {
            Ok(response) => response["items"][0]["snippet"]["title"]
                .as_str()
                .unwrap_or(UNKNOWN_CATEGORY)
                .to_string(),
            Err(e) => {
                error!("Failed to fetch category {category_id}: {e}");
                UNKNOWN_CATEGORY.to_string()
            }
        }
    }
}

pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_page(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        // the body is scanned whatever the status code
        Ok(request.send()?.text()?)
    }
}

/// Live services configured from the environment.
pub struct LiveServices {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl YouTubeServices for LiveServices {
    fn video_search(&self) -> Result<Box<dyn VideoSearch>> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::config("YOUTUBE_API_KEY is not set"))?;
        Ok(Box::new(YouTubeClient::new(
            api_key,
            &self.base_url,
            self.timeout,
        )?))
    }

    fn page_fetcher(&self) -> Result<Box<dyn PageFetcher>> {
        Ok(Box::new(HttpPageFetcher::new(self.timeout)?))
    }
}
