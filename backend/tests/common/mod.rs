#![allow(dead_code)]

use channel_insights::error::{AppError, Result};
use channel_insights::models::{SearchHit, SearchPage, VideoDetails};
use channel_insights::services::youtube::{PageFetcher, VideoSearch, YouTubeServices};
use chrono::{Duration as AgeDuration, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

pub const CHANNEL_ID: &str = "UCabcdefghijklmnopqrstuv";

pub fn hit(video_id: &str, channel_id: &str) -> SearchHit {
    SearchHit {
        video_id: video_id.to_string(),
        title: format!("Video {video_id}"),
        channel_id: channel_id.to_string(),
        channel_title: format!("Channel {channel_id}"),
        published_at: Some(Utc::now() - AgeDuration::days(30)),
        thumbnail_url: format!("https://i.ytimg.com/vi/{video_id}/mqdefault.jpg"),
    }
}

/// Pages chained by tokens `page-1`, `page-2`, ...
#[derive(Clone, Default)]
pub struct StubSearch {
    pub pages: Vec<Vec<SearchHit>>,
    pub durations: HashMap<String, Duration>,
    pub fail_search: bool,
    pub bad_duration_for: Option<String>,
    pub search_calls: Cell<usize>,
    pub detail_calls: Cell<usize>,
    pub category_calls: Cell<usize>,
    pub requested_sizes: RefCell<Vec<u32>>,
}

impl StubSearch {
    pub fn new(pages: Vec<Vec<SearchHit>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, video_id: &str, duration: Duration) -> Self {
        self.durations.insert(video_id.to_string(), duration);
        self
    }
}

impl VideoSearch for StubSearch {
    fn search_videos(
        &self,
        _query: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<SearchPage> {
        self.search_calls.set(self.search_calls.get() + 1);
        self.requested_sizes.borrow_mut().push(page_size);
        if self.fail_search {
            return Err(AppError::api(403, "quotaExceeded"));
        }

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(usize::MAX),
        };
        let hits = self.pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(SearchPage {
            hits,
            next_page_token,
        })
    }

    fn get_video_details(&self, video_id: &str) -> Result<Option<VideoDetails>> {
        self.detail_calls.set(self.detail_calls.get() + 1);
        if self.bad_duration_for.as_deref() == Some(video_id) {
            return Err(AppError::InvalidDuration("PT99999999999999999999S".to_string()));
        }
        Ok(Some(VideoDetails {
            video_id: video_id.to_string(),
            duration: self
                .durations
                .get(video_id)
                .copied()
                .unwrap_or(Duration::from_secs(300)),
            views: 1000,
            likes: 50,
            comments: 5,
            category_id: "27".to_string(),
        }))
    }

    fn get_category_label(&self, _category_id: &str) -> String {
        self.category_calls.set(self.category_calls.get() + 1);
        "Education".to_string()
    }
}

/// Records every requested URL and answers with a fixed body.
#[derive(Default)]
pub struct StubFetcher {
    pub body: Option<String>,
    pub requests: RefCell<Vec<String>>,
    pub user_agents: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn returning(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PageFetcher for StubFetcher {
    fn fetch_page(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        if let Some((_, agent)) = headers.iter().find(|(name, _)| *name == "User-Agent") {
            self.user_agents.borrow_mut().push(agent.to_string());
        }
        self.body
            .clone()
            .ok_or_else(|| AppError::api(503, "connection reset"))
    }
}

pub fn channel_page(channel_id: &str) -> String {
    format!(r#"<html><script>var ytInitialData = {{"metadata":{{"channelId":"{channel_id}","title":"x"}}}};</script></html>"#)
}

/// Hands out fresh stubs for route tests.
pub struct StubServices {
    pub pages: Vec<Vec<SearchHit>>,
    pub page_body: Option<String>,
    pub configured: bool,
}

impl YouTubeServices for StubServices {
    fn video_search(&self) -> Result<Box<dyn VideoSearch>> {
        if !self.configured {
            return Err(AppError::config("YOUTUBE_API_KEY is not set"));
        }
        Ok(Box::new(StubSearch::new(self.pages.clone())))
    }

    fn page_fetcher(&self) -> Result<Box<dyn PageFetcher>> {
        Ok(Box::new(StubFetcher {
            body: self.page_body.clone(),
            ..StubFetcher::default()
        }))
    }
}
