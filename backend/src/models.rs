use chrono::{DateTime, Utc};
use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::time::Duration;

use crate::trace::TraceEvent;

/// Serializes a `Duration` as whole seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// One item of a `search.list` page. Only what the search endpoint returns,
/// no statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub next_page_token: Option<String>,
}

/// Extended metadata from `videos.list`.
#[derive(Debug, Clone, Default)]
pub struct VideoDetails {
    pub video_id: String,
    pub duration: Duration,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub day_of_week: String,
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub video_url: String,
    pub thumbnail_url: String,
    pub category: String,
    pub channel_title: String,
    pub channel_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelRollup {
    pub videos: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeBuckets {
    pub last_6_months: Vec<VideoRecord>,
    pub last_year: Vec<VideoRecord>,
    pub older_than_year: Vec<VideoRecord>,
}

impl AgeBuckets {
    pub fn len(&self) -> usize {
        self.last_6_months.len() + self.last_year.len() + self.older_than_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateReport {
    pub keyword: String,
    pub videos: Vec<VideoRecord>,
    pub avg_views: f64,
    pub avg_likes: f64,
    pub avg_comments: f64,
    #[serde(with = "duration_secs")]
    pub avg_duration: Duration,
    pub unique_channels: usize,
    pub channel_stats: BTreeMap<String, ChannelRollup>,
    pub age: AgeBuckets,
    pub totals: TotalStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub position: usize, // 1-based
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionThresholds {
    pub top_10: usize,
    pub top_20: usize,
    pub top_50: usize,
    pub top_100: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionReport {
    pub keyword: String,
    pub channel_id: String,
    pub channel_name: Option<String>,
    pub scanned: usize,
    pub positions: Vec<PositionRecord>,
    pub thresholds: PositionThresholds,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PositionResponse {
    #[serde(flatten)]
    pub report: PositionReport,
    pub trace: Vec<TraceEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub input: String,
    pub channel_id: Option<String>,
    pub found: bool,
    pub error: Option<String>,
    pub trace: Vec<TraceEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(Status::from_code(self.status).unwrap_or(Status::InternalServerError))
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
