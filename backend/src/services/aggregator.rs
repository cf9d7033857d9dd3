use crate::error::Result;
use crate::models::{AgeBuckets, AggregateReport, ChannelRollup, TotalStats, VideoRecord};
use crate::services::youtube::VideoSearch;
use crate::utils::{format_date, format_duration, format_number, watch_url};
use chrono::{DateTime, Duration as AgeDuration, Utc};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

pub const DEFAULT_REPORT_CAP: usize = 20;
pub const SEARCH_PAGE_SIZE: u32 = 50;

/// Shorter videos (shorts, teasers) are left out of reports.
pub const MIN_VIDEO_DURATION: Duration = Duration::from_secs(62);

const RECENT_DAYS: i64 = 180;
const YEAR_DAYS: i64 = 365;

/// Collects up to `cap` videos for `keyword` that pass the duration filter.
///
/// `cap` counts accepted videos, so many short results mean more pages and
/// more detail lookups.
pub fn search_videos(
    search: &dyn VideoSearch,
    keyword: &str,
    cap: usize,
) -> Result<Vec<VideoRecord>> {
    let mut videos = Vec::new();
    let mut categories: HashMap<String, String> = HashMap::new();
    let mut page_token: Option<String> = None;
    let mut examined = 0usize;

    while videos.len() < cap {
        let page = search.search_videos(keyword, SEARCH_PAGE_SIZE, page_token.as_deref())?;

        for hit in page.hits {
            examined += 1;
            let Some(details) = search.get_video_details(&hit.video_id)? else {
                debug!("No details for video {}, skipping", hit.video_id);
                continue;
            };

            if details.duration < MIN_VIDEO_DURATION {
                debug!(
                    "Skipping {} ({} is shorter than {})",
                    hit.video_id,
                    format_duration(details.duration),
                    format_duration(MIN_VIDEO_DURATION)
                );
                continue;
            }

            let Some(published_at) = hit.published_at else {
                warn!("Video {} has no publish date, skipping", hit.video_id);
                continue;
            };

            let category = categories
                .entry(details.category_id.clone())
                .or_insert_with(|| search.get_category_label(&details.category_id))
                .clone();

            debug!(
                "Accepted {} ({}, published {})",
                hit.video_id,
                format_duration(details.duration),
                format_date(&published_at)
            );
            videos.push(VideoRecord {
                video_url: watch_url(&hit.video_id),
                video_id: hit.video_id,
                title: hit.title,
                day_of_week: published_at.format("%A").to_string(),
                published_at,
                duration: details.duration,
                views: details.views,
                likes: details.likes,
                comments: details.comments,
                thumbnail_url: hit.thumbnail_url,
                category,
                channel_title: hit.channel_title,
                channel_id: hit.channel_id,
            });

            if videos.len() == cap {
                break;
            }
        }

        if videos.len() == cap {
            break;
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    info!(
        "Accepted {} of {} examined videos for '{}'",
        videos.len(),
        examined,
        keyword
    );
    Ok(videos)
}

/// Search plus statistics. Retrieval failures yield an empty report.
pub fn aggregate(search: &dyn VideoSearch, keyword: &str, cap: usize) -> AggregateReport {
    let videos = search_videos(search, keyword, cap).unwrap_or_else(|e| {
        error!("Failed to search videos for '{keyword}': {e}");
        Vec::new()
    });
    let report = summarize(keyword, videos, Utc::now());
    info!(
        "Report '{}': {} videos, {} channels, {} total views",
        keyword,
        report.videos.len(),
        report.unique_channels,
        format_number(report.totals.total_views)
    );
    report
}

pub fn summarize(keyword: &str, videos: Vec<VideoRecord>, now: DateTime<Utc>) -> AggregateReport {
    let totals = total_stats(&videos);
    AggregateReport {
        keyword: keyword.to_string(),
        avg_views: mean(totals.total_views, videos.len()),
        avg_likes: mean(totals.total_likes, videos.len()),
        avg_comments: mean(totals.total_comments, videos.len()),
        avg_duration: average_duration(&videos),
        unique_channels: count_unique_channels(&videos),
        channel_stats: channel_stats(&videos),
        age: categorize_by_age(&videos, now),
        totals,
        videos,
    }
}

fn mean(sum: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

pub fn average_duration(videos: &[VideoRecord]) -> Duration {
    if videos.is_empty() {
        return Duration::ZERO;
    }
    let total: Duration = videos.iter().map(|v| v.duration).sum();
    total.div_f64(videos.len() as f64)
}

pub fn count_unique_channels(videos: &[VideoRecord]) -> usize {
    videos
        .iter()
        .map(|v| v.channel_title.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Keyed by display name: two channels sharing a name share a rollup.
pub fn channel_stats(videos: &[VideoRecord]) -> BTreeMap<String, ChannelRollup> {
    let mut stats: BTreeMap<String, ChannelRollup> = BTreeMap::new();
    for video in videos {
        let entry = stats.entry(video.channel_title.clone()).or_default();
        entry.videos += 1;
        entry.views += video.views;
        entry.likes += video.likes;
        entry.comments += video.comments;
        if entry.thumbnail.is_empty() {
            entry.thumbnail = video.thumbnail_url.clone();
        }
    }
    stats
}

pub fn categorize_by_age(videos: &[VideoRecord], now: DateTime<Utc>) -> AgeBuckets {
    let six_months_ago = now - AgeDuration::days(RECENT_DAYS);
    let one_year_ago = now - AgeDuration::days(YEAR_DAYS);

    let mut buckets = AgeBuckets::default();
    for video in videos {
        if video.published_at > six_months_ago {
            buckets.last_6_months.push(video.clone());
        } else if video.published_at > one_year_ago {
            buckets.last_year.push(video.clone());
        } else {
            buckets.older_than_year.push(video.clone());
        }
    }
    buckets
}

pub fn total_stats(videos: &[VideoRecord]) -> TotalStats {
    videos.iter().fold(TotalStats::default(), |acc, v| TotalStats {
        total_views: acc.total_views + v.views,
        total_likes: acc.total_likes + v.likes,
        total_comments: acc.total_comments + v.comments,
    })
}
