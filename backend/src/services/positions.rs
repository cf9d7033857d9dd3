use crate::error::Result;
use crate::models::{PositionRecord, PositionReport, PositionThresholds};
use crate::services::aggregator::SEARCH_PAGE_SIZE;
use crate::services::resolver::{is_youtube_host, ChannelResolver};
use crate::services::youtube::{PageFetcher, VideoSearch};
use crate::trace::TraceSink;
use crate::utils::{is_channel_id, watch_url};

pub const DEFAULT_SCAN_LIMIT: usize = 100;

/// Whether `channel` should go through the resolver rather than be used as is.
pub fn looks_like_url(channel: &str) -> bool {
    let channel = channel.trim();
    if is_channel_id(channel) {
        return false;
    }
    channel.contains("://")
        || channel.contains('/')
        || channel
            .split(['/', '?'])
            .next()
            .is_some_and(is_youtube_host)
}

pub fn thresholds(positions: &[PositionRecord]) -> PositionThresholds {
    let within = |limit: usize| positions.iter().filter(|p| p.position <= limit).count();
    PositionThresholds {
        top_10: within(10),
        top_20: within(20),
        top_50: within(50),
        top_100: within(100),
    }
}

/// Ranks of `channel`'s videos among the first `scan_limit` results for `keyword`.
pub fn check_positions(
    search: &dyn VideoSearch,
    fetcher: &dyn PageFetcher,
    keyword: &str,
    channel: &str,
    scan_limit: usize,
    trace: &mut TraceSink,
) -> Result<PositionReport> {
    let channel_id = if looks_like_url(channel) {
        trace.info(format!("Resolving channel from URL: {channel}"));
        ChannelResolver::new(fetcher).resolve(channel, trace)?
    } else {
        channel.trim().to_string()
    };
    trace.info(format!(
        "Scanning up to {scan_limit} results for '{keyword}' looking for {channel_id}"
    ));

    let mut positions = Vec::new();
    let mut rank = 0usize;
    let mut page_token: Option<String> = None;

    while rank < scan_limit {
        let remaining = scan_limit - rank;
        let page_size = remaining.min(SEARCH_PAGE_SIZE as usize) as u32;
        let page = match search.search_videos(keyword, page_size, page_token.as_deref()) {
            Ok(page) => page,
            Err(e) => {
                trace.error(format!("Search failed after {rank} results: {e}"));
                return Err(e);
            }
        };
        trace.debug(format!(
            "Requested {page_size} results, received {}",
            page.hits.len()
        ));

        if page.hits.is_empty() {
            break;
        }

        // the API may return more than asked for; rank what actually arrived
        for hit in page.hits.into_iter().take(remaining) {
            rank += 1;
            if hit.channel_id != channel_id {
                continue;
            }
            trace.info(format!("Match at position {rank}: {}", hit.title));
            positions.push(PositionRecord {
                position: rank,
                video_url: watch_url(&hit.video_id),
                video_id: hit.video_id,
                title: hit.title,
                channel_title: hit.channel_title,
                thumbnail_url: hit.thumbnail_url,
                published_at: hit.published_at,
            });
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    let channel_name = positions.first().map(|p| p.channel_title.clone());
    let thresholds = thresholds(&positions);
    trace.info(format!(
        "Scanned {rank} results, {} matches (top 10: {}, top 100: {})",
        positions.len(),
        thresholds.top_10,
        thresholds.top_100
    ));

    Ok(PositionReport {
        keyword: keyword.to_string(),
        channel_id,
        channel_name,
        scanned: rank,
        positions,
        thresholds,
    })
}
