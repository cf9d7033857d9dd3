mod common;

use channel_insights::services::aggregator::{aggregate, search_videos, MIN_VIDEO_DURATION};
use common::{hit, StubSearch};
use std::time::Duration;

/// Three pages of 50/50/20 hits; every even hit is a 30 s short, every odd
/// one runs 90 s.
fn alternating_search() -> StubSearch {
    let mut search = StubSearch::new(
        [50usize, 50, 20]
            .iter()
            .enumerate()
            .map(|(page, size)| {
                (0..*size)
                    .map(|i| hit(&format!("p{page}v{i}"), &format!("UCchan{}", i % 4)))
                    .collect::<Vec<_>>()
            })
            .collect(),
    );
    for (page, size) in [50usize, 50, 20].iter().enumerate() {
        for i in 0..*size {
            let secs = if i % 2 == 0 { 30 } else { 90 };
            search = search.with_duration(&format!("p{page}v{i}"), Duration::from_secs(secs));
        }
    }
    search
}

#[test]
fn cap_counts_accepted_videos() {
    let search = alternating_search();
    let report = aggregate(&search, "rust tutorial", 20);

    assert_eq!(report.videos.len(), 20);
    assert!(report
        .videos
        .iter()
        .all(|v| v.duration >= Duration::from_secs(62)));
    assert!(search.detail_calls.get() > 20);
    assert_eq!(report.avg_duration, Duration::from_secs(90));
}

#[test]
fn pagination_follows_tokens_until_cap() {
    let search = alternating_search();
    let videos = search_videos(&search, "rust", 60).unwrap();

    // 25 + 25 + 10 long videos across the three pages
    assert_eq!(videos.len(), 60);
    assert_eq!(search.search_calls.get(), 3);
    assert_eq!(search.detail_calls.get(), 120);
    assert!(search.requested_sizes.borrow().iter().all(|size| *size == 50));
}

#[test]
fn exhausted_pagination_returns_what_was_found() {
    let search = alternating_search();
    let videos = search_videos(&search, "rust", 500).unwrap();

    assert_eq!(videos.len(), 60);
    assert_eq!(search.search_calls.get(), 3);
}

#[test]
fn zero_cap_makes_no_calls() {
    let search = alternating_search();
    let report = aggregate(&search, "", 0);

    assert!(report.videos.is_empty());
    assert_eq!(report.avg_views, 0.0);
    assert_eq!(report.avg_duration, Duration::ZERO);
    assert_eq!(report.unique_channels, 0);
    assert_eq!(report.totals.total_views, 0);
    assert_eq!(search.search_calls.get(), 0);
}

#[test]
fn threshold_is_inclusive() {
    let search = StubSearch::new(vec![vec![hit("short", "UC1"), hit("edge", "UC1")]])
        .with_duration("short", MIN_VIDEO_DURATION - Duration::from_secs(1))
        .with_duration("edge", MIN_VIDEO_DURATION);

    let videos = search_videos(&search, "edge", 20).unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].video_id, "edge");
}

#[test]
fn search_failure_yields_empty_report() {
    let search = StubSearch {
        fail_search: true,
        ..alternating_search()
    };
    let report = aggregate(&search, "rust", 20);

    assert!(report.videos.is_empty());
    assert_eq!(report.avg_likes, 0.0);
    assert!(report.channel_stats.is_empty());
    assert_eq!(search.search_calls.get(), 1);
}

#[test]
fn details_failure_mid_page_yields_empty_report() {
    let search = StubSearch {
        bad_duration_for: Some("p0v10".to_string()),
        ..alternating_search()
    };
    let report = aggregate(&search, "rust", 20);

    assert!(report.videos.is_empty());
    assert_eq!(report.avg_views, 0.0);
    assert_eq!(report.avg_duration, Duration::ZERO);
    assert_eq!(report.unique_channels, 0);
    assert!(report.age.is_empty());
    assert_eq!(report.totals.total_views, 0);
    assert_eq!(search.detail_calls.get(), 11);
    assert_eq!(search.search_calls.get(), 1);
}

#[test]
fn records_carry_derived_fields() {
    let search = StubSearch::new(vec![vec![hit("abc", "UCone")]]);
    let report = aggregate(&search, "one", 5);

    let video = &report.videos[0];
    assert_eq!(video.video_url, "https://www.youtube.com/watch?v=abc");
    assert_eq!(video.category, "Education");
    assert_eq!(video.channel_title, "Channel UCone");
    assert_eq!(video.day_of_week, video.published_at.format("%A").to_string());
    assert_eq!(report.age.last_6_months.len(), 1);
    assert_eq!(report.channel_stats["Channel UCone"].videos, 1);
}

#[test]
fn category_labels_are_looked_up_once_per_id() {
    let search = alternating_search();
    aggregate(&search, "rust", 20);
    assert_eq!(search.category_calls.get(), 1);
}
