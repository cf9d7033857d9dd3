//! Channel id resolution from free-form YouTube URLs.
//!
//! Resolution runs an ordered list of [`ResolveStep`]s over the parsed input.
//! Each step either settles the outcome, asks for a page to be scanned, or
//! passes to the next step. Only the final page scan touches the network.

use crate::error::ResolveError;
use crate::services::youtube::PageFetcher;
use crate::trace::TraceSink;
use crate::utils::watch_url;
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const CUSTOM_NAME_MARKERS: [&str; 2] = ["c", "user"];

lazy_static! {
    static ref CHANNEL_ID_IN_PAGE: Regex =
        Regex::new(r#""channelId":"(UC[a-zA-Z0-9_-]{22})""#).unwrap();
}

/// Input after scheme normalization and URL parsing.
#[derive(Debug)]
pub struct ParsedInput {
    pub normalized: String,
    pub url: Url,
    pub segments: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Resolved(String),
    Fetch(String),
    Reject(ResolveError),
    Continue,
}

pub type ResolveStep = fn(&ParsedInput, &mut TraceSink) -> Step;

/// Evaluated in order; the first step that does not `Continue` wins.
pub const RESOLVE_CHAIN: [ResolveStep; 5] = [
    host_gate,
    channel_path,
    custom_name,
    watch_link,
    short_link,
];

pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

pub fn parse_input(raw: &str) -> Result<ParsedInput, ResolveError> {
    let normalized = normalize(raw);
    let url = Url::parse(&normalized).map_err(|_| ResolveError::InvalidUrl(raw.to_string()))?;
    let segments = url
        .path_segments()
        .map(|parts| {
            parts
                .filter(|part| !part.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(ParsedInput {
        normalized,
        url,
        segments,
    })
}

pub fn is_youtube_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "youtube.com" || host.ends_with(".youtube.com") || host == "youtu.be"
}

pub fn host_gate(input: &ParsedInput, trace: &mut TraceSink) -> Step {
    let host = input.url.host_str().unwrap_or("");
    if is_youtube_host(host) {
        Step::Continue
    } else {
        trace.warn(format!("Not a valid YouTube URL (host '{host}')"));
        Step::Reject(ResolveError::UnsupportedHost(host.to_string()))
    }
}

pub fn channel_path(input: &ParsedInput, trace: &mut TraceSink) -> Step {
    trace.debug(format!("Path segments: {:?}", input.segments));
    let Some(index) = input.segments.iter().position(|s| s == "channel") else {
        return Step::Continue;
    };
    match input.segments.get(index + 1) {
        Some(channel_id) => {
            trace.info(format!("Channel id found in URL: {channel_id}"));
            Step::Resolved(channel_id.clone())
        }
        None => {
            trace.warn("URL ends with 'channel' but carries no id");
            Step::Continue
        }
    }
}

pub fn custom_name(input: &ParsedInput, trace: &mut TraceSink) -> Step {
    let Some(first) = input.segments.first() else {
        return Step::Continue;
    };
    if !CUSTOM_NAME_MARKERS.contains(&first.as_str()) && !first.starts_with('@') {
        return Step::Continue;
    }
    let Some(name) = input.segments.last() else {
        return Step::Continue;
    };

    trace.info(format!("Custom name found: {name}"));
    let profile_url = format!("https://www.youtube.com/{name}");
    trace.info(format!("Resolving id from custom name page: {profile_url}"));
    Step::Fetch(profile_url)
}

pub fn watch_link(input: &ParsedInput, trace: &mut TraceSink) -> Step {
    if !input.segments.iter().any(|s| s == "watch") {
        return Step::Continue;
    }
    let video_id = input
        .url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty());

    match video_id {
        Some(video_id) => {
            trace.info(format!("Video id found: {video_id}"));
            video_page(&video_id, trace)
        }
        None => {
            trace.warn("Watch URL without a 'v' parameter");
            Step::Reject(ResolveError::NotFound)
        }
    }
}

pub fn short_link(input: &ParsedInput, trace: &mut TraceSink) -> Step {
    if !input
        .url
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case("youtu.be"))
    {
        return Step::Continue;
    }
    match input.segments.first() {
        Some(video_id) => {
            trace.info(format!("Video id found in short link: {video_id}"));
            video_page(video_id, trace)
        }
        None => Step::Continue,
    }
}

fn video_page(video_id: &str, trace: &mut TraceSink) -> Step {
    let url = watch_url(video_id);
    trace.info(format!("Resolving id from video page: {url}"));
    Step::Fetch(url)
}

/// First `"channelId":"UC..."` occurrence in an HTML document.
pub fn scan_channel_id(html: &str) -> Option<String> {
    CHANNEL_ID_IN_PAGE
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

pub struct ChannelResolver<'a> {
    fetcher: &'a dyn PageFetcher,
}

impl<'a> ChannelResolver<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher) -> Self {
        Self { fetcher }
    }

    pub fn resolve(&self, raw: &str, trace: &mut TraceSink) -> Result<String, ResolveError> {
        trace.info(format!("Processing URL: {raw}"));

        let input = match parse_input(raw) {
            Ok(input) => input,
            Err(e) => {
                trace.warn(format!("Rejected input: {e}"));
                return Err(e);
            }
        };

        for step in RESOLVE_CHAIN {
            match step(&input, trace) {
                Step::Continue => continue,
                Step::Resolved(channel_id) => return Ok(channel_id),
                Step::Reject(e) => return Err(e),
                Step::Fetch(url) => return self.from_page(&url, trace),
            }
        }

        trace.info("Trying to read the id from the page content");
        self.from_page(&input.normalized, trace)
    }

    fn from_page(&self, url: &str, trace: &mut TraceSink) -> Result<String, ResolveError> {
        let html = match self
            .fetcher
            .fetch_page(url, &[("User-Agent", BROWSER_USER_AGENT)])
        {
            Ok(html) => html,
            Err(e) => {
                trace.error(format!("Failed to fetch page content: {e}"));
                return Err(ResolveError::NotFound);
            }
        };

        match scan_channel_id(&html) {
            Some(channel_id) => {
                trace.info(format!("Channel id found in page content: {channel_id}"));
                Ok(channel_id)
            }
            None => {
                trace.warn("No channel id found in page content");
                Err(ResolveError::NotFound)
            }
        }
    }
}

/// Resolves `raw` with a fresh trace sink and hands the sink back.
pub fn resolve_channel_id(
    fetcher: &dyn PageFetcher,
    raw: &str,
) -> (Result<String, ResolveError>, TraceSink) {
    let mut trace = TraceSink::new();
    let result = ChannelResolver::new(fetcher).resolve(raw, &mut trace);
    (result, trace)
}
