use std::sync::OnceLock;

use regex::Regex;

// Archived pages do not keep the exact live markup,
// so every pattern matches the URLs and not the DOM around them

/// An optional scheme, `//` urls being protocol-relative
macro_rules! scheme {
    () => {
        r#"(?:https?:)?//"#
    };
}
/// Anything that may appear in an attribute value before the clip path.
/// This includes the host and any archive rewriting prefix
macro_rules! url_prefix {
    () => {
        r#"[^\s"'<>()]*?"#
    };
}
/// The clip ID, the directory of all its media files
macro_rules! clip_id {
    () => {
        r#"/video/(?P<id>[0-9A-Za-z]+)"#
    };
}
/// The media file, either an encoding (`720.mp4`) or an image (`poster.jpg`)
macro_rules! media_file {
    () => {
        r#"/processed/(?P<file>[0-9A-Za-z_.-]+?)\.(?P<ext>mp4|jpe?g|png|webp)"#
    };
}

/// Example: "https://web.archive.org/web/20191210043532im_/https://d0playscdntv-a.akamaihd.net/video/abc123/processed/poster.jpg"
const MEDIA_URL: &str = concat!("(?P<url>", scheme!(), url_prefix!(), clip_id!(), media_file!(), ")");

/// Example: "https://web.archive.org/web/20191210043532im_/"
const WAYBACK_PREFIX: &str = concat!("^", scheme!(), r#"web\.archive\.org/web/\d+[a-z_]*/"#);

/// Example: `href="/web/20191210043532/https://plays.tv/u/someone?page=2"`
const PAGE_LINK: &str =
    r#"href\s*=\s*["'](?P<href>[^"']*?[?&](?:amp;)?(?:page|page_num)=(?P<page>\d+)[^"']*)["']"#;

/// Example: `<span class="nav-tab-label">Midorina's Videos (148)</span>`
const VIDEO_COUNT: &str = r#"nav-tab-label[^>]*>[^<]*?\((?P<count>\d+)\)"#;

static MEDIA_URL_RE: OnceLock<Regex> = OnceLock::new();
static WAYBACK_PREFIX_RE: OnceLock<Regex> = OnceLock::new();
static PAGE_LINK_RE: OnceLock<Regex> = OnceLock::new();
static VIDEO_COUNT_RE: OnceLock<Regex> = OnceLock::new();

pub fn media_url() -> &'static Regex {
    MEDIA_URL_RE.get_or_init(|| Regex::new(MEDIA_URL).unwrap())
}

pub fn wayback_prefix() -> &'static Regex {
    WAYBACK_PREFIX_RE.get_or_init(|| Regex::new(WAYBACK_PREFIX).unwrap())
}

pub fn page_link() -> &'static Regex {
    PAGE_LINK_RE.get_or_init(|| Regex::new(PAGE_LINK).unwrap())
}

pub fn video_count() -> &'static Regex {
    VIDEO_COUNT_RE.get_or_init(|| Regex::new(VIDEO_COUNT).unwrap())
}
