use serde::Serialize;

use crate::PRODUCT_NAME;

/// Entries of the share menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    Download,
    Instagram,
    Link,
    Twitter,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 4] = [
        ShareTarget::Download,
        ShareTarget::Instagram,
        ShareTarget::Link,
        ShareTarget::Twitter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShareTarget::Download => "Download This Slide",
            ShareTarget::Instagram => "Share to Instagram",
            ShareTarget::Link => "Share Link",
            ShareTarget::Twitter => "Share to Twitter",
        }
    }
}

/// Payload handed to a platform share intent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

pub fn share_title(year: i32) -> String {
    format!("{PRODUCT_NAME} Wrapped {year}")
}

pub fn hashtag(year: i32) -> String {
    format!("#{PRODUCT_NAME}Wrapped{year}")
}

pub fn share_payload(year: i32, url: &str) -> SharePayload {
    SharePayload {
        title: share_title(year),
        text: format!("Check out my {}!", share_title(year)),
        url: url.to_string(),
    }
}

/// Public location of a user's recap.
pub fn recap_url(share_base_url: &str, user_id: &str, year: i32) -> String {
    let base = share_base_url.trim_end_matches('/');
    format!("{base}/{}/{year}", encode_uri_component(user_id))
}

/// Pre-filled social compose link with the fixed hashtag text.
pub fn compose_url(year: i32) -> String {
    let text = format!("Check out my {}! {}", share_title(year), hashtag(year));
    format!(
        "https://twitter.com/intent/tweet?text={}",
        encode_uri_component(&text)
    )
}

/// `<product>-wrapped-<year>-<timestamp>.png`, timestamp in unix milliseconds.
pub fn download_filename(year: i32, timestamp_ms: i64) -> String {
    format!(
        "{}-wrapped-{year}-{timestamp_ms}.png",
        PRODUCT_NAME.to_lowercase()
    )
}

/// Percent-encode everything outside the URI unreserved set (plus `!~*'()`).
pub fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
