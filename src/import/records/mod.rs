//! Raw dump records and their extraction into relational rows.
//!
//! One serde struct per dump record shape, mirroring the XML exactly.
//! Extraction methods are pure functions of a record plus a reference
//! cache snapshot: relations pointing at ids the cache has never seen are
//! dropped here, silently, rather than rejected by the store later.

pub mod artist;
pub mod label;
pub mod master;
pub mod release;

use serde::Deserialize;

/// The fixed 32-bit content hash for free-text row identity, widened to
/// the 64-bit column type.
pub(crate) fn content_hash(text: &str) -> i64 {
    crc32fast::hash(text.as_bytes()) as i64
}

/// Trailing path segment of a resource URL.
pub(crate) fn last_uri_segment(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Trimmed text, or nothing when empty.
pub(crate) fn clean(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// `<name id="..">Display Name</name>` reference, as used by aliases,
/// groups and parent labels.
#[derive(Debug, Deserialize)]
pub struct RawRef {
    #[serde(rename = "@id", default)]
    pub id: i32,
    #[serde(rename = "$text", default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UrlList {
    #[serde(default)]
    pub url: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NameList {
    #[serde(default)]
    pub name: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefList {
    #[serde(default)]
    pub name: Vec<RawRef>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StyleList {
    #[serde(default)]
    pub style: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genre: Vec<String>,
}

/// `<artists><artist><id>n</id>..</artist></artists>`; only the id is
/// meaningful here, the rest of the inline artist is display data.
#[derive(Debug, Default, Deserialize)]
pub struct ArtistIdList {
    #[serde(default)]
    pub artist: Vec<ArtistIdRef>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistIdRef {
    #[serde(default)]
    pub id: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideoList {
    #[serde(default)]
    pub video: Vec<RawVideo>,
}

/// `<video src=".."><title/><description/></video>`
#[derive(Debug, Deserialize)]
pub struct RawVideo {
    #[serde(rename = "@src", default)]
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
}
