use serde::Deserialize;

use super::{clean, content_hash, ArtistIdList, GenreList, StyleList, VideoList};
use crate::db::models::{Master, MasterArtist, MasterGenre, MasterStyle, MasterVideo};
use crate::refcache::RefCache;

/// One `<master>` element, primary fields only. The id is an attribute
/// here, unlike artists and labels.
#[derive(Debug, Deserialize)]
pub struct RawMaster {
    #[serde(rename = "@id")]
    pub id: i32,
    pub title: Option<String>,
    pub data_quality: Option<String>,
    pub year: Option<i16>,
}

impl RawMaster {
    pub fn into_master(self) -> Master {
        Master {
            id: self.id,
            title: self.title,
            data_quality: self.data_quality,
            released_year: self.year,
        }
    }
}

/// Style and genre names only; used by the whole-file pre-scan that runs
/// before masters are inserted.
#[derive(Debug, Deserialize)]
pub struct RawGenreStyle {
    #[serde(default)]
    pub styles: StyleList,
    #[serde(default)]
    pub genres: GenreList,
}

impl RawGenreStyle {
    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.style.iter().filter_map(|name| clean(name))
    }

    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres.genre.iter().filter_map(|name| clean(name))
    }
}

/// One `<master>` element, relation fields only.
#[derive(Debug, Deserialize)]
pub struct RawMasterRelation {
    #[serde(rename = "@id")]
    pub id: i32,
    #[serde(default)]
    pub styles: StyleList,
    #[serde(default)]
    pub genres: GenreList,
    #[serde(default)]
    pub artists: ArtistIdList,
    #[serde(default)]
    pub videos: VideoList,
}

impl RawMasterRelation {
    /// Carries the cache-resolved style id, not the name; unresolved
    /// names are dropped.
    pub fn styles(&self, cache: &RefCache) -> Vec<MasterStyle> {
        self.styles
            .style
            .iter()
            .filter_map(|name| clean(name))
            .filter_map(|name| cache.styles.lookup(name))
            .map(|style_id| MasterStyle {
                master_id: self.id,
                style_id,
            })
            .collect()
    }

    pub fn genres(&self, cache: &RefCache) -> Vec<MasterGenre> {
        self.genres
            .genre
            .iter()
            .filter_map(|name| clean(name))
            .filter_map(|name| cache.genres.lookup(name))
            .map(|genre_id| MasterGenre {
                master_id: self.id,
                genre_id,
            })
            .collect()
    }

    pub fn videos(&self) -> Vec<MasterVideo> {
        self.videos
            .video
            .iter()
            .filter_map(|video| clean(&video.url).map(|url| (url, video)))
            .map(|(url, video)| MasterVideo {
                master_id: self.id,
                url_hash: content_hash(url),
                url: url.to_string(),
                title: video.title.clone(),
                description: video.description.clone(),
            })
            .collect()
    }

    pub fn artists(&self, cache: &RefCache) -> Vec<MasterArtist> {
        self.artists
            .artist
            .iter()
            .filter(|artist| cache.artists.contains(artist.id))
            .map(|artist| MasterArtist {
                master_id: self.id,
                artist_id: artist.id,
            })
            .collect()
    }
}
