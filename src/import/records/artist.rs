use serde::Deserialize;

use super::{clean, content_hash, NameList, RefList, UrlList};
use crate::db::models::{Artist, ArtistAlias, ArtistGroup, ArtistNameVariation, ArtistUrl};
use crate::refcache::RefCache;

/// One `<artist>` element, primary fields only.
#[derive(Debug, Deserialize)]
pub struct RawArtist {
    pub id: i32,
    pub name: Option<String>,
    #[serde(rename = "realname")]
    pub real_name: Option<String>,
    pub profile: Option<String>,
    pub data_quality: Option<String>,
}

impl RawArtist {
    pub fn into_artist(self) -> Artist {
        Artist {
            id: self.id,
            name: self.name,
            real_name: self.real_name,
            profile: self.profile,
            data_quality: self.data_quality,
        }
    }
}

/// One `<artist>` element, relation fields only; decoded on the second
/// pass over the dump.
#[derive(Debug, Deserialize)]
pub struct RawArtistRelation {
    pub id: i32,
    #[serde(default)]
    pub urls: UrlList,
    #[serde(rename = "namevariations", default)]
    pub name_variations: NameList,
    #[serde(default)]
    pub aliases: RefList,
    #[serde(default)]
    pub groups: RefList,
}

impl RawArtistRelation {
    pub fn urls(&self) -> Vec<ArtistUrl> {
        self.urls
            .url
            .iter()
            .filter_map(|url| clean(url))
            .map(|url| ArtistUrl {
                artist_id: self.id,
                url_hash: content_hash(url),
                url: url.to_string(),
            })
            .collect()
    }

    pub fn name_variations(&self) -> Vec<ArtistNameVariation> {
        self.name_variations
            .name
            .iter()
            .filter_map(|name| clean(name))
            .map(|name| ArtistNameVariation {
                artist_id: self.id,
                name_variation_hash: content_hash(name),
                name_variation: name.to_string(),
            })
            .collect()
    }

    /// Kept only when the alias target is a known artist id.
    pub fn aliases(&self, cache: &RefCache) -> Vec<ArtistAlias> {
        self.aliases
            .name
            .iter()
            .filter(|alias| cache.artists.contains(alias.id))
            .map(|alias| ArtistAlias {
                artist_id: self.id,
                alias_id: alias.id,
            })
            .collect()
    }

    /// Kept only when the group is a known artist id.
    pub fn groups(&self, cache: &RefCache) -> Vec<ArtistGroup> {
        self.groups
            .name
            .iter()
            .filter(|group| cache.artists.contains(group.id))
            .map(|group| ArtistGroup {
                artist_id: self.id,
                group_id: group.id,
            })
            .collect()
    }
}
