use serde::Deserialize;

use super::{clean, content_hash, last_uri_segment, ArtistIdList, GenreList, StyleList, VideoList};
use crate::dateparser::parse_ymd;
use crate::db::models::{
    LabelRelease, MasterMainRelease, Release, ReleaseArtist, ReleaseContract,
    ReleaseCreditedArtist, ReleaseFormat, ReleaseGenre, ReleaseIdentifier, ReleaseStyle,
    ReleaseTrack, ReleaseVideo,
};
use crate::refcache::RefCache;

/// `<master_id is_main_release="..">id</master_id>`
#[derive(Debug, Deserialize)]
pub struct RawMasterId {
    #[serde(rename = "@is_main_release", default)]
    pub is_main_release: bool,
    #[serde(rename = "$text", default)]
    pub id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LabelRefList {
    #[serde(default)]
    pub label: Vec<RawLabelRef>,
}

#[derive(Debug, Deserialize)]
pub struct RawLabelRef {
    #[serde(rename = "@id", default)]
    pub id: i32,
    #[serde(rename = "@catno")]
    pub catno: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreditList {
    #[serde(default)]
    pub artist: Vec<RawCreditedArtist>,
}

#[derive(Debug, Deserialize)]
pub struct RawCreditedArtist {
    #[serde(default)]
    pub id: i32,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormatList {
    #[serde(default)]
    pub format: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
pub struct RawFormat {
    #[serde(rename = "@name")]
    pub name: Option<String>,
    #[serde(rename = "@qty")]
    pub quantity: Option<i32>,
    #[serde(rename = "@text")]
    pub text: Option<String>,
    #[serde(default)]
    pub descriptions: DescriptionList,
}

#[derive(Debug, Default, Deserialize)]
pub struct DescriptionList {
    #[serde(default)]
    pub description: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackList {
    #[serde(default)]
    pub track: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
pub struct RawTrack {
    pub position: Option<String>,
    pub title: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdentifierList {
    #[serde(default)]
    pub identifier: Vec<RawIdentifier>,
}

#[derive(Debug, Deserialize)]
pub struct RawIdentifier {
    #[serde(rename = "@type")]
    pub kind: Option<String>,
    #[serde(rename = "@description")]
    pub description: Option<String>,
    #[serde(rename = "@value")]
    pub value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContractList {
    #[serde(default)]
    pub company: Vec<RawContract>,
}

#[derive(Debug, Deserialize)]
pub struct RawContract {
    pub resource_url: Option<String>,
    pub entity_type_name: Option<String>,
}

/// One `<release>` element. Releases are ingested in a single pass, so
/// primary fields and relations live on the same record.
#[derive(Debug, Deserialize)]
pub struct RawRelease {
    #[serde(rename = "@id")]
    pub id: i32,
    #[serde(rename = "@status")]
    pub status: Option<String>,
    pub title: Option<String>,
    pub country: Option<String>,
    pub data_quality: Option<String>,
    pub released: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "master_id")]
    pub master: Option<RawMasterId>,
    #[serde(default)]
    pub artists: ArtistIdList,
    #[serde(default)]
    pub labels: LabelRefList,
    #[serde(rename = "extraartists", default)]
    pub credited_artists: CreditList,
    #[serde(default)]
    pub formats: FormatList,
    #[serde(default)]
    pub genres: GenreList,
    #[serde(default)]
    pub styles: StyleList,
    #[serde(rename = "tracklist", default)]
    pub tracks: TrackList,
    #[serde(default)]
    pub identifiers: IdentifierList,
    #[serde(default)]
    pub videos: VideoList,
    #[serde(rename = "companies", default)]
    pub contracts: ContractList,
}

impl RawRelease {
    /// The release row itself. The listed date is decomposed into
    /// independently-present year/month/day; the master link is kept only
    /// when the master is known to this run.
    pub fn release(&self, cache: &RefCache) -> Release {
        let (year, month, day) = self
            .released
            .as_deref()
            .map(parse_ymd)
            .unwrap_or((None, None, None));
        let master_id = self
            .master
            .as_ref()
            .and_then(|master| master.id)
            .filter(|id| cache.masters.contains(*id));
        Release {
            id: self.id,
            title: self.title.clone(),
            country: self.country.clone(),
            data_quality: self.data_quality.clone(),
            released_year: year,
            released_month: month,
            released_day: day,
            listed_release_date: self.released.clone(),
            is_master: self
                .master
                .as_ref()
                .map(|master| master.is_main_release)
                .unwrap_or(false),
            master_id,
            notes: self.notes.clone(),
            status: self.status.clone(),
        }
    }

    /// A main release backfills its master's `main_release_id`.
    pub fn main_release(&self, cache: &RefCache) -> Option<MasterMainRelease> {
        let master = self.master.as_ref()?;
        if !master.is_main_release {
            return None;
        }
        let id = master.id?;
        cache.masters.contains(id).then(|| MasterMainRelease {
            id,
            main_release_id: self.id,
        })
    }

    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.style.iter().filter_map(|name| clean(name))
    }

    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.genres.genre.iter().filter_map(|name| clean(name))
    }

    pub fn artists(&self, cache: &RefCache) -> Vec<ReleaseArtist> {
        self.artists
            .artist
            .iter()
            .filter(|artist| cache.artists.contains(artist.id))
            .map(|artist| ReleaseArtist {
                release_id: self.id,
                artist_id: artist.id,
            })
            .collect()
    }

    /// Comma-separated sub-roles are individually trimmed and rejoined
    /// before hashing, so `"Producer, Mixer"` and `"Producer,Mixer"`
    /// identify the same credit.
    pub fn credited_artists(&self, cache: &RefCache) -> Vec<ReleaseCreditedArtist> {
        self.credited_artists
            .artist
            .iter()
            .filter(|credit| cache.artists.contains(credit.id))
            .filter_map(|credit| {
                let role = credit.role.as_deref().and_then(clean)?;
                let role = normalize_role(role);
                Some(ReleaseCreditedArtist {
                    release_id: self.id,
                    artist_id: credit.id,
                    role_hash: content_hash(&role),
                    role: Some(role),
                })
            })
            .collect()
    }

    /// The company's label id is the trailing path segment of its
    /// resource URL; unparseable or unknown label ids drop the row.
    pub fn contracts(&self, cache: &RefCache) -> Vec<ReleaseContract> {
        self.contracts
            .company
            .iter()
            .filter_map(|company| {
                let url = company.resource_url.as_deref()?;
                let label_id: i32 = last_uri_segment(url.trim()).parse().ok()?;
                if !cache.labels.contains(label_id) {
                    return None;
                }
                let contract = company.entity_type_name.clone().unwrap_or_default();
                Some(ReleaseContract {
                    release_id: self.id,
                    label_id,
                    contract_hash: content_hash(&contract),
                    contract,
                })
            })
            .collect()
    }

    pub fn labels(&self, cache: &RefCache) -> Vec<LabelRelease> {
        self.labels
            .label
            .iter()
            .filter(|label| cache.labels.contains(label.id))
            .map(|label| LabelRelease {
                label_id: label.id,
                release_id: self.id,
                category_notation: label.catno.clone(),
            })
            .collect()
    }

    pub fn formats(&self) -> Vec<ReleaseFormat> {
        self.formats
            .format
            .iter()
            .map(|format| {
                let description = format.descriptions.description.join(",");
                let mut hash_source = description.clone();
                if let Some(name) = &format.name {
                    hash_source.push_str(name);
                }
                if let Some(quantity) = format.quantity {
                    hash_source.push_str(&quantity.to_string());
                }
                if let Some(text) = &format.text {
                    hash_source.push_str(text);
                }
                ReleaseFormat {
                    release_id: self.id,
                    format_hash: content_hash(&hash_source),
                    name: format.name.clone(),
                    quantity: format.quantity,
                    text: format.text.clone(),
                    description: Some(description),
                }
            })
            .collect()
    }

    /// Identifier identity hashes description, type and value together.
    pub fn identifiers(&self) -> Vec<ReleaseIdentifier> {
        self.identifiers
            .identifier
            .iter()
            .map(|identifier| {
                let hash_source = format!(
                    "{}{}{}",
                    identifier.description.as_deref().unwrap_or(""),
                    identifier.kind.as_deref().unwrap_or(""),
                    identifier.value.as_deref().unwrap_or("")
                );
                ReleaseIdentifier {
                    release_id: self.id,
                    identifier_hash: content_hash(&hash_source),
                    kind: identifier.kind.clone(),
                    description: identifier.description.clone(),
                    value: identifier.value.clone(),
                }
            })
            .collect()
    }

    pub fn tracks(&self) -> Vec<ReleaseTrack> {
        self.tracks
            .track
            .iter()
            .map(|track| ReleaseTrack {
                release_id: self.id,
                title_hash: content_hash(track.title.as_deref().unwrap_or("")),
                title: track.title.clone(),
                position: track.position.clone(),
                duration: track.duration.clone(),
            })
            .collect()
    }

    pub fn videos(&self) -> Vec<ReleaseVideo> {
        self.videos
            .video
            .iter()
            .filter_map(|video| clean(&video.url).map(|url| (url, video)))
            .map(|(url, video)| ReleaseVideo {
                release_id: self.id,
                url_hash: content_hash(url),
                url: url.to_string(),
                title: video.title.clone(),
                description: video.description.clone(),
            })
            .collect()
    }

    pub fn styles(&self, cache: &RefCache) -> Vec<ReleaseStyle> {
        self.style_names()
            .filter_map(|name| cache.styles.lookup(name))
            .map(|style_id| ReleaseStyle {
                release_id: self.id,
                style_id,
            })
            .collect()
    }

    pub fn genres(&self, cache: &RefCache) -> Vec<ReleaseGenre> {
        self.genre_names()
            .filter_map(|name| cache.genres.lookup(name))
            .map(|genre_id| ReleaseGenre {
                release_id: self.id,
                genre_id,
            })
            .collect()
    }
}

fn normalize_role(role: &str) -> String {
    role.split(',')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(",")
}
