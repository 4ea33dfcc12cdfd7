//! Row types for the four-entity domain and its satellite relations.
//!
//! Primary entities (artist, label, master, release) are keyed by their
//! external Discogs id and refresh an allow-listed set of mutable columns
//! on re-import. Relation rows are keyed by the referencing id(s) plus,
//! for free-text content, a 32-bit content hash widened to the 64-bit
//! column type; re-inserting them is a silent no-op.

use sqlx::query_builder::Separated;
use sqlx::Sqlite;

use super::conflict::Conflict;
use super::Entity;
use crate::dedup::Identity;

// --------------------------------------------------------------------------
// Artists
// --------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub id: i32,
    pub name: Option<String>,
    pub real_name: Option<String>,
    pub profile: Option<String>,
    pub data_quality: Option<String>,
}

impl Entity for Artist {
    const TABLE: &'static str = "artist";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "real_name", "profile", "data_quality"];
    const CONFLICT: Conflict =
        Conflict::update_on_id(&["name", "real_name", "profile", "data_quality"]);

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.real_name.clone())
            .push_bind(self.profile.clone())
            .push_bind(self.data_quality.clone());
    }
}

impl Identity for Artist {
    type Key = i32;

    fn identity(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistUrl {
    pub artist_id: i32,
    pub url_hash: i64,
    pub url: String,
}

impl Entity for ArtistUrl {
    const TABLE: &'static str = "artist_url";
    const COLUMNS: &'static [&'static str] = &["artist_id", "url_hash", "url"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.artist_id)
            .push_bind(self.url_hash)
            .push_bind(self.url.clone());
    }
}

impl Identity for ArtistUrl {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.artist_id, self.url_hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistNameVariation {
    pub artist_id: i32,
    pub name_variation_hash: i64,
    pub name_variation: String,
}

impl Entity for ArtistNameVariation {
    const TABLE: &'static str = "artist_name_variation";
    const COLUMNS: &'static [&'static str] =
        &["artist_id", "name_variation_hash", "name_variation"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.artist_id)
            .push_bind(self.name_variation_hash)
            .push_bind(self.name_variation.clone());
    }
}

impl Identity for ArtistNameVariation {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.artist_id, self.name_variation_hash)
    }
}

/// Artist-to-artist alias link; only written when the alias target exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistAlias {
    pub artist_id: i32,
    pub alias_id: i32,
}

impl Entity for ArtistAlias {
    const TABLE: &'static str = "artist_alias";
    const COLUMNS: &'static [&'static str] = &["artist_id", "alias_id"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.artist_id).push_bind(self.alias_id);
    }
}

impl Identity for ArtistAlias {
    type Key = (i32, i32);

    fn identity(&self) -> (i32, i32) {
        (self.artist_id, self.alias_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistGroup {
    pub artist_id: i32,
    pub group_id: i32,
}

impl Entity for ArtistGroup {
    const TABLE: &'static str = "artist_group";
    const COLUMNS: &'static [&'static str] = &["artist_id", "group_id"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.artist_id).push_bind(self.group_id);
    }
}

impl Identity for ArtistGroup {
    type Key = (i32, i32);

    fn identity(&self) -> (i32, i32) {
        (self.artist_id, self.group_id)
    }
}

// --------------------------------------------------------------------------
// Labels
// --------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub id: i32,
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub profile: Option<String>,
    pub data_quality: Option<String>,
}

impl Entity for Label {
    const TABLE: &'static str = "label";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "contact_info", "profile", "data_quality"];
    const CONFLICT: Conflict =
        Conflict::update_on_id(&["name", "contact_info", "profile", "data_quality"]);

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.contact_info.clone())
            .push_bind(self.profile.clone())
            .push_bind(self.data_quality.clone());
    }
}

impl Identity for Label {
    type Key = i32;

    fn identity(&self) -> i32 {
        self.id
    }
}

/// Backfills `parent_id` onto an already-inserted label row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelParent {
    pub id: i32,
    pub parent_id: i32,
}

impl Entity for LabelParent {
    const TABLE: &'static str = "label";
    const COLUMNS: &'static [&'static str] = &["id", "parent_id"];
    const CONFLICT: Conflict = Conflict::Update {
        key: &["id"],
        set: &["parent_id"],
    };

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.id).push_bind(self.parent_id);
    }
}

impl Identity for LabelParent {
    type Key = i32;

    fn identity(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelUrl {
    pub label_id: i32,
    pub url_hash: i64,
    pub url: String,
}

impl Entity for LabelUrl {
    const TABLE: &'static str = "label_url";
    const COLUMNS: &'static [&'static str] = &["label_id", "url_hash", "url"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.label_id)
            .push_bind(self.url_hash)
            .push_bind(self.url.clone());
    }
}

impl Identity for LabelUrl {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.label_id, self.url_hash)
    }
}

/// Label-release link with the label's catalog notation for the release.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRelease {
    pub label_id: i32,
    pub release_id: i32,
    pub category_notation: Option<String>,
}

impl Entity for LabelRelease {
    const TABLE: &'static str = "label_release";
    const COLUMNS: &'static [&'static str] = &["label_id", "release_id", "category_notation"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.label_id)
            .push_bind(self.release_id)
            .push_bind(self.category_notation.clone());
    }
}

impl Identity for LabelRelease {
    type Key = (i32, i32);

    fn identity(&self) -> (i32, i32) {
        (self.label_id, self.release_id)
    }
}

// --------------------------------------------------------------------------
// Masters
// --------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Master {
    pub id: i32,
    pub title: Option<String>,
    pub data_quality: Option<String>,
    pub released_year: Option<i16>,
}

impl Entity for Master {
    const TABLE: &'static str = "master";
    const COLUMNS: &'static [&'static str] = &["id", "title", "data_quality", "released_year"];
    const CONFLICT: Conflict = Conflict::update_on_id(&["title", "data_quality", "released_year"]);

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.title.clone())
            .push_bind(self.data_quality.clone())
            .push_bind(self.released_year);
    }
}

impl Identity for Master {
    type Key = i32;

    fn identity(&self) -> i32 {
        self.id
    }
}

/// Backfills `main_release_id` onto an already-inserted master row, from
/// the release flagged as its main release.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterMainRelease {
    pub id: i32,
    pub main_release_id: i32,
}

impl Entity for MasterMainRelease {
    const TABLE: &'static str = "master";
    const COLUMNS: &'static [&'static str] = &["id", "main_release_id"];
    const CONFLICT: Conflict = Conflict::Update {
        key: &["id"],
        set: &["main_release_id"],
    };

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.id).push_bind(self.main_release_id);
    }
}

impl Identity for MasterMainRelease {
    type Key = i32;

    fn identity(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasterArtist {
    pub master_id: i32,
    pub artist_id: i32,
}

impl Entity for MasterArtist {
    const TABLE: &'static str = "master_artist";
    const COLUMNS: &'static [&'static str] = &["master_id", "artist_id"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.master_id).push_bind(self.artist_id);
    }
}

impl Identity for MasterArtist {
    type Key = (i32, i32);

    fn identity(&self) -> (i32, i32) {
        (self.master_id, self.artist_id)
    }
}

/// Carries the cache-resolved style id, never the name.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterStyle {
    pub master_id: i32,
    pub style_id: i64,
}

impl Entity for MasterStyle {
    const TABLE: &'static str = "master_style";
    const COLUMNS: &'static [&'static str] = &["master_id", "style_id"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.master_id).push_bind(self.style_id);
    }
}

impl Identity for MasterStyle {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.master_id, self.style_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasterGenre {
    pub master_id: i32,
    pub genre_id: i64,
}

impl Entity for MasterGenre {
    const TABLE: &'static str = "master_genre";
    const COLUMNS: &'static [&'static str] = &["master_id", "genre_id"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.master_id).push_bind(self.genre_id);
    }
}

impl Identity for MasterGenre {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.master_id, self.genre_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasterVideo {
    pub master_id: i32,
    pub url_hash: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Entity for MasterVideo {
    const TABLE: &'static str = "master_video";
    const COLUMNS: &'static [&'static str] =
        &["master_id", "url_hash", "url", "title", "description"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.master_id)
            .push_bind(self.url_hash)
            .push_bind(self.url.clone())
            .push_bind(self.title.clone())
            .push_bind(self.description.clone());
    }
}

impl Identity for MasterVideo {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.master_id, self.url_hash)
    }
}

// --------------------------------------------------------------------------
// Styles and genres
// --------------------------------------------------------------------------

/// Style name; the surrogate id is assigned by the store on first insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub name: String,
}

impl Entity for Style {
    const TABLE: &'static str = "style";
    const COLUMNS: &'static [&'static str] = &["name"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.name.clone());
    }
}

impl Identity for Style {
    type Key = String;

    fn identity(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub name: String,
}

impl Entity for Genre {
    const TABLE: &'static str = "genre";
    const COLUMNS: &'static [&'static str] = &["name"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.name.clone());
    }
}

impl Identity for Genre {
    type Key = String;

    fn identity(&self) -> String {
        self.name.clone()
    }
}

// --------------------------------------------------------------------------
// Releases
// --------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub id: i32,
    pub title: Option<String>,
    pub country: Option<String>,
    pub data_quality: Option<String>,
    pub released_year: Option<i16>,
    pub released_month: Option<i16>,
    pub released_day: Option<i16>,
    /// The date string exactly as listed in the dump.
    pub listed_release_date: Option<String>,
    pub is_master: bool,
    /// Only set when the master is known to this run.
    pub master_id: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

impl Entity for Release {
    const TABLE: &'static str = "release";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "country",
        "data_quality",
        "released_year",
        "released_month",
        "released_day",
        "listed_release_date",
        "is_master",
        "master_id",
        "notes",
        "status",
    ];
    const CONFLICT: Conflict = Conflict::update_on_id(&[
        "title",
        "country",
        "data_quality",
        "released_year",
        "released_month",
        "released_day",
        "listed_release_date",
        "is_master",
        "master_id",
        "notes",
        "status",
    ]);

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.id)
            .push_bind(self.title.clone())
            .push_bind(self.country.clone())
            .push_bind(self.data_quality.clone())
            .push_bind(self.released_year)
            .push_bind(self.released_month)
            .push_bind(self.released_day)
            .push_bind(self.listed_release_date.clone())
            .push_bind(self.is_master)
            .push_bind(self.master_id)
            .push_bind(self.notes.clone())
            .push_bind(self.status.clone());
    }
}

impl Identity for Release {
    type Key = i32;

    fn identity(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArtist {
    pub release_id: i32,
    pub artist_id: i32,
}

impl Entity for ReleaseArtist {
    const TABLE: &'static str = "release_artist";
    const COLUMNS: &'static [&'static str] = &["release_id", "artist_id"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id).push_bind(self.artist_id);
    }
}

impl Identity for ReleaseArtist {
    type Key = (i32, i32);

    fn identity(&self) -> (i32, i32) {
        (self.release_id, self.artist_id)
    }
}

/// A credit with its normalized role text; the same artist may appear
/// under several distinct roles.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseCreditedArtist {
    pub release_id: i32,
    pub artist_id: i32,
    pub role_hash: i64,
    pub role: Option<String>,
}

impl Entity for ReleaseCreditedArtist {
    const TABLE: &'static str = "release_credited_artist";
    const COLUMNS: &'static [&'static str] = &["release_id", "artist_id", "role_hash", "role"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id)
            .push_bind(self.artist_id)
            .push_bind(self.role_hash)
            .push_bind(self.role.clone());
    }
}

impl Identity for ReleaseCreditedArtist {
    type Key = (i32, i32, i64);

    fn identity(&self) -> (i32, i32, i64) {
        (self.release_id, self.artist_id, self.role_hash)
    }
}

/// Company/contract row; the label id comes from the trailing segment of
/// the company's resource URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseContract {
    pub release_id: i32,
    pub label_id: i32,
    pub contract_hash: i64,
    pub contract: String,
}

impl Entity for ReleaseContract {
    const TABLE: &'static str = "release_contract";
    const COLUMNS: &'static [&'static str] =
        &["release_id", "label_id", "contract_hash", "contract"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id)
            .push_bind(self.label_id)
            .push_bind(self.contract_hash)
            .push_bind(self.contract.clone());
    }
}

impl Identity for ReleaseContract {
    type Key = (i32, i32, i64);

    fn identity(&self) -> (i32, i32, i64) {
        (self.release_id, self.label_id, self.contract_hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseFormat {
    pub release_id: i32,
    pub format_hash: i64,
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub text: Option<String>,
    pub description: Option<String>,
}

impl Entity for ReleaseFormat {
    const TABLE: &'static str = "release_format";
    const COLUMNS: &'static [&'static str] = &[
        "release_id",
        "format_hash",
        "name",
        "quantity",
        "text",
        "description",
    ];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id)
            .push_bind(self.format_hash)
            .push_bind(self.name.clone())
            .push_bind(self.quantity)
            .push_bind(self.text.clone())
            .push_bind(self.description.clone());
    }
}

impl Identity for ReleaseFormat {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.release_id, self.format_hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseIdentifier {
    pub release_id: i32,
    pub identifier_hash: i64,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub value: Option<String>,
}

impl Entity for ReleaseIdentifier {
    const TABLE: &'static str = "release_identifier";
    const COLUMNS: &'static [&'static str] = &[
        "release_id",
        "identifier_hash",
        "type",
        "description",
        "value",
    ];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id)
            .push_bind(self.identifier_hash)
            .push_bind(self.kind.clone())
            .push_bind(self.description.clone())
            .push_bind(self.value.clone());
    }
}

impl Identity for ReleaseIdentifier {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.release_id, self.identifier_hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseTrack {
    pub release_id: i32,
    pub title_hash: i64,
    pub title: Option<String>,
    pub position: Option<String>,
    pub duration: Option<String>,
}

impl Entity for ReleaseTrack {
    const TABLE: &'static str = "release_track";
    const COLUMNS: &'static [&'static str] =
        &["release_id", "title_hash", "title", "position", "duration"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id)
            .push_bind(self.title_hash)
            .push_bind(self.title.clone())
            .push_bind(self.position.clone())
            .push_bind(self.duration.clone());
    }
}

impl Identity for ReleaseTrack {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.release_id, self.title_hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseVideo {
    pub release_id: i32,
    pub url_hash: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Entity for ReleaseVideo {
    const TABLE: &'static str = "release_video";
    const COLUMNS: &'static [&'static str] =
        &["release_id", "url_hash", "url", "title", "description"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id)
            .push_bind(self.url_hash)
            .push_bind(self.url.clone())
            .push_bind(self.title.clone())
            .push_bind(self.description.clone());
    }
}

impl Identity for ReleaseVideo {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.release_id, self.url_hash)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseStyle {
    pub release_id: i32,
    pub style_id: i64,
}

impl Entity for ReleaseStyle {
    const TABLE: &'static str = "release_style";
    const COLUMNS: &'static [&'static str] = &["release_id", "style_id"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id).push_bind(self.style_id);
    }
}

impl Identity for ReleaseStyle {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.release_id, self.style_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseGenre {
    pub release_id: i32,
    pub genre_id: i64,
}

impl Entity for ReleaseGenre {
    const TABLE: &'static str = "release_genre";
    const COLUMNS: &'static [&'static str] = &["release_id", "genre_id"];
    const CONFLICT: Conflict = Conflict::DoNothing;

    fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
        row.push_bind(self.release_id).push_bind(self.genre_id);
    }
}

impl Identity for ReleaseGenre {
    type Key = (i32, i64);

    fn identity(&self) -> (i32, i64) {
        (self.release_id, self.genre_id)
    }
}
