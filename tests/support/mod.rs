// Shared helpers for integration tests: schema setup, fixture dumps, and
// small query shortcuts. Schema management is the embedding application's
// job in production, so the test suite owns its own copy here.

use flate2::write::GzEncoder;
use flate2::Compression;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::Row;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use wax::db::Database;

static TRACING: Once = Once::new();

/// Route step logs through the env filter once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

const SCHEMA: &str = r#"
CREATE TABLE artist (
    id INTEGER PRIMARY KEY,
    name TEXT,
    real_name TEXT,
    profile TEXT,
    data_quality TEXT
);
CREATE TABLE artist_url (
    artist_id INTEGER NOT NULL,
    url_hash INTEGER NOT NULL,
    url TEXT NOT NULL,
    PRIMARY KEY (artist_id, url_hash)
);
CREATE TABLE artist_name_variation (
    artist_id INTEGER NOT NULL,
    name_variation_hash INTEGER NOT NULL,
    name_variation TEXT NOT NULL,
    PRIMARY KEY (artist_id, name_variation_hash)
);
CREATE TABLE artist_alias (
    artist_id INTEGER NOT NULL,
    alias_id INTEGER NOT NULL,
    PRIMARY KEY (artist_id, alias_id)
);
CREATE TABLE artist_group (
    artist_id INTEGER NOT NULL,
    group_id INTEGER NOT NULL,
    PRIMARY KEY (artist_id, group_id)
);
CREATE TABLE label (
    id INTEGER PRIMARY KEY,
    name TEXT,
    contact_info TEXT,
    profile TEXT,
    data_quality TEXT,
    parent_id INTEGER
);
CREATE TABLE label_url (
    label_id INTEGER NOT NULL,
    url_hash INTEGER NOT NULL,
    url TEXT NOT NULL,
    PRIMARY KEY (label_id, url_hash)
);
CREATE TABLE label_release (
    label_id INTEGER NOT NULL,
    release_id INTEGER NOT NULL,
    category_notation TEXT,
    PRIMARY KEY (label_id, release_id)
);
CREATE TABLE master (
    id INTEGER PRIMARY KEY,
    title TEXT,
    data_quality TEXT,
    released_year INTEGER,
    main_release_id INTEGER
);
CREATE TABLE master_artist (
    master_id INTEGER NOT NULL,
    artist_id INTEGER NOT NULL,
    PRIMARY KEY (master_id, artist_id)
);
CREATE TABLE master_style (
    master_id INTEGER NOT NULL,
    style_id INTEGER NOT NULL,
    PRIMARY KEY (master_id, style_id)
);
CREATE TABLE master_genre (
    master_id INTEGER NOT NULL,
    genre_id INTEGER NOT NULL,
    PRIMARY KEY (master_id, genre_id)
);
CREATE TABLE master_video (
    master_id INTEGER NOT NULL,
    url_hash INTEGER NOT NULL,
    url TEXT NOT NULL,
    title TEXT,
    description TEXT,
    PRIMARY KEY (master_id, url_hash)
);
CREATE TABLE style (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE genre (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);
CREATE TABLE "release" (
    id INTEGER PRIMARY KEY,
    title TEXT,
    country TEXT,
    data_quality TEXT,
    released_year INTEGER,
    released_month INTEGER,
    released_day INTEGER,
    listed_release_date TEXT,
    is_master INTEGER NOT NULL DEFAULT 0,
    master_id INTEGER,
    notes TEXT,
    status TEXT
);
CREATE TABLE release_artist (
    release_id INTEGER NOT NULL,
    artist_id INTEGER NOT NULL,
    PRIMARY KEY (release_id, artist_id)
);
CREATE TABLE release_credited_artist (
    release_id INTEGER NOT NULL,
    artist_id INTEGER NOT NULL,
    role_hash INTEGER NOT NULL,
    role TEXT,
    PRIMARY KEY (release_id, artist_id, role_hash)
);
CREATE TABLE release_contract (
    release_id INTEGER NOT NULL,
    label_id INTEGER NOT NULL,
    contract_hash INTEGER NOT NULL,
    contract TEXT NOT NULL,
    PRIMARY KEY (release_id, label_id, contract_hash)
);
CREATE TABLE release_format (
    release_id INTEGER NOT NULL,
    format_hash INTEGER NOT NULL,
    name TEXT,
    quantity INTEGER,
    text TEXT,
    description TEXT,
    PRIMARY KEY (release_id, format_hash)
);
CREATE TABLE release_identifier (
    release_id INTEGER NOT NULL,
    identifier_hash INTEGER NOT NULL,
    type TEXT,
    description TEXT,
    value TEXT,
    PRIMARY KEY (release_id, identifier_hash)
);
CREATE TABLE release_track (
    release_id INTEGER NOT NULL,
    title_hash INTEGER NOT NULL,
    title TEXT,
    position TEXT,
    duration TEXT,
    PRIMARY KEY (release_id, title_hash)
);
CREATE TABLE release_video (
    release_id INTEGER NOT NULL,
    url_hash INTEGER NOT NULL,
    url TEXT NOT NULL,
    title TEXT,
    description TEXT,
    PRIMARY KEY (release_id, url_hash)
);
CREATE TABLE release_style (
    release_id INTEGER NOT NULL,
    style_id INTEGER NOT NULL,
    PRIMARY KEY (release_id, style_id)
);
CREATE TABLE release_genre (
    release_id INTEGER NOT NULL,
    genre_id INTEGER NOT NULL,
    PRIMARY KEY (release_id, genre_id)
);
"#;

/// Open a file-backed database in `dir` and create the schema.
pub async fn open_database(dir: &Path) -> Database {
    init_tracing();
    let db_path = dir.join("wax.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect to sqlite");
    let db = Database::new(pool);
    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(db.pool())
            .await
            .expect("create schema");
    }
    db
}

/// Write a gzip-compressed fixture dump and return its path.
pub fn write_gz(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();
    path
}

/// Write a plain-XML fixture dump and return its path.
pub fn write_plain(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

pub async fn count(db: &Database, table: &str) -> i64 {
    sqlx::query(&format!("SELECT COUNT(*) AS n FROM \"{table}\""))
        .fetch_one(db.pool())
        .await
        .unwrap()
        .get("n")
}

pub async fn count_where(db: &Database, table: &str, clause: &str) -> i64 {
    sqlx::query(&format!("SELECT COUNT(*) AS n FROM \"{table}\" WHERE {clause}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
        .get("n")
}

pub const ARTISTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<artists>
  <artist>
    <id>1</id>
    <name>Aphex Twin</name>
    <realname>Richard D. James</realname>
    <profile>Cornish electronic musician.</profile>
    <data_quality>Correct</data_quality>
    <urls>
      <url>https://aphextwin.example</url>
      <url>  </url>
    </urls>
    <namevariations>
      <name>AFX</name>
      <name>AFX</name>
    </namevariations>
    <aliases>
      <name id="2">Polygon Window</name>
      <name id="99">Never Inserted</name>
    </aliases>
  </artist>
  <artist>
    <id>2</id>
    <name>Polygon Window</name>
    <data_quality>Correct</data_quality>
    <groups>
      <name id="1">Aphex Twin</name>
    </groups>
  </artist>
  <artist>
    <id>3</id>
    <name>Luke Vibert</name>
  </artist>
</artists>
"#;

pub const LABELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<labels>
  <label>
    <id>10</id>
    <name>Warp</name>
    <contactinfo>Sheffield</contactinfo>
    <data_quality>Correct</data_quality>
    <urls>
      <url>https://warp.example</url>
    </urls>
    <parentLabel id="999">Phantom Parent</parentLabel>
  </label>
  <label>
    <id>11</id>
    <name>Rephlex</name>
    <parentLabel id="10">Warp</parentLabel>
  </label>
</labels>
"#;

pub const MASTERS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<masters>
  <master id="100">
    <title>Selected Ambient Works 85-92</title>
    <year>1992</year>
    <data_quality>Correct</data_quality>
    <genres>
      <genre>Electronic</genre>
    </genres>
    <artists>
      <artist>
        <id>1</id>
        <name>Aphex Twin</name>
      </artist>
    </artists>
    <videos>
      <video src="https://videos.example/saw1">
        <title>SAW 85-92</title>
        <description>Full album</description>
      </video>
    </videos>
  </master>
  <master id="101">
    <title>Surfing on Sine Waves</title>
    <year>1993</year>
    <genres>
      <genre>Electronic</genre>
    </genres>
    <styles>
      <style>Ambient Techno</style>
    </styles>
    <artists>
      <artist>
        <id>2</id>
        <name>Polygon Window</name>
      </artist>
      <artist>
        <id>77</id>
        <name>Unknown Collaborator</name>
      </artist>
    </artists>
  </master>
</masters>
"#;

pub const RELEASES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<releases>
  <release id="1000" status="Accepted">
    <title>Selected Ambient Works 85-92</title>
    <country>UK</country>
    <released>1973-01</released>
    <notes>First pressing.</notes>
    <data_quality>Correct</data_quality>
    <master_id is_main_release="true">100</master_id>
    <artists>
      <artist>
        <id>1</id>
        <name>Aphex Twin</name>
      </artist>
    </artists>
    <labels>
      <label id="10" catno="AMB 3922"/>
      <label id="999" catno="GONE 1"/>
    </labels>
    <extraartists>
      <artist>
        <id>2</id>
        <role> Producer ,  Mixed By </role>
      </artist>
    </extraartists>
    <formats>
      <format name="Vinyl" qty="2" text="">
        <descriptions>
          <description>LP</description>
          <description>Album</description>
        </descriptions>
      </format>
    </formats>
    <genres>
      <genre>Electronic</genre>
    </genres>
    <styles>
      <style>Ambient</style>
    </styles>
    <tracklist>
      <track>
        <position>A1</position>
        <title>Xtal</title>
        <duration>4:51</duration>
      </track>
      <track>
        <position>A2</position>
        <title>Tha</title>
        <duration>9:01</duration>
      </track>
    </tracklist>
    <identifiers>
      <identifier type="Barcode" value="5021603054127"/>
    </identifiers>
    <videos>
      <video src="https://videos.example/xtal">
        <title>Xtal</title>
        <description>Track video</description>
      </video>
    </videos>
    <companies>
      <company>
        <id>10</id>
        <name>Warp</name>
        <entity_type_name>Published By</entity_type_name>
        <resource_url>https://api.example.com/labels/10</resource_url>
      </company>
      <company>
        <entity_type_name>Pressed By</entity_type_name>
        <resource_url>https://api.example.com/labels/notanumber</resource_url>
      </company>
    </companies>
  </release>
  <release id="1001" status="Accepted">
    <title>Surfing on Sine Waves</title>
    <country>UK</country>
    <released>1993-01-04</released>
    <master_id is_main_release="false">101</master_id>
    <artists>
      <artist>
        <id>2</id>
        <name>Polygon Window</name>
      </artist>
    </artists>
    <genres>
      <genre>Electronic</genre>
    </genres>
    <styles>
      <style>Ambient Techno</style>
    </styles>
  </release>
</releases>
"#;
