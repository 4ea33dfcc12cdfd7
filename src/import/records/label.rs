use serde::Deserialize;

use super::{clean, content_hash, RawRef, UrlList};
use crate::db::models::{Label, LabelParent, LabelUrl};
use crate::refcache::RefCache;

/// One `<label>` element, primary fields only.
#[derive(Debug, Deserialize)]
pub struct RawLabel {
    pub id: i32,
    pub name: Option<String>,
    #[serde(rename = "contactinfo")]
    pub contact_info: Option<String>,
    pub profile: Option<String>,
    pub data_quality: Option<String>,
}

impl RawLabel {
    pub fn into_label(self) -> Label {
        Label {
            id: self.id,
            name: self.name,
            contact_info: self.contact_info,
            profile: self.profile,
            data_quality: self.data_quality,
        }
    }
}

/// One `<label>` element, relation fields only.
#[derive(Debug, Deserialize)]
pub struct RawLabelRelation {
    pub id: i32,
    #[serde(default)]
    pub urls: UrlList,
    #[serde(rename = "parentLabel")]
    pub parent_label: Option<RawRef>,
}

impl RawLabelRelation {
    pub fn urls(&self) -> Vec<LabelUrl> {
        self.urls
            .url
            .iter()
            .filter_map(|url| clean(url))
            .map(|url| LabelUrl {
                label_id: self.id,
                url_hash: content_hash(url),
                url: url.to_string(),
            })
            .collect()
    }

    /// The parent link survives only when the parent label is itself a
    /// known id; otherwise the row keeps a NULL parent.
    pub fn parent(&self, cache: &RefCache) -> Option<LabelParent> {
        let parent = self.parent_label.as_ref()?;
        cache.labels.contains(parent.id).then(|| LabelParent {
            id: self.id,
            parent_id: parent.id,
        })
    }
}
