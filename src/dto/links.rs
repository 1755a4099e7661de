use serde::{Serialize, Serializer, ser::SerializeMap};

/// HAL リンク
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// `_links` オブジェクト
///
/// rel → `{ "href": ... }` のマップ。追加順を保持してシリアライズする。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(Vec<(String, Link)>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// rel を追加（同じ rel が既にあれば置き換える）
    pub fn add(&mut self, rel: &str, href: impl Into<String>) {
        let link = Link { href: href.into() };
        match self.0.iter_mut().find(|(r, _)| r == rel) {
            Some(entry) => entry.1 = link,
            None => self.0.push((rel.to_string(), link)),
        }
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.iter().find(|(r, _)| r == rel).map(|(_, link)| link)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(rel, _)| rel.as_str())
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rel, link) in &self.0 {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}
