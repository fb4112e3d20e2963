use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Editing metadata carried by every OSM element. Extracts may omit any of it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OsmMeta {
    pub version: Option<u32>,
    pub changeset: Option<i64>,
    pub timestamp: Option<String>,
    pub user: Option<String>,
    pub uid: Option<i64>,
    pub visible: Option<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OsmNode {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub tags: HashMap<String, String>,
    pub meta: OsmMeta,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OsmWay {
    pub id: i64,
    pub node_refs: Vec<i64>,
    pub tags: HashMap<String, String>,
    pub meta: OsmMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmRelationMemberType {
    Node,
    Way,
    Relation,
}

impl OsmRelationMemberType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            "relation" => Some(Self::Relation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsmRelationMember {
    pub member_type: OsmRelationMemberType,
    pub member_ref: i64,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OsmRelation {
    pub id: i64,
    pub members: Vec<OsmRelationMember>,
    pub tags: HashMap<String, String>,
    pub meta: OsmMeta,
}

const NAME_KEYS: [&str; 3] = ["name", "name:vi", "name:en"];

const ADMIN_PLACE_VALUES: [&str; 6] = [
    "suburb",
    "town",
    "village",
    "city",
    "hamlet",
    "neighbourhood",
];

/// Tag lookups shared by nodes, ways and relations.
pub trait OsmTagged {
    fn tags(&self) -> &HashMap<String, String>;
    fn meta(&self) -> &OsmMeta;

    /// Tag value, `None` when missing or empty.
    fn tag(&self, key: &str) -> Option<&str> {
        self.tags()
            .get(key)
            .map(|value| value.as_str())
            .filter(|value| !value.is_empty())
    }

    fn has_tag(&self, key: &str, value: &str) -> bool {
        self.tag(key) == Some(value)
    }

    /// First non-empty of `name`, `name:vi`, `name:en`.
    fn name(&self) -> Option<&str> {
        NAME_KEYS.iter().find_map(|key| self.tag(key))
    }

    fn admin_level(&self) -> Option<i32> {
        self.tag("admin_level")
            .and_then(|level| level.trim().parse().ok())
    }

    fn capital_level(&self) -> Option<i32> {
        self.tag("capital").and_then(|level| level.trim().parse().ok())
    }

    fn is_administrative_boundary(&self) -> bool {
        self.has_tag("boundary", "administrative") && self.tag("admin_level").is_some()
    }

    fn is_place(&self) -> bool {
        self.tag("place").is_some()
    }

    fn is_administrative_place(&self) -> bool {
        self.tag("place")
            .is_some_and(|place| ADMIN_PLACE_VALUES.contains(&place))
    }
}

impl OsmTagged for OsmNode {
    fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }
    fn meta(&self) -> &OsmMeta {
        &self.meta
    }
}

impl OsmTagged for OsmWay {
    fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }
    fn meta(&self) -> &OsmMeta {
        &self.meta
    }
}

impl OsmTagged for OsmRelation {
    fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }
    fn meta(&self) -> &OsmMeta {
        &self.meta
    }
}
