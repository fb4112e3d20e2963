use serde::{Deserialize, Serialize};

use crate::osm_data::osm::{OsmNode, OsmTagged};

use super::AdminLevel;

/// A node that marks the seat or center of an administrative area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeCenter {
    pub osm_id: i64,
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
    pub official_name: Option<String>,
    pub english_name: Option<String>,
    pub place: Option<String>,
    pub admin_level: Option<i32>,
    pub capital: Option<String>,
    /// From `capital`, or `admin_level` when there is no capital tag.
    pub level: Option<AdminLevel>,
    pub population: Option<i64>,
    pub iso3166_2: Option<String>,
    pub website: Option<String>,
}

impl AdministrativeCenter {
    /// Nodes with a `capital` tag, an administrative `place` or a `population`.
    pub fn is_center_node(node: &OsmNode) -> bool {
        node.tag("capital").is_some()
            || node.is_administrative_place()
            || node.tag("population").is_some()
    }

    pub fn from_node(node: &OsmNode) -> Option<Self> {
        if !Self::is_center_node(node) {
            return None;
        }

        let level = match node.tag("capital") {
            Some(_) => node.capital_level().and_then(AdminLevel::from_level),
            None => node.admin_level().and_then(AdminLevel::from_level),
        };

        Some(Self {
            osm_id: node.id,
            lat: node.lat,
            lon: node.lon,
            name: node.tag("name").map(String::from),
            official_name: node.tag("name:vi").map(String::from),
            english_name: node.tag("name:en").map(String::from),
            place: node.tag("place").map(String::from),
            admin_level: node.admin_level(),
            capital: node.tag("capital").map(String::from),
            level,
            population: node
                .tag("population")
                .and_then(|population| population.trim().parse().ok()),
            iso3166_2: node.tag("ISO3166-2").map(String::from),
            website: node
                .tag("contact:website")
                .or_else(|| node.tag("website"))
                .map(String::from),
        })
    }
}
