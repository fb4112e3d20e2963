use serde::{Deserialize, Serialize};

use crate::osm_data::osm::{OsmMeta, OsmTagged};

pub mod center_point;
pub mod classifier;

pub use center_point::AdministrativeCenter;
pub use classifier::AdminClassifier;

pub const PROVINCE_LEVEL: i32 = 4;
pub const COMMUNE_LEVEL: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
    Province,
    Commune,
}

impl AdminLevel {
    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            PROVINCE_LEVEL => Some(AdminLevel::Province),
            COMMUNE_LEVEL => Some(AdminLevel::Commune),
            _ => None,
        }
    }

    pub fn level(&self) -> i32 {
        match self {
            AdminLevel::Province => PROVINCE_LEVEL,
            AdminLevel::Commune => COMMUNE_LEVEL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminLevel::Province => "province",
            AdminLevel::Commune => "commune",
        }
    }
}

/// Which kind of OSM element a record was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySource {
    Relation,
    Node,
}

/// Who produced a record and when, next to who last touched the OSM element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditInfo {
    /// Unix seconds of the processing run.
    pub created_at: u64,
    pub created_by: String,
    /// OSM element timestamp.
    pub updated_at: Option<String>,
    /// OSM user of the last edit.
    pub updated_by: Option<String>,
}

impl AuditInfo {
    pub fn new(created_at: u64, created_by: &str, meta: &OsmMeta) -> Self {
        Self {
            created_at,
            created_by: created_by.to_string(),
            updated_at: meta.timestamp.clone(),
            updated_by: meta.user.clone(),
        }
    }
}

/// Fields shared by provinces and communes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminEntity {
    pub osm_id: i64,
    pub source: EntitySource,
    pub name: Option<String>,
    pub name_en: Option<String>,
    pub name_vi: Option<String>,
    pub place: Option<String>,
    pub admin_level: Option<i32>,
    pub capital_level: Option<i32>,
    pub audit: AuditInfo,
}

impl AdminEntity {
    pub fn from_element<T: OsmTagged>(
        osm_id: i64,
        source: EntitySource,
        element: &T,
        audit: AuditInfo,
    ) -> Self {
        Self {
            osm_id,
            source,
            name: element.name().map(String::from),
            name_en: element.tag("name:en").map(String::from),
            name_vi: element.tag("name:vi").map(String::from),
            place: element.tag("place").map(String::from),
            admin_level: element.admin_level(),
            capital_level: element.capital_level(),
            audit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceRecord {
    #[serde(flatten)]
    pub entity: AdminEntity,
    /// `name` without the "Thành phố " / "Tỉnh " designation.
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuneRecord {
    #[serde(flatten)]
    pub entity: AdminEntity,
    pub province_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdminRecord {
    Province(ProvinceRecord),
    Commune(CommuneRecord),
}

impl AdminRecord {
    pub fn entity(&self) -> &AdminEntity {
        match self {
            AdminRecord::Province(province) => &province.entity,
            AdminRecord::Commune(commune) => &commune.entity,
        }
    }

    pub fn osm_id(&self) -> i64 {
        self.entity().osm_id
    }

    pub fn name(&self) -> Option<&str> {
        self.entity().name.as_deref()
    }

    pub fn level(&self) -> AdminLevel {
        match self {
            AdminRecord::Province(_) => AdminLevel::Province,
            AdminRecord::Commune(_) => AdminLevel::Commune,
        }
    }
}
