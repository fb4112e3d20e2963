use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    admin::{AdminRecord, AdministrativeCenter},
    geometry::{InteriorCenter, Ring},
    osm_data::{Bounds, OsmDocument},
    stitch::{LeftoverPolicy, StitchError},
};

pub mod processor;

pub use processor::BoundaryProcessor;

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum BoundaryError {
    #[error("Relation {relation_id} not found")]
    RelationNotFound { relation_id: i64 },

    #[error("Relation {relation_id} is not an administrative boundary")]
    NotAdministrative { relation_id: i64 },

    #[error("Relation {relation_id} has unsupported admin level {admin_level:?}")]
    UnsupportedAdminLevel {
        relation_id: i64,
        admin_level: Option<i32>,
    },

    #[error("Relation {relation_id} has no boundary ways in the extract")]
    NoBoundaryWays { relation_id: i64 },

    #[error("Relation {relation_id} could not be stitched: {error}")]
    Stitch {
        relation_id: i64,
        error: StitchError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub version: Option<String>,
    pub generator: Option<String>,
    pub total_nodes: usize,
    pub total_ways: usize,
    pub total_relations: usize,
    pub place_nodes: usize,
    pub bounds: Option<Bounds>,
}

impl DocumentInfo {
    pub fn from_document(document: &OsmDocument) -> Self {
        Self {
            version: document.version.clone(),
            generator: document.generator.clone(),
            total_nodes: document.node_count(),
            total_ways: document.way_count(),
            total_relations: document.relation_count(),
            place_nodes: document.place_nodes().count(),
            bounds: document.bounds(),
        }
    }
}

/// Geometry and record of one administrative relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryResult {
    pub record: AdminRecord,
    pub way_count: usize,
    pub rings: Vec<Ring>,
    /// One per ring, same order.
    pub centers: Vec<InteriorCenter>,
    pub bounds: Option<Bounds>,
}

impl BoundaryResult {
    pub fn relation_id(&self) -> i64 {
        self.record.osm_id()
    }

    pub fn point_count(&self) -> usize {
        self.rings.iter().map(|ring| ring.len()).sum()
    }

    pub fn first_center(&self) -> Option<&InteriorCenter> {
        self.centers.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRelation {
    pub relation_id: i64,
    pub name: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryReport {
    pub info: DocumentInfo,
    pub leftover_policy: LeftoverPolicy,
    pub boundaries: Vec<BoundaryResult>,
    pub skipped: Vec<SkippedRelation>,
    /// Provinces and communes known only from a `capital` node.
    pub node_records: Vec<AdminRecord>,
    pub capital_stats: BTreeMap<i32, usize>,
    pub center_nodes: Vec<AdministrativeCenter>,
}
