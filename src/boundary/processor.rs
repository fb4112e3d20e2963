use std::time::Instant;

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{info, warn};

use crate::{
    admin::{
        classifier::capital_level_stats, AdminClassifier, AdminRecord, AdministrativeCenter,
    },
    geometry::{interior_centroid, point_in_polygon},
    osm_data::{
        osm::{OsmRelation, OsmTagged},
        Bounds, OsmDocument,
    },
    stitch::{RingBuilder, WayCoordinates},
};

use super::{BoundaryError, BoundaryReport, BoundaryResult, DocumentInfo, SkippedRelation};

/// Builds boundaries for the administrative relations of one document.
pub struct BoundaryProcessor<'a> {
    document: &'a OsmDocument,
    classifier: AdminClassifier,
    ring_builder: RingBuilder,
}

impl<'a> BoundaryProcessor<'a> {
    pub fn new(
        document: &'a OsmDocument,
        classifier: AdminClassifier,
        ring_builder: RingBuilder,
    ) -> Self {
        Self {
            document,
            classifier,
            ring_builder,
        }
    }

    pub fn process_relation(
        &self,
        relation: &OsmRelation,
    ) -> Result<BoundaryResult, BoundaryError> {
        let relation_id = relation.id;
        if !relation.is_administrative_boundary() {
            return Err(BoundaryError::NotAdministrative { relation_id });
        }
        let record = self.classifier.classify_relation(relation).ok_or(
            BoundaryError::UnsupportedAdminLevel {
                relation_id,
                admin_level: relation.admin_level(),
            },
        )?;

        let ways = self.document.boundary_ways(relation);
        if ways.is_empty() {
            return Err(BoundaryError::NoBoundaryWays { relation_id });
        }
        let way_count = ways.len();

        let resolved = ways
            .iter()
            .filter_map(|way| WayCoordinates::resolve(way.id, &way.node_refs, self.document))
            .collect::<Vec<_>>();

        let rings = self
            .ring_builder
            .build(resolved)
            .map_err(|error| BoundaryError::Stitch { relation_id, error })?;

        let centers = rings
            .iter()
            .filter_map(|ring| interior_centroid(ring))
            .collect::<Vec<_>>();
        let bounds = Bounds::from_coordinates(rings.iter().flatten());

        let degraded = centers.iter().filter(|center| center.is_degraded()).count();
        if degraded > 0 {
            warn!(relation_id, degraded, "Boundary has degraded centers");
        }

        info!(
            relation_id,
            name = record.name(),
            level = record.level().as_str(),
            rings = rings.len(),
            "Boundary built"
        );

        Ok(BoundaryResult {
            record,
            way_count,
            rings,
            centers,
            bounds,
        })
    }

    fn process_id(&self, relation_id: i64) -> Result<BoundaryResult, BoundaryError> {
        let relation = self
            .document
            .relation(relation_id)
            .ok_or(BoundaryError::RelationNotFound { relation_id })?;
        self.process_relation(relation)
    }

    /// Processes the listed relations, or every administrative relation when `relation_ids`
    /// is `None`. Relations that fail are reported as skipped.
    #[tracing::instrument(skip_all)]
    pub fn process(&self, relation_ids: Option<&[i64]>) -> BoundaryReport {
        let process_start = Instant::now();

        let relation_ids = match relation_ids {
            Some(relation_ids) => relation_ids.to_vec(),
            None => self
                .document
                .administrative_relations()
                .map(|relation| relation.id)
                .collect(),
        };

        let results = relation_ids
            .par_iter()
            .map(|relation_id| (*relation_id, self.process_id(*relation_id)))
            .collect::<Vec<_>>();

        let mut boundaries = Vec::new();
        let mut skipped = Vec::new();
        for (relation_id, result) in results {
            match result {
                Ok(boundary) => boundaries.push(boundary),
                Err(error) => {
                    warn!(relation_id, error = ?error, "Relation skipped");
                    skipped.push(SkippedRelation {
                        relation_id,
                        name: self
                            .document
                            .relation(relation_id)
                            .and_then(|relation| relation.name())
                            .map(String::from),
                        reason: error.to_string(),
                    });
                }
            }
        }

        assign_provinces(&mut boundaries);

        let center_nodes = self
            .document
            .nodes()
            .filter_map(AdministrativeCenter::from_node)
            .collect::<Vec<_>>();

        info!(
            boundaries = boundaries.len(),
            skipped = skipped.len(),
            center_nodes = center_nodes.len(),
            duration_ms = process_start.elapsed().as_millis() as u64,
            "Boundary processing done"
        );

        BoundaryReport {
            info: DocumentInfo::from_document(self.document),
            leftover_policy: self.ring_builder.leftover_policy(),
            boundaries,
            skipped,
            node_records: self.classifier.classify_nodes(self.document),
            capital_stats: capital_level_stats(self.document),
            center_nodes,
        }
    }
}

/// Gives each commune the short name of the province whose rings contain the commune's
/// center. With a single province in the batch, that province is used.
fn assign_provinces(boundaries: &mut [BoundaryResult]) {
    let provinces = boundaries
        .iter()
        .filter_map(|boundary| match &boundary.record {
            AdminRecord::Province(province) => Some((
                province
                    .short_name
                    .clone()
                    .or_else(|| province.entity.name.clone()),
                boundary.rings.clone(),
            )),
            AdminRecord::Commune(_) => None,
        })
        .collect::<Vec<_>>();

    if provinces.is_empty() {
        return;
    }

    for boundary in boundaries.iter_mut() {
        let center = boundary.first_center().map(|center| (center.lat, center.lon));
        let commune = match &mut boundary.record {
            AdminRecord::Commune(commune) => commune,
            AdminRecord::Province(_) => continue,
        };

        let containing = center.and_then(|(lat, lon)| {
            provinces.iter().find(|(_, rings)| {
                rings
                    .iter()
                    .any(|ring| point_in_polygon(lat, lon, ring))
            })
        });

        commune.province_name = match (containing, provinces.as_slice()) {
            (Some((name, _)), _) => name.clone(),
            (None, [(name, _)]) => name.clone(),
            (None, _) => None,
        };
    }
}
