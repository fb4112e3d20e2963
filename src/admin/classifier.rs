use std::{
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

use tracing::debug;

use crate::osm_data::{
    document::OsmDocument,
    osm::{OsmNode, OsmRelation, OsmTagged},
};

use super::{
    AdminEntity, AdminLevel, AdminRecord, AuditInfo, CommuneRecord, EntitySource, ProvinceRecord,
};

const PROVINCE_DESIGNATIONS: [&str; 2] = ["Thành phố ", "Tỉnh "];

/// Drops the "Thành phố " / "Tỉnh " designation, "Thành phố Hà Nội" becomes "Hà Nội".
pub fn normalize_province_name(name: &str) -> String {
    PROVINCE_DESIGNATIONS
        .iter()
        .fold(name.to_string(), |name, designation| {
            name.replace(designation, "")
        })
        .trim()
        .to_string()
}

/// Number of administrative boundary relations per `capital` level.
pub fn capital_level_stats(document: &OsmDocument) -> BTreeMap<i32, usize> {
    let mut stats = BTreeMap::new();
    for level in document
        .administrative_relations()
        .filter_map(|relation| relation.capital_level())
        .filter(|level| *level > 0)
    {
        *stats.entry(level).or_insert(0) += 1;
    }
    stats
}

/// Builds province and commune records from OSM elements.
#[derive(Debug, Clone)]
pub struct AdminClassifier {
    created_at: u64,
    created_by: String,
}

impl Default for AdminClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminClassifier {
    pub fn new() -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);
        Self::at(created_at)
    }

    pub fn at(created_at: u64) -> Self {
        Self {
            created_at,
            created_by: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }

    fn record<T: OsmTagged>(
        &self,
        level: AdminLevel,
        osm_id: i64,
        source: EntitySource,
        element: &T,
    ) -> AdminRecord {
        let entity = AdminEntity::from_element(
            osm_id,
            source,
            element,
            AuditInfo::new(self.created_at, &self.created_by, element.meta()),
        );
        match level {
            AdminLevel::Province => AdminRecord::Province(ProvinceRecord {
                short_name: entity.name.as_deref().map(normalize_province_name),
                entity,
            }),
            AdminLevel::Commune => AdminRecord::Commune(CommuneRecord {
                entity,
                province_name: None,
            }),
        }
    }

    /// Administrative boundary relations at `admin_level` 4 or 6.
    pub fn classify_relation(&self, relation: &OsmRelation) -> Option<AdminRecord> {
        if !relation.is_administrative_boundary() {
            return None;
        }

        let level = relation.admin_level().and_then(AdminLevel::from_level);
        debug!(
            relation_id = relation.id,
            name = relation.name(),
            admin_level = relation.admin_level(),
            capital = relation.capital_level(),
            level = level.map(|level| level.as_str()),
            "Classified relation"
        );

        level.map(|level| self.record(level, relation.id, EntitySource::Relation, relation))
    }

    /// Nodes whose `capital` tag is 4 or 6.
    pub fn classify_node(&self, node: &OsmNode) -> Option<AdminRecord> {
        let level = node.capital_level().and_then(AdminLevel::from_level)?;
        Some(self.record(level, node.id, EntitySource::Node, node))
    }

    pub fn classify_nodes(&self, document: &OsmDocument) -> Vec<AdminRecord> {
        document
            .nodes()
            .filter_map(|node| self.classify_node(node))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::sample_document;

    #[test]
    fn strips_designations() {
        assert_eq!(normalize_province_name("Thành phố Hà Nội"), "Hà Nội");
        assert_eq!(normalize_province_name("Tỉnh Quảng Ninh"), "Quảng Ninh");
        assert_eq!(normalize_province_name(" Huế "), "Huế");
    }

    #[test]
    fn relations_by_admin_level() {
        let doc = sample_document();
        let classifier = AdminClassifier::at(1_700_000_000);

        let province = classifier
            .classify_relation(doc.relation(1001).unwrap())
            .unwrap();
        match &province {
            AdminRecord::Province(record) => {
                assert_eq!(record.entity.name.as_deref(), Some("Thành phố Hà Nội"));
                assert_eq!(record.short_name.as_deref(), Some("Hà Nội"));
                assert_eq!(record.entity.name_en.as_deref(), Some("Hanoi"));
                assert_eq!(record.entity.source, EntitySource::Relation);
                assert_eq!(record.entity.audit.created_at, 1_700_000_000);
                assert_eq!(
                    record.entity.audit.updated_at.as_deref(),
                    Some("2024-05-01T10:00:00Z")
                );
                assert_eq!(record.entity.audit.updated_by.as_deref(), Some("mapper"));
            }
            other => panic!("expected province, got {other:?}"),
        }

        let commune = classifier
            .classify_relation(doc.relation(1002).unwrap())
            .unwrap();
        assert_eq!(commune.level(), AdminLevel::Commune);

        assert!(classifier
            .classify_relation(doc.relation(1003).unwrap())
            .is_none());
        assert!(classifier
            .classify_relation(doc.relation(1005).unwrap())
            .is_none());
    }

    #[test]
    fn nodes_by_capital_level() {
        let doc = sample_document();
        let records = AdminClassifier::at(0).classify_nodes(&doc);
        let summary = records
            .iter()
            .map(|record| (record.osm_id(), record.level()))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![(201, AdminLevel::Province), (204, AdminLevel::Commune)]
        );
        assert_eq!(records[0].entity().source, EntitySource::Node);
        assert_eq!(records[0].entity().admin_level, None);
    }

    #[test]
    fn capital_stats_count_relations() {
        let stats = capital_level_stats(&sample_document());
        assert_eq!(stats.get(&4), Some(&1));
        assert_eq!(stats.len(), 1);
    }
}
