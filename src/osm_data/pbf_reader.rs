use std::{collections::HashMap, path::PathBuf, time::Instant};

use osmpbfreader::{OsmId, OsmObj, Tags};
use tracing::trace;

use super::{
    document::OsmDocument,
    osm::{OsmMeta, OsmNode, OsmRelation, OsmRelationMember, OsmRelationMemberType, OsmWay},
    OsmDataReaderError,
};

const CENTER_NODE_KEYS: [&str; 3] = ["capital", "place", "population"];

/// Administrative boundary relations and tagged center nodes, plus everything they
/// reference. PBF blocks carry no per-element metadata, so `meta` stays empty.
pub struct PbfReader<'a> {
    document: &'a mut OsmDocument,
    file_name: &'a PathBuf,
}

fn is_wanted(obj: &OsmObj) -> bool {
    match obj {
        OsmObj::Relation(relation) => {
            relation.tags.contains("boundary", "administrative")
                && relation.tags.contains_key("admin_level")
        }
        OsmObj::Node(node) => CENTER_NODE_KEYS
            .iter()
            .any(|key| node.tags.contains_key(*key)),
        OsmObj::Way(_) => false,
    }
}

fn convert_tags(tags: &Tags) -> HashMap<String, String> {
    tags.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl<'a> PbfReader<'a> {
    pub fn new(document: &'a mut OsmDocument, file_name: &'a PathBuf) -> Self {
        Self {
            document,
            file_name,
        }
    }

    pub fn read(self) -> Result<(), OsmDataReaderError> {
        let read_start = Instant::now();

        let r = std::fs::File::open(self.file_name)
            .map_err(|error| OsmDataReaderError::PbfFileOpenError { error })?;
        let mut pbf = osmpbfreader::OsmPbfReader::new(r);

        let elements = pbf
            .get_objs_and_deps(is_wanted)
            .map_err(|error| OsmDataReaderError::PbfFileReadError { error })?;

        for (_id, element) in elements {
            match element {
                OsmObj::Node(node) => self.document.insert_node(OsmNode {
                    id: node.id.0,
                    lat: node.lat(),
                    lon: node.lon(),
                    tags: convert_tags(&node.tags),
                    meta: OsmMeta::default(),
                }),
                OsmObj::Way(way) => self.document.insert_way(OsmWay {
                    id: way.id.0,
                    node_refs: way.nodes.iter().map(|node_id| node_id.0).collect(),
                    tags: convert_tags(&way.tags),
                    meta: OsmMeta::default(),
                }),
                OsmObj::Relation(relation) => self.document.insert_relation(OsmRelation {
                    id: relation.id.0,
                    members: relation
                        .refs
                        .iter()
                        .map(|member| {
                            let (member_type, member_ref) = match member.member {
                                OsmId::Node(id) => (OsmRelationMemberType::Node, id.0),
                                OsmId::Way(id) => (OsmRelationMemberType::Way, id.0),
                                OsmId::Relation(id) => (OsmRelationMemberType::Relation, id.0),
                            };
                            OsmRelationMember {
                                member_type,
                                member_ref,
                                role: member.role.to_string(),
                            }
                        })
                        .collect(),
                    tags: convert_tags(&relation.tags),
                    meta: OsmMeta::default(),
                }),
            }
        }

        let read_duration = read_start.elapsed();
        trace!(
            read_duration_secs = read_duration.as_secs(),
            nodes = self.document.node_count(),
            ways = self.document.way_count(),
            relations = self.document.relation_count(),
            "PBF read done"
        );

        Ok(())
    }
}
