use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{geometry::Coordinate, stitch::NodeIndex};

use super::osm::{OsmNode, OsmRelation, OsmRelationMemberType, OsmTagged, OsmWay};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn from_coordinates<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        coords.into_iter().fold(None, |bounds, coord| {
            Some(match bounds {
                None => Bounds {
                    min_lat: coord.lat,
                    max_lat: coord.lat,
                    min_lon: coord.lon,
                    max_lon: coord.lon,
                },
                Some(bounds) => Bounds {
                    min_lat: bounds.min_lat.min(coord.lat),
                    max_lat: bounds.max_lat.max(coord.lat),
                    min_lon: bounds.min_lon.min(coord.lon),
                    max_lon: bounds.max_lon.max(coord.lon),
                },
            })
        })
    }
}

/// Everything read from one OSM extract, indexed by element id.
#[derive(Debug, Default, Clone)]
pub struct OsmDocument {
    pub version: Option<String>,
    pub generator: Option<String>,
    nodes: HashMap<i64, OsmNode>,
    node_order: Vec<i64>,
    ways: HashMap<i64, OsmWay>,
    relations: HashMap<i64, OsmRelation>,
    relation_order: Vec<i64>,
}

impl OsmDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_node(&mut self, node: OsmNode) {
        let id = node.id;
        if self.nodes.insert(id, node).is_none() {
            self.node_order.push(id);
        }
    }

    pub fn insert_way(&mut self, way: OsmWay) {
        self.ways.insert(way.id, way);
    }

    pub fn insert_relation(&mut self, relation: OsmRelation) {
        let id = relation.id;
        if self.relations.insert(id, relation).is_none() {
            self.relation_order.push(id);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    pub fn node(&self, id: i64) -> Option<&OsmNode> {
        self.nodes.get(&id)
    }

    pub fn way(&self, id: i64) -> Option<&OsmWay> {
        self.ways.get(&id)
    }

    pub fn relation(&self, id: i64) -> Option<&OsmRelation> {
        self.relations.get(&id)
    }

    /// Nodes in the order they were read.
    pub fn nodes(&self) -> impl Iterator<Item = &OsmNode> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Relations in the order they were read.
    pub fn relations(&self) -> impl Iterator<Item = &OsmRelation> {
        self.relation_order
            .iter()
            .filter_map(|id| self.relations.get(id))
    }

    pub fn administrative_relations(&self) -> impl Iterator<Item = &OsmRelation> {
        self.relations()
            .filter(|relation| relation.is_administrative_boundary())
    }

    pub fn place_nodes(&self) -> impl Iterator<Item = &OsmNode> {
        self.nodes().filter(|node| node.is_place())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let coords = self
            .nodes
            .values()
            .map(|node| Coordinate::new(node.lat, node.lon))
            .collect::<Vec<_>>();
        Bounds::from_coordinates(&coords)
    }

    /// Way members with role `outer`. Relations that never use `outer` fall back to
    /// way members without a role. Members missing from the extract are skipped.
    pub fn boundary_ways(&self, relation: &OsmRelation) -> Vec<&OsmWay> {
        let way_members = relation
            .members
            .iter()
            .filter(|member| member.member_type == OsmRelationMemberType::Way)
            .collect::<Vec<_>>();

        let has_outer = way_members.iter().any(|member| member.role == "outer");

        way_members
            .into_iter()
            .filter(|member| {
                if has_outer {
                    member.role == "outer"
                } else {
                    member.role.is_empty()
                }
            })
            .filter_map(|member| self.ways.get(&member.member_ref))
            .collect()
    }
}

impl NodeIndex for OsmDocument {
    fn coordinate(&self, node_id: i64) -> Option<Coordinate> {
        self.nodes
            .get(&node_id)
            .map(|node| Coordinate::with_id(node.id, node.lat, node.lon))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::osm_data::osm::{OsmMeta, OsmRelationMember};

    fn node(id: i64, lat: f64, lon: f64) -> OsmNode {
        OsmNode {
            id,
            lat,
            lon,
            tags: HashMap::new(),
            meta: OsmMeta::default(),
        }
    }

    fn way(id: i64, node_refs: Vec<i64>) -> OsmWay {
        OsmWay {
            id,
            node_refs,
            tags: HashMap::new(),
            meta: OsmMeta::default(),
        }
    }

    fn member(member_ref: i64, role: &str) -> OsmRelationMember {
        OsmRelationMember {
            member_type: OsmRelationMemberType::Way,
            member_ref,
            role: role.to_string(),
        }
    }

    fn relation(members: Vec<OsmRelationMember>) -> OsmRelation {
        OsmRelation {
            id: 100,
            members,
            tags: HashMap::new(),
            meta: OsmMeta::default(),
        }
    }

    fn document() -> OsmDocument {
        let mut doc = OsmDocument::new();
        doc.insert_node(node(1, 10.0, 100.0));
        doc.insert_node(node(2, 12.0, 99.0));
        doc.insert_node(node(3, 11.0, 101.5));
        doc.insert_way(way(10, vec![1, 2]));
        doc.insert_way(way(11, vec![2, 3]));
        doc.insert_way(way(12, vec![3, 1]));
        doc
    }

    #[test]
    fn bounds_over_all_nodes() {
        let bounds = document().bounds().unwrap();
        assert_eq!(
            bounds,
            Bounds {
                min_lat: 10.0,
                max_lat: 12.0,
                min_lon: 99.0,
                max_lon: 101.5,
            }
        );
        assert!(OsmDocument::new().bounds().is_none());
    }

    #[test]
    fn outer_members_only() {
        let doc = document();
        let rel = relation(vec![member(10, "outer"), member(11, "inner"), member(12, "")]);
        let ids = doc
            .boundary_ways(&rel)
            .iter()
            .map(|w| w.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![10]);
    }

    #[test]
    fn empty_role_when_no_outer() {
        let doc = document();
        let rel = relation(vec![member(10, ""), member(11, "inner"), member(12, ""), member(99, "")]);
        let ids = doc
            .boundary_ways(&rel)
            .iter()
            .map(|w| w.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![10, 12]);
    }

    #[test]
    fn relations_indexed_by_id_in_read_order() {
        let mut doc = OsmDocument::new();
        for id in [30, 10, 20] {
            doc.insert_relation(OsmRelation {
                id,
                ..relation(Vec::new())
            });
        }
        doc.insert_relation(OsmRelation {
            id: 10,
            ..relation(vec![member(10, "outer")])
        });

        assert_eq!(doc.relation_count(), 3);
        assert_eq!(
            doc.relations().map(|r| r.id).collect::<Vec<_>>(),
            vec![30, 10, 20]
        );
        assert_eq!(doc.relation(10).unwrap().members.len(), 1);
        assert!(doc.relation(99).is_none());
    }

    #[test]
    fn node_index_keeps_ids() {
        let doc = document();
        assert_eq!(doc.coordinate(2), Some(Coordinate::with_id(2, 12.0, 99.0)));
        assert_eq!(doc.coordinate(42), None);
        assert_eq!(
            doc.nodes().map(|n| n.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }
}
