use crate::{
    geometry::{Coordinate, Ring},
    osm_data::{xml_reader::parse_osm_xml, OsmDocument},
    stitch::WayCoordinates,
};

//  4 ----103---- 3
//  |             |
// 104           102
//  |    16-15    |
//  |    |   |    |
//  |    |   14-13|
//  |    |       ||
//  |    11----12 |
//  1 ----101---- 2
//
// 1001: province square from four disordered outer ways
// 1002: L-shaped commune from three ways, centroid falls outside
// 1003: admin level 8, 1004: outer way missing, 1005: not a boundary
pub const OSM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="boundary-test">
  <node id="1" lat="20.5" lon="105.0"/>
  <node id="2" lat="20.5" lon="106.0"/>
  <node id="3" lat="21.5" lon="106.0"/>
  <node id="4" lat="21.5" lon="105.0"/>
  <node id="11" lat="20.6" lon="105.1"/>
  <node id="12" lat="20.6" lon="105.4"/>
  <node id="13" lat="20.7" lon="105.4"/>
  <node id="14" lat="20.7" lon="105.2"/>
  <node id="15" lat="20.9" lon="105.2"/>
  <node id="16" lat="20.9" lon="105.1"/>
  <node id="201" lat="21.0285" lon="105.8542" version="3" user="mapper" uid="7" visible="true" timestamp="2024-04-01T08:00:00Z">
    <tag k="capital" v="4"/>
    <tag k="place" v="city"/>
    <tag k="name" v="Hà Nội"/>
    <tag k="name:en" v="Hanoi"/>
    <tag k="population" v="8053663"/>
    <tag k="ISO3166-2" v="VN-HN"/>
    <tag k="contact:website" v="https://hanoi.gov.vn"/>
  </node>
  <node id="202" lat="20.65" lon="105.15">
    <tag k="place" v="village"/>
    <tag k="name" v="Làng Vòng"/>
  </node>
  <node id="203" lat="20.8" lon="105.5">
    <tag k="amenity" v="school"/>
  </node>
  <node id="204" lat="20.62" lon="105.12">
    <tag k="capital" v="6"/>
    <tag k="name" v="Ba Đình"/>
  </node>
  <way id="101">
    <nd ref="1"/>
    <nd ref="2"/>
  </way>
  <way id="102">
    <nd ref="3"/>
    <nd ref="2"/>
  </way>
  <way id="103">
    <nd ref="3"/>
    <nd ref="4"/>
  </way>
  <way id="104">
    <nd ref="1"/>
    <nd ref="4"/>
  </way>
  <way id="111">
    <nd ref="11"/>
    <nd ref="12"/>
    <nd ref="13"/>
    <nd ref="14"/>
  </way>
  <way id="112">
    <nd ref="16"/>
    <nd ref="15"/>
    <nd ref="14"/>
  </way>
  <way id="113">
    <nd ref="16"/>
    <nd ref="11"/>
  </way>
  <relation id="1001" version="5" timestamp="2024-05-01T10:00:00Z" user="mapper" uid="7">
    <member type="way" ref="101" role="outer"/>
    <member type="way" ref="102" role="outer"/>
    <member type="way" ref="103" role="outer"/>
    <member type="way" ref="104" role="outer"/>
    <member type="node" ref="201" role="admin_centre"/>
    <tag k="type" v="boundary"/>
    <tag k="boundary" v="administrative"/>
    <tag k="admin_level" v="4"/>
    <tag k="capital" v="4"/>
    <tag k="name" v="Thành phố Hà Nội"/>
    <tag k="name:en" v="Hanoi"/>
  </relation>
  <relation id="1002">
    <member type="way" ref="111" role="outer"/>
    <member type="way" ref="112" role="outer"/>
    <member type="way" ref="113" role="outer"/>
    <tag k="type" v="boundary"/>
    <tag k="boundary" v="administrative"/>
    <tag k="admin_level" v="6"/>
    <tag k="name" v="Phường Ba Đình"/>
  </relation>
  <relation id="1003">
    <member type="way" ref="101" role="outer"/>
    <tag k="boundary" v="administrative"/>
    <tag k="admin_level" v="8"/>
    <tag k="name" v="Tổ dân phố 1"/>
  </relation>
  <relation id="1004">
    <member type="way" ref="999" role="outer"/>
    <tag k="boundary" v="administrative"/>
    <tag k="admin_level" v="6"/>
    <tag k="name" v="Xã Trống"/>
  </relation>
  <relation id="1005">
    <member type="way" ref="101" role=""/>
    <tag k="type" v="route"/>
    <tag k="route" v="bus"/>
  </relation>
</osm>
"#;

pub fn sample_document() -> OsmDocument {
    let mut document = OsmDocument::new();
    parse_osm_xml(OSM_SAMPLE.as_bytes(), &mut document).unwrap();
    document
}

/// `(lat, lon)` pairs without node ids.
pub fn coords(points: &[(f64, f64)]) -> Vec<Coordinate> {
    points
        .iter()
        .map(|(lat, lon)| Coordinate::new(*lat, *lon))
        .collect()
}

/// Closed square with its corner at the origin.
pub fn square(size: f64) -> Ring {
    coords(&[
        (0.0, 0.0),
        (0.0, size),
        (size, size),
        (size, 0.0),
        (0.0, 0.0),
    ])
}

/// Closed L whose area centroid (1.1, 1.1) lies outside the shape.
pub fn l_shape() -> Ring {
    coords(&[
        (0.0, 0.0),
        (0.0, 3.0),
        (1.0, 3.0),
        (1.0, 1.0),
        (3.0, 1.0),
        (3.0, 0.0),
        (0.0, 0.0),
    ])
}

pub fn way(id: i64, points: &[(f64, f64)]) -> WayCoordinates {
    WayCoordinates {
        id,
        coords: coords(points),
    }
}

//  (1,0) <-3- (1,1)
//    |          ^
//    4          2
//    v          |
//  (0,0) -1-> (0,1)
pub fn unit_square_ways() -> Vec<WayCoordinates> {
    vec![
        way(1, &[(0.0, 0.0), (0.0, 1.0)]),
        way(2, &[(0.0, 1.0), (1.0, 1.0)]),
        way(3, &[(1.0, 1.0), (1.0, 0.0)]),
        way(4, &[(1.0, 0.0), (0.0, 0.0)]),
    ]
}
