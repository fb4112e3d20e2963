use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};
use wkt::ToWkt;

use crate::{
    boundary::{BoundaryReport, BoundaryResult},
    geometry::{CenterResolution, Ring},
    ring_codec::{encode_rings, RingCodecError},
};

#[derive(Debug, thiserror::Error)]
pub enum ResultWriterError {
    #[error("JSON Serialization error {error}")]
    SerializeJson { error: serde_json::Error },

    #[error("CSV writing failed: {error}")]
    Csv { error: csv::Error },

    #[error("Failed to write to stdout: {error}")]
    Stdout { error: io::Error },

    #[error("Failed to write to file: {error}")]
    FileWrite { error: io::Error },

    #[error("Failed to encode rings: {error}")]
    RingEncode { error: RingCodecError },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataDestination {
    Stdout,
    Json { file: PathBuf },
    Csv { file: PathBuf },
}

/// Interior center of one stored ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterRecord {
    pub ring_index: usize,
    pub lat: f64,
    pub lon: f64,
    pub resolution: CenterResolution,
}

#[derive(Debug, Serialize)]
struct BoundaryRow<'a> {
    relation_id: i64,
    kind: &'static str,
    name: Option<&'a str>,
    admin_level: Option<i32>,
    province_name: Option<&'a str>,
    ring_count: usize,
    point_count: usize,
    center_lat: Option<f64>,
    center_lon: Option<f64>,
    min_lat: Option<f64>,
    max_lat: Option<f64>,
    min_lon: Option<f64>,
    max_lon: Option<f64>,
    geometry: String,
}

#[derive(Debug, Serialize)]
struct CenterRow {
    ring_index: usize,
    lat: f64,
    lon: f64,
    resolution: &'static str,
    t: Option<f64>,
}

impl From<&CenterRecord> for CenterRow {
    fn from(value: &CenterRecord) -> Self {
        let (resolution, t) = match value.resolution {
            CenterResolution::Centroid => ("centroid", None),
            CenterResolution::Interpolated { t } => ("interpolated", Some(t)),
            CenterResolution::DegenerateRing => ("degenerate_ring", None),
            CenterResolution::NoInteriorPointFound => ("no_interior_point_found", None),
        };
        Self {
            ring_index: value.ring_index,
            lat: value.lat,
            lon: value.lon,
            resolution,
            t,
        }
    }
}

/// Rings as a WKT `MULTIPOLYGON`, longitude first.
pub fn rings_to_wkt(rings: &[Ring]) -> String {
    MultiPolygon::new(
        rings
            .iter()
            .map(|ring| {
                Polygon::new(
                    LineString::from(ring.iter().map(|c| Coord::from(*c)).collect::<Vec<_>>()),
                    vec![],
                )
            })
            .collect(),
    )
    .wkt_string()
}

impl<'a> From<&'a BoundaryResult> for BoundaryRow<'a> {
    fn from(value: &'a BoundaryResult) -> Self {
        let province_name = match &value.record {
            crate::admin::AdminRecord::Commune(commune) => commune.province_name.as_deref(),
            crate::admin::AdminRecord::Province(_) => None,
        };
        Self {
            relation_id: value.relation_id(),
            kind: value.record.level().as_str(),
            name: value.record.name(),
            admin_level: value.record.entity().admin_level,
            province_name,
            ring_count: value.rings.len(),
            point_count: value.point_count(),
            center_lat: value.first_center().map(|center| center.lat),
            center_lon: value.first_center().map(|center| center.lon),
            min_lat: value.bounds.map(|bounds| bounds.min_lat),
            max_lat: value.bounds.map(|bounds| bounds.max_lat),
            min_lon: value.bounds.map(|bounds| bounds.min_lon),
            max_lon: value.bounds.map(|bounds| bounds.max_lon),
            geometry: rings_to_wkt(&value.rings),
        }
    }
}

fn write_json<T: Serialize>(dest: &DataDestination, value: &T) -> Result<(), ResultWriterError> {
    let json =
        serde_json::to_string(value).map_err(|error| ResultWriterError::SerializeJson { error })?;

    match dest {
        DataDestination::Json { file } => {
            trace!(
                bytes_len = json.as_bytes().len(),
                destination = ?file,
                "Writing json"
            );
            std::fs::write(file, json).map_err(|error| ResultWriterError::FileWrite { error })
        }
        _ => {
            trace!(bytes_len = json.as_bytes().len(), "Writing json to stdout");
            std::io::stdout()
                .write_all(json.as_bytes())
                .map_err(|error| ResultWriterError::Stdout { error })
        }
    }
}

fn write_csv<T: Serialize>(
    file: &PathBuf,
    rows: impl Iterator<Item = T>,
) -> Result<(), ResultWriterError> {
    info!(file = ?file, "Writing csv");
    let f = File::create(file).map_err(|error| ResultWriterError::FileWrite { error })?;
    let mut writer = csv::Writer::from_writer(f);
    for row in rows {
        writer
            .serialize(row)
            .map_err(|error| ResultWriterError::Csv { error })?;
    }
    writer
        .flush()
        .map_err(|error| ResultWriterError::FileWrite { error })
}

pub struct ResultWriter;
impl ResultWriter {
    #[tracing::instrument(skip(report))]
    pub fn write_report(
        dest: &DataDestination,
        report: &BoundaryReport,
    ) -> Result<(), ResultWriterError> {
        match dest {
            DataDestination::Csv { file } => {
                write_csv(file, report.boundaries.iter().map(BoundaryRow::from))
            }
            _ => write_json(dest, report),
        }
    }

    #[tracing::instrument(skip(centers))]
    pub fn write_centers(
        dest: &DataDestination,
        centers: &[CenterRecord],
    ) -> Result<(), ResultWriterError> {
        match dest {
            DataDestination::Csv { file } => write_csv(file, centers.iter().map(CenterRow::from)),
            _ => write_json(dest, &centers),
        }
    }

    /// Every ring of every boundary, in report order, as stored ring JSON.
    #[tracing::instrument(skip(report))]
    pub fn write_rings(file: &PathBuf, report: &BoundaryReport) -> Result<(), ResultWriterError> {
        let rings = report
            .boundaries
            .iter()
            .flat_map(|boundary| boundary.rings.iter().cloned())
            .collect::<Vec<_>>();
        let json = encode_rings(&rings).map_err(|error| ResultWriterError::RingEncode { error })?;
        info!(file = ?file, rings = rings.len(), "Writing rings");
        std::fs::write(file, json).map_err(|error| ResultWriterError::FileWrite { error })
    }
}
