use std::{io, path::PathBuf};

use xml_reader::OsmXmlReaderError;

pub mod data_reader;
pub mod document;
pub mod osm;
pub mod pbf_reader;
pub mod xml_reader;

pub use data_reader::OsmDataReader;
pub use document::{Bounds, OsmDocument};

#[derive(Debug, thiserror::Error)]
pub enum OsmDataReaderError {
    #[error("OSM XML error: {error}")]
    XmlError { error: OsmXmlReaderError },

    #[error("File error: {error}")]
    FileError { error: io::Error },

    #[error("Failed to open PBF file: {error}")]
    PbfFileOpenError { error: io::Error },

    #[error("Failed to read PBF file: {error}")]
    PbfFileReadError { error: osmpbfreader::Error },
}

#[derive(Debug, PartialEq, Clone)]
pub enum DataSource {
    XmlFile { file: PathBuf },
    PbfFile { file: PathBuf },
}
