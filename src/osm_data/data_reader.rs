use tracing::info;

use super::{
    document::OsmDocument, pbf_reader::PbfReader, xml_reader::OsmXmlReader, DataSource,
    OsmDataReaderError,
};

pub struct OsmDataReader {
    source: DataSource,
    document: OsmDocument,
}

impl OsmDataReader {
    pub fn new(data_source: DataSource) -> Self {
        Self {
            document: OsmDocument::new(),
            source: data_source,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn read_data(mut self) -> Result<OsmDocument, OsmDataReaderError> {
        match self.source {
            DataSource::XmlFile { ref file } => {
                OsmXmlReader::new(&mut self.document, file).read()?
            }
            DataSource::PbfFile { ref file } => {
                PbfReader::new(&mut self.document, file).read()?;
            }
        };

        info!(
            nodes = self.document.node_count(),
            ways = self.document.way_count(),
            relations = self.document.relation_count(),
            "OSM data read"
        );

        Ok(self.document)
    }
}
