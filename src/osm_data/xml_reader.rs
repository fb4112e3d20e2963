use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
    str::FromStr,
    time::Instant,
};

use quick_xml::{
    events::{attributes::AttrError, BytesStart, Event},
    Reader,
};
use tracing::trace;

use super::{
    document::OsmDocument,
    osm::{OsmMeta, OsmNode, OsmRelation, OsmRelationMember, OsmRelationMemberType, OsmWay},
    OsmDataReaderError,
};

#[derive(Debug, thiserror::Error)]
pub enum OsmXmlReaderError {
    #[error("XML error: {error}")]
    Xml { error: quick_xml::Error },

    #[error("XML attribute error: {error}")]
    Attribute { error: AttrError },

    #[error("Missing attribute {attribute} on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid value {value:?} for attribute {attribute} on <{element}>")]
    InvalidValue {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}

enum OpenElement {
    Node(OsmNode),
    Way(OsmWay),
    Relation(OsmRelation),
    /// A node without a position, its children are ignored.
    Skipped,
}

impl OpenElement {
    fn tags_mut(&mut self) -> Option<&mut HashMap<String, String>> {
        match self {
            OpenElement::Node(node) => Some(&mut node.tags),
            OpenElement::Way(way) => Some(&mut way.tags),
            OpenElement::Relation(relation) => Some(&mut relation.tags),
            OpenElement::Skipped => None,
        }
    }
}

pub struct OsmXmlReader<'a> {
    document: &'a mut OsmDocument,
    file_name: &'a PathBuf,
}

impl<'a> OsmXmlReader<'a> {
    pub fn new(document: &'a mut OsmDocument, file_name: &'a PathBuf) -> Self {
        Self {
            document,
            file_name,
        }
    }

    pub fn read(self) -> Result<(), OsmDataReaderError> {
        let read_start = Instant::now();

        let f =
            File::open(self.file_name).map_err(|error| OsmDataReaderError::FileError { error })?;
        parse_osm_xml(BufReader::new(f), self.document)
            .map_err(|error| OsmDataReaderError::XmlError { error })?;

        let read_duration = read_start.elapsed();
        trace!(
            read_duration_secs = read_duration.as_secs(),
            nodes = self.document.node_count(),
            ways = self.document.way_count(),
            relations = self.document.relation_count(),
            "File read done"
        );

        Ok(())
    }
}

/// Streams `<osm>` XML into `document`. Unknown elements are ignored.
pub fn parse_osm_xml<R: BufRead>(
    source: R,
    document: &mut OsmDocument,
) -> Result<(), OsmXmlReaderError> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);

    let mut current: Option<OpenElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|error| OsmXmlReaderError::Xml { error })?
        {
            Event::Eof => break,
            Event::Start(e) => open_element(&e, false, document, &mut current)?,
            Event::Empty(e) => open_element(&e, true, document, &mut current)?,
            Event::End(e) => {
                if matches!(e.name().as_ref(), b"node" | b"way" | b"relation") {
                    if let Some(element) = current.take() {
                        finish_element(element, document);
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn open_element(
    e: &BytesStart<'_>,
    self_closing: bool,
    document: &mut OsmDocument,
    current: &mut Option<OpenElement>,
) -> Result<(), OsmXmlReaderError> {
    let element = match e.name().as_ref() {
        b"osm" => {
            let attrs = attributes(e)?;
            document.version = attrs.get("version").cloned();
            document.generator = attrs.get("generator").cloned();
            return Ok(());
        }
        b"node" => {
            let attrs = attributes(e)?;
            let id = require(&attrs, "node", "id")?;
            let lat = optional(&attrs, "node", "lat")?;
            let lon = optional(&attrs, "node", "lon")?;
            match (lat, lon) {
                (Some(lat), Some(lon)) => OpenElement::Node(OsmNode {
                    id,
                    lat,
                    lon,
                    tags: HashMap::new(),
                    meta: meta(&attrs, "node")?,
                }),
                _ => {
                    trace!(node_id = id, "Node without position skipped");
                    OpenElement::Skipped
                }
            }
        }
        b"way" => {
            let attrs = attributes(e)?;
            OpenElement::Way(OsmWay {
                id: require(&attrs, "way", "id")?,
                node_refs: Vec::new(),
                tags: HashMap::new(),
                meta: meta(&attrs, "way")?,
            })
        }
        b"relation" => {
            let attrs = attributes(e)?;
            OpenElement::Relation(OsmRelation {
                id: require(&attrs, "relation", "id")?,
                members: Vec::new(),
                tags: HashMap::new(),
                meta: meta(&attrs, "relation")?,
            })
        }
        b"nd" => {
            if let Some(OpenElement::Way(way)) = current {
                let attrs = attributes(e)?;
                way.node_refs.push(require(&attrs, "nd", "ref")?);
            }
            return Ok(());
        }
        b"member" => {
            if let Some(OpenElement::Relation(relation)) = current {
                let attrs = attributes(e)?;
                let member_type = attrs.get("type").map(String::as_str).unwrap_or_default();
                match OsmRelationMemberType::parse(member_type) {
                    Some(member_type) => relation.members.push(OsmRelationMember {
                        member_type,
                        member_ref: require(&attrs, "member", "ref")?,
                        role: attrs.get("role").cloned().unwrap_or_default(),
                    }),
                    None => {
                        trace!(relation_id = relation.id, member_type, "Unknown member type")
                    }
                }
            }
            return Ok(());
        }
        b"tag" => {
            if let Some(tags) = current.as_mut().and_then(|element| element.tags_mut()) {
                let attrs = attributes(e)?;
                if let (Some(key), Some(value)) = (attrs.get("k"), attrs.get("v")) {
                    tags.insert(key.clone(), value.clone());
                }
            }
            return Ok(());
        }
        _ => return Ok(()),
    };

    if self_closing {
        finish_element(element, document);
    } else {
        *current = Some(element);
    }

    Ok(())
}

fn finish_element(element: OpenElement, document: &mut OsmDocument) {
    match element {
        OpenElement::Node(node) => document.insert_node(node),
        OpenElement::Way(way) => document.insert_way(way),
        OpenElement::Relation(relation) => document.insert_relation(relation),
        OpenElement::Skipped => {}
    }
}

fn attributes(e: &BytesStart<'_>) -> Result<HashMap<String, String>, OsmXmlReaderError> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|error| OsmXmlReaderError::Attribute { error })?;
        let value = attr
            .unescape_value()
            .map_err(|error| OsmXmlReaderError::Xml { error })?;
        attrs.insert(
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value.into_owned(),
        );
    }
    Ok(attrs)
}

fn optional<T: FromStr>(
    attrs: &HashMap<String, String>,
    element: &'static str,
    attribute: &'static str,
) -> Result<Option<T>, OsmXmlReaderError> {
    match attrs.get(attribute) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| OsmXmlReaderError::InvalidValue {
                element,
                attribute,
                value: value.clone(),
            }),
    }
}

fn require<T: FromStr>(
    attrs: &HashMap<String, String>,
    element: &'static str,
    attribute: &'static str,
) -> Result<T, OsmXmlReaderError> {
    optional(attrs, element, attribute)?.ok_or(OsmXmlReaderError::MissingAttribute {
        element,
        attribute,
    })
}

fn meta(
    attrs: &HashMap<String, String>,
    element: &'static str,
) -> Result<OsmMeta, OsmXmlReaderError> {
    Ok(OsmMeta {
        version: optional(attrs, element, "version")?,
        changeset: optional(attrs, element, "changeset")?,
        timestamp: attrs.get("timestamp").cloned(),
        user: attrs.get("user").cloned(),
        uid: optional(attrs, element, "uid")?,
        visible: optional(attrs, element, "visible")?,
    })
}
