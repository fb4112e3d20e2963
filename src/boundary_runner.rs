use std::{io, path::PathBuf, time::Instant};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn, Level};

use crate::{
    admin::AdminClassifier,
    boundary::BoundaryProcessor,
    geometry::{interior_centroid, Ring},
    osm_data::{DataSource, OsmDataReader, OsmDataReaderError},
    result_writer::{CenterRecord, DataDestination, ResultWriter, ResultWriterError},
    ring_codec::{decode_rings, RingCodecError},
    stitch::{LeftoverPolicy, RingBuilder},
};

#[derive(Debug, thiserror::Error)]
pub enum BoundaryRunnerError {
    #[error("Unsupported input file {filename:?}, expected .osm, .xml or .pbf")]
    InputFileFormatIncorrect { filename: PathBuf },

    #[error("Unsupported output file {filename:?}, expected .json or .csv")]
    OutputFileFormatIncorrect { filename: PathBuf },

    #[error("Failed to read relation list: {error}")]
    RelationList { error: io::Error },

    #[error("Failed to read OSM data: {error}")]
    DataRead { error: OsmDataReaderError },

    #[error("Failed to read rings: {error}")]
    RingRead { error: io::Error },

    #[error("Failed to decode rings: {error}")]
    RingDecode { error: RingCodecError },

    #[error("Failed to build thread pool: {error}")]
    ThreadPool { error: rayon::ThreadPoolBuildError },

    #[error("Failed to write result: {error}")]
    ResultWrite { error: ResultWriterError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[arg(long, global = true, value_name = "LEVEL", default_value_t = Level::INFO)]
    log_level: Level,

    #[command(subcommand)]
    mode: CliMode,
}

#[derive(Subcommand)]
enum CliMode {
    /// Build boundaries for the administrative relations of an OSM extract
    Process {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// One relation id per line, all administrative relations when omitted
        #[arg(long, value_name = "FILE")]
        relations: Option<PathBuf>,

        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also write every ring as JSON, readable by the `centers` mode
        #[arg(long, value_name = "FILE")]
        rings_output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = LeftoverPolicy::AppendUncombined)]
        leftover_ways: LeftoverPolicy,

        #[arg(long, value_name = "N")]
        threads: Option<usize>,
    },
    /// Compute interior centers for stored ring JSON
    Centers {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug)]
pub enum RunnerMode {
    Process {
        data_source: DataSource,
        relations: Option<PathBuf>,
        data_destination: DataDestination,
        rings_output: Option<PathBuf>,
        leftover_policy: LeftoverPolicy,
        threads: Option<usize>,
    },
    Centers {
        input: PathBuf,
        data_destination: DataDestination,
    },
}

pub struct BoundaryRunner {
    mode: RunnerMode,
    log_format: LogFormat,
    log_level: Level,
}

impl BoundaryRunner {
    pub fn init() -> Result<Self, BoundaryRunnerError> {
        let cli = Cli::parse();
        let mode = match cli.mode {
            CliMode::Process {
                input,
                relations,
                output,
                rings_output,
                leftover_ways,
                threads,
            } => RunnerMode::Process {
                data_source: get_data_source(input)?,
                relations,
                data_destination: get_data_destination(output)?,
                rings_output,
                leftover_policy: leftover_ways,
                threads,
            },
            CliMode::Centers { input, output } => RunnerMode::Centers {
                input,
                data_destination: get_data_destination(output)?,
            },
        };

        Ok(Self {
            mode,
            log_format: cli.log_format,
            log_level: cli.log_level,
        })
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }

    #[tracing::instrument(skip(self))]
    fn run_process(
        &self,
        data_source: &DataSource,
        relations: Option<&PathBuf>,
        data_destination: &DataDestination,
        rings_output: Option<&PathBuf>,
        leftover_policy: LeftoverPolicy,
        threads: Option<usize>,
    ) -> Result<(), BoundaryRunnerError> {
        let startup_start = Instant::now();

        let relation_ids = match relations {
            Some(file) => Some(read_relation_ids(file)?),
            None => None,
        };

        let document = OsmDataReader::new(data_source.clone())
            .read_data()
            .map_err(|error| BoundaryRunnerError::DataRead { error })?;

        let processor = BoundaryProcessor::new(
            &document,
            AdminClassifier::new(),
            RingBuilder::new(leftover_policy),
        );
        let report = match threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|error| BoundaryRunnerError::ThreadPool { error })?
                .install(|| processor.process(relation_ids.as_deref())),
            None => processor.process(relation_ids.as_deref()),
        };

        ResultWriter::write_report(data_destination, &report)
            .map_err(|error| BoundaryRunnerError::ResultWrite { error })?;
        if let Some(file) = rings_output {
            ResultWriter::write_rings(file, &report)
                .map_err(|error| BoundaryRunnerError::ResultWrite { error })?;
        }

        info!(
            duration_secs = startup_start.elapsed().as_secs(),
            boundaries = report.boundaries.len(),
            skipped = report.skipped.len(),
            "Process done"
        );

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn run_centers(
        &self,
        input: &PathBuf,
        data_destination: &DataDestination,
    ) -> Result<(), BoundaryRunnerError> {
        let json =
            std::fs::read_to_string(input).map_err(|error| BoundaryRunnerError::RingRead { error })?;
        let rings =
            decode_rings(&json).map_err(|error| BoundaryRunnerError::RingDecode { error })?;

        let centers = compute_centers(&rings);
        info!(rings = rings.len(), centers = centers.len(), "Centers computed");

        ResultWriter::write_centers(data_destination, &centers)
            .map_err(|error| BoundaryRunnerError::ResultWrite { error })
    }

    #[tracing::instrument(skip(self))]
    pub fn run(&self) -> Result<(), BoundaryRunnerError> {
        match &self.mode {
            RunnerMode::Process {
                data_source,
                relations,
                data_destination,
                rings_output,
                leftover_policy,
                threads,
            } => self.run_process(
                data_source,
                relations.as_ref(),
                data_destination,
                rings_output.as_ref(),
                *leftover_policy,
                *threads,
            ),
            RunnerMode::Centers {
                input,
                data_destination,
            } => self.run_centers(input, data_destination),
        }
    }
}

fn compute_centers(rings: &[Ring]) -> Vec<CenterRecord> {
    rings
        .iter()
        .enumerate()
        .filter_map(|(ring_index, ring)| match interior_centroid(ring) {
            Some(center) => Some(CenterRecord {
                ring_index,
                lat: center.lat,
                lon: center.lon,
                resolution: center.resolution,
            }),
            None => {
                warn!(ring_index, "Empty ring has no center");
                None
            }
        })
        .collect()
}

/// One id per line. Blank lines are skipped, unparsable ones are logged and skipped.
pub fn parse_relation_ids(content: &str) -> Vec<i64> {
    content
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .filter_map(|(line_idx, line)| match line.parse::<i64>() {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(line = line_idx + 1, value = line, error = ?error, "Skipping invalid relation id");
                None
            }
        })
        .collect()
}

fn read_relation_ids(file: &PathBuf) -> Result<Vec<i64>, BoundaryRunnerError> {
    let content =
        std::fs::read_to_string(file).map_err(|error| BoundaryRunnerError::RelationList { error })?;
    let ids = parse_relation_ids(&content);
    info!(file = ?file, relations = ids.len(), "Relation list read");
    Ok(ids)
}

fn get_data_source(file: PathBuf) -> Result<DataSource, BoundaryRunnerError> {
    if let Some(ext) = file.extension() {
        if ext == "osm" || ext == "xml" {
            return Ok(DataSource::XmlFile { file });
        } else if ext == "pbf" {
            return Ok(DataSource::PbfFile { file });
        }
    }
    Err(BoundaryRunnerError::InputFileFormatIncorrect { filename: file })
}

fn get_data_destination(file: Option<PathBuf>) -> Result<DataDestination, BoundaryRunnerError> {
    let file = match file {
        None => return Ok(DataDestination::Stdout),
        Some(file) => file,
    };
    if let Some(ext) = file.extension() {
        if ext == "json" {
            return Ok(DataDestination::Json { file });
        } else if ext == "csv" {
            return Ok(DataDestination::Csv { file });
        }
    }
    Err(BoundaryRunnerError::OutputFileFormatIncorrect { filename: file })
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;
    use crate::{
        geometry::CenterResolution,
        test_utils::{l_shape, square},
    };

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_process_flags() {
        let cli = Cli::try_parse_from([
            "admin-boundary-builder",
            "--log-format",
            "json",
            "process",
            "--input",
            "vn.osm.pbf",
            "--rings-output",
            "rings.json",
            "--leftover-ways",
            "separate",
            "--threads",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level, Level::INFO);
        match cli.mode {
            CliMode::Process {
                input,
                leftover_ways,
                threads,
                output,
                rings_output,
                ..
            } => {
                assert_eq!(rings_output, Some(PathBuf::from("rings.json")));
                assert_eq!(input, PathBuf::from("vn.osm.pbf"));
                assert_eq!(leftover_ways, LeftoverPolicy::SeparateRings);
                assert_eq!(threads, Some(4));
                assert_eq!(output, None);
            }
            CliMode::Centers { .. } => panic!("expected process mode"),
        }
    }

    #[test]
    fn relation_ids_skip_blank_and_invalid_lines() {
        let ids = parse_relation_ids("1903516\n\n  1901020 \nabc\n-5\n");
        assert_eq!(ids, vec![1903516, 1901020, -5]);
    }

    #[test]
    fn data_source_by_extension() {
        assert_eq!(
            get_data_source(PathBuf::from("vietnam-latest.osm.pbf")).unwrap(),
            DataSource::PbfFile {
                file: PathBuf::from("vietnam-latest.osm.pbf")
            }
        );
        assert_eq!(
            get_data_source(PathBuf::from("relation.osm")).unwrap(),
            DataSource::XmlFile {
                file: PathBuf::from("relation.osm")
            }
        );
        assert!(matches!(
            get_data_source(PathBuf::from("relation.geojson")),
            Err(BoundaryRunnerError::InputFileFormatIncorrect { .. })
        ));
    }

    #[test]
    fn data_destination_by_extension() {
        assert_eq!(get_data_destination(None).unwrap(), DataDestination::Stdout);
        assert_eq!(
            get_data_destination(Some(PathBuf::from("out.csv"))).unwrap(),
            DataDestination::Csv {
                file: PathBuf::from("out.csv")
            }
        );
        assert!(matches!(
            get_data_destination(Some(PathBuf::from("out.gpx"))),
            Err(BoundaryRunnerError::OutputFileFormatIncorrect { .. })
        ));
    }

    #[test]
    fn centers_for_stored_rings() {
        let centers = compute_centers(&[square(2.0), Vec::new(), l_shape()]);
        assert_eq!(centers.len(), 2);
        assert_eq!(centers[0].ring_index, 0);
        assert_eq!(centers[0].resolution, CenterResolution::Centroid);
        assert_eq!(centers[1].ring_index, 2);
        assert!(matches!(
            centers[1].resolution,
            CenterResolution::Interpolated { .. }
        ));
    }
}
