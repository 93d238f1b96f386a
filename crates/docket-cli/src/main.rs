//! docket - exhibit numbering and citation tool
//!
//! Thin front end over `docket-core`. Every invocation works on a fresh
//! in-memory case built from its arguments.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docket_citation::{NotFoundReason, Resolution};
use docket_core::{CaseDirectory, DocketConfig, FileRecord};
use docket_ident::{AutoDetector, ExhibitNumber, Identifier, Sequencer};
use docket_registry::{CaseId, FileAttachment, FileId};

/// docket - exhibit numbering and citation tool
#[derive(Parser, Debug)]
#[command(name = "docket")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect exhibit identifiers in filenames
    Detect {
        /// Filenames to inspect
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Propose the next unused identifier
    Next {
        /// Identifiers already in use
        ids: Vec<String>,
    },

    /// Print exhibit numbers in display order
    Sort {
        /// Exhibit numbers, valid or not
        ids: Vec<String>,
    },

    /// Auto-assign files to exhibits by filename
    Assign {
        /// Case the files belong to
        #[arg(long)]
        case: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Filenames (also used as file ids)
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Resolve a citation reference
    Resolve {
        /// Case to resolve in
        #[arg(long)]
        case: String,

        /// Exhibit files as NUMBER=FILE[@PAGE]; repeat for more
        #[arg(long = "file", value_parser = parse_file_spec)]
        files: Vec<FileSpec>,

        /// Primary file as NUMBER=FILE[@PAGE]
        #[arg(long = "primary", value_parser = parse_file_spec)]
        primary: Vec<FileSpec>,

        /// Print the target as JSON
        #[arg(long)]
        json: bool,

        /// Reference such as `12B` or `12B:4`
        reference: String,
    },
}

#[derive(Debug, Clone)]
struct FileSpec {
    number: ExhibitNumber,
    file: String,
    page: Option<u32>,
}

fn parse_file_spec(raw: &str) -> Result<FileSpec, String> {
    let (number, rest) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NUMBER=FILE, got '{raw}'"))?;
    let (file, page) = match rest.rsplit_once('@') {
        Some((file, page)) => {
            let page: u32 = page
                .parse()
                .map_err(|_| format!("invalid page '{page}' in '{raw}'"))?;
            (file, Some(page))
        }
        None => (rest, None),
    };
    if file.is_empty() {
        return Err(format!("missing file in '{raw}'"));
    }
    Ok(FileSpec {
        number: ExhibitNumber::from_raw(number),
        file: file.to_string(),
        page,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DocketConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => DocketConfig::default(),
    };
    if cli.log_json {
        config.logging.json = true;
    }
    docket_core::logging::init(&config.logging).context("initialising logging")?;

    tracing::debug!("Running {:?}", cli.command);

    let output = run(config, cli.command)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

/// Execute one subcommand and render its stdout text
fn run(config: DocketConfig, command: Commands) -> Result<String> {
    match command {
        Commands::Detect { files } => Ok(detect(&config, &files)),
        Commands::Next { ids } => next(&config, &ids),
        Commands::Sort { ids } => Ok(sort(&ids)),
        Commands::Assign { case, json, files } => assign(config, &case, json, &files),
        Commands::Resolve {
            case,
            files,
            primary,
            json,
            reference,
        } => resolve(config, &case, &files, &primary, json, &reference),
    }
}

fn detect(config: &DocketConfig, files: &[String]) -> String {
    let detector = AutoDetector::with_config(config.detector);
    detector
        .detect_all(files.iter().map(String::as_str))
        .into_iter()
        .map(|(name, found)| match found {
            Some(identifier) => format!("{name}\t{identifier}"),
            None => format!("{name}\t-"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn next(config: &DocketConfig, ids: &[String]) -> Result<String> {
    let existing = ids
        .iter()
        .map(|raw| docket_ident::parse(raw))
        .collect::<Result<Vec<Identifier>, _>>()
        .context("reading existing identifiers")?;

    let sequencer = match config.registry.number_ceiling {
        Some(ceiling) => Sequencer::with_ceiling(ceiling),
        None => Sequencer::new(),
    };
    Ok(sequencer.next(&existing)?.to_string())
}

fn sort(ids: &[String]) -> String {
    let mut numbers: Vec<ExhibitNumber> = ids.iter().map(|raw| ExhibitNumber::from_raw(raw)).collect();
    numbers.sort();
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn assign(config: DocketConfig, case: &str, json: bool, files: &[String]) -> Result<String> {
    let case_id = CaseId::new(case);
    let records: Vec<FileRecord> = files
        .iter()
        .map(|name| FileRecord::new(name.as_str(), name.as_str(), case_id.clone()))
        .collect();

    let directory = CaseDirectory::new(config);
    let report = directory
        .open(&case_id)
        .auto_assign(&records)
        .context("auto-assigning files")?;

    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut lines: Vec<String> = report
        .assignments
        .iter()
        .map(|a| format!("{}\t{}", a.file_name, a.identifier))
        .collect();
    lines.extend(report.undetected.iter().map(|file| format!("{file}\t-")));
    lines.push(format!(
        "{} exhibits created, {} files attached, {} undetected",
        report.exhibits_created,
        report.files_attached,
        report.undetected.len()
    ));
    Ok(lines.join("\n"))
}

fn resolve(
    config: DocketConfig,
    case: &str,
    files: &[FileSpec],
    primary: &[FileSpec],
    json: bool,
    reference: &str,
) -> Result<String> {
    let case_id = CaseId::new(case);
    let directory = CaseDirectory::new(config);
    let services = directory.open(&case_id);

    let specs = files.iter().map(|s| (s, false)).chain(primary.iter().map(|s| (s, true)));
    for (spec, as_primary) in specs {
        let mut request =
            FileAttachment::new(FileId::new(spec.file.as_str()), spec.number.clone()).primary(as_primary);
        if let Some(page) = spec.page {
            request = request.with_page(page);
        }
        services.registry().attach(request)?;
    }

    match services.resolver().resolve(reference) {
        Resolution::Found(target) => {
            if json {
                let value = serde_json::json!({
                    "reference": reference.trim(),
                    "exhibit_id": target.exhibit_id.to_string(),
                    "file_id": target.file_id,
                    "page": target.page,
                });
                return Ok(serde_json::to_string_pretty(&value)?);
            }
            Ok(match target.page {
                Some(page) => format!("{}\tpage {page}", target.file_id),
                None => target.file_id.to_string(),
            })
        }
        Resolution::NotFound(reason) => match reason {
            NotFoundReason::MalformedReference(text) => bail!("malformed reference '{text}'"),
            NotFoundReason::UnknownExhibit(number) => bail!("no exhibit {number} in case {case}"),
            NotFoundReason::NoFiles(number) => bail!("exhibit {number} has no files"),
        },
    }
}
