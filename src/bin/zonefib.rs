//! CLI glue: reads a policy CSV and a RIB CSV, resolves every address cell
//! against the linearized FIB, and emits the policy file back out with
//! `{column}_ZONE` columns inserted next to the source/destination
//! columns. Everything in this file is external to the core transform —
//! CSV parsing, argument handling, logging setup, disk caching, and the
//! all-zones/zone-limit/split policy-row mutations.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use zonefib::zone::{reject_reserved_token, RESERVED_TOKEN};
use zonefib::{serialize, Fib, ZoneSet};

const FIB_DISK_CACHE: &str = "zonefib.fib";

/// Annotate firewall policy rows with the zones that would forward their
/// source and destination addresses, given a routing table.
#[derive(Parser, Debug)]
#[command(name = "zonefib", version, about)]
struct Cli {
    /// Policy CSV file to annotate.
    input: PathBuf,

    /// Routing table CSV file (`prefix,zone` rows).
    rib: PathBuf,

    /// Output file path.
    #[arg(short = 'o', long = "output-file", default_value = "zoned.csv")]
    output_file: PathBuf,

    /// Also resolve and annotate the source column, not just destination.
    #[arg(short = 's', long = "source")]
    source: bool,

    /// Keep the `NULL_ROUTE` sentinel in emitted zone lists instead of
    /// stripping it.
    #[arg(short = 'n', long = "null-route")]
    null_route: bool,

    /// Collapse a policy's zone list to `any` when it equals the
    /// (NULL_ROUTE-stripped) total zone set across both families.
    #[arg(short = 'a', long = "all-zones")]
    all_zones: bool,

    /// Collapse to `any` (or split, with `-b`) once a policy's zone count
    /// exceeds this. `0` disables the limit.
    #[arg(short = 'z', long = "zone-limit", default_value_t = 0)]
    zone_limit: usize,

    /// Under `--zone-limit`, emit one row per zone chunk instead of
    /// collapsing to `any`, appending a `SPLIT` column.
    #[arg(short = 'b', long = "split-behavior")]
    split_behavior: bool,

    /// Name of the source address column.
    #[arg(short = '1', long = "source-column", default_value = "source")]
    source_column: String,

    /// Name of the destination address column.
    #[arg(
        short = '2',
        long = "destination-column",
        default_value = "destination"
    )]
    destination_column: String,

    /// Field separator used by both CSV files.
    #[arg(short = 'c', long = "csv-separator", default_value = ",")]
    csv_separator: String,

    /// Separator between multiple addresses within one policy cell.
    #[arg(short = 'r', long = "address-separator", default_value = ";")]
    address_separator: String,

    /// Cache the built FIB to disk and reuse it on a subsequent run.
    #[arg(short = 'p', long = "pickled-fib")]
    pickled_fib: bool,

    /// `tracing-subscriber` filter directive, e.g. `info`, `zonefib=debug`.
    #[arg(short = 'x', long = "debug-level", default_value = "warn")]
    debug_level: String,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Core(#[from] zonefib::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Bincode(#[from] bincode::Error),
    #[error("input contains the reserved token {0:?}")]
    ReservedToken(&'static str),
    #[error("column {0:?} not present in the policy file")]
    MissingColumn(String),
    #[error("output column {0:?} is already present in the policy file")]
    ZoneColumnExists(String),
    #[error("separator {0:?} must be exactly one character")]
    InvalidSeparator(String),
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(&cli.debug_level);

    let fib = load_or_build_fib(&cli)?;
    run(&cli, &fib)
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn single_char(s: &str) -> Result<char, CliError> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CliError::InvalidSeparator(s.to_string())),
    }
}

fn load_or_build_fib(cli: &Cli) -> Result<Fib, CliError> {
    let cache_path = PathBuf::from(FIB_DISK_CACHE);
    if cli.pickled_fib && cache_path.exists() {
        tracing::info!(path = %cache_path.display(), "loading cached FIB");
        let bytes = fs::read(&cache_path)?;
        return Ok(serialize::from_bytes(&bytes)?);
    }

    tracing::info!(path = %cli.rib.display(), "reading RIB");
    let rib_text = fs::read_to_string(&cli.rib)?;
    reject_reserved_token(&rib_text).map_err(|_| CliError::ReservedToken(RESERVED_TOKEN))?;

    let sep = single_char(&cli.csv_separator)?;
    let fib = Fib::build(rib_text.lines(), sep)?;

    if cli.pickled_fib {
        tracing::info!(path = %cache_path.display(), "caching FIB to disk");
        fs::write(&cache_path, serialize::to_bytes(&fib)?)?;
    }

    Ok(fib)
}

fn run(cli: &Cli, fib: &Fib) -> Result<(), CliError> {
    let policy_text = fs::read_to_string(&cli.input)?;
    reject_reserved_token(&policy_text).map_err(|_| CliError::ReservedToken(RESERVED_TOKEN))?;

    let sep = single_char(&cli.csv_separator)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sep as u8)
        .from_reader(policy_text.as_bytes());

    let headers = reader.headers()?.clone();
    let dest_idx = column_index(&headers, &cli.destination_column)?;
    check_zone_column_absent(&headers, &cli.destination_column)?;

    let src_idx = if cli.source {
        let idx = column_index(&headers, &cli.source_column)?;
        check_zone_column_absent(&headers, &cli.source_column)?;
        Some(idx)
    } else {
        None
    };

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let addr_sep = cli.address_separator.as_str();
    let mut expressions: HashSet<String> = HashSet::new();
    for row in &rows {
        for member in row[dest_idx].split(addr_sep) {
            expressions.insert(member.trim().to_string());
        }
        if let Some(idx) = src_idx {
            for member in row[idx].split(addr_sep) {
                expressions.insert(member.trim().to_string());
            }
        }
    }
    let expr_refs: Vec<&str> = expressions.iter().map(String::as_str).collect();
    tracing::info!(count = expr_refs.len(), "resolving distinct addresses");
    let resolved = fib.resolve_batch(expr_refs);

    let total_all = fib.v4.total_zones_stripped.union(&fib.v6.total_zones_stripped);

    let mut out_headers = Vec::with_capacity(headers.len() + 2);
    for (i, h) in headers.iter().enumerate() {
        if Some(i) == src_idx {
            out_headers.push(format!("{}_ZONE", cli.source_column));
        }
        if i == dest_idx {
            out_headers.push(format!("{}_ZONE", cli.destination_column));
        }
        out_headers.push(h.to_string());
    }
    if cli.split_behavior {
        out_headers.push("SPLIT".to_string());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(sep as u8)
        .from_path(&cli.output_file)?;
    writer.write_record(&out_headers)?;

    for row in &rows {
        let dest_chunks = column_chunks(&row[dest_idx], addr_sep, &resolved, cli, &total_all);
        let src_chunks = src_idx.map(|idx| column_chunks(&row[idx], addr_sep, &resolved, cli, &total_all));

        let split_flag = dest_chunks.len() > 1
            || src_chunks.as_ref().is_some_and(|c| c.len() > 1);
        let src_iter = src_chunks.unwrap_or_else(|| vec![Vec::new()]);

        for src_chunk in &src_iter {
            for dest_chunk in &dest_chunks {
                let mut out_row = Vec::with_capacity(row.len() + 2);
                for (i, field) in row.iter().enumerate() {
                    if Some(i) == src_idx {
                        out_row.push(src_chunk.join(addr_sep));
                    }
                    if i == dest_idx {
                        out_row.push(dest_chunk.join(addr_sep));
                    }
                    out_row.push(field.to_string());
                }
                if cli.split_behavior {
                    out_row.push(if split_flag { "true" } else { "false" }.to_string());
                }
                writer.write_record(&out_row)?;
            }
        }
    }

    writer.flush()?;
    tracing::info!(path = %cli.output_file.display(), "wrote annotated policy file");
    Ok(())
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, CliError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| CliError::MissingColumn(name.to_string()))
}

fn check_zone_column_absent(headers: &csv::StringRecord, name: &str) -> Result<(), CliError> {
    let zone_col = format!("{name}_ZONE");
    if headers.iter().any(|h| h == zone_col) {
        return Err(CliError::ZoneColumnExists(name.to_string()));
    }
    Ok(())
}

/// Resolve one policy cell (possibly several addresses joined by
/// `addr_sep`) into the chunked zone lists to emit: a single `["any"]`
/// chunk, a single chunk of every zone, or several chunks under
/// `--zone-limit --split-behavior`.
fn column_chunks(
    cell: &str,
    addr_sep: &str,
    resolved: &HashMap<String, Result<ZoneSet, zonefib::Error>>,
    cli: &Cli,
    total_all_families: &ZoneSet,
) -> Vec<Vec<String>> {
    let mut zones = ZoneSet::new();
    for member in cell.split(addr_sep) {
        let member = member.trim();
        if member.is_empty() {
            continue;
        }
        match resolved.get(member) {
            Some(Ok(z)) => zones.union_with(z),
            Some(Err(error)) => {
                tracing::warn!(member, %error, "failed to resolve address, treating as no zones");
            }
            None => {}
        }
    }

    let visible = if cli.null_route {
        zones
    } else {
        zones.without_null_route()
    };
    let for_check = visible.without_null_route();

    if cli.all_zones && for_check == *total_all_families {
        return vec![vec!["any".to_string()]];
    }

    let sorted: Vec<String> = visible.iter().map(str::to_string).collect();

    if cli.zone_limit > 0 && for_check.len() > cli.zone_limit {
        if cli.split_behavior {
            return sorted.chunks(cli.zone_limit).map(<[String]>::to_vec).collect();
        }
        return vec![vec!["any".to_string()]];
    }

    vec![sorted]
}
