//! CSV persistence of design points.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use pcx_core::{
    Convention, DesignPoint, Diagnostics, FrontierMode, ParetoFrontier, PcxError, PcxResult,
};
use tracing::debug;

const MARKER: &str = "# pcx frontier";
const COLUMNS: &str = "# primary,volume,cost,tag...";

/// Points recovered by a lenient load plus one issue per skipped row.
#[derive(Debug, Clone, Default)]
pub struct LenientLoad {
    pub points: Vec<DesignPoint>,
    pub diagnostics: Diagnostics,
}

fn csv_error(err: csv::Error) -> PcxError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => PcxError::Io(io),
        _ => PcxError::Parse(message),
    }
}

fn mode_name(mode: FrontierMode) -> &'static str {
    match mode {
        FrontierMode::Pruning => "pruning",
        FrontierMode::Archival => "archival",
    }
}

fn write_records<'a, I, W>(points: I, writer: W) -> PcxResult<usize>
where
    I: IntoIterator<Item = &'a DesignPoint>,
    W: Write,
{
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    let mut written = 0;
    for point in points {
        let mut record = Vec::with_capacity(3 + point.tag().len());
        record.push(point.primary().to_string());
        record.push(point.volume().to_string());
        record.push(point.cost().to_string());
        record.extend(point.tag().iter().cloned());
        wtr.write_record(&record).map_err(csv_error)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

/// Write points with the column comment line. Returns the row count.
pub fn write_points_csv<'a, I, W>(points: I, mut writer: W) -> PcxResult<usize>
where
    I: IntoIterator<Item = &'a DesignPoint>,
    W: Write,
{
    writeln!(writer, "{COLUMNS}")?;
    write_records(points, writer)
}

/// Write a frontier to `path`, best primary objective first.
pub fn write_frontier_csv(frontier: &ParetoFrontier, path: &Path) -> PcxResult<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "{MARKER} convention={} mode={}",
        frontier.convention(),
        mode_name(frontier.mode())
    )?;
    let written = write_points_csv(frontier.sorted_by_primary(), out)?;
    debug!(path = %path.display(), rows = written, "wrote frontier csv");
    Ok(written)
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(input)
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

fn parse_record(record: &StringRecord) -> Result<DesignPoint, String> {
    if record.len() < 3 {
        return Err(format!("expected at least 3 fields, found {}", record.len()));
    }
    let number = |idx: usize, name: &str| {
        let raw = record[idx].trim();
        raw.parse::<f64>()
            .map_err(|_| format!("{name} '{raw}' is not a number"))
    };
    let primary = number(0, "primary")?;
    let volume = number(1, "volume")?;
    let cost = number(2, "cost")?;
    let tag = record.iter().skip(3).map(str::to_string).collect();
    DesignPoint::new(primary, volume, cost, tag).map_err(|err| err.to_string())
}

/// Strict load: the first malformed row fails the whole read.
pub fn read_points_csv<R: Read>(input: R) -> PcxResult<Vec<DesignPoint>> {
    let mut points = Vec::new();
    for result in reader(input).records() {
        let record = result.map_err(csv_error)?;
        let point = parse_record(&record)
            .map_err(|msg| PcxError::Parse(format!("line {}: {msg}", line_of(&record))))?;
        points.push(point);
    }
    Ok(points)
}

/// Efficiency rows must lie in [0, 1]; loss rows are only bounded below.
fn check_convention(point: &DesignPoint, convention: Convention) -> Result<(), String> {
    if convention == Convention::Efficiency && point.primary() > 1.0 {
        return Err(format!("efficiency {} above 1", point.primary()));
    }
    Ok(())
}

/// Lenient load: malformed rows, and rows out of range for `convention`,
/// are skipped and reported.
pub fn read_points_csv_lenient<R: Read>(input: R, convention: Convention) -> LenientLoad {
    let mut load = LenientLoad::default();
    for result in reader(input).records() {
        match result {
            Ok(record) => {
                let row = parse_record(&record).and_then(|point| {
                    check_convention(&point, convention)?;
                    Ok(point)
                });
                match row {
                    Ok(point) => load.points.push(point),
                    Err(msg) => {
                        load.diagnostics
                            .add_error_at_line("frontier_row", &msg, line_of(&record))
                    }
                }
            }
            Err(err) => {
                let fatal = err.is_io_error();
                match err.position() {
                    Some(pos) => load.diagnostics.add_error_at_line(
                        "csv",
                        &err.to_string(),
                        pos.line() as usize,
                    ),
                    None => load.diagnostics.add_error("csv", &err.to_string()),
                }
                if fatal {
                    break;
                }
            }
        }
    }
    load
}

/// Load a persisted frontier, re-applying the dominance rule.
pub fn load_frontier_csv(
    path: &Path,
    convention: Convention,
    mode: FrontierMode,
) -> PcxResult<ParetoFrontier> {
    let points = read_points_csv(File::open(path)?)
        .map_err(|err| match err {
            PcxError::Parse(msg) => PcxError::Parse(format!("{}: {msg}", path.display())),
            other => other,
        })?;
    for point in &points {
        check_convention(point, convention)
            .map_err(|msg| PcxError::Validation(format!("{}: {msg}", path.display())))?;
    }
    let loaded = points.len();
    let frontier = ParetoFrontier::from_points(convention, mode, points);
    debug!(path = %path.display(), loaded, kept = frontier.len(), "loaded frontier csv");
    Ok(frontier)
}

/// Convention recorded in the marker line written by
/// [`write_frontier_csv`], if any.
pub fn detect_convention(path: &Path) -> PcxResult<Option<Convention>> {
    let mut first = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first)?;
    let Some(rest) = first.trim().strip_prefix(MARKER) else {
        return Ok(None);
    };
    rest.split_whitespace()
        .find_map(|field| field.strip_prefix("convention="))
        .map(str::parse)
        .transpose()
}
