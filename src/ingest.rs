// src/ingest.rs
//
// Event sources → observations → catalog.
//
// A source is a locally saved startlist: an HTML page (`.html`/`.htm`) or a
// plain list with one raw name per line. A source that cannot be read, or
// that yields no names, is reported and contributes nothing; the other
// events still merge.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::catalog::{Catalog, Merger, Observation};
use crate::progress::Progress;
use crate::specs;
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventSource {
    pub code: String,
    pub path: PathBuf,
}

impl EventSource {
    pub fn new(code: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { code: code.into(), path: path.into() }
    }
}

/// `CODE=path/to/startlist.html`
impl FromStr for EventSource {
    type Err = Error;

    fn from_str(arg: &str) -> Result<Self> {
        let (code, path) = arg
            .split_once('=')
            .ok_or_else(|| Error::Config(format!("expected CODE=PATH, got '{arg}'")))?;
        let (code, path) = (code.trim(), path.trim());
        if code.is_empty() || path.is_empty() {
            return Err(Error::Config(format!("expected CODE=PATH, got '{arg}'")));
        }
        Ok(Self::new(code, path))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceStatus {
    /// Names found.
    Ok(usize),
    /// Readable but no names in it.
    Empty,
    Unavailable(String),
}

impl SourceStatus {
    pub fn is_ok(&self) -> bool { matches!(self, SourceStatus::Ok(_)) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// One entry per source, input order.
    pub events: Vec<(String, SourceStatus)>,
}

impl IngestReport {
    /// False when every source failed or was empty.
    pub fn found_any(&self) -> bool {
        self.events.iter().any(|(_, st)| st.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &SourceStatus)> {
        self.events.iter().filter(|(_, st)| !st.is_ok()).map(|(c, st)| (c.as_str(), st))
    }
}

fn is_html(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("html" | "htm")
    )
}

/// Raw names from one source file, page order.
pub fn read_names(path: &Path) -> std::io::Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    if is_html(path) {
        return Ok(specs::startlist::extract_names(&text));
    }
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect())
}

/// Read one source. Never fails: problems end up in the status.
pub fn observe(src: &EventSource) -> (Observation, SourceStatus) {
    match read_names(&src.path) {
        Ok(names) => {
            let obs = Observation::new(&*src.code, names);
            let status = if obs.names.is_empty() {
                warn!("Ingest: {} ({}): no riders found", src.code, src.path.display());
                SourceStatus::Empty
            } else {
                SourceStatus::Ok(obs.names.len())
            };
            (obs, status)
        }
        Err(e) => {
            warn!("Ingest: {} ({}): {e}", src.code, src.path.display());
            (Observation::new(&*src.code, Vec::<String>::new()), SourceStatus::Unavailable(e.to_string()))
        }
    }
}

/// Read each source and merge it into `base` before reading the next.
pub fn run(
    base: Catalog,
    sources: &[EventSource],
    merger: &Merger,
    mut progress: Option<&mut dyn Progress>,
) -> (Catalog, IngestReport) {
    if let Some(p) = progress.as_deref_mut() { p.begin(sources.len()); }

    let mut catalog = base;
    let mut report_out = IngestReport::default();

    for src in sources {
        let (obs, status) = observe(src);
        if let Some(p) = progress.as_deref_mut() { report(p, &src.code, &status); }
        catalog = merger.merge(catalog, &obs);
        report_out.events.push((src.code.clone(), status));
    }

    let usable = report_out.events.iter().filter(|(_, st)| st.is_ok()).count();
    info!("Ingest: {} events, {usable} usable, catalog now {} riders", sources.len(), catalog.len());
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("{usable} of {} events usable, {} riders", sources.len(), catalog.len()));
        p.finish();
    }
    (catalog, report_out)
}

fn report(p: &mut dyn Progress, code: &str, status: &SourceStatus) {
    match status {
        SourceStatus::Ok(n) => p.item_done(code, *n),
        SourceStatus::Empty => p.item_failed(code, "no riders found"),
        SourceStatus::Unavailable(reason) => p.item_failed(code, reason),
    }
}
