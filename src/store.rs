// src/store.rs
//
// Persisted catalog: one row per rider.
//
//   Name, Team, Price, Type, <event code>..., Total
//
// Header row required. Column names are matched case-insensitively (Dutch
// names from older sheets accepted). Every column that is not one of the
// fixed ones is an event code; Total is derived and ignored on load.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use tracing::info;

use crate::catalog::{Catalog, Entity, aggregate, normalize_name};
use crate::csv::{Delim, parse_rows};
use crate::{Error, Result};

pub const COL_NAME: &str = "Name";
pub const COL_GROUP: &str = "Team";
pub const COL_COST: &str = "Price";
pub const COL_CATEGORY: &str = "Type";
pub const COL_TOTAL: &str = "Total";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    Name,
    Group,
    Cost,
    Category,
    Total,
    Event,
    Skip,
}

fn classify(header: &str) -> Column {
    match header.trim().to_lowercase().as_str() {
        "name" | "naam" => Column::Name,
        "team" | "group" | "ploeg" => Column::Group,
        "price" | "prijs" | "cost" => Column::Cost,
        "type" | "category" => Column::Category,
        "total" | "totaal" | "totaal_score" => Column::Total,
        "" => Column::Skip,
        _ => Column::Event,
    }
}

/// Read a catalog file; delimiter from the extension.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path)?;
    let catalog = parse_catalog(&text, Delim::from_path(path))?;
    info!("Store: loaded {} riders from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Parse catalog text. Any structural problem rejects the whole file.
pub fn parse_catalog(text: &str, delim: Delim) -> Result<Catalog> {
    let mut rows = parse_rows(text, delim.sep()).into_iter();
    let header = rows.next().ok_or_else(|| Error::malformed(0, "empty file, header row required"))?;

    let kinds: Vec<Column> = header.iter().map(|h| classify(h)).collect();
    let find = |want: Column| -> Result<Option<usize>> {
        let mut hits = kinds.iter().enumerate().filter(|(_, k)| **k == want).map(|(i, _)| i);
        let first = hits.next();
        if hits.next().is_some() {
            return Err(Error::malformed(0, format!("more than one {want:?} column")));
        }
        Ok(first)
    };

    let name_ix = find(Column::Name)?.ok_or_else(|| Error::malformed(0, "missing Name column"))?;
    let cost_ix = find(Column::Cost)?.ok_or_else(|| Error::malformed(0, "missing Price column"))?;
    let group_ix = find(Column::Group)?;
    let category_ix = find(Column::Category)?;

    let mut events: Vec<(usize, String)> = Vec::new();
    let mut codes_seen = HashSet::new();
    for (i, kind) in kinds.iter().enumerate() {
        if *kind != Column::Event { continue; }
        let code = s!(header[i].trim());
        if !codes_seen.insert(code.clone()) {
            return Err(Error::malformed(0, format!("duplicate event column '{code}'")));
        }
        events.push((i, code));
    }

    let mut names = HashSet::new();
    let mut entities = Vec::new();

    for (n, cells) in rows.enumerate() {
        let row = n + 1;
        if cells.len() > header.len() && cells[header.len()..].iter().any(|c| !c.trim().is_empty()) {
            return Err(Error::malformed(row, format!("{} cells, header has {}", cells.len(), header.len())));
        }
        let cell = |i: usize| cells.get(i).map(|c| c.trim()).unwrap_or("");

        let raw_name = cell(name_ix);
        if raw_name.is_empty() {
            return Err(Error::malformed(row, "missing name"));
        }
        let name = normalize_name(raw_name);
        if !names.insert(name.clone()) {
            return Err(Error::malformed(row, format!("duplicate rider '{name}'")));
        }

        let cost_cell = cell(cost_ix);
        if cost_cell.is_empty() {
            return Err(Error::malformed(row, format!("missing price for '{name}'")));
        }
        let cost = parse_amount(cost_cell).ok_or_else(|| {
            Error::malformed(row, format!("bad price '{cost_cell}' for '{name}'"))
        })?;

        let mut entity = Entity {
            name,
            group: group_ix.map(|i| s!(cell(i))).unwrap_or_default(),
            cost,
            category: category_ix.map(|i| s!(cell(i))).unwrap_or_default(),
            scores: Default::default(),
        };
        for (i, code) in &events {
            let raw = cell(*i);
            let pts = if raw.is_empty() {
                0.0
            } else {
                parse_amount(raw).ok_or_else(|| {
                    Error::malformed(row, format!("bad {code} value '{raw}' for '{}'", entity.name))
                })?
            };
            entity.scores.insert(code.clone(), pts);
        }
        entities.push(entity);
    }

    Ok(Catalog::from_entities(entities))
}

/// Finite, non-negative number.
fn parse_amount(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Event columns for saving: `known` first (given order), then any other
/// code in the catalog, sorted.
pub fn column_codes(catalog: &Catalog, known: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut seen = BTreeSet::new();
    for code in known {
        if seen.insert(code.as_str()) { out.push(code.clone()); }
    }
    for code in catalog.event_codes() {
        if seen.insert(code) { out.push(s!(code)); }
    }
    out
}

/// Header + rows, every event cell present (0 where the rider has none).
pub fn catalog_table(catalog: &Catalog, known: &[String]) -> (Vec<String>, Vec<Vec<String>>) {
    let codes = column_codes(catalog, known);

    let mut headers = vec![s!(COL_NAME), s!(COL_GROUP), s!(COL_COST), s!(COL_CATEGORY)];
    headers.extend(codes.iter().cloned());
    headers.push(s!(COL_TOTAL));

    let rows = catalog
        .iter()
        .map(|e| {
            let mut row = Vec::with_capacity(headers.len());
            row.push(e.name.clone());
            row.push(e.group.clone());
            row.push(e.cost.to_string());
            row.push(e.category.clone());
            row.extend(codes.iter().map(|c| e.score(c).to_string()));
            row.push(e.total_score().to_string());
            row
        })
        .collect();

    (headers, rows)
}

/// Write the catalog, zero-filling every event column.
pub fn save_catalog(path: &Path, catalog: &Catalog, known: &[String]) -> Result<()> {
    let (headers, rows) = catalog_table(catalog, known);
    crate::file::write_table(path, &headers, &rows, Delim::from_path(path).sep())?;
    info!("Store: saved {} riders × {} columns → {}", rows.len(), headers.len(), path.display());
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub entities: usize,
    pub events: usize,
    /// Highest total, ties by name.
    pub favourite: Option<(String, f64)>,
}

pub fn summary(catalog: &Catalog) -> Summary {
    Summary {
        entities: catalog.len(),
        events: catalog.event_codes().len(),
        favourite: aggregate::rank(catalog)
            .first()
            .map(|r| (r.entity.name.clone(), r.total)),
    }
}
