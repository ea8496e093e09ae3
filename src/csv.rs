// src/csv.rs
use std::io::{self, Write};
use std::mem::take;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delim {
    Csv,
    Tsv,
}

impl Delim {
    pub fn sep(self) -> char {
        match self { Delim::Csv => ',', Delim::Tsv => '\t' }
    }

    /// `.tsv` → tab; anything else → comma.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => Delim::Tsv,
            _ => Delim::Csv,
        }
    }
}

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant). Blank lines are skipped.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // doubled quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without newline, even if quotes were unterminated
    row.push(field);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }

    rows
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header + rows as one string.
pub fn rows_to_string(headers: &[String], rows: &[Vec<String>], sep: char) -> String {
    let mut buf: Vec<u8> = Vec::new();

    // Vec<u8> writes cannot fail
    let _ = write_row(&mut buf, headers, sep);
    for r in rows {
        let _ = write_row(&mut buf, r, sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quotes_crlf_and_blank_lines() {
        let text = "Name,Team\r\n\"Pogacar, Tadej\",UAE\r\n\r\n\"He said \"\"go\"\"\",X";
        assert_eq!(parse_rows(text, ','), vec![
            vec!["Name", "Team"],
            vec!["Pogacar, Tadej", "UAE"],
            vec!["He said \"go\"", "X"],
        ]);
    }

    #[test]
    fn parse_keeps_empty_cells() {
        assert_eq!(parse_rows("a,,c\n", ','), vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn parse_strips_bom_and_reads_tabs() {
        assert_eq!(parse_rows("\u{feff}a\tb\n", '\t'), vec![vec!["a", "b"]]);
    }

    #[test]
    fn write_quotes_only_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["plain", "with,comma", "q\"uote"], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "plain,\"with,comma\",\"q\"\"uote\"\n");
    }

    #[test]
    fn delim_from_extension() {
        assert_eq!(Delim::from_path(Path::new("x/riders.TSV")), Delim::Tsv);
        assert_eq!(Delim::from_path(Path::new("x/riders.csv")), Delim::Csv);
        assert_eq!(Delim::from_path(Path::new("riders")), Delim::Csv);
    }
}
