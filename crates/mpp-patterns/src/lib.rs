//! Life 1.05 pattern file format: a small, self-contained reader/writer
//! decoupled from the PE array — callers are responsible for wrapping
//! coordinates onto the torus and issuing the actual unicast writes.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Errors that can occur reading a Life 1.05 pattern file.
#[derive(Debug)]
pub enum PatternError {
    /// Underlying I/O failure (file not found, permission denied, ...).
    Io(io::Error),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Io(e) => write!(f, "pattern file I/O error: {e}"),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for PatternError {
    fn from(e: io::Error) -> Self {
        PatternError::Io(e)
    }
}

/// Reads a Life 1.05 pattern from `reader`, offsetting every live cell by
/// `(x0, y0)`.
///
/// Lines starting with `#` and blank lines (after trimming `\r\n`) are
/// ignored. Every other line is one grid row: `*` marks a live cell at
/// column `x0 + i` for character position `i`; any other character is
/// dead. The row index increments by one per non-ignored line, starting
/// at `y0`.
pub fn read_life_105(
    x0: i32,
    y0: i32,
    reader: impl BufRead,
) -> Result<BTreeSet<(i32, i32)>, PatternError> {
    let mut dots = BTreeSet::new();
    let mut y = y0;
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        for (i, ch) in trimmed.chars().enumerate() {
            if ch == '*' {
                dots.insert((x0 + i as i32, y));
            }
        }
        y += 1;
    }
    Ok(dots)
}

/// Reads a Life 1.05 pattern from the file at `path`.
pub fn read_life_105_file(
    x0: i32,
    y0: i32,
    path: impl AsRef<Path>,
) -> Result<BTreeSet<(i32, i32)>, PatternError> {
    let file = std::fs::File::open(path)?;
    read_life_105(x0, y0, io::BufReader::new(file))
}

/// Writes `dots` out in Life 1.05 format: a `#Life 1.05` header, a
/// `#P x_min y_min` offset line, then rows `y_min..=y_max`, each row
/// `x_min..=x_max`, using `*` for live and `.` for dead, CRLF-terminated.
///
/// Writing an empty set produces just the header and offset lines.
pub fn write_life_105(dots: &BTreeSet<(i32, i32)>, mut writer: impl Write) -> io::Result<()> {
    write!(writer, "#Life 1.05\r\n")?;

    if dots.is_empty() {
        write!(writer, "#P 0 0\r\n")?;
        return Ok(());
    }
    let x_min = dots.iter().map(|&(x, _)| x).min().unwrap();
    let x_max = dots.iter().map(|&(x, _)| x).max().unwrap();
    let y_min = dots.iter().map(|&(_, y)| y).min().unwrap();
    let y_max = dots.iter().map(|&(_, y)| y).max().unwrap();

    write!(writer, "#P {x_min} {y_min}\r\n")?;
    for y in y_min..=y_max {
        let mut row = String::with_capacity((x_max - x_min + 1).max(0) as usize);
        for x in x_min..=x_max {
            row.push(if dots.contains(&(x, y)) { '*' } else { '.' });
        }
        write!(writer, "{row}\r\n")?;
    }
    Ok(())
}

/// Writes `dots` out to the file at `path` in Life 1.05 format.
pub fn write_life_105_file(dots: &BTreeSet<(i32, i32)>, path: impl AsRef<Path>) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_life_105(dots, io::BufWriter::new(file))
}
