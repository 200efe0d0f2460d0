//! This module implements [`SpectrumTable`], a mapping from discrete wavelengths to the three color
//! matching coefficients x̄, ȳ, and z̄ at that wavelength. Tables are loaded once, from a whitespace-
//! or comma-separated text file, a headered CSV file, or synthesized from the analytic observer in
//! [`observer`], and are never modified afterwards: share one behind an `Arc`.
//!
//! Lookups are exact. There is no interpolation between neighboring wavelengths, so callers are
//! expected to quantize wavelengths to the table's spacing (1nm for the usual tables) first.
//!
//! [`SpectrumTable`]: struct.SpectrumTable.html
//! [`observer`]: ../observer/index.html

use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use csv;
use regex::Regex;

use observer;

lazy_static! {
    /// Fields are separated by any run of spaces, tabs, and commas.
    static ref SEPARATORS: Regex = Regex::new(r"[ \t,]+").unwrap();
}

/// Errors that stop a table from loading. Lines that merely look like they aren't data (too few
/// fields, or a first field that isn't a number) are skipped instead, so that headers and comments
/// don't need special treatment.
#[derive(Debug)]
pub enum SpectrumError {
    /// The resource could not be opened or read.
    Io(io::Error),
    /// A CSV record was malformed or missing a column.
    Csv(csv::Error),
    /// A line started with a valid wavelength, but one of the following fields was not a number.
    InvalidCoefficient {
        /// The 1-based line number.
        line: usize,
        /// The offending field.
        token: String,
    },
    /// A line started with a valid wavelength, but had fewer than three coefficients after it.
    MissingCoefficients {
        /// The 1-based line number.
        line: usize,
        /// How many coefficients were present.
        found: usize,
    },
}

impl fmt::Display for SpectrumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SpectrumError::Io(ref e) => write!(f, "could not read spectrum data: {}", e),
            SpectrumError::Csv(ref e) => write!(f, "invalid CSV spectrum data: {}", e),
            SpectrumError::InvalidCoefficient { line, ref token } => write!(
                f,
                "line {}: coefficient {:?} is not a number",
                line, token
            ),
            SpectrumError::MissingCoefficients { line, found } => write!(
                f,
                "line {}: expected 3 coefficients, found {}",
                line, found
            ),
        }
    }
}

impl Error for SpectrumError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            SpectrumError::Io(ref e) => Some(e),
            SpectrumError::Csv(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SpectrumError {
    fn from(e: io::Error) -> SpectrumError {
        SpectrumError::Io(e)
    }
}

impl From<csv::Error> for SpectrumError {
    fn from(e: csv::Error) -> SpectrumError {
        SpectrumError::Csv(e)
    }
}

/// A wavelength used as a table key. Keys are always finite, so the total order on floats agrees
/// with the usual one.
#[derive(Debug, Copy, Clone)]
struct Key(f64);

impl Key {
    /// Folds -0 into 0, which the total order would otherwise keep apart.
    fn new(wavelength: f64) -> Key {
        Key(wavelength + 0.0)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Key) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Key) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Key) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// One record of a headered CSV file, such as `wavelength,xbar,ybar,zbar`.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    wavelength: f64,
    xbar: f64,
    ybar: f64,
    zbar: f64,
}

/// A read-only table of color matching coefficients `[x̄, ȳ, z̄]`, keyed by wavelength in
/// nanometers.
///
/// # Example
/// ```
/// # use chromacurve::spectrum::SpectrumTable;
/// let table: SpectrumTable = "# wavelength xbar ybar zbar
/// 380\t0.001368, 0.000039, 0.006450
/// 381 0.001502 0.000043 0.007083".parse().unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.lookup(381.), Some([0.001502, 0.000043, 0.007083]));
/// // no interpolation
/// assert_eq!(table.lookup(380.5), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpectrumTable {
    entries: BTreeMap<Key, [f64; 3]>,
}

impl SpectrumTable {
    /// Builds a table from `(wavelength, coefficients)` pairs. Non-finite wavelengths are dropped,
    /// and later duplicates replace earlier ones.
    pub fn from_entries<I: IntoIterator<Item = (f64, [f64; 3])>>(entries: I) -> SpectrumTable {
        let mut table = SpectrumTable::default();
        for (wavelength, coefficients) in entries {
            if wavelength.is_finite() {
                table.entries.insert(Key::new(wavelength), coefficients);
            }
        }
        table
    }

    /// Loads a table from delimited text. Each line is split on spaces, tabs, and commas; the first
    /// field is the wavelength and the next three are the coefficients. Lines with fewer than two
    /// fields, or whose first field isn't a finite number, are skipped. If a wavelength appears more
    /// than once, the last line wins.
    ///
    /// # Errors
    /// Any I/O error, and any line with a valid wavelength whose coefficients are not all numbers or
    /// number fewer than three. No partial table is ever returned.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<SpectrumTable, SpectrumError> {
        let mut table = SpectrumTable::default();
        let mut skipped = 0;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let number = i + 1;
            // a byte order mark can only lead the first line
            let text = if number == 1 {
                line.trim_start_matches('\u{feff}')
            } else {
                line.as_str()
            };
            let tokens: Vec<&str> = SEPARATORS
                .split(text)
                .filter(|t| !t.is_empty())
                .collect();
            if tokens.len() < 2 {
                skipped += 1;
                continue;
            }
            let wavelength = match tokens[0].parse::<f64>() {
                Ok(w) if w.is_finite() => w,
                _ => {
                    trace!("skipping line {}: {:?} is not a wavelength", number, tokens[0]);
                    skipped += 1;
                    continue;
                }
            };
            let mut coefficients = Vec::with_capacity(tokens.len() - 1);
            for token in &tokens[1..] {
                match token.parse::<f64>() {
                    Ok(c) => coefficients.push(c),
                    Err(_) => {
                        return Err(SpectrumError::InvalidCoefficient {
                            line: number,
                            token: (*token).to_string(),
                        })
                    }
                }
            }
            if coefficients.len() < 3 {
                return Err(SpectrumError::MissingCoefficients {
                    line: number,
                    found: coefficients.len(),
                });
            }
            table.insert(wavelength, [coefficients[0], coefficients[1], coefficients[2]]);
        }
        debug!(
            "loaded {} spectrum entries ({} lines skipped)",
            table.len(),
            skipped
        );
        Ok(table)
    }

    /// Loads a delimited text table from a file. See [`from_reader`] for the format.
    ///
    /// [`from_reader`]: #method.from_reader
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SpectrumTable, SpectrumError> {
        let file = File::open(path.as_ref())?;
        debug!("reading spectrum table from {}", path.as_ref().display());
        SpectrumTable::from_reader(BufReader::new(file))
    }

    /// Loads a table from CSV with a header row naming the columns `wavelength`, `xbar`, `ybar`, and
    /// `zbar`, in any order. Every record must be complete and numeric.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<SpectrumTable, SpectrumError> {
        let mut table = SpectrumTable::default();
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        for result in rdr.deserialize() {
            let record: Record = result?;
            table.insert(record.wavelength, [record.xbar, record.ybar, record.zbar]);
        }
        debug!("loaded {} spectrum entries from CSV", table.len());
        Ok(table)
    }

    /// Loads a headered CSV table from a file. See [`from_csv_reader`] for the format.
    ///
    /// [`from_csv_reader`]: #method.from_csv_reader
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<SpectrumTable, SpectrumError> {
        let file = File::open(path.as_ref())?;
        SpectrumTable::from_csv_reader(file)
    }

    /// Tabulates the analytic approximation of the CIE 1931 2° observer at every whole nanometer
    /// from `min` to `max` inclusive.
    ///
    /// ```
    /// # use chromacurve::spectrum::SpectrumTable;
    /// let table = SpectrumTable::cie_1931_approximation(380, 780);
    /// assert_eq!(table.len(), 401);
    /// assert_eq!(table.uniform_step(), Some(1.0));
    /// ```
    pub fn cie_1931_approximation(min: u16, max: u16) -> SpectrumTable {
        SpectrumTable::from_entries((min..=max).map(|w| {
            let w = f64::from(w);
            (w, observer::xyz(w))
        }))
    }

    fn insert(&mut self, wavelength: f64, coefficients: [f64; 3]) {
        if self.entries.insert(Key::new(wavelength), coefficients).is_some() {
            debug!("duplicate wavelength {}nm: keeping the later entry", wavelength);
        }
    }

    /// The coefficients at exactly this wavelength, or `None` if the table has no such entry.
    pub fn lookup(&self, wavelength: f64) -> Option<[f64; 3]> {
        self.entries.get(&Key::new(wavelength)).cloned()
    }
    /// The number of wavelengths in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Iterates over `(wavelength, coefficients)` in order of increasing wavelength.
    pub fn iter(&self) -> Iter {
        Iter {
            inner: self.entries.iter(),
        }
    }
    /// The smallest and largest wavelengths in the table.
    pub fn range(&self) -> Option<(f64, f64)> {
        let first = self.entries.keys().next()?;
        let last = self.entries.keys().next_back()?;
        Some((first.0, last.0))
    }
    /// The spacing between neighboring wavelengths, if it is the same everywhere (to within a
    /// millionth of a nanometer). `None` for tables with fewer than two entries or uneven spacing.
    pub fn uniform_step(&self) -> Option<f64> {
        let keys: Vec<f64> = self.entries.keys().map(|k| k.0).collect();
        let step = keys.get(1)? - keys[0];
        if keys.windows(2).all(|w| ((w[1] - w[0]) - step).abs() <= 1e-6) {
            Some(step)
        } else {
            None
        }
    }
    /// A copy of this table with every coefficient multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> SpectrumTable {
        SpectrumTable {
            entries: self
                .entries
                .iter()
                .map(|(&k, c)| (k, [c[0] * factor, c[1] * factor, c[2] * factor]))
                .collect(),
        }
    }
}

impl FromStr for SpectrumTable {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<SpectrumTable, SpectrumError> {
        SpectrumTable::from_reader(s.as_bytes())
    }
}

/// An iterator over the entries of a [`SpectrumTable`], in order of increasing wavelength.
///
/// [`SpectrumTable`]: struct.SpectrumTable.html
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, Key, [f64; 3]>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (f64, [f64; 3]);

    fn next(&mut self) -> Option<(f64, [f64; 3])> {
        self.inner.next().map(|(k, c)| (k.0, *c))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    fn next_back(&mut self) -> Option<(f64, [f64; 3])> {
        self.inner.next_back().map(|(k, c)| (k.0, *c))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}
