//! Per-field missing-value policies.
//!
//! Station files mark absent measurements with a single token (usually `M`).
//! What that token means depends on the column: missing pressure is unknown,
//! missing precipitation means none fell, and some columns are never expected
//! to contain it at all. The [`PolicyTable`] keeps that mapping in one place.

/// Default token used in station files to mark a missing value
pub const DEFAULT_MISSING_MARKER: &str = "M";

/// What to do when a cell holds the missing marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissingPolicy {
    /// Replace the marker with a fixed value
    Substitute(f64),
    /// Treat the marker like any other unparseable text
    Propagate,
}

impl MissingPolicy {
    /// Substitute NaN ("value unknown")
    pub const NAN: MissingPolicy = MissingPolicy::Substitute(f64::NAN);
    /// Substitute zero ("nothing observed")
    pub const ZERO: MissingPolicy = MissingPolicy::Substitute(0.0);
}

/// A named column at a fixed position in a delimited record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Output field name
    pub name: String,
    /// Zero-based column index in the raw record
    pub column: usize,
    /// Missing-marker handling for this field
    pub policy: MissingPolicy,
}

/// Why a single cell failed to parse
#[derive(Debug, Clone, PartialEq)]
pub struct CellError {
    pub field: String,
    pub message: String,
}

/// Field layout and missing-value policy for one file schema
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTable {
    marker: String,
    fields: Vec<FieldSpec>,
}

impl PolicyTable {
    /// Create an empty table using `marker` as the missing-value token
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the table
    pub fn with_field(mut self, name: &str, column: usize, policy: MissingPolicy) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            column,
            policy,
        });
        self
    }

    /// Schema of an ASOS surface station file
    pub fn surface(marker: &str) -> Self {
        Self::new(marker)
            .with_field("t", 2, MissingPolicy::Propagate)
            .with_field("td", 3, MissingPolicy::Propagate)
            .with_field("wdir", 4, MissingPolicy::Propagate)
            .with_field("wspd", 5, MissingPolicy::Propagate)
            .with_field("pres", 6, MissingPolicy::NAN)
            .with_field("prec", 7, MissingPolicy::ZERO)
    }

    /// Schema of a radiosonde sounding file
    pub fn sounding(marker: &str) -> Self {
        Self::new(marker)
            .with_field("p", 2, MissingPolicy::Propagate)
            .with_field("z", 4, MissingPolicy::Propagate)
            .with_field("t", 5, MissingPolicy::NAN)
            .with_field("td", 6, MissingPolicy::NAN)
    }

    /// The missing-value token
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Parse one raw cell for `spec`, applying its missing-value policy
    pub fn parse_cell(&self, spec: &FieldSpec, raw: &str) -> std::result::Result<f64, CellError> {
        let raw = raw.trim();
        if raw == self.marker {
            if let MissingPolicy::Substitute(value) = spec.policy {
                return Ok(value);
            }
        }

        raw.parse::<f64>().map_err(|e| CellError {
            field: spec.name.clone(),
            message: format!("cannot parse '{}' as a number ({})", raw, e),
        })
    }

    /// Parse every field of one record, in declaration order
    pub fn parse_record(&self, record: &csv::StringRecord) -> std::result::Result<Vec<f64>, CellError> {
        self.fields
            .iter()
            .map(|spec| {
                let raw = record.get(spec.column).ok_or_else(|| CellError {
                    field: spec.name.clone(),
                    message: format!(
                        "record has {} columns, expected column {}",
                        record.len(),
                        spec.column
                    ),
                })?;
                self.parse_cell(spec, raw)
            })
            .collect()
    }
}
