//! Form-to-feature reconciliation
//!
//! Maps loosely structured form submissions onto the fixed schema vector.
//! Rules run in a fixed priority order:
//!
//! 1. numeric fields (explicit field → column map, lenient float parsing)
//! 2. single-choice fields (one-hot `{label}_{option}`, baseline left at 0)
//! 3. multi-choice fields (one column per checked `{label}_{value}`)
//! 4. free checkbox fallback (exact, then normalized column name match)
//!
//! Nothing here fails: malformed numbers become 0, unknown options and
//! unknown fields are ignored. Each absorbed issue is logged at `debug`.
//!
//! ## Example
//!
//! ```
//! use huella::reconcile::{FormInput, ReconcileRules};
//! use huella::schema::FeatureSchema;
//!
//! let schema = FeatureSchema::new(vec!["A".into(), "B".into(), "Sex_male".into()]).unwrap();
//! let rules = ReconcileRules::new().choice("Sex", "Sex", Some("female"));
//! let form = FormInput::from_pairs([("Sex", "male")]);
//!
//! let vector = rules.reconcile(&form, &schema);
//! assert_eq!(vector.as_slice(), &[0.0, 0.0, 1.0]);
//! ```

mod survey;

use std::{collections::HashSet, fmt};

use tracing::debug;

use crate::schema::{normalize_name, FeatureSchema, FeatureVector};

/// Submitted form fields, in submission order
///
/// Duplicate names are kept: checkbox groups send one pair per checked box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    fields: Vec<(String, String)>,
}

impl FormInput {
    /// Build from `(name, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value submitted under `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted under `name`
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All pairs in submission order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of submitted pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether nothing was submitted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<(String, String)>> for FormInput {
    fn from(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }
}

/// Numeric form field copied into one schema column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericField {
    /// Form field name
    pub field: String,
    /// Target schema column
    pub column: String,
}

/// Single-choice form field encoded one-hot as `{label}_{option}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceField {
    /// Form field name
    pub field: String,
    /// Column group label used as the one-hot prefix
    pub label: String,
    /// Option represented by all group columns being 0
    pub baseline: Option<String>,
}

/// Checkbox group: every submitted value sets its own `{label}_{value}` column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiChoiceField {
    /// Form field name
    pub field: String,
    /// Column group label
    pub label: String,
}

/// Ordered reconciliation rule tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileRules {
    numeric: Vec<NumericField>,
    choices: Vec<ChoiceField>,
    multi: Vec<MultiChoiceField>,
}

/// Drift between the rule tables and a loaded schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleWarning {
    /// A numeric rule targets a column the schema does not have
    MissingNumericColumn {
        /// Form field name
        field: String,
        /// Missing column
        column: String,
    },
    /// No schema column carries the group's label prefix
    MissingGroup {
        /// Form field name
        field: String,
        /// Group label
        label: String,
    },
    /// The hard-coded baseline exists as its own column
    BaselineMaterialized {
        /// Form field name
        field: String,
        /// The baseline column found in the schema
        column: String,
    },
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNumericColumn { field, column } => write!(
                f,
                "numeric field '{field}' maps to column '{column}' which is not in the schema"
            ),
            Self::MissingGroup { field, label } => write!(
                f,
                "choice field '{field}' has no '{label}_*' columns in the schema"
            ),
            Self::BaselineMaterialized { field, column } => write!(
                f,
                "baseline of choice field '{field}' is materialized as column '{column}'"
            ),
        }
    }
}

impl ReconcileRules {
    /// Empty rule set: only the free checkbox fallback applies
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric field rule
    #[must_use]
    pub fn numeric(mut self, field: &str, column: &str) -> Self {
        self.numeric.push(NumericField {
            field: field.to_string(),
            column: column.to_string(),
        });
        self
    }

    /// Add a single-choice field rule
    #[must_use]
    pub fn choice(mut self, field: &str, label: &str, baseline: Option<&str>) -> Self {
        self.choices.push(ChoiceField {
            field: field.to_string(),
            label: label.to_string(),
            baseline: baseline.map(ToString::to_string),
        });
        self
    }

    /// Add a checkbox group rule
    #[must_use]
    pub fn multi_choice(mut self, field: &str, label: &str) -> Self {
        self.multi.push(MultiChoiceField {
            field: field.to_string(),
            label: label.to_string(),
        });
        self
    }

    /// Numeric rules in evaluation order
    #[must_use]
    pub fn numeric_fields(&self) -> &[NumericField] {
        &self.numeric
    }

    /// Single-choice rules in evaluation order
    #[must_use]
    pub fn choice_fields(&self) -> &[ChoiceField] {
        &self.choices
    }

    /// Checkbox group rules in evaluation order
    #[must_use]
    pub fn multi_choice_fields(&self) -> &[MultiChoiceField] {
        &self.multi
    }

    /// Whether a form field is owned by a numeric, choice or checkbox group rule
    fn consumes(&self, field: &str) -> bool {
        self.numeric.iter().any(|r| r.field == field)
            || self.choices.iter().any(|r| r.field == field)
            || self.multi.iter().any(|r| r.field == field)
    }

    /// Reconcile a form submission into a schema-aligned vector
    ///
    /// The result always has exactly `schema.len()` entries.
    #[must_use]
    pub fn reconcile(&self, form: &FormInput, schema: &FeatureSchema) -> FeatureVector {
        let mut vector = FeatureVector::zeros(schema);

        for rule in &self.numeric {
            let Some(raw) = form.get(&rule.field) else {
                continue;
            };
            let Some(idx) = schema.index_of(&rule.column) else {
                debug!(field = %rule.field, column = %rule.column, "numeric column not in schema");
                continue;
            };
            vector.set(idx, parse_lenient(&rule.field, raw));
        }

        for rule in &self.choices {
            let Some(option) = form.get(&rule.field) else {
                continue;
            };
            let baseline = rule.baseline.as_deref();
            if let Some(idx) = choice_column(schema, &rule.label, baseline, option) {
                vector.set(idx, 1.0);
            }
        }

        for rule in &self.multi {
            for value in form.get_all(&rule.field) {
                if let Some(idx) = choice_column(schema, &rule.label, None, value) {
                    vector.set(idx, 1.0);
                }
            }
        }

        let mut seen = HashSet::new();
        for (field, _) in form.iter() {
            if self.consumes(field) || !seen.insert(field) {
                continue;
            }
            match schema.index_of(field).or_else(|| schema.index_of_normalized(field)) {
                Some(idx) => vector.set(idx, 1.0),
                None => debug!(field, "form field matches no schema column"),
            }
        }

        vector
    }

    /// Check the rule tables against a loaded schema
    ///
    /// The schema is authoritative; drift is reported, never fatal.
    #[must_use]
    pub fn validate(&self, schema: &FeatureSchema) -> Vec<RuleWarning> {
        let mut warnings = Vec::new();

        for rule in &self.numeric {
            if schema.index_of(&rule.column).is_none() {
                warnings.push(RuleWarning::MissingNumericColumn {
                    field: rule.field.clone(),
                    column: rule.column.clone(),
                });
            }
        }

        for rule in &self.choices {
            if schema.group_columns(&rule.label).next().is_none() {
                warnings.push(RuleWarning::MissingGroup {
                    field: rule.field.clone(),
                    label: rule.label.clone(),
                });
            }
            if let Some(baseline) = &rule.baseline {
                let column = one_hot_name(&rule.label, baseline);
                if let Some(idx) = schema.resolve(&column) {
                    warnings.push(RuleWarning::BaselineMaterialized {
                        field: rule.field.clone(),
                        column: schema.names()[idx].clone(),
                    });
                }
            }
        }

        for rule in &self.multi {
            if schema.group_columns(&rule.label).next().is_none() {
                warnings.push(RuleWarning::MissingGroup {
                    field: rule.field.clone(),
                    label: rule.label.clone(),
                });
            }
        }

        warnings
    }
}

fn one_hot_name(label: &str, option: &str) -> String {
    format!("{label}_{option}")
}

/// Parse a numeric form value; empty, malformed or non-finite input is 0
fn parse_lenient(field: &str, raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            debug!(field, value = raw, "unparseable numeric value, using 0");
            0.0
        },
    }
}

/// Strip a leading `{label}` plus one separator from a submitted option
///
/// Older forms send `Transport_public` instead of `public`.
fn strip_label<'a>(label: &str, option: &'a str) -> &'a str {
    let Some(head) = option.get(..label.len()) else {
        return option;
    };
    if !head.eq_ignore_ascii_case(label) {
        return option;
    }
    let rest = &option[label.len()..];
    match rest.chars().next() {
        Some(sep @ ('_' | ' ' | '-')) if rest.len() > sep.len_utf8() => &rest[sep.len_utf8()..],
        _ => option,
    }
}

/// Resolve a submitted option to its one-hot column, honoring the baseline
fn choice_column(
    schema: &FeatureSchema,
    label: &str,
    baseline: Option<&str>,
    option: &str,
) -> Option<usize> {
    let option = strip_label(label, option.trim());
    if option.is_empty() {
        return None;
    }
    if baseline.is_some_and(|b| b.eq_ignore_ascii_case(option)) {
        return None;
    }
    let column = one_hot_name(label, option);
    let idx = schema.resolve(&column);
    if idx.is_none() {
        debug!(label, option, "unknown categorical option ignored");
    }
    idx
}
