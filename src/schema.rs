//! Feature schema: the ordered column list a trained model expects
//!
//! The schema fixes the width and column order of every feature vector for the
//! lifetime of the process. Besides the ordered names it keeps two lookups:
//! exact name → index, and normalized name → first index with that
//! normalized form.

use std::collections::HashMap;

use crate::error::{HuellaError, Result};

/// Normalize a field or column name for separator- and case-insensitive matching
///
/// `_`, `-` and runs of whitespace collapse into a single space, leading and
/// trailing spaces are dropped, and the result is lowercased.
///
/// ```
/// use huella::schema::normalize_name;
///
/// assert_eq!(normalize_name("Monthly_Grocery_Bill"), "monthly grocery bill");
/// assert_eq!(normalize_name("  Sex__male "), "sex male");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered, immutable list of feature names
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    exact: HashMap<String, usize>,
    normalized: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from ordered column names
    ///
    /// # Errors
    ///
    /// Returns `ArtifactMismatch` if the list is empty or contains duplicates.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(HuellaError::ArtifactMismatch {
                reason: "feature schema has no columns".to_string(),
            });
        }

        let mut exact = HashMap::with_capacity(names.len());
        let mut normalized = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            if exact.insert(name.clone(), idx).is_some() {
                return Err(HuellaError::ArtifactMismatch {
                    reason: format!("duplicate feature column '{name}'"),
                });
            }
            // First column wins when two names normalize identically
            normalized.entry(normalize_name(name)).or_insert(idx);
        }

        Ok(Self {
            names,
            exact,
            normalized,
        })
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a constructed schema; present for API symmetry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in model order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of a column by exact name
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.exact.get(name).copied()
    }

    /// Index of the first column whose normalized name equals `name` normalized
    #[must_use]
    pub fn index_of_normalized(&self, name: &str) -> Option<usize> {
        self.normalized.get(&normalize_name(name)).copied()
    }

    /// Exact lookup, falling back to the normalized lookup
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.index_of(name).or_else(|| self.index_of_normalized(name))
    }

    /// Column names starting with `{label}_`, compared in normalized form
    pub fn group_columns<'a>(&'a self, label: &str) -> impl Iterator<Item = &'a str> + 'a {
        let prefix = format!("{} ", normalize_name(label));
        self.names
            .iter()
            .filter(move |name| normalize_name(name).starts_with(&prefix))
            .map(String::as_str)
    }
}

/// Numeric input row aligned 1:1 with a [`FeatureSchema`]
///
/// Created all-zero from a schema, so its width always equals the schema
/// width; there is no way to grow or shrink it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// All-zero vector with one slot per schema column
    #[must_use]
    pub fn zeros(schema: &FeatureSchema) -> Self {
        Self {
            values: vec![0.0; schema.len()],
        }
    }

    /// Overwrite one slot
    ///
    /// Indices come from schema lookups, so they are always in range.
    pub(crate) fn set(&mut self, idx: usize, value: f64) {
        self.values[idx] = value;
    }

    /// Value at a column index
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied()
    }

    /// Width of the vector
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True only for a vector built from a zero-width schema, which cannot exist
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in schema order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(ToString::to_string).collect()).expect("schema")
    }

    #[test]
    fn test_normalize_name_separators() {
        assert_eq!(normalize_name("How_Long_TV_PC_Daily_Hour"), "how long tv pc daily hour");
        assert_eq!(normalize_name("Body-Type"), "body type");
        assert_eq!(normalize_name("Transport_walk/bicycle"), "transport walk/bicycle");
        assert_eq!(normalize_name("a \t b"), "a b");
        assert_eq!(normalize_name("___"), "");
    }

    #[test]
    fn test_empty_schema_rejected() {
        let err = FeatureSchema::new(vec![]).unwrap_err();
        assert!(matches!(err, HuellaError::ArtifactMismatch { .. }));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = FeatureSchema::new(vec!["A".to_string(), "A".to_string()]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_exact_and_normalized_lookup() {
        let s = schema(&["Monthly Grocery Bill", "Sex_male", "Recycling_Metal"]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.index_of("Sex_male"), Some(1));
        assert_eq!(s.index_of("sex_male"), None);
        assert_eq!(s.index_of_normalized("sex_male"), Some(1));
        assert_eq!(s.index_of_normalized("MONTHLY_GROCERY_BILL"), Some(0));
        assert_eq!(s.resolve("recycling metal"), Some(2));
        assert_eq!(s.resolve("Recycling_Glass"), None);
    }

    #[test]
    fn test_first_normalized_match_wins() {
        let s = schema(&["Sex_male", "Sex male"]);
        assert_eq!(s.index_of_normalized("SEX MALE"), Some(0));
        assert_eq!(s.index_of("Sex male"), Some(1));
    }

    #[test]
    fn test_group_columns() {
        let s = schema(&[
            "Body Type_obese",
            "Body Type_overweight",
            "Sex_male",
            "Body Typeface",
        ]);
        let cols: Vec<_> = s.group_columns("Body Type").collect();
        assert_eq!(cols, vec!["Body Type_obese", "Body Type_overweight"]);
        assert_eq!(s.group_columns("Diet").count(), 0);
    }
}
