//! Declarative column mapping.
//!
//! A [`ColumnRule`] reads one source cell per row (the row key or a named
//! column) and threads it through an ordered list of [`DerivationRule`]s to
//! produce one target cell. A [`MappingPlan`] is an ordered set of column
//! rules projected onto a fixed output schema.
//!
//! # Example
//!
//! ```ignore
//! let plan = MappingPlan::new()
//!     .with(ColumnRule::from_key("*sample_name"))
//!     .with(ColumnRule::from_column("host_age", "covv_patient_age")
//!         .then(DerivationRule::SubstituteIfMissing));
//! let output = plan.execute(&upload, &schema, &DeriveContext::new(sentinel))?;
//! ```

use gnb_model::{Sentinel, Table, TableError};
use polars::prelude::Column;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::rules::{conditional_format, lookup_translate, split_extract, split_join, substitute_if_missing};
use crate::vocabulary::Vocabulary;

/// Where a column rule reads its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The table's row key.
    Key,
    /// A named column.
    Column(String),
}

impl Source {
    fn read<'t>(&self, table: &'t Table, row: usize) -> Result<Option<&'t str>> {
        let column = match self {
            Self::Key => table.key_column().ok_or(TableError::NoKey)?,
            Self::Column(name) => name.as_str(),
        };
        Ok(table.cell(row, column)?)
    }
}

/// One per-row derivation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivationRule {
    /// Replace the value with a fixed string.
    Constant(String),
    /// Absent → the context sentinel.
    SubstituteIfMissing,
    /// Absent → a fixed string.
    Fallback(String),
    /// A value equal to the context sentinel → absent.
    AbsentIfSentinel,
    /// Absent → [`TransformError::MissingValue`].
    Require,
    /// Token `index` after splitting on `delimiter`.
    SplitExtract { delimiter: String, index: usize },
    /// Tokens `start..end` after splitting, trimmed and joined with `separator`.
    SplitJoin {
        delimiter: String,
        start: usize,
        end: usize,
        separator: String,
    },
    /// Wrap a present value.
    Affix { prefix: String, suffix: String },
    /// Strict translation through a named vocabulary.
    LookupTranslate { vocabulary: String },
    /// Format with `present` when `companion` has a value, `absent` otherwise.
    ConditionalFormat {
        companion: Source,
        present: String,
        absent: String,
    },
}

impl DerivationRule {
    /// Returns a human-readable display name for the rule.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Constant(_) => "Constant",
            Self::SubstituteIfMissing => "Substitute if missing",
            Self::Fallback(_) => "Fallback",
            Self::AbsentIfSentinel => "Absent if sentinel",
            Self::Require => "Require",
            Self::SplitExtract { .. } => "Split extract",
            Self::SplitJoin { .. } => "Split join",
            Self::Affix { .. } => "Affix",
            Self::LookupTranslate { .. } => "Lookup",
            Self::ConditionalFormat { .. } => "Conditional format",
        }
    }

    fn apply(
        &self,
        value: Option<String>,
        table: &Table,
        row: usize,
        ctx: &DeriveContext,
    ) -> Result<Option<String>> {
        match self {
            Self::Constant(constant) => Ok(Some(constant.clone())),
            Self::SubstituteIfMissing => Ok(Some(substitute_if_missing(value.as_deref(), ctx.sentinel))),
            Self::Fallback(fallback) => Ok(value.or_else(|| Some(fallback.clone()))),
            Self::AbsentIfSentinel => Ok(value.filter(|value| value != ctx.sentinel.as_str())),
            Self::Require => value.ok_or(TransformError::MissingValue).map(Some),
            Self::SplitExtract { delimiter, index } => value
                .map(|value| split_extract(&value, delimiter, *index))
                .transpose(),
            Self::SplitJoin {
                delimiter,
                start,
                end,
                separator,
            } => Ok(value.and_then(|value| split_join(&value, delimiter, *start..*end, separator))),
            Self::Affix { prefix, suffix } => Ok(value.map(|value| format!("{prefix}{value}{suffix}"))),
            Self::LookupTranslate { vocabulary } => {
                let vocabulary = ctx.vocabulary(vocabulary)?;
                lookup_translate(value.as_deref(), vocabulary).map(Some)
            }
            Self::ConditionalFormat {
                companion,
                present,
                absent,
            } => {
                let companion = companion.read(table, row)?;
                Ok(value.map(|value| conditional_format(&value, companion, present, absent)))
            }
        }
    }
}

/// Shared inputs every rule may consult.
#[derive(Debug, Clone, Default)]
pub struct DeriveContext {
    pub sentinel: Sentinel,
    vocabularies: Vec<Vocabulary>,
}

impl DeriveContext {
    pub fn new(sentinel: Sentinel) -> Self {
        Self {
            sentinel,
            vocabularies: Vec::new(),
        }
    }

    /// Make a vocabulary available to lookup rules.
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabularies.push(vocabulary);
        self
    }

    pub fn vocabulary(&self, name: &str) -> Result<&Vocabulary> {
        self.vocabularies
            .iter()
            .find(|vocabulary| vocabulary.name() == name)
            .ok_or_else(|| TransformError::UnknownVocabulary {
                vocabulary: name.to_string(),
            })
    }
}

/// Derivation of a single target column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRule {
    /// Output column name.
    pub target: String,
    /// Input of the first step; `None` starts every row absent.
    pub source: Option<Source>,
    pub steps: Vec<DerivationRule>,
}

impl ColumnRule {
    /// A column holding `value` on every row.
    pub fn constant(target: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: None,
            steps: vec![DerivationRule::Constant(value.into())],
        }
    }

    /// A rule reading the row key.
    pub fn from_key(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: Some(Source::Key),
            steps: Vec::new(),
        }
    }

    /// A rule reading a named column; without further steps it copies it.
    pub fn from_column(target: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: Some(Source::Column(column.into())),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn then(mut self, step: DerivationRule) -> Self {
        self.steps.push(step);
        self
    }

    /// Sources read by this rule, including conditional-format companions.
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.source.iter().chain(self.steps.iter().filter_map(|step| match step {
            DerivationRule::ConditionalFormat { companion, .. } => Some(companion),
            _ => None,
        }))
    }

    fn validate(&self, table: &Table, ctx: &DeriveContext) -> Result<()> {
        for source in self.sources() {
            match source {
                Source::Key if table.key_column().is_none() => return Err(TableError::NoKey.into()),
                Source::Column(column) if !table.has_column(column) => {
                    return Err(TransformError::UnknownColumn {
                        target: self.target.clone(),
                        column: column.clone(),
                    });
                }
                _ => {}
            }
        }
        for step in &self.steps {
            if let DerivationRule::LookupTranslate { vocabulary } = step {
                ctx.vocabulary(vocabulary)?;
            }
        }
        Ok(())
    }

    /// Evaluate the rule on every row, top to bottom.
    ///
    /// The first failing row aborts evaluation; the error names the row key
    /// and the target column.
    pub fn derive_values(&self, table: &Table, ctx: &DeriveContext) -> Result<Vec<Option<String>>> {
        let mut values = Vec::with_capacity(table.height());
        for row in 0..table.height() {
            let initial = match &self.source {
                Some(source) => source.read(table, row)?.map(str::to_string),
                None => None,
            };
            let value = self
                .steps
                .iter()
                .try_fold(initial, |value, step| step.apply(value, table, row, ctx))
                .map_err(|source| TransformError::Row {
                    key: row_label(table, row),
                    column: self.target.clone(),
                    source: Box::new(source),
                })?;
            values.push(value);
        }
        Ok(values)
    }

    /// Evaluate the rule into a named Polars column.
    pub fn derive(&self, table: &Table, ctx: &DeriveContext) -> Result<Column> {
        let values = self.derive_values(table, ctx)?;
        Ok(Column::new(self.target.as_str().into(), values))
    }
}

fn row_label(table: &Table, row: usize) -> String {
    table
        .key_column()
        .and_then(|key| table.cell(row, key).ok().flatten())
        .map_or_else(|| format!("#{row}"), str::to_string)
}

/// Ordered column rules for one output layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPlan {
    rules: Vec<ColumnRule>,
}

impl MappingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule; a later rule for the same target replaces the earlier one.
    pub fn with(mut self, rule: ColumnRule) -> Self {
        self.rules.retain(|existing| existing.target != rule.target);
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    pub fn rule(&self, target: &str) -> Option<&ColumnRule> {
        self.rules.iter().find(|rule| rule.target == target)
    }

    /// Check every referenced column and vocabulary before any row is read.
    pub fn validate(&self, table: &Table, ctx: &DeriveContext) -> Result<()> {
        self.rules.iter().try_for_each(|rule| rule.validate(table, ctx))
    }

    /// Derive one target column.
    pub fn derive_column(&self, table: &Table, target: &str, ctx: &DeriveContext) -> Result<Column> {
        let rule = self.rule(target).ok_or_else(|| TableError::ColumnNotFound {
            column: target.to_string(),
        })?;
        rule.validate(table, ctx)?;
        rule.derive(table, ctx)
    }

    /// Project `table` onto `schema`; columns without a rule are empty.
    pub fn execute(&self, table: &Table, schema: &[String], ctx: &DeriveContext) -> Result<Table> {
        let height = table.height();
        self.execute_with(table, schema, ctx, |_| Ok(vec![None; height]))
    }

    /// Project `table` onto `schema`, asking `carry` for every column
    /// without a rule.
    ///
    /// Rules whose target is outside `schema` are neither validated nor run.
    pub fn execute_with<F>(
        &self,
        table: &Table,
        schema: &[String],
        ctx: &DeriveContext,
        mut carry: F,
    ) -> Result<Table>
    where
        F: FnMut(&str) -> Result<Vec<Option<String>>>,
    {
        for rule in &self.rules {
            if schema.contains(&rule.target) {
                rule.validate(table, ctx)?;
            } else {
                debug!(column = %rule.target, "rule target not in output schema, skipped");
            }
        }

        let mut columns = Vec::with_capacity(schema.len());
        let mut derived = 0usize;
        for name in schema {
            let values = match self.rule(name) {
                Some(rule) => {
                    derived += 1;
                    rule.derive_values(table, ctx)?
                }
                None => carry(name)?,
            };
            columns.push((name.clone(), values));
        }
        debug!(
            rows = table.height(),
            columns = schema.len(),
            derived,
            "executed mapping plan"
        );
        Ok(Table::from_columns(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::INSTRUMENT_MODELS;

    fn upload() -> Table {
        Table::from_columns(vec![
            (
                "covv_virus_name".to_string(),
                vec![
                    Some("hCoV-19/USA/CA-LAB-1/2021".to_string()),
                    Some("hCoV-19/USA/CA-LAB-2/2021".to_string()),
                ],
            ),
            (
                "covv_patient_age".to_string(),
                vec![Some("65".to_string()), None],
            ),
            (
                "covv_accession_id".to_string(),
                vec![None, Some("EPI_ISL_2".to_string())],
            ),
        ])
        .unwrap()
        .with_key("covv_virus_name")
        .unwrap()
    }

    fn schema(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn test_sentinel_value_skips_affix() {
        let table = Table::from_columns(vec![(
            "covv_collection_date".to_string(),
            vec![Some("missing".to_string()), Some("2020-03-14".to_string())],
        )])
        .unwrap();
        let rule = ColumnRule::from_column("*collection_date", "covv_collection_date")
            .then(DerivationRule::AbsentIfSentinel)
            .then(DerivationRule::Affix {
                prefix: "'".to_string(),
                suffix: String::new(),
            })
            .then(DerivationRule::SubstituteIfMissing);

        let values = rule.derive_values(&table, &DeriveContext::new(Sentinel::Missing)).unwrap();

        assert_eq!(values, vec![Some("missing".to_string()), Some("'2020-03-14".to_string())]);
    }

    #[test]
    fn test_execute_projects_schema_order() {
        let plan = MappingPlan::new()
            .with(ColumnRule::from_key("name"))
            .with(ColumnRule::from_column("age", "covv_patient_age").then(DerivationRule::SubstituteIfMissing))
            .with(ColumnRule::constant("host", "Homo sapiens"));
        let output = plan
            .execute(&upload(), &schema(&["host", "unmapped", "name", "age"]), &DeriveContext::new(Sentinel::NotCollected))
            .unwrap();

        assert_eq!(output.column_names(), vec!["host", "unmapped", "name", "age"]);
        assert_eq!(output.values("unmapped").unwrap(), vec![None, None]);
        assert_eq!(output.values("age").unwrap(), vec![Some("65"), Some("not collected")]);
        assert_eq!(output.values("host").unwrap(), vec![Some("Homo sapiens"), Some("Homo sapiens")]);
    }

    #[test]
    fn test_conditional_format_uses_companion() {
        let rule = ColumnRule::from_key("title")
            .then(DerivationRule::SplitExtract {
                delimiter: "/".to_string(),
                index: 2,
            })
            .then(DerivationRule::ConditionalFormat {
                companion: Source::Column("covv_accession_id".to_string()),
                present: "SARS-Cov-2 {value} (GISAID {companion})".to_string(),
                absent: "SARS-Cov-2 {value}".to_string(),
            });
        let values = rule.derive_values(&upload(), &DeriveContext::default()).unwrap();
        assert_eq!(
            values,
            vec![
                Some("SARS-Cov-2 CA-LAB-1".to_string()),
                Some("SARS-Cov-2 CA-LAB-2 (GISAID EPI_ISL_2)".to_string())
            ]
        );
    }

    #[test]
    fn test_validate_rejects_unknown_column() {
        let plan = MappingPlan::new().with(ColumnRule::from_column("x", "covv_location"));
        let err = plan.validate(&upload(), &DeriveContext::default()).unwrap_err();
        assert!(matches!(err, TransformError::UnknownColumn { column, .. } if column == "covv_location"));
    }

    #[test]
    fn test_validate_rejects_unknown_vocabulary() {
        let plan = MappingPlan::new().with(
            ColumnRule::from_column("model", "covv_patient_age").then(DerivationRule::LookupTranslate {
                vocabulary: INSTRUMENT_MODELS.name().to_string(),
            }),
        );
        assert!(matches!(
            plan.validate(&upload(), &DeriveContext::default()),
            Err(TransformError::UnknownVocabulary { .. })
        ));
        let ctx = DeriveContext::default().with_vocabulary(INSTRUMENT_MODELS);
        assert!(plan.validate(&upload(), &ctx).is_ok());
    }

    #[test]
    fn test_key_source_requires_keyed_table() {
        let unkeyed = Table::from_columns(vec![("a".to_string(), vec![Some("1".to_string())])]).unwrap();
        let plan = MappingPlan::new().with(ColumnRule::from_key("name"));
        assert!(matches!(
            plan.validate(&unkeyed, &DeriveContext::default()),
            Err(TransformError::Table(TableError::NoKey))
        ));
    }

    #[test]
    fn test_row_error_carries_key_and_column() {
        let plan = MappingPlan::new().with(ColumnRule::from_column("age", "covv_patient_age").then(DerivationRule::Require));
        let err = plan
            .execute(&upload(), &schema(&["age"]), &DeriveContext::default())
            .unwrap_err();
        match err {
            TransformError::Row { key, column, source } => {
                assert_eq!(key, "hCoV-19/USA/CA-LAB-2/2021");
                assert_eq!(column, "age");
                assert!(matches!(*source, TransformError::MissingValue));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_execute_with_carries_unmapped_columns() {
        let plan = MappingPlan::new().with(ColumnRule::from_key("name"));
        let output = plan
            .execute_with(&upload(), &schema(&["name", "note"]), &DeriveContext::default(), |column| {
                Ok(vec![Some(format!("carried {column}")); 2])
            })
            .unwrap();
        assert_eq!(output.cell(1, "note").unwrap(), Some("carried note"));
    }

    #[test]
    fn test_derive_column_names_series() {
        let plan = MappingPlan::new().with(
            ColumnRule::from_column("age", "covv_patient_age")
                .then(DerivationRule::Fallback("n/a".to_string()))
                .then(DerivationRule::Affix {
                    prefix: String::new(),
                    suffix: " years".to_string(),
                }),
        );
        let column = plan.derive_column(&upload(), "age", &DeriveContext::default()).unwrap();
        assert_eq!(column.name().as_str(), "age");
        let values: Vec<Option<&str>> = column.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("65 years"), Some("n/a years")]);
    }

    #[test]
    fn test_later_rule_replaces_earlier() {
        let plan = MappingPlan::new()
            .with(ColumnRule::constant("host", "Homo sapiens"))
            .with(ColumnRule::constant("host", "Mus musculus"));
        assert_eq!(plan.rules().len(), 1);
        assert_eq!(
            plan.rule("host").map(|rule| rule.steps.clone()),
            Some(vec![DerivationRule::Constant("Mus musculus".to_string())])
        );
    }
}
