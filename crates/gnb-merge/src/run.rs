//! NCBI SRA run metadata from BioSample attributes and a GISAID upload.

use std::collections::HashMap;

use gnb_model::{JoinKind, Sentinel, Table, TableError};
use gnb_transform::{ColumnRule, DeriveContext, DerivationRule, INSTRUMENT_MODELS, MappingPlan};
use tracing::{debug, info, info_span};

use crate::biosample::DEFAULT_ORGANISM;
use crate::columns::{
    ASSEMBLY_METHOD, ATTRIBUTE_ACCESSION, BIOSAMPLE_ACCESSION, DESIGN_DESCRIPTION, FILENAME,
    FILENAME2, FILETYPE, INSTRUMENT_MODEL, ISOLATE, LIBRARY_ID, LIBRARY_LAYOUT, LIBRARY_SELECTION,
    LIBRARY_SOURCE, LIBRARY_STRATEGY, PLATFORM, SEQUENCING_TECHNOLOGY, TITLE,
};
use crate::error::{MergeError, Result};

/// Read-processing narrative appended to every design description.
pub const METHODS: &str = "Using minimap2, short reads mapped to SARS-CoV-2 NCBI accession \
MN908947.3. Using samtools, proper_pairs (samflag 2) mapping to MN908947.3 retained, unmapped \
reads (samflag 4) discarded (to filter out non-SARS-CoV-2 cDNA). Filtered reads submitted to NCBI";

/// Caller-supplied values for a run metadata build.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run title.
    pub title: String,
    /// Narrative appended after the assembly method.
    pub methods: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_ORGANISM.to_string(),
            methods: METHODS.to_string(),
        }
    }
}

fn isolate_with(target: &str, suffix: &str) -> ColumnRule {
    ColumnRule::from_column(target, ISOLATE)
        .then(DerivationRule::Require)
        .then(DerivationRule::Affix {
            prefix: String::new(),
            suffix: suffix.to_string(),
        })
}

/// The SRA column derivations, applied to attributes keyed by BioSample
/// accession.
pub fn run_plan(options: &RunOptions) -> MappingPlan {
    MappingPlan::new()
        .with(ColumnRule::from_key(BIOSAMPLE_ACCESSION))
        .with(isolate_with(LIBRARY_ID, "_illumina"))
        .with(ColumnRule::constant(TITLE, &options.title))
        .with(ColumnRule::constant(LIBRARY_STRATEGY, "AMPLICON"))
        .with(ColumnRule::constant(LIBRARY_SOURCE, "VIRAL RNA"))
        .with(ColumnRule::constant(LIBRARY_SELECTION, "PCR"))
        .with(ColumnRule::constant(LIBRARY_LAYOUT, "paired"))
        .with(ColumnRule::constant(PLATFORM, "ILLUMINA"))
        .with(
            ColumnRule::from_column(INSTRUMENT_MODEL, SEQUENCING_TECHNOLOGY).then(
                DerivationRule::LookupTranslate {
                    vocabulary: INSTRUMENT_MODELS.name().to_string(),
                },
            ),
        )
        .with(
            ColumnRule::from_column(DESIGN_DESCRIPTION, ASSEMBLY_METHOD)
                .then(DerivationRule::Require)
                .then(DerivationRule::Affix {
                    prefix: String::new(),
                    suffix: format!(". {}", options.methods),
                }),
        )
        .with(ColumnRule::constant(FILETYPE, "fastq"))
        .with(isolate_with(FILENAME, "_R1.fq.gz"))
        .with(isolate_with(FILENAME2, "_R2.fq.gz"))
}

/// Build SRA run metadata.
///
/// `attributes` must be keyed by sample name and `upload_labels` by virus
/// name; every attributes row needs an upload record. Output has one row per
/// attributes row, in the run template's column order. Columns without a
/// derivation keep the value of the template row filed under the same
/// BioSample accession.
pub fn build_run_metadata(
    upload_labels: &Table,
    attributes: &Table,
    run_template: &Table,
    options: &RunOptions,
) -> Result<Table> {
    let span = info_span!("build_run_metadata");
    let _guard = span.enter();

    for (table, source, column) in [
        ("GISAID upload", upload_labels, SEQUENCING_TECHNOLOGY),
        ("GISAID upload", upload_labels, ASSEMBLY_METHOD),
        ("BioSample attributes", attributes, ATTRIBUTE_ACCESSION),
        ("SRA template", run_template, BIOSAMPLE_ACCESSION),
    ] {
        if !source.has_column(column) {
            return Err(MergeError::MissingColumn {
                table,
                column: column.to_string(),
            });
        }
    }

    let combined = attributes
        .join(
            upload_labels,
            &[SEQUENCING_TECHNOLOGY, ASSEMBLY_METHOD],
            JoinKind::Strict,
        )
        .map_err(|err| match err {
            TableError::UnmatchedKey { key } => MergeError::UnmatchedSample { sample: key },
            other => other.into(),
        })?
        .with_key(ATTRIBUTE_ACCESSION)?;

    let template_rows = index_template(run_template, &combined)?;
    let matched: Vec<Option<usize>> = combined
        .key_values()?
        .into_iter()
        .map(|accession| template_rows.get(accession).copied())
        .collect();
    debug!(
        template_rows = run_template.height(),
        matched = matched.iter().flatten().count(),
        "indexed run template"
    );

    let schema = run_template.column_names();
    let ctx = DeriveContext::new(Sentinel::default()).with_vocabulary(INSTRUMENT_MODELS);
    let runs = run_plan(options).execute_with(&combined, &schema, &ctx, |column| {
        let carried = run_template.values(column)?;
        Ok(matched
            .iter()
            .map(|row| row.and_then(|row| carried[row]).map(str::to_string))
            .collect())
    })?;

    info!(runs = runs.height(), columns = runs.width(), "built SRA run metadata");
    Ok(runs)
}

/// Template row per filled-in BioSample accession; blank rows are ignored.
fn index_template(template: &Table, combined: &Table) -> Result<HashMap<String, usize>> {
    let mut rows = HashMap::new();
    for (row, accession) in template.values(BIOSAMPLE_ACCESSION)?.into_iter().enumerate() {
        let Some(accession) = accession else {
            continue;
        };
        if combined.position(accession).is_none() {
            return Err(MergeError::UnmatchedTemplateAccession {
                accession: accession.to_string(),
            });
        }
        if rows.insert(accession.to_string(), row).is_some() {
            return Err(TableError::DuplicateKey {
                column: BIOSAMPLE_ACCESSION.to_string(),
                key: accession.to_string(),
            }
            .into());
        }
    }
    Ok(rows)
}
