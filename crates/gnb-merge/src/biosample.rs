//! NCBI BioSample table from a GISAID upload and download.

use std::borrow::Cow;

use gnb_model::{JoinKind, Sentinel, Table};
use gnb_transform::{ColumnRule, DeriveContext, DerivationRule, MappingPlan, Source};
use tracing::{info, info_span};

use crate::columns::{
    ACCESSION_ID, BIOPROJECT_ACCESSION, COLLECTED_BY, COLLECTION_DATE, DESCRIPTION, GENDER,
    GEO_LOC_NAME, HOST, HOST_AGE, HOST_DISEASE, HOST_SEX, ISOLATE, ISOLATION_SOURCE, LAT_LON,
    LOCATION, ORGANISM, ORIGINATING_LAB, PASSAGE, PASSAGE_HISTORY, PATIENT_AGE,
    SAMPLE_COLLECTION_DATE, SAMPLE_NAME, SAMPLE_TITLE,
};
use crate::error::{MergeError, Result};

pub const DEFAULT_ORGANISM: &str = "Severe acute respiratory syndrome coronavirus 2";
pub const DEFAULT_HOST: &str = "Homo sapiens";
pub const DEFAULT_HOST_DISEASE: &str = "COVID-19";

/// Position of the isolate in a `hCoV-19/<country>/<isolate>/<year>` name.
const ISOLATE_TOKEN: usize = 2;

/// Caller-supplied values for a BioSample merge.
#[derive(Debug, Clone)]
pub struct BiosampleOptions {
    pub bioproject: String,
    pub sentinel: Sentinel,
    pub organism: String,
    pub host: String,
    pub host_disease: String,
}

impl BiosampleOptions {
    pub fn new(bioproject: impl Into<String>) -> Self {
        Self {
            bioproject: bioproject.into(),
            sentinel: Sentinel::default(),
            organism: DEFAULT_ORGANISM.to_string(),
            host: DEFAULT_HOST.to_string(),
            host_disease: DEFAULT_HOST_DISEASE.to_string(),
        }
    }

    pub fn with_sentinel(mut self, sentinel: Sentinel) -> Self {
        self.sentinel = sentinel;
        self
    }
}

fn isolate_from_key() -> ColumnRule {
    ColumnRule::from_key(ISOLATE).then(DerivationRule::SplitExtract {
        delimiter: "/".to_string(),
        index: ISOLATE_TOKEN,
    })
}

fn optional(target: &str, column: &str) -> ColumnRule {
    ColumnRule::from_column(target, column).then(DerivationRule::SubstituteIfMissing)
}

/// The BioSample column derivations.
pub fn biosample_plan(options: &BiosampleOptions) -> MappingPlan {
    let title = ColumnRule {
        target: SAMPLE_TITLE.to_string(),
        ..isolate_from_key()
    }
    .then(DerivationRule::ConditionalFormat {
        companion: Source::Column(ACCESSION_ID.to_string()),
        present: "SARS-Cov-2 {value} (GISAID {companion})".to_string(),
        absent: "SARS-Cov-2 {value}".to_string(),
    });

    MappingPlan::new()
        .with(ColumnRule::from_key(SAMPLE_NAME))
        .with(title)
        .with(ColumnRule::constant(BIOPROJECT_ACCESSION, &options.bioproject))
        .with(ColumnRule::constant(ORGANISM, &options.organism))
        .with(isolate_from_key())
        .with(optional(DESCRIPTION, ACCESSION_ID))
        .with(optional(COLLECTED_BY, ORIGINATING_LAB))
        .with(
            ColumnRule::from_column(SAMPLE_COLLECTION_DATE, COLLECTION_DATE)
                .then(DerivationRule::AbsentIfSentinel)
                .then(DerivationRule::Affix {
                    prefix: "'".to_string(),
                    suffix: String::new(),
                })
                .then(DerivationRule::SubstituteIfMissing),
        )
        .with(
            ColumnRule::from_column(GEO_LOC_NAME, LOCATION)
                .then(DerivationRule::SplitJoin {
                    delimiter: "/".to_string(),
                    start: 1,
                    end: 3,
                    separator: ": ".to_string(),
                })
                .then(DerivationRule::SubstituteIfMissing),
        )
        .with(ColumnRule::constant(HOST, &options.host))
        .with(ColumnRule::constant(HOST_DISEASE, &options.host_disease))
        .with(ColumnRule::constant(ISOLATION_SOURCE, options.sentinel.as_str()))
        .with(ColumnRule::constant(LAT_LON, options.sentinel.as_str()))
        .with(optional(HOST_AGE, PATIENT_AGE))
        .with(optional(HOST_SEX, GENDER))
        .with(optional(PASSAGE_HISTORY, PASSAGE))
}

/// Merge a keyed GISAID upload with its keyed download records onto the
/// column layout of an NCBI BioSample template.
///
/// Upload rows without a download record keep an empty GISAID accession.
/// One output row per upload row, in upload order.
pub fn merge_biosample(
    template: &Table,
    upload: &Table,
    download: &Table,
    options: &BiosampleOptions,
) -> Result<Table> {
    let span = info_span!("merge_biosample", bioproject = %options.bioproject);
    let _guard = span.enter();

    let download = accession_source(download)?;
    let joined = upload.join(&download, &[ACCESSION_ID], JoinKind::Left)?;
    let schema = template.column_names();
    let ctx = DeriveContext::new(options.sentinel);
    let merged = biosample_plan(options).execute(&joined, &schema, &ctx)?;

    info!(
        samples = merged.height(),
        columns = merged.width(),
        with_accession = joined.values(ACCESSION_ID)?.iter().flatten().count(),
        "merged BioSample table"
    );
    Ok(merged)
}

/// A download with no surviving records may lack the accession column.
fn accession_source(download: &Table) -> Result<Cow<'_, Table>> {
    if download.has_column(ACCESSION_ID) {
        return Ok(Cow::Borrowed(download));
    }
    match download.key_column() {
        Some(key) if download.is_empty() => {
            let empty = Table::empty(&[key.to_string(), ACCESSION_ID.to_string()])?.with_key(key)?;
            Ok(Cow::Owned(empty))
        }
        _ => Err(MergeError::MissingColumn {
            table: "GISAID download",
            column: ACCESSION_ID.to_string(),
        }),
    }
}
