//! Built-in smoke scenarios for `gnb test`.
//!
//! Each scenario runs the real readers and mergers on small embedded
//! fixtures, so an installed binary can be checked without any input files.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use comfy_table::{Cell, CellAlignment, Color};
use gnb_ingest::{RecordOptions, parse_records};
use gnb_merge::{BiosampleOptions, MergeError, RunOptions, build_run_metadata, merge_biosample};
use gnb_model::{Sentinel, Table};
use gnb_transform::{TransformError, split_extract};

use crate::output::{apply_table_style, header_cell};

const DOWNLOAD_RECORDS: &str = concat!(
    r#"{"covv_virus_name": "achcov19/Xla/XC81/2121", "covv_accession_id": "EPI_ISL_0000001", "covv_patient_age": "unknown", "covv_location": "Oceania / Australia / Victoria"}"#,
    "\n",
    r#"{"covv_virus_name": "hCoV-19/Australia/VIC-99/2020", "covv_accession_id": "EPI_ISL_0000099", "covv_patient_age": 41}"#,
    "\n",
);

const TEMPLATE_COLUMNS: [&str; 8] = [
    "*sample_name",
    "sample_title",
    "bioproject_accession",
    "isolate",
    "*collection_date",
    "*geo_loc_name",
    "host_age",
    "description",
];

/// Result of one scenario.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub name: &'static str,
    pub error: Option<String>,
}

impl Outcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

type Scenario = fn() -> Result<()>;

const SCENARIOS: [(&str, Scenario); 9] = [
    ("version is set", version_is_set),
    ("download records keyed by virus name", records_keyed_by_virus_name),
    ("unknown replaced by sentinel", unknown_replaced_by_sentinel),
    ("isolate split from virus name", isolate_split_from_virus_name),
    ("BioSample host age carried", biosample_host_age),
    ("BioSample title with and without accession", biosample_titles),
    ("BioSample columns follow template", biosample_column_order),
    ("SRA run built per attribute row", run_built_per_attribute),
    ("SRA instrument lookup is strict", run_lookup_is_strict),
];

/// Run every scenario, in order.
pub fn run_scenarios() -> Vec<Outcome> {
    SCENARIOS
        .iter()
        .map(|&(name, scenario)| Outcome {
            name,
            error: scenario().err().map(|err| format!("{err:#}")),
        })
        .collect()
}

/// Outcomes as a terminal table.
pub fn render_outcomes(outcomes: &[Outcome]) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table.set_header(vec![header_cell("Scenario"), header_cell("Result"), header_cell("Detail")]);
    apply_table_style(&mut table);
    for outcome in outcomes {
        let result = if outcome.passed() {
            Cell::new("PASS").fg(Color::Green)
        } else {
            Cell::new("FAIL").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(outcome.name),
            result.set_alignment(CellAlignment::Center),
            Cell::new(outcome.error.as_deref().unwrap_or_default()),
        ]);
    }
    table
}

fn column(name: &str, values: &[Option<&str>]) -> (String, Vec<Option<String>>) {
    (
        name.to_string(),
        values.iter().map(|value| value.map(str::to_string)).collect(),
    )
}

fn download(sentinel: Sentinel) -> Result<Table> {
    let options = RecordOptions {
        sentinel: Some(sentinel),
        ..RecordOptions::default()
    };
    parse_records(Cursor::new(DOWNLOAD_RECORDS), Path::new("selftest.json"), &options)
        .context("parse embedded download records")
}

fn upload() -> Result<Table> {
    let table = Table::from_columns(vec![
        column(
            "covv_virus_name",
            &[Some("achcov19/Xla/XC81/2121"), Some("hCoV-19/Australia/VIC-02/2020")],
        ),
        column("covv_orig_lab", &[Some("VIDRL"), None]),
        column("covv_collection_date", &[Some("2020-03-14"), None]),
        column("covv_location", &[Some("Oceania / Australia / Victoria"), None]),
        column("covv_patient_age", &[Some("missing"), Some("65")]),
        column("covv_gender", &[None, Some("Male")]),
        column("covv_passage", &[Some("Original"), Some("Original")]),
    ])?;
    Ok(table.with_key("covv_virus_name")?)
}

fn template() -> Result<Table> {
    let names: Vec<String> = TEMPLATE_COLUMNS.iter().map(|name| (*name).to_string()).collect();
    Ok(Table::empty(&names)?)
}

fn merged() -> Result<Table> {
    let options = BiosampleOptions::new("PRJNA613958");
    Ok(merge_biosample(
        &template()?,
        &upload()?,
        &download(options.sentinel)?,
        &options,
    )?)
}

fn version_is_set() -> Result<()> {
    ensure!(!env!("CARGO_PKG_VERSION").is_empty(), "package version is empty");
    Ok(())
}

fn records_keyed_by_virus_name() -> Result<()> {
    let records = download(Sentinel::Missing)?;
    let first = records.key_values()?.first().map(|key| (*key).to_string());
    ensure!(
        first.as_deref() == Some("achcov19/Xla/XC81/2121"),
        "first record key was {first:?}"
    );
    Ok(())
}

fn unknown_replaced_by_sentinel() -> Result<()> {
    let records = download(Sentinel::NotCollected)?;
    let age = records.cell(0, "covv_patient_age")?;
    ensure!(age == Some("not collected"), "patient age was {age:?}");
    Ok(())
}

fn isolate_split_from_virus_name() -> Result<()> {
    let isolate = split_extract("achcov19/Xla/XC81/2121", "/", 2)?;
    ensure!(isolate == "XC81", "isolate was {isolate}");
    Ok(())
}

fn biosample_host_age() -> Result<()> {
    let merged = merged()?;
    let age = merged.cell(1, "host_age")?;
    ensure!(age == Some("65"), "host_age was {age:?}");
    Ok(())
}

fn biosample_titles() -> Result<()> {
    let merged = merged()?;
    let titles = merged.values("sample_title")?;
    ensure!(
        titles
            == vec![
                Some("SARS-Cov-2 XC81 (GISAID EPI_ISL_0000001)"),
                Some("SARS-Cov-2 VIC-02"),
            ],
        "sample titles were {titles:?}"
    );
    Ok(())
}

fn biosample_column_order() -> Result<()> {
    let merged = merged()?;
    ensure!(
        merged.column_names() == TEMPLATE_COLUMNS,
        "columns were {:?}",
        merged.column_names()
    );
    Ok(())
}

fn run_inputs(technology: &str) -> Result<(Table, Table)> {
    let labels = Table::from_columns(vec![
        column("Virus name", &[Some("hCoV-19/Australia/VIC-02/2020")]),
        column("Sequencing technology", &[Some(technology)]),
        column("Assembly method", &[Some("minimap2")]),
    ])?
    .with_key("Virus name")?;
    let attributes = Table::from_columns(vec![
        column("accession", &[Some("SAMN001")]),
        column("sample_name", &[Some("hCoV-19/Australia/VIC-02/2020")]),
        column("isolate", &[Some("VIC-02")]),
    ])?
    .with_key("sample_name")?;
    Ok((labels, attributes))
}

fn run_template() -> Result<Table> {
    Ok(Table::empty(&[
        "biosample_accession".to_string(),
        "library_ID".to_string(),
        "instrument_model".to_string(),
        "filename".to_string(),
    ])?)
}

fn run_built_per_attribute() -> Result<()> {
    let (labels, attributes) = run_inputs("Illumina MiSeq")?;
    let runs = build_run_metadata(&labels, &attributes, &run_template()?, &RunOptions::default())?;
    ensure!(runs.height() == 1, "expected one run, got {}", runs.height());
    let library = runs.cell(0, "library_ID")?;
    ensure!(library == Some("VIC-02_illumina"), "library_ID was {library:?}");
    let filename = runs.cell(0, "filename")?;
    ensure!(filename == Some("VIC-02_R1.fq.gz"), "filename was {filename:?}");
    Ok(())
}

fn run_lookup_is_strict() -> Result<()> {
    let (labels, attributes) = run_inputs("Sanger dideoxy sequencing")?;
    match build_run_metadata(&labels, &attributes, &run_template()?, &RunOptions::default()) {
        Err(MergeError::Transform(err))
            if matches!(err.root(), TransformError::UnmappedVocabulary { .. }) =>
        {
            Ok(())
        }
        Err(other) => Err(other).context("unexpected error"),
        Ok(_) => anyhow::bail!("unmapped sequencing technology was accepted"),
    }
}
