use std::io::{self, Write};

use anyhow::{Context, Result};
use gnb_ingest::{
    RecordOptions, VIRUS_NAME_COLUMN, ensure_inputs_exist, read_attribute_table,
    read_download_records, read_run_template, read_submission_template, read_upload_labels,
    read_upload_template,
};
use gnb_merge::{BiosampleOptions, RunOptions, build_run_metadata, merge_biosample};
use gnb_model::{Sentinel, Table};
use tracing::{info, info_span, trace};

use gnb_cli::logging::redact_value;
use gnb_cli::output::{render_table, write_tsv};
use gnb_cli::selftest::{render_outcomes, run_scenarios};

use crate::cli::{MergeBiosampleArgs, MergeSraArgs, RecordArgs, ViewFormatArg, ViewRecordsArgs};

pub fn run_merge_biosample(args: &MergeBiosampleArgs) -> Result<()> {
    let span = info_span!("merge_biosample", bioproject = %args.bioproject);
    let _guard = span.enter();

    ensure_inputs_exist(&[
        ("NCBI template", args.ncbi_template.as_path()),
        ("GISAID upload", args.gisaid_upload.as_path()),
        ("GISAID download", args.gisaid_json.as_path()),
    ])?;

    let sentinel = args.replacement;
    let template =
        read_submission_template(&args.ncbi_template).context("load NCBI BioSample template")?;
    let upload =
        read_upload_template(&args.gisaid_upload, sentinel).context("load GISAID upload")?;
    let download = read_download_records(
        &args.gisaid_json,
        &record_options(&args.records, Some(sentinel), true),
    )
    .context("load GISAID download records")?;
    info!(
        template_columns = template.width(),
        uploaded = upload.height(),
        downloaded = download.height(),
        "loaded inputs"
    );
    trace_keys("upload", &upload)?;

    let options = BiosampleOptions {
        organism: args.organism.clone(),
        host: args.host.clone(),
        host_disease: args.host_disease.clone(),
        ..BiosampleOptions::new(&args.bioproject).with_sentinel(sentinel)
    };
    let merged = merge_biosample(&template, &upload, &download, &options)
        .context("merge BioSample metadata")?;
    write_tsv(&merged, io::stdout().lock())
}

pub fn run_merge_sra(args: &MergeSraArgs) -> Result<()> {
    let span = info_span!("merge_sra");
    let _guard = span.enter();

    ensure_inputs_exist(&[
        ("BioSample attributes", args.attributes.as_path()),
        ("GISAID upload", args.gisaid_upload.as_path()),
        ("SRA template", args.sra_template.as_path()),
    ])?;

    let attributes = read_attribute_table(&args.attributes, Some(args.attributes_key_index))
        .context("load BioSample attributes")?;
    let labels = read_upload_labels(&args.gisaid_upload, args.upload_key_index)
        .context("load GISAID upload labels")?;
    let template = read_run_template(&args.sra_template).context("load SRA template")?;
    info!(
        attributes = attributes.height(),
        uploaded = labels.height(),
        template_rows = template.height(),
        "loaded inputs"
    );
    trace_keys("attributes", &attributes)?;

    let runs = build_run_metadata(&labels, &attributes, &template, &RunOptions::default())
        .context("build SRA run metadata")?;
    write_tsv(&runs, io::stdout().lock())
}

pub fn run_view_records(args: &ViewRecordsArgs) -> Result<()> {
    let span = info_span!("view_records", path = %args.gisaid_json.display());
    let _guard = span.enter();

    ensure_inputs_exist(&[("GISAID download", args.gisaid_json.as_path())])?;
    let options = record_options(&args.records, None, false);
    let records = read_download_records(&args.gisaid_json, &options)
        .context("load GISAID download records")?;
    info!(records = records.height(), fields = records.width(), "loaded records");

    match args.format {
        ViewFormatArg::Tsv => write_tsv(&records, io::stdout().lock()),
        ViewFormatArg::Table => print_rendered(&render_table(&records)?),
    }
}

/// Run every self-test scenario; `Ok(false)` when any failed.
pub fn run_self_test() -> Result<bool> {
    let span = info_span!("self_test");
    let _guard = span.enter();

    let outcomes = run_scenarios();
    print_rendered(&render_outcomes(&outcomes))?;
    let failed = outcomes.iter().filter(|outcome| !outcome.passed()).count();
    info!(scenarios = outcomes.len(), failed, "self-test finished");
    Ok(failed == 0)
}

fn record_options(args: &RecordArgs, sentinel: Option<Sentinel>, keyed: bool) -> RecordOptions {
    RecordOptions {
        drop: args.drop.clone(),
        filter: args.filter_regex.clone(),
        sentinel,
        key_column: keyed.then(|| VIRUS_NAME_COLUMN.to_string()),
    }
}

fn trace_keys(source: &str, table: &Table) -> Result<()> {
    for key in table.key_values()? {
        trace!(source, key = redact_value(key), "keyed row");
    }
    Ok(())
}

fn print_rendered(rendered: &dyn std::fmt::Display) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("write to stdout")?;
    Ok(())
}
