//! Ingest command implementation

use crate::error::Result;
use crate::models::{Metadata, RppBundle, Scalar, Section};
use crate::progress::add_progress_bar;
use crate::store::DocumentStore;
use indicatif::ProgressBar;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Statistics from an ingestion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub documents: usize,
    /// Sections with text, i.e. the ones that get a store call
    pub sections_eligible: usize,
    pub sections_skipped: usize,
    pub sections_stored: usize,
    pub sections_failed: usize,
    pub failures: Vec<SectionFailure>,
}

/// A section the API declined to store
#[derive(Debug, Clone, Serialize)]
pub struct SectionFailure {
    pub section_id: String,
    pub error: String,
}

/// Ingest options
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

/// A section selected for storage, with its derived metadata
#[derive(Debug, Clone)]
pub struct PlannedSection<'a> {
    pub doc_id: &'a Scalar,
    pub section: &'a Section,
    pub metadata: Metadata,
}

/// Select the sections to store, in input order. Sections without text are
/// left out.
pub fn plan_bundle(bundle: &RppBundle) -> Vec<PlannedSection<'_>> {
    bundle
        .documents
        .iter()
        .flat_map(|doc| {
            doc.sections
                .iter()
                .filter(|section| section.has_text())
                .map(move |section| PlannedSection {
                    doc_id: &doc.doc_id,
                    section,
                    metadata: section.metadata(doc),
                })
        })
        .collect()
}

fn base_stats(bundle: &RppBundle, plan: &[PlannedSection<'_>]) -> IngestStats {
    IngestStats {
        documents: bundle.documents.len(),
        sections_eligible: plan.len(),
        sections_skipped: bundle.section_count() - plan.len(),
        ..Default::default()
    }
}

/// Store every section with text, one call at a time.
///
/// An API response with a non-success status is reported and the loop moves
/// on; a call failure (transport or HTTP status) ends the run with that error.
pub async fn ingest_bundle(
    store: &dyn DocumentStore,
    bundle: &RppBundle,
    options: &IngestOptions,
    out: &mut dyn Write,
) -> Result<IngestStats> {
    let plan = plan_bundle(bundle);
    let mut stats = base_stats(bundle, &plan);

    info!(
        documents = stats.documents,
        sections = stats.sections_eligible,
        skipped = stats.sections_skipped,
        "Starting ingestion"
    );

    let pb = if options.show_progress {
        add_progress_bar(plan.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    for planned in &plan {
        let title = planned.section.title();
        let section_id = title.as_str();
        debug!(doc_id = %planned.doc_id, section_id, "Storing section");
        pb.set_message(title.clone());
        writeln!(out, "Storing section: {}", section_id)?;

        let response = match store
            .store_document(section_id, &planned.section.text, Some(&planned.metadata))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };

        if response.is_success() {
            stats.sections_stored += 1;
            writeln!(out, "  ✅ Success: {}", section_id)?;
        } else {
            let error = response.error_message();
            warn!(section_id, %error, "RAG API rejected section");
            stats.sections_failed += 1;
            writeln!(out, "  ❌ Failed: {}", section_id)?;
            writeln!(out, "     Error: {}", error)?;
            stats.failures.push(SectionFailure {
                section_id: section_id.to_string(),
                error,
            });
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        stored = stats.sections_stored,
        failed = stats.sections_failed,
        "Ingestion finished"
    );

    Ok(stats)
}

/// Load a bundle file and ingest it
pub async fn cmd_ingest_file(
    store: &dyn DocumentStore,
    path: &Path,
    options: &IngestOptions,
    out: &mut dyn Write,
) -> Result<IngestStats> {
    info!("Reading bundle from {}", path.display());
    let bundle = RppBundle::load(path)?;
    ingest_bundle(store, &bundle, options, out).await
}

/// List what would be stored without calling the API
pub fn cmd_dry_run(bundle: &RppBundle, out: &mut dyn Write) -> Result<IngestStats> {
    let plan = plan_bundle(bundle);
    for planned in &plan {
        let fields: Vec<String> = planned
            .metadata
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        writeln!(
            out,
            "Would store section: {} ({} chars) [{}]",
            planned.section.title(),
            planned.section.text.chars().count(),
            fields.join(", ")
        )?;
    }
    Ok(base_stats(bundle, &plan))
}

/// Print ingest stats to console
pub fn print_ingest_stats(stats: &IngestStats, dry_run: bool) {
    if dry_run {
        println!("\n✓ Dry run complete (no API calls made)");
        println!("  Documents: {}", stats.documents);
        println!("  Sections to store: {}", stats.sections_eligible);
        println!("  Sections skipped (no text): {}", stats.sections_skipped);
        return;
    }

    println!("\n✓ Ingestion complete");
    println!("  Documents: {}", stats.documents);
    println!("  Sections stored: {}", stats.sections_stored);
    if stats.sections_failed > 0 {
        println!("  Sections failed: {}", stats.sections_failed);
    }
    println!("  Sections skipped (no text): {}", stats.sections_skipped);

    if !stats.failures.is_empty() {
        println!("\nErrors:");
        for failure in &stats.failures {
            println!("- {}: {}", failure.section_id, failure.error);
        }
    }
}
