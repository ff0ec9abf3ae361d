//! Output formatting for CLI commands.

use std::io::Write;

use serde::Serialize;

use crate::cli::args::{OutputFormat, PilumArgs};
use crate::collection::CollectionStats;
use crate::error::Result;
use crate::lexical::query::SearchResults;
use crate::suggest::completion::SuggestResults;

/// Write term query results.
pub fn write_search_results<W: Write>(
    out: &mut W,
    results: &SearchResults,
    args: &PilumArgs,
) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return write_json(out, results, args);
    }

    writeln!(out, "Search Results:")?;
    writeln!(out, "═══════════════")?;
    for (i, hit) in results.hits.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "Result {}: (id: {})", i + 1, hit.doc_id)?;
        writeln!(out, "─────────────")?;
        for (name, value) in hit.document.fields() {
            match value.as_text() {
                Some(text) => writeln!(out, "{name}: {text}")?,
                None => writeln!(out, "{name}: {}", value.to_completion().input.join(", "))?,
            }
        }
    }
    writeln!(out)?;
    writeln!(out, "Total hits: {}", results.total_hits)?;
    if args.verbosity() > 1 {
        writeln!(out, "Generation: {}", results.generation)?;
    }
    Ok(())
}

/// Write completion suggestions.
pub fn write_suggest_results<W: Write>(
    out: &mut W,
    results: &SuggestResults,
    args: &PilumArgs,
) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return write_json(out, results, args);
    }

    if results.options.is_empty() {
        writeln!(out, "No suggestions")?;
        return Ok(());
    }
    for option in &results.options {
        if args.verbosity() > 1 {
            writeln!(
                out,
                "{} (id: {}, weight: {})",
                option.text, option.doc_id, option.score
            )?;
        } else {
            writeln!(out, "{}", option.text)?;
        }
    }
    Ok(())
}

/// Write collection statistics.
pub fn write_stats<W: Write>(out: &mut W, stats: &CollectionStats, args: &PilumArgs) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return write_json(out, stats, args);
    }

    writeln!(out, "Collection Statistics:")?;
    writeln!(out, "═════════════════════")?;
    writeln!(out, "Name: {}", stats.name)?;
    writeln!(out, "Generation: {}", stats.generation)?;
    writeln!(out, "Documents: {}", stats.num_docs)?;
    writeln!(out, "Pending operations: {}", stats.pending_ops)?;
    writeln!(out, "Refreshed at: {}", stats.refreshed_at.to_rfc3339())?;

    if !stats.terms.is_empty() {
        writeln!(out)?;
        writeln!(out, "Terms:")?;
        for (field, count) in &stats.terms {
            writeln!(out, "  {field}: {count}")?;
        }
    }
    if !stats.completion_entries.is_empty() {
        writeln!(out)?;
        writeln!(out, "Completion entries:")?;
        for (field, count) in &stats.completion_entries {
            writeln!(out, "  {field}: {count}")?;
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, args: &PilumArgs) -> Result<()> {
    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
