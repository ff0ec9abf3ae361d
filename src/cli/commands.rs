//! Command implementations for the Pilum CLI.

use std::io::{self, Write};
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::collection::Collection;
use crate::document::converter::DocumentConverter;
use crate::document::converter::jsonl::JsonlDocumentConverter;
use crate::engine::{CollectionSettings, Engine, EngineConfig};
use crate::error::Result;
use crate::lexical::query::TermQuery;
use crate::schema::Mapping;
use crate::suggest::completion::CompletionSuggest;

/// Execute a CLI command, writing to standard output.
pub fn execute_command(args: PilumArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&args, &mut out)
}

/// Execute a CLI command, writing to `out`.
pub fn run_command<W: Write>(args: &PilumArgs, out: &mut W) -> Result<()> {
    match &args.command {
        Command::Term(term_args) => term(term_args, args, out),
        Command::Suggest(suggest_args) => suggest(suggest_args, args, out),
        Command::Stats(stats_args) => stats(stats_args, args, out),
    }
}

fn term<W: Write>(term_args: &TermArgs, args: &PilumArgs, out: &mut W) -> Result<()> {
    let (_engine, collection) = load_collection(&term_args.source)?;
    let query = TermQuery::new(&term_args.field, &term_args.value).with_size(term_args.size);
    let results = collection.term_query(query)?;
    write_search_results(out, &results, args)
}

fn suggest<W: Write>(suggest_args: &SuggestArgs, args: &PilumArgs, out: &mut W) -> Result<()> {
    let (_engine, collection) = load_collection(&suggest_args.source)?;
    let request = CompletionSuggest::new(&suggest_args.field, &suggest_args.prefix)
        .with_size(suggest_args.size);
    let results = collection.suggest(request)?;
    write_suggest_results(out, &results, args)
}

fn stats<W: Write>(stats_args: &StatsArgs, args: &PilumArgs, out: &mut W) -> Result<()> {
    let (_engine, collection) = load_collection(&stats_args.source)?;
    let stats = collection.stats()?;
    write_stats(out, &stats, args)
}

/// Build a refreshed, single-collection engine from the source files.
///
/// The engine is returned alongside the collection so that it stays open
/// while the collection is used.
pub fn load_collection(source: &SourceArgs) -> Result<(Engine, std::sync::Arc<Collection>)> {
    let started = Instant::now();
    let mapping = Mapping::from_json_file(&source.mapping)
        .with_context(|| format!("failed to load mapping from {}", source.mapping.display()))?;
    debug!(
        "loaded mapping with {} fields from {}",
        mapping.len(),
        source.mapping.display()
    );

    let settings = CollectionSettings::new().without_background_refresh();
    let engine = Engine::open(EngineConfig::new().with_collection_defaults(settings))?;
    let collection = engine.create_collection(&source.collection, mapping.clone())?;

    let converter = JsonlDocumentConverter::new(mapping).with_id_field(&source.id_field);
    let mut loaded = 0usize;
    let items = converter
        .convert(&source.docs)
        .with_context(|| format!("failed to open documents at {}", source.docs.display()))?;
    for item in items {
        let (id, document) =
            item.with_context(|| format!("invalid document in {}", source.docs.display()))?;
        collection.put(id, document)?;
        loaded += 1;
    }
    let generation = collection.refresh()?;

    info!(
        "indexed {loaded} documents from {} (generation {generation}) in {:?}",
        source.docs.display(),
        started.elapsed()
    );
    Ok((engine, collection))
}
