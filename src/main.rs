use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use taxonet_core::{
    graph::metrics::{strongest_negative_edge, strongest_positive_edge},
    persistence,
    sample::Sample,
    taxonomy::{TaxonHierarchy, TaxonRecord},
    AnalysisSession, NetworkConfig, Rank, TaxonId,
};

#[derive(Parser, Debug)]
#[command(name = "taxonet", about = "Taxon correlation network CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the correlation network once and print the visible graph.
    Analyze {
        /// Path to the taxonomy nodes file (NCBI nodes.dmp format)
        #[arg(long)]
        nodes: PathBuf,
        /// Path to the taxonomy names file (NCBI names.dmp format)
        #[arg(long)]
        names: Option<PathBuf>,
        /// Path to a taxon-id-to-count CSV (one sample per column)
        #[arg(long)]
        counts: PathBuf,
        /// Aggregation rank
        #[arg(long, default_value = "genus")]
        rank: String,
        /// Lower correlation threshold
        #[arg(long, default_value_t = -1.0)]
        min_correlation: f64,
        /// Upper correlation threshold
        #[arg(long, default_value_t = 1.0)]
        max_correlation: f64,
        /// Significance ceiling
        #[arg(long, default_value_t = 1.0)]
        max_p_value: f64,
        /// Lower relative-frequency threshold
        #[arg(long, default_value_t = 0.0)]
        min_frequency: f64,
        /// Upper relative-frequency threshold
        #[arg(long, default_value_t = 1.0)]
        max_frequency: f64,
        /// Show vertices that have no incident edges at all
        #[arg(long)]
        show_isolated: bool,
        /// Directory to save filter state and samples into
        #[arg(long)]
        session_dir: Option<PathBuf>,
    },

    /// Interactive threshold adjustment against a built network.
    Repl {
        /// Path to the taxonomy nodes file (NCBI nodes.dmp format)
        #[arg(long)]
        nodes: PathBuf,
        /// Path to the taxonomy names file (NCBI names.dmp format)
        #[arg(long)]
        names: Option<PathBuf>,
        /// Path to a taxon-id-to-count CSV (one sample per column)
        #[arg(long)]
        counts: PathBuf,
        /// Initial aggregation rank
        #[arg(long, default_value = "genus")]
        rank: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            nodes,
            names,
            counts,
            rank,
            min_correlation,
            max_correlation,
            max_p_value,
            min_frequency,
            max_frequency,
            show_isolated,
            session_dir,
        } => {
            let config = NetworkConfig {
                show_isolated_vertices: show_isolated,
                ..NetworkConfig::default()
            };
            let mut session = setup_session(&nodes, names.as_deref(), &counts, &rank, config)?;

            let filters = session.filters_mut();
            filters.set_min_correlation(min_correlation);
            filters.set_max_correlation(max_correlation);
            filters.set_max_p_value(max_p_value);
            filters.set_min_frequency(min_frequency);
            filters.set_max_frequency(max_frequency);
            session.apply_filters();

            print_summary(&session);

            if let Some(dir) = session_dir {
                println!("Saving session to {}...", dir.display());
                let metadata = persistence::SessionMetadata::new(session.config());
                persistence::save_session(&dir, &metadata, session.filters(), session.samples())?;
                println!("Session saved.");
            }
        }
        Commands::Repl {
            nodes,
            names,
            counts,
            rank,
        } => {
            let session = setup_session(
                &nodes,
                names.as_deref(),
                &counts,
                &rank,
                NetworkConfig::default(),
            )?;
            cmd_repl(session)?;
        }
    }

    Ok(())
}

/// Parse the inputs, load every sample, and build the initial network.
fn setup_session(
    nodes: &Path,
    names: Option<&Path>,
    counts: &Path,
    rank: &str,
    config: NetworkConfig,
) -> anyhow::Result<AnalysisSession> {
    let rank = parse_rank(rank)?;

    println!("Parsing taxonomy from {}...", nodes.display());
    let hierarchy = parse_taxonomy(nodes, names)?;
    println!("Taxonomy loaded: {} taxa.", hierarchy.len());

    let samples = parse_counts_csv(counts, &hierarchy)
        .with_context(|| format!("failed to load {}", counts.display()))?;
    println!("Loaded {} samples from {}.", samples.len(), counts.display());

    let mut session = AnalysisSession::with_config(Arc::new(hierarchy), config);
    for sample in samples {
        session.samples_mut().add(sample);
    }
    let names: Vec<String> = session
        .samples()
        .iter()
        .map(|(_, s)| s.name.clone())
        .collect();
    println!("Samples: {}", names.join(", "));
    session.filters_mut().set_rank(rank);

    println!("Computing correlation network at rank {rank}...");
    session.rebuild()?;
    Ok(session)
}

fn parse_rank(s: &str) -> anyhow::Result<Rank> {
    let valid = || {
        Rank::NAMED
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let rank = Rank::from_str(s)
        .map_err(|e| anyhow::anyhow!("{e}; valid ranks: {}", valid()))?;
    if rank == Rank::NoRank {
        bail!("'{s}' is not a valid aggregation rank; valid ranks: {}", valid());
    }
    Ok(rank)
}

/// Parse an NCBI-style nodes.dmp (id | parent | rank | ...), optionally
/// joined with names.dmp scientific names.
fn parse_taxonomy(nodes_path: &Path, names_path: Option<&Path>) -> anyhow::Result<TaxonHierarchy> {
    let mut names = std::collections::HashMap::new();
    if let Some(path) = names_path {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for line in text.lines() {
            let fields = split_dmp_line(line);
            // Keep only the canonical name of each taxon.
            if fields.len() >= 4 && fields[3] == "scientific name" {
                let id: u32 = fields[0]
                    .parse()
                    .with_context(|| format!("bad taxon id in names file: '{}'", fields[0]))?;
                names.insert(id, fields[1].to_string());
            }
        }
    }

    let text = std::fs::read_to_string(nodes_path)
        .with_context(|| format!("failed to read {}", nodes_path.display()))?;
    let mut records = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_dmp_line(line);
        if fields.len() < 3 {
            bail!("malformed nodes line: '{line}'");
        }
        let id: u32 = fields[0]
            .parse()
            .with_context(|| format!("bad taxon id in nodes file: '{}'", fields[0]))?;
        let parent: u32 = fields[1]
            .parse()
            .with_context(|| format!("bad parent id in nodes file: '{}'", fields[1]))?;
        let rank = Rank::from_str(fields[2]).unwrap_or(Rank::NoRank);
        let name = names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("taxon {id}"));
        records.push(TaxonRecord::new(id, name, rank, Some(parent)));
    }

    Ok(TaxonHierarchy::build(records)?)
}

/// Split one dmp line into its `\t|\t`-separated fields.
fn split_dmp_line(line: &str) -> Vec<&str> {
    line.trim_end_matches("\t|")
        .split("\t|\t")
        .map(str::trim)
        .collect()
}

/// Parse a taxon-id-to-count CSV: first column taxon id, every further
/// column one sample. A non-numeric first cell is treated as a header
/// row carrying sample names.
///
/// Counts may be written as floats (some exporters do) and are truncated
/// to integers. Unknown taxon ids fail the whole file so a bad input
/// never contaminates the store.
fn parse_counts_csv(path: &Path, hierarchy: &TaxonHierarchy) -> anyhow::Result<Vec<Sample>> {
    let text = std::fs::read_to_string(path)?;
    let mut lines = text.lines().peekable();

    let mut samples: Vec<Sample> = Vec::new();
    if let Some(first) = lines.peek() {
        let cells: Vec<&str> = first.split(',').collect();
        if cells.len() < 2 {
            bail!("count file needs at least a taxon column and one sample column");
        }
        let has_header = cells[0].trim().parse::<u32>().is_err();
        for (i, cell) in cells.iter().enumerate().skip(1) {
            let name = if has_header {
                cell.trim().to_string()
            } else {
                format!("sample_{i}")
            };
            let mut sample = Sample::new(name);
            sample
                .metadata
                .insert("source".into(), path.display().to_string());
            samples.push(sample);
        }
        if has_header {
            lines.next();
        }
    }

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').collect();
        if cells.len() != samples.len() + 1 {
            bail!(
                "row has {} columns, expected {}: '{line}'",
                cells.len(),
                samples.len() + 1
            );
        }
        let id: u32 = cells[0]
            .trim()
            .parse()
            .with_context(|| format!("bad taxon id '{}'", cells[0]))?;
        // Resolve against the hierarchy before anything reaches the core.
        let taxon = hierarchy.lookup(TaxonId(id))?.id;
        for (sample, cell) in samples.iter_mut().zip(&cells[1..]) {
            let count = cell
                .trim()
                .parse::<f64>()
                .with_context(|| format!("bad count '{cell}' for taxon {id}"))?;
            if count < 0.0 {
                bail!("negative count for taxon {id}");
            }
            sample.counts.insert(taxon, count as u64);
        }
    }

    Ok(samples)
}

fn print_summary(session: &AnalysisSession) {
    let Some(network) = session.network() else {
        println!("No network built yet.");
        return;
    };
    let metrics = session.metrics().expect("network exists");

    println!(
        "Network: {} vertices ({} visible), {} edges ({} visible), mean visible degree {:.2}",
        metrics.vertex_count,
        metrics.visible_vertices,
        metrics.edge_count,
        metrics.visible_edges,
        metrics.avg_visible_degree,
    );

    if let Some(edge) = strongest_positive_edge(network) {
        println!(
            "Strongest positive: {} -- {} (r = {:.3}, p = {:.3})",
            vertex_label(session, edge.a),
            vertex_label(session, edge.b),
            edge.correlation,
            edge.p_value
        );
    }
    if let Some(edge) = strongest_negative_edge(network) {
        println!(
            "Strongest negative: {} -- {} (r = {:.3}, p = {:.3})",
            vertex_label(session, edge.a),
            vertex_label(session, edge.b),
            edge.correlation,
            edge.p_value
        );
    }

    let hubs = network.hubs();
    if !hubs.is_empty() {
        let labels: Vec<String> = hubs.iter().map(|v| v.name.clone()).collect();
        println!("Hubs: {}", labels.join(", "));
    }

    const MAX_LISTED: usize = 30;
    let visible = network.visible_edges();
    for edge in visible.iter().take(MAX_LISTED) {
        println!(
            "  {} -- {}  r = {:+.3}  p = {:.4}",
            vertex_label(session, edge.a),
            vertex_label(session, edge.b),
            edge.correlation,
            edge.p_value
        );
    }
    if visible.len() > MAX_LISTED {
        println!("  ... and {} more visible edges", visible.len() - MAX_LISTED);
    }
}

fn vertex_label(session: &AnalysisSession, id: TaxonId) -> String {
    session
        .network()
        .and_then(|n| n.vertex(id))
        .map(|v| v.name.clone())
        .unwrap_or_else(|| format!("taxon {id}"))
}

/// Interactive loop: threshold commands recompute visibility, a rank
/// change triggers a full rebuild.
fn cmd_repl(mut session: AnalysisSession) -> anyhow::Result<()> {
    print_summary(&session);
    println!("Commands: min_corr/max_corr/max_p/min_freq/max_freq <value>, rank <rank>, show, quit");

    let stdin = io::stdin();
    loop {
        print!("taxonet> ");
        io::stdout().flush()?;

        let mut buf = String::new();
        let n = stdin.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        let line = buf.trim();
        if line.is_empty() || line == "quit" || line == "exit" {
            break;
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();

        match (command, argument) {
            ("show", _) => print_summary(&session),
            ("rank", Some(arg)) => match parse_rank(arg) {
                Ok(rank) => {
                    session.filters_mut().set_rank(rank);
                    match session.rebuild() {
                        Ok(()) => print_summary(&session),
                        Err(e) => println!("rebuild failed: {e}"),
                    }
                }
                Err(e) => println!("{e}"),
            },
            (cmd, Some(arg)) => {
                let Ok(value) = arg.parse::<f64>() else {
                    println!("not a number: '{arg}'");
                    continue;
                };
                let filters = session.filters_mut();
                match cmd {
                    "min_corr" => filters.set_min_correlation(value),
                    "max_corr" => filters.set_max_correlation(value),
                    "max_p" => filters.set_max_p_value(value),
                    "min_freq" => filters.set_min_frequency(value),
                    "max_freq" => filters.set_max_frequency(value),
                    other => {
                        println!("unknown command '{other}'");
                        continue;
                    }
                }
                session.apply_filters();
                print_summary(&session);
            }
            (other, None) => println!("unknown command '{other}'"),
        }
    }

    Ok(())
}
