//! Oceanus CLI: command-line front end for the music influence analyses
//!
//! Loads the graph named by the config (or `--graph`), renders one view and
//! prints it as a table, JSON or CSV.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use oceanus::analysis::{EgoView, Era, MatrixMode};
use oceanus::config::AnalysisConfig;
use oceanus::graph::{EdgeType, NodeId};
use oceanus::{export_view, render, AppState, ViewModel, ViewRequest};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "oceanus", version, about = "Oceanus music influence graph analytics")]
struct Cli {
    /// Graph JSON file (overrides the config)
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    /// Song/album analysis CSV (overrides the config)
    #[arg(long, global = true)]
    songs: Option<PathBuf>,

    /// YAML analysis config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Also write the view as pretty JSON to this file
    #[arg(long, global = true)]
    export: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Node and edge counts plus what loading dropped
    Summary,
    /// All people with the roles they hold
    Artists,
    /// Nodes and links within N hops of the seeds
    Subgraph {
        /// Seed node ids
        #[arg(long = "seed", required = true, num_args = 1..)]
        seeds: Vec<String>,

        #[arg(long)]
        hops: Option<usize>,
    },
    /// Genre-to-genre influence counts
    GenreMatrix {
        #[arg(long)]
        from: Option<i32>,

        #[arg(long)]
        to: Option<i32>,

        /// outgoing or incoming
        #[arg(long)]
        mode: Option<MatrixMode>,
    },
    /// Score focus-genre artists on their recent output
    RisingStars,
    /// Contributors reached by influence paths from the seed artist
    Influencers {
        /// Seed artist name
        #[arg(long)]
        seed: Option<String>,

        #[arg(long)]
        depth: Option<usize>,

        #[arg(long)]
        top: Option<usize>,
    },
    /// Genre flow into and out of the focus genre
    Sankey {
        /// all, pre, mid or peak
        #[arg(long)]
        era: Option<Era>,

        #[arg(long)]
        min_flow: Option<usize>,
    },
    /// Inward and outward influence counts of the focus genre per year
    Timeline,
    /// Influence types into the focus genre per year
    Histogram {
        #[arg(long)]
        from: Option<i32>,

        #[arg(long)]
        to: Option<i32>,

        /// Influence edge types to count
        #[arg(long, num_args = 1..)]
        types: Option<Vec<EdgeType>>,
    },
    /// Ego network of a named artist
    Ego {
        /// Center node name
        #[arg(long)]
        center: Option<String>,

        /// collaborations or influences
        #[arg(long)]
        view: Option<EgoView>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(graph) = cli.graph {
        config.data.graph_path = graph;
    }
    if let Some(songs) = cli.songs {
        config.data.songs_path = Some(songs);
    }

    let request = apply_overrides(&mut config, cli.command);
    config.validate().context("invalid options")?;

    let state = AppState::load(config).context("loading data")?;
    let view = render(&state, &request);

    if let Some(path) = &cli.export {
        export_view(&view, path).with_context(|| format!("exporting to {}", path.display()))?;
    }

    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Csv => print_csv(&tabulate(&view))?,
        OutputFormat::Table => print_tables(&tabulate(&view)),
    }
    Ok(())
}

/// Fold command flags into the config and pick the view to render
fn apply_overrides(config: &mut AnalysisConfig, command: Commands) -> ViewRequest {
    match command {
        Commands::Summary => ViewRequest::Summary,
        Commands::Artists => ViewRequest::Artists,
        Commands::Subgraph { seeds, hops } => {
            if let Some(hops) = hops {
                config.subgraph.max_hops = hops;
            }
            ViewRequest::Subgraph {
                seeds: seeds.into_iter().map(NodeId::from).collect(),
            }
        }
        Commands::GenreMatrix { from, to, mode } => {
            let section = &mut config.genre_matrix;
            section.min_year = from.unwrap_or(section.min_year);
            section.max_year = to.unwrap_or(section.max_year);
            section.mode = mode.unwrap_or(section.mode);
            ViewRequest::GenreMatrix
        }
        Commands::RisingStars => ViewRequest::RisingStars,
        Commands::Influencers { seed, depth, top } => {
            let section = &mut config.influence_paths;
            if let Some(seed) = seed {
                section.seed_name = seed;
            }
            section.max_depth = depth.unwrap_or(section.max_depth);
            section.top_contributors = top.unwrap_or(section.top_contributors);
            ViewRequest::Influencers
        }
        Commands::Sankey { era, min_flow } => {
            let section = &mut config.sankey;
            section.era = era.unwrap_or(section.era);
            section.min_flow_strength = min_flow.unwrap_or(section.min_flow_strength);
            ViewRequest::Sankey
        }
        Commands::Timeline => ViewRequest::Timeline,
        Commands::Histogram { from, to, types } => {
            let section = &mut config.histogram;
            section.min_year = from.unwrap_or(section.min_year);
            section.max_year = to.unwrap_or(section.max_year);
            if let Some(types) = types {
                section.influence_types = types;
            }
            ViewRequest::Histogram
        }
        Commands::Ego { center, view } => {
            if let Some(center) = center {
                config.ego.center_name = center;
            }
            config.ego.view = view.unwrap_or(config.ego.view);
            ViewRequest::Ego
        }
    }
}

/// One printable table of a view
struct Section {
    title: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Section {
    fn new(title: &str, columns: &[&str]) -> Self {
        Section {
            title: title.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, cells: Vec<Value>) {
        self.rows.push(cells);
    }
}

fn joined<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn tabulate(view: &ViewModel) -> Vec<Section> {
    match view {
        ViewModel::Summary {
            statistics,
            load,
            song_records,
        } => {
            let mut s = Section::new("Summary", &["metric", "value"]);
            s.row(vec![json!("nodes"), json!(statistics.node_count)]);
            s.row(vec![json!("edges"), json!(statistics.edge_count)]);
            for (node_type, count) in &statistics.nodes_by_type {
                s.row(vec![json!(format!("nodes.{}", node_type)), json!(count)]);
            }
            for (edge_type, count) in &statistics.edges_by_type {
                s.row(vec![json!(format!("edges.{}", edge_type)), json!(count)]);
            }
            s.row(vec![json!("load.nodes_read"), json!(load.nodes_read)]);
            s.row(vec![json!("load.nodes_dropped"), json!(load.nodes_dropped())]);
            s.row(vec![json!("load.non_notable_works"), json!(load.non_notable_works)]);
            s.row(vec![json!("load.edges_read"), json!(load.edges_read)]);
            s.row(vec![json!("load.edges_dropped"), json!(load.edges_dropped())]);
            s.row(vec![json!("load.dangling_edges"), json!(load.dangling_edges)]);
            s.row(vec![json!("song_records"), json!(song_records)]);
            vec![s]
        }
        ViewModel::Artists {
            artists,
            seed,
            seed_genres,
        } => {
            let mut roster = Section::new("Artists", &["id", "name", "notable", "roles"]);
            for a in artists {
                roster.row(vec![
                    json!(a.id.as_str()),
                    json!(a.name),
                    json!(a.notable),
                    json!(joined(&a.roles)),
                ]);
            }
            let mut genres = Section::new(&format!("Genres of {}", seed), &["genre"]);
            for g in seed_genres {
                genres.row(vec![json!(g)]);
            }
            vec![roster, genres]
        }
        ViewModel::Subgraph(sub) => {
            let mut nodes = Section::new("Nodes", &["id", "type", "name", "genre", "release_date"]);
            for n in &sub.nodes {
                nodes.row(vec![
                    json!(n.id.as_str()),
                    json!(n.node_type.as_str()),
                    json!(n.display_name()),
                    json!(n.genre),
                    json!(n.release_date),
                ]);
            }
            let mut links = Section::new("Links", &["source", "target", "type"]);
            for l in &sub.links {
                links.row(vec![
                    json!(l.source.as_str()),
                    json!(l.target.as_str()),
                    json!(l.edge_type.as_str()),
                ]);
            }
            vec![nodes, links]
        }
        ViewModel::GenreMatrix { matrix, .. } => {
            let mut columns = vec!["genre"];
            columns.extend(matrix.genres.iter().map(|g| g.as_str()));
            let mut s = Section::new("Genre influence", &columns);
            for (genre, cells) in matrix.genres.iter().zip(&matrix.cells) {
                let mut row = vec![json!(genre)];
                row.extend(cells.iter().map(|v| json!(v)));
                s.row(row);
            }
            vec![s]
        }
        ViewModel::RisingStars(report) => {
            let mut stars = Section::new(
                "Rising stars",
                &["rank", "name", "score", "notable", "genres", "collaborators", "years_to_success"],
            );
            for (rank, star) in report.predictions.iter().enumerate() {
                stars.row(vec![
                    json!(rank + 1),
                    json!(star.name),
                    json!(format!("{:.1}", star.score)),
                    json!(star.windowed.notable_works),
                    json!(star.windowed.genre_spread),
                    json!(star.windowed.collaboration_score),
                    json!(star.windowed.time_to_success.map(|t| format!("{:.1}", t))),
                ]);
            }
            let mut collaborations =
                Section::new("Key collaborations", &["artist", "collaborator", "shared_works"]);
            for c in &report.key_collaborations {
                collaborations.row(vec![json!(c.artist), json!(c.collaborator), json!(c.shared_works)]);
            }
            let mut versatility = Section::new("Genre versatility", &["artist", "versatility", "genres"]);
            for v in &report.genre_versatility {
                versatility.row(vec![json!(v.artist), json!(v.versatility), json!(joined(&v.genres))]);
            }
            vec![stars, collaborations, versatility]
        }
        ViewModel::Influencers(paths) => {
            let mut top = Section::new(
                &format!("Top contributors around {}", paths.seed_name),
                &["rank", "id", "name", "events"],
            );
            for (rank, c) in paths.top_contributors.iter().enumerate() {
                top.row(vec![json!(rank + 1), json!(c.id.as_str()), json!(c.name), json!(c.events)]);
            }
            let mut events = Section::new("Influence paths", &["contributor", "year", "path"]);
            for e in &paths.top_events {
                events.row(vec![json!(e.contributor_name), json!(e.release_year), json!(e.path_text())]);
            }
            vec![top, events]
        }
        ViewModel::Sankey(diagram) => {
            let mut links = Section::new(
                &format!("{} flows ({})", diagram.focus_genre, diagram.era),
                &["source", "target", "value"],
            );
            for l in &diagram.links {
                links.row(vec![
                    json!(diagram.nodes[l.source].name),
                    json!(diagram.nodes[l.target].name),
                    json!(l.value),
                ]);
            }
            let mut inward = Section::new("Inward", &["genre", "count"]);
            for (genre, count) in &diagram.inward {
                inward.row(vec![json!(genre), json!(count)]);
            }
            let mut outward = Section::new("Outward", &["genre", "count"]);
            for (genre, count) in &diagram.outward {
                outward.row(vec![json!(genre), json!(count)]);
            }
            vec![links, inward, outward]
        }
        ViewModel::Timeline(timeline) => {
            let mut years: BTreeMap<i32, (usize, usize)> = BTreeMap::new();
            for p in &timeline.inward {
                years.entry(p.year).or_default().0 = p.count;
            }
            for p in &timeline.outward {
                years.entry(p.year).or_default().1 = p.count;
            }
            let mut s = Section::new(&format!("{} timeline", timeline.focus_genre), &["year", "inward", "outward"]);
            for (year, (inward, outward)) in years {
                s.row(vec![json!(year), json!(inward), json!(outward)]);
            }
            vec![s]
        }
        ViewModel::Histogram(histogram) => {
            let mut columns = vec!["year"];
            columns.extend(histogram.influence_types.iter().map(|t| t.as_str()));
            columns.push("total");
            let mut s = Section::new(&format!("Influences into {}", histogram.focus_genre), &columns);
            for bin in &histogram.bins {
                let mut row = vec![json!(bin.year)];
                row.extend(histogram.influence_types.iter().map(|&t| json!(bin.count(t))));
                row.push(json!(bin.total()));
                s.row(row);
            }
            vec![s]
        }
        ViewModel::Ego(network) => {
            let mut nodes = Section::new(
                &format!("Ego network ({})", network.view),
                &["id", "name", "type", "depth", "notable", "genre"],
            );
            for n in &network.nodes {
                nodes.row(vec![
                    json!(n.id.as_str()),
                    json!(n.name),
                    json!(n.node_type.as_str()),
                    json!(n.depth),
                    json!(n.notable),
                    json!(n.genre),
                ]);
            }
            let mut links = Section::new("Links", &["source", "target", "type", "direction"]);
            for l in &network.links {
                links.row(vec![
                    json!(l.source.as_str()),
                    json!(l.target.as_str()),
                    json!(l.edge_type.as_str()),
                    json!(l.direction),
                ]);
            }
            vec![nodes, links]
        }
        ViewModel::Empty { reason } => {
            let mut s = Section::new("Empty view", &["reason"]);
            s.row(vec![json!(reason)]);
            vec![s]
        }
    }
}

fn print_tables(sections: &[Section]) {
    for section in sections {
        println!("{}", section.title);
        if section.rows.is_empty() {
            println!("(no results)\n");
            continue;
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(&section.columns);
        for row in &section.rows {
            let cells: Vec<String> = row.iter().map(format_table_value).collect();
            table.add_row(cells);
        }

        println!("{}", table);
        println!("{} row(s)\n", section.rows.len());
    }
}

fn print_csv(sections: &[Section]) -> Result<()> {
    let stdout = std::io::stdout();
    write_csv(stdout.lock(), sections)
}

/// Sections separated by a blank line, each with its own header row
fn write_csv<W: Write>(mut out: W, sections: &[Section]) -> Result<()> {
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.write_all(b"\n")?;
        }
        let mut writer = csv::Writer::from_writer(&mut out);
        writer.write_record(&section.columns)?;
        for row in &section.rows {
            writer.write_record(row.iter().map(format_csv_value))?;
        }
        writer.flush()?;
    }
    Ok(())
}

fn format_table_value(v: &Value) -> String {
    match v {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => serde_json::to_string(v).unwrap_or_default(),
    }
}

fn format_csv_value(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => serde_json::to_string(v).unwrap_or_default(),
    }
}
