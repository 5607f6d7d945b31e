//! Command-line interface for the neuromap utility
//!
//! Edits a file-backed knowledge map and renders it as a character-grid
//! scene after settling the force layout.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use crate::colorizer::colorize_scene;
use neuromap::core::logging::init_logging;
use neuromap::prelude::*;
use neuromap::sample;

/// Neuromap - a force-directed knowledge map in your terminal
#[derive(Parser)]
#[command(name = "neuromap")]
#[command(about = "Edit and render a force-directed knowledge map")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory the knowledge map is stored in
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Settle the layout and render the map
    Show {
        /// Highlight the connection neighborhood of this neuron
        #[arg(long)]
        focus: Option<String>,

        /// Character set for markers and lines
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,

        /// When to use colors in output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,

        /// Canvas width in columns
        #[arg(long, default_value_t = 72)]
        width: usize,

        /// Lay out in three dimensions (rendered front-on) instead of the plane
        #[arg(long)]
        three_d: bool,

        /// Hide neuron titles
        #[arg(long)]
        no_labels: bool,
    },

    /// List neurons and connections
    List {
        /// Show as the stored JSON document
        #[arg(long)]
        json: bool,
    },

    /// Add a neuron
    Add {
        /// Title of the neuron
        title: String,

        /// Unique id; derived from the title if omitted
        #[arg(long)]
        id: Option<String>,

        /// Classification of the neuron
        #[arg(long, value_enum, default_value_t = KindChoice::Concept)]
        kind: KindChoice,

        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,

        /// How settled this knowledge is
        #[arg(long, value_enum, default_value_t = ConfidenceChoice::Medium)]
        confidence: ConfidenceChoice,

        /// Pin at "x,y,z" instead of auto-placement
        #[arg(long, value_name = "X,Y,Z")]
        pin: Option<String>,
    },

    /// Connect two neurons with a weighted edge
    Link {
        /// Source neuron id
        source: String,

        /// Target neuron id
        target: String,

        /// Connection strength in [0, 1]
        #[arg(long, default_value_t = 0.5)]
        weight: f32,

        /// Connection id; derived from the endpoints if omitted
        #[arg(long)]
        id: Option<String>,
    },

    /// Remove a neuron (cascading to its connections) or a connection
    Remove {
        /// Id of the neuron or connection to remove
        id: String,
    },

    /// Print the stored document JSON
    Export,

    /// Replace stored state from a JSON file (use - for stdin)
    Import {
        /// Input file containing a graph document
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Delete the stored document
    Clear,
}

/// Character sets for scene rendering
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for GlyphSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => GlyphSet::Ascii,
            StyleChoice::Unicode => GlyphSet::Unicode,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Neuron classifications
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum KindChoice {
    Concept,
    Principle,
    Question,
}

impl From<KindChoice> for NodeKind {
    fn from(value: KindChoice) -> Self {
        match value {
            KindChoice::Concept => NodeKind::Concept,
            KindChoice::Principle => NodeKind::Principle,
            KindChoice::Question => NodeKind::Question,
        }
    }
}

/// Confidence levels
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum ConfidenceChoice {
    Low,
    Medium,
    High,
}

impl From<ConfidenceChoice> for Confidence {
    fn from(value: ConfidenceChoice) -> Self {
        match value {
            ConfidenceChoice::Low => Confidence::Low,
            ConfidenceChoice::Medium => Confidence::Medium,
            ConfidenceChoice::High => Confidence::High,
        }
    }
}

/// The CLI application
pub struct NeuromapApp;

impl Default for NeuromapApp {
    fn default() -> Self {
        Self::new()
    }
}

impl NeuromapApp {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Re-apply logging flags; fails harmlessly if already initialized
        let _ = init_logging(Some(cli.log_level.as_str()), Some(cli.log_format.as_str()));

        let archive = GraphArchive::new(FileBackend::new(&cli.data_dir));

        match cli.command {
            Commands::Show {
                focus,
                style,
                color,
                width,
                three_d,
                no_labels,
            } => self.show(archive, focus, style, color, width, three_d, no_labels),
            Commands::List { json } => self.list(archive, json),
            Commands::Add {
                title,
                id,
                kind,
                description,
                confidence,
                pin,
            } => self.add(archive, title, id, kind, description, confidence, pin),
            Commands::Link {
                source,
                target,
                weight,
                id,
            } => self.link(archive, source, target, weight, id),
            Commands::Remove { id } => self.remove(archive, id),
            Commands::Export => {
                println!("{}", archive.export());
                Ok(())
            }
            Commands::Import { input } => self.import(archive, input),
            Commands::Clear => {
                let mut archive = archive;
                archive.clear();
                println!("Stored map cleared");
                Ok(())
            }
        }
    }

    /// Open the stored map, falling back to the sample graph on first run.
    /// The archive stays attached, so every change writes through.
    fn open(&self, archive: GraphArchive<FileBackend>) -> GraphStore {
        let document = archive.load();
        let mut store = GraphStore::new();
        archive.attach(&mut store);
        match document {
            Some(document) => store.load(document.neurons, document.connections),
            None => {
                info!("no stored map found, seeding the sample graph");
                sample::load_sample(&mut store);
            }
        }
        store
    }

    #[allow(clippy::too_many_arguments)]
    fn show(
        &self,
        archive: GraphArchive<FileBackend>,
        focus: Option<String>,
        style: StyleChoice,
        color: ColorChoice,
        width: usize,
        three_d: bool,
        no_labels: bool,
    ) -> Result<()> {
        let mut store = self.open(archive);
        if let Some(focus) = &focus {
            if store.neuron(focus).is_none() {
                return Err(anyhow!("no neuron with id `{focus}`"));
            }
        }

        let config = SimulationConfig {
            mode: if three_d {
                LayoutMode::ThreeD
            } else {
                LayoutMode::TwoD
            },
            ..Default::default()
        };
        let radius = config.boundary_radius;
        let steps = neuromap::settle_layout(&mut store, config);
        debug!(steps, "layout settled");

        let renderer = SceneRenderer::with_config(SceneConfig {
            width: width.max(20),
            height: (width.max(20) / 2).max(10),
            radius: radius + 0.5,
            glyphs: style.into(),
            show_labels: !no_labels,
        });
        let scene = renderer.render(store.graph(), focus.as_deref());

        let colorize = match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        };
        if colorize {
            println!("{}", colorize_scene(&scene));
        } else {
            println!("{}", scene);
        }
        Ok(())
    }

    fn list(&self, archive: GraphArchive<FileBackend>, json: bool) -> Result<()> {
        let store = self.open(archive);
        if json {
            let document = GraphDocument::snapshot(store.graph());
            println!("{}", serde_json::to_string_pretty(&document)?);
            return Ok(());
        }

        println!("Neurons:");
        for neuron in store.neurons() {
            let placement = match neuron.position {
                Position::Auto => "auto".to_string(),
                Position::Fixed(at) => format!("pinned {at}"),
            };
            println!(
                "  {:<12} {:<10} {:<8} {}  [{}]",
                neuron.id, neuron.kind, neuron.confidence, neuron.title, placement
            );
        }
        println!("Connections:");
        for connection in store.connections() {
            println!(
                "  {:<12} {} -- {}  (weight {:.2})",
                connection.id, connection.source_id, connection.target_id, connection.weight
            );
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn add(
        &self,
        archive: GraphArchive<FileBackend>,
        title: String,
        id: Option<String>,
        kind: KindChoice,
        description: String,
        confidence: ConfidenceChoice,
        pin: Option<String>,
    ) -> Result<()> {
        let mut store = self.open(archive);
        let id = id.unwrap_or_else(|| unique_id(&slugify(&title), &store));

        let mut neuron = Neuron::new(&id, title)
            .with_kind(kind.into())
            .with_description(description);
        neuron.confidence = confidence.into();
        if let Some(pin) = pin {
            neuron.position = Position::Fixed(parse_point(&pin)?);
        }

        store.add_neuron(neuron)?;
        println!("Added neuron `{id}`");
        Ok(())
    }

    fn link(
        &self,
        archive: GraphArchive<FileBackend>,
        source: String,
        target: String,
        weight: f32,
        id: Option<String>,
    ) -> Result<()> {
        let mut store = self.open(archive);
        let id = id.unwrap_or_else(|| unique_id(&format!("{source}--{target}"), &store));

        store.add_connection(Connection::new(&id, source, target, weight))?;
        println!("Added connection `{id}`");
        Ok(())
    }

    fn remove(&self, archive: GraphArchive<FileBackend>, id: String) -> Result<()> {
        let mut store = self.open(archive);
        match store.remove_neuron(&id) {
            Ok(_) => {
                println!("Removed neuron `{id}` and its connections");
                Ok(())
            }
            Err(MapError::NodeNotFound { .. }) => {
                store
                    .remove_connection(&id)
                    .map_err(|_| anyhow!("nothing with id `{id}` to remove"))?;
                println!("Removed connection `{id}`");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn import(&self, mut archive: GraphArchive<FileBackend>, input: Option<PathBuf>) -> Result<()> {
        let json = match input {
            Some(path) if path.as_os_str() != "-" => fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?,
            _ => {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let document = archive.import(&json)?;
        println!(
            "Imported {} neurons and {} connections",
            document.neurons.len(),
            document.connections.len()
        );
        Ok(())
    }
}

/// Lowercase the title into an id slug
fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "neuron".to_string()
    } else {
        slug
    }
}

/// First of `base`, `base-2`, `base-3`, ... not taken by a neuron or
/// connection
fn unique_id(base: &str, store: &GraphStore) -> String {
    let taken = |candidate: &str| {
        store.neuron(candidate).is_some() || store.graph().connection(candidate).is_some()
    };
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Parse an "x,y,z" coordinate triple
fn parse_point(value: &str) -> Result<Point3> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(anyhow!("expected \"x,y,z\", got `{value}`"));
    }
    let axis = |i: usize| -> Result<f32> {
        parts[i]
            .parse::<f32>()
            .map_err(|_| anyhow!("`{}` is not a number", parts[i]))
    };
    Ok(Point3::new(axis(0)?, axis(1)?, axis(2)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Spaced repetition"), "spaced-repetition");
        assert_eq!(slugify("Why? Because!"), "why--because");
        assert_eq!(slugify("---"), "neuron");
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(
            parse_point("1, -2.5, 0").unwrap(),
            Point3::new(1.0, -2.5, 0.0)
        );
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("a,b,c").is_err());
    }

    #[test]
    fn test_unique_id_suffixes() {
        let mut store = GraphStore::new();
        store.add_neuron(Neuron::new("idea", "Idea")).unwrap();
        store.add_neuron(Neuron::new("idea-2", "Idea")).unwrap();
        assert_eq!(unique_id("idea", &store), "idea-3");
        assert_eq!(unique_id("fresh", &store), "fresh");
    }

    #[test]
    fn test_add_and_show_against_a_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let app = NeuromapApp::new();

        let archive = GraphArchive::new(FileBackend::new(dir.path()));
        app.add(
            archive,
            "Test node".to_string(),
            None,
            KindChoice::Question,
            String::new(),
            ConfidenceChoice::Low,
            Some("1,1,0".to_string()),
        )
        .unwrap();

        // The write-through archive persisted both the sample seed and the
        // new neuron
        let reread = GraphArchive::new(FileBackend::new(dir.path()));
        let document = reread.load().expect("persisted");
        assert!(document.neurons.iter().any(|n| n.id == "test-node"));
    }
}
