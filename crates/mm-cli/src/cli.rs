use clap::{Parser, Subcommand, ValueEnum};
use mm_ai::{AiConfig, AiService, resolve_credential};
use mm_core::config::CanvasConfig;
use mm_core::lint::{LintSeverity, lint_snapshot};
use mm_core::model::{GeneratedIdea, Idea};
use mm_core::persist::{self, FileStore};
use mm_core::task::{Task, TaskList};
use mm_editor::App;
use mm_render::{render_csv, render_svg};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "mindmap", about = "Export, brainstorm and validate stored mind maps", version)]
pub struct Cli {
    /// Directory holding the stored records.
    #[arg(long, global = true, default_value = ".mindmap")]
    pub store: PathBuf,

    /// Generator model.
    #[arg(long, global = true, default_value = "gemini-2.5-flash")]
    pub model: String,

    /// Generator request timeout in seconds.
    #[arg(long = "timeout-secs", global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Never call the remote generator; use the offline stand-in.
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the stored map as an SVG document.
    #[command(name = "export-svg")]
    ExportSvg {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Margin around the content, in canvas units.
        #[arg(long, default_value_t = 50.0)]
        padding: f64,
    },

    /// Flatten a task tree (JSON) into CSV.
    #[command(name = "export-csv")]
    ExportCsv {
        /// JSON array of tasks.
        #[arg(long)]
        tasks: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Brainstorm ideas about a topic.
    Brainstorm {
        topic: String,
        /// Also place the ideas on the stored canvas.
        #[arg(long)]
        place: bool,
    },

    /// Read ideas off an image of notes.
    Extract {
        image: PathBuf,
        #[arg(long)]
        place: bool,
    },

    /// Generate actionable tasks from the stored map.
    Tasks {
        #[arg(long, value_enum, default_value_t = TaskFormat::Csv)]
        format: TaskFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Split one task into smaller steps.
    Breakdown { text: String },

    /// Check a snapshot for structural problems.
    Lint {
        /// Snapshot JSON file; defaults to the stored map.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Save the generator API key to the store.
    #[command(name = "set-key")]
    SetKey { key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskFormat {
    Csv,
    Json,
}

pub fn run(cli: Cli) -> Result<()> {
    let store = FileStore::new(&cli.store);
    let ai = || {
        let config = AiConfig {
            model: cli.model.clone(),
            timeout: Duration::from_secs(cli.timeout_secs),
            ..AiConfig::default()
        };
        let credential = if cli.offline {
            None
        } else {
            resolve_credential(&store)
        };
        AiService::from_credential(credential.as_deref(), config)
    };

    match cli.command {
        Commands::ExportSvg { ref out, padding } => {
            let state = persist::load_snapshot(&store);
            let svg = render_svg(&state, padding)?;
            emit(out.as_deref(), &svg)
        }
        Commands::ExportCsv {
            ref tasks,
            ref out,
        } => {
            let tasks: TaskList = serde_json::from_str(&fs::read_to_string(tasks)?)?;
            emit(out.as_deref(), &render_csv(&tasks))
        }
        Commands::Brainstorm { ref topic, place } => {
            let ideas = ai().generate_ideas(topic);
            report_ideas(&cli.store, ideas, place)
        }
        Commands::Extract { ref image, place } => {
            let mime = image_mime(image).ok_or("unsupported image type (png, jpeg, webp, gif)")?;
            let bytes = fs::read(image)?;
            let ideas = ai().extract_ideas(&bytes, mime);
            report_ideas(&cli.store, ideas, place)
        }
        Commands::Tasks { format, ref out } => {
            let state = persist::load_snapshot(&store);
            if state.nodes.is_empty() {
                return Err("the stored map has no nodes".into());
            }
            let tasks = TaskList {
                tasks: ai().generate_tasks(&state).into_iter().map(Task::from).collect(),
            };
            let text = match format {
                TaskFormat::Csv => render_csv(&tasks),
                TaskFormat::Json => serde_json::to_string_pretty(&tasks)?,
            };
            emit(out.as_deref(), &text)
        }
        Commands::Breakdown { ref text } => {
            for step in ai().breakdown_task(text) {
                println!("- {}", step.text);
            }
            Ok(())
        }
        Commands::Lint { ref file } => {
            let state = match file {
                Some(path) => persist::decode_snapshot(&fs::read_to_string(path)?)?,
                None => {
                    let raw = persist::KeyValueStore::get(&store, persist::SNAPSHOT_KEY)?
                        .ok_or("no stored map")?;
                    persist::decode_snapshot(&raw)?
                }
            };
            let diagnostics = lint_snapshot(&state);
            let mut warnings = 0;
            for d in &diagnostics {
                let level = match d.severity {
                    LintSeverity::Warning => {
                        warnings += 1;
                        "warning"
                    }
                    LintSeverity::Info => "info",
                };
                println!("{level}[{}] {}: {}", d.rule, d.subject, d.message);
            }
            println!(
                "{} nodes, {} connectors, {warnings} warnings",
                state.nodes.len(),
                state.connectors.len()
            );
            Ok(())
        }
        Commands::SetKey { ref key } => {
            let mut app = App::new(store, CanvasConfig::default());
            if app.save_credential(key) {
                Ok(())
            } else {
                Err("could not save the API key".into())
            }
        }
    }
}

/// Print the ideas and, with `place`, lay them out on the stored canvas.
fn report_ideas(store_dir: &Path, generated: Vec<GeneratedIdea>, place: bool) -> Result<()> {
    let ideas: Vec<Idea> = generated.into_iter().map(|g| Idea::new(g.text)).collect();
    for idea in &ideas {
        println!("- {}", idea.text);
    }
    if place && !ideas.is_empty() {
        let mut app = App::new(FileStore::new(store_dir), CanvasConfig::default());
        let mut added = 0;
        app.edit(|canvas| {
            added = canvas.import_ideas(&ideas);
            added > 0
        });
        if let Some(alert) = app.take_alert() {
            return Err(alert.into());
        }
        log::info!("placed {added} ideas on the canvas");
    }
    Ok(())
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Write to `out`, or stdout when no path is given.
fn emit(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => fs::write(path, content)?,
        None => println!("{content}"),
    }
    Ok(())
}
