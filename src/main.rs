use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use typewrite::command::{PanelCommand, PanelMessage};
use typewrite::config::load_config;
use typewrite::engine::SessionOutcome;
use typewrite::model::{Config, DocumentId, Position};
use typewrite::session::SessionController;
use typewrite::sim::MemoryHost;
use typewrite::trace::{console_trace, print_trace_line};

#[derive(Debug, Args, Clone)]
struct ConfigArgs {
    /// JSON config file (typing_speed_ms, auto_trigger_on_paste, marker_visible, marker)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Delay before each typed character, in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    speed: Option<u64>,

    /// Replay pasted text through the typewriter instead of inserting it
    #[arg(long)]
    auto_trigger: bool,

    /// Do not paint the insertion marker
    #[arg(long)]
    hide_marker: bool,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        if let Some(speed) = self.speed {
            config.typing_speed_ms = speed;
        }
        if self.auto_trigger {
            config.auto_trigger_on_paste = true;
        }
        if self.hide_marker {
            config.marker_visible = false;
        }
        Ok(config)
    }
}

#[derive(Debug, Parser)]
#[command(name = "typewrite")]
#[command(about = "Typewriter-effect playback into editor documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Type text into a document and print the result
    Play {
        /// Input text file, or '-' for stdin
        #[arg(long, value_name = "PATH")]
        input: PathBuf,

        /// Document to type into (defaults to an empty one)
        #[arg(long, value_name = "PATH")]
        target: Option<PathBuf>,

        /// Output file for the resulting document (defaults to stdout)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Zero-based line to start typing at
        #[arg(long, default_value_t = 0)]
        line: u32,

        /// Zero-based column to start typing at
        #[arg(long, default_value_t = 0)]
        column: u32,

        #[command(flatten)]
        config: ConfigArgs,

        /// Disable console typing trace output
        #[arg(long)]
        no_trace: bool,
    },

    /// Replay control-panel commands (JSON lines) against open documents
    Session {
        /// Script file, or '-' for stdin
        #[arg(long, value_name = "PATH")]
        script: PathBuf,

        /// Documents to open; the last one is active
        #[arg(long, value_name = "PATH", required = true)]
        open: Vec<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,

        /// Disable console typing trace output
        #[arg(long)]
        no_trace: bool,
    },
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == std::ffi::OsStr::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,engine=info,paste=info,session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn print_panel_messages(rx: &mut mpsc::UnboundedReceiver<PanelMessage>) -> Result<()> {
    while let Ok(message) = rx.try_recv() {
        let json = serde_json::to_string(&message).context("failed to serialize panel message")?;
        eprintln!("panel <- {json}");
    }
    Ok(())
}

fn print_trace(controller: &SessionController<MemoryHost>) {
    let records = controller.with_host(|host| host.insertions().to_vec());
    for line in console_trace(&records) {
        print_trace_line(&line);
    }
}

async fn run_play(
    input: &Path,
    target: Option<&Path>,
    output: Option<&Path>,
    start: Position,
    config: Config,
    trace: bool,
) -> Result<()> {
    let text = read_input(input)?;
    let (path, initial) = match target {
        Some(path) => (path.display().to_string(), read_input(path)?),
        None => ("untitled".to_string(), String::new()),
    };

    let mut host = MemoryHost::new();
    let (document, editor) = host.open(&path, &initial);
    host.set_selection(editor, start);

    let (panel_tx, mut panel_rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(host, config, panel_tx);

    controller
        .start_typing(&text, None)
        .context("failed to start typing")?;
    if let Some(canceller) = controller.canceller() {
        ctrlc::set_handler(move || canceller.cancel())
            .context("failed to install Ctrl+C handler")?;
    }

    let report = controller.wait_idle().await;
    print_panel_messages(&mut panel_rx)?;
    if trace {
        print_trace(&controller);
    }
    if let Some(report) = report {
        eprintln!("Typed {} insertions ({:?})", report.insertions, report.outcome);
        if report.outcome == SessionOutcome::Stopped {
            eprintln!("Aborted. Text typed so far is kept.");
        }
    }

    let result = document_text(&controller, document)?;
    match output {
        Some(out) => write_output(out, &result),
        None => {
            print!("{result}");
            Ok(())
        }
    }
}

async fn run_session(script: &Path, open: &[PathBuf], config: Config, trace: bool) -> Result<()> {
    let mut host = MemoryHost::new();
    let mut documents = Vec::with_capacity(open.len());
    for path in open {
        let text = read_input(path)?;
        let (document, _) = host.open(&path.display().to_string(), &text);
        documents.push(document);
    }

    let (panel_tx, mut panel_rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(host, config, panel_tx);

    let script_text = read_input(script)?;
    for (idx, line) in script_text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let command: PanelCommand = serde_json::from_str(line)
            .with_context(|| format!("invalid command on script line {}", idx + 1))?;

        // Rejections are reported through the panel channel.
        let _ = controller.dispatch(command);
        controller.wait_idle().await;
        print_panel_messages(&mut panel_rx)?;
    }

    if trace {
        print_trace(&controller);
    }
    for document in documents {
        let path = controller
            .with_host(|host| host.path(document).map(str::to_string))
            .unwrap_or_default();
        println!("==> {path} <==");
        println!("{}", document_text(&controller, document)?);
    }
    Ok(())
}

fn document_text(
    controller: &SessionController<MemoryHost>,
    document: DocumentId,
) -> Result<String> {
    controller
        .with_host(|host| host.text(document))
        .ok_or_else(|| anyhow!("{document} was closed"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            input,
            target,
            output,
            line,
            column,
            config,
            no_trace,
        } => {
            let config = config.resolve()?;
            run_play(
                &input,
                target.as_deref(),
                output.as_deref(),
                Position::new(line, column),
                config,
                !no_trace,
            )
            .await?;
        }
        Command::Session {
            script,
            open,
            config,
            no_trace,
        } => {
            let config = config.resolve()?;
            run_session(&script, &open, config, !no_trace).await?;
        }
    }

    Ok(())
}
