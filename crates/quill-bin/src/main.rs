//! quill entrypoint.
use anyhow::Result;
use clap::Parser;
use core_config::Config;
use core_model::{Session, SessionOptions};
use core_state::StatusMessage;
use core_terminal::{CrosstermBackend, TerminalBackend};
use core_text::Document;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod branch;
mod runtime;
mod signals;

use runtime::{EditorRuntime, RuntimeSettings};
use signals::SignalForwarder;

const LOG_FILE_NAME: &str = "quill.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Modal terminal text editor")]
struct Args {
    /// Files to open; the first one is shown. Missing files start empty.
    paths: Vec<PathBuf>,
    /// Put the cursor on line N of the first file.
    #[arg(short = 'l', long = "line", value_name = "N")]
    line: Option<usize>,
    /// Configuration file (overrides discovery of `quill.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                core_terminal::emergency_restore();
                default_panic(info);
            }));
        });
    }
}

/// Open every path as a slot. A file that cannot be decoded is skipped and
/// reported in the message line once the editor is up.
fn load_session(args: &Args, config: &Config) -> Session {
    let mut documents = Vec::with_capacity(args.paths.len());
    let mut first_error = None;
    for path in &args.paths {
        match Document::open_with(path, config.effective_tab_width) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                warn!(target: "io", path = %path.display(), error = %e, "startup_open_failed");
                first_error.get_or_insert(e.to_string());
            }
        }
    }
    let options = SessionOptions {
        line_numbers: config.line_numbers(),
        tab_width: config.effective_tab_width,
    };
    let mut session = Session::new(documents, options);
    if let Some(text) = first_error {
        session.set_message(StatusMessage::alert(text));
    }
    session
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    let branch = if config.git_branch() {
        branch::current_branch(Path::new("."))
    } else {
        None
    };
    let mut session = load_session(&args, &config);

    let mut backend = CrosstermBackend::new();
    backend.set_title("quill")?;
    backend.enter()?;
    let (width, height) = backend.size()?;
    session.resize(width, height);
    if let Some(line) = args.line {
        session.goto_line(line);
    }
    info!(
        target: "runtime",
        buffers = session.len(),
        width,
        height,
        config = ?config.source,
        branch = branch.as_deref(),
        "bootstrap_complete"
    );

    let (tx, rx) = core_events::channel();
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let signals = SignalForwarder::spawn(tx)?;
    let settings = RuntimeSettings { branch };
    let mut runtime = EditorRuntime::new(session, settings, backend, std::io::stdout(), rx)
        .with_input(input_task, input_shutdown);
    let reason = runtime.run().await;
    signals.close();
    drop(runtime);
    info!(target: "runtime", %reason, "exit");
    drop(startup);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(paths: &[&Path]) -> Args {
        Args {
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            line: None,
            config: None,
        }
    }

    #[test]
    fn cli_accepts_paths_line_and_config() {
        let a = Args::try_parse_from(["quill", "a.txt", "b.txt", "-l", "12", "--config", "c.toml"])
            .unwrap();
        assert_eq!(a.paths, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(a.line, Some(12));
        assert_eq!(a.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn no_paths_gives_one_empty_slot() {
        let session = load_session(&args(&[]), &Config::default());
        assert_eq!(session.len(), 1);
        assert_eq!(session.active().document.display_name(), "NO NAME");
    }

    #[test]
    fn undecodable_file_is_skipped_and_reported() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        std::fs::write(&good, "hello\n").unwrap();
        let bad = dir.path().join("bad.bin");
        std::fs::File::create(&bad)
            .unwrap()
            .write_all(&[0xff, 0xfe, 0x00])
            .unwrap();

        let session = load_session(&args(&[&bad, &good]), &Config::default());
        assert_eq!(session.len(), 1);
        assert_eq!(session.active().document.line(1).as_deref(), Some("hello"));
        let message = session.message.as_ref().unwrap();
        assert!(message.text.starts_with("Error: "));
    }

    #[test]
    fn config_options_reach_the_session() {
        let mut config = Config::default();
        config.file.ui.line_numbers = false;
        config.effective_tab_width = 2;
        let session = load_session(&args(&[]), &config);
        assert!(!session.options.line_numbers);
        assert_eq!(session.options.tab_width, 2);
    }
}
