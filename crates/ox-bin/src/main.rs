//! oxed entrypoint.
//!
//! Startup order: logging, panic hook, config, terminal, controller. The event
//! loop is synchronous: poll one event (with a short timeout so the status
//! message can expire), dispatch it, repaint when anything changed.

use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use core_actions::{LocalFs, ModeController};
use core_events::InputEvent;
use core_render::RenderEngine;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard, poll_event};
use tracing::{error, info, trace};
use tracing_appender::non_blocking::WorkerGuard;

mod bootstrap;

const LOG_FILE_NAME: &str = "oxed.log";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxed", version, about = "A small modal terminal editor")]
struct Args {
    /// File to open at startup. A missing file starts an empty buffer bound to that path.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `oxed.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
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
                default_panic(info);
            }));
        });
    }

    fn run(&mut self) -> Result<()> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let args = Args::parse();
        let config = core_config::load_from(args.config.clone())?;
        let config_str = config.source.as_ref().map(|p| p.display().to_string());
        let path_str = args.path.as_ref().map(|p| p.display().to_string());
        info!(
            target: "runtime.startup",
            config = config_str.as_deref(),
            path = path_str.as_deref(),
            "config_loaded"
        );
        let mut controller = bootstrap::build_controller(&config.file, args.path.as_deref());

        self.backend.set_title("oxed")?;
        let guard = self.backend.enter_guard()?;
        let result = event_loop(&mut controller, &guard);
        drop(guard);
        if let Err(e) = &result {
            error!(target: "runtime", error = %e, "event_loop_failed");
        }
        info!(target: "runtime", "shutdown");
        result
    }
}

fn render(
    engine: &mut RenderEngine,
    controller: &ModeController<LocalFs>,
    size: (u16, u16),
    out: &mut Stdout,
) -> Result<()> {
    engine.render(controller.state(), size.0, size.1, out)
}

fn event_loop(controller: &mut ModeController<LocalFs>, guard: &TerminalGuard<'_>) -> Result<()> {
    let mut engine = RenderEngine::new();
    let mut out = stdout();
    let mut size = guard.size()?;
    render(&mut engine, controller, size, &mut out)?;
    loop {
        let mut needs_render = false;
        match poll_event(POLL_INTERVAL)? {
            Some(InputEvent::CtrlC) => {
                info!(target: "runtime", "ctrl_c_exit");
                break;
            }
            Some(InputEvent::Resize(w, h)) => {
                trace!(target: "runtime", w, h, "resize");
                size = (w, h);
                needs_render = true;
            }
            Some(InputEvent::Click { col, row }) => {
                if let Some(pos) = engine.hit_test(controller.state(), col, row) {
                    needs_render |= controller.click_at(pos.line, pos.byte).dirty;
                }
            }
            Some(InputEvent::Key(key)) => {
                let res = controller.handle_key(&key);
                if res.buffer_replaced {
                    engine.invalidate();
                }
                if res.quit || controller.should_quit() {
                    info!(target: "runtime", "quit");
                    break;
                }
                needs_render |= res.dirty;
            }
            None => {}
        }
        if controller.state_mut().tick_ephemeral() {
            needs_render = true;
        }
        if needs_render {
            render(&mut engine, controller, size, &mut out)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    AppStartup::new().run()
}
