//! difi - browse changed files and their diffs, then jump into your editor.

use std::io::{self, Write};
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use difi::config::Config;
use difi::core::{Backend, Event, FileListing, ProcessLauncher, VcsProvider};
use difi::theme::Theme;
use difi::ui::{handle_input, render, App, AppOptions, TerminalHandoff};

/// Browse the files changed against a revision and open them at the right line.
#[derive(Parser, Debug)]
#[command(
    name = "difi",
    version,
    about,
    after_help = "Examples:\n  difi            # diff against the default target\n  difi develop    # diff against develop\n  difi HEAD~1     # diff against the previous commit"
)]
struct Cli {
    /// Revision to compare against (git: HEAD, hg: default)
    #[arg(value_name = "TARGET")]
    target: Option<String>,

    /// Print a plain, non-interactive summary and exit
    #[arg(long)]
    plain: bool,

    /// Color theme (nord, tokyonight, or a user theme name)
    #[arg(short = 't', long = "theme", value_name = "THEME")]
    theme: Option<String>,

    /// Version control backend instead of auto-detection (git or hg)
    #[arg(long, value_name = "BACKEND")]
    backend: Option<Backend>,

    /// Do not refresh when files change on disk
    #[arg(long)]
    no_watch: bool,
}

/// Restores the terminal on drop, including during unwinding.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
    let _ = io::stdout().flush();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if let Err(e) = difi::logging::init() {
        eprintln!("warning: logging disabled: {e:#}");
    }
    difi::metrics::init();

    let config = Config::load_or_warn();
    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    let (backend, root) = match cli.backend.or(config.backend) {
        Some(backend) => (backend, backend.root_of(&cwd)?),
        None => Backend::detect(&cwd)?,
    };
    tracing::info!(%backend, root = %root.display(), "repository found");

    let provider: Arc<dyn VcsProvider> = Arc::from(backend.provider(root.clone()));
    let target = cli.target.unwrap_or_else(|| provider.default_target());

    if cli.plain {
        let summary = provider
            .status_summary(&target)
            .with_context(|| format!("Failed to summarize changes against {target}"))?;
        print!("{summary}");
        return Ok(ExitCode::SUCCESS);
    }

    // a listing failure (say, a mistyped target) opens an empty tree with
    // the error in the status bar; `r` retries
    let (listing, listing_error) = match provider.file_listing(&target) {
        Ok(listing) if listing.files.is_empty() => {
            println!("No changes detected");
            return Ok(ExitCode::SUCCESS);
        }
        Ok(listing) => (listing, None),
        Err(err) => {
            tracing::warn!(%err, %target, "initial file listing failed");
            (FileListing::default(), Some(err.to_string()))
        }
    };

    let theme = Theme::load(cli.theme.as_deref().unwrap_or(&config.theme));
    let watch_root = (config.watch && !cli.no_watch).then(|| root.clone());
    let launcher = TerminalHandoff::new(ProcessLauncher::new(
        config.editor.clone(),
        root,
        target.clone(),
    ));

    install_panic_hook();
    let _guard = TerminalGuard::new().context("Failed to set up terminal")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let size = terminal.size()?;

    let mut app = App::new(
        provider,
        Box::new(launcher),
        listing,
        AppOptions {
            target,
            theme,
            icons: config.icons,
            watch_root,
            width: size.width,
            height: size.height,
        },
    );

    if let Some(message) = listing_error {
        app.dispatch(Event::FilesListed {
            result: Err(message),
        });
    }

    run_loop(&mut terminal, &mut app)?;
    Ok(ExitCode::SUCCESS)
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));
}

fn run_loop<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.poll_worker();
        app.poll_watcher();

        if app.needs_clear {
            terminal.clear()?;
            app.needs_clear = false;
            app.mark_dirty();
        }

        if app.dirty {
            terminal.draw(|frame| render(frame, app))?;
            app.clear_dirty();
        }

        if event::poll(Duration::from_millis(50))? {
            handle_input(app, event::read()?);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
