use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vecscene::control::CommandRunner;
use vecscene::error::Error;
use vecscene::{Canvas, EngineConfig, Scene};

// ============================================================================
// CLI argument definition
// ============================================================================

/// Depth-ordered vector scene renderer.
#[derive(Parser, Debug)]
#[command(name = "vecscene", version, about = "Render and edit depth-ordered 2D vector scenes")]
struct Cli {
    /// JSON engine configuration (size, colors, Bezier step)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Surface width, overrides the config file
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Surface height, overrides the config file
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rasterize a scene file (CSV or JSON) to PNG
    Render {
        scene: PathBuf,
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,
    },
    /// Validate a scene file and report every bad record
    Check { scene: PathBuf },
    /// Convert a scene between CSV and JSON (chosen by extension)
    Convert { input: PathBuf, output: PathBuf },
    /// Execute a command script headlessly
    Run {
        script: PathBuf,
        #[arg(short, long, value_name = "PNG")]
        output: Option<PathBuf>,
        #[arg(long, value_name = "SCENE")]
        save: Option<PathBuf>,
    },
    /// Apply commands received on a Unix control socket
    #[cfg(unix)]
    Serve {
        #[arg(long, default_value = vecscene::control::DEFAULT_SOCKET_PATH)]
        socket: PathBuf,
    },
    /// Open the interactive editor window
    #[cfg(feature = "viewer")]
    View { scene: Option<PathBuf> },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> vecscene::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> vecscene::Result<ExitCode> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Render { scene, output } => {
            let mut canvas = Canvas::from_config(&config);
            report_failures(scene, canvas.load(scene)?);
            canvas.export_png(output)?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Check { scene } => {
            let report = Scene::load(scene)?;
            let failed = !report.is_clean();
            println!(
                "{}: {} shapes, {} rejected records",
                scene.display(),
                report.scene.len(),
                report.failures.len()
            );
            for (line, source) in report.failures {
                println!("  {}", Error::Record { line, source });
            }
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        },
        Commands::Convert { input, output } => {
            let report = Scene::load(input)?;
            report_failures(input, report.failures);
            report.scene.save(output)?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Run {
            script,
            output,
            save,
        } => {
            let text = std::fs::read_to_string(script)?;
            let mut canvas = Canvas::from_config(&config);
            let mut runner = CommandRunner::new(config.style());
            let failures = runner.run_script(&mut canvas, &text);

            if let Some(path) = save {
                canvas.save(path)?;
            }
            if let Some(path) = output {
                canvas.export_png(path)?;
            }
            Ok(if failures.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        },
        #[cfg(unix)]
        Commands::Serve { socket } => serve(&config, socket),
        #[cfg(feature = "viewer")]
        Commands::View { scene } => view(&config, scene.as_deref()),
    }
}

fn report_failures(path: &Path, failures: Vec<(usize, vecscene::error::RecordError)>) {
    for (line, source) in failures {
        tracing::warn!("{}: {}", path.display(), Error::Record { line, source });
    }
}

/// Headless live canvas driven by the control socket
#[cfg(unix)]
fn serve(config: &EngineConfig, socket: &Path) -> vecscene::Result<ExitCode> {
    use vecscene::control::{Controller, Flow};

    let controller = Controller::new(socket)?;
    let mut canvas = Canvas::from_config(config);
    let mut runner = CommandRunner::new(config.style());

    while let Some(command) = controller.recv() {
        match runner.run(&mut canvas, command) {
            Ok(Flow::Continue) => {},
            Ok(Flow::Quit) => break,
            Err(e) => tracing::warn!("Command failed: {}", e),
        }
    }
    tracing::info!("Control session ended with {} shapes", canvas.scene().len());
    Ok(ExitCode::SUCCESS)
}

/// Interactive editor: mouse draws with the current tool, keys switch tools
#[cfg(feature = "viewer")]
fn view(config: &EngineConfig, scene: Option<&Path>) -> vecscene::Result<ExitCode> {
    use vecscene::display::{Display, RenderTarget};
    use vecscene::input::{EditorSession, InputEvent};

    let mut canvas = Canvas::from_config(config);
    if let Some(path) = scene {
        report_failures(path, canvas.load(path)?);
    }

    let (mut display, texture_creator) = Display::new("vecscene", config.width, config.height)?;
    let mut target = RenderTarget::new(&texture_creator, config.width, config.height)?;
    let mut editor = EditorSession::new(config.style());

    println!("Tools: L line, R rectangle, P polygon, C circle, B curve, M move, S scale");
    println!("F toggles fill, PageUp/PageDown reorder, Delete removes, Esc cancels");

    #[cfg(unix)]
    let controller = vecscene::control::Controller::new(vecscene::control::DEFAULT_SOCKET_PATH)
        .map_err(|e| tracing::warn!("Control socket unavailable: {}", e))
        .ok();
    #[cfg(unix)]
    let mut runner = CommandRunner::new(config.style());

    'main: loop {
        let (events, resized) = display.poll_events();
        if let Some((width, height)) = resized {
            canvas.resize(width, height);
            target = RenderTarget::new(&texture_creator, width, height)?;
        }

        for event in events {
            if event == InputEvent::Quit {
                break 'main;
            }
            editor.handle_event(&mut canvas, &event);
        }

        #[cfg(unix)]
        if let Some(controller) = &controller {
            let commands = controller.poll();
            if !commands.is_empty() {
                // Socket commands and mouse edits share one drawing style
                runner.set_style(editor.style());
                for command in commands {
                    match runner.run(&mut canvas, command) {
                        Ok(vecscene::control::Flow::Quit) => break 'main,
                        Ok(_) => {},
                        Err(e) => tracing::warn!("Command failed: {}", e),
                    }
                }
                editor.set_style(runner.style());
            }
        }

        if target.is_stale(canvas.surface()) {
            let surface = canvas.surface();
            target = RenderTarget::new(&texture_creator, surface.width(), surface.height())?;
        }
        display.present(&mut target, canvas.surface())?;
    }

    Ok(ExitCode::SUCCESS)
}
