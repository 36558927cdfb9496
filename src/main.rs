#[macro_use]
extern crate tracing;

use std::io::{self, BufReader};
use std::path::PathBuf;

use structopt::StructOpt;
use tokio::runtime::Builder;
use tokio::signal;

use huebridge::{
    bridge::Bridge,
    cli::{Cli, CliError},
    clock::SystemClock,
    effects::Effects,
    methods::Stdout,
    models::Config,
};

#[derive(Debug, StructOpt)]
struct Opts {
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u32,
    #[structopt(short, long = "config")]
    config_path: Option<PathBuf>,
    #[structopt(long)]
    dump_config: bool,
    /// Pair with the bridge without waiting for the button press
    #[structopt(short, long)]
    yes: bool,
}

async fn run(opts: Opts, config: Config) -> color_eyre::eyre::Result<()> {
    let bridge = Bridge::new(
        config.bridge.address.clone(),
        Stdout::stdout(config.bridge.ansi),
    );
    let effects = Effects::new(SystemClock, &config);
    let abort = effects.abort_signal();
    let auto_pair = opts.yes;

    // The menu blocks on stdin and on effect timings
    let mut menu = tokio::task::spawn_blocking(move || -> Result<(), CliError> {
        let mut cli = Cli::new(
            BufReader::new(io::stdin()),
            io::stdout(),
            bridge,
            effects,
            fastrand::Rng::new(),
        );

        cli.pair(auto_pair)?;
        cli.run()
    });

    loop {
        tokio::select! {
            result = &mut menu => {
                result??;
                return Ok(());
            }
            _ = signal::ctrl_c() => {
                if abort.trigger() {
                    info!("stopping the running effect");
                } else {
                    info!("interrupted, exiting");
                    return Ok(());
                }
            }
        }
    }
}

fn install_tracing(opts: &Opts) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Keep stdout for the light status
    let fmt_layer = fmt::layer().with_writer(io::stderr);

    let filter_layer = EnvFilter::try_from_env("HUEBRIDGE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match opts.verbose {
            0 => "huebridge=warn",
            1 => "huebridge=info",
            2 => "huebridge=debug",
            _ => "huebridge=trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
}

#[paw::main]
fn main(opts: Opts) -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    install_tracing(&opts)?;

    // Load configuration
    let config = if let Some(config_path) = opts.config_path.as_deref() {
        Config::load_file(config_path)?
    } else {
        Config::load_default()?
    };

    // Dump configuration if this was asked
    if opts.dump_config {
        print!("{}", config.to_string()?);
        return Ok(());
    }

    // Create tokio runtime
    let thd_count = match num_cpus::get() {
        1 => 2,
        other => other.min(4),
    };

    let rt = Builder::new_multi_thread()
        .worker_threads(thd_count)
        .enable_all()
        .build()?;
    let result = rt.block_on(run(opts, config));

    // The menu thread may still be waiting on stdin
    rt.shutdown_background();
    result
}
