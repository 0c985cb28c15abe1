use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cropcare_core::config::{FileConfig, Overrides, resolve};
use cropcare_core::dashboard::{CropHealthView, WeatherView};
use cropcare_core::validation::check_registration;
use cropcare_core::view::ResultView;
use cropcare_core::workflow::{WorkflowEvent, run_prediction};
use cropcare_core::{ApiClient, ImageFile};

mod output;

use output::Palette;

/// CropCare - crop-disease detection from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Request timeout in seconds (0 = none)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Config file (default: ~/.config/cropcare/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log in with this user before running the command
    #[arg(long, global = true)]
    username: Option<String>,

    /// Password for --username (or CROPCARE_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    /// Directory for saved reports (default: Downloads)
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a leaf photo
    Predict {
        /// JPG or PNG image, at most 10MB
        image: PathBuf,

        /// Also save an HTML analysis report
        #[arg(long)]
        report: bool,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Current weather and a 3-day forecast
    Weather {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Health summary per crop
    CropHealth,
    /// Past predictions
    History {
        /// Save the table as CSV instead of printing it
        #[arg(long)]
        csv: bool,
    },
    /// Create an account
    Register {
        username: String,
        /// Password (or CROPCARE_PASSWORD)
        #[arg(long)]
        new_password: Option<String>,
        /// Repeat the password
        #[arg(long)]
        confirm: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(args.verbose);

    let palette = Palette {
        color: !args.no_color && std::env::var_os("NO_COLOR").is_none(),
    };

    // Resolve config from CLI flags > env vars > config file > defaults
    let file_config = match args.config.clone().or_else(FileConfig::default_path) {
        Some(path) => FileConfig::load(&path)?,
        None => FileConfig::default(),
    };
    let (lat, lon) = match &args.command {
        Command::Weather { lat, lon } => (*lat, *lon),
        _ => (None, None),
    };
    let overrides = Overrides {
        url: args.url.clone(),
        latitude: lat,
        longitude: lon,
        timeout: args.timeout,
    };
    let config = resolve(overrides, |k| std::env::var(k).ok(), file_config);
    let client = ApiClient::new(&config)?;
    tracing::debug!(base_url = client.base_url(), "client ready");

    let env_password = || std::env::var("CROPCARE_PASSWORD").ok();
    if let Some(username) = &args.username {
        let password = args
            .password
            .clone()
            .or_else(env_password)
            .context("--username needs --password or CROPCARE_PASSWORD")?;
        client.login(username, &password).await?;
        tracing::info!("logged in as {username}");
    }

    let export_dir = args
        .export_dir
        .clone()
        .unwrap_or_else(cropcare_reporting::download_dir);

    match args.command {
        Command::Predict {
            image,
            report,
            json,
        } => {
            let file = ImageFile::from_path(&image)
                .with_context(|| format!("cannot load {}", image.display()))?;
            predict(&client, file, report, json, &export_dir, palette).await?;
        }
        Command::Weather { .. } => {
            let report = client.weather(None).await?;
            print!("{}", output::weather(&WeatherView::from_report(&report), palette));
        }
        Command::CropHealth => {
            let rows = client.crop_health().await?;
            print!("{}", output::crop_health(&CropHealthView::from_rows(&rows), palette));
        }
        Command::History { csv } => {
            let table = client.history().await?;
            if csv {
                let today = Local::now().date_naive();
                let path = cropcare_reporting::write_history_csv(&table, &export_dir, today)?;
                println!("Saved {}", path.display());
            } else {
                print!("{}", output::history(&table, palette));
            }
        }
        Command::Register {
            username,
            new_password,
            confirm,
        } => {
            let password = new_password
                .or_else(env_password)
                .context("--new-password or CROPCARE_PASSWORD is required")?;
            let confirm = confirm.unwrap_or_else(|| password.clone());
            check_registration(&password, &confirm)?;
            client.register(&username, &password).await?;
            println!("{}", palette.good("Registration successful!"));
        }
    }

    Ok(())
}

async fn predict(
    client: &ApiClient,
    file: ImageFile,
    report: bool,
    json: bool,
    export_dir: &std::path::Path,
    palette: Palette,
) -> anyhow::Result<()> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("=> "),
    );
    pb.set_message(format!("Analyzing {}", file.name));

    let bar = pb.clone();
    let on_event = move |event: WorkflowEvent| match event {
        WorkflowEvent::Progress(p) => bar.set_position(p.round() as u64),
        WorkflowEvent::LoadingHidden => bar.finish_and_clear(),
        WorkflowEvent::Completed(_) => {}
        WorkflowEvent::Failed(message) => bar.abandon_with_message(message),
    };

    let result = run_prediction(client, &file, on_event, CancellationToken::new()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let view = ResultView::from_prediction(&result, None);
        print!("{}", output::prediction(&view, palette));
    }

    if report {
        let today = Local::now().date_naive();
        if let Some(path) =
            cropcare_reporting::write_prediction_report(Some(&result), export_dir, today)?
        {
            println!("Report saved to {}", path.display());
        }
    }
    Ok(())
}
