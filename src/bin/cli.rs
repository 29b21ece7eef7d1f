use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use maskdrift::{
    Config, EngineApi, EngineClient, Finding, MaskDriftError, ProfilingRun, Result, Workflow,
};

#[derive(Parser)]
#[command(name = "maskdrift")]
#[command(about = "Trigger and poll compliance-engine masking/profiling jobs, blocking refreshes on inventory drift")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Compliance engine host (no scheme)
    #[arg(short = 'H', long, env = "MASKDRIFT_HOST")]
    host: Option<String>,

    /// Engine username
    #[arg(short, long, env = "MASKDRIFT_USERNAME")]
    username: Option<String>,

    /// Engine password
    #[arg(short, long, env = "MASKDRIFT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Path to a JSON config file (flags override file values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory mismatch reports are appended under
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Seconds between execution polls
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up after this many seconds of RUNNING (0 waits forever)
    #[arg(long)]
    poll_timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run profiling jobs; inventory changes block the refresh (exit 2)
    Profile {
        /// Profiling job id(s)
        #[arg(short, long, required = true)]
        job: Vec<i64>,
    },

    /// Run masking jobs
    Mask {
        /// Masking job id(s)
        #[arg(short, long, required = true)]
        job: Vec<i64>,
    },

    /// Run all profiling jobs, then all masking jobs, from the config file
    Refresh,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("maskdrift=debug,info")
    } else {
        EnvFilter::new("maskdrift=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31m✗ Error:\x1b[0m {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let client = EngineClient::connect(&config).await?;
    let workflow = Workflow::new(&client, &config);

    match &cli.command {
        Commands::Profile { job } => run_profiling(&workflow, job).await,

        Commands::Mask { job } => {
            for &job_id in job {
                workflow.run_masking_job(job_id).await?;
                println!("masking job {job_id} execution successful!");
            }
            Ok(())
        }

        Commands::Refresh => {
            run_profiling(&workflow, &config.profiling_jobs).await?;
            for &job_id in &config.masking_jobs {
                workflow.run_masking_job(job_id).await?;
                println!("masking job {job_id} execution successful!");
            }
            Ok(())
        }
    }
}

async fn run_profiling<A: EngineApi + ?Sized>(
    workflow: &Workflow<'_, A>,
    jobs: &[i64],
) -> Result<()> {
    for &job_id in jobs {
        let run = workflow.run_profiling_job(job_id).await?;
        if run.findings.is_empty() {
            println!("profiling job {job_id} execution successful!");
            continue;
        }
        print_findings(&run);
        if let Some(err) = run.blocking_error() {
            return Err(err);
        }
    }
    Ok(())
}

fn print_findings(run: &ProfilingRun) {
    println!("\nInventory changes detected for job {}:\n", run.job_id);

    let rows: Vec<FindingRow> = run.findings.iter().map(FindingRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{table}");
}

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Table")]
    table: String,
    #[tabled(rename = "Column")]
    column: String,
}

impl From<&Finding> for FindingRow {
    fn from(finding: &Finding) -> Self {
        Self {
            change: finding.change.as_str().to_string(),
            table: finding.table.clone(),
            column: finding.column.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Start from the config file when given, otherwise from flags alone; flags
/// always win over file values.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config {
            host: required(&cli.host, "engine host (--host or MASKDRIFT_HOST)")?,
            username: required(&cli.username, "engine username (--username or MASKDRIFT_USERNAME)")?,
            password: required(&cli.password, "engine password (--password or MASKDRIFT_PASSWORD)")?,
            verify_tls: true,
            report_dir: PathBuf::from("."),
            poll_interval_secs: maskdrift::config::DEFAULT_POLL_INTERVAL_SECS,
            poll_timeout_secs: maskdrift::config::DEFAULT_POLL_TIMEOUT_SECS,
            profiling_jobs: Vec::new(),
            masking_jobs: Vec::new(),
        },
    };

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(username) = &cli.username {
        config.username = username.clone();
    }
    if let Some(password) = &cli.password {
        config.password = password.clone();
    }
    if let Some(report_dir) = &cli.report_dir {
        config.report_dir = report_dir.clone();
    }
    if let Some(interval) = cli.poll_interval {
        config.poll_interval_secs = interval;
    }
    if let Some(timeout) = cli.poll_timeout {
        config.poll_timeout_secs = timeout;
    }
    if cli.insecure {
        config.verify_tls = false;
    }

    config.validate()?;
    Ok(config)
}

fn required(value: &Option<String>, what: &str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| MaskDriftError::Config(format!("{what} is required")))
}
