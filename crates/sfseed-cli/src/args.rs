use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use sfseed_core::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "sfseed",
    about = "Generate realistic test data for Salesforce objects from live schema metadata",
    version,
    after_help = "Examples:\n  sfseed generate --object Opportunity --rows 500 --output opps.csv\n  sfseed generate --object Case --default-ids ids.csv --seed 42 --format json\n  sfseed generate --object Lead --rows 50 --output leads.xlsx\n  sfseed describe --object Account\n  sfseed preview --object Contact --rows 3\n\nCredentials are read from SF_ACCESS_TOKEN + SF_INSTANCE_URL, or\nSF_USERNAME + SF_PASSWORD + SF_SECURITY_TOKEN (a .env file is loaded if present)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate rows for one object and write them to a file
    Generate(GenerateArgs),

    /// Show an object's fields and how each would be generated
    Describe(DescribeArgs),

    /// Print a few generated rows without writing anything
    Preview(PreviewArgs),
}

/// Org connection flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Instance URL for session-token authentication
    #[arg(long, env = "SF_INSTANCE_URL")]
    pub instance_url: Option<String>,

    /// Existing session id or OAuth access token
    #[arg(long, env = "SF_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Username for SOAP login
    #[arg(long, env = "SF_USERNAME")]
    pub username: Option<String>,

    /// Password for SOAP login
    #[arg(long, env = "SF_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Security token appended to the password
    #[arg(long, env = "SF_SECURITY_TOKEN", hide_env_values = true)]
    pub security_token: Option<String>,

    /// Log in through test.salesforce.com
    #[arg(long)]
    pub sandbox: bool,

    /// Explicit login host (e.g. a My Domain URL)
    #[arg(long)]
    pub login_url: Option<String>,

    /// API version, e.g. 59.0
    #[arg(long)]
    pub api_version: Option<String>,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Object API name (e.g. Opportunity, Invoice__c)
    #[arg(long)]
    pub object: String,

    /// Number of rows to generate (default: sfseed.toml, then 100)
    #[arg(long)]
    pub rows: Option<usize>,

    /// Output file path (default: <Object>.csv, .json or .xlsx)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from file extension if not specified)
    #[arg(long)]
    pub format: Option<FormatArg>,

    /// Random seed for deterministic generation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Anchor for dates and times, YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS
    /// (default: sfseed.toml, then 2025-01-01 when seeded, else now)
    #[arg(long)]
    pub base_time: Option<String>,

    /// Leave every reference field out of the table
    #[arg(long)]
    pub no_references: bool,

    /// CSV of object,id pairs used instead of querying for reference ids
    #[arg(long)]
    pub default_ids: Option<PathBuf>,

    /// Existing ids sampled per reference target
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Skip fields whose type has no generator instead of failing
    #[arg(long)]
    pub skip_unsupported: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Parser, Debug)]
pub struct DescribeArgs {
    /// Object API name
    #[arg(long)]
    pub object: String,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: DescribeFormat,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Object API name
    #[arg(long)]
    pub object: String,

    /// Number of sample rows
    #[arg(long, default_value = "5")]
    pub rows: usize,

    /// Leave every reference field out of the preview
    #[arg(long)]
    pub no_references: bool,

    /// CSV of object,id pairs used instead of querying for reference ids
    #[arg(long)]
    pub default_ids: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
    Xlsx,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Xlsx => OutputFormat::Xlsx,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DescribeFormat {
    Table,
    Json,
}

impl GenerateArgs {
    /// Explicit `--format`, else the output path's extension, else CSV.
    pub fn output_format(&self) -> OutputFormat {
        if let Some(fmt) = self.format {
            return fmt.into();
        }
        self.output
            .as_deref()
            .map(OutputFormat::from_path)
            .unwrap_or_default()
    }

    /// `--output`, or `<Object>.<ext>` in the working directory.
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = &self.output {
            return path.clone();
        }
        let ext = match self.output_format() {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Xlsx => "xlsx",
        };
        PathBuf::from(format!("{}.{}", self.object, ext))
    }
}
