//! Clap derive structures for the `aretas` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aretas -- query and manage an Aretas sensor network
#[derive(Debug, Parser)]
#[command(
    name = "aretas",
    version,
    about = "Query and manage Aretas sensor networks from the command line",
    long_about = "A CLI for the Aretas sensor network REST API.\n\n\
        Lists locations, sensors, alerts and data classifiers, pulls sensor\n\
        readings and charts, and manages API profiles and credentials.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API profile to use
    #[arg(long, short = 'p', env = "ARETAS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "ARETAS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Pre-issued bearer token (used as-is, never refreshed)
    #[arg(long, env = "ARETAS_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ARETAS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "ARETAS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ARETAS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Alert rules and alert history
    #[command(alias = "al")]
    Alerts(AlertsArgs),

    /// Locations and their sensors
    #[command(alias = "loc")]
    Locations(LocationsArgs),

    /// Data classifiers and their labelled records
    #[command(alias = "cls")]
    Classifiers(ClassifiersArgs),

    /// Geocoding, IP and timezone utilities
    Geo(GeoArgs),

    /// Sensor readings and charts
    Data(DataArgs),

    /// Check the bearer token against the API
    Token,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Time Range ────────────────────────────────────────────────

/// Time window for data queries. Without `--begin`, the window covers the
/// last `--hours` up to `--end` (default: now).
#[derive(Debug, Args)]
pub struct TimeRangeArgs {
    /// Start of the window (epoch milliseconds)
    #[arg(long)]
    pub begin: Option<i64>,

    /// End of the window (epoch milliseconds, default: now)
    #[arg(long)]
    pub end: Option<i64>,

    /// Window length in hours when --begin is not given
    #[arg(long, default_value = "24")]
    pub hours: u32,
}

// ── Alerts ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alert rules
    #[command(alias = "ls")]
    List,

    /// Show one alert rule
    Get {
        /// Alert ID
        id: String,
    },

    /// List alert events joined with the sensor that raised them
    History {
        /// Alert IDs (default: every alert rule)
        ids: Vec<String>,

        /// Include dismissed events
        #[arg(long)]
        show_dismissed: bool,
    },

    /// Mark an alert event as read
    Dismiss {
        /// Sensor MAC
        #[arg(long)]
        mac: i64,

        /// Sensor type
        #[arg(long = "type")]
        sensor_type: i64,

        /// Alert ID
        #[arg(long)]
        alert_id: String,
    },
}

// ── Locations ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LocationsArgs {
    /// Ask the server to rebuild its location view first
    #[arg(long, global = true)]
    pub refresh: bool,

    #[command(subcommand)]
    pub command: LocationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LocationsCommand {
    /// List every location
    #[command(alias = "ls")]
    List,

    /// List locations where a sensor has reported
    Active,

    /// List sensors, optionally for one location
    Sensors {
        /// Location ID
        #[arg(long, short = 'l')]
        location: Option<String>,

        /// Only sensors that reported within this many hours
        #[arg(long)]
        active_within: Option<u32>,
    },

    /// Show one sensor by MAC
    Sensor {
        /// Sensor MAC
        mac: i64,
    },
}

// ── Classifiers ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClassifiersArgs {
    #[command(subcommand)]
    pub command: ClassifiersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClassifiersCommand {
    /// List data classifiers
    #[command(alias = "ls")]
    List,

    /// List labelled records of a classifier
    Records {
        /// Classifier ID
        classifier_id: String,
    },

    /// Delete every labelled record of a classifier
    Purge {
        /// Classifier ID
        classifier_id: String,
    },
}

// ── Geo ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GeoArgs {
    #[command(subcommand)]
    pub command: GeoCommand,
}

#[derive(Debug, Subcommand)]
pub enum GeoCommand {
    /// Resolve a free-form address to coordinates
    Geocode {
        /// Address or place name
        query: String,
    },

    /// Show this machine's public IP as seen by the API
    Ip,

    /// Approximate this machine's coordinates from its IP
    Locate,

    /// Timezone ID for a coordinate
    Timezone {
        /// Latitude
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Longitude
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
}

// ── Data ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommand,
}

#[derive(Debug, Subcommand)]
pub enum DataCommand {
    /// Readings for one sensor over a time window
    Range {
        /// Sensor MAC
        mac: i64,

        #[command(flatten)]
        range: TimeRangeArgs,

        /// Restrict to these sensor types (repeatable)
        #[arg(long = "type", short = 't')]
        types: Vec<i64>,

        /// Maximum number of readings
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Render a PNG chart of one sensor's readings
    Chart {
        /// Sensor MAC
        mac: i64,

        #[command(flatten)]
        range: TimeRangeArgs,

        /// Restrict to these sensor types (repeatable)
        #[arg(long = "type", short = 't')]
        types: Vec<i64>,

        /// Image width in pixels
        #[arg(long, default_value = "800")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "600")]
        height: u32,

        /// Output file
        #[arg(long, short = 'f', default_value = "chart.png")]
        file: PathBuf,
    },

    /// Latest report from each sensor
    Latest {
        /// Sensor MACs
        #[arg(required = true)]
        macs: Vec<i64>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Store a profile secret in the system keyring
    SetPassword {
        /// Profile name (default: active profile)
        #[arg(long)]
        profile: Option<String>,

        /// Store a bearer token instead of a password
        #[arg(long)]
        token: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
