//! Clap derive structures for the `sparkcloud` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sparkcloud -- talk to your Spark / Particle devices through the cloud
#[derive(Debug, Parser)]
#[command(
    name = "sparkcloud",
    version,
    about = "Call functions and read variables on Spark / Particle cloud devices",
    long_about = "List the devices claimed by your cloud account, invoke the functions\n\
        their firmware exposes, and read their variables.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "SPARKCLOUD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Cloud base URL (overrides profile)
    #[arg(long, env = "SPARKCLOUD_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Access token (skips login and the credential chain)
    #[arg(long, env = "SPARKCLOUD_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
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

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, global = true)]
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
    /// Exchange username and password for an access token
    Login(LoginArgs),

    /// List and inspect devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Invoke a firmware function on a device
    Call(CallArgs),

    /// Read a firmware variable from a device
    Read(ReadArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Login ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account login (prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Where to keep the obtained token
    #[arg(long, default_value = "keyring")]
    pub store: TokenStore,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TokenStore {
    /// System keyring (recommended)
    Keyring,
    /// Plaintext in the config file
    Config,
    /// Print the token and keep nothing
    None,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List every device on the account
    #[command(alias = "ls")]
    List {
        /// Only show connected devices
        #[arg(long)]
        connected: bool,
    },

    /// Show fields, functions and variables of one device
    Get {
        /// Device name or ID
        device: String,
    },
}

// ── Functions & Variables ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CallArgs {
    /// Device name or ID
    pub device: String,

    /// Function name
    pub function: String,

    /// Arguments, joined with commas on the wire
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Device name or ID
    pub device: String,

    /// Variable name
    pub variable: String,
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

    /// Display current configuration (secrets masked)
    Show,

    /// Store an access token for a profile
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,

        /// Write the token to the config file instead of the keyring
        #[arg(long)]
        plaintext: bool,
    },

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
