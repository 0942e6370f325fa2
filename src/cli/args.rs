use crate::constants::{exit_codes, verbosity};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::fmt::Display;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// How the `date` command prints its result.
#[derive(Debug, Clone, ValueEnum, Copy, PartialEq, Default)]
#[value(rename_all = "lowercase")]
pub enum DateOutput {
    /// RFC 3339 with milliseconds.
    #[default]
    Json,
    /// Legacy `/Date(ms±hhmm)/`.
    Legacy,
    /// RFC 2822.
    Internet,
    Short,
    Medium,
    Long,
    Full,
    /// Distance from now.
    Relative,
}

impl Display for DateOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DateOutput::Json => "json",
            DateOutput::Legacy => "legacy",
            DateOutput::Internet => "internet",
            DateOutput::Short => "short",
            DateOutput::Medium => "medium",
            DateOutput::Long => "long",
            DateOutput::Full => "full",
            DateOutput::Relative => "relative",
        };
        write!(f, "{s}")
    }
}

/// CLI arguments for valuekit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rotate letters by 13 places.
    Rot13 {
        /// Text to transform, or `-` to read stdin.
        text: String,
    },
    /// Obfuscate text reversibly.
    Mask { text: String },
    /// Reverse `mask`.
    Unmask { text: String },
    /// Base64 encode or decode text.
    Base64 {
        #[command(subcommand)]
        action: Base64Action,
    },
    /// List paths below a directory by extension or name fragment.
    Find(FindArgs),
    /// Copy a file to `<name> backup.<ext>` next to it.
    Backup { path: PathBuf },
    /// Parse, shift and reformat a date.
    Date(DateArgs),
    /// Read and edit a preferences domain.
    Prefs(PrefsArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum Base64Action {
    Encode { text: String },
    Decode { text: String },
}

#[derive(clap::Args, Debug, Clone)]
pub struct FindArgs {
    /// Directory to search.
    pub dir: PathBuf,

    /// Extensions to match (comma-separated, case-insensitive).
    #[arg(short, long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// File name fragments to match (comma-separated, case-insensitive).
    #[arg(short, long = "name", value_delimiter = ',')]
    pub names: Vec<String>,

    /// Descend into subdirectories.
    #[arg(short, long)]
    pub deep: bool,

    /// Stop at the first match.
    #[arg(long)]
    pub first: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DateArgs {
    /// Date text, or `now`.
    pub text: String,

    /// Calendar days to add (negative to subtract).
    #[arg(long = "add-days", allow_hyphen_values = true)]
    pub add_days: Option<i64>,

    /// Calendar months to add (negative to subtract).
    #[arg(long = "add-months", allow_hyphen_values = true)]
    pub add_months: Option<i32>,

    /// strftime format; overrides `--output`.
    #[arg(short, long)]
    pub format: Option<String>,

    #[arg(short, long, value_enum, default_value_t = DateOutput::Json)]
    pub output: DateOutput,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PrefsArgs {
    /// Preferences domain, e.g. `com.example.app`.
    #[arg(short = 'D', long)]
    pub domain: String,

    /// Preferences directory; defaults to `$VALUEKIT_PREFS_DIR` or the platform directory.
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Defaults file (JSON object) registered before reading.
    #[arg(long)]
    pub defaults: Option<PathBuf>,

    #[command(subcommand)]
    pub action: PrefsAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PrefsAction {
    /// Print one key, or every key when none is given.
    Get { key: Option<String> },
    /// Store a value; JSON is parsed, anything else is stored as text.
    Set { key: String, value: String },
    /// Remove stored values so registered defaults apply again.
    Restore {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

/// Parse command line arguments, printing help when a required input is missing.
pub fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument
            || e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Warn,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
