//! Command-line interface.

pub mod commands;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zeroize::Zeroizing;

use crate::core::config::Settings;
use crate::core::constants;
use crate::error::{Error, KeyFileError, Result, StoreError, ValidationError};

pub use prompt::{Prompt, Scripted, Terminal};

/// pprotect - team secrets in a single reviewable file.
#[derive(Parser, Debug)]
#[command(
    name = "pprotect",
    about = "Team secrets in a single reviewable file",
    version
)]
pub struct Cli {
    /// Store file
    #[arg(long, global = true, env = constants::ENV_FILE, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Show a diff and ask before writing
    #[arg(long, global = true)]
    pub confirm_diff: bool,

    /// Acting user email
    #[arg(short, long, global = true, env = constants::ENV_USER, value_name = "EMAIL")]
    pub user: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the store file and its first key custodian
    Init,

    /// Register a key custodian
    AddKeyCustodian,

    /// Create a domain owned by the acting user
    AddDomain {
        #[arg(long)]
        domain: Option<String>,
    },

    /// Grant another custodian access to a domain
    AddOwner {
        #[arg(long)]
        domain: Option<String>,
        /// Email of the new owner
        #[arg(long)]
        owner: Option<String>,
    },

    /// Create or overwrite a secret (no credentials needed)
    SetSecret {
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        secret: Option<String>,
        /// Secret value (prompted without echo if omitted)
        #[arg(long)]
        value: Option<String>,
    },

    /// Change the acting custodian's passphrase
    SetKeyCustodianPassphrase,

    /// Print every secret of a domain as JSON
    DecryptDomain {
        #[arg(long)]
        domain: Option<String>,
    },

    /// Replace a domain keypair and re-seal its secrets
    RotateDomainKey {
        #[arg(long)]
        domain: Option<String>,
    },

    /// Replace the acting custodian's keypair
    RotateKeyCustodianKey,

    /// Print the version
    Version,

    /// List domains and their owners
    ListDomains,

    /// List every secret name and the domains holding it
    ListAllSecrets,

    /// List the secrets a user can decrypt
    ListUserSecrets,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Everything a command needs besides its own arguments.
#[derive(Clone)]
pub struct Context {
    pub settings: Settings,
    pub user: Option<String>,
    /// From `PPROTECT_PASSPHRASE`; prompted for when absent.
    pub passphrase: Option<Zeroizing<String>>,
    /// From `PPROTECT_NEW_PASSPHRASE`; prompted for when absent.
    pub new_passphrase: Option<Zeroizing<String>>,
    pub confirm_diff: bool,
}

impl Context {
    /// Resolve settings and non-interactive credentials for `cli`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if an environment override is
    /// malformed.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut settings = Settings::from_env()?;
        if let Some(path) = &cli.file {
            settings = settings.with_path(path);
        }

        let env = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .map(Zeroizing::new)
        };

        Ok(Self {
            settings,
            user: cli.user.clone().filter(|u| !u.is_empty()),
            passphrase: env(constants::ENV_PASSPHRASE),
            new_passphrase: env(constants::ENV_NEW_PASSPHRASE),
            confirm_diff: cli.confirm_diff,
        })
    }
}

/// Run a parsed command line against the terminal.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Version => commands::version(),
        Command::Completions { shell } => commands::completions(shell),
        ref command => {
            let ctx = Context::from_cli(&cli)?;
            commands::run(command, &ctx, &mut Terminal)
        }
    }
}

/// Process exit code for an error.
///
/// 2 when the store file is missing (or, for `init`, already present);
/// 1 for everything else.
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Store(StoreError::NotFound(_) | StoreError::AlreadyExists(_)) => 2,
        _ => 1,
    }
}

/// User-facing message for an error.
pub fn message(err: &Error) -> String {
    match err {
        Error::KeyFile(KeyFileError::InvalidCreds(_)) => {
            "Invalid user credentials. Check email and passphrase and try again.".to_string()
        }
        Error::Validation(ValidationError::PassphraseMismatch) => {
            "Sorry, passphrases did not match.".to_string()
        }
        _ => err.to_string(),
    }
}

/// Suggested next step for an error, if any.
pub fn hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::Store(StoreError::NotFound(_)) => Some("run: pprotect init"),
        Error::KeyFile(KeyFileError::AccessDenied { .. }) => {
            Some("ask an owner to run: pprotect add-owner")
        }
        _ => None,
    }
}
