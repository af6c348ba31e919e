//! Command implementations.
//!
//! Each handler loads the store, gathers what it needs through a [`Prompt`],
//! and hands the modified snapshot to [`commit`].

use std::collections::BTreeMap;

use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Command, Context, Prompt, Shell};
use crate::core::diff::Diff;
use crate::core::keyfile::KeyFile;
use crate::core::model::Creds;
use crate::error::{KeyFileError, Result, StoreError, ValidationError};

/// Run a store command.
///
/// # Errors
///
/// Returns whatever the underlying operation or prompt fails with.
pub fn run(command: &Command, ctx: &Context, prompt: &mut dyn Prompt) -> Result<()> {
    match command {
        Command::Init => cmd_init(ctx, prompt),
        Command::AddKeyCustodian => cmd_add_key_custodian(ctx, prompt),
        Command::AddDomain { domain } => cmd_add_domain(ctx, prompt, domain.as_deref()),
        Command::AddOwner { domain, owner } => {
            cmd_add_owner(ctx, prompt, domain.as_deref(), owner.as_deref())
        }
        Command::SetSecret {
            domain,
            secret,
            value,
        } => cmd_set_secret(
            ctx,
            prompt,
            domain.as_deref(),
            secret.as_deref(),
            value.as_deref(),
        ),
        Command::SetKeyCustodianPassphrase => cmd_set_passphrase(ctx, prompt),
        Command::DecryptDomain { domain } => cmd_decrypt_domain(ctx, prompt, domain.as_deref()),
        Command::RotateDomainKey { domain } => {
            cmd_rotate_domain_key(ctx, prompt, domain.as_deref())
        }
        Command::RotateKeyCustodianKey => cmd_rotate_custodian_key(ctx, prompt),
        Command::ListDomains => cmd_list_domains(ctx),
        Command::ListAllSecrets => cmd_list_all_secrets(ctx),
        Command::ListUserSecrets => cmd_list_user_secrets(ctx, prompt),
        Command::Version => version(),
        Command::Completions { shell } => completions(*shell),
    }
}

/// Print the version.
pub fn version() -> Result<()> {
    println!("pocket_protector version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Generate shell completions on stdout.
pub fn completions(shell: Shell) -> Result<()> {
    let shell = match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
    };
    generate(shell, &mut Cli::command(), "pprotect", &mut std::io::stdout());
    Ok(())
}

fn cmd_init(ctx: &Context, prompt: &mut dyn Prompt) -> Result<()> {
    let path = &ctx.settings.path;
    if path.exists() {
        return Err(StoreError::AlreadyExists(path.clone()).into());
    }

    let kf = KeyFile::new(path).with_kdf_params(ctx.settings.kdf);
    println!("Adding new key custodian.");
    let creds = new_creds(ctx, prompt)?;
    let next = kf.add_key_custodian(&creds)?;

    if commit(ctx, prompt, &kf, &next)? {
        output::success(&format!(
            "initialized {} with custodian {}",
            output::path(&path.display().to_string()),
            output::name(creds.user_id())
        ));
    }
    Ok(())
}

fn cmd_add_key_custodian(ctx: &Context, prompt: &mut dyn Prompt) -> Result<()> {
    let kf = load(ctx)?;
    println!("Adding new key custodian.");
    let creds = new_creds(ctx, prompt)?;
    let next = kf.add_key_custodian(&creds)?;

    if commit(ctx, prompt, &kf, &next)? {
        output::success(&format!("added key custodian {}", output::name(creds.user_id())));
    }
    Ok(())
}

fn cmd_add_domain(ctx: &Context, prompt: &mut dyn Prompt, domain: Option<&str>) -> Result<()> {
    let kf = load(ctx)?;
    println!("Adding new domain.");
    let creds = checked_creds(&kf, ctx, prompt)?;
    let domain = ask(prompt, domain, "Domain name")?;
    let next = kf.add_domain(&domain, creds.user_id())?;

    if commit(ctx, prompt, &kf, &next)? {
        output::success(&format!("added domain {}", output::name(&domain)));
    }
    Ok(())
}

fn cmd_add_owner(
    ctx: &Context,
    prompt: &mut dyn Prompt,
    domain: Option<&str>,
    owner: Option<&str>,
) -> Result<()> {
    let kf = load(ctx)?;
    println!("Adding domain owner.");
    let creds = checked_creds(&kf, ctx, prompt)?;
    let domain = ask(prompt, domain, "Domain name")?;
    let owner = ask(prompt, owner, "New owner email")?;
    let next = kf.add_owner(&domain, &owner, &creds)?;

    if commit(ctx, prompt, &kf, &next)? {
        output::success(&format!(
            "{} can now read {}",
            output::name(&owner),
            output::name(&domain)
        ));
    }
    Ok(())
}

fn cmd_set_secret(
    ctx: &Context,
    prompt: &mut dyn Prompt,
    domain: Option<&str>,
    secret: Option<&str>,
    value: Option<&str>,
) -> Result<()> {
    let kf = load(ctx)?;
    println!("Setting secret value.");
    let domain = ask(prompt, domain, "Domain name")?;
    let secret = ask(prompt, secret, "Secret name")?;
    let value = match value {
        Some(v) => Zeroizing::new(v.to_string()),
        None => Zeroizing::new(prompt.secret("Secret value")?),
    };
    let next = kf.set_secret(&domain, &secret, &value)?;

    if commit(ctx, prompt, &kf, &next)? {
        output::success(&format!(
            "set {} in {}",
            output::name(&secret),
            output::name(&domain)
        ));
    }
    Ok(())
}

fn cmd_set_passphrase(ctx: &Context, prompt: &mut dyn Prompt) -> Result<()> {
    let kf = load(ctx)?;
    let user_id = user_id(ctx, prompt)?;
    let current = passphrase(ctx.passphrase.as_ref(), prompt, "Current passphrase")?;
    let creds = check(&kf, Creds::new(user_id, current.as_str()))?;
    let new_passphrase = confirmed_passphrase(
        ctx.new_passphrase.as_ref(),
        prompt,
        "New passphrase",
        "Retype new passphrase",
    )?;
    let next = kf.set_key_custodian_passphrase(&creds, &new_passphrase)?;

    if commit(ctx, prompt, &kf, &next)? {
        output::success(&format!("passphrase changed for {}", output::name(creds.user_id())));
    }
    Ok(())
}

fn cmd_decrypt_domain(ctx: &Context, prompt: &mut dyn Prompt, domain: Option<&str>) -> Result<()> {
    let kf = load(ctx)?;
    let creds = checked_creds(&kf, ctx, prompt)?;
    let domain = ask(prompt, domain, "Domain name")?;
    let plaintexts = kf.decrypt_domain(&domain, &creds)?;

    let view: BTreeMap<&str, &str> = plaintexts
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    let json = Zeroizing::new(serde_json::to_string_pretty(&view)?);
    println!("{}", json.as_str());
    Ok(())
}

fn cmd_rotate_domain_key(
    ctx: &Context,
    prompt: &mut dyn Prompt,
    domain: Option<&str>,
) -> Result<()> {
    let kf = load(ctx)?;
    let creds = checked_creds(&kf, ctx, prompt)?;
    let domain = ask(prompt, domain, "Domain name")?;
    let next = kf.rotate_domain_key(&domain, &creds)?;

    if commit(ctx, prompt, &kf, &next)? {
        output::success(&format!("rotated key of {}", output::name(&domain)));
    }
    Ok(())
}

fn cmd_rotate_custodian_key(ctx: &Context, prompt: &mut dyn Prompt) -> Result<()> {
    let kf = load(ctx)?;
    let creds = checked_creds(&kf, ctx, prompt)?;
    let next = kf.rotate_key_custodian_key(&creds)?;

    if commit(ctx, prompt, &kf, &next)? {
        output::success(&format!(
            "rotated key of {} ({} domains rewrapped)",
            output::name(creds.user_id()),
            next.domains_owned_by(creds.user_id()).len()
        ));
    }
    Ok(())
}

fn cmd_list_domains(ctx: &Context) -> Result<()> {
    let kf = load(ctx)?;
    let names = kf.domain_names();
    if names.is_empty() {
        output::dimmed("no domains");
        return Ok(());
    }
    for name in names {
        println!("{}: {}", output::name(name), kf.owners(name)?.join(", "));
    }
    Ok(())
}

fn cmd_list_all_secrets(ctx: &Context) -> Result<()> {
    let index = load(ctx)?.secret_index();
    if index.is_empty() {
        output::dimmed("no secrets");
        return Ok(());
    }
    for (secret, domains) in &index {
        let domains: Vec<&str> = domains.iter().map(String::as_str).collect();
        println!("{}: {}", output::name(secret), domains.join(", "));
    }
    Ok(())
}

fn cmd_list_user_secrets(ctx: &Context, prompt: &mut dyn Prompt) -> Result<()> {
    let kf = load(ctx)?;
    let user_id = user_id(ctx, prompt)?;
    if kf.custodian(&user_id).is_none() {
        return Err(KeyFileError::UnknownUser(user_id).into());
    }

    let accessible = kf.secrets_accessible_by(&user_id);
    if accessible.is_empty() {
        output::dimmed(&format!("{} owns no domains", user_id));
        return Ok(());
    }
    for (domain, secrets) in &accessible {
        println!("{}: {}", output::name(domain), secrets.join(", "));
    }
    Ok(())
}

/// Load the store named by the settings.
fn load(ctx: &Context) -> Result<KeyFile> {
    KeyFile::from_file_with(&ctx.settings.path, ctx.settings.kdf)
}

/// Optionally review, then write `next`.
///
/// Returns `false` if the user declined the diff.
fn commit(ctx: &Context, prompt: &mut dyn Prompt, current: &KeyFile, next: &KeyFile) -> Result<bool> {
    if ctx.confirm_diff {
        let old = if current.path().exists() {
            current.get_contents()?
        } else {
            String::new()
        };
        let new = next.get_contents()?;
        let label = current.path().display().to_string();
        let diff = Diff::compute(&old, &new);

        println!("Changes to be written:\n");
        println!(
            "{}",
            output::diff(&diff.unified(&format!("{}.old", label), &format!("{}.new", label), 3))
        );
        println!();
        if !prompt.confirm("Write changes?")? {
            println!("Aborting...");
            debug!(path = %label, "write declined");
            return Ok(false);
        }
    }

    next.write()?;
    Ok(true)
}

/// Use `preset` if given, else ask.
fn ask(prompt: &mut dyn Prompt, preset: Option<&str>, label: &str) -> Result<String> {
    match preset {
        Some(v) => Ok(v.to_string()),
        None => prompt.input(label),
    }
}

fn user_id(ctx: &Context, prompt: &mut dyn Prompt) -> Result<String> {
    ask(prompt, ctx.user.as_deref(), "User email")
}

fn passphrase(
    preset: Option<&Zeroizing<String>>,
    prompt: &mut dyn Prompt,
    label: &str,
) -> Result<Zeroizing<String>> {
    match preset {
        Some(p) => Ok(p.clone()),
        None => Ok(Zeroizing::new(prompt.secret(label)?)),
    }
}

/// A passphrase typed twice, unless preset.
fn confirmed_passphrase(
    preset: Option<&Zeroizing<String>>,
    prompt: &mut dyn Prompt,
    label: &str,
    retype_label: &str,
) -> Result<Zeroizing<String>> {
    if let Some(p) = preset {
        return Ok(p.clone());
    }
    let first = Zeroizing::new(prompt.secret(label)?);
    let second = Zeroizing::new(prompt.secret(retype_label)?);
    if first != second {
        return Err(ValidationError::PassphraseMismatch.into());
    }
    Ok(first)
}

/// Credentials for a new custodian.
fn new_creds(ctx: &Context, prompt: &mut dyn Prompt) -> Result<Creds> {
    let user_id = user_id(ctx, prompt)?;
    let passphrase = confirmed_passphrase(
        ctx.passphrase.as_ref(),
        prompt,
        "Passphrase",
        "Retype passphrase",
    )?;
    Ok(Creds::new(user_id, passphrase.as_str()))
}

/// Credentials of an existing custodian, verified before anything else runs.
fn checked_creds(kf: &KeyFile, ctx: &Context, prompt: &mut dyn Prompt) -> Result<Creds> {
    let user_id = user_id(ctx, prompt)?;
    let passphrase = passphrase(ctx.passphrase.as_ref(), prompt, "Passphrase")?;
    check(kf, Creds::new(user_id, passphrase.as_str()))
}

fn check(kf: &KeyFile, creds: Creds) -> Result<Creds> {
    if !kf.check_creds(&creds) {
        return Err(KeyFileError::InvalidCreds(creds.user_id().to_string()).into());
    }
    Ok(creds)
}
