use anyhow::Result;
use clap::Parser;
use log::info;

use crate::config::Config;
use crate::review::{self, Outcome};

/// Summarize open Wiz issues for a cloud account.
///
/// Configuration is read from the environment (or a `.env` file):
/// WIZ_CLIENT_ID, WIZ_CLIENT_SECRET, WIZ_AUTH_URL, WIZ_API_URL and,
/// optionally, WIZ_INSECURE_SKIP_TLS_VERIFY. The account to review is
/// asked for interactively.
#[derive(Parser)]
#[command(name = "wiz-review")]
#[command(author, version, about, long_about = None)]
pub struct Cli {}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = Config::from_env()?;

        let mut stdin = std::io::stdin().lock();
        let mut stdout = std::io::stdout();

        match review::run(&config, &mut stdin, &mut stdout).await? {
            Outcome::Reported => info!("Review complete"),
            Outcome::AccountNotFound => info!("Account not found; nothing to report"),
        }

        Ok(())
    }
}
