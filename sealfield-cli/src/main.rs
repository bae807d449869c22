//! sealfield key and token tool
//!
//! Usage:
//!   sealfield keygen
//!   echo -n 'passphrase' | sealfield derive --salt <b64>
//!   SEALFIELD_KEYS=<k1>,<k2> sealfield seal '{"type":"text","value":"secret"}'
//!   sealfield --keys <k1> open <token> --ttl 3600
//!   SEALFIELD_KEYS=<new>,<old> sealfield rotate <token>
//!   sealfield inspect <token>

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sealfield_crypto::{KeyRing, Salt};
use std::io::{self, BufRead};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sealfield")]
#[command(about = "Key and token tooling for sealfield encrypted fields")]
struct Args {
    /// Base64url keys, primary first (comma-separated), or a JSON ring config
    #[arg(long, env = "SEALFIELD_KEYS", global = true, hide_env_values = true)]
    keys: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a new random key
    Keygen,
    /// Derive a key from a passphrase read on stdin
    Derive {
        /// Base64url salt; a random one is generated and printed when omitted
        #[arg(long)]
        salt: Option<String>,
    },
    /// Encrypt a JSON-encoded value
    Seal { json: String },
    /// Decrypt a token
    Open {
        token: String,
        /// Reject tokens older than this many seconds
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Re-encrypt a token under the primary key
    Rotate { token: String },
    /// Show a token's header without decrypting it
    Inspect { token: String },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let output = match args.command {
        Command::Keygen => sealfield_cli::keygen(),
        Command::Derive { salt } => {
            let salt = match salt {
                Some(salt) => salt,
                None => {
                    let salt = Salt::random().to_base64();
                    eprintln!("salt: {salt}");
                    salt
                }
            };
            let passphrase = read_passphrase()?;
            sealfield_cli::derive(&passphrase, &salt)?
        }
        Command::Seal { json } => sealfield_cli::seal(&ring(args.keys.as_deref())?, &json)?,
        Command::Open { token, ttl } => {
            sealfield_cli::open(&ring(args.keys.as_deref())?, &token, ttl)?
        }
        Command::Rotate { token } => {
            let rotated = sealfield_cli::rotate(&ring(args.keys.as_deref())?, &token)?;
            info!("token rotated to primary key");
            rotated
        }
        Command::Inspect { token } => sealfield_cli::inspect(&token)?,
    };

    println!("{output}");
    Ok(())
}

fn ring(keys: Option<&str>) -> Result<KeyRing> {
    let Some(keys) = keys else {
        bail!("No keys: pass --keys or set SEALFIELD_KEYS");
    };
    sealfield_cli::load_ring(keys)
}

fn read_passphrase() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read passphrase from stdin")?;
    let passphrase = line.trim_end_matches(['\r', '\n']).to_string();
    if passphrase.is_empty() {
        bail!("Empty passphrase");
    }
    Ok(passphrase)
}
