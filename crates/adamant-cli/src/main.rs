//! adamant-cli
//!
//! Command-line wrapper around the decision-and-authority core. Evaluates
//! context snapshots and drives the full signing gate for intents; exit
//! codes mirror the gate's error kinds so scripts can branch on outcomes.
//!
//! Usage:
//!   adamant decide      --context <file|-> [--pack <ref>]...
//!   adamant authorize   --intent <file|->  [--ttl <secs>] [--pack <ref>]...
//!                       [--watch-only] [--no-wsqk]
//!   adamant fingerprint --context <file|->
//!
//! Exit codes:
//!   0 success · 10 EQC denied · 11 step-up required · 12 Shield blocked
//!   13 watch-only · 14 scope/capability invalid · 15 nonce replay
//!   1 malformed input

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;

use adamant_core::AdamantError;
use adamant_eqc::{ContextSnapshot, EqcEngine};
use adamant_gate::{SigningGate, SigningIntent};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "adamant",
    version,
    about = "Adamant wallet OS — EQC decisions and gated signing authority"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a context snapshot and print the decision JSON.
    Decide {
        /// Path to the context snapshot JSON ("-" for stdin).
        #[arg(long)]
        context: PathBuf,
        /// Policy pack reference to enable (repeatable).
        #[arg(long)]
        pack: Vec<String>,
    },

    /// Run a signing intent through the full gate and print a receipt.
    Authorize {
        /// Path to the signing intent JSON ("-" for stdin).
        #[arg(long)]
        intent: PathBuf,
        /// Scope TTL in seconds.
        #[arg(long, default_value_t = adamant_core::DEFAULT_SCOPE_TTL_SECS)]
        ttl: i64,
        /// Policy pack reference to enable (repeatable).
        #[arg(long)]
        pack: Vec<String>,
        /// Treat the intent's account as watch-only.
        #[arg(long)]
        watch_only: bool,
        /// Skip scope/capability binding (the gates themselves still run).
        #[arg(long)]
        no_wsqk: bool,
    },

    /// Print the canonical fingerprint of a context snapshot.
    Fingerprint {
        /// Path to the context snapshot JSON ("-" for stdin).
        #[arg(long)]
        context: PathBuf,
    },
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("warn,adamant_gate=info,adamant_eqc=info,adamant_wsqk=info")
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error [{}]: {err}", err.kind());
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(args: Args) -> Result<(), AdamantError> {
    match args.command {
        Command::Decide { context, pack } => {
            let ctx: ContextSnapshot = read_json(&context)?;
            let engine = engine_with_packs(pack);
            let decision = engine.decide(&ctx)?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
            if !decision.verdict.is_allow() {
                return Err(AdamantError::EqcBlocked {
                    verdict: decision.verdict,
                });
            }
            Ok(())
        }

        Command::Authorize {
            intent,
            ttl,
            pack,
            watch_only,
            no_wsqk,
        } => {
            let intent: SigningIntent = read_json(&intent)?;
            let gate = SigningGate::new()
                .with_engine(engine_with_packs(pack))
                .with_account_store(Box::new(move |_: &str, _: &str| watch_only))
                .with_scope_ttl(ttl)
                .with_use_wsqk(!no_wsqk);

            let wallet_id = intent.wallet_id.clone();
            let action = intent.action.clone();
            let receipt = gate.execute_signing_intent(&intent, move |ctx| {
                json!({
                    "authorized": true,
                    "wallet_id": wallet_id,
                    "action": action,
                    "context_fingerprint": ctx.fingerprint().unwrap_or_default(),
                })
            })?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(())
        }

        Command::Fingerprint { context } => {
            let ctx: ContextSnapshot = read_json(&context)?;
            println!("{}", ctx.fingerprint()?);
            Ok(())
        }
    }
}

fn engine_with_packs(packs: Vec<String>) -> EqcEngine {
    let mut engine = EqcEngine::new();
    for reference in &packs {
        engine.enable_policy_pack(reference);
    }
    engine
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AdamantError> {
    let data = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AdamantError::MalformedInput(format!("reading stdin: {e}")))?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            AdamantError::MalformedInput(format!("reading {}: {e}", path.display()))
        })?
    };
    serde_json::from_str(&data)
        .map_err(|e| AdamantError::MalformedInput(format!("parsing JSON: {e}")))
}
