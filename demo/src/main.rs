//! docseal Expense Reference Runtime — Demo CLI
//!
//! Runs one or all of the expense-approval demo scenarios, and exposes the
//! key, password, and policy utilities they are built on.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- approval-signing
//!   cargo run -p demo -- tamper-detection
//!   cargo run -p demo -- revocation-and-expiry
//!   cargo run -p demo -- signer-enrollment
//!   cargo run -p demo -- keygen --json
//!   cargo run -p demo -- hash-password 'passphrase'
//!   cargo run -p demo -- check-policy crates/docseal-ref-expense/policies/expense.toml

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docseal_contracts::{
    envelope::Algorithm,
    error::{SignatureError, SignatureResult},
    policy::SigningContext,
};
use docseal_core::traits::SigningPolicy;
use docseal_crypto::{keys::generate_key_pair, password::hash_password};
use docseal_policy::TomlSigningPolicy;
use docseal_ref_expense::scenarios::{approval_signing, revocation_and_expiry, signer_enrollment, tamper_detection};

// ── CLI definition ────────────────────────────────────────────────────────────

/// docseal: digital signatures for expense approvals.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "docseal expense reference runtime demo",
    long_about = "Runs docseal demo scenarios showing policy-gated signing, tamper detection,\n\
                  revocation, expiry reconciliation, and audit ledger integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four expense scenarios in sequence.
    RunAll,
    /// Scenario 1: Expense Approval Signing (policy, timestamp, certificate).
    ApprovalSigning,
    /// Scenario 2: Tamper Detection (DOCUMENT_MODIFIED / INVALID_SIGNATURE).
    TamperDetection,
    /// Scenario 3: Revocation and Expiry (terminal revoke, reconciliation sweep).
    RevocationAndExpiry,
    /// Scenario 4: Signer Enrollment (off-thread keygen and password hashing).
    SignerEnrollment,
    /// Generate an RSA-2048 key pair.
    Keygen {
        /// Print the full key pair as JSON instead of the public key only.
        #[arg(long)]
        json: bool,
    },
    /// Hash a password with PBKDF2-HMAC-SHA512.
    HashPassword {
        password: String,
        /// Hex salt to reuse; a random one is generated when omitted.
        #[arg(long)]
        salt: Option<String>,
    },
    /// Load a signing policy file and evaluate a request against it.
    CheckPolicy {
        path: PathBuf,
        #[arg(long, default_value = "expense-1001")]
        document: String,
        #[arg(long, default_value = "maria.santos")]
        signer: String,
        #[arg(long, default_value = "SHA256withRSA")]
        algorithm: String,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => {
            print_banner();
            run_all()
        }
        Command::ApprovalSigning => {
            print_banner();
            approval_signing::run_scenario()
        }
        Command::TamperDetection => {
            print_banner();
            tamper_detection::run_scenario()
        }
        Command::RevocationAndExpiry => {
            print_banner();
            revocation_and_expiry::run_scenario()
        }
        Command::SignerEnrollment => {
            print_banner();
            signer_enrollment::run_scenario()
        }
        Command::Keygen { json } => keygen(json),
        Command::HashPassword { password, salt } => {
            print_password_hash(&password, salt.as_deref());
            Ok(())
        }
        Command::CheckPolicy {
            path,
            document,
            signer,
            algorithm,
        } => check_policy(&path, &document, &signer, &algorithm),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> SignatureResult<()> {
    approval_signing::run_scenario()?;
    tamper_detection::run_scenario()?;
    revocation_and_expiry::run_scenario()?;
    signer_enrollment::run_scenario()?;
    println!("All selected scenarios completed successfully.");
    Ok(())
}

// ── Utilities ─────────────────────────────────────────────────────────────────

fn keygen(json: bool) -> SignatureResult<()> {
    let pair = generate_key_pair()?;
    info!(algorithm = %pair.algorithm, bits = pair.key_length, "key pair generated");

    if json {
        match serde_json::to_string_pretty(&pair) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("could not encode key pair: {e}"),
        }
    } else {
        print!("{}", pair.public_key);
    }
    Ok(())
}

fn print_password_hash(password: &str, salt: Option<&str>) {
    let hashed = hash_password(password, salt);
    println!("salt: {}", hashed.salt);
    println!("hash: {}", hashed.hash);
}

fn check_policy(path: &Path, document: &str, signer: &str, algorithm: &str) -> SignatureResult<()> {
    let policy = TomlSigningPolicy::from_file(path)?;
    let algorithm = Algorithm::parse(algorithm).ok_or_else(|| SignatureError::ConfigError {
        reason: format!("unknown algorithm '{algorithm}'"),
    })?;

    let settings = policy.settings();
    println!(
        "Policy {} v{} ({} rule(s))",
        settings.descriptor.policy_id,
        settings.descriptor.version,
        policy.config().rules.len()
    );
    let verdict = policy.evaluate(&SigningContext::new(document, signer, algorithm))?;
    println!("{signer} signing {document} with {algorithm}: {:?}", verdict);
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("docseal — Digital Signatures for Expense Approvals");
    println!("Expense Reference Demo");
    println!("==================================================");
    println!();
    println!("docseal signing pipeline per request:");
    println!("  [1] Duplicate check: one record per (document, signer)");
    println!("  [2] Signing policy evaluates (algorithm, signer, document) → Allow / Deny");
    println!("  [3] Canonicalize → SHA-256 → sign, ONLY after step 2 allows");
    println!("  [4] Timestamp token + certificate attached; record stored as pending");
    println!("  [5] Verification appends evidence; every entry chained into the SHA-256 ledger");
    println!();
}
