//! dlsig CLI
//!
//! Command-line interface over the signature core:
//! - Domain parameter and key pair generation
//! - Signing a document
//! - Verifying a document against a stored signature

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dlsig_core::{
    hash_document, keygen, prime, DecimalLines, MillerRabin, ParameterConfig,
    ParameterGenerator, PrivateKey, SearchBudget, Signature, Signer, VerificationKey, Verifier,
};
use rand::rngs::OsRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, Level};

const KEY_FILE: &str = "key.txt";
const SECRET_KEY_FILE: &str = "secret_key.txt";
const SIGNATURE_FILE: &str = "signature.txt";

/// dlsig - discrete-log signatures for documents
#[derive(Parser)]
#[command(name = "dlsig")]
#[command(about = "Generate keys, sign and verify documents")]
#[command(version)]
struct Cli {
    /// Data directory for keys and signatures
    #[arg(short, long, env = "DLSIG_DEST", default_value = "./data")]
    dest: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate domain parameters and a key pair
    Keygen {
        /// Give up after this many candidate draws
        #[arg(long)]
        max_iterations: Option<u64>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Sign a document
    Sign {
        /// Document to sign
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Verify a document against a signature
    Verify {
        /// Document to verify
        #[arg(short, long)]
        file: PathBuf,

        /// Signature file (defaults to signature.txt in the data directory)
        #[arg(short, long)]
        signature: Option<PathBuf>,
    },

    /// Show stored public parameters
    Info,
}

fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    // Ensure data directory exists
    std::fs::create_dir_all(&cli.dest)
        .with_context(|| format!("creating data directory {}", cli.dest.display()))?;

    match cli.command {
        Commands::Keygen {
            max_iterations,
            timeout_secs,
        } => run_keygen(&cli, max_iterations, timeout_secs)?,
        Commands::Sign { ref file } => run_sign(&cli, file)?,
        Commands::Verify {
            ref file,
            ref signature,
        } => {
            if !run_verify(&cli, file, signature.as_deref())? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Info => show_info(&cli)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn run_keygen(cli: &Cli, max_iterations: Option<u64>, timeout_secs: Option<u64>) -> Result<()> {
    let mut budget = SearchBudget::unbounded();
    if let Some(max) = max_iterations {
        budget = budget.with_max_iterations(max);
    }
    if let Some(secs) = timeout_secs {
        budget = budget.with_timeout(Duration::from_secs(secs));
    }

    // Spend extra primality calls on p before accepting it
    let config = ParameterConfig::default().with_confirm_rounds(prime::CONFIRM_REPETITIONS)?;

    info!("Computing key values, please wait...");
    let generator = ParameterGenerator::new(config.clone()).with_budget(budget);
    let (domain, stats) = generator.search(&mut OsRng)?;
    domain.validate(&config, &MillerRabin::default())?;

    let pair = keygen::generate(&domain, &mut OsRng)?;
    let key = VerificationKey::new(domain, pair.public);

    let key_path = cli.dest.join(KEY_FILE);
    let secret_path = cli.dest.join(SECRET_KEY_FILE);
    std::fs::write(&key_path, key.to_decimal_lines())?;
    std::fs::write(&secret_path, pair.private.to_decimal_lines())?;

    info!(
        iterations = stats.iterations,
        key = ?key_path,
        secret = ?secret_path,
        "Key generation completed"
    );

    println!("p = {}", key.domain.p);
    println!("q = {}", key.domain.q);
    println!("g = {}", key.domain.g);
    println!("h = {}", key.public.value());
    println!(
        "Verification key stored at {} and secret key stored at {}",
        key_path.display(),
        secret_path.display()
    );

    Ok(())
}

fn run_sign(cli: &Cli, file: &Path) -> Result<()> {
    let key = load_verification_key(cli)?;
    let secret_path = cli.dest.join(SECRET_KEY_FILE);
    let private = PrivateKey::from_decimal_lines(&read(&secret_path)?)?;

    let document =
        std::fs::read(file).with_context(|| format!("reading document {}", file.display()))?;
    let digest = hash_document(&document);

    info!(file = ?file, "Signing document");

    let signer = load_signer(key, private)?;
    let signature = signer.sign(&digest, &mut OsRng)?;

    let signature_path = cli.dest.join(SIGNATURE_FILE);
    std::fs::write(&signature_path, signature.to_decimal_lines())?;

    println!("hash = {}", digest);
    println!("hash (hex) = {}", hex::encode(digest.value().to_bytes_be()));
    println!("c1 = {}", signature.c1);
    println!("c2 = {}", signature.c2);
    println!("Signature stored at {}", signature_path.display());

    Ok(())
}

fn run_verify(cli: &Cli, file: &Path, signature: Option<&Path>) -> Result<bool> {
    let key = load_verification_key(cli)?;
    let signature_path = signature
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cli.dest.join(SIGNATURE_FILE));
    let signature = Signature::from_decimal_lines(&read(&signature_path)?)?;

    let document =
        std::fs::read(file).with_context(|| format!("reading document {}", file.display()))?;
    let digest = hash_document(&document);

    info!(file = ?file, signature = ?signature_path, "Verifying document");

    println!("c1 = {}", signature.c1);
    println!("c2 = {}", signature.c2);
    println!("hash = {}", digest);

    let valid = Verifier::from(key).verify(&digest, &signature);
    if valid {
        println!("Valid signature");
    } else {
        println!("Invalid signature");
    }

    Ok(valid)
}

fn show_info(cli: &Cli) -> Result<()> {
    let key = load_verification_key(cli)?;
    let domain = &key.domain;

    println!("Verification Key:");
    println!("  p ({} bits): {}", domain.p.bits(), domain.p);
    println!("  q ({} bits): {}", domain.q.bits(), domain.q);
    println!("  g: {}", domain.g);
    println!("  h: {}", key.public.value());
    println!("  JSON: {}", serde_json::to_string(&key)?);

    Ok(())
}

/// Build a signer, refusing a secret that does not produce the stored `h`
fn load_signer(key: VerificationKey, private: PrivateKey) -> Result<Signer> {
    let signer = Signer::new(key.domain, private)?;
    if signer.public_key()? != key.public {
        bail!("Secret key does not match the stored public value");
    }
    Ok(signer)
}

fn load_verification_key(cli: &Cli) -> Result<VerificationKey> {
    let key_path = cli.dest.join(KEY_FILE);
    let key = VerificationKey::from_decimal_lines(&read(&key_path)?)?;
    key.domain.validate_group()?;
    Ok(key)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dlsig_core::{DomainParameters, PublicKey};

    fn toy_key(h: u32) -> VerificationKey {
        VerificationKey::new(
            DomainParameters::new(23u32.into(), 11u32.into(), 4u32.into()),
            PublicKey::new(h.into()),
        )
    }

    #[test]
    fn test_load_signer_accepts_matching_secret() {
        // 4^3 = 18 (mod 23)
        let signer = load_signer(toy_key(18), PrivateKey::new(3u32.into())).unwrap();
        assert_eq!(signer.public_key().unwrap(), PublicKey::new(18u32.into()));
    }

    #[test]
    fn test_load_signer_rejects_mismatched_secret() {
        let err = load_signer(toy_key(18), PrivateKey::new(5u32.into()))
            .err()
            .expect("mismatched secret is refused");
        assert!(err.to_string().contains("does not match"));
    }
}
