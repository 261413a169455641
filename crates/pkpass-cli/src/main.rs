//! Command-line interface for the pkpass bundler.
//!
//! Reads a pass definition file (JSON describing the pass plus paths to
//! its image assets), signs it with a pass type certificate and a
//! trust-anchor certificate, and writes a `.pkpass` bundle.

mod definition;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use pkpass::{PassBundler, SigningIdentity};

use definition::Definition;

#[derive(Parser)]
#[command(name = "pkpass")]
#[command(about = "Apple Wallet pass bundling tool")]
struct Cli {
    /// Pass definition file (JSON)
    definition: PathBuf,

    /// Output .pkpass file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pass certificate file (PEM format)
    #[arg(short = 'c', long)]
    certificate: Option<PathBuf>,

    /// Private key file (PEM format)
    #[arg(short = 'k', long)]
    private_key: Option<PathBuf>,

    /// PKCS#12 file (.p12)
    #[arg(short = 'p', long)]
    pkcs12: Option<PathBuf>,

    /// Password for the PKCS#12 container
    #[arg(long)]
    password: Option<String>,

    /// Trust-anchor certificate (PEM or DER), e.g. Apple WWDR
    #[arg(short = 'a', long)]
    anchor: PathBuf,

    /// ZIP compression level (0-9, default: 6)
    #[arg(short = 'z', long, default_value = "6")]
    zip_level: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let identity = load_identity(&cli)?;
    let anchor = pkpass::load_certificate(&fs::read(&cli.anchor)?)?;

    let definition: Definition = serde_json::from_slice(&fs::read(&cli.definition)?)?;
    let base_dir = cli
        .definition
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let pass = definition.into_pass(&base_dir)?;

    let output = cli.output.unwrap_or_else(|| {
        let mut out = cli.definition.clone();
        out.set_extension("pkpass");
        out
    });

    PassBundler::new()
        .identity(identity)
        .anchor(anchor)
        .compression_level(cli.zip_level)
        .write_to_file(&pass, &output)?;

    println!("Bundled: {}", output.display());
    Ok(())
}

fn load_identity(cli: &Cli) -> Result<SigningIdentity, Box<dyn std::error::Error>> {
    if let Some(ref p12_path) = cli.pkcs12 {
        let p12_data = fs::read(p12_path)?;
        let password = cli.password.as_deref().unwrap_or("");
        return Ok(SigningIdentity::from_p12(&p12_data, password)?);
    }

    if let (Some(ref cert_path), Some(ref key_path)) = (&cli.certificate, &cli.private_key) {
        let cert_data = fs::read(cert_path)?;
        let key_data = fs::read(key_path)?;
        return Ok(SigningIdentity::from_pem(&cert_data, &key_data)?);
    }

    Err("Provide either --pkcs12 or both --certificate and --private-key".into())
}
