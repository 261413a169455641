//! Pass bundling: assembly, manifest, and signing.
//!
//! [`PassBundler`] is the entry point. It writes the `pass.json`
//! descriptor, the present asset slots, and the localization overrides
//! into a ZIP stream, snapshots the digest manifest over those members,
//! then appends `manifest.json` and the detached CMS `signature` as the
//! final two members.
//!
//! # Examples
//!
//! ```no_run
//! use pkpass::{load_certificate, Pass, PassBundler, PassKind, SigningIdentity};
//!
//! let identity = SigningIdentity::from_pem(
//!     &std::fs::read("pass-cert.pem")?,
//!     &std::fs::read("pass-key.pem")?,
//! )?;
//! let anchor = load_certificate(&std::fs::read("wwdr.pem")?)?;
//!
//! let pass = Pass::new(PassKind::Coupon);
//! PassBundler::new()
//!     .identity(identity)
//!     .anchor(anchor)
//!     .write_to_file(&pass, "coupon.pkpass")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod writer;

pub use writer::BundleWriter;

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use x509_certificate::CapturedX509Certificate;

use crate::crypto::{cms, ManifestDigest, SigningIdentity};
use crate::pass::{descriptor, Pass};
use crate::{Error, Result};

/// ZIP compression level for the output bundle.
///
/// 0 stores members uncompressed; 1-9 use deflate at that level.
#[derive(Debug, Clone, Copy)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    /// No compression (level 0).
    pub const NONE: CompressionLevel = CompressionLevel(0);

    /// Default compression (level 6).
    pub const DEFAULT: CompressionLevel = CompressionLevel(6);

    /// Maximum compression (level 9).
    pub const MAX: CompressionLevel = CompressionLevel(9);

    /// Creates a compression level from 0-9. Values greater than 9 are
    /// clamped to 9.
    #[must_use]
    pub fn new(level: u32) -> Self {
        CompressionLevel(level.min(9))
    }

    /// Returns the compression level value (0-9).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for CompressionLevel {
    fn from(level: u32) -> Self {
        CompressionLevel::new(level)
    }
}

/// Pass bundling tool with a builder-pattern API.
///
/// Configure the signing identity and trust-anchor certificate, then
/// write one or more passes. Each write is an independent, synchronous
/// operation with its own archive accumulator; the bundler itself holds
/// no per-call state.
#[derive(Default)]
pub struct PassBundler {
    identity: Option<SigningIdentity>,
    anchor: Option<CapturedX509Certificate>,
    digest: ManifestDigest,
    compression: CompressionLevel,
}

impl PassBundler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signing identity (pass type certificate plus private key).
    pub fn identity(mut self, identity: SigningIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Sets the trust-anchor certificate bundled into the signature
    /// (Apple WWDR for Wallet passes).
    pub fn anchor(mut self, anchor: CapturedX509Certificate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Sets the manifest/signature digest algorithm. Defaults to SHA-1,
    /// which Apple's verifier requires.
    pub fn manifest_digest(mut self, digest: ManifestDigest) -> Self {
        self.digest = digest;
        self
    }

    /// Sets the ZIP compression level (0-9, default 6).
    pub fn compression_level(mut self, level: impl Into<CompressionLevel>) -> Self {
        self.compression = level.into();
        self
    }

    /// Validates the builder configuration.
    ///
    /// Returns an error if the identity or anchor is not set.
    pub fn validate(&self) -> Result<()> {
        if self.identity.is_none() {
            return Err(Error::MissingCredentials(
                "Signing identity must be set using .identity()".into(),
            ));
        }
        if self.anchor.is_none() {
            return Err(Error::MissingCredentials(
                "Trust-anchor certificate must be set using .anchor()".into(),
            ));
        }
        Ok(())
    }

    /// Bundles `pass` into `stream` and returns the stream after the
    /// archive is finalized.
    ///
    /// Member order is fixed: `pass.json`, present assets, localization
    /// members per localization in record order, `manifest.json`, and
    /// `signature` last. Any failure aborts the call; a partially
    /// written stream is not a usable bundle.
    pub fn write_to_stream<W: Write + Seek>(&self, pass: &Pass, stream: W) -> Result<W> {
        self.validate()?;
        let identity = self
            .identity
            .as_ref()
            .ok_or_else(|| Error::MissingCredentials("No identity configured".into()))?;
        let anchor = self
            .anchor
            .as_ref()
            .ok_or_else(|| Error::MissingCredentials("No anchor configured".into()))?;

        let mut writer = BundleWriter::new(stream, self.compression, self.digest);

        writer.add_entry("pass.json", &descriptor::to_json(pass)?)?;

        for (name, asset) in pass.assets.present() {
            writer.add_entry(name, asset.bytes())?;
        }

        for localization in &pass.localizations {
            let prefix = localization.prefix();
            if !localization.strings.is_empty() {
                writer.add_entry(
                    &format!("{}/pass.strings", prefix),
                    localization.strings_file().as_bytes(),
                )?;
            }
            for (name, asset) in localization.assets.present() {
                writer.add_entry(&format!("{}/{}", prefix, name), asset.bytes())?;
            }
        }

        // Snapshot the manifest over everything assembled so far, then
        // append the two members it must not cover.
        let manifest = writer.manifest_json()?;
        let signature = cms::sign_manifest(&manifest, identity, anchor, self.digest)?;
        writer.add_entry("manifest.json", &manifest)?;
        writer.add_entry("signature", &signature)?;

        writer.finish()
    }

    /// Convenience wrapper bundling to a file at `path`.
    ///
    /// An existing file is truncated first.
    pub fn write_to_file(&self, pass: &Pass, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_to_stream(pass, file)?;
        Ok(())
    }
}
