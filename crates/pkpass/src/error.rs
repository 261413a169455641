//! Error types for pass bundling operations.
//!
//! This module defines the [`enum@Error`] enum covering all failure cases
//! in pass bundling, including I/O, serialization, certificate handling,
//! and cryptographic signing errors.
//!
//! # See Also
//!
//! - [`crate::Result`] - Convenience type alias using this error

use thiserror::Error;

/// Error type for pass bundling operations.
///
/// All public functions in this crate return [`crate::Result<T>`], which uses this error type.
/// Match on variants to handle specific failure cases.
///
/// Bundling has no partial-success mode: any error aborts the whole call and
/// the output stream must be considered unusable.
///
/// # Examples
///
/// ```no_run
/// use pkpass::{Error, Pass, PassBundler};
///
/// let pass = Pass::default();
/// let result = PassBundler::new().write_to_file(&pass, "out.pkpass");
/// match result {
///     Ok(()) => println!("Bundled successfully"),
///     Err(Error::MissingCredentials(msg)) => eprintln!("Need credentials: {msg}"),
///     Err(Error::Io(e)) => eprintln!("IO error: {e}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Occurs when reading asset files or writing the output archive.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    ///
    /// Raised while producing `pass.json` or `manifest.json`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive operation failed.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid or malformed certificate or private key.
    ///
    /// The provided certificate could not be parsed, the private key could
    /// not be extracted, or the two do not belong together. See
    /// [`crate::SigningIdentity`] for valid input formats.
    #[error("Invalid certificate: {0}")]
    Certificate(String),

    /// CMS signature generation failed.
    ///
    /// A bundle without a `signature` member is never usable, so signing
    /// failures abort the whole operation.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The same archive member path was produced twice.
    ///
    /// Member paths double as manifest keys, so a collision (two
    /// localizations with the same culture, say) would leave one member
    /// unaccounted for. Bundling aborts instead.
    #[error("Duplicate archive member: {0}")]
    DuplicateMember(String),

    /// Required signing credentials not configured.
    ///
    /// Bundling was attempted without first calling
    /// [`crate::PassBundler::identity`] or [`crate::PassBundler::anchor`].
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}
