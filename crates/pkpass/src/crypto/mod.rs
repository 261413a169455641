//! Certificates, digests, and CMS signature generation.

pub mod cms;
mod der;
mod identity;

pub use identity::{load_certificate, SigningIdentity};

use sha1::Digest;

/// Digest algorithm used for the manifest and the CMS signature.
///
/// Apple's pass verifier mandates SHA-1 manifests, so that is the
/// default; [`Sha256`](ManifestDigest::Sha256) is available for
/// consumers with a different verifier. The CMS digest algorithm always
/// follows the manifest choice so the two stay in the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestDigest {
    #[default]
    Sha1,
    Sha256,
}

impl ManifestDigest {
    /// Digests `data`, rendered as lowercase hex with no separators.
    pub fn hex_digest(&self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }

    /// Raw digest of `data`.
    pub(crate) fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            ManifestDigest::Sha1 => sha1::Sha1::digest(data).to_vec(),
            ManifestDigest::Sha256 => sha2::Sha256::digest(data).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_digest_is_lowercase_hex() {
        // Well-known SHA-1 of the empty input
        assert_eq!(
            ManifestDigest::Sha1.hex_digest(b""),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn sha256_digest_is_lowercase_hex() {
        assert_eq!(
            ManifestDigest::Sha256.hex_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn default_is_sha1() {
        assert_eq!(ManifestDigest::default(), ManifestDigest::Sha1);
    }
}
