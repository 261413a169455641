//! Signing identity loading.
//!
//! A [`SigningIdentity`] is the pass type's certificate together with its
//! private key, loaded from PEM files or a PKCS#12 (.p12) container. The
//! trust-anchor certificate (Apple WWDR) is loaded separately with
//! [`load_certificate`]; it carries no private key and is only bundled
//! into the signature's certificate set so a verifier can build the chain.

use x509_certificate::{CapturedX509Certificate, InMemorySigningKeyPair, Sign};

use crate::{Error, Result};

/// Pass signing credentials: certificate plus matching private key.
///
/// # Security
///
/// The private key contained in this struct should be treated as
/// sensitive data. Avoid logging or exposing [`SigningIdentity`]
/// instances.
pub struct SigningIdentity {
    /// X.509 pass type certificate.
    pub certificate: CapturedX509Certificate,
    /// Private key corresponding to the certificate's public key.
    pub key: InMemorySigningKeyPair,
}

impl SigningIdentity {
    /// Loads an identity from PEM-encoded certificate and PKCS#8 private
    /// key data. The key must be unencrypted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Certificate`] if either input fails to parse or
    /// the key does not match the certificate's public key.
    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self> {
        let certificate = CapturedX509Certificate::from_pem(cert_pem)
            .map_err(|e| Error::Certificate(format!("Failed to parse certificate PEM: {}", e)))?;

        let key = InMemorySigningKeyPair::from_pkcs8_pem(key_pem)
            .map_err(|e| Error::Certificate(format!("Failed to parse private key PEM: {}", e)))?;

        Self::validate_key_pair(certificate, key)
    }

    /// Loads an identity from a PKCS#12 (.p12) container.
    ///
    /// This is the format Keychain Access exports pass type certificates
    /// in. The first certificate bag is taken as the signing certificate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Certificate`] if the container is malformed, the
    /// password is wrong, or no certificate/key bag is present.
    pub fn from_p12(p12_data: &[u8], password: &str) -> Result<Self> {
        let pfx = p12::PFX::parse(p12_data)
            .map_err(|e| Error::Certificate(format!("Failed to parse PKCS#12: {:?}", e)))?;

        let keys = pfx.key_bags(password).map_err(|e| {
            Error::Certificate(format!("Failed to extract keys from PKCS#12: {:?}", e))
        })?;

        let certs = pfx.cert_x509_bags(password).map_err(|e| {
            Error::Certificate(format!("Failed to extract certs from PKCS#12: {:?}", e))
        })?;

        let cert_der = certs
            .first()
            .ok_or_else(|| Error::Certificate("No certificate in PKCS#12".into()))?;
        let key_der = keys
            .first()
            .ok_or_else(|| Error::Certificate("No private key in PKCS#12".into()))?;

        let certificate = CapturedX509Certificate::from_der(cert_der.clone())
            .map_err(|e| Error::Certificate(format!("Failed to parse certificate DER: {}", e)))?;

        let key = InMemorySigningKeyPair::from_pkcs8_der(key_der)
            .map_err(|e| Error::Certificate(format!("Failed to parse private key DER: {}", e)))?;

        Self::validate_key_pair(certificate, key)
    }

    fn validate_key_pair(
        certificate: CapturedX509Certificate,
        key: InMemorySigningKeyPair,
    ) -> Result<Self> {
        if certificate.public_key_data() != key.public_key_data() {
            return Err(Error::Certificate(
                "Private key does not match certificate public key".into(),
            ));
        }
        Ok(Self { certificate, key })
    }
}

/// Loads a bare certificate (no private key) from PEM or DER data.
///
/// Used for the trust-anchor certificate bundled into the signature.
pub fn load_certificate(data: &[u8]) -> Result<CapturedX509Certificate> {
    CapturedX509Certificate::from_pem(data)
        .or_else(|_| CapturedX509Certificate::from_der(data.to_vec()))
        .map_err(|e| Error::Certificate(format!("Failed to load certificate: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{CertificateParams, DnType, KeyPair};

    fn self_signed() -> (String, String) {
        let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
        params
            .distinguished_name
            .push(DnType::CommonName, "Pass Signing Test");
        let key_pair = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key_pair).unwrap();
        (cert.pem(), key_pair.serialize_pem())
    }

    #[test]
    fn from_pem_roundtrip() {
        let (cert_pem, key_pem) = self_signed();
        let identity = SigningIdentity::from_pem(cert_pem.as_bytes(), key_pem.as_bytes());
        assert!(identity.is_ok());
    }

    #[test]
    fn from_pem_invalid_cert() {
        let result = SigningIdentity::from_pem(b"not a cert", b"not a key");
        assert!(result.is_err());
    }

    #[test]
    fn from_pem_mismatched_key() {
        let (cert_pem, _) = self_signed();
        let (_, other_key_pem) = self_signed();

        let result = SigningIdentity::from_pem(cert_pem.as_bytes(), other_key_pem.as_bytes());
        assert!(result.is_err());
        let msg = result.err().unwrap().to_string();
        assert!(msg.contains("does not match"), "unexpected error: {}", msg);
    }

    #[test]
    fn from_p12_invalid_data() {
        let result = SigningIdentity::from_p12(b"not valid p12 data", "password");
        assert!(result.is_err());
    }

    #[test]
    fn load_certificate_accepts_pem() {
        let (cert_pem, _) = self_signed();
        assert!(load_certificate(cert_pem.as_bytes()).is_ok());
    }

    #[test]
    fn load_certificate_accepts_der() {
        let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
        params.distinguished_name.push(DnType::CommonName, "DER Test");
        let key_pair = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key_pair).unwrap();

        assert!(load_certificate(cert.der().as_ref()).is_ok());
    }
}
