//! CMS signature generation over the manifest.
//!
//! Builds the PKCS#7 `SignedData` structure (RFC 5652) written as the
//! bundle's `signature` member. The structure is assembled directly with
//! the `der` helpers so the declared digest algorithm can follow the
//! manifest digest; the digest binds to the content through the
//! authenticated messageDigest attribute, while the signature itself is
//! computed over the attribute set with the key's native algorithm.

use x509_certificate::{CapturedX509Certificate, KeyAlgorithm, Sign, Signer};

use super::{der, ManifestDigest, SigningIdentity};
use crate::{Error, Result};

// Content and attribute type OIDs from RFC 5652
const OID_ID_DATA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x01];
const OID_ID_SIGNED_DATA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x02];
const OID_CONTENT_TYPE: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x03];
const OID_MESSAGE_DIGEST: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x04];

// Digest algorithm OIDs
const OID_SHA1: &[u8] = &[0x2b, 0x0e, 0x03, 0x02, 0x1a];
const OID_SHA256: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];

// Signature algorithm OIDs
const OID_SHA256_WITH_RSA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b];
const OID_ECDSA_WITH_SHA256: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02];
const OID_ED25519: &[u8] = &[0x2b, 0x65, 0x70];

/// Signs the manifest bytes, returning the DER-encoded `SignedData`.
///
/// The structure carries the manifest bytes as its own content (a
/// verifier does not need the archive to check it), exactly one signer,
/// and a certificate set of exactly two entries: the signing certificate
/// followed by the trust anchor. No chain validation happens here; the
/// anchor is bundled so the verifier can build the chain itself.
///
/// # Errors
///
/// Returns [`Error::Signing`] if signature generation fails. Bundling
/// must abort on that: an archive without a valid `signature` member is
/// never complete.
pub fn sign_manifest(
    manifest: &[u8],
    identity: &SigningIdentity,
    anchor: &CapturedX509Certificate,
    digest: ManifestDigest,
) -> Result<Vec<u8>> {
    let signer_cert = identity
        .certificate
        .encode_der()
        .map_err(|e| Error::Certificate(format!("Failed to encode signing certificate: {}", e)))?;
    let anchor_cert = anchor
        .encode_der()
        .map_err(|e| Error::Certificate(format!("Failed to encode anchor certificate: {}", e)))?;

    let sid = der::issuer_and_serial(&signer_cert)?;
    let digest_algorithm = der::algorithm_identifier(digest_oid(digest));

    let attributes = signed_attributes(&digest.digest(manifest));
    // The signature covers the attributes under their SET OF tag, not
    // the implicit [0] tag they carry inside the SignerInfo.
    let signature = identity
        .key
        .try_sign(&der::tlv(der::TAG_SET, &attributes))
        .map_err(|e| Error::Signing(format!("Failed to sign manifest attributes: {}", e)))?;

    let signer_info = der::sequence(&[
        &der::integer(1),
        &der::sequence(&[&sid.issuer, &sid.serial]),
        &digest_algorithm,
        &der::tlv(der::TAG_CONTEXT_0, &attributes),
        &signature_algorithm(&identity.key)?,
        &der::octet_string(signature.as_ref()),
    ]);

    let encap_content_info = der::sequence(&[
        &der::oid(OID_ID_DATA),
        &der::explicit_0(&der::octet_string(manifest)),
    ]);

    let signed_data = der::sequence(&[
        &der::integer(1),
        &der::tlv(der::TAG_SET, &digest_algorithm),
        &encap_content_info,
        &der::tlv(der::TAG_CONTEXT_0, &[signer_cert, anchor_cert].concat()),
        &der::tlv(der::TAG_SET, &signer_info),
    ]);

    Ok(der::sequence(&[
        &der::oid(OID_ID_SIGNED_DATA),
        &der::explicit_0(&signed_data),
    ]))
}

fn digest_oid(digest: ManifestDigest) -> &'static [u8] {
    match digest {
        ManifestDigest::Sha1 => OID_SHA1,
        ManifestDigest::Sha256 => OID_SHA256,
    }
}

/// The authenticated attribute set: contentType (id-data) and
/// messageDigest, concatenated in DER SET OF order.
fn signed_attributes(content_digest: &[u8]) -> Vec<u8> {
    let content_type = der::sequence(&[
        &der::oid(OID_CONTENT_TYPE),
        &der::tlv(der::TAG_SET, &der::oid(OID_ID_DATA)),
    ]);
    let message_digest = der::sequence(&[
        &der::oid(OID_MESSAGE_DIGEST),
        &der::tlv(der::TAG_SET, &der::octet_string(content_digest)),
    ]);

    // DER orders SET OF elements by their encoded bytes
    let mut attributes = [content_type, message_digest];
    attributes.sort();
    attributes.concat()
}

fn signature_algorithm(key: &dyn Sign) -> Result<Vec<u8>> {
    match key.key_algorithm() {
        Some(KeyAlgorithm::Rsa) => Ok(der::algorithm_identifier(OID_SHA256_WITH_RSA)),
        Some(KeyAlgorithm::Ecdsa(_)) => Ok(der::algorithm_identifier_bare(OID_ECDSA_WITH_SHA256)),
        Some(KeyAlgorithm::Ed25519) => Ok(der::algorithm_identifier_bare(OID_ED25519)),
        None => Err(Error::Signing(
            "Signing key algorithm is not recognized".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptographic_message_syntax::SignedData;
    use rcgen::{CertificateParams, DnType, KeyPair};
    use x509_certificate::DigestAlgorithm;

    fn test_identity(name: &str) -> (SigningIdentity, CapturedX509Certificate) {
        let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
        params.distinguished_name.push(DnType::CommonName, name);
        let key_pair = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key_pair).unwrap();

        let identity = SigningIdentity::from_pem(
            cert.pem().as_bytes(),
            key_pair.serialize_pem().as_bytes(),
        )
        .unwrap();
        let captured = CapturedX509Certificate::from_pem(cert.pem().as_bytes()).unwrap();
        (identity, captured)
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn signature_embeds_content_and_both_certificates() {
        let (identity, _) = test_identity("Signer");
        let (_, anchor) = test_identity("Anchor");

        let manifest = br#"{"pass.json":"da39a3ee5e6b4b0d3255bfef95601890afd80709"}"#;
        let der = sign_manifest(manifest, &identity, &anchor, ManifestDigest::Sha1).unwrap();

        let signed = SignedData::parse_ber(&der).unwrap();
        assert_eq!(signed.signed_content(), Some(manifest.as_slice()));
        assert_eq!(signed.certificates().count(), 2);
        assert_eq!(signed.signers().count(), 1);
    }

    #[test]
    fn signature_verifies_with_signed_content() {
        let (identity, _) = test_identity("Signer");
        let (_, anchor) = test_identity("Anchor");

        let manifest = b"{}";
        let der = sign_manifest(manifest, &identity, &anchor, ManifestDigest::Sha1).unwrap();

        let signed = SignedData::parse_ber(&der).unwrap();
        for signer in signed.signers() {
            signer.verify_signature_with_signed_data(&signed).unwrap();
            signer.verify_message_digest_with_signed_data(&signed).unwrap();
        }
    }

    #[test]
    fn declared_digest_follows_manifest_digest() {
        let (identity, _) = test_identity("Signer");
        let (_, anchor) = test_identity("Anchor");
        let manifest = br#"{"pass.json":"00"}"#;

        let der = sign_manifest(manifest, &identity, &anchor, ManifestDigest::Sha1).unwrap();
        let signed = SignedData::parse_ber(&der).unwrap();
        let signer = signed.signers().next().unwrap();
        assert_eq!(signer.digest_algorithm(), DigestAlgorithm::Sha1);
        // The messageDigest attribute carries the SHA-1 of the content
        assert!(contains(&der, &ManifestDigest::Sha1.digest(manifest)));
        signer.verify_message_digest_with_signed_data(&signed).unwrap();

        let der = sign_manifest(manifest, &identity, &anchor, ManifestDigest::Sha256).unwrap();
        let signed = SignedData::parse_ber(&der).unwrap();
        let signer = signed.signers().next().unwrap();
        assert_eq!(signer.digest_algorithm(), DigestAlgorithm::Sha256);
        assert!(contains(&der, &ManifestDigest::Sha256.digest(manifest)));
        signer.verify_message_digest_with_signed_data(&signed).unwrap();
    }

    #[test]
    fn sha256_digest_also_signs_and_verifies() {
        let (identity, _) = test_identity("Signer");
        let (_, anchor) = test_identity("Anchor");

        let der = sign_manifest(b"{}", &identity, &anchor, ManifestDigest::Sha256).unwrap();
        let signed = SignedData::parse_ber(&der).unwrap();
        for signer in signed.signers() {
            signer.verify_signature_with_signed_data(&signed).unwrap();
        }
    }
}
