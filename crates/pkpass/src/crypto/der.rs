//! Minimal DER encoder plus certificate field extraction.
//!
//! CMS assembly in [`cms`](super::cms) only needs a handful of ASN.1
//! shapes (SEQUENCE, SET, OID, OCTET STRING, INTEGER, NULL, context
//! tags), so they are encoded directly rather than through an ASN.1
//! framework. The one piece of decoding required is pulling the issuer
//! and serial number out of a certificate to build the
//! `IssuerAndSerialNumber` signer identifier.

use crate::{Error, Result};

/// DER tag for INTEGER
pub(crate) const TAG_INTEGER: u8 = 0x02;

/// DER tag for OCTET STRING
pub(crate) const TAG_OCTET_STRING: u8 = 0x04;

/// DER tag for NULL
pub(crate) const TAG_NULL: u8 = 0x05;

/// DER tag for OBJECT IDENTIFIER
pub(crate) const TAG_OID: u8 = 0x06;

/// DER tag for SEQUENCE
pub(crate) const TAG_SEQUENCE: u8 = 0x30;

/// DER tag for SET
pub(crate) const TAG_SET: u8 = 0x31;

/// DER tag for a constructed context-specific [0]
pub(crate) const TAG_CONTEXT_0: u8 = 0xa0;

/// Encode a length value in DER format.
///
/// For lengths < 128, uses short form (1 byte).
/// For lengths >= 128, uses long form (1 + n bytes).
fn encode_length(output: &mut Vec<u8>, length: usize) {
    if length < 128 {
        output.push(length as u8);
    } else {
        let bytes_needed = (64 - (length as u64).leading_zeros() as usize).div_ceil(8);

        output.push(0x80 | bytes_needed as u8);

        for i in (0..bytes_needed).rev() {
            output.push(((length >> (i * 8)) & 0xFF) as u8);
        }
    }
}

/// Encode a single tag-length-value triple.
pub(crate) fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(content.len() + 4);
    output.push(tag);
    encode_length(&mut output, content.len());
    output.extend_from_slice(content);
    output
}

/// Encode a SEQUENCE from already-encoded parts.
pub(crate) fn sequence(parts: &[&[u8]]) -> Vec<u8> {
    tlv(TAG_SEQUENCE, &parts.concat())
}

pub(crate) fn oid(body: &[u8]) -> Vec<u8> {
    tlv(TAG_OID, body)
}

pub(crate) fn octet_string(content: &[u8]) -> Vec<u8> {
    tlv(TAG_OCTET_STRING, content)
}

/// Encode a small non-negative INTEGER (structure version numbers).
pub(crate) fn integer(value: u8) -> Vec<u8> {
    tlv(TAG_INTEGER, &[value])
}

/// Encode an explicitly tagged [0] wrapper around an encoded value.
pub(crate) fn explicit_0(content: &[u8]) -> Vec<u8> {
    tlv(TAG_CONTEXT_0, content)
}

/// AlgorithmIdentifier with a NULL parameter (digest and RSA OIDs).
pub(crate) fn algorithm_identifier(oid_body: &[u8]) -> Vec<u8> {
    sequence(&[&oid(oid_body), &tlv(TAG_NULL, &[])])
}

/// AlgorithmIdentifier with absent parameters (ECDSA and Ed25519 OIDs).
pub(crate) fn algorithm_identifier_bare(oid_body: &[u8]) -> Vec<u8> {
    sequence(&[&oid(oid_body)])
}

/// Signer identification fields lifted out of a certificate.
///
/// Both fields are complete TLVs copied verbatim from the certificate
/// so the `IssuerAndSerialNumber` in the signature matches the
/// certificate byte for byte.
pub(crate) struct IssuerAndSerial {
    /// The issuer Name SEQUENCE.
    pub issuer: Vec<u8>,
    /// The serialNumber INTEGER.
    pub serial: Vec<u8>,
}

/// Read a DER header at `pos`, returning (tag, content length, content start).
fn parse_header(data: &[u8], pos: usize) -> Result<(u8, usize, usize)> {
    let err = || Error::Certificate("Malformed certificate DER".to_string());

    let tag = *data.get(pos).ok_or_else(err)?;
    let first = *data.get(pos + 1).ok_or_else(err)?;

    let (length, content_start) = if first < 0x80 {
        (first as usize, pos + 2)
    } else {
        let count = (first & 0x7f) as usize;
        if count == 0 || count > 8 {
            return Err(err());
        }
        let mut length = 0usize;
        for i in 0..count {
            length = (length << 8) | *data.get(pos + 2 + i).ok_or_else(err)? as usize;
        }
        (length, pos + 2 + count)
    };

    if content_start + length > data.len() {
        return Err(err());
    }
    Ok((tag, length, content_start))
}

/// Extract the issuer and serial number from a DER-encoded certificate.
///
/// Walks `Certificate -> tbsCertificate`, skips the optional `[0]`
/// version, and copies the serialNumber and issuer TLVs.
pub(crate) fn issuer_and_serial(cert: &[u8]) -> Result<IssuerAndSerial> {
    let err = |what: &str| Error::Certificate(format!("Malformed certificate: bad {}", what));

    let (tag, _, tbs_pos) = parse_header(cert, 0)?;
    if tag != TAG_SEQUENCE {
        return Err(err("Certificate"));
    }
    let (tag, _, mut pos) = parse_header(cert, tbs_pos)?;
    if tag != TAG_SEQUENCE {
        return Err(err("tbsCertificate"));
    }

    // [0] EXPLICIT version, present in v2 and v3 certificates
    let (tag, length, content) = parse_header(cert, pos)?;
    if tag == TAG_CONTEXT_0 {
        pos = content + length;
    }

    let (tag, length, content) = parse_header(cert, pos)?;
    if tag != TAG_INTEGER {
        return Err(err("serialNumber"));
    }
    let serial = cert[pos..content + length].to_vec();
    pos = content + length;

    // signature AlgorithmIdentifier
    let (tag, length, content) = parse_header(cert, pos)?;
    if tag != TAG_SEQUENCE {
        return Err(err("signature"));
    }
    pos = content + length;

    let (tag, length, content) = parse_header(cert, pos)?;
    if tag != TAG_SEQUENCE {
        return Err(err("issuer"));
    }
    let issuer = cert[pos..content + length].to_vec();

    Ok(IssuerAndSerial { issuer, serial })
}
