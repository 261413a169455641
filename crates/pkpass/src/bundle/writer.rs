//! Archive accumulator.
//!
//! [`BundleWriter`] owns the ZIP stream for the duration of one bundling
//! call. Every member's digest is recorded at write time, so the
//! manifest snapshot taken after assembly covers exactly the members
//! written before it. One writer per call; the accumulator is never
//! shared between bundling operations.

use std::io::{Seek, Write};

use serde_json::{Map, Value};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::CompressionLevel;
use crate::crypto::ManifestDigest;
use crate::{Error, Result};

pub struct BundleWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
    digest: ManifestDigest,
    /// `(path, hex digest)` per member, in write order.
    entries: Vec<(String, String)>,
}

impl<W: Write + Seek> BundleWriter<W> {
    pub fn new(stream: W, compression: CompressionLevel, digest: ManifestDigest) -> Self {
        let options = if compression.level() == 0 {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        } else {
            SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(compression.level() as i64))
        };

        BundleWriter {
            zip: ZipWriter::new(stream),
            options,
            digest,
            entries: Vec::new(),
        }
    }

    /// Writes one archive member and records its digest.
    ///
    /// Member paths must be unique: they are also the manifest keys, and
    /// a repeated key would silently drop one digest. Repeats are
    /// rejected with [`Error::DuplicateMember`].
    pub fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        if self.entries.iter().any(|(path, _)| path == name) {
            return Err(Error::DuplicateMember(name.to_string()));
        }
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(bytes)?;
        self.entries
            .push((name.to_string(), self.digest.hex_digest(bytes)));
        Ok(())
    }

    /// Serializes the manifest over the members written so far, in
    /// write order.
    ///
    /// Call this only after assembly is complete and before the
    /// `manifest.json` and `signature` members are added; a manifest
    /// snapshotted mid-assembly would not cover the final archive.
    pub fn manifest_json(&self) -> Result<Vec<u8>> {
        let mut manifest = Map::new();
        for (path, digest) in &self.entries {
            manifest.insert(path.clone(), Value::String(digest.clone()));
        }
        Ok(serde_json::to_vec(&Value::Object(manifest))?)
    }

    /// Finalizes the archive, flushing the central directory, and
    /// returns the underlying stream.
    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zip::ZipArchive;

    fn writer() -> BundleWriter<Cursor<Vec<u8>>> {
        BundleWriter::new(
            Cursor::new(Vec::new()),
            CompressionLevel::DEFAULT,
            ManifestDigest::Sha1,
        )
    }

    #[test]
    fn entries_are_digested_at_write_time() {
        let mut w = writer();
        w.add_entry("pass.json", b"{}").unwrap();
        w.add_entry("icon.png", b"PNG").unwrap();

        let manifest: serde_json::Value = serde_json::from_slice(&w.manifest_json().unwrap()).unwrap();
        let obj = manifest.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(
            obj["pass.json"],
            ManifestDigest::Sha1.hex_digest(b"{}")
        );
        assert_eq!(obj["icon.png"], ManifestDigest::Sha1.hex_digest(b"PNG"));
    }

    #[test]
    fn manifest_keys_follow_write_order() {
        let mut w = writer();
        w.add_entry("zz.png", b"z").unwrap();
        w.add_entry("aa.png", b"a").unwrap();

        let manifest: serde_json::Value = serde_json::from_slice(&w.manifest_json().unwrap()).unwrap();
        let keys: Vec<_> = manifest.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zz.png", "aa.png"]);
    }

    #[test]
    fn repeated_member_path_is_rejected() {
        let mut w = writer();
        w.add_entry("fr.lproj/pass.strings", b"\"a\" = \"b\";").unwrap();

        let err = w
            .add_entry("fr.lproj/pass.strings", b"\"a\" = \"c\";")
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateMember(path) if path == "fr.lproj/pass.strings"));

        // The first write is still intact
        let manifest: serde_json::Value = serde_json::from_slice(&w.manifest_json().unwrap()).unwrap();
        assert_eq!(manifest.as_object().unwrap().len(), 1);
    }

    #[test]
    fn finished_archive_contains_written_bytes() {
        let mut w = writer();
        w.add_entry("strip.png", b"STRIP_BYTES").unwrap();
        let cursor = w.finish().unwrap();

        let mut archive = ZipArchive::new(cursor).unwrap();
        let mut member = archive.by_name("strip.png").unwrap();
        let mut content = Vec::new();
        std::io::Read::read_to_end(&mut member, &mut content).unwrap();
        assert_eq!(content, b"STRIP_BYTES");
    }

    #[test]
    fn stored_compression_round_trips() {
        let mut w = BundleWriter::new(
            Cursor::new(Vec::new()),
            CompressionLevel::NONE,
            ManifestDigest::Sha1,
        );
        w.add_entry("pass.json", b"{\"a\":1}").unwrap();
        let cursor = w.finish().unwrap();

        let mut archive = ZipArchive::new(cursor).unwrap();
        assert_eq!(archive.len(), 1);
        let member = archive.by_index(0).unwrap();
        assert_eq!(member.compression(), CompressionMethod::Stored);
    }
}
