pub mod bundle;
pub mod crypto;
pub mod error;
pub mod pass;

pub use bundle::{CompressionLevel, PassBundler};
pub use crypto::{load_certificate, ManifestDigest, SigningIdentity};
pub use error::Error;
pub use pass::{
    Asset, AssetSet, Barcode, BarcodeFormat, Field, FieldType, Fields, Localization, Location,
    Pass, PassKind,
};

pub type Result<T> = std::result::Result<T, Error>;
