//! Encrypted fields for sealfield models.
//!
//! [`EncryptedField`] wraps any other [`Field`](sealfield_model::Field). The
//! wrapped field keeps deciding what a value means (its coercion, validation
//! and length rules) while the adapter makes sure only ciphertext reaches the
//! database.
//!
//! ```ignore
//! let ring = Arc::new(KeyRing::from_env("APP_FIELD_KEYS")?);
//! let schema = ModelSchema::new("patient")
//!     .with_field("ssn", EncryptedField::wrap(CharField::new(11), ring.clone()));
//! ```

mod codec;
mod encrypted;
mod registry;

pub use codec::{open_value, seal_value};
pub use encrypted::EncryptedField;
pub use registry::register_encrypted_field;

pub use sealfield_crypto::{FieldEncryptor, KeyRing, KeyRingConfig};
