//! Composer-facing sealed message bodies.
//!
//! A mail composer that builds PGP/MIME messages (RFC 3156) asks each part
//! to write itself. [`SealedBody`] is that part for the encrypted payload:
//! it holds the plaintext and recipients and only encrypts when drained.

use std::fmt;
use std::io::Write;

use sealpost_core::Identity;
use sealpost_keys::KeyProvider;

use crate::error::Result;
use crate::sealer::Sealer;

/// `Content-Type` of the enclosing multipart.
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/encrypted";

/// `protocol` parameter of the multipart and type of the control part.
pub const CONTROL_CONTENT_TYPE: &str = "application/pgp-encrypted";

/// Body of the control part.
pub const CONTROL_BODY: &str = "Version: 1";

/// Type of the part carrying the armored envelope.
pub const PAYLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// `Content-Type` header value of the enclosing multipart for `boundary`.
pub fn multipart_content_type(boundary: &str) -> String {
    format!(
        "{MULTIPART_CONTENT_TYPE}; protocol=\"{CONTROL_CONTENT_TYPE}\"; boundary=\"{boundary}\""
    )
}

/// A plaintext body waiting to be sealed for its recipients.
pub struct SealedBody<'s, P: KeyProvider> {
    sealer: &'s Sealer<P>,
    body: Vec<u8>,
    recipients: Vec<Identity>,
}

impl<'s, P: KeyProvider> SealedBody<'s, P> {
    pub(crate) fn new(sealer: &'s Sealer<P>, body: Vec<u8>, recipients: Vec<Identity>) -> Self {
        Self {
            sealer,
            body,
            recipients,
        }
    }

    pub fn recipients(&self) -> &[Identity] {
        &self.recipients
    }

    /// Encrypt the body and write the armored envelope into `out`.
    ///
    /// Returns the number of bytes written. Nothing is written if
    /// encryption fails.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<u64> {
        let envelope = self.sealer.encrypt(self.body.as_slice(), &self.recipients)?;
        let written = envelope.write_to(out)?;

        tracing::debug!(
            recipients = self.recipients.len(),
            written,
            "wrote sealed body"
        );
        Ok(written)
    }
}

impl<P: KeyProvider> fmt::Debug for SealedBody<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedBody")
            .field("body_len", &self.body.len())
            .field("recipients", &self.recipients)
            .finish()
    }
}
