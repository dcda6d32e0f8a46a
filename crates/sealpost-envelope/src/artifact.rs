//! Finished, immutable armored artifacts.

use std::fmt;
use std::io::{self, Cursor, Write};
use std::marker::PhantomData;

use sealpost_core::ArmorKind;

use crate::error::PipelineError;

/// Marker for the block type an [`Armored`] artifact carries.
pub trait BlockKind {
    const KIND: ArmorKind;
}

/// `PGP MESSAGE` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageBlock {}

/// `PGP SIGNATURE` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureBlock {}

impl BlockKind for MessageBlock {
    const KIND: ArmorKind = ArmorKind::Message;
}

impl BlockKind for SignatureBlock {
    const KIND: ArmorKind = ArmorKind::Signature;
}

/// An encrypted message, `-----BEGIN PGP MESSAGE-----`.
pub type EncryptedEnvelope = Armored<MessageBlock>;

/// A detached signature, `-----BEGIN PGP SIGNATURE-----`.
pub type SignatureEnvelope = Armored<SignatureBlock>;

/// ASCII-armored output of a finished pipeline.
pub struct Armored<K> {
    text: String,
    kind: PhantomData<K>,
}

impl<K: BlockKind> Armored<K> {
    pub(crate) fn from_pipeline(bytes: Vec<u8>) -> Result<Self, PipelineError> {
        let text = String::from_utf8(bytes)
            .map_err(|_| PipelineError::Codec("armor output is not ASCII".into()))?;
        Ok(Self {
            text,
            kind: PhantomData,
        })
    }

    pub fn kind(&self) -> ArmorKind {
        K::KIND
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// A reader draining the armored bytes.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.as_bytes())
    }

    /// Drain the armored bytes into `out`, returning the count written.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<u64> {
        out.write_all(self.as_bytes())?;
        Ok(self.text.len() as u64)
    }
}

impl<K> Clone for Armored<K> {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for Armored<K> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl<K> Eq for Armored<K> {}

impl<K: BlockKind> fmt::Debug for Armored<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Armored")
            .field("kind", &K::KIND)
            .field("len", &self.text.len())
            .finish()
    }
}

impl<K> fmt::Display for Armored<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl<K> AsRef<str> for Armored<K> {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;

    #[test]
    fn test_write_to_and_reader_drain_same_bytes() {
        let artifact =
            EncryptedEnvelope::from_pipeline(b"-----BEGIN PGP MESSAGE-----\n".to_vec()).unwrap();

        let mut written = Vec::new();
        assert_eq!(artifact.write_to(&mut written).unwrap(), artifact.len() as u64);

        let mut read = Vec::new();
        artifact.reader().read_to_end(&mut read).unwrap();
        assert_eq!(written, read);
        assert_eq!(artifact.kind(), ArmorKind::Message);
    }

    #[test]
    fn test_non_utf8_output_is_rejected() {
        assert!(SignatureEnvelope::from_pipeline(vec![0xff, 0xfe]).is_err());
    }
}
