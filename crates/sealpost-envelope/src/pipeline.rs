//! Writer-stack pipelines.
//!
//! An [`EnvelopePipeline`] owns every stage of a stack (armor, crypto layer,
//! literal or signature layer) and the buffer underneath. The only way to
//! get bytes out is [`EnvelopePipeline::finish`], which finalizes the stack
//! innermost layer first. Dropping an unfinished pipeline drops its buffer,
//! so a half-written envelope never escapes.

use std::io::{self, Write};
use std::mem;
use std::sync::{Arc, Mutex};

use sequoia_openpgp::armor::Kind;
use sequoia_openpgp::crypto::KeyPair;
use sequoia_openpgp::serialize::stream::{
    Armorer, Encryptor, LiteralWriter, Message, Recipient, Signer,
};

use crate::error::{PipelineError, Result};

/// Options applied to every pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvelopeOptions {
    /// Value of a `Comment:` armor header, if any.
    pub armor_comment: Option<String>,
}

impl EnvelopeOptions {
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            armor_comment: Some(comment.into()),
        }
    }
}

/// Sink at the bottom of a stack. The stack holds one handle and the
/// pipeline holds the other, so the bytes can be taken after the stack has
/// been consumed by finalization.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn take(&self) -> Vec<u8> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        mem::take(&mut *buf)
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "envelope buffer poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A fully assembled writer stack. Write plaintext into it, then call
/// [`finish`](Self::finish).
pub struct EnvelopePipeline<'a> {
    stack: Message<'a>,
    sink: SharedBuffer,
    written: u64,
}

impl<'a> EnvelopePipeline<'a> {
    /// Plaintext goes into a literal data packet, which is encrypted for
    /// `recipients` and armored as a `PGP MESSAGE`.
    pub fn encrypt_for<R>(recipients: R, options: &EnvelopeOptions) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: Into<Recipient<'a>>,
    {
        let sink = SharedBuffer::default();
        let stack = armored(Message::new(sink.clone()), Kind::Message, options)?;
        let stack = Encryptor::for_recipients(stack, recipients)
            .build()
            .map_err(PipelineError::codec)?;
        let stack = LiteralWriter::new(stack)
            .build()
            .map_err(PipelineError::codec)?;

        Ok(Self {
            stack,
            sink,
            written: 0,
        })
    }

    /// Plaintext is hashed into a detached signature by `signer`, armored as
    /// a `PGP SIGNATURE`.
    pub fn detached_signature(
        signer: KeyPair,
        options: &EnvelopeOptions,
    ) -> Result<Self> {
        let sink = SharedBuffer::default();
        let stack = armored(Message::new(sink.clone()), Kind::Signature, options)?;
        let stack = Signer::new(stack, signer)
            .map_err(PipelineError::codec)?
            .detached()
            .build()
            .map_err(PipelineError::codec)?;

        Ok(Self {
            stack,
            sink,
            written: 0,
        })
    }

    /// Plaintext bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Finalize every layer, innermost first, and return the armored bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let Self {
            stack,
            sink,
            written,
        } = self;
        stack.finalize().map_err(PipelineError::codec)?;

        let bytes = sink.take();
        tracing::debug!(plaintext_len = written, envelope_len = bytes.len(), "finalized pipeline");
        Ok(bytes)
    }
}

impl Write for EnvelopePipeline<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.stack.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stack.flush()
    }
}

fn armored<'a>(
    message: Message<'a>,
    kind: Kind,
    options: &EnvelopeOptions,
) -> Result<Message<'a>> {
    let mut armorer = Armorer::new(message).kind(kind);
    if let Some(comment) = &options.armor_comment {
        armorer = armorer.add_header("Comment", comment);
    }
    armorer.build().map_err(PipelineError::codec)
}
