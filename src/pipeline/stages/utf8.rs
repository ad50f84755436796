// UTF-8 decoding stage

use bytes::Bytes;

use crate::error::{ReplacerError, Result};
use crate::pipeline::core::ChunkStage;

/// Validates the stream as UTF-8 and only emits whole characters.
///
/// A multi-byte sequence cut by a chunk boundary is held back until the rest
/// of it arrives, so stages downstream never see half a character.
#[derive(Default)]
pub struct Utf8Stage {
    pending: Vec<u8>,
    offset: usize,
}

impl Utf8Stage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChunkStage for Utf8Stage {
    fn name(&self) -> String {
        "Utf8Decode".to_string()
    }

    fn transform(&mut self, chunk: Bytes) -> Result<Bytes> {
        let buf = if self.pending.is_empty() {
            chunk
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(&chunk);
            Bytes::from(joined)
        };

        let valid = match std::str::from_utf8(&buf) {
            Ok(_) => buf.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(ReplacerError::encoding(
                    self.offset + e.valid_up_to(),
                    "invalid byte sequence",
                ));
            }
        };

        self.pending = buf[valid..].to_vec();
        self.offset += valid;
        Ok(buf.slice(..valid))
    }

    fn finish(&mut self) -> Result<Bytes> {
        if self.pending.is_empty() {
            Ok(Bytes::new())
        } else {
            Err(ReplacerError::encoding(
                self.offset,
                "truncated character at end of stream",
            ))
        }
    }
}
