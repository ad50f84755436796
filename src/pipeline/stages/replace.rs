// Literal substring replacement stage

use bytes::Bytes;

use crate::error::Result;
use crate::pipeline::core::ChunkStage;

/// Replaces every non-overlapping occurrence of a literal needle, scanning
/// left to right.
///
/// An occurrence split across chunks is found: after each chunk the stage
/// keeps back the longest suffix that could still grow into a match and
/// prepends it to the next chunk.
pub struct ReplaceStage {
    needle: Vec<u8>,
    value: Bytes,
    tail: Vec<u8>,
}

impl ReplaceStage {
    pub fn new(needle: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        Self {
            needle: needle.as_ref().to_vec(),
            value: Bytes::copy_from_slice(value.as_ref()),
            tail: Vec::new(),
        }
    }
}

impl ChunkStage for ReplaceStage {
    fn name(&self) -> String {
        format!("Replace({})", String::from_utf8_lossy(&self.needle))
    }

    fn transform(&mut self, chunk: Bytes) -> Result<Bytes> {
        if self.needle.is_empty() {
            return Ok(chunk);
        }

        let mut buf = std::mem::take(&mut self.tail);
        buf.extend_from_slice(&chunk);

        let mut out = Vec::with_capacity(buf.len());
        let mut pos = 0;
        while let Some(idx) = find(&buf[pos..], &self.needle) {
            out.extend_from_slice(&buf[pos..pos + idx]);
            out.extend_from_slice(&self.value);
            pos += idx + self.needle.len();
        }

        let rest = &buf[pos..];
        let keep = partial_match_len(rest, &self.needle);
        out.extend_from_slice(&rest[..rest.len() - keep]);
        self.tail = rest[rest.len() - keep..].to_vec();

        Ok(Bytes::from(out))
    }

    fn finish(&mut self) -> Result<Bytes> {
        Ok(Bytes::from(std::mem::take(&mut self.tail)))
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Length of the longest suffix of `buf` that is a proper prefix of `needle`
fn partial_match_len(buf: &[u8], needle: &[u8]) -> usize {
    let max = buf.len().min(needle.len().saturating_sub(1));
    (1..=max)
        .rev()
        .find(|&k| buf.ends_with(&needle[..k]))
        .unwrap_or(0)
}
