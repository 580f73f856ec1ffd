//! Incremental decoder for one streamed assistant response.

use super::extractor::extract_fragments;
use crate::chat::entities::Message;
use chrono::{DateTime, Utc};

/// Transient per-request decoding state.
///
/// Lives for one assistant request and is dropped when the response ends,
/// fails, or is cancelled.
#[derive(Debug, Default)]
pub struct StreamAssembly {
    /// Bytes of a UTF-8 sequence split across chunks
    pending_bytes: Vec<u8>,
    /// Text not yet consumed by a complete fragment
    carry_buffer: String,
    accumulated_text: String,
    finalized: bool,
}

impl StreamAssembly {
    pub fn carry_buffer(&self) -> &str {
        &self.carry_buffer
    }

    pub fn accumulated_text(&self) -> &str {
        &self.accumulated_text
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

/// Reconstructs assistant text from raw body chunks.
///
/// Chunk boundaries may fall anywhere, including inside a field name, an
/// escape sequence, or a multi-byte character. The decoder carries the
/// unconsumed tail between chunks so the output is independent of how the
/// body was split.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    assembly: StreamAssembly,
    chunks_seen: usize,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assembly(&self) -> &StreamAssembly {
        &self.assembly
    }

    pub fn accumulated_text(&self) -> &str {
        self.assembly.accumulated_text()
    }

    pub fn is_finalized(&self) -> bool {
        self.assembly.finalized
    }

    /// Number of chunks fed so far
    pub fn chunks_seen(&self) -> usize {
        self.chunks_seen
    }

    /// Feed one body chunk, returning the text increments it completed.
    ///
    /// Returns nothing once the decoder is finalized.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.assembly.finalized {
            return Vec::new();
        }
        self.chunks_seen += 1;
        let text = self.decode_utf8(chunk);
        self.assembly.carry_buffer.push_str(&text);
        self.drain_fragments()
    }

    /// Natural end of stream.
    ///
    /// Flushes any complete trailing fragment, marks the assembly finalized
    /// and returns the full reply. An incomplete trailing fragment is
    /// discarded. Returns `None` if the decoder was already finalized.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Option<(Vec<String>, Message)> {
        if self.assembly.finalized {
            return None;
        }
        if !self.assembly.pending_bytes.is_empty() {
            let tail = String::from_utf8_lossy(&self.assembly.pending_bytes).into_owned();
            self.assembly.pending_bytes.clear();
            self.assembly.carry_buffer.push_str(&tail);
        }
        let increments = self.drain_fragments();
        self.assembly.carry_buffer.clear();
        self.assembly.finalized = true;
        Some((
            increments,
            Message::assistant(self.assembly.accumulated_text.clone(), now),
        ))
    }

    fn drain_fragments(&mut self) -> Vec<String> {
        let extraction = extract_fragments(&self.assembly.carry_buffer);
        self.assembly.carry_buffer.drain(..extraction.retain_from);

        let increments: Vec<String> = extraction
            .values
            .into_iter()
            .filter(|v| !v.is_empty())
            .collect();
        for increment in &increments {
            self.assembly.accumulated_text.push_str(increment);
        }
        increments
    }

    /// Decode as much of the pending bytes as forms complete characters.
    ///
    /// Invalid sequences become U+FFFD; an incomplete trailing sequence is
    /// held back for the next chunk.
    fn decode_utf8(&mut self, chunk: &[u8]) -> String {
        let pending = &mut self.assembly.pending_bytes;
        pending.extend_from_slice(chunk);

        let mut out = String::new();
        let mut start = 0;
        loop {
            match std::str::from_utf8(&pending[start..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    start = pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&pending[start..valid_end]));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + len;
                        }
                        None => {
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }
        pending.drain(..start);
        out
    }
}
