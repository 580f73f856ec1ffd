//! Streamed assistant response decoding.
//!
//! - [`extractor`] - finds complete `"text": "<value>"` fragments in a buffer
//! - [`decoder::StreamDecoder`] - carries partial input across chunks and
//!   assembles the full reply

pub mod decoder;
pub mod extractor;
