use std::io::Cursor;

use crate::PforResult;

/// Headerless compression/decompression for seekable streams.
///
/// Methods operate without length headers, so the caller must track lengths
/// externally. Block-structured implementations require `input_length` to be
/// a multiple of their block size and report `InvalidLength` otherwise.
pub trait Skippable {
    /// Compresses integers without writing a length header.
    ///
    /// # Arguments
    /// * `input_length` - Number of integers to compress
    /// * `input_offset` - Read position cursor, advanced by the integers consumed
    /// * `output_offset` - Write position cursor, advanced by the words written
    fn headless_compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()>;

    /// Decompresses integers without reading a length header.
    ///
    /// # Arguments
    /// * `input_length` - Compressed data length in words
    /// * `input_offset` - Read position cursor, advanced by the words consumed
    /// * `output_offset` - Write position cursor, advanced by `num`
    /// * `num` - Expected number of integers to decompress
    fn headless_uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
        num: u32,
    ) -> PforResult<()>;
}
