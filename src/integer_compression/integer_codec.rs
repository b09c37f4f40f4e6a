use std::io::Cursor;

use crate::PforResult;

/// Integer compression/decompression interface over caller-owned buffers.
///
/// Implementations that need framing write a length header before the
/// compressed payload; cursor positions are always counted in `u32` words.
/// Both buffers are borrowed for the duration of a single call only.
pub trait Integer {
    /// Compresses `input_length` integers.
    ///
    /// # Arguments
    /// * `input_length` - Number of integers to compress
    /// * `input_offset` - Read position cursor, advanced by the integers consumed
    /// * `output_offset` - Write position cursor, advanced by the words written
    fn compress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()>;

    /// Decompresses `input_length` compressed words.
    ///
    /// # Arguments
    /// * `input_length` - Number of compressed words to consume
    /// * `input_offset` - Read position cursor, advanced by the words consumed
    /// * `output_offset` - Write position cursor, advanced by the integers written
    fn uncompress(
        &mut self,
        input: &[u32],
        input_length: u32,
        input_offset: &mut Cursor<u32>,
        output: &mut [u32],
        output_offset: &mut Cursor<u32>,
    ) -> PforResult<()>;
}
