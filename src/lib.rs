#![doc = include_str!("../README.md")]

mod cursor;
mod error;
mod integer_compression;

pub use cursor::IncrementCursor;
pub use error::{PforError, PforResult};
pub use integer_compression::binary_packing::BinaryPacking;
pub use integer_compression::bitpacking::{
    fast_pack, fast_pack4, fast_unpack, fast_unpack4, Packing,
};
pub use integer_compression::codec::Codec;
pub use integer_compression::composition::Composition;
pub use integer_compression::differential::Delta;
pub use integer_compression::fastpfor::{
    FastPFor, BLOCK_SIZE_128, BLOCK_SIZE_256, DEFAULT_PAGE_SIZE,
};
pub use integer_compression::integer_codec::Integer;
pub use integer_compression::just_copy::JustCopy;
pub use integer_compression::registry::{all_names, codec_by_name, CODEC_NAMES};
pub use integer_compression::skippable_codec::Skippable;
pub use integer_compression::variable_byte::VariableByte;

/// Low-level compression interface using caller-provided buffers.
///
/// Codecs write into pre-allocated slices and return a sub-slice showing
/// exactly what was written. The caller owns both buffers for their entire
/// lifetime; the codec borrows them for the duration of one call. This works
/// across FFI boundaries and allows buffer reuse.
///
/// # Type Parameters
///
/// - `In`: Input data type (e.g., `u32` for the integer codecs here)
/// - `Out`: Compressed output type (defaults to `In`, but may differ - e.g.,
///   64-bit integers compressing to 32-bit words)
///
/// # Buffer Sizing
///
/// Caller must ensure output buffers are large enough;
/// [`Codec::max_compressed_words`] gives a safe compression estimate. For
/// decompression, size depends on the original length, which the caller
/// tracks alongside the compressed data.
pub trait CodecToSlice<In, Out = In> {
    /// Error type returned by compression/decompression operations.
    type Error;

    /// Compresses input into the output buffer, returning the slice of data written.
    fn compress_to_slice<'out>(
        &mut self,
        input: &[In],
        output: &'out mut [Out],
    ) -> Result<&'out [Out], Self::Error>;

    /// Decompresses input into the output buffer, returning the slice of data written.
    fn decompress_to_slice<'out>(
        &mut self,
        input: &[Out],
        output: &'out mut [In],
    ) -> Result<&'out [In], Self::Error>;
}
