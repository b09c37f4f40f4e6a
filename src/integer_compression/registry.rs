use log::debug;

use crate::integer_compression::bitpacking::Packing;
use crate::{
    BinaryPacking, Codec, Composition, FastPFor, JustCopy, PforError, PforResult, VariableByte,
    BLOCK_SIZE_128, BLOCK_SIZE_256, DEFAULT_PAGE_SIZE,
};

/// Every registered codec name, in registration order.
///
/// The order is stable across calls and releases; names are matched
/// case-sensitively.
pub const CODEC_NAMES: &[&str] = &[
    "fastpfor128",
    "fastpfor256",
    "simdfastpfor128",
    "simdfastpfor256",
    "bp32",
    "simdbinarypacking",
    "vbyte",
    "copy",
];

/// Returns every registered codec name in a stable order.
///
/// Each returned name resolves through [`codec_by_name`].
pub fn all_names() -> &'static [&'static str] {
    CODEC_NAMES
}

/// Constructs the codec registered under `name`.
///
/// Matching is exact and case-sensitive; an unrecognized name is
/// [`PforError::UnknownCodec`], never a silent fallback. Every call builds a
/// fresh codec value: codecs carry per-instance scratch buffers, so handing
/// each caller its own instance keeps concurrent use lock-free.
pub fn codec_by_name(name: &str) -> PforResult<Codec> {
    let codec: Codec = match name {
        "fastpfor128" => Composition::new(
            FastPFor::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_128, Packing::Scalar),
            VariableByte::new(),
        )
        .into(),
        "fastpfor256" => Composition::new(
            FastPFor::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_256, Packing::Scalar),
            VariableByte::new(),
        )
        .into(),
        "simdfastpfor128" => Composition::new(
            FastPFor::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_128, Packing::Interleaved),
            VariableByte::new(),
        )
        .into(),
        "simdfastpfor256" => Composition::new(
            FastPFor::new(DEFAULT_PAGE_SIZE, BLOCK_SIZE_256, Packing::Interleaved),
            VariableByte::new(),
        )
        .into(),
        "bp32" => Composition::new(BinaryPacking::new(Packing::Scalar), VariableByte::new()).into(),
        "simdbinarypacking" => {
            Composition::new(BinaryPacking::new(Packing::Interleaved), VariableByte::new()).into()
        }
        "vbyte" => VariableByte::new().into(),
        "copy" => JustCopy::new().into(),
        _ => return Err(PforError::UnknownCodec(name.to_string())),
    };
    debug!("constructed codec {name}");
    Ok(codec)
}
