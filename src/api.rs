//! The public entry points. These wrap the stream encoder and decoder for
//! callers that work with whole buffers or files.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::stream::{StreamDecoder, StreamEncoder};
use crate::{Context, Decoder, Encoder};

/// Compress 'data' with the compression 'level' (0..=9). Levels outside of
/// that range select the default level. Empty input is valid.
pub fn compress(data: &[u8], level: i32) -> Result<Vec<u8>> {
    compress_with(data, &Context::default().with_level(level))
}

/// Compress 'data' with the settings in 'ctx'.
pub fn compress_with(data: &[u8], ctx: &Context) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let _ = StreamEncoder::new(data, &mut output, *ctx).encode()?;
    Ok(output)
}

/// Decompress a buffer that was produced by 'compress'. Streams that declare
/// an output above the default ceiling are rejected with 'OutOfMemory'.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with(data, &Context::default())
}

/// Decompress 'data' using the output ceiling from 'ctx'.
pub fn decompress_with(data: &[u8], ctx: &Context) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut decoder = StreamDecoder::new(data, &mut output);
    decoder.set_max_output_size(ctx.max_output_size);
    let _ = decoder.decode()?;
    Ok(output)
}

/// Decompress 'data', refusing streams that declare more than
/// 'max_output_size' bytes.
pub fn decompress_with_limit(data: &[u8], max_output_size: u64) -> Result<Vec<u8>> {
    decompress_with(data, &Context::default().with_max_output_size(max_output_size))
}

/// Reject calls that would read and write the same file.
fn check_paths(input: &Path, output: &Path) -> Result<()> {
    if input == output {
        return Err(Error::InvalidArgument(format!(
            "input and output are the same file: {}",
            input.display()
        )));
    }
    Ok(())
}

/// Compress the file at 'input' into 'output'. Returns the number of bytes
/// that were written.
pub fn compress_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    level: i32,
) -> Result<usize> {
    check_paths(input.as_ref(), output.as_ref())?;
    let data = fs::read(input.as_ref())?;
    let compressed = compress(&data, level)?;
    fs::write(output.as_ref(), &compressed)?;
    log::debug!(
        "Wrote {} ({} bytes)",
        output.as_ref().display(),
        compressed.len()
    );
    Ok(compressed.len())
}

/// Decompress the file at 'input' into 'output'. Returns the number of bytes
/// that were written.
pub fn decompress_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<usize> {
    check_paths(input.as_ref(), output.as_ref())?;
    let data = fs::read(input.as_ref())?;
    let decompressed = decompress(&data)?;
    fs::write(output.as_ref(), &decompressed)?;
    log::debug!(
        "Wrote {} ({} bytes)",
        output.as_ref().display(),
        decompressed.len()
    );
    Ok(decompressed.len())
}
