//! PNG encoding of the pixel buffer

use std::io::Write;

use png::{BitDepth, ColorType, Encoder, EncodingError};
use tiny_skia::Pixmap;

use crate::{RenderError, Result};

/// Straight (non-premultiplied) RGBA bytes of a pixmap
pub(crate) fn demultiplied_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// Encode `pixmap` as an 8-bit RGBA PNG into `w`
pub(crate) fn write_png(pixmap: &Pixmap, w: &mut dyn Write) -> Result<()> {
    let mut encoder = Encoder::new(w, pixmap.width(), pixmap.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder.write_header().map_err(encoding_error)?;
    writer
        .write_image_data(&demultiplied_rgba(pixmap))
        .map_err(encoding_error)?;
    writer.finish().map_err(encoding_error)
}

fn encoding_error(err: EncodingError) -> RenderError {
    match err {
        EncodingError::IoError(err) => RenderError::Io(err),
        err => RenderError::Encoding(err),
    }
}
