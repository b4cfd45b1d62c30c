//! Frame address and label resolution.
//!
//! `.ips` reports don't carry absolute addresses for frames, only an image
//! index and an offset into that image. Every frame (thread backtraces and
//! the last exception backtrace alike) goes through [`resolve_frame`], so all
//! output formats agree on addresses and labels.

use ips::{Frame, Image};
use tracing::trace;

use crate::sections::{Address, FrameRow};

/// Name used for frames whose image can't be found.
pub const UNKNOWN_IMAGE: &str = "Unknown";

/// Resolve `frame` (the `index`th of its backtrace) against `images`.
///
/// An `imageIndex` that is negative or out of range is not an error: the
/// frame is attributed to an `Unknown` image based at 0. Without a symbol,
/// the label is a `base + offset` expression.
pub fn resolve_frame(index: usize, frame: &Frame, images: &[Image]) -> FrameRow {
    let image = frame.image(images);
    if image.is_none() {
        trace!(
            "frame {index}: no image for imageIndex {:?}",
            frame.image_index
        );
    }

    let name = image
        .and_then(|image| image.name.clone())
        .unwrap_or_else(|| String::from(UNKNOWN_IMAGE));
    let base = image.and_then(|image| image.base).unwrap_or(0);
    let offset = frame.image_offset.unwrap_or(0);

    let mut label = match frame.symbol {
        Some(ref symbol) => symbol.clone(),
        None => format!("{base:#x} + {offset}"),
    };
    if let Some(location) = frame.symbol_location {
        label.push_str(&format!(" + {location}"));
    }

    let source = frame.source_file.as_ref().map(|file| match frame.source_line {
        Some(line) => format!("{file}:{line}"),
        None => file.clone(),
    });

    FrameRow {
        index,
        image_name: name,
        address: Address(base.wrapping_add(offset)),
        label,
        source,
    }
}

/// Resolve a whole backtrace.
pub fn resolve_frames(frames: &[Frame], images: &[Image]) -> Vec<FrameRow> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| resolve_frame(i, frame, images))
        .collect()
}
