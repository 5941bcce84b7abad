//! Render Brother P-touch `.lbx` labels to raster images.
//!
//! A label is a zip archive holding `label.xml` and the images it refers
//! to. This crate reads the document from an [`AssetStore`] (the archive is
//! unpacked by the caller), resolves the paper geometry and merge fields,
//! and walks the object tree onto a [`Surface`]:
//!
//! ```no_run
//! use lbx_render::{DirAssets, FontBook, Label, NoBarcodes, PixmapSurface};
//! use miette::IntoDiagnostic;
//!
//! # fn main() -> miette::Result<()> {
//! let mut label = Label::open(DirAssets::new("unpacked-label"))?;
//! label.set_field_overwrites([("name", "Ada Lovelace")])?;
//!
//! let mut surface = PixmapSurface::new(FontBook::new());
//! label.render(&mut surface, &NoBarcodes)?;
//! std::fs::write("label.png", surface.encode_png()?).into_diagnostic()?;
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod dom;
pub mod errors;
pub mod fields;
pub mod label;
mod log;
pub mod paper;
pub mod parse;
pub mod render;
pub mod types;
pub mod units;

pub use assets::{AssetStore, DirAssets, MemoryAssets};
pub use dom::{Document, Element, ElementId};
pub use errors::{LabelError, Result};
pub use fields::{FieldTable, MergeField};
pub use label::Label;
pub use paper::{Orientation, Paper, PaperName};
pub use parse::{parse, parse_bytes, parse_named};
pub use render::{
    BarcodeGenerator, BarcodeParams, DisplayList, FontBook, NoBarcodes, PixmapSurface,
    RenderOptions, SkipBarcodes, Surface,
};
pub use types::{Color, Rect};
pub use units::{px_to_mm, to_pixels};
