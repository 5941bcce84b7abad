//! Error types with rich diagnostics using miette
//!
//! Reader errors carry source spans into `label.xml`; everything else names the
//! element, attribute or asset that made the label unrenderable.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = LabelError> = std::result::Result<T, E>;

/// Everything that can go wrong while reading or rendering a label.
#[derive(Error, Diagnostic, Debug)]
pub enum LabelError {
    // ========================================================================
    // Reader
    // ========================================================================
    #[error("malformed label document: {message}")]
    #[diagnostic(code(lbx::read::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    // ========================================================================
    // Layout
    // ========================================================================
    #[error("malformed length: {value:?}")]
    #[diagnostic(
        code(lbx::layout::malformed_length),
        help("lengths are a number with an optional pt, px, in, mm or cm suffix")
    )]
    MalformedLength { value: String },

    #[error("label has no style:paper element")]
    #[diagnostic(code(lbx::layout::missing_paper))]
    MissingPaperNode,

    #[error("label has no style:backGround element")]
    #[diagnostic(code(lbx::layout::missing_background))]
    MissingBackgroundNode,

    #[error("no pt:objects container found")]
    #[diagnostic(code(lbx::layout::no_objects))]
    NoObjectsContainer,

    #[error("`{tag}` has no pt:objectStyle")]
    #[diagnostic(code(lbx::layout::missing_object_style))]
    MissingObjectStyle { tag: String },

    #[error("`{parent}` has no `{tag}` element")]
    #[diagnostic(code(lbx::layout::missing_element))]
    MissingElement { parent: String, tag: String },

    #[error("`{tag}` has no `{attr}` attribute")]
    #[diagnostic(code(lbx::layout::missing_attribute))]
    MissingAttribute { tag: String, attr: String },

    // ========================================================================
    // Assets
    // ========================================================================
    #[error("asset not found: {name}")]
    #[diagnostic(code(lbx::asset::not_found))]
    AssetNotFound { name: String },

    #[error("failed to read asset {name}")]
    #[diagnostic(code(lbx::asset::io))]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {name}")]
    #[diagnostic(code(lbx::asset::image_decode))]
    ImageDecode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    // ========================================================================
    // Barcodes
    // ========================================================================
    #[error("invalid {symbology} payload: {payload:?}")]
    #[diagnostic(
        code(lbx::barcode::invalid_payload),
        help("{symbology} takes at most {max_digits} digits before the check digit")
    )]
    InvalidBarcodePayload {
        symbology: String,
        payload: String,
        max_digits: usize,
    },

    #[error("no barcode generator available for {symbology}")]
    #[diagnostic(code(lbx::barcode::unavailable))]
    BarcodeUnavailable { symbology: String },

    #[error("barcode generator failed for {symbology}: {message}")]
    #[diagnostic(code(lbx::barcode::generate))]
    Barcode { symbology: String, message: String },

    // ========================================================================
    // Surfaces
    // ========================================================================
    #[error("invalid surface size {width}x{height}")]
    #[diagnostic(code(lbx::surface::invalid_size))]
    InvalidSurfaceSize { width: u32, height: u32 },

    #[error("unusable font {family}: {message}")]
    #[diagnostic(code(lbx::surface::font))]
    Font { family: String, message: String },

    #[error("failed to encode rendered label")]
    #[diagnostic(code(lbx::surface::encode))]
    Encode {
        #[source]
        source: image::ImageError,
    },
}

impl LabelError {
    pub(crate) fn missing(parent: &str, tag: &str) -> Self {
        LabelError::MissingElement {
            parent: parent.to_string(),
            tag: tag.to_string(),
        }
    }

    pub(crate) fn missing_attr(tag: &str, attr: &str) -> Self {
        LabelError::MissingAttribute {
            tag: tag.to_string(),
            attr: attr.to_string(),
        }
    }
}
