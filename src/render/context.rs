//! Rendering context - what an object painter can reach while drawing

use std::ops::{Deref, DerefMut};

use crate::assets::AssetStore;
use crate::fields::FieldTable;

use super::barcode::BarcodeGenerator;
use super::objects::DataRef;
use super::options::RenderOptions;
use super::surface::Surface;

/// Rendering context
pub struct RenderContext<'r> {
    /// Where drawing goes
    pub surface: &'r mut dyn Surface,
    /// Image files referenced by the label
    pub assets: &'r dyn AssetStore,
    pub barcodes: &'r dyn BarcodeGenerator,
    /// Resolved merge-field text
    pub fields: &'r FieldTable,
    pub options: &'r RenderOptions,
}

impl<'r> RenderContext<'r> {
    /// Push surface state; it is popped when the guard drops, whichever way
    /// the drawing code exits.
    pub fn save(&mut self) -> Saved<'_, 'r> {
        self.surface.save();
        Saved { cx: self }
    }

    /// Text of a data node: the resolved field value, else its literal text.
    pub fn text(&self, data: &DataRef) -> String {
        self.fields
            .text(data.id)
            .map_or_else(|| data.literal.clone(), str::to_string)
    }
}

/// A context whose surface state is restored on drop.
pub struct Saved<'a, 'r> {
    cx: &'a mut RenderContext<'r>,
}

impl<'r> Deref for Saved<'_, 'r> {
    type Target = RenderContext<'r>;

    fn deref(&self) -> &Self::Target {
        self.cx
    }
}

impl DerefMut for Saved<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cx
    }
}

impl Drop for Saved<'_, '_> {
    fn drop(&mut self) {
        self.cx.surface.restore();
    }
}
