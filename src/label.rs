//! The label handle: a parsed document, its assets and its merge fields

use std::collections::{BTreeMap, HashMap};

use crate::assets::{AssetStore, LABEL_XML};
use crate::dom::Document;
use crate::errors::Result;
use crate::fields::FieldTable;
use crate::paper::{Paper, PaperName};
use crate::parse::parse_bytes;
use crate::render::{self, BarcodeGenerator, RenderContext, RenderOptions, Surface};

/// An opened label.
///
/// Field overwrites accumulate across calls and persist across renders;
/// open the label again to start from the document's own text.
#[derive(Debug)]
pub struct Label<A> {
    document: Document,
    assets: A,
    fields: FieldTable,
    overwrites: HashMap<String, String>,
    options: RenderOptions,
}

impl<A: AssetStore> Label<A> {
    /// Read `label.xml` from `assets` and discover its merge fields.
    pub fn open(assets: A) -> Result<Self> {
        let document = parse_bytes(LABEL_XML, &assets.get_asset(LABEL_XML)?)?;
        Self::from_document(document, assets)
    }

    /// Wrap an already parsed document; images are still read from `assets`.
    pub fn from_document(document: Document, assets: A) -> Result<Self> {
        let fields = FieldTable::discover(&document)?;
        Ok(Self {
            document,
            assets,
            fields,
            overwrites: HashMap::new(),
            options: RenderOptions::default(),
        })
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Merge-field names and their current values.
    pub fn fields(&self) -> BTreeMap<String, String> {
        self.fields.values()
    }

    pub fn field_table(&self) -> &FieldTable {
        &self.fields
    }

    /// Replace field values by name. Names the label doesn't have are
    /// ignored; fields not named keep their current value.
    pub fn set_field_overwrites<I, K, V>(&mut self, overwrites: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.overwrites.extend(
            overwrites
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        self.fields = FieldTable::resolve(&self.document, &self.overwrites, Some(&self.fields))?;
        Ok(())
    }

    pub fn paper(&self) -> Result<Paper> {
        Paper::resolve(&self.document)
    }

    /// Stock name such as `"62"` or `"29x90"`.
    pub fn paper_name(&self) -> Result<PaperName> {
        Ok(self.paper()?.name())
    }

    /// Size in device pixels of the surface [`Label::render`] draws on.
    pub fn canvas_size(&self) -> Result<(u32, u32)> {
        Ok(render::canvas_size(&self.paper()?, &self.options))
    }

    /// Draw the label onto `surface`, resizing it to [`Label::canvas_size`].
    pub fn render(&self, surface: &mut dyn Surface, barcodes: &dyn BarcodeGenerator) -> Result<()> {
        let paper = self.paper()?;
        let mut cx = RenderContext {
            surface,
            assets: &self.assets,
            barcodes,
            fields: &self.fields,
            options: &self.options,
        };
        render::render(&mut cx, &self.document, &paper)
    }
}
