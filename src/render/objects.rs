//! Label objects and the tree walker
//!
//! Each drawable element of `pt:objects` is read into a [`LabelObject`]
//! up front, so a malformed label fails before anything is drawn. Drawing
//! dispatches on the variant; every object draws inside its own saved
//! surface state.

use enum_dispatch::enum_dispatch;

use crate::dom::{Element, ElementId};
use crate::errors::{LabelError, Result};
use crate::log::{debug, warn};
use crate::types::Rect;

use super::barcode::BarcodeObject;
use super::bitmap::ImageObject;
use super::context::RenderContext;
use super::shapes::{PolyObject, RectObject};
use super::style::{ObjectStyle, required};
use super::text::TextObject;

/// Something that can paint itself onto the context's surface.
#[enum_dispatch]
pub trait Draw {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()>;
}

/// Every kind of object a label can contain.
#[enum_dispatch(Draw)]
#[derive(Debug, Clone, PartialEq)]
pub enum LabelObject {
    Text(TextObject),
    Table(TableObject),
    Image(ImageObject),
    Barcode(BarcodeObject),
    Group(GroupObject),
    Rect(RectObject),
    Poly(PolyObject),
    Brush(BrushObject),
    Unknown(UnknownObject),
}

impl LabelObject {
    /// Read an object element, dispatching on its tag.
    pub fn read(el: &Element) -> Result<LabelObject> {
        let object = match el.name() {
            "text:text" => TextObject::read(el)?.into(),
            "table:table" => TableObject::read(el)?.into(),
            "image:image" => ImageObject::read(el)?.into(),
            "barcode:barcode" => BarcodeObject::read(el)?.into(),
            "pt:group" => GroupObject::read(el)?.into(),
            "draw:rect" => RectObject::read(el)?.into(),
            "draw:poly" => PolyObject::read(el)?.into(),
            "pt:brush" => BrushObject.into(),
            _ => UnknownObject::read(el)?.into(),
        };
        Ok(object)
    }

    /// Tag the object was read from; unknown objects keep their own.
    pub fn tag(&self) -> &str {
        match self {
            LabelObject::Text(_) => "text:text",
            LabelObject::Table(_) => "table:table",
            LabelObject::Image(_) => "image:image",
            LabelObject::Barcode(_) => "barcode:barcode",
            LabelObject::Group(_) => "pt:group",
            LabelObject::Rect(_) => "draw:rect",
            LabelObject::Poly(_) => "draw:poly",
            LabelObject::Brush(_) => "pt:brush",
            LabelObject::Unknown(unknown) => &unknown.tag,
        }
    }
}

/// Objects of the first `pt:objects` below `container`.
pub fn read_objects(container: &Element) -> Result<Vec<LabelObject>> {
    let objects = container
        .first("pt:objects")
        .ok_or(LabelError::NoObjectsContainer)?;
    objects.children().map(LabelObject::read).collect()
}

/// Draw objects in order, each inside its own saved state.
pub fn draw_all(cx: &mut RenderContext<'_>, objects: &[LabelObject]) -> Result<()> {
    for object in objects {
        let mut cx = cx.save();
        object.draw(&mut cx)?;
    }
    Ok(())
}

/// A `pt:data` node: its id for merge lookups and its literal text.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRef {
    pub id: ElementId,
    pub literal: String,
}

impl DataRef {
    pub fn read(obj: &Element) -> Result<DataRef> {
        let data = required(obj, "pt:data")?;
        Ok(DataRef {
            id: data.id(),
            literal: data.text_content(),
        })
    }
}

/// `pt:group`: a nested object list.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupObject {
    pub objects: Vec<LabelObject>,
}

impl GroupObject {
    pub fn read(el: &Element) -> Result<GroupObject> {
        Ok(GroupObject {
            objects: read_objects(el)?,
        })
    }
}

impl Draw for GroupObject {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        draw_all(cx, &self.objects)
    }
}

/// `table:table`: the contents of its cells, in document order.
///
/// Cells of nested tables belong to the nested table, which is itself one
/// of the cell contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TableObject {
    pub contents: Vec<LabelObject>,
}

impl TableObject {
    pub fn read(el: &Element) -> Result<TableObject> {
        let contents = el
            .all_within("table:cell", "table:table")
            .into_iter()
            .flat_map(|cell| cell.children())
            .map(LabelObject::read)
            .collect::<Result<_>>()?;
        Ok(TableObject { contents })
    }
}

impl Draw for TableObject {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        draw_all(cx, &self.contents)
    }
}

/// `pt:brush`: fill settings with nothing to draw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BrushObject;

impl Draw for BrushObject {
    fn draw(&self, _cx: &mut RenderContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// An element with no painter. Drawn as a dashed outline when it has a
/// direct `pt:objectStyle` child that reads cleanly; reading one never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownObject {
    pub tag: String,
    pub outline: Option<Rect>,
}

impl UnknownObject {
    pub fn read(el: &Element) -> Result<UnknownObject> {
        let outline = el
            .child("pt:objectStyle")
            .and_then(|style| match ObjectStyle::from_style(style) {
                Ok(style) => Some(style.bounds),
                Err(e) => {
                    debug!(tag = el.name(), error = %e, "ignoring unreadable object style");
                    None
                }
            });
        Ok(UnknownObject {
            tag: el.name().to_string(),
            outline,
        })
    }
}

impl Draw for UnknownObject {
    fn draw(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        let Some(outline) = self.outline else {
            debug!(tag = self.tag.as_str(), "skipping element without an object style");
            return Ok(());
        };
        warn!(tag = self.tag.as_str(), "unknown element, drawing its outline");
        let color = cx.options.outline_color;
        cx.surface.set_fill_color(color);
        cx.surface.set_stroke_color(color);
        cx.surface.set_line_dash(&cx.options.outline_dash);
        cx.surface.stroke_rect(outline);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(x: &str) -> Element {
        Element::new("pt:objectStyle")
            .with_attr("x", x)
            .with_attr("y", "0pt")
            .with_attr("width", "3pt")
            .with_attr("height", "3pt")
    }

    #[test]
    fn dispatch_by_tag() {
        let rect = Element::new("draw:rect").with_child(style("1pt"));
        assert_eq!(LabelObject::read(&rect).unwrap().tag(), "draw:rect");
        let brush = Element::new("pt:brush");
        assert_eq!(LabelObject::read(&brush).unwrap(), LabelObject::Brush(BrushObject));
        let other = Element::new("draw:ellipse").with_child(style("3pt"));
        let read = LabelObject::read(&other).unwrap();
        assert_eq!(read.tag(), "draw:ellipse");
        assert_eq!(
            read,
            LabelObject::Unknown(UnknownObject {
                tag: "draw:ellipse".into(),
                outline: Some(Rect::new(4.0, 0.0, 4.0, 4.0)),
            })
        );
    }

    #[test]
    fn unknown_outline_needs_a_direct_style() {
        let nested = Element::new("x:thing").with_child(Element::new("x:inner").with_child(style("0pt")));
        let read = UnknownObject::read(&nested).unwrap();
        assert_eq!(read.outline, None);
    }

    #[test]
    fn unknown_outline_ignores_unreadable_styles() {
        let el = Element::new("draw:ellipse").with_child(style("auto"));
        assert_eq!(UnknownObject::read(&el).unwrap().outline, None);

        let objects = Element::new("pt:objects").with_child(el);
        let doc = Element::new("pt:document").with_child(objects);
        let read = read_objects(&doc).unwrap();
        assert_eq!(
            read,
            vec![LabelObject::Unknown(UnknownObject {
                tag: "draw:ellipse".into(),
                outline: None,
            })]
        );
    }

    #[test]
    fn missing_objects_container() {
        let err = read_objects(&Element::new("pt:document")).unwrap_err();
        assert!(matches!(err, LabelError::NoObjectsContainer));
    }

    #[test]
    fn tables_do_not_reach_into_nested_tables() {
        let rect = || Element::new("draw:rect").with_child(style("0pt"));
        let inner = Element::new("table:table")
            .with_child(Element::new("table:cell").with_child(rect()));
        let outer = Element::new("table:table")
            .with_child(Element::new("table:cell").with_child(rect()))
            .with_child(
                Element::new("table:row").with_child(Element::new("table:cell").with_child(inner)),
            );
        let table = TableObject::read(&outer).unwrap();
        let tags: Vec<&str> = table.contents.iter().map(LabelObject::tag).collect();
        assert_eq!(tags, vec!["draw:rect", "table:table"]);
        let LabelObject::Table(nested) = &table.contents[1] else {
            panic!("expected nested table");
        };
        assert_eq!(nested.contents.len(), 1);
    }

    #[test]
    fn groups_read_their_nested_objects() {
        let group = Element::new("pt:group")
            .with_child(style("0pt"))
            .with_child(Element::new("pt:objects").with_child(Element::new("pt:brush")));
        let read = GroupObject::read(&group).unwrap();
        assert_eq!(read.objects, vec![LabelObject::Brush(BrushObject)]);

        let err = GroupObject::read(&Element::new("pt:group")).unwrap_err();
        assert!(matches!(err, LabelError::NoObjectsContainer));
    }
}
