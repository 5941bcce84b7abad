//! End-to-end rendering of labels held in memory.

use std::cell::RefCell;
use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use lbx_render::render::{DrawKind, RenderOptions};
use lbx_render::types::dvec2;
use lbx_render::{
    BarcodeParams, Color, DisplayList, FontBook, Label, LabelError, MemoryAssets, NoBarcodes,
    PixmapSurface, Rect, SkipBarcodes, Surface,
};

const LABEL: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<pt:document xmlns:pt="http://schemas.brother.info/ptouch/2007/lbx/main" xmlns:style="http://schemas.brother.info/ptouch/2007/lbx/style" xmlns:text="http://schemas.brother.info/ptouch/2007/lbx/text" xmlns:image="http://schemas.brother.info/ptouch/2007/lbx/image" xmlns:barcode="http://schemas.brother.info/ptouch/2007/lbx/barcode" version="1.7">
  <pt:body currentSheet="Sheet 1" direction="LTR">
    <style:sheet name="Sheet 1">
      <style:paper media="0" width="82.2pt" height="255.1pt" marginLeft="6pt" marginTop="3pt" marginRight="6pt" marginBottom="3pt" orientation="portrait" autoLength="false" printColorDisplay="false"/>
      <style:backGround x="6pt" y="3pt" width="150pt" height="45pt" brushStyle="NULL" color="#000000" backColor="#FFFFFF"/>
      <pt:objects>
        <image:image>
          <pt:objectStyle x="3pt" y="3pt" width="24pt" height="24pt" backColor="#FFFFFF" angle="0" anchor="TOPLEFT" flip="NONE"/>
          <image:imageStyle originalName="logo.png" alignInText="LEFT" firstMerge="true" IconNumber="0" fileName="Object0.png">
            <image:transparent flag="false" color="#FFFFFF"/>
            <image:orgPos x="3pt" y="3pt" width="24pt" height="24pt"/>
            <image:mono operationKind="BINARY" reverse="0" ditherKind="MESH" threshold="128" gamma="100"/>
          </image:imageStyle>
        </image:image>
        <barcode:barcode>
          <pt:objectStyle x="36pt" y="3pt" width="90pt" height="30pt" backColor="#FFFFFF" angle="0" anchor="TOPLEFT" flip="NONE">
            <pt:expanded objectName="Code" ID="0" lock="0"/>
          </pt:objectStyle>
          <barcode:barcodeStyle protocol="EAN13" lengths="13" zeroFill="false" barWidth="1.5pt" barRatio="1:3" humanReadable="true" checkDigit="true"/>
          <pt:data>400638133393</pt:data>
        </barcode:barcode>
        <text:text>
          <pt:objectStyle x="3pt" y="33pt" width="144pt" height="9pt" backColor="#FFFFFF" angle="0" anchor="TOPLEFT" flip="NONE">
            <pt:expanded objectName="Title" ID="0" lock="0"/>
          </pt:objectStyle>
          <text:ptFontInfo>
            <text:logFont name="Helsinki" width="0" italic="false" weight="400" charSet="0" pitchAndFamily="2"/>
            <text:fontExt effect="NOEFFECT" underline="0" strikeout="0" size="9pt" textColor="#000000"/>
          </text:ptFontInfo>
          <text:textAlign horizontalAlignment="LEFT" verticalAlignment="TOP" inLineAlignment="BASELINE"/>
          <pt:data>Apples</pt:data>
        </text:text>
      </pt:objects>
    </style:sheet>
  </pt:body>
</pt:document>
"##;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

fn assets() -> MemoryAssets {
    let logo = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    MemoryAssets::new()
        .with("label.xml", LABEL)
        .with("Object0.png", png(&logo))
}

/// Black bars of a fixed width, as tall as requested.
fn solid_barcode(
    _symbology: &str,
    _payload: &str,
    params: &BarcodeParams,
) -> lbx_render::Result<RgbaImage> {
    Ok(RgbaImage::from_pixel(
        300,
        params.height as u32,
        Rgba([0, 0, 0, 255]),
    ))
}

fn exact_label() -> Label<MemoryAssets> {
    Label::open(assets())
        .unwrap()
        .with_options(RenderOptions::default().without_corrections())
}

#[test]
fn display_list_of_a_mixed_label() {
    init_tracing();
    let mut label = exact_label();
    label.set_field_overwrites([("Title", "Pears")]).unwrap();

    let mut list = DisplayList::new();
    label.render(&mut list, &solid_barcode).unwrap();

    insta::assert_snapshot!(list.to_string().trim_end(), @r#"
    fill_rect 0.0,0.0 625.0x187.0 fill=#ffffff
    draw_image 12.5,12.5 100.0x100.0 image=4x4 smooth=true
    draw_image 146.9,12.5 300.0x90.0 image=300x90 smooth=false
    fill_text 12.5,137.5 "Pears" font="400 11.3125px Helsinki" fill=#000000 align=Left baseline=Top
    "#);
}

#[test]
fn paper_and_canvas() {
    let label = Label::open(assets()).unwrap();
    assert_eq!(label.paper_name().unwrap().to_string(), "29x90");
    assert_eq!(label.canvas_size().unwrap(), (625, 187));

    let paper = label.paper().unwrap();
    assert_eq!(paper.width, 200.0);
    assert_eq!(paper.height, 60.0);
    assert_eq!(paper.margin_left, 8.0);
}

#[test]
fn field_overwrites_accumulate() {
    let mut label = Label::open(assets()).unwrap();
    let fields = label.fields();
    assert_eq!(
        fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>(),
        vec![("Code", "400638133393"), ("Title", "Apples")]
    );

    label.set_field_overwrites([("Code", "42")]).unwrap();
    label
        .set_field_overwrites([("Title", "Pears"), ("Nope", "ignored")])
        .unwrap();
    let fields = label.fields();
    assert_eq!(fields["Code"], "42");
    assert_eq!(fields["Title"], "Pears");
    assert!(!fields.contains_key("Nope"));

    // The document itself still holds the literal text.
    let data: Vec<String> = label
        .document()
        .all("pt:data")
        .map(|el| el.text_content())
        .collect();
    assert_eq!(data, vec!["400638133393", "Apples"]);
}

#[test]
fn barcodes_get_a_check_digit_and_device_pixels() {
    let seen = RefCell::new(Vec::new());
    let generator = |symbology: &str, payload: &str, params: &BarcodeParams| {
        seen.borrow_mut()
            .push((symbology.to_string(), payload.to_string(), params.clone()));
        solid_barcode(symbology, payload, params)
    };

    let label = Label::open(assets()).unwrap();
    let mut list = DisplayList::new();
    label.render(&mut list, &generator).unwrap();

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 1);
    let (symbology, payload, params) = &seen[0];
    assert_eq!(symbology, "EAN13");
    assert_eq!(payload, "4006381333931");
    assert_eq!(params.bar_width, 6.25);
    assert_eq!(params.height, 90.625);
    assert_eq!(params.font_size, 31.25);

    let barcode = list
        .ops()
        .iter()
        .find(|op| matches!(op.kind, DrawKind::DrawImage { width: 300, .. }))
        .unwrap();
    let t = barcode.state.transform;
    assert_eq!((t.matrix2.x_axis.x, t.matrix2.y_axis.y), (1.0, 1.0));
    assert!(!barcode.state.image_smoothing);
}

#[test]
fn barcodes_need_a_generator() {
    let label = Label::open(assets()).unwrap();
    let err = label
        .render(&mut DisplayList::new(), &NoBarcodes)
        .unwrap_err();
    assert!(matches!(err, LabelError::BarcodeUnavailable { ref symbology } if symbology == "EAN13"));
}

#[test]
fn skipped_barcodes_leave_the_rest_of_the_label() {
    let label = exact_label();
    let mut list = DisplayList::new();
    label.render(&mut list, &SkipBarcodes).unwrap();

    let images: Vec<(u32, u32)> = list
        .ops()
        .iter()
        .filter_map(|op| match &op.kind {
            DrawKind::DrawImage { width, height, .. } => Some((*width, *height)),
            _ => None,
        })
        .collect();
    assert_eq!(images, vec![(4, 4), (0, 0)]);
    assert!(list.ops().iter().any(|op| matches!(op.kind, DrawKind::FillText { .. })));
}

#[test]
fn missing_images_fail_the_render() {
    let assets = MemoryAssets::new().with("label.xml", LABEL);
    let label = Label::open(assets).unwrap();
    let err = label
        .render(&mut DisplayList::new(), &solid_barcode)
        .unwrap_err();
    assert!(matches!(err, LabelError::AssetNotFound { ref name } if name == "Object0.png"));
}

#[test]
fn labels_without_objects_are_rejected() {
    let xml = r#"<pt:document xmlns:pt="http://schemas.brother.info/ptouch/2007/lbx/main" xmlns:style="http://schemas.brother.info/ptouch/2007/lbx/style">
  <style:paper width="82.2pt" height="255.1pt"/>
  <style:backGround width="150pt" height="45pt"/>
</pt:document>"#;
    let label = Label::open(MemoryAssets::new().with("label.xml", xml)).unwrap();
    let mut list = DisplayList::new();
    let err = label.render(&mut list, &NoBarcodes).unwrap_err();
    assert!(matches!(err, LabelError::NoObjectsContainer));
    assert!(list.is_empty());
}

#[test]
fn open_needs_label_xml() {
    let err = Label::open(MemoryAssets::new()).unwrap_err();
    assert!(matches!(err, LabelError::AssetNotFound { ref name } if name == "label.xml"));
}

#[test]
fn label_xml_must_be_utf8() {
    let mut xml = LABEL.as_bytes().to_vec();
    let at = LABEL.find("Apples").unwrap();
    xml[at] = 0xff;
    let err = Label::open(MemoryAssets::new().with("label.xml", xml)).unwrap_err();
    let LabelError::Syntax { span, .. } = &err else {
        panic!("got {err:?}");
    };
    assert_eq!(span.offset(), at);
}

#[test]
fn unknown_objects_do_not_leak_their_dash() {
    let label = Label::open(MemoryAssets::new().with("label.xml", include_str!("labels/shapes.xml")))
        .unwrap()
        .with_options(RenderOptions::default().without_corrections());
    let mut list = DisplayList::new();
    label.render(&mut list, &NoBarcodes).unwrap();

    let outline = list
        .ops()
        .iter()
        .position(|op| matches!(op.kind, DrawKind::StrokeRect(_)))
        .unwrap();
    assert_eq!(list.ops()[outline].state.line_dash, vec![3.0, 2.0]);
    assert_eq!(list.ops()[outline].state.stroke_color, Color::RED);

    let after = &list.ops()[outline + 1];
    assert!(matches!(after.kind, DrawKind::StrokePath(_)));
    assert!(after.state.line_dash.is_empty());
    assert_eq!(after.state.stroke_color, Color::BLACK);
}

#[test]
fn later_objects_are_on_top() {
    let label = Label::open(MemoryAssets::new().with("label.xml", include_str!("labels/nested.xml")))
        .unwrap()
        .with_options(RenderOptions::default().without_corrections());
    let mut list = DisplayList::new();
    label.render(&mut list, &NoBarcodes).unwrap();

    // All three rectangles cover (80, 70): group, then table, then the loose rect.
    let top = list.topmost_at(dvec2(80.0, 70.0)).unwrap();
    assert_eq!(top.device_bounds(), Some(Rect::new(75.0, 62.5, 100.0, 50.0)));

    // Left of the loose rect only the group and the table overlap.
    let top = list.topmost_at(dvec2(60.0, 55.0)).unwrap();
    assert_eq!(top.device_bounds(), Some(Rect::new(50.0, 50.0, 100.0, 50.0)));

    let top = list.topmost_at(dvec2(10.0, 10.0)).unwrap();
    assert_eq!(top.device_bounds(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

    let top = list.topmost_at(dvec2(290.0, 140.0)).unwrap();
    assert!(matches!(top.kind, DrawKind::FillRect(_)));
}

#[test]
fn rasterizes_with_print_corrections() {
    init_tracing();
    let label = Label::open(assets()).unwrap();
    let mut surface = PixmapSurface::new(FontBook::new());
    label.render(&mut surface, &solid_barcode).unwrap();

    assert_eq!(surface.size(), (625, 187));
    // Inside the logo
    assert_eq!(surface.pixel(40, 40), Some(Color::BLACK));
    // Inside the barcode
    assert_eq!(surface.pixel(200, 50), Some(Color::BLACK));
    // Blank paper
    assert_eq!(surface.pixel(600, 180), Some(Color::WHITE));

    let png = surface.encode_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}
