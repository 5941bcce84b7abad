use camino::{Utf8Path, Utf8PathBuf};
use lbx_render::render::{BarcodeGenerator, BarcodeParams, RenderOptions, RgbaImage};
use lbx_render::{
    DirAssets, DisplayList, FontBook, Label, NoBarcodes, PixmapSurface, SkipBarcodes, parse_named,
};
use miette::{IntoDiagnostic, Result, miette};
use rayon::prelude::*;
use std::fs;

fn usage() -> ! {
    eprintln!("Usage: cargo xtask <command>");
    eprintln!("Commands:");
    eprintln!("  preview <label-dir> [-o out.png] [--font family=path.ttf]...");
    eprintln!("                  Render an extracted .lbx directory to PNG");
    eprintln!("  ops <label-dir> Print the drawing calls of a label");
    eprintln!("  fields <label-dir>");
    eprintln!("                  List merge fields and their values");
    eprintln!("  bless-fixtures  Regenerate tests/labels/*.ops from the fixtures");
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        usage();
    };

    let result = match command.as_str() {
        "preview" => preview(rest),
        "ops" => ops(rest),
        "fields" => fields(rest),
        "bless-fixtures" => bless_fixtures(),
        _ => {
            eprintln!("Unknown command: {}", command);
            usage();
        }
    };

    if let Err(report) = result {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

fn label_dir(args: &[String]) -> Result<&Utf8Path> {
    args.first()
        .map(|dir| Utf8Path::new(dir.as_str()))
        .ok_or_else(|| miette!("missing <label-dir>"))
}

fn open(dir: &Utf8Path) -> Result<Label<DirAssets>> {
    Ok(Label::open(DirAssets::new(dir.as_std_path()))?)
}

/// The tools have no barcode encoder; barcodes are left blank with a note.
fn skip_barcodes(
    symbology: &str,
    payload: &str,
    params: &BarcodeParams,
) -> lbx_render::Result<RgbaImage> {
    eprintln!("Leaving out {symbology} barcode {payload:?}");
    SkipBarcodes.generate(symbology, payload, params)
}

fn preview(args: &[String]) -> Result<()> {
    let dir = label_dir(args)?;
    let mut output = dir.with_extension("png");
    let mut fonts = FontBook::new();

    let mut rest = args[1..].iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .ok_or_else(|| miette!("{flag} needs a value"))?;
        match flag.as_str() {
            "-o" => output = Utf8PathBuf::from(value),
            "--font" => {
                let (family, path) = value
                    .split_once('=')
                    .ok_or_else(|| miette!("expected family=path, got {value}"))?;
                fonts.load(family, Utf8Path::new(path).as_std_path())?;
            }
            _ => return Err(miette!("unknown flag {flag}")),
        }
    }

    let label = open(dir)?;
    let mut surface = PixmapSurface::new(fonts);
    label.render(&mut surface, &skip_barcodes)?;
    fs::write(&output, surface.encode_png()?).into_diagnostic()?;

    let (width, height) = label.canvas_size()?;
    eprintln!(
        "Wrote {} ({}x{} px, paper {})",
        output,
        width,
        height,
        label.paper_name()?
    );
    Ok(())
}

fn ops(args: &[String]) -> Result<()> {
    let label = open(label_dir(args)?)?;
    let mut list = DisplayList::new();
    label.render(&mut list, &skip_barcodes)?;
    print!("{list}");
    Ok(())
}

fn fields(args: &[String]) -> Result<()> {
    let label = open(label_dir(args)?)?;
    for (name, value) in label.fields() {
        println!("{name}\t{value}");
    }
    Ok(())
}

/// Render every fixture label without print corrections and write its
/// display list next to it.
fn bless_fixtures() -> Result<()> {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let fixtures = manifest_dir.join("../tests/labels");

    let mut sources: Vec<Utf8PathBuf> = fs::read_dir(&fixtures)
        .into_diagnostic()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
        .filter(|path| path.extension() == Some("xml"))
        .collect();
    sources.sort();

    sources.par_iter().try_for_each(|path| -> Result<()> {
        eprintln!("Rendering {}...", path.file_name().unwrap_or(path.as_str()));
        let source = fs::read_to_string(path).into_diagnostic()?;
        let document = parse_named(path.as_str(), &source)?;
        let label = Label::from_document(document, DirAssets::new(fixtures.as_std_path()))?
            .with_options(RenderOptions::default().without_corrections());

        let mut list = DisplayList::new();
        label.render(&mut list, &NoBarcodes)?;
        fs::write(path.with_extension("ops"), list.to_string()).into_diagnostic()?;
        Ok(())
    })?;

    eprintln!("Blessed {} fixtures", sources.len());
    Ok(())
}
