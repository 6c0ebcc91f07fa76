use std::path::Path;

use anyhow::Result;

use pageglide_core::page::builder::{div, element};
use pageglide_core::page::{Document, PageSnapshot, Viewport};

/// Landing page with enough structure to exercise every subcommand.
pub fn demo_page() -> Document {
    let mut doc = Document::new(Viewport::new(1200.0, 800.0));
    doc.set_location("/demo");
    doc.set_content_height(3000.0);
    let body = doc.body();
    div()
        .id("hero")
        .class("c-section")
        .style("background", "#101418")
        .child(div().class("c-row").child(div().class("c-wrapper").text("Glide")))
        .build(&mut doc, body);
    div()
        .id("features")
        .class("c-section")
        .child(div().class("c-row").text("Feature grid"))
        .build(&mut doc, body);
    div()
        .id("signup")
        .class("c-section")
        .child(element("a").id("cta").text("Get started"))
        .build(&mut doc, body);
    doc
}

pub fn run(output: &Path) -> Result<()> {
    let doc = demo_page();
    PageSnapshot::capture(&doc).save(output)?;

    println!("Wrote {}", output.display());
    println!("\nTry:");
    println!("  pageglide inspect {}", output.display());
    println!(
        "  pageglide simulate {} --wheel 0:600,500:-200 --frames 120",
        output.display()
    );

    Ok(())
}
