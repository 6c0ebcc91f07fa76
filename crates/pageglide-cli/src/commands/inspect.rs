use std::path::Path;

use anyhow::Result;

use pageglide_core::facade::inspect_structure;
use pageglide_core::page::PageSnapshot;

pub fn run(file: &Path) -> Result<()> {
    let snapshot = PageSnapshot::load(file)?;
    let doc = snapshot.instantiate();

    println!("Page: {}", doc.location());
    println!(
        "Viewport: {}x{}",
        doc.viewport().width,
        doc.viewport().height
    );
    println!("Content height: {}", doc.content_height());
    println!("Scrollable: {}", doc.max_scroll());
    println!();
    print!("{}", inspect_structure(&doc));

    Ok(())
}
