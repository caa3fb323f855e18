use crate::error::Result;
use crate::pdf::preview::load_previews;
use std::path::PathBuf;

pub async fn run(paths: Vec<PathBuf>) -> Result<()> {
    let previews = load_previews(paths).await?;

    for preview in &previews {
        println!(
            "{} p{}: {:.0}x{:.0} pt",
            preview.source.display(),
            preview.page,
            preview.width,
            preview.height
        );
        if !preview.text.is_empty() {
            println!("  {}", preview.text);
        }
    }

    let label = if previews.len() == 1 { "page" } else { "pages" };
    println!("\n{} {}", previews.len(), label);
    Ok(())
}
