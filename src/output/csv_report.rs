//! CSV report writer
//!
//! One row per recorded page, in normalized-key order. List-valued columns
//! are joined with `;`.

use crate::crawler::PageResults;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column headers of the report
pub const REPORT_HEADERS: [&str; 5] = [
    "page_url",
    "h1",
    "first_paragraph",
    "outgoing_link_urls",
    "image_urls",
];

const LIST_DELIMITER: &str = ";";

/// Writes the report to a file, replacing any existing one
///
/// # Arguments
///
/// * `pages` - The recorded pages
/// * `path` - Destination file
///
/// # Returns
///
/// * `Ok(())` - Report written
/// * `Err(ScrappyError)` - File could not be created or written
pub fn write_csv_report(pages: &PageResults, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_report_to(pages, file)?;
    tracing::info!("Wrote {} rows to {}", pages.len(), path.display());
    Ok(())
}

/// Writes the report to any writer
pub fn write_report_to<W: Write>(pages: &PageResults, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REPORT_HEADERS)?;

    for page in pages.values() {
        let links = page.outgoing_links.join(LIST_DELIMITER);
        let images = page.image_urls.join(LIST_DELIMITER);
        csv_writer.write_record([
            page.page_url.as_str(),
            page.title.as_str(),
            page.first_paragraph.as_str(),
            links.as_str(),
            images.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
