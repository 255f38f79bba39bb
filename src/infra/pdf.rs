use std::path::Path;

use tracing::{debug, info};

use crate::domain::chunk::Page;
use crate::error::{AppError, AppResult};

/// Extracts the text of every page, in page order.
pub fn load_pages(path: &Path) -> AppResult<Vec<Page>> {
    if !path.is_file() {
        return Err(AppError::Document(format!(
            "PDF file not found: {}",
            path.display()
        )));
    }

    info!("loading PDF: {}", path.display());
    let document = lopdf::Document::load(path).map_err(|err| {
        AppError::Document(format!("failed to open {}: {err}", path.display()))
    })?;

    let mut pages = Vec::new();
    for &number in document.get_pages().keys() {
        let text = document.extract_text(&[number]).map_err(|err| {
            AppError::Document(format!("failed to extract text from page {number}: {err}"))
        })?;
        debug!(page = number, chars = text.len(), "extracted page text");
        pages.push(Page { number, text });
    }
    info!("loaded {} pages", pages.len());
    Ok(pages)
}
