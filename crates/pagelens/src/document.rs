use std::path::Path;

use layout::{DocumentText, LayoutConfig, PageText};

use crate::prelude::*;

/// Read an extractor page dump (`{"pages": [...]}`) from disk.
pub fn load_document(path: &Path) -> Result<DocumentText> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("failed to read page dump {}", path.display()))?;
    let document = DocumentText::from_json(&json)?;
    log::debug!("loaded {} pages from {}", document.pages.len(), path.display());
    Ok(document)
}

/// Layout thresholds from the optional profile, with padding scaled for the
/// zoom the dump was extracted at.
pub fn load_config(global: &crate::Global) -> Result<LayoutConfig> {
    let config = match &global.profile {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .wrap_err_with(|| f!("failed to read layout profile {}", path.display()))?;
            LayoutConfig::from_json(&json)?
        }
        None => LayoutConfig::default(),
    };
    Ok(config.at_zoom(global.zoom)?)
}

/// One page by number, or every page when `page` is `None`.
pub fn select_pages(document: &DocumentText, page: Option<usize>) -> Result<Vec<&PageText>> {
    match page {
        Some(number) => Ok(vec![document.page(number)?]),
        None if document.pages.is_empty() => {
            Err(Error::Input("page dump contains no pages".to_string()).into())
        }
        None => Ok(document.pages.iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_temp(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn global(profile: Option<std::path::PathBuf>, zoom: f32) -> crate::Global {
        crate::Global {
            verbose: false,
            profile,
            zoom,
        }
    }

    #[test]
    fn test_load_document_and_select_pages() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_temp(
            &temp_dir,
            "doc.json",
            r#"{"pages": [
                {"pageNumber": 1, "pageWidth": 600, "pageHeight": 800, "items": []},
                {"pageNumber": 2, "pageWidth": 600, "pageHeight": 800, "items": []}
            ]}"#,
        );
        let document = load_document(&path).unwrap();
        assert_eq!(select_pages(&document, None).unwrap().len(), 2);
        assert_eq!(select_pages(&document, Some(2)).unwrap()[0].page_number, 2);
        assert!(select_pages(&document, Some(9)).is_err());
    }

    #[test]
    fn test_load_document_reports_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_temp(&temp_dir, "bad.json", "{ not json");
        assert!(load_document(&path).is_err());
    }

    #[test]
    fn test_empty_document_has_no_pages_to_select() {
        assert!(select_pages(&DocumentText::default(), None).is_err());
    }

    #[test]
    fn test_load_config_applies_profile_and_zoom() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_temp(&temp_dir, "profile.json", r#"{"indentFactor": 3.0}"#);
        let config = load_config(&global(Some(path), 2.0)).unwrap();
        assert_eq!(config.indent_factor, 3.0);
        assert_eq!(config.padding.vertical, 8.0);

        assert!(load_config(&global(None, 0.0)).is_err());
    }
}
