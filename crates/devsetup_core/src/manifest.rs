//! Package manifest lookup.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Read the package name from a `package.xml` manifest.
///
/// The name is the trimmed text of the `<name>` element directly under the
/// root element.
pub fn read_package_name(path: &Path) -> CoreResult<String> {
    if !path.exists() {
        return Err(CoreError::ManifestNotFound(path.to_path_buf()));
    }
    debug!("Reading package name from {:?}", path);

    let text = fs::read_to_string(path)?;
    let doc = roxmltree::Document::parse(&text).map_err(|e| CoreError::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    doc.root_element()
        .children()
        .find(|node| node.has_tag_name("name"))
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CoreError::ManifestMissingName(path.to_path_buf()))
}
