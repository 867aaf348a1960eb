//! Module display names to file paths.

use std::path::{Path, PathBuf};

/// Turn a module's display name into a file path under `root`.
///
/// Loader chains (`babel-loader!./src/a.js`), query strings, layer prefixes
/// (`(ssr)/./src/a.js`) and the `+ N modules` suffix of concatenated modules
/// are stripped; relative results are joined to `root`.
pub fn module_path(name: &str, root: &Path) -> PathBuf {
    let mut name = name.rsplit('!').next().unwrap_or(name).trim();

    if let Some((head, tail)) = name.split_once(" + ") {
        if tail.trim_end().ends_with("modules") || tail.trim_end().ends_with("module") {
            name = head;
        }
    }
    if let Some(index) = name.find('?') {
        name = &name[..index];
    }
    if name.starts_with('(') {
        if let Some(index) = name.find(")/") {
            name = &name[index + 2..];
        }
    }

    let path = Path::new(name);
    if path.is_absolute() {
        path_clean::clean(path)
    } else {
        path_clean::clean(root.join(path))
    }
}
