//! Flat output naming: `lib/example.js` becomes `<out>/example.html`.
//!
//! Sources with the same file stem in different directories map to the same
//! page. Which content ends up there is unspecified, and when such files are
//! documented concurrently their writes may interleave.

use std::path::{Path, PathBuf};

/// File name of the page generated for `source`.
///
/// # Examples
///
/// ```
/// use litdoc_page::page_file_name;
/// use std::path::Path;
///
/// assert_eq!(page_file_name(Path::new("lib/example.js")), "example.html");
/// ```
pub fn page_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    format!("{stem}.html")
}

/// Path of the page generated for `source` inside `output_dir`.
pub fn destination(output_dir: &Path, source: &Path) -> PathBuf {
    output_dir.join(page_file_name(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directory_and_extension() {
        assert_eq!(page_file_name(Path::new("src/deep/tool.py")), "tool.html");
        assert_eq!(page_file_name(Path::new("notes.tar.tex")), "notes.tar.html");
    }

    #[test]
    fn joins_output_dir() {
        assert_eq!(
            destination(Path::new("docs"), Path::new("lib/example.js")),
            PathBuf::from("docs/example.html")
        );
    }

    #[test]
    fn same_stem_collides() {
        let out = Path::new("docs");
        assert_eq!(
            destination(out, Path::new("a/util.rb")),
            destination(out, Path::new("b/util.rb"))
        );
    }
}
