//! Side-by-side documentation page rendering.

use crate::STYLESHEET_NAME;
use html_escape::{encode_double_quoted_attribute, encode_text};
use litdoc_core::HighlightedSection;
use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

/// Everything needed to render one documentation page.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    /// Page title, normally the source file name.
    pub title: &'a str,
    /// Highlighted sections in source order.
    pub sections: &'a [HighlightedSection],
    /// Every source in this run, for the navigation menu.
    pub sources: &'a [PathBuf],
}

/// Render `page` to a complete HTML document.
///
/// `naming` maps a source path to the href of its generated page. The
/// "Jump To" menu is only emitted when the run covers more than one source.
pub fn render_page(page: &Page<'_>, naming: impl Fn(&Path) -> String) -> String {
    let title = encode_text(page.title);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    let _ = writeln!(html, "  <title>{title}</title>");
    html.push_str("  <meta http-equiv=\"content-type\" content=\"text/html; charset=UTF-8\">\n");
    let _ = writeln!(
        html,
        "  <link rel=\"stylesheet\" media=\"all\" href=\"{STYLESHEET_NAME}\" />"
    );
    html.push_str("</head>\n<body>\n<div id=\"container\">\n  <div id=\"background\"></div>\n");

    if page.sources.len() > 1 {
        write_jump_menu(&mut html, page.sources, &naming);
    }

    html.push_str("  <table cellpadding=\"0\" cellspacing=\"0\">\n    <thead>\n      <tr>\n");
    let _ = writeln!(html, "        <th class=\"docs\"><h1>{title}</h1></th>");
    html.push_str("        <th class=\"code\"></th>\n      </tr>\n    </thead>\n    <tbody>\n");

    for (index, section) in page.sections.iter().enumerate() {
        let anchor = index + 1;
        let _ = writeln!(html, "      <tr id=\"section-{anchor}\">");
        html.push_str("        <td class=\"docs\">\n          <div class=\"pilwrap\">\n");
        let _ = writeln!(
            html,
            "            <a class=\"pilcrow\" href=\"#section-{anchor}\">&#182;</a>"
        );
        html.push_str("          </div>\n");
        html.push_str(&section.docs_html);
        html.push_str("\n        </td>\n        <td class=\"code\">\n");
        html.push_str(&section.code_html);
        html.push_str("\n        </td>\n      </tr>\n");
    }

    html.push_str("    </tbody>\n  </table>\n</div>\n</body>\n</html>\n");
    html
}

fn write_jump_menu(html: &mut String, sources: &[PathBuf], naming: &impl Fn(&Path) -> String) {
    html.push_str("  <div id=\"jump_to\">\n    Jump To &hellip;\n    <div id=\"jump_wrapper\">\n");
    html.push_str("      <div id=\"jump_page\">\n");
    for source in sources {
        let label = source
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "        <a class=\"source\" href=\"{}\">{}</a>",
            encode_double_quoted_attribute(&naming(source)),
            encode_text(&label)
        );
    }
    html.push_str("      </div>\n    </div>\n  </div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_file_name;

    fn section(docs_html: &str, code_html: &str) -> HighlightedSection {
        HighlightedSection {
            docs_text: String::new(),
            code_text: String::new(),
            docs_html: docs_html.to_string(),
            code_html: code_html.to_string(),
        }
    }

    #[test]
    fn one_row_per_section_in_order() {
        let sections = vec![
            section("<p>first</p>", "<pre>a</pre>"),
            section("<p>second</p>", "<pre>b</pre>"),
        ];
        let sources = vec![PathBuf::from("lib/one.py")];
        let html = render_page(
            &Page {
                title: "one.py",
                sections: &sections,
                sources: &sources,
            },
            page_file_name,
        );

        let first = html.find("<p>first</p>").unwrap();
        let second = html.find("<p>second</p>").unwrap();
        assert!(first < second);
        assert!(html.contains("<tr id=\"section-1\">"));
        assert!(html.contains("<a class=\"pilcrow\" href=\"#section-2\">&#182;</a>"));
        assert!(html.contains("<h1>one.py</h1>"));
        assert!(html.contains("href=\"litdoc.css\""));
        assert!(!html.contains("jump_to"));
    }

    #[test]
    fn jump_menu_lists_every_source() {
        let sources = vec![PathBuf::from("lib/a.py"), PathBuf::from("src/b.js")];
        let html = render_page(
            &Page {
                title: "a.py",
                sections: &[],
                sources: &sources,
            },
            page_file_name,
        );
        let links = html
            .lines()
            .filter(|line| line.contains("class=\"source\""))
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" | ");
        insta::assert_snapshot!(
            links,
            @r#"<a class="source" href="a.html">a.py</a> | <a class="source" href="b.html">b.js</a>"#
        );
    }

    #[test]
    fn title_is_escaped() {
        let html = render_page(
            &Page {
                title: "<odd>.py",
                sections: &[],
                sources: &[],
            },
            page_file_name,
        );
        assert!(html.contains("<title>&lt;odd&gt;.py</title>"));
    }
}
