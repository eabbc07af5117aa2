#![deny(missing_docs)]
//! litdoc page assembly: typed page records, HTML rendering, and output naming.

/// Output file naming.
pub mod destination;
/// Page record and HTML renderer.
pub mod page;

pub use destination::{destination, page_file_name};
pub use page::{Page, render_page};

/// File name of the stylesheet every page links to.
pub const STYLESHEET_NAME: &str = "litdoc.css";

/// Stylesheet written once into the output directory.
pub const STYLESHEET: &str = include_str!("../assets/litdoc.css");
