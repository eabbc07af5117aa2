//! Splitting source text into documentation/code sections.
//!
//! Two strategies share one accumulator: a line-oriented one for languages
//! whose comments are line prefixes, and a block one for languages whose
//! documentation lives in `/* ... */` comments.

use crate::{CommentStyle, LanguageDescriptor, Section};
use once_cell::sync::Lazy;
use regex::Regex;

const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";
const INTENSIFIER: char = '!';

static BLOCK_LINE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\* ?").expect("block prefix pattern is valid"));

/// Parse `source` into sections using the strategy `language` calls for.
pub fn parse_sections(source: &str, language: &LanguageDescriptor) -> Vec<Section> {
    match language.style {
        CommentStyle::Line => parse_lines(source, language),
        CommentStyle::Block => parse_blocks(source),
    }
}

/// Pending docs/code pair.
#[derive(Default)]
struct Accumulator {
    docs: String,
    code: String,
    has_code: bool,
}

impl Accumulator {
    fn push_code(&mut self, code: &str) {
        self.code.push_str(code);
        self.has_code = true;
    }

    /// Emit the pending pair if code has been seen since the last flush.
    fn flush_if_code(&mut self, sections: &mut Vec<Section>) {
        if self.has_code {
            sections.push(self.take());
        }
    }

    fn take(&mut self) -> Section {
        self.has_code = false;
        Section {
            docs_text: std::mem::take(&mut self.docs),
            code_text: std::mem::take(&mut self.code),
        }
    }
}

/// Line-oriented strategy: each comment line after code starts a new section.
///
/// Always yields at least one section, even for empty input.
pub fn parse_lines(source: &str, language: &LanguageDescriptor) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut pending = Accumulator::default();

    for line in source_lines(source) {
        if language.is_comment_line(line) {
            pending.flush_if_code(&mut sections);
            let text = language.strip_comment(line);
            pending.docs.push_str(text.strip_suffix('\r').unwrap_or(text));
            pending.docs.push('\n');
        } else {
            pending.push_code(line);
            pending.code.push('\n');
        }
    }

    sections.push(pending.take());
    sections
}

/// Lines of `source`; a final newline does not start another (empty) line.
fn source_lines(source: &str) -> impl Iterator<Item = &str> {
    let body = source.strip_suffix('\n').unwrap_or(source);
    let empty = source.is_empty();
    body.split('\n').filter(move |_| !empty)
}

/// Block strategy: each `/* ... */` comment after code starts a new section.
///
/// A `*` or `!` directly after the opener is consumed with it. An unterminated
/// comment at end of input keeps whatever prose was collected.
pub fn parse_blocks(source: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut pending = Accumulator::default();
    let mut rest = source;

    loop {
        let Some(open) = rest.find(BLOCK_OPEN) else {
            if !rest.is_empty() {
                pending.push_code(rest);
            }
            break;
        };

        if open > 0 {
            pending.push_code(&rest[..open]);
        }
        pending.flush_if_code(&mut sections);

        rest = &rest[open + BLOCK_OPEN.len()..];
        if !rest.starts_with(BLOCK_CLOSE)
            && let Some(marker @ ('*' | INTENSIFIER)) = rest.chars().next()
        {
            if marker == INTENSIFIER {
                log::trace!(
                    "intensified comment at byte {}",
                    source.len() - rest.len() - BLOCK_OPEN.len()
                );
            }
            rest = &rest[marker.len_utf8()..];
        }

        match rest.find(BLOCK_CLOSE) {
            Some(close) => {
                pending.docs.push_str(&strip_block_prefixes(&rest[..close]));
                rest = &rest[close + BLOCK_CLOSE.len()..];
                let line_break = if rest.starts_with("\r\n") {
                    "\r\n"
                } else if rest.starts_with('\n') {
                    "\n"
                } else {
                    ""
                };
                pending.docs.push_str(line_break);
                rest = &rest[line_break.len()..];
            }
            None => {
                pending.docs.push_str(&strip_block_prefixes(rest));
                break;
            }
        }
    }

    sections.push(pending.take());
    sections
}

/// Strip conventional ` * ` gutters from every line of a comment body.
///
/// The opener's own line also loses the single space that follows `/**`, and
/// the indentation in front of a closer on its own line is dropped.
fn strip_block_prefixes(body: &str) -> String {
    let body = body.strip_prefix(' ').unwrap_or(body);
    let body = match body.rfind('\n') {
        Some(newline) if body[newline + 1..].trim().is_empty() => &body[..=newline],
        _ => body,
    };
    BLOCK_LINE_PREFIX.replace_all(body, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_registry;

    fn python() -> &'static LanguageDescriptor {
        default_registry().get("py").unwrap()
    }

    fn javascript() -> &'static LanguageDescriptor {
        default_registry().get("js").unwrap()
    }

    #[test]
    fn alternating_line_comments() {
        let sections = parse_lines("# hello\ncode1\n# world\ncode2\n", python());
        assert_eq!(
            sections,
            vec![
                Section::new("hello\n", "code1\n"),
                Section::new("world\n", "code2\n"),
            ]
        );
    }

    #[test]
    fn consecutive_comment_lines_share_a_section() {
        let sections = parse_lines("# one\n#two\n#\nx = 1\ny = 2\n", python());
        assert_eq!(sections, vec![Section::new("one\ntwo\n\n", "x = 1\ny = 2\n")]);
    }

    #[test]
    fn leading_code_gets_an_empty_docs_section() {
        let sections = parse_lines("import os\n# doc\nrun()\n", python());
        assert_eq!(
            sections,
            vec![Section::new("", "import os\n"), Section::new("doc\n", "run()\n")]
        );
    }

    #[test]
    fn trailing_comment_yields_empty_final_code() {
        let sections = parse_lines("x = 1\n# the end\n", python());
        assert_eq!(
            sections,
            vec![Section::new("", "x = 1\n"), Section::new("the end\n", "")]
        );
    }

    #[test]
    fn empty_input_yields_one_empty_section() {
        assert_eq!(parse_lines("", python()), vec![Section::default()]);
        assert_eq!(parse_blocks(""), vec![Section::default()]);
    }

    #[test]
    fn shebang_is_code() {
        let sections = parse_lines("#!/usr/bin/env python\n# doc\nmain()\n", python());
        assert_eq!(
            sections,
            vec![
                Section::new("", "#!/usr/bin/env python\n"),
                Section::new("doc\n", "main()\n"),
            ]
        );
    }

    #[test]
    fn interpolation_is_code() {
        let coffee = default_registry().get("coffee").unwrap();
        let sections = parse_lines("# greet\n  #{name}\n", coffee);
        assert_eq!(sections, vec![Section::new("greet\n", "  #{name}\n")]);
    }

    #[test]
    fn crlf_is_kept_in_code_and_dropped_from_docs() {
        let sections = parse_lines("# doc\r\ncode\r\n", python());
        assert_eq!(sections, vec![Section::new("doc\n", "code\r\n")]);
    }

    #[test]
    fn code_lines_survive_regrouping() {
        let source = "#!/bin/sh\n# a\none\n\ntwo\n# b\n# c\nthree\n";
        let language = python();
        let sections = parse_lines(source, language);
        assert_eq!(sections.len(), 3);

        let joined = sections
            .iter()
            .map(|s| s.code_text.as_str())
            .collect::<Vec<_>>()
            .join(&language.divider_text);
        let rebuilt = joined.replace(&language.divider_text, "");
        let expected: String = source
            .lines()
            .filter(|line| !language.is_comment_line(line))
            .map(|line| format!("{line}\n"))
            .collect();
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn one_line_doc_comment() {
        let sections = parse_blocks("/** doc */\ncodeA\n");
        assert_eq!(sections, vec![Section::new("doc \n", "codeA\n")]);
    }

    #[test]
    fn block_gutters_are_stripped() {
        let source = "/**\n * First line.\n *\n *     indented\n */\nvar a = 1;\n";
        let sections = parse_blocks(source);
        assert_eq!(
            sections,
            vec![Section::new(
                "\nFirst line.\n\n    indented\n\n",
                "var a = 1;\n"
            )]
        );
    }

    #[test]
    fn code_between_blocks_splits_sections() {
        let source = "/* a */\nfoo();\n/* b */\nbar();\n";
        let sections = parse_blocks(source);
        assert_eq!(
            sections,
            vec![Section::new("a \n", "foo();\n"), Section::new("b \n", "bar();\n")]
        );
    }

    #[test]
    fn adjacent_blocks_accumulate() {
        let sections = parse_blocks("/* a */\n/* b */\ncode();\n");
        assert_eq!(sections, vec![Section::new("a \nb \n", "code();\n")]);
    }

    #[test]
    fn intensifier_is_consumed_with_opener() {
        let sections = parse_blocks("/*! License */\nx();\n");
        assert_eq!(sections, vec![Section::new("License \n", "x();\n")]);
    }

    #[test]
    fn empty_block_comment() {
        let sections = parse_blocks("/**/x();\n");
        assert_eq!(sections, vec![Section::new("", "x();\n")]);
    }

    #[test]
    fn line_comments_are_code_in_block_strategy() {
        let sections = parse_sections("// not docs\nrun();\n", javascript());
        assert_eq!(sections, vec![Section::new("", "// not docs\nrun();\n")]);
    }

    #[test]
    fn unterminated_block_keeps_prose() {
        let sections = parse_blocks("code();\n/**\n * dangling\n * prose");
        assert_eq!(
            sections,
            vec![
                Section::new("", "code();\n"),
                Section::new("\ndangling\nprose", ""),
            ]
        );
    }

    #[test]
    fn code_on_closer_line_is_preserved() {
        let sections = parse_blocks("/* a */ let x = 1;\n");
        assert_eq!(sections, vec![Section::new("a ", " let x = 1;\n")]);
    }

    #[test]
    fn dispatches_on_style() {
        assert_eq!(
            parse_sections("# doc\nx\n", python()),
            vec![Section::new("doc\n", "x\n")]
        );
        assert_eq!(
            parse_sections("/* doc */\nx\n", javascript()),
            vec![Section::new("doc \n", "x\n")]
        );
    }
}
