//! Lexical scanners used to cut definitions out of raw source text.
//!
//! These are deliberately shallow: they know how each language spells strings and
//! comments, and otherwise only count brackets or compare indentation.

use regex::Regex;

/// How a language spells comments and string literals
#[derive(Debug, Clone, Copy)]
pub(crate) struct Syntax {
    line_comment: &'static str,
    block_comments: bool,
    triple_quotes: bool,
    backticks: bool,
}

pub(crate) const C_LIKE: Syntax = Syntax {
    line_comment: "//",
    block_comments: true,
    triple_quotes: false,
    backticks: false,
};

pub(crate) const SCRIPT: Syntax = Syntax {
    line_comment: "//",
    block_comments: true,
    triple_quotes: false,
    backticks: true,
};

pub(crate) const PYTHON: Syntax = Syntax {
    line_comment: "#",
    block_comments: false,
    triple_quotes: true,
    backticks: false,
};

/// Compile a per-symbol pattern; symbol names are escaped by the callers.
pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            log::debug!("Skipping invalid pattern {pattern:?}: {err}");
            None
        }
    }
}

/// If a comment or string literal starts at `i`, return the index just past it.
/// Line comments stop before their newline.
fn skip_trivia(bytes: &[u8], i: usize, syntax: Syntax) -> Option<usize> {
    let rest = &bytes[i..];
    if rest.starts_with(syntax.line_comment.as_bytes()) {
        return Some(find_byte(bytes, i, b'\n').unwrap_or(bytes.len()));
    }
    if syntax.block_comments && rest.starts_with(b"/*") {
        return Some(
            find_seq(bytes, i + 2, b"*/")
                .map(|end| end + 2)
                .unwrap_or(bytes.len()),
        );
    }
    if syntax.triple_quotes && (rest.starts_with(b"\"\"\"") || rest.starts_with(b"'''")) {
        let quote = &rest[..3];
        return Some(
            find_seq(bytes, i + 3, quote)
                .map(|end| end + 3)
                .unwrap_or(bytes.len()),
        );
    }

    let quote = rest[0];
    if quote == b'"' || quote == b'\'' || (syntax.backticks && quote == b'`') {
        let mut j = i + 1;
        while j < bytes.len() {
            match bytes[j] {
                b'\\' => j += 2,
                c if c == quote => return Some(j + 1),
                // unterminated literal: give the newline back to the caller
                b'\n' if quote != b'`' => return Some(j),
                _ => j += 1,
            }
        }
        return Some(bytes.len());
    }
    None
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| b == needle)
        .map(|pos| from + pos)
}

fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

/// Start of the line containing `pos`
pub(crate) fn line_start(src: &str, pos: usize) -> usize {
    src[..pos].rfind('\n').map(|idx| idx + 1).unwrap_or(0)
}

/// End of a brace-delimited definition whose header starts at `from`.
///
/// Returns the index just past the closing brace, or `None` when a `;` ends the
/// header first (a declaration) or the braces never balance.
pub(crate) fn brace_block_end(src: &str, from: usize, syntax: Syntax) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut i = from;
    let mut parens = 0i32;

    loop {
        if i >= bytes.len() {
            return None;
        }
        if let Some(next) = skip_trivia(bytes, i, syntax) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'(' | b'[' => parens += 1,
            b')' | b']' => parens -= 1,
            b';' if parens <= 0 => return None,
            b'{' if parens <= 0 => break,
            _ => {}
        }
        i += 1;
    }

    let mut depth = 0usize;
    while i < bytes.len() {
        if let Some(next) = skip_trivia(bytes, i, syntax) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Extend `end` over a directly following `;` (C++ `class X { ... };`).
pub(crate) fn consume_semicolon(src: &str, end: usize) -> usize {
    let rest = &src[end..];
    let trimmed = rest.trim_start_matches([' ', '\t']);
    if trimmed.starts_with(';') {
        end + (rest.len() - trimmed.len()) + 1
    } else {
        end
    }
}

/// End of the statement starting at `from`: the first newline outside brackets,
/// or (when `semicolons` is set) the first `;` outside brackets, inclusive.
pub(crate) fn statement_end(src: &str, from: usize, syntax: Syntax, semicolons: bool) -> usize {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = from;

    while i < bytes.len() {
        if let Some(next) = skip_trivia(bytes, i, syntax) {
            i = next;
            continue;
        }
        match bytes[i] {
            // line continuation or escaped character
            b'\\' => {
                i += 2;
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            }
            b';' if depth == 0 && semicolons => return i + 1,
            b'\n' if depth == 0 => return i,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// End of a Python `def`/`class` whose keyword starts at `header_start`.
///
/// The header may span several lines inside brackets. The body is every following
/// line indented deeper than the header; blank and comment lines only count when a
/// deeper line follows them.
pub(crate) fn indented_block_end(src: &str, header_start: usize) -> usize {
    let bytes = src.as_bytes();
    let indent = header_start - line_start(src, header_start);
    let mut depth = 0usize;
    let mut i = header_start;

    loop {
        if i >= bytes.len() {
            return bytes.len();
        }
        if let Some(next) = skip_trivia(bytes, i, PYTHON) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b':' if depth == 0 => break,
            b'\n' if depth == 0 => return i,
            _ => {}
        }
        i += 1;
    }

    let header_end = find_byte(bytes, i, b'\n').unwrap_or(bytes.len());
    let inline = src[i + 1..header_end].trim();
    if !inline.is_empty() && !inline.starts_with('#') {
        return header_end;
    }

    let mut end = header_end;
    let mut pos = header_end + 1;
    let mut open_quote: Option<&str> = None;
    while pos < bytes.len() {
        let line_end = find_byte(bytes, pos, b'\n').unwrap_or(bytes.len());
        let line = &src[pos..line_end];

        if let Some(quote) = open_quote {
            end = line_end;
            if line.matches(quote).count() % 2 == 1 {
                open_quote = None;
            }
            pos = line_end + 1;
            continue;
        }

        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            pos = line_end + 1;
            continue;
        }
        if line.len() - trimmed.len() <= indent {
            break;
        }

        end = line_end;
        open_quote = ["\"\"\"", "'''"]
            .into_iter()
            .find(|quote| line.matches(quote).count() % 2 == 1);
        pos = line_end + 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn brace_block_skips_strings_and_comments() {
        let src = "function f(a = {}) {\n  const s = \"}\"; // }\n  /* { */\n  return a;\n}\nrest";
        let end = brace_block_end(src, 0, SCRIPT).unwrap();
        assert_eq!(&src[end..], "\nrest");
    }

    #[test]
    fn brace_block_rejects_declarations() {
        assert_eq!(brace_block_end("class Widget;\nclass Other {}", 0, C_LIKE), None);
        assert_eq!(brace_block_end("int area(int w);", 0, C_LIKE), None);
    }

    #[test]
    fn brace_block_unbalanced_is_none() {
        assert_eq!(brace_block_end("class A {\n  {\n", 0, C_LIKE), None);
    }

    #[test]
    fn trailing_semicolon_is_consumed() {
        let src = "struct P { int x; };\nint y;";
        let end = brace_block_end(src, 0, C_LIKE).unwrap();
        let end = consume_semicolon(src, end);
        assert_eq!(&src[..end], "struct P { int x; };");
    }

    #[test]
    fn statement_end_spans_brackets() {
        let src = "const cfg = {\n  a: 1,\n  b: [2, 3]\n};\nconst next = 1;";
        let end = statement_end(src, 0, SCRIPT, true);
        assert_eq!(&src[..end], "const cfg = {\n  a: 1,\n  b: [2, 3]\n};");

        let py = "LIMIT = 3  # comment\nOTHER = 4";
        let end = statement_end(py, 0, PYTHON, false);
        assert_eq!(&py[..end], "LIMIT = 3  # comment");
    }

    #[test]
    fn indented_block_follows_body() {
        let src = "def add(a,\n        b):\n    total = a + b\n\n    # done\n    return total\n\n\nx = 1\n";
        let end = indented_block_end(src, 0);
        assert_eq!(
            &src[..end],
            "def add(a,\n        b):\n    total = a + b\n\n    # done\n    return total"
        );
    }

    #[test]
    fn indented_block_keeps_docstrings_and_inline_bodies() {
        let src = "class A:\n    \"\"\"Doc\nat column zero\n    \"\"\"\n    x = 1\ny = 2\n";
        let end = indented_block_end(src, 0);
        assert_eq!(&src[..end], "class A:\n    \"\"\"Doc\nat column zero\n    \"\"\"\n    x = 1");

        let inline = "def one(): return 1\ndef two(): return 2\n";
        assert_eq!(&inline[..indented_block_end(inline, 0)], "def one(): return 1");
    }

    #[test]
    fn nested_method_stops_at_dedent() {
        let src = "class A:\n    def m(self):\n        return 1\n    def n(self):\n        return 2\n";
        let start = src.find("def m").unwrap();
        let end = indented_block_end(src, start);
        assert_eq!(&src[start..end], "def m(self):\n        return 1");
    }
}
