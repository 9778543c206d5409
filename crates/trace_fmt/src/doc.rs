//! Documentation-comment annotation.
//!
//! Turns a raw doc-comment block (`/** ... */`, or `///` lines) into
//! structured lines: tag lines split into tag / type / variable /
//! description, and free text with bare URLs recognised as links.
//!
//! The result holds raw text only. Renderers escape every span before
//! wrapping it in markup, so no markup-unsafe character reaches the output
//! unescaped and description text is never rewritten here.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Tags whose first argument is a type.
const TYPED_TAGS: [&str; 6] = [
    "@param",
    "@return",
    "@returns",
    "@throws",
    "@var",
    "@property",
];

/// Line prefixes of comment bodies.
const GUTTERS: [&str; 3] = ["///", "//!", "*"];

/// A piece of free text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocSpan {
    Text(String),
    /// Bare `http(s)://` URL.
    Link(String),
}

/// A `@tag` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocTag {
    /// Tag including the `@`.
    pub tag: String,
    pub ty: Option<String>,
    /// `$`-prefixed variable name.
    pub variable: Option<String>,
    pub description: Vec<DocSpan>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocLine {
    Text(Vec<DocSpan>),
    Tag(DocTag),
}

/// Annotated documentation comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocComment {
    pub lines: Vec<DocLine>,
}

impl DocComment {
    /// Parse a raw comment block. Never fails; unrecognised input becomes
    /// plain text lines.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw
            .replace('\t', "    ")
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        let mut body: Vec<&str> = normalized.split('\n').map(strip_decoration).collect();

        while body.first().is_some_and(|l| l.trim().is_empty()) {
            body.remove(0);
        }
        while body.last().is_some_and(|l| l.trim().is_empty()) {
            body.pop();
        }

        DocComment {
            lines: body.into_iter().map(parse_line).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for DocComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match line {
                DocLine::Text(spans) => write_spans(f, spans)?,
                DocLine::Tag(tag) => {
                    f.write_str(&tag.tag)?;
                    for part in [&tag.ty, &tag.variable].into_iter().flatten() {
                        write!(f, " {part}")?;
                    }
                    if !tag.description.is_empty() {
                        f.write_str(" ")?;
                        write_spans(f, &tag.description)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn write_spans(f: &mut fmt::Formatter<'_>, spans: &[DocSpan]) -> fmt::Result {
    for span in spans {
        match span {
            DocSpan::Text(t) | DocSpan::Link(t) => f.write_str(t)?,
        }
    }
    Ok(())
}

/// Remove comment openers, closers and the leading `*` / `///` gutter.
fn strip_decoration(line: &str) -> &str {
    let line = line.trim();
    let opener = line.strip_prefix("/**");
    let opened = opener.is_some();
    let mut line = opener.unwrap_or(line);
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest.trim_end();
    }

    if !opened {
        if let Some(rest) = GUTTERS.iter().find_map(|g| line.strip_prefix(g)) {
            line = rest;
        }
    }
    line.strip_prefix(' ').unwrap_or(line)
}

fn parse_line(line: &str) -> DocLine {
    let Some(caps) = tag_regex().captures(line) else {
        return DocLine::Text(link_spans(line));
    };
    let tag = caps.get(1).map_or("", |m| m.as_str()).to_string();
    let mut rest = caps.get(2).map_or("", |m| m.as_str());

    let mut ty = None;
    if TYPED_TAGS.contains(&tag.as_str()) {
        if let Some((word, tail)) = next_word(rest) {
            if !word.starts_with('$') {
                ty = Some(word.to_string());
                rest = tail;
            }
        }
    }

    let mut variable = None;
    if let Some((word, tail)) = next_word(rest) {
        if word.starts_with('$') {
            variable = Some(word.to_string());
            rest = tail;
        }
    }

    DocLine::Tag(DocTag {
        tag,
        ty,
        variable,
        description: link_spans(rest.trim_start()),
    })
}

/// Split off the first whitespace-delimited word.
fn next_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn link_spans(text: &str) -> Vec<DocSpan> {
    let mut spans = Vec::new();
    let mut last = 0;
    for m in url_regex().find_iter(text) {
        if m.start() > last {
            spans.push(DocSpan::Text(text[last..m.start()].to_string()));
        }
        spans.push(DocSpan::Link(m.as_str().to_string()));
        last = m.end();
    }
    if last < text.len() {
        spans.push(DocSpan::Text(text[last..].to_string()));
    }
    spans
}

#[allow(clippy::expect_used, reason = "static pattern")]
fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| Regex::new(r"^\s*(@\S+)(.*)$").expect("valid tag regex"))
}

#[allow(clippy::expect_used, reason = "static pattern")]
fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("valid url regex"))
}
