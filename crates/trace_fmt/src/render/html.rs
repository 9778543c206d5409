//! HTML table renderer.
//!
//! Produces one `<tr>` per frame. Columns, in order: path, file, line,
//! namespace, class, call type, function, parameter summary, then one cell
//! per argument. Rows with fewer arguments than the widest frame are padded
//! with empty cells so the grid stays rectangular.
//!
//! Expandable content (array entries, long strings, documentation) is
//! emitted inside `hidden` wrappers; the page stylesheet and script that
//! toggle them are outside this crate.

use std::fmt::Write;

use trace_ir::{split_qualified, NAMESPACE_SEPARATORS};

use crate::config::ResolvedConfig;
use crate::doc::{DocComment, DocLine, DocSpan};
use crate::format::{ArgNode, ArgRow};
use crate::pipeline::{FrameRecord, Renderer, TraceSummary};
use crate::truncate::TruncatedString;

use super::{escape_html, relativize};

/// Omitted-content marker.
const ETC: &str = r#"<span class="etc">...</span>"#;
/// Opening and closing string quote.
const PRIME: &str = "<span>&prime;</span>";
/// Filler for missing argument columns.
const EMPTY_ARG: &str = r#"<td class="trace_args"></td>"#;
/// Hidden wrapper around expandable argument detail.
const TOOLTIP_OPEN: &str = r#"<div class="tooltip_wrap hidden">"#;

/// Renders a trace as an HTML table.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlTableRenderer;

impl HtmlTableRenderer {
    pub fn new() -> Self {
        HtmlTableRenderer
    }
}

impl Renderer for HtmlTableRenderer {
    fn completion(
        &mut self,
        config: &ResolvedConfig,
        records: &[FrameRecord],
        summary: &TraceSummary,
    ) -> String {
        let mut out = String::from("<table>");
        for record in records {
            out.push_str("<tr>");
            file_cells(&mut out, &record.file, config);
            line_cell(&mut out, record.line);
            class_cells(&mut out, record, config);
            function_cells(&mut out, record);

            let args = record.args.as_deref().unwrap_or(&[]);
            for column in 0..summary.max_args {
                match args.get(column) {
                    Some(node) => arg_cell(&mut out, node),
                    None => out.push_str(EMPTY_ARG),
                }
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
        out
    }
}

/// Directory cell and file-name cell.
fn file_cells(out: &mut String, file: &str, config: &ResolvedConfig) {
    if file.is_empty() {
        out.push_str(r#"<td class="trace_path"></td><td class="trace_file"></td>"#);
        return;
    }

    let file = file.replace('\\', "/");
    let (dir, name) = match file.rfind('/') {
        Some(at) => (&file[..at], &file[at + 1..]),
        None => ("", file.as_str()),
    };
    let dir = relativize(dir, &config.app_root_path);

    let dir_html = match config.highlight_prefix.as_deref() {
        Some(prefix) => highlight_path(dir, prefix),
        None => escape_html(dir),
    };
    let name = escape_html(name);

    let _ = write!(out, r#"<td class="trace_path">{dir_html}</td>"#);
    let _ = write!(out, r#"<td class="trace_file">/{name}</td>"#);
}

/// Wrap the package segment that follows a vendor prefix.
fn highlight_path(dir: &str, prefix: &str) -> String {
    let Some(rest) = dir.strip_prefix(prefix) else {
        return escape_html(dir);
    };
    let (segment, tail) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    if segment.is_empty() {
        return escape_html(dir);
    }

    let prefix = escape_html(prefix);
    let segment = escape_html(segment);
    let tail = escape_html(tail);
    format!(r#"<span class="highlight" title="{prefix}">{segment}</span>{tail}"#)
}

fn line_cell(out: &mut String, line: u32) {
    if line == 0 {
        out.push_str(r#"<td class="trace_line"></td>"#);
    } else {
        let _ = write!(out, r#"<td class="trace_line">{line}</td>"#);
    }
}

/// Namespace, class and call-type cells.
fn class_cells(out: &mut String, record: &FrameRecord, config: &ResolvedConfig) {
    let (namespace, short_name) = split_qualified(&record.class);

    let space = match config.highlight_namespace.as_deref() {
        Some(root) => highlight_namespace(namespace, root),
        None => escape_html(namespace),
    };

    let mut class = escape_html(short_name);
    if let Some(doc) = &record.class_doc {
        doc_popup(&mut class, &record.class, doc);
    }
    let call_type = escape_html(record.call_type.as_str());

    let _ = write!(out, r#"<td class="trace_name_space">{space}</td>"#);
    let _ = write!(out, r#"<td class="trace_class">{class}</td>"#);
    let _ = write!(out, r#"<td class="trace_call_type">{call_type}</td>"#);
}

/// Wrap a leading namespace root: `root` followed by a namespace separator.
fn highlight_namespace(namespace: &str, root: &str) -> String {
    let Some(rest) = namespace.strip_prefix(root) else {
        return escape_html(namespace);
    };
    if !NAMESPACE_SEPARATORS.iter().any(|sep| rest.starts_with(sep)) {
        return escape_html(namespace);
    }

    let (root, rest) = (escape_html(root), escape_html(rest));
    format!(r#"<span class="highlight_space">{root}</span>{rest}"#)
}

/// Function cell (with documentation popup) and parameter summary cell.
fn function_cells(out: &mut String, record: &FrameRecord) {
    let mut function = escape_html(&record.function);
    if !record.signature.doc_text.is_empty() {
        let doc = DocComment::parse(&record.signature.doc_text);
        if !doc.is_empty() {
            doc_popup(&mut function, &record.function, &doc);
        }
    }
    let params = escape_html(&record.signature.param_summary);

    let _ = write!(out, r#"<td class="trace_function">{function}</td>"#);
    let _ = write!(out, r#"<td class="trace_function_params">{params}</td>"#);
}

/// Append the `*` marker and hidden documentation window.
fn doc_popup(out: &mut String, title: &str, doc: &DocComment) {
    let title = escape_html(title);
    let body = doc_html(doc);

    out.push_str(r#"<span class="doc">*</span><div class="doc_wrap hidden">"#);
    out.push_str(r#"<div class="doc_window">"#);
    let _ = write!(out, r#"<div class="doc_data">{title}</div>"#);
    let _ = write!(out, r#"<div class="doc_text">{body}</div></div></div>"#);
}

/// Render an annotated doc comment. Every span is escaped before markup is
/// added around it.
fn doc_html(doc: &DocComment) -> String {
    let mut out = String::new();
    for (i, line) in doc.lines.iter().enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        match line {
            DocLine::Text(spans) => doc_spans(&mut out, spans),
            DocLine::Tag(tag) => {
                let name = escape_html(&tag.tag);
                let _ = write!(out, r#"<span class="doc_tag">{name}</span>"#);
                if let Some(ty) = &tag.ty {
                    let ty = escape_html(ty);
                    let _ = write!(out, r#" <span class="doc_type">{ty}</span>"#);
                }
                if let Some(var) = &tag.variable {
                    let var = escape_html(var);
                    let _ = write!(out, r#" <span class="doc_var">{var}</span>"#);
                }
                if !tag.description.is_empty() {
                    out.push(' ');
                    doc_spans(&mut out, &tag.description);
                }
            }
        }
    }
    out
}

fn doc_spans(out: &mut String, spans: &[DocSpan]) {
    for span in spans {
        match span {
            DocSpan::Text(text) => out.push_str(&keep_spaces(&escape_html(text))),
            DocSpan::Link(url) => {
                let url = escape_html(url);
                let _ = write!(
                    out,
                    r#"<a href="{url}" class="doc_href" target="_blank">{url}</a>"#
                );
            }
        }
    }
}

/// Turn every second space of a run into `&nbsp;` so runs survive HTML
/// whitespace collapsing while still allowing line wrapping.
fn keep_spaces(escaped: &str) -> String {
    escaped.replace("  ", " &nbsp;")
}

/// Visible markers for line breaks; `suffix` follows each marker.
fn mark_line_breaks(escaped: &str, suffix: &str) -> String {
    let marker = |brk: &str| format!(r#"<span class="string_quotes">{brk}{suffix}</span>"#);
    escaped
        .replace("\r\n", &marker(r"\r\n"))
        .replace('\n', &marker(r"\n"))
        .replace('\r', &marker(r"\r"))
}

fn arg_cell(out: &mut String, node: &ArgNode) {
    match node {
        ArgNode::Str(s) => string_cell(out, s),
        ArgNode::Numeric(n) => {
            let n = escape_html(n);
            let _ = write!(out, r#"<td class="trace_args numeric">{n}</td>"#);
        }
        ArgNode::Bool(b) => {
            let _ = write!(out, r#"<td class="trace_args bool">{b}</td>"#);
        }
        ArgNode::Null => out.push_str(r#"<td class="trace_args bool">null</td>"#),
        ArgNode::Array { len, rows } => {
            let _ = write!(out, r#"<td class="trace_args array tooltip">array[{len}]"#);
            out.push_str(TOOLTIP_OPEN);
            rows_table(out, rows);
            out.push_str("</div></td>");
        }
        ArgNode::Elided => {
            let _ = write!(out, r#"<td class="trace_args">{ETC}</td>"#);
        }
        ArgNode::Callable { name, detail } => {
            let name = escape_html(name);
            let _ = write!(out, r#"<td class="trace_args callable">{name}"#);
            if let Some(rows) = detail {
                out.push_str(TOOLTIP_OPEN);
                rows_table(out, rows);
                out.push_str("</div>");
            }
            out.push_str("</td>");
        }
        ArgNode::Object {
            namespace,
            short_name,
            doc,
        } => {
            let mut class = escape_html(short_name);
            if let Some(doc) = doc {
                doc_popup(&mut class, &format!("{namespace}{short_name}"), doc);
            }
            let space = escape_html(namespace);
            out.push_str(r#"<td class="trace_args">"#);
            let _ = write!(out, r#"<span class="trace_name_space">{space}</span>"#);
            let _ = write!(out, r#"<span class="trace_class">{class}</span></td>"#);
        }
        ArgNode::Resource { label, metadata } => {
            let label = escape_html(label);
            let _ = write!(out, r#"<td class="trace_args resource tooltip">{label}"#);
            out.push_str(TOOLTIP_OPEN);
            rows_table(out, metadata);
            out.push_str("</div></td>");
        }
        ArgNode::ClosedResource { label } => {
            let label = escape_html(label);
            let _ = write!(out, r#"<td class="trace_args resource tooltip">{label}"#);
            out.push_str(TOOLTIP_OPEN);
            out.push_str("</div></td>");
        }
        ArgNode::Other { type_name } => {
            let type_name = escape_html(type_name);
            let _ = write!(out, r#"<td class="trace_args">{type_name}</td>"#);
        }
    }
}

/// Nested key/value table for expanded containers.
fn rows_table(out: &mut String, rows: &[ArgRow]) {
    out.push_str("<table>");
    for row in rows {
        let key = escape_html(&row.key).replace(char::is_whitespace, "&nbsp;");
        let _ = write!(out, "<tr><td>{key}</td>");
        arg_cell(out, &row.value);
        out.push_str("</tr>");
    }
    out.push_str("</table>");
}

/// String cell: length badge, inline text, and the expanded view when the
/// inline text was cut.
fn string_cell(out: &mut String, s: &TruncatedString) {
    let inline = mark_line_breaks(&escape_html(&s.inline).replace(' ', "&nbsp;"), "");
    let len = s.original_len;

    let Some(tooltip) = &s.tooltip else {
        out.push_str(r#"<td class="trace_args string">"#);
        let _ = write!(out, "<span>{len}&prime;</span>{inline}{PRIME}</td>");
        return;
    };

    let tooltip = mark_line_breaks(&keep_spaces(&escape_html(tooltip)), "<br>");
    let tooltip_end = if s.tooltip_truncated { ETC } else { "" };
    out.push_str(r#"<td class="trace_args string tooltip">"#);
    let _ = write!(out, "<span>{len}&prime;</span>{inline}{ETC}{PRIME}");
    out.push_str(r#"<div class="tooltip_wrap hidden string">"#);
    let _ = write!(out, "{PRIME}{tooltip}{tooltip_end}{PRIME}</div></td>");
}
