use crate::element::{BLOCK_ID, ElementBody, UiElement};

/// Elements written without a closing tag. Their text payload becomes `src`.
const VOID_TAGS: &[&str] = &["img"];

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOptions {
    /// One element per line, children indented by two spaces.
    pub pretty: bool,
}

/// Serialize rendered elements as HTML.
///
/// `className` becomes `class`, `data-block-id` is kept and `key` is dropped.
/// Text and attribute values are escaped so payloads display literally.
pub fn to_html(elements: &[UiElement], options: HtmlOptions) -> String {
    let mut out = String::new();
    for element in elements {
        write_element(&mut out, element, 0, options);
    }
    out
}

fn write_element(out: &mut String, element: &UiElement, depth: usize, options: HtmlOptions) {
    if options.pretty {
        indent(out, depth);
    }

    out.push('<');
    out.push_str(element.tag);
    write_attr(out, "class", element.class_name());
    if let Some(id) = element.block_id() {
        write_attr(out, BLOCK_ID, id);
    }

    if VOID_TAGS.contains(&element.tag) {
        if let Some(src) = element.text() {
            write_attr(out, "src", src);
        }
        out.push('>');
        if options.pretty {
            out.push('\n');
        }
        return;
    }
    out.push('>');

    match &element.body {
        ElementBody::Text(text) => out.push_str(&escape(text, false)),
        ElementBody::Children(children) if children.is_empty() => {}
        ElementBody::Children(children) => {
            if options.pretty {
                out.push('\n');
            }
            for child in children {
                write_element(out, child, depth + 1, options);
            }
            if options.pretty {
                indent(out, depth);
            }
        }
    }

    out.push_str("</");
    out.push_str(element.tag);
    out.push('>');
    if options.pretty {
        out.push('\n');
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value, true));
    out.push('"');
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
