//! Finding tables, forms and fields in a parsed page.
//!
//! Every lookup answers "not found" with `None`; an empty or error page is a
//! page with zero entities, never a failure.

use scraper::{ElementRef, Html, Node, Selector};

/// Compile a CSS selector, `None` if it is malformed.
pub fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// First element under `scope` matching `css`.
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    scope.select(&sel).next()
}

/// Collapse runs of whitespace (including `&nbsp;`) into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = true;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '\u{a0}' {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim_end().to_string()
}

/// Text of the element's direct text children only.
pub fn own_text(el: ElementRef) -> String {
    let raw: String = el
        .children()
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect();
    normalize_ws(&raw)
}

/// All descendant text, whitespace-normalized.
pub fn text(el: ElementRef) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Descendant text with `<br>` rendered as a line break.
pub fn text_br(el: ElementRef) -> String {
    let mut raw = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(t) => raw.push_str(t),
            Node::Element(e) if e.name() == "br" => raw.push('\n'),
            _ => {}
        }
    }
    raw.split('\n')
        .map(normalize_ws)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub fn is_element(el: ElementRef, tag: &str) -> bool {
    el.value().name().eq_ignore_ascii_case(tag)
}

pub fn has_class(el: ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Next sibling that is an element, skipping text and comments.
pub fn next_element(el: ElementRef) -> Option<ElementRef> {
    el.next_siblings().find_map(ElementRef::wrap)
}

pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

/// Nearest ancestor with the given tag.
pub fn find_parent<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| is_element(*a, tag))
}

/// A header cell: `<th>`, or a `<td>` marked with the `tableHeader` class.
pub fn is_header_cell(el: ElementRef) -> bool {
    is_element(el, "th") || (is_element(el, "td") && has_class(el, "tableHeader"))
}

/// Find the table whose header row holds `labels` in adjacent cells.
///
/// Header cells under `scope` are scanned in document order; a candidate
/// matches when its own text equals the first label and each following
/// label is the own text of the next sibling cell. The first match wins and
/// its nearest enclosing `<table>` is returned.
pub fn find_table<'a>(scope: ElementRef<'a>, labels: &[&str]) -> Option<ElementRef<'a>> {
    let (first, rest) = labels.split_first()?;
    let sel = selector("th, td")?;

    'candidates: for cell in scope.select(&sel) {
        if !is_header_cell(cell) || own_text(cell) != *first {
            continue;
        }
        let mut current = cell;
        for label in rest {
            match next_element(current) {
                Some(next) if is_header_cell(next) && own_text(next) == *label => current = next,
                _ => continue 'candidates,
            }
        }
        return find_parent(cell, "table");
    }
    None
}

/// Rows of `table`, excluding rows of tables nested inside it.
pub fn rows(table: ElementRef) -> Vec<ElementRef> {
    let Some(sel) = selector("tr") else {
        return Vec::new();
    };
    table
        .select(&sel)
        .filter(|tr| find_parent(*tr, "table").map(|t| t.id()) == Some(table.id()))
        .collect()
}

/// Cells (`td` or `th`) of a row in column order.
pub fn cells(row: ElementRef) -> Vec<ElementRef> {
    child_elements(row)
        .filter(|c| is_element(*c, "td") || is_element(*c, "th"))
        .collect()
}

pub fn find_form<'a>(doc: &'a Html, name: &str) -> Option<ElementRef<'a>> {
    select_first(doc.root_element(), &format!("form[name=\"{name}\"]"))
}

/// Form control named `name`. Controls the parser moved out of the form
/// element (legacy markup nests forms inside tables) are found in the rest of
/// the document as long as they sit in no other form.
pub fn select_by_name<'a>(doc: &'a Html, form: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    let sel = selector(&format!("[name=\"{name}\"]"))?;
    if let Some(found) = form.select(&sel).next() {
        return Some(found);
    }
    doc.root_element()
        .select(&sel)
        .find(|el| find_parent(*el, "form").is_none())
}

/// Current value of a form control: a textarea's text, otherwise the
/// `value` attribute.
pub fn value(el: ElementRef) -> String {
    if is_element(el, "textarea") {
        return el.text().collect::<String>();
    }
    el.value().attr("value").unwrap_or_default().to_string()
}

pub fn is_checked(el: ElementRef) -> bool {
    el.value().attr("checked").is_some()
}

pub fn options(select: ElementRef) -> Vec<ElementRef> {
    match selector("option") {
        Some(sel) => select.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// First option carrying the `selected` attribute.
pub fn selected_option(select: ElementRef) -> Option<ElementRef> {
    options(select)
        .into_iter()
        .find(|o| o.value().attr("selected").is_some())
}

/// Text of the server's error banner (the first `td.error`), if any.
pub fn find_error(doc: &Html) -> Option<String> {
    let cell = select_first(doc.root_element(), "td.error")?;
    let message = text_br(cell);
    if message.is_empty() { None } else { Some(message) }
}
