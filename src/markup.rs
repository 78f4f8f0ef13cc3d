//! Bridge between (X)HTML text and [`Document`] trees.
use crate::core::document::{Document, NodeId, NodeKind};
use crate::errors::{Result, TranslatorError};
use quick_xml::escape::{escape, partial_escape, resolve_html5_entity};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Tag of the synthetic root that holds the top-level nodes of a parsed fragment.
const FRAGMENT_ROOT: &str = "#fragment";

/// HTML elements that never have content or an end tag.
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| tag.eq_ignore_ascii_case(v))
}

fn markup_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> TranslatorError {
    TranslatorError::Markup(format!("at byte {}: {}", reader.buffer_position(), err))
}

fn decode_name(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String> {
    Ok(reader.decoder().decode(raw).map_err(|e| markup_error(reader, e))?.into_owned())
}

fn read_attributes(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| markup_error(reader, err))?;
        let key = decode_name(reader, attr.key.as_ref())?;
        let value = attr
            .unescape_value_with(resolve_html5_entity)
            .map_err(|err| markup_error(reader, err))?;
        attributes.push((key, value.into_owned()));
    }
    Ok(attributes)
}

/// Parses markup into a document whose root is a synthetic fragment node.
///
/// Whitespace is kept as-is. An end tag closes the innermost open element with
/// the same name, implicitly closing anything opened after it; unmatched end
/// tags are ignored.
pub fn parse(markup: &str) -> Result<Document> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;

    let mut doc = Document::new(FRAGMENT_ROOT);
    let mut open: Vec<NodeId> = vec![doc.root()];

    loop {
        let current = *open.last().unwrap_or(&doc.root());
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let tag = decode_name(&reader, e.name().as_ref())?;
                let attributes = read_attributes(&reader, &e)?;
                let id = doc.append_element_with(current, &tag, attributes, false);
                // `<br>` written HTML-style: no content follows, no end tag expected
                if !is_void(&tag) {
                    open.push(id);
                }
            }
            Ok(Event::Empty(e)) => {
                let tag = decode_name(&reader, e.name().as_ref())?;
                let attributes = read_attributes(&reader, &e)?;
                doc.append_element_with(current, &tag, attributes, true);
            }
            Ok(Event::End(e)) => {
                let tag = decode_name(&reader, e.name().as_ref())?;
                let matching = open
                    .iter()
                    .skip(1)
                    .rposition(|&id| doc.tag(id) == Some(tag.as_str()));
                if let Some(depth) = matching {
                    open.truncate(depth + 1);
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape_with(resolve_html5_entity).map_err(|err| markup_error(&reader, err))?;
                doc.append_text(current, &text);
            }
            Ok(Event::CData(e)) => {
                let inner = reader.decoder().decode(&e).map_err(|err| markup_error(&reader, err))?;
                doc.append_raw(current, &format!("<![CDATA[{}]]>", inner));
            }
            Ok(Event::Comment(e)) => {
                let inner = reader.decoder().decode(&e).map_err(|err| markup_error(&reader, err))?;
                doc.append_raw(current, &format!("<!--{}-->", inner));
            }
            Ok(Event::DocType(e)) => {
                let inner = reader.decoder().decode(&e).map_err(|err| markup_error(&reader, err))?;
                doc.append_raw(current, &format!("<!DOCTYPE {}>", inner));
            }
            Ok(Event::PI(e)) => {
                let inner = reader.decoder().decode(&e).map_err(|err| markup_error(&reader, err))?;
                doc.append_raw(current, &format!("<?{}?>", inner));
            }
            Ok(Event::Decl(e)) => {
                let inner = reader.decoder().decode(&e).map_err(|err| markup_error(&reader, err))?;
                doc.append_raw(current, &format!("<?{}?>", inner));
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(markup_error(&reader, err)),
        }
    }
    Ok(doc)
}

/// Serializes a document produced by [`parse`] (or built by hand) back to markup.
/// The synthetic fragment root is not written.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    if doc.tag(doc.root()) == Some(FRAGMENT_ROOT) {
        for &child in doc.children(doc.root()) {
            render_node(doc, child, &mut out);
        }
    } else {
        render_node(doc, doc.root(), &mut out);
    }
    out
}

fn render_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.kind(id) {
        Some(NodeKind::Element { tag, attributes, self_closing }) => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape(value.as_str()));
                out.push('"');
            }
            if *self_closing {
                out.push_str("/>");
                return;
            }
            out.push('>');
            if is_void(tag) {
                return;
            }
            for &child in doc.children(id) {
                render_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Some(NodeKind::Text(text)) => out.push_str(&partial_escape(text.as_str())),
        Some(NodeKind::Raw(raw)) => out.push_str(raw),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<p>Hello <b>world</b></p>")]
    #[case("<body><img src=\"a.png\"/><p class=\"x\">text</p></body>")]
    #[case("<!-- note --><div>a &amp; b</div>")]
    #[case("plain text only")]
    #[case("<p>a<br>b</p>")]
    #[case("<p>line<br></p>")]
    #[case("<head><meta charset=\"utf-8\"><link rel=\"icon\" href=\"x.ico\"></head>")]
    #[case("<p>one<BR>two<hr/>three</p>")]
    fn render_reproduces_input(#[case] input: &str) {
        let doc = parse(input).unwrap();
        assert_eq!(render(&doc), input);
    }

    #[rstest]
    fn text_is_unescaped_in_the_tree() {
        let doc = parse("<p>fish &amp; chips</p>").unwrap();
        assert_eq!(doc.text_content(doc.root()), "fish & chips");
    }

    #[rstest]
    fn void_elements_do_not_adopt_following_text() {
        let doc = parse("<p>a<br>b<img src=\"x.png\">c</p>").unwrap();
        let p = doc.children(doc.root())[0];
        let kids: Vec<String> = doc
            .children(p)
            .iter()
            .map(|&id| doc.tag(id).map(str::to_string).unwrap_or_else(|| doc.text_content(id)))
            .collect();
        assert_eq!(kids, vec!["a", "br", "b", "img", "c"]);
    }

    #[rstest]
    #[case("<p>x &nbsp; y</p>", "x \u{a0} y")]
    #[case("<p>&copy; 2024 &mdash; me</p>", "\u{a9} 2024 \u{2014} me")]
    #[case("<p>&lt;tag&gt; &amp; &#8217;</p>", "<tag> & \u{2019}")]
    fn html_entities_are_resolved(#[case] input: &str, #[case] expected: &str) {
        let doc = parse(input).unwrap();
        assert_eq!(doc.text_content(doc.root()), expected);
    }

    #[rstest]
    fn html_entities_in_attributes_are_resolved() {
        let doc = parse("<a title=\"fish&nbsp;&amp;&nbsp;chips\">x</a>").unwrap();
        let a = doc.children(doc.root())[0];
        match doc.kind(a) {
            Some(NodeKind::Element { attributes, .. }) => {
                assert_eq!(attributes[0].1, "fish\u{a0}&\u{a0}chips");
            }
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[rstest]
    fn end_tag_closes_unclosed_children() {
        let doc = parse("<div><p>one<br></div><span>two</span>").unwrap();
        let top: Vec<&str> =
            doc.children(doc.root()).iter().filter_map(|&id| doc.tag(id)).collect();
        assert_eq!(top, vec!["div", "span"]);
    }

    #[rstest]
    fn script_text_stays_under_script() {
        let doc = parse("<script>var hello = 1;</script>").unwrap();
        let script = doc.children(doc.root())[0];
        assert_eq!(doc.tag(script), Some("script"));
        assert_eq!(doc.text_content(script), "var hello = 1;");
    }
}
