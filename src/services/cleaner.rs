use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

const SKIPPED_TAGS: [&str; 2] = ["script", "style"];

/// Reduces rendered HTML to the text a visitor would read,
/// trimmed and with blank lines removed.
pub fn clean_page_text(html: &str) -> String {
    let body_selector = Selector::parse("body").unwrap();
    let document = Html::parse_document(html);

    let mut lines = Vec::new();
    match document.select(&body_selector).next() {
        Some(body) => collect_text(*body, &mut lines),
        None => collect_text(document.tree.root(), &mut lines),
    }

    let text = lines.join("\n");
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n")
}

// Nesting depth is page-controlled, so this walks with an explicit stack
// instead of recursing. Children are pushed in reverse to keep document order.
fn collect_text(root: NodeRef<Node>, lines: &mut Vec<String>) {
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        match node.value() {
            Node::Element(element) if SKIPPED_TAGS.contains(&element.name()) => {}
            Node::Text(text) => lines.push(text.to_string()),
            _ => pending.extend(node.children().rev()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_and_style_content_is_dropped() {
        let html = r#"
            <html><body>
                <p>Welcome</p>
                <script>var tracking = "beacon";</script>
                <style>p { color: red; }</style>
                <p>Goodbye</p>
            </body></html>
        "#;

        let text = clean_page_text(html);
        assert_eq!(text, "Welcome\nGoodbye");
    }

    #[test]
    fn fragment_without_body_wrapper_cleans_to_visible_lines() {
        let html = "<script>x</script><p> Hello </p><p></p><p>World</p>";

        let text = clean_page_text(html);
        assert_eq!(text, "Hello\nWorld");
    }

    #[test]
    fn lines_are_trimmed_and_blanks_removed() {
        let html = "<html><body><div>   padded   </div><div>\n\n</div><div>tail</div></body></html>";

        let text = clean_page_text(html);
        assert_eq!(text, "padded\ntail");
    }

    #[test]
    fn head_content_is_ignored() {
        let html = r#"
            <html>
                <head><title>Site Title</title></head>
                <body><h1>Visible heading</h1></body>
            </html>
        "#;

        let text = clean_page_text(html);
        assert_eq!(text, "Visible heading");
    }

    #[test]
    fn text_preserves_document_order_across_nesting() {
        let html = r#"
            <html><body>
                <div>first<span>second</span></div>
                <p>third</p>
            </body></html>
        "#;

        let text = clean_page_text(html);
        assert_eq!(text, "first\nsecond\nthird");
    }

    #[test]
    fn empty_body_yields_empty_text() {
        let text = clean_page_text("<html><body></body></html>");
        assert_eq!(text, "");
    }

    #[test]
    fn deeply_nested_markup_is_walked_without_exhausting_the_stack() {
        let depth = 30_000;
        let mut html = String::from("<html><body>");
        for _ in 0..depth {
            html.push_str("<div>");
        }
        html.push_str("buried text");
        for _ in 0..depth {
            html.push_str("</div>");
        }
        html.push_str("</body></html>");

        let text = clean_page_text(&html);
        assert_eq!(text, "buried text");
    }
}
