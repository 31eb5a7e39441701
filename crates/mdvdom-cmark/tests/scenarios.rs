//! End-to-end compilation of Markdown text.

use mdvdom::{CreateElement, Hyperscript, Options, Props, RenderNode, Schema, html};
use mdvdom_cmark::{MarkdownProcessor, render};
use pretty_assertions::assert_eq;

fn to_html(processor: &MarkdownProcessor, markdown: &str) -> String {
    html::to_html(&processor.render(markdown).into())
}

fn default_html(markdown: &str) -> String {
    html::to_html(&render(markdown).into())
}

#[test]
fn test_inline_formatting() {
    assert_eq!(
        default_html("_Emphasis_, **importance**, and `code`."),
        "<div><p><em>Emphasis</em>, <strong>importance</strong>, and <code>code</code>.</p>\n</div>"
    );
}

#[test]
fn test_empty_schema_leaves_text() {
    let processor = MarkdownProcessor::new(Options::new().with_schema(Schema::default()));
    let tree = processor.render("_Emphasis_!");
    assert_eq!(tree.tag_name, "div");
    assert_eq!(tree.text_content(), "Emphasis!\n");
    assert_eq!(tree.text_content().trim_end(), "Emphasis!");
    assert_eq!(html::to_html(&tree.into()), "<div>Emphasis!\n</div>");
}

#[test]
fn test_sanitize_from_config() {
    let options = Options::from_json(r#"{"sanitize": {"tagNames": []}}"#).unwrap();
    let processor = MarkdownProcessor::new(options);
    assert_eq!(to_html(&processor, "_Emphasis_!"), "<div>Emphasis!\n</div>");
}

#[test]
fn test_empty_document() {
    let tree = render("");
    assert_eq!(tree.key.as_deref(), Some("h-1"));
    assert_eq!(html::to_html(&tree.into()), "<div></div>");
}

#[test]
fn test_blocks() {
    let markdown = "# Title\n\nText with a  \nbreak.\n\n> quoted\n\n---\n";
    assert_eq!(
        default_html(markdown),
        concat!(
            "<div><h1>Title</h1>\n<p>Text with a<br>\nbreak.</p>\n",
            "<blockquote>\n<p>quoted</p>\n</blockquote>\n<hr>\n</div>",
        )
    );
}

#[test]
fn test_lists() {
    assert_eq!(
        default_html("- a\n- b\n"),
        "<div><ul>\n<li>a</li>\n<li>b</li>\n</ul>\n</div>"
    );
    assert_eq!(
        default_html("3. a\n\n4. b\n"),
        "<div><ol start=\"3\">\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ol>\n</div>"
    );
}

#[test]
fn test_task_list() {
    let html = default_html("- [x] done\n- [ ] todo\n");
    assert!(html.contains("<li><input type=\"checkbox\" checked disabled> "));
    assert!(html.contains("<li><input type=\"checkbox\" disabled> "));
    assert!(html.contains("done</li>"));
    assert!(html.contains("todo</li>"));
}

#[test]
fn test_table() {
    assert_eq!(
        default_html("| a | b |\n|:--|---|\n| 1 | 2 |\n"),
        concat!(
            "<div><table>\n<thead>\n<tr>\n",
            "<th align=\"left\">a</th>\n<th>b</th>\n</tr>\n</thead>\n",
            "<tbody>\n<tr>\n<td align=\"left\">1</td>\n<td>2</td>\n</tr>\n</tbody>\n",
            "</table>\n</div>",
        )
    );
}

#[test]
fn test_code_block() {
    assert_eq!(
        default_html("```rust\nfn main() {}\n```\n"),
        "<div><pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n</div>"
    );
}

#[test]
fn test_footnotes() {
    let html = default_html("a[^1] b[^2]\n\n[^1]: one\n\n[^2]: two\n");

    assert!(html.starts_with(concat!(
        "<div><p>a<sup id=\"user-content-fnref-1\">",
        "<a href=\"#fn-1\" class=\"footnote-ref\">1</a></sup>",
        " b<sup id=\"user-content-fnref-2\">",
        "<a href=\"#fn-2\" class=\"footnote-ref\">2</a></sup></p>\n",
        "<div class=\"footnotes\">\n<hr>\n<ol>\n",
    )));
    let first = html.find("<li id=\"user-content-fn-1\">").unwrap();
    let second = html.find("<li id=\"user-content-fn-2\">").unwrap();
    assert!(first < second);
    assert!(html.contains("<p>one</p>\n<a href=\"#fnref-1\" class=\"footnote-backref\">↩</a>"));
    assert!(html.ends_with("</ol>\n</div>\n</div>"));
}

#[test]
fn test_footnote_ids_without_sanitize() {
    let processor = MarkdownProcessor::new(Options::new().without_sanitize());
    let html = to_html(&processor, "a[^n]\n\n[^n]: note\n");
    assert!(html.contains("<sup id=\"fnref-n\">"));
    assert!(html.contains("<li id=\"fn-n\">"));
}

#[test]
fn test_references() {
    let markdown = concat!(
        "[go][home] and ![logo][]\n\n",
        "[Home]: https://example.com \"T\"\n[logo]: /logo.png\n",
    );
    assert_eq!(
        default_html(markdown),
        concat!(
            "<div><p><a href=\"https://example.com\" title=\"T\">go</a> and ",
            "<img src=\"/logo.png\" alt=\"logo\"></p>\n</div>",
        )
    );
}

#[test]
fn test_undefined_shortcut_reference() {
    assert_eq!(
        default_html("see [missing]"),
        "<div><p>see [missing]</p>\n</div>"
    );
}

#[test]
fn test_unsafe_link_loses_href() {
    let markdown = "[x](javascript:alert(1)) [y](https://example.com)";
    assert_eq!(
        default_html(markdown),
        "<div><p><a>x</a> <a href=\"https://example.com\">y</a></p>\n</div>"
    );

    let processor = MarkdownProcessor::new(Options::new().without_sanitize());
    assert!(to_html(&processor, markdown).contains("<a href=\"javascript:alert(1)\">x</a>"));
}

#[test]
fn test_raw_html_is_text() {
    assert_eq!(
        default_html("a <b>bold</b>"),
        "<div><p>a &lt;b&gt;bold&lt;/b&gt;</p>\n</div>"
    );
}

#[test]
fn test_front_matter_is_skipped() {
    assert_eq!(
        default_html("---\ntitle: x\n---\n\nbody\n"),
        "<div><p>body</p>\n</div>"
    );
}

#[test]
fn test_component_replaces_element() {
    let processor = MarkdownProcessor::new(Options::new().with_component(
        "em",
        |_: &str, _: Props, children: Vec<RenderNode>| children,
    ));
    assert_eq!(
        to_html(&processor, "_Emphasis_!"),
        "<div><p>Emphasis!</p>\n</div>"
    );
}

#[test]
fn test_component_sees_props() {
    let processor = MarkdownProcessor::new(Options::new().with_component(
        "a",
        |tag_name: &str, mut props: Props, children: Vec<RenderNode>| {
            props.attributes.insert("rel", "nofollow".into());
            Hyperscript.create(tag_name, props, children)
        },
    ));
    assert_eq!(
        to_html(&processor, "<https://example.com>"),
        concat!(
            "<div><p><a href=\"https://example.com\" rel=\"nofollow\">",
            "https://example.com</a></p>\n</div>",
        )
    );
}

#[test]
fn test_key_prefix() {
    let processor = MarkdownProcessor::new(Options::new().with_key_prefix("f-"));
    let tree = processor.render("_Emphasis_!");
    assert_eq!(tree.key.as_deref(), Some("f-1"));
    let paragraph = tree.child_elements().next().unwrap();
    assert_eq!(paragraph.key.as_deref(), Some("f-2"));
    let emphasis = paragraph.child_elements().next().unwrap();
    assert_eq!(emphasis.key.as_deref(), Some("f-3"));
}

#[test]
fn test_without_keys() {
    let processor = MarkdownProcessor::new(Options::new().without_keys());
    let tree = processor.render("text");
    assert_eq!(tree.key, None);
    assert!(tree.child_elements().all(|element| element.key.is_none()));
}

#[test]
fn test_gfm_disabled_keeps_tildes() {
    let processor = MarkdownProcessor::default().with_gfm(false);
    assert_eq!(to_html(&processor, "~~x~~"), "<div><p>~~x~~</p>\n</div>");
}

#[test]
fn test_tab_size() {
    let processor = MarkdownProcessor::new(Options::new().with_tab_size(2));
    assert_eq!(
        to_html(&processor, "```\n\tx\n```\n"),
        "<div><pre><code>  x\n</code></pre>\n</div>"
    );
}
