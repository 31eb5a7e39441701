//! Source tree construction from parser events.
//!
//! Events arrive as a flat, well-nested stream. Every `Start` opens a
//! [`Frame`] and the matching `End` closes it into a [`Node`] appended to the
//! frame below. Items of a tight list carry their inline content directly;
//! the builder wraps it in an implicit paragraph so the tree has the same
//! shape for tight and loose lists.

use mdvdom::mdast::{
    Align, Code, FootnoteDefinition, FootnoteReference, Heading, Image, ImageReference, Link,
    LinkReference, List, ListItem, Literal, Node, Parent, ReferenceType, Table, Unknown, Void,
};
use pulldown_cmark::{Alignment, CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Tag, TagEnd};

#[derive(Debug)]
enum Kind {
    Root,
    Paragraph { implicit: bool },
    Heading(u8),
    Blockquote,
    List { start: Option<u64>, loose: bool },
    Item { checked: Option<bool> },
    Table(Vec<Option<Align>>),
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Delete,
    Link(Target),
    Image(Target),
    FootnoteDefinition(String),
    Code { lang: Option<String>, value: String },
    Html(String),
    FrontMatter(String),
    /// Constructs this front end does not map onto a dedicated node type.
    Other(&'static str),
}

#[derive(Debug)]
struct Target {
    link_type: LinkType,
    url: String,
    title: String,
    identifier: String,
}

#[derive(Debug)]
struct Frame {
    kind: Kind,
    children: Vec<Node>,
}

impl Frame {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    fn into_node(self) -> Node {
        let children = self.children;
        match self.kind {
            Kind::Root => Node::Root(parent(children)),
            Kind::Paragraph { .. } => Node::Paragraph(parent(children)),
            Kind::Heading(depth) => Node::Heading(Heading {
                depth,
                children,
                ..Heading::default()
            }),
            Kind::Blockquote => Node::Blockquote(parent(children)),
            Kind::List { start, loose } => {
                let children = children
                    .into_iter()
                    .map(|mut child| {
                        if let Node::ListItem(item) = &mut child {
                            item.loose = loose;
                        }
                        child
                    })
                    .collect();
                Node::List(List {
                    ordered: start.is_some(),
                    start: start.and_then(|start| i64::try_from(start).ok()),
                    loose,
                    children,
                    ..List::default()
                })
            }
            Kind::Item { checked } => Node::ListItem(ListItem {
                checked,
                children,
                ..ListItem::default()
            }),
            Kind::Table(align) => Node::Table(Table {
                align,
                children,
                ..Table::default()
            }),
            Kind::TableRow => Node::TableRow(parent(children)),
            Kind::TableCell => Node::TableCell(parent(children)),
            Kind::Emphasis => Node::Emphasis(parent(children)),
            Kind::Strong => Node::Strong(parent(children)),
            Kind::Delete => Node::Delete(parent(children)),
            Kind::Link(target) => match reference_type(target.link_type) {
                Some(reference_type) => Node::LinkReference(LinkReference {
                    identifier: target.identifier,
                    reference_type,
                    children,
                    ..LinkReference::default()
                }),
                None => Node::Link(Link {
                    url: target.url,
                    title: non_empty(target.title),
                    children,
                    ..Link::default()
                }),
            },
            Kind::Image(target) => {
                let mut alt = String::new();
                plain_text(&children, &mut alt);
                match reference_type(target.link_type) {
                    Some(reference_type) => Node::ImageReference(ImageReference {
                        identifier: target.identifier,
                        reference_type,
                        alt: Some(alt),
                        ..ImageReference::default()
                    }),
                    None => Node::Image(Image {
                        url: target.url,
                        title: non_empty(target.title),
                        alt: Some(alt),
                        ..Image::default()
                    }),
                }
            }
            Kind::FootnoteDefinition(identifier) => Node::FootnoteDefinition(FootnoteDefinition {
                identifier,
                children,
                ..FootnoteDefinition::default()
            }),
            Kind::Code { lang, mut value } => {
                if value.ends_with('\n') {
                    value.pop();
                }
                Node::Code(Code {
                    lang,
                    value,
                    ..Code::default()
                })
            }
            Kind::Html(value) => Node::Html(literal(value)),
            Kind::FrontMatter(value) => Node::Yaml(literal(value)),
            Kind::Other(node_type) => Node::Unknown(Unknown {
                node_type: node_type.to_owned(),
                children: Some(children),
                ..Unknown::default()
            }),
        }
    }
}

/// Builds one `root` node from a stream of parser events.
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            stack: vec![Frame::new(Kind::Root)],
        }
    }

    pub(crate) fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline(Node::InlineCode(literal(code.into_string()))),
            Event::Html(html) => self.text(&html),
            Event::InlineHtml(html) => self.inline(Node::Html(literal(html.into_string()))),
            Event::InlineMath(math) => self.inline(Node::Unknown(Unknown {
                node_type: "inlineMath".to_owned(),
                value: Some(math.into_string()),
                ..Unknown::default()
            })),
            Event::DisplayMath(math) => self.inline(Node::Unknown(Unknown {
                node_type: "math".to_owned(),
                value: Some(math.into_string()),
                ..Unknown::default()
            })),
            Event::FootnoteReference(label) => {
                self.inline(Node::FootnoteReference(FootnoteReference {
                    identifier: label.into_string(),
                    ..FootnoteReference::default()
                }));
            }
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.inline(Node::Break(Void::default())),
            Event::Rule => {
                self.close_implicit_paragraph();
                self.append(Node::ThematicBreak(Void::default()));
            }
            Event::TaskListMarker(checked) => {
                let item = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find_map(|frame| match &mut frame.kind {
                        Kind::Item { checked } => Some(checked),
                        _ => None,
                    });
                if let Some(slot) = item {
                    *slot = Some(checked);
                }
            }
        }
    }

    /// Close every open frame and return the root, with `trailing` nodes
    /// appended after the document content.
    pub(crate) fn finish(mut self, trailing: impl IntoIterator<Item = Node>) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        let mut root = self.stack.pop().unwrap_or_else(|| Frame::new(Kind::Root));
        root.children.extend(trailing);
        root.into_node()
    }

    fn start(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => {
                self.mark_list_loose();
                Kind::Paragraph { implicit: false }
            }
            Tag::Heading { level, .. } => Kind::Heading(heading_depth(level)),
            Tag::BlockQuote(_) => Kind::Blockquote,
            Tag::CodeBlock(kind) => Kind::Code {
                lang: match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                },
                value: String::new(),
            },
            Tag::HtmlBlock => Kind::Html(String::new()),
            Tag::List(start) => Kind::List {
                start,
                loose: false,
            },
            Tag::Item => Kind::Item { checked: None },
            Tag::FootnoteDefinition(label) => Kind::FootnoteDefinition(label.into_string()),
            Tag::MetadataBlock(_) => Kind::FrontMatter(String::new()),
            Tag::DefinitionList => Kind::Other("definitionList"),
            Tag::DefinitionListTitle => Kind::Other("definitionTerm"),
            Tag::DefinitionListDefinition => Kind::Other("definitionDescription"),
            Tag::Table(alignments) => Kind::Table(alignments.into_iter().map(align).collect()),
            Tag::TableHead | Tag::TableRow => Kind::TableRow,
            Tag::TableCell => Kind::TableCell,
            Tag::Emphasis => Kind::Emphasis,
            Tag::Strong => Kind::Strong,
            Tag::Strikethrough => Kind::Delete,
            Tag::Superscript => Kind::Other("superscript"),
            Tag::Subscript => Kind::Other("subscript"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            } => Kind::Link(target(link_type, dest_url, title, id)),
            Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            } => Kind::Image(target(link_type, dest_url, title, id)),
        };

        if is_inline(&kind) {
            self.open_implicit_paragraph();
        } else {
            self.close_implicit_paragraph();
        }
        self.stack.push(Frame::new(kind));
    }

    fn end(&mut self, tag: TagEnd) {
        if matches!(tag, TagEnd::Item) {
            self.close_implicit_paragraph();
        }
        self.close();
    }

    fn close(&mut self) {
        if self.stack.len() > 1
            && let Some(frame) = self.stack.pop()
        {
            self.append(frame.into_node());
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut() {
            match &mut frame.kind {
                Kind::Code { value, .. } | Kind::Html(value) | Kind::FrontMatter(value) => {
                    value.push_str(text);
                    return;
                }
                _ => {}
            }
        }

        self.open_implicit_paragraph();
        if let Some(frame) = self.stack.last_mut() {
            if let Some(Node::Text(last)) = frame.children.last_mut() {
                last.value.push_str(text);
            } else {
                frame.children.push(Node::Text(literal(text.to_owned())));
            }
        }
    }

    fn inline(&mut self, node: Node) {
        self.open_implicit_paragraph();
        self.append(node);
    }

    fn append(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn open_implicit_paragraph(&mut self) {
        let in_item = self
            .stack
            .last()
            .is_some_and(|frame| matches!(frame.kind, Kind::Item { .. }));
        if in_item {
            self.stack
                .push(Frame::new(Kind::Paragraph { implicit: true }));
        }
    }

    fn close_implicit_paragraph(&mut self) {
        if matches!(
            self.stack.last(),
            Some(Frame {
                kind: Kind::Paragraph { implicit: true },
                ..
            })
        ) {
            self.close();
        }
    }

    /// An explicit paragraph directly inside an item makes its list loose.
    fn mark_list_loose(&mut self) {
        let [.., list, item] = self.stack.as_mut_slice() else {
            return;
        };
        if let (Kind::List { loose, .. }, Kind::Item { .. }) = (&mut list.kind, &item.kind) {
            *loose = true;
        }
    }
}

fn is_inline(kind: &Kind) -> bool {
    matches!(
        kind,
        Kind::Emphasis
            | Kind::Strong
            | Kind::Delete
            | Kind::Link(_)
            | Kind::Image(_)
            | Kind::Other("superscript" | "subscript")
    )
}

fn target(link_type: LinkType, url: CowStr<'_>, title: CowStr<'_>, id: CowStr<'_>) -> Target {
    let url = match link_type {
        LinkType::Email => format!("mailto:{url}"),
        _ => url.into_string(),
    };
    Target {
        link_type,
        url,
        title: title.into_string(),
        identifier: id.into_string(),
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn reference_type(link_type: LinkType) -> Option<ReferenceType> {
    match link_type {
        LinkType::Reference | LinkType::ReferenceUnknown => Some(ReferenceType::Full),
        LinkType::Collapsed | LinkType::CollapsedUnknown => Some(ReferenceType::Collapsed),
        LinkType::Shortcut | LinkType::ShortcutUnknown => Some(ReferenceType::Shortcut),
        _ => None,
    }
}

fn align(alignment: Alignment) -> Option<Align> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some(Align::Left),
        Alignment::Center => Some(Align::Center),
        Alignment::Right => Some(Align::Right),
    }
}

fn parent(children: Vec<Node>) -> Parent {
    Parent {
        children,
        ..Parent::default()
    }
}

fn literal(value: String) -> Literal {
    Literal {
        value,
        ..Literal::default()
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Concatenated text of `nodes`, as used for image alternative text.
fn plain_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) | Node::InlineCode(text) | Node::Html(text) => {
                out.push_str(&text.value);
            }
            Node::Image(image) => out.push_str(image.alt.as_deref().unwrap_or_default()),
            _ => {
                if let Some(children) = node.children() {
                    plain_text(children, out);
                }
            }
        }
    }
}
