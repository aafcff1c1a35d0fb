//! Structural form of the tree as a `serde_json::Value`.
//!
//! Every node becomes an object with a `type` tag plus its fields:
//!
//! | type | fields |
//! |------|--------|
//! | `Document` | `blocks` |
//! | `Heading` | `level`, `inlines` |
//! | `Paragraph` | `inlines` |
//! | `BlockQuote` | `children` |
//! | `ListBlock` | `ordered`, `items` |
//! | `ListItem` | `children` |
//! | `CodeBlock` | `code`, `language` |
//! | `HorizontalRule` | |
//! | `Text` | `value` |
//! | `Bold`, `Italic` | `children` |
//! | `CodeSpan` | `code` |
//! | `Link` | `children`, `url`, `title` |
//!
//! This is also the form trees are cached in. [`from_value`] additionally
//! reads older field names: `children` for document blocks, `inline` for
//! inline lists, `text` for `value`, `href` for `url`, and the
//! `UnorderedList`/`OrderedList` tags.

use markdown_lathe_syntax::tree::{Block, Document, Inline, ListItem, Visitor};
use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("tree node is not a JSON object")]
    NotAnObject,

    #[error("tree node has no `type` tag")]
    MissingType,

    #[error("unknown node type `{0}`")]
    UnknownType(String),

    #[error("expected {expected} node, found `{found}`")]
    UnexpectedNode {
        expected: &'static str,
        found: String,
    },

    #[error("{node} node is missing `{field}`")]
    MissingField {
        node: &'static str,
        field: &'static str,
    },

    #[error("{node} node has an invalid `{field}`")]
    InvalidField {
        node: &'static str,
        field: &'static str,
    },
}

const BLOCK_TYPES: &[&str] = &[
    "Heading",
    "Paragraph",
    "BlockQuote",
    "ListBlock",
    "UnorderedList",
    "OrderedList",
    "CodeBlock",
    "HorizontalRule",
];

const INLINE_TYPES: &[&str] = &["Text", "Bold", "Italic", "CodeSpan", "Link"];

/// Serialize a document to its structural form.
pub fn to_value(document: &Document) -> Value {
    StructureRenderer.visit_document(document)
}

/// Rebuild a document from its structural form.
pub fn from_value(value: &Value) -> Result<Document, StructureError> {
    let (object, kind) = tagged(value)?;
    if kind != "Document" {
        return Err(unexpected("Document", kind));
    }
    let blocks = list(object, "Document", &["blocks", "children"])?
        .iter()
        .map(block)
        .collect::<Result<_, _>>()?;
    Ok(Document::new(blocks))
}

/// Produces the structural form node by node.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureRenderer;

impl StructureRenderer {
    fn blocks(&mut self, blocks: &[Block]) -> Value {
        Value::Array(blocks.iter().map(|b| b.accept(self)).collect())
    }

    fn inlines(&mut self, inlines: &[Inline]) -> Value {
        Value::Array(inlines.iter().map(|i| i.accept(self)).collect())
    }
}

impl Visitor for StructureRenderer {
    type Output = Value;

    fn visit_document(&mut self, document: &Document) -> Value {
        json!({ "type": "Document", "blocks": self.blocks(&document.blocks) })
    }

    fn visit_heading(&mut self, level: usize, inlines: &[Inline]) -> Value {
        json!({ "type": "Heading", "level": level, "inlines": self.inlines(inlines) })
    }

    fn visit_paragraph(&mut self, inlines: &[Inline]) -> Value {
        json!({ "type": "Paragraph", "inlines": self.inlines(inlines) })
    }

    fn visit_block_quote(&mut self, children: &[Block]) -> Value {
        json!({ "type": "BlockQuote", "children": self.blocks(children) })
    }

    fn visit_list(&mut self, items: &[ListItem], ordered: bool) -> Value {
        let items: Vec<Value> = items.iter().map(|i| self.visit_list_item(i)).collect();
        json!({ "type": "ListBlock", "ordered": ordered, "items": items })
    }

    fn visit_list_item(&mut self, item: &ListItem) -> Value {
        json!({ "type": "ListItem", "children": self.blocks(&item.children) })
    }

    fn visit_code_block(&mut self, code: &str, language: Option<&str>) -> Value {
        json!({ "type": "CodeBlock", "code": code, "language": language })
    }

    fn visit_horizontal_rule(&mut self) -> Value {
        json!({ "type": "HorizontalRule" })
    }

    fn visit_text(&mut self, value: &str) -> Value {
        json!({ "type": "Text", "value": value })
    }

    fn visit_bold(&mut self, children: &[Inline]) -> Value {
        json!({ "type": "Bold", "children": self.inlines(children) })
    }

    fn visit_italic(&mut self, children: &[Inline]) -> Value {
        json!({ "type": "Italic", "children": self.inlines(children) })
    }

    fn visit_code_span(&mut self, code: &str) -> Value {
        json!({ "type": "CodeSpan", "code": code })
    }

    fn visit_link(&mut self, children: &[Inline], url: &str, title: Option<&str>) -> Value {
        json!({
            "type": "Link",
            "children": self.inlines(children),
            "url": url,
            "title": title,
        })
    }
}

fn tagged(value: &Value) -> Result<(&Map<String, Value>, &str), StructureError> {
    let object = value.as_object().ok_or(StructureError::NotAnObject)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(StructureError::MissingType)?;
    Ok((object, kind))
}

fn unexpected(expected: &'static str, found: &str) -> StructureError {
    let known = found == "Document"
        || found == "ListItem"
        || BLOCK_TYPES.contains(&found)
        || INLINE_TYPES.contains(&found);
    if known {
        StructureError::UnexpectedNode {
            expected,
            found: found.to_string(),
        }
    } else {
        StructureError::UnknownType(found.to_string())
    }
}

fn block(value: &Value) -> Result<Block, StructureError> {
    let (object, kind) = tagged(value)?;
    let block = match kind {
        "Heading" => Block::Heading {
            level: level(object)?,
            inlines: inlines(object, "Heading", &["inlines", "inline"])?,
        },
        "Paragraph" => Block::Paragraph {
            inlines: inlines(object, "Paragraph", &["inlines", "inline"])?,
        },
        "BlockQuote" => Block::BlockQuote {
            children: blocks(object, "BlockQuote")?,
        },
        "ListBlock" => Block::List {
            items: items(object, "ListBlock")?,
            ordered: flag(object, "ListBlock", "ordered")?,
        },
        "UnorderedList" => Block::List {
            items: items(object, "UnorderedList")?,
            ordered: false,
        },
        "OrderedList" => Block::List {
            items: items(object, "OrderedList")?,
            ordered: true,
        },
        "CodeBlock" => Block::CodeBlock {
            code: string(object, "CodeBlock", &["code"])?,
            language: optional_string(object, "CodeBlock", "language")?,
        },
        "HorizontalRule" => Block::HorizontalRule,
        other => return Err(unexpected("block", other)),
    };
    Ok(block)
}

fn list_item(value: &Value) -> Result<ListItem, StructureError> {
    let (object, kind) = tagged(value)?;
    if kind != "ListItem" {
        return Err(unexpected("ListItem", kind));
    }

    // Older trees stored an item's text directly as `inline`
    if !object.contains_key("children") && object.contains_key("inline") {
        let inlines = inlines(object, "ListItem", &["inline"])?;
        return Ok(ListItem {
            children: vec![Block::Paragraph { inlines }],
        });
    }

    Ok(ListItem {
        children: blocks(object, "ListItem")?,
    })
}

fn inline(value: &Value) -> Result<Inline, StructureError> {
    let (object, kind) = tagged(value)?;
    let inline = match kind {
        "Text" => Inline::Text {
            value: string(object, "Text", &["value", "text"])?,
        },
        "Bold" => Inline::Bold {
            children: inlines(object, "Bold", &["children", "inline"])?,
        },
        "Italic" => Inline::Italic {
            children: inlines(object, "Italic", &["children", "inline"])?,
        },
        "CodeSpan" => Inline::CodeSpan {
            code: string(object, "CodeSpan", &["code"])?,
        },
        "Link" => Inline::Link {
            children: inlines(object, "Link", &["children", "inline"])?,
            url: string(object, "Link", &["url", "href"])?,
            title: optional_string(object, "Link", "title")?,
        },
        other => return Err(unexpected("inline", other)),
    };
    Ok(inline)
}

/// The first present field among `names` as an array. Absent means empty.
fn list<'v>(
    object: &'v Map<String, Value>,
    node: &'static str,
    names: &[&'static str],
) -> Result<&'v [Value], StructureError> {
    for &field in names {
        if let Some(value) = object.get(field) {
            return value
                .as_array()
                .map(Vec::as_slice)
                .ok_or(StructureError::InvalidField { node, field });
        }
    }
    Ok(&[])
}

fn blocks(object: &Map<String, Value>, node: &'static str) -> Result<Vec<Block>, StructureError> {
    list(object, node, &["children"])?
        .iter()
        .map(block)
        .collect()
}

fn inlines(
    object: &Map<String, Value>,
    node: &'static str,
    names: &[&'static str],
) -> Result<Vec<Inline>, StructureError> {
    list(object, node, names)?.iter().map(inline).collect()
}

fn items(object: &Map<String, Value>, node: &'static str) -> Result<Vec<ListItem>, StructureError> {
    list(object, node, &["items"])?
        .iter()
        .map(list_item)
        .collect()
}

fn string(
    object: &Map<String, Value>,
    node: &'static str,
    names: &[&'static str],
) -> Result<String, StructureError> {
    for &field in names {
        if let Some(value) = object.get(field) {
            return value
                .as_str()
                .map(str::to_string)
                .ok_or(StructureError::InvalidField { node, field });
        }
    }
    Err(StructureError::MissingField {
        node,
        field: names[0],
    })
}

fn optional_string(
    object: &Map<String, Value>,
    node: &'static str,
    field: &'static str,
) -> Result<Option<String>, StructureError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(StructureError::InvalidField { node, field }),
    }
}

fn flag(
    object: &Map<String, Value>,
    node: &'static str,
    field: &'static str,
) -> Result<bool, StructureError> {
    match object.get(field) {
        None => Ok(false),
        Some(value) => value
            .as_bool()
            .ok_or(StructureError::InvalidField { node, field }),
    }
}

fn level(object: &Map<String, Value>) -> Result<usize, StructureError> {
    let value = object.get("level").ok_or(StructureError::MissingField {
        node: "Heading",
        field: "level",
    })?;
    value
        .as_u64()
        .and_then(|level| usize::try_from(level).ok())
        .ok_or(StructureError::InvalidField {
            node: "Heading",
            field: "level",
        })
}
