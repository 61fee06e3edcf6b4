use serde::{
    de::{self, value::MapAccessDeserializer, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::{fmt, path::Path, time::Instant};

use crate::errors::IndexError;

const PLACE_TYPE: &str = "text/x-moz-place";
const CONTAINER_TYPE: &str = "text/x-moz-place-container";
const TAGS_ROOT: &str = "tagsFolder";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
}

/// A node of the browser's bookmark backup tree, discriminated by its `type`.
///
/// Any JSON value is accepted: entries that are not objects, or objects with
/// an unknown `type`, become [`Node::Other`] instead of failing the file.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Place {
        title: String,
        uri: String,
    },
    Container {
        root: Option<String>,
        children: Vec<Node>,
    },
    /// Separators, untyped nodes and anything else we don't index.
    Other,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(default, rename = "type")]
    kind: Option<serde_json::Value>,
    #[serde(default)]
    root: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<serde_json::Value>,
    #[serde(default)]
    uri: Option<serde_json::Value>,
    #[serde(default)]
    children: Children,
}

fn text(value: Option<serde_json::Value>) -> Option<String> {
    match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    }
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        match text(raw.kind).as_deref() {
            Some(PLACE_TYPE) => match text(raw.uri) {
                Some(uri) => Node::Place {
                    title: text(raw.title).unwrap_or_default(),
                    uri,
                },
                None => Node::Other,
            },
            Some(CONTAINER_TYPE) => Node::Container {
                root: text(raw.root),
                children: raw.children.0,
            },
            _ => Node::Other,
        }
    }
}

impl Node {
    pub fn is_tags_folder(&self) -> bool {
        matches!(self, Node::Container { root: Some(root), .. } if root == TAGS_ROOT)
    }
}

/// Visitor methods that map every JSON scalar to `$value`.
macro_rules! skip_scalars {
    ($value:expr) => {
        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok($value)
        }

        fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
            Ok($value)
        }

        fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
            Ok($value)
        }

        fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
            Ok($value)
        }

        fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
            Ok($value)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok($value)
        }
    };
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a bookmark node")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Node, A::Error> {
        RawNode::deserialize(MapAccessDeserializer::new(map)).map(Node::from)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Node::Other)
    }

    skip_scalars!(Node::Other);
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

/// A `children` value. Anything but an array counts as no children.
#[derive(Default)]
struct Children(Vec<Node>);

struct ChildrenVisitor;

impl<'de> Visitor<'de> for ChildrenVisitor {
    type Value = Children;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a list of bookmark nodes")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Children, A::Error> {
        let mut nodes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(node) = seq.next_element::<Node>()? {
            nodes.push(node);
        }
        Ok(Children(nodes))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Children, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Children::default())
    }

    skip_scalars!(Children::default());
}

impl<'de> Deserialize<'de> for Children {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ChildrenVisitor)
    }
}

/// The top level of a backup file: only its `children` matter.
#[derive(Deserialize)]
struct Document {
    children: Vec<Node>,
}

// Folder depth is unbounded, so the json recursion limit is lifted and deep
// trees continue on a heap-allocated stack.
fn parse_document(data: &[u8]) -> Result<Document, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(data);
    deserializer.disable_recursion_limit();
    let document = Document::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(document)
}

/// Parses a bookmark backup and flattens every top-level folder except the
/// tags folder into a pre-order list of places.
pub fn parse(path: &Path, data: &[u8]) -> Result<Vec<Bookmark>, IndexError> {
    if data.is_empty() {
        return Err(IndexError::EmptyData(path.to_path_buf()));
    }

    let document = parse_document(data).map_err(|source| IndexError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut bmarks = vec![];
    for child in document.children.iter() {
        if child.is_tags_folder() {
            continue;
        }
        flatten(std::slice::from_ref(child), &mut bmarks);
    }

    Ok(bmarks)
}

/// Appends the places under `nodes` to `out` in pre-order.
pub fn flatten(nodes: &[Node], out: &mut Vec<Bookmark>) {
    let mut pending = vec![nodes.iter()];
    while let Some(siblings) = pending.last_mut() {
        let Some(node) = siblings.next() else {
            pending.pop();
            continue;
        };

        match node {
            Node::Place { title, uri } => out.push(Bookmark {
                title: title.clone(),
                url: uri.clone(),
            }),
            Node::Container { children, .. } => pending.push(children.iter()),
            Node::Other => {}
        }
    }
}

/// Reads and flattens the bookmark file at `path`.
pub fn read_index(path: &Path) -> Result<Vec<Bookmark>, IndexError> {
    let now = Instant::now();

    let data = std::fs::read(path).map_err(|source| IndexError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let bmarks = parse(path, &data)?;

    log::debug!(
        "took {}ms to read {}",
        now.elapsed().as_micros() as f64 / 1000.0,
        path.display()
    );

    Ok(bmarks)
}
