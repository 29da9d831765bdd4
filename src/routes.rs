// src/routes.rs
//! Static route tree.
//!
//! Nodes live in an arena owned by [`RouteTree`]; children are owned top-down and
//! each node keeps its parent as a plain [`RouteId`] for upward traversal. The tree
//! is built once through [`RouteBuilder`] and never mutated afterwards.
use crate::errors::RouteTreeError;
use crate::loader::Loader;
use crate::pages::Page;
use log::trace;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(usize);

impl RouteId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Param(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => write!(f, "{}", s),
            Segment::Param(name) => write!(f, ":{}", name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_string(), value.to_string());
    }
}

pub struct RouteNode {
    /// The declared path of this node relative to its parent ("" for the root and index nodes).
    path: String,
    segments: Vec<Segment>,
    index: bool,
    parent: Option<RouteId>,
    children: Vec<RouteId>,
    page: Page,
    loader: Option<Arc<dyn Loader>>,
}

impl RouteNode {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_index(&self) -> bool {
        self.index
    }

    pub fn parent(&self) -> Option<RouteId> {
        self.parent
    }

    pub fn children(&self) -> &[RouteId] {
        &self.children
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn loader(&self) -> Option<&Arc<dyn Loader>> {
        self.loader.as_ref()
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("path", &self.path)
            .field("index", &self.index)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("page", &self.page)
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}

/// A successful match: every node from the root down to the leaf, plus the
/// parameters captured along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    chain: Vec<RouteId>,
    params: Params,
}

impl RouteMatch {
    pub fn chain(&self) -> &[RouteId] {
        &self.chain
    }

    pub fn leaf(&self) -> RouteId {
        // A match always contains at least the root.
        self.chain[self.chain.len() - 1]
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

#[derive(Debug)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
}

impl RouteTree {
    pub fn root(&self) -> RouteId {
        RouteId(0)
    }

    pub fn node(&self, id: RouteId) -> &RouteNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RouteId, &RouteNode)> {
        self.nodes.iter().enumerate().map(|(i, node)| (RouteId(i), node))
    }

    /// Full pattern of a node, rebuilt by walking parent links, e.g. `/app/podcast/:podcastId`.
    pub fn pattern(&self, id: RouteId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if !node.path.is_empty() {
                parts.push(&node.path);
            }
            current = node.parent;
        }
        parts.reverse();
        let joined = parts.join("/");
        if self.node(id).index { format!("/{}/", joined) } else { format!("/{}", joined) }
    }

    /// Matches a location (query string and fragment are ignored, as are
    /// trailing slashes). Segments are percent-decoded before matching.
    /// Children are tried in declaration order; the first full match wins.
    /// A layout node only matches on its own when it has an index child to
    /// render.
    pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();

        let mut chain = Vec::new();
        let mut params = Params::default();
        if self.match_node(self.root(), &segments, &mut chain, &mut params) {
            trace!("RouteTree: {} matched {}", location, self.pattern(chain[chain.len() - 1]));
            Some(RouteMatch { chain, params })
        } else {
            trace!("RouteTree: {} matched nothing", location);
            None
        }
    }

    fn match_node(
        &self,
        id: RouteId,
        remaining: &[String],
        chain: &mut Vec<RouteId>,
        params: &mut Params,
    ) -> bool {
        let node = self.node(id);
        if node.segments.len() > remaining.len() {
            return false;
        }

        let mut captured = Params::default();
        for (segment, actual) in node.segments.iter().zip(remaining) {
            match segment {
                Segment::Static(expected) if expected == actual => {}
                Segment::Static(_) => return false,
                Segment::Param(name) => captured.insert(name, actual),
            }
        }
        let rest = &remaining[node.segments.len()..];

        chain.push(id);
        let matched = if rest.is_empty() {
            if node.children.is_empty() {
                true
            } else {
                match node.children.iter().find(|child| self.node(**child).index) {
                    Some(index_child) => {
                        chain.push(*index_child);
                        true
                    }
                    None => false,
                }
            }
        } else {
            node.children
                .iter()
                .filter(|child| !self.node(**child).index)
                .any(|child| self.match_node(*child, rest, chain, params))
        };

        if matched {
            for (name, value) in captured.0 {
                params.0.insert(name, value);
            }
        } else {
            chain.pop();
        }
        matched
    }
}

// ===== builder

/// Declarative description of one route and its children, turned into a
/// [`RouteTree`] by [`RouteBuilder::build`].
pub struct RouteBuilder {
    path: String,
    index: bool,
    page: Page,
    loader: Option<Arc<dyn Loader>>,
    children: Vec<RouteBuilder>,
}

impl RouteBuilder {
    pub fn root(page: Page) -> Self {
        Self { path: String::new(), index: false, page, loader: None, children: Vec::new() }
    }

    /// A route under its parent; `path` may span several segments and use
    /// `:name` for parameters, e.g. `podcast/:podcastId`. Empty segments are
    /// dropped, so `a//b/` is stored as `a/b`.
    pub fn path(path: &str, page: Page) -> Self {
        Self {
            path: path.split('/').filter(|s| !s.is_empty()).collect::<Vec<_>>().join("/"),
            index: false,
            page,
            loader: None,
            children: Vec::new(),
        }
    }

    /// Rendered when the parent matches exactly.
    pub fn index(page: Page) -> Self {
        Self { path: String::new(), index: true, page, loader: None, children: Vec::new() }
    }

    pub fn loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn child(mut self, child: RouteBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn build(self) -> Result<RouteTree, RouteTreeError> {
        let mut nodes = Vec::new();
        Self::insert(self, None, &mut nodes)?;
        Ok(RouteTree { nodes })
    }

    fn insert(
        builder: RouteBuilder,
        parent: Option<RouteId>,
        nodes: &mut Vec<RouteNode>,
    ) -> Result<RouteId, RouteTreeError> {
        let segments = parse_segments(&builder.path)?;
        let id = RouteId(nodes.len());
        nodes.push(RouteNode {
            path: builder.path.clone(),
            segments,
            index: builder.index,
            parent,
            children: Vec::new(),
            page: builder.page,
            loader: builder.loader,
        });

        let mut seen_shapes: Vec<Vec<Segment>> = Vec::new();
        let mut seen_index = false;
        for child in builder.children {
            if child.index {
                if seen_index {
                    return Err(RouteTreeError::DuplicateIndex(display_path(&builder.path)));
                }
                seen_index = true;
            } else {
                let shape = parse_segments(&child.path)?;
                if seen_shapes.iter().any(|seen| same_shape(seen, &shape)) {
                    return Err(RouteTreeError::DuplicateSegment {
                        parent: display_path(&builder.path),
                        segment: child.path,
                    });
                }
                seen_shapes.push(shape);
            }
            let child_id = Self::insert(child, Some(id), nodes)?;
            nodes[id.0].children.push(child_id);
        }
        Ok(id)
    }
}

fn parse_segments(path: &str) -> Result<Vec<Segment>, RouteTreeError> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix(':') {
            Some("") => Err(RouteTreeError::EmptyParamName(path.to_string())),
            Some(name) => Ok(Segment::Param(name.to_string())),
            None => Ok(Segment::Static(s.to_string())),
        })
        .collect()
}

// Two sibling paths collide when they would match the same locations: parameter
// names do not matter, only their positions.
fn same_shape(a: &[Segment], b: &[Segment]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|pair| match pair {
            (Segment::Param(_), Segment::Param(_)) => true,
            (Segment::Static(x), Segment::Static(y)) => x == y,
            _ => false,
        })
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "/".to_string() } else { path.to_string() }
}
