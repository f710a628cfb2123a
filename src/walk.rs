//! Depth-limited pre-order traversal over a JSON document
//!
//! Every locator and resolver in this crate is a [`Visitor`] driven by
//! [`PathWalker`]. Paths only record object keys: all elements of an array
//! share the path of the key that holds the array.

use crate::error::{Result, ShapeError};
use serde_json::Value;
use std::ops::ControlFlow;

/// Object keys taken from the document root to reach a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> KeyPath<'a> {
    pub fn root() -> Self {
        KeyPath::default()
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Dot-joined form, empty at the root
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    pub fn terminal(&self) -> Option<&'a str> {
        self.segments.last().copied()
    }

    /// Human-facing name: the last segment of [`dotted`](Self::dotted), or
    /// `root_label` at the root. A key `"api.v1"` is labelled `"v1"`.
    pub fn label<'s>(&self, root_label: &'s str) -> &'s str
    where
        'a: 's,
    {
        key_label(self.terminal(), root_label)
    }

    pub fn to_owned_segments(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.to_string()).collect()
    }

    fn push(&mut self, key: &'a str) {
        self.segments.push(key);
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

/// Last dot-separated segment of `key`, or `root_label` when there is no key
pub(crate) fn key_label<'s>(key: Option<&'s str>, root_label: &'s str) -> &'s str {
    match key {
        Some(key) => key.rsplit('.').next().unwrap_or(key),
        None => root_label,
    }
}

/// A node as seen by a visitor
#[derive(Debug)]
pub struct Node<'a, 'w> {
    pub value: &'a Value,
    pub path: &'w KeyPath<'a>,
    /// True once any ancestor array has been entered
    pub inside_array: bool,
    pub depth: usize,
}

/// What the walker does after visiting a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Walk the node's children
    Descend,
    /// Leave the node's children unvisited
    Skip,
    /// End the whole walk
    Stop,
}

pub trait Visitor<'a> {
    fn visit(&mut self, node: &Node<'a, '_>) -> Flow;
}

/// Recursive walker that fails with [`ShapeError::TooDeep`] instead of
/// exhausting the stack
#[derive(Debug, Clone, Copy)]
pub struct PathWalker {
    max_depth: usize,
}

impl PathWalker {
    pub fn new(max_depth: usize) -> Self {
        PathWalker { max_depth }
    }

    /// Visit `root` and its descendants in document pre-order
    pub fn walk<'a, V: Visitor<'a>>(&self, root: &'a Value, visitor: &mut V) -> Result<()> {
        let mut path = KeyPath::root();
        self.step(root, &mut path, false, 0, visitor)?;
        Ok(())
    }

    fn step<'a, V: Visitor<'a>>(
        &self,
        value: &'a Value,
        path: &mut KeyPath<'a>,
        inside_array: bool,
        depth: usize,
        visitor: &mut V,
    ) -> Result<ControlFlow<()>> {
        if depth > self.max_depth {
            return Err(ShapeError::TooDeep {
                max_depth: self.max_depth,
            });
        }

        let node = Node {
            value,
            path,
            inside_array,
            depth,
        };
        match visitor.visit(&node) {
            Flow::Stop => return Ok(ControlFlow::Break(())),
            Flow::Skip => return Ok(ControlFlow::Continue(())),
            Flow::Descend => {}
        }

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    path.push(key.as_str());
                    let flow = self.step(child, path, inside_array, depth + 1, visitor)?;
                    path.pop();
                    if flow.is_break() {
                        return Ok(flow);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    let flow = self.step(item, path, true, depth + 1, visitor)?;
                    if flow.is_break() {
                        return Ok(flow);
                    }
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }

        Ok(ControlFlow::Continue(()))
    }
}
