//! Execution context carrying request-scoped values
//!
//! This module provides:
//! - `Context`: an immutable, hierarchical value carrier passed along a call chain
//! - `append`: copy-on-append attribute storage inside a context
//!
//! Every derivation returns a new `Context`; the one it was derived from is
//! never touched, so contexts can be cloned into threads or tasks and
//! extended independently without locking.

use super::attr::{Attr, AttrValue};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Immutable, hierarchical key-value carrier
///
/// Values are keyed by their type. A lookup walks from the newest
/// derivation towards the root and returns the first match, so a child can
/// shadow a parent's value without changing it.
///
/// # Example
///
/// ```
/// use ctxlog::Context;
///
/// let root = Context::background();
/// let ctx = root.append("request_id", "abc").append("user_id", 42);
///
/// assert!(root.attrs().is_empty());
/// assert_eq!(ctx.attrs().len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Context {
    node: Option<Arc<Node>>,
}

struct Node {
    parent: Option<Arc<Node>>,
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
}

impl Drop for Node {
    // Unlink iteratively so long chains do not recurse on drop
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl Context {
    /// Create an empty root context
    pub fn new() -> Self {
        Self { node: None }
    }

    /// Empty root context, used wherever no caller context exists
    pub fn background() -> Self {
        Self::new()
    }

    /// Derive a child context holding `value` under its type
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Context {
        Context {
            node: Some(Arc::new(Node {
                parent: self.node.clone(),
                key: TypeId::of::<T>(),
                value: Box::new(value),
            })),
        }
    }

    /// Nearest value of type `T` on this context's chain
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        let key = TypeId::of::<T>();
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            if node.key == key {
                return node.value.downcast_ref::<T>();
            }
            current = node.parent.as_deref();
        }
        None
    }

    /// Derive a child context with one attribute appended
    #[must_use]
    pub fn append(&self, key: impl Into<String>, value: impl Into<AttrValue>) -> Context {
        self.append_attrs([Attr::new(key, value)])
    }

    /// Derive a child context with every attribute of `attrs` appended in order
    ///
    /// Returns a plain clone when `attrs` is empty.
    #[must_use]
    pub fn append_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Context {
        let current = self.attr_list().cloned().unwrap_or_default();
        let extended = attrs.into_iter().fold(current.clone(), AttrList::push);

        if extended.len == current.len {
            return self.clone();
        }
        self.with_value(extended)
    }

    /// Every attribute appended to this context and its ancestors, oldest first
    pub fn attrs(&self) -> Vec<Attr> {
        self.attr_list().map(AttrList::to_vec).unwrap_or_default()
    }

    /// Number of attributes visible from this context
    pub fn attr_count(&self) -> usize {
        self.attr_list().map_or(0, |list| list.len)
    }

    fn attr_list(&self) -> Option<&AttrList> {
        self.value::<AttrList>()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("attrs", &self.attrs())
            .finish_non_exhaustive()
    }
}

/// Append an attribute to `ctx`, starting from an empty root when absent
///
/// The original context is left as it was.
pub fn append(
    ctx: Option<&Context>,
    key: impl Into<String>,
    value: impl Into<AttrValue>,
) -> Context {
    match ctx {
        Some(ctx) => ctx.append(key, value),
        None => Context::background().append(key, value),
    }
}

/// Attributes accumulated on `ctx`, empty when absent
pub fn attrs(ctx: Option<&Context>) -> Vec<Attr> {
    ctx.map(Context::attrs).unwrap_or_default()
}

/// Persistent attribute list
///
/// Each push allocates one node pointing at the previous tail, so sibling
/// contexts share the prefix they were derived from. This is the private
/// value type under which contexts store their attributes.
#[derive(Clone, Default)]
struct AttrList {
    tail: Option<Arc<AttrNode>>,
    len: usize,
}

struct AttrNode {
    attr: Attr,
    prev: Option<Arc<AttrNode>>,
}

impl Drop for AttrNode {
    fn drop(&mut self) {
        let mut next = self.prev.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.prev.take(),
                Err(_) => break,
            }
        }
    }
}

impl AttrList {
    fn push(self, attr: Attr) -> AttrList {
        AttrList {
            tail: Some(Arc::new(AttrNode {
                attr,
                prev: self.tail,
            })),
            len: self.len + 1,
        }
    }

    fn to_vec(&self) -> Vec<Attr> {
        let mut out = Vec::with_capacity(self.len);
        let mut current = self.tail.as_deref();
        while let Some(node) = current {
            out.push(node.attr.clone());
            current = node.prev.as_deref();
        }
        out.reverse();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ctx: &Context) -> Vec<String> {
        ctx.attrs().into_iter().map(|a| a.key).collect()
    }

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert!(ctx.attrs().is_empty());
        assert_eq!(ctx.attr_count(), 0);
    }

    #[test]
    fn test_append_on_absent_context() {
        let ctx = append(None, "key", "value");
        assert_eq!(ctx.attrs(), vec![Attr::new("key", "value")]);
    }

    #[test]
    fn test_append_leaves_parent_untouched() {
        let parent = Context::background().append("a", 1);
        let child = parent.append("b", 2);

        assert_eq!(keys(&parent), vec!["a"]);
        assert_eq!(keys(&child), vec!["a", "b"]);
    }

    #[test]
    fn test_sibling_branches_are_isolated() {
        let base = append(None, "request_id", "abc");
        let left = base.append("branch", "left").append("step", 1);
        let right = base.append("branch", "right");

        assert_eq!(keys(&left), vec!["request_id", "branch", "step"]);
        assert_eq!(keys(&right), vec!["request_id", "branch"]);
        assert_eq!(right.attrs()[1].value, AttrValue::String("right".into()));
        assert_eq!(keys(&base), vec!["request_id"]);
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let ctx = append(None, "stage", "parse").append("stage", "render");
        let values: Vec<_> = ctx.attrs().into_iter().map(|a| a.value).collect();
        assert_eq!(
            values,
            vec![AttrValue::from("parse"), AttrValue::from("render")]
        );
    }

    #[test]
    fn test_append_attrs_batch() {
        let ctx = Context::background()
            .append("first", true)
            .append_attrs(vec![Attr::new("second", 2), Attr::new("third", 3.5)]);
        assert_eq!(keys(&ctx), vec!["first", "second", "third"]);
        assert_eq!(ctx.attr_count(), 3);

        let same = ctx.append_attrs(Vec::new());
        assert_eq!(same.attr_count(), 3);
    }

    #[test]
    fn test_values_survive_attribute_appends() {
        #[derive(Debug, PartialEq)]
        struct Tenant(&'static str);

        let ctx = Context::background()
            .with_value(Tenant("acme"))
            .append("k", "v");

        assert_eq!(ctx.value::<Tenant>(), Some(&Tenant("acme")));
        assert_eq!(ctx.attr_count(), 1);
    }

    #[test]
    fn test_child_value_shadows_parent() {
        let parent = Context::background().with_value(1_u8);
        let child = parent.with_value(2_u8);

        assert_eq!(parent.value::<u8>(), Some(&1));
        assert_eq!(child.value::<u8>(), Some(&2));
        assert_eq!(child.value::<u16>(), None);
    }

    #[test]
    fn test_long_chain_drops_without_overflow() {
        let mut ctx = Context::background();
        for i in 0..100_000 {
            ctx = ctx.append("i", i);
        }
        assert_eq!(ctx.attr_count(), 100_000);
        drop(ctx);
    }

    #[test]
    fn test_context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }
}
