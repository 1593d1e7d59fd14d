/// Scene graph nodes.
///
/// Nodes are stored in a SlotMap owned by the SceneGraph and refer to each
/// other by `NodeKey`. A node has at most one parent.

use glam::Mat4;
use slotmap::{new_key_type, SlotMap};
use crate::lighting::{LightManagerKey, LightSelector, LightSource};
use crate::math::BoundingSphere;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Stable key for a Node within a SceneGraph.
    ///
    /// Keys remain valid until their own node (or an ancestor) is removed.
    pub struct NodeKey;
}

// ===== NODE KIND =====

/// What a node does during traversal.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain grouping node
    Group,
    /// Applies a local matrix to its children
    Transform(Mat4),
    /// Owns the lights registered below it
    LightManager(LightManagerKey),
    /// Emits a light; registers with the enclosing manager each frame
    LightSource(LightSource),
    /// Renderable leaf content with a local-space bound
    Drawable(BoundingSphere),
}

// ===== NODE =====

/// A scene graph node
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    light_selector: Option<LightSelector>,
}

impl Node {
    pub(crate) fn new(name: String, kind: NodeKind, parent: Option<NodeKey>) -> Self {
        Self {
            name,
            kind,
            parent,
            children: Vec::new(),
            light_selector: None,
        }
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node behavior
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Children in traversal order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeKey> {
        &mut self.children
    }

    /// Light selector attached by the decoration pass, if any
    pub fn light_selector(&self) -> Option<&LightSelector> {
        self.light_selector.as_ref()
    }

    pub(crate) fn set_light_selector(&mut self, selector: LightSelector) {
        self.light_selector = Some(selector);
    }

    /// Whether this node is a renderable leaf
    pub fn is_drawable(&self) -> bool {
        matches!(self.kind, NodeKind::Drawable(_))
    }

    /// Local matrix applied to children (identity unless Transform)
    pub fn local_matrix(&self) -> Mat4 {
        match self.kind {
            NodeKind::Transform(matrix) => matrix,
            _ => Mat4::IDENTITY,
        }
    }
}

// ===== BOUNDS =====

/// Bound of a node's content, in the node's own space (before its own
/// matrix). Invalid when the subtree holds no drawable.
pub(crate) fn content_bound(nodes: &SlotMap<NodeKey, Node>, key: NodeKey) -> BoundingSphere {
    let Some(node) = nodes.get(key) else {
        return BoundingSphere::INVALID;
    };

    if let NodeKind::Drawable(bound) = node.kind {
        return bound;
    }

    let mut bound = BoundingSphere::INVALID;
    for &child in &node.children {
        bound.expand_by(&parent_space_bound(nodes, child));
    }
    bound
}

/// Bound of a node as seen from its parent (after its own matrix).
fn parent_space_bound(nodes: &SlotMap<NodeKey, Node>, key: NodeKey) -> BoundingSphere {
    let bound = content_bound(nodes, key);
    match nodes.get(key).map(|n| &n.kind) {
        Some(NodeKind::Transform(matrix)) => bound.transformed(matrix),
        _ => bound,
    }
}
