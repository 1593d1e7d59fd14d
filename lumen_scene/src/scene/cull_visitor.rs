/// Cull traversal — runs light selectors and records drawables.
///
/// Walks the graph for one camera, keeping a model-view matrix stack and a
/// render-state stack of lighting configurations. Every drawable visited is
/// recorded as a RenderLeaf with the configuration on top of the stack at
/// that point; that is how selection results reach draw-state consumers.

use std::sync::Arc;
use glam::Mat4;
use slotmap::SlotMap;
use crate::camera::Camera;
use crate::error::Result;
use crate::lighting::{LightManager, LightManagerKey, LightSelector, LightingConfiguration};
use crate::engine_err;
use super::node::{content_bound, Node, NodeKey, NodeKind};

// ===== RENDER STATE STACK =====

/// Scoped stack of lighting configurations.
///
/// Counts every push and pop so callers can check that selection left the
/// stack balanced.
#[derive(Debug, Default)]
pub struct StateStack {
    stack: Vec<Arc<LightingConfiguration>>,
    pushes: usize,
    pops: usize,
}

impl StateStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a configuration for the coming subtree
    pub fn push(&mut self, configuration: Arc<LightingConfiguration>) {
        self.stack.push(configuration);
        self.pushes += 1;
    }

    /// Pop the innermost configuration
    pub fn pop(&mut self) -> Option<Arc<LightingConfiguration>> {
        let popped = self.stack.pop();
        if popped.is_some() {
            self.pops += 1;
        }
        popped
    }

    /// Innermost configuration, the one in effect
    pub fn top(&self) -> Option<&Arc<LightingConfiguration>> {
        self.stack.last()
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Total pushes so far
    pub fn push_count(&self) -> usize {
        self.pushes
    }

    /// Total pops so far
    pub fn pop_count(&self) -> usize {
        self.pops
    }
}

// ===== CULL OUTPUT =====

/// One drawable reached by the cull traversal.
#[derive(Debug, Clone)]
pub struct RenderLeaf {
    /// Drawable node
    pub node: NodeKey,
    /// Model-view matrix at the drawable
    pub model_view: Mat4,
    /// Lighting in effect for the drawable, `None` when unlit by dynamic lights
    pub lighting: Option<Arc<LightingConfiguration>>,
}

/// Counters for one cull traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Drawables recorded
    pub drawables: usize,
    /// Light selectors run
    pub selections: usize,
    /// Configurations pushed on the state stack
    pub state_pushes: usize,
    /// Configurations popped from the state stack
    pub state_pops: usize,
}

/// Result of culling the scene for one camera.
#[derive(Debug, Clone, Default)]
pub struct RenderList {
    leaves: Vec<RenderLeaf>,
    stats: CullStats,
}

impl RenderList {
    /// Drawables in traversal order
    pub fn leaves(&self) -> &[RenderLeaf] {
        &self.leaves
    }

    /// Leaf recorded for `node` (first occurrence)
    pub fn leaf(&self, node: NodeKey) -> Option<&RenderLeaf> {
        self.leaves.iter().find(|l| l.node == node)
    }

    /// Traversal counters
    pub fn stats(&self) -> CullStats {
        self.stats
    }

    /// Number of drawables recorded
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

// ===== CULL VISITOR =====

pub(crate) struct CullVisitor<'a> {
    nodes: &'a SlotMap<NodeKey, Node>,
    managers: &'a mut SlotMap<LightManagerKey, LightManager>,
    camera: &'a Camera,
    model_view_stack: Vec<Mat4>,
    state_stack: StateStack,
    leaves: Vec<RenderLeaf>,
    selections: usize,
}

impl<'a> CullVisitor<'a> {
    pub(crate) fn new(
        nodes: &'a SlotMap<NodeKey, Node>,
        managers: &'a mut SlotMap<LightManagerKey, LightManager>,
        camera: &'a Camera,
    ) -> Self {
        Self {
            nodes,
            managers,
            camera,
            model_view_stack: vec![*camera.view_matrix()],
            state_stack: StateStack::new(),
            leaves: Vec::new(),
            selections: 0,
        }
    }

    /// Cull from `root` and hand back what was recorded.
    pub(crate) fn traverse(mut self, root: NodeKey) -> Result<RenderList> {
        self.apply(root)?;

        let stats = CullStats {
            drawables: self.leaves.len(),
            selections: self.selections,
            state_pushes: self.state_stack.push_count(),
            state_pops: self.state_stack.pop_count(),
        };
        Ok(RenderList { leaves: self.leaves, stats })
    }

    fn model_view(&self) -> Mat4 {
        self.model_view_stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    fn apply(&mut self, key: NodeKey) -> Result<()> {
        let nodes = self.nodes;
        let node = nodes.get(key)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::CullVisitor", "Node {:?} not found", key))?;

        let transform = match node.kind() {
            NodeKind::Transform(matrix) => Some(*matrix),
            _ => None,
        };
        if let Some(matrix) = transform {
            let model_view = self.model_view() * matrix;
            self.model_view_stack.push(model_view);
        }

        let result = match node.light_selector() {
            Some(selector) => self.apply_light_selector(key, node, selector),
            None => self.traverse_node(key, node),
        };

        if transform.is_some() {
            self.model_view_stack.pop();
        }
        result
    }

    /// Run the node's selector, then traverse with the chosen lights pushed.
    fn apply_light_selector(&mut self, key: NodeKey, node: &Node, selector: &LightSelector) -> Result<()> {
        self.selections += 1;

        let manager = self.managers.get_mut(selector.manager())
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::CullVisitor",
                "LightManager {:?} for node '{}' not found", selector.manager(), node.name()))?;

        let model_view = self.model_view_stack.last().copied().unwrap_or(Mat4::IDENTITY);
        let bound = content_bound(self.nodes, key);

        match selector.select(manager, self.camera, &bound, &model_view)? {
            None => self.traverse_node(key, node),
            Some(configuration) => {
                self.state_stack.push(configuration);
                let result = self.traverse_node(key, node);
                self.state_stack.pop();
                result
            }
        }
    }

    fn traverse_node(&mut self, key: NodeKey, node: &Node) -> Result<()> {
        if node.is_drawable() {
            self.leaves.push(RenderLeaf {
                node: key,
                model_view: self.model_view(),
                lighting: self.state_stack.top().cloned(),
            });
        }

        for &child in node.children() {
            self.apply(child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "cull_visitor_tests.rs"]
mod tests;
