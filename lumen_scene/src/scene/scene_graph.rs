/// SceneGraph — node storage and the per-frame lighting traversals.
///
/// Nodes and light managers live in two SlotMaps so a traversal can read the
/// graph while mutating the managers. Per frame the caller runs `update()`
/// once, then `cull()` once per camera.

use glam::Mat4;
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::camera::Camera;
use crate::error::Result;
use crate::lighting::{LightManager, LightManagerConfig, LightManagerKey, LightSelector, LightSource};
use crate::math::BoundingSphere;
use crate::{engine_err, engine_info};
use super::cull_visitor::{CullVisitor, RenderList};
use super::node::{content_bound, Node, NodeKey, NodeKind};
use super::update_visitor::UpdateVisitor;

/// A scene graph with dynamic lighting.
///
/// The root is a plain group created with the graph and cannot be removed.
pub struct SceneGraph {
    /// All nodes, addressed by stable keys
    nodes: SlotMap<NodeKey, Node>,
    /// Light managers owned by LightManager nodes
    light_managers: SlotMap<LightManagerKey, LightManager>,
    root: NodeKey,
}

impl SceneGraph {
    /// Create a graph holding only its root group
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("root".to_string(), NodeKind::Group, None));
        Self {
            nodes,
            light_managers: SlotMap::with_key(),
            root,
        }
    }

    // ===== ACCESSORS =====

    /// Root node key
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Get a node by key
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Manager handle owned by a LightManager node
    pub fn manager_key(&self, node: NodeKey) -> Option<LightManagerKey> {
        match self.nodes.get(node)?.kind() {
            NodeKind::LightManager(manager) => Some(*manager),
            _ => None,
        }
    }

    /// Light manager owned by a LightManager node
    pub fn light_manager(&self, node: NodeKey) -> Option<&LightManager> {
        let manager = self.manager_key(node)?;
        self.light_managers.get(manager)
    }

    /// Mutable light manager owned by a LightManager node
    pub fn light_manager_mut(&mut self, node: NodeKey) -> Option<&mut LightManager> {
        let manager = self.manager_key(node)?;
        self.light_managers.get_mut(manager)
    }

    /// Light source carried by a LightSource node.
    ///
    /// Edits take effect at the next `update()`.
    pub fn light_source_mut(&mut self, node: NodeKey) -> Option<&mut LightSource> {
        match self.nodes.get_mut(node)?.kind_mut() {
            NodeKind::LightSource(source) => Some(source),
            _ => None,
        }
    }

    // ===== CONSTRUCTION =====

    /// Add a plain group under `parent`
    pub fn add_group(&mut self, parent: NodeKey, name: &str) -> Result<NodeKey> {
        self.insert_node(parent, name, NodeKind::Group)
    }

    /// Add a transform under `parent`
    pub fn add_transform(&mut self, parent: NodeKey, name: &str, matrix: Mat4) -> Result<NodeKey> {
        self.insert_node(parent, name, NodeKind::Transform(matrix))
    }

    /// Add a drawable leaf with a local-space bound
    pub fn add_drawable(&mut self, parent: NodeKey, name: &str, bound: BoundingSphere) -> Result<NodeKey> {
        self.insert_node(parent, name, NodeKind::Drawable(bound))
    }

    /// Add a light source under `parent`.
    ///
    /// The light registers with the nearest enclosing LightManager during
    /// `update()`; that update fails if there is none.
    pub fn add_light_source(&mut self, parent: NodeKey, name: &str, source: LightSource) -> Result<NodeKey> {
        self.insert_node(parent, name, NodeKind::LightSource(source))
    }

    /// Add a LightManager node with its own manager
    pub fn add_light_manager(
        &mut self,
        parent: NodeKey,
        name: &str,
        config: LightManagerConfig,
    ) -> Result<NodeKey> {
        self.check_parent(parent, name)?;
        let manager = self.light_managers.insert(LightManager::with_config(config)?);
        self.insert_node(parent, name, NodeKind::LightManager(manager))
    }

    fn check_parent(&self, parent: NodeKey, name: &str) -> Result<()> {
        match self.nodes.get(parent) {
            None => Err(engine_err!(InvalidNode, "lumen::SceneGraph",
                "Parent {:?} of '{}' not found", parent, name)),
            Some(node) if node.is_drawable() => Err(engine_err!(InvalidNode, "lumen::SceneGraph",
                "Drawable '{}' cannot have children ('{}')", node.name(), name)),
            Some(_) => Ok(()),
        }
    }

    fn insert_node(&mut self, parent: NodeKey, name: &str, kind: NodeKind) -> Result<NodeKey> {
        self.check_parent(parent, name)?;
        let key = self.nodes.insert(Node::new(name.to_string(), kind, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children_mut().push(key);
        }
        Ok(key)
    }

    /// Remove a node and its whole subtree.
    ///
    /// Managers owned by removed LightManager nodes are dropped with them.
    pub fn remove_node(&mut self, key: NodeKey) -> Result<()> {
        if key == self.root {
            return Err(engine_err!(InvalidNode, "lumen::SceneGraph", "The root node cannot be removed"));
        }
        let parent = self.nodes.get(key)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::SceneGraph", "Node {:?} not found", key))?
            .parent();

        if let Some(parent_node) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent_node.children_mut().retain(|&c| c != key);
        }

        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                if let NodeKind::LightManager(manager) = node.kind() {
                    self.light_managers.remove(*manager);
                }
                stack.extend_from_slice(node.children());
            }
        }
        Ok(())
    }

    /// Replace the matrix of a Transform node
    pub fn set_matrix(&mut self, key: NodeKey, matrix: Mat4) -> Result<()> {
        let node = self.nodes.get_mut(key)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::SceneGraph", "Node {:?} not found", key))?;
        if let NodeKind::Transform(m) = node.kind_mut() {
            *m = matrix;
            return Ok(());
        }
        Err(engine_err!(InvalidNode, "lumen::SceneGraph", "Node '{}' is not a Transform", node.name()))
    }

    // ===== QUERIES =====

    /// Bound of the node's content in its own space
    pub fn bound(&self, key: NodeKey) -> BoundingSphere {
        content_bound(&self.nodes, key)
    }

    /// Matrix from the node's child space to world space (own matrix included)
    pub fn local_to_world(&self, key: NodeKey) -> Result<Mat4> {
        let mut node = self.nodes.get(key)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::SceneGraph", "Node {:?} not found", key))?;
        let mut matrix = node.local_matrix();
        while let Some(parent) = node.parent().and_then(|p| self.nodes.get(p)) {
            matrix = parent.local_matrix() * matrix;
            node = parent;
        }
        Ok(matrix)
    }

    // ===== DECORATION =====

    /// Attach light selectors below a LightManager node.
    ///
    /// Every parent of a drawable in the manager's subtree gets one selector
    /// bound to that manager. Nested LightManager subtrees are left to their
    /// own manager. Runs once per manager; returns the number of selectors
    /// attached (0 when already decorated).
    pub fn decorate(&mut self, manager_node: NodeKey) -> Result<usize> {
        let manager_key = self.manager_key(manager_node)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::SceneGraph",
                "Node {:?} is not a LightManager", manager_node))?;

        let already = self.light_managers.get(manager_key)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::SceneGraph",
                "LightManager {:?} not found", manager_key))?
            .is_decorated();
        if already {
            return Ok(0);
        }

        let mut targets: Vec<NodeKey> = Vec::new();
        let mut seen: FxHashSet<NodeKey> = FxHashSet::default();
        let mut stack: Vec<NodeKey> = vec![manager_node];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else { continue };

            if node.is_drawable() {
                if let Some(parent) = node.parent() {
                    let free = self.nodes.get(parent).is_some_and(|p| p.light_selector().is_none());
                    if free && seen.insert(parent) {
                        targets.push(parent);
                    }
                }
                continue;
            }

            if current != manager_node && matches!(node.kind(), NodeKind::LightManager(_)) {
                continue;
            }
            stack.extend(node.children().iter().rev());
        }

        let selector = LightSelector::new(manager_key);
        for &target in &targets {
            if let Some(node) = self.nodes.get_mut(target) {
                node.set_light_selector(selector);
            }
        }
        if let Some(manager) = self.light_managers.get_mut(manager_key) {
            manager.mark_decorated();
        }

        let name = self.nodes.get(manager_node).map(|n| n.name().to_string()).unwrap_or_default();
        engine_info!("lumen::SceneGraph",
            "LightManager '{}' decorated with {} light selectors", name, targets.len());

        Ok(targets.len())
    }

    /// Attach a selector for `manager_node` to `node` by hand, replacing any
    /// selector already there.
    pub fn attach_light_selector(&mut self, node: NodeKey, manager_node: NodeKey) -> Result<()> {
        let manager_key = self.manager_key(manager_node)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::SceneGraph",
                "Node {:?} is not a LightManager", manager_node))?;
        let target = self.nodes.get_mut(node)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::SceneGraph", "Node {:?} not found", node))?;
        target.set_light_selector(LightSelector::new(manager_key));
        Ok(())
    }

    // ===== FRAME =====

    /// Run the update traversal.
    ///
    /// Resets every manager reached, collects each light source into its
    /// nearest enclosing manager and decorates managers on their first
    /// update.
    ///
    /// # Errors
    ///
    /// `LightOutsideManager` if a light source has no enclosing manager.
    /// The frame must then be abandoned.
    pub fn update(&mut self) -> Result<()> {
        let pending = UpdateVisitor::new(&self.nodes, &mut self.light_managers).traverse(self.root)?;
        for manager_node in pending {
            self.decorate(manager_node)?;
        }
        Ok(())
    }

    /// Run the cull traversal for one camera
    pub fn cull(&mut self, camera: &Camera) -> Result<RenderList> {
        CullVisitor::new(&self.nodes, &mut self.light_managers, camera).traverse(self.root)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
