/// Update traversal — resets light managers and collects lights.
///
/// Walks the graph depth-first, accumulating world matrices. The nearest
/// enclosing LightManager is carried down as traversal context, so a light
/// source registers with it directly instead of searching its ancestry.

use glam::Mat4;
use slotmap::SlotMap;
use crate::error::Result;
use crate::lighting::{LightManager, LightManagerKey};
use crate::engine_err;
use super::node::{Node, NodeKey, NodeKind};

pub(crate) struct UpdateVisitor<'a> {
    nodes: &'a SlotMap<NodeKey, Node>,
    managers: &'a mut SlotMap<LightManagerKey, LightManager>,
    /// Manager nodes whose subtree still needs the decoration pass
    pending_decoration: Vec<NodeKey>,
}

impl<'a> UpdateVisitor<'a> {
    pub(crate) fn new(
        nodes: &'a SlotMap<NodeKey, Node>,
        managers: &'a mut SlotMap<LightManagerKey, LightManager>,
    ) -> Self {
        Self {
            nodes,
            managers,
            pending_decoration: Vec::new(),
        }
    }

    /// Traverse from `root`. Returns the manager nodes awaiting decoration.
    pub(crate) fn traverse(mut self, root: NodeKey) -> Result<Vec<NodeKey>> {
        self.apply(root, Mat4::IDENTITY, None)?;
        Ok(self.pending_decoration)
    }

    fn apply(
        &mut self,
        key: NodeKey,
        parent_world: Mat4,
        manager: Option<LightManagerKey>,
    ) -> Result<()> {
        let nodes = self.nodes;
        let node = nodes.get(key)
            .ok_or_else(|| engine_err!(InvalidNode, "lumen::UpdateVisitor", "Node {:?} not found", key))?;

        let world = parent_world * node.local_matrix();
        let mut manager = manager;

        match node.kind() {
            NodeKind::LightManager(manager_key) => {
                let light_manager = self.managers.get_mut(*manager_key)
                    .ok_or_else(|| engine_err!(InvalidNode, "lumen::UpdateVisitor",
                        "LightManager {:?} of node '{}' not found", manager_key, node.name()))?;
                if light_manager.update() {
                    self.pending_decoration.push(key);
                }
                manager = Some(*manager_key);
            }
            NodeKind::LightSource(source) => {
                let manager_key = manager
                    .ok_or_else(|| engine_err!(LightOutsideManager, "lumen::UpdateVisitor",
                        "Light source '{}' has no enclosing LightManager", node.name()))?;
                let light_manager = self.managers.get_mut(manager_key)
                    .ok_or_else(|| engine_err!(InvalidNode, "lumen::UpdateVisitor",
                        "LightManager {:?} not found", manager_key))?;
                light_manager.add_light(key, source, world);
            }
            _ => {}
        }

        for &child in node.children() {
            self.apply(child, world, manager)?;
        }
        Ok(())
    }
}
