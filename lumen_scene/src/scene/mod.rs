//! Scene module
//!
//! Node storage, the per-frame update traversal that collects lights, the
//! one-shot decoration pass and the per-camera cull traversal.

mod node;
mod scene_graph;
mod update_visitor;
mod cull_visitor;

pub use node::{Node, NodeKey, NodeKind};
pub use scene_graph::SceneGraph;
pub use cull_visitor::{StateStack, RenderLeaf, RenderList, CullStats};
