/// Boundary between the canvas core and the application that owns the workflow.
use super::types::*;

/// The external graph model. The canvas reads nodes and connections from it
/// and calls back into it for edits triggered on the canvas.
pub trait GraphModel {
    fn nodes(&self) -> &[Node];
    fn connections(&self) -> &[Connection];
    fn remove_connection(&mut self, id: &ConnectionId);
    fn update_connection_label(&mut self, id: &ConnectionId, text: &str);
    fn move_node(&mut self, id: &NodeId, position: Vec2);

    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes().iter().find(|n| &n.id == id)
    }

    fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections().iter().find(|c| &c.id == id)
    }
}

/// Request for the external label editor to open on a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEditRequest {
    pub connection_id: ConnectionId,
    pub screen_position: Vec2,
}

/// Capabilities the surrounding application provides to the canvas.
pub trait CanvasHost {
    /// Open the "insert node" panel for the edge, anchored at a screen point.
    fn open_node_panel_for_connection(&mut self, connection_id: &ConnectionId, screen_position: Vec2);
    fn request_label_edit(&mut self, request: LabelEditRequest);
}

/// In-memory workflow graph
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl WorkflowGraph {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    pub fn find_node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }
}

impl GraphModel for WorkflowGraph {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn remove_connection(&mut self, id: &ConnectionId) {
        self.connections.retain(|c| &c.id != id);
    }

    fn update_connection_label(&mut self, id: &ConnectionId, text: &str) {
        if let Some(conn) = self.connections.iter_mut().find(|c| &c.id == id) {
            let text = text.trim();
            conn.label = if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            };
        }
    }

    fn move_node(&mut self, id: &NodeId, position: Vec2) {
        if let Some(node) = self.find_node_mut(id) {
            node.position = position;
        }
    }
}
