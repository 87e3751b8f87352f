//! Workflow Canvas - interaction core of a node-link workflow editor.
//!
//! Pan/zoom viewport with eased animations and momentum, connection routing
//! and drawing, and the gesture layer that ties input to both.
pub mod core;
pub mod graph;
pub mod platform;
pub mod store;

pub use crate::core::model::{CanvasHost, GraphModel, WorkflowGraph};
pub use crate::graph::canvas::WorkflowCanvas;
