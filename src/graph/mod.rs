pub mod animation;
pub mod canvas;
pub mod connection_renderer;
pub mod connection_router;
pub mod gesture;
pub mod graph_node;
pub mod path_measure;
pub mod transform;
pub mod viewport;
