/// Error types for routing, path parsing, preference storage and windowing.
use super::types::{ConnectionId, NodeId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    /// The connection references a node the graph model does not contain.
    #[error("connection {connection} references missing node {node}")]
    MissingEndpoint {
        connection: ConnectionId,
        node: NodeId,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path must start with a move command, found {0:?}")]
    MissingMoveTo(char),
    #[error("unsupported path command {0:?}")]
    UnsupportedCommand(char),
    #[error("command {command:?} expects {expected} numbers, found {found}")]
    ArgumentCount {
        command: char,
        expected: usize,
        found: usize,
    },
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("failed to open X11 display")]
    NoDisplay,
    #[error("window title contains a NUL byte")]
    InvalidTitle,
    #[error("failed to create Cairo context for window")]
    NoCairoContext,
}
