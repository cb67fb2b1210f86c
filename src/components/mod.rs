//! Reusable view components.

pub mod orb_graph;
