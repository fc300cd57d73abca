pub mod dependency_graph;
pub mod not_found;
