pub mod clause_graph;
pub mod notice;
