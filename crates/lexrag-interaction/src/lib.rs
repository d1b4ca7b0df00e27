//! Backend adapters for the LexRAG client.

pub mod http_gateway;

pub use http_gateway::HttpBackendGateway;
