// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod gemini_gateway;
pub mod http_response;
