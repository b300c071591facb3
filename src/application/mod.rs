// Application layer - Generators and the use cases built on them
pub mod chat_service;
pub mod contact_service;
pub mod dashboard_service;
pub mod insight_gateway;
pub mod insight_service;
pub mod random_source;
pub mod simulation_service;
pub mod telemetry_generator;
pub mod vision_generator;
