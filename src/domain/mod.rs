// Domain layer - Simulation records and their invariants
pub mod chat;
pub mod contact;
pub mod dashboard;
pub mod sensor;
pub mod telemetry;
pub mod vision;
