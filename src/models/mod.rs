pub mod guardrail;
pub mod settings;
pub mod snapshot;
pub mod wellness;
