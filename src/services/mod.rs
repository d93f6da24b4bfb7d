pub mod category_scorers;
pub mod financial_data_service;
pub mod guardrails_service;
pub mod recommendation_service;
pub mod score_aggregator;
pub mod settings_service;
pub mod wellness_score_service;
