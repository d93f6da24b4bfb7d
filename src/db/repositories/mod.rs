pub mod settings_repository;
pub mod storage_repository;
pub mod wellness_score_repository;
