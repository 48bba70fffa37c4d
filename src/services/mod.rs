/// OpenAPI document aggregation.
pub mod documentation;
/// Game submission decoding and repository orchestration.
pub mod game_service;
/// Health probe logic.
pub mod health_service;
