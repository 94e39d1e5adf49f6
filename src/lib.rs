//! BluePulse diagnosis assistant — symptom triage, AI-assisted medical
//! chat, and their REST surface.

pub mod ai;
pub mod api;
pub mod chat;
pub mod config;
pub mod db;
pub mod models;
pub mod triage;
