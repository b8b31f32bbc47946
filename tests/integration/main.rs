//! Integration tests for whole-page reading
//!
//! Realistic pages run end to end, plus edge cases that cut across modules.

mod edge_cases;
mod real_world_pages;
