//! Entry point for the `tests/e2e/` integration tests. Cargo only treats
//! files directly under `tests/` as test targets, so this declares each
//! scenario module explicitly rather than relying on directory discovery.

#[path = "e2e/identify_workflow.rs"]
mod identify_workflow;
