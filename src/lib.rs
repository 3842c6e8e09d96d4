// src/lib.rs — Library root for PromptStudio

pub mod api;
pub mod cli;
pub mod infra;
pub mod provider;
pub mod studio;
pub mod util;
