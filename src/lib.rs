//! Helpdesk Bot — turn routing and scripted dialogs behind a webhook.

pub mod activity;
pub mod bot;
pub mod config;
pub mod connector;
pub mod dialogs;
pub mod error;
pub mod kb;
pub mod nlu;
pub mod server;
pub mod state;
