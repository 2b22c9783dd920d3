// Library exports for jobapptracker crate
// This allows tests and the binary to use the modules

pub mod auth;
pub mod config;
pub mod error;
pub mod gmail_client;
pub mod sheets_client;
pub mod slack_notifier;
pub mod store;
pub mod tracker;

// Extraction engine: body flattening, company and date extraction
pub mod email;
pub mod extraction;

// Spreadsheet append: row discovery, value write, dropdown propagation
pub mod sheet;
