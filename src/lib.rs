pub mod app;
pub mod bubble;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod file_block;
pub mod host;
pub mod layout;
pub mod notification;
pub mod overlay;
pub mod storage;
pub mod suggest;
pub mod widgets;

#[cfg(test)]
mod test_utils;
