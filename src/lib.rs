pub mod app;
pub mod config;
pub mod controller;
pub mod document;
pub mod event;
pub mod logging;
pub mod models;
pub mod project;
pub mod system;
pub mod tmux;
pub mod todos;
pub mod ui;
