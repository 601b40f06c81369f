pub mod app;
pub mod config;
pub mod events;
pub mod session;
pub mod sound;
pub mod sys;
pub mod view;
