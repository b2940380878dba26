pub mod command;
pub mod interactive;
pub mod render;
pub mod session;
