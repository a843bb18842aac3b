pub mod hello;
pub mod system;
