pub mod browser;
pub mod catalog;
pub mod resolver;
pub mod view;
