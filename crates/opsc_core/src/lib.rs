pub mod compose;
pub mod demo;
pub mod domain;
pub mod draft;
pub mod error;
pub mod health;
pub mod screen;
pub mod sequence;
pub mod service;
pub mod severity;
pub mod validate;
