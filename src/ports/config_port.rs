//! Configuration access port trait.
//!
//! Values come back as raw strings; typed parsing and validation live in
//! `domain::config_validation`.

pub trait ConfigPort {
    /// Missing keys and blank values are both `None`.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
