// src/lib.rs

pub mod core;
pub mod editor;
pub mod errors;
pub mod logging;
pub mod markup;
pub mod persistence;
pub mod util;

pub use crate::core::converter::substitute;
pub use crate::core::document::substitute_tree;
pub use crate::core::engine::TranslatorEngine;
pub use crate::core::resolver::resolve;
