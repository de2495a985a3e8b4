//! Skill directories: SKILL.md header parsing, discovery and per-skill checks.
//!
//! A skill is a directory holding a descriptor file (`SKILL.md` by default)
//! that opens with a `---` delimited key/value header.

pub mod discover;
pub mod parser;
pub mod validate;

pub use discover::validate_category;
pub use parser::{parse_header, Header};
pub use validate::validate_skill;
