//! # Sitecraft Parser
//!
//! Document tree model and markup codec for the Sitecraft editor.
//!
//! - [`ast`]: `Node`/`Element` tree with stable [`NodeId`]s
//! - [`id_generator`]: stable identity assigner
//! - [`lexer`] + [`parser`]: markup → tree
//! - [`serializer`]: tree → markup (deterministic, round-trip stable)

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod style;

pub use ast::{is_void_element, Attributes, Element, Node, NodeId, NODE_ID_ATTR};
pub use error::{ParseError, ParseResult};
pub use id_generator::{get_session_seed, IdGenerator};
pub use parser::{parse_fragment, Parser};
pub use serializer::{serialize, Serializer};
pub use style::{format_declarations, is_safe_value, parse_declarations, split_declarations, to_kebab_case};
