//! Block directive configuration grammar
//!
//! Providers can be configured from a small line-oriented text format
//! instead of JSON:
//!
//! ```text
//! # comment
//! provider_name [<arg>...] {
//!     subdirective <arg>...
//! }
//! ```
//!
//! - [`lexer`]: splits text into line-numbered tokens
//! - [`Dispenser`]: cursor API used by providers to read their directive
//! - [`parse_directives`]: splits a file into one dispenser per directive

pub mod dispenser;
pub mod lexer;

pub use dispenser::{Dispenser, parse_directives};
pub use lexer::{Token, tokenize};

/// Implemented by provider configurations that can be read from a directive
pub trait UnmarshalDirective {
    /// Populate `self` from the directive under `d`
    ///
    /// The dispenser is positioned before the directive name.
    fn unmarshal_directive(&mut self, d: &mut Dispenser) -> crate::Result<()>;
}
