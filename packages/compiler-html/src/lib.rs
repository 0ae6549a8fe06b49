//! # Sitecraft HTML Compiler
//!
//! Turns an edited document into a standalone HTML file: fixed head
//! boilerplate, theme-derived base rules plus the centralized rule table in a
//! single `<style>` block, and the tree's markup as the body.

mod compiler;
mod theme;


pub use compiler::{base_css, compile_to_html, CompileOptions};
pub use theme::{Theme, ThemeError, DEFAULT_ACCENT, HOVER_DARKEN};
