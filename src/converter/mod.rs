// file: src/converter/mod.rs
// description: conversion between markup and content blocks
// reference: internal module structure

pub mod blocks;
pub mod render;
pub mod scanner;
pub mod spans;

pub use blocks::markup_to_blocks;
pub use render::{blocks_to_markup, blocks_to_text, spans_to_markup};
pub use scanner::strip_html;
pub use spans::markup_to_spans;
