//! Core types shared across httpcachefs facilities
//!
//! This crate provides foundational definitions used by both the error
//! handling and logging facilities:
//!
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
