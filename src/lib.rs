//! Markdown Documentation MCP Service
//!
//! This crate provides a Model Context Protocol (MCP) service for reading and
//! searching a fixed catalog of Markdown/MDX documentation pages, served from
//! a local directory or a remote HTTP location.
//!
//! # Features
//!
//! - Resolve documents by key, from disk or over HTTP
//! - Cache fetched documents with a time-to-live
//! - Case-insensitive substring search ranked by match count
//! - Heading outlines and fenced code block extraction
//!
//! # Modules
//!
//! - [`catalog`]: Key to location mapping loaded from TOML
//! - [`cache`]: TTL cache for document bodies
//! - [`source`]: File and HTTP document sources
//! - [`retrieval`]: Cache-first document resolution
//! - [`search`]: Substring search over the catalog
//! - [`markdown`]: Heading and code block extraction
//! - [`mcp`]: MCP server implementation and result rendering
//! - [`server`]: stdio and SSE transports

pub mod cache;
pub mod catalog;
pub mod error;
pub mod markdown;
pub mod mcp;
pub mod retrieval;
pub mod search;
pub mod server;
pub mod source;
