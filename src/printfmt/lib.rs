//! # printfmt Architecture
//!
//! printfmt turns a stored business document into printable HTML and CSS. A
//! request names a document (`doctype` + `name`), a *print format* and a *style*;
//! the library resolves the format to a template, binds the document into it and
//! returns the markup alongside the stylesheet.
//!
//! It is a library that happens to have a CLI client, not the other way around.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, sets up logging, writes to the terminal│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns store, engine, permission checker and meta cache    │
//! │  - One method per operation, no logic of its own            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - resolve: format name → template source                   │
//! │  - render:  document + template → HTML                      │
//! │  - style:   style name → CSS, with standard fallback        │
//! │  - handler: request → response, permission gating           │
//! │  - lifecycle: Print Format validate / update / delete hooks │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Capabilities                                               │
//! │  - RecordStore (store/): FileStore, InMemoryStore           │
//! │  - TemplateEngine (engine.rs): StencilEngine                │
//! │  - PermissionChecker (permissions.rs): RolePermissions      │
//! │  - CacheInvalidator (cache.rs): MetaCache                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Explicit Context
//!
//! Every operation receives a [`context::RequestContext`] carrying the acting
//! user, the request parameters and a configuration snapshot. Nothing reads
//! process-wide state.
//!
//! ## Format Resolution
//!
//! The standard layout is addressed by the sentinel name
//! `templates/print_formats/standard.html` and never touches the store. Any other
//! name must match an enabled Print Format record; its template is read from
//! `<app_root>/<module>/print_format/<name>/<name>.html` when that file exists,
//! and from the record's stored HTML otherwise.
//!
//! ## Error Policy
//!
//! Lifecycle and resolution failures are returned as [`error::PrintError`].
//! The request handler is the exception: missing parameters and missing
//! permissions become an HTML error body, so a caller always has something to
//! show. An unknown stylesheet silently falls back to the standard one.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Record store abstraction and implementations
//! - [`engine`]: Template rendering capability
//! - [`model`]: Records, documents, request and response types
//! - [`context`]: Request context and users
//! - [`permissions`]: Permission checks
//! - [`cache`]: Doctype metadata cache
//! - [`config`]: Configuration management
//! - [`modules`]: Module tree path conventions
//! - [`error`]: Error types

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod model;
pub mod modules;
pub mod permissions;
pub mod store;
