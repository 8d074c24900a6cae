//! Dash0 Apply - the engine behind `dash0 apply`
//!
//! This crate provides:
//! - **Loader**: files, stdin and directory trees split into single documents
//! - **Kind resolution**: explicit or inferred kinds, validated for a whole batch up front
//! - **Handlers**: per-kind decoding and removal of server-managed fields,
//!   including the expansion of PrometheusRule resources into check rules
//! - **Identity resolution**: create-or-update decisions with soft-delete recovery
//! - **Batch application**: fail-fast, in input order, with the applied
//!   subset reported on failure

pub mod batch;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod import;
pub mod kind;
pub mod loader;

pub use batch::{ApplyOptions, BatchApplier, BatchOutcome, DocumentOutcome, PlannedDocument, plan};
pub use error::{ApplyError, DocumentRef, Operation, Result, ValidationIssue};
pub use handlers::{AssetHandler, Converted, HandlerRegistry};
pub use identity::{Action, IdentitySource, resolve_identity};
pub use import::{ImportResult, Importer};
pub use kind::{ValidatedDocument, resolve_kind, validate};
pub use loader::{RawDocument, load, load_dir, load_file, load_reader, parse_stream};
