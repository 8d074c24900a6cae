//! Batch application
//!
//! Every document is validated before anything is written. Documents are
//! then applied one at a time, in input order, stopping at the first failure.

use dash0_api::AssetService;
use dash0_core::{AssetId, AssetKind};
use serde_yaml::Value;

use crate::error::{ApplyError, DocumentRef, Result};
use crate::handlers::HandlerRegistry;
use crate::identity::Action;
use crate::import::{ImportResult, Importer};
use crate::kind::validate;
use crate::loader::RawDocument;

/// Options for one apply run
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Target dataset; `None` for the default one
    pub dataset: Option<String>,
}

/// What happened to one input document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutcome {
    /// Kind of the input document (a PrometheusRule stays a PrometheusRule)
    pub kind: AssetKind,
    pub name: String,
    pub location: DocumentRef,
    /// One result per asset written
    pub results: Vec<ImportResult>,
}

impl DocumentOutcome {
    /// Action reported for the whole document
    ///
    /// `created` or `updated` when all assets agree, `created/updated` otherwise.
    pub fn action_label(&self) -> &'static str {
        let created = self.results.iter().any(|r| r.action == Action::Created);
        let updated = self.results.iter().any(|r| r.action == Action::Updated);
        match (created, updated) {
            (true, true) => "created/updated",
            (false, true) => Action::Updated.as_str(),
            _ => Action::Created.as_str(),
        }
    }

    /// Distinct identities reported for the document, in order
    ///
    /// Assets expanded from a bundle report the bundle's identity.
    pub fn ids(&self) -> Vec<&AssetId> {
        let mut ids: Vec<&AssetId> = Vec::new();
        for id in self
            .results
            .iter()
            .filter_map(|r| r.bundle_id.as_ref().or(r.id.as_ref()))
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// Result of applying a batch
///
/// `applied` holds every document with at least one asset written, including
/// a partially applied document when the failure hit in its middle.
#[derive(Debug)]
pub struct BatchOutcome {
    pub applied: Vec<DocumentOutcome>,
    pub failure: Option<ApplyError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Whether the batch failed after something was already written
    pub fn is_partial(&self) -> bool {
        self.failure.is_some() && !self.applied.is_empty()
    }

    /// Number of assets written
    pub fn asset_count(&self) -> usize {
        self.applied.iter().map(|d| d.results.len()).sum()
    }

    pub fn into_result(self) -> Result<Vec<DocumentOutcome>> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(self.applied),
        }
    }
}

/// A document that would be applied
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDocument {
    pub kind: AssetKind,
    pub name: String,
    pub location: DocumentRef,
}

/// Validate documents without touching the API
pub fn plan(documents: Vec<RawDocument>) -> Result<Vec<PlannedDocument>> {
    let validated = validate(documents)?;

    validated
        .into_iter()
        .map(|doc| {
            let value = doc.raw.value()?;
            Ok(PlannedDocument {
                kind: doc.kind,
                name: document_name(&value).unwrap_or_default(),
                location: doc.raw.location(),
            })
        })
        .collect()
}

/// Best-effort name of an undecoded document
fn document_name(value: &Value) -> Option<String> {
    let candidates = [
        value.get("spec").and_then(|s| s.get("display")).and_then(|d| d.get("name")),
        value.get("metadata").and_then(|m| m.get("name")),
        value.get("name"),
        value.get("alert"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Applies batches of documents through an [`AssetService`]
pub struct BatchApplier<'a> {
    service: &'a dyn AssetService,
    registry: HandlerRegistry,
    options: ApplyOptions,
}

impl<'a> BatchApplier<'a> {
    pub fn new(service: &'a dyn AssetService, options: ApplyOptions) -> Self {
        Self::with_registry(service, HandlerRegistry::new(), options)
    }

    pub fn with_registry(
        service: &'a dyn AssetService,
        registry: HandlerRegistry,
        options: ApplyOptions,
    ) -> Self {
        Self {
            service,
            registry,
            options,
        }
    }

    /// Validate the whole batch, then apply it document by document
    pub async fn apply(&self, documents: Vec<RawDocument>) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            applied: Vec::new(),
            failure: None,
        };

        let validated = match validate(documents) {
            Ok(validated) => validated,
            Err(e) => {
                outcome.failure = Some(e);
                return outcome;
            }
        };

        let importer = Importer::new(
            self.service,
            &self.registry,
            self.options.dataset.as_deref(),
        );

        for doc in validated {
            let location = doc.raw.location();
            tracing::debug!(kind = %doc.kind, %location, "applying document");

            let converted = match self.registry.convert(doc.kind, &doc.raw) {
                Ok(converted) => converted,
                Err(e) => {
                    outcome.failure = Some(e);
                    return outcome;
                }
            };

            let mut document = DocumentOutcome {
                kind: doc.kind,
                name: converted.name,
                location,
                results: Vec::with_capacity(converted.assets.len()),
            };

            for asset in converted.assets {
                match importer.import(asset, converted.bundle_id.as_ref()).await {
                    Ok(result) => document.results.push(result),
                    Err(e) => {
                        if !document.results.is_empty() {
                            outcome.applied.push(document);
                        }
                        outcome.failure = Some(e);
                        return outcome;
                    }
                }
            }

            if doc.kind.is_native() {
                if let Some(result) = document.results.first() {
                    document.name = result.name.clone();
                }
            }
            outcome.applied.push(document);
        }

        outcome
    }
}
