//! Pagination-aware client for the Art Blocks subgraph.
//!
//! This crate provides:
//! - A typed GraphQL transport client over HTTP.
//! - Offset pagination bounded by the page-size sentinel.
//! - A project catalog that fans out over the core contract registry.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

mod client;
mod error;
mod operation;
mod pagination;
mod projects;
mod queries;
mod registry;

pub use client::{
    SubgraphClient, SubgraphClientBuilder, SubgraphClientConfig, SubgraphClientMetrics,
    SubgraphClientMetricsSnapshot,
};
pub use error::{
    GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, HttpErrorInfo, SubgraphError,
};
pub use operation::{GraphqlOperation, GraphqlQuery, GraphqlRequest, GraphqlResponse};
pub use pagination::{collect_paged, count_paged, PageConfig, PROJECTS_PAGE_SIZE};
pub use projects::ProjectsApi;
pub use queries::{
    ContractData, ContractFactoryProjects, ContractProjectById, ContractProjectsMinimal,
    ContractRef, Project, ProjectByIdVars, ProjectRef, ProjectsField, ProjectsPageVars,
    SUBGRAPH_URL,
};
pub use registry::ContractRegistry;
