//! Project catalog: fan-out aggregation over the contract registry.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::client::SubgraphClient;
use crate::error::SubgraphError;
use crate::pagination::{collect_paged, count_paged, PageConfig};
use crate::queries::{
    ContractFactoryProjects, ContractProjectById, ContractProjectsMinimal, Project,
    ProjectByIdVars, ProjectsPageVars,
};
use crate::registry::ContractRegistry;

/// High-level project queries over the subgraph.
///
/// Every registry-wide operation issues one branch per contract without
/// waiting on the others, then reconciles once all branches have settled.
/// Cross-contract completion order is unspecified; results always follow
/// registry order.
#[derive(Debug, Clone)]
pub struct ProjectsApi {
    client: SubgraphClient,
    registry: ContractRegistry,
    pages: PageConfig,
}

impl ProjectsApi {
    /// Create a catalog over an injected transport client and registry.
    #[must_use]
    pub fn new(client: SubgraphClient, registry: ContractRegistry) -> Self {
        Self {
            client,
            registry,
            pages: PageConfig::default(),
        }
    }

    /// Override page sizing (mainly for tests and small deployments).
    #[must_use]
    pub const fn with_page_config(mut self, pages: PageConfig) -> Self {
        self.pages = pages;
        self
    }

    /// The registry this catalog fans out over.
    #[must_use]
    pub const fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// Total number of projects across all registry contracts.
    ///
    /// Any contract's fetch failing voids the whole aggregate; an empty
    /// registry sums to zero.
    pub async fn project_count(&self) -> Result<u64, SubgraphError> {
        let counts = join_all(
            self.registry
                .addresses()
                .map(|contract| self.contract_project_count(contract)),
        )
        .await;

        let mut total = 0_u64;
        for count in counts {
            total += count?;
        }
        debug!(total, "counted projects across registry");
        Ok(total)
    }

    /// Look up a project by number across the registry, first match in
    /// registry order.
    ///
    /// A failing contract does not mask a match found elsewhere; it is
    /// logged and skipped. If no contract matched and at least one failed,
    /// the failure is surfaced, since "not found" can no longer be trusted.
    pub async fn project(&self, project_id: u64) -> Result<Option<Project>, SubgraphError> {
        let outcomes = join_all(
            self.registry
                .addresses()
                .map(|contract| self.project_on(project_id, contract)),
        )
        .await;

        let mut first_failure = None;
        for (contract, outcome) in self.registry.addresses().zip(outcomes) {
            match outcome {
                Ok(Some(project)) => return Ok(Some(project)),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        contract,
                        project_id,
                        error = %err,
                        "project lookup failed on contract, trying the rest"
                    );
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    /// Look up a project by number, optionally pinned to a single contract.
    ///
    /// With a contract given the registry is bypassed entirely; otherwise
    /// this is the registry-wide first-match search.
    pub async fn project_by_id(
        &self,
        project_id: u64,
        contract: Option<&str>,
    ) -> Result<Option<Project>, SubgraphError> {
        match contract {
            Some(contract) => self.project_on(project_id, contract).await,
            None => self.project(project_id).await,
        }
    }

    /// Look up a project by number on one contract.
    ///
    /// `Ok(None)` means the contract answered and the project does not
    /// exist there. At most one match is expected per contract; extras are
    /// ignored.
    pub async fn project_on(
        &self,
        project_id: u64,
        contract: &str,
    ) -> Result<Option<Project>, SubgraphError> {
        let data = self
            .client
            .execute_strict::<ContractProjectById>(ProjectByIdVars {
                id: contract.to_string(),
                project_id,
            })
            .await?;
        let mut projects = data.into_projects(contract)?;
        if projects.is_empty() {
            Ok(None)
        } else {
            Ok(Some(projects.swap_remove(0)))
        }
    }

    /// All factory-curated projects across the registry, concatenated in
    /// registry order with per-contract page order preserved.
    ///
    /// Any contract's fetch failing voids the whole aggregate.
    pub async fn factory_projects(&self) -> Result<Vec<Project>, SubgraphError> {
        let lists = join_all(
            self.registry
                .addresses()
                .map(|contract| self.contract_factory_projects(contract)),
        )
        .await;

        let mut all = Vec::new();
        for list in lists {
            all.extend(list?);
        }
        Ok(all)
    }

    async fn contract_project_count(&self, contract: &str) -> Result<u64, SubgraphError> {
        let first = self.pages.page_size as u64;
        count_paged(self.pages, |skip| {
            let vars = ProjectsPageVars {
                id: contract.to_string(),
                first,
                skip,
            };
            async move {
                let data = self
                    .client
                    .execute_strict::<ContractProjectsMinimal>(vars)
                    .await?;
                Ok(data.into_projects(contract)?.len())
            }
        })
        .await
    }

    async fn contract_factory_projects(&self, contract: &str) -> Result<Vec<Project>, SubgraphError> {
        let first = self.pages.page_size as u64;
        collect_paged(self.pages, |skip| {
            let vars = ProjectsPageVars {
                id: contract.to_string(),
                first,
                skip,
            };
            async move {
                let data = self
                    .client
                    .execute_strict::<ContractFactoryProjects>(vars)
                    .await?;
                data.into_projects(contract)
            }
        })
        .await
    }
}
