//! Fixed query shapes and response models for the Art Blocks subgraph.

use serde::{Deserialize, Serialize};

use crate::error::SubgraphError;
use crate::operation::GraphqlOperation;

/// Hosted subgraph endpoint for the platform's core contracts.
pub const SUBGRAPH_URL: &str = "https://api.thegraph.com/subgraphs/name/artblocks/art-blocks";

/// Reference to the contract a project lives on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    /// On-chain contract address.
    pub id: String,
}

/// Full project record as returned by the subgraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project number, unique within a contract.
    pub project_id: u64,
    /// Project name.
    pub name: String,
    /// Mints so far.
    pub invocations: u64,
    /// Mint cap.
    pub max_invocations: u64,
    /// Curation classification, e.g. `"factory"`.
    #[serde(default)]
    pub curation_status: Option<String>,
    /// Contract the project lives on.
    pub contract: ContractRef,
}

/// Minimal projection used when only counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    /// Project number.
    pub project_id: u64,
}

/// Project list field nested under `contract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsField<P> {
    /// Projects returned for the requested page or filter.
    pub projects: Vec<P>,
}

/// Response envelope shared by all three query shapes. `contract` is null
/// when the subgraph does not index the requested address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractData<P> {
    /// Contract payload, absent for unknown addresses.
    #[serde(default)]
    pub contract: Option<ProjectsField<P>>,
}

impl<P> ContractData<P> {
    /// Unwrap the project list, treating an unknown contract as a protocol
    /// violation rather than an empty result set.
    pub fn into_projects(self, contract_id: &str) -> Result<Vec<P>, SubgraphError> {
        self.contract
            .map(|field| field.projects)
            .ok_or_else(|| SubgraphError::Protocol {
                message: format!("contract {contract_id} not found in subgraph"),
            })
    }
}

/// Variables for the paged per-contract queries.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectsPageVars {
    /// Contract address.
    pub id: String,
    /// Page size.
    pub first: u64,
    /// Offset into the result set.
    pub skip: u64,
}

/// Variables for the single-project lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectByIdVars {
    /// Contract address.
    pub id: String,
    /// Project number.
    #[serde(rename = "projectId")]
    pub project_id: u64,
}

/// Project numbers of one contract, paged.
pub struct ContractProjectsMinimal;

impl GraphqlOperation for ContractProjectsMinimal {
    type Variables = ProjectsPageVars;
    type ResponseData = ContractData<ProjectRef>;

    const QUERY: &'static str = r#"
query getContractProjectsMinimal($id: ID!, $first: Int!, $skip: Int) {
  contract(id: $id) {
    projects(first: $first, skip: $skip, orderBy: projectId) {
      projectId
    }
  }
}"#;
    const OPERATION_NAME: &'static str = "getContractProjectsMinimal";
}

/// Single project on one contract, by project number.
pub struct ContractProjectById;

impl GraphqlOperation for ContractProjectById {
    type Variables = ProjectByIdVars;
    type ResponseData = ContractData<Project>;

    const QUERY: &'static str = r#"
query getContractProject($id: ID!, $projectId: Int!) {
  contract(id: $id) {
    projects(where: { projectId: $projectId }) {
      projectId
      name
      invocations
      maxInvocations
      curationStatus
      contract {
        id
      }
    }
  }
}"#;
    const OPERATION_NAME: &'static str = "getContractProject";
}

/// Factory-curated projects of one contract, paged, filtered server-side.
pub struct ContractFactoryProjects;

impl GraphqlOperation for ContractFactoryProjects {
    type Variables = ProjectsPageVars;
    type ResponseData = ContractData<Project>;

    const QUERY: &'static str = r#"
query getContractFactoryProjects($id: ID!, $first: Int!, $skip: Int) {
  contract(id: $id) {
    projects(
      where: { curationStatus: "factory" }
      first: $first
      skip: $skip
      orderBy: projectId
    ) {
      projectId
      name
      invocations
      maxInvocations
      curationStatus
      contract {
        id
      }
    }
  }
}"#;
    const OPERATION_NAME: &'static str = "getContractFactoryProjects";
}
