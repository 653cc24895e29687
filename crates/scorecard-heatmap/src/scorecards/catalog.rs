use super::domain::{
    DomainId, DomainRef, EntityMetadata, GroupByDimension, HierarchyNode, Ladder, ScoreRecord,
    ServiceId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog data resolved alongside a score snapshot.
///
/// Everything here is optional: a report over an empty catalog falls back to
/// raw component refs for labels and flat grouping for team and domain views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardCatalog {
    #[serde(default)]
    pub entities: HashMap<String, EntityMetadata>,
    #[serde(default)]
    pub domains: HashMap<ServiceId, Vec<DomainRef>>,
    #[serde(default)]
    pub team_hierarchy: Vec<HierarchyNode>,
    #[serde(default)]
    pub domain_hierarchy: Vec<HierarchyNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ladder: Option<Ladder>,
}

impl ScorecardCatalog {
    pub fn entity(&self, component_ref: &str) -> Option<&EntityMetadata> {
        self.entities.get(component_ref)
    }

    /// Catalog name for the entity, or its component ref when unknown.
    pub fn display_name<'a>(&'a self, record: &'a ScoreRecord) -> &'a str {
        self.entity(&record.component_ref)
            .map(|entity| entity.name.as_str())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(record.component_ref.as_str())
    }

    /// Domain tags per service, used when grouping by domain.
    pub fn domain_tags_by_service(&self) -> HashMap<ServiceId, Vec<String>> {
        self.domains
            .iter()
            .map(|(service_id, domains)| {
                let tags = domains.iter().map(|domain| domain.tag.clone()).collect();
                (*service_id, tags)
            })
            .collect()
    }

    /// Forest backing a hierarchical dimension; empty for flat dimensions.
    pub fn hierarchy_for(&self, dimension: GroupByDimension) -> &[HierarchyNode] {
        match dimension {
            GroupByDimension::Team => &self.team_hierarchy,
            GroupByDimension::Domain => &self.domain_hierarchy,
            _ => &[],
        }
    }
}

/// Per-service membership tables consulted by the score filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterLookups {
    pub groups_by_service: HashMap<ServiceId, Vec<String>>,
    pub owners_by_service: HashMap<ServiceId, Vec<String>>,
    pub domains_by_service: HashMap<ServiceId, Vec<DomainId>>,
}

impl FilterLookups {
    /// Joins score records with catalog metadata through their component refs.
    pub fn build(scores: &[ScoreRecord], catalog: &ScorecardCatalog) -> Self {
        let mut lookups = Self::default();

        for record in scores {
            if let Some(entity) = catalog.entity(&record.component_ref) {
                lookups
                    .groups_by_service
                    .insert(record.service_id, entity.group_tags.clone());
                lookups
                    .owners_by_service
                    .insert(record.service_id, entity.owner_emails.clone());
            }
        }

        for (service_id, domains) in &catalog.domains {
            lookups
                .domains_by_service
                .insert(*service_id, domains.iter().map(|domain| domain.id).collect());
        }

        lookups
    }

    pub fn groups(&self, service_id: ServiceId) -> &[String] {
        self.groups_by_service
            .get(&service_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn owners(&self, service_id: ServiceId) -> &[String] {
        self.owners_by_service
            .get(&service_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn domains(&self, service_id: ServiceId) -> &[DomainId] {
        self.domains_by_service
            .get(&service_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
