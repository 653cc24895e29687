use super::domain::{GroupByDimension, GroupKey, ScoreRecord, ServiceId, NO_LEVEL};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Insertion-ordered buckets of borrowed score records.
///
/// The same record may sit in several buckets at once when it belongs to more
/// than one team, group or domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedScores<'a> {
    order: Vec<GroupKey>,
    buckets: HashMap<GroupKey, Vec<&'a ScoreRecord>>,
}

impl<'a> GroupedScores<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, record: &'a ScoreRecord) {
        self.bucket_mut(key).push(record);
    }

    /// Replaces a bucket wholesale, keeping its original position if it existed.
    pub fn insert(&mut self, key: &str, records: Vec<&'a ScoreRecord>) {
        *self.bucket_mut(key) = records;
    }

    fn bucket_mut(&mut self, key: &str) -> &mut Vec<&'a ScoreRecord> {
        if !self.buckets.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.buckets.entry(key.to_string()).or_default()
    }

    pub fn get(&self, key: &str) -> Option<&[&'a ScoreRecord]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a ScoreRecord])> {
        self.order.iter().map(move |key| {
            let records = self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[]);
            (key.as_str(), records)
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of bucket sizes; counts a fanned-out record once per bucket.
    pub fn total_memberships(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn into_entries(mut self) -> Vec<(GroupKey, Vec<&'a ScoreRecord>)> {
        self.order
            .into_iter()
            .map(|key| {
                let records = self.buckets.remove(&key).unwrap_or_default();
                (key, records)
            })
            .collect()
    }
}

/// Fans score records out into buckets along `dimension`.
///
/// `domains` maps a service to its domain tags and is only consulted for
/// [`GroupByDimension::Domain`]; without it every record lands in the domain
/// sentinel bucket.
pub fn group_scores<'a, I>(
    scores: I,
    dimension: GroupByDimension,
    domains: Option<&HashMap<ServiceId, Vec<String>>>,
) -> GroupedScores<'a>
where
    I: IntoIterator<Item = &'a ScoreRecord>,
{
    let mut grouped = GroupedScores::new();
    let mut records = 0usize;

    for record in scores {
        records += 1;
        match dimension {
            GroupByDimension::Entity => {
                grouped.push(&record.service_id.to_string(), record);
            }
            GroupByDimension::ServiceGroup => {
                fan_out(&mut grouped, record, &record.tags, dimension);
            }
            GroupByDimension::Team => {
                fan_out(&mut grouped, record, &record.teams, dimension);
            }
            GroupByDimension::Domain => {
                let tags = domains
                    .and_then(|lookup| lookup.get(&record.service_id))
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                fan_out(&mut grouped, record, tags, dimension);
            }
            GroupByDimension::Level => {
                grouped.push(record.level_name().unwrap_or(NO_LEVEL), record);
            }
        }
    }

    debug!(
        dimension = dimension.label(),
        records,
        buckets = grouped.len(),
        "grouped scorecard records"
    );

    grouped
}

fn fan_out<'a>(
    grouped: &mut GroupedScores<'a>,
    record: &'a ScoreRecord,
    memberships: &[String],
    dimension: GroupByDimension,
) {
    let mut seen = HashSet::new();
    for key in memberships {
        if seen.insert(key.as_str()) {
            grouped.push(key, record);
        }
    }

    if seen.is_empty() {
        if let Some(sentinel) = dimension.sentinel() {
            grouped.push(sentinel, record);
        }
    }
}
