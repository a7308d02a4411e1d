/// Grouping of indexed records by calendar key.
use std::collections::BTreeMap;
use std::fmt;

use crate::calendar::Dated;
use crate::config::GroupingScheme;

/// Key of a group of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Year(i32),
    /// The single group of the flat scheme.
    All,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Year(year) => write!(f, "{}", year),
            GroupKey::All => f.write_str("All"),
        }
    }
}

/// Partitions records by year. Only years that contain a record appear.
pub fn group_by_year<T: Dated>(records: &[T]) -> BTreeMap<i32, Vec<&T>> {
    let mut groups: BTreeMap<i32, Vec<&T>> = BTreeMap::new();
    for record in records {
        groups.entry(record.bucket().year).or_default().push(record);
    }
    groups
}

/// Partitions records according to `scheme`. The flat scheme always yields
/// exactly one group, possibly empty.
pub fn group_by_scheme<T: Dated>(records: &[T], scheme: GroupingScheme) -> BTreeMap<GroupKey, Vec<&T>> {
    match scheme {
        GroupingScheme::ByYear => group_by_year(records)
            .into_iter()
            .map(|(year, group)| (GroupKey::Year(year), group))
            .collect(),
        GroupingScheme::Flat => BTreeMap::from([(GroupKey::All, records.iter().collect())]),
    }
}
