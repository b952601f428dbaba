use crate::deduplication::grouping::Partition;
use crate::types::{sort_groups, DuplicateGroup, HashedImage};

/// Turn a partition into keep/delete groups.
///
/// Singleton components are dropped. Within a group the byte-wise smallest path is
/// kept; groups are ordered by size, then by their member paths.
pub fn resolve_groups(items: &[HashedImage], partition: &Partition) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = partition
        .components()
        .into_iter()
        .filter_map(|members| {
            DuplicateGroup::from_members(
                members
                    .into_iter()
                    .map(|index| items[index].path.clone())
                    .collect(),
            )
        })
        .collect();

    sort_groups(&mut groups);
    groups
}
