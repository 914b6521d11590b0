use catsync_core::config::DescriptorMatcher;
use catsync_core::diff::FileDiff;
use tracing::debug;

/// A bucketed diff plus the index of its originating entry in the push's
/// diff list, used later to restore input order in the operation sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassifiedDiff {
    pub ordinal: usize,
    pub diff: FileDiff,
}

/// Descriptor diffs partitioned by the kind of catalog operation they may
/// produce. Input order is preserved within each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DiffBuckets {
    pub added: Vec<ClassifiedDiff>,
    pub modified: Vec<ClassifiedDiff>,
    pub removed: Vec<ClassifiedDiff>,
}

/// Partition a push's diff list into added/modified/removed descriptor
/// buckets, discarding diffs that touch no recognized descriptor file.
///
/// A rename *away from* the descriptor basename is a removal of the record
/// the old path defined, even though the file itself survives.
pub(crate) fn classify_diffs(diffs: &[FileDiff], matcher: &DescriptorMatcher) -> DiffBuckets {
    let mut buckets = DiffBuckets::default();
    for (ordinal, diff) in diffs.iter().enumerate() {
        let old_is_descriptor = matcher.matches(&diff.old_path);
        let new_is_descriptor = matcher.matches(&diff.new_path);
        if !old_is_descriptor && !new_is_descriptor {
            continue;
        }

        let entry = ClassifiedDiff {
            ordinal,
            diff: diff.clone(),
        };
        if diff.is_new {
            buckets.added.push(entry);
        } else if diff.is_deleted || (diff.is_renamed && old_is_descriptor && !new_is_descriptor) {
            buckets.removed.push(entry);
        } else if !diff.diff_text.is_empty() || (diff.is_renamed && new_is_descriptor) {
            buckets.modified.push(entry);
        } else {
            debug!(
                old_path = %diff.old_path,
                new_path = %diff.new_path,
                "diff matches no bucket rule, dropped"
            );
        }
    }
    buckets
}
