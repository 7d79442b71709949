//! Splits the objective list into contiguous, near-equal shards.

use std::collections::BTreeMap;

use crate::domain::models::Objective;

/// Partitions objectives across a number of workers.
#[derive(Debug, Clone)]
pub struct TaskAssigner<'a> {
    tasks: &'a [Objective],
    num_workers: usize,
}

impl<'a> TaskAssigner<'a> {
    pub fn new(tasks: &'a [Objective], num_workers: usize) -> Self {
        Self { tasks, num_workers }
    }

    /// Effective number of workers: never more than there are objectives.
    pub fn effective_workers(&self) -> usize {
        self.num_workers.min(self.tasks.len())
    }

    /// Maps worker ids `1..=effective_workers()` to contiguous shards.
    ///
    /// Shard sizes differ by at most one; the first `len % workers` shards
    /// take one extra objective. Empty input or zero workers yields an empty
    /// assignment.
    pub fn assign_tasks(&self) -> BTreeMap<usize, &'a [Objective]> {
        let workers = self.effective_workers();
        let mut assignment = BTreeMap::new();
        if workers == 0 {
            return assignment;
        }

        let base = self.tasks.len() / workers;
        let remainder = self.tasks.len() % workers;
        let mut start = 0;
        for worker_id in 1..=workers {
            let len = base + usize::from(worker_id <= remainder);
            assignment.insert(worker_id, &self.tasks[start..start + len]);
            start += len;
        }
        assignment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ObjectReference, Target};

    fn objectives(n: usize) -> Vec<Objective> {
        (0..n)
            .map(|i| Objective::new(ObjectReference::new(format!("obj-{i}")), Target::default()))
            .collect()
    }

    fn check_partition(n: usize, workers: usize) {
        let tasks = objectives(n);
        let assignment = TaskAssigner::new(&tasks, workers).assign_tasks();

        assert_eq!(assignment.len(), workers.min(n));
        let flattened: Vec<String> = assignment
            .values()
            .flat_map(|shard| shard.iter().map(Objective::key))
            .collect();
        let expected: Vec<String> = tasks.iter().map(Objective::key).collect();
        assert_eq!(flattened, expected, "n={n} workers={workers}");

        let sizes: Vec<usize> = assignment.values().map(|s| s.len()).collect();
        if let (Some(min), Some(max)) = (sizes.iter().min(), sizes.iter().max()) {
            assert!(max - min <= 1, "n={n} workers={workers} sizes={sizes:?}");
            assert!(*min > 0);
        }
    }

    #[test]
    fn test_partition_completeness() {
        for n in 0..25 {
            for workers in 0..8 {
                check_partition(n, workers);
            }
        }
    }

    #[test]
    fn test_remainder_goes_to_first_shards() {
        let tasks = objectives(7);
        let assignment = TaskAssigner::new(&tasks, 3).assign_tasks();
        let sizes: Vec<usize> = assignment.values().map(|s| s.len()).collect();
        assert_eq!(sizes, vec![3, 2, 2]);
        assert_eq!(assignment[&1][0].key(), "obj-0");
        assert_eq!(assignment[&2][0].key(), "obj-3");
        assert_eq!(assignment[&3][0].key(), "obj-5");
    }

    #[test]
    fn test_more_workers_than_objectives() {
        let tasks = objectives(2);
        let assigner = TaskAssigner::new(&tasks, 10);
        assert_eq!(assigner.effective_workers(), 2);
        assert_eq!(assigner.assign_tasks().len(), 2);
    }

    #[test]
    fn test_degenerate_inputs() {
        let tasks = objectives(0);
        assert!(TaskAssigner::new(&tasks, 4).assign_tasks().is_empty());

        let tasks = objectives(5);
        assert!(TaskAssigner::new(&tasks, 0).assign_tasks().is_empty());
    }
}
