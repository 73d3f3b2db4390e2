//! Admin dashboard figures.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Bucket for patients without a `branch_id`.
pub const UNKNOWN_BRANCH: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchCount {
    pub branch_id: String,
    pub patients: usize,
}

/// Counts patients per branch from a raw patient list.
///
/// Non-array payloads count as empty. Buckets are ordered by branch key.
pub fn patients_per_branch(patients: &Value) -> Vec<BranchCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for patient in patients.as_array().into_iter().flatten() {
        let key = match patient.get("branch_id") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => UNKNOWN_BRANCH.to_string(),
        };
        *counts.entry(key).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(branch_id, patients)| BranchCount {
            branch_id,
            patients,
        })
        .collect()
}
