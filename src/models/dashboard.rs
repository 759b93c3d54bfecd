//! Typed schemas for statistics API payloads
//!
//! One documented shape per endpoint; absent or `null` fields decode to zero
//! or empty.

use serde::{Deserialize, Deserializer, Serialize};

/// Path of the public dashboard statistics endpoint, relative to the API base.
pub const PUBLIC_STATS_PATH: &str = "dashboard/public-stats";

/// Response of `POST /api/dashboard/public-stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicStats {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pensioners: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub submission_stats: SubmissionStats,
    #[serde(deserialize_with = "null_as_default")]
    pub verified_today: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub pending_queue: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub age_distribution: Vec<AgeBucket>,
}

/// Certificates submitted digitally versus manually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionStats {
    #[serde(rename = "totalDLC", deserialize_with = "null_as_default")]
    pub total_dlc: u64,
    #[serde(rename = "totalManual", deserialize_with = "null_as_default")]
    pub total_manual: u64,
}

/// Pensioner count for one age group, e.g. `"60-70"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgeBucket {
    #[serde(deserialize_with = "null_as_default")]
    pub age_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub count: u64,
}

/// Decodes an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PublicStats {
    /// Digital plus manual submissions.
    pub fn total_submissions(&self) -> u64 {
        self.submission_stats.total_dlc + self.submission_stats.total_manual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_stats_full_payload() {
        let payload = json!({
            "success": true,
            "totalPensioners": 1200,
            "submissionStats": {"totalDLC": 800, "totalManual": 150},
            "verifiedToday": 12,
            "pendingQueue": 3,
            "ageDistribution": [
                {"ageGroup": "<50", "count": 10},
                {"ageGroup": "60-70", "count": 400}
            ]
        });

        let stats: PublicStats = serde_json::from_value(payload).unwrap();
        assert!(stats.success);
        assert_eq!(stats.total_pensioners, 1200);
        assert_eq!(stats.submission_stats.total_dlc, 800);
        assert_eq!(stats.total_submissions(), 950);
        assert_eq!(stats.age_distribution[1].age_group, "60-70");
    }

    #[test]
    fn test_public_stats_missing_fields_default() {
        let stats: PublicStats = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(stats.total_pensioners, 0);
        assert_eq!(stats.submission_stats, SubmissionStats::default());
        assert!(stats.age_distribution.is_empty());
    }

    #[test]
    fn test_public_stats_null_fields_default() {
        let payload = json!({
            "success": true,
            "totalPensioners": 10,
            "submissionStats": {"totalDLC": null, "totalManual": 4},
            "verifiedToday": null,
            "pendingQueue": null,
            "ageDistribution": [{"count": 7}, {"ageGroup": null, "count": null}]
        });

        let stats: PublicStats = serde_json::from_value(payload).unwrap();
        assert_eq!(stats.total_pensioners, 10);
        assert_eq!(stats.verified_today, 0);
        assert_eq!(stats.pending_queue, 0);
        assert_eq!(stats.submission_stats.total_dlc, 0);
        assert_eq!(stats.total_submissions(), 4);
        assert_eq!(stats.age_distribution[0].age_group, "");
        assert_eq!(stats.age_distribution[0].count, 7);
        assert_eq!(stats.age_distribution[1], AgeBucket::default());
    }

    #[test]
    fn test_public_stats_null_containers_default() {
        let payload = json!({
            "success": null,
            "submissionStats": null,
            "ageDistribution": null
        });

        let stats: PublicStats = serde_json::from_value(payload).unwrap();
        assert_eq!(stats, PublicStats::default());
    }
}
