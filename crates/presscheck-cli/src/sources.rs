//! Source files handed to `verify` and `check`

use std::collections::BTreeMap;
use std::path::Path;

use presscheck_core::model::{SourceRecord, Topic};
use presscheck_core::pipeline::{SearchError, SourceSearch};
use serde::Deserialize;

/// Either one source list for every topic, or lists keyed by topic or
/// candidate ID
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceFile {
    All(Vec<SourceRecord>),
    PerTopic(BTreeMap<String, Vec<SourceRecord>>),
}

impl SourceFile {
    pub fn read(path: &Path) -> presscheck::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Every record in the file, for commands that work on one topic
    pub fn all_records(&self) -> Vec<SourceRecord> {
        match self {
            Self::All(records) => records.clone(),
            Self::PerTopic(map) => map.values().flatten().cloned().collect(),
        }
    }
}

impl SourceSearch for SourceFile {
    fn search(&self, topic: &Topic) -> Result<Vec<SourceRecord>, SearchError> {
        match self {
            Self::All(records) => Ok(records.clone()),
            Self::PerTopic(map) => Ok(map
                .get(&topic.id)
                .or_else(|| map.get(&topic.candidate_id))
                .cloned()
                .unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presscheck_core::model::{CandidateBuilder, SourceType};
    use pretty_assertions::assert_eq;

    fn topic() -> Topic {
        let candidate = CandidateBuilder::new()
            .title("Transit workers strike")
            .url("https://example.com/transit")
            .build();
        Topic::from_candidate(&candidate, 0)
    }

    #[test]
    fn list_applies_to_every_topic() {
        let file: SourceFile = serde_json::from_str(
            r#"[{"name": "AP", "url": "https://apnews.com/x", "source_type": "wire_service"}]"#,
        )
        .unwrap();
        let found = file.search(&topic()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source_type, SourceType::WireService);
    }

    #[test]
    fn map_is_keyed_by_topic_or_candidate() {
        let topic = topic();
        let json = format!(
            r#"{{"{}": [{{"name": "NLRB", "url": "https://nlrb.gov/c"}}], "other": []}}"#,
            topic.candidate_id
        );
        let file: SourceFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file.search(&topic).unwrap()[0].name, "NLRB");
        assert_eq!(file.all_records().len(), 1);
    }

    #[test]
    fn unknown_topic_has_no_sources() {
        let file = SourceFile::PerTopic(BTreeMap::new());
        assert!(file.search(&topic()).unwrap().is_empty());
    }
}
