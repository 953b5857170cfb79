use cb_util::serde_json::{self, Value};
use serde::Deserialize;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn read_document(path: &Path) -> Result<Value, DocumentError> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// One entry of an `elevators` map. Every field is required and must have the
/// right kind; viewers are checked one by one afterwards.
#[derive(Debug, Deserialize)]
pub struct ElevatorRecord {
    pub name: String,
    pub disguise: String,
    pub enabled: bool,
    pub particles: bool,
    pub visible: bool,
    pub viewers: Vec<Value>,
}

impl ElevatorRecord {
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cb_util::serde_json::json;

    #[test]
    fn complete_record_parses() {
        let record = ElevatorRecord::from_value(&json!({
            "name": "Lobby",
            "disguise": "STONE",
            "enabled": true,
            "particles": false,
            "visible": true,
            "viewers": ["550e8400e29b41d4a716446655440000", null, 3],
            "extra": "ignored"
        }))
        .unwrap();
        assert_eq!(record.name, "Lobby");
        assert!(!record.particles);
        assert_eq!(record.viewers.len(), 3);
    }

    #[test]
    fn missing_or_mistyped_fields_reject_the_record() {
        let base = json!({
            "name": "Lobby",
            "disguise": "STONE",
            "enabled": true,
            "particles": false,
            "visible": true,
            "viewers": []
        });
        for field in ["name", "disguise", "enabled", "particles", "visible", "viewers"] {
            let mut missing = base.clone();
            missing.as_object_mut().unwrap().remove(field);
            assert!(ElevatorRecord::from_value(&missing).is_none(), "missing {}", field);
        }
        let mut wrong = base.clone();
        wrong["enabled"] = json!("true");
        assert!(ElevatorRecord::from_value(&wrong).is_none());
        let mut wrong = base.clone();
        wrong["viewers"] = json!("nobody");
        assert!(ElevatorRecord::from_value(&wrong).is_none());
        let mut wrong = base;
        wrong["name"] = Value::Null;
        assert!(ElevatorRecord::from_value(&wrong).is_none());
        assert!(ElevatorRecord::from_value(&json!([1, 2])).is_none());
    }
}
