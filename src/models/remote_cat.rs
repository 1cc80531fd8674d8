use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One cat exactly as the integration API returned it.
///
/// Fields are kept loosely typed; only the transformer decides which of them
/// matter locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteCat(Map<String, Value>);

impl RemoteCat {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RemoteCat {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
