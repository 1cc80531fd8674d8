use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fields of a cat that local storage tracks.
///
/// `external_id` is the integration's identifier and the conflict key for
/// upserts. It may be empty when the remote record had no id; the repository
/// refuses such records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
    pub external_id: String,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub color: Option<String>,
}

impl Cat {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A cat row as persisted in the `cats` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCat {
    pub id: i64,
    pub external_id: String,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for StoredCat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID:          {}", self.id)?;
        writeln!(f, "External ID: {}", self.external_id)?;
        writeln!(f, "Name:        {}", self.name.as_deref().unwrap_or("-"))?;
        writeln!(f, "Breed:       {}", self.breed.as_deref().unwrap_or("-"))?;
        writeln!(f, "Color:       {}", self.color.as_deref().unwrap_or("-"))?;
        writeln!(f, "Created:     {}", self.created_at.format("%Y-%m-%d %H:%M"))?;
        write!(f, "Updated:     {}", self.updated_at.format("%Y-%m-%d %H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cat_builder() {
        let cat = Cat::new("42")
            .with_name("Mittens")
            .with_breed("Siamese")
            .with_color("cream");

        assert_eq!(cat.external_id, "42");
        assert_eq!(cat.name.as_deref(), Some("Mittens"));
        assert_eq!(cat.breed.as_deref(), Some("Siamese"));
        assert_eq!(cat.color.as_deref(), Some("cream"));
    }

    #[test]
    fn test_stored_cat_display_placeholders() {
        let now = Utc::now();
        let stored = StoredCat {
            id: 1,
            external_id: "42".to_string(),
            name: Some("Mittens".to_string()),
            breed: None,
            color: None,
            created_at: now,
            updated_at: now,
        };

        let output = stored.to_string();
        assert!(output.contains("Mittens"));
        assert!(output.contains("Breed:       -"));
    }
}
