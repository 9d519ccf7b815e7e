//! Descriptive info carried by every color, group, and camp.

use crate::error::{CampError, Result};

/// Opaque user metadata. The core never interprets it.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Name, description, and metadata attached to a color object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorInfo {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) metadata: Metadata,
}

impl ColorInfo {
    /// Build validated info.
    ///
    /// Names become file names inside a camp, so they are restricted to
    /// ASCII letters, digits, and underscores.
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        metadata: Option<Metadata>,
    ) -> Result<Self> {
        if let Some(name) = &name {
            validate_name(name)?;
        }
        if let Some(description) = &description {
            validate_description(description)?;
        }
        Ok(Self {
            name,
            description,
            metadata: metadata.unwrap_or_default(),
        })
    }

    /// Info with only a name.
    pub fn named(name: impl Into<String>) -> Result<Self> {
        Self::new(Some(name.into()), None, None)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        self.name = Some(name);
        Ok(self)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Result<Self> {
        let description = description.into();
        validate_description(&description)?;
        self.description = Some(description);
        Ok(self)
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Merge replacement fields into a copy of this info.
    ///
    /// At least one field must be given.
    pub fn changed(
        &self,
        name: Option<String>,
        description: Option<String>,
        metadata: Option<Metadata>,
    ) -> Result<Self> {
        if name.is_none() && description.is_none() && metadata.is_none() {
            return Err(CampError::validation("no info fields to change"));
        }
        Self::new(
            name.or_else(|| self.name.clone()),
            description.or_else(|| self.description.clone()),
            Some(metadata.unwrap_or_else(|| self.metadata.clone())),
        )
    }

    /// Name required for registration in a camp or map.
    pub(crate) fn require_name(&self, kind: &str) -> Result<&str> {
        self.name().ok_or_else(|| {
            CampError::validation(format!("{kind} needs a name to be registered"))
        })
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CampError::validation("name can not be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(CampError::validation(format!(
            "invalid name {name:?}: only ASCII letters, digits, and '_' are allowed"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CampError::validation(format!(
            "description should not be more than {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}
