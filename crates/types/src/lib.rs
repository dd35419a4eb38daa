/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum CaseIdError {
    /// The input identifier was empty or contained only whitespace
    #[error("Case identifier cannot be empty")]
    Empty,
}

/// An opaque case identifier that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one
/// non-whitespace character. The input is automatically trimmed of leading
/// and trailing whitespace during construction. No further structure is
/// imposed: callers may supply anything from `#123-456` to an MRN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseId(String);

impl CaseId {
    /// Creates a new `CaseId` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the
    /// trimmed result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(CaseId)` if the trimmed input is non-empty,
    /// or `Err(CaseIdError::Empty)` if it's empty or whitespace-only.
    pub fn new(input: impl AsRef<str>) -> Result<Self, CaseIdError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CaseIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring match, used by the worklist filter.
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(&needle.to_lowercase())
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for CaseId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for CaseId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CaseId::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let id = CaseId::new("  #204-77  ").expect("valid id");
        assert_eq!(id.as_str(), "#204-77");
    }

    #[test]
    fn rejects_whitespace_only_input() {
        assert!(matches!(CaseId::new("   "), Err(CaseIdError::Empty)));
        assert!(matches!(CaseId::new(""), Err(CaseIdError::Empty)));
    }

    #[test]
    fn substring_match_ignores_case() {
        let id = CaseId::new("PT-0042").expect("valid id");
        assert!(id.contains_ignore_case("pt-00"));
        assert!(id.contains_ignore_case("0042"));
        assert!(!id.contains_ignore_case("0043"));
    }
}
