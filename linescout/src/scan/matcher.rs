use crate::errors::{ScanError, ScanResult};

/// Case-sensitive substring test applied to one line at a time
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
}

impl KeywordMatcher {
    /// Creates a matcher for `keyword`, which must not be empty
    pub fn new(keyword: impl Into<String>) -> ScanResult<Self> {
        let keyword = keyword.into();
        if keyword.is_empty() {
            return Err(ScanError::invalid_keyword("keyword must not be empty"));
        }
        Ok(Self { keyword })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Returns true if the keyword occurs anywhere in `line`
    pub fn is_match(&self, line: &str) -> bool {
        line.contains(self.keyword.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match() {
        let matcher = KeywordMatcher::new("ERROR").unwrap();
        assert!(matcher.is_match("[1] ERROR: Timeout"));
        assert!(matcher.is_match("prefixERRORsuffix"));
        assert!(!matcher.is_match("[2] INFO: ok"));
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = KeywordMatcher::new("ERROR").unwrap();
        assert!(!matcher.is_match("error: lowercase"));
        assert!(!matcher.is_match("Error: mixed"));
    }

    #[test]
    fn test_multiple_occurrences_single_match() {
        let matcher = KeywordMatcher::new("ERROR").unwrap();
        assert!(matcher.is_match("ERROR ERROR ERROR"));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        assert!(matches!(
            KeywordMatcher::new(""),
            Err(ScanError::InvalidKeyword(_))
        ));
    }

    #[test]
    fn test_non_ascii_keyword() {
        let matcher = KeywordMatcher::new("petición").unwrap();
        assert!(matcher.is_match("ERROR: Timeout en la petición"));
        assert!(!matcher.is_match("ERROR: Timeout"));
    }
}
