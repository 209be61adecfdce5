//! Property paths into the model

use std::fmt;

/// One step in a path: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a field's value inside the model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, addressing the whole model
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted path; all-digit segments are array indices
    pub fn parse(text: &str) -> Self {
        let segments = text
            .split('.')
            .filter(|part| !part.is_empty())
            .map(|part| match part.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Key(part.to_string()),
            })
            .collect();
        Self { segments }
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(text: &str) -> Self {
        FieldPath::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_indices() {
        let path = FieldPath::parse("emails.1.address");
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("emails".into()),
                PathSegment::Index(1),
                PathSegment::Key("address".into()),
            ]
        );
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert!(FieldPath::parse("").is_root());
        assert!(FieldPath::root().is_empty());
    }

    #[test]
    fn test_display_round_trip() {
        let path = FieldPath::root().key("address").key("streetName");
        assert_eq!(path.to_string(), "address.streetName");
        assert_eq!(FieldPath::parse(&path.to_string()), path);
    }

    #[test]
    fn test_index_extends_path() {
        let path = FieldPath::root().key("emails").index(0);
        assert_eq!(path.to_string(), "emails.0");
        assert_eq!(path.last(), Some(&PathSegment::Index(0)));
        assert_eq!(path.len(), 2);
    }
}
