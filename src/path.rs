use std::fmt;

/// A single element of a [`ConfigPath`].
///
/// The admin API addresses array elements by position, so a segment
/// consisting entirely of digits is an index into its parent container
/// rather than an object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// An object key.
    Name(String),
    /// An array index.
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = raw.parse() {
                return Self::Index(index);
            }
        }
        Self::Name(raw.to_string())
    }

    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A slash-delimited address of a node within the configuration
/// document, parsed once at the boundary.
///
/// The root of the document is the empty path. Leading, trailing, and
/// duplicate slashes are ignored.
///
/// # Example
///
/// ```
/// use balestra::{ConfigPath, Segment};
///
/// let path = ConfigPath::parse("apps/http/servers/0");
///
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.last(), Some(&Segment::Index(0)));
/// assert_eq!(path.to_string(), "apps/http/servers/0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigPath {
    segments: Vec<Segment>,
}

impl ConfigPath {
    /// The root of the configuration document.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(Segment::parse)
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The final segment, i.e. the node a write targets.
    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The path made of the first `depth` segments.
    #[must_use]
    pub fn prefix(&self, depth: usize) -> Self {
        Self {
            segments: self.segments[..depth].to_vec(),
        }
    }
}

impl From<&str> for ConfigPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
