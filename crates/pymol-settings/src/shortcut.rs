//! Abbreviation-aware name lookup
//!
//! Command-language users may type any unique prefix of a keyword
//! (`set orth` for `set orthoscopic`). An exact match always wins over
//! prefix matches.

/// Outcome of looking up a possibly abbreviated name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The key is a complete name
    Exact(&'a str),
    /// The key is a prefix of exactly one name
    Unique(&'a str),
    /// The key is a prefix of several names
    Ambiguous(Vec<&'a str>),
    /// Nothing matches
    Unknown,
}

impl<'a> Lookup<'a> {
    /// The resolved name, if the lookup was unambiguous
    pub fn name(&self) -> Option<&'a str> {
        match self {
            Lookup::Exact(name) | Lookup::Unique(name) => Some(name),
            _ => None,
        }
    }
}

/// Sorted keyword list supporting unique-prefix resolution
#[derive(Debug, Clone, Default)]
pub struct Shortcut {
    names: Vec<String>,
}

impl Shortcut {
    /// Build a shortcut table from a list of names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Check for a complete (non-abbreviated) name
    pub fn has_key(&self, key: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(key)).is_ok()
    }

    /// Resolve a possibly abbreviated key
    pub fn interpret(&self, key: &str) -> Lookup<'_> {
        if key.is_empty() {
            return Lookup::Unknown;
        }
        if let Ok(i) = self.names.binary_search_by(|n| n.as_str().cmp(key)) {
            return Lookup::Exact(&self.names[i]);
        }

        // Sorted order puts every name sharing the prefix right after the
        // insertion point.
        let start = self.names.partition_point(|n| n.as_str() < key);
        let matches: Vec<&str> = self.names[start..]
            .iter()
            .take_while(|n| n.starts_with(key))
            .map(String::as_str)
            .collect();

        match matches.len() {
            0 => Lookup::Unknown,
            1 => Lookup::Unique(matches[0]),
            _ => Lookup::Ambiguous(matches),
        }
    }

    /// All names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of names in the table
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
