use std::collections::BTreeSet;

/// One line of a dotenv document.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvLine {
    /// `KEY=value`, optionally written as `export KEY=value`.
    Pair {
        key: String,
        value: String,
        exported: bool,
    },
    /// A comment line, kept verbatim.
    Comment(String),
    Blank,
}

/// A parsed dotenv file, kept line by line so it can be written back
/// in the same shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvDocument {
    pub lines: Vec<EnvLine>,
}

impl EnvDocument {
    /// Build a document holding only the given pairs, in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            lines: pairs
                .into_iter()
                .map(|(key, value)| EnvLine::Pair {
                    key: key.into(),
                    value: value.into(),
                    exported: false,
                })
                .collect(),
        }
    }

    /// Iterate over `(key, value)` pairs in file order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| match line {
            EnvLine::Pair { key, value, .. } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    /// The set of keys defined in this document.
    pub fn key_set(&self) -> BTreeSet<String> {
        self.pairs().map(|(k, _)| k.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of<'a>(doc: &'a EnvDocument, key: &str) -> Option<&'a str> {
        doc.pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    #[test]
    fn from_pairs_keeps_order() {
        let doc = EnvDocument::from_pairs([("B", "2"), ("A", "1")]);
        let keys: Vec<_> = doc.pairs().map(|(k, _)| k).collect();

        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(value_of(&doc, "A"), Some("1"));
        assert_eq!(value_of(&doc, "C"), None);
    }

    #[test]
    fn key_set_skips_comments_and_blanks() {
        let doc = EnvDocument {
            lines: vec![
                EnvLine::Comment("# db".into()),
                EnvLine::Pair {
                    key: "DB".into(),
                    value: String::new(),
                    exported: true,
                },
                EnvLine::Blank,
            ],
        };

        assert_eq!(doc.key_set().into_iter().collect::<Vec<_>>(), vec!["DB"]);
    }
}
