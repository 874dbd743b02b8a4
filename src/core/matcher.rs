//! Whole-word matching of tokens against one file's name and content

use std::collections::BTreeSet;

use regex::RegexSet;

use crate::core::tokens::TokenSet;

/// Matches every token of a [`TokenSet`] against files.
///
/// Content matching is whole-word: a token hits a line only when it is
/// delimited by non-word characters or the line edges, so a short numeric
/// code cannot hit inside an unrelated longer number. Filename matching is
/// plain substring containment, because invoice identifiers are routinely
/// embedded in filenames without separators. The asymmetry is intentional.
///
/// Read-only after construction and shared freely across scan workers.
#[derive(Debug)]
pub struct Matcher {
    tokens: Vec<String>,
    content: RegexSet,
}

impl Matcher {
    /// Compile one content pattern per token.
    pub fn new(tokens: &TokenSet) -> Result<Self, regex::Error> {
        let tokens: Vec<String> = tokens.as_slice().to_vec();
        let content = RegexSet::new(tokens.iter().map(|t| word_pattern(t)))?;
        Ok(Self { tokens, content })
    }

    /// Indices (into the sorted token list) of tokens found in this file.
    ///
    /// Once a token has been seen it is never searched again for this
    /// file; the line scan stops entirely when every token has been found.
    pub fn match_file(&self, filename: &str, lines: &[String]) -> BTreeSet<usize> {
        let mut found = BTreeSet::new();
        if self.tokens.is_empty() {
            return found;
        }

        let name = filename.to_lowercase();
        for (i, token) in self.tokens.iter().enumerate() {
            if name.contains(token.as_str()) {
                found.insert(i);
            }
        }

        for line in lines {
            if found.len() == self.tokens.len() {
                break;
            }
            let line = line.to_lowercase();
            for i in self.content.matches(&line) {
                found.insert(i);
            }
        }

        found
    }

    /// Token text for a match index.
    pub fn token(&self, index: usize) -> &str {
        &self.tokens[index]
    }
}

/// Escape a token into a whole-word content pattern.
///
/// `\b` anchors are added only on edges whose token character is a word
/// character; a token that starts or ends with punctuation is already
/// delimited there.
fn word_pattern(token: &str) -> String {
    let mut pattern = String::new();
    if token.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(token));
    if token.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(tokens: &[&str]) -> Matcher {
        Matcher::new(&TokenSet::from_tokens(tokens)).unwrap()
    }

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    fn matched<'a>(m: &'a Matcher, filename: &str, text: &[&str]) -> Vec<&'a str> {
        m.match_file(filename, &lines(text))
            .into_iter()
            .map(|i| m.token(i))
            .collect()
    }

    #[test]
    fn test_whole_word_hits_delimited_token() {
        let m = matcher(&["42"]);
        assert_eq!(matched(&m, "doc.pdf", &["invoice 42 paid"]), ["42"]);
    }

    #[test]
    fn test_whole_word_rejects_embedded_token() {
        let m = matcher(&["42"]);
        assert!(matched(&m, "doc.pdf", &["invoice 4242 paid"]).is_empty());
    }

    #[test]
    fn test_word_boundary_at_line_edges() {
        let m = matcher(&["inv001"]);
        assert_eq!(matched(&m, "doc.pdf", &["inv001 opens", "ends inv001"]).len(), 1);
    }

    #[test]
    fn test_filename_uses_substring_containment() {
        let m = matcher(&["abc123"]);
        assert_eq!(matched(&m, "abc123-scan.pdf", &[]), ["abc123"]);
        assert_eq!(matched(&m, "xabc123y.pdf", &[]), ["abc123"]);
    }

    #[test]
    fn test_filename_match_is_case_insensitive() {
        let m = matcher(&["inv001"]);
        assert_eq!(matched(&m, "INV001_copy.PDF", &[]), ["inv001"]);
    }

    #[test]
    fn test_content_match_is_case_insensitive() {
        let m = matcher(&["inv001"]);
        assert_eq!(matched(&m, "doc.pdf", &["see INV001 attached"]), ["inv001"]);
    }

    #[test]
    fn test_token_with_punctuation_edges() {
        let m = matcher(&["#42"]);
        assert_eq!(matched(&m, "doc.pdf", &["ref#42 noted"]), ["#42"]);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let m = matcher(&["a.b"]);
        assert!(matched(&m, "doc.pdf", &["aXb here"]).is_empty());
        assert_eq!(matched(&m, "doc.pdf", &["see a.b here"]), ["a.b"]);
    }

    #[test]
    fn test_empty_token_set_matches_nothing() {
        let m = matcher(&[]);
        assert!(m.match_file("inv001.pdf", &lines(&["inv001"])).is_empty());
    }

    #[test]
    fn test_empty_text_matches_nothing_by_content() {
        let m = matcher(&["inv001"]);
        assert!(m.match_file("doc.pdf", &[]).is_empty());
    }

    #[test]
    fn test_multiple_tokens_in_one_file() {
        let m = matcher(&["inv001", "inv002", "inv003"]);
        let found = matched(&m, "inv003-batch.pdf", &["covers inv001", "and inv002 too"]);
        assert_eq!(found, ["inv001", "inv002", "inv003"]);
    }

    #[test]
    fn test_first_hit_per_token_suffices() {
        // Repeats collapse; the result is a set of indices, not a count.
        let m = matcher(&["inv001"]);
        let found = m.match_file("doc.pdf", &lines(&["inv001", "inv001 again"]));
        assert_eq!(found.len(), 1);
    }
}
