use crate::foundation::core::Rgba8;

/// A run of characters sharing one color, produced by an external highlighter.
///
/// Tokens are consumed read-only; a token without a color falls back to the
/// theme's default foreground at draw time.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub text: String,
    pub color: Option<Rgba8>,
}

impl Token {
    pub fn new(text: impl Into<String>, color: Option<Rgba8>) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    /// A token carrying no explicit color.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }
}

/// Total count of glyph-producing characters across the token stream.
/// Newlines advance layout without consuming a reveal step, so they are not
/// counted.
pub fn total_chars(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map(|t| t.text.chars().filter(|&c| c != '\n').count())
        .sum()
}

/// Number of text lines in the fully revealed stream. An empty stream is one
/// (empty) line.
pub fn line_count(tokens: &[Token]) -> usize {
    let newlines: usize = tokens
        .iter()
        .map(|t| t.text.chars().filter(|&c| c == '\n').count())
        .sum();
    newlines + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_chars_not_bytes() {
        let tokens = vec![Token::plain("héllo"), Token::plain("\nwörld")];
        assert_eq!(total_chars(&tokens), 10);
    }

    #[test]
    fn newlines_do_not_consume_reveal_steps() {
        let tokens = vec![Token::plain("ab"), Token::plain("\nc")];
        assert_eq!(total_chars(&tokens), 3);
    }

    #[test]
    fn line_count_counts_newlines_plus_one() {
        assert_eq!(line_count(&[]), 1);
        assert_eq!(line_count(&[Token::plain("one line")]), 1);
        let tokens = vec![Token::plain("a\nb"), Token::plain("\nc\n")];
        assert_eq!(line_count(&tokens), 4);
    }
}
