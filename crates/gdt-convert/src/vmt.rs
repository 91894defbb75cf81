//! Reader for KeyValues material descriptor text (`.vmt`).
//!
//! Only the top-level parameters of the shader block are kept; nested blocks
//! such as `proxies` or shader fallbacks are skipped.

use crate::error::ConvertError;
use crate::types::MaterialDescriptor;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Text { value: String, quoted: bool },
}

struct Tokenizer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    source: &'a Path,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str, source: &'a Path) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            source,
        }
    }

    fn error(&self, message: impl Into<String>) -> ConvertError {
        ConvertError::DescriptorParse {
            path: self.source.to_path_buf(),
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == '\n' {
                self.line += 1;
                self.chars.next();
            } else if ch.is_whitespace() {
                self.chars.next();
            } else if ch == '/' {
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if lookahead.peek() != Some(&'/') {
                    return;
                }
                while let Some(&c) = self.chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.chars.next();
                }
            } else {
                return;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ConvertError> {
        self.skip_whitespace_and_comments();

        let Some(ch) = self.chars.next() else {
            return Ok(None);
        };

        match ch {
            '{' => Ok(Some(Token::Open)),
            '}' => Ok(Some(Token::Close)),
            '"' => {
                let mut value = String::new();
                loop {
                    match self.chars.next() {
                        Some('"') => break,
                        Some('\n') => {
                            // Unterminated quotes end at the line break.
                            log::warn!(
                                "{}:{}: unterminated string {:?}",
                                self.source.display(),
                                self.line,
                                value
                            );
                            self.line += 1;
                            break;
                        }
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string at end of file")),
                    }
                }
                Ok(Some(Token::Text {
                    value,
                    quoted: true,
                }))
            }
            first => {
                let mut value = String::from(first);
                while let Some(&c) = self.chars.peek() {
                    if c.is_whitespace() || c == '{' || c == '}' || c == '"' {
                        break;
                    }
                    value.push(c);
                    self.chars.next();
                }
                Ok(Some(Token::Text {
                    value,
                    quoted: false,
                }))
            }
        }
    }

    /// Skip the rest of a block whose opening brace was already consumed.
    fn skip_block(&mut self) -> Result<(), ConvertError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next_token()? {
                Some(Token::Open) => depth += 1,
                Some(Token::Close) => depth -= 1,
                Some(Token::Text { .. }) => {}
                None => return Err(self.error("unterminated block")),
            }
        }
        Ok(())
    }
}

/// Whether a bare token is a platform conditional such as `[$X360]`.
fn is_conditional(token: &Token) -> bool {
    matches!(token, Token::Text { value, quoted: false } if value.starts_with('['))
}

/// Parse descriptor text held in memory.
pub fn parse_descriptor(text: &str) -> Result<MaterialDescriptor, ConvertError> {
    parse_descriptor_from(text, Path::new("<inline>"))
}

/// Read and parse a descriptor file.
pub fn parse_descriptor_file(path: &Path) -> Result<MaterialDescriptor, ConvertError> {
    let bytes = fs::read(path)?;
    // Descriptors are frequently saved in legacy code pages.
    let text = String::from_utf8_lossy(&bytes);
    parse_descriptor_from(&text, path)
}

/// Parse descriptor text; `source` is only used for error reporting.
pub fn parse_descriptor_from(text: &str, source: &Path) -> Result<MaterialDescriptor, ConvertError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut tokens = Tokenizer::new(text, source);

    let shader = loop {
        match tokens.next_token()? {
            Some(Token::Text { value, .. }) if value.starts_with('#') => {
                // `#include`/`#base` directives carry one argument.
                tokens.next_token()?;
            }
            Some(Token::Text { value, .. }) => break value,
            Some(Token::Open) | Some(Token::Close) => {
                return Err(tokens.error("expected shader name"));
            }
            None => return Err(tokens.error("empty descriptor")),
        }
    };

    if tokens.next_token()? != Some(Token::Open) {
        return Err(tokens.error(format!("expected '{{' after shader {:?}", shader)));
    }

    let mut params: IndexMap<String, String> = IndexMap::new();
    loop {
        let key = match tokens.next_token()? {
            Some(Token::Close) => break,
            Some(token) if is_conditional(&token) => continue,
            Some(Token::Text { value, .. }) => value,
            Some(Token::Open) => {
                tokens.skip_block()?;
                continue;
            }
            None => return Err(tokens.error("unterminated shader block")),
        };

        let value = match tokens.next_token()? {
            Some(Token::Open) => {
                tokens.skip_block()?;
                continue;
            }
            Some(token) if is_conditional(&token) => match tokens.next_token()? {
                Some(Token::Text { value, .. }) => value,
                _ => return Err(tokens.error(format!("missing value for key {:?}", key))),
            },
            Some(Token::Text { value, .. }) => value,
            Some(Token::Close) | None => {
                return Err(tokens.error(format!("missing value for key {:?}", key)));
            }
        };

        params.insert(key.trim().to_lowercase(), value.trim().to_string());
    }

    let mut descriptor = MaterialDescriptor::new(&shader, std::iter::empty::<(&str, &str)>());
    descriptor.params = params;
    Ok(descriptor)
}

/// Staged descriptor path for a material name.
pub fn descriptor_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.vmt", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_descriptor() {
        let text = r#"
"LightmappedGeneric"
{
    "$basetexture" "Brick/BrickWall01"
    "$surfaceprop" "brick"
}
"#;
        let desc = parse_descriptor(text).unwrap();
        assert_eq!(desc.shader, "lightmappedgeneric");
        assert_eq!(desc.get("$basetexture"), Some("Brick/BrickWall01"));
        assert_eq!(desc.get("$surfaceprop"), Some("brick"));
    }

    #[test]
    fn test_parse_bare_tokens_and_comments() {
        let text = "VertexLitGeneric // model shader\n{\n  $baseTexture models/props/crate // color\n  $nocull 1\n}\n";
        let desc = parse_descriptor(text).unwrap();
        assert_eq!(desc.shader, "vertexlitgeneric");
        assert_eq!(desc.get("$basetexture"), Some("models/props/crate"));
        assert_eq!(desc.get("$nocull"), Some("1"));
    }

    #[test]
    fn test_nested_blocks_are_skipped() {
        let text = r#"
"WorldVertexTransition"
{
    "$basetexture" "nature/dirt"
    "Proxies"
    {
        "AnimatedTexture" { "animatedtexturevar" "$basetexture" }
    }
    ">=dx90" { "$basetexture" "ignored" }
    "$basetexture2" "nature/grass"
}
"#;
        let desc = parse_descriptor(text).unwrap();
        assert_eq!(desc.get("$basetexture"), Some("nature/dirt"));
        assert_eq!(desc.get("$basetexture2"), Some("nature/grass"));
        assert!(!desc.has("proxies"));
        assert_eq!(desc.params.len(), 2);
    }

    #[test]
    fn test_conditional_values_and_repeated_keys() {
        let text = "\"UnlitGeneric\" { \"$alpha\" \"0.5\" [$X360] \"$alpha\" [!$X360] \"0.8\" }";
        let desc = parse_descriptor(text).unwrap();
        assert_eq!(desc.get("$alpha"), Some("0.8"));
    }

    #[test]
    fn test_empty_descriptor_is_error() {
        let err = parse_descriptor("   // nothing\n").unwrap_err();
        assert!(matches!(err, ConvertError::DescriptorParse { .. }));
    }

    #[test]
    fn test_unterminated_block_reports_line() {
        let err = parse_descriptor("\"LightmappedGeneric\"\n{\n\"$basetexture\" \"a/b\"\n").unwrap_err();
        match err {
            ConvertError::DescriptorParse { line, .. } => assert_eq!(line, 4),
            other => panic!("Expected DescriptorParse, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_open_brace() {
        let err = parse_descriptor("\"LightmappedGeneric\" \"$basetexture\"").unwrap_err();
        assert!(matches!(err, ConvertError::DescriptorParse { .. }));
    }

    #[test]
    fn test_parse_descriptor_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = descriptor_path(dir.path(), "wall");
        fs::write(&path, "\u{feff}\"LightmappedGeneric\" { \"$basetexture\" \"a/b\" }").unwrap();
        let desc = parse_descriptor_file(&path).unwrap();
        assert_eq!(desc.get("$basetexture"), Some("a/b"));
    }
}
