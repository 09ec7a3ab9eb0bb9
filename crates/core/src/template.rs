use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureHint {
    #[default]
    Default,
    /// `{@Name}`
    Destructure,
    /// `{$Name}`
    Stringify,
}

/// Widest alignment a hole may request; wider holes are kept as text.
pub const MAX_ALIGNMENT: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub width: usize,
    pub left: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyToken {
    pub name: String,
    pub format: Option<String>,
    pub alignment: Option<Alignment>,
    pub hint: CaptureHint,
    /// The hole as written, braces included.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Property(PropertyToken),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageTemplate {
    text: String,
    tokens: Vec<Token>,
}

impl MessageTemplate {
    /// Parses template text. Malformed holes are kept as literal text, so
    /// parsing never fails.
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            tokens: tokenize(text),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn property_tokens(&self) -> impl Iterator<Item = &PropertyToken> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Property(p) => Some(p),
            Token::Text(_) => None,
        })
    }

    /// Doubles braces so that `message` parses back as plain text.
    pub fn escape(message: &str) -> String {
        message.replace('{', "{{").replace('}', "}}")
    }
}

impl From<&str> for MessageTemplate {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        match c {
            '{' if rest.starts_with("{{") => {
                literal.push('{');
                rest = &rest[2..];
            }
            '{' => match parse_hole(rest) {
                Some((token, consumed)) => {
                    if !literal.is_empty() {
                        tokens.push(Token::Text(std::mem::take(&mut literal)));
                    }
                    tokens.push(Token::Property(token));
                    rest = &rest[consumed..];
                }
                None => {
                    let end = malformed_hole_end(rest);
                    literal.push_str(&rest[..end]);
                    rest = &rest[end..];
                }
            },
            '}' if rest.starts_with("}}") => {
                literal.push('}');
                rest = &rest[2..];
            }
            _ => {
                literal.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Text(literal));
    }
    tokens
}

// `rest` starts with '{'. Returns the token and the bytes consumed.
fn parse_hole(rest: &str) -> Option<(PropertyToken, usize)> {
    let close = rest[1..].find(['{', '}'])? + 1;
    if rest.as_bytes()[close] != b'}' {
        return None;
    }
    let token = parse_hole_content(&rest[1..close])?;
    Some((token, close + 1))
}

fn malformed_hole_end(rest: &str) -> usize {
    match rest[1..].find(['{', '}']) {
        Some(i) if rest.as_bytes()[i + 1] == b'}' => i + 2,
        Some(i) => i + 1,
        None => rest.len(),
    }
}

fn parse_hole_content(content: &str) -> Option<PropertyToken> {
    let (hint, body) = if let Some(stripped) = content.strip_prefix('@') {
        (CaptureHint::Destructure, stripped)
    } else if let Some(stripped) = content.strip_prefix('$') {
        (CaptureHint::Stringify, stripped)
    } else {
        (CaptureHint::Default, content)
    };

    let (name_and_alignment, format) = match body.split_once(':') {
        Some((head, format)) if !format.is_empty() => (head, Some(format.to_string())),
        Some(_) => return None,
        None => (body, None),
    };

    let (name, alignment) = match name_and_alignment.split_once(',') {
        Some((name, alignment)) => (name, Some(parse_alignment(alignment)?)),
        None => (name_and_alignment, None),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }

    Some(PropertyToken {
        name: name.to_string(),
        format,
        alignment,
        hint,
        raw: format!("{{{content}}}"),
    })
}

fn parse_alignment(raw: &str) -> Option<Alignment> {
    let (left, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let width = digits
        .parse::<usize>()
        .ok()
        .filter(|w| (1..=MAX_ALIGNMENT).contains(w))?;
    Some(Alignment { width, left })
}
