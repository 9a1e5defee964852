use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(0);

/// An opaque channel token.
///
/// Every call to [`Token::new`] (or [`Token::anonymous`]) allocates a fresh
/// identity; the display text is cosmetic. Two tokens built from the same
/// text are different channels everywhere, and cloning a token is the only
/// way to obtain an equal one.
///
/// # Example
/// ```
/// use sync_events::Token;
///
/// let a = Token::new("shutdown");
/// let b = Token::new("shutdown");
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// ```
#[derive(Debug, Clone)]
pub struct Token {
    id: u64,
    label: Option<String>,
}

impl Token {
    /// Allocates a new token carrying `label` as its display text.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
            label: Some(label.into()),
        }
    }

    /// Allocates a new token with no display text.
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed),
            label: None,
        }
    }

    /// The display text given at construction, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

// Identity is the allocated id; the label never participates.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Token({label})"),
            None => write!(f, "Token(#{})", self.id),
        }
    }
}

/// A channel identifier: a plain text label or an opaque [`Token`].
///
/// Labels compare by value, tokens by identity. Both kinds live side by side
/// in one emitter and look up in average constant time.
///
/// Anything the emitter accepts as a key goes through `Into<EventKey>`, so
/// call sites can pass `&str`, `String`, or a [`Token`] directly.
///
/// # Example
/// ```
/// use sync_events::{EventKey, Token};
///
/// assert_eq!(EventKey::from("tick"), EventKey::from(String::from("tick")));
/// assert_ne!(EventKey::from(Token::new("tick")), EventKey::from("tick"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// Text label, equal by value.
    Label(String),
    /// Opaque token, equal by identity.
    Token(Token),
}

impl From<&str> for EventKey {
    fn from(label: &str) -> Self {
        EventKey::Label(label.to_string())
    }
}

impl From<String> for EventKey {
    fn from(label: String) -> Self {
        EventKey::Label(label)
    }
}

impl From<Token> for EventKey {
    fn from(token: Token) -> Self {
        EventKey::Token(token)
    }
}

impl From<&Token> for EventKey {
    fn from(token: &Token) -> Self {
        EventKey::Token(token.clone())
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Label(label) => f.write_str(label),
            EventKey::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}
