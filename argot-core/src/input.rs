//! Tokenizing raw command-line arguments.
//!
//! [`tokenize`] turns the argument vector into a [`ParsedInput`]. The
//! classification of every token is purely syntactic: no command or option
//! descriptor is consulted here, so tokenizing never fails. Problems such as
//! unknown options or bad values are reported later by the resolver and the
//! binder, which know what the command expects.

use std::fmt;

use log::trace;

/// Key under which an option was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// `-x`
    Short(char),
    /// `--name`
    Long(String),
}

impl OptionKey {
    /// Returns the token that produces this key.
    pub fn to_token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKey::Short(c) => write!(f, "-{c}"),
            OptionKey::Long(name) => write!(f, "--{name}"),
        }
    }
}

/// One option key together with every raw value supplied for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInput {
    pub key: OptionKey,
    pub values: Vec<String>,
}

impl OptionInput {
    pub fn new(key: OptionKey, values: Vec<String>) -> Self {
        Self { key, values }
    }

    pub fn flag(key: OptionKey) -> Self {
        Self::new(key, Vec::new())
    }
}

impl fmt::Display for OptionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        for value in &self.values {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

/// Tokenizer output: structured, but not validated against any command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedInput {
    /// Directive names without their brackets, in encounter order.
    pub directives: Vec<String>,
    /// Space-joined run of leading positional tokens.
    pub command_name: Option<String>,
    /// One entry per occurrence of a key, in encounter order. A key given
    /// twice appears twice.
    pub options: Vec<OptionInput>,
}

impl ParsedInput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_directive(&self, name: &str) -> bool {
        self.directives.iter().any(|d| d.eq_ignore_ascii_case(name))
    }

    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.options.iter().any(|o| &o.key == key)
    }

    /// True when any of the given keys was supplied.
    pub fn has_any_option(&self, keys: &[OptionKey]) -> bool {
        keys.iter().any(|k| self.has_option(k))
    }

    /// Serializes back into an argument vector.
    ///
    /// Directives come first, then the command name split into words, then the
    /// options. Tokenizing the result yields a value equal to `self` as long
    /// as no value looks like an option key or a directive.
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.directives.iter().map(|d| format!("[{d}]")).collect();

        if let Some(name) = &self.command_name {
            args.extend(name.split(' ').map(str::to_string));
        }

        for option in &self.options {
            args.push(option.key.to_token());
            args.extend(option.values.iter().cloned());
        }

        args
    }
}

impl fmt::Display for ParsedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if let Some(name) = self.command_name.as_deref().filter(|n| !n.trim().is_empty()) {
            parts.push(name.to_string());
        }
        parts.extend(self.directives.iter().map(|d| format!("[{d}]")));
        parts.extend(self.options.iter().map(ToString::to_string));

        write!(f, "{}", parts.join(" "))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Directive(&'a str),
    Key(OptionKey),
    Positional(&'a str),
}

fn classify(arg: &str) -> Token<'_> {
    if let Some(inner) = arg.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        if !inner.is_empty() && !inner.chars().any(char::is_whitespace) {
            return Token::Directive(inner);
        }
    }

    if let Some(name) = arg.strip_prefix("--") {
        return Token::Key(OptionKey::Long(name.to_string()));
    }

    if let Some(rest) = arg.strip_prefix('-') {
        let mut chars = rest.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Token::Key(OptionKey::Short(c));
        }
    }

    Token::Positional(arg)
}

/// Splits raw arguments into directives, a command name and options.
pub fn tokenize<I, S>(args: I) -> ParsedInput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut input = ParsedInput::empty();
    let mut name_words: Vec<String> = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        let token = classify(arg);
        trace!("Token {:?} classified as {:?}", arg, token);

        match token {
            Token::Directive(name) => input.directives.push(name.to_string()),
            Token::Key(key) => input.options.push(OptionInput::flag(key)),
            Token::Positional(value) => match input.options.last_mut() {
                Some(option) => option.values.push(value.to_string()),
                None => name_words.push(value.to_string()),
            },
        }
    }

    if !name_words.is_empty() {
        input.command_name = Some(name_words.join(" "));
    }

    input
}
