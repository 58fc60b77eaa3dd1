//! Line-oriented tokenizer for `KEY=VALUE` env files

use types::{EnvError, QuoteKind, RawEntry, Result};

/// Per-assignment state, reset at the start of each line unless a quote is open
#[derive(Debug, Default)]
struct Assignment {
    key: String,
    value: String,
    in_value: bool,
    quote: QuoteKind,
    /// Line and column of the currently open quote
    open_quote: Option<(usize, usize)>,
    /// A quote has been closed, only whitespace or a comment may follow
    closed: bool,
    line: usize,
}

impl Assignment {
    fn starting_at(line: usize) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    fn is_quoted(&self) -> bool {
        self.open_quote.is_some()
    }

    fn into_entry(self) -> Option<RawEntry> {
        let key = self.key.trim();
        if key.is_empty() {
            return None;
        }
        let value = match self.quote {
            QuoteKind::None => self.value.trim().to_string(),
            _ => self.value,
        };
        Some(RawEntry {
            key: key.to_string(),
            value,
            quote: self.quote,
            line: self.line,
        })
    }
}

/// Tokenizer over the content of a single env file
pub struct Tokenizer<'a> {
    file: &'a str,
    content: &'a str,
}

impl<'a> Tokenizer<'a> {
    /// `file` is only used to label errors
    pub fn new(file: &'a str, content: &'a str) -> Self {
        Self { file, content }
    }

    /// Split the content into ordered assignments
    pub fn tokenize(&self) -> Result<Vec<RawEntry>> {
        let mut entries = Vec::new();
        let mut current = Assignment::starting_at(1);
        let mut last_line = (0, 0);

        for (index, line) in self.content.split_inclusive('\n').enumerate() {
            let line_no = index + 1;
            if !current.is_quoted() {
                current = Assignment::starting_at(line_no);
            }

            let mut column = 0;
            let mut ended = false;
            for ch in line.chars() {
                column += 1;
                if self.step(&mut current, ch, line_no, column)? {
                    ended = true;
                    break;
                }
            }
            last_line = (line_no, column);

            if current.is_quoted() {
                continue;
            }
            if !current.in_value && !current.key.trim().is_empty() {
                let at = if ended { column } else { column + 1 };
                return Err(self.error(line_no, at, "Keys cannot have new line, expected '='"));
            }
            let finished = std::mem::take(&mut current);
            entries.extend(finished.into_entry());
        }

        if let Some((line, column)) = current.open_quote {
            return Err(self.error(line, column, "Unterminated quote, expected a closing quote"));
        }
        tracing::trace!(
            file = self.file,
            lines = last_line.0,
            entries = entries.len(),
            "tokenized env content"
        );
        Ok(entries)
    }

    /// Feed one character; returns true when the rest of the line is ignored
    fn step(&self, state: &mut Assignment, ch: char, line: usize, column: usize) -> Result<bool> {
        if state.is_quoted() {
            if QuoteKind::from_char(ch) == Some(state.quote) {
                state.open_quote = None;
                state.closed = true;
            } else {
                state.value.push(ch);
            }
            return Ok(false);
        }

        if let Some(kind) = QuoteKind::from_char(ch) {
            if !state.in_value {
                return Err(self.error(line, column, "No quotes allowed in key"));
            }
            if state.closed {
                return Err(self.error(
                    line,
                    column,
                    "Only white space characters or comments allowed after end of quote",
                ));
            }
            if state.value.trim().is_empty() {
                state.value.clear();
            }
            state.quote = kind;
            state.open_quote = Some((line, column));
            return Ok(false);
        }

        match ch {
            '#' | '\n' => Ok(true),
            '=' if state.in_value => Err(self.error(
                line,
                column,
                "Unexpected '=' in value, quote values containing '='",
            )),
            '=' if state.key.trim().is_empty() => {
                Err(self.error(line, column, "Keys cannot be empty"))
            }
            '=' => {
                state.in_value = true;
                Ok(false)
            }
            c if state.closed => {
                if c.is_whitespace() {
                    Ok(false)
                } else {
                    Err(self.error(
                        line,
                        column,
                        "Only white space characters or comments allowed after end of quote",
                    ))
                }
            }
            c if state.in_value => {
                state.value.push(c);
                Ok(false)
            }
            c => {
                state.key.push(c);
                Ok(false)
            }
        }
    }

    fn error(&self, line: usize, column: usize, reason: &str) -> EnvError {
        EnvError::parser(self.file, line, column, reason)
    }
}
