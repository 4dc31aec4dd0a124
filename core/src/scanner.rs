//! # Scanner
//!
//! Character-at-a-time tokenizer for the description language.
//!
//! In word mode the scanner splits the input on whitespace, `;`, `{` and
//! `}` and drops `//` comments. In raw mode, entered on request of the
//! parser right after the opening brace of a literal code scope, every
//! character is captured verbatim until the braces balance again.
//!
//! The scanner never reads the input itself: [`Scanner::step`] consumes one
//! character and appends the resulting events to a buffer, which keeps each
//! transition testable without any stream.

use tracing::debug;

/// A lexical event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A whitespace delimited word.
    Word(String),
    /// `;`
    StatementEnd,
    /// `{`
    ScopeOpen,
    /// `}`
    ScopeClose,
    /// Text captured in raw mode, without the closing brace that ended it.
    Raw(String),
}

/// A token with the line it was completed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// 1-based line number.
    pub line: usize,
    /// The token.
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    /// Splitting words.
    Words,
    /// Skipping the rest of a `//` comment line.
    Comment,
    /// Capturing literal code; `depth` counts the braces still open.
    Raw { depth: usize, text: String },
}

/// Incremental tokenizer.
#[derive(Debug)]
pub struct Scanner {
    mode: Mode,
    word: String,
    previous_slash: bool,
    line: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Creates a scanner positioned on line 1.
    pub fn new() -> Self {
        Self {
            mode: Mode::Words,
            word: String::new(),
            previous_slash: false,
            line: 1,
        }
    }

    /// Current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether a raw capture is in progress.
    pub fn in_raw(&self) -> bool {
        matches!(self.mode, Mode::Raw { .. })
    }

    /// Braces still open in the current raw capture, 0 outside raw mode.
    pub fn raw_depth(&self) -> usize {
        match &self.mode {
            Mode::Raw { depth, .. } => *depth,
            _ => 0,
        }
    }

    /// Switches to raw mode. The opening brace of the literal scope must
    /// already have been consumed: the capture starts at depth 1 and ends on
    /// the brace that brings it back to 0.
    pub fn begin_raw(&mut self) {
        debug!(line = self.line, "raw capture started");
        self.word.clear();
        self.previous_slash = false;
        self.mode = Mode::Raw {
            depth: 1,
            text: String::new(),
        };
    }

    /// Consumes one character.
    pub fn step(&mut self, c: char, events: &mut Vec<Event>) {
        if self.mode == Mode::Words {
            self.step_word(c, events);
            return;
        }
        match &mut self.mode {
            Mode::Comment => {
                if c == '\n' {
                    self.line += 1;
                    self.mode = Mode::Words;
                }
            }
            Mode::Raw { depth, text } => match c {
                '{' => {
                    *depth += 1;
                    text.push(c);
                }
                '}' => {
                    *depth -= 1;
                    if *depth == 0 {
                        let captured = std::mem::take(text);
                        debug!(line = self.line, "raw capture finished");
                        events.push(Event {
                            line: self.line,
                            token: Token::Raw(captured),
                        });
                        self.mode = Mode::Words;
                    } else {
                        text.push(c);
                    }
                }
                '\n' => {
                    text.push(c);
                    self.line += 1;
                }
                _ => text.push(c),
            },
            Mode::Words => {}
        }
    }

    /// Flushes a word still being built at the end of the input.
    pub fn finish(&mut self, events: &mut Vec<Event>) {
        if matches!(self.mode, Mode::Words) {
            self.flush_word(events);
        }
    }

    fn step_word(&mut self, c: char, events: &mut Vec<Event>) {
        match c {
            '/' if self.previous_slash => {
                self.word.pop();
                self.flush_word(events);
                self.mode = Mode::Comment;
            }
            '/' => {
                self.word.push(c);
                self.previous_slash = true;
            }
            '\n' => {
                self.flush_word(events);
                self.line += 1;
            }
            ' ' | '\t' | '\r' => self.flush_word(events),
            ';' => self.delimiter(Token::StatementEnd, events),
            '{' => self.delimiter(Token::ScopeOpen, events),
            '}' => self.delimiter(Token::ScopeClose, events),
            _ => {
                self.word.push(c);
                self.previous_slash = false;
            }
        }
    }

    fn delimiter(&mut self, token: Token, events: &mut Vec<Event>) {
        self.flush_word(events);
        events.push(Event {
            line: self.line,
            token,
        });
    }

    fn flush_word(&mut self, events: &mut Vec<Event>) {
        self.previous_slash = false;
        if !self.word.is_empty() {
            events.push(Event {
                line: self.line,
                token: Token::Word(std::mem::take(&mut self.word)),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<Token> {
        let mut scanner = Scanner::new();
        let mut events = Vec::new();
        for c in input.chars() {
            scanner.step(c, &mut events);
        }
        scanner.finish(&mut events);
        events.into_iter().map(|e| e.token).collect()
    }

    fn word(text: &str) -> Token {
        Token::Word(text.to_string())
    }

    #[test]
    fn test_words_and_delimiters() {
        assert_eq!(
            scan("class {\n  name Point;\n}"),
            vec![
                word("class"),
                Token::ScopeOpen,
                word("name"),
                word("Point"),
                Token::StatementEnd,
                Token::ScopeClose,
            ]
        );
    }

    #[test]
    fn test_delimiters_split_words() {
        assert_eq!(
            scan("type double;}"),
            vec![word("type"), word("double"), Token::StatementEnd, Token::ScopeClose]
        );
    }

    #[test]
    fn test_comment_skips_rest_of_line() {
        assert_eq!(
            scan("name // the name { ; }\nPoint;"),
            vec![word("name"), word("Point"), Token::StatementEnd]
        );
    }

    #[test]
    fn test_comment_glued_to_word_keeps_prefix() {
        assert_eq!(scan("abc//comment\nx"), vec![word("abc"), word("x")]);
    }

    #[test]
    fn test_single_slash_is_part_of_word() {
        assert_eq!(scan("a/b / c"), vec![word("a/b"), word("/"), word("c")]);
    }

    #[test]
    fn test_line_numbers() {
        let mut scanner = Scanner::new();
        let mut events = Vec::new();
        for c in "a\n// note\nb;\n".chars() {
            scanner.step(c, &mut events);
        }
        let lines: Vec<usize> = events.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 3, 3]);
        assert_eq!(scanner.line(), 4);
    }

    #[test]
    fn test_raw_capture_balances_braces() {
        let mut scanner = Scanner::new();
        let mut events = Vec::new();
        scanner.begin_raw();
        for c in " if (x) { y(); }\n // kept\n} rest".chars() {
            scanner.step(c, &mut events);
        }
        scanner.finish(&mut events);
        assert_eq!(
            events[0].token,
            Token::Raw(" if (x) { y(); }\n // kept\n".to_string())
        );
        assert_eq!(events[0].line, 3);
        assert_eq!(events[1].token, word("rest"));
        assert!(!scanner.in_raw());
    }

    #[test]
    fn test_enclosing_brace_is_not_captured() {
        let mut scanner = Scanner::new();
        let mut events = Vec::new();
        scanner.begin_raw();
        for c in " x{} }}".chars() {
            scanner.step(c, &mut events);
        }
        let tokens: Vec<Token> = events.into_iter().map(|e| e.token).collect();
        assert_eq!(tokens, vec![Token::Raw(" x{} ".to_string()), Token::ScopeClose]);
    }

    #[test]
    fn test_unterminated_raw_capture_reports_depth() {
        let mut scanner = Scanner::new();
        let mut events = Vec::new();
        scanner.begin_raw();
        for c in "{ a".chars() {
            scanner.step(c, &mut events);
        }
        scanner.finish(&mut events);
        assert!(events.is_empty());
        assert_eq!(scanner.raw_depth(), 2);
    }
}
