//! # Parser Module
//!
//! Scope-stack parser driving the [`Scanner`]. Every token is dispatched
//! according to the parser state and the kind of the innermost open scope:
//! a word is either a field keyword, a child scope keyword or, while a
//! field is pending, part of its value.
//!
//! Errors do not stop the parse. Each one is recorded as a [`Diagnostic`]
//! and the parser resynchronizes so that a single run reports as many
//! problems as possible.

use crate::error::{AppResult, Diagnostic};
use crate::scanner::{Event, Scanner, Token};
use crate::schema::{SchemaRegistry, ScopeKind};
use crate::scope::Scope;
use std::io::Read;
use tracing::{debug, error};

/// Result of parsing one description.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// The root (`global`) scope. Defaults are filled in only when the parse
    /// produced no diagnostics.
    pub root: Scope,
    /// Every error found, in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutcome {
    /// True when no diagnostic was reported.
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// What the parser expects next.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// A field keyword, a child scope keyword or `}`.
    AwaitingKeyword,
    /// Words of a field value until `;`.
    AwaitingValue {
        keyword: &'static str,
        words: Vec<String>,
    },
    /// The `{` opening the scope just created.
    AwaitingOpen,
    /// The scanner is capturing literal code for the innermost scope.
    InRaw,
    /// Resynchronizing after an error: skip to the next `;` at `depth` 0 or
    /// past the end of a skipped block.
    Skipping { depth: usize },
}

/// Incremental scope-stack parser.
pub struct Parser<'r> {
    registry: &'r SchemaRegistry,
    file: String,
    scanner: Scanner,
    root: Scope,
    open: Vec<Scope>,
    state: State,
    diagnostics: Vec<Diagnostic>,
    events: Vec<Event>,
}

impl<'r> Parser<'r> {
    /// Creates a parser for a file displayed as `file` in diagnostics.
    pub fn new(registry: &'r SchemaRegistry, file: impl Into<String>) -> Self {
        Self {
            registry,
            file: file.into(),
            scanner: Scanner::new(),
            root: registry.create(ScopeKind::Global, 1),
            open: Vec::new(),
            state: State::AwaitingKeyword,
            diagnostics: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Parses a complete description held in memory.
    pub fn parse_str(registry: &'r SchemaRegistry, file: &str, text: &str) -> ParseOutcome {
        let mut parser = Self::new(registry, file);
        for c in text.chars() {
            parser.feed(c);
        }
        parser.finish()
    }

    /// Reads `input` to the end and parses it.
    pub fn parse_reader<R: Read>(
        registry: &'r SchemaRegistry,
        file: &str,
        mut input: R,
    ) -> AppResult<ParseOutcome> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        Ok(Self::parse_str(registry, file, &text))
    }

    /// Consumes one character of input.
    pub fn feed(&mut self, c: char) {
        self.scanner.step(c, &mut self.events);
        self.drain_events();
    }

    /// Ends the input, runs the end-of-file checks and, on success, fills in
    /// the declared defaults of the whole tree.
    pub fn finish(mut self) -> ParseOutcome {
        self.scanner.finish(&mut self.events);
        self.drain_events();

        let line = self.scanner.line();
        match std::mem::replace(&mut self.state, State::AwaitingKeyword) {
            State::InRaw => {
                let kind = self.top().kind();
                self.report(
                    line,
                    format!(
                        "missing closing \"}}\" for \"{}\", {} brace(s) still open",
                        kind,
                        self.scanner.raw_depth()
                    ),
                );
                if let Some(literal) = self.open.pop() {
                    self.top_mut().push_child(literal);
                }
            }
            State::AwaitingOpen => {
                let kind = self.top().kind();
                self.report(line, format!("\"{{\" expected after \"{}\"", kind));
            }
            State::AwaitingValue { keyword, .. } => {
                self.report(line, format!("missing \";\" after value of \"{}\"", keyword));
            }
            State::AwaitingKeyword | State::Skipping { .. } => {}
        }

        while let Some(scope) = self.open.pop() {
            let message = format!(
                "missing closing \"}}\" for scope \"{}\" opened on line {}",
                scope.kind(),
                scope.line()
            );
            self.report(line, message);
            self.top_mut().push_child(scope);
        }

        if self.diagnostics.is_empty() {
            self.root.fill_defaults();
        }
        debug!(
            file = %self.file,
            scopes = self.root.count(),
            errors = self.diagnostics.len(),
            "parse finished"
        );
        ParseOutcome {
            root: self.root,
            diagnostics: self.diagnostics,
        }
    }

    fn drain_events(&mut self) {
        if self.events.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.events);
        for event in events {
            self.handle(event);
        }
    }

    fn top(&self) -> &Scope {
        self.open.last().unwrap_or(&self.root)
    }

    fn top_mut(&mut self) -> &mut Scope {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn report(&mut self, line: usize, message: String) {
        let diagnostic = Diagnostic::new(self.file.clone(), line, message);
        error!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn handle(&mut self, event: Event) {
        let Event { line, token } = event;
        match std::mem::replace(&mut self.state, State::AwaitingKeyword) {
            State::AwaitingKeyword => self.on_keyword(line, token),
            State::AwaitingValue { keyword, mut words } => match token {
                Token::Word(word) => {
                    words.push(word);
                    self.state = State::AwaitingValue { keyword, words };
                }
                Token::StatementEnd => {
                    let value = words.join(" ");
                    if let Err(message) = self.top_mut().set_value(keyword, &value, false) {
                        let kind = self.top().kind();
                        self.report(line, format!("{} in scope \"{}\"", message, kind));
                    }
                }
                other => {
                    self.report(line, format!("missing \";\" after value of \"{}\"", keyword));
                    self.on_keyword(line, other);
                }
            },
            State::AwaitingOpen => {
                if token == Token::ScopeOpen {
                    if self.top().kind().is_literal() {
                        self.scanner.begin_raw();
                        self.state = State::InRaw;
                    }
                } else {
                    let kind = self.top().kind();
                    self.report(
                        line,
                        format!("\"{{\" expected after \"{}\", not {}", kind, describe(&token)),
                    );
                    self.open.pop();
                    self.on_keyword(line, token);
                }
            }
            State::InRaw => {
                if let Token::Raw(code) = token {
                    if let Err(message) = self.top_mut().set_value("", &code, false) {
                        self.report(line, message);
                    }
                    self.close_scope(line);
                }
            }
            State::Skipping { depth } => match token {
                Token::StatementEnd if depth == 0 => {}
                Token::ScopeOpen => self.state = State::Skipping { depth: depth + 1 },
                Token::ScopeClose if depth == 0 => self.close_scope(line),
                Token::ScopeClose if depth == 1 => {}
                Token::ScopeClose => self.state = State::Skipping { depth: depth - 1 },
                _ => self.state = State::Skipping { depth },
            },
        }
    }

    fn on_keyword(&mut self, line: usize, token: Token) {
        let kind = self.top().kind();
        match token {
            Token::Word(word) => {
                if let Some(spec) = self
                    .registry
                    .fields(kind)
                    .iter()
                    .find(|spec| !spec.is_literal() && spec.keyword == word)
                {
                    self.state = State::AwaitingValue {
                        keyword: spec.keyword,
                        words: Vec::new(),
                    };
                } else if let Some(child) = self.registry.create_child(kind, &word, line) {
                    debug!(line, scope = %child.kind(), "scope opened");
                    self.open.push(child);
                    self.state = State::AwaitingOpen;
                } else {
                    let syntax = self.registry.describe(kind, false);
                    self.report(
                        line,
                        format!(
                            "unexpected keyword \"{}\" in scope \"{}\", expected:\n{}",
                            word,
                            kind,
                            syntax.trim_end()
                        ),
                    );
                    self.state = State::Skipping { depth: 0 };
                }
            }
            Token::StatementEnd => {}
            Token::ScopeOpen => {
                self.report(line, format!("unexpected \"{{\" in scope \"{}\"", kind));
                self.state = State::Skipping { depth: 1 };
            }
            Token::ScopeClose => self.close_scope(line),
            Token::Raw(_) => {}
        }
    }

    fn close_scope(&mut self, line: usize) {
        let Some(scope) = self.open.pop() else {
            self.report(line, "found one too many closing \"}\"".to_string());
            return;
        };
        if let Err(errors) = scope.is_valid() {
            for message in errors {
                self.report(line, format!("{} in scope \"{}\"", message, scope.kind()));
            }
        }
        debug!(line, scope = %scope.kind(), "scope closed");
        self.top_mut().push_child(scope);
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Word(word) => format!("\"{}\"", word),
        Token::StatementEnd => "\";\"".to_string(),
        Token::ScopeOpen => "\"{\"".to_string(),
        Token::ScopeClose => "\"}\"".to_string(),
        Token::Raw(_) => "literal code".to_string(),
    }
}
