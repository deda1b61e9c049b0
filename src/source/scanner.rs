//! Header scanner for Go source files
//!
//! Reads just enough of a file to answer three questions: which package it
//! belongs to, what it imports, and whether it declares a top-level
//! `func main`. Comments, string, raw string and rune literals are skipped
//! properly so braces or keywords inside them never confuse the scan.

use thiserror::Error;

/// What a Go file declares in its header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFile {
    pub package: String,
    pub imports: Vec<String>,
    /// A top-level `func main(` without a receiver
    pub has_main: bool,
}

/// Malformed source, with the 1-based line where scanning stopped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct SyntaxError {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Str(String),
    Punct(u8),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decl {
    Other,
    Func,
    FuncMain,
}

/// Scan a Go source file
pub fn parse(src: &str) -> Result<GoFile, SyntaxError> {
    // Go allows a byte order mark at the very start of a file
    let src = src.strip_prefix('\u{FEFF}').unwrap_or(src);
    let mut lexer = Lexer::new(src);

    match lexer.next_token()? {
        Token::Ident("package") => {}
        _ => return Err(lexer.error("expected 'package' clause")),
    }
    let package = match lexer.next_token()? {
        Token::Ident(name) => name.to_string(),
        _ => return Err(lexer.error("expected package name")),
    };

    let mut imports = Vec::new();
    let mut pending = loop {
        match lexer.next_token()? {
            Token::Punct(b';') => continue,
            Token::Ident("import") => parse_import_decl(&mut lexer, &mut imports)?,
            other => break other,
        }
    };

    // Top-level declarations: only brace depth and `func main(` matter
    let mut depth = 0usize;
    let mut decl = Decl::Other;
    let mut has_main = false;
    loop {
        let tok = std::mem::replace(&mut pending, Token::Eof);
        decl = match (&tok, decl) {
            (Token::Eof, _) => break,
            (Token::Ident("func"), _) if depth == 0 => Decl::Func,
            (Token::Ident("main"), Decl::Func) => Decl::FuncMain,
            (Token::Punct(b'('), Decl::FuncMain) => {
                has_main = true;
                Decl::Other
            }
            _ => Decl::Other,
        };
        match tok {
            Token::Punct(b'(' | b'{' | b'[') => depth += 1,
            Token::Punct(b')' | b'}' | b']') => depth = depth.saturating_sub(1),
            _ => {}
        }
        pending = lexer.next_token()?;
    }

    Ok(GoFile {
        package,
        imports,
        has_main,
    })
}

/// Parse the rest of an `import` declaration, single or grouped
fn parse_import_decl(lexer: &mut Lexer<'_>, imports: &mut Vec<String>) -> Result<(), SyntaxError> {
    match lexer.next_token()? {
        Token::Punct(b'(') => loop {
            match lexer.next_token()? {
                Token::Punct(b')') => return Ok(()),
                Token::Punct(b';') => continue,
                Token::Str(path) => imports.push(path),
                Token::Ident(_) | Token::Punct(b'.') => imports.push(expect_path(lexer)?),
                Token::Eof => return Err(lexer.error("unterminated import group")),
                _ => return Err(lexer.error("unexpected token in import group")),
            }
        },
        Token::Str(path) => {
            imports.push(path);
            Ok(())
        }
        Token::Ident(_) | Token::Punct(b'.') => {
            imports.push(expect_path(lexer)?);
            Ok(())
        }
        _ => Err(lexer.error("expected import path")),
    }
}

fn expect_path(lexer: &mut Lexer<'_>) -> Result<String, SyntaxError> {
    match lexer.next_token()? {
        Token::Str(path) => Ok(path),
        _ => Err(lexer.error("expected import path after alias")),
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn error(&self, reason: &str) -> SyntaxError {
        SyntaxError {
            line: self.line,
            reason: reason.to_string(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn next_token(&mut self) -> Result<Token<'a>, SyntaxError> {
        self.skip_trivia()?;

        let Some(b) = self.peek() else {
            return Ok(Token::Eof);
        };

        match b {
            b'"' => self.interpreted_string().map(Token::Str),
            b'`' => self.raw_string().map(Token::Str),
            b'\'' => {
                self.rune()?;
                Ok(Token::Punct(b'\''))
            }
            b if is_ident_start(b) => {
                let src = self.src;
                let start = self.pos;
                while self.peek().is_some_and(is_ident_continue) {
                    self.pos += 1;
                }
                Ok(Token::Ident(&src[start..self.pos]))
            }
            b if b.is_ascii_digit() => {
                // Numbers never matter here; swallow them whole so `0x1f` is not read as an ident
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_' || c == b'.')
                {
                    self.pos += 1;
                }
                Ok(Token::Punct(b'0'))
            }
            _ => {
                self.bump();
                Ok(Token::Punct(b))
            }
        }
    }

    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(b), _) if b.is_ascii_whitespace() => {
                    self.bump();
                }
                (Some(b'/'), Some(b'/')) => {
                    while self.peek().is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                (Some(b'/'), Some(b'*')) => {
                    let line = self.line;
                    self.pos += 2;
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some(b'*'), Some(b'/')) => {
                                self.pos += 2;
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => {
                                return Err(SyntaxError {
                                    line,
                                    reason: "comment not terminated".to_string(),
                                })
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn interpreted_string(&mut self) -> Result<String, SyntaxError> {
        self.bump();
        let mut value = String::new();
        let mut start = self.pos;
        loop {
            match self.peek() {
                Some(b'"') => {
                    value.push_str(&self.src[start..self.pos]);
                    self.bump();
                    return Ok(value);
                }
                Some(b'\\') => {
                    value.push_str(&self.src[start..self.pos]);
                    self.bump();
                    match self.peek() {
                        Some(c @ (b'"' | b'\\')) => {
                            value.push(c as char);
                            self.bump();
                        }
                        Some(b'\n') | None => break,
                        Some(_) => value.push('\\'),
                    }
                    start = self.pos;
                }
                Some(b'\n') | None => break,
                Some(_) => self.pos += 1,
            }
        }
        Err(self.error("string literal not terminated"))
    }

    fn raw_string(&mut self) -> Result<String, SyntaxError> {
        let line = self.line;
        self.bump();
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'`' {
                let value = self.src[start..self.pos].to_string();
                self.bump();
                return Ok(value);
            }
            self.bump();
        }
        Err(SyntaxError {
            line,
            reason: "raw string literal not terminated".to_string(),
        })
    }

    fn rune(&mut self) -> Result<(), SyntaxError> {
        self.bump();
        loop {
            match self.peek() {
                Some(b'\'') => {
                    self.bump();
                    return Ok(());
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_some_and(|b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                Some(b'\n') | None => return Err(self.error("rune literal not terminated")),
                Some(_) => self.pos += 1,
            }
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}
