pub mod keywords;
pub mod token;

use crate::error::{InterpError, Result};
use keywords::{Keyword, KEYWORDS};
use token::{Payload, Token, TokenKind};

/// Turns source text into a token vector.
///
/// Characters are read from an owned `Vec<char>` rather than borrowing the
/// source string, so the lexer can freely push back by moving `pos`
/// backwards — needed for the trailing-dot-on-a-number rule and for the
/// speculative `FuncName` continuation (§4.1 of SPEC_FULL.md).
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }
            tokens.push(self.next_token()?);
        }
        tokens.push(Token::plain(TokenKind::Eof, self.line));
        log::debug!("lexed {} token(s)", tokens.len());
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        let line = self.line;
        match self.peek().unwrap() {
            '"' => self.read_string(),
            c if c.is_ascii_digit() => self.read_number(),
            '+' | '-' | '*' | '/' | '(' | ')' => {
                let c = self.bump().unwrap();
                Ok(Token::operator(c, line))
            }
            ',' => {
                self.bump();
                Ok(Token::operator('&', line))
            }
            '.' => {
                self.bump();
                Ok(Token::plain(TokenKind::Dot, line))
            }
            _ => self.read_word_token(),
        }
    }

    fn read_string(&mut self) -> Result<Token> {
        let line = self.line;
        self.bump(); // opening quote
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some(c) => s.push(c),
                None => return Err(InterpError::lex("unterminated string literal", line)),
            }
        }
        Ok(Token::new(TokenKind::String, Payload::Text(s), line))
    }

    fn read_number(&mut self) -> Result<Token> {
        let line = self.line;
        let mut s = String::new();
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            s.push(self.bump().unwrap());
        }
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            s.push(self.bump().unwrap()); // the dot
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                s.push(self.bump().unwrap());
            }
        }
        let n: f64 = s
            .parse()
            .map_err(|_| InterpError::lex(format!("malformed number literal '{s}'"), line))?;
        Ok(Token::new(TokenKind::Number, Payload::Number(n), line))
    }

    /// Reads a raw word: characters up to the next whitespace, with a
    /// trailing `.` or `,` stripped and pushed back as its own character.
    fn read_raw_word(&mut self) -> String {
        let mut s = String::new();
        while matches!(self.peek(), Some(c) if !c.is_whitespace()) {
            s.push(self.bump().unwrap());
        }
        if matches!(s.chars().last(), Some('.') | Some(',')) {
            s.pop();
            self.pos -= 1;
        }
        s
    }

    /// Non-destructively attempts to read the next raw word, restoring the
    /// cursor if the caller decides not to keep it.
    fn mark(&self) -> (usize, usize) {
        (self.pos, self.line)
    }

    fn reset(&mut self, mark: (usize, usize)) {
        self.pos = mark.0;
        self.line = mark.1;
    }

    fn read_word_token(&mut self) -> Result<Token> {
        let line = self.line;
        let word = self.read_raw_word();
        self.classify_word(word, line)
    }

    fn classify_word(&mut self, word: String, line: usize) -> Result<Token> {
        match KEYWORDS.get(word.as_str()) {
            None => Ok(Token::new(TokenKind::Identifier, Payload::Text(word), line)),
            Some(Keyword::Declaration) => Ok(Token::plain(TokenKind::Declaration, line)),
            Some(Keyword::SetVar) => Ok(Token::plain(TokenKind::SetVar, line)),
            // Article keeps its source text: "a" and "b" are legitimate
            // variable/parameter names in this language and collide with
            // the filler word "a" — callers that expect a bare name accept
            // an Article token too, reading its text (see Parser::expect_name).
            Some(Keyword::Article) => Ok(Token::new(TokenKind::Article, Payload::Text(word), line)),
            Some(Keyword::To) => Ok(Token::plain(TokenKind::To, line)),
            Some(Keyword::KnownAs) => Ok(Token::plain(TokenKind::KnownAs, line)),
            Some(Keyword::End) => Ok(Token::plain(TokenKind::End, line)),
            Some(Keyword::Plus) => Ok(Token::operator('+', line)),
            Some(Keyword::Minus) => Ok(Token::operator('-', line)),
            Some(Keyword::Times) => Ok(Token::operator('*', line)),
            Some(Keyword::If) => Ok(Token::plain(TokenKind::If, line)),
            Some(Keyword::Else) => Ok(Token::plain(TokenKind::Else, line)),
            Some(Keyword::Equals) => Ok(Token::operator('=', line)),
            Some(Keyword::BlockBegin) => Ok(Token::plain(TokenKind::BlockBegin, line)),
            Some(Keyword::FuncResult) => Ok(Token::plain(TokenKind::FuncResult, line)),
            Some(Keyword::On) => Ok(Token::plain(TokenKind::On, line)),
            Some(Keyword::Of) => Ok(Token::plain(TokenKind::Of, line)),
            Some(Keyword::While) => Ok(Token::plain(TokenKind::While, line)),
            Some(Keyword::Argument) => Ok(Token::plain(TokenKind::Argument, line)),
            Some(Keyword::When) => Ok(Token::plain(TokenKind::When, line)),
            Some(Keyword::Calling) => Ok(Token::plain(TokenKind::Calling, line)),
            Some(Keyword::And) => Ok(Token::operator('&', line)),
            Some(Keyword::Or) => Ok(Token::operator('|', line)),

            Some(Keyword::ValueOf) => {
                self.skip_whitespace();
                let next = self.read_raw_word();
                if next != "of" {
                    return Err(InterpError::lex(
                        format!("expected 'of' after 'value', found '{next}'"),
                        line,
                    ));
                }
                Ok(Token::plain(TokenKind::ValueOf, line))
            }
            Some(Keyword::NotEquals) => {
                self.skip_whitespace();
                let next = self.read_raw_word();
                if next != "from" {
                    return Err(InterpError::lex(
                        format!("expected 'from' after 'differs', found '{next}'"),
                        line,
                    ));
                }
                Ok(Token::operator('!', line))
            }
            Some(Keyword::Is) => {
                self.skip_whitespace();
                let cmp_word = self.read_raw_word();
                let op = match cmp_word.as_str() {
                    "larger" | "greater" => '>',
                    "smaller" | "less" | "lower" => '<',
                    other => {
                        return Err(InterpError::lex(
                            format!("expected a comparison word after 'is', found '{other}'"),
                            line,
                        ))
                    }
                };
                self.skip_whitespace();
                let than_word = self.read_raw_word();
                if than_word != "than" {
                    return Err(InterpError::lex(
                        format!("expected 'than' after comparison word, found '{than_word}'"),
                        line,
                    ));
                }
                Ok(Token::operator(op, line))
            }
            Some(Keyword::BlockEnd) => {
                self.skip_whitespace();
                let next = self.read_raw_word();
                if next != "all" && next != "it" {
                    return Err(InterpError::lex(
                        format!("expected 'all' or 'it' after \"That's\", found '{next}'"),
                        line,
                    ));
                }
                Ok(Token::plain(TokenKind::BlockEnd, line))
            }
            Some(Keyword::Comment) => {
                while !matches!(self.peek(), Some('.') | None) {
                    self.bump();
                }
                if self.peek() == Some('.') {
                    self.bump();
                }
                self.skip_whitespace();
                if self.peek().is_none() {
                    return Ok(Token::plain(TokenKind::Eof, self.line));
                }
                self.next_token()
            }
            Some(Keyword::FuncName) => {
                let mark = self.mark();
                let mut found_name = None;

                self.skip_whitespace();
                if self.peek().is_some() {
                    let mut candidate = self.read_raw_word();
                    if KEYWORDS.get(candidate.as_str()) == Some(&Keyword::Article) {
                        self.skip_whitespace();
                        candidate = self.read_raw_word();
                    }
                    if matches!(
                        candidate.as_str(),
                        "function" | "subroutine" | "routine" | "procedure"
                    ) {
                        self.skip_whitespace();
                        if self.peek() == Some('"') {
                            if let Token {
                                payload: Payload::Text(name),
                                ..
                            } = self.read_string()?
                            {
                                found_name = Some(name);
                            }
                        }
                    }
                }

                match found_name {
                    Some(name) => Ok(Token::new(TokenKind::FuncName, Payload::Text(name), line)),
                    None => {
                        self.reset(mark);
                        Ok(Token::plain(TokenKind::FuncName, line))
                    }
                }
            }
        }
    }
}
