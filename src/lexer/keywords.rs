use std::collections::HashMap;

use once_cell::sync::Lazy;

/// The semantic class a keyword word maps to, before any continuation words
/// (like the mandatory `of` after `value`) are consulted. Words that don't
/// appear here become plain `Identifier` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Declaration,
    SetVar,
    Article,
    ValueOf,
    To,
    KnownAs,
    End,
    Plus,
    Minus,
    Times,
    If,
    Else,
    Equals,
    NotEquals,
    Is,
    BlockBegin,
    BlockEnd,
    FuncName,
    FuncResult,
    On,
    Of,
    While,
    Comment,
    Argument,
    When,
    Calling,
    And,
    Or,
}

pub static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    use Keyword::*;
    let mut m = HashMap::new();

    for w in ["Declare", "Create", "Make", "Construct", "Spawn", "Manufacture", "Name", "Label"] {
        m.insert(w, Declaration);
    }
    for w in ["Change", "Set", "Vary", "Alter", "Modify", "Adjust"] {
        m.insert(w, SetVar);
    }
    for w in ["a", "an", "another", "the"] {
        m.insert(w, Article);
    }
    m.insert("value", ValueOf);
    for w in ["to", "by", "into"] {
        m.insert(w, To);
    }
    for w in ["named", "called", "labeled", "titled"] {
        m.insert(w, KnownAs);
    }
    for w in ["Stop", "End", "Quit", "Exit"] {
        m.insert(w, End);
    }
    m.insert("plus", Plus);
    m.insert("minus", Minus);
    m.insert("times", Times);
    m.insert("If", If);
    for w in ["Otherwise", "Else"] {
        m.insert(w, Else);
    }
    m.insert("equals", Equals);
    m.insert("differs", NotEquals);
    m.insert("is", Is);
    for w in ["then:", "do:"] {
        m.insert(w, BlockBegin);
    }
    m.insert("That's", BlockEnd);
    for w in ["Call", "Execute", "Evaluate"] {
        m.insert(w, FuncName);
    }
    for w in ["result", "outcome"] {
        m.insert(w, FuncResult);
    }
    for w in ["on", "with"] {
        m.insert(w, On);
    }
    for w in ["of", "from"] {
        m.insert(w, Of);
    }
    m.insert("While", While);
    for w in ["Note", "Notice", "Note:", "Notice:"] {
        m.insert(w, Comment);
    }
    for w in ["argument", "arguments", "parameter", "parameters"] {
        m.insert(w, Argument);
    }
    for w in ["When", "Whenever", "Upon"] {
        m.insert(w, When);
    }
    for w in ["calling", "executing", "evaluating", "running"] {
        m.insert(w, Calling);
    }
    m.insert("and", And);
    m.insert("or", Or);

    m
});
