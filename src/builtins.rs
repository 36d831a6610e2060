//! The process-wide table of built-in functions, consulted before a
//! `FunctionCall` ever touches the scope stack's user-function tables.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use once_cell::sync::Lazy;

use crate::error::{InterpError, Result};
use crate::value::Value;

pub type BuiltinFn = fn(&[Value]) -> Result<Value>;

static BUILTINS: Lazy<HashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, BuiltinFn> = HashMap::new();
    m.insert("getInput", read_line);
    m.insert("ask", read_line);
    m.insert("Display", print_values);
    m.insert("Show", print_values);
    m.insert("Output", print_values);
    m.insert("Echo", print_values);
    m.insert("Write", print_values);
    m.insert("Print", print_values);
    m.insert("toNumber", to_number);
    m.insert("toString", to_string_value);
    m
});

pub fn lookup(name: &str) -> Option<BuiltinFn> {
    BUILTINS.get(name).copied()
}

fn read_line(args: &[Value]) -> Result<Value> {
    if !args.is_empty() {
        return Err(InterpError::arity(format!(
            "getInput/ask takes no arguments, got {}",
            args.len()
        )));
    }
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| InterpError::name(format!("failed to read input: {e}")))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::String(line))
}

fn print_values(args: &[Value]) -> Result<Value> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for arg in args {
        let text = match arg {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => {
                return Err(InterpError::ty(format!(
                    "cannot print a value of type '{}'",
                    other.type_name()
                )))
            }
        };
        out.write_all(text.as_bytes())
            .map_err(|e| InterpError::name(format!("failed to write output: {e}")))?;
    }
    out.flush().ok();
    Ok(Value::Unknown)
}

fn to_number(args: &[Value]) -> Result<Value> {
    let [arg] = args else {
        return Err(InterpError::arity(format!(
            "toNumber expects exactly one argument, got {}",
            args.len()
        )));
    };
    let Value::String(s) = arg else {
        return Err(InterpError::ty(format!(
            "toNumber expects a string argument, got {}",
            arg.type_name()
        )));
    };
    s.trim()
        .parse::<f64>()
        .map(Value::Number)
        .map_err(|_| InterpError::ty(format!("could not parse '{s}' as a number")))
}

fn to_string_value(args: &[Value]) -> Result<Value> {
    let [arg] = args else {
        return Err(InterpError::arity(format!(
            "toString expects exactly one argument, got {}",
            args.len()
        )));
    };
    let Value::Number(n) = arg else {
        return Err(InterpError::ty(format!(
            "toString expects a number argument, got {}",
            arg.type_name()
        )));
    };
    Ok(Value::String(n.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_number_parses_valid_strings() {
        let result = to_number(&[Value::String("3.5".into())]).unwrap();
        assert_eq!(result, Value::Number(3.5));
    }

    #[test]
    fn to_number_errors_on_malformed_input() {
        assert!(to_number(&[Value::String("not a number".into())]).is_err());
    }

    #[test]
    fn to_string_formats_whole_numbers_without_decimal() {
        let result = to_string_value(&[Value::Number(5.0)]).unwrap();
        assert_eq!(result, Value::String("5".into()));
    }

    #[test]
    fn print_rejects_boolean_and_unknown() {
        assert!(print_values(&[Value::Boolean(true)]).is_err());
        assert!(print_values(&[Value::Unknown]).is_err());
    }

    #[test]
    fn lookup_finds_all_aliases() {
        for name in ["getInput", "ask", "Display", "Show", "Output", "Echo", "Write", "Print", "toNumber", "toString"] {
            assert!(lookup(name).is_some(), "missing builtin {name}");
        }
        assert!(lookup("notReal").is_none());
    }
}
