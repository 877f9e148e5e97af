//! Arithmetic evaluation tool.
//!
//! A deliberately restricted expression grammar: numeric literals, `+ - * /
//! **`, parentheses, and a single comparison (`> < >= <= == !=`). Anything
//! else (identifiers, calls, strings) is rejected as an invalid expression,
//! so the tool stays a calculator and nothing more.

use async_trait::async_trait;

use super::Tool;

/// Evaluate basic math expressions for the agent.
pub struct Calculator;

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Use this tool for mathematical calculations. Input must be a plain mathematical expression using numbers, + - * / **, parentheses, and comparison operators, e.g. '2 + 2', '(5 + 3) * 2', '25 ** 0.5', '5 > 3'."
    }

    async fn invoke(&self, input: &str) -> String {
        match evaluate(input) {
            Ok(value) => format!("The result is: {}", value),
            Err(EvalError::DivisionByZero) => "Error: Division by zero".to_string(),
            Err(EvalError::Syntax) => {
                format!("Error: Invalid mathematical expression '{}'", input)
            }
            Err(EvalError::Other(message)) => {
                format!("Error calculating '{}': {}", input, message)
            }
        }
    }
}

/// Result of evaluating an expression: a number or a comparison outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Number(f64),
    Bool(bool),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // f64 Display drops the fractional part for integral values,
            // so `2 + 2` prints as `4` rather than `4.0`.
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum EvalError {
    DivisionByZero,
    Syntax,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    LParen,
    RParen,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let number = literal.parse::<f64>().map_err(|_| EvalError::Syntax)?;
                tokens.push(Token::Number(number));
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Power);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '=' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::EqEq);
                } else {
                    return Err(EvalError::Syntax);
                }
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ne);
                } else {
                    return Err(EvalError::Syntax);
                }
            }
            _ => return Err(EvalError::Syntax),
        }
    }

    Ok(tokens)
}

/// Recursive-descent parser and evaluator.
///
/// Grammar, loosest binding first:
///   expression := additive (compare_op additive)?
///   additive   := multiplicative (('+' | '-') multiplicative)*
///   multiplicative := unary (('*' | '/') unary)*
///   unary      := ('+' | '-') unary | power
///   power      := primary ('**' unary)?
///   primary    := NUMBER | '(' expression ')'
///
/// `**` is right-associative and binds tighter than a unary minus on its
/// left, matching the usual convention: `-2 ** 2 == -4`, `2 ** -1 == 0.5`.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<Value, EvalError> {
        let left = self.additive()?;

        let compare: Option<fn(f64, f64) -> bool> = match self.peek() {
            Some(Token::Lt) => Some(|a, b| a < b),
            Some(Token::Gt) => Some(|a, b| a > b),
            Some(Token::Le) => Some(|a, b| a <= b),
            Some(Token::Ge) => Some(|a, b| a >= b),
            Some(Token::EqEq) => Some(|a, b| a == b),
            Some(Token::Ne) => Some(|a, b| a != b),
            _ => None,
        };

        match compare {
            Some(op) => {
                self.advance();
                let right = self.additive()?;
                Ok(Value::Bool(op(left, right)))
            }
            None => Ok(Value::Number(left)),
        }
    }

    fn additive(&mut self) -> Result<f64, EvalError> {
        let mut value = self.multiplicative()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    value += self.multiplicative()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    value -= self.multiplicative()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn multiplicative(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.advance();
                self.unary()
            }
            Some(Token::Minus) => {
                self.advance();
                Ok(-self.unary()?)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Power) {
            self.advance();
            let exponent = self.unary()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expression()?;
                if self.advance() != Some(Token::RParen) {
                    return Err(EvalError::Syntax);
                }
                match value {
                    Value::Number(n) => Ok(n),
                    Value::Bool(_) => Err(EvalError::Other(
                        "comparison result used in arithmetic".to_string(),
                    )),
                }
            }
            _ => Err(EvalError::Syntax),
        }
    }
}

fn evaluate(expr: &str) -> Result<Value, EvalError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(EvalError::Syntax);
    }

    let mut parser = Parser::new(tokens);
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return Err(EvalError::Syntax);
    }

    if let Value::Number(n) = value {
        if !n.is_finite() {
            return Err(EvalError::Other("result is not a finite number".to_string()));
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_arithmetic() {
        assert_eq!(Calculator.invoke("2 + 2").await, "The result is: 4");
        assert_eq!(Calculator.invoke("10 - 3").await, "The result is: 7");
        assert_eq!(Calculator.invoke("5 * 6").await, "The result is: 30");
        assert_eq!(Calculator.invoke("20 / 4").await, "The result is: 5");
    }

    #[tokio::test]
    async fn parentheses_and_power() {
        assert_eq!(Calculator.invoke("(5 + 3) * 2").await, "The result is: 16");
        assert_eq!(Calculator.invoke("25 ** 0.5").await, "The result is: 5");
        assert_eq!(Calculator.invoke("2 ** 10").await, "The result is: 1024");
    }

    #[tokio::test]
    async fn power_associativity_and_unary_minus() {
        // Right-associative: 2 ** 3 ** 2 == 2 ** 9
        assert_eq!(Calculator.invoke("2 ** 3 ** 2").await, "The result is: 512");
        assert_eq!(Calculator.invoke("-2 ** 2").await, "The result is: -4");
        assert_eq!(Calculator.invoke("2 ** -1").await, "The result is: 0.5");
    }

    #[tokio::test]
    async fn fractional_results_keep_their_decimals() {
        assert_eq!(Calculator.invoke("7 / 2").await, "The result is: 3.5");
    }

    #[tokio::test]
    async fn comparisons() {
        assert_eq!(Calculator.invoke("5 > 3").await, "The result is: true");
        assert_eq!(Calculator.invoke("10 == 10").await, "The result is: true");
        assert_eq!(Calculator.invoke("2 >= 3").await, "The result is: false");
        assert_eq!(Calculator.invoke("1 != 2").await, "The result is: true");
    }

    #[tokio::test]
    async fn division_by_zero_is_reported_exactly() {
        assert_eq!(Calculator.invoke("10 / 0").await, "Error: Division by zero");
        assert_eq!(
            Calculator.invoke("1 / (2 - 2)").await,
            "Error: Division by zero"
        );
    }

    #[tokio::test]
    async fn malformed_input_is_invalid() {
        for expr in ["2 + ", "", "   ", "(1 + 2", "1 ++", "2 = 2"] {
            let result = Calculator.invoke(expr).await;
            assert!(
                result.starts_with("Error: Invalid mathematical expression"),
                "{:?} -> {}",
                expr,
                result
            );
        }
    }

    #[tokio::test]
    async fn identifiers_and_calls_are_rejected() {
        for expr in ["__import__('os')", "abs(-1)", "2 + x", "0x10"] {
            let result = Calculator.invoke(expr).await;
            assert!(
                result.starts_with("Error: Invalid mathematical expression"),
                "{:?} -> {}",
                expr,
                result
            );
        }
    }

    #[tokio::test]
    async fn out_of_range_results_are_errors() {
        let result = Calculator.invoke("10 ** 1000").await;
        assert!(result.starts_with("Error calculating '10 ** 1000':"), "{}", result);
    }

    #[test]
    fn evaluate_returns_numbers() {
        assert_eq!(evaluate("1.5 + 1.5"), Ok(Value::Number(3.0)));
        assert_eq!(evaluate("3 < 2"), Ok(Value::Bool(false)));
    }
}
