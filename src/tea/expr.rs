//! A small recurrence-expression engine: tokenizer, recursive-descent
//! parser and a postfix evaluator over complex values. Expressions are
//! restricted to arithmetic, the iterated variable, the per-sample
//! parameter, the imaginary unit and a fixed function allow-list, so a
//! fractal definition can never smuggle in anything beyond plain math.
//!
//! Grammar, loosest to tightest binding:
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := power (('*' | '/') power)*
//! power   := unary ('^' power)?          (right-associative)
//! unary   := '-' unary | primary
//! primary := number | name | name '(' sum ')' | '(' sum ')'
//! ```
//!
//! Unary minus binds tighter than `^`, so `-z^2` reads as `(-z)^2`.

use crate::errors::ExpressionError;
use num::complex::Complex64;

/// The function allow-list. Everything here maps one complex value to one
/// complex value; `abs` returns the magnitude as a real-valued complex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Abs,
    Conj,
}

impl Func {
    fn from_name(name: &str) -> Option<Func> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "exp" => Some(Func::Exp),
            "ln" => Some(Func::Ln),
            "sqrt" => Some(Func::Sqrt),
            "abs" => Some(Func::Abs),
            "conj" => Some(Func::Conj),
            _ => None,
        }
    }

    fn apply(self, a: Complex64) -> Complex64 {
        match self {
            Func::Sin => a.sin(),
            Func::Cos => a.cos(),
            Func::Tan => a.tan(),
            Func::Exp => a.exp(),
            Func::Ln => a.ln(),
            Func::Sqrt => a.sqrt(),
            Func::Abs => Complex64::new(a.norm(), 0.0),
            Func::Conj => a.conj(),
        }
    }
}

/// One step of a compiled postfix program. Binary operators pop the right
/// operand first, then the left.
#[derive(Clone, Copy, Debug)]
enum Op {
    Const(Complex64),
    Var,
    Param,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Call(Func),
}

#[derive(Clone, Debug)]
enum TokenKind {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(value) => value.to_string(),
        TokenKind::Identifier(name) => name.clone(),
        TokenKind::Plus => "+".to_string(),
        TokenKind::Minus => "-".to_string(),
        TokenKind::Star => "*".to_string(),
        TokenKind::Slash => "/".to_string(),
        TokenKind::Caret => "^".to_string(),
        TokenKind::LParen => "(".to_string(),
        TokenKind::RParen => ")".to_string(),
    }
}

/// Splits expression text into tokens, each tagged with its character
/// offset for error reporting. Numbers are plain decimal literals.
fn tokenize(text: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().enumerate().peekable();
    while let Some(&(position, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() || c == '.' {
            let mut literal = String::new();
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    literal.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let value = literal
                .parse::<f64>()
                .map_err(|_| ExpressionError::BadNumber { literal, position })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                position,
            });
        } else if c.is_alphabetic() || c == '_' {
            let mut name = String::new();
            while let Some(&(_, d)) = chars.peek() {
                if d.is_alphanumeric() || d == '_' {
                    name.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Identifier(name),
                position,
            });
        } else {
            let kind = match c {
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '^' => TokenKind::Caret,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                other => {
                    return Err(ExpressionError::UnexpectedToken {
                        found: other.to_string(),
                        position,
                    })
                }
            };
            tokens.push(Token { kind, position });
            chars.next();
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser that emits the postfix program directly while
/// descending, resolving names as it goes. No separate AST stage.
struct Parser<'a> {
    tokens: Vec<Token>,
    cursor: usize,
    variable: &'a str,
    parameter: &'a str,
    program: Vec<Op>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.cursor).map(|token| &token.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Consumes an opening paren if one is next, returning its offset.
    fn take_lparen(&mut self) -> Option<usize> {
        match self.tokens.get(self.cursor) {
            Some(Token {
                kind: TokenKind::LParen,
                position,
            }) => {
                let position = *position;
                self.cursor += 1;
                Some(position)
            }
            _ => None,
        }
    }

    fn close_paren(&mut self, open_position: usize) -> Result<(), ExpressionError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => Ok(()),
            Some(token) => Err(ExpressionError::UnexpectedToken {
                found: describe(&token.kind),
                position: token.position,
            }),
            None => Err(ExpressionError::UnbalancedParen {
                position: open_position,
            }),
        }
    }

    fn sum(&mut self) -> Result<(), ExpressionError> {
        self.product()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => Op::Add,
                Some(TokenKind::Minus) => Op::Sub,
                _ => break,
            };
            self.cursor += 1;
            self.product()?;
            self.program.push(op);
        }
        Ok(())
    }

    fn product(&mut self) -> Result<(), ExpressionError> {
        self.power()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => Op::Mul,
                Some(TokenKind::Slash) => Op::Div,
                _ => break,
            };
            self.cursor += 1;
            self.power()?;
            self.program.push(op);
        }
        Ok(())
    }

    fn power(&mut self) -> Result<(), ExpressionError> {
        self.unary()?;
        if matches!(self.peek(), Some(TokenKind::Caret)) {
            self.cursor += 1;
            self.power()?;
            self.program.push(Op::Pow);
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<(), ExpressionError> {
        if matches!(self.peek(), Some(TokenKind::Minus)) {
            self.cursor += 1;
            self.unary()?;
            self.program.push(Op::Neg);
            return Ok(());
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<(), ExpressionError> {
        let token = self.advance().ok_or(ExpressionError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(value) => {
                self.program.push(Op::Const(Complex64::new(value, 0.0)));
                Ok(())
            }
            TokenKind::Identifier(name) => {
                if let Some(open_position) = self.take_lparen() {
                    let func =
                        Func::from_name(&name).ok_or(ExpressionError::UnknownFunction {
                            name: name.clone(),
                            position: token.position,
                        })?;
                    self.sum()?;
                    self.close_paren(open_position)?;
                    self.program.push(Op::Call(func));
                    Ok(())
                } else {
                    self.symbol(name, token.position)
                }
            }
            TokenKind::LParen => {
                self.sum()?;
                self.close_paren(token.position)
            }
            other => Err(ExpressionError::UnexpectedToken {
                found: describe(&other),
                position: token.position,
            }),
        }
    }

    /// Bare-name resolution. The iterated variable and the parameter take
    /// precedence over the imaginary unit, so a definition that names its
    /// parameter `i` still works.
    fn symbol(&mut self, name: String, position: usize) -> Result<(), ExpressionError> {
        let op = if name == self.variable {
            Op::Var
        } else if name == self.parameter {
            Op::Param
        } else if name == "i" || name == "j" {
            Op::Const(Complex64::i())
        } else {
            return Err(ExpressionError::UnknownIdentifier { name, position });
        };
        self.program.push(op);
        Ok(())
    }
}

// The parser only emits balanced programs; a pop never sees an empty stack.
fn pop_one(scratch: &mut Vec<Complex64>) -> Complex64 {
    scratch.pop().unwrap_or_default()
}

fn pop_pair(scratch: &mut Vec<Complex64>) -> (Complex64, Complex64) {
    let b = pop_one(scratch);
    let a = pop_one(scratch);
    (a, b)
}

/// # Expression
///
/// A recurrence expression compiled to a postfix program over complex
/// values. Parsing resolves every name up front, so a misspelled variable
/// or unknown function fails at construction instead of mid-grid, and
/// evaluation itself can never fail.
///
/// Evaluation borrows a caller-owned scratch stack rather than keeping one
/// inside, which leaves the compiled program freely shareable across
/// threads.
///
/// # Example
///
/// ```rust
/// use fractogen::tea::expr::Expression;
/// use num::complex::Complex64;
///
/// let step = Expression::parse("z*z + c", "z", "c").unwrap();
/// let mut scratch = Vec::new();
/// let out = step.eval(
///     Complex64::new(2.0, 0.0),
///     Complex64::new(1.0, 0.0),
///     &mut scratch,
/// );
/// assert_eq!(out, Complex64::new(5.0, 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct Expression {
    text: String,
    program: Vec<Op>,
}

impl Expression {
    /// # parse
    ///
    /// Parses `text` into a compiled program. `variable` names the iterated
    /// value and `parameter` the per-sample constant; any other bare name
    /// must be `i` or `j` (the imaginary unit) or parsing fails. Available
    /// functions: `sin`, `cos`, `tan`, `exp`, `ln`, `sqrt`, `abs`, `conj`.
    pub fn parse(
        text: &str,
        variable: &str,
        parameter: &str,
    ) -> Result<Expression, ExpressionError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ExpressionError::EmptyExpression);
        }
        let mut parser = Parser {
            tokens,
            cursor: 0,
            variable,
            parameter,
            program: Vec::new(),
        };
        parser.sum()?;
        if let Some(token) = parser.advance() {
            return Err(ExpressionError::UnexpectedToken {
                found: describe(&token.kind),
                position: token.position,
            });
        }
        Ok(Expression {
            text: text.to_string(),
            program: parser.program,
        })
    }

    /// The source text this expression was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// # eval
    ///
    /// Runs the program with `z` bound to the iterated variable and `c` to
    /// the parameter. `scratch` is cleared and reused as the value stack;
    /// keep one per worker and evaluation allocates only on first growth.
    pub fn eval(&self, z: Complex64, c: Complex64, scratch: &mut Vec<Complex64>) -> Complex64 {
        scratch.clear();
        for op in &self.program {
            match *op {
                Op::Const(value) => scratch.push(value),
                Op::Var => scratch.push(z),
                Op::Param => scratch.push(c),
                Op::Add => {
                    let (a, b) = pop_pair(scratch);
                    scratch.push(a + b);
                }
                Op::Sub => {
                    let (a, b) = pop_pair(scratch);
                    scratch.push(a - b);
                }
                Op::Mul => {
                    let (a, b) = pop_pair(scratch);
                    scratch.push(a * b);
                }
                Op::Div => {
                    let (a, b) = pop_pair(scratch);
                    scratch.push(a / b);
                }
                Op::Pow => {
                    let (a, b) = pop_pair(scratch);
                    scratch.push(a.powc(b));
                }
                Op::Neg => {
                    let a = pop_one(scratch);
                    scratch.push(-a);
                }
                Op::Call(func) => {
                    let a = pop_one(scratch);
                    scratch.push(func.apply(a));
                }
            }
        }
        pop_one(scratch)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn eval(text: &str, z: Complex64, c: Complex64) -> Complex64 {
        let expr = Expression::parse(text, "z", "c").unwrap();
        let mut scratch = Vec::new();
        expr.eval(z, c, &mut scratch)
    }

    fn real(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn test_mandelbrot_step() {
        assert!(close(eval("z*z + c", real(2.0), real(1.0)), real(5.0)));
        let z = Complex64::new(1.0, 1.0);
        assert!(close(
            eval("z*z + c", z, real(0.5)),
            Complex64::new(0.5, 2.0)
        ));
    }

    #[test]
    fn test_precedence_and_left_associativity() {
        assert!(close(eval("1 + 2*3", real(0.0), real(0.0)), real(7.0)));
        assert!(close(eval("(1 + 2)*3", real(0.0), real(0.0)), real(9.0)));
        assert!(close(eval("10 - 4 - 3", real(0.0), real(0.0)), real(3.0)));
        assert!(close(eval("8/4/2", real(0.0), real(0.0)), real(1.0)));
    }

    #[test]
    fn test_power_is_right_associative() {
        assert!(close(eval("2^3", real(0.0), real(0.0)), real(8.0)));
        assert!(close(eval("2^3^2", real(0.0), real(0.0)), real(512.0)));
    }

    #[test]
    fn test_unary_minus() {
        assert!(close(eval("-z", real(3.0), real(0.0)), real(-3.0)));
        assert!(close(eval("3 - -2", real(0.0), real(0.0)), real(5.0)));
        // Unary minus binds tighter than the caret.
        assert!(close(eval("-z^2", real(2.0), real(0.0)), real(4.0)));
    }

    #[test]
    fn test_imaginary_unit() {
        assert!(close(eval("i*i", real(0.0), real(0.0)), real(-1.0)));
        assert!(close(eval("j*j", real(0.0), real(0.0)), real(-1.0)));
        assert!(close(
            eval("2 + 3*i", real(0.0), real(0.0)),
            Complex64::new(2.0, 3.0)
        ));
    }

    #[test]
    fn test_functions_match_the_library() {
        let z = Complex64::new(0.5, 0.3);
        assert!(close(eval("sin(z)", z, real(0.0)), z.sin()));
        assert!(close(eval("cos(z)", z, real(0.0)), z.cos()));
        assert!(close(eval("tan(z)", z, real(0.0)), z.tan()));
        assert!(close(eval("exp(z)", z, real(0.0)), z.exp()));
        assert!(close(eval("ln(z)", z, real(0.0)), z.ln()));
        assert!(close(eval("sqrt(z)", z, real(0.0)), z.sqrt()));
        let w = Complex64::new(3.0, 4.0);
        assert!(close(eval("abs(z)", w, real(0.0)), real(5.0)));
        assert!(close(eval("conj(z)", w, real(0.0)), Complex64::new(3.0, -4.0)));
    }

    #[test]
    fn test_custom_variable_and_parameter_names() {
        let expr = Expression::parse("zn*zn + seed", "zn", "seed").unwrap();
        let mut scratch = Vec::new();
        let out = expr.eval(real(3.0), real(1.0), &mut scratch);
        assert!(close(out, real(10.0)));
    }

    #[test]
    fn test_parameter_name_shadows_imaginary_unit() {
        let expr = Expression::parse("i + 1", "z", "i").unwrap();
        let mut scratch = Vec::new();
        let out = expr.eval(real(0.0), real(5.0), &mut scratch);
        assert!(close(out, real(6.0)));
    }

    #[test]
    fn test_unknown_identifier() {
        assert_eq!(
            Expression::parse("z + q", "z", "c").unwrap_err(),
            ExpressionError::UnknownIdentifier {
                name: "q".to_string(),
                position: 4
            }
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            Expression::parse("smooth(z)", "z", "c").unwrap_err(),
            ExpressionError::UnknownFunction {
                name: "smooth".to_string(),
                position: 0
            }
        );
    }

    #[test]
    fn test_unbalanced_parens() {
        assert_eq!(
            Expression::parse("(z + c", "z", "c").unwrap_err(),
            ExpressionError::UnbalancedParen { position: 0 }
        );
        assert_eq!(
            Expression::parse("sin(z", "z", "c").unwrap_err(),
            ExpressionError::UnbalancedParen { position: 3 }
        );
    }

    #[test]
    fn test_trailing_token() {
        assert_eq!(
            Expression::parse("z ) 3", "z", "c").unwrap_err(),
            ExpressionError::UnexpectedToken {
                found: ")".to_string(),
                position: 2
            }
        );
    }

    #[test]
    fn test_empty_expression() {
        assert_eq!(
            Expression::parse("", "z", "c").unwrap_err(),
            ExpressionError::EmptyExpression
        );
        assert_eq!(
            Expression::parse("   ", "z", "c").unwrap_err(),
            ExpressionError::EmptyExpression
        );
    }

    #[test]
    fn test_bad_number_literal() {
        assert_eq!(
            Expression::parse("1.2.3 + z", "z", "c").unwrap_err(),
            ExpressionError::BadNumber {
                literal: "1.2.3".to_string(),
                position: 0
            }
        );
    }

    #[test]
    fn test_unexpected_end() {
        assert_eq!(
            Expression::parse("z +", "z", "c").unwrap_err(),
            ExpressionError::UnexpectedEnd
        );
    }

    #[test]
    fn test_stray_symbol() {
        assert_eq!(
            Expression::parse("z $ c", "z", "c").unwrap_err(),
            ExpressionError::UnexpectedToken {
                found: "$".to_string(),
                position: 2
            }
        );
    }

    #[test]
    fn test_scratch_reuse() {
        let expr = Expression::parse("z*z + c", "z", "c").unwrap();
        let mut scratch = Vec::new();
        let first = expr.eval(real(2.0), real(1.0), &mut scratch);
        let second = expr.eval(real(2.0), real(1.0), &mut scratch);
        assert_eq!(first, second);
    }
}
