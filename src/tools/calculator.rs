//! Calculator 工具：算术表达式求值
//!
//! 专用小语法（词法 + 递归下降），只暴露白名单内的函数与常量，没有任何动态求值：
//! 未知名称一律拒绝，这是一条安全边界。兼容 `math.sqrt(16)` 这类带命名空间前缀的写法。

use async_trait::async_trait;

use crate::tools::Tool;

/// 词法单元
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let n: f64 = s.parse().map_err(|_| format!("invalid number '{}'", s))?;
                tokens.push(Token::Num(n));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut s = String::new();
                while let Some(&d) = chars.peek() {
                    // '.' 允许出现在名称里，支持 math.sqrt 这类前缀写法
                    if d.is_alphanumeric() || d == '_' || d == '.' {
                        s.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(s));
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
                // Python 风格的 ** 乘方
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Caret);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '^' => {
                chars.next();
                tokens.push(Token::Caret);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }
    Ok(tokens)
}

/// 递归下降求值器：优先级 加减 < 乘除模 < 一元负号 < 乘方 < 原子
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        match self.next() {
            Some(ref t) if t == expected => Ok(()),
            Some(t) => Err(format!("expected {:?}, found {:?}", expected, t)),
            None => Err(format!("expected {:?}, found end of expression", expected)),
        }
    }

    fn parse_expr(&mut self) -> Result<f64, String> {
        let mut acc = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.next();
                    acc += self.parse_term()?;
                }
                Some(Token::Minus) => {
                    self.next();
                    acc -= self.parse_term()?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn parse_term(&mut self) -> Result<f64, String> {
        let mut acc = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next();
                    acc *= self.parse_unary()?;
                }
                Some(Token::Slash) => {
                    self.next();
                    let rhs = self.parse_unary()?;
                    if rhs == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    acc /= rhs;
                }
                Some(Token::Percent) => {
                    self.next();
                    let rhs = self.parse_unary()?;
                    if rhs == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    acc %= rhs;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next();
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.next();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<f64, String> {
        let base = self.parse_atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.next();
            // 右结合：2^3^2 = 2^(3^2)
            let exp = self.parse_unary()?;
            return Ok(base.powf(exp));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<f64, String> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Ident(name)) => {
                // math.sqrt 与 sqrt 等价
                let bare = name.strip_prefix("math.").unwrap_or(&name);
                if let Some(Token::LParen) = self.peek() {
                    self.next();
                    let mut args = vec![self.parse_expr()?];
                    while let Some(Token::Comma) = self.peek() {
                        self.next();
                        args.push(self.parse_expr()?);
                    }
                    self.expect(&Token::RParen)?;
                    apply_function(bare, &args)
                } else {
                    constant(bare)
                }
            }
            Some(Token::LParen) => {
                let v = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(v)
            }
            Some(t) => Err(format!("unexpected token {:?}", t)),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}

/// 白名单常量
fn constant(name: &str) -> Result<f64, String> {
    match name {
        "pi" => Ok(std::f64::consts::PI),
        "e" => Ok(std::f64::consts::E),
        "tau" => Ok(std::f64::consts::TAU),
        _ => Err(format!("name '{}' is not in the allowed math namespace", name)),
    }
}

/// 白名单函数（带参数个数检查）
fn apply_function(name: &str, args: &[f64]) -> Result<f64, String> {
    fn one(name: &str, args: &[f64]) -> Result<f64, String> {
        if args.len() != 1 {
            return Err(format!("{}() takes exactly one argument", name));
        }
        Ok(args[0])
    }
    fn two(name: &str, args: &[f64]) -> Result<(f64, f64), String> {
        if args.len() != 2 {
            return Err(format!("{}() takes exactly two arguments", name));
        }
        Ok((args[0], args[1]))
    }

    let result = match name {
        "sqrt" => one(name, args)?.sqrt(),
        "abs" => one(name, args)?.abs(),
        "sin" => one(name, args)?.sin(),
        "cos" => one(name, args)?.cos(),
        "tan" => one(name, args)?.tan(),
        "asin" => one(name, args)?.asin(),
        "acos" => one(name, args)?.acos(),
        "atan" => one(name, args)?.atan(),
        "ln" => one(name, args)?.ln(),
        "log" => one(name, args)?.log10(),
        "log2" => one(name, args)?.log2(),
        "exp" => one(name, args)?.exp(),
        "floor" => one(name, args)?.floor(),
        "ceil" => one(name, args)?.ceil(),
        "round" => one(name, args)?.round(),
        "pow" => {
            let (a, b) = two(name, args)?;
            a.powf(b)
        }
        "atan2" => {
            let (a, b) = two(name, args)?;
            a.atan2(b)
        }
        "min" => {
            let (a, b) = two(name, args)?;
            a.min(b)
        }
        "max" => {
            let (a, b) = two(name, args)?;
            a.max(b)
        }
        _ => {
            return Err(format!("name '{}' is not in the allowed math namespace", name));
        }
    };
    if result.is_nan() {
        return Err("math domain error".to_string());
    }
    Ok(result)
}

/// 求值入口：词法 -> 语法 -> 必须恰好消费完所有 token
pub fn evaluate(expression: &str) -> Result<f64, String> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    let mut parser = Parser::new(tokens);
    let value = parser.parse_expr()?;
    if let Some(t) = parser.peek() {
        return Err(format!("unexpected token {:?} after expression", t));
    }
    Ok(value)
}

/// 整数值去掉小数点展示，其余走默认浮点格式
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Calculator 工具：表达式求值
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "Calculator"
    }

    fn description(&self) -> &str {
        "Useful for mathematical calculations. Input should be an arithmetic expression, e.g. '2 + 2' or 'sqrt(16)'."
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        let value = evaluate(input).map_err(|e| format!("in calculation: {}", e))?;
        Ok(format!("Result: {}", format_value(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_basic_addition() {
        let obs = CalculatorTool.invoke("2 + 2").await.unwrap();
        assert_eq!(obs, "Result: 4");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(evaluate("-5 + 3").unwrap(), -2.0);
        assert_eq!(evaluate("2 * -3").unwrap(), -6.0);
    }

    #[test]
    fn test_power_right_associative() {
        assert_eq!(evaluate("2^3^2").unwrap(), 512.0);
        assert_eq!(evaluate("2**10").unwrap(), 1024.0);
    }

    #[test]
    fn test_modulo() {
        assert_eq!(evaluate("10 % 3").unwrap(), 1.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(evaluate("sqrt(16)").unwrap(), 4.0);
        assert_eq!(evaluate("math.sqrt(16)").unwrap(), 4.0);
        assert_eq!(evaluate("pow(2, 8)").unwrap(), 256.0);
        assert_eq!(evaluate("max(3, 7)").unwrap(), 7.0);
        assert!((evaluate("math.pi").unwrap() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_division_by_zero() {
        let err = evaluate("1 / 0").unwrap_err();
        assert!(err.contains("division by zero"));
        assert!(evaluate("5 % 0").is_err());
    }

    #[test]
    fn test_domain_error() {
        assert_eq!(evaluate("sqrt(-1)").unwrap_err(), "math domain error");
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = evaluate("__import__('os')").unwrap_err();
        // 单引号在词法层就被拒绝，名字根本到不了求值
        assert!(err.contains("unexpected character"), "got: {}", err);
        let err = evaluate("__import__(1)").unwrap_err();
        assert!(err.contains("not in the allowed math namespace"), "got: {}", err);
        let err = evaluate("open(1)").unwrap_err();
        assert!(err.contains("not in the allowed math namespace"), "got: {}", err);
    }

    #[test]
    fn test_arity_checked() {
        assert!(evaluate("sqrt(1, 2)").is_err());
        assert!(evaluate("pow(2)").is_err());
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        assert!(evaluate("2 + 2 2").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("").is_err());
    }

    #[tokio::test]
    async fn test_sandbox_error_observation() {
        let err = CalculatorTool.invoke("__import__('os')").await.unwrap_err();
        assert!(err.starts_with("in calculation:"));
    }

    #[tokio::test]
    async fn test_float_formatting() {
        let obs = CalculatorTool.invoke("7 / 2").await.unwrap();
        assert_eq!(obs, "Result: 3.5");
    }
}
