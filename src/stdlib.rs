//! The standard library: every construct of the language is a call to one of
//! these built-ins.
//!
//! Control-flow built-ins hand their bodies to an [`Evaluator`]. The default
//! [`StubEvaluator`] never executes anything; `loop` and `while` still run
//! their body through the block tokenizer and walk the fragments.

use crate::block::BlockTokenizer;
use crate::environment::Environment;
use crate::error::ScanError;
use crate::token::Token;
use crate::value::{UserFunction, Value};
use std::cmp::Ordering;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    Printf,
    Get,
    Set,
    Rem,
    Nop,
    If,
    IfElse,
    Loop,
    While,
    Function,
    Concat,
    Input,
    TryCatch,
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

/// Result of a built-in call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Absent,
    /// The program asked to stop; the host exits with status 0.
    Terminate,
}

impl Outcome {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Option<Value>> for Outcome {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Outcome::Absent, Outcome::Value)
    }
}

/// Runs the bodies handed to control-flow built-ins.
pub trait Evaluator {
    /// A branch of `if`/`if_else`, or the handler of `try_catch`.
    fn branch(&mut self, env: &mut Environment, body: Option<&Value>);
    /// The fragments of a `loop`/`while` body.
    fn block(&mut self, env: &mut Environment, fragments: &[String]);
    /// The protected body of `try_catch`. Returns whether it succeeded.
    fn attempt(&mut self, env: &mut Environment, body: Option<&Value>) -> bool;
}

/// Walks bodies without running them.
#[derive(Debug, Default)]
pub struct StubEvaluator;

impl Evaluator for StubEvaluator {
    fn branch(&mut self, _env: &mut Environment, body: Option<&Value>) {
        trace!(body = ?body, "branch not evaluated");
    }

    fn block(&mut self, _env: &mut Environment, fragments: &[String]) {
        for fragment in fragments {
            trace!(fragment = %fragment, "block fragment");
        }
    }

    fn attempt(&mut self, _env: &mut Environment, body: Option<&Value>) -> bool {
        trace!(body = ?body, "try body assumed to succeed");
        true
    }
}

/// Everything a built-in can touch: the variables, the program's input and
/// output, and the evaluator for nested bodies.
pub struct Context<R, W> {
    pub env: Environment,
    input: R,
    output: W,
    blocks: BlockTokenizer,
    evaluator: Box<dyn Evaluator>,
}

impl<R: BufRead, W: Write> Context<R, W> {
    pub fn new(env: Environment, input: R, output: W) -> Result<Self, ScanError> {
        Ok(Self {
            env,
            input,
            output,
            blocks: BlockTokenizer::new()?,
            evaluator: Box::new(StubEvaluator),
        })
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Calls `builtin`. A `None` argument is an absent value in that position.
    pub fn call(&mut self, builtin: Builtin, args: &[Option<Value>]) -> io::Result<Outcome> {
        builtin.call(self, args)
    }

    /// Calls the built-in named by a `RESERVED` token. `None` when the token
    /// does not name one.
    pub fn dispatch(
        &mut self,
        token: &Token,
        args: &[Option<Value>],
    ) -> Option<io::Result<Outcome>> {
        Builtin::for_token(token).map(|builtin| builtin.call(self, args))
    }
}

impl Builtin {
    pub const ALL: [Builtin; 20] = [
        Builtin::Print,
        Builtin::Printf,
        Builtin::Get,
        Builtin::Set,
        Builtin::Rem,
        Builtin::Nop,
        Builtin::If,
        Builtin::IfElse,
        Builtin::Loop,
        Builtin::While,
        Builtin::Function,
        Builtin::Concat,
        Builtin::Input,
        Builtin::TryCatch,
        Builtin::Equal,
        Builtin::NotEqual,
        Builtin::LessThan,
        Builtin::LessOrEqual,
        Builtin::GreaterThan,
        Builtin::GreaterOrEqual,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Printf => "printf",
            Builtin::Get => "get",
            Builtin::Set => "set",
            Builtin::Rem => "rem",
            Builtin::Nop => "nop",
            Builtin::If => "if",
            Builtin::IfElse => "if_else",
            Builtin::Loop => "loop",
            Builtin::While => "while",
            Builtin::Function => "function",
            Builtin::Concat => "concat",
            Builtin::Input => "input",
            Builtin::TryCatch => "try_catch",
            Builtin::Equal => "equal",
            Builtin::NotEqual => "not_equal",
            Builtin::LessThan => "less_than",
            Builtin::LessOrEqual => "less_or_equal",
            Builtin::GreaterThan => "greater_than",
            Builtin::GreaterOrEqual => "greater_or_equal",
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    pub fn for_token(token: &Token) -> Option<Builtin> {
        if token.is_reserved() {
            Builtin::from_name(&token.text)
        } else {
            None
        }
    }

    pub fn call<R: BufRead, W: Write>(
        self,
        ctx: &mut Context<R, W>,
        args: &[Option<Value>],
    ) -> io::Result<Outcome> {
        debug!(builtin = self.name(), args = args.len(), "call");
        let arg = move |i: usize| args.get(i).and_then(Option::as_ref);

        let outcome = match self {
            Builtin::Print => {
                writeln!(ctx.output, "{}", display(arg(0)))?;
                ctx.output.flush()?;
                Outcome::Absent
            }
            Builtin::Printf => {
                let template = arg(0).map(Value::to_string).unwrap_or_default();
                let value = display(arg(1));
                writeln!(ctx.output, "{}", template.replacen('%', &value, 1))?;
                ctx.output.flush()?;
                Outcome::Absent
            }
            Builtin::Get => match arg(0) {
                Some(name) => ctx.env.get(&name.to_string()).cloned().into(),
                None => Outcome::Absent,
            },
            Builtin::Set => match (arg(0), arg(1)) {
                (Some(name), Some(value)) => {
                    Outcome::Value(ctx.env.set(&name.to_string(), value.clone()))
                }
                _ => Outcome::Absent,
            },
            Builtin::Rem => Outcome::Value(Value::Bool(arg(0).map_or(false, Value::is_truthy))),
            Builtin::Nop => Outcome::Absent,
            Builtin::If => {
                if truthy(arg(0)) {
                    ctx.evaluator.branch(&mut ctx.env, arg(1));
                    Outcome::Absent
                } else {
                    Outcome::Value(Value::Bool(false))
                }
            }
            Builtin::IfElse => {
                let body = if truthy(arg(0)) { arg(1) } else { arg(2) };
                ctx.evaluator.branch(&mut ctx.env, body);
                Outcome::Absent
            }
            Builtin::Loop => {
                let fragments = ctx.block_fragments(arg(0));
                ctx.evaluator.block(&mut ctx.env, &fragments);
                Outcome::Absent
            }
            Builtin::While => {
                let fragments = ctx.block_fragments(arg(1));
                if truthy(arg(0)) {
                    ctx.evaluator.block(&mut ctx.env, &fragments);
                }
                Outcome::Absent
            }
            Builtin::Function => match (arg(0), args.get(1..)) {
                (Some(name), Some(rest)) => {
                    let (body, params) = match rest.split_last() {
                        Some((body, params)) => (display(body.as_ref()), params),
                        None => (String::new(), rest),
                    };
                    let function = UserFunction {
                        name: name.to_string(),
                        params: params.iter().map(|param| display(param.as_ref())).collect(),
                        body,
                    };
                    let value = Value::Function(Rc::new(function));
                    ctx.env.set(&name.to_string(), value.clone());
                    Outcome::Value(value)
                }
                _ => Outcome::Absent,
            },
            Builtin::Concat => {
                let joined = args
                    .iter()
                    .map(|value| value.as_ref().map(Value::to_string).unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(" ");
                Outcome::Value(Value::Str(joined))
            }
            Builtin::Input => {
                if let Some(prompt) = arg(0) {
                    write!(ctx.output, "{}", prompt)?;
                    ctx.output.flush()?;
                }
                // The line is discarded, so it need not be UTF-8.
                ctx.input.read_until(b'\n', &mut Vec::new())?;
                Outcome::Terminate
            }
            Builtin::TryCatch => {
                if !ctx.evaluator.attempt(&mut ctx.env, arg(0)) {
                    ctx.evaluator.branch(&mut ctx.env, arg(1));
                }
                Outcome::Absent
            }
            Builtin::Equal => Outcome::Value(Value::Bool(strict_eq(arg(0), arg(1)))),
            Builtin::NotEqual => Outcome::Value(Value::Bool(!strict_eq(arg(0), arg(1)))),
            Builtin::LessThan => ordered(arg(0), arg(1), |o| o == Ordering::Less),
            Builtin::LessOrEqual => ordered(arg(0), arg(1), |o| o != Ordering::Greater),
            Builtin::GreaterThan => ordered(arg(0), arg(1), |o| o == Ordering::Greater),
            Builtin::GreaterOrEqual => ordered(arg(0), arg(1), |o| o != Ordering::Less),
        };
        Ok(outcome)
    }
}

impl<R, W> Context<R, W> {
    fn block_fragments(&self, body: Option<&Value>) -> Vec<String> {
        let text = body.map(Value::to_string).unwrap_or_default();
        self.blocks.tokenize(&text)
    }
}

/// Text of a value as `print` shows it; an absent value is `undefined`.
fn display(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), Value::to_string)
}

fn truthy(value: Option<&Value>) -> bool {
    value.map_or(false, Value::is_truthy)
}

fn strict_eq(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => l.strict_eq(r),
        (None, None) => true,
        _ => false,
    }
}

fn ordered(left: Option<&Value>, right: Option<&Value>, test: fn(Ordering) -> bool) -> Outcome {
    let result = match (left, right) {
        (Some(l), Some(r)) => l.compare(r).map_or(false, test),
        _ => false,
    };
    Outcome::Value(Value::Bool(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::RESERVED;
    use std::io::Cursor;

    type TestContext = Context<Cursor<Vec<u8>>, Vec<u8>>;

    fn context() -> TestContext {
        Context::new(Environment::new(), Cursor::new(Vec::new()), Vec::new()).unwrap()
    }

    fn printed(ctx: TestContext) -> String {
        String::from_utf8(ctx.into_output()).unwrap()
    }

    fn present<const N: usize>(values: [Value; N]) -> [Option<Value>; N] {
        values.map(Some)
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::from_name("for"), None);
    }

    #[test]
    fn only_reserved_tokens_dispatch() {
        assert_eq!(Builtin::for_token(&Token::new("print", RESERVED)), Some(Builtin::Print));
        assert_eq!(Builtin::for_token(&Token::new("print", "BAREWORD")), None);
        assert_eq!(Builtin::for_token(&Token::new("true", RESERVED)), None);
    }

    #[test]
    fn print_without_argument_writes_undefined() {
        let mut ctx = context();
        ctx.call(Builtin::Print, &[]).unwrap();
        ctx.call(Builtin::Print, &[None]).unwrap();
        assert_eq!(printed(ctx), "undefined\nundefined\n");
    }

    #[test]
    fn printf_without_value_substitutes_undefined() {
        let mut ctx = context();
        ctx.call(Builtin::Printf, &present([Value::from("got %")])).unwrap();
        assert_eq!(printed(ctx), "got undefined\n");
    }

    #[test]
    fn set_with_missing_value_binds_nothing() {
        let mut ctx = context();
        let outcome = ctx.call(Builtin::Set, &present([Value::from("x")])).unwrap();
        assert_eq!(outcome, Outcome::Absent);
        assert!(ctx.env.is_empty());
    }

    #[test]
    fn comparisons_with_missing_operands() {
        let mut ctx = context();
        let both_missing = ctx.call(Builtin::Equal, &[]).unwrap();
        assert_eq!(both_missing, Outcome::Value(Value::Bool(true)));
        let one_missing = ctx.call(Builtin::LessThan, &present([Value::from(1.0)])).unwrap();
        assert_eq!(one_missing, Outcome::Value(Value::Bool(false)));
    }

    #[test]
    fn function_without_params_uses_last_argument_as_body() {
        let mut ctx = context();
        let outcome = ctx
            .call(Builtin::Function, &present([Value::from("hello"), Value::from("print(1)")]))
            .unwrap();
        let Some(Value::Function(func)) = outcome.into_value() else {
            panic!("expected a function");
        };
        assert!(func.params.is_empty());
        assert_eq!(func.body, "print(1)");
    }

    #[test]
    fn function_without_name_is_absent() {
        let mut ctx = context();
        let outcome = ctx.call(Builtin::Function, &[None, Some(Value::from("x"))]).unwrap();
        assert_eq!(outcome, Outcome::Absent);
        assert!(ctx.env.is_empty());
    }
}
