use crate::ast::{BinaryOp, Expr, Program, Stmt, Subroutine, UnaryOp};
use crate::value::{self, Value};
use super::builtins;
use super::environment::{normalize, ArrayStore, Cell, Environment, Frame, Storage};
use super::error::{Error, RuntimeError};
use super::io::{InputProvider, OutputSink, ScriptedInput};
use std::cmp::Ordering;
use std::rc::Rc;

/// Nested subroutine calls allowed before a run is aborted.
pub const MAX_CALL_DEPTH: usize = 200;

/// Largest number of slots a single array declaration may allocate.
pub const MAX_ARRAY_LEN: i64 = 1_000_000;

/// Called after every completed statement with global memory as it stands.
pub type Observer = Box<dyn FnMut(&Stmt, &Frame)>;

/// Tree-walking evaluator. Owns all runtime state; every `run` starts from
/// an empty environment, so separate instances never interfere.
pub struct Interpreter<I, O> {
    env: Environment,
    input: I,
    output: O,
    returning: bool,
    return_value: Value,
    observer: Option<Observer>,
}

impl<I: InputProvider, O: OutputSink> Interpreter<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self {
            env: Environment::new(),
            input,
            output,
            returning: false,
            return_value: Value::Null,
            observer: None,
        }
    }

    pub fn set_observer(&mut self, observer: impl FnMut(&Stmt, &Frame) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Read-only view of global memory as of the last completed statement.
    pub fn memory(&self) -> &Frame {
        self.env.globals()
    }

    pub fn snapshot(&self) -> Frame {
        self.env.globals().clone()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }

    /// Hoists type and subroutine declarations, then executes the remaining
    /// top-level statements in source order.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.env.reset();
        self.returning = false;
        self.return_value = Value::Null;

        for item in &program.items {
            match item {
                Stmt::TypeDecl(record) => self.env.register_type(record.clone()),
                Stmt::Procedure(sub) | Stmt::Function(sub) => {
                    self.env.register_subroutine(sub.clone())
                }
                _ => {}
            }
        }

        for item in program.items.iter().filter(|item| !item.is_hoisted()) {
            self.execute(item)?;
        }
        Ok(())
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    /// Executes one statement. While a `RETURN` is pending every statement
    /// is skipped; loops still evaluate their conditions.
    fn execute(&mut self, statement: &Stmt) -> Result<(), RuntimeError> {
        if self.returning {
            return Ok(());
        }

        match statement {
            Stmt::TypeDecl(_) | Stmt::Procedure(_) | Stmt::Function(_) => {}
            Stmt::Declare { names, type_name } => {
                for name in names {
                    let key = normalize(name);
                    if !self.env.current_frame().contains_key(&key) {
                        let cell = self.env.new_cell(type_name);
                        self.env.current_frame_mut().insert(key, cell);
                    }
                }
            }
            Stmt::DeclareArray {
                names,
                lower,
                upper,
                element_type,
            } => {
                let first: &str = names.first().map(|n| &**n).unwrap_or("");
                let lower_value = self.evaluate(lower)?;
                let upper_value = self.evaluate(upper)?;
                let lower = array_bound(first, &lower_value)?;
                let upper = array_bound(first, &upper_value)?;
                if upper.saturating_sub(lower) >= MAX_ARRAY_LEN {
                    return Err(RuntimeError::InvalidBounds {
                        name: first.to_string(),
                        message: format!("more than {} elements", MAX_ARRAY_LEN),
                    });
                }
                for name in names {
                    let key = normalize(name);
                    if !self.env.current_frame().contains_key(&key) {
                        let store = ArrayStore::new(lower, upper, element_type.clone());
                        self.env.current_frame_mut().insert(key, Cell::array(store));
                    }
                }
            }
            Stmt::Constant { name, value } => {
                let value = self.evaluate(value)?;
                let key = normalize(name);
                match self.env.current_frame().get(&key) {
                    Some(cell) if cell.constant => {}
                    Some(_) => return Err(RuntimeError::already_declared(name.to_string())),
                    None => {
                        self.env.current_frame_mut().insert(key, Cell::constant(value));
                    }
                }
            }
            Stmt::Assign { name, field, value } => {
                self.check_writable(name)?;
                let value = self.evaluate(value)?;
                self.store(name, field.as_deref(), value)?;
            }
            Stmt::ArrayAssign { name, index, value } => {
                match self.env.lookup(name) {
                    None => return Err(RuntimeError::undeclared(name.to_string())),
                    Some(Cell {
                        storage: Storage::Array(_),
                        ..
                    }) => {}
                    Some(_) => return Err(RuntimeError::not_an_array(name.to_string())),
                }
                let index_value = self.evaluate(index)?;
                let index = array_index(name, &index_value)?;
                let value = self.evaluate(value)?;
                if let Some(Cell {
                    storage: Storage::Array(store),
                    ..
                }) = self.env.lookup_mut(name)
                {
                    store.set(index, value);
                }
            }
            Stmt::Output(exprs) => {
                let mut line = String::new();
                for expr in exprs {
                    line.push_str(&self.evaluate(expr)?.to_string());
                }
                self.output.emit(&line);
            }
            Stmt::Input(name) => {
                self.check_writable(name)?;
                let text = self
                    .input
                    .request_input(name)
                    .ok_or_else(|| RuntimeError::input_unavailable(name.to_string()))?;
                self.store(name, None, Value::from_input(&text))?;
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute_block(then_branch)?;
                } else {
                    self.execute_block(else_branch)?;
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute_block(body)?;
                }
            }
            Stmt::Repeat { body, condition } => loop {
                self.execute_block(body)?;
                if self.evaluate(condition)?.is_truthy() {
                    break;
                }
            },
            Stmt::For {
                var,
                start,
                end,
                step,
                body,
            } => self.execute_for(var, start, end, step, body)?,
            Stmt::Case {
                subject,
                clauses,
                otherwise,
            } => {
                let subject = self.read_variable(subject, None)?;
                let mut matched = false;
                for clause in clauses {
                    if self.evaluate(&clause.value)? == subject {
                        self.execute(&clause.body)?;
                        matched = true;
                        break;
                    }
                }
                if !matched {
                    self.execute_block(otherwise)?;
                }
            }
            Stmt::Call { name, args } => {
                let args = self.evaluate_args(args)?;
                let sub = self
                    .env
                    .subroutine(name)
                    .ok_or_else(|| RuntimeError::unknown_procedure(name.to_string()))?;
                self.invoke(&sub, args)?;
            }
            Stmt::Return(expr) => {
                self.return_value = self.evaluate(expr)?;
                self.returning = true;
            }
        }

        if let Some(observer) = self.observer.as_mut() {
            observer(statement, self.env.globals());
        }
        Ok(())
    }

    /// The loop variable is (re)bound in the active frame. The end bound is
    /// re-evaluated before every iteration; start and step only once.
    fn execute_for(
        &mut self,
        var: &Rc<str>,
        start: &Expr,
        end: &Expr,
        step: &Expr,
        body: &[Stmt],
    ) -> Result<(), RuntimeError> {
        let key = normalize(var);
        let start = self.evaluate(start)?;
        if matches!(self.env.current_frame().get(&key), Some(cell) if cell.constant) {
            return Err(RuntimeError::constant_reassignment(var.to_string()));
        }
        self.env
            .current_frame_mut()
            .insert(key.clone(), Cell::scalar(Rc::from("INTEGER"), start));

        let step = self.evaluate(step)?.to_number();
        if !(step > 0.0 || step < 0.0) {
            return Err(RuntimeError::InvalidStep {
                var: var.to_string(),
            });
        }

        loop {
            let current = self.loop_counter(var, &key)?;
            let end = self.evaluate(end)?.to_number();
            if (step > 0.0 && current > end) || (step < 0.0 && current < end) {
                break;
            }

            self.execute_block(body)?;
            if self.returning {
                break;
            }

            let next = self.loop_counter(var, &key)? + step;
            if let Some(cell) = self.env.current_frame_mut().get_mut(&key) {
                cell.storage = Storage::Scalar(Value::Number(next));
            }
        }
        Ok(())
    }

    fn loop_counter(&self, var: &str, key: &str) -> Result<f64, RuntimeError> {
        let cell = self
            .env
            .current_frame()
            .get(key)
            .ok_or_else(|| RuntimeError::undeclared(var))?;
        cell.scalar_value()
            .map(Value::to_number)
            .ok_or_else(|| RuntimeError::not_a_scalar(var, cell.shape()))
    }

    /// Fails when `name` is undeclared or a constant.
    fn check_writable(&self, name: &str) -> Result<(), RuntimeError> {
        match self.env.lookup(name) {
            None => Err(RuntimeError::undeclared(name)),
            Some(cell) if cell.constant => Err(RuntimeError::constant_reassignment(name)),
            Some(_) => Ok(()),
        }
    }

    /// Overwrites a scalar variable or a record field.
    fn store(&mut self, name: &str, field: Option<&str>, value: Value) -> Result<(), RuntimeError> {
        let cell = self
            .env
            .lookup_mut(name)
            .ok_or_else(|| RuntimeError::undeclared(name))?;
        if cell.constant {
            return Err(RuntimeError::constant_reassignment(name));
        }
        let shape = cell.shape();

        match (field, &mut cell.storage) {
            (None, Storage::Scalar(slot)) => {
                *slot = value;
                Ok(())
            }
            (None, _) => Err(RuntimeError::not_a_scalar(name, shape)),
            (Some(field), Storage::Record(fields)) => match fields.get_mut(&normalize(field)) {
                Some(Cell {
                    storage: Storage::Scalar(slot),
                    ..
                }) => {
                    *slot = value;
                    Ok(())
                }
                _ => Err(RuntimeError::field_not_found(name, field)),
            },
            (Some(field), _) => Err(RuntimeError::field_not_found(name, field)),
        }
    }

    fn read_variable(&self, name: &str, field: Option<&str>) -> Result<Value, RuntimeError> {
        let cell = self
            .env
            .lookup(name)
            .ok_or_else(|| RuntimeError::undeclared(name))?;

        match (field, &cell.storage) {
            (None, Storage::Scalar(value)) => Ok(value.clone()),
            (None, _) => Err(RuntimeError::not_a_scalar(name, cell.shape())),
            (Some(field), Storage::Record(fields)) => fields
                .get(&normalize(field))
                .and_then(Cell::scalar_value)
                .cloned()
                .ok_or_else(|| RuntimeError::field_not_found(name, field)),
            (Some(field), _) => Err(RuntimeError::field_not_found(name, field)),
        }
    }

    fn evaluate_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        args.iter().map(|arg| self.evaluate(arg)).collect()
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable { name, field } => self.read_variable(name, field.as_deref()),
            Expr::ArrayAccess { name, index } => {
                let index_value = self.evaluate(index)?;
                let cell = self
                    .env
                    .lookup(name)
                    .ok_or_else(|| RuntimeError::undeclared(name.to_string()))?;
                let store = match &cell.storage {
                    Storage::Array(store) => store,
                    _ => return Err(RuntimeError::not_an_array(name.to_string())),
                };
                let index = array_index(name, &index_value)?;
                store
                    .get(index)
                    .cloned()
                    .ok_or_else(|| RuntimeError::IndexOutOfBounds {
                        name: name.to_string(),
                        index: index as f64,
                        lower: store.lower,
                        upper: store.upper,
                    })
            }
            Expr::Call { name, args } => {
                let args = self.evaluate_args(args)?;
                if let Some(result) = builtins::call_builtin(name, &args) {
                    return Ok(result);
                }
                let sub = self
                    .env
                    .subroutine(name)
                    .ok_or_else(|| RuntimeError::unknown_function(name.to_string()))?;
                if !sub.is_function() {
                    return Err(RuntimeError::procedure_in_expression(name.to_string()));
                }
                self.invoke(&sub, args)
            }
            Expr::Binary { left, op, right } => {
                // Both operands are always evaluated, AND/OR included.
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(apply_binary(*op, &left, &right))
            }
            Expr::Unary { op, expr } => {
                let value = self.evaluate(expr)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                    UnaryOp::Neg => Value::Number(-value.to_number()),
                })
            }
        }
    }

    /// Runs `sub` in a fresh local frame with parameters bound by value.
    /// Missing arguments bind to the undefined value; extras are ignored.
    fn invoke(&mut self, sub: &Rc<Subroutine>, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if self.env.depth() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded {
                name: sub.name.to_string(),
                limit: MAX_CALL_DEPTH,
            });
        }

        let mut args = args.into_iter();
        let mut frame = Frame::new();
        for param in &sub.params {
            let value = args.next().unwrap_or(Value::Null);
            frame.insert(normalize(&param.name), Cell::scalar(param.type_name.clone(), value));
        }

        let saved_returning = std::mem::replace(&mut self.returning, false);
        let saved_value = std::mem::replace(&mut self.return_value, Value::Null);

        self.env.push_frame(frame);
        let outcome = self.execute_block(&sub.body);
        self.env.pop_frame();

        let result = std::mem::replace(&mut self.return_value, saved_value);
        self.returning = saved_returning;
        outcome.map(|_| result)
    }
}

pub fn apply_binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    let ordered = |accept: fn(Ordering) -> bool| {
        Value::Bool(value::compare(left, right).map(accept).unwrap_or(false))
    };

    match op {
        BinaryOp::Add => value::add(left, right),
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::IntDiv => value::int_div(left, right),
        BinaryOp::Mod => value::modulo(left, right),
        BinaryOp::Pow => Value::Number(left.to_number().powf(right.to_number())),
        BinaryOp::Concat => Value::string(format!("{}{}", left, right)),
        BinaryOp::Eq => Value::Bool(left == right),
        BinaryOp::NotEq => Value::Bool(left != right),
        BinaryOp::Less => ordered(|o| o == Ordering::Less),
        BinaryOp::Greater => ordered(|o| o == Ordering::Greater),
        BinaryOp::LessEq => ordered(|o| o != Ordering::Greater),
        BinaryOp::GreaterEq => ordered(|o| o != Ordering::Less),
        BinaryOp::And => Value::Bool(left.is_truthy() && right.is_truthy()),
        BinaryOp::Or => Value::Bool(left.is_truthy() || right.is_truthy()),
    }
}

fn integral(value: &Value) -> Option<i64> {
    let n = value.to_number();
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(n as i64)
    } else {
        None
    }
}

fn array_index(name: &str, value: &Value) -> Result<i64, RuntimeError> {
    integral(value).ok_or_else(|| RuntimeError::InvalidIndex {
        name: name.to_string(),
        index: value.to_string(),
    })
}

fn array_bound(name: &str, value: &Value) -> Result<i64, RuntimeError> {
    integral(value).ok_or_else(|| RuntimeError::InvalidBounds {
        name: name.to_string(),
        message: format!("'{}' is not an integer", value),
    })
}

/// Scans, parses and runs `source`, feeding `inputs` to `INPUT` statements.
/// Returns the emitted lines.
pub fn parse_and_run(source: &str, inputs: &[&str]) -> Result<Vec<String>, Error> {
    let (output, result) = parse_and_run_capturing(source, inputs);
    result.map(|_| output)
}

/// Like [`parse_and_run`], but keeps the lines emitted before a failure.
pub fn parse_and_run_capturing(source: &str, inputs: &[&str]) -> (Vec<String>, Result<Frame, Error>) {
    let program = match crate::parse_program(source) {
        Ok(program) => program,
        Err(e) => return (Vec::new(), Err(e)),
    };

    let mut interpreter = Interpreter::new(ScriptedInput::new(inputs.iter().copied()), Vec::new());
    let result = interpreter.run(&program);
    let memory = interpreter.snapshot();
    let (_, output) = interpreter.into_parts();
    (output, result.map(|_| memory).map_err(Error::from))
}

pub fn parse_and_run_with_diagnostics(
    source: &str,
    inputs: &[&str],
) -> Result<Vec<String>, Vec<crate::diagnostic::Diagnostic>> {
    parse_and_run(source, inputs).map_err(|e| vec![e.to_diagnostic()])
}
