use crate::ast::{RecordType, Subroutine};
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Name → value cell, in declaration order. Keys are upper-cased.
pub type Frame = IndexMap<String, Cell>;

/// Identifier lookup is case-insensitive; every map is keyed by this form.
pub fn normalize(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// Element storage for a one-dimensional array declared over `lower..=upper`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayStore {
    pub lower: i64,
    pub upper: i64,
    pub element_type: Rc<str>,
    pub slots: BTreeMap<i64, Value>,
}

impl ArrayStore {
    pub fn new(lower: i64, upper: i64, element_type: Rc<str>) -> Self {
        let default = Value::default_for(&element_type);
        let slots = (lower..=upper).map(|i| (i, default.clone())).collect();
        Self {
            lower,
            upper,
            element_type,
            slots,
        }
    }

    pub fn in_bounds(&self, index: i64) -> bool {
        (self.lower..=self.upper).contains(&index)
    }

    /// Bounds-checked read.
    pub fn get(&self, index: i64) -> Option<&Value> {
        if self.in_bounds(index) {
            self.slots.get(&index)
        } else {
            None
        }
    }

    /// Unchecked write; an index outside the bounds gets a slot of its own
    /// that `get` never returns.
    pub fn set(&mut self, index: i64, value: Value) {
        self.slots.insert(index, value);
    }

    pub fn len(&self) -> usize {
        if self.lower > self.upper {
            return 0;
        }
        self.slots.range(self.lower..=self.upper).count()
    }

    /// In-bounds `(index, value)` pairs in ascending index order.
    pub fn elements(&self) -> impl Iterator<Item = (i64, &Value)> {
        let range = if self.lower > self.upper {
            None
        } else {
            Some(self.slots.range(self.lower..=self.upper))
        };
        range.into_iter().flatten().map(|(index, value)| (*index, value))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The three shapes a declared name can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Scalar(Value),
    Array(ArrayStore),
    /// Upper-cased field name → scalar cell.
    Record(IndexMap<String, Cell>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub declared_type: Rc<str>,
    pub constant: bool,
    pub storage: Storage,
}

impl Cell {
    pub fn scalar(declared_type: Rc<str>, value: Value) -> Self {
        Self {
            declared_type,
            constant: false,
            storage: Storage::Scalar(value),
        }
    }

    pub fn constant(value: Value) -> Self {
        Self {
            declared_type: Rc::from("CONSTANT"),
            constant: true,
            storage: Storage::Scalar(value),
        }
    }

    pub fn array(store: ArrayStore) -> Self {
        Self {
            declared_type: Rc::from("ARRAY"),
            constant: false,
            storage: Storage::Array(store),
        }
    }

    /// One defaulted scalar cell per field of `record`.
    pub fn record(record: &RecordType) -> Self {
        let fields = record
            .fields
            .iter()
            .map(|field| {
                let cell = Cell::scalar(field.type_name.clone(), Value::default_for(&field.type_name));
                (normalize(&field.name), cell)
            })
            .collect();
        Self {
            declared_type: record.name.clone(),
            constant: false,
            storage: Storage::Record(fields),
        }
    }

    pub fn shape(&self) -> &'static str {
        match self.storage {
            Storage::Scalar(_) => "a scalar",
            Storage::Array(_) => "an array",
            Storage::Record(_) => "a record",
        }
    }

    pub fn scalar_value(&self) -> Option<&Value> {
        match &self.storage {
            Storage::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

/// All runtime state of one evaluator: global memory, the stack of local
/// frames for active subroutine calls, and the type and subroutine
/// registries filled by the hoisting pass.
#[derive(Debug, Default)]
pub struct Environment {
    globals: Frame,
    frames: Vec<Frame>,
    types: IndexMap<String, Rc<RecordType>>,
    subroutines: IndexMap<String, Rc<Subroutine>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.globals.clear();
        self.frames.clear();
        self.types.clear();
        self.subroutines.clear();
    }

    pub fn register_type(&mut self, record: Rc<RecordType>) {
        self.types.insert(normalize(&record.name), record);
    }

    pub fn register_subroutine(&mut self, subroutine: Rc<Subroutine>) {
        self.subroutines.insert(normalize(&subroutine.name), subroutine);
    }

    pub fn record_type(&self, name: &str) -> Option<&Rc<RecordType>> {
        self.types.get(&normalize(name))
    }

    pub fn subroutine(&self, name: &str) -> Option<Rc<Subroutine>> {
        self.subroutines.get(&normalize(name)).cloned()
    }

    /// A freshly defaulted cell for a declaration of `type_name`: a record
    /// when the name is a registered type, otherwise a scalar.
    pub fn new_cell(&self, type_name: &Rc<str>) -> Cell {
        match self.record_type(type_name) {
            Some(record) => Cell::record(record),
            None => Cell::scalar(type_name.clone(), Value::default_for(type_name)),
        }
    }

    /// The active local frame inside a subroutine, otherwise global memory.
    pub fn current_frame(&self) -> &Frame {
        self.frames.last().unwrap_or(&self.globals)
    }

    pub fn current_frame_mut(&mut self) -> &mut Frame {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        }
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Resolves `name` in the active local frame first, then in global memory.
    pub fn lookup(&self, name: &str) -> Option<&Cell> {
        let key = normalize(name);
        self.frames
            .last()
            .and_then(|frame| frame.get(&key))
            .or_else(|| self.globals.get(&key))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Cell> {
        let key = normalize(name);
        if let Some(frame) = self.frames.last_mut() {
            if frame.contains_key(&key) {
                return frame.get_mut(&key);
            }
        }
        self.globals.get_mut(&key)
    }

    pub fn globals(&self) -> &Frame {
        &self.globals
    }
}
