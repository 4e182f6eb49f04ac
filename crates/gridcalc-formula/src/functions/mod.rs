//! Built-in spreadsheet functions

pub mod math;

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::trace;

use crate::error::{FormulaError, FormulaResult};
use crate::token::Token;

/// Function implementation signature
///
/// Arguments arrive as operand tokens in call order; implementations pop
/// them, so the last argument is seen first.
pub type FunctionImpl = fn(&mut Vec<Token>) -> FormulaResult<String>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_math_functions();

        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Call a function by name after checking its argument count
    pub fn call(&self, name: &str, args: &mut Vec<Token>) -> FormulaResult<String> {
        let func = self
            .get(name)
            .ok_or_else(|| FormulaError::UnsupportedFunction(name.to_uppercase()))?;

        let actual = args.len();
        let too_few = actual < func.min_args;
        let too_many = func.max_args.is_some_and(|max| actual > max);
        if too_few || too_many {
            return Err(FormulaError::ArgumentCount {
                function: func.name.to_string(),
                expected: expected_args(func),
                actual,
            });
        }

        trace!(function = func.name, args = actual, "calling function");
        (func.implementation)(args)
    }

    fn register_math_functions(&mut self) {
        self.register(FunctionDef {
            name: "SUM",
            min_args: 0,
            max_args: None,
            implementation: math::fn_sum,
        });

        self.register(FunctionDef {
            name: "PRODUCT",
            min_args: 0,
            max_args: None,
            implementation: math::fn_product,
        });

        self.register(FunctionDef {
            name: "POWER",
            min_args: 2,
            max_args: Some(2),
            implementation: math::fn_power,
        });

        self.register(FunctionDef {
            name: "SQRT",
            min_args: 1,
            max_args: Some(1),
            implementation: math::fn_sqrt,
        });

        self.register(FunctionDef {
            name: "QUOTIENT",
            min_args: 2,
            max_args: Some(2),
            implementation: math::fn_quotient,
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn expected_args(func: &FunctionDef) -> String {
    match func.max_args {
        Some(max) if max == func.min_args => max.to_string(),
        Some(max) => format!("{} to {}", func.min_args, max),
        None => format!("at least {}", func.min_args),
    }
}

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

/// The shared registry of built-in functions
pub fn registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}
