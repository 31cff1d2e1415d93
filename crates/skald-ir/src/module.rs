//! Modules: the unit that lowering stages transform and translators emit.
//!
//! A module is an ordered symbol table. Besides kernel functions it holds
//! the runtime-support declarations materialized by the intrinsic loader
//! and read-only data constants such as result labels.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::function::Function;

/// A runtime-support declaration, kept as target-level source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Symbol name.
    pub name: String,
    /// Code fragment declaring or defining the symbol.
    pub code: String,
}

/// A private, read-only byte constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConstant {
    /// Symbol name.
    pub name: String,
    /// Raw contents, without implicit terminator.
    pub bytes: Vec<u8>,
}

/// A named entry in a module's symbol table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "symbol", rename_all = "snake_case")]
pub enum Symbol {
    /// A kernel function.
    Function(Function),
    /// A runtime-support declaration.
    Declaration(Declaration),
    /// A read-only data constant.
    Global(GlobalConstant),
}

impl Symbol {
    /// The symbol's name.
    pub fn name(&self) -> &str {
        match self {
            Symbol::Function(f) => &f.name,
            Symbol::Declaration(d) => &d.name,
            Symbol::Global(g) => &g.name,
        }
    }
}

/// An isolated compilation unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    /// Module name, used for diagnostics only.
    #[serde(default)]
    pub name: String,
    /// Symbols in insertion order.
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

impl Module {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: vec![],
        }
    }

    /// Decode a module from its serialized text form.
    ///
    /// Every function body is checked as if built through
    /// [`Function::push`].
    pub fn from_text(text: &str) -> IrResult<Self> {
        let module: Self = serde_json::from_str(text)?;
        for function in module.functions() {
            function.validate_body()?;
        }
        Ok(module)
    }

    /// Encode the module in its serialized text form.
    pub fn to_text(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up any symbol by name.
    pub fn lookup_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name() == name)
    }

    /// Check whether `name` is defined.
    pub fn contains_symbol(&self, name: &str) -> bool {
        self.lookup_symbol(name).is_some()
    }

    /// Look up a function by name.
    pub fn lookup_function(&self, name: &str) -> Option<&Function> {
        self.functions().find(|f| f.name == name)
    }

    /// Look up a function by name for mutation.
    pub fn lookup_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.symbols.iter_mut().find_map(|s| match s {
            Symbol::Function(f) if f.name == name => Some(f),
            _ => None,
        })
    }

    /// Look up a global constant by name.
    pub fn lookup_global(&self, name: &str) -> Option<&GlobalConstant> {
        self.symbols.iter().find_map(|s| match s {
            Symbol::Global(g) if g.name == name => Some(g),
            _ => None,
        })
    }

    /// Iterate over functions.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::Function(f) => Some(f),
            _ => None,
        })
    }

    /// Iterate over functions mutably.
    pub fn functions_mut(&mut self) -> impl Iterator<Item = &mut Function> {
        self.symbols.iter_mut().filter_map(|s| match s {
            Symbol::Function(f) => Some(f),
            _ => None,
        })
    }

    /// Iterate over declarations.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::Declaration(d) => Some(d),
            _ => None,
        })
    }

    /// Iterate over global constants.
    pub fn globals(&self) -> impl Iterator<Item = &GlobalConstant> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::Global(g) => Some(g),
            _ => None,
        })
    }

    /// The first function marked as entry point.
    pub fn entry_point(&self) -> Option<&Function> {
        self.functions().find(|f| f.is_entry_point())
    }

    /// Append a symbol; names must be unique.
    pub fn push(&mut self, symbol: Symbol) -> IrResult<()> {
        if self.contains_symbol(symbol.name()) {
            return Err(IrError::DuplicateSymbol(symbol.name().to_string()));
        }
        self.symbols.push(symbol);
        Ok(())
    }

    /// Append a function.
    pub fn push_function(&mut self, function: Function) -> IrResult<()> {
        self.push(Symbol::Function(function))
    }

    /// Append a declaration.
    pub fn push_declaration(&mut self, name: impl Into<String>, code: impl Into<String>) -> IrResult<()> {
        self.push(Symbol::Declaration(Declaration {
            name: name.into(),
            code: code.into(),
        }))
    }

    /// Append a read-only constant.
    pub fn push_global(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> IrResult<()> {
        self.push(Symbol::Global(GlobalConstant {
            name: name.into(),
            bytes: bytes.into(),
        }))
    }
}
