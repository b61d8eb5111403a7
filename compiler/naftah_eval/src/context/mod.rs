//! Execution contexts (scopes).
//!
//! Contexts form a stack indexed by depth: exactly one context is live per
//! depth, and a context's parent is the one directly below it. The root
//! context at depth 0 lives as long as the interpreter; in REPL mode it is
//! the persistent scope that survives across turns.
//!
//! # Closing a context
//!
//! [`ContextRegistry::deregister`] removes the innermost context. Before it
//! is dropped:
//! - its executed-node markers move to the parent, so an enclosing block can
//!   see that a `return` ran inside a nested block;
//! - in REPL mode, its variables and functions move to the parent too.
//!   Loop variables never do; they end with their loop.
//!
//! Function call contexts hand nothing back. A recursive call's `return`
//! must not end the caller's block.

use naftah_ir::{visit, NodeId, NodeKind, Stmt, TypeName};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::declared::{DeclaredVariable, FunctionRef};
use crate::typecheck;
use crate::{EvalMode, Value};

bitflags::bitflags! {
    /// Transient evaluation state of a context.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ContextFlags: u8 {
        /// The right side of a declaration is being evaluated.
        const PARSING_ASSIGNMENT = 1;
        /// Fields of an object literal are being evaluated.
        const CREATING_OBJECT = 1 << 1;
    }
}

/// Failure of a context table operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssignError {
    #[error("variable '{name}' not found")]
    NotFound { name: String },
    #[error("cannot reassign constant '{name}'")]
    Constant { name: String },
    #[error("'{name}' is already declared in this scope")]
    Duplicate { name: String },
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: TypeName, found: String },
}

/// One scope.
#[derive(Debug)]
pub struct Context {
    depth: usize,
    parent: Option<usize>,
    variables: FxHashMap<String, DeclaredVariable>,
    /// Variables bound by the loop this context was opened for.
    loop_variables: FxHashMap<String, DeclaredVariable>,
    functions: FxHashMap<String, Vec<FunctionRef>>,
    /// Label of the loop this context was opened for.
    pub loop_label: Option<String>,
    pub flags: ContextFlags,
    /// Set on the context that holds a call's parameters.
    pub function_call_id: Option<String>,
    /// Variable whose initializer is being evaluated; container literals
    /// read its declared type.
    pub declaration_of_assignment: Option<DeclaredVariable>,
    executed: FxHashSet<NodeId>,
}

impl Context {
    fn new(depth: usize, parent: Option<usize>) -> Self {
        Context {
            depth,
            parent,
            variables: FxHashMap::default(),
            loop_variables: FxHashMap::default(),
            functions: FxHashMap::default(),
            loop_label: None,
            flags: ContextFlags::empty(),
            function_call_id: None,
            declaration_of_assignment: None,
            executed: FxHashSet::default(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn variables(&self) -> &FxHashMap<String, DeclaredVariable> {
        &self.variables
    }

    pub fn functions(&self) -> &FxHashMap<String, Vec<FunctionRef>> {
        &self.functions
    }

    /// A loop variable shadows a plain one of the same context.
    fn variable(&self, name: &str) -> Option<&DeclaredVariable> {
        self.loop_variables
            .get(name)
            .or_else(|| self.variables.get(name))
    }

    fn variable_mut(&mut self, name: &str) -> Option<&mut DeclaredVariable> {
        match self.loop_variables.get_mut(name) {
            Some(var) => Some(var),
            None => self.variables.get_mut(name),
        }
    }

    pub fn is_executed(&self, node: NodeId) -> bool {
        self.executed.contains(&node)
    }

    /// Declared type of the variable being initialized, while one is.
    pub fn pending_declared_type(&self) -> Option<TypeName> {
        let assigning = ContextFlags::PARSING_ASSIGNMENT | ContextFlags::CREATING_OBJECT;
        if self.flags.intersects(assigning) {
            self.declaration_of_assignment
                .as_ref()
                .and_then(|var| var.declared_type)
        } else {
            None
        }
    }
}

/// Depth-indexed stack of live contexts.
pub struct ContextRegistry {
    contexts: Vec<Context>,
    merge_on_exit: bool,
}

impl ContextRegistry {
    /// Registry holding just the root context.
    pub fn new(mode: EvalMode) -> Self {
        ContextRegistry {
            contexts: vec![Context::new(0, None)],
            merge_on_exit: mode.merges_scopes(),
        }
    }

    /// Depth of the innermost context.
    pub fn depth(&self) -> usize {
        self.contexts.len() - 1
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn get(&self, depth: usize) -> Option<&Context> {
        self.contexts.get(depth)
    }

    pub fn current(&self) -> &Context {
        let depth = self.depth();
        &self.contexts[depth]
    }

    pub fn current_mut(&mut self) -> &mut Context {
        let depth = self.depth();
        &mut self.contexts[depth]
    }

    /// Open a child of the innermost context. Returns its depth.
    pub fn register(&mut self) -> usize {
        let parent = self.depth();
        let depth = parent + 1;
        self.contexts.push(Context::new(depth, Some(parent)));
        tracing::trace!(depth, "register context");
        depth
    }

    /// Close the innermost context, which must be at `depth`.
    ///
    /// Returns `None` (and changes nothing) for the root or for any depth
    /// other than the innermost.
    pub fn deregister(&mut self, depth: usize) -> Option<Context> {
        if depth == 0 || depth != self.depth() {
            return None;
        }
        let mut context = self.contexts.pop()?;
        tracing::trace!(depth, call = ?context.function_call_id, "deregister context");
        if context.function_call_id.is_some() {
            return Some(context);
        }
        let merge = self.merge_on_exit;
        let parent = self.current_mut();
        parent.executed.extend(context.executed.iter().copied());
        if merge {
            for (name, var) in context.variables.drain() {
                parent.variables.insert(name, var);
            }
            for (name, funcs) in context.functions.drain() {
                parent.functions.insert(name, funcs);
            }
        }
        Some(context)
    }

    /// Define a variable in the innermost context.
    pub fn define_variable(&mut self, var: DeclaredVariable) -> Result<(), AssignError> {
        let context = self.current_mut();
        if context.variables.contains_key(&var.name) {
            return Err(AssignError::Duplicate { name: var.name });
        }
        context.variables.insert(var.name.clone(), var);
        Ok(())
    }

    /// Define a function in the innermost context.
    pub fn define_function(&mut self, name: &str, func: FunctionRef) -> Result<(), AssignError> {
        let context = self.current_mut();
        if context.functions.contains_key(name) {
            return Err(AssignError::Duplicate {
                name: name.to_string(),
            });
        }
        context.functions.insert(name.to_string(), vec![func]);
        Ok(())
    }

    fn search_depths(&self, search_ancestors: bool) -> impl Iterator<Item = usize> {
        let top = self.depth();
        let bottom = if search_ancestors { 0 } else { top };
        (bottom..=top).rev()
    }

    /// Find a variable, innermost first. Returns the owning depth.
    pub fn get_variable(
        &self,
        name: &str,
        search_ancestors: bool,
    ) -> Option<(usize, &DeclaredVariable)> {
        self.search_depths(search_ancestors)
            .find_map(|depth| self.contexts[depth].variable(name).map(|var| (depth, var)))
    }

    /// Find a function's overload set, innermost first.
    pub fn get_function(&self, name: &str, search_ancestors: bool) -> Option<&[FunctionRef]> {
        self.search_depths(search_ancestors)
            .find_map(|depth| self.contexts[depth].functions.get(name))
            .map(Vec::as_slice)
    }

    /// Assign to an existing variable in whichever context owns it.
    pub fn set_variable(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        let Some((depth, _)) = self.get_variable(name, true) else {
            return Err(AssignError::NotFound {
                name: name.to_string(),
            });
        };
        let Some(var) = self.contexts[depth].variable_mut(name) else {
            return Err(AssignError::NotFound {
                name: name.to_string(),
            });
        };
        check_store(var, &value)?;
        var.value = value;
        Ok(())
    }

    /// Swap the innermost context's binding for `name`. `None` removes it.
    /// Returns the previous binding.
    pub fn replace_variable(
        &mut self,
        name: &str,
        var: Option<DeclaredVariable>,
    ) -> Option<DeclaredVariable> {
        let variables = &mut self.current_mut().variables;
        match var {
            Some(var) => variables.insert(name.to_string(), var),
            None => variables.remove(name),
        }
    }

    /// Bind or rebind a loop variable of the innermost context. Loop
    /// variables are dropped with the context, even in REPL mode.
    pub fn bind_loop_variable(&mut self, var: DeclaredVariable) {
        self.current_mut().loop_variables.insert(var.name.clone(), var);
    }

    pub fn mark_executed(&mut self, node: NodeId) {
        self.current_mut().executed.insert(node);
    }

    /// Whether some statement of `kind` under `stmt` (itself included) ran
    /// in a context at `from_depth` or deeper.
    pub fn has_executed_descendant_of_kind(
        &self,
        from_depth: usize,
        stmt: &Stmt,
        kind: NodeKind,
    ) -> bool {
        let live = self.contexts.get(from_depth..).unwrap_or_default();
        visit::descendant_stmts(stmt)
            .into_iter()
            .filter(|(_, k)| *k == kind)
            .any(|(id, _)| live.iter().any(|ctx| ctx.executed.contains(&id)))
    }
}

/// Constness and declared-type check before overwriting `var`.
pub(crate) fn check_store(var: &DeclaredVariable, value: &Value) -> Result<(), AssignError> {
    if var.is_constant {
        return Err(AssignError::Constant {
            name: var.name.clone(),
        });
    }
    if let (Some(expected), Err(found)) = (
        var.declared_type,
        typecheck::check_assignment(value, var.declared_type),
    ) {
        return Err(AssignError::TypeMismatch {
            expected,
            found: found.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
