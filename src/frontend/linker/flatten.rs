//! Pass 3: contract inheritance flattening.

use super::*;
use crate::frontend::diagnostics::errors;

impl Linker<'_> {
    /// Give every contract of the package copies of its inherited methods.
    ///
    /// Inherited methods take the lowest ids, base by base in declaration order; the contract's
    /// own methods follow. A contract is flattened once; shared bases are not processed again.
    ///
    /// ## Errors
    /// - `CircularInheritance` when a contract (indirectly) inherits from itself.
    /// - `NotAContract` when a base resolves to something else.
    /// - `DuplicateMethod` when an inherited method name is already taken.
    pub fn flatten_contracts(&mut self) -> Result<(), CompileError> {
        let mut stack = Vec::new();
        for ty in self.types() {
            if self.ast.as_contract(ty).is_some() {
                self.unwind(ty, &mut stack)?;
            }
        }
        Ok(())
    }

    fn unwind(&mut self, contract: NodeId, stack: &mut Vec<NodeId>) -> Result<(), CompileError> {
        let Some(decl) = self.ast.as_contract(contract) else {
            return Ok(());
        };
        if decl.flattened {
            return Ok(());
        }
        if let Some(start) = stack.iter().position(|&c| c == contract) {
            let chain: Vec<String> = stack[start..]
                .iter()
                .chain(std::iter::once(&contract))
                .map(|&c| self.ast.name(c).to_string())
                .collect();
            return Err(errors::circular_inheritance(self.ast.position(contract).clone(), &chain));
        }

        let mut bases = Vec::with_capacity(decl.bases.len());
        for &base_ref in &decl.bases {
            let position = self.ast.position(base_ref).clone();
            let Some(target) = self.ast.as_type_ref(base_ref).and_then(|r| r.target) else {
                return Err(errors::unknown_type(position, self.ast.name(base_ref)));
            };
            if self.ast.as_contract(target).is_none() {
                return Err(errors::not_a_contract(position, self.ast.name(base_ref)));
            }
            bases.push(target);
        }

        stack.push(contract);
        for &base in &bases {
            self.unwind(base, stack)?;
        }
        stack.pop();

        let method_count = |ast: &Ast, c: NodeId| ast.as_contract(c).map_or(0, |c| c.methods.len());
        let inherited: usize = bases.iter().map(|&b| method_count(&*self.ast, b)).sum();
        let own: Vec<NodeId> = self
            .ast
            .as_contract(contract)
            .map(|c| c.methods.values().copied().collect())
            .unwrap_or_default();
        if inherited + own.len() > usize::from(u16::MAX) {
            return Err(errors::too_many(self.ast.position(contract).clone(), "methods"));
        }

        for &method in &own {
            if let Some(method) = self.ast.as_method_mut(method) {
                method.id += inherited as u16;
            }
        }

        let mut offset = 0u16;
        for &base in &bases {
            let methods: Vec<(String, NodeId)> = self
                .ast
                .as_contract(base)
                .map(|c| c.methods.iter().map(|(name, &m)| (name.clone(), m)).collect())
                .unwrap_or_default();
            for (name, method) in &methods {
                let existing = self.ast.as_contract(contract).and_then(|c| c.methods.get(name)).copied();
                if let Some(existing) = existing {
                    return Err(errors::duplicate_inherited_method(
                        self.ast.position(*method).clone(),
                        name,
                        self.ast.position(existing),
                    ));
                }
                let id = self.ast.as_method(*method).map_or(0, |m| m.id) + offset;
                self.ast.clone_method(*method, contract, id);
            }
            offset += methods.len() as u16;
        }

        if let Some(decl) = self.ast.as_contract_mut(contract) {
            decl.flattened = true;
        }
        tracing::debug!(
            contract = self.ast.name(contract),
            inherited,
            own = own.len(),
            "flattened contract"
        );
        Ok(())
    }
}
