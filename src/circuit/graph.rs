//! Circuit graph structure.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;

use super::types::{Module, ModuleId, ModuleKind};
use super::validate::validate_ast;
use crate::dsl::{CircuitAst, DeclaredKind, ModuleDef, BROADCASTER};
use crate::error::{PulseError, Result};

/// A complete module graph ready for simulation.
///
/// Modules live in an arena indexed by [`ModuleId`]; edges are stored as
/// separate forward and backward adjacency lists. The graph is never
/// mutated after construction.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// All modules, declared ones first, then synthesized sinks
    modules: Vec<Module>,

    /// Mapping from module names to module IDs
    module_map: HashMap<String, ModuleId>,

    /// Forward edges in declaration order (duplicates kept)
    outputs: Vec<Vec<ModuleId>>,

    /// Distinct source modules for every module, in arena order
    inputs: Vec<Vec<ModuleId>>,

    /// Entry point
    broadcaster: ModuleId,
}

impl Circuit {
    /// Build a circuit from a parsed AST.
    pub fn from_ast(ast: CircuitAst) -> Result<Self> {
        validate_ast(&ast)?;

        let mut modules = Vec::new();
        let mut module_map = HashMap::new();

        // Declared modules keep their source order
        for def in &ast.modules {
            let id = ModuleId(modules.len());
            module_map.insert(def.name.clone(), id);
            modules.push(Module {
                id,
                name: def.name.clone(),
                kind: def.kind.into(),
            });
        }
        let declared = modules.len();

        // Undeclared destinations become sinks, in order of first mention
        for dest in ast.modules.iter().flat_map(|def| &def.destinations) {
            if !module_map.contains_key(dest) {
                let id = ModuleId(modules.len());
                module_map.insert(dest.clone(), id);
                modules.push(Module {
                    id,
                    name: dest.clone(),
                    kind: ModuleKind::Sink,
                });
            }
        }

        let mut outputs = vec![Vec::new(); modules.len()];
        for (idx, def) in ast.modules.iter().enumerate() {
            outputs[idx] = def
                .destinations
                .iter()
                .map(|dest| {
                    module_map
                        .get(dest)
                        .copied()
                        .ok_or_else(|| PulseError::unknown_module(dest.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
        }

        let broadcaster = module_map
            .get(BROADCASTER)
            .copied()
            .ok_or(PulseError::MissingBroadcaster)?;

        tracing::debug!(
            declared,
            sinks = modules.len() - declared,
            "built circuit graph"
        );

        Ok(Self::with_edges(modules, module_map, outputs, broadcaster))
    }

    /// Assemble a circuit and derive its backward edges.
    fn with_edges(
        modules: Vec<Module>,
        module_map: HashMap<String, ModuleId>,
        outputs: Vec<Vec<ModuleId>>,
        broadcaster: ModuleId,
    ) -> Self {
        let mut inputs: Vec<Vec<ModuleId>> = vec![Vec::new(); modules.len()];
        for (src, dests) in outputs.iter().enumerate() {
            for dest in dests {
                let sources = &mut inputs[dest.0];
                if sources.last() != Some(&ModuleId(src)) {
                    sources.push(ModuleId(src));
                }
            }
        }

        Self {
            modules,
            module_map,
            outputs,
            inputs,
            broadcaster,
        }
    }

    /// The entry-point module.
    pub fn broadcaster(&self) -> &Module {
        &self.modules[self.broadcaster.0]
    }

    /// All modules, declared first then synthesized sinks.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Number of modules, including sinks.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the circuit has no modules (never true for a built circuit).
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Get a module by ID.
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.0)
    }

    /// Find a module ID by name.
    pub fn find_module(&self, name: &str) -> Option<ModuleId> {
        self.module_map.get(name).copied()
    }

    /// Get a module by name.
    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.find_module(name).and_then(|id| self.module(id))
    }

    /// Destinations of a module, in declaration order.
    pub fn outputs(&self, id: ModuleId) -> &[ModuleId] {
        self.outputs.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct modules that send pulses to this module.
    pub fn inputs(&self, id: ModuleId) -> &[ModuleId] {
        self.inputs.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every module that can reach `target` by following edges forward.
    ///
    /// The target itself is included only when it sits on a cycle.
    pub fn predecessors(&self, target: &str) -> Result<IndexSet<ModuleId>> {
        let target = self
            .find_module(target)
            .ok_or_else(|| PulseError::unknown_module(target))?;

        let mut found = IndexSet::new();
        let mut queue: VecDeque<ModuleId> = self.inputs(target).iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            if found.insert(id) {
                queue.extend(self.inputs(id).iter().copied());
            }
        }
        Ok(found)
    }

    /// Names of every module that can reach `target`.
    pub fn predecessor_names(&self, target: &str) -> Result<Vec<&str>> {
        Ok(self
            .predecessors(target)?
            .into_iter()
            .map(|id| self.modules[id.0].name.as_str())
            .collect())
    }

    /// Build a sub-circuit from exactly the named modules.
    ///
    /// Only edges whose two endpoints are both named survive. The result
    /// must still be pressable, so the names have to include the
    /// broadcaster; use [`Circuit::restrict_with_entry`] to add it
    /// implicitly.
    pub fn restrict<I, S>(&self, keep: I) -> Result<Circuit>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = HashSet::new();
        for name in keep {
            let name = name.as_ref();
            let id = self
                .find_module(name)
                .ok_or_else(|| PulseError::unknown_module(name))?;
            kept.insert(id);
        }
        if !kept.contains(&self.broadcaster) {
            return Err(PulseError::MissingBroadcaster);
        }

        // Renumber in arena order so declared modules stay ahead of sinks
        let mut remap = HashMap::with_capacity(kept.len());
        let mut modules = Vec::with_capacity(kept.len());
        let mut module_map = HashMap::with_capacity(kept.len());
        for module in self.modules.iter().filter(|m| kept.contains(&m.id)) {
            let id = ModuleId(modules.len());
            remap.insert(module.id, id);
            module_map.insert(module.name.clone(), id);
            modules.push(Module {
                id,
                name: module.name.clone(),
                kind: module.kind,
            });
        }

        let outputs = self
            .modules
            .iter()
            .filter(|m| kept.contains(&m.id))
            .map(|m| {
                self.outputs(m.id)
                    .iter()
                    .filter_map(|dest| remap.get(dest).copied())
                    .collect()
            })
            .collect();

        let broadcaster = remap[&self.broadcaster];
        tracing::debug!(modules = modules.len(), "restricted circuit graph");

        Ok(Self::with_edges(modules, module_map, outputs, broadcaster))
    }

    /// Build a sub-circuit from the named modules plus the broadcaster.
    ///
    /// Edges from the broadcaster into named modules survive even though
    /// the broadcaster was not named.
    pub fn restrict_with_entry<I, S>(&self, keep: I) -> Result<Circuit>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = keep.into_iter().map(|s| s.as_ref().to_string()).collect();
        names.push(BROADCASTER.to_string());
        self.restrict(names)
    }

    /// Declarations for every non-sink module that still has destinations.
    pub fn to_ast(&self) -> CircuitAst {
        let modules = self
            .modules
            .iter()
            .filter(|m| !self.outputs(m.id).is_empty())
            .filter_map(|m| {
                let kind = match m.kind {
                    ModuleKind::Broadcaster => DeclaredKind::Broadcaster,
                    ModuleKind::FlipFlop => DeclaredKind::FlipFlop,
                    ModuleKind::Conjunction => DeclaredKind::Conjunction,
                    ModuleKind::Sink => return None,
                };
                Some(ModuleDef {
                    kind,
                    name: m.name.clone(),
                    destinations: self
                        .outputs(m.id)
                        .iter()
                        .map(|dest| self.modules[dest.0].name.clone())
                        .collect(),
                    line: 0,
                })
            })
            .collect();
        CircuitAst { modules }
    }

    /// Serialize the declared edges back into DSL text.
    pub fn to_dsl(&self) -> String {
        self.to_ast().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse;

    const SIMPLE: &str = "broadcaster -> a, b, c
%a -> b
%b -> c
%c -> inv
&inv -> a";

    const INTERESTING: &str = "broadcaster -> a
%a -> inv, con
&inv -> b
%b -> con
&con -> output";

    fn build(input: &str) -> Circuit {
        Circuit::from_ast(parse(input).unwrap()).unwrap()
    }

    fn names<'a>(circuit: &'a Circuit, ids: &[ModuleId]) -> Vec<&'a str> {
        ids.iter()
            .map(|id| circuit.module(*id).unwrap().name.as_str())
            .collect()
    }

    #[test]
    fn test_simple_configuration() {
        let circuit = build(SIMPLE);
        let broadcaster = circuit.broadcaster();
        assert_eq!(broadcaster.kind, ModuleKind::Broadcaster);
        assert_eq!(names(&circuit, circuit.outputs(broadcaster.id)), vec!["a", "b", "c"]);
        assert!(circuit.inputs(broadcaster.id).is_empty());

        let c = circuit.find_module("c").unwrap();
        assert_eq!(circuit.module(c).unwrap().kind, ModuleKind::FlipFlop);
        assert_eq!(names(&circuit, circuit.outputs(c)), vec!["inv"]);
        assert_eq!(names(&circuit, circuit.inputs(c)), vec!["broadcaster", "b"]);

        let inv = circuit.find_module("inv").unwrap();
        assert_eq!(circuit.module(inv).unwrap().kind, ModuleKind::Conjunction);
        assert_eq!(names(&circuit, circuit.outputs(inv)), vec!["a"]);
        assert_eq!(names(&circuit, circuit.inputs(inv)), vec!["c"]);

        let a = circuit.find_module("a").unwrap();
        assert_eq!(names(&circuit, circuit.inputs(a)), vec!["broadcaster", "inv"]);
    }

    #[test]
    fn test_sinks_are_synthesized() {
        let circuit = build(INTERESTING);
        let output = circuit.module_by_name("output").unwrap();
        assert!(output.is_sink());
        assert!(circuit.outputs(output.id).is_empty());
        assert_eq!(names(&circuit, circuit.inputs(output.id)), vec!["con"]);
        assert_eq!(circuit.len(), 6);
    }

    #[test]
    fn test_duplicate_edges_preserved() {
        let circuit = build("broadcaster -> a, a\n%a -> out");
        let b = circuit.broadcaster().id;
        assert_eq!(circuit.outputs(b).len(), 2);
        let a = circuit.find_module("a").unwrap();
        assert_eq!(circuit.inputs(a).len(), 1);
    }

    #[test]
    fn test_unprefixed_broadcaster_required() {
        let err = Circuit::from_ast(parse("%a -> b").unwrap()).unwrap_err();
        assert!(matches!(err, PulseError::MissingBroadcaster));
    }

    #[test]
    fn test_predecessors() {
        let circuit = build(INTERESTING);
        let mut found = circuit.predecessor_names("output").unwrap();
        found.sort();
        assert_eq!(found, vec!["a", "b", "broadcaster", "con", "inv"]);

        // Only modules on a cycle reach themselves
        let found = circuit.predecessor_names("broadcaster").unwrap();
        assert!(found.is_empty());

        assert!(matches!(
            circuit.predecessors("nope"),
            Err(PulseError::UnknownModule { .. })
        ));
    }

    #[test]
    fn test_predecessors_include_cycle_members() {
        let circuit = build(SIMPLE);
        let found = circuit.predecessor_names("a").unwrap();
        assert!(found.contains(&"a"));
        assert!(found.contains(&"inv"));
    }

    #[test]
    fn test_restrict_drops_external_edges() {
        let circuit = build(INTERESTING);
        let sub = circuit.restrict(["broadcaster", "a", "inv", "b"]).unwrap();
        assert_eq!(sub.len(), 4);
        assert!(sub.find_module("con").is_none());

        let a = sub.find_module("a").unwrap();
        assert_eq!(names(&sub, sub.outputs(a)), vec!["inv"]);
        let b = sub.find_module("b").unwrap();
        assert!(sub.outputs(b).is_empty());
        assert_eq!(names(&sub, sub.inputs(b)), vec!["inv"]);

        // The full circuit is untouched
        let a = circuit.find_module("a").unwrap();
        assert_eq!(names(&circuit, circuit.outputs(a)), vec!["inv", "con"]);
    }

    #[test]
    fn test_restrict_requires_broadcaster() {
        let circuit = build(INTERESTING);
        assert!(matches!(
            circuit.restrict(["a", "inv", "b"]),
            Err(PulseError::MissingBroadcaster)
        ));
    }

    #[test]
    fn test_restrict_with_entry_keeps_broadcaster_edges() {
        let circuit = build(INTERESTING);
        let sub = circuit.restrict_with_entry(["a", "inv"]).unwrap();
        assert_eq!(sub.len(), 3);
        assert_eq!(names(&sub, sub.outputs(sub.broadcaster().id)), vec!["a"]);
        let a = sub.find_module("a").unwrap();
        assert_eq!(names(&sub, sub.inputs(a)), vec!["broadcaster"]);
        let inv = sub.find_module("inv").unwrap();
        assert!(sub.outputs(inv).is_empty());
    }

    #[test]
    fn test_to_dsl_skips_sinks_and_emptied_modules() {
        let circuit = build(INTERESTING);
        let sub = circuit.restrict_with_entry(["a", "inv", "output"]).unwrap();
        assert_eq!(sub.to_dsl(), "broadcaster -> a\n%a -> inv");
    }

    #[test]
    fn test_restrict_unknown_module() {
        let circuit = build(SIMPLE);
        assert!(matches!(
            circuit.restrict(["zz"]),
            Err(PulseError::UnknownModule { .. })
        ));
    }

    #[test]
    fn test_round_trip() {
        let circuit = build(INTERESTING);
        assert_eq!(circuit.to_dsl(), INTERESTING);

        let reparsed = build(&circuit.to_dsl());
        for module in circuit.modules() {
            let other = reparsed.find_module(&module.name).unwrap();
            assert_eq!(
                names(&circuit, circuit.outputs(module.id)),
                names(&reparsed, reparsed.outputs(other))
            );
        }
    }
}
