//! Module graph abstraction
//!
//! A model is a tree of modules. Each module owns its direct parameters and
//! its named children; fully-qualified parameter names are built by joining
//! the path with `.` (e.g. `encoder.fc1.lora_A`).

use crate::Tensor;

/// Capability tag of a module
///
/// Replaces a runtime type check: callers ask the module what it is instead
/// of downcasting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Plain module without low-rank adaptation
    Base,
    /// Module carrying LoRA adaptation matrices
    LoRA,
}

/// A node in the module graph
pub trait Module {
    /// Capability tag of this module
    fn kind(&self) -> ModuleKind {
        ModuleKind::Base
    }

    /// Direct parameters of this module (not of its children)
    fn parameters(&self) -> Vec<(&str, &Tensor)>;

    /// Mutable access to the direct parameters of this module
    fn parameters_mut(&mut self) -> Vec<(&str, &mut Tensor)>;

    /// Named direct children
    fn children(&self) -> Vec<(&str, &dyn Module)> {
        Vec::new()
    }

    /// Mutable access to the named direct children
    fn children_mut(&mut self) -> Vec<(&str, &mut dyn Module)> {
        Vec::new()
    }

    /// Bias parameter, for module variants that have one
    fn bias(&self) -> Option<&Tensor> {
        None
    }

    /// Mutable bias parameter, for module variants that have one
    fn bias_mut(&mut self) -> Option<&mut Tensor> {
        None
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// All parameters of the graph with fully-qualified names, in pre-order
pub fn named_parameters(module: &dyn Module) -> Vec<(String, &Tensor)> {
    let mut out = Vec::new();
    collect_parameters("", module, &mut out);
    out
}

fn collect_parameters<'a>(
    prefix: &str,
    module: &'a dyn Module,
    out: &mut Vec<(String, &'a Tensor)>,
) {
    for (name, tensor) in module.parameters() {
        out.push((qualify(prefix, name), tensor));
    }
    for (name, child) in module.children() {
        collect_parameters(&qualify(prefix, name), child, out);
    }
}

/// All modules of the graph with their paths, root first (root path is `""`)
pub fn named_modules(module: &dyn Module) -> Vec<(String, &dyn Module)> {
    let mut out = Vec::new();
    collect_modules(String::new(), module, &mut out);
    out
}

fn collect_modules<'a>(path: String, module: &'a dyn Module, out: &mut Vec<(String, &'a dyn Module)>) {
    let children = module.children();
    let child_paths: Vec<String> = children.iter().map(|(name, _)| qualify(&path, name)).collect();
    out.push((path, module));
    for (child_path, (_, child)) in child_paths.into_iter().zip(children) {
        collect_modules(child_path, child, out);
    }
}

/// Visit every parameter of the graph mutably, with its qualified name
pub fn for_each_parameter_mut<F>(module: &mut dyn Module, mut f: F)
where
    F: FnMut(&str, &mut Tensor),
{
    visit_parameters_mut("", module, &mut f);
}

fn visit_parameters_mut(prefix: &str, module: &mut dyn Module, f: &mut dyn FnMut(&str, &mut Tensor)) {
    for (name, tensor) in module.parameters_mut() {
        f(&qualify(prefix, name), tensor);
    }
    for (name, child) in module.children_mut() {
        let path = qualify(prefix, name);
        visit_parameters_mut(&path, child, f);
    }
}

/// Visit every module of the graph mutably, root first
pub fn for_each_module_mut<F>(module: &mut dyn Module, mut f: F)
where
    F: FnMut(&str, &mut dyn Module),
{
    visit_modules_mut("", module, &mut f);
}

fn visit_modules_mut(path: &str, module: &mut dyn Module, f: &mut dyn FnMut(&str, &mut dyn Module)) {
    f(path, &mut *module);
    for (name, child) in module.children_mut() {
        let child_path = qualify(path, name);
        visit_modules_mut(&child_path, child, f);
    }
}

/// Total number of scalar parameters in the graph
pub fn num_parameters(module: &dyn Module) -> usize {
    named_parameters(module).iter().map(|(_, t)| t.len()).sum()
}

/// Number of scalar parameters with `requires_grad == true`
pub fn num_trainable_parameters(module: &dyn Module) -> usize {
    named_parameters(module)
        .iter()
        .filter(|(_, t)| t.requires_grad())
        .map(|(_, t)| t.len())
        .sum()
}
