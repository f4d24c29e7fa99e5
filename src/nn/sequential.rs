//! Named container of child modules

use super::module::Module;
use crate::Tensor;

/// Ordered container of uniquely named child modules
///
/// Holds no parameters of its own; its children's parameters are reported
/// under `<child_name>.<param_name>`.
#[derive(Default)]
pub struct Sequential {
    modules: Vec<(String, Box<dyn Module>)>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Sequential::insert`]
    pub fn add(mut self, name: impl Into<String>, module: impl Module + 'static) -> Self {
        self.insert(name, Box::new(module));
        self
    }

    /// Add a child, replacing any existing child with the same name in place
    pub fn insert(&mut self, name: impl Into<String>, module: Box<dyn Module>) {
        let name = name.into();
        match self.modules.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = module,
            None => self.modules.push((name, module)),
        }
    }

    /// Look up a direct child by name
    pub fn get(&self, name: &str) -> Option<&dyn Module> {
        self.modules.iter().find(|(n, _)| n == name).map(|(_, m)| &**m as &dyn Module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Module for Sequential {
    fn parameters(&self) -> Vec<(&str, &Tensor)> {
        Vec::new()
    }

    fn parameters_mut(&mut self) -> Vec<(&str, &mut Tensor)> {
        Vec::new()
    }

    fn children(&self) -> Vec<(&str, &dyn Module)> {
        let mut children: Vec<(&str, &dyn Module)> = Vec::with_capacity(self.modules.len());
        for (name, module) in &self.modules {
            children.push((name.as_str(), &**module));
        }
        children
    }

    fn children_mut(&mut self) -> Vec<(&str, &mut dyn Module)> {
        let mut children: Vec<(&str, &mut dyn Module)> = Vec::with_capacity(self.modules.len());
        for (name, module) in &mut self.modules {
            children.push((name.as_str(), &mut **module));
        }
        children
    }
}
