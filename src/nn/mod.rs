//! Module graph: named parameters, named children, capability tags
//!
//! Provides the minimal graph the LoRA utilities walk: a [`Module`] trait,
//! a dense [`Linear`] layer and a [`Sequential`] container. The LoRA layer
//! itself lives in [`crate::lora`].

mod linear;
mod module;
mod sequential;

pub use linear::Linear;
pub use module::{
    for_each_module_mut, for_each_parameter_mut, named_modules, named_parameters, num_parameters,
    num_trainable_parameters, Module, ModuleKind,
};
pub use sequential::Sequential;
