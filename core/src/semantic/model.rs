//! file: core/src/semantic/model.rs
//! description: in-memory semantic model and a builder to populate it.
//!
//! `SemanticModel` is the binding context the driver and the tests use. A
//! real frontend implements `BindingContext` over its own tables; this one is
//! plain maps and can be loaded from JSON together with a translation unit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::binding::{BindingContext, ConstantValue};
use super::descriptor::{
    Descriptor, DescriptorId, FunctionDescriptor, KotlinType, ReceiverParameterDescriptor,
    ValueParameterDescriptor, VariableDescriptor,
};
use super::resolved_call::ResolvedCall;
use crate::syntax::NodeId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticModel {
    #[serde(default)]
    pub descriptors: HashMap<DescriptorId, Descriptor>,
    /// Declaration node -> declared function descriptor.
    #[serde(default)]
    pub declarations: HashMap<NodeId, DescriptorId>,
    #[serde(default)]
    pub resolved_calls: HashMap<NodeId, ResolvedCall>,
    #[serde(default)]
    pub constants: HashMap<NodeId, ConstantValue>,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every cross reference points at a descriptor of the right kind.
    pub fn validate(&self) -> Result<(), String> {
        for (id, descriptor) in &self.descriptors {
            match descriptor {
                Descriptor::Function(f) => {
                    for param in &f.value_parameters {
                        if self.value_parameter(*param).is_none() {
                            return Err(format!(
                                "function '{}' ({}) lists {} which is not a value parameter",
                                f.name, id, param
                            ));
                        }
                    }
                    if let Some(receiver) = f.extension_receiver {
                        if !matches!(self.descriptors.get(&receiver), Some(Descriptor::Receiver(_))) {
                            return Err(format!(
                                "function '{}' ({}) has receiver {} which is not a receiver parameter",
                                f.name, id, receiver
                            ));
                        }
                    }
                }
                Descriptor::ValueParameter(p) => {
                    if self.function(p.containing_declaration).is_none() {
                        return Err(format!(
                            "parameter '{}' ({}) is not contained in a function",
                            p.name, id
                        ));
                    }
                }
                Descriptor::Receiver(_) | Descriptor::Variable(_) => {}
            }
        }
        for (node, descriptor) in &self.declarations {
            if self.function(*descriptor).is_none() {
                return Err(format!("declaration {} is bound to non-function {}", node, descriptor));
            }
        }
        for (node, call) in &self.resolved_calls {
            let ids = [Some(call.candidate_descriptor()), call.variable_descriptor()];
            for id in ids.into_iter().flatten() {
                if !self.descriptors.contains_key(&id) {
                    return Err(format!("call {} resolves to unknown descriptor {}", node, id));
                }
            }
        }
        Ok(())
    }
}

impl BindingContext for SemanticModel {
    fn descriptor(&self, id: DescriptorId) -> Option<&Descriptor> {
        self.descriptors.get(&id)
    }

    fn function_descriptor_of(&self, declaration: NodeId) -> Option<DescriptorId> {
        self.declarations.get(&declaration).copied()
    }

    fn resolved_call(&self, call: NodeId) -> Option<&ResolvedCall> {
        self.resolved_calls.get(&call)
    }

    fn compile_time_constant(&self, expression: NodeId) -> Option<&ConstantValue> {
        self.constants.get(&expression)
    }
}

/// Incrementally assembles a `SemanticModel`, handing out fresh descriptor
/// and node ids.
#[derive(Debug)]
pub struct ModelBuilder {
    model: SemanticModel,
    next_descriptor: DescriptorId,
    next_node: NodeId,
}

impl ModelBuilder {
    pub fn new() -> Self {
        ModelBuilder { model: SemanticModel::new(), next_descriptor: 1, next_node: 1 }
    }

    fn alloc_descriptor(&mut self) -> DescriptorId {
        let id = self.next_descriptor;
        self.next_descriptor += 1;
        id
    }

    pub fn next_node_id(&mut self) -> NodeId {
        let id = self.next_node;
        self.next_node += 1;
        id
    }

    pub fn declare_function(&mut self, descriptor: FunctionDescriptor) -> DescriptorId {
        let id = self.alloc_descriptor();
        self.model.descriptors.insert(id, Descriptor::Function(descriptor));
        id
    }

    /// Append a value parameter to `function`, fixing up its index and owner.
    pub fn add_parameter(
        &mut self,
        function: DescriptorId,
        mut parameter: ValueParameterDescriptor,
    ) -> DescriptorId {
        let id = self.alloc_descriptor();
        parameter.containing_declaration = function;
        if let Some(Descriptor::Function(f)) = self.model.descriptors.get_mut(&function) {
            parameter.index = f.value_parameters.len();
            f.value_parameters.push(id);
        }
        self.model.descriptors.insert(id, Descriptor::ValueParameter(parameter));
        id
    }

    /// Turn `function` into an extension of `receiver_type`.
    pub fn add_extension_receiver(&mut self, function: DescriptorId, receiver_type: KotlinType) -> DescriptorId {
        let id = self.alloc_descriptor();
        if let Some(Descriptor::Function(f)) = self.model.descriptors.get_mut(&function) {
            f.extension_receiver = Some(id);
        }
        self.model.descriptors.insert(
            id,
            Descriptor::Receiver(ReceiverParameterDescriptor { ty: receiver_type, containing_declaration: function }),
        );
        id
    }

    pub fn declare_variable(&mut self, descriptor: VariableDescriptor) -> DescriptorId {
        let id = self.alloc_descriptor();
        self.model.descriptors.insert(id, Descriptor::Variable(descriptor));
        id
    }

    pub fn bind_declaration(&mut self, node: NodeId, function: DescriptorId) {
        self.model.declarations.insert(node, function);
    }

    pub fn bind_call(&mut self, node: NodeId, call: ResolvedCall) {
        self.model.resolved_calls.insert(node, call);
    }

    pub fn bind_constant(&mut self, node: NodeId, value: ConstantValue) {
        self.model.constants.insert(node, value);
    }

    pub fn model(&self) -> &SemanticModel {
        &self.model
    }

    pub fn build(self) -> SemanticModel {
        self.model
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
