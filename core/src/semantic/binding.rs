use serde::{Deserialize, Serialize};

use super::descriptor::{Descriptor, DescriptorId, FunctionDescriptor, ValueParameterDescriptor};
use super::resolved_call::ResolvedCall;
use crate::syntax::NodeId;

/// Compile-time value computed by the frontend for a constant expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantValue {
    String(String),
    Int(i64),
    Double(f64),
    Boolean(bool),
    Null,
}

impl ConstantValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Query interface from syntactic nodes to resolved semantic entities.
pub trait BindingContext {
    fn descriptor(&self, id: DescriptorId) -> Option<&Descriptor>;

    /// Descriptor declared by a function declaration or function literal.
    fn function_descriptor_of(&self, declaration: NodeId) -> Option<DescriptorId>;

    fn resolved_call(&self, call: NodeId) -> Option<&ResolvedCall>;

    fn compile_time_constant(&self, expression: NodeId) -> Option<&ConstantValue>;

    fn function(&self, id: DescriptorId) -> Option<&FunctionDescriptor> {
        match self.descriptor(id) {
            Some(Descriptor::Function(f)) => Some(f),
            _ => None,
        }
    }

    fn value_parameter(&self, id: DescriptorId) -> Option<&ValueParameterDescriptor> {
        match self.descriptor(id) {
            Some(Descriptor::ValueParameter(p)) => Some(p),
            _ => None,
        }
    }
}
