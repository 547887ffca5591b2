//! Semantic model consumed by the lowering: descriptors, resolved calls and
//! the binding context that maps syntax to them.

pub mod binding;
pub mod descriptor;
pub mod model;
pub mod resolved_call;

pub use binding::{BindingContext, ConstantValue};
pub use descriptor::{
    Descriptor, DescriptorId, FunctionDescriptor, FunctionKind, InlineKind, KotlinType, Modality,
    ReceiverParameterDescriptor, TypeKind, ValueParameterDescriptor, VariableDescriptor, Visibility,
};
pub use model::{ModelBuilder, SemanticModel};
pub use resolved_call::ResolvedCall;
