//! file: core/src/semantic/descriptor.rs
//! description: resolved declarations handed over by the frontend.
//!
//! Descriptors are produced by name resolution and type checking. The
//! lowering never creates or mutates them; it only queries visibility,
//! modality, inline kind, parameters and receivers.

use serde::{Deserialize, Serialize};

/// Identifier of a descriptor inside a `SemanticModel`.
pub type DescriptorId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Abstract,
    Open,
    #[default]
    Final,
}

impl Modality {
    pub fn is_overridable(&self) -> bool {
        matches!(self, Modality::Abstract | Modality::Open)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineKind {
    #[default]
    NotInline,
    Inline,
    InlineOnly,
    CrossInline,
}

impl InlineKind {
    /// True for `inline` and every stronger kind.
    pub fn is_inline(&self) -> bool {
        !matches!(self, InlineKind::NotInline)
    }
}

/// Distinguishes plain functions from the other callables a call may resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    Simple,
    Constructor,
    PropertyAccessor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Function,
    ExtensionFunction,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KotlinType {
    pub fq_name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub nullable: bool,
}

impl KotlinType {
    pub fn class(fq_name: impl Into<String>) -> Self {
        KotlinType { fq_name: fq_name.into(), kind: TypeKind::Class, nullable: false }
    }

    /// `kotlin.FunctionN` for a lambda taking `arity` parameters.
    pub fn function(arity: usize) -> Self {
        KotlinType { fq_name: format!("kotlin.Function{}", arity), kind: TypeKind::Function, nullable: false }
    }

    /// `kotlin.ExtensionFunctionN` for a lambda with receiver taking `arity` parameters.
    pub fn extension_function(arity: usize) -> Self {
        KotlinType {
            fq_name: format!("kotlin.ExtensionFunction{}", arity),
            kind: TypeKind::ExtensionFunction,
            nullable: false,
        }
    }

    pub fn string() -> Self {
        Self::class("kotlin.String")
    }

    pub fn int() -> Self {
        Self::class("kotlin.Int")
    }

    pub fn unit() -> Self {
        Self::class("kotlin.Unit")
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn is_function_or_extension_function_type(&self) -> bool {
        matches!(self.kind, TypeKind::Function | TypeKind::ExtensionFunction)
    }

    pub fn is_string(&self) -> bool {
        self.kind == TypeKind::Class && self.fq_name == "kotlin.String"
    }

    pub fn is_unit(&self) -> bool {
        self.kind == TypeKind::Class && self.fq_name == "kotlin.Unit"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    /// Fully qualified name, e.g. `kotlin.js.js`. Defaults to `name`.
    #[serde(default)]
    pub fq_name: String,
    /// Serialized as `function_kind`; `kind` is the descriptor tag.
    #[serde(default, rename = "function_kind")]
    pub kind: FunctionKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modality: Modality,
    #[serde(default)]
    pub inline_kind: InlineKind,
    #[serde(default)]
    pub value_parameters: Vec<DescriptorId>,
    #[serde(default)]
    pub extension_receiver: Option<DescriptorId>,
    #[serde(default)]
    pub return_type: Option<KotlinType>,
    #[serde(default)]
    pub containing_declaration: Option<DescriptorId>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        FunctionDescriptor {
            fq_name: name.clone(),
            name,
            kind: FunctionKind::Simple,
            visibility: Visibility::Public,
            modality: Modality::Final,
            inline_kind: InlineKind::NotInline,
            value_parameters: Vec::new(),
            extension_receiver: None,
            return_type: None,
            containing_declaration: None,
        }
    }

    pub fn with_fq_name(mut self, fq_name: impl Into<String>) -> Self {
        self.fq_name = fq_name.into();
        self
    }

    pub fn with_kind(mut self, kind: FunctionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_inline_kind(mut self, inline_kind: InlineKind) -> Self {
        self.inline_kind = inline_kind;
        self
    }

    pub fn with_return_type(mut self, return_type: KotlinType) -> Self {
        self.return_type = Some(return_type);
        self
    }

    /// `fq_name`, falling back to the simple name when the frontend left it out.
    pub fn qualified_name(&self) -> &str {
        if self.fq_name.is_empty() { &self.name } else { &self.fq_name }
    }

    pub fn is_extension(&self) -> bool {
        self.extension_receiver.is_some()
    }

    pub fn returns_unit(&self) -> bool {
        self.return_type.as_ref().is_some_and(KotlinType::is_unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: KotlinType,
    #[serde(default)]
    pub has_default_value: bool,
    #[serde(default)]
    pub noinline: bool,
    #[serde(default)]
    pub index: usize,
    pub containing_declaration: DescriptorId,
}

impl ValueParameterDescriptor {
    /// The containing declaration and index are filled in when the parameter
    /// is attached to its function (see `ModelBuilder::add_parameter`).
    pub fn new(name: impl Into<String>, ty: KotlinType) -> Self {
        ValueParameterDescriptor {
            name: name.into(),
            ty,
            has_default_value: false,
            noinline: false,
            index: 0,
            containing_declaration: 0,
        }
    }

    pub fn with_default_value(mut self) -> Self {
        self.has_default_value = true;
        self
    }

    pub fn noinline(mut self) -> Self {
        self.noinline = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverParameterDescriptor {
    #[serde(rename = "type")]
    pub ty: KotlinType,
    pub containing_declaration: DescriptorId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: KotlinType,
    #[serde(default)]
    pub containing_declaration: Option<DescriptorId>,
}

impl VariableDescriptor {
    pub fn new(name: impl Into<String>, ty: KotlinType) -> Self {
        VariableDescriptor { name: name.into(), ty, containing_declaration: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    Function(FunctionDescriptor),
    ValueParameter(ValueParameterDescriptor),
    Receiver(ReceiverParameterDescriptor),
    Variable(VariableDescriptor),
}

impl Descriptor {
    /// Source name of the declaration; receivers are anonymous.
    pub fn name(&self) -> Option<&str> {
        match self {
            Descriptor::Function(f) => Some(&f.name),
            Descriptor::ValueParameter(p) => Some(&p.name),
            Descriptor::Variable(v) => Some(&v.name),
            Descriptor::Receiver(_) => None,
        }
    }

    pub fn containing_declaration(&self) -> Option<DescriptorId> {
        match self {
            Descriptor::Function(f) => f.containing_declaration,
            Descriptor::ValueParameter(p) => Some(p.containing_declaration),
            Descriptor::Receiver(r) => Some(r.containing_declaration),
            Descriptor::Variable(v) => v.containing_declaration,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Descriptor::Function(_) => "function",
            Descriptor::ValueParameter(_) => "value parameter",
            Descriptor::Receiver(_) => "receiver",
            Descriptor::Variable(_) => "variable",
        }
    }
}

impl std::fmt::Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} '{}'", self.kind_name(), name),
            None => write!(f, "{}", self.kind_name()),
        }
    }
}
