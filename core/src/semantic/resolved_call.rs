use serde::{Deserialize, Serialize};

use super::descriptor::DescriptorId;

/// Result of call resolution for a single call expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedCall {
    /// A call whose callee is a function (or a callable variable invoked directly).
    Simple {
        candidate: DescriptorId,
        /// Substituted descriptor; the candidate itself when absent.
        #[serde(default)]
        resulting: Option<DescriptorId>,
    },
    /// `f()` where `f` is a variable or parameter of function type: the
    /// variable is read, then its `invoke` is called.
    VariableAsFunction {
        variable: DescriptorId,
        invoke: DescriptorId,
    },
}

impl ResolvedCall {
    pub fn simple(candidate: DescriptorId) -> Self {
        ResolvedCall::Simple { candidate, resulting: None }
    }

    pub fn variable_as_function(variable: DescriptorId, invoke: DescriptorId) -> Self {
        ResolvedCall::VariableAsFunction { variable, invoke }
    }

    /// Descriptor of the function-call part.
    pub fn candidate_descriptor(&self) -> DescriptorId {
        match self {
            ResolvedCall::Simple { candidate, .. } => *candidate,
            ResolvedCall::VariableAsFunction { invoke, .. } => *invoke,
        }
    }

    pub fn resulting_descriptor(&self) -> DescriptorId {
        match self {
            ResolvedCall::Simple { candidate, resulting } => resulting.unwrap_or(*candidate),
            ResolvedCall::VariableAsFunction { invoke, .. } => *invoke,
        }
    }

    pub fn variable_descriptor(&self) -> Option<DescriptorId> {
        match self {
            ResolvedCall::VariableAsFunction { variable, .. } => Some(*variable),
            ResolvedCall::Simple { .. } => None,
        }
    }

    /// The semantic callee: the variable side of a variable-as-function call,
    /// the candidate otherwise.
    pub fn semantic_callee(&self) -> DescriptorId {
        match self {
            ResolvedCall::Simple { candidate, .. } => *candidate,
            ResolvedCall::VariableAsFunction { variable, .. } => *variable,
        }
    }
}
