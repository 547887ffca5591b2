//! file: core/src/translate/context.rs
//! description: state threaded through every lowering.
//!
//! A `TranslationContext` is cheap to clone. Clones and inner contexts share
//! the per-translation static part (binding context, configuration, program,
//! name and function-object tables) and differ only in their current scope
//! and aliasing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use super::aliasing::AliasingContext;
use super::err::{TranslationError, TranslationErrorKind, TranslationResult};
use crate::config::TranslationConfig;
use crate::js::ast::{JsExpression, JsFunction, JsFunctionRef, JsName};
use crate::js::program::JsProgram;
use crate::js::scope::JsScope;
use crate::semantic::{BindingContext, Descriptor, DescriptorId, FunctionDescriptor};

struct StaticContext<'a> {
    binding: &'a dyn BindingContext,
    config: TranslationConfig,
    program: JsProgram,
    names: RefCell<HashMap<DescriptorId, JsName>>,
    function_objects: RefCell<HashMap<DescriptorId, JsFunctionRef>>,
}

#[derive(Clone)]
pub struct TranslationContext<'a> {
    statics: Rc<StaticContext<'a>>,
    scope: JsScope,
    aliasing: AliasingContext,
}

impl<'a> TranslationContext<'a> {
    pub fn new(binding: &'a dyn BindingContext, config: TranslationConfig) -> Self {
        let program = JsProgram::new(&config.module_name);
        let scope = program.root_scope().clone();
        TranslationContext {
            statics: Rc::new(StaticContext {
                binding,
                config,
                program,
                names: RefCell::new(HashMap::new()),
                function_objects: RefCell::new(HashMap::new()),
            }),
            scope,
            aliasing: AliasingContext::root(),
        }
    }

    pub fn binding_context(&self) -> &'a dyn BindingContext {
        self.statics.binding
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.statics.config
    }

    pub fn program(&self) -> &JsProgram {
        &self.statics.program
    }

    pub fn scope(&self) -> &JsScope {
        &self.scope
    }

    pub fn aliasing(&self) -> &AliasingContext {
        &self.aliasing
    }

    /// Context for translating the body of `function`: its scope, plus
    /// `aliasing` when given (the current aliasing otherwise).
    pub fn new_function_body(&self, function: &JsFunctionRef, aliasing: Option<AliasingContext>) -> Self {
        TranslationContext {
            statics: Rc::clone(&self.statics),
            scope: function.borrow().scope().clone(),
            aliasing: aliasing.unwrap_or_else(|| self.aliasing.clone()),
        }
    }

    pub fn descriptor(&self, id: DescriptorId) -> TranslationResult<&'a Descriptor> {
        self.binding_context().descriptor(id).ok_or_else(|| {
            TranslationError::new(
                TranslationErrorKind::MissingDescriptor,
                format!("No descriptor with id {} in the binding context.", id),
                "lowerjs.translate.context.descriptor",
            )
        })
    }

    pub fn function_descriptor(&self, id: DescriptorId) -> TranslationResult<&'a FunctionDescriptor> {
        match self.descriptor(id)? {
            Descriptor::Function(f) => Ok(f),
            other => Err(TranslationError::new(
                TranslationErrorKind::MissingDescriptor,
                format!("Descriptor {} is a {}, expected a function.", id, other.kind_name()),
                "lowerjs.translate.context.function_descriptor",
            )),
        }
    }

    /// Target name of a declaration. Names are assigned on first request and
    /// stay fixed for the rest of the translation.
    pub fn name_for_descriptor(&self, id: DescriptorId) -> TranslationResult<JsName> {
        if let Some(name) = self.statics.names.borrow().get(&id) {
            return Ok(name.clone());
        }
        let name = match self.descriptor(id)? {
            // Parameters belong to the scope of their function object.
            Descriptor::ValueParameter(p) => {
                let function = self.function_object(p.containing_declaration)?;
                let scope = function.borrow().scope().clone();
                scope.declare_fresh_name(&p.name)
            }
            Descriptor::Function(f) => self.program().root_scope().declare_fresh_name(&f.name),
            Descriptor::Variable(v) => self.scope.declare_fresh_name(&v.name),
            Descriptor::Receiver(_) => self.scope.declare_fresh_name("receiver"),
        };
        trace!("descriptor {} named '{}'", id, name);
        self.statics.names.borrow_mut().insert(id, name.clone());
        Ok(name)
    }

    /// The function object lowered for `id`, created with a child of the
    /// current scope on first request.
    pub fn function_object(&self, id: DescriptorId) -> TranslationResult<JsFunctionRef> {
        if let Some(function) = self.statics.function_objects.borrow().get(&id) {
            return Ok(Rc::clone(function));
        }
        let descriptor = self.function_descriptor(id)?;
        let function = JsFunction::new(self.scope.inner(format!("function {}", descriptor.name))).into_ref();
        self.statics.function_objects.borrow_mut().insert(id, Rc::clone(&function));
        Ok(function)
    }

    /// Expression reading the declaration `id`: its alias when one is in
    /// effect, its name otherwise.
    pub fn get_reference(&self, id: DescriptorId) -> TranslationResult<JsExpression> {
        if let Some(alias) = self.aliasing.alias_for(id) {
            return Ok(alias.clone());
        }
        Ok(JsExpression::name_ref(&self.name_for_descriptor(id)?))
    }
}
