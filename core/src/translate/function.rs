//! file: core/src/translate/function.rs
//! description: lowering of function declarations into function objects.
//!
//! `FunctionLowering` installs parameters, body and inline markers on the
//! function object the context hands out for a descriptor. The object is
//! lowered at most once; a second attempt is a caller error.

use log::debug;

use super::body;
use super::call;
use super::context::TranslationContext;
use super::err::{TranslationError, TranslationErrorKind, TranslationResult};
use super::namer;
use crate::config::EcmaVersion;
use crate::js::ast::{JsExpression, JsFunctionRef, JsName, JsNameRef, JsObjectLiteral, JsParameter, JsPropertyInitializer};
use crate::js::metadata::{self, InlineStrategy};
use crate::semantic::{DescriptorId, FunctionDescriptor, Modality, Visibility};
use crate::syntax::FunctionDeclaration;

pub struct FunctionLowering<'d, 'a> {
    declaration: &'d FunctionDeclaration,
    descriptor_id: DescriptorId,
    descriptor: &'a FunctionDescriptor,
    context: TranslationContext<'a>,
    function_object: JsFunctionRef,
    receiver_name: Option<JsName>,
    body_context: TranslationContext<'a>,
}

impl<'d, 'a> FunctionLowering<'d, 'a> {
    pub fn new(declaration: &'d FunctionDeclaration, context: &TranslationContext<'a>) -> TranslationResult<Self> {
        let descriptor_id = context.binding_context().function_descriptor_of(declaration.id).ok_or_else(|| {
            TranslationError::new(
                TranslationErrorKind::MissingDescriptor,
                format!("Declaration '{}' ({}) has no function descriptor.", declaration.name, declaration.id),
                "lowerjs.translate.function.new",
            )
        })?;
        let descriptor = context.function_descriptor(descriptor_id)?;
        let function_object = context.function_object(descriptor_id)?;
        if !function_object.borrow().parameters().is_empty() {
            return Err(TranslationError::new(
                TranslationErrorKind::FunctionLoweredTwice,
                format!("Function {} processed for the second time.", declaration.name),
                "lowerjs.translate.function.new",
            ));
        }

        // The body context must be fixed before anything is translated.
        let is_extension = descriptor.is_extension() && !declaration.is_function_literal();
        let (receiver_name, aliasing) = match descriptor.extension_receiver {
            Some(receiver) if is_extension => {
                let name = function_object.borrow().scope().declare_name(namer::receiver_parameter_name());
                let aliasing = context.aliasing().inner(receiver, JsExpression::name_ref(&name));
                (Some(name), Some(aliasing))
            }
            _ => (None, None),
        };
        let body_context = context.new_function_body(&function_object, aliasing);
        debug!("lowering {} (extension: {})", declaration.name, receiver_name.is_some());

        Ok(FunctionLowering {
            declaration,
            descriptor_id,
            descriptor,
            context: context.clone(),
            function_object,
            receiver_name,
            body_context,
        })
    }

    /// Lower into a `name: { value: function, ... }` ECMAScript 5 property
    /// descriptor entry.
    pub fn lower_as_property_descriptor(self) -> TranslationResult<JsPropertyInitializer> {
        if self.context.config().ecma_version == EcmaVersion::Ecma3 {
            return Err(TranslationError::new(
                TranslationErrorKind::Unsupported,
                format!("Property descriptor for {} requires ECMAScript 5.", self.declaration.name),
                "lowerjs.translate.function.lower_as_property_descriptor",
            ));
        }
        let name = self.context.name_for_descriptor(self.descriptor_id)?;
        self.generate_function_object()?;

        let mut data_descriptor = JsObjectLiteral::new();
        data_descriptor.push("value", JsExpression::Function(self.function_object.clone()));
        if self.descriptor.modality.is_overridable() {
            data_descriptor.push("writable", JsExpression::Boolean(true));
        }
        if self.context.config().enumerable_descriptors {
            data_descriptor.push("enumerable", JsExpression::Boolean(true));
        }
        Ok(JsPropertyInitializer::new(JsExpression::name_ref(&name), JsExpression::Object(data_descriptor)))
    }

    /// Lower into a `name: function` entry.
    pub fn lower_as_method(self) -> TranslationResult<JsPropertyInitializer> {
        let name = self.context.name_for_descriptor(self.descriptor_id)?;
        self.generate_function_object()?;
        Ok(JsPropertyInitializer::new(JsExpression::name_ref(&name), JsExpression::Function(self.function_object)))
    }

    /// Lower and hand back the bare function object (function literals).
    pub fn lower_function_object(self) -> TranslationResult<JsFunctionRef> {
        self.generate_function_object()?;
        Ok(self.function_object)
    }

    fn generate_function_object(&self) -> TranslationResult<()> {
        let parameters = self.translate_parameters()?;
        self.function_object.borrow_mut().set_parameters(parameters);
        self.translate_body()?;
        self.add_inline_metadata_if_needed()
    }

    fn translate_body(&self) -> TranslationResult<()> {
        let abstract_function = self.descriptor.modality == Modality::Abstract;
        if !self.declaration.has_body() {
            if !abstract_function {
                return Err(TranslationError::new(
                    TranslationErrorKind::MissingBody,
                    format!("Function {} has no body but is not abstract.", self.declaration.name),
                    "lowerjs.translate.function.translate_body",
                ));
            }
            return Ok(());
        }
        if abstract_function {
            return Err(TranslationError::new(
                TranslationErrorKind::UnexpectedBody,
                format!("Abstract function {} has a body.", self.declaration.name),
                "lowerjs.translate.function.translate_body",
            ));
        }
        let block = body::translate_function_body(self.descriptor, self.declaration, &self.body_context)?;
        self.function_object.borrow_mut().body_mut().statements_mut().extend(block.into_statements());
        Ok(())
    }

    fn translate_parameters(&self) -> TranslationResult<Vec<JsParameter>> {
        if self.receiver_name.is_none() && self.descriptor.value_parameters.is_empty() {
            return Ok(Vec::new());
        }
        let mut parameters = Vec::with_capacity(self.descriptor.value_parameters.len() + 1);
        if let Some(receiver) = &self.receiver_name {
            parameters.push(JsParameter::new(receiver.clone()));
        }
        add_parameters(&mut parameters, self.descriptor, &self.context)?;
        Ok(parameters)
    }

    fn add_inline_metadata_if_needed(&self) -> TranslationResult<()> {
        if !self.descriptor.inline_kind.is_inline() || self.descriptor.visibility != Visibility::Public {
            return Ok(());
        }

        let mut inline_args: Vec<JsNameRef> = Vec::new();
        let mut noinline_args: Vec<JsNameRef> = Vec::new();
        for parameter in self.function_object.borrow().parameters() {
            let parameter_ref = parameter.name().make_ref();
            match metadata::inline_strategy(parameter) {
                Some(strategy) if strategy.is_inline() => inline_args.push(parameter_ref),
                _ => noinline_args.push(parameter_ref),
            }
        }
        debug!(
            "inline markers for {}: {} inline, {} noinline",
            self.declaration.name,
            inline_args.len(),
            noinline_args.len()
        );

        let function_name = self.context.name_for_descriptor(self.descriptor_id)?;
        let function_name_literal = self.context.program().string_literal(function_name.ident());
        let start_tag = namer::inline_start_tag(function_name_literal.clone());
        let end_tag = namer::inline_end_tag(function_name_literal);
        let start_tag = namer::set_inline_args(start_tag, inline_args);
        let start_tag = namer::set_noinline_args(start_tag, noinline_args);

        let mut function_object = self.function_object.borrow_mut();
        let statements = function_object.body_mut().statements_mut();
        statements.insert(0, start_tag.make_stmt());
        statements.push(end_tag.make_stmt());
        Ok(())
    }
}

/// Append the lowered value parameters of `descriptor` to `list`, stamping
/// default-value and inline metadata.
pub fn add_parameters(
    list: &mut Vec<JsParameter>,
    descriptor: &FunctionDescriptor,
    context: &TranslationContext<'_>,
) -> TranslationResult<()> {
    for &parameter_id in &descriptor.value_parameters {
        let value_parameter = context.binding_context().value_parameter(parameter_id).ok_or_else(|| {
            TranslationError::new(
                TranslationErrorKind::MissingDescriptor,
                format!("Parameter {} of {} is not a value parameter.", parameter_id, descriptor.name),
                "lowerjs.translate.function.add_parameters",
            )
        })?;
        let mut parameter = JsParameter::new(context.name_for_descriptor(parameter_id)?);
        metadata::set_has_default_value(&mut parameter, value_parameter.has_default_value);

        if value_parameter.ty.is_function_or_extension_function_type()
            && call::should_inline_descriptor(context.binding_context(), parameter_id)
        {
            metadata::set_inline_strategy(&mut parameter, InlineStrategy::InPlace);
        }
        list.push(parameter);
    }
    Ok(())
}
