use super::context::TranslationContext;
use super::err::{TranslationError, TranslationErrorKind, TranslationResult};
use crate::js::ast::{JsExpression, JsInvocation, JsName, JsNameRef};
use crate::semantic::{Descriptor, FunctionKind, ResolvedCall};

/// Build the target expression for a resolved call with already translated
/// arguments.
///
/// Extension callees get the receiver as their first argument; member calls
/// qualify the callee name by it. An extension call without an explicit
/// receiver passes `this`. A function value invoked with a receiver is
/// called through `call`, so the receiver becomes the lambda's `this`.
pub fn translate_call(
    context: &TranslationContext<'_>,
    resolved_call: &ResolvedCall,
    receiver: Option<JsExpression>,
    mut arguments: Vec<JsExpression>,
) -> TranslationResult<JsExpression> {
    if let ResolvedCall::VariableAsFunction { variable, .. } = resolved_call {
        let callee = context.get_reference(*variable)?;
        return Ok(invoke_function_value(callee, receiver, arguments));
    }

    let callee_id = resolved_call.resulting_descriptor();
    match context.descriptor(callee_id)? {
        Descriptor::Function(function) => {
            let name = context.name_for_descriptor(callee_id)?;
            if function.kind == FunctionKind::Constructor {
                return Ok(JsExpression::New { constructor: Box::new(JsExpression::name_ref(&name)), arguments });
            }
            if function.is_extension() {
                arguments.insert(0, receiver.unwrap_or(JsExpression::This));
                return Ok(JsInvocation::new(JsExpression::name_ref(&name), arguments).into());
            }
            let callee = match receiver {
                Some(receiver) => JsNameRef::qualified(name, receiver).into(),
                None => JsExpression::name_ref(&name),
            };
            Ok(JsInvocation::new(callee, arguments).into())
        }
        Descriptor::ValueParameter(_) | Descriptor::Variable(_) => {
            let callee = context.get_reference(callee_id)?;
            Ok(invoke_function_value(callee, receiver, arguments))
        }
        Descriptor::Receiver(_) => Err(TranslationError::new(
            TranslationErrorKind::Unsupported,
            format!("Call resolves to receiver parameter {}.", callee_id),
            "lowerjs.translate.general_call.translate_call",
        )),
    }
}

/// `f(args)`, or `f.call(receiver, args)` for a function with receiver.
fn invoke_function_value(callee: JsExpression, receiver: Option<JsExpression>, mut arguments: Vec<JsExpression>) -> JsExpression {
    match receiver {
        Some(receiver) => {
            arguments.insert(0, receiver);
            JsInvocation::new(JsNameRef::qualified(JsName::free("call"), callee).into(), arguments).into()
        }
        None => JsInvocation::new(callee, arguments).into(),
    }
}
