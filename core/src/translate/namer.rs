//! Well-known identifiers and the sentinel invocations built from them.

use crate::js::ast::{JsExpression, JsInvocation, JsName, JsNameRef};
use crate::js::metadata::{self, INLINE_END_TAG, INLINE_START_TAG};

const RECEIVER_PARAMETER_NAME: &str = "$receiver";

/// Identifier of the synthetic first parameter of a named extension function.
pub fn receiver_parameter_name() -> &'static str {
    RECEIVER_PARAMETER_NAME
}

fn tag(callee: &str, function_name: JsExpression) -> JsInvocation {
    JsInvocation::new(JsName::free(callee).make_ref().into(), vec![function_name])
}

pub fn inline_start_tag(function_name: JsExpression) -> JsInvocation {
    tag(INLINE_START_TAG, function_name)
}

pub fn inline_end_tag(function_name: JsExpression) -> JsInvocation {
    tag(INLINE_END_TAG, function_name)
}

pub fn set_inline_args(mut tag: JsInvocation, args: Vec<JsNameRef>) -> JsInvocation {
    metadata::set_inline_args(&mut tag, args);
    tag
}

pub fn set_noinline_args(mut tag: JsInvocation, args: Vec<JsNameRef>) -> JsInvocation {
    metadata::set_noinline_args(&mut tag, args);
    tag
}
