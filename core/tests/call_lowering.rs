use lowerjs_core::js::ast::{JsBinaryOperator, JsExpression, JsNode, JsNumber, JsStatement};
use lowerjs_core::js::metadata::{self, InlineStrategy};
use lowerjs_core::js::parser::CollectingReporter;
use lowerjs_core::semantic::{
    ConstantValue, DescriptorId, FunctionDescriptor, FunctionKind, InlineKind, KotlinType, ModelBuilder,
    ResolvedCall, ValueParameterDescriptor,
};
use lowerjs_core::syntax::{Body, CallExpression, Expression, FunctionDeclaration};
use lowerjs_core::translate::call;
use lowerjs_core::{Level, LowerErrorExt, TranslationConfig, TranslationContext, TranslationErrorKind};

/// `kotlin.js.js(code: String)`
fn declare_js(builder: &mut ModelBuilder) -> DescriptorId {
    let js = builder.declare_function(FunctionDescriptor::new("js").with_fq_name("kotlin.js.js"));
    builder.add_parameter(js, ValueParameterDescriptor::new("code", KotlinType::string()));
    js
}

/// `js("<code>")` with the frontend's compile-time value bound to the argument.
fn js_call(builder: &mut ModelBuilder, js: DescriptorId, code: &str) -> CallExpression {
    let argument = Expression::string_template(builder.next_node_id(), code);
    builder.bind_constant(argument.id(), ConstantValue::String(code.to_string()));
    let id = builder.next_node_id();
    builder.bind_call(id, ResolvedCall::simple(js));
    CallExpression::new(id, vec![argument])
}

fn lower_js(code: &str) -> (Result<JsNode, lowerjs_core::TranslationError>, Vec<String>) {
    let mut builder = ModelBuilder::new();
    let js = declare_js(&mut builder);
    let call_expression = js_call(&mut builder, js, code);
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());
    let result = call::lower(&call_expression, None, &context);
    let declared = ["x", "y", "a"].iter().filter(|n| context.scope().has_own_name(n)).map(|n| n.to_string()).collect();
    (result, declared)
}

#[test]
fn js_code_with_single_statement_is_spliced_as_statement() {
    let (node, _) = lower_js("return 42;");
    assert_eq!(
        node.unwrap(),
        JsNode::Statement(JsStatement::Return(Some(JsExpression::Number(JsNumber::Int(42)))))
    );
}

#[test]
fn js_code_with_single_expression_is_spliced_as_expression() {
    let (node, _) = lower_js("a + 1");
    match node.unwrap() {
        JsNode::Expression(JsExpression::Binary { op, .. }) => assert_eq!(op, JsBinaryOperator::Add),
        other => panic!("expected a binary expression, got {:?}", other),
    }
}

#[test]
fn empty_js_code_is_the_empty_expression() {
    let (node, _) = lower_js("");
    assert_eq!(node.unwrap(), JsNode::Expression(JsExpression::Empty));
}

#[test]
fn js_code_with_several_statements_becomes_a_block() {
    let (node, declared) = lower_js("var x = 1; x++;");
    match node.unwrap() {
        JsNode::Statement(JsStatement::Block(block)) => {
            assert_eq!(block.len(), 2);
            assert!(matches!(block.statements()[0], JsStatement::Vars(_)));
        }
        other => panic!("expected a block, got {:?}", other),
    }
    // Declarations land in the scope of the surrounding code.
    assert_eq!(declared, vec!["x"]);
}

#[test]
fn js_code_syntax_error_is_reported_against_the_snippet() {
    let (node, _) = lower_js("foo(");
    let err = node.unwrap_err();
    assert_eq!(err.kind(), TranslationErrorKind::EmbeddedSource);
    assert_eq!(err.level(), Level::Error);
    assert!(err.message().starts_with("Encountered js error in backend: "), "{}", err.message());
    let location = err.location().expect("location");
    assert_eq!(location.file, "<js-code>");
    assert_eq!(location.line, 1);
}

#[test]
fn js_code_with_two_expressions_on_one_line_is_rejected() {
    let (node, _) = lower_js("a b");
    let err = node.unwrap_err();
    assert_eq!(err.kind(), TranslationErrorKind::EmbeddedSource);
    assert!(err.message().contains("missing ; before statement"), "{}", err.message());
}

#[test]
fn js_code_already_diagnosed_by_the_reporter_splices_as_nothing() {
    let mut builder = ModelBuilder::new();
    let js = declare_js(&mut builder);
    let call_expression = js_call(&mut builder, js, "var = 1;");
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let mut reporter = CollectingReporter::new();
    let node = call::lower_with_reporter(&call_expression, None, &context, &mut reporter).unwrap();
    assert_eq!(node, JsNode::Expression(JsExpression::Empty));
    assert!(reporter.has_errors());
    assert_eq!(reporter.diagnostics()[0].location.file, "<js-code>");
}

#[test]
fn js_code_must_be_a_compile_time_string() {
    let mut builder = ModelBuilder::new();
    let js = declare_js(&mut builder);
    let argument = Expression::string_template(builder.next_node_id(), "1");
    builder.bind_constant(argument.id(), ConstantValue::Int(1));
    let id = builder.next_node_id();
    builder.bind_call(id, ResolvedCall::simple(js));
    let call_expression = CallExpression::new(id, vec![argument]);
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let err = call::lower(&call_expression, None, &context).unwrap_err();
    assert_eq!(err.kind(), TranslationErrorKind::NonStringJsCode);
    assert_eq!(err.level(), Level::Critical);
}

#[test]
fn js_call_argument_must_be_a_string_template() {
    let mut builder = ModelBuilder::new();
    let js = declare_js(&mut builder);
    let argument = Expression::Constant { id: builder.next_node_id(), value: ConstantValue::String("1".into()) };
    let id = builder.next_node_id();
    builder.bind_call(id, ResolvedCall::simple(js));
    let call_expression = CallExpression::new(id, vec![argument]);
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let err = call::lower(&call_expression, None, &context).unwrap_err();
    assert_eq!(err.kind(), TranslationErrorKind::MalformedJsCall);
}

#[test]
fn a_function_merely_named_js_is_an_ordinary_call() {
    let mut builder = ModelBuilder::new();
    let js = builder.declare_function(FunctionDescriptor::new("js").with_fq_name("my.js"));
    builder.add_parameter(js, ValueParameterDescriptor::new("code", KotlinType::string()));
    let call_expression = js_call(&mut builder, js, "return 1;");
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let node = call::lower(&call_expression, None, &context).unwrap();
    let invocation = node.as_expression().and_then(JsExpression::as_invocation).expect("invocation");
    assert_eq!(invocation.callee_name(), Some("js"));
    assert_eq!(invocation.arguments, vec![JsExpression::String("return 1;".into())]);
}

#[test]
fn call_without_resolution_is_rejected() {
    let model = ModelBuilder::new().build();
    let context = TranslationContext::new(&model, TranslationConfig::default());
    let err = call::lower(&CallExpression::new(7, Vec::new()), None, &context).unwrap_err();
    assert_eq!(err.kind(), TranslationErrorKind::MissingResolvedCall);
}

/// `inline fun run(block: () -> Unit)` called as `run { }`.
fn inline_call_with_lambda(builder: &mut ModelBuilder) -> CallExpression {
    let run = builder.declare_function(
        FunctionDescriptor::new("run").with_inline_kind(InlineKind::Inline).with_return_type(KotlinType::unit()),
    );
    builder.add_parameter(run, ValueParameterDescriptor::new("block", KotlinType::function(0)));
    let lambda = builder.declare_function(FunctionDescriptor::new("lambda").with_return_type(KotlinType::unit()));
    let lambda_id = builder.next_node_id();
    builder.bind_declaration(lambda_id, lambda);
    let argument = Expression::FunctionLiteral(Box::new(FunctionDeclaration::literal(lambda_id, Body::Block(Vec::new()))));
    let id = builder.next_node_id();
    builder.bind_call(id, ResolvedCall::simple(run));
    CallExpression::new(id, vec![argument])
}

#[test]
fn call_of_inline_function_is_marked_in_place() {
    let mut builder = ModelBuilder::new();
    let call_expression = inline_call_with_lambda(&mut builder);
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let node = call::lower(&call_expression, None, &context).unwrap();
    let invocation = node.as_expression().and_then(JsExpression::as_invocation).expect("invocation");
    assert_eq!(invocation.callee_name(), Some("run"));
    assert_eq!(metadata::inline_strategy(invocation), Some(InlineStrategy::InPlace));
    assert!(matches!(invocation.arguments.as_slice(), [JsExpression::Function(_)]));
}

#[test]
fn inline_marking_is_skipped_when_disabled() {
    let mut builder = ModelBuilder::new();
    let call_expression = inline_call_with_lambda(&mut builder);
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default().without_inlining());

    let node = call::lower(&call_expression, None, &context).unwrap();
    let invocation = node.as_expression().and_then(JsExpression::as_invocation).expect("invocation");
    assert_eq!(metadata::inline_strategy(invocation), None);
}

#[test]
fn ordinary_member_call_is_qualified_by_its_receiver() {
    let mut builder = ModelBuilder::new();
    let size = builder.declare_function(FunctionDescriptor::new("size").with_return_type(KotlinType::int()));
    let id = builder.next_node_id();
    builder.bind_call(id, ResolvedCall::simple(size));
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let receiver = JsExpression::name_ref(&lowerjs_core::js::ast::JsName::free("list"));
    let node = call::lower(&CallExpression::new(id, Vec::new()), Some(receiver.clone()), &context).unwrap();
    let invocation = node.as_expression().and_then(JsExpression::as_invocation).expect("invocation");
    let callee = invocation.qualifier.as_name_ref().expect("name reference");
    assert_eq!(callee.ident(), "size");
    assert_eq!(callee.qualifier.as_deref(), Some(&receiver));
    assert!(invocation.metadata.is_empty());
}

#[test]
fn extension_call_passes_its_receiver_first() {
    let mut builder = ModelBuilder::new();
    let twice = builder.declare_function(FunctionDescriptor::new("twice"));
    builder.add_extension_receiver(twice, KotlinType::int());
    let id = builder.next_node_id();
    builder.bind_call(id, ResolvedCall::simple(twice));
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let node = call::lower(&CallExpression::new(id, Vec::new()), Some(JsExpression::Number(JsNumber::Int(3))), &context)
        .unwrap();
    let invocation = node.as_expression().and_then(JsExpression::as_invocation).expect("invocation");
    assert_eq!(invocation.callee_name(), Some("twice"));
    assert_eq!(invocation.arguments, vec![JsExpression::Number(JsNumber::Int(3))]);

    // Without an explicit receiver the implicit `this` is passed.
    let node = call::lower(&CallExpression::new(id, Vec::new()), None, &context).unwrap();
    let invocation = node.as_expression().and_then(JsExpression::as_invocation).expect("invocation");
    assert_eq!(invocation.arguments, vec![JsExpression::This]);
}

#[test]
fn constructor_call_is_a_new_expression() {
    let mut builder = ModelBuilder::new();
    let point = builder.declare_function(FunctionDescriptor::new("Point").with_kind(FunctionKind::Constructor));
    let id = builder.next_node_id();
    builder.bind_call(id, ResolvedCall::simple(point));
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let node = call::lower(&CallExpression::new(id, Vec::new()), None, &context).unwrap();
    assert!(matches!(node, JsNode::Expression(JsExpression::New { .. })));
}

#[test]
fn inline_decision_follows_the_callee() {
    let mut builder = ModelBuilder::new();
    let inline_fn = builder.declare_function(FunctionDescriptor::new("each").with_inline_kind(InlineKind::Inline));
    let block = builder.add_parameter(inline_fn, ValueParameterDescriptor::new("block", KotlinType::function(1)));
    let cb = builder.add_parameter(inline_fn, ValueParameterDescriptor::new("cb", KotlinType::function(0)).noinline());
    let plain_fn = builder.declare_function(FunctionDescriptor::new("plain"));
    let plain_param = builder.add_parameter(plain_fn, ValueParameterDescriptor::new("f", KotlinType::function(0)));
    let ctor = builder.declare_function(
        FunctionDescriptor::new("Box").with_kind(FunctionKind::Constructor).with_inline_kind(InlineKind::Inline),
    );
    let invoke = builder.declare_function(FunctionDescriptor::new("invoke"));
    let model = builder.build();

    assert!(call::should_inline(&ResolvedCall::simple(inline_fn), &model));
    assert!(!call::should_inline(&ResolvedCall::simple(plain_fn), &model));
    assert!(!call::should_inline(&ResolvedCall::simple(ctor), &model));
    assert!(call::should_inline(&ResolvedCall::variable_as_function(block, invoke), &model));
    assert!(!call::should_inline(&ResolvedCall::variable_as_function(cb, invoke), &model));
    assert!(!call::should_inline(&ResolvedCall::variable_as_function(plain_param, invoke), &model));

    // The candidate decides, not its substituted copy.
    assert!(call::should_inline(&ResolvedCall::Simple { candidate: inline_fn, resulting: Some(plain_fn) }, &model));
    assert!(!call::should_inline(&ResolvedCall::Simple { candidate: plain_fn, resulting: Some(inline_fn) }, &model));
}
