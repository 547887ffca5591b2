use lowerjs_core::js::ast::{
    JsBinaryOperator, JsExpression, JsFunctionRef, JsName, JsNameRef, JsNumber, JsPropertyInitializer, JsStatement,
};
use lowerjs_core::js::metadata::{self, InlineStrategy, INLINE_END_TAG, INLINE_START_TAG};
use lowerjs_core::semantic::{
    ConstantValue, FunctionDescriptor, InlineKind, KotlinType, ModelBuilder, Modality, ResolvedCall,
    ValueParameterDescriptor, Visibility,
};
use lowerjs_core::syntax::{BinaryOperator, Body, CallExpression, Expression, FunctionDeclaration};
use lowerjs_core::{EcmaVersion, FunctionLowering, Level, LowerErrorExt, TranslationConfig, TranslationContext, TranslationErrorKind};

fn function_of(property: &JsPropertyInitializer) -> JsFunctionRef {
    match &property.value {
        JsExpression::Function(function) => function.clone(),
        other => panic!("expected a function, got {:?}", other),
    }
}

fn parameter_names(function: &JsFunctionRef) -> Vec<String> {
    function.borrow().parameters().iter().map(|p| p.name().ident().to_string()).collect()
}

fn name_refs(names: &[&str]) -> Vec<JsNameRef> {
    names.iter().map(|n| JsName::free(*n).make_ref()).collect()
}

/// `inline fun <name>(<params>) { <param>() ... }` calling each function-typed parameter once.
fn inline_function_calling_params(
    builder: &mut ModelBuilder,
    name: &str,
    visibility: Visibility,
    params: Vec<ValueParameterDescriptor>,
) -> FunctionDeclaration {
    let function = builder.declare_function(
        FunctionDescriptor::new(name)
            .with_inline_kind(InlineKind::Inline)
            .with_visibility(visibility)
            .with_return_type(KotlinType::unit()),
    );
    let invoke = builder.declare_function(FunctionDescriptor::new("invoke").with_fq_name("kotlin.Function0.invoke"));
    let mut body = Vec::new();
    for param in params {
        let callable = param.ty.is_function_or_extension_function_type();
        let id = builder.add_parameter(function, param);
        if callable {
            let call_id = builder.next_node_id();
            builder.bind_call(call_id, ResolvedCall::variable_as_function(id, invoke));
            body.push(Expression::Call(CallExpression::new(call_id, Vec::new())));
        }
    }
    let declaration_id = builder.next_node_id();
    builder.bind_declaration(declaration_id, function);
    FunctionDeclaration::named(declaration_id, name, Some(Body::Block(body)))
}

#[test]
fn plain_function_returns_its_expression_body() {
    // fun f(x: Int) = x + 1
    let mut builder = ModelBuilder::new();
    let f = builder.declare_function(FunctionDescriptor::new("f").with_return_type(KotlinType::int()));
    let x = builder.add_parameter(f, ValueParameterDescriptor::new("x", KotlinType::int()));
    let declaration_id = builder.next_node_id();
    builder.bind_declaration(declaration_id, f);
    let body = Expression::Binary {
        id: builder.next_node_id(),
        op: BinaryOperator::Plus,
        left: Box::new(Expression::Reference { id: builder.next_node_id(), target: x }),
        right: Box::new(Expression::Constant { id: builder.next_node_id(), value: ConstantValue::Int(1) }),
    };
    let declaration = FunctionDeclaration::named(declaration_id, "f", Some(Body::Expression(body)));
    let model = builder.build();

    let context = TranslationContext::new(&model, TranslationConfig::default());
    let property = FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap();
    assert_eq!(property.label_text(), Some("f"));

    let function = function_of(&property);
    assert_eq!(parameter_names(&function), vec!["x"]);
    let function = function.borrow();
    assert_eq!(metadata::inline_strategy(&function.parameters()[0]), None);
    assert_eq!(
        function.body().statements(),
        &[JsStatement::Return(Some(JsExpression::binary(
            JsBinaryOperator::Add,
            JsExpression::name_ref(&JsName::free("x")),
            JsExpression::Number(JsNumber::Int(1)),
        )))]
    );
}

#[test]
fn inline_public_function_is_bracketed_by_tags() {
    // inline fun g(block: () -> Unit) { block() }
    let mut builder = ModelBuilder::new();
    let declaration = inline_function_calling_params(
        &mut builder,
        "g",
        Visibility::Public,
        vec![ValueParameterDescriptor::new("block", KotlinType::function(0))],
    );
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());
    let function = function_of(&FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap());
    let function = function.borrow();

    assert_eq!(metadata::inline_strategy(&function.parameters()[0]), Some(InlineStrategy::InPlace));

    let statements = function.body().statements();
    assert_eq!(statements.len(), 3);
    let start = statements[0].as_invocation().expect("start tag");
    let end = statements[2].as_invocation().expect("end tag");
    assert_eq!(start.callee_name(), Some(INLINE_START_TAG));
    assert_eq!(end.callee_name(), Some(INLINE_END_TAG));
    assert_eq!(metadata::inline_tag_function_name(start), Some("g"));
    assert_eq!(metadata::inline_tag_function_name(end), Some("g"));
    assert_eq!(metadata::inline_args(start), Some(name_refs(&["block"]).as_slice()));
    assert_eq!(metadata::noinline_args(start), Some(&[][..]));

    // The call of the inline lambda parameter is itself marked for inlining.
    let call = statements[1].as_invocation().expect("block()");
    assert_eq!(call.callee_name(), Some("block"));
    assert_eq!(metadata::inline_strategy(call), Some(InlineStrategy::InPlace));
}

#[test]
fn noinline_parameter_goes_to_noinline_args() {
    // inline fun h(noinline cb: () -> Unit) { cb() }
    let mut builder = ModelBuilder::new();
    let declaration = inline_function_calling_params(
        &mut builder,
        "h",
        Visibility::Public,
        vec![ValueParameterDescriptor::new("cb", KotlinType::function(0)).noinline()],
    );
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());
    let function = function_of(&FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap());
    let function = function.borrow();

    assert_eq!(metadata::inline_strategy(&function.parameters()[0]), None);
    let statements = function.body().statements();
    let start = statements[0].as_invocation().expect("start tag");
    assert_eq!(metadata::inline_args(start), Some(&[][..]));
    assert_eq!(metadata::noinline_args(start), Some(name_refs(&["cb"]).as_slice()));
    assert_eq!(metadata::inline_strategy(statements[1].as_invocation().expect("cb()")), None);
}

#[test]
fn only_function_typed_parameters_of_inline_functions_are_in_place() {
    let mut builder = ModelBuilder::new();
    let declaration = inline_function_calling_params(
        &mut builder,
        "mixed",
        Visibility::Public,
        vec![
            ValueParameterDescriptor::new("count", KotlinType::int()),
            ValueParameterDescriptor::new("action", KotlinType::extension_function(1)),
            ValueParameterDescriptor::new("fallback", KotlinType::function(0)).noinline(),
        ],
    );
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());
    let function = function_of(&FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap());
    let function = function.borrow();

    let strategies: Vec<Option<InlineStrategy>> =
        function.parameters().iter().map(|p| metadata::inline_strategy(p)).collect();
    assert_eq!(strategies, vec![None, Some(InlineStrategy::InPlace), None]);

    let start = function.body().statements()[0].as_invocation().expect("start tag");
    assert_eq!(metadata::inline_args(start), Some(name_refs(&["action"]).as_slice()));
    assert_eq!(metadata::noinline_args(start), Some(name_refs(&["count", "fallback"]).as_slice()));
}

#[test]
fn non_public_or_non_inline_functions_get_no_tags() {
    for (visibility, inline) in [(Visibility::Internal, true), (Visibility::Private, true), (Visibility::Public, false)] {
        let mut builder = ModelBuilder::new();
        let declaration = if inline {
            inline_function_calling_params(
                &mut builder,
                "k",
                visibility,
                vec![ValueParameterDescriptor::new("block", KotlinType::function(0))],
            )
        } else {
            let f = builder.declare_function(FunctionDescriptor::new("k").with_return_type(KotlinType::unit()));
            builder.add_parameter(f, ValueParameterDescriptor::new("block", KotlinType::function(0)));
            let id = builder.next_node_id();
            builder.bind_declaration(id, f);
            FunctionDeclaration::named(id, "k", Some(Body::Block(Vec::new())))
        };
        let model = builder.build();
        let context = TranslationContext::new(&model, TranslationConfig::default());
        let function = function_of(&FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap());
        let function = function.borrow();

        let tagged = function
            .body()
            .statements()
            .iter()
            .filter_map(JsStatement::as_invocation)
            .any(|i| metadata::is_inline_start_tag(i) || metadata::is_inline_end_tag(i));
        assert!(!tagged, "{:?} inline={} must not be tagged", visibility, inline);
    }
}

#[test]
fn named_extension_function_takes_receiver_parameter() {
    // fun Int.inc() = this + 1
    let mut builder = ModelBuilder::new();
    let inc = builder.declare_function(FunctionDescriptor::new("inc").with_return_type(KotlinType::int()));
    let receiver = builder.add_extension_receiver(inc, KotlinType::int());
    let declaration_id = builder.next_node_id();
    builder.bind_declaration(declaration_id, inc);
    let body = Expression::Binary {
        id: builder.next_node_id(),
        op: BinaryOperator::Plus,
        left: Box::new(Expression::This { id: builder.next_node_id(), receiver: Some(receiver) }),
        right: Box::new(Expression::Constant { id: builder.next_node_id(), value: ConstantValue::Int(1) }),
    };
    let declaration = FunctionDeclaration::named(declaration_id, "inc", Some(Body::Expression(body)));
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());
    let function = function_of(&FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap());

    assert_eq!(parameter_names(&function), vec!["$receiver"]);
    let function = function.borrow();
    assert!(function.scope().has_own_name("$receiver"));
    assert_eq!(
        function.body().statements(),
        &[JsStatement::Return(Some(JsExpression::binary(
            JsBinaryOperator::Add,
            JsExpression::name_ref(&JsName::free("$receiver")),
            JsExpression::Number(JsNumber::Int(1)),
        )))]
    );
}

#[test]
fn extension_function_literal_has_no_receiver_parameter() {
    let mut builder = ModelBuilder::new();
    let lambda = builder.declare_function(FunctionDescriptor::new("<anonymous>").with_return_type(KotlinType::unit()));
    builder.add_extension_receiver(lambda, KotlinType::string());
    builder.add_parameter(lambda, ValueParameterDescriptor::new("it", KotlinType::int()));
    let declaration_id = builder.next_node_id();
    builder.bind_declaration(declaration_id, lambda);
    let declaration = FunctionDeclaration::literal(declaration_id, Body::Block(Vec::new()));
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let function = FunctionLowering::new(&declaration, &context).unwrap().lower_function_object().unwrap();
    assert_eq!(parameter_names(&function), vec!["it"]);
    assert!(!function.borrow().scope().has_own_name("$receiver"));
}

#[test]
fn receiver_of_a_function_value_becomes_the_lambda_this() {
    // inline fun apply5(block: Int.() -> Int) = 5.block()
    let mut builder = ModelBuilder::new();
    let apply5 = builder.declare_function(
        FunctionDescriptor::new("apply5").with_inline_kind(InlineKind::Inline).with_return_type(KotlinType::int()),
    );
    let block = builder.add_parameter(apply5, ValueParameterDescriptor::new("block", KotlinType::extension_function(0)));
    let invoke = builder.declare_function(FunctionDescriptor::new("invoke"));
    let call_id = builder.next_node_id();
    builder.bind_call(call_id, ResolvedCall::variable_as_function(block, invoke));
    let apply5_id = builder.next_node_id();
    builder.bind_declaration(apply5_id, apply5);
    let body = Expression::Qualified {
        id: builder.next_node_id(),
        receiver: Box::new(Expression::Constant { id: builder.next_node_id(), value: ConstantValue::Int(5) }),
        selector: CallExpression::new(call_id, Vec::new()),
    };
    let apply5_declaration = FunctionDeclaration::named(apply5_id, "apply5", Some(Body::Expression(body)));

    // { this + 1 } passed as `block`
    let lambda = builder.declare_function(FunctionDescriptor::new("<anonymous>").with_return_type(KotlinType::int()));
    let lambda_receiver = builder.add_extension_receiver(lambda, KotlinType::int());
    let lambda_id = builder.next_node_id();
    builder.bind_declaration(lambda_id, lambda);
    let lambda_body = Expression::Binary {
        id: builder.next_node_id(),
        op: BinaryOperator::Plus,
        left: Box::new(Expression::This { id: builder.next_node_id(), receiver: Some(lambda_receiver) }),
        right: Box::new(Expression::Constant { id: builder.next_node_id(), value: ConstantValue::Int(1) }),
    };
    let lambda_declaration = FunctionDeclaration::literal(lambda_id, Body::Expression(lambda_body));
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let apply5 = function_of(&FunctionLowering::new(&apply5_declaration, &context).unwrap().lower_as_method().unwrap());
    let apply5 = apply5.borrow();
    let invocation = match &apply5.body().statements()[1] {
        JsStatement::Return(Some(JsExpression::Invocation(invocation))) => invocation,
        other => panic!("expected a returned invocation, got {:?}", other),
    };
    let callee = invocation.qualifier.as_name_ref().expect("member reference");
    assert_eq!(callee.ident(), "call");
    assert_eq!(callee.qualifier.as_deref().and_then(JsExpression::as_name_ref).map(|n| n.ident()), Some("block"));
    assert_eq!(invocation.arguments, vec![JsExpression::Number(JsNumber::Int(5))]);
    assert_eq!(metadata::inline_strategy(invocation), Some(InlineStrategy::InPlace));

    // The literal reads its receiver from `this`, which `call` binds.
    let lambda = FunctionLowering::new(&lambda_declaration, &context).unwrap().lower_function_object().unwrap();
    assert!(parameter_names(&lambda).is_empty());
    assert_eq!(
        lambda.borrow().body().statements(),
        &[JsStatement::Return(Some(JsExpression::binary(
            JsBinaryOperator::Add,
            JsExpression::This,
            JsExpression::Number(JsNumber::Int(1)),
        )))]
    );
}

#[test]
fn has_default_value_is_copied_from_every_parameter() {
    let mut builder = ModelBuilder::new();
    let f = builder.declare_function(FunctionDescriptor::new("f").with_return_type(KotlinType::unit()));
    builder.add_parameter(f, ValueParameterDescriptor::new("a", KotlinType::int()).with_default_value());
    builder.add_parameter(f, ValueParameterDescriptor::new("b", KotlinType::int()));
    builder.add_parameter(f, ValueParameterDescriptor::new("c", KotlinType::function(0)).with_default_value());
    let id = builder.next_node_id();
    builder.bind_declaration(id, f);
    let declaration = FunctionDeclaration::named(id, "f", Some(Body::Block(Vec::new())));
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());
    let function = function_of(&FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap());

    let defaults: Vec<bool> = function.borrow().parameters().iter().map(|p| metadata::has_default_value(p)).collect();
    assert_eq!(defaults, vec![true, false, true]);
    // Every parameter carries the key, even when false.
    assert!(function.borrow().parameters().iter().all(|p| p.metadata.contains(metadata::MetadataKey::HasDefaultValue)));
}

#[test]
fn lowering_a_function_twice_is_rejected() {
    let mut builder = ModelBuilder::new();
    let f = builder.declare_function(FunctionDescriptor::new("f").with_return_type(KotlinType::unit()));
    builder.add_parameter(f, ValueParameterDescriptor::new("a", KotlinType::int()));
    let id = builder.next_node_id();
    builder.bind_declaration(id, f);
    let declaration = FunctionDeclaration::named(id, "f", Some(Body::Block(Vec::new())));
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap();
    let err = match FunctionLowering::new(&declaration, &context) {
        Ok(_) => panic!("second lowering must fail"),
        Err(e) => e,
    };
    assert_eq!(err.kind(), TranslationErrorKind::FunctionLoweredTwice);
    assert_eq!(err.level(), Level::Critical);
}

#[test]
fn abstract_functions_have_empty_bodies() {
    let mut builder = ModelBuilder::new();
    let f = builder.declare_function(
        FunctionDescriptor::new("area")
            .with_modality(Modality::Abstract)
            .with_inline_kind(InlineKind::NotInline),
    );
    let id = builder.next_node_id();
    builder.bind_declaration(id, f);
    let declaration = FunctionDeclaration::named(id, "area", None);
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let function = function_of(&FunctionLowering::new(&declaration, &context).unwrap().lower_as_method().unwrap());
    assert!(function.borrow().body().is_empty());
}

#[test]
fn body_presence_must_match_modality() {
    let mut builder = ModelBuilder::new();
    let final_fn = builder.declare_function(FunctionDescriptor::new("run"));
    let abstract_fn = builder.declare_function(FunctionDescriptor::new("stop").with_modality(Modality::Abstract));
    let missing_id = builder.next_node_id();
    builder.bind_declaration(missing_id, final_fn);
    let unexpected_id = builder.next_node_id();
    builder.bind_declaration(unexpected_id, abstract_fn);
    let model = builder.build();
    let context = TranslationContext::new(&model, TranslationConfig::default());

    let missing = FunctionDeclaration::named(missing_id, "run", None);
    let err = FunctionLowering::new(&missing, &context).unwrap().lower_as_method().unwrap_err();
    assert_eq!(err.kind(), TranslationErrorKind::MissingBody);

    let unexpected = FunctionDeclaration::named(unexpected_id, "stop", Some(Body::Block(Vec::new())));
    let err = FunctionLowering::new(&unexpected, &context).unwrap().lower_as_method().unwrap_err();
    assert_eq!(err.kind(), TranslationErrorKind::UnexpectedBody);
}

#[test]
fn property_descriptor_form_marks_overridable_functions_writable() {
    let mut builder = ModelBuilder::new();
    let f = builder.declare_function(
        FunctionDescriptor::new("describe").with_modality(Modality::Open).with_return_type(KotlinType::string()),
    );
    let id = builder.next_node_id();
    builder.bind_declaration(id, f);
    let body = Expression::string_template(builder.next_node_id(), "shape");
    let declaration = FunctionDeclaration::named(id, "describe", Some(Body::Expression(body)));
    let model = builder.build();

    let config = TranslationConfig { enumerable_descriptors: true, ..TranslationConfig::default() };
    let context = TranslationContext::new(&model, config);
    let property = FunctionLowering::new(&declaration, &context).unwrap().lower_as_property_descriptor().unwrap();
    assert_eq!(property.label_text(), Some("describe"));

    let descriptor = match &property.value {
        JsExpression::Object(object) => object,
        other => panic!("expected a data descriptor, got {:?}", other),
    };
    assert!(matches!(descriptor.get("value"), Some(JsExpression::Function(_))));
    assert_eq!(descriptor.get("writable"), Some(&JsExpression::Boolean(true)));
    assert_eq!(descriptor.get("enumerable"), Some(&JsExpression::Boolean(true)));
}

#[test]
fn property_descriptor_form_needs_ecma5() {
    let mut builder = ModelBuilder::new();
    let f = builder.declare_function(FunctionDescriptor::new("f"));
    let id = builder.next_node_id();
    builder.bind_declaration(id, f);
    let declaration = FunctionDeclaration::named(id, "f", Some(Body::Block(Vec::new())));
    let model = builder.build();
    let config = TranslationConfig { ecma_version: EcmaVersion::Ecma3, ..TranslationConfig::default() };
    let context = TranslationContext::new(&model, config);

    let err = FunctionLowering::new(&declaration, &context).unwrap().lower_as_property_descriptor().unwrap_err();
    assert_eq!(err.kind(), TranslationErrorKind::Unsupported);
}

#[test]
fn undeclared_function_is_a_missing_descriptor() {
    let model = ModelBuilder::new().build();
    let context = TranslationContext::new(&model, TranslationConfig::default());
    let declaration = FunctionDeclaration::named(42, "ghost", Some(Body::Block(Vec::new())));
    match FunctionLowering::new(&declaration, &context) {
        Ok(_) => panic!("lowering without a descriptor must fail"),
        Err(e) => assert_eq!(e.kind(), TranslationErrorKind::MissingDescriptor),
    }
}
