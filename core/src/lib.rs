pub mod config;
pub mod error;
pub mod js;
pub mod location;
pub mod semantic;
pub mod syntax;
pub mod translate;
pub mod unit;

pub use config::{EcmaVersion, TranslationConfig};
pub use error::{Level, LowerErrorExt, generate_error_report};
pub use location::{Location, Span};
pub use translate::{FunctionLowering, TranslationContext, TranslationError, TranslationErrorKind};
pub use unit::TranslationUnit;

use js::ast::JsObjectLiteral;

/// Lower every declaration of `unit` as a method and collect the results in
/// one object literal, in declaration order.
pub fn lower_translation_unit(
    unit: &TranslationUnit,
    config: TranslationConfig,
) -> Result<JsObjectLiteral, Box<dyn LowerErrorExt>> {
    config.validate().map_err(|reason| {
        Box::<dyn LowerErrorExt>::from(TranslationError::new(
            TranslationErrorKind::Unsupported,
            format!("invalid configuration: {}", reason),
            "lowerjs.lower_translation_unit",
        ))
    })?;
    let context = TranslationContext::new(&unit.model, config);
    let mut module = JsObjectLiteral::new();
    for declaration in &unit.declarations {
        let property = FunctionLowering::new(declaration, &context)?.lower_as_method()?;
        module.properties.push(property);
    }
    log::info!("lowered {} declaration(s) of {}", module.properties.len(), unit.name);
    Ok(module)
}
