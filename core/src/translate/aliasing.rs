use std::rc::Rc;

use crate::js::ast::JsExpression;
use crate::semantic::DescriptorId;

#[derive(Debug)]
struct AliasLayer {
    descriptor: DescriptorId,
    alias: JsExpression,
    outer: Option<Rc<AliasLayer>>,
}

/// Descriptor substitutions in effect for a translation context. Layers are
/// shared with the outer context; an inner binding shadows outer ones.
#[derive(Debug, Clone, Default)]
pub struct AliasingContext {
    head: Option<Rc<AliasLayer>>,
}

impl AliasingContext {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn inner(&self, descriptor: DescriptorId, alias: JsExpression) -> Self {
        AliasingContext {
            head: Some(Rc::new(AliasLayer { descriptor, alias, outer: self.head.clone() })),
        }
    }

    pub fn alias_for(&self, descriptor: DescriptorId) -> Option<&JsExpression> {
        let mut layer = self.head.as_deref();
        while let Some(current) = layer {
            if current.descriptor == descriptor {
                return Some(&current.alias);
            }
            layer = current.outer.as_deref();
        }
        None
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut layer = self.head.as_deref();
        while let Some(current) = layer {
            depth += 1;
            layer = current.outer.as_deref();
        }
        depth
    }
}
