//! file: core/src/js/metadata.rs
//! description: inline metadata attached to parameters and invocations.
//!
//! This vocabulary is the only channel between the lowering and the
//! downstream inliner; keys, values and the sentinel tag names below must
//! stay stable.
//!
//! | attached to          | key                 | value                 |
//! |----------------------|---------------------|-----------------------|
//! | parameter            | `inline-strategy`   | in-place / not-inline |
//! | parameter            | `has-default-value` | boolean               |
//! | invocation           | `inline-strategy`   | in-place / not-inline |
//! | sentinel invocation  | `inline-args`       | name references       |
//! | sentinel invocation  | `noinline-args`     | name references       |

use serde::Serialize;

use super::ast::{JsExpression, JsInvocation, JsNameRef};

/// Callee of the invocation placed before an inline function body.
pub const INLINE_START_TAG: &str = "$inline$start$";
/// Callee of the invocation placed after an inline function body.
pub const INLINE_END_TAG: &str = "$inline$end$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataKey {
    InlineStrategy,
    HasDefaultValue,
    InlineArgs,
    NoinlineArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InlineStrategy {
    InPlace,
    NotInline,
}

impl InlineStrategy {
    pub fn is_inline(&self) -> bool {
        matches!(self, InlineStrategy::InPlace)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    InlineStrategy(InlineStrategy),
    Bool(bool),
    NameRefs(Vec<JsNameRef>),
}

/// Flat key/value store; nodes carry at most a handful of entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: Vec<(MetadataKey, MetadataValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Metadata { entries: Vec::new() }
    }

    pub fn get(&self, key: MetadataKey) -> Option<&MetadataValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn set(&mut self, key: MetadataKey, value: MetadataValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: MetadataKey) -> Option<MetadataValue> {
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, key: MetadataKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = MetadataKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub trait HasMetadata {
    fn metadata(&self) -> &Metadata;
    fn metadata_mut(&mut self) -> &mut Metadata;
}

pub fn set_inline_strategy<N: HasMetadata>(node: &mut N, strategy: InlineStrategy) {
    node.metadata_mut().set(MetadataKey::InlineStrategy, MetadataValue::InlineStrategy(strategy));
}

pub fn inline_strategy<N: HasMetadata>(node: &N) -> Option<InlineStrategy> {
    match node.metadata().get(MetadataKey::InlineStrategy) {
        Some(MetadataValue::InlineStrategy(strategy)) => Some(*strategy),
        _ => None,
    }
}

pub fn set_has_default_value<N: HasMetadata>(node: &mut N, value: bool) {
    node.metadata_mut().set(MetadataKey::HasDefaultValue, MetadataValue::Bool(value));
}

/// Absent metadata reads as `false`.
pub fn has_default_value<N: HasMetadata>(node: &N) -> bool {
    matches!(node.metadata().get(MetadataKey::HasDefaultValue), Some(MetadataValue::Bool(true)))
}

pub fn set_inline_args(invocation: &mut JsInvocation, args: Vec<JsNameRef>) {
    invocation.metadata_mut().set(MetadataKey::InlineArgs, MetadataValue::NameRefs(args));
}

pub fn inline_args(invocation: &JsInvocation) -> Option<&[JsNameRef]> {
    match invocation.metadata().get(MetadataKey::InlineArgs) {
        Some(MetadataValue::NameRefs(refs)) => Some(refs),
        _ => None,
    }
}

pub fn set_noinline_args(invocation: &mut JsInvocation, args: Vec<JsNameRef>) {
    invocation.metadata_mut().set(MetadataKey::NoinlineArgs, MetadataValue::NameRefs(args));
}

pub fn noinline_args(invocation: &JsInvocation) -> Option<&[JsNameRef]> {
    match invocation.metadata().get(MetadataKey::NoinlineArgs) {
        Some(MetadataValue::NameRefs(refs)) => Some(refs),
        _ => None,
    }
}

pub fn is_inline_start_tag(invocation: &JsInvocation) -> bool {
    invocation.callee_name() == Some(INLINE_START_TAG)
}

pub fn is_inline_end_tag(invocation: &JsInvocation) -> bool {
    invocation.callee_name() == Some(INLINE_END_TAG)
}

/// Function identifier carried by a start or end tag.
pub fn inline_tag_function_name(invocation: &JsInvocation) -> Option<&str> {
    if !is_inline_start_tag(invocation) && !is_inline_end_tag(invocation) {
        return None;
    }
    match invocation.arguments.as_slice() {
        [JsExpression::String(name)] => Some(name),
        _ => None,
    }
}
