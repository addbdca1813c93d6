//! Annotation rendering
//!
//! Renders TypeInfos as TypeScript-style annotation text and builds the
//! inferred signature of a traced location from its combined record.

use std::fmt;

use super::combine::{combine_traces, combine_types};
use super::store::TypeStore;
use super::types::{FunctionId, PrimitiveKind, ShapeId, TypeInfo};
use crate::error::{TraceError, TraceResult};
use crate::trace::CallRecord;

/// Source of the records traced for a function identity
pub trait TraceLookup {
    fn function_records(&self, id: FunctionId) -> Option<Vec<CallRecord>>;
}

/// Lookup that knows no traces; every function renders as `Function`
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTraces;

impl TraceLookup for NoTraces {
    fn function_records(&self, _id: FunctionId) -> Option<Vec<CallRecord>> {
        None
    }
}

/// Annotation text for one location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredSignature {
    pub params: Vec<String>,
    /// Combined yield type; present for generators only
    pub yields: Option<String>,
    /// Absent when the combined return type is exactly `undefined`
    pub returns: Option<String>,
}

impl InferredSignature {
    pub fn is_generator(&self) -> bool {
        self.yields.is_some()
    }

    /// Return annotation: the return type, or `Generator<Y, R>` for generators
    pub fn return_annotation(&self) -> Option<String> {
        match (&self.yields, &self.returns) {
            (Some(y), Some(r)) => Some(format!("Generator<{y}, {r}>")),
            (Some(y), None) => Some(format!("Generator<{y}>")),
            (None, returns) => returns.clone(),
        }
    }
}

impl fmt::Display for InferredSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "arg{i}: {param}")?;
        }
        write!(f, ")")?;
        if let Some(ret) = self.return_annotation() {
            write!(f, ": {ret}")?;
        }
        Ok(())
    }
}

pub struct Renderer<'a> {
    store: &'a mut TypeStore,
    traces: &'a dyn TraceLookup,
    shapes: Vec<ShapeId>,
    functions: Vec<FunctionId>,
}

impl<'a> Renderer<'a> {
    pub fn new(store: &'a mut TypeStore, traces: &'a dyn TraceLookup) -> Self {
        Self {
            store,
            traces,
            shapes: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Inferred signature from the records of one trace set
    pub fn signature(&mut self, records: &[CallRecord]) -> TraceResult<InferredSignature> {
        let combined = combine_traces(self.store, records);
        let params = combined
            .args
            .iter()
            .map(|arg| self.render(arg))
            .collect::<TraceResult<Vec<_>>>()?;
        let yields = match combined.yields.first() {
            Some(y) => Some(self.render(y)?),
            None => None,
        };
        let returns = if combined.returns.is_undefined() {
            None
        } else {
            Some(self.render(&combined.returns)?)
        };
        Ok(InferredSignature {
            params,
            yields,
            returns,
        })
    }

    pub fn render(&mut self, ty: &TypeInfo) -> TraceResult<String> {
        match ty {
            TypeInfo::Primitive(PrimitiveKind::Symbol) => Err(TraceError::NotImplemented(
                "symbol literal types".to_string(),
            )),
            TypeInfo::Primitive(kind) => Ok(kind.as_str().to_string()),
            TypeInfo::Class(id) => {
                let name = &self.store.class_info(*id).name;
                Ok(if name.is_empty() {
                    "object".to_string()
                } else {
                    name.to_string()
                })
            }
            TypeInfo::Union(members) => self.render_union(members),
            TypeInfo::Array(elems) => self.render_array(elems),
            TypeInfo::Object(id) => self.render_object(*id),
            TypeInfo::Function(id) => self.render_function(*id),
        }
    }

    fn render_member(&mut self, ty: &TypeInfo) -> TraceResult<String> {
        let text = self.render(ty)?;
        Ok(if matches!(ty, TypeInfo::Function(_)) && text != "Function" {
            format!("({text})")
        } else {
            text
        })
    }

    fn render_union(&mut self, members: &[TypeInfo]) -> TraceResult<String> {
        let mut parts = Vec::with_capacity(members.len());
        for member in members {
            let text = self.render_member(member)?;
            if !parts.contains(&text) {
                parts.push(text);
            }
        }
        Ok(parts.join("|"))
    }

    fn render_array(&mut self, elems: &[TypeInfo]) -> TraceResult<String> {
        if elems.is_empty() {
            return Ok("unknown[]".to_string());
        }
        let elem = combine_types(self.store, elems.to_vec());
        let text = self.render_member(&elem)?;
        Ok(if matches!(elem, TypeInfo::Union(_)) {
            format!("({text})[]")
        } else {
            format!("{text}[]")
        })
    }

    fn render_object(&mut self, id: ShapeId) -> TraceResult<String> {
        if self.shapes.contains(&id) {
            return Ok("object".to_string());
        }
        let fields = self.store.shape(id).fields.clone();
        if fields.is_empty() {
            return Ok("{}".to_string());
        }
        self.shapes.push(id);
        let mut parts = Vec::with_capacity(fields.len());
        for (key, ty) in &fields {
            let key = property_key(key);
            let present: Vec<TypeInfo> = ty
                .members()
                .iter()
                .filter(|m| !m.is_undefined())
                .cloned()
                .collect();
            let part = if !ty.includes_undefined() {
                format!("{key}: {}", self.render(ty)?)
            } else if present.is_empty() {
                format!("{key}?: undefined")
            } else if present.len() == 1 {
                format!("{key}?: {}", self.render(&present[0])?)
            } else {
                format!("{key}?: {}", self.render_union(&present)?)
            };
            parts.push(part);
        }
        self.shapes.pop();
        Ok(format!("{{ {} }}", parts.join(", ")))
    }

    fn render_function(&mut self, id: FunctionId) -> TraceResult<String> {
        if self.functions.contains(&id) {
            return Ok("Function".to_string());
        }
        let records = match self.traces.function_records(id) {
            Some(records) if !records.is_empty() => records,
            _ => return Ok("Function".to_string()),
        };
        self.functions.push(id);
        let signature = self.signature(&records);
        self.functions.pop();
        let signature = signature?;

        let params = signature
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| format!("arg{i}: {p}"))
            .collect::<Vec<_>>()
            .join(", ");
        let ret = signature
            .return_annotation()
            .unwrap_or_else(|| "void".to_string());
        Ok(format!("({params}) => {ret}"))
    }
}

impl fmt::Debug for Renderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("shapes", &self.shapes)
            .field("functions", &self.functions)
            .finish()
    }
}

/// Quote keys that are not plain identifiers
fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_ident = match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if is_ident {
        key.to_string()
    } else {
        serde_json::to_string(key).unwrap_or_else(|_| format!("\"{key}\""))
    }
}
