// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
pub mod cast;
pub mod function;

use std::sync::Arc;

use tracing::error;

use crate::common::error::{CastError, Result};
use crate::exec::context::EvalContext;
use crate::types::{Charset, Datum, Decimal, EvalType, FieldKind, FieldType, ScalarValue};

use self::cast::CastSignature;
use self::function::FunctionKind;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExprId(pub usize);

#[derive(Clone, Debug)]
pub enum ExprNode {
    Literal(Datum),
    /// Hexadecimal or bit-value literal (`x'41'`, `b'1000001'`). Reads as its
    /// bytes in a string context and as a big-endian unsigned number otherwise.
    BinaryLiteral(Vec<u8>),
    /// Position of the value in the evaluated row.
    Column(usize),
    Cast {
        child: ExprId,
        sig: Arc<CastSignature>,
    },
    /// Validates binary-charset bytes against the charset of this node's type.
    FromBinary(ExprId),
    FunctionCall {
        kind: FunctionKind,
        args: Vec<ExprId>,
    },
}

/// Flat storage for expression trees. Nodes refer to their children by
/// [`ExprId`]; every node carries its static [`FieldType`].
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
    types: Vec<FieldType>,
}

impl ExprArena {
    pub fn push_typed(&mut self, node: ExprNode, field_type: FieldType) -> ExprId {
        let id = ExprId(self.nodes.len());
        self.nodes.push(node);
        self.types.push(field_type);
        id
    }

    pub fn literal(&mut self, value: Datum, field_type: FieldType) -> ExprId {
        self.push_typed(ExprNode::Literal(value), field_type)
    }

    pub fn binary_literal(&mut self, bytes: impl Into<Vec<u8>>) -> ExprId {
        let bytes = bytes.into();
        let mut field_type = FieldType::new(FieldKind::VarString).with_flen(bytes.len() as i32);
        field_type.set_binary_charset();
        self.push_typed(ExprNode::BinaryLiteral(bytes), field_type)
    }

    pub fn column(&mut self, index: usize, field_type: FieldType) -> ExprId {
        self.push_typed(ExprNode::Column(index), field_type)
    }

    pub fn node(&self, id: ExprId) -> Option<&ExprNode> {
        self.nodes.get(id.0)
    }

    pub fn data_type(&self, id: ExprId) -> Option<&FieldType> {
        self.types.get(id.0)
    }

    pub(crate) fn get(&self, id: ExprId) -> Result<&ExprNode> {
        self.node(id).ok_or_else(|| invalid_expr_id(id))
    }

    pub(crate) fn field_type(&self, id: ExprId) -> Result<&FieldType> {
        self.data_type(id).ok_or_else(|| invalid_expr_id(id))
    }

    pub(crate) fn set_node(&mut self, id: ExprId, node: ExprNode) -> Result<()> {
        let slot = self.nodes.get_mut(id.0).ok_or_else(|| invalid_expr_id(id))?;
        *slot = node;
        Ok(())
    }

    /// Narrows the declared precision and scale of a decimal cast. Only valid
    /// before the expression is evaluated for any row.
    pub(crate) fn narrow_decimal(&mut self, id: ExprId, precision: i32, frac: i32) -> Result<()> {
        let field_type = self.types.get_mut(id.0).ok_or_else(|| invalid_expr_id(id))?;
        field_type.set_decimal_under_limit(frac);
        field_type.set_flen_under_limit(precision);
        let narrowed = field_type.clone();
        if let Some(ExprNode::Cast { sig, .. }) = self.nodes.get_mut(id.0) {
            *Arc::make_mut(sig).target_mut() = narrowed;
        }
        Ok(())
    }

    pub fn is_binary_literal(&self, id: ExprId) -> bool {
        matches!(self.node(id), Some(ExprNode::BinaryLiteral(_)))
    }

    /// True when the value does not depend on the row.
    pub fn is_constant(&self, id: ExprId) -> bool {
        match self.node(id) {
            Some(ExprNode::Literal(_)) | Some(ExprNode::BinaryLiteral(_)) => true,
            Some(ExprNode::Column(_)) | None => false,
            Some(ExprNode::Cast { child, .. }) | Some(ExprNode::FromBinary(child)) => {
                self.is_constant(*child)
            }
            Some(ExprNode::FunctionCall { args, .. }) => args.iter().all(|a| self.is_constant(*a)),
        }
    }

    /// Evaluates `id` in the domain of its static type.
    pub fn eval(&self, id: ExprId, row: &[Datum], ctx: &mut EvalContext) -> Result<Datum> {
        let domain = self.field_type(id)?.eval_type();
        self.eval_as(id, domain, row, ctx)
    }

    /// Evaluates `id` and reads the value in `domain`. Besides the static
    /// domain, ENUM, SET and BIT values can be read numerically or as text,
    /// and binary literals in any numeric domain.
    pub fn eval_as(
        &self,
        id: ExprId,
        domain: EvalType,
        row: &[Datum],
        ctx: &mut EvalContext,
    ) -> Result<Datum> {
        let field_type = self.field_type(id)?;
        let value = match self.get(id)? {
            ExprNode::Literal(v) => v.clone(),
            ExprNode::Column(index) => row
                .get(*index)
                .cloned()
                .ok_or_else(|| CastError::internal(format!("row has no column {index}")))?,
            ExprNode::BinaryLiteral(bytes) => return binary_literal_as(bytes, domain, ctx).map(Some),
            ExprNode::Cast { child, sig } => cast::eval_cast(self, sig, *child, row, ctx)?,
            ExprNode::FromBinary(child) => self.eval_from_binary(*child, field_type, row, ctx)?,
            ExprNode::FunctionCall { kind, args } => {
                return function::eval_function(self, *kind, args, domain, row, ctx);
            }
        };
        value.map(|v| view_as(v, field_type, domain)).transpose()
    }

    fn eval_from_binary(
        &self,
        child: ExprId,
        field_type: &FieldType,
        row: &[Datum],
        ctx: &mut EvalContext,
    ) -> Result<Datum> {
        let Some(value) = self.eval_as(child, EvalType::String, row, ctx)? else {
            return Ok(None);
        };
        let bytes = value.into_bytes()?;
        let charset = field_type.charset;
        if charset.first_invalid(&bytes).is_none() {
            return Ok(Some(ScalarValue::Str(bytes)));
        }
        ctx.handle_truncate(CastError::cannot_convert_string(
            &bytes,
            Charset::Binary.name(),
            charset.name(),
        ))?;
        Ok(Some(ScalarValue::Str(charset.sanitize(&bytes))))
    }
}

fn invalid_expr_id(id: ExprId) -> CastError {
    CastError::internal(format!("invalid ExprId {}", id.0))
}

/// 1-based member position, 0 for the empty string or an unknown name.
fn enum_index(elems: &[String], name: &[u8]) -> u64 {
    elems
        .iter()
        .position(|e| e.as_bytes().eq_ignore_ascii_case(name))
        .map_or(0, |pos| pos as u64 + 1)
}

fn set_mask(elems: &[String], names: &[u8]) -> u64 {
    names
        .split(|b| *b == b',')
        .filter(|name| !name.is_empty())
        .map(|name| match enum_index(elems, name) {
            0 => 0,
            pos => 1u64 << (pos - 1),
        })
        .fold(0, |mask, bit| mask | bit)
}

fn enum_name(elems: &[String], index: u64) -> Vec<u8> {
    index
        .checked_sub(1)
        .and_then(|pos| elems.get(pos as usize))
        .map(|e| e.as_bytes().to_vec())
        .unwrap_or_default()
}

fn set_names(elems: &[String], mask: u64) -> Vec<u8> {
    let names: Vec<&str> = elems
        .iter()
        .enumerate()
        .filter(|(pos, _)| *pos < 64 && mask & (1u64 << pos) != 0)
        .map(|(_, e)| e.as_str())
        .collect();
    names.join(",").into_bytes()
}

/// Big-endian bytes of a BIT value, `ceil(flen / 8)` of them.
fn bit_bytes(value: u64, flen: i32) -> Vec<u8> {
    let width = if flen > 0 {
        (flen as usize).div_ceil(8)
    } else {
        (64 - value.leading_zeros() as usize).div_ceil(8).max(1)
    };
    let bytes = value.to_be_bytes();
    bytes[8 - width.min(8)..].to_vec()
}

fn numeric_view(value: u64, domain: EvalType) -> Result<ScalarValue> {
    match domain {
        EvalType::Int => Ok(ScalarValue::uint(value)),
        EvalType::Real => Ok(ScalarValue::Real(value as f64)),
        EvalType::Decimal => Ok(ScalarValue::Decimal(Decimal::from_u64(value))),
        other => Err(CastError::internal(format!(
            "numeric value cannot be read as {other}"
        ))),
    }
}

fn view_as(value: ScalarValue, field_type: &FieldType, domain: EvalType) -> Result<ScalarValue> {
    if value.eval_type() == domain {
        return Ok(value);
    }
    match (value, field_type.kind) {
        (ScalarValue::Str(name), FieldKind::Enum) => {
            numeric_view(enum_index(&field_type.elems, &name), domain)
        }
        (ScalarValue::Str(names), FieldKind::Set) => {
            numeric_view(set_mask(&field_type.elems, &names), domain)
        }
        (ScalarValue::Int(index), FieldKind::Enum) if domain == EvalType::String => Ok(
            ScalarValue::Str(enum_name(&field_type.elems, index as u64)),
        ),
        (ScalarValue::Int(mask), FieldKind::Set) if domain == EvalType::String => {
            Ok(ScalarValue::Str(set_names(&field_type.elems, mask as u64)))
        }
        (ScalarValue::Int(bits), FieldKind::Bit) if domain == EvalType::String => {
            Ok(ScalarValue::Str(bit_bytes(bits as u64, field_type.flen)))
        }
        (ScalarValue::Int(bits), FieldKind::Bit) => numeric_view(bits as u64, domain),
        (value, _) => {
            error!(
                "{} value of a {} expression read as {}",
                value.eval_type(),
                field_type.sql_name(),
                domain
            );
            Err(CastError::internal(format!(
                "cannot read a {} value of type {} as {domain}",
                value.eval_type(),
                field_type.sql_name()
            )))
        }
    }
}

fn binary_literal_as(bytes: &[u8], domain: EvalType, ctx: &mut EvalContext) -> Result<ScalarValue> {
    if domain == EvalType::String {
        return Ok(ScalarValue::Str(bytes.to_vec()));
    }
    let significant = match bytes.iter().position(|b| *b != 0) {
        Some(start) => &bytes[start..],
        None => &[],
    };
    let value = if significant.len() > 8 {
        ctx.handle_truncate(CastError::data_truncated(8, significant.len()))?;
        u64::MAX
    } else {
        significant
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
    };
    numeric_view(value, domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enum_type() -> FieldType {
        FieldType::new(FieldKind::Enum).with_elems(["a", "b", "c"])
    }

    #[test]
    fn test_enum_and_set_numeric_views() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let e = arena.column(0, enum_type());
        let s = arena.column(1, FieldType::new(FieldKind::Set).with_elems(["x", "y", "z"]));
        let row = vec![Some(ScalarValue::str("b")), Some(ScalarValue::str("x,z"))];

        assert_eq!(
            arena.eval(e, &row, &mut ctx).unwrap(),
            Some(ScalarValue::str("b"))
        );
        assert_eq!(
            arena.eval_as(e, EvalType::Int, &row, &mut ctx).unwrap(),
            Some(ScalarValue::Int(2))
        );
        assert_eq!(
            arena.eval_as(s, EvalType::Real, &row, &mut ctx).unwrap(),
            Some(ScalarValue::Real(5.0))
        );
    }

    #[test]
    fn test_bit_string_view_uses_declared_width() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let b = arena.column(0, FieldType::new(FieldKind::Bit).with_flen(12));
        let row = vec![Some(ScalarValue::Int(0x41))];
        assert_eq!(
            arena.eval_as(b, EvalType::String, &row, &mut ctx).unwrap(),
            Some(ScalarValue::Str(vec![0x00, 0x41]))
        );
    }

    #[test]
    fn test_binary_literal_reads_big_endian() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let lit = arena.binary_literal(vec![0x01, 0x00]);
        assert!(arena.is_binary_literal(lit));
        assert!(arena.data_type(lit).unwrap().is_binary_str());
        assert_eq!(
            arena.eval_as(lit, EvalType::Int, &[], &mut ctx).unwrap(),
            Some(ScalarValue::Int(256))
        );
        assert_eq!(
            arena.eval(lit, &[], &mut ctx).unwrap(),
            Some(ScalarValue::Str(vec![0x01, 0x00]))
        );
    }

    #[test]
    fn test_wide_binary_literal_truncates() {
        let mut arena = ExprArena::default();
        let lit = arena.binary_literal(vec![0xff; 9]);

        let mut strict = EvalContext::new().with_strict_mode(true);
        assert!(arena.eval_as(lit, EvalType::Int, &[], &mut strict).is_err());

        let mut lax = EvalContext::new().with_strict_mode(false);
        assert_eq!(
            arena.eval_as(lit, EvalType::Int, &[], &mut lax).unwrap(),
            Some(ScalarValue::uint(u64::MAX))
        );
        assert_eq!(lax.warnings().len(), 1);
    }

    #[test]
    fn test_domain_mismatch_is_internal() {
        let mut arena = ExprArena::default();
        let mut ctx = EvalContext::new();
        let lit = arena.literal(
            Some(ScalarValue::str("1")),
            FieldType::new(FieldKind::Varchar),
        );
        let err = arena.eval_as(lit, EvalType::Int, &[], &mut ctx).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_from_binary_validates_target_charset() {
        let mut arena = ExprArena::default();
        let mut source = FieldType::new(FieldKind::VarString);
        source.set_binary_charset();
        let col = arena.column(0, source.clone());
        let checked = arena.push_typed(
            ExprNode::FromBinary(col),
            source.with_charset(Charset::Utf8mb4, "utf8mb4_bin"),
        );
        let row = vec![Some(ScalarValue::Str(vec![b'a', 0xff]))];

        let mut strict = EvalContext::new().with_strict_mode(true);
        assert!(arena.eval(checked, &row, &mut strict).is_err());

        let mut lax = EvalContext::new().with_strict_mode(false);
        assert_eq!(
            arena.eval(checked, &row, &mut lax).unwrap(),
            Some(ScalarValue::str("a?"))
        );
        assert_eq!(lax.warnings().len(), 1);
    }

    #[test]
    fn test_constant_detection() {
        let mut arena = ExprArena::default();
        let lit = arena.literal(Some(ScalarValue::Int(1)), FieldType::new(FieldKind::LongLong));
        let col = arena.column(0, FieldType::new(FieldKind::LongLong));
        assert!(arena.is_constant(lit));
        assert!(!arena.is_constant(col));
        assert!(!arena.is_constant(ExprId(99)));
    }
}
