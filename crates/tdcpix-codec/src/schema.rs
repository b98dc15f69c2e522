//! Schema: validated table of [Field]s used to pack values into a word and unpack them again.

use std::{borrow::Cow, collections::BTreeMap};

use crate::{
    bits::{extract_bits, insert_bits, mask},
    errors::{CompileError, DecodeError, EncodeError},
    field::{Field, FieldRule},
};

/// Field values keyed by field name, as produced by [Schema::parse] and consumed by [Schema::serialize].
pub type FieldValues = BTreeMap<String, u64>;

/// A validated word layout. Use [Schema::compile] to build one from [Field]s, then
/// [Schema::pack]/[Schema::unpack] (positional) or [Schema::serialize]/[Schema::parse] (by name).
#[derive(Debug, Clone)]
pub struct Schema {
    width_bits: u32,
    fields: Cow<'static, [Field]>,
}

impl Schema {
    /// Validates `fields` against a word of `width_bits` bits.
    pub fn compile(width_bits: u32, fields: &[Field]) -> Result<Self, CompileError> {
        validate(width_bits, fields)?;

        Ok(Self {
            width_bits,
            fields: Cow::Owned(fields.to_vec()),
        })
    }

    /// Wraps a built-in table without validating it. The built-in tables are checked by tests.
    pub(crate) const fn from_static(width_bits: u32, fields: &'static [Field]) -> Self {
        Self {
            width_bits,
            fields: Cow::Borrowed(fields),
        }
    }

    pub fn width_bits(&self) -> u32 {
        self.width_bits
    }

    /// Fields in definition order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Packs one value per field, in definition order. Every value is checked
    /// against its field's rule; nothing is truncated.
    pub fn pack(&self, values: &[u64]) -> Result<u64, EncodeError> {
        if values.len() > self.fields.len() {
            return Err(EncodeError::UnknownField(format!("#{}", self.fields.len())));
        }

        let mut word = 0u64;

        for (index, field) in self.fields.iter().enumerate() {
            let value = *values
                .get(index)
                .ok_or(EncodeError::MissingField(field.name))?;

            field
                .check(value)
                .map_err(|violation| violation.into_encode(field, value))?;

            word = insert_bits(word, field.lsb, field.width, value);
        }

        Ok(word)
    }

    /// Packs named values. Constant fields may be left out and are filled in.
    pub fn serialize(&self, values: &FieldValues) -> Result<u64, EncodeError> {
        if let Some(unknown) = values.keys().find(|name| self.index_of(name).is_none()) {
            return Err(EncodeError::UnknownField(unknown.clone()));
        }

        let mut ordered = Vec::with_capacity(self.fields.len());

        for field in self.fields.iter() {
            let value = match (values.get(field.name), field.rule) {
                (Some(value), _) => *value,
                (None, FieldRule::Constant(constant)) => constant,
                (None, _) => return Err(EncodeError::MissingField(field.name)),
            };
            ordered.push(value);
        }

        self.pack(&ordered)
    }

    /// Extracts every field in definition order and checks its rule.
    pub fn unpack(&self, word: u64) -> Result<Vec<u64>, DecodeError> {
        if word > mask(self.width_bits) {
            return Err(DecodeError::ValueTooWide(word));
        }

        let mut values = Vec::with_capacity(self.fields.len());

        for field in self.fields.iter() {
            let value = extract_bits(word, field.lsb, field.width);

            field
                .check(value)
                .map_err(|violation| violation.into_decode(field, value))?;

            values.push(value);
        }

        Ok(values)
    }

    /// Unpacks `word` into a map of field names to values.
    pub fn parse(&self, word: u64) -> Result<FieldValues, DecodeError> {
        let values = self.unpack(word)?;

        Ok(self
            .fields
            .iter()
            .zip(values)
            .map(|(field, value)| (field.name.to_string(), value))
            .collect())
    }
}

fn validate(width_bits: u32, fields: &[Field]) -> Result<(), CompileError> {
    if width_bits == 0 || width_bits > 64 {
        return Err(CompileError::InvalidWordWidth(width_bits));
    }

    let mut used = 0u64;

    for (index, field) in fields.iter().enumerate() {
        if field.name.is_empty() || fields[..index].iter().any(|f| f.name == field.name) {
            return Err(CompileError::InvalidFieldName(field.name));
        }

        if field.width == 0 {
            return Err(CompileError::InvalidFieldSize(field.name));
        }

        let fits_word = field
            .lsb
            .checked_add(field.width)
            .filter(|&end| end <= width_bits);
        if fits_word.is_none() {
            return Err(CompileError::FieldOutOfWord {
                field: field.name,
                end: field.msb(),
                width: width_bits,
            });
        }

        if used & field.word_mask() != 0 {
            let first = fields[..index]
                .iter()
                .find(|f| f.word_mask() & field.word_mask() != 0)
                .map_or(field.name, |f| f.name);

            return Err(CompileError::OverlappingFields {
                first,
                second: field.name,
            });
        }
        used |= field.word_mask();

        let fits = match field.rule {
            FieldRule::Range { max } => max <= mask(field.width),
            FieldRule::Constant(value) => value <= mask(field.width),
            FieldRule::OneHot | FieldRule::OneHotOrZero => true,
        };
        if !fits {
            return Err(CompileError::InvalidFieldRule(field.name));
        }
    }

    Ok(())
}
