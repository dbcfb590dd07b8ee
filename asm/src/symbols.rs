use indexmap::IndexMap;

use arch::op::OpKind;

use crate::error::Error;

/// Longest accepted symbol name, in chars.
pub const MAX_LABEL_LEN: usize = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Code,
    Data,
    External,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub value: u32,
    pub kind: SymbolKind,
    pub is_entry: bool,
}

/// Ordered, unique-by-name symbol collection. Entries are appended during
/// the first pass and only mutated afterward: the data-base fixup and the
/// `.entry` flag. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct SymbolTable(IndexMap<String, Symbol>);

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable(IndexMap::new())
    }

    /// Validates the name and rejects re-declarations without touching the
    /// existing entry.
    pub fn insert(&mut self, name: &str, value: u32, kind: SymbolKind) -> Result<(), Error> {
        check_label(name)?;
        if self.0.contains_key(name) {
            return Err(Error::SymbolAlreadyExists(name.to_string()));
        }
        self.0.insert(
            name.to_string(),
            Symbol {
                value,
                kind,
                is_entry: false,
            },
        );
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    /// Flags an existing symbol as an entry. Never auto-creates.
    pub fn mark_entry(&mut self, name: &str) -> bool {
        match self.0.get_mut(name) {
            Some(symbol) => {
                symbol.is_entry = true;
                true
            }
            None => false,
        }
    }

    /// One-shot fixup once the code segment's final size is known.
    pub fn offset_data(&mut self, base: u32) {
        for symbol in self.0.values_mut() {
            if symbol.kind == SymbolKind::Data {
                symbol.value += base;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.0.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Label rules: starts with an ASCII letter, ASCII alphanumerics only, at
/// most [`MAX_LABEL_LEN`] chars, and never a reserved mnemonic.
pub fn check_label(label: &str) -> Result<(), Error> {
    if label.len() > MAX_LABEL_LEN {
        return Err(Error::LabelTooLong(label.to_string()));
    }
    match label.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(Error::InvalidLabel(label.to_string())),
    }
    if !label.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidLabel(label.to_string()));
    }
    if OpKind::parse(label).is_some() {
        return Err(Error::InvalidLabel(label.to_string()));
    }
    Ok(())
}
