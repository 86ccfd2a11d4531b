//! Completion item construction
//!
//! Items carry no replacement range; the resolver attaches one range to the
//! whole list it returns, so cached lists stay immutable and shareable.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::symbol::{Symbol, SymbolKind};

/// Kind tag shown next to a completion label.
///
/// Mirrors the host editor's item-kind vocabulary; runtime-reported values
/// name their kind with these same tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompletionItemKind {
    Function,
    Method,
    /// Hooks render as events.
    Event,
    Enum,
    Snippet,
    Constant,
    Keyword,
    Module,
    Variable,
    Field,
    Property,
    Class,
    Value,
    Text,
}

impl FromStr for CompletionItemKind {
    type Err = ();

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "Function" => Ok(CompletionItemKind::Function),
            "Method" => Ok(CompletionItemKind::Method),
            "Event" => Ok(CompletionItemKind::Event),
            "Enum" => Ok(CompletionItemKind::Enum),
            "Snippet" => Ok(CompletionItemKind::Snippet),
            "Constant" => Ok(CompletionItemKind::Constant),
            "Keyword" => Ok(CompletionItemKind::Keyword),
            "Module" => Ok(CompletionItemKind::Module),
            "Variable" => Ok(CompletionItemKind::Variable),
            "Field" => Ok(CompletionItemKind::Field),
            "Property" => Ok(CompletionItemKind::Property),
            "Class" => Ok(CompletionItemKind::Class),
            "Value" => Ok(CompletionItemKind::Value),
            "Text" => Ok(CompletionItemKind::Text),
            _ => Err(()),
        }
    }
}

/// One completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    /// One-line summary shown inline.
    pub detail: Option<String>,
    /// Longer documentation for the suggest widget.
    pub documentation: Option<String>,
    pub insert_text: String,
    /// Interpret `insert_text` as a snippet with tab-stop placeholders.
    pub insert_as_snippet: bool,
    /// Sort override; methods sort by bare name so owners interleave.
    pub sort_text: Option<String>,
    /// Filter override; methods filter by bare name.
    pub filter_text: Option<String>,
    pub deprecated: bool,
}

impl CompletionItem {
    /// Plain item inserting its own label.
    pub fn plain(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        let label = label.into();
        CompletionItem {
            insert_text: label.clone(),
            label,
            kind,
            detail: None,
            documentation: None,
            insert_as_snippet: false,
            sort_text: None,
            filter_text: None,
            deprecated: false,
        }
    }

    /// Item for a documented function, hook or method symbol.
    pub fn function(symbol: &Symbol) -> Self {
        let kind = match symbol.kind {
            SymbolKind::Hook => CompletionItemKind::Event,
            SymbolKind::ClassMethod | SymbolKind::PanelMethod => CompletionItemKind::Method,
            _ => CompletionItemKind::Function,
        };
        let bare_sort = symbol.kind.is_colon_called().then(|| symbol.name.clone());
        CompletionItem {
            label: symbol.fullname.clone(),
            kind,
            detail: Some(symbol.detail()),
            documentation: Some(symbol.suggest_documentation()),
            insert_text: symbol.usage_snippet(),
            insert_as_snippet: symbol.has_args(),
            sort_text: bare_sort.clone(),
            filter_text: bare_sort,
            deprecated: symbol.is_deprecated(),
        }
    }

    /// Item for an enum key.
    pub fn enumeration(symbol: &Symbol) -> Self {
        let mut doc = symbol.description.text.clone();
        if let Some(group) = symbol.group_description.as_deref().filter(|text| !text.is_empty()) {
            if !doc.is_empty() {
                doc.push_str("\n\n");
            }
            doc.push_str(group);
        }
        CompletionItem {
            label: symbol.fullname.clone(),
            kind: CompletionItemKind::Enum,
            detail: Some(format!("Value: {}", symbol.value.as_deref().unwrap_or(""))),
            documentation: Some(doc),
            insert_text: symbol.fullname.clone(),
            insert_as_snippet: false,
            sort_text: None,
            filter_text: None,
            deprecated: false,
        }
    }

    /// Item for a registered snippet.
    pub fn snippet(symbol: &Symbol) -> Self {
        CompletionItem {
            label: symbol.name.clone(),
            kind: CompletionItemKind::Snippet,
            detail: None,
            documentation: None,
            insert_text: symbol.template.clone().unwrap_or_default(),
            insert_as_snippet: true,
            sort_text: None,
            filter_text: None,
            deprecated: false,
        }
    }

    /// Item for a runtime-reported interface value.
    pub fn interface_value(symbol: &Symbol) -> Self {
        let kind = symbol.value_kind.unwrap_or(CompletionItemKind::Variable);
        let callable = matches!(
            kind,
            CompletionItemKind::Function | CompletionItemKind::Method
        );
        let insert_text = if callable {
            format!("{}()", symbol.call_name())
        } else {
            symbol.fullname.clone()
        };
        let bare_sort = symbol.is_method.then(|| symbol.name.clone());
        CompletionItem {
            label: symbol.fullname.clone(),
            kind,
            detail: None,
            documentation: (!symbol.description.text.is_empty())
                .then(|| symbol.description.text.clone()),
            insert_text,
            insert_as_snippet: false,
            sort_text: bare_sort.clone(),
            filter_text: bare_sort,
            deprecated: false,
        }
    }

    /// Item offering a hook name as a quoted string literal.
    pub fn hook_literal(symbol: &Symbol, pre_quote: bool) -> Self {
        CompletionItem {
            label: format!("\"{}\"", symbol.name),
            kind: CompletionItemKind::Event,
            detail: Some(symbol.usage_text()),
            documentation: (!symbol.description.text.is_empty())
                .then(|| symbol.description.text.clone()),
            insert_text: if pre_quote {
                format!("\"{}\"", symbol.name)
            } else {
                symbol.name.clone()
            },
            insert_as_snippet: false,
            sort_text: None,
            filter_text: None,
            deprecated: symbol.is_deprecated(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Argument, SymbolKind};

    #[test]
    fn kind_tags_round_trip_from_host_strings() {
        assert_eq!("Method".parse(), Ok(CompletionItemKind::Method));
        assert!("NoSuchKind".parse::<CompletionItemKind>().is_err());
    }

    #[test]
    fn method_items_sort_and_filter_by_bare_name() {
        let mut sym = Symbol::function(SymbolKind::ClassMethod, "SetPos", Some("Entity".to_owned()));
        sym.args = vec![Argument {
            name: "pos".to_owned(),
            type_name: "Vector".to_owned(),
            default: None,
            text: String::new(),
        }];
        let item = CompletionItem::function(&sym);
        assert_eq!(item.label, "Entity:SetPos");
        assert_eq!(item.sort_text.as_deref(), Some("SetPos"));
        assert_eq!(item.filter_text.as_deref(), Some("SetPos"));
        assert!(item.insert_as_snippet);
        assert_eq!(item.insert_text, "SetPos(${1:Vector_pos})");
    }

    #[test]
    fn hook_literal_quoting_follows_trigger() {
        let sym = Symbol::function(SymbolKind::Hook, "Think", Some("GM".to_owned()));
        assert_eq!(CompletionItem::hook_literal(&sym, true).insert_text, "\"Think\"");
        assert_eq!(CompletionItem::hook_literal(&sym, false).insert_text, "Think");
        assert_eq!(CompletionItem::hook_literal(&sym, true).label, "\"Think\"");
    }

    #[test]
    fn callable_interface_values_insert_call_parens() {
        let mut sym = Symbol::base_for_tests("ply.GetName", "GetName");
        sym.is_method = false;
        sym.value_kind = Some(CompletionItemKind::Function);
        let item = CompletionItem::interface_value(&sym);
        assert_eq!(item.insert_text, "ply.GetName()");
    }
}

#[cfg(test)]
impl Symbol {
    /// Test helper: a bare interface value.
    pub(crate) fn base_for_tests(fullname: &str, name: &str) -> Symbol {
        let mut sym = Symbol::function(SymbolKind::InterfaceValue, name, None);
        sym.fullname = fullname.to_owned();
        sym
    }
}
