//! Runtime symbol extension
//!
//! The game reports values it discovers at runtime: single records through
//! [`RuntimeValue`], or the REPL's bulk dump of every global through
//! [`ClientReport`]. Both converge into `InterfaceValue` symbols in the same
//! repository as documented built-ins; fullnames already known are skipped
//! by the repository's first-write-wins rule.

use serde::{Deserialize, Serialize};

use glua_symbols::{CompletionItemKind, Symbol, SymbolKind, SymbolRepository};

/// One host-reported value, as sent over the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeValue {
    /// Qualified key (`game.GetMap`, `Player:Nick`, `MyGlobal`).
    pub fullname: String,
    /// Bare name; derived from `fullname` when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Callable with `:` on an instance.
    #[serde(default)]
    pub class_function: bool,
    #[serde(default)]
    pub description: Option<String>,
    /// Host-side completion kind tag (`"Function"`, `"Method"`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl RuntimeValue {
    fn derived_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ if self.class_function => self
                .fullname
                .rsplit(':')
                .next()
                .unwrap_or(&self.fullname)
                .to_owned(),
            _ => self.fullname.clone(),
        }
    }

    /// Convert into the repository's symbol shape.
    pub fn into_symbol(self) -> Symbol {
        let name = self.derived_name();
        let mut symbol = Symbol::function(SymbolKind::InterfaceValue, name, None);
        symbol.fullname = self.fullname;
        symbol.is_method = self.class_function;
        symbol.description.text = self.description.unwrap_or_default();
        symbol.value_kind = self.kind.and_then(|tag| tag.parse().ok());
        symbol
    }
}

/// The REPL's bulk report: two pipe-separated lists covering every global
/// value and every reachable function the client could see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientReport {
    /// Global non-table values (`MyGlobal|game.MaxPlayers|...`).
    pub values: String,
    /// Global functions and object methods (`print|game.GetMap|Player:Nick|...`).
    pub funcs: String,
}

impl ClientReport {
    /// Import the report: every dotted prefix becomes a module marker, every
    /// entry an interface value unless its fullname is already known.
    pub fn apply(&self, repository: &mut SymbolRepository) {
        let mut tables: Vec<String> = Vec::new();
        let mut note_table = |tables: &mut Vec<String>, table: &str| {
            if !table.is_empty() && !tables.iter().any(|known| known == table) {
                tables.push(table.to_owned());
            }
        };

        for value in self.values.split('|').filter(|entry| !entry.is_empty()) {
            let mut name = value.to_owned();
            if let Some(idx) = value.rfind('.') {
                name = value[idx + 1..].to_owned();
                note_table(&mut tables, &value[..idx]);
            }
            repository.add(
                RuntimeValue {
                    fullname: value.to_owned(),
                    name: Some(name),
                    class_function: false,
                    description: None,
                    kind: Some("Variable".to_owned()),
                }
                .into_symbol(),
            );
        }

        for func in self.funcs.split('|').filter(|entry| !entry.is_empty()) {
            let mut name = func.to_owned();
            let mut class_function = false;
            let mut kind = CompletionItemKind::Function;
            if let Some(idx) = func.rfind('.') {
                name = func[idx + 1..].to_owned();
                note_table(&mut tables, &func[..idx]);
            } else if let Some(idx) = func.rfind(':') {
                name = func[idx + 1..].to_owned();
                class_function = true;
                kind = CompletionItemKind::Method;
            }
            let mut symbol = RuntimeValue {
                fullname: func.to_owned(),
                name: Some(name),
                class_function,
                description: None,
                kind: None,
            }
            .into_symbol();
            symbol.value_kind = Some(kind);
            repository.add(symbol);
        }

        for table in tables {
            repository.add(Symbol::module(table));
        }
    }
}
