//! The symbol repository
//!
//! Owns every known symbol plus the two derived completion lists (global
//! scope and colon-call scope). Mutation is synchronous; the derived lists
//! are invalidated eagerly and rebuilt lazily on the next read, so repeated
//! reads without intervening mutation return the identical cached list.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::completion::{CompletionItem, CompletionItemKind};
use crate::symbol::{Symbol, SymbolKind, GAMEMODE_OWNER};

/// GLua keywords. Reserved: runtime symbols may not shadow them.
pub const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while", "continue",
];

/// Built-in constants, also reserved.
pub const BUILTIN_CONSTANTS: &[&str] = &["SERVER", "CLIENT", "_G", "_VERSION", "VERSION"];

/// Snippets every fresh repository starts with.
pub const BUILTIN_SNIPPETS: &[(&str, &str)] = &[
    ("local", "local ${1:x} = ${2:1}"),
    ("fun", "function ${1:fname}(${2:...})\n${3:-- body}\nend"),
    ("for", "for ${1:i}=${2:1},${3:10} do\n${4:print(i)}\nend"),
    (
        "forp",
        "for ${1:i},${2:v} in pairs(${3:table_name}) do\n${4:-- body}\nend",
    ),
    (
        "fori",
        "for ${1:i},${2:v} in ipairs(${3:table_name}) do\n${4:-- body}\nend",
    ),
    (
        "hookadd",
        "local function ${1:hookname}(${3:...})\n${4:-- body}\nend\nhook.Add(\"${1:hookname}\",${2:Tag},${1:hookname})",
    ),
];

/// Append to a category list unless the fullname is already present.
fn push_unique(list: &mut Vec<Arc<Symbol>>, symbol: Symbol) -> bool {
    if list.iter().any(|existing| existing.fullname == symbol.fullname) {
        debug!(fullname = %symbol.fullname, "duplicate fullname, first write wins");
        return false;
    }
    list.push(Arc::new(symbol));
    true
}

/// Symbol database with lazily cached completion lists.
#[derive(Debug)]
pub struct SymbolRepository {
    keywords: Vec<Arc<Symbol>>,
    constants: Vec<Arc<Symbol>>,
    snippets: Vec<Arc<Symbol>>,
    functions: Vec<Arc<Symbol>>,
    class_methods: Vec<Arc<Symbol>>,
    hooks: Vec<Arc<Symbol>>,
    enums: Vec<Arc<Symbol>>,
    interface_values: Vec<Arc<Symbol>>,
    /// Recognized namespace prefixes, insertion-ordered, name-only facts.
    modules: IndexSet<String>,
    /// Fullname lookup over every valued symbol.
    values: IndexMap<String, Arc<Symbol>>,
    /// Bare-name lookup for colon-called symbols; one name, many owners.
    methods: HashMap<String, Vec<Arc<Symbol>>>,
    /// Names runtime symbols may not collide with.
    reserved: HashSet<&'static str>,
    global_cache: Mutex<Option<Arc<Vec<CompletionItem>>>>,
    method_cache: Mutex<Option<Arc<Vec<CompletionItem>>>>,
}

impl Default for SymbolRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolRepository {
    /// Fresh repository seeded with keywords, constants and builtin snippets.
    pub fn new() -> Self {
        let mut repo = SymbolRepository {
            keywords: Vec::new(),
            constants: Vec::new(),
            snippets: Vec::new(),
            functions: Vec::new(),
            class_methods: Vec::new(),
            hooks: Vec::new(),
            enums: Vec::new(),
            interface_values: Vec::new(),
            modules: IndexSet::new(),
            values: IndexMap::new(),
            methods: HashMap::new(),
            reserved: KEYWORDS
                .iter()
                .chain(BUILTIN_CONSTANTS.iter())
                .copied()
                .collect(),
            global_cache: Mutex::new(None),
            method_cache: Mutex::new(None),
        };
        for word in KEYWORDS {
            repo.keywords.push(Arc::new(Symbol::keyword(*word)));
        }
        for name in BUILTIN_CONSTANTS {
            repo.constants.push(Arc::new(Symbol::constant(*name)));
        }
        for (name, template) in BUILTIN_SNIPPETS {
            repo.snippets.push(Arc::new(Symbol::snippet(*name, *template)));
        }
        repo
    }

    /// Add one symbol. First write wins on `fullname`; malformed or reserved
    /// records are dropped without mutating anything.
    pub fn add(&mut self, symbol: Symbol) {
        if symbol.fullname.is_empty() {
            warn!(kind = ?symbol.kind, "dropping symbol without a fullname");
            return;
        }
        if self.reserved.contains(symbol.fullname.as_str()) {
            debug!(fullname = %symbol.fullname, "rejecting symbol shadowing a reserved name");
            return;
        }
        match symbol.kind {
            SymbolKind::Module => {
                if self.modules.insert(symbol.fullname.clone()) {
                    self.invalidate_global();
                }
            }
            SymbolKind::Keyword => {
                if push_unique(&mut self.keywords, symbol) {
                    self.invalidate_global();
                }
            }
            SymbolKind::Constant => {
                if push_unique(&mut self.constants, symbol) {
                    self.invalidate_global();
                }
            }
            SymbolKind::Snippet => {
                if push_unique(&mut self.snippets, symbol) {
                    self.invalidate_global();
                }
            }
            SymbolKind::GlobalFunction
            | SymbolKind::ClassMethod
            | SymbolKind::PanelMethod
            | SymbolKind::Hook
            | SymbolKind::Enum
            | SymbolKind::InterfaceValue => self.add_valued(symbol),
        }
    }

    fn add_valued(&mut self, symbol: Symbol) {
        if self.values.contains_key(&symbol.fullname) {
            debug!(fullname = %symbol.fullname, "duplicate fullname, first write wins");
            return;
        }
        let symbol = Arc::new(symbol);
        let _ = self
            .values
            .insert(symbol.fullname.clone(), Arc::clone(&symbol));
        let colon_called =
            symbol.kind.is_colon_called() || (symbol.kind == SymbolKind::InterfaceValue && symbol.is_method);
        if colon_called {
            self.methods
                .entry(symbol.name.clone())
                .or_default()
                .push(Arc::clone(&symbol));
        }
        match symbol.kind {
            SymbolKind::GlobalFunction => {
                self.functions.push(symbol);
                self.invalidate_global();
            }
            SymbolKind::Enum => {
                self.enums.push(symbol);
                self.invalidate_global();
            }
            SymbolKind::ClassMethod | SymbolKind::PanelMethod => {
                self.class_methods.push(symbol);
                self.invalidate_methods();
            }
            SymbolKind::Hook => {
                // Hooks sit in the method list but are also reachable from
                // global text via registration literals.
                self.hooks.push(symbol);
                self.invalidate_all();
            }
            SymbolKind::InterfaceValue => {
                let is_method = symbol.is_method;
                self.interface_values.push(symbol);
                if is_method {
                    self.invalidate_methods();
                } else {
                    self.invalidate_global();
                }
            }
            _ => unreachable!("non-valued kinds are routed in add"),
        }
    }

    /// Register a user-defined completion snippet, replacing any existing
    /// snippet of the same name.
    pub fn register_snippet(&mut self, name: impl Into<String>, template: impl Into<String>) {
        let name = name.into();
        self.snippets.retain(|snippet| snippet.name != name);
        self.snippets
            .push(Arc::new(Symbol::snippet(name, template.into())));
        self.invalidate_global();
    }

    /// Look up a symbol by its qualified key.
    pub fn lookup(&self, fullname: &str) -> Option<&Arc<Symbol>> {
        self.values.get(fullname)
    }

    /// Look up colon-called symbols by bare name; ambiguity is expected.
    pub fn lookup_bare(&self, name: &str) -> &[Arc<Symbol>] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a dotted prefix names a recognized namespace.
    pub fn is_module(&self, name: &str) -> bool {
        self.modules.contains(name)
    }

    /// Snippet by name.
    pub fn find_snippet(&self, name: &str) -> Option<&Arc<Symbol>> {
        self.snippets.iter().find(|snippet| snippet.name == name)
    }

    /// Number of valued symbols (functions, methods, hooks, enums, values).
    pub fn symbol_count(&self) -> usize {
        self.values.len()
    }

    pub fn invalidate_global(&self) {
        *self.global_cache.lock() = None;
    }

    pub fn invalidate_methods(&self) {
        *self.method_cache.lock() = None;
    }

    pub fn invalidate_all(&self) {
        self.invalidate_global();
        self.invalidate_methods();
    }

    /// The global-scope completion list, built on first read after the last
    /// invalidation. Category order is fixed: functions, enums, snippets,
    /// constants, keywords, modules, non-method interface values.
    pub fn global_items(&self) -> Arc<Vec<CompletionItem>> {
        let mut cache = self.global_cache.lock();
        if let Some(items) = cache.as_ref() {
            return Arc::clone(items);
        }
        let items = Arc::new(self.build_global_list());
        *cache = Some(Arc::clone(&items));
        items
    }

    /// The colon-call completion list: class/panel methods, hooks, then
    /// method-flagged interface values, in insertion order.
    pub fn method_items(&self) -> Arc<Vec<CompletionItem>> {
        let mut cache = self.method_cache.lock();
        if let Some(items) = cache.as_ref() {
            return Arc::clone(items);
        }
        let items = Arc::new(self.build_method_list());
        *cache = Some(Arc::clone(&items));
        items
    }

    /// Hook names of the game-mode owner rendered as quoted string literals.
    pub fn hook_items(&self, pre_quote: bool) -> Vec<CompletionItem> {
        self.hooks
            .iter()
            .filter(|hook| hook.owner.as_deref() == Some(GAMEMODE_OWNER))
            .map(|hook| CompletionItem::hook_literal(hook, pre_quote))
            .collect()
    }

    fn build_global_list(&self) -> Vec<CompletionItem> {
        let mut items = Vec::new();
        items.extend(self.functions.iter().map(|sym| CompletionItem::function(sym)));
        items.extend(self.enums.iter().map(|sym| CompletionItem::enumeration(sym)));
        items.extend(self.snippets.iter().map(|sym| CompletionItem::snippet(sym)));
        items.extend(
            self.constants
                .iter()
                .map(|sym| CompletionItem::plain(sym.name.clone(), CompletionItemKind::Constant)),
        );
        items.extend(
            self.keywords
                .iter()
                .map(|sym| CompletionItem::plain(sym.name.clone(), CompletionItemKind::Keyword)),
        );
        items.extend(
            self.modules
                .iter()
                .map(|name| CompletionItem::plain(name.clone(), CompletionItemKind::Module)),
        );
        items.extend(
            self.interface_values
                .iter()
                .filter(|sym| !sym.is_method)
                .map(|sym| CompletionItem::interface_value(sym)),
        );
        items
    }

    fn build_method_list(&self) -> Vec<CompletionItem> {
        let mut items = Vec::new();
        items.extend(
            self.class_methods
                .iter()
                .map(|sym| CompletionItem::function(sym)),
        );
        items.extend(self.hooks.iter().map(|sym| CompletionItem::function(sym)));
        items.extend(
            self.interface_values
                .iter()
                .filter(|sym| sym.is_method)
                .map(|sym| CompletionItem::interface_value(sym)),
        );
        items
    }
}
