//! Canonical symbol records
//!
//! A [`Symbol`] is a single tagged record: the [`SymbolKind`] discriminator
//! selects which of the optional fields are meaningful. Documented built-ins,
//! enum keys, namespace markers and runtime-reported interface values all
//! share this shape so they converge into the same repository indexes.

use serde::{Deserialize, Serialize};

use crate::completion::CompletionItemKind;

/// Owner tag of game-mode hooks (`GM:Think` and friends).
pub const GAMEMODE_OWNER: &str = "GM";

/// Owner tag of functions living in the global table.
pub const GLOBAL_OWNER: &str = "Global";

/// Discriminator for the symbol record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Global or library function (`print`, `util.TableToJSON`).
    GlobalFunction,
    /// Method called with `:` on a class instance (`Entity:SetPos`).
    ClassMethod,
    /// Method called with `:` on a panel (`DButton:SetText`).
    PanelMethod,
    /// Game-mode hook (`Think`, `HUDPaint`).
    Hook,
    /// Enum key (`MOUSE_LEFT`).
    Enum,
    /// Namespace marker for a dotted table prefix (`util`, `hook`).
    Module,
    /// Built-in constant (`SERVER`, `CLIENT`).
    Constant,
    /// Language keyword (`local`, `function`).
    Keyword,
    /// Completion snippet with a template body.
    Snippet,
    /// Runtime-reported value from the host, possibly partial.
    InterfaceValue,
}

impl SymbolKind {
    /// Whether call sites for this kind use the bare name after a colon.
    pub fn is_colon_called(self) -> bool {
        matches!(
            self,
            SymbolKind::ClassMethod | SymbolKind::PanelMethod | SymbolKind::Hook
        )
    }
}

/// Free-text description with optional deprecation / internal markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Main text; first line doubles as the completion detail.
    pub text: String,
    /// Deprecation note, present iff the symbol is deprecated.
    pub deprecated: Option<String>,
    /// Internal-use note, present iff the symbol is engine-internal.
    pub internal: Option<String>,
}

/// One declared argument of a function symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Default value; `""` and `"nil"` are treated as absent for display.
    pub default: Option<String>,
    /// Per-argument documentation text.
    pub text: String,
}

impl Argument {
    /// Default value worth showing at call sites.
    pub fn display_default(&self) -> Option<&str> {
        match self.default.as_deref() {
            Some("") | Some("nil") | None => None,
            other => other,
        }
    }
}

/// One declared return value of a function symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnValue {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub text: String,
}

/// A usage example attached to a symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub description: String,
    pub code: String,
    pub output: Option<String>,
}

/// A single symbol record. See the module docs for the tagging scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// Bare name as used at colon-call sites.
    pub name: String,
    /// Qualified unique key into the repository.
    pub fullname: String,
    /// Parent table / class, when the kind has one.
    pub owner: Option<String>,
    /// Primary execution realm for display (`Client`, `Server`, `Shared`).
    pub realm: Option<String>,
    /// All realms the symbol applies to.
    pub realms: Vec<String>,
    pub description: Description,
    pub args: Vec<Argument>,
    pub rets: Vec<ReturnValue>,
    pub examples: Vec<Example>,
    /// Enum only: the enum's value rendered as text.
    pub value: Option<String>,
    /// Enum only: description of the nearest enclosing enum group.
    pub group_description: Option<String>,
    /// Interface values only: callable with `:` (method-flagged).
    pub is_method: bool,
    /// Interface values only: host-reported completion kind.
    pub value_kind: Option<CompletionItemKind>,
    /// Snippets only: template body with placeholders.
    pub template: Option<String>,
}

impl Symbol {
    fn base(kind: SymbolKind, name: impl Into<String>, fullname: impl Into<String>) -> Self {
        Symbol {
            kind,
            name: name.into(),
            fullname: fullname.into(),
            owner: None,
            realm: None,
            realms: Vec::new(),
            description: Description::default(),
            args: Vec::new(),
            rets: Vec::new(),
            examples: Vec::new(),
            value: None,
            group_description: None,
            is_method: false,
            value_kind: None,
            template: None,
        }
    }

    /// Compose the qualified key for a function-like kind.
    ///
    /// Library functions are keyed `owner.name` unless they live in the
    /// global table; class and panel methods are keyed `owner:name` so that
    /// same-named methods on different owners coexist; hooks are keyed by
    /// bare name (the owner is implicit at registration sites).
    pub fn compose_fullname(kind: SymbolKind, name: &str, owner: Option<&str>) -> String {
        match kind {
            SymbolKind::GlobalFunction => match owner {
                Some(parent) if !parent.is_empty() && parent != GLOBAL_OWNER => {
                    format!("{parent}.{name}")
                }
                _ => name.to_owned(),
            },
            SymbolKind::ClassMethod | SymbolKind::PanelMethod => match owner {
                Some(parent) if !parent.is_empty() => format!("{parent}:{name}"),
                _ => name.to_owned(),
            },
            _ => name.to_owned(),
        }
    }

    /// A documented function-like symbol with a composed fullname.
    pub fn function(kind: SymbolKind, name: impl Into<String>, owner: Option<String>) -> Self {
        let name = name.into();
        let fullname = Symbol::compose_fullname(kind, &name, owner.as_deref());
        Symbol {
            owner,
            ..Symbol::base(kind, name, fullname)
        }
    }

    /// A namespace marker for a dotted table prefix.
    pub fn module(name: impl Into<String>) -> Self {
        let name = name.into();
        Symbol::base(SymbolKind::Module, name.clone(), name)
    }

    /// A language keyword.
    pub fn keyword(word: impl Into<String>) -> Self {
        let word = word.into();
        Symbol::base(SymbolKind::Keyword, word.clone(), word)
    }

    /// A built-in constant.
    pub fn constant(name: impl Into<String>) -> Self {
        let name = name.into();
        Symbol::base(SymbolKind::Constant, name.clone(), name)
    }

    /// A completion snippet.
    pub fn snippet(name: impl Into<String>, template: impl Into<String>) -> Self {
        let name = name.into();
        Symbol {
            template: Some(template.into()),
            ..Symbol::base(SymbolKind::Snippet, name.clone(), name)
        }
    }

    /// An enum key, enriched with its nearest enclosing group's description.
    pub fn enum_entry(
        key: impl Into<String>,
        value: Option<String>,
        text: String,
        group_description: Option<String>,
    ) -> Self {
        let key = key.into();
        Symbol {
            value,
            group_description,
            description: Description {
                text,
                ..Description::default()
            },
            ..Symbol::base(SymbolKind::Enum, key.clone(), key)
        }
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn is_deprecated(&self) -> bool {
        self.description.deprecated.is_some()
    }

    /// Name inserted at the call site: bare for colon-called kinds and
    /// method-flagged interface values, qualified otherwise.
    pub fn call_name(&self) -> &str {
        if self.kind.is_colon_called() || (self.kind == SymbolKind::InterfaceValue && self.is_method)
        {
            &self.name
        } else {
            &self.fullname
        }
    }

    /// One-line detail: markers, realm, then the first description line.
    pub fn detail(&self) -> String {
        let mut out = String::new();
        if self.description.deprecated.is_some() {
            out.push_str("[deprecated] ");
        }
        if self.description.internal.is_some() {
            out.push_str("[internal] ");
        }
        if let Some(realm) = &self.realm {
            out.push_str(&format!("[{realm}] "));
        }
        out.push_str(self.description.text.lines().next().unwrap_or(""));
        out
    }

    /// Everything after the first description line, for the suggest widget.
    pub fn suggest_documentation(&self) -> String {
        let mut lines = self.description.text.lines();
        let _ = lines.next();
        lines.collect::<Vec<_>>().join("\n")
    }

    /// Plain-text call signature, e.g. `Foo(number x, string s="a")`.
    pub fn usage_text(&self) -> String {
        if !self.has_args() {
            return format!("{}()", self.fullname);
        }
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                let mut rendered = format!("{} {}", arg.type_name, arg.name);
                if let Some(default) = arg.display_default() {
                    rendered.push('=');
                    rendered.push_str(default);
                }
                rendered
            })
            .collect();
        format!("{}({})", self.fullname, args.join(", "))
    }

    /// Editor snippet with tab-stop placeholders for every argument.
    pub fn usage_snippet(&self) -> String {
        if !self.has_args() {
            return format!("{}()", self.call_name());
        }
        let args: Vec<String> = self
            .args
            .iter()
            .enumerate()
            .map(|(idx, arg)| {
                let mut placeholder = format!("{}:{}_{}", idx + 1, arg.type_name, arg.name);
                if let Some(default) = arg.display_default() {
                    placeholder.push('=');
                    placeholder.push_str(default);
                }
                format!("${{{placeholder}}}")
            })
            .collect();
        format!("{}({})", self.call_name(), args.join(", "))
    }

    /// Full hover documentation as an ordered sequence of markdown blocks.
    pub fn render_documentation(&self) -> Vec<String> {
        match self.kind {
            SymbolKind::Enum => self.render_enum_documentation(),
            SymbolKind::InterfaceValue => {
                if self.description.text.is_empty() {
                    Vec::new()
                } else {
                    vec![self.description.text.clone()]
                }
            }
            SymbolKind::Module | SymbolKind::Keyword | SymbolKind::Constant => Vec::new(),
            SymbolKind::Snippet => match &self.template {
                Some(template) => vec![format!("```glua\n{template}\n```")],
                None => Vec::new(),
            },
            SymbolKind::GlobalFunction
            | SymbolKind::ClassMethod
            | SymbolKind::PanelMethod
            | SymbolKind::Hook => self.render_function_documentation(),
        }
    }

    fn render_enum_documentation(&self) -> Vec<String> {
        vec![
            format!("Value: `{}`", self.value.as_deref().unwrap_or("")),
            if self.description.text.is_empty() {
                "No description".to_owned()
            } else {
                self.description.text.clone()
            },
            self.group_description
                .clone()
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| "No description".to_owned()),
        ]
    }

    fn render_function_documentation(&self) -> Vec<String> {
        let mut output = vec![format!("**{}**", self.usage_text())];
        if let Some(realm) = &self.realm {
            output.push(format!("#### Realm: `{realm}`"));
        }
        if let Some(deprecated) = &self.description.deprecated {
            output.push(format!("### Deprecated\n{deprecated}"));
        }
        if let Some(internal) = &self.description.internal {
            output.push(format!("### Internal\n{internal}"));
        }
        output.push(self.description.text.clone());
        if self.has_args() {
            let mut block = String::from("## Arguments\n");
            for (idx, arg) in self.args.iter().enumerate() {
                let mut heading = format!("{}. ({}) {}", idx + 1, arg.type_name, arg.name);
                if let Some(default) = arg.display_default() {
                    heading.push('=');
                    heading.push_str(default);
                }
                block.push_str(&format!(
                    "### {heading}\n##### {}\n",
                    arg.text.replace('\n', "\n##### ")
                ));
            }
            output.push(block.trim_end().to_owned());
        }
        if !self.rets.is_empty() {
            let mut block = String::from("## Returns\n");
            for (idx, ret) in self.rets.iter().enumerate() {
                block.push_str(&format!(
                    "### {}. {}\n##### {}\n",
                    idx + 1,
                    ret.type_name,
                    ret.text.replace('\n', "\n##### ")
                ));
            }
            output.push(block.trim_end().to_owned());
        }
        if !self.examples.is_empty() {
            output.push("## Examples".to_owned());
            for (idx, example) in self.examples.iter().enumerate() {
                output.push(format!("### Example {}.\n#### {}", idx + 1, example.description));
                output.push(format!("```glua\n{}\n```", example.code));
                if let Some(example_output) = example
                    .output
                    .as_deref()
                    .filter(|text| !text.is_empty())
                {
                    output.push(format!("##### Output\n`{example_output}`"));
                }
            }
        }
        output
    }
}
