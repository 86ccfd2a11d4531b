//! Normalization pipeline
//!
//! Converts decoded dump elements into canonical symbols for one realm and
//! feeds them to the repository. Re-running the pipeline for another realm
//! is safe: the repository's first-write-wins rule absorbs duplicates.

use tracing::{debug, info};

use glua_symbols::{Argument, Example, ReturnValue, Symbol, SymbolRepository};

use crate::raw::{OneOrMany, RawDescription, RawElement, RawEnumEntry, RawEnumGroup, RawExample, RawFunction, Scalar};

/// Records emitted to the repository by one ingestion run (before its
/// first-write-wins dedup).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub functions: usize,
    pub enums: usize,
}

/// Ingest every element tagged with `realm`. Clears all derived completion
/// caches afterwards so the next read rebuilds them.
pub fn ingest(elements: &[RawElement], realm: &str, repository: &mut SymbolRepository) -> IngestStats {
    let mut stats = IngestStats::default();
    for element in elements {
        if !element.realms.iter().any(|tag| tag == realm) {
            continue;
        }
        if let Some(function) = element.function.clone() {
            if let Some(owner) = function.parent.clone().filter(|owner| !owner.is_empty()) {
                repository.add(Symbol::module(owner));
            }
            let symbol = normalize_function(function, element.example.clone(), element.realms.clone());
            repository.add(symbol);
            stats.functions += 1;
        } else if let Some(node) = element.enum_group.clone() {
            for group in node.into_groups() {
                flatten_group(group, None, repository, &mut stats);
            }
        } else {
            debug!("skipping dump element with neither function nor enum");
        }
    }
    repository.invalidate_all();
    info!(realm, functions = stats.functions, enums = stats.enums, "wiki ingestion finished");
    stats
}

fn normalize_function(
    function: RawFunction,
    inherited_examples: Option<OneOrMany<RawExample>>,
    realms: Vec<String>,
) -> Symbol {
    let mut symbol = Symbol::function(
        function.kind.symbol_kind(),
        function.name,
        function.parent.filter(|owner| !owner.is_empty()),
    );
    symbol.realm = function.realm;
    symbol.realms = realms;
    symbol.description = function
        .description
        .map(RawDescription::into_description)
        .unwrap_or_default();
    symbol.args = function
        .args
        .map(|args| args.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(|arg| Argument {
            name: arg.name,
            type_name: arg.type_name,
            default: arg.default.map(Scalar::into_text),
            text: arg.text,
        })
        .collect();
    symbol.rets = function
        .rets
        .map(|rets| rets.into_vec())
        .unwrap_or_default()
        .into_iter()
        .map(|ret| ReturnValue {
            name: ret.name,
            type_name: ret.type_name,
            text: ret.text,
        })
        .collect();
    // A leaf without examples inherits the enclosing element's.
    symbol.examples = function
        .example
        .or(inherited_examples)
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter_map(RawExample::into_example)
        .collect::<Vec<Example>>();
    symbol
}

fn flatten_group(
    group: RawEnumGroup,
    inherited_description: Option<&str>,
    repository: &mut SymbolRepository,
    stats: &mut IngestStats,
) {
    let own_description = group.description.map(RawDescription::into_text);
    let nearest = own_description.as_deref().or(inherited_description);
    for entry in group.items.map(|items| items.into_vec()).unwrap_or_default() {
        match entry {
            RawEnumEntry::Leaf(leaf) => {
                let mut symbol = Symbol::enum_entry(
                    leaf.key,
                    leaf.value.map(Scalar::into_text),
                    leaf.text.unwrap_or_default(),
                    nearest.map(str::to_owned),
                );
                symbol.realm = leaf.realm;
                repository.add(symbol);
                stats.enums += 1;
            }
            RawEnumEntry::Group(sub) => flatten_group(*sub, nearest, repository, stats),
        }
    }
}
