//! End-to-end engine behavior: ingestion, runtime extension, resolution.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use glua_intel::{
    CompletionContext, CompletionItemKind, IntelEngine, LoaderConfig, Position, RuntimeValue,
    WikiError, WikiFetcher,
};

struct StaticFetcher {
    body: String,
    calls: AtomicU32,
}

impl StaticFetcher {
    fn new(value: serde_json::Value) -> Arc<Self> {
        Arc::new(StaticFetcher {
            body: value.to_string(),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl WikiFetcher for StaticFetcher {
    async fn fetch(&self) -> Result<String, WikiError> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

struct DownFetcher;

#[async_trait]
impl WikiFetcher for DownFetcher {
    async fn fetch(&self) -> Result<String, WikiError> {
        Err(WikiError::Fetch("503".to_owned()))
    }
}

fn sample_dump() -> serde_json::Value {
    json!([
        {
            "realms": ["Client"],
            "function": {
                "name": "Foo", "parent": "Global", "type": "libraryfunc",
                "args": {"arg": {"name": "x", "type": "number"}},
                "realm": "Client"
            }
        },
        {
            "realms": ["Client", "Server"],
            "function": {
                "name": "Add", "parent": "hook", "type": "libraryfunc",
                "realm": "Shared"
            }
        },
        {
            "realms": ["Client"],
            "function": {
                "name": "Think", "parent": "GM", "type": "hook",
                "description": "Called every frame.", "realm": "Shared"
            }
        },
        {
            "realms": ["Client"],
            "function": {
                "name": "PaintOver", "parent": "PANEL", "type": "hook",
                "realm": "Client"
            }
        }
    ])
}

#[tokio::test]
async fn ingestion_produces_documented_symbols() {
    let engine = IntelEngine::new(StaticFetcher::new(sample_dump()));
    let stats = engine.load_documentation_state("Client").await.unwrap();
    assert_eq!(stats.functions, 4);

    let repository = engine.repository.read();
    let foo = repository.lookup("Foo").unwrap();
    assert_eq!(foo.args.len(), 1);
    assert_eq!(foo.usage_text(), "Foo(number x)");
}

#[tokio::test]
async fn concurrent_realm_loads_share_one_fetch() {
    let fetcher = StaticFetcher::new(sample_dump());
    let engine = IntelEngine::new(fetcher.clone());
    let (client, server) = tokio::join!(
        engine.load_documentation_state("Client"),
        engine.load_documentation_state("Server")
    );
    assert!(client.is_ok());
    assert!(server.is_ok());
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn hook_registration_quote_offers_only_gamemode_hooks() {
    let engine = IntelEngine::new(StaticFetcher::new(sample_dump()));
    engine.load_documentation_state("Client").await.unwrap();

    let list = engine.resolve_completion("hook.Add(\"", Position::new(0, 10));
    assert_eq!(list.context, CompletionContext::HookLiteral);
    let labels: Vec<_> = list.items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["\"Think\""]);
}

#[tokio::test]
async fn hover_after_ingestion_documents_the_chain() {
    let engine = IntelEngine::new(StaticFetcher::new(sample_dump()));
    engine.load_documentation_state("Client").await.unwrap();

    let hover = engine.resolve_hover("Think", Position::new(0, 2));
    assert!(hover.contents.iter().any(|block| block.contains("Called every frame.")));
}

#[test]
fn completion_works_before_any_documentation_arrives() {
    let engine = IntelEngine::new(Arc::new(DownFetcher));
    engine.add_symbol(RuntimeValue {
        fullname: "MyGlobal".to_owned(),
        name: None,
        class_function: false,
        description: None,
        kind: Some("Variable".to_owned()),
    });
    let list = engine.resolve_completion("My", Position::new(0, 2));
    assert_eq!(list.context, CompletionContext::Global);
    assert!(list.items.iter().any(|item| item.label == "MyGlobal"));
    assert!(list.items.iter().any(|item| item.kind == CompletionItemKind::Keyword));
}

#[tokio::test]
async fn fetch_exhaustion_degrades_gracefully() {
    let engine =
        IntelEngine::with_config(Arc::new(DownFetcher), LoaderConfig { max_attempts: 2 });
    let result = engine.load_documentation_state("Client").await;
    assert!(matches!(result, Err(WikiError::AttemptsExhausted { attempts: 2 })));

    // Local completion keeps functioning on the empty repository.
    let list = engine.resolve_completion("pri", Position::new(0, 3));
    assert!(!list.items.is_empty());
    let hover = engine.resolve_hover("pri", Position::new(0, 1));
    assert!(hover.contents.is_empty());
}

#[tokio::test]
async fn duplicate_runtime_methods_collapse_to_one_bare_entry() {
    let engine = IntelEngine::new(StaticFetcher::new(json!([])));
    let record = RuntimeValue {
        fullname: "Player:DoFlip".to_owned(),
        name: None,
        class_function: true,
        description: None,
        kind: Some("Method".to_owned()),
    };
    engine.add_symbol(record.clone());
    engine.add_symbol(record);
    let repository = engine.repository.read();
    assert_eq!(repository.lookup_bare("DoFlip").len(), 1);
}

#[tokio::test]
async fn reset_swaps_in_an_empty_repository() {
    let engine = IntelEngine::new(StaticFetcher::new(sample_dump()));
    engine.load_documentation_state("Client").await.unwrap();
    assert!(engine.repository.read().lookup("Foo").is_some());

    engine.reset();
    assert!(engine.repository.read().lookup("Foo").is_none());
    assert_eq!(engine.repository.read().symbol_count(), 0);

    // The dump stays cached; reloading repopulates without another fetch.
    engine.load_documentation_state("Client").await.unwrap();
    assert!(engine.repository.read().lookup("Foo").is_some());
}

#[test]
fn registered_snippets_show_up_in_global_completion() {
    let engine = IntelEngine::new(Arc::new(DownFetcher));
    engine.register_snippet("netmsg", "net.Start(\"${1:name}\")");
    let list = engine.resolve_completion("net", Position::new(0, 3));
    let snippet = list.items.iter().find(|item| item.label == "netmsg").unwrap();
    assert_eq!(snippet.kind, CompletionItemKind::Snippet);
    assert!(snippet.insert_as_snippet);
}

#[tokio::test]
async fn qualified_completion_follows_ingested_modules() {
    let engine = IntelEngine::new(StaticFetcher::new(sample_dump()));
    engine.load_documentation_state("Client").await.unwrap();

    let list = engine.resolve_completion("hook.A", Position::new(0, 6));
    assert_eq!(list.context, CompletionContext::Qualified);
    assert_eq!(list.replace_range.start.character, 0);
    assert!(list.items.iter().any(|item| item.label == "hook.Add"));
}
