//! A toy hosting layer: parses a line of text, resolves the method, fills the
//! allocated holders from the tokens, and invokes.

use std::sync::Arc;
use std::sync::Mutex;

use neoreg::CallError;
use neoreg::MethodError;
use neoreg::MethodSet;
use neoreg::Receiver;
use neoreg::RecordType;
use neoreg::Registry;
use neoreg::Signature;
use neoreg::Slot;
use neoreg::Type;
use neoreg::Val;

#[derive(Default)]
struct Kv {
    entries: Mutex<Vec<(String, String)>>,
}

fn entry_type() -> Type {
    Type::Record(RecordType::new("Entry").field("key", Type::String).field("value", Type::String))
}

impl Receiver for Kv {
    fn methods(set: &mut MethodSet<Self>) {
        set.add(
            Signature::new("Put").param(Type::reference(entry_type())).result(Type::Error),
            |kv, args| {
                let key = args[0].field("key").and_then(Val::as_str).unwrap_or_default();
                let value = args[0].field("value").and_then(Val::as_str).unwrap_or_default();
                if key.is_empty() {
                    return Err(MethodError::new("empty key"));
                }
                let mut entries = kv.entries.lock().map_err(|_| MethodError::new("poisoned"))?;
                entries.retain(|(k, _)| k != key);
                entries.push((key.to_string(), value.to_string()));
                Ok(None)
            },
        )
        .add(
            Signature::new("Get").param(Type::String).results([Type::option(Type::String), Type::Error]),
            |kv, args| {
                let key = args[0].as_str().unwrap_or_default();
                let entries = kv.entries.lock().map_err(|_| MethodError::new("poisoned"))?;
                let found = entries.iter().find(|(k, _)| k == key).map(|(_, v)| Box::new(Val::String(v.clone())));
                Ok(Some(Val::Option(found)))
            },
        )
        .add(
            Signature::new("Len").results([Type::U64, Type::Error]),
            |kv, _| {
                let entries = kv.entries.lock().map_err(|_| MethodError::new("poisoned"))?;
                Ok(Some(Val::U64(entries.len() as u64)))
            },
        );
    }
}

/// Writes one token into a holder according to the slot's type.
fn decode_token(slot: &mut Slot<'_>, token: &str) -> Result<(), String> {
    let val = match slot.ty() {
        Type::String => Val::String(token.to_string()),
        Type::U64 => Val::U64(token.parse::<u64>().map_err(|e| format!("{e}"))?),
        Type::Ref(inner) if matches!(**inner, Type::Record(_)) => {
            let (key, value) = token.split_once('=').ok_or("expected key=value")?;
            let mut record = slot.get().clone();
            *record.field_mut("key").ok_or("no key field")? = Val::String(key.to_string());
            *record.field_mut("value").ok_or("no value field")? = Val::String(value.to_string());
            record
        }
        other => return Err(format!("unsupported type {other}")),
    };
    slot.write(val).map_err(|e| e.to_string())
}

fn dispatch(registry: &Registry, line: &str) -> Result<Option<Val>, String> {
    let mut tokens = line.split_whitespace();
    let dotted = tokens.next().ok_or("empty request")?;
    let (_, method) = registry.resolve(dotted).map_err(|e| e.to_string())?;

    let mut args = method.allocate_arguments();
    let tokens: Vec<&str> = tokens.collect();
    if tokens.len() != args.len() {
        return Err(format!("expected {} arguments, got {}", args.len(), tokens.len()));
    }
    for (mut slot, token) in args.slots().into_iter().zip(tokens) {
        decode_token(&mut slot, token)?;
    }

    method.invoke_with(&args).map_err(|e| match e {
        CallError::Method(err) => format!("remote: {err}"),
        other => other.to_string(),
    })
}

#[test]
fn test_dispatch_round() {
    let registry = Registry::new();
    registry.register(Arc::new(Kv::default()), "").unwrap();

    assert_eq!(dispatch(&registry, "Kv.Put color=blue"), Ok(None));
    assert_eq!(dispatch(&registry, "Kv.Put size=large"), Ok(None));
    assert_eq!(dispatch(&registry, "Kv.Put color=green"), Ok(None));
    assert_eq!(dispatch(&registry, "Kv.Len"), Ok(Some(Val::U64(2))));
    assert_eq!(
        dispatch(&registry, "Kv.Get color"),
        Ok(Some(Val::Option(Some(Box::new(Val::String("green".into()))))))
    );
    assert_eq!(dispatch(&registry, "Kv.Get weight"), Ok(Some(Val::Option(None))));
}

#[test]
fn test_dispatch_errors() {
    let registry = Registry::new();
    registry.register(Arc::new(Kv::default()), "Store").unwrap();

    assert_eq!(dispatch(&registry, "Store.Put =x"), Err("remote: empty key".to_string()));
    assert!(dispatch(&registry, "Store.Put nokey").unwrap_err().contains("key=value"));
    assert!(dispatch(&registry, "Store.Get").unwrap_err().contains("expected 1 arguments"));
    assert!(dispatch(&registry, "Store").unwrap_err().contains("ill-formed"));
    assert!(dispatch(&registry, "Kv.Len").unwrap_err().contains("can't find service"));
}
