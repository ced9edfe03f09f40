//! Registration and resolution from many threads at once.

use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use neoreg::MethodSet;
use neoreg::Receiver;
use neoreg::RegistrationError;
use neoreg::Registry;
use neoreg::ResolutionError;
use neoreg::Signature;
use neoreg::Type;
use neoreg::Val;

/// A receiver that remembers which service name it was built for.
struct Tagged {
    tag: String,
}

impl Tagged {
    fn new(tag: &str) -> Arc<Self> {
        Arc::new(Self { tag: tag.to_string() })
    }
}

impl Receiver for Tagged {
    fn methods(set: &mut MethodSet<Self>) {
        set.add(
            Signature::new("Tag").results([Type::String, Type::Error]),
            |tagged, _| Ok(Some(Val::String(tagged.tag.clone()))),
        )
        .add(
            Signature::new("Echo").param(Type::list(Type::U32)).results([Type::list(Type::U32), Type::Error]),
            |_, args| Ok(Some(args[0].clone())),
        );
    }
}

#[test]
fn test_two_threads_register_distinct_services() -> anyhow::Result<()> {
    let registry = Arc::new(Registry::new());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["A", "B"]
        .into_iter()
        .map(|name| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.register(Tagged::new(name), name)
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("register thread panicked")?;
    }

    assert_eq!(registry.call("A.Tag", &[])?, Some(Val::String("A".into())));
    assert_eq!(registry.call("B.Tag", &[])?, Some(Val::String("B".into())));
    Ok(())
}

#[test]
fn test_racing_same_name_registers_once() {
    const THREADS: usize = 8;
    let registry = Arc::new(Registry::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.register(Tagged::new(&format!("writer-{i}")), "Shared")
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("register thread panicked"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert_eq!(result.as_ref().unwrap_err(), &RegistrationError::DuplicateService("Shared".into()));
    }

    // Whoever won, the stored descriptor is stable across lookups.
    let first = registry.get_service("Shared").unwrap();
    let again = registry.get_service("Shared").unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_readers_run_alongside_writers() {
    const WRITERS: usize = 16;
    let registry = Arc::new(Registry::builder().shard_amount(4).build());
    registry.register(Tagged::new("Base"), "Base").unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    let (_, method) = registry.resolve("Base.Tag").expect("Base.Tag resolves");
                    assert_eq!(method.invoke(&[]).unwrap(), Some(Val::String("Base".into())));
                }
            })
        })
        .collect();

    let writers: Vec<_> = (0..WRITERS)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let name = format!("Svc{i}");
                registry.register(Tagged::new(&name), &name).unwrap();
            })
        })
        .collect();

    for handle in readers.into_iter().chain(writers) {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), WRITERS + 1);
    for i in 0..WRITERS {
        let name = format!("Svc{i}");
        let tag = registry.call(&format!("{name}.Tag"), &[]).unwrap();
        assert_eq!(tag, Some(Val::String(name)));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tasks_share_one_registry() -> anyhow::Result<()> {
    let registry = Arc::new(Registry::new());

    let mut tasks = Vec::new();
    for i in 0..32u32 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            let name = format!("Task{i}");
            registry.register(Tagged::new(&name), &name)?;
            let echoed = registry.call(&format!("{name}.Echo"), &[Val::List(vec![Val::U32(i)])])?;
            anyhow::ensure!(echoed == Some(Val::List(vec![Val::U32(i)])), "echo mismatch for {name}");
            Ok::<_, anyhow::Error>(())
        }));
    }

    for task in tasks {
        task.await??;
    }

    assert_eq!(registry.len(), 32);
    assert!(matches!(
        registry.resolve("Task0.Missing"),
        Err(ResolutionError::MethodNotFound { .. })
    ));
    Ok(())
}
