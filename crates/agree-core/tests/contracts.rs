//! # Contract Wrapper Scenarios
//!
//! Call-boundary behavior: precondition rejection before execution,
//! postconditions, async functions, observers and the parameter cache under
//! concurrent first use.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use agree_core::conditions::{is_integer, is_string, positive};
use agree_core::{
    describe_parameters, CallError, Contract, ContractEvent, ContractObserver, FunctionId, Phase,
    Signature,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Debug, Default)]
struct Events(Mutex<Vec<String>>);

impl ContractObserver for Events {
    fn on_event(&self, event: &ContractEvent<'_>) {
        self.0.lock().push(event.kind().to_string());
    }
}

// -- Preconditions -----------------------------------------------------------

#[test]
fn negative_argument_is_rejected_before_the_body_runs() {
    let side_effects = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&side_effects);
    let deposit = Contract::builder("deposit", move |args: &[Value]| -> Result<i64, String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(args[0].as_i64().unwrap_or_default())
    })
    .signature(Signature::declared("fn deposit(amount: i64)"))
    .annotate("amount", positive())
    .build()
    .unwrap();

    let err = deposit.call(&[json!(-5)]).unwrap_err();
    let violation = err.contract().unwrap();
    assert_eq!(violation.phase, Phase::Precondition);
    assert_eq!(violation.function, "deposit");
    assert_eq!(violation.violations()[0].condition_name, "positive");
    assert_eq!(side_effects.load(Ordering::SeqCst), 0);
}

#[test]
fn variadic_and_defaulted_parameters() {
    let join = Contract::builder("join", |args: &[Value]| -> Result<String, String> {
        let parts: Vec<&str> = args.iter().skip(1).filter_map(Value::as_str).collect();
        Ok(parts.join(args[0].as_str().unwrap_or(",")))
    })
    .signature(Signature::declared("function(sep, ...parts){}"))
    .annotate("sep", is_string())
    .annotate("parts", is_string())
    .build()
    .unwrap();

    assert_eq!(join.call(&[json!("-"), json!("a"), json!("b")]).unwrap(), "a-b");
    assert_eq!(join.call(&[json!("-")]).unwrap(), "");
    let err = join.call(&[json!("-"), json!("a"), json!(3)]).unwrap_err();
    assert_eq!(err.contract().unwrap().violations()[0].path.to_string(), "[2]");
}

#[test]
fn observer_sees_every_step() {
    let events = Arc::new(Events::default());
    let square = Contract::builder("square", |args: &[Value]| -> Result<i64, String> {
        let n = args[0].as_i64().unwrap_or_default();
        Ok(n * n)
    })
    .signature(Signature::builder().param("n").build())
    .annotate("n", is_integer())
    .returns(positive())
    .observe(events.clone())
    .build()
    .unwrap();

    assert_eq!(square.call(&[json!(3)]).unwrap(), 9);
    assert_eq!(*events.0.lock(), vec!["checked", "entered", "exited", "checked"]);

    events.0.lock().clear();
    assert!(square.call(&[json!(0)]).is_err());
    assert_eq!(
        *events.0.lock(),
        vec!["checked", "entered", "exited", "checked", "rejected"]
    );
}

// -- Async -------------------------------------------------------------------

#[tokio::test]
async fn async_function_is_checked_on_both_sides() {
    let started = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&started);
    let fetch = Contract::builder("fetch", move |args: Vec<Value>| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            tokio::task::yield_now().await;
            let id = args[0].as_i64().unwrap_or_default();
            if id == 404 {
                return Err("not found".to_string());
            }
            Ok(json!({"id": id, "name": format!("item-{id}")}))
        }
    })
    .signature(Signature::declared("id"))
    .annotate("id", positive())
    .returns(
        agree_core::Schema::keyed()
            .field("id", positive())
            .field("name", is_string())
            .build()
            .unwrap(),
    )
    .build()
    .unwrap();

    let item = fetch.call_async(vec![json!(7)]).unwrap().await.unwrap();
    assert_eq!(item["name"], "item-7");

    let Err(violation) = fetch.call_async(vec![json!(-1)]) else {
        panic!("invalid arguments must be rejected before awaiting");
    };
    assert_eq!(violation.phase, Phase::Precondition);
    assert_eq!(started.load(Ordering::SeqCst), 1);

    match fetch.call_async(vec![json!(404)]).unwrap().await {
        Err(CallError::Function(message)) => assert_eq!(message, "not found"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn async_precheck_runs_when_the_call_is_made() {
    let events = Arc::new(Events::default());
    let slow = Contract::builder("slow", |args: Vec<Value>| async move { Ok::<_, String>(args.len()) })
        .signature(Signature::declared("n"))
        .annotate("n", positive())
        .observe(events.clone())
        .build()
        .unwrap();

    let pending = slow.call_async(vec![json!(3)]);
    assert!(pending.is_ok());
    assert_eq!(*events.0.lock(), vec!["checked", "entered"]);
    drop(pending);

    assert!(slow.call_async(vec![json!(0)]).is_err());
    assert_eq!(events.0.lock()[2..], ["checked", "rejected"]);
}

// -- Unserializable returns --------------------------------------------------

#[derive(Debug, PartialEq)]
struct Handle(u32);

#[test]
fn unserializable_returns_need_no_return_rule() {
    let open = Contract::builder("open", |args: &[Value]| -> Result<Handle, String> {
        Ok(Handle(args[0].as_u64().unwrap_or_default() as u32))
    })
    .signature(Signature::declared("fd"))
    .annotate("fd", positive())
    .build()
    .unwrap();

    assert_eq!(open.call_unchecked_return(&[json!(3)]).unwrap(), Handle(3));
    let err = open.call_unchecked_return(&[json!(-3)]).unwrap_err();
    assert_eq!(err.contract().unwrap().phase, Phase::Precondition);
}

#[test]
fn unchecked_return_refuses_contracts_with_a_return_rule() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let open = Contract::builder("open_checked", move |_: &[Value]| -> Result<Handle, String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Handle(1))
    })
    .returns(positive())
    .build()
    .unwrap();

    let err = open.call_unchecked_return(&[]).unwrap_err();
    let violation = err.contract().unwrap();
    assert_eq!(violation.phase, Phase::Postcondition);
    assert_eq!(violation.result.condition_names(), vec!["serializable"]);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

// -- Introspection -----------------------------------------------------------

#[test]
fn describes_function_expression_parameters() {
    let id = FunctionId::named("describes_function_expression_parameters");
    let params = describe_parameters(&id, &Signature::declared("function(a, b=2, ...rest){}")).unwrap();
    let described: Vec<(&str, usize, bool, bool)> = params
        .iter()
        .map(|p| (p.name.as_str(), p.position, p.has_default, p.is_variadic))
        .collect();
    assert_eq!(
        described,
        vec![("a", 0, false, false), ("b", 1, true, false), ("rest", 2, false, true)]
    );
}

type Handler = fn(&[Value]) -> Result<usize, String>;

fn one_arg(args: &[Value]) -> Result<usize, String> {
    Ok(args.len())
}

fn two_args(args: &[Value]) -> Result<usize, String> {
    Ok(args.len() * 2)
}

#[test]
fn function_pointers_sharing_a_name_keep_their_own_parameters() {
    let first = Contract::builder("shared_handler", one_arg as Handler)
        .signature(Signature::declared("a"))
        .build()
        .unwrap();
    let second = Contract::builder("shared_handler", two_args as Handler)
        .signature(Signature::declared("a, b"))
        .annotate("b", positive())
        .build()
        .unwrap();

    assert_eq!(first.descriptors().len(), 1);
    assert_eq!(second.descriptors().len(), 2);
    assert_eq!(first.call(&[json!(1)]).unwrap(), 1);
    let err = second.call(&[json!(1), json!(-2)]).unwrap_err();
    assert_eq!(err.contract().unwrap().result.condition_names(), vec!["positive"]);
    assert_eq!(second.call(&[json!(1), json!(2)]).unwrap(), 4);
}

#[test]
fn concurrent_first_describe_yields_one_list() {
    let id = FunctionId::named("concurrent_first_describe_yields_one_list");
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let id = id.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                describe_parameters(&id, &Signature::declared("a, b = 2")).unwrap()
            })
        })
        .collect();
    let lists: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(lists.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}
